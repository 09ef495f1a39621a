//! DCOM error types

use std::fmt;
use std::time::Duration;

use midl_ndr::NdrError;
use thiserror::Error;

use super::identifiers::Ipid;

/// Result type for DCOM operations
pub type Result<T> = std::result::Result<T, DcomError>;

/// DCOM-specific errors
#[derive(Error, Debug)]
pub enum DcomError {
    /// Marshalling or unmarshalling of an operation failed
    #[error("{op}: {source}")]
    Ndr {
        op: &'static str,
        #[source]
        source: NdrError,
    },

    /// Codec error outside of any operation
    #[error("NDR error: {0}")]
    Codec(#[from] NdrError),

    /// Neither the call options nor the client carried an IPID
    #[error("{op}: ipid is missing")]
    IpidMissing { op: &'static str },

    /// The server answered with a nonzero HRESULT
    #[error("{op}: {code}")]
    Hresult { op: &'static str, code: Hresult },

    /// Status reported by a server implementation; becomes the `Return`
    /// value of the response
    #[error("server returned {0}")]
    Status(Hresult),

    /// Transport failure, passed through untouched
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The transport gave up waiting for the response
    #[error("{op}: no response within {timeout:?}")]
    Timeout { op: &'static str, timeout: Duration },

    /// The server implementation does not provide the operation
    #[error("not implemented")]
    NotImplemented,

    /// No stub knows the requested opnum
    #[error("operation {opnum} unavailable on {interface}")]
    OperationUnavailable { interface: &'static str, opnum: u16 },

    /// No server is registered for the IPID
    #[error("interface not found: IPID {0}")]
    InterfaceNotFound(Ipid),

    /// Invalid data
    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl DcomError {
    /// Attach the operation name to a codec error.
    pub fn ndr(op: &'static str) -> impl FnOnce(NdrError) -> DcomError {
        move |source| DcomError::Ndr { op, source }
    }

    /// HRESULT a server reports for this error in the `Return` field.
    pub fn hresult(&self) -> Hresult {
        match self {
            DcomError::Hresult { code, .. } | DcomError::Status(code) => *code,
            DcomError::NotImplemented | DcomError::OperationUnavailable { .. } => Hresult::E_NOTIMPL,
            DcomError::InterfaceNotFound(_) => Hresult::E_NOINTERFACE,
            DcomError::InvalidData(_) => Hresult::E_INVALIDARG,
            DcomError::Ndr { .. } | DcomError::Codec(_) => Hresult::RPC_E_INVALID_DATA,
            _ => Hresult::E_FAIL,
        }
    }

    /// Whether the error came from the remote side's `Return` value
    pub fn is_hresult(&self) -> bool {
        matches!(self, DcomError::Hresult { .. })
    }
}

/// Error returned by client calls.
///
/// When the server answered with a failure HRESULT the decoded response is
/// kept in `response`, since DCOM methods may fill out-parameters even on
/// failure (`S_FALSE` in particular).
pub struct CallError<T> {
    pub response: Option<T>,
    pub source: DcomError,
}

impl<T> CallError<T> {
    pub fn new(source: DcomError) -> Self {
        Self { response: None, source }
    }

    pub fn with_response(response: T, source: DcomError) -> Self {
        Self {
            response: Some(response),
            source,
        }
    }

    /// HRESULT returned by the server, if that is what failed
    pub fn hresult(&self) -> Option<Hresult> {
        match &self.source {
            DcomError::Hresult { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn into_parts(self) -> (Option<T>, DcomError) {
        (self.response, self.source)
    }
}

impl<T> From<DcomError> for CallError<T> {
    fn from(source: DcomError) -> Self {
        Self::new(source)
    }
}

impl<T> From<CallError<T>> for DcomError {
    fn from(err: CallError<T>) -> Self {
        err.source
    }
}

impl<T> fmt::Display for CallError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.source, f)
    }
}

impl<T> fmt::Debug for CallError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallError")
            .field("has_response", &self.response.is_some())
            .field("source", &self.source)
            .finish()
    }
}

impl<T> std::error::Error for CallError<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.source)
    }
}

/// Result of a client call
pub type CallResult<T> = std::result::Result<T, CallError<T>>;

/// HRESULT codes commonly used in DCOM
pub mod hresult {
    /// Operation successful
    pub const S_OK: u32 = 0x00000000;
    /// Operation successful, returning false
    pub const S_FALSE: u32 = 0x00000001;
    /// Not implemented
    pub const E_NOTIMPL: u32 = 0x80004001;
    /// No such interface supported
    pub const E_NOINTERFACE: u32 = 0x80004002;
    /// Invalid pointer
    pub const E_POINTER: u32 = 0x80004003;
    /// Unspecified error
    pub const E_FAIL: u32 = 0x80004005;
    /// Unexpected failure
    pub const E_UNEXPECTED: u32 = 0x8000FFFF;
    /// Access denied
    pub const E_ACCESSDENIED: u32 = 0x80070005;
    /// Out of memory
    pub const E_OUTOFMEMORY: u32 = 0x8007000E;
    /// Invalid argument
    pub const E_INVALIDARG: u32 = 0x80070057;
    /// Class not registered
    pub const REGDB_E_CLASSNOTREG: u32 = 0x80040154;
    /// Object or server not available
    pub const CO_E_OBJNOTCONNECTED: u32 = 0x800401FD;
    /// RPC server unavailable
    pub const RPC_E_SERVER_DIED: u32 = 0x80010007;
    /// Received data could not be unmarshalled
    pub const RPC_E_INVALID_DATA: u32 = 0x8001000F;
    /// Server is too busy
    pub const RPC_E_TOO_LATE: u32 = 0x80010119;
    /// Unknown dispatch member
    pub const DISP_E_MEMBERNOTFOUND: u32 = 0x80020003;
    /// Unknown name in GetIDsOfNames
    pub const DISP_E_UNKNOWNNAME: u32 = 0x80020006;
    /// Exception raised inside Invoke
    pub const DISP_E_EXCEPTION: u32 = 0x80020009;
    /// Wrong number of arguments
    pub const DISP_E_BADPARAMCOUNT: u32 = 0x8002000E;
    /// Type information not available
    pub const TYPE_E_ELEMENTNOTFOUND: u32 = 0x8002802B;
    /// Generic MSMQ failure
    pub const MQ_ERROR: u32 = 0xC00E0001;
    /// Invalid MSMQ property
    pub const MQ_ERROR_PROPERTY: u32 = 0xC00E0002;
    /// Queue does not exist
    pub const MQ_ERROR_QUEUE_NOT_FOUND: u32 = 0xC00E0003;
    /// MSMQ access denied
    pub const MQ_ERROR_ACCESS_DENIED: u32 = 0xC00E0025;
}

/// An HRESULT as carried in a `Return` field.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Hresult(pub i32);

macro_rules! hresult_names {
    ($($name:ident),* $(,)?) => {
        impl Hresult {
            $(pub const $name: Hresult = Hresult(hresult::$name as i32);)*

            /// Symbolic name of a well-known code
            pub fn name(self) -> Option<&'static str> {
                match self.code() {
                    $(hresult::$name => Some(stringify!($name)),)*
                    _ => None,
                }
            }
        }
    };
}

hresult_names!(
    S_OK,
    S_FALSE,
    E_NOTIMPL,
    E_NOINTERFACE,
    E_POINTER,
    E_FAIL,
    E_UNEXPECTED,
    E_ACCESSDENIED,
    E_OUTOFMEMORY,
    E_INVALIDARG,
    REGDB_E_CLASSNOTREG,
    CO_E_OBJNOTCONNECTED,
    RPC_E_SERVER_DIED,
    RPC_E_INVALID_DATA,
    RPC_E_TOO_LATE,
    DISP_E_MEMBERNOTFOUND,
    DISP_E_UNKNOWNNAME,
    DISP_E_EXCEPTION,
    DISP_E_BADPARAMCOUNT,
    TYPE_E_ELEMENTNOTFOUND,
    MQ_ERROR,
    MQ_ERROR_PROPERTY,
    MQ_ERROR_QUEUE_NOT_FOUND,
    MQ_ERROR_ACCESS_DENIED,
);

impl Hresult {
    pub const fn from_code(code: u32) -> Self {
        Self(code as i32)
    }

    /// Unsigned form, as HRESULTs are usually written
    pub const fn code(self) -> u32 {
        self.0 as u32
    }

    /// Severity bit clear
    pub const fn is_success(self) -> bool {
        self.0 >= 0
    }
}

impl From<i32> for Hresult {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl From<u32> for Hresult {
    fn from(value: u32) -> Self {
        Self::from_code(value)
    }
}

impl fmt::Display for Hresult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} (0x{:08x})", name, self.code()),
            None => write!(f, "HRESULT 0x{:08x}", self.code()),
        }
    }
}

impl fmt::Debug for Hresult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
