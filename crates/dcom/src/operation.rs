//! Operation envelope
//!
//! Every stub method is an [`Operation`]: one value holding the request and
//! response halves of a call. The client marshals the request half and
//! unmarshals the response half into the same value; the server does the
//! opposite. Parameters go out in IDL order and each top-level parameter
//! flushes its deferred pointer bodies before the next one starts.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use midl_ndr::{NdrDecode, NdrEncode, NdrReader, NdrWriter};

use crate::types::{Hresult, Result};

/// A DCOM method call as seen by a transport.
pub trait Operation: Send + Sync + fmt::Debug {
    fn opnum(&self) -> u16;

    /// Fully qualified name, e.g. `/ICatalogUtils/v0/ValidateUser`
    fn op_name(&self) -> &'static str;

    fn marshal_request<'a>(&'a mut self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()>;
    fn unmarshal_request<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()>;
    fn marshal_response<'a>(&'a mut self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()>;
    fn unmarshal_response<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()>;

    /// For downcasting to the concrete operation
    fn as_any(&self) -> &dyn Any;
}

/// Callback run on an operation before one of its halves is marshalled.
pub type PayloadHook<O> = Arc<dyn Fn(&mut O) -> Result<()> + Send + Sync>;

/// Optional per-operation callbacks.
///
/// Stubs run `after_prepare_request` after their built-in request fixups
/// (shared-count derivation) and right before marshalling the request;
/// `after_prepare_response` likewise for the response.
pub struct PayloadHooks<O> {
    after_prepare_request: Option<PayloadHook<O>>,
    after_prepare_response: Option<PayloadHook<O>>,
}

impl<O> PayloadHooks<O> {
    pub fn new() -> Self {
        Self {
            after_prepare_request: None,
            after_prepare_response: None,
        }
    }

    pub fn on_request(mut self, hook: impl Fn(&mut O) -> Result<()> + Send + Sync + 'static) -> Self {
        self.after_prepare_request = Some(Arc::new(hook));
        self
    }

    pub fn on_response(mut self, hook: impl Fn(&mut O) -> Result<()> + Send + Sync + 'static) -> Self {
        self.after_prepare_response = Some(Arc::new(hook));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.after_prepare_request.is_none() && self.after_prepare_response.is_none()
    }

    /// Run the request hook against `op`. A no-op when unset.
    pub fn run_request(&self, op: &mut O) -> Result<()> {
        match &self.after_prepare_request {
            Some(hook) => hook(op),
            None => Ok(()),
        }
    }

    pub fn run_response(&self, op: &mut O) -> Result<()> {
        match &self.after_prepare_response {
            Some(hook) => hook(op),
            None => Ok(()),
        }
    }
}

impl<O> Default for PayloadHooks<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O> Clone for PayloadHooks<O> {
    fn clone(&self) -> Self {
        Self {
            after_prepare_request: self.after_prepare_request.clone(),
            after_prepare_response: self.after_prepare_response.clone(),
        }
    }
}

impl<O> fmt::Debug for PayloadHooks<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayloadHooks")
            .field("after_prepare_request", &self.after_prepare_request.is_some())
            .field("after_prepare_response", &self.after_prepare_response.is_some())
            .finish()
    }
}

/// Hooks compare equal regardless of contents so operations can keep
/// deriving `PartialEq` over their wire fields.
impl<O> PartialEq for PayloadHooks<O> {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

/// Run a payload hook from inside a marshal pass, where errors are codec
/// errors.
pub fn run_hook<O>(hooks: &PayloadHooks<O>, op: &mut O, request: bool) -> midl_ndr::Result<()> {
    let result = if request {
        hooks.run_request(op)
    } else {
        hooks.run_response(op)
    };
    result.map_err(|err| midl_ndr::NdrError::Hook(err.to_string()))
}

/// One half (request or response) of a stub operation.
///
/// Payloads encode their parameters in IDL order and flush deferred bodies
/// after each top-level parameter.
pub trait Payload:
    NdrEncode + NdrDecode + Default + Clone + PartialEq + fmt::Debug + Send + Sync + 'static
{
    /// Fixups applied right before marshalling, such as deriving a count
    /// shared by several conformant arrays.
    fn prepare(&mut self) -> midl_ndr::Result<()> {
        Ok(())
    }
}

/// Response half; the last field on the wire is the `Return` value.
pub trait ResponsePayload: Payload {
    fn return_code(&self) -> Hresult;
    fn set_return_code(&mut self, code: Hresult);
}

/// Operation built from a request and a response payload.
pub trait StubOperation: Operation + Default + Sized + 'static {
    type Request: Payload;
    type Response: ResponsePayload;

    fn with_request(request: Self::Request) -> Self;
    fn request_mut(&mut self) -> &mut Self::Request;
    fn response(&self) -> &Self::Response;
    fn response_mut(&mut self) -> &mut Self::Response;
}

/// Declare a stub operation: the struct holding both halves and its
/// [`Operation`] / [`StubOperation`] impls.
#[macro_export]
macro_rules! stub_operation {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            opnum: $opnum:expr,
            name: $op_name:expr,
            request: $req:ty,
            response: $resp:ty $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq)]
        $vis struct $name {
            pub request: $req,
            pub response: $resp,
            pub hooks: $crate::operation::PayloadHooks<$name>,
        }

        impl $name {
            pub const OPNUM: u16 = $opnum;
            pub const NAME: &'static str = $op_name;

            pub fn new(request: $req) -> Self {
                Self {
                    request,
                    ..Self::default()
                }
            }

            pub fn with_hooks(mut self, hooks: $crate::operation::PayloadHooks<$name>) -> Self {
                self.hooks = hooks;
                self
            }
        }

        impl $crate::operation::Operation for $name {
            fn opnum(&self) -> u16 {
                Self::OPNUM
            }

            fn op_name(&self) -> &'static str {
                Self::NAME
            }

            fn marshal_request<'a>(
                &'a mut self,
                w: &mut $crate::midl_ndr::NdrWriter<'a>,
            ) -> $crate::midl_ndr::Result<()> {
                $crate::operation::Payload::prepare(&mut self.request)?;
                let hooks = self.hooks.clone();
                $crate::operation::run_hook(&hooks, self, true)?;
                let this: &'a Self = self;
                $crate::midl_ndr::NdrEncode::ndr_encode(&this.request, w)
            }

            fn unmarshal_request<'a>(
                &'a mut self,
                r: &mut $crate::midl_ndr::NdrReader<'a>,
            ) -> $crate::midl_ndr::Result<()> {
                $crate::midl_ndr::NdrDecode::ndr_decode(&mut self.request, r)
            }

            fn marshal_response<'a>(
                &'a mut self,
                w: &mut $crate::midl_ndr::NdrWriter<'a>,
            ) -> $crate::midl_ndr::Result<()> {
                $crate::operation::Payload::prepare(&mut self.response)?;
                let hooks = self.hooks.clone();
                $crate::operation::run_hook(&hooks, self, false)?;
                let this: &'a Self = self;
                $crate::midl_ndr::NdrEncode::ndr_encode(&this.response, w)
            }

            fn unmarshal_response<'a>(
                &'a mut self,
                r: &mut $crate::midl_ndr::NdrReader<'a>,
            ) -> $crate::midl_ndr::Result<()> {
                $crate::midl_ndr::NdrDecode::ndr_decode(&mut self.response, r)
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }
        }

        impl $crate::operation::StubOperation for $name {
            type Request = $req;
            type Response = $resp;

            fn with_request(request: $req) -> Self {
                Self::new(request)
            }

            fn request_mut(&mut self) -> &mut $req {
                &mut self.request
            }

            fn response(&self) -> &$resp {
                &self.response
            }

            fn response_mut(&mut self) -> &mut $resp {
                &mut self.response
            }
        }
    };
}

/// Marshal the request half of `op` into a stub buffer.
pub fn encode_request(op: &mut dyn Operation, ctx: midl_ndr::NdrContext) -> Result<midl_ndr::Bytes> {
    let name = op.op_name();
    let mut w = NdrWriter::new(ctx);
    op.marshal_request(&mut w)
        .and_then(|_| w.write_deferred())
        .map_err(crate::types::DcomError::ndr(name))?;
    w.into_bytes().map_err(crate::types::DcomError::ndr(name))
}

/// Unmarshal a request stub into `op`; the whole buffer must be consumed
/// by the operation's parameters and their deferred bodies.
pub fn decode_request(op: &mut dyn Operation, stub: midl_ndr::Bytes, ctx: midl_ndr::NdrContext) -> Result<()> {
    let name = op.op_name();
    let mut r = NdrReader::new(stub, ctx);
    op.unmarshal_request(&mut r)
        .and_then(|_| r.read_deferred())
        .and_then(|_| r.finish())
        .map_err(crate::types::DcomError::ndr(name))
}

/// Marshal the response half of `op`.
pub fn encode_response(op: &mut dyn Operation, ctx: midl_ndr::NdrContext) -> Result<midl_ndr::Bytes> {
    let name = op.op_name();
    let mut w = NdrWriter::new(ctx);
    op.marshal_response(&mut w)
        .and_then(|_| w.write_deferred())
        .map_err(crate::types::DcomError::ndr(name))?;
    w.into_bytes().map_err(crate::types::DcomError::ndr(name))
}

/// Unmarshal a response stub into `op`.
pub fn decode_response(op: &mut dyn Operation, stub: midl_ndr::Bytes, ctx: midl_ndr::NdrContext) -> Result<()> {
    let name = op.op_name();
    let mut r = NdrReader::new(stub, ctx);
    op.unmarshal_response(&mut r)
        .and_then(|_| r.read_deferred())
        .and_then(|_| r.finish())
        .map_err(crate::types::DcomError::ndr(name))
}
