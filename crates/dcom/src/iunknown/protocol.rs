//! IUnknown wire protocol

use midl_ndr::{NdrDecode, NdrEncode, NdrReader, NdrWriter};

use crate::operation::{Payload, ResponsePayload};
use crate::payload::{decode_that, decode_this, encode_that, encode_this, OrpcRequest, Param};
use crate::types::{iid, Hresult, Iid, InterfaceInfo, InterfacePointer, OrpcThat, OrpcThis, SyntaxId};

/// IUnknown syntax, version 0.0
pub const UNKNOWN_SYNTAX_V0_0: SyntaxId = SyntaxId::new(iid::IUNKNOWN, 0, 0);

/// Operation numbers for IUnknown
pub mod opnum {
    pub const QUERY_INTERFACE: u16 = 0;
    pub const ADD_REF: u16 = 1;
    pub const RELEASE: u16 = 2;
}

pub static UNKNOWN_INFO: InterfaceInfo = InterfaceInfo {
    name: "IUnknown",
    iid: iid::IUNKNOWN,
    syntax: UNKNOWN_SYNTAX_V0_0,
    base: None,
    first_opnum: opnum::QUERY_INTERFACE,
    operations: &[
        QueryInterfaceOperation::NAME,
        AddRefOperation::NAME,
        ReleaseOperation::NAME,
    ],
};

/// QueryInterface request
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryInterfaceRequest {
    pub orpc_this: OrpcThis,
    /// Requested interface (`riid`)
    pub iid: Iid,
}

impl QueryInterfaceRequest {
    pub fn new(iid: Iid) -> Self {
        Self {
            orpc_this: OrpcThis::new(),
            iid,
        }
    }
}

impl NdrEncode for QueryInterfaceRequest {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        encode_this(&self.orpc_this, w)?;
        self.iid.ndr_encode(w)
    }
}

impl NdrDecode for QueryInterfaceRequest {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        let Self { orpc_this, iid } = self;
        decode_this(orpc_this, r)?;
        iid.ndr_decode(r)
    }
}

impl Payload for QueryInterfaceRequest {}

/// QueryInterface response
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryInterfaceResponse {
    pub orpc_that: OrpcThat,
    /// Marshalled pointer to the requested interface (`ppvObject`)
    pub object: Option<InterfacePointer>,
    pub hresult: i32,
}

impl NdrEncode for QueryInterfaceResponse {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        encode_that(&self.orpc_that, w)?;
        self.object.encode_param(w)?;
        w.write_data(self.hresult);
        Ok(())
    }
}

impl NdrDecode for QueryInterfaceResponse {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        let Self {
            orpc_that,
            object,
            hresult,
        } = self;
        decode_that(orpc_that, r)?;
        object.decode_param(r)?;
        *hresult = r.read_data()?;
        Ok(())
    }
}

impl Payload for QueryInterfaceResponse {}

impl ResponsePayload for QueryInterfaceResponse {
    fn return_code(&self) -> Hresult {
        Hresult(self.hresult)
    }

    fn set_return_code(&mut self, code: Hresult) {
        self.hresult = code.0;
    }
}

/// AddRef / Release response; `Return` is the new reference count
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RefCountResponse {
    pub orpc_that: OrpcThat,
    pub hresult: u32,
}

impl NdrEncode for RefCountResponse {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        encode_that(&self.orpc_that, w)?;
        w.write_data(self.hresult);
        Ok(())
    }
}

impl NdrDecode for RefCountResponse {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        decode_that(&mut self.orpc_that, r)?;
        self.hresult = r.read_data()?;
        Ok(())
    }
}

impl Payload for RefCountResponse {}

impl ResponsePayload for RefCountResponse {
    fn return_code(&self) -> Hresult {
        Hresult::from_code(self.hresult)
    }

    fn set_return_code(&mut self, code: Hresult) {
        self.hresult = code.code();
    }
}

pub type AddRefRequest = OrpcRequest;
pub type AddRefResponse = RefCountResponse;
pub type ReleaseRequest = OrpcRequest;
pub type ReleaseResponse = RefCountResponse;

crate::stub_operation! {
    /// IUnknown::QueryInterface
    pub struct QueryInterfaceOperation {
        opnum: opnum::QUERY_INTERFACE,
        name: "/IUnknown/v0/QueryInterface",
        request: QueryInterfaceRequest,
        response: QueryInterfaceResponse,
    }
}

crate::stub_operation! {
    /// IUnknown::AddRef
    pub struct AddRefOperation {
        opnum: opnum::ADD_REF,
        name: "/IUnknown/v0/AddRef",
        request: AddRefRequest,
        response: AddRefResponse,
    }
}

crate::stub_operation! {
    /// IUnknown::Release
    pub struct ReleaseOperation {
        opnum: opnum::RELEASE,
        name: "/IUnknown/v0/Release",
        request: ReleaseRequest,
        response: ReleaseResponse,
    }
}
