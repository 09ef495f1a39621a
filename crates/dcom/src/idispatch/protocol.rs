//! IDispatch wire protocol

use midl_ndr::{shared_conformance, NdrDecode, NdrEncode, NdrReader, NdrWriter};

use crate::iunknown::UNKNOWN_INFO;
use crate::oaut::{DispatchParams, ExcepInfo, Variant};
use crate::operation::{Payload, ResponsePayload};
use crate::payload::{
    decode_that, decode_this, encode_that, encode_this, OrpcRequest, Param, ValueResponse,
};
use crate::types::{iid, Hresult, Iid, InterfaceInfo, InterfacePointer, OrpcThat, OrpcThis, SyntaxId};

/// IDispatch syntax, version 0.0
pub const DISPATCH_SYNTAX_V0_0: SyntaxId = SyntaxId::new(iid::IDISPATCH, 0, 0);

/// Operation numbers for IDispatch
pub mod opnum {
    pub const GET_TYPE_INFO_COUNT: u16 = 3;
    pub const GET_TYPE_INFO: u16 = 4;
    pub const GET_IDS_OF_NAMES: u16 = 5;
    pub const INVOKE: u16 = 6;
}

pub static DISPATCH_INFO: InterfaceInfo = InterfaceInfo {
    name: "IDispatch",
    iid: iid::IDISPATCH,
    syntax: DISPATCH_SYNTAX_V0_0,
    base: Some(&UNKNOWN_INFO),
    first_opnum: opnum::GET_TYPE_INFO_COUNT,
    operations: &[
        GetTypeInfoCountOperation::NAME,
        GetTypeInfoOperation::NAME,
        GetIDsOfNamesOperation::NAME,
        InvokeOperation::NAME,
    ],
};

/// `DISPATCH_METHOD` and friends for `Invoke`'s `dwFlags`
pub mod dispatch_flags {
    pub const METHOD: u32 = 0x1;
    pub const PROPERTYGET: u32 = 0x2;
    pub const PROPERTYPUT: u32 = 0x4;
    pub const PROPERTYPUTREF: u32 = 0x8;
}

pub type GetTypeInfoCountRequest = OrpcRequest;
/// `value` is `pctinfo`
pub type GetTypeInfoCountResponse = ValueResponse<u32>;

/// GetTypeInfo request
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GetTypeInfoRequest {
    pub orpc_this: OrpcThis,
    /// `iTInfo`
    pub type_info: u32,
    pub locale_id: u32,
}

impl NdrEncode for GetTypeInfoRequest {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        encode_this(&self.orpc_this, w)?;
        w.write_data(self.type_info);
        w.write_data(self.locale_id);
        Ok(())
    }
}

impl NdrDecode for GetTypeInfoRequest {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        decode_this(&mut self.orpc_this, r)?;
        self.type_info = r.read_data()?;
        self.locale_id = r.read_data()?;
        Ok(())
    }
}

impl Payload for GetTypeInfoRequest {}

/// `value` is `ppTInfo`
pub type GetTypeInfoResponse = ValueResponse<Option<InterfacePointer>>;

/// GetIDsOfNames request
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GetIDsOfNamesRequest {
    pub orpc_this: OrpcThis,
    /// Reserved, IID_NULL
    pub iid: Iid,
    /// Member name followed by argument names
    pub names: Vec<String>,
    /// `cNames`; taken from `names` when zero
    pub names_count: u32,
    pub locale_id: u32,
}

impl NdrEncode for GetIDsOfNamesRequest {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        encode_this(&self.orpc_this, w)?;
        self.iid.ndr_encode(w)?;
        let count = self.names_count as usize;
        w.write_size(count)?;
        w.write_string_pointer_array(&self.names, count);
        w.write_deferred()?;
        w.write_data(self.names_count);
        w.write_data(self.locale_id);
        Ok(())
    }
}

impl NdrDecode for GetIDsOfNamesRequest {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        let Self {
            orpc_this,
            iid,
            names,
            names_count,
            locale_id,
        } = self;
        decode_this(orpc_this, r)?;
        iid.ndr_decode(r)?;
        let count = r.read_size()?;
        r.read_string_pointer_array(names, count, "rgszNames")?;
        r.read_deferred()?;
        *names_count = r.read_data()?;
        *locale_id = r.read_data()?;
        Ok(())
    }
}

impl Payload for GetIDsOfNamesRequest {
    fn prepare(&mut self) -> midl_ndr::Result<()> {
        self.names_count = shared_conformance(self.names_count, &[self.names.len()])?;
        Ok(())
    }
}

/// GetIDsOfNames response
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GetIDsOfNamesResponse {
    pub orpc_that: OrpcThat,
    /// One DISPID per requested name
    pub disp_ids: Vec<i32>,
    pub hresult: i32,
}

impl NdrEncode for GetIDsOfNamesResponse {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        encode_that(&self.orpc_that, w)?;
        w.write_conformant_array(&self.disp_ids)?;
        w.write_data(self.hresult);
        Ok(())
    }
}

impl NdrDecode for GetIDsOfNamesResponse {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        decode_that(&mut self.orpc_that, r)?;
        self.disp_ids = r.read_conformant_array("rgDispId")?;
        self.hresult = r.read_data()?;
        Ok(())
    }
}

impl Payload for GetIDsOfNamesResponse {}

impl ResponsePayload for GetIDsOfNamesResponse {
    fn return_code(&self) -> Hresult {
        Hresult(self.hresult)
    }

    fn set_return_code(&mut self, code: Hresult) {
        self.hresult = code.0;
    }
}

/// Invoke request
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InvokeRequest {
    pub orpc_this: OrpcThis,
    pub disp_id_member: i32,
    /// Reserved, IID_NULL
    pub iid: Iid,
    pub locale_id: u32,
    /// `dispatch_flags` bits
    pub flags: u32,
    pub disp_params: DispatchParams,
    /// `cVarRef`; taken from the by-reference arrays when zero
    pub var_ref_count: u32,
    /// Positions in `disp_params.args` passed by reference
    pub var_ref_idx: Vec<u32>,
    pub var_ref: Vec<Option<Variant>>,
}

impl NdrEncode for InvokeRequest {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        encode_this(&self.orpc_this, w)?;
        w.write_data(self.disp_id_member);
        self.iid.ndr_encode(w)?;
        w.write_data(self.locale_id);
        w.write_data(self.flags);
        self.disp_params.ndr_encode(w)?;
        w.write_deferred()?;
        w.write_data(self.var_ref_count);
        let count = self.var_ref_count as usize;
        w.write_size(count)?;
        w.write_array_elements(&self.var_ref_idx, count);
        w.write_size(count)?;
        w.write_unique_array(&self.var_ref, count);
        w.write_deferred()
    }
}

impl NdrDecode for InvokeRequest {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        let Self {
            orpc_this,
            disp_id_member,
            iid,
            locale_id,
            flags,
            disp_params,
            var_ref_count,
            var_ref_idx,
            var_ref,
        } = self;
        decode_this(orpc_this, r)?;
        *disp_id_member = r.read_data()?;
        iid.ndr_decode(r)?;
        *locale_id = r.read_data()?;
        *flags = r.read_data()?;
        disp_params.ndr_decode(r)?;
        r.read_deferred()?;
        *var_ref_count = r.read_data()?;
        let count = r.read_size()?;
        *var_ref_idx = r.read_array_elements(count, "rgVarRefIdx")?;
        let count = r.read_size()?;
        r.read_unique_array(var_ref, count, "rgVarRef")?;
        r.read_deferred()
    }
}

impl Payload for InvokeRequest {
    fn prepare(&mut self) -> midl_ndr::Result<()> {
        self.var_ref_count =
            shared_conformance(self.var_ref_count, &[self.var_ref_idx.len(), self.var_ref.len()])?;
        Ok(())
    }
}

/// Invoke response
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InvokeResponse {
    pub orpc_that: OrpcThat,
    /// `pVarResult`
    pub var_result: Option<Variant>,
    pub excep_info: ExcepInfo,
    /// Index of the first argument with an error
    pub arg_err: u32,
    /// By-reference arguments after the call
    pub var_ref: Vec<Option<Variant>>,
    pub hresult: i32,
}

impl NdrEncode for InvokeResponse {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        encode_that(&self.orpc_that, w)?;
        self.var_result.encode_param(w)?;
        self.excep_info.ndr_encode(w)?;
        w.write_deferred()?;
        w.write_data(self.arg_err);
        w.write_size(self.var_ref.len())?;
        w.write_unique_array(&self.var_ref, self.var_ref.len());
        w.write_deferred()?;
        w.write_data(self.hresult);
        Ok(())
    }
}

impl NdrDecode for InvokeResponse {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        let Self {
            orpc_that,
            var_result,
            excep_info,
            arg_err,
            var_ref,
            hresult,
        } = self;
        decode_that(orpc_that, r)?;
        var_result.decode_param(r)?;
        excep_info.ndr_decode(r)?;
        r.read_deferred()?;
        *arg_err = r.read_data()?;
        let count = r.read_size()?;
        r.read_unique_array(var_ref, count, "rgVarRef")?;
        r.read_deferred()?;
        *hresult = r.read_data()?;
        Ok(())
    }
}

impl Payload for InvokeResponse {}

impl ResponsePayload for InvokeResponse {
    fn return_code(&self) -> Hresult {
        Hresult(self.hresult)
    }

    fn set_return_code(&mut self, code: Hresult) {
        self.hresult = code.0;
    }
}

crate::stub_operation! {
    /// IDispatch::GetTypeInfoCount
    pub struct GetTypeInfoCountOperation {
        opnum: opnum::GET_TYPE_INFO_COUNT,
        name: "/IDispatch/v0/GetTypeInfoCount",
        request: GetTypeInfoCountRequest,
        response: GetTypeInfoCountResponse,
    }
}

crate::stub_operation! {
    /// IDispatch::GetTypeInfo
    pub struct GetTypeInfoOperation {
        opnum: opnum::GET_TYPE_INFO,
        name: "/IDispatch/v0/GetTypeInfo",
        request: GetTypeInfoRequest,
        response: GetTypeInfoResponse,
    }
}

crate::stub_operation! {
    /// IDispatch::GetIDsOfNames
    pub struct GetIDsOfNamesOperation {
        opnum: opnum::GET_IDS_OF_NAMES,
        name: "/IDispatch/v0/GetIDsOfNames",
        request: GetIDsOfNamesRequest,
        response: GetIDsOfNamesResponse,
    }
}

crate::stub_operation! {
    /// IDispatch::Invoke
    pub struct InvokeOperation {
        opnum: opnum::INVOKE,
        name: "/IDispatch/v0/Invoke",
        request: InvokeRequest,
        response: InvokeResponse,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::{decode_request, decode_response, encode_request, encode_response};
    use midl_ndr::NdrContext;

    #[test]
    fn test_get_ids_of_names_count_follows_names() {
        let mut op = GetIDsOfNamesOperation::new(GetIDsOfNamesRequest {
            orpc_this: OrpcThis::new(),
            names: vec!["Send".into(), "DestinationQueue".into()],
            ..Default::default()
        });
        let stub = encode_request(&mut op, NdrContext::new()).unwrap();
        assert_eq!(op.request.names_count, 2);

        let mut decoded = GetIDsOfNamesOperation::default();
        decode_request(&mut decoded, stub, NdrContext::new()).unwrap();
        assert_eq!(decoded.request, op.request);
    }

    #[test]
    fn test_invoke_roundtrip() {
        let mut op = InvokeOperation::new(InvokeRequest {
            orpc_this: OrpcThis::new(),
            disp_id_member: 0x60020000,
            flags: dispatch_flags::METHOD,
            disp_params: DispatchParams {
                args: vec![Some(Variant::I4(3)), Some(Variant::bstr("queue"))],
                named_args: vec![],
            },
            var_ref_idx: vec![1],
            var_ref: vec![Some(Variant::bstr("queue"))],
            ..Default::default()
        });
        let stub = encode_request(&mut op, NdrContext::new()).unwrap();
        let mut server_op = InvokeOperation::default();
        decode_request(&mut server_op, stub, NdrContext::new()).unwrap();
        assert_eq!(server_op.request, op.request);
        assert_eq!(server_op.request.var_ref_count, 1);

        server_op.response = InvokeResponse {
            var_result: Some(Variant::Bool(true)),
            excep_info: ExcepInfo::new("none", 0),
            var_ref: vec![Some(Variant::bstr("renamed"))],
            ..Default::default()
        };
        let stub = encode_response(&mut server_op, NdrContext::new()).unwrap();
        decode_response(&mut op, stub, NdrContext::new()).unwrap();
        assert_eq!(op.response, server_op.response);
    }

    #[test]
    fn test_dispatch_table_chains_to_unknown() {
        assert_eq!(DISPATCH_INFO.op_name(2), Some("/IUnknown/v0/Release"));
        assert_eq!(DISPATCH_INFO.op_name(6), Some("/IDispatch/v0/Invoke"));
        assert!(DISPATCH_INFO.is_inherited(2));
    }
}
