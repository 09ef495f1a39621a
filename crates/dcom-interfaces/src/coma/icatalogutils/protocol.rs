//! ICatalogUtils wire protocol

use dcom::iunknown::UNKNOWN_INFO;
use dcom::midl_ndr::{self, shared_conformance, Guid, NdrDecode, NdrEncode, NdrReader, NdrWriter};
use dcom::operation::{Payload, ResponsePayload};
use dcom::payload::{decode_that, decode_this, encode_that, encode_this, OrpcRequest, OrpcResponse};
use dcom::types::{Hresult, Iid, InterfaceInfo, OrpcThat, OrpcThis, SyntaxId};

/// ICatalogUtils interface identifier
pub const CATALOG_UTILS_IID: Iid = Guid::from_fields(
    0x456129e2,
    0x1078,
    0x11d2,
    [0xb0, 0xf9, 0x00, 0x80, 0x5f, 0xc7, 0x32, 0x04],
);

/// ICatalogUtils syntax, version 0.0
pub const CATALOG_UTILS_SYNTAX_V0_0: SyntaxId = SyntaxId::new(CATALOG_UTILS_IID, 0, 0);

/// Operation numbers for ICatalogUtils
pub mod opnum {
    pub const VALIDATE_USER: u16 = 3;
    pub const WAIT_FOR_END_WRITES: u16 = 4;
    pub const GET_EVENT_CLASSES_FOR_IID: u16 = 5;
}

pub static CATALOG_UTILS_INFO: InterfaceInfo = InterfaceInfo {
    name: "ICatalogUtils",
    iid: CATALOG_UTILS_IID,
    syntax: CATALOG_UTILS_SYNTAX_V0_0,
    base: Some(&UNKNOWN_INFO),
    first_opnum: opnum::VALIDATE_USER,
    operations: &[
        ValidateUserOperation::NAME,
        WaitForEndWritesOperation::NAME,
        GetEventClassesForIIDOperation::NAME,
    ],
};

/// ValidateUser request.
///
/// Both strings are unique LPWSTRs; an empty string goes out as a null
/// pointer and a null pointer decodes as an empty string.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValidateUserRequest {
    pub orpc_this: OrpcThis,
    /// `pwszPrincipalName`
    pub principal_name: String,
    /// `pwszPassword`
    pub password: String,
}

impl ValidateUserRequest {
    pub fn new(principal_name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            orpc_this: OrpcThis::new(),
            principal_name: principal_name.into(),
            password: password.into(),
        }
    }
}

impl NdrEncode for ValidateUserRequest {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        encode_this(&self.orpc_this, w)?;
        w.write_utf16_nstring_ptr(&self.principal_name);
        w.write_deferred()?;
        w.write_utf16_nstring_ptr(&self.password);
        w.write_deferred()
    }
}

impl NdrDecode for ValidateUserRequest {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        let Self {
            orpc_this,
            principal_name,
            password,
        } = self;
        decode_this(orpc_this, r)?;
        r.read_utf16_nstring_ptr(principal_name)?;
        r.read_deferred()?;
        r.read_utf16_nstring_ptr(password)?;
        r.read_deferred()
    }
}

impl Payload for ValidateUserRequest {}

pub type ValidateUserResponse = OrpcResponse;

pub type WaitForEndWritesRequest = OrpcRequest;
pub type WaitForEndWritesResponse = OrpcResponse;

/// GetEventClassesForIID request
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GetEventClassesForIIDRequest {
    pub orpc_this: OrpcThis,
    /// Interface id in string form (`wszIID`); `""` is sent as null
    pub iid: String,
}

impl GetEventClassesForIIDRequest {
    pub fn new(iid: impl Into<String>) -> Self {
        Self {
            orpc_this: OrpcThis::new(),
            iid: iid.into(),
        }
    }
}

impl NdrEncode for GetEventClassesForIIDRequest {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        encode_this(&self.orpc_this, w)?;
        w.write_utf16_nstring_ptr(&self.iid);
        w.write_deferred()
    }
}

impl NdrDecode for GetEventClassesForIIDRequest {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        let Self { orpc_this, iid } = self;
        decode_this(orpc_this, r)?;
        r.read_utf16_nstring_ptr(iid)?;
        r.read_deferred()
    }
}

impl Payload for GetEventClassesForIIDRequest {}

/// GetEventClassesForIID response.
///
/// The three string arrays share `classes_count` as their conformance.
/// Arrays shorter than the count are padded with null entries on the wire.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GetEventClassesForIIDResponse {
    pub orpc_that: OrpcThat,
    /// `pcClasses`; taken from the first non-empty array when zero
    pub classes_count: u32,
    /// `pawszCLSIDs`
    pub class_ids: Vec<String>,
    /// `pawszProgIDs`
    pub prog_ids: Vec<String>,
    /// `pawszDescriptions`
    pub descriptions: Vec<String>,
    pub hresult: i32,
}

/// One `size_is(pcClasses)` array of unique LPWSTRs behind a unique pointer.
/// An empty array with a zero count is the null pointer.
fn encode_class_array<'a>(w: &mut NdrWriter<'a>, items: &'a [String], count: u32) -> midl_ndr::Result<()> {
    if items.is_empty() && count == 0 {
        w.write_null_pointer();
    } else {
        w.write_pointer(move |w| {
            w.write_size(count as usize)?;
            w.write_string_pointer_array(items, count as usize);
            Ok(())
        });
    }
    w.write_deferred()
}

fn decode_class_array<'a>(
    r: &mut NdrReader<'a>,
    slot: &'a mut Vec<String>,
    array: &'static str,
) -> midl_ndr::Result<()> {
    r.read_pointer(slot, move |r, slot| {
        let count = r.read_size()?;
        r.read_string_pointer_array(slot, count, array)
    })?;
    r.read_deferred()
}

impl NdrEncode for GetEventClassesForIIDResponse {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        encode_that(&self.orpc_that, w)?;
        w.write_data(self.classes_count);
        encode_class_array(w, &self.class_ids, self.classes_count)?;
        encode_class_array(w, &self.prog_ids, self.classes_count)?;
        encode_class_array(w, &self.descriptions, self.classes_count)?;
        w.write_data(self.hresult);
        Ok(())
    }
}

impl NdrDecode for GetEventClassesForIIDResponse {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        let Self {
            orpc_that,
            classes_count,
            class_ids,
            prog_ids,
            descriptions,
            hresult,
        } = self;
        decode_that(orpc_that, r)?;
        *classes_count = r.read_data()?;
        decode_class_array(r, class_ids, "ClassIDs")?;
        decode_class_array(r, prog_ids, "ProgIDs")?;
        decode_class_array(r, descriptions, "Descriptions")?;
        *hresult = r.read_data()?;
        Ok(())
    }
}

impl Payload for GetEventClassesForIIDResponse {
    fn prepare(&mut self) -> midl_ndr::Result<()> {
        self.classes_count = shared_conformance(
            self.classes_count,
            &[self.class_ids.len(), self.prog_ids.len(), self.descriptions.len()],
        )?;
        Ok(())
    }
}

impl ResponsePayload for GetEventClassesForIIDResponse {
    fn return_code(&self) -> Hresult {
        Hresult(self.hresult)
    }

    fn set_return_code(&mut self, code: Hresult) {
        self.hresult = code.0;
    }
}

dcom::stub_operation! {
    /// ICatalogUtils::ValidateUser
    pub struct ValidateUserOperation {
        opnum: opnum::VALIDATE_USER,
        name: "/ICatalogUtils/v0/ValidateUser",
        request: ValidateUserRequest,
        response: ValidateUserResponse,
    }
}

dcom::stub_operation! {
    /// ICatalogUtils::WaitForEndWrites
    pub struct WaitForEndWritesOperation {
        opnum: opnum::WAIT_FOR_END_WRITES,
        name: "/ICatalogUtils/v0/WaitForEndWrites",
        request: WaitForEndWritesRequest,
        response: WaitForEndWritesResponse,
    }
}

dcom::stub_operation! {
    /// ICatalogUtils::GetEventClassesForIID
    pub struct GetEventClassesForIIDOperation {
        opnum: opnum::GET_EVENT_CLASSES_FOR_IID,
        name: "/ICatalogUtils/v0/GetEventClassesForIID",
        request: GetEventClassesForIIDRequest,
        response: GetEventClassesForIIDResponse,
    }
}
