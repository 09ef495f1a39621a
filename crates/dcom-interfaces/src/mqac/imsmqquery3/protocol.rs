//! IMSMQQuery3 wire protocol

use dcom::idispatch::DISPATCH_INFO;
use dcom::midl_ndr::{self, Guid, NdrDecode, NdrEncode, NdrReader, NdrWriter};
use dcom::oaut::Variant;
use dcom::operation::Payload;
use dcom::payload::{decode_this, encode_this, OrpcRequest, Param, ValueResponse};
use dcom::types::{Iid, InterfaceInfo, InterfacePointer, OrpcThis, SyntaxId};

/// IMSMQQuery3 interface identifier
pub const QUERY3_IID: Iid = Guid::from_fields(
    0xeba96b19,
    0x2168,
    0x11d3,
    [0x89, 0x8c, 0x00, 0xe0, 0x2c, 0x07, 0x4f, 0x6b],
);

/// IMSMQQuery3 syntax, version 0.0
pub const QUERY3_SYNTAX_V0_0: SyntaxId = SyntaxId::new(QUERY3_IID, 0, 0);

/// Operation numbers for IMSMQQuery3
pub mod opnum {
    pub const LOOKUP_QUEUE_V2: u16 = 7;
    pub const GET_PROPERTIES: u16 = 8;
    pub const LOOKUP_QUEUE: u16 = 9;
}

pub static QUERY3_INFO: InterfaceInfo = InterfaceInfo {
    name: "IMSMQQuery3",
    iid: QUERY3_IID,
    syntax: QUERY3_SYNTAX_V0_0,
    base: Some(&DISPATCH_INFO),
    first_opnum: opnum::LOOKUP_QUEUE_V2,
    operations: &[
        LookupQueueV2Operation::NAME,
        GetPropertiesOperation::NAME,
        LookupQueueOperation::NAME,
    ],
};

/// Filters shared by both LookupQueue revisions. Every filter is an
/// optional `VARIANT*`; the `relation_*` fields hold the comparison
/// operator (`REL_EQ` and friends) for the filter before them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueueFilter {
    pub queue_guid: Option<Variant>,
    pub service_type_guid: Option<Variant>,
    pub label: Option<Variant>,
    pub create_time: Option<Variant>,
    pub modify_time: Option<Variant>,
    pub relation_service_type: Option<Variant>,
    pub relation_label: Option<Variant>,
    pub relation_create_time: Option<Variant>,
    pub relation_modify_time: Option<Variant>,
}

impl QueueFilter {
    /// Filter matching queues with this label
    pub fn by_label(label: &str) -> Self {
        Self {
            label: Some(Variant::bstr(label)),
            relation_label: Some(Variant::I4(rel::EQ)),
            ..Self::default()
        }
    }

    fn encode_params<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        self.queue_guid.encode_param(w)?;
        self.service_type_guid.encode_param(w)?;
        self.label.encode_param(w)?;
        self.create_time.encode_param(w)?;
        self.modify_time.encode_param(w)?;
        self.relation_service_type.encode_param(w)?;
        self.relation_label.encode_param(w)?;
        self.relation_create_time.encode_param(w)?;
        self.relation_modify_time.encode_param(w)
    }

    fn decode_params<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        let Self {
            queue_guid,
            service_type_guid,
            label,
            create_time,
            modify_time,
            relation_service_type,
            relation_label,
            relation_create_time,
            relation_modify_time,
        } = self;
        queue_guid.decode_param(r)?;
        service_type_guid.decode_param(r)?;
        label.decode_param(r)?;
        create_time.decode_param(r)?;
        modify_time.decode_param(r)?;
        relation_service_type.decode_param(r)?;
        relation_label.decode_param(r)?;
        relation_create_time.decode_param(r)?;
        relation_modify_time.decode_param(r)
    }
}

/// Relation operators for the `relation_*` filters (`RELOPS`)
pub mod rel {
    pub const NOP: i32 = 0;
    pub const EQ: i32 = 1;
    pub const NEQ: i32 = 2;
    pub const LT: i32 = 3;
    pub const GT: i32 = 4;
    pub const LE: i32 = 5;
    pub const GE: i32 = 6;
}

/// LookupQueue_v2 request
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LookupQueueV2Request {
    pub orpc_this: OrpcThis,
    pub filter: QueueFilter,
}

impl LookupQueueV2Request {
    pub fn new(filter: QueueFilter) -> Self {
        Self {
            orpc_this: OrpcThis::new(),
            filter,
        }
    }
}

impl NdrEncode for LookupQueueV2Request {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        encode_this(&self.orpc_this, w)?;
        self.filter.encode_params(w)
    }
}

impl NdrDecode for LookupQueueV2Request {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        let Self { orpc_this, filter } = self;
        decode_this(orpc_this, r)?;
        filter.decode_params(r)
    }
}

impl Payload for LookupQueueV2Request {}

/// `value` is `ppqinfos`, an IMSMQQueueInfos3 pointer
pub type LookupQueueV2Response = ValueResponse<Option<InterfacePointer>>;

pub type GetPropertiesRequest = OrpcRequest;
/// `value` is `ppcolProperties`, an IDispatch pointer
pub type GetPropertiesResponse = ValueResponse<Option<InterfacePointer>>;

/// LookupQueue request: the v2 filters plus the multicast address pair
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LookupQueueRequest {
    pub orpc_this: OrpcThis,
    pub filter: QueueFilter,
    pub multicast_address: Option<Variant>,
    pub relation_multicast_address: Option<Variant>,
}

impl LookupQueueRequest {
    pub fn new(filter: QueueFilter) -> Self {
        Self {
            orpc_this: OrpcThis::new(),
            filter,
            ..Self::default()
        }
    }

    pub fn with_multicast_address(mut self, address: &str, relation: i32) -> Self {
        self.multicast_address = Some(Variant::bstr(address));
        self.relation_multicast_address = Some(Variant::I4(relation));
        self
    }
}

impl NdrEncode for LookupQueueRequest {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        encode_this(&self.orpc_this, w)?;
        self.filter.encode_params(w)?;
        self.multicast_address.encode_param(w)?;
        self.relation_multicast_address.encode_param(w)
    }
}

impl NdrDecode for LookupQueueRequest {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        let Self {
            orpc_this,
            filter,
            multicast_address,
            relation_multicast_address,
        } = self;
        decode_this(orpc_this, r)?;
        filter.decode_params(r)?;
        multicast_address.decode_param(r)?;
        relation_multicast_address.decode_param(r)
    }
}

impl Payload for LookupQueueRequest {}

/// `value` is `ppqinfos`
pub type LookupQueueResponse = ValueResponse<Option<InterfacePointer>>;

dcom::stub_operation! {
    /// IMSMQQuery3::LookupQueue_v2
    pub struct LookupQueueV2Operation {
        opnum: opnum::LOOKUP_QUEUE_V2,
        name: "/IMSMQQuery3/v0/LookupQueue_v2",
        request: LookupQueueV2Request,
        response: LookupQueueV2Response,
    }
}

dcom::stub_operation! {
    /// IMSMQQuery3::Properties (get)
    pub struct GetPropertiesOperation {
        opnum: opnum::GET_PROPERTIES,
        name: "/IMSMQQuery3/v0/Properties",
        request: GetPropertiesRequest,
        response: GetPropertiesResponse,
    }
}

dcom::stub_operation! {
    /// IMSMQQuery3::LookupQueue
    pub struct LookupQueueOperation {
        opnum: opnum::LOOKUP_QUEUE,
        name: "/IMSMQQuery3/v0/LookupQueue",
        request: LookupQueueRequest,
        response: LookupQueueResponse,
    }
}
