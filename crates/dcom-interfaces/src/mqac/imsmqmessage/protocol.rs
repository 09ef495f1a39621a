//! IMSMQMessage wire protocol

use dcom::idispatch::DISPATCH_INFO;
use dcom::midl_ndr::{self, Guid, NdrDecode, NdrEncode, NdrReader, NdrWriter};
use dcom::oaut::{Bstr, Variant};
use dcom::operation::Payload;
use dcom::payload::{decode_this, encode_this, OrpcRequest, OrpcResponse, Param, ValueRequest, ValueResponse};
use dcom::types::{Iid, InterfaceInfo, InterfacePointer, OrpcThis, SyntaxId};

/// IMSMQMessage interface identifier
pub const MESSAGE_IID: Iid = Guid::from_fields(
    0xd7d6e074,
    0xdccd,
    0x11d0,
    [0xaa, 0x4b, 0x00, 0x60, 0x97, 0x0d, 0xeb, 0xae],
);

/// IMSMQMessage syntax, version 0.0
pub const MESSAGE_SYNTAX_V0_0: SyntaxId = SyntaxId::new(MESSAGE_IID, 0, 0);

/// `MQMSGDELIVERY`
pub mod delivery {
    pub const EXPRESS: i32 = 0;
    pub const RECOVERABLE: i32 = 1;
}

/// `MQMSGPRIVLEVEL`
pub mod priv_level {
    pub const NONE: i32 = 0;
    pub const BODY: i32 = 1;
    pub const BODY_BASE: i32 = 1;
    pub const BODY_ENHANCED: i32 = 3;
}

/// Highest message priority; the default is 3
pub const MAX_PRIORITY: i32 = 7;

macro_rules! define_operations {
    ($(
        $const:ident = $opnum:literal, $op:ident, $method:ident, $prop:literal,
        $req_name:ident $(= $req:ty)?, $resp_name:ident = $resp:ty;
    )*) => {
        /// Operation numbers for IMSMQMessage
        pub mod opnum {
            $(pub const $const: u16 = $opnum;)*
        }

        pub static MESSAGE_INFO: InterfaceInfo = InterfaceInfo {
            name: "IMSMQMessage",
            iid: MESSAGE_IID,
            syntax: MESSAGE_SYNTAX_V0_0,
            base: Some(&DISPATCH_INFO),
            first_opnum: opnum::GET_CLASS,
            operations: &[$($op::NAME,)*],
        };

        $(
            $(pub type $req_name = $req;)?
            pub type $resp_name = $resp;

            dcom::stub_operation! {
                pub struct $op {
                    opnum: opnum::$const,
                    name: concat!("/IMSMQMessage/v0/", $prop),
                    request: $req_name,
                    response: $resp_name,
                }
            }
        )*
    };
}

message_operations!(define_operations);

/// Send request: the destination queue and an optional transaction
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SendRequest {
    pub orpc_this: OrpcThis,
    /// IMSMQQueue the message goes to
    pub destination_queue: Option<InterfacePointer>,
    /// Transaction object or one of the `MQ_*_TRANSACTION` constants
    pub transaction: Option<Variant>,
}

impl SendRequest {
    pub fn new(destination_queue: InterfacePointer) -> Self {
        Self {
            orpc_this: OrpcThis::new(),
            destination_queue: Some(destination_queue),
            transaction: None,
        }
    }

    pub fn with_transaction(mut self, transaction: Variant) -> Self {
        self.transaction = Some(transaction);
        self
    }
}

impl NdrEncode for SendRequest {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        encode_this(&self.orpc_this, w)?;
        self.destination_queue.encode_param(w)?;
        self.transaction.encode_param(w)
    }
}

impl NdrDecode for SendRequest {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        let Self {
            orpc_this,
            destination_queue,
            transaction,
        } = self;
        decode_this(orpc_this, r)?;
        destination_queue.decode_param(r)?;
        transaction.decode_param(r)
    }
}

impl Payload for SendRequest {}

/// `MQ_NO_TRANSACTION` and friends for [`SendRequest::transaction`]
pub mod transaction {
    pub const NONE: i32 = 0;
    pub const MTS: i32 = 1;
    pub const XA: i32 = 2;
    pub const SINGLE_MESSAGE: i32 = 3;
}
