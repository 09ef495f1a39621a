//! IMSMQMessage client

use std::sync::Arc;

use dcom::client::{CallOptions, ClientBase, ClientConfig, Conn};
use dcom::idispatch::DispatchClient;
use dcom::{CallResult, Ipid};

use super::protocol::*;

/// IMSMQMessage client; inherited methods are reached through
/// [`Self::dispatch`].
#[derive(Clone, Debug)]
pub struct MessageClient {
    dispatch: DispatchClient,
}

impl MessageClient {
    pub fn new(conn: Arc<dyn Conn>) -> Self {
        Self {
            dispatch: DispatchClient::new(conn),
        }
    }

    pub fn from_base(base: ClientBase) -> Self {
        Self {
            dispatch: DispatchClient::from_base(base),
        }
    }

    pub fn with_config(self, config: ClientConfig) -> Self {
        Self {
            dispatch: self.dispatch.with_config(config),
        }
    }

    pub fn with_ipid(&self, ipid: Ipid) -> Self {
        Self {
            dispatch: self.dispatch.with_ipid(ipid),
        }
    }

    pub fn dispatch(&self) -> &DispatchClient {
        &self.dispatch
    }

    pub fn base(&self) -> &ClientBase {
        self.dispatch.base()
    }
}

macro_rules! define_client {
    ($(
        $const:ident = $opnum:literal, $op:ident, $method:ident, $prop:literal,
        $req_name:ident $(= $req:ty)?, $resp_name:ident = $resp:ty;
    )*) => {
        impl MessageClient {
            $(
                pub async fn $method(&self, request: $req_name, opts: &CallOptions) -> CallResult<$resp_name> {
                    self.base().call_op($op::new(request), opts).await
                }
            )*
        }
    };
}

message_operations!(define_client);
