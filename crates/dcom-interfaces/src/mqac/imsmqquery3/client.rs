//! IMSMQQuery3 client

use std::sync::Arc;

use dcom::client::{CallOptions, ClientBase, ClientConfig, Conn};
use dcom::idispatch::DispatchClient;
use dcom::{CallResult, Ipid};

use super::protocol::*;

/// IMSMQQuery3 client; inherited methods are reached through
/// [`Self::dispatch`].
#[derive(Clone, Debug)]
pub struct Query3Client {
    dispatch: DispatchClient,
}

impl Query3Client {
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

    pub async fn lookup_queue_v2(
        &self,
        request: LookupQueueV2Request,
        opts: &CallOptions,
    ) -> CallResult<LookupQueueV2Response> {
        self.base().call_op(LookupQueueV2Operation::new(request), opts).await
    }

    pub async fn get_properties(
        &self,
        request: GetPropertiesRequest,
        opts: &CallOptions,
    ) -> CallResult<GetPropertiesResponse> {
        self.base().call_op(GetPropertiesOperation::new(request), opts).await
    }

    pub async fn lookup_queue(
        &self,
        request: LookupQueueRequest,
        opts: &CallOptions,
    ) -> CallResult<LookupQueueResponse> {
        self.base().call_op(LookupQueueOperation::new(request), opts).await
    }
}
