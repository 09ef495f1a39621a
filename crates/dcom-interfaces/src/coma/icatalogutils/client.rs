//! ICatalogUtils client

use std::sync::Arc;

use dcom::client::{CallOptions, ClientBase, ClientConfig, Conn};
use dcom::iunknown::UnknownClient;
use dcom::{CallResult, Ipid};

use super::protocol::*;

/// ICatalogUtils client; IUnknown methods are reached through
/// [`Self::unknown`].
#[derive(Clone, Debug)]
pub struct CatalogUtilsClient {
    unknown: UnknownClient,
}

impl CatalogUtilsClient {
    pub fn new(conn: Arc<dyn Conn>) -> Self {
        Self {
            unknown: UnknownClient::new(conn),
        }
    }

    pub fn from_base(base: ClientBase) -> Self {
        Self {
            unknown: UnknownClient::from_base(base),
        }
    }

    pub fn with_config(self, config: ClientConfig) -> Self {
        Self {
            unknown: self.unknown.with_config(config),
        }
    }

    pub fn with_ipid(&self, ipid: Ipid) -> Self {
        Self {
            unknown: self.unknown.with_ipid(ipid),
        }
    }

    pub fn unknown(&self) -> &UnknownClient {
        &self.unknown
    }

    pub fn base(&self) -> &ClientBase {
        self.unknown.base()
    }

    pub async fn validate_user(
        &self,
        request: ValidateUserRequest,
        opts: &CallOptions,
    ) -> CallResult<ValidateUserResponse> {
        self.base().call_op(ValidateUserOperation::new(request), opts).await
    }

    pub async fn wait_for_end_writes(
        &self,
        request: WaitForEndWritesRequest,
        opts: &CallOptions,
    ) -> CallResult<WaitForEndWritesResponse> {
        self.base().call_op(WaitForEndWritesOperation::new(request), opts).await
    }

    pub async fn get_event_classes_for_iid(
        &self,
        request: GetEventClassesForIIDRequest,
        opts: &CallOptions,
    ) -> CallResult<GetEventClassesForIIDResponse> {
        self.base()
            .call_op(GetEventClassesForIIDOperation::new(request), opts)
            .await
    }
}
