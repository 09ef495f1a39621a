//! IDispatch client

use std::sync::Arc;

use super::protocol::*;
use crate::client::{CallOptions, ClientBase, ClientConfig, Conn};
use crate::iunknown::UnknownClient;
use crate::types::{CallResult, Ipid};

/// IDispatch client; IUnknown methods are reached through [`Self::unknown`].
#[derive(Clone, Debug)]
pub struct DispatchClient {
    unknown: UnknownClient,
}

impl DispatchClient {
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

    pub async fn get_type_info_count(
        &self,
        request: GetTypeInfoCountRequest,
        opts: &CallOptions,
    ) -> CallResult<GetTypeInfoCountResponse> {
        self.base()
            .call_op(GetTypeInfoCountOperation::new(request), opts)
            .await
    }

    pub async fn get_type_info(
        &self,
        request: GetTypeInfoRequest,
        opts: &CallOptions,
    ) -> CallResult<GetTypeInfoResponse> {
        self.base().call_op(GetTypeInfoOperation::new(request), opts).await
    }

    pub async fn get_ids_of_names(
        &self,
        request: GetIDsOfNamesRequest,
        opts: &CallOptions,
    ) -> CallResult<GetIDsOfNamesResponse> {
        self.base().call_op(GetIDsOfNamesOperation::new(request), opts).await
    }

    pub async fn invoke(&self, request: InvokeRequest, opts: &CallOptions) -> CallResult<InvokeResponse> {
        self.base().call_op(InvokeOperation::new(request), opts).await
    }
}
