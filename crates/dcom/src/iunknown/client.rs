//! IUnknown client

use std::sync::Arc;

use super::protocol::*;
use crate::client::{CallOptions, ClientBase, ClientConfig, Conn};
use crate::types::{CallResult, Ipid};

/// IUnknown client
#[derive(Clone, Debug)]
pub struct UnknownClient {
    base: ClientBase,
}

impl UnknownClient {
    pub fn new(conn: Arc<dyn Conn>) -> Self {
        Self {
            base: ClientBase::new(conn),
        }
    }

    pub fn from_base(base: ClientBase) -> Self {
        Self { base }
    }

    pub fn with_config(self, config: ClientConfig) -> Self {
        Self {
            base: self.base.with_config(config),
        }
    }

    /// Client bound to another interface pointer
    pub fn with_ipid(&self, ipid: Ipid) -> Self {
        Self {
            base: self.base.clone().with_ipid(ipid),
        }
    }

    pub fn base(&self) -> &ClientBase {
        &self.base
    }

    pub async fn query_interface(
        &self,
        request: QueryInterfaceRequest,
        opts: &CallOptions,
    ) -> CallResult<QueryInterfaceResponse> {
        self.base.call_op(QueryInterfaceOperation::new(request), opts).await
    }

    pub async fn add_ref(&self, request: AddRefRequest, opts: &CallOptions) -> CallResult<AddRefResponse> {
        self.base.call_op(AddRefOperation::new(request), opts).await
    }

    pub async fn release(&self, request: ReleaseRequest, opts: &CallOptions) -> CallResult<ReleaseResponse> {
        self.base.call_op(ReleaseOperation::new(request), opts).await
    }
}
