//! IUnknown server side

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::future::BoxFuture;
use midl_ndr::NdrContext;

use super::protocol::*;
use crate::server::{handle_call, Dispatched, ServerHandle};
use crate::types::{DcomError, Result};

/// IUnknown handler. Every method defaults to `E_NOTIMPL`.
#[async_trait]
pub trait UnknownServer: Send + Sync {
    async fn query_interface(&self, _request: QueryInterfaceRequest) -> Result<QueryInterfaceResponse> {
        Err(DcomError::NotImplemented)
    }

    async fn add_ref(&self, _request: AddRefRequest) -> Result<AddRefResponse> {
        Err(DcomError::NotImplemented)
    }

    async fn release(&self, _request: ReleaseRequest) -> Result<ReleaseResponse> {
        Err(DcomError::NotImplemented)
    }
}

/// Dispatch an IUnknown opnum. Unknown opnums yield `Ok(None)`.
pub async fn unknown_server_handle<S>(
    server: &S,
    opnum: u16,
    stub: Bytes,
    ctx: NdrContext,
) -> Result<Option<Dispatched>>
where
    S: UnknownServer + ?Sized,
{
    match opnum {
        opnum::QUERY_INTERFACE => {
            handle_call::<QueryInterfaceOperation, _, _>(stub, ctx, |req| server.query_interface(req)).await
        }
        opnum::ADD_REF => handle_call::<AddRefOperation, _, _>(stub, ctx, |req| server.add_ref(req)).await,
        opnum::RELEASE => handle_call::<ReleaseOperation, _, _>(stub, ctx, |req| server.release(req)).await,
        _ => Ok(None),
    }
}

/// Type-erased handle serving IUnknown on `server`
pub fn new_unknown_server_handle<S>(server: Arc<S>) -> ServerHandle
where
    S: UnknownServer + 'static,
{
    Arc::new(move |opnum: u16, stub: Bytes, ctx: NdrContext| -> BoxFuture<'static, Result<Option<Dispatched>>> {
        let server = server.clone();
        Box::pin(async move { unknown_server_handle(server.as_ref(), opnum, stub, ctx).await })
    })
}

/// Server that implements nothing; every call answers `E_NOTIMPL`.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnimplementedUnknownServer;

impl UnknownServer for UnimplementedUnknownServer {}
