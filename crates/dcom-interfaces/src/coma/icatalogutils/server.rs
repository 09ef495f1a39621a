//! ICatalogUtils server side

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use dcom::iunknown::{unknown_server_handle, UnknownServer};
use dcom::midl_ndr::NdrContext;
use dcom::server::{handle_call, Dispatched, ServerHandle};
use dcom::{DcomError, Result};
use futures::future::BoxFuture;

use super::protocol::*;

/// ICatalogUtils handler. Every method defaults to `E_NOTIMPL`.
#[async_trait]
pub trait CatalogUtilsServer: UnknownServer {
    async fn validate_user(&self, _request: ValidateUserRequest) -> Result<ValidateUserResponse> {
        Err(DcomError::NotImplemented)
    }

    async fn wait_for_end_writes(&self, _request: WaitForEndWritesRequest) -> Result<WaitForEndWritesResponse> {
        Err(DcomError::NotImplemented)
    }

    async fn get_event_classes_for_iid(
        &self,
        _request: GetEventClassesForIIDRequest,
    ) -> Result<GetEventClassesForIIDResponse> {
        Err(DcomError::NotImplemented)
    }
}

/// Dispatch an ICatalogUtils opnum; IUnknown opnums go to the base handler.
pub async fn catalog_utils_server_handle<S>(
    server: &S,
    opnum: u16,
    stub: Bytes,
    ctx: NdrContext,
) -> Result<Option<Dispatched>>
where
    S: CatalogUtilsServer + ?Sized,
{
    if CATALOG_UTILS_INFO.is_inherited(opnum) {
        return unknown_server_handle(server, opnum, stub, ctx).await;
    }
    match opnum {
        opnum::VALIDATE_USER => {
            handle_call::<ValidateUserOperation, _, _>(stub, ctx, |req| server.validate_user(req)).await
        }
        opnum::WAIT_FOR_END_WRITES => {
            handle_call::<WaitForEndWritesOperation, _, _>(stub, ctx, |req| server.wait_for_end_writes(req)).await
        }
        opnum::GET_EVENT_CLASSES_FOR_IID => {
            handle_call::<GetEventClassesForIIDOperation, _, _>(stub, ctx, |req| {
                server.get_event_classes_for_iid(req)
            })
            .await
        }
        _ => Ok(None),
    }
}

/// Type-erased handle serving ICatalogUtils on `server`
pub fn new_catalog_utils_server_handle<S>(server: Arc<S>) -> ServerHandle
where
    S: CatalogUtilsServer + 'static,
{
    Arc::new(move |opnum: u16, stub: Bytes, ctx: NdrContext| -> BoxFuture<'static, Result<Option<Dispatched>>> {
        let server = server.clone();
        Box::pin(async move { catalog_utils_server_handle(server.as_ref(), opnum, stub, ctx).await })
    })
}

/// Server that implements nothing; every call answers `E_NOTIMPL`.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnimplementedCatalogUtilsServer;

impl UnknownServer for UnimplementedCatalogUtilsServer {}
impl CatalogUtilsServer for UnimplementedCatalogUtilsServer {}
