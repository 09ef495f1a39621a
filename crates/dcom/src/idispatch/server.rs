//! IDispatch server side

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::future::BoxFuture;
use midl_ndr::NdrContext;

use super::protocol::*;
use crate::iunknown::{unknown_server_handle, UnknownServer};
use crate::server::{handle_call, Dispatched, ServerHandle};
use crate::types::{DcomError, Result};

/// IDispatch handler. Every method defaults to `E_NOTIMPL`.
#[async_trait]
pub trait DispatchServer: UnknownServer {
    async fn get_type_info_count(&self, _request: GetTypeInfoCountRequest) -> Result<GetTypeInfoCountResponse> {
        Err(DcomError::NotImplemented)
    }

    async fn get_type_info(&self, _request: GetTypeInfoRequest) -> Result<GetTypeInfoResponse> {
        Err(DcomError::NotImplemented)
    }

    async fn get_ids_of_names(&self, _request: GetIDsOfNamesRequest) -> Result<GetIDsOfNamesResponse> {
        Err(DcomError::NotImplemented)
    }

    async fn invoke(&self, _request: InvokeRequest) -> Result<InvokeResponse> {
        Err(DcomError::NotImplemented)
    }
}

/// Dispatch an IDispatch opnum; IUnknown opnums go to the base handler.
pub async fn dispatch_server_handle<S>(
    server: &S,
    opnum: u16,
    stub: Bytes,
    ctx: NdrContext,
) -> Result<Option<Dispatched>>
where
    S: DispatchServer + ?Sized,
{
    if DISPATCH_INFO.is_inherited(opnum) {
        return unknown_server_handle(server, opnum, stub, ctx).await;
    }
    match opnum {
        opnum::GET_TYPE_INFO_COUNT => {
            handle_call::<GetTypeInfoCountOperation, _, _>(stub, ctx, |req| server.get_type_info_count(req))
                .await
        }
        opnum::GET_TYPE_INFO => {
            handle_call::<GetTypeInfoOperation, _, _>(stub, ctx, |req| server.get_type_info(req)).await
        }
        opnum::GET_IDS_OF_NAMES => {
            handle_call::<GetIDsOfNamesOperation, _, _>(stub, ctx, |req| server.get_ids_of_names(req)).await
        }
        opnum::INVOKE => handle_call::<InvokeOperation, _, _>(stub, ctx, |req| server.invoke(req)).await,
        _ => Ok(None),
    }
}

/// Type-erased handle serving IDispatch on `server`
pub fn new_dispatch_server_handle<S>(server: Arc<S>) -> ServerHandle
where
    S: DispatchServer + 'static,
{
    Arc::new(move |opnum: u16, stub: Bytes, ctx: NdrContext| -> BoxFuture<'static, Result<Option<Dispatched>>> {
        let server = server.clone();
        Box::pin(async move { dispatch_server_handle(server.as_ref(), opnum, stub, ctx).await })
    })
}
