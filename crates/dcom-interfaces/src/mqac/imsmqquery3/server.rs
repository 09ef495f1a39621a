//! IMSMQQuery3 server side

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use dcom::idispatch::{dispatch_server_handle, DispatchServer};
use dcom::midl_ndr::NdrContext;
use dcom::server::{handle_call, Dispatched, ServerHandle};
use dcom::{DcomError, Result};
use futures::future::BoxFuture;

use super::protocol::*;

/// IMSMQQuery3 handler. Every method defaults to `E_NOTIMPL`.
#[async_trait]
pub trait Query3Server: DispatchServer {
    async fn lookup_queue_v2(&self, _request: LookupQueueV2Request) -> Result<LookupQueueV2Response> {
        Err(DcomError::NotImplemented)
    }

    async fn get_properties(&self, _request: GetPropertiesRequest) -> Result<GetPropertiesResponse> {
        Err(DcomError::NotImplemented)
    }

    async fn lookup_queue(&self, _request: LookupQueueRequest) -> Result<LookupQueueResponse> {
        Err(DcomError::NotImplemented)
    }
}

/// Dispatch an IMSMQQuery3 opnum; IDispatch and IUnknown opnums go to the
/// base handler.
pub async fn query3_server_handle<S>(
    server: &S,
    opnum: u16,
    stub: Bytes,
    ctx: NdrContext,
) -> Result<Option<Dispatched>>
where
    S: Query3Server + ?Sized,
{
    if QUERY3_INFO.is_inherited(opnum) {
        return dispatch_server_handle(server, opnum, stub, ctx).await;
    }
    match opnum {
        opnum::LOOKUP_QUEUE_V2 => {
            handle_call::<LookupQueueV2Operation, _, _>(stub, ctx, |req| server.lookup_queue_v2(req)).await
        }
        opnum::GET_PROPERTIES => {
            handle_call::<GetPropertiesOperation, _, _>(stub, ctx, |req| server.get_properties(req)).await
        }
        opnum::LOOKUP_QUEUE => {
            handle_call::<LookupQueueOperation, _, _>(stub, ctx, |req| server.lookup_queue(req)).await
        }
        _ => Ok(None),
    }
}

/// Type-erased handle serving IMSMQQuery3 on `server`
pub fn new_query3_server_handle<S>(server: Arc<S>) -> ServerHandle
where
    S: Query3Server + 'static,
{
    Arc::new(move |opnum: u16, stub: Bytes, ctx: NdrContext| -> BoxFuture<'static, Result<Option<Dispatched>>> {
        let server = server.clone();
        Box::pin(async move { query3_server_handle(server.as_ref(), opnum, stub, ctx).await })
    })
}
