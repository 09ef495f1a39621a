//! IMSMQMessage server side

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use dcom::idispatch::{dispatch_server_handle, DispatchServer};
use dcom::midl_ndr::NdrContext;
use dcom::server::{handle_call, Dispatched, ServerHandle};
use dcom::{DcomError, Result};
use futures::future::BoxFuture;

use super::protocol::*;

macro_rules! define_server {
    ($(
        $const:ident = $opnum:literal, $op:ident, $method:ident, $prop:literal,
        $req_name:ident $(= $req:ty)?, $resp_name:ident = $resp:ty;
    )*) => {
        /// IMSMQMessage handler. Every method defaults to `E_NOTIMPL`.
        #[async_trait]
        pub trait MessageServer: DispatchServer {
            $(
                async fn $method(&self, _request: $req_name) -> Result<$resp_name> {
                    Err(DcomError::NotImplemented)
                }
            )*
        }

        /// Dispatch an IMSMQMessage opnum; IDispatch and IUnknown opnums go
        /// to the base handler.
        pub async fn message_server_handle<S>(
            server: &S,
            opnum: u16,
            stub: Bytes,
            ctx: NdrContext,
        ) -> Result<Option<Dispatched>>
        where
            S: MessageServer + ?Sized,
        {
            if MESSAGE_INFO.is_inherited(opnum) {
                return dispatch_server_handle(server, opnum, stub, ctx).await;
            }
            match opnum {
                $(opnum::$const => handle_call::<$op, _, _>(stub, ctx, |req| server.$method(req)).await,)*
                _ => Ok(None),
            }
        }
    };
}

message_operations!(define_server);

/// Type-erased handle serving IMSMQMessage on `server`
pub fn new_message_server_handle<S>(server: Arc<S>) -> ServerHandle
where
    S: MessageServer + 'static,
{
    Arc::new(move |opnum: u16, stub: Bytes, ctx: NdrContext| -> BoxFuture<'static, Result<Option<Dispatched>>> {
        let server = server.clone();
        Box::pin(async move { message_server_handle(server.as_ref(), opnum, stub, ctx).await })
    })
}
