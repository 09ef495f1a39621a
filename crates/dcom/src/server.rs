//! Server-side dispatch plumbing
//!
//! Each interface provides `<iface>_server_handle(server, opnum, stub, ctx)`
//! which decodes the request for a known opnum, calls the handler and
//! returns the populated operation. Opnums owned by a base interface are
//! handed to the base interface's handle function. [`ServerHandle`] is the
//! type-erased form a transport keeps per IPID.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use futures::future::BoxFuture;
use midl_ndr::NdrContext;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::operation::{decode_request, Operation, ResponsePayload, StubOperation};
use crate::types::{DcomError, Ipid, Result};

/// Result of dispatching one call.
///
/// `operation` always carries a marshallable response. When the handler
/// failed, `error` holds the failure and the response `Return` is already
/// set to its HRESULT.
#[derive(Debug)]
pub struct Dispatched {
    pub operation: Box<dyn Operation>,
    pub error: Option<DcomError>,
}

impl Dispatched {
    pub fn ok(operation: Box<dyn Operation>) -> Self {
        Self {
            operation,
            error: None,
        }
    }

    /// Downcast the operation to its concrete type
    pub fn downcast_ref<O: Operation + 'static>(&self) -> Option<&O> {
        self.operation.as_any().downcast_ref::<O>()
    }
}

/// Type-erased interface handler: `(opnum, request stub, context)`.
///
/// Resolves to `Ok(None)` for an opnum the interface does not know.
pub type ServerHandle =
    Arc<dyn Fn(u16, Bytes, NdrContext) -> BoxFuture<'static, Result<Option<Dispatched>>> + Send + Sync>;

/// Decode the request of `O`, run `handler` on it and package the result.
pub async fn handle_call<O, F, Fut>(stub: Bytes, ctx: NdrContext, handler: F) -> Result<Option<Dispatched>>
where
    O: StubOperation,
    F: FnOnce(O::Request) -> Fut,
    Fut: Future<Output = Result<O::Response>>,
{
    let mut op = O::default();
    decode_request(&mut op, stub, ctx)?;
    debug!(op = op.op_name(), opnum = op.opnum(), "dispatching");

    let request = std::mem::take(op.request_mut());
    let error = match handler(request).await {
        Ok(response) => {
            *op.response_mut() = response;
            None
        }
        Err(err) => {
            op.response_mut().set_return_code(err.hresult());
            Some(err)
        }
    };
    Ok(Some(Dispatched {
        operation: Box::new(op),
        error,
    }))
}

/// Server handles keyed by IPID
#[derive(Default)]
pub struct ServerRegistry {
    handles: RwLock<HashMap<Ipid, (&'static str, ServerHandle)>>,
}

impl ServerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handle` for `ipid`, replacing any previous registration.
    pub fn register(&self, ipid: Ipid, interface: &'static str, handle: ServerHandle) {
        info!(%ipid, interface, "registered server");
        self.handles.write().insert(ipid, (interface, handle));
    }

    pub fn unregister(&self, ipid: &Ipid) -> bool {
        self.handles.write().remove(ipid).is_some()
    }

    /// Interface name and handle registered for `ipid`
    pub fn lookup(&self, ipid: &Ipid) -> Option<(&'static str, ServerHandle)> {
        self.handles.read().get(ipid).cloned()
    }

    pub fn len(&self) -> usize {
        self.handles.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.read().is_empty()
    }
}

impl std::fmt::Debug for ServerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let handles = self.handles.read();
        f.debug_map()
            .entries(handles.iter().map(|(ipid, (name, _))| (ipid, name)))
            .finish()
    }
}
