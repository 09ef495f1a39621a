//! In-process transport
//!
//! [`LoopbackConn`] carries operations to servers registered in a
//! [`ServerRegistry`] without a network: the request is marshalled to a
//! stub buffer, dispatched by IPID, and the response is marshalled back and
//! unmarshalled into the caller's operation. Both directions go through the
//! full NDR codec.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use midl_ndr::NdrContext;
use tracing::{debug, warn};

use crate::client::{CallOptions, Conn};
use crate::operation::{decode_response, encode_request, encode_response, Operation};
use crate::server::{ServerHandle, ServerRegistry};
use crate::types::{DcomError, Ipid, Result};

/// Loopback transport configuration
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoopbackConfig {
    /// Data representation when the call options do not choose one
    pub context: NdrContext,
}

/// Transport that dispatches to in-process servers.
#[derive(Debug)]
pub struct LoopbackConn {
    registry: Arc<ServerRegistry>,
    config: LoopbackConfig,
    invocations: AtomicUsize,
}

impl LoopbackConn {
    pub fn new(registry: Arc<ServerRegistry>) -> Self {
        Self::with_config(registry, LoopbackConfig::default())
    }

    pub fn with_config(registry: Arc<ServerRegistry>, config: LoopbackConfig) -> Self {
        Self {
            registry,
            config,
            invocations: AtomicUsize::new(0),
        }
    }

    pub fn registry(&self) -> &Arc<ServerRegistry> {
        &self.registry
    }

    /// Shorthand for registering on the underlying registry
    pub fn register(&self, ipid: Ipid, interface: &'static str, handle: ServerHandle) {
        self.registry.register(ipid, interface, handle);
    }

    /// Number of calls that reached the transport
    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Conn for LoopbackConn {
    async fn invoke(&self, op: &mut dyn Operation, opts: &CallOptions) -> Result<()> {
        self.invocations.fetch_add(1, Ordering::Relaxed);
        let name = op.op_name();
        let opnum = op.opnum();
        let ipid = opts.ipid.ok_or(DcomError::IpidMissing { op: name })?;
        let ctx = opts.context.unwrap_or(self.config.context);

        let stub = encode_request(op, ctx)?;
        debug!(op = name, opnum, %ipid, len = stub.len(), "request marshalled");
        let (interface, handle) = self
            .registry
            .lookup(&ipid)
            .ok_or(DcomError::InterfaceNotFound(ipid))?;

        let call = handle(opnum, stub, ctx);
        let dispatched = match opts.timeout {
            Some(timeout) => tokio::time::timeout(timeout, call)
                .await
                .map_err(|_| DcomError::Timeout { op: name, timeout })??,
            None => call.await?,
        };
        let mut dispatched = dispatched.ok_or_else(|| {
            warn!(interface, opnum, "unknown opnum");
            DcomError::OperationUnavailable { interface, opnum }
        })?;
        if let Some(err) = &dispatched.error {
            warn!(op = name, %ipid, error = %err, "handler returned an error");
        }

        let response = encode_response(dispatched.operation.as_mut(), ctx)?;
        decode_response(op, response, ctx)
    }
}
