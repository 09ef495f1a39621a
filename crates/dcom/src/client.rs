//! Client-side call plumbing
//!
//! Stub clients build an operation, hand it to [`ClientBase::call`] and turn
//! the response `Return` into a [`CallResult`]. The wire itself is behind
//! the [`Conn`] trait.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use midl_ndr::NdrContext;
use tracing::debug;

use crate::operation::{Operation, ResponsePayload, StubOperation};
use crate::types::{CallError, CallResult, DcomError, Hresult, Ipid, Result};

/// Per-call options.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallOptions {
    /// Target interface pointer; overrides the client's bound IPID
    pub ipid: Option<Ipid>,
    /// Give up on the response after this long
    pub timeout: Option<Duration>,
    /// Data representation; the client's configured one when unset
    pub context: Option<NdrContext>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ipid(mut self, ipid: Ipid) -> Self {
        self.ipid = Some(ipid);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_context(mut self, context: NdrContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Data representation for the call
    pub fn ndr_context(&self) -> NdrContext {
        self.context.unwrap_or_default()
    }
}

/// Configuration shared by all calls of a client
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// Data representation used when a call does not pick one
    pub context: NdrContext,
    /// Timeout used when a call does not set one
    pub default_timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_context(mut self, context: NdrContext) -> Self {
        self.context = context;
        self
    }

    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = Some(timeout);
        self
    }
}

/// A connection that can carry operations to a server.
///
/// `invoke` marshals the request half of `op`, delivers it to the
/// interface named by `opts.ipid` and unmarshals the response half back into
/// `op`. Errors are transport errors; a failing `Return` is not an error
/// here.
#[async_trait]
pub trait Conn: Send + Sync {
    async fn invoke(&self, op: &mut dyn Operation, opts: &CallOptions) -> Result<()>;
}

/// Resolve the IPID for `op` and invoke it on `conn`.
///
/// The per-call IPID wins over `default_ipid`. With neither set the call
/// fails with [`DcomError::IpidMissing`] before the transport is touched.
pub async fn invoke(
    conn: &dyn Conn,
    op: &mut dyn Operation,
    default_ipid: Option<Ipid>,
    opts: &CallOptions,
) -> Result<()> {
    let ipid = opts
        .ipid
        .or(default_ipid)
        .ok_or(DcomError::IpidMissing { op: op.op_name() })?;
    debug!(op = op.op_name(), opnum = op.opnum(), %ipid, "invoking");
    let opts = CallOptions {
        ipid: Some(ipid),
        ..opts.clone()
    };
    conn.invoke(op, &opts).await
}

/// Turn a response `Return` into a call result; nonzero codes keep the
/// response alongside the error.
pub fn check_return<T>(op: &'static str, code: impl Into<Hresult>, response: T) -> CallResult<T> {
    let code = code.into();
    if code.0 != 0 {
        return Err(CallError::with_response(response, DcomError::Hresult { op, code }));
    }
    Ok(response)
}

/// State every stub client shares: the connection, the bound IPID and the
/// configuration.
#[derive(Clone)]
pub struct ClientBase {
    conn: Arc<dyn Conn>,
    ipid: Option<Ipid>,
    config: ClientConfig,
}

impl ClientBase {
    pub fn new(conn: Arc<dyn Conn>) -> Self {
        Self {
            conn,
            ipid: None,
            config: ClientConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Bind the default IPID
    pub fn with_ipid(mut self, ipid: Ipid) -> Self {
        self.ipid = Some(ipid);
        self
    }

    pub fn ipid(&self) -> Option<Ipid> {
        self.ipid
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn conn(&self) -> &Arc<dyn Conn> {
        &self.conn
    }

    /// Fill unset options from the client configuration
    pub fn resolve_options(&self, opts: &CallOptions) -> CallOptions {
        CallOptions {
            ipid: opts.ipid,
            timeout: opts.timeout.or(self.config.default_timeout),
            context: Some(opts.context.unwrap_or(self.config.context)),
        }
    }

    /// Invoke `op` with the client's defaults applied.
    pub async fn call(&self, op: &mut dyn Operation, opts: &CallOptions) -> Result<()> {
        let opts = self.resolve_options(opts);
        invoke(self.conn.as_ref(), op, self.ipid, &opts).await
    }

    /// Invoke a stub operation and check its `Return`. Hooks configured on
    /// `op` run during marshalling.
    pub async fn call_op<O: StubOperation>(&self, mut op: O, opts: &CallOptions) -> CallResult<O::Response> {
        self.call(&mut op, opts).await?;
        let code = op.response().return_code();
        let response = std::mem::take(op.response_mut());
        check_return(op.op_name(), code, response)
    }
}

impl std::fmt::Debug for ClientBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBase")
            .field("ipid", &self.ipid)
            .field("config", &self.config)
            .finish()
    }
}
