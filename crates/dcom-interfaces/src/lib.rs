//! DCOM interface stubs
//!
//! Client and server stubs for three DCOM interfaces, built on the
//! [`dcom`] runtime:
//!
//! | Module | Interface | Base |
//! |---|---|---|
//! | [`coma::icatalogutils`] | ICatalogUtils | IUnknown |
//! | [`mqac::imsmqmessage`] | IMSMQMessage | IDispatch |
//! | [`mqac::imsmqquery3`] | IMSMQQuery3 | IDispatch |
//!
//! Each interface module exposes the same parts:
//!
//! - an IID, a `SyntaxId` and an `InterfaceInfo` with the opnum layout
//! - one operation type per method, holding the request and response
//! - a server trait whose methods default to `E_NOTIMPL`, a dispatch
//!   function and a constructor for a type-erased server handle
//! - a client that wraps the base interface's client
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use dcom::{CallOptions, Ipid, LoopbackConn, ServerRegistry};
//! use dcom::iunknown::UnknownServer;
//! use dcom_interfaces::coma::icatalogutils::*;
//!
//! struct Catalog;
//!
//! impl UnknownServer for Catalog {}
//! impl CatalogUtilsServer for Catalog {}
//!
//! # async fn run() {
//! let conn = Arc::new(LoopbackConn::new(Arc::new(ServerRegistry::new())));
//! let ipid = Ipid::generate();
//! conn.register(ipid, "ICatalogUtils", new_catalog_utils_server_handle(Arc::new(Catalog)));
//!
//! let client = CatalogUtilsClient::new(conn).with_ipid(ipid);
//! let result = client
//!     .validate_user(ValidateUserRequest::new("alice", "secret"), &CallOptions::new())
//!     .await;
//! # }
//! ```

pub mod coma;
pub mod mqac;
