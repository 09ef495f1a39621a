//! DCOM runtime for generated interface stubs
//!
//! This crate carries everything a DCOM interface stub needs on top of the
//! NDR codec in [`midl_ndr`]:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │              Interface stubs (dcom-interfaces)              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Client invoker       │  Dispatch router  │  Wire types     │
//! │  - IPID resolution    │  - opnum routing  │  - ORPC headers │
//! │  - HRESULT checking   │  - base delegation│  - BSTR/VARIANT │
//! ├─────────────────────────────────────────────────────────────┤
//! │  IUnknown             │  IDispatch        │  Loopback conn  │
//! ├─────────────────────────────────────────────────────────────┤
//! │                 NDR codec (midl-ndr crate)                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`types`]: identifiers, ORPC headers, errors and HRESULTs
//! - [`oaut`]: OLE Automation wire types (BSTR, VARIANT, SAFEARRAY)
//! - [`operation`]: the [`Operation`] envelope and payload traits
//! - [`client`] / [`server`]: call plumbing on each side
//! - [`loopback`]: in-process transport
//! - [`iunknown`] / [`idispatch`]: the base interfaces

pub mod client;
pub mod idispatch;
pub mod iunknown;
pub mod loopback;
pub mod oaut;
pub mod operation;
pub mod payload;
pub mod server;
pub mod types;

pub use midl_ndr;

pub use client::{CallOptions, ClientBase, ClientConfig, Conn};
pub use loopback::{LoopbackConfig, LoopbackConn};
pub use operation::{Operation, PayloadHooks, StubOperation};
pub use server::{Dispatched, ServerHandle, ServerRegistry};
pub use types::{
    CallError, CallResult, ComVersion, DcomError, Hresult, InterfaceInfo, InterfacePointer, Ipid,
    OrpcThat, OrpcThis, Result, SyntaxId,
};

/// DCOM version spoken by this implementation
pub const DCOM_VERSION: ComVersion = ComVersion::DCOM_5_7;
