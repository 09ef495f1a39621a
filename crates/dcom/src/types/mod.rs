//! Core DCOM types (MS-DCOM 2.2)
//!
//! - Identifiers: IPID plus the IID/CLSID/CID aliases
//! - Interface syntax and opnum layout
//! - ORPC headers: ORPCTHIS, ORPCTHAT
//! - Marshalled interface pointers
//! - Errors and HRESULTs

mod error;
mod identifiers;
mod interface_pointer;
mod orpc;
mod syntax;

pub use error::*;
pub use identifiers::{Cid, Clsid, Iid, Ipid};
pub use interface_pointer::InterfacePointer;
pub use orpc::*;
pub use syntax::{InterfaceInfo, SyntaxId};

/// Well-known interface identifiers
pub mod iid {
    use midl_ndr::Guid;

    /// IUnknown
    pub const IUNKNOWN: Guid =
        Guid::from_fields(0x00000000, 0x0000, 0x0000, [0xc0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x46]);
    /// IDispatch
    pub const IDISPATCH: Guid =
        Guid::from_fields(0x00020400, 0x0000, 0x0000, [0xc0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x46]);
}
