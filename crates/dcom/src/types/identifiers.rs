//! DCOM identifier types (MS-DCOM 2.2.18)
//!
//! - IPID: Interface Pointer Identifier, the routing token for a call
//! - IID / CLSID / CID: GUID aliases named for their role

use std::fmt;

use midl_ndr::Guid;

/// Interface identifier
pub type Iid = Guid;

/// Class identifier
pub type Clsid = Guid;

/// Causality identifier carried in ORPCTHIS
pub type Cid = Guid;

/// Interface Pointer Identifier (16 bytes / UUID)
///
/// Identifies one interface on one object. Only used as an opaque routing
/// token: the transport maps it to a server, nothing here interprets it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Ipid(pub Guid);

impl Ipid {
    /// Size of IPID in bytes (16 bytes, same as UUID)
    pub const SIZE: usize = 16;

    pub const fn new(guid: Guid) -> Self {
        Self(guid)
    }

    /// Generate a random IPID
    pub fn generate() -> Self {
        Self(Guid::generate())
    }

    pub const fn nil() -> Self {
        Self(Guid::NIL)
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    pub fn guid(&self) -> &Guid {
        &self.0
    }
}

impl From<Guid> for Ipid {
    fn from(guid: Guid) -> Self {
        Self(guid)
    }
}

impl fmt::Debug for Ipid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IPID({})", self.0)
    }
}

impl fmt::Display for Ipid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
