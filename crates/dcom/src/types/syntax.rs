//! Interface identity and opnum layout
//!
//! Every interface publishes a `const` [`SyntaxId`] and a static
//! [`InterfaceInfo`]. The info records the base interface and the first
//! opnum owned by the interface itself, which is what the dispatchers use to
//! hand lower opnums to the base.

use std::fmt;

use midl_ndr::Guid;

/// Abstract syntax: interface UUID plus version
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SyntaxId {
    pub uuid: Guid,
    pub version_major: u16,
    pub version_minor: u16,
}

impl SyntaxId {
    pub const fn new(uuid: Guid, version_major: u16, version_minor: u16) -> Self {
        Self {
            uuid,
            version_major,
            version_minor,
        }
    }

    /// Version as carried in a bind PDU: major in the low 16 bits
    pub fn version(&self) -> u32 {
        (self.version_major as u32) | ((self.version_minor as u32) << 16)
    }
}

impl fmt::Display for SyntaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} v{}.{}", self.uuid, self.version_major, self.version_minor)
    }
}

/// Static description of an interface's opnum range.
#[derive(Debug)]
pub struct InterfaceInfo {
    /// Interface name, e.g. `ICatalogUtils`
    pub name: &'static str,
    pub iid: Guid,
    pub syntax: SyntaxId,
    /// Interface this one derives from
    pub base: Option<&'static InterfaceInfo>,
    /// First opnum owned by this interface
    pub first_opnum: u16,
    /// Operation names for `first_opnum..`, in opnum order
    pub operations: &'static [&'static str],
}

impl InterfaceInfo {
    /// One past the last opnum of this interface
    pub fn end_opnum(&self) -> u16 {
        self.first_opnum + self.operations.len() as u16
    }

    /// Whether `opnum` belongs to a base interface
    pub fn is_inherited(&self, opnum: u16) -> bool {
        opnum < self.first_opnum
    }

    /// Interface in the chain that owns `opnum`
    pub fn owner_of(&'static self, opnum: u16) -> Option<&'static InterfaceInfo> {
        let mut current = Some(self);
        while let Some(info) = current {
            if opnum >= info.first_opnum {
                return (opnum < info.end_opnum()).then_some(info);
            }
            current = info.base;
        }
        None
    }

    /// Full operation name for `opnum`, looked up through the base chain
    pub fn op_name(&'static self, opnum: u16) -> Option<&'static str> {
        let owner = self.owner_of(opnum)?;
        owner
            .operations
            .get((opnum - owner.first_opnum) as usize)
            .copied()
    }
}
