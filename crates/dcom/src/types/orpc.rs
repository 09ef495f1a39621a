//! ORPC (Object RPC) header types (MS-DCOM 2.2.13, 2.2.14)
//!
//! ORPCTHIS leads every DCOM request body and ORPCTHAT every response body.

use midl_ndr::{wire_count, Guid, NdrDecode, NdrEncode, NdrError, NdrReader, NdrWriter};

use super::identifiers::Cid;

/// COM version structure (MS-DCOM 2.2.11)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ComVersion {
    /// Major version number
    pub major: u16,
    /// Minor version number
    pub minor: u16,
}

impl ComVersion {
    /// DCOM version 5.1 (Windows 2000)
    pub const DCOM_5_1: Self = Self { major: 5, minor: 1 };
    /// DCOM version 5.4 (Windows XP/2003)
    pub const DCOM_5_4: Self = Self { major: 5, minor: 4 };
    /// DCOM version 5.7 (Windows 7)
    pub const DCOM_5_7: Self = Self { major: 5, minor: 7 };

    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }
}

impl NdrEncode for ComVersion {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        w.write_align(2);
        w.write_data(self.major);
        w.write_data(self.minor);
        Ok(())
    }

    fn ndr_align() -> usize {
        2
    }
}

impl NdrDecode for ComVersion {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        r.read_align(2)?;
        self.major = r.read_data()?;
        self.minor = r.read_data()?;
        Ok(())
    }
}

/// ORPC_EXTENT: one tagged extension blob.
///
/// Wire form is a conformant structure; the data is padded to a multiple
/// of 8 bytes and the padded length is the conformance.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct OrpcExtent {
    /// Extension identifier
    pub id: Guid,
    /// Extension data (unpadded)
    pub data: Vec<u8>,
}

impl OrpcExtent {
    pub fn new(id: Guid, data: Vec<u8>) -> Self {
        Self { id, data }
    }

    fn padded_len(size: usize) -> usize {
        (size + 7) & !7
    }
}

impl NdrEncode for OrpcExtent {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        let padded = Self::padded_len(self.data.len());
        w.write_size(padded)?;
        w.write_align(4);
        self.id.ndr_encode(w)?;
        w.write_data(wire_count(self.data.len(), "ORPC_EXTENT.size")?);
        w.write_bytes(&self.data);
        w.write_bytes(&vec![0u8; padded - self.data.len()]);
        Ok(())
    }

    fn ndr_align() -> usize {
        4
    }
}

impl OrpcExtent {
    fn decode_body(&mut self, r: &mut NdrReader<'_>) -> midl_ndr::Result<()> {
        let conformance = r.read_size()?;
        r.read_align(4)?;
        self.id = r.read_guid()?;
        let size = r.read_data::<u32>()? as usize;
        if conformance != Self::padded_len(size) {
            return Err(NdrError::LengthMismatch {
                field: "ORPC_EXTENT.size",
                declared: conformance,
                actual: size,
            });
        }
        r.check_size(conformance, 1, "ORPC_EXTENT.data")?;
        let mut data = r.read_bytes(conformance)?.to_vec();
        data.truncate(size);
        self.data = data;
        Ok(())
    }
}

impl NdrDecode for OrpcExtent {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        self.decode_body(r)
    }
}

/// ORPC_EXTENT_ARRAY
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct OrpcExtentArray {
    /// Reserved, zero on the wire
    pub reserved: u32,
    /// Extensions; `size` on the wire is their count
    pub extents: Vec<OrpcExtent>,
}

impl OrpcExtentArray {
    /// The extent pointer array is rounded up to an even length
    fn conformance(size: usize) -> usize {
        (size + 1) & !1
    }
}

impl NdrEncode for OrpcExtentArray {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        w.write_align(4);
        w.write_data(wire_count(self.extents.len(), "ORPC_EXTENT_ARRAY.size")?);
        w.write_data(self.reserved);
        let extents = &self.extents;
        w.write_pointer(move |w| {
            let count = Self::conformance(extents.len());
            w.write_size(count)?;
            for i in 0..count {
                w.write_unique(extents.get(i));
            }
            Ok(())
        });
        Ok(())
    }

    fn ndr_align() -> usize {
        4
    }
}

impl NdrDecode for OrpcExtentArray {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        r.read_align(4)?;
        let size = r.read_data::<u32>()? as usize;
        self.reserved = r.read_data()?;
        r.read_pointer(&mut self.extents, move |r, extents| {
            let count = r.read_size()?;
            if count < size {
                return Err(NdrError::ConformanceMismatch {
                    max_count: count as u32,
                    actual_count: size as u32,
                });
            }
            r.check_size(count, 4, "ORPC_EXTENT_ARRAY.extent")?;
            let mut referents = Vec::with_capacity(count);
            for _ in 0..count {
                referents.push(r.read_data::<u32>()?);
            }
            // Extent bodies carry no pointers of their own, so they follow
            // the pointer array directly.
            extents.clear();
            for _ in referents.iter().filter(|&&id| id != 0) {
                let mut extent = OrpcExtent::default();
                extent.decode_body(r)?;
                extents.push(extent);
            }
            Ok(())
        })
    }
}

/// ORPCTHIS structure (MS-DCOM 2.2.13)
///
/// Sent with every ORPC request from client to server.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct OrpcThis {
    /// COM version
    pub version: ComVersion,
    /// Flags (must be 0)
    pub flags: u32,
    /// Reserved (must be 0)
    pub reserved1: u32,
    /// Causality ID (UUID identifying the call chain)
    pub cid: Cid,
    /// Optional extension array
    pub extensions: Option<OrpcExtentArray>,
}

impl OrpcThis {
    /// Header for a new call chain: current COM version, fresh causality id
    pub fn new() -> Self {
        Self::with_causality(Guid::generate())
    }

    pub fn with_causality(cid: Cid) -> Self {
        Self {
            version: ComVersion::DCOM_5_7,
            cid,
            ..Self::default()
        }
    }
}

impl NdrEncode for OrpcThis {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        w.write_align(8);
        self.version.ndr_encode(w)?;
        w.write_data(self.flags);
        w.write_data(self.reserved1);
        self.cid.ndr_encode(w)?;
        w.write_unique(self.extensions.as_ref());
        Ok(())
    }

    fn ndr_align() -> usize {
        8
    }
}

impl NdrDecode for OrpcThis {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        r.read_align(8)?;
        self.version.ndr_decode(r)?;
        self.flags = r.read_data()?;
        self.reserved1 = r.read_data()?;
        self.cid.ndr_decode(r)?;
        r.read_unique(&mut self.extensions)
    }
}

/// ORPCTHAT structure (MS-DCOM 2.2.14)
///
/// Returned with every ORPC response.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct OrpcThat {
    /// Flags (must be 0)
    pub flags: u32,
    /// Optional extension array
    pub extensions: Option<OrpcExtentArray>,
}

impl NdrEncode for OrpcThat {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        w.write_align(8);
        w.write_data(self.flags);
        w.write_unique(self.extensions.as_ref());
        Ok(())
    }

    fn ndr_align() -> usize {
        8
    }
}

impl NdrDecode for OrpcThat {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        r.read_align(8)?;
        self.flags = r.read_data()?;
        r.read_unique(&mut self.extensions)
    }
}
