//! One-dimensional byte SAFEARRAY (MS-OAUT 2.2.30.10)
//!
//! Only `VT_ARRAY | VT_UI1` travels through these interfaces (message ids,
//! correlation ids, bodies, certificates), so the wire form is fixed:
//! ```text
//! max_count:  u32   # = cDims (1)
//! cDims:      u16
//! fFeatures:  u16   # FADF_HAVEVARTYPE
//! cbElements: u32   # 1
//! cLocks:     u32
//! sfType:     u32   # SF_I1
//! discriminant: u32 # = sfType
//! clSize:     u32
//! pData:      unique pointer -> { max_count: u32, bytes }
//! rgsabound:  [{ cElements: u32, lLbound: i32 }; cDims]
//! ```

use midl_ndr::{wire_count, NdrDecode, NdrEncode, NdrError, NdrReader, NdrWriter};

/// `FADF_HAVEVARTYPE`
const FADF_HAVEVARTYPE: u16 = 0x0080;
/// `SF_I1`; covers every single-byte element type
const SF_I1: u32 = 0x0010;

/// Byte SAFEARRAY with a single dimension
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SafeArray {
    /// Lower bound of the dimension
    pub lower_bound: i32,
    pub data: Vec<u8>,
}

impl SafeArray {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            lower_bound: 0,
            data,
        }
    }
}

impl NdrEncode for SafeArray {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        let elements = wire_count(self.data.len(), "SAFEARRAYBOUND.cElements")?;
        w.write_size(1)?;
        w.write_data(1u16);
        w.write_data(FADF_HAVEVARTYPE);
        w.write_data(1u32);
        w.write_data(0u32);
        w.write_data(SF_I1);
        w.write_data(SF_I1);
        w.write_data(elements);
        let data = &self.data;
        w.write_pointer(move |w| w.write_conformant_bytes(data));
        w.write_data(elements);
        w.write_data(self.lower_bound);
        Ok(())
    }

    fn ndr_align() -> usize {
        4
    }
}

impl NdrDecode for SafeArray {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        let max_count = r.read_size()?;
        let dims = r.read_data::<u16>()? as usize;
        if dims != max_count {
            return Err(NdrError::LengthMismatch {
                field: "SAFEARRAY.cDims",
                declared: max_count,
                actual: dims,
            });
        }
        let _features: u16 = r.read_data()?;
        let element_size: u32 = r.read_data()?;
        let _locks: u32 = r.read_data()?;
        let sf_type: u32 = r.read_data()?;
        let discriminant: u32 = r.read_data()?;
        if sf_type != SF_I1 || discriminant != sf_type || element_size != 1 {
            return Err(NdrError::InvalidDiscriminant {
                union: "SAFEARRAYUNION",
                discriminant,
            });
        }
        let size = r.read_data::<u32>()? as usize;
        r.read_pointer(&mut self.data, move |r, data| {
            let count = r.read_size()?;
            if count != size {
                return Err(NdrError::LengthMismatch {
                    field: "BYTE_SIZEDARR.clSize",
                    declared: size,
                    actual: count,
                });
            }
            r.check_size(count, 1, "pData")?;
            *data = r.read_bytes(count)?.to_vec();
            Ok(())
        })?;

        r.check_size(dims, 8, "rgsabound")?;
        let mut lower_bound = 0;
        for dim in 0..dims {
            let elements: u32 = r.read_data()?;
            let bound: i32 = r.read_data()?;
            if dim == 0 {
                if elements as usize != size {
                    return Err(NdrError::LengthMismatch {
                        field: "SAFEARRAYBOUND.cElements",
                        declared: size,
                        actual: elements as usize,
                    });
                }
                lower_bound = bound;
            }
        }
        self.lower_bound = lower_bound;
        Ok(())
    }
}
