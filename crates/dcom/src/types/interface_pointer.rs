//! MInterfacePointer (MS-DCOM 2.2.14.1)
//!
//! Marshalled interface pointers are passed through as opaque OBJREF bytes.

use midl_ndr::{wire_count, NdrDecode, NdrEncode, NdrError, NdrReader, NdrWriter};

/// Opaque marshalled interface pointer.
///
/// Wire form is a conformant structure:
/// ```text
/// max_count: u32
/// ulCntData: u32
/// abData:    [u8; ulCntData]
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct InterfacePointer {
    /// OBJREF bytes
    pub data: Vec<u8>,
}

impl InterfacePointer {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }
}

impl NdrEncode for InterfacePointer {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        w.write_size(self.data.len())?;
        w.write_data(wire_count(self.data.len(), "MInterfacePointer.ulCntData")?);
        w.write_bytes(&self.data);
        Ok(())
    }

    fn ndr_align() -> usize {
        4
    }
}

impl NdrDecode for InterfacePointer {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        let conformance = r.read_size()?;
        let count = r.read_data::<u32>()? as usize;
        if count != conformance {
            return Err(NdrError::LengthMismatch {
                field: "MInterfacePointer.ulCntData",
                declared: conformance,
                actual: count,
            });
        }
        r.check_size(count, 1, "abData")?;
        self.data = r.read_bytes(count)?.to_vec();
        Ok(())
    }
}
