//! BSTR (MS-OAUT 2.2.23.2)
//!
//! `wireBSTR` is a unique pointer to a `FLAGGED_WORD_BLOB`:
//! ```text
//! max_count: u32   # = clSize
//! fFlags:    u32   # byte length of the string
//! clSize:    u32   # UTF-16 code units, no terminator
//! asData:    [u16; clSize]
//! ```
//! Stubs hold BSTR fields as `Option<Bstr>`: `None` is the null pointer and
//! `Some` of an empty string is a zero-length blob.

use std::fmt;

use midl_ndr::{wire_count, NdrDecode, NdrEncode, NdrError, NdrReader, NdrWriter};

#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Bstr(pub String);

impl Bstr {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Bstr {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Bstr {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Debug for Bstr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bstr({:?})", self.0)
    }
}

impl fmt::Display for Bstr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl NdrEncode for Bstr {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        let units: Vec<u16> = self.0.encode_utf16().collect();
        let count = wire_count(units.len(), "FLAGGED_WORD_BLOB.clSize")?;
        let byte_len = count
            .checked_mul(2)
            .ok_or(NdrError::IntegerOverflow("FLAGGED_WORD_BLOB.fFlags"))?;
        w.write_data(count);
        w.write_data(byte_len);
        w.write_data(count);
        for unit in units {
            w.write_data(unit);
        }
        Ok(())
    }

    fn ndr_align() -> usize {
        4
    }
}

impl NdrDecode for Bstr {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        let max_count = r.read_size()?;
        let _flags: u32 = r.read_data()?;
        let count = r.read_data::<u32>()? as usize;
        if count != max_count {
            return Err(NdrError::LengthMismatch {
                field: "FLAGGED_WORD_BLOB.clSize",
                declared: max_count,
                actual: count,
            });
        }
        r.check_size(count, 2, "asData")?;
        let mut units = Vec::with_capacity(count);
        for _ in 0..count {
            units.push(r.read_data::<u16>()?);
        }
        self.0 = char::decode_utf16(units).collect::<Result<String, _>>()?;
        Ok(())
    }
}
