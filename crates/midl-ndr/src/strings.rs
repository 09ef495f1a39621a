//! NDR wide strings
//!
//! `[string] wchar_t*` is a conformant varying array of UTF-16 code units
//! with a NUL terminator.
//!
//! Wire format:
//! ```text
//! max_count: u32    # elements including NUL
//! offset: u32       # always 0
//! actual_count: u32 # elements including NUL
//! chars[actual_count]
//! padding to 4-byte alignment
//! ```

use crate::{wire_count, NdrError, NdrReader, NdrWriter, Result};

impl NdrWriter<'_> {
    /// Write a NUL-terminated UTF-16 string.
    pub fn write_utf16_nstring(&mut self, s: &str) -> Result<()> {
        let units: Vec<u16> = s.encode_utf16().chain(std::iter::once(0)).collect();
        let count = wire_count(units.len(), "string length")?;
        self.write_data(count);
        self.write_data(0u32);
        self.write_data(count);
        for unit in units {
            self.write_data(unit);
        }
        self.write_align(4);
        Ok(())
    }
}

impl<'a> NdrWriter<'a> {
    /// Unique pointer to a NUL-terminated UTF-16 string; `""` goes out as null.
    pub fn write_utf16_nstring_ptr(&mut self, s: &'a str) {
        if s.is_empty() {
            self.write_null_pointer();
        } else {
            self.write_pointer(move |w| w.write_utf16_nstring(s));
        }
    }
}

impl NdrReader<'_> {
    /// Read a NUL-terminated UTF-16 string.
    pub fn read_utf16_nstring(&mut self) -> Result<String> {
        let max_count: u32 = self.read_data()?;
        let offset: u32 = self.read_data()?;
        let actual_count: u32 = self.read_data()?;

        if offset != 0 {
            return Err(NdrError::InvalidString(format!(
                "non-zero string offset {offset}"
            )));
        }
        if actual_count > max_count {
            return Err(NdrError::ConformanceMismatch {
                max_count,
                actual_count,
            });
        }

        let count = actual_count as usize;
        self.check_size(count, 2, "string")?;
        let mut units = Vec::with_capacity(count);
        for _ in 0..count {
            units.push(self.read_data::<u16>()?);
        }
        if units.last() == Some(&0) {
            units.pop();
        }
        self.read_align(4)?;

        Ok(char::decode_utf16(units).collect::<std::result::Result<String, _>>()?)
    }
}

impl<'a> NdrReader<'a> {
    /// Unique pointer to a NUL-terminated UTF-16 string; null reads as `""`.
    pub fn read_utf16_nstring_ptr(&mut self, slot: &'a mut String) -> Result<()> {
        self.read_pointer(slot, |r, s| {
            *s = r.read_utf16_nstring()?;
            Ok(())
        })
    }
}
