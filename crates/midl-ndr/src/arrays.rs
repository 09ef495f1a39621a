//! NDR array encodings
//!
//! Conformant arrays carry their element count on the wire:
//! ```text
//! max_count: u32
//! elements[max_count]
//! ```
//! When the array is embedded behind a pointer the count sits at the front
//! of the referent body. Arrays of pointers write one referent id per element
//! and queue the element bodies behind the whole array.

use crate::error::{MAX_NDR_ALLOCATION_SIZE, MAX_NDR_ARRAY_ELEMENTS};
use crate::{NdrDecode, NdrEncode, NdrError, NdrPrimitive, NdrReader, NdrWriter, Result};

/// Length as a 32-bit wire count.
pub fn wire_count(len: usize, field: &'static str) -> Result<u32> {
    u32::try_from(len).map_err(|_| NdrError::IntegerOverflow(field))
}

/// Count shared by sibling conformant arrays (`size_is(count)` on several
/// fields). An explicit nonzero `current` wins; otherwise the length of the
/// first non-empty sibling is used.
pub fn shared_conformance(current: u32, sibling_lens: &[usize]) -> Result<u32> {
    if current != 0 {
        return Ok(current);
    }
    match sibling_lens.iter().copied().find(|&len| len > 0) {
        Some(len) => wire_count(len, "shared conformance"),
        None => Ok(0),
    }
}

impl NdrWriter<'_> {
    /// Conformance word for a conformant array
    pub fn write_size(&mut self, count: usize) -> Result<()> {
        let count = wire_count(count, "conformance")?;
        self.write_data(count);
        Ok(())
    }

    /// Elements only; the caller has written (or hoisted) the count.
    pub fn write_array_elements<T: NdrPrimitive>(&mut self, items: &[T], count: usize) {
        for item in items.iter().take(count) {
            self.write_data(*item);
        }
        for _ in items.len()..count {
            self.write_data(T::default());
        }
    }

    pub fn write_conformant_array<T: NdrPrimitive>(&mut self, items: &[T]) -> Result<()> {
        self.write_size(items.len())?;
        self.write_array_elements(items, items.len());
        Ok(())
    }

    /// Conformant byte array without per-element alignment work
    pub fn write_conformant_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.write_size(data.len())?;
        self.write_bytes(data);
        Ok(())
    }
}

impl<'a> NdrWriter<'a> {
    /// `count` unique string pointers. Entries past `items.len()` and empty
    /// strings are written as null pointers.
    pub fn write_string_pointer_array(&mut self, items: &'a [String], count: usize) {
        for i in 0..count {
            match items.get(i) {
                Some(s) => self.write_utf16_nstring_ptr(s),
                None => self.write_null_pointer(),
            }
        }
    }

    /// `count` unique pointers; `None` entries and entries past
    /// `items.len()` are null.
    pub fn write_unique_array<T>(&mut self, items: &'a [Option<T>], count: usize)
    where
        T: NdrEncode + Sync,
    {
        for i in 0..count {
            self.write_unique(items.get(i).and_then(Option::as_ref));
        }
    }
}

impl NdrReader<'_> {
    /// Conformance word for a conformant array
    pub fn read_size(&mut self) -> Result<usize> {
        let count: u32 = self.read_data()?;
        let count = count as usize;
        if count > MAX_NDR_ARRAY_ELEMENTS {
            return Err(NdrError::AllocationLimitExceeded {
                requested: count,
                limit: MAX_NDR_ARRAY_ELEMENTS,
            });
        }
        Ok(count)
    }

    /// Reject a count whose elements cannot fit in what is left of the
    /// stream. Runs before any element storage is allocated.
    pub fn check_size(&self, count: usize, element_size: usize, array: &str) -> Result<()> {
        let needed = count
            .checked_mul(element_size)
            .ok_or(NdrError::IntegerOverflow("array byte length"))?;
        if needed > MAX_NDR_ALLOCATION_SIZE {
            return Err(NdrError::AllocationLimitExceeded {
                requested: needed,
                limit: MAX_NDR_ALLOCATION_SIZE,
            });
        }
        if needed > self.remaining() {
            return Err(NdrError::BufferOverflow {
                size: count,
                array: array.to_string(),
            });
        }
        Ok(())
    }

    pub fn read_array_elements<T: NdrPrimitive>(&mut self, count: usize, array: &str) -> Result<Vec<T>> {
        self.check_size(count, T::SIZE, array)?;
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(self.read_data()?);
        }
        Ok(items)
    }

    pub fn read_conformant_array<T: NdrPrimitive>(&mut self, array: &str) -> Result<Vec<T>> {
        let count = self.read_size()?;
        self.read_array_elements(count, array)
    }

    pub fn read_conformant_bytes(&mut self, array: &str) -> Result<Vec<u8>> {
        let count = self.read_size()?;
        self.check_size(count, 1, array)?;
        Ok(self.read_bytes(count)?.to_vec())
    }
}

impl<'a> NdrReader<'a> {
    /// `count` unique string pointers into `slot`; null elements read as `""`.
    pub fn read_string_pointer_array(
        &mut self,
        slot: &'a mut Vec<String>,
        count: usize,
        array: &str,
    ) -> Result<()> {
        self.check_size(count, 4, array)?;
        *slot = vec![String::new(); count];
        for item in slot.iter_mut() {
            self.read_utf16_nstring_ptr(item)?;
        }
        Ok(())
    }

    /// `count` unique pointers into `slot`, bodies queued in order.
    pub fn read_unique_array<T>(
        &mut self,
        slot: &'a mut Vec<Option<T>>,
        count: usize,
        array: &str,
    ) -> Result<()>
    where
        T: NdrDecode + Default + Send + 'a,
    {
        self.check_size(count, 4, array)?;
        slot.clear();
        slot.resize_with(count, || None);
        for item in slot.iter_mut() {
            self.read_unique(item)?;
        }
        Ok(())
    }
}
