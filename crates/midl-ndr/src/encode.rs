//! NDR encoding trait

use crate::{NdrWriter, Result};

/// Types that can write themselves into an NDR stream.
///
/// The writer borrows `self` for `'a` so pointer bodies queued with
/// [`NdrWriter::write_pointer`] can refer back into the value until the
/// deferred region is flushed.
pub trait NdrEncode {
    /// Write the inline representation. Embedded pointer bodies are queued
    /// on the writer and flushed by the caller's `write_deferred`.
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> Result<()>;

    /// Alignment of the inline representation
    fn ndr_align() -> usize
    where
        Self: Sized,
    {
        1
    }
}
