//! NDR decoding trait

use crate::{NdrReader, Result};

/// Types that can be filled in place from an NDR stream.
///
/// Decoding is in place rather than by value: a unique pointer read inside
/// `ndr_decode` queues a body that writes into `self` when the reader's
/// deferred region is processed.
pub trait NdrDecode {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> Result<()>;
}
