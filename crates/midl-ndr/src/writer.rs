//! Stub data writer
//!
//! [`NdrWriter`] owns the output buffer for one marshal pass. Alignment is
//! computed from the buffer length, so a writer must start at the first byte
//! of the stub data.

use std::collections::VecDeque;
use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::{NdrContext, NdrEncode, NdrError, NdrPrimitive, Result};

/// A pointer body waiting for the deferred region.
pub type DeferredWrite<'a> = Box<dyn FnOnce(&mut NdrWriter<'a>) -> Result<()> + Send + 'a>;

/// First referent id handed out; MIDL-generated stubs use the same base.
const REFERENT_ID_BASE: u32 = 0x0002_0000;

pub struct NdrWriter<'a> {
    buf: BytesMut,
    ctx: NdrContext,
    deferred: VecDeque<DeferredWrite<'a>>,
    next_referent: u32,
}

impl<'a> NdrWriter<'a> {
    pub fn new(ctx: NdrContext) -> Self {
        Self::with_capacity(ctx, 256)
    }

    pub fn with_capacity(ctx: NdrContext, capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
            ctx,
            deferred: VecDeque::new(),
            next_referent: REFERENT_ID_BASE,
        }
    }

    pub fn context(&self) -> NdrContext {
        self.ctx
    }

    /// Byte offset from the start of the stub data
    pub fn position(&self) -> usize {
        self.buf.len()
    }

    /// Number of pointer bodies queued at the current nesting level
    pub fn pending(&self) -> usize {
        self.deferred.len()
    }

    /// Pad with zero bytes up to `alignment`.
    pub fn write_align(&mut self, alignment: usize) {
        let padding = NdrContext::align_padding(self.buf.len(), alignment);
        self.buf.put_bytes(0, padding);
    }

    /// Write a scalar at its natural alignment.
    pub fn write_data<T: NdrPrimitive>(&mut self, value: T) {
        self.write_align(T::SIZE);
        value.put(&mut self.buf, &self.ctx);
    }

    /// Raw bytes with no alignment.
    pub fn write_bytes(&mut self, data: &[u8]) {
        self.buf.put_slice(data);
    }

    pub fn write<T: NdrEncode + ?Sized>(&mut self, value: &'a T) -> Result<()> {
        value.ndr_encode(self)
    }

    pub(crate) fn next_referent_id(&mut self) -> u32 {
        let id = self.next_referent;
        self.next_referent = self.next_referent.wrapping_add(4).max(REFERENT_ID_BASE);
        id
    }

    pub(crate) fn defer(&mut self, body: DeferredWrite<'a>) {
        self.deferred.push_back(body);
    }

    /// Flush queued pointer bodies in the order they were queued.
    ///
    /// Pointers met while writing a body are flushed immediately after that
    /// body, before the next body from the outer queue.
    pub fn write_deferred(&mut self) -> Result<()> {
        if !self.deferred.is_empty() {
            tracing::trace!(pending = self.deferred.len(), position = self.buf.len(), "flushing deferred bodies");
        }
        while let Some(body) = self.deferred.pop_front() {
            let outer = std::mem::take(&mut self.deferred);
            body(self)?;
            self.write_deferred()?;
            self.deferred = outer;
        }
        Ok(())
    }

    /// Finish the pass and hand out the stub data.
    pub fn into_bytes(self) -> Result<Bytes> {
        if !self.deferred.is_empty() {
            return Err(NdrError::PendingDeferred(self.deferred.len()));
        }
        tracing::trace!(len = self.buf.len(), "NDR stub data complete");
        Ok(self.buf.freeze())
    }
}

impl fmt::Debug for NdrWriter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NdrWriter")
            .field("position", &self.buf.len())
            .field("little_endian", &self.ctx.little_endian)
            .field("pending", &self.deferred.len())
            .finish()
    }
}
