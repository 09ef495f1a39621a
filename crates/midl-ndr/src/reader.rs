//! Stub data reader
//!
//! Mirror of [`NdrWriter`](crate::NdrWriter). The reader lifetime `'a` is the
//! lifetime of the value being decoded: queued pointer bodies hold `&'a mut`
//! slots into it and fill them when [`NdrReader::read_deferred`] runs.

use std::collections::VecDeque;
use std::fmt;

use bytes::Bytes;

use crate::{NdrContext, NdrDecode, NdrError, NdrPrimitive, Result};

/// A pointer body waiting for the deferred region.
pub type DeferredRead<'a> = Box<dyn FnOnce(&mut NdrReader<'a>) -> Result<()> + Send + 'a>;

pub struct NdrReader<'a> {
    data: Bytes,
    pos: usize,
    ctx: NdrContext,
    deferred: VecDeque<DeferredRead<'a>>,
}

impl<'a> NdrReader<'a> {
    pub fn new(data: Bytes, ctx: NdrContext) -> Self {
        Self {
            data,
            pos: 0,
            ctx,
            deferred: VecDeque::new(),
        }
    }

    pub fn context(&self) -> NdrContext {
        self.ctx
    }

    /// Byte offset from the start of the stub data
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn pending(&self) -> usize {
        self.deferred.len()
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        if self.remaining() < needed {
            return Err(NdrError::BufferUnderflow {
                needed,
                have: self.remaining(),
            });
        }
        Ok(())
    }

    /// Skip padding up to `alignment`.
    pub fn read_align(&mut self, alignment: usize) -> Result<()> {
        let padding = NdrContext::align_padding(self.pos, alignment);
        self.ensure(padding)?;
        self.pos += padding;
        Ok(())
    }

    /// Read a scalar at its natural alignment.
    pub fn read_data<T: NdrPrimitive>(&mut self) -> Result<T> {
        let padding = NdrContext::align_padding(self.pos, T::SIZE);
        self.ensure(padding + T::SIZE)?;
        self.pos += padding;
        let mut chunk = &self.data[self.pos..self.pos + T::SIZE];
        let value = T::get(&mut chunk, &self.ctx);
        self.pos += T::SIZE;
        Ok(value)
    }

    /// Raw bytes with no alignment.
    pub fn read_bytes(&mut self, len: usize) -> Result<Bytes> {
        self.ensure(len)?;
        let out = self.data.slice(self.pos..self.pos + len);
        self.pos += len;
        Ok(out)
    }

    pub fn read_into<T: NdrDecode + ?Sized>(&mut self, slot: &'a mut T) -> Result<()> {
        slot.ndr_decode(self)
    }

    pub(crate) fn defer(&mut self, body: DeferredRead<'a>) {
        self.deferred.push_back(body);
    }

    /// Run queued pointer bodies in the order their pointers were read,
    /// each followed by the bodies it queued in turn.
    pub fn read_deferred(&mut self) -> Result<()> {
        if !self.deferred.is_empty() {
            tracing::trace!(pending = self.deferred.len(), position = self.pos, "flushing deferred bodies");
        }
        while let Some(body) = self.deferred.pop_front() {
            let outer = std::mem::take(&mut self.deferred);
            body(self)?;
            self.read_deferred()?;
            self.deferred = outer;
        }
        Ok(())
    }

    /// End the pass. Trailing bytes are left unread.
    pub fn finish(self) -> Result<()> {
        if !self.deferred.is_empty() {
            return Err(NdrError::PendingDeferred(self.deferred.len()));
        }
        if self.remaining() > 0 {
            tracing::trace!(trailing = self.remaining(), "NDR stub data has trailing bytes");
        }
        Ok(())
    }
}

impl fmt::Debug for NdrReader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NdrReader")
            .field("position", &self.pos)
            .field("remaining", &self.remaining())
            .field("pending", &self.deferred.len())
            .finish()
    }
}
