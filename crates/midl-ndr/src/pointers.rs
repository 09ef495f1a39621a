//! NDR pointer types
//!
//! NDR has three pointer kinds:
//! - **Ref pointers** (`[ref]`): never null, no referent id, the body is
//!   written inline where the pointer appears
//! - **Unique pointers** (`[unique]`): may be null; a 4-byte referent id is
//!   written inline and the body goes to the deferred region
//! - **Full pointers** (`[ptr]`): like unique, plus aliasing. Aliases are not
//!   tracked here, so every full pointer gets its own referent id and body.
//!
//! Wire format of a unique/full pointer:
//! ```text
//! referent_id: u32  # 0 = null
//! ... rest of the enclosing construct ...
//! [body]            # deferred, only if referent_id != 0
//! ```

use crate::{NdrDecode, NdrEncode, NdrReader, NdrWriter, Result};

/// How a pointer is represented on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Ref,
    Unique,
    Full,
}

impl PointerKind {
    /// Whether the pointer writes a referent id and defers its body
    pub fn is_deferred(self) -> bool {
        !matches!(self, PointerKind::Ref)
    }
}

impl<'a> NdrWriter<'a> {
    /// Write a fresh referent id and queue `body` for the deferred region.
    pub fn write_pointer<F>(&mut self, body: F)
    where
        F: FnOnce(&mut NdrWriter<'a>) -> Result<()> + Send + 'a,
    {
        let id = self.next_referent_id();
        self.write_data(id);
        self.defer(Box::new(body));
    }

    pub fn write_null_pointer(&mut self) {
        self.write_data(0u32);
    }

    /// Unique pointer to an encodable value.
    pub fn write_unique<T>(&mut self, value: Option<&'a T>)
    where
        T: NdrEncode + Sync + ?Sized,
    {
        match value {
            Some(v) => self.write_pointer(move |w| v.ndr_encode(w)),
            None => self.write_null_pointer(),
        }
    }

    /// Pointer of the given kind. Ref pointers encode inline and must not be null.
    pub fn write_pointer_of<T>(&mut self, kind: PointerKind, value: Option<&'a T>) -> Result<()>
    where
        T: NdrEncode + Sync + ?Sized,
    {
        match (kind, value) {
            (PointerKind::Ref, Some(v)) => v.ndr_encode(self),
            (PointerKind::Ref, None) => Err(crate::NdrError::NullRefPointer),
            (_, value) => {
                self.write_unique(value);
                Ok(())
            }
        }
    }
}

impl<'a> NdrReader<'a> {
    /// Read a referent id. A null pointer resets `slot` to its default;
    /// otherwise `body` is queued and fills `slot` when the deferred region
    /// is read.
    pub fn read_pointer<T, F>(&mut self, slot: &'a mut T, body: F) -> Result<()>
    where
        T: Default + Send + 'a,
        F: FnOnce(&mut NdrReader<'a>, &'a mut T) -> Result<()> + Send + 'a,
    {
        let referent: u32 = self.read_data()?;
        if referent == 0 {
            *slot = T::default();
            return Ok(());
        }
        self.defer(Box::new(move |r| body(r, slot)));
        Ok(())
    }

    /// Unique pointer to a decodable value.
    pub fn read_unique<T>(&mut self, slot: &'a mut Option<T>) -> Result<()>
    where
        T: NdrDecode + Default + Send + 'a,
    {
        self.read_pointer(slot, |r, slot| slot.insert(T::default()).ndr_decode(r))
    }
}
