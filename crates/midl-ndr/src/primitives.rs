//! NDR primitive type implementations
//!
//! NDR primitive types and their encodings:
//!
//! | MIDL Type     | Rust Type | Size | Alignment |
//! |---------------|-----------|------|-----------|
//! | boolean       | bool      | 1    | 1         |
//! | byte/char     | u8        | 1    | 1         |
//! | small         | i8        | 1    | 1         |
//! | short         | i16       | 2    | 2         |
//! | long/int      | i32       | 4    | 4         |
//! | hyper         | i64       | 8    | 8         |
//! | unsigned short| u16       | 2    | 2         |
//! | unsigned long | u32       | 4    | 4         |
//! | unsigned hyper| u64       | 8    | 8         |
//! | float         | f32       | 4    | 4         |
//! | double        | f64       | 8    | 8         |
//! | wchar_t       | u16       | 2    | 2         |
//! | GUID          | Guid      | 16   | 4         |

use std::fmt;
use std::str::FromStr;

use bytes::{Buf, BufMut};

use crate::{NdrContext, NdrDecode, NdrEncode, NdrError, NdrReader, NdrWriter, Result};

/// Fixed-width scalar that aligns to its own size.
pub trait NdrPrimitive: Copy + Default + Send + Sync + 'static {
    /// Encoded size in bytes; also the alignment.
    const SIZE: usize;

    fn put<B: BufMut>(self, buf: &mut B, ctx: &NdrContext);

    fn get<B: Buf>(buf: &mut B, ctx: &NdrContext) -> Self;
}

macro_rules! impl_ndr_primitive {
    ($($ty:ty, $size:expr, $put:ident, $get:ident;)*) => {
        $(
            impl NdrPrimitive for $ty {
                const SIZE: usize = $size;

                #[inline]
                fn put<B: BufMut>(self, buf: &mut B, ctx: &NdrContext) {
                    ctx.$put(buf, self);
                }

                #[inline]
                fn get<B: Buf>(buf: &mut B, ctx: &NdrContext) -> Self {
                    ctx.$get(buf)
                }
            }
        )*
    };
}

impl_ndr_primitive! {
    u8, 1, put_u8, get_u8;
    i8, 1, put_i8, get_i8;
    u16, 2, put_u16, get_u16;
    i16, 2, put_i16, get_i16;
    u32, 4, put_u32, get_u32;
    i32, 4, put_i32, get_i32;
    u64, 8, put_u64, get_u64;
    i64, 8, put_i64, get_i64;
    f32, 4, put_f32, get_f32;
    f64, 8, put_f64, get_f64;
}

/// NDR boolean - a single byte, any nonzero value reads as true
impl NdrPrimitive for bool {
    const SIZE: usize = 1;

    fn put<B: BufMut>(self, buf: &mut B, _ctx: &NdrContext) {
        buf.put_u8(u8::from(self));
    }

    fn get<B: Buf>(buf: &mut B, _ctx: &NdrContext) -> Self {
        buf.get_u8() != 0
    }
}

/// GUID in its wire layout: `Data1` u32, `Data2` u16, `Data3` u16, `Data4` 8 bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Guid {
    pub data1: u32,
    pub data2: u16,
    pub data3: u16,
    pub data4: [u8; 8],
}

impl Guid {
    /// Encoded size
    pub const SIZE: usize = 16;

    pub const NIL: Self = Self::from_fields(0, 0, 0, [0; 8]);

    pub const fn from_fields(data1: u32, data2: u16, data3: u16, data4: [u8; 8]) -> Self {
        Self { data1, data2, data3, data4 }
    }

    /// Random (version 4) GUID
    pub fn generate() -> Self {
        Self::from_uuid(&uuid::Uuid::new_v4())
    }

    pub fn is_nil(&self) -> bool {
        *self == Self::NIL
    }

    /// Parse `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx`, with or without braces.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let s = s
            .strip_prefix('{')
            .and_then(|inner| inner.strip_suffix('}'))
            .unwrap_or(s);
        // hyphenated form only
        if s.len() != 36 {
            return None;
        }
        let id = uuid::Uuid::try_parse(s).ok()?;
        Some(Self::from_uuid(&id))
    }

    fn from_uuid(id: &uuid::Uuid) -> Self {
        let (data1, data2, data3, data4) = id.as_fields();
        Self::from_fields(data1, data2, data3, *data4)
    }

    fn to_uuid(self) -> uuid::Uuid {
        uuid::Uuid::from_fields(self.data1, self.data2, self.data3, &self.data4)
    }

    pub(crate) fn write_to(&self, w: &mut NdrWriter<'_>) {
        w.write_align(4);
        w.write_data(self.data1);
        w.write_data(self.data2);
        w.write_data(self.data3);
        w.write_bytes(&self.data4);
    }

    pub(crate) fn read_from(r: &mut NdrReader<'_>) -> Result<Self> {
        r.read_align(4)?;
        let data1 = r.read_data()?;
        let data2 = r.read_data()?;
        let data3 = r.read_data()?;
        let mut data4 = [0u8; 8];
        data4.copy_from_slice(&r.read_bytes(8)?);
        Ok(Self { data1, data2, data3, data4 })
    }
}

impl NdrWriter<'_> {
    pub fn write_guid(&mut self, guid: &Guid) {
        guid.write_to(self);
    }
}

impl NdrReader<'_> {
    pub fn read_guid(&mut self) -> Result<Guid> {
        Guid::read_from(self)
    }
}

impl FromStr for Guid {
    type Err = NdrError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| NdrError::InvalidString(format!("malformed GUID {s:?}")))
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_uuid().hyphenated(), f)
    }
}

impl fmt::Debug for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{self}}}")
    }
}

impl NdrEncode for Guid {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> Result<()> {
        self.write_to(w);
        Ok(())
    }

    fn ndr_align() -> usize {
        4
    }
}

impl NdrDecode for Guid {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> Result<()> {
        *self = Self::read_from(r)?;
        Ok(())
    }
}
