//! VARIANT (MS-OAUT 2.2.29)
//!
//! A VARIANT parameter is a unique pointer to a `wireVARIANT`, so stubs hold
//! it as `Option<Variant>`. The structure itself:
//! ```text
//! clSize:      u32   # encoded size in 8-byte units
//! rpcReserved: u32
//! vt:          u16
//! wReserved1..3: u16
//! discriminant: u32  # = vt
//! arm
//! ```
//! The structure is 8-aligned. Pointer-valued arms (BSTR, interface
//! pointers, arrays) defer their bodies behind the structure.

use midl_ndr::{NdrContext, NdrDecode, NdrEncode, NdrError, NdrReader, NdrWriter};

use super::{Bstr, SafeArray};
use crate::types::InterfacePointer;

/// VARENUM values handled on the wire
pub mod vt {
    pub const EMPTY: u16 = 0x0000;
    pub const NULL: u16 = 0x0001;
    pub const I2: u16 = 0x0002;
    pub const I4: u16 = 0x0003;
    pub const R4: u16 = 0x0004;
    pub const R8: u16 = 0x0005;
    pub const CY: u16 = 0x0006;
    pub const DATE: u16 = 0x0007;
    pub const BSTR: u16 = 0x0008;
    pub const DISPATCH: u16 = 0x0009;
    pub const ERROR: u16 = 0x000A;
    pub const BOOL: u16 = 0x000B;
    pub const UNKNOWN: u16 = 0x000D;
    pub const I1: u16 = 0x0010;
    pub const UI1: u16 = 0x0011;
    pub const UI2: u16 = 0x0012;
    pub const UI4: u16 = 0x0013;
    pub const I8: u16 = 0x0014;
    pub const UI8: u16 = 0x0015;
    pub const INT: u16 = 0x0016;
    pub const UINT: u16 = 0x0017;
    pub const ARRAY: u16 = 0x2000;
    pub const BYREF: u16 = 0x4000;
}

/// VARIANT_BOOL true
pub const VARIANT_TRUE: i16 = -1;
/// VARIANT_BOOL false
pub const VARIANT_FALSE: i16 = 0;

/// Tagged automation value.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Variant {
    #[default]
    Empty,
    Null,
    I1(i8),
    I2(i16),
    I4(i32),
    I8(i64),
    Ui1(u8),
    Ui2(u16),
    Ui4(u32),
    Ui8(u64),
    Int(i32),
    Uint(u32),
    R4(f32),
    R8(f64),
    /// Currency, scaled by 10 000
    Currency(i64),
    /// OLE automation date
    Date(f64),
    Bstr(Option<Bstr>),
    /// SCODE
    Error(i32),
    /// VARIANT_BOOL
    Bool(bool),
    Dispatch(Option<InterfacePointer>),
    Unknown(Option<InterfacePointer>),
    /// `VT_ARRAY | VT_UI1`
    ByteArray(Option<SafeArray>),
}

impl Variant {
    pub fn bstr(s: impl Into<String>) -> Self {
        Variant::Bstr(Some(Bstr::new(s)))
    }

    pub fn bytes(data: Vec<u8>) -> Self {
        Variant::ByteArray(Some(SafeArray::new(data)))
    }

    /// VARENUM tag of the value
    pub fn vt(&self) -> u16 {
        match self {
            Variant::Empty => vt::EMPTY,
            Variant::Null => vt::NULL,
            Variant::I1(_) => vt::I1,
            Variant::I2(_) => vt::I2,
            Variant::I4(_) => vt::I4,
            Variant::I8(_) => vt::I8,
            Variant::Ui1(_) => vt::UI1,
            Variant::Ui2(_) => vt::UI2,
            Variant::Ui4(_) => vt::UI4,
            Variant::Ui8(_) => vt::UI8,
            Variant::Int(_) => vt::INT,
            Variant::Uint(_) => vt::UINT,
            Variant::R4(_) => vt::R4,
            Variant::R8(_) => vt::R8,
            Variant::Currency(_) => vt::CY,
            Variant::Date(_) => vt::DATE,
            Variant::Bstr(_) => vt::BSTR,
            Variant::Error(_) => vt::ERROR,
            Variant::Bool(_) => vt::BOOL,
            Variant::Dispatch(_) => vt::DISPATCH,
            Variant::Unknown(_) => vt::UNKNOWN,
            Variant::ByteArray(_) => vt::ARRAY | vt::UI1,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Variant::Bstr(Some(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Variant::ByteArray(Some(array)) => Some(&array.data),
            _ => None,
        }
    }

    /// Integer arms widened to `i64`
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Variant::I1(v) => Some(v.into()),
            Variant::I2(v) => Some(v.into()),
            Variant::I4(v) | Variant::Int(v) => Some(v.into()),
            Variant::I8(v) => Some(v),
            Variant::Ui1(v) => Some(v.into()),
            Variant::Ui2(v) => Some(v.into()),
            Variant::Ui4(v) | Variant::Uint(v) => Some(v.into()),
            _ => None,
        }
    }

    /// Encoded size in 8-byte units, measured on a scratch stream.
    fn wire_size(&self, ctx: NdrContext) -> midl_ndr::Result<u32> {
        let mut scratch = NdrWriter::new(ctx);
        self.encode_with(&mut scratch, 0)?;
        scratch.write_deferred()?;
        let len = scratch.into_bytes()?.len();
        u32::try_from(len.div_ceil(8)).map_err(|_| NdrError::IntegerOverflow("wireVARIANT.clSize"))
    }

    fn encode_with<'a>(&'a self, w: &mut NdrWriter<'a>, cl_size: u32) -> midl_ndr::Result<()> {
        let tag = self.vt();
        w.write_align(8);
        w.write_data(cl_size);
        w.write_data(0u32);
        w.write_data(tag);
        w.write_data(0u16);
        w.write_data(0u16);
        w.write_data(0u16);
        w.write_data(u32::from(tag));
        match self {
            Variant::Empty | Variant::Null => {}
            Variant::I1(v) => w.write_data(*v),
            Variant::I2(v) => w.write_data(*v),
            Variant::I4(v) | Variant::Int(v) | Variant::Error(v) => w.write_data(*v),
            Variant::I8(v) | Variant::Currency(v) => w.write_data(*v),
            Variant::Ui1(v) => w.write_data(*v),
            Variant::Ui2(v) => w.write_data(*v),
            Variant::Ui4(v) | Variant::Uint(v) => w.write_data(*v),
            Variant::Ui8(v) => w.write_data(*v),
            Variant::R4(v) => w.write_data(*v),
            Variant::R8(v) | Variant::Date(v) => w.write_data(*v),
            Variant::Bool(v) => w.write_data(if *v { VARIANT_TRUE } else { VARIANT_FALSE }),
            Variant::Bstr(s) => w.write_unique(s.as_ref()),
            Variant::Dispatch(p) | Variant::Unknown(p) => w.write_unique(p.as_ref()),
            Variant::ByteArray(array) => w.write_unique(array.as_ref()),
        }
        Ok(())
    }
}

impl From<bool> for Variant {
    fn from(value: bool) -> Self {
        Variant::Bool(value)
    }
}

impl From<i32> for Variant {
    fn from(value: i32) -> Self {
        Variant::I4(value)
    }
}

impl From<&str> for Variant {
    fn from(value: &str) -> Self {
        Variant::bstr(value)
    }
}

impl NdrEncode for Variant {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        let cl_size = self.wire_size(w.context())?;
        self.encode_with(w, cl_size)
    }

    fn ndr_align() -> usize {
        8
    }
}

impl NdrDecode for Variant {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        r.read_align(8)?;
        let _cl_size: u32 = r.read_data()?;
        let _rpc_reserved: u32 = r.read_data()?;
        let tag: u16 = r.read_data()?;
        for _ in 0..3 {
            let _reserved: u16 = r.read_data()?;
        }
        let discriminant: u32 = r.read_data()?;
        if discriminant != u32::from(tag) {
            return Err(NdrError::InvalidDiscriminant {
                union: "wireVARIANT",
                discriminant,
            });
        }

        *self = match tag {
            vt::EMPTY => Variant::Empty,
            vt::NULL => Variant::Null,
            vt::I1 => Variant::I1(r.read_data()?),
            vt::I2 => Variant::I2(r.read_data()?),
            vt::I4 => Variant::I4(r.read_data()?),
            vt::I8 => Variant::I8(r.read_data()?),
            vt::UI1 => Variant::Ui1(r.read_data()?),
            vt::UI2 => Variant::Ui2(r.read_data()?),
            vt::UI4 => Variant::Ui4(r.read_data()?),
            vt::UI8 => Variant::Ui8(r.read_data()?),
            vt::INT => Variant::Int(r.read_data()?),
            vt::UINT => Variant::Uint(r.read_data()?),
            vt::R4 => Variant::R4(r.read_data()?),
            vt::R8 => Variant::R8(r.read_data()?),
            vt::CY => Variant::Currency(r.read_data()?),
            vt::DATE => Variant::Date(r.read_data()?),
            vt::ERROR => Variant::Error(r.read_data()?),
            vt::BOOL => Variant::Bool(r.read_data::<i16>()? != VARIANT_FALSE),
            vt::BSTR => Variant::Bstr(None),
            vt::DISPATCH => Variant::Dispatch(None),
            vt::UNKNOWN => Variant::Unknown(None),
            t if t == vt::ARRAY | vt::UI1 => Variant::ByteArray(None),
            other => return Err(NdrError::UnsupportedVariantType(other)),
        };

        match self {
            Variant::Bstr(slot) => r.read_unique(slot),
            Variant::Dispatch(slot) | Variant::Unknown(slot) => r.read_unique(slot),
            Variant::ByteArray(slot) => r.read_unique(slot),
            _ => Ok(()),
        }
    }
}
