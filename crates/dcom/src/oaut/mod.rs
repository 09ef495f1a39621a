//! OLE Automation wire types (MS-OAUT 2.2)
//!
//! BSTR, VARIANT, byte SAFEARRAYs and the IDispatch parameter structures.
//! Everything here is NDR-encoded through [`midl_ndr`]; ownership of strings
//! and arrays is plain Rust (`String`, `Vec`), never a COM allocator.

mod bstr;
mod dispparams;
mod safearray;
mod variant;

pub use bstr::Bstr;
pub use dispparams::{DispatchParams, ExcepInfo};
pub use safearray::SafeArray;
pub use variant::{vt, Variant, VARIANT_FALSE, VARIANT_TRUE};
