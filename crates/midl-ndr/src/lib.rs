//! NDR (Network Data Representation) runtime library
//!
//! This crate provides the runtime support for generated DCE RPC / DCOM stubs,
//! implementing the NDR wire format as specified in DCE RPC and MS-RPCE.
//!
//! # NDR Wire Format
//!
//! NDR is the standard encoding for DCE RPC data. Key characteristics:
//! - Primitives align to their natural size (1, 2, 4, or 8 bytes)
//! - Unique pointers write a referent id inline and their body later, in the
//!   deferred region of the enclosing construct
//! - Conformant arrays carry their element count ahead of the elements
//! - Strings are conformant varying arrays with a NUL terminator
//!
//! # Usage
//!
//! A marshal pass owns one [`NdrWriter`]; an unmarshal pass owns one
//! [`NdrReader`]. Stubs write each top-level parameter and then call
//! `write_deferred` / `read_deferred` to flush the pointer bodies it queued.

mod arrays;
mod context;
mod decode;
mod encode;
mod error;
mod pointers;
mod primitives;
mod reader;
mod strings;
mod writer;

pub use arrays::{shared_conformance, wire_count};
pub use context::NdrContext;
pub use decode::NdrDecode;
pub use encode::NdrEncode;
pub use error::{NdrError, Result, MAX_NDR_ALLOCATION_SIZE, MAX_NDR_ARRAY_ELEMENTS};
pub use pointers::PointerKind;
pub use primitives::{Guid, NdrPrimitive};
pub use reader::{DeferredRead, NdrReader};
pub use writer::{DeferredWrite, NdrWriter};

/// Re-export bytes for convenience
pub use bytes::{Buf, BufMut, Bytes, BytesMut};
