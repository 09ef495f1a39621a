//! ICatalogUtils (MS-COMA 3.1.4.16)
//!
//! Catalog helper interface on top of IUnknown: credential checks, write
//! barriers and event class lookup. Owns opnums 3 to 5.

mod client;
mod protocol;
mod server;

pub use client::*;
pub use protocol::*;
pub use server::*;
