//! IDispatch (MS-OAUT 3.1.4)
//!
//! Late-bound automation interface; owns opnums 3 to 6 on top of IUnknown.

mod client;
mod protocol;
mod server;

pub use client::*;
pub use protocol::*;
pub use server::*;
