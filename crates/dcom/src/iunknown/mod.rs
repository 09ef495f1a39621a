//! IUnknown (MS-DCOM 3.1.1.5.8)
//!
//! Base interface of every DCOM interface, owning opnums 0 to 2:
//! - QueryInterface - ask the object for another interface
//! - AddRef / Release - reference counting

mod client;
mod protocol;
mod server;

pub use client::*;
pub use protocol::*;
pub use server::*;
