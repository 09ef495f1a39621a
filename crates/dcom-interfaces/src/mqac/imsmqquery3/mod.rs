//! IMSMQQuery3 (MS-MQMQ automation)
//!
//! Queue lookup by property filters. Derives from IDispatch and owns
//! opnums 7 to 9.

mod client;
mod protocol;
mod server;

pub use client::*;
pub use protocol::*;
pub use server::*;
