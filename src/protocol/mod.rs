//! Wire Protocol Definitions
//!
//! Tagged unions exchanged with browser clients (over WebSocket) and with the
//! supervised native core (over its stdout pipe). Every message is one JSON
//! object discriminated by a `kind` field; unknown tags are a recoverable
//! parse error, never a crash.
//!
//! # Module Structure
//!
//! - `client` - client transport messages (`ClientMsg`, `ServedFile`)
//! - `server` - subprocess stdout protocol (`ServerOutputMsg`)

mod client;
mod server;

pub use client::{ClientMsg, FsNotify, ScrollMsg, ServedFile};
pub use server::ServerOutputMsg;
