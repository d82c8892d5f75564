//! Actor System for the Live-Reload Coordinator
//!
//! Message-passing concurrency for the change pipeline:
//!
//! ```text
//! Supervisor --> FsActor --> WsActor
//!  (stdout)    (debounce +   (broadcast)
//!               classify)
//! ```
//!
//! # Module Structure
//!
//! - `messages` - Message types for inter-actor communication
//! - `fs` - Change-event debouncing and reload classification
//! - `ws` - WebSocket client registry and broadcast
//! - `coordinator` - Wires up and runs actors

pub mod coordinator;
pub mod fs;
pub mod messages;
pub mod ws;

pub use coordinator::Coordinator;
