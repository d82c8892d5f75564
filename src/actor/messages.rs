//! Actor Message Definitions
//!
//! ```text
//! Supervisor --Changed--> FsActor --Notify--> WsActor --FsNotify--> clients
//! ```

use std::net::TcpStream;

use tungstenite::WebSocket;

use crate::protocol::ServedFile;

/// Messages to the WebSocket Actor
pub enum WsMsg {
    /// Reload decision: push one `FsNotify` per item to every client.
    /// An `Inject` decision never produces this message; injectable batches
    /// are silent on the wire.
    Notify { items: Vec<ServedFile> },
    /// Freshly handshaken connection from the listener
    AddClient(WebSocket<TcpStream>),
    /// Close all client connections and stop
    Shutdown,
}
