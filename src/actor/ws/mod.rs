//! WebSocket Actor - Client Transport
//!
//! This actor is responsible for:
//! - Managing WebSocket client connections
//! - Broadcasting reload triggers to all connected clients
//! - Relaying scroll positions between clients
//!
//! # Architecture
//!
//! ```text
//! FsActor --[Notify]--> WsActor --[FsNotify]--> clients
//!                          ^                       |
//!                          +-------[Scroll]--------+
//! ```
//!
//! Delivery is at-most-once: decisions computed while a client is disconnected
//! are neither queued nor replayed.

mod client_io;
mod delivery;
mod listener;


use std::net::TcpStream;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tokio::sync::mpsc;
use tungstenite::WebSocket;
use tungstenite::protocol::Message;

use super::messages::WsMsg;
use crate::protocol::{ClientMsg, FsNotify};

pub use listener::start_ws_listener;

/// Connected clients keyed by connection id.
///
/// Mutated only by connect/disconnect, iterated during broadcast. Each send is
/// isolated: a failing client is dropped without stalling delivery to others.
struct ClientRegistry {
    sessions: FxHashMap<usize, WebSocket<TcpStream>>,
    next_id: usize,
}

impl ClientRegistry {
    fn new() -> Self {
        Self {
            sessions: FxHashMap::default(),
            next_id: 0,
        }
    }

    fn insert(&mut self, ws: WebSocket<TcpStream>) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        self.sessions.insert(id, ws);
        id
    }

    fn len(&self) -> usize {
        self.sessions.len()
    }
}

/// WebSocket Actor - manages client connections and broadcasts
pub struct WsActor {
    /// Channel to receive messages
    rx: mpsc::Receiver<WsMsg>,
    /// Connected clients (shared with the reader thread)
    clients: Arc<Mutex<ClientRegistry>>,
    /// Raised on shutdown so the reader thread winds down
    reader_stop: Arc<AtomicBool>,
}

impl WsActor {
    pub fn new(rx: mpsc::Receiver<WsMsg>) -> Self {
        Self {
            rx,
            clients: Arc::new(Mutex::new(ClientRegistry::new())),
            reader_stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        // Background thread polls client sockets for incoming messages
        let clients_for_reader = Arc::clone(&self.clients);
        let stop = Arc::clone(&self.reader_stop);
        std::thread::spawn(move || {
            Self::client_reader_loop(&clients_for_reader, &stop);
        });

        while let Some(msg) = self.rx.recv().await {
            match msg {
                WsMsg::Notify { items } => {
                    crate::debug!("ws"; "reload trigger: {} file(s)", items.len());
                    // One lock for the whole batch keeps its frames contiguous
                    let mut clients = self.clients.lock();
                    for item in items {
                        let frame = ClientMsg::FsNotify(FsNotify::new(item));
                        clients.broadcast(&Message::Text(frame.to_json().into()));
                    }
                }

                WsMsg::AddClient(ws) => {
                    self.add_client(ws);
                }

                WsMsg::Shutdown => {
                    crate::debug!("ws"; "shutting down");
                    let mut clients = self.clients.lock();
                    for (_, mut ws) in clients.sessions.drain() {
                        let _ = ws.close(None);
                    }
                    break;
                }
            }
        }

        // Covers both Shutdown and a closed channel
        self.reader_stop.store(true, Ordering::Relaxed);
    }
}
