use std::net::TcpStream;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tungstenite::WebSocket;
use tungstenite::protocol::Message;

use crate::protocol::{ClientMsg, ScrollMsg};

use super::{ClientRegistry, WsActor};

/// Poll interval for the client reader thread
const READ_POLL_MS: u64 = 50;

impl WsActor {
    /// Register a handshaken, non-blocking client connection
    pub(super) fn add_client(&self, ws: WebSocket<TcpStream>) {
        let mut clients = self.clients.lock();
        let id = clients.insert(ws);
        crate::debug!("ws"; "+ client {} connected (total: {})", id, clients.len());
    }

    /// Background thread draining client messages (non-blocking poll).
    ///
    /// Per tick, for every client: read until the socket would block,
    /// remember only the most recent scroll position (scroll is advisory and
    /// may be coalesced), then relay scrolls to the other clients and prune
    /// disconnected sockets. Exits once `stop` is raised.
    pub(super) fn client_reader_loop(clients: &Arc<Mutex<ClientRegistry>>, stop: &AtomicBool) {
        while !stop.load(Ordering::Relaxed) {
            std::thread::sleep(std::time::Duration::from_millis(READ_POLL_MS));

            let mut clients_guard = clients.lock();
            let mut disconnected: Vec<usize> = Vec::new();
            let mut scrolls: FxHashMap<usize, ScrollMsg> = FxHashMap::default();

            for (&id, ws) in clients_guard.sessions.iter_mut() {
                loop {
                    match ws.read() {
                        Ok(Message::Text(text)) => {
                            Self::handle_client_text(id, &text, &mut scrolls);
                        }
                        Ok(Message::Close(_)) => {
                            disconnected.push(id);
                            break;
                        }
                        Ok(_) => {}
                        Err(tungstenite::Error::Io(ref e))
                            if e.kind() == std::io::ErrorKind::WouldBlock =>
                        {
                            // Drained this client for now
                            break;
                        }
                        Err(e) => {
                            crate::debug!("ws"; "- client {} disconnected: {}", id, e);
                            disconnected.push(id);
                            break;
                        }
                    }
                }
            }

            for id in &disconnected {
                clients_guard.sessions.remove(id);
            }

            // Relay the latest scroll position per sender to everyone else
            for (sender, scroll) in scrolls {
                let frame = ClientMsg::Scroll(scroll);
                clients_guard.broadcast_except(sender, &Message::Text(frame.to_json().into()));
            }
        }
    }

    /// Parse one incoming text frame from a client.
    ///
    /// Malformed payloads are logged and dropped; the connection stays open.
    fn handle_client_text(id: usize, text: &str, scrolls: &mut FxHashMap<usize, ScrollMsg>) {
        match ClientMsg::from_json(text) {
            Some(ClientMsg::Scroll(scroll)) => {
                // Last write wins within this tick
                scrolls.insert(id, scroll);
            }
            Some(ClientMsg::Connect | ClientMsg::Disconnect) => {
                crate::debug!("ws"; "client {} lifecycle note", id);
            }
            Some(ClientMsg::FsNotify(_)) => {
                // Change notifications flow server->client only
                crate::debug!("ws"; "ignoring FsNotify from client {}", id);
            }
            None => {
                crate::log!("ws"; "malformed message from client {}: {}", id, text);
            }
        }
    }
}
