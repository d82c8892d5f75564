//! WebSocket listener for browser clients.
//!
//! Each accepted connection gets its own handshake thread; only fully
//! handshaken sockets reach the WsActor, so a peer that never sends the HTTP
//! upgrade cannot stall the actor or other clients.

use std::net::{TcpListener, TcpStream};
use std::time::Duration;

use anyhow::Result;

use crate::actor::messages::WsMsg;

/// Maximum port retry attempts
const MAX_PORT_RETRIES: u16 = 10;

/// A peer that sends nothing for this long never becomes a client
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Start the WebSocket listener, feeding handshaken connections to the
/// WsActor.
///
/// Returns the port actually bound; if `base_port` is taken, nearby ports are
/// tried before giving up.
pub fn start_ws_listener(base_port: u16, ws_tx: tokio::sync::mpsc::Sender<WsMsg>) -> Result<u16> {
    let (listener, actual_port) = try_bind_port(base_port, MAX_PORT_RETRIES)?;
    listener.set_nonblocking(true)?;

    // Spawn acceptor thread
    std::thread::spawn(move || {
        loop {
            match listener.accept() {
                Ok((stream, addr)) => {
                    crate::debug!("ws"; "incoming connection: {}", addr);
                    handshake_off_thread(stream, ws_tx.clone());
                }
                Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    if ws_tx.is_closed() {
                        crate::debug!("ws"; "actor gone, stopping listener");
                        break;
                    }
                    std::thread::sleep(Duration::from_millis(100));
                }
                Err(e) => {
                    crate::log!("ws"; "accept error: {}", e);
                    std::thread::sleep(Duration::from_millis(100));
                }
            }
        }
    });

    Ok(actual_port)
}

/// Run the blocking WebSocket handshake on its own thread, then hand the
/// finished connection to the actor.
fn handshake_off_thread(stream: TcpStream, ws_tx: tokio::sync::mpsc::Sender<WsMsg>) {
    std::thread::spawn(move || {
        // Blocking with a deadline during the handshake
        let _ = stream.set_nonblocking(false);
        let _ = stream.set_read_timeout(Some(HANDSHAKE_TIMEOUT));

        match tungstenite::accept(stream) {
            Ok(ws) => {
                // Registered clients are polled, never blocked on
                let _ = ws.get_ref().set_nonblocking(true);
                if ws_tx.blocking_send(WsMsg::AddClient(ws)).is_err() {
                    crate::debug!("ws"; "actor gone, dropping connection");
                }
            }
            Err(e) => {
                crate::log!("ws"; "handshake failed: {}", e);
            }
        }
    });
}

/// Try binding to port, retry with incremented port if in use
fn try_bind_port(base_port: u16, max_retries: u16) -> Result<(TcpListener, u16)> {
    let mut last_error = None;

    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        match TcpListener::bind(format!("127.0.0.1:{}", port)) {
            Ok(listener) => {
                let actual_port = listener.local_addr()?.port();
                return Ok((listener, actual_port));
            }
            Err(e) => {
                last_error = Some(e);
                continue;
            }
        }
    }

    Err(anyhow::anyhow!(
        "failed to bind WebSocket listener after {} attempts: {}",
        max_retries,
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}
