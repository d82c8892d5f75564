use tungstenite::protocol::Message;

use super::ClientRegistry;

impl ClientRegistry {
    /// Broadcast a message to all connected clients.
    pub(super) fn broadcast(&mut self, msg: &Message) -> usize {
        self.send_filtered(None, msg)
    }

    /// Broadcast to all clients except one (used for scroll relay).
    pub(super) fn broadcast_except(&mut self, skip: usize, msg: &Message) -> usize {
        self.send_filtered(Some(skip), msg)
    }

    /// Isolated fan-out: every client gets its own send attempt; a failing
    /// client is pruned and never stalls delivery to the rest.
    fn send_filtered(&mut self, skip: Option<usize>, msg: &Message) -> usize {
        if self.sessions.is_empty() {
            crate::debug!("ws"; "no clients connected");
            return 0;
        }

        let mut sent = 0;
        let mut dropped: Vec<usize> = Vec::new();

        for (&id, ws) in self.sessions.iter_mut() {
            if skip == Some(id) {
                continue;
            }
            match ws.send(msg.clone()) {
                Ok(()) => sent += 1,
                Err(tungstenite::Error::Io(ref e))
                    if e.kind() == std::io::ErrorKind::WouldBlock =>
                {
                    // Frame is queued; it flushes on the next poll
                    sent += 1;
                }
                Err(e) => {
                    crate::debug!("ws"; "- client {} dropped: {}", id, e);
                    dropped.push(id);
                }
            }
        }

        for id in dropped {
            self.sessions.remove(&id);
        }

        crate::debug!("ws"; "broadcast to {} clients", sent);
        sent
    }
}
