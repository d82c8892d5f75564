//! Change Pipeline Actor
//!
//! Receives individual change notifications from the supervised core, groups
//! them into quiet-window batches, classifies each batch, and forwards reload
//! decisions to the WsActor.
//!
//! Architecture:
//! ```text
//! change_rx → Debouncer (pure timing) → ReloadClassifier (pure decision) → WsMsg
//! ```

use std::sync::Arc;

use tokio::sync::mpsc;

use super::messages::WsMsg;
use crate::config::LiveConfig;
use crate::protocol::ServedFile;

// Pure decision logic (batch -> inject/reload).
mod classifier;
// Pure timing and batching.
mod debouncer;

#[cfg(test)]
mod tests;

pub use classifier::ReloadDecision;
use classifier::ReloadClassifier;
use debouncer::Debouncer;

/// Change pipeline actor - debounces and classifies file changes
pub struct FsActor {
    /// Channel of individual change notifications (one per file event)
    change_rx: mpsc::Receiver<ServedFile>,
    /// Channel to send decisions to the WsActor
    ws_tx: mpsc::Sender<WsMsg>,
    /// Debouncer state; owned by this task, so reset-and-rearm is race-free
    debouncer: Debouncer,
    /// Coordinator configuration (quiet window, injectable suffixes)
    config: Arc<LiveConfig>,
}

impl FsActor {
    pub fn new(
        change_rx: mpsc::Receiver<ServedFile>,
        ws_tx: mpsc::Sender<WsMsg>,
        config: Arc<LiveConfig>,
    ) -> Self {
        let debouncer = Debouncer::new(config.watch.quiet_window());
        Self {
            change_rx,
            ws_tx,
            debouncer,
            config,
        }
    }

    /// Run the actor event loop.
    ///
    /// Exits when the change channel closes; a pending quiet window is
    /// cancelled at that point without emitting a partial batch.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                biased;
                maybe_item = self.change_rx.recv() => match maybe_item {
                    Some(item) => {
                        crate::debug!("watch"; "change: {}", item.web_path.display());
                        self.debouncer.add_event(item);
                    }
                    None => {
                        crate::debug!("watch"; "change source closed, dropping pending window");
                        break;
                    }
                },
                _ = tokio::time::sleep(self.debouncer.sleep_duration()) => {
                    if self.flush().await.is_err() {
                        break;
                    }
                }
            }
        }
    }

    /// Close the current batch if the quiet window has elapsed, classify it,
    /// and forward the decision.
    ///
    /// Returns `Err(())` if the WsActor shut down.
    async fn flush(&mut self) -> Result<(), ()> {
        let Some(batch) = self.debouncer.take_if_ready() else {
            return Ok(());
        };

        let Some((decision, items)) =
            ReloadClassifier::classify(batch, &self.config.reload.inject)
        else {
            crate::debug!("watch"; "batch held only source maps, no decision");
            return Ok(());
        };

        match decision {
            ReloadDecision::Inject => {
                // Injectable batches stay off the wire
                crate::debug!("reload"; "{} injectable change(s), no reload", items.len());
            }
            ReloadDecision::Reload => {
                crate::log!("reload"; "{} change(s), reloading clients", items.len());
                self.ws_tx
                    .send(WsMsg::Notify { items })
                    .await
                    .map_err(|_| ())?;
            }
        }

        Ok(())
    }
}
