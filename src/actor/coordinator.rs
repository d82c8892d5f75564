//! Actor Coordinator - Wires up the Live Reload Actor System
//!
//! # Responsibility
//!
//! The Coordinator is a **thin orchestrator** that:
//! - Creates communication channels
//! - Wires up the supervisor and actors
//! - Runs them concurrently until shutdown
//!
//! It does NOT contain reload logic - that lives in `actor/fs/`.
//!
//! # Architecture
//!
//! ```text
//! Supervisor --[Changed]--> FsActor --[Notify]--> WsActor --> clients
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossbeam::channel::Receiver;
use tokio::sync::{mpsc, watch};

use super::fs::FsActor;
use super::messages::WsMsg;
use super::ws::{WsActor, start_ws_listener};
use crate::config::LiveConfig;
use crate::protocol::ServedFile;
use crate::supervisor::{Supervisor, SupervisorEvent};

/// Channel buffer size
const CHANNEL_BUFFER: usize = 32;

/// Coordinator - wires up and runs the actor system
pub struct Coordinator {
    config: Arc<LiveConfig>,
    /// Command line of the core process to supervise; empty means none
    core_command: Vec<String>,
    /// Optional shutdown signal receiver
    shutdown_rx: Option<Receiver<()>>,
}

impl Coordinator {
    /// Create from Arc<LiveConfig>
    pub fn with_config(config: Arc<LiveConfig>) -> Self {
        Self {
            config,
            core_command: Vec::new(),
            shutdown_rx: None,
        }
    }

    /// Set the core command to supervise
    pub fn with_core_command(mut self, command: Vec<String>) -> Self {
        self.core_command = command;
        self
    }

    /// Set shutdown signal receiver
    pub fn with_shutdown_signal(mut self, rx: Receiver<()>) -> Self {
        self.shutdown_rx = Some(rx);
        self
    }

    /// Run the actor system
    pub async fn run(mut self) -> Result<()> {
        // Create channels
        let (change_tx, change_rx) = mpsc::channel::<ServedFile>(CHANNEL_BUFFER);
        let (ws_tx, ws_rx) = mpsc::channel::<WsMsg>(CHANNEL_BUFFER);

        // Start WebSocket listener
        let ws_port = start_ws_listener(self.config.serve.ws_port, ws_tx.clone())?;
        crate::log!("serve"; "reload socket on ws://127.0.0.1:{}", ws_port);

        // Create actors
        let fs_actor = FsActor::new(change_rx, ws_tx.clone(), self.config.clone());
        let ws_actor = WsActor::new(ws_rx);

        // Spawn the supervised core, if a command was given
        let (proc_shutdown_tx, proc_shutdown_rx) = watch::channel(false);
        let supervisor_handle = if self.core_command.is_empty() {
            crate::debug!("proc"; "no core command, transport only");
            None
        } else {
            let mut command = self.core_command.clone();
            if let Some(bind) = &self.config.serve.bind {
                command.push("--bind".into());
                command.push(bind.clone());
            }

            let (events_tx, events_rx) = mpsc::unbounded_channel();
            let supervisor = Supervisor::new(command, events_tx, proc_shutdown_rx);
            tokio::spawn(route_supervisor_events(events_rx, change_tx.clone()));
            Some(tokio::spawn(supervisor.run()))
        };

        // Run actors until shutdown signal
        crate::debug!("actor"; "start");
        let mut fs_handle = tokio::spawn(fs_actor.run());
        let mut ws_handle = tokio::spawn(ws_actor.run());

        // Wait for shutdown signal (poll-based since std::sync::mpsc)
        let mut fs_done = false;
        let mut ws_done = false;
        let shutdown_rx = self.shutdown_rx.take();
        if let Some(rx) = shutdown_rx {
            loop {
                // Check for shutdown signal
                if rx.try_recv().is_ok() {
                    crate::debug!("actor"; "shutdown signal received");
                    break;
                }
                // Once the supervised core is gone there is nothing left to watch
                if let Some(handle) = &supervisor_handle
                    && handle.is_finished()
                {
                    crate::debug!("actor"; "core finished, shutting down");
                    break;
                }
                // Small sleep to avoid busy-waiting
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        } else {
            // No shutdown signal, just wait for any actor to complete.
            // A consumed handle must not be joined again below.
            tokio::select! {
                _ = &mut fs_handle => fs_done = true,
                _ = &mut ws_handle => ws_done = true,
            }
        }

        // Teardown order: kill the core, then drain the pipeline front to back
        let _ = proc_shutdown_tx.send(true);
        drop(change_tx);
        let _ = ws_tx.send(WsMsg::Shutdown).await;

        if let Some(handle) = supervisor_handle {
            let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
        }
        if !fs_done {
            let _ = tokio::time::timeout(Duration::from_millis(500), fs_handle).await;
        }
        if !ws_done {
            let _ = tokio::time::timeout(Duration::from_millis(500), ws_handle).await;
        }

        crate::debug!("actor"; "stopped");
        Ok(())
    }
}

/// Forward supervisor events into the change pipeline
async fn route_supervisor_events(
    mut events_rx: mpsc::UnboundedReceiver<SupervisorEvent>,
    change_tx: mpsc::Sender<ServedFile>,
) {
    while let Some(event) = events_rx.recv().await {
        match event {
            SupervisorEvent::Listening { bind_address } => {
                crate::log!("serve"; "core listening on {}", bind_address);
            }
            SupervisorEvent::Changed(item) => {
                if change_tx.send(item).await.is_err() {
                    break;
                }
            }
            SupervisorEvent::Exited { code } => match code {
                Some(0) => crate::log!("proc"; "core exited"),
                Some(code) => crate::log!("error"; "core exited with code {}", code),
                None => crate::log!("proc"; "core stopped"),
            },
        }
    }
}
