//! Process supervisor for the served core.
//!
//! Spawns the user-provided command as a child process and owns its whole
//! lifecycle: structured status messages are parsed off stdout line by line,
//! anything else the child prints is passed through, and stderr is mirrored
//! verbatim. On shutdown the child is killed and reaped, never orphaned.

use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::{mpsc, watch};

use crate::protocol::{ServedFile, ServerOutputMsg};
use crate::{debug, log};

/// Events surfaced by the supervisor to the coordinator.
#[derive(Debug)]
pub enum SupervisorEvent {
    /// The core reported the address it serves on
    Listening { bind_address: String },
    /// The core reported a served file changed on disk
    Changed(ServedFile),
    /// The core process exited; `None` means killed by signal
    Exited { code: Option<i32> },
}

/// Supervises one core process from spawn to exit.
pub struct Supervisor {
    command: Vec<String>,
    events_tx: mpsc::UnboundedSender<SupervisorEvent>,
    shutdown_rx: watch::Receiver<bool>,
}

impl Supervisor {
    pub fn new(
        command: Vec<String>,
        events_tx: mpsc::UnboundedSender<SupervisorEvent>,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            command,
            events_tx,
            shutdown_rx,
        }
    }

    /// Spawn the core process and pump its output until exit or shutdown.
    pub async fn run(mut self) -> Result<()> {
        let (program, args) = self
            .command
            .split_first()
            .context("empty core command")?;

        debug!("proc"; "spawning core: {}", self.command.join(" "));

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn core command '{}'", program))?;

        let stdout = child
            .stdout
            .take()
            .context("core process has no stdout")?;
        let stderr = child
            .stderr
            .take()
            .context("core process has no stderr")?;

        // Mirror stderr verbatim; it carries the core's own diagnostics
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                log!("proc"; "{}", line);
            }
        });

        let mut lines = BufReader::new(stdout).lines();
        loop {
            tokio::select! {
                maybe_line = lines.next_line() => match maybe_line {
                    Ok(Some(line)) => self.handle_line(&line),
                    Ok(None) => break,
                    Err(e) => {
                        log!("error"; "core stdout read failed: {}", e);
                        break;
                    }
                },
                changed = self.shutdown_rx.changed() => {
                    if changed.is_err() || *self.shutdown_rx.borrow() {
                        debug!("proc"; "stopping core process");
                        let _ = child.start_kill();
                        break;
                    }
                }
            }
        }

        let status = child.wait().await.context("failed to reap core process")?;
        let code = status.code();
        match code {
            Some(code) => debug!("proc"; "core exited with code {}", code),
            None => debug!("proc"; "core terminated by signal"),
        }
        let _ = self.events_tx.send(SupervisorEvent::Exited { code });

        Ok(())
    }

    /// Route one stdout line: structured status messages become events,
    /// anything else is the core's regular output and passes through.
    fn handle_line(&self, line: &str) {
        match ServerOutputMsg::parse_line(line) {
            Some(ServerOutputMsg::Listening { bind_address }) => {
                let _ = self
                    .events_tx
                    .send(SupervisorEvent::Listening { bind_address });
            }
            Some(ServerOutputMsg::FsNotify { item }) => {
                let _ = self.events_tx.send(SupervisorEvent::Changed(item));
            }
            None => {
                if !line.trim().is_empty() {
                    log!("proc"; "{}", line);
                }
            }
        }
    }
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["sh".into(), "-c".into(), script.into()]
    }

    async fn next_event(rx: &mut mpsc::UnboundedReceiver<SupervisorEvent>) -> SupervisorEvent {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for supervisor event")
            .expect("event channel closed")
    }

    #[tokio::test]
    async fn test_listening_message_surfaced() {
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        let sup = Supervisor::new(
            sh(r#"echo '{"kind":"Listening","payload":{"bind_address":"127.0.0.1:8090"}}'"#),
            events_tx,
            shutdown_rx,
        );
        tokio::spawn(sup.run());

        match next_event(&mut events_rx).await {
            SupervisorEvent::Listening { bind_address } => {
                assert_eq!(bind_address, "127.0.0.1:8090");
            }
            other => panic!("expected Listening, got {other:?}"),
        }
        assert!(matches!(
            next_event(&mut events_rx).await,
            SupervisorEvent::Exited { code: Some(0) }
        ));
    }

    #[tokio::test]
    async fn test_non_json_lines_tolerated() {
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        let script = concat!(
            "echo 'starting up...'; ",
            r#"echo '{"kind":"FsNotify","payload":{"item":{"path":"/srv/a.css","web_path":"/a.css"}}}'"#,
        );
        let sup = Supervisor::new(sh(script), events_tx, shutdown_rx);
        tokio::spawn(sup.run());

        match next_event(&mut events_rx).await {
            SupervisorEvent::Changed(item) => {
                assert_eq!(item.web_path.to_string_lossy(), "/a.css");
            }
            other => panic!("expected Changed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_exit_code_captured() {
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        let sup = Supervisor::new(sh("exit 3"), events_tx, shutdown_rx);
        tokio::spawn(sup.run());

        assert!(matches!(
            next_event(&mut events_rx).await,
            SupervisorEvent::Exited { code: Some(3) }
        ));
    }

    #[tokio::test]
    async fn test_shutdown_kills_child() {
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let sup = Supervisor::new(sh("sleep 30"), events_tx, shutdown_rx);
        let handle = tokio::spawn(sup.run());

        tokio::time::sleep(Duration::from_millis(100)).await;
        shutdown_tx.send(true).unwrap();

        // Killed by signal, so no exit code
        assert!(matches!(
            next_event(&mut events_rx).await,
            SupervisorEvent::Exited { code: None }
        ));
        handle.await.unwrap().unwrap();
    }
}
