//! Background change watcher — Tokio task that polls the shared store file
//! and tells the host when it was rewritten.
//!
//! It never refreshes anything itself; the host runs `on_refresh` on its own
//! thread when a `DataChanged` arrives.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::{mpsc, Mutex};
use tokio::time::Duration;

// ─── Channel types ────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum WatchCommand {
    CheckNow,
    Shutdown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    DataChanged,
    /// The store file disappeared; widgets fall back to defaults.
    StoreMissing,
}

// ─── Watcher handle ───────────────────────────────────────────────────────────

pub struct ChangeWatcher {
    pub cmd_tx:   mpsc::Sender<WatchCommand>,
    pub event_rx: Arc<Mutex<mpsc::Receiver<WatchEvent>>>,
}

impl ChangeWatcher {
    /// Spawn the polling task. The current state of the file counts as seen,
    /// so the first event only fires on an actual change.
    pub fn spawn(path: PathBuf, poll_interval: Duration) -> Self {
        let (cmd_tx,   mut cmd_rx)   = mpsc::channel::<WatchCommand>(8);
        let (event_tx,     event_rx) = mpsc::channel::<WatchEvent>(32);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(poll_interval);
            interval.tick().await; // discard first immediate tick

            let mut last = stamp(&path).await;
            tracing::info!("Watching shared store {}", path.display());

            loop {
                tokio::select! {
                    cmd = cmd_rx.recv() => match cmd {
                        Some(WatchCommand::Shutdown) | None => break,
                        Some(WatchCommand::CheckNow) => {
                            check(&path, &mut last, &event_tx).await;
                        }
                    },
                    _ = interval.tick() => {
                        check(&path, &mut last, &event_tx).await;
                    }
                }
            }

            tracing::info!("Change watcher stopped");
        });

        ChangeWatcher { cmd_tx, event_rx: Arc::new(Mutex::new(event_rx)) }
    }

    pub async fn check_now(&self) { let _ = self.cmd_tx.send(WatchCommand::CheckNow).await; }
    pub async fn shutdown(&self)  { let _ = self.cmd_tx.send(WatchCommand::Shutdown).await; }
}

// ─── Polling ──────────────────────────────────────────────────────────────────

/// Modification time and length; `None` while the file does not exist.
type Stamp = Option<(Option<SystemTime>, u64)>;

async fn stamp(path: &Path) -> Stamp {
    let meta = tokio::fs::metadata(path).await.ok()?;
    Some((meta.modified().ok(), meta.len()))
}

async fn check(path: &Path, last: &mut Stamp, tx: &mpsc::Sender<WatchEvent>) {
    let now = stamp(path).await;
    if now == *last {
        return;
    }
    let event = if now.is_some() { WatchEvent::DataChanged } else { WatchEvent::StoreMissing };
    tracing::debug!("shared store changed: {event:?}");
    *last = now;
    let _ = tx.send(event).await;
}
