//! Reload watcher
//!
//! One task per watched directory. Each write notification triggers one
//! reload pass:
//!
//! ```text
//! Idle -> ChangeDetected -> Reloading -> Idle
//! ```
//!
//! A reload that fails to load is fatal: the failure is sent to the server,
//! which stops instead of serving stale or partial data. Notification errors
//! are only logged, and a closed notification channel ends reloading for that
//! directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::event::ModifyKind;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::encounter::EncounterRegistry;
use crate::error::{LoadError, WatchError};
use crate::roster::RosterStore;

/// Something that can be rebuilt from a directory and republished
pub trait Reload: Send + Sync + 'static {
    /// What is being reloaded, for logs
    fn kind(&self) -> &'static str;

    /// Load `dir` and publish it, returning the number of entries loaded
    fn reload(&self, dir: &Path) -> Result<usize, LoadError>;
}

impl Reload for RosterStore {
    fn kind(&self) -> &'static str {
        "players"
    }

    fn reload(&self, dir: &Path) -> Result<usize, LoadError> {
        RosterStore::reload(self, dir)
    }
}

impl Reload for EncounterRegistry {
    fn kind(&self) -> &'static str {
        "monsters"
    }

    fn reload(&self, dir: &Path) -> Result<usize, LoadError> {
        EncounterRegistry::reload(self, dir)
    }
}

/// A reload pass that could not load its directory
#[derive(Debug, Error)]
#[error("reloading {kind} from {}: {source}", dir.display())]
pub struct ReloadFailure {
    pub kind: &'static str,
    pub dir: PathBuf,
    pub source: LoadError,
}

/// Watcher state for one directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Idle,
    ChangeDetected,
    Reloading,
}

/// Whether a notification counts as a write to watched data
pub fn is_write_event(event: &Event) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(ModifyKind::Data(_)) | EventKind::Modify(ModifyKind::Any)
    )
}

/// Start watching `dir` and reloading `target` on every write.
///
/// Must be called from within a tokio runtime. Failing to set up the
/// notification backend is an error; everything after that happens in the
/// spawned task.
pub fn spawn_watcher<T: Reload>(
    dir: PathBuf,
    target: Arc<T>,
    fatal_tx: mpsc::UnboundedSender<ReloadFailure>,
) -> Result<JoinHandle<()>, WatchError> {
    let (tx, rx) = mpsc::unbounded_channel();

    let notify_err = |source| WatchError::Notify {
        path: dir.clone(),
        source,
    };

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        let _ = tx.send(res);
    })
    .map_err(notify_err)?;
    watcher
        .watch(&dir, RecursiveMode::Recursive)
        .map_err(notify_err)?;

    info!("Watching {} for {} changes", dir.display(), target.kind());

    Ok(tokio::spawn(async move {
        // Dropping the watcher stops notifications
        let _watcher = watcher;
        run_events(dir, target, rx, fatal_tx).await
    }))
}

/// Drive reloads of `target` from a stream of notifications for `dir`.
///
/// Returns after a fatal reload, or once `events` is closed.
async fn run_events<T: Reload>(
    dir: PathBuf,
    target: Arc<T>,
    mut events: mpsc::UnboundedReceiver<notify::Result<Event>>,
    fatal_tx: mpsc::UnboundedSender<ReloadFailure>,
) {
    let mut state = WatchState::Idle;

    while let Some(res) = events.recv().await {
        match res {
            Ok(event) if is_write_event(&event) => {
                enter(&mut state, WatchState::ChangeDetected, &dir);
                debug!("Write to {:?}", event.paths);

                enter(&mut state, WatchState::Reloading, &dir);
                info!("Reloading {} from {}", target.kind(), dir.display());

                // Directory walking and parsing block
                let pass = {
                    let target = target.clone();
                    let dir = dir.clone();
                    tokio::task::spawn_blocking(move || target.reload(&dir)).await
                };

                match pass {
                    Ok(Ok(_)) => enter(&mut state, WatchState::Idle, &dir),
                    Ok(Err(source)) => {
                        let failure = ReloadFailure {
                            kind: target.kind(),
                            dir,
                            source,
                        };
                        error!("{}", failure);
                        let _ = fatal_tx.send(failure);
                        return;
                    }
                    Err(e) => {
                        error!(
                            "Reload task for {} failed, {} will no longer reload: {}",
                            dir.display(),
                            target.kind(),
                            e
                        );
                        return;
                    }
                }
            }
            Ok(_) => {}
            Err(e) => warn!("Watch error on {}: {}", dir.display(), e),
        }
    }

    warn!(
        "Notifications for {} ended, {} will no longer reload",
        dir.display(),
        target.kind()
    );
}

fn enter(state: &mut WatchState, next: WatchState, dir: &Path) {
    debug!("{}: {:?} -> {:?}", dir.display(), state, next);
    *state = next;
}
