//! Propagates slot changes made by other processes into a [`SessionStore`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::Result;
use crate::error::StorageError;

use super::store::SessionStore;

/// Default interval for the fallback poll.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Keeps a session store in sync with its file slot.
///
/// Filesystem notifications give prompt updates; a periodic poll covers
/// platforms and filesystems where notifications are unreliable. Both stop
/// when the watcher is dropped.
pub struct SlotWatcher {
    _watcher: RecommendedWatcher,
    poller: JoinHandle<()>,
}

impl SlotWatcher {
    /// Start watching the file slot behind `store`.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is not file-backed or the watch cannot
    /// be established.
    pub fn start(store: &SessionStore, poll_interval: Duration) -> Result<Self> {
        let slot_path = store
            .slot()
            .path()
            .map(Path::to_path_buf)
            .ok_or_else(|| StorageError::Watch {
                path: "<memory>".to_string(),
                message: "session slot is not file-backed".to_string(),
            })?;
        let dir = slot_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        std::fs::create_dir_all(&dir).map_err(|e| StorageError::Io {
            path: dir.display().to_string(),
            source: e,
        })?;

        let watch_error = |e: notify::Error| StorageError::Watch {
            path: dir.display().to_string(),
            message: e.to_string(),
        };

        let notified = store.clone();
        let file_name = slot_path.file_name().map(|n| n.to_os_string());
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            let Ok(event) = res else {
                return;
            };

            let touches_slot = event
                .paths
                .iter()
                .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
            if touches_slot {
                sync(&notified);
            }
        })
        .map_err(watch_error)?;

        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(watch_error)?;

        let polled = store.clone();
        let poller = tokio::spawn(async move {
            let mut interval = tokio::time::interval(poll_interval);
            loop {
                interval.tick().await;
                sync(&polled);
            }
        });

        debug!(path = %slot_path.display(), "Watching session slot");

        Ok(Self {
            _watcher: watcher,
            poller,
        })
    }
}

impl Drop for SlotWatcher {
    fn drop(&mut self) {
        self.poller.abort();
    }
}

fn sync(store: &SessionStore) {
    if let Err(e) = store.reload() {
        warn!(error = %e, "Failed to reload session slot");
    }
}
