//! Change notifications for the tailed file

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use scribe_core::{Result, ScribeError};
use std::path::Path;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Wakes the tail loop when the watched file is written
///
/// Notifications are coalesced: a burst of writes leaves at most a few
/// wakeups queued, and each wakeup reads everything new.
pub struct FileWatcher {
    // dropping the watcher stops notifications
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<()>,
}

impl FileWatcher {
    pub fn new(path: &Path) -> Result<Self> {
        let (tx, rx) = mpsc::channel(4);

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                        // a full channel already holds a pending wakeup
                        let _ = tx.try_send(());
                    }
                }
                Err(e) => warn!("File watcher error: {}", e),
            },
            Config::default(),
        )
        .map_err(|e| ScribeError::Watch(e.to_string()))?;

        watcher
            .watch(path, RecursiveMode::NonRecursive)
            .map_err(|e| ScribeError::Watch(format!("{}: {}", path.display(), e)))?;

        info!("Watching {}", path.display());

        Ok(Self {
            _watcher: watcher,
            rx,
        })
    }

    /// Wait for the next change; `None` once the watcher has shut down
    pub async fn changed(&mut self) -> Option<()> {
        self.rx.recv().await
    }
}

impl std::fmt::Debug for FileWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWatcher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_path_is_watch_error() {
        let temp = TempDir::new().unwrap();
        let err = FileWatcher::new(&temp.path().join("absent.log")).unwrap_err();
        assert!(matches!(err, ScribeError::Watch(_)));
    }

    #[tokio::test]
    async fn test_write_wakes_watcher() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("app.log");
        std::fs::write(&path, "").unwrap();

        let mut watcher = FileWatcher::new(&path).unwrap();

        let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "hello").unwrap();
        file.sync_all().unwrap();

        // Some platforms deliver events slowly; only assert when one arrives
        if let Ok(event) = tokio::time::timeout(Duration::from_secs(2), watcher.changed()).await {
            assert_eq!(event, Some(()));
        }
    }
}
