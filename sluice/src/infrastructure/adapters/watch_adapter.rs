// /////////////////////////////////////////////////////////////////////////////
// Sluice
// Copyright (c) 2025 Sluice Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # File-System Watcher
//!
//! Wires OS file-system events (via `notify`/`notify-debouncer-full`) to the
//! Dependency Tracker, per §4.5/§1's "dependency-and-watch model that drives
//! incremental rebuilds". File watchers all debounce rapid successive events
//! (an editor's save-to-temp-then-rename dance fires several raw events per
//! keystroke-save) before triggering a rebuild, so this adapter delivers one
//! batch of distinct changed paths per debounce window rather than a raw
//! event stream; deciding what each changed path invalidates is the
//! `DependencyGraph`'s job (`sluice_domain::entities::DependencyGraph::invalidated_by`),
//! not this adapter's.

use notify::RecursiveMode;
use notify_debouncer_full::{new_debouncer, DebounceEventResult, Debouncer, RecommendedCache};
use sluice_domain::error::BuildError;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

/// Owns the OS watch handle and the channel its debounced batches arrive on.
pub struct Watcher {
    _debouncer: Debouncer<notify::RecommendedWatcher, RecommendedCache>,
    events: mpsc::UnboundedReceiver<Vec<PathBuf>>,
}

impl Watcher {
    /// Starts watching `root` recursively, debouncing raw events for
    /// `debounce` before delivering a batch of distinct changed paths.
    pub fn new(root: &Path, debounce: Duration) -> Result<Self, BuildError> {
        let (tx, events) = mpsc::unbounded_channel();

        let mut debouncer = new_debouncer(debounce, None, move |result: DebounceEventResult| match result {
            Ok(events) => {
                let paths: HashSet<PathBuf> = events.into_iter().flat_map(|e| e.event.paths).collect();
                if !paths.is_empty() {
                    let _ = tx.send(paths.into_iter().collect());
                }
            }
            Err(errors) => {
                for err in errors {
                    tracing::warn!(target: "sluice::watch", "watch error: {err}");
                }
            }
        })
        .map_err(|err| BuildError::internal(format!("failed to start watcher: {err}")))?;

        debouncer
            .watch(root, RecursiveMode::Recursive)
            .map_err(|err| BuildError::internal(format!("failed to watch {}: {err}", root.display())))?;

        Ok(Watcher { _debouncer: debouncer, events })
    }

    /// Awaits the next debounced batch of changed paths. Returns `None` once
    /// the underlying watch thread has shut down.
    pub async fn next_batch(&mut self) -> Option<Vec<PathBuf>> {
        self.events.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration as StdDuration;
    use tempfile::tempdir;
    use tokio::time::timeout;

    #[tokio::test]
    async fn detects_a_write_under_the_watched_root() {
        let dir = tempdir().unwrap();
        let mut watcher = Watcher::new(dir.path(), Duration::from_millis(50)).unwrap();

        let file = dir.path().join("a.txt");
        tokio::time::sleep(StdDuration::from_millis(50)).await;
        tokio::fs::write(&file, b"hello").await.unwrap();

        let batch = timeout(StdDuration::from_secs(5), watcher.next_batch())
            .await
            .expect("should receive a debounced batch before the test timeout")
            .expect("channel should stay open while the watcher is alive");
        assert!(batch.iter().any(|p| p == &file));
    }
}
