// /////////////////////////////////////////////////////////////////////////////
// Sluice
// Copyright (c) 2025 Sluice Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Tracing + Progress-Bar Adapter
//!
//! Concrete [`ProgressPort`] (§6): `log`/`error` go through `tracing` (so
//! they compose with whatever subscriber `sluice_bootstrap::logger` installs),
//! `begin`/`end` render an `indicatif` spinner per in-flight stage, keyed by
//! the same `u64` id the caller later passes to `end`. A stage that never
//! calls `end` (a panicking processor, say) just leaves its spinner dangling
//! until the process exits — acceptable for a CLI tool with no long-running
//! server lifetime to worry about.

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use sluice_domain::services::progress_port::{format_template, LogLevel, ProgressPort};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub struct TracingProgress {
    multi: MultiProgress,
    next_id: AtomicU64,
    bars: Mutex<HashMap<u64, ProgressBar>>,
}

impl TracingProgress {
    pub fn new() -> Self {
        TracingProgress { multi: MultiProgress::new(), next_id: AtomicU64::new(1), bars: Mutex::new(HashMap::new()) }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }
}

impl Default for TracingProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressPort for TracingProgress {
    fn log(&self, data: &str, level: LogLevel) {
        match level {
            LogLevel::Debug => tracing::debug!(target: "sluice", "{data}"),
            LogLevel::Info => tracing::info!(target: "sluice", "{data}"),
            LogLevel::Warn => tracing::warn!(target: "sluice", "{data}"),
            LogLevel::Error => tracing::error!(target: "sluice", "{data}"),
        }
    }

    fn error(&self, data: &str) {
        tracing::error!(target: "sluice", "{data}");
    }

    fn begin(&self, label: &str, args: &HashMap<String, String>) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let message = format_template(label, args);

        let bar = self.multi.add(ProgressBar::new_spinner());
        bar.set_style(Self::spinner_style());
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_message(message.clone());
        tracing::debug!(target: "sluice", "begin {id}: {message}");

        self.bars.lock().unwrap().insert(id, bar);
        id
    }

    fn end(&self, id: u64) {
        if let Some(bar) = self.bars.lock().unwrap().remove(&id) {
            bar.finish_and_clear();
        }
        tracing::debug!(target: "sluice", "end {id}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_returns_increasing_ids_and_end_removes_the_bar() {
        let progress = TracingProgress::new();
        let mut args = HashMap::new();
        args.insert("name".to_string(), "a.js".to_string());

        let first = progress.begin("building {name}", &args);
        let second = progress.begin("building {name}", &args);
        assert_ne!(first, second);

        assert_eq!(progress.bars.lock().unwrap().len(), 2);
        progress.end(first);
        assert_eq!(progress.bars.lock().unwrap().len(), 1);
        progress.end(second);
        assert!(progress.bars.lock().unwrap().is_empty());
    }

    #[test]
    fn ending_an_unknown_id_is_a_noop() {
        let progress = TracingProgress::new();
        progress.end(999);
    }
}
