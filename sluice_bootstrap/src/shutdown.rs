// /////////////////////////////////////////////////////////////////////////////
// Sluice
// Copyright (c) 2025 Sluice Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Shutdown Coordination
//!
//! Watch mode (spec.md §4.5, §6) keeps the process alive indefinitely,
//! re-running pipeline segments as file-system events arrive. This module
//! gives `main` a way to ask that loop to stop: a cancellation token the
//! watch loop polls between rebuilds, plus a bounded grace period so an
//! in-flight rebuild gets a chance to finish before the process exits.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// Cloneable handle a watch loop polls for cancellation.
#[derive(Clone)]
pub struct ShutdownToken {
    flag: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl ShutdownToken {
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Resolves once shutdown has been initiated. Intended for `tokio::select!`
    /// alongside whatever the watch loop is otherwise waiting on (a
    /// file-system event, a rebuild future).
    pub async fn cancelled(&self) {
        if self.is_cancelled() {
            return;
        }
        self.notify.notified().await;
    }
}

/// Owns the cancellation flag and the grace period watch mode is given to
/// wind down once shutdown is requested.
pub struct ShutdownCoordinator {
    flag: Arc<AtomicBool>,
    notify: Arc<Notify>,
    grace_period: Duration,
}

impl ShutdownCoordinator {
    pub fn new(grace_period: Duration) -> Self {
        ShutdownCoordinator {
            flag: Arc::new(AtomicBool::new(false)),
            notify: Arc::new(Notify::new()),
            grace_period,
        }
    }

    pub fn token(&self) -> ShutdownToken {
        ShutdownToken { flag: self.flag.clone(), notify: self.notify.clone() }
    }

    /// Flips the cancellation flag and wakes every `cancelled()` waiter.
    /// Idempotent: a second call is a no-op.
    pub fn initiate_shutdown(&self) {
        if !self.flag.swap(true, Ordering::SeqCst) {
            self.notify.notify_waiters();
        }
    }

    /// Waits up to the grace period for `work` to finish after shutdown was
    /// initiated. Returns `true` if `work` completed in time.
    pub async fn wait_for<F: std::future::Future<Output = ()>>(&self, work: F) -> bool {
        tokio::time::timeout(self.grace_period, work).await.is_ok()
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new(DEFAULT_GRACE_PERIOD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cancelled_resolves_after_initiate() {
        let coordinator = ShutdownCoordinator::new(Duration::from_secs(1));
        let token = coordinator.token();
        assert!(!token.is_cancelled());

        let waiter = tokio::spawn(async move {
            token.cancelled().await;
        });
        coordinator.initiate_shutdown();
        waiter.await.unwrap();
    }

    #[tokio::test]
    async fn cancelled_returns_immediately_if_already_shut_down() {
        let coordinator = ShutdownCoordinator::new(Duration::from_secs(1));
        coordinator.initiate_shutdown();
        let token = coordinator.token();
        tokio::time::timeout(Duration::from_millis(50), token.cancelled())
            .await
            .expect("should not block once already cancelled");
    }

    #[tokio::test]
    async fn wait_for_times_out_on_slow_work() {
        let coordinator = ShutdownCoordinator::new(Duration::from_millis(20));
        let finished = coordinator.wait_for(tokio::time::sleep(Duration::from_secs(10))).await;
        assert!(!finished);
    }
}
