// /////////////////////////////////////////////////////////////////////////////
// Sluice
// Copyright (c) 2025 Sluice Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Task Barrier
//!
//! The process-wide liveness signal: a counter of in-flight asynchronous
//! operations. When the counter drops to zero, queued continuations run in
//! FIFO order; a continuation may itself `begin` a new operation to keep the
//! barrier raised, which is how `pipe(...).then(...)` chains read as
//! straight-line code while the underlying I/O stays asynchronous.
//!
//! Ordering: continuations run in registration order. There is no
//! happens-before relationship between independent async operations within
//! a single level; cross-stage ordering comes only from `FileList` `end`
//! signals (see [`crate::entities::file_list`]).

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

type BoxFuture<'a> = Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

/// A continuation registered with [`TaskBarrier::then`].
///
/// `Sync` continuations run to completion immediately; `Async` continuations
/// hold the barrier raised until their future resolves.
pub enum Continuation {
    Sync(Box<dyn FnOnce() + Send>),
    Async(Box<dyn FnOnce() -> BoxFuture<'static> + Send>),
}

/// Opaque handle returned by [`TaskBarrier::begin`], passed back to `end`.
pub type TaskId = u64;

/// Counts in-flight asynchronous operations and drains queued continuations
/// whenever that count reaches zero.
pub struct TaskBarrier {
    counter: AtomicU64,
    next_id: AtomicU64,
    labels: Mutex<HashMap<TaskId, String>>,
    queue: Mutex<Vec<Continuation>>,
}

impl Default for TaskBarrier {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskBarrier {
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
            next_id: AtomicU64::new(1),
            labels: Mutex::new(HashMap::new()),
            queue: Mutex::new(Vec::new()),
        }
    }

    /// Marks the start of an asynchronous operation. Returns an id to pass
    /// back to [`TaskBarrier::end`].
    pub fn begin(&self, label: impl Into<String>) -> TaskId {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.labels.lock().unwrap().insert(id, label.into());
        self.counter.fetch_add(1, Ordering::SeqCst);
        id
    }

    /// Marks the operation `id` as complete. If this is the last
    /// outstanding operation, drains and runs queued continuations in FIFO
    /// order (synchronously for `Sync`, awaited for `Async`).
    pub async fn end(&self, id: TaskId) {
        self.labels.lock().unwrap().remove(&id);
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.drain().await;
        }
    }

    /// Registers a continuation to run the next time the barrier reaches
    /// zero. If it is already at zero, the continuation runs immediately
    /// (still respecting the sync/async distinction).
    pub async fn then(&self, continuation: Continuation) {
        if self.counter.load(Ordering::SeqCst) == 0 {
            Self::run_one(continuation).await;
            // Running the continuation may itself have called `begin`;
            // if it dropped back to zero, drain whatever it queued.
            if self.counter.load(Ordering::SeqCst) == 0 {
                self.drain().await;
            }
        } else {
            self.queue.lock().unwrap().push(continuation);
        }
    }

    /// Number of currently outstanding operations.
    pub fn outstanding(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }

    async fn drain(&self) {
        loop {
            let next: Vec<Continuation> = {
                let mut queue = self.queue.lock().unwrap();
                if queue.is_empty() {
                    return;
                }
                std::mem::take(&mut *queue)
            };
            for continuation in next {
                Self::run_one(continuation).await;
            }
            // A continuation may have called `begin`; if so, stop draining
            // until that operation's `end` triggers the next drain.
            if self.counter.load(Ordering::SeqCst) != 0 {
                return;
            }
        }
    }

    async fn run_one(continuation: Continuation) {
        match continuation {
            Continuation::Sync(f) => f(),
            Continuation::Async(f) => f().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn sync_continuation_runs_once_barrier_empties() {
        let barrier = Arc::new(TaskBarrier::new());
        let ran = Arc::new(std::sync::atomic::AtomicBool::new(false));

        let id = barrier.begin("op");
        let ran2 = ran.clone();
        barrier
            .then(Continuation::Sync(Box::new(move || {
                ran2.store(true, Ordering::SeqCst);
            })))
            .await;
        assert!(!ran.load(Ordering::SeqCst), "continuation must wait for end()");

        barrier.end(id).await;
        assert!(ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn continuations_run_in_fifo_order() {
        let barrier = Arc::new(TaskBarrier::new());
        let order = Arc::new(Mutex::new(Vec::new()));

        let id = barrier.begin("op");
        for i in 0..3 {
            let order = order.clone();
            barrier
                .then(Continuation::Sync(Box::new(move || {
                    order.lock().unwrap().push(i);
                })))
                .await;
        }
        barrier.end(id).await;
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn then_runs_immediately_when_already_empty() {
        let barrier = TaskBarrier::new();
        let ran = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let ran2 = ran.clone();
        barrier
            .then(Continuation::Sync(Box::new(move || {
                ran2.store(true, Ordering::SeqCst);
            })))
            .await;
        assert!(ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn continuation_can_keep_barrier_raised() {
        let barrier = Arc::new(TaskBarrier::new());
        let final_ran = Arc::new(std::sync::atomic::AtomicBool::new(false));

        let id = barrier.begin("first");
        let barrier_clone = barrier.clone();
        let final_ran2 = final_ran.clone();
        barrier
            .then(Continuation::Async(Box::new(move || {
                Box::pin(async move {
                    let inner_id = barrier_clone.begin("second");
                    let barrier_clone2 = barrier_clone.clone();
                    barrier_clone
                        .then(Continuation::Sync(Box::new(move || {
                            final_ran2.store(true, Ordering::SeqCst);
                        })))
                        .await;
                    barrier_clone2.end(inner_id).await;
                })
            })))
            .await;

        barrier.end(id).await;
        assert!(final_ran.load(Ordering::SeqCst));
    }
}
