// /////////////////////////////////////////////////////////////////////////////
// Sluice
// Copyright (c) 2025 Sluice Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! `FileList` is both producer and consumer of a pipeline stage (§4.3): it
//! accumulates `File`s via `add`/`end` and exposes `data`/`end` listeners.
//! A listener registered after its event already fired is replayed
//! synchronously rather than missing the event.
//!
//! The original system dispatches a `pipe()` callback's arity to choose
//! between synchronous, asynchronous, and whole-list processing (§4.3,
//! design note §9). Rust has no runtime arity reflection, so [`Processor`]
//! makes that choice an explicit tag instead of an inferred one.

use crate::entities::file::File;
use crate::entities::processor::{Processor, ProcessorOptions};
use crate::error::BuildError;
use crate::services::matcher_port::MatchPattern;
use crate::value_objects::engine::Engine;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

type DataListener = Box<dyn FnMut(&File) + Send>;
type EndListener = Box<dyn FnOnce(&[File]) + Send>;

struct State {
    files: Vec<File>,
    ended: bool,
    data_listeners: Vec<DataListener>,
    end_listeners: Vec<EndListener>,
}

impl Default for State {
    fn default() -> Self {
        State { files: Vec::new(), ended: false, data_listeners: Vec::new(), end_listeners: Vec::new() }
    }
}

/// Cheap to clone: every clone shares the same underlying buffer and
/// listener set, mirroring the original's single mutable list object
/// passed by reference between stages.
#[derive(Clone)]
pub struct FileList {
    state: Arc<Mutex<State>>,
}

impl Default for FileList {
    fn default() -> Self {
        Self::new()
    }
}

impl FileList {
    pub fn new() -> Self {
        FileList { state: Arc::new(Mutex::new(State::default())) }
    }

    pub fn from_files(files: Vec<File>) -> Self {
        let list = FileList::new();
        for file in files {
            list.add(file);
        }
        list.end();
        list
    }

    /// Appends `file`, firing `data` on every currently-registered listener.
    pub fn add(&self, file: File) {
        let mut state = self.state.lock().unwrap();
        for listener in state.data_listeners.iter_mut() {
            listener(&file);
        }
        state.files.push(file);
    }

    /// Fires `end` exactly once per list, after all `add` calls (§5).
    pub fn end(&self) {
        let mut state = self.state.lock().unwrap();
        if state.ended {
            return;
        }
        state.ended = true;
        let listeners = std::mem::take(&mut state.end_listeners);
        let snapshot = state.files.clone();
        drop(state);
        for listener in listeners {
            listener(&snapshot);
        }
    }

    pub fn is_ended(&self) -> bool {
        self.state.lock().unwrap().ended
    }

    /// Registers `listener`; if files have already arrived, they are
    /// replayed synchronously, one call per buffered file, before the
    /// listener starts receiving new arrivals.
    pub fn on_data<F: FnMut(&File) + Send + 'static>(&self, mut listener: F) {
        let mut state = self.state.lock().unwrap();
        for file in &state.files {
            listener(file);
        }
        state.data_listeners.push(Box::new(listener));
    }

    /// Registers `listener`; if the list already ended, it is invoked
    /// immediately with the final files.
    pub fn on_end<F: FnOnce(&[File]) + Send + 'static>(&self, listener: F) {
        let mut state = self.state.lock().unwrap();
        if state.ended {
            let snapshot = state.files.clone();
            drop(state);
            listener(&snapshot);
            return;
        }
        state.end_listeners.push(Box::new(listener));
    }

    /// Snapshot of the files accumulated so far (or all of them, once
    /// ended). Used by whole-list processors and by tests.
    pub fn snapshot(&self) -> Vec<File> {
        self.state.lock().unwrap().files.clone()
    }

    /// Linear scan by path-equality (§4.3 `get`).
    pub fn get(&self, path: &Path) -> Option<File> {
        self.state.lock().unwrap().files.iter().find(|f| f.path() == path).cloned()
    }

    /// Derived list containing only files whose path matches the composite
    /// matcher built from `patterns` (§4.3 `src`).
    pub fn src(&self, patterns: &[MatchPattern], engine: &Engine) -> FileList {
        let matcher = engine.matcher.compile(patterns);
        let out = FileList::new();
        let out_for_data = out.clone();
        self.on_data(move |file| {
            if file.matches(matcher.as_ref()) {
                out_for_data.add(file.clone());
            }
        });
        let out_for_end = out.clone();
        self.on_end(move |_| out_for_end.end());
        out
    }

    /// Union of `self` and `others`; completion gates on every input
    /// ending (§4.3 `concat`).
    pub fn concat(lists: &[FileList]) -> FileList {
        let out = FileList::new();
        let remaining = Arc::new(Mutex::new(lists.len()));
        for list in lists {
            let out_data = out.clone();
            list.on_data(move |file| out_data.add(file.clone()));
            let out_end = out.clone();
            let remaining = remaining.clone();
            list.on_end(move |_| {
                let mut left = remaining.lock().unwrap();
                *left -= 1;
                if *left == 0 {
                    out_end.end();
                }
            });
        }
        if lists.is_empty() {
            out.end();
        }
        out
    }

    /// Adapts `processor` into a downstream pipeline stage (§4.3 `pipe`).
    /// Per-file modes load the file, run the processor, and forward the
    /// result (or drop it, if the processor returned `None`); whole-list
    /// mode waits for upstream `end` and runs the processor once over the
    /// full batch. Processor exceptions are attached to the file as an
    /// error diagnostic rather than aborting the pipeline (§7).
    pub async fn pipe(&self, processor: Processor, options: ProcessorOptions, engine: Arc<Engine>) -> FileList {
        match processor {
            Processor::Sync(p) => self.pipe_sync(move |f| p.process(f), engine),
            Processor::Async(p) => self.pipe_async(p, engine).await,
            Processor::WholeList(p) => self.pipe_whole_list(p, engine).await,
            Processor::Downstream(downstream) => self.pipe_downstream(downstream),
            Processor::Factory(factory) => {
                let downstream = factory(options);
                self.pipe_downstream(downstream)
            }
        }
    }

    fn pipe_sync<F>(&self, process: F, engine: Arc<Engine>) -> FileList
    where
        F: Fn(File) -> Result<Option<File>, BuildError> + Send + Sync + 'static,
    {
        // Synchronous processors never suspend, so unlike the async/
        // whole-list variants below they don't need to raise the task
        // barrier (§5: "CPU work inside a processor runs to completion
        // before yielding").
        let out = FileList::new();
        let out_data = out.clone();
        let engine_for_data = engine.clone();
        self.on_data(move |file| match process(file.clone()) {
            Ok(Some(out_file)) => out_data.add(out_file),
            Ok(None) => {}
            Err(err) => {
                let mut file = file.clone();
                file.record_error();
                engine_for_data.progress.error(&err.to_string());
                out_data.add(file);
            }
        });
        let out_end = out.clone();
        self.on_end(move |_| out_end.end());
        out
    }

    async fn pipe_async(&self, processor: Arc<dyn crate::entities::processor::AsyncProcessor>, engine: Arc<Engine>) -> FileList {
        let out = FileList::new();
        let files = self.collect().await;
        for file in files {
            let task_id = engine.barrier.begin(format!("pipe:async:{}", file.path().display()));
            match processor.process(file.clone()).await {
                Ok(Some(out_file)) => out.add(out_file),
                Ok(None) => {}
                Err(err) => {
                    let mut file = file;
                    file.record_error();
                    engine.progress.error(&err.to_string());
                    out.add(file);
                }
            }
            engine.barrier.end(task_id).await;
        }
        out.end();
        out
    }

    async fn pipe_whole_list(&self, processor: Arc<dyn crate::entities::processor::WholeListProcessor>, engine: Arc<Engine>) -> FileList {
        let out = FileList::new();
        let files = self.collect().await;
        let task_id = engine.barrier.begin("pipe:whole-list".to_string());
        match processor.process(files).await {
            Ok(results) => {
                for file in results {
                    out.add(file);
                }
            }
            Err(err) => {
                engine.progress.error(&err.to_string());
            }
        }
        engine.barrier.end(task_id).await;
        out.end();
        out
    }

    fn pipe_downstream(&self, downstream: FileList) -> FileList {
        let downstream_for_data = downstream.clone();
        self.on_data(move |file| downstream_for_data.add(file.clone()));
        let downstream_for_end = downstream.clone();
        self.on_end(move |_| downstream_for_end.end());
        downstream
    }

    /// Waits for `end` and returns every file that arrived, in arrival
    /// order — the ordering whole-list processors observe (§5).
    pub async fn collect(&self) -> Vec<File> {
        let (tx, rx) = tokio::sync::oneshot::channel();
        let mut tx = Some(tx);
        self.on_end(move |files| {
            if let Some(tx) = tx.take() {
                let _ = tx.send(files.to_vec());
            }
        });
        rx.await.unwrap_or_default()
    }

    /// For each file, saves it under `dir` and forwards it downstream once
    /// the save completes (§4.3 `dest`).
    pub async fn dest(&self, dir: PathBuf, engine: Arc<Engine>) -> FileList {
        let out = FileList::new();
        let files = self.collect().await;
        for mut file in files {
            let task_id = engine.barrier.begin(format!("dest:{}", file.path().display()));
            if let Err(err) = crate::entities::file_ops::save(&mut file, Some(&dir), &engine).await {
                file.record_error();
                engine.progress.error(&err.to_string());
            }
            engine.barrier.end(task_id).await;
            out.add(file);
        }
        out.end();
        out
    }

    /// Symmetric to `dest`, but deletes each file's source (§4.3 `delete`).
    pub async fn delete(&self, delete_empty_dirs: bool, engine: Arc<Engine>) -> FileList {
        let out = FileList::new();
        let files = self.collect().await;
        for mut file in files {
            let task_id = engine.barrier.begin(format!("delete:{}", file.path().display()));
            if let Err(err) = crate::entities::file_ops::delete(&mut file, delete_empty_dirs, &engine).await {
                file.record_error();
                engine.progress.error(&err.to_string());
            }
            engine.barrier.end(task_id).await;
            out.add(file);
        }
        out.end();
        out
    }
}
