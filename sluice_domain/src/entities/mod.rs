// /////////////////////////////////////////////////////////////////////////////
// Sluice
// Copyright (c) 2025 Sluice Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Domain entities (§3, §4): the objects with identity that flow through a
//! pipeline and change state as they do — `File`, `FileList`, the
//! dependency graph, diagnostics, and the processor contract that adapts
//! user code into a pipeline stage.

pub mod dependency_graph;
pub mod file;
pub mod file_list;
pub mod file_ops;
pub mod log_entry;
pub mod processor;

pub use dependency_graph::{DependencyGraph, Edge, Invalidation};
pub use file::{File, Location, SourceMapOverrides};
pub use file_list::FileList;
pub use log_entry::{FileLogEntry, LogEntry};
pub use processor::{AsyncProcessor, FnProcessor, Processor, ProcessorOptions, SyncProcessor, WholeListProcessor};
