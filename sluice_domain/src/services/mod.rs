// /////////////////////////////////////////////////////////////////////////////
// Sluice
// Copyright (c) 2025 Sluice Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Port traits for the external interfaces listed in §6: filesystem, path,
//! URL, matcher, progress/logging, plugin loading, and process execution.
//! Each port is defined here in the domain and implemented by an adapter in
//! `sluice::infrastructure`, mirroring how the teacher's `FileIOService`
//! lives in the domain crate while its concrete backing lives in
//! infrastructure.

pub mod file_system_port;
pub mod matcher_port;
pub mod output_cache_port;
pub mod path_port;
pub mod plugin_loader_port;
pub mod process_runner_port;
pub mod progress_port;
pub mod url_port;

pub use file_system_port::{FileSystemPort, MemoryFileSystem, StdSyncFileSystem, SyncFileSystemPort};
pub use matcher_port::{AnyMatcher, MatchPattern, Matcher, MatcherPort, PredicateMatcher};
pub use output_cache_port::OutputCachePort;
pub use path_port::{PathPort, StdPath};
pub use plugin_loader_port::PluginLoaderPort;
pub use process_runner_port::{ExecOptions, ExecResult, ProcessRunnerPort};
pub use progress_port::{format_template, LogLevel, ProgressPort};
pub use url_port::{StdUrl, UrlPort};
