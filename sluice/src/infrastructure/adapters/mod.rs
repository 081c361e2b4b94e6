// /////////////////////////////////////////////////////////////////////////////
// Sluice
// Copyright (c) 2025 Sluice Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! One adapter per port declared in `sluice_domain::services` (§6), plus
//! `watch_adapter`, which is supplemental: spec.md names the dependency/watch
//! model as core (§1) but leaves the OS file-system watcher itself external.

pub mod fs_adapter;
pub mod matcher_adapter;
pub mod path_adapter;
pub mod plugin_adapter;
pub mod process_adapter;
pub mod url_adapter;
pub mod watch_adapter;

pub use fs_adapter::TokioFileSystem;
pub use matcher_adapter::GlobMatcher;
pub use path_adapter::StdPath;
pub use plugin_adapter::DylibPluginLoader;
pub use process_adapter::TokioProcessRunner;
pub use url_adapter::UrlHelper;
pub use watch_adapter::Watcher;
