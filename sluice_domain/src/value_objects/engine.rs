// /////////////////////////////////////////////////////////////////////////////
// Sluice
// Copyright (c) 2025 Sluice Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! `Engine` bundles the process-wide, init-time configuration and shared
//! ports a pipeline needs: the task barrier, the dependency tracker, the
//! working mode, the default encoding, global source-map flags, and every
//! capability from §6. Design note §9: "Globals are init-time configuration
//! ... mutation after the pipeline starts is undefined behaviour" — `Engine`
//! is handed around as `Arc<Engine>` and never mutated after construction.

use crate::entities::dependency_graph::DependencyGraph;
use crate::services::file_system_port::FileSystemPort;
use crate::services::matcher_port::MatcherPort;
use crate::services::output_cache_port::OutputCachePort;
use crate::services::path_port::PathPort;
use crate::services::plugin_loader_port::PluginLoaderPort;
use crate::services::process_runner_port::ProcessRunnerPort;
use crate::services::progress_port::ProgressPort;
use crate::services::url_port::UrlPort;
use crate::task_barrier::TaskBarrier;
use crate::value_objects::encoding::Encoding;
use crate::value_objects::working_mode::WorkingMode;
use std::sync::{Arc, Mutex};

/// Global source-map emission defaults, overridable per file
/// ([`crate::entities::file::SourceMapOverrides`]).
#[derive(Debug, Clone, Copy)]
pub struct SourceMapDefaults {
    pub emit: bool,
    pub inline: bool,
    pub include_content: bool,
}

impl Default for SourceMapDefaults {
    fn default() -> Self {
        SourceMapDefaults { emit: false, inline: false, include_content: false }
    }
}

pub struct Engine {
    pub fs: Arc<dyn FileSystemPort>,
    pub path: Arc<dyn PathPort>,
    pub url: Arc<dyn UrlPort>,
    pub matcher: Arc<dyn MatcherPort>,
    pub progress: Arc<dyn ProgressPort>,
    pub plugins: Arc<dyn PluginLoaderPort>,
    pub process: Arc<dyn ProcessRunnerPort>,
    pub cache: Arc<dyn OutputCachePort>,
    pub barrier: Arc<TaskBarrier>,
    pub deps: Arc<Mutex<DependencyGraph>>,
    pub mode: WorkingMode,
    pub default_encoding: Encoding,
    pub source_maps: SourceMapDefaults,
    pub overwrite: bool,
}

impl Engine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        fs: Arc<dyn FileSystemPort>,
        path: Arc<dyn PathPort>,
        url: Arc<dyn UrlPort>,
        matcher: Arc<dyn MatcherPort>,
        progress: Arc<dyn ProgressPort>,
        plugins: Arc<dyn PluginLoaderPort>,
        process: Arc<dyn ProcessRunnerPort>,
        cache: Arc<dyn OutputCachePort>,
        mode: WorkingMode,
        default_encoding: Encoding,
        source_maps: SourceMapDefaults,
        overwrite: bool,
    ) -> Self {
        Engine {
            fs,
            path,
            url,
            matcher,
            progress,
            plugins,
            process,
            cache,
            barrier: Arc::new(TaskBarrier::new()),
            deps: Arc::new(Mutex::new(DependencyGraph::new())),
            mode,
            default_encoding,
            source_maps,
            overwrite,
        }
    }

    /// Replaces the dependency graph with one rehydrated from the
    /// persisted cache (§4.5: "edges are persisted to the cache across
    /// runs so that initial watches are accurate"). Only meaningful
    /// between construction and the first pipeline run.
    pub fn prime_deps(&self, graph: DependencyGraph) {
        *self.deps.lock().unwrap() = graph;
    }
}
