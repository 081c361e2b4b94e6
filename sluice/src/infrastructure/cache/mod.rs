// /////////////////////////////////////////////////////////////////////////////
// Sluice
// Copyright (c) 2025 Sluice Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # JSON-Backed Cache
//!
//! Two keyed stores persisted as JSON under a tool-owned directory (§4.6,
//! §6): `output-map.json` (`sourcePath -> [outputPath]`, consumed by
//! [`sluice_domain::entities::File::save`]/`clean`) and `dep-graph.json`
//! (`sourcePath -> {deps[], refs[]}`, priming the Dependency Tracker so a
//! `watch` run started fresh already knows what a changed file invalidates,
//! per §4.5's "edges are persisted to the cache across runs so that initial
//! watches are accurate").
//!
//! Both stores hold the whole map in memory and flush it to disk on every
//! mutating call; sluice pipelines are not so large that a finer-grained
//! store pays for its complexity (the teacher's own `OutputCachePort`
//! contract makes no promise about write batching either).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sluice_domain::entities::dependency_graph::DependencyGraph;
use sluice_domain::error::BuildError;
use sluice_domain::services::output_cache_port::OutputCachePort;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const OUTPUT_MAP_FILE: &str = "output-map.json";
const DEP_GRAPH_FILE: &str = "dep-graph.json";

/// `sourcePath -> {deps: [target...], refs: [target...]}`, the persisted
/// projection of [`DependencyGraph`]. Log entries attached to edges are
/// diagnostics, not state worth persisting, so they are dropped here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersistedDepGraph {
    #[serde(default)]
    pub deps: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub refs: HashMap<String, Vec<String>>,
}

impl PersistedDepGraph {
    pub fn from_graph(graph: &DependencyGraph) -> Self {
        let mut deps: HashMap<String, Vec<String>> = HashMap::new();
        let mut refs: HashMap<String, Vec<String>> = HashMap::new();
        for (src, targets) in graph.all_deps() {
            deps.insert(src.to_string_lossy().into_owned(), targets.iter().map(|e| e.target.to_string_lossy().into_owned()).collect());
        }
        for (src, targets) in graph.all_refs() {
            refs.insert(src.to_string_lossy().into_owned(), targets.iter().map(|e| e.target.to_string_lossy().into_owned()).collect());
        }
        PersistedDepGraph { deps, refs }
    }

    /// Rehydrates a [`DependencyGraph`] from a persisted projection. Edges
    /// come back with no attached log entry (diagnostics don't survive a
    /// restart; only the shape of the graph does).
    pub fn into_graph(self) -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        for (src, targets) in self.deps {
            for target in targets {
                graph.add_dep(PathBuf::from(src.clone()), PathBuf::from(target), None);
            }
        }
        for (src, targets) in self.refs {
            for target in targets {
                graph.add_ref(PathBuf::from(src.clone()), PathBuf::from(target), None);
            }
        }
        graph
    }
}

/// JSON-file-backed [`OutputCachePort`], rooted at `dir` (typically
/// `.sluice-cache` under the project root).
pub struct JsonOutputCache {
    dir: PathBuf,
    outputs: Mutex<HashMap<PathBuf, Vec<PathBuf>>>,
}

impl JsonOutputCache {
    /// Loads `output-map.json` from `dir` if present; a missing or corrupt
    /// file starts from an empty cache rather than failing the run.
    pub async fn load(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let outputs = read_json(&dir.join(OUTPUT_MAP_FILE)).await.unwrap_or_default();
        JsonOutputCache { dir, outputs: Mutex::new(outputs) }
    }

    async fn flush(&self) -> Result<(), BuildError> {
        let snapshot = self.outputs.lock().unwrap().clone();
        write_json(&self.dir, OUTPUT_MAP_FILE, &snapshot).await
    }
}

#[async_trait]
impl OutputCachePort for JsonOutputCache {
    async fn record_output(&self, src: &Path, output: &Path) {
        {
            let mut outputs = self.outputs.lock().unwrap();
            let entry = outputs.entry(src.to_path_buf()).or_default();
            if !entry.contains(&output.to_path_buf()) {
                entry.push(output.to_path_buf());
            }
        }
        if let Err(err) = self.flush().await {
            tracing::warn!(target: "sluice::cache", "failed to persist output cache: {err}");
        }
    }

    async fn outputs_for(&self, src: &Path) -> Vec<PathBuf> {
        self.outputs.lock().unwrap().get(src).cloned().unwrap_or_default()
    }

    async fn clear_outputs_for(&self, src: &Path) {
        self.outputs.lock().unwrap().remove(src);
        if let Err(err) = self.flush().await {
            tracing::warn!(target: "sluice::cache", "failed to persist output cache: {err}");
        }
    }
}

/// Loads the persisted dependency graph from `dir`, if any (§4.5).
pub async fn load_dep_graph(dir: &Path) -> DependencyGraph {
    read_json::<PersistedDepGraph>(&dir.join(DEP_GRAPH_FILE)).await.unwrap_or_default().into_graph()
}

/// Persists `graph` to `dir`, overwriting any previous snapshot.
pub async fn save_dep_graph(dir: &Path, graph: &DependencyGraph) -> Result<(), BuildError> {
    write_json(dir, DEP_GRAPH_FILE, &PersistedDepGraph::from_graph(graph)).await
}

async fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Option<T> {
    let bytes = tokio::fs::read(path).await.ok()?;
    serde_json::from_slice(&bytes).ok()
}

async fn write_json<T: Serialize>(dir: &Path, name: &str, value: &T) -> Result<(), BuildError> {
    tokio::fs::create_dir_all(dir).await?;
    let bytes = serde_json::to_vec_pretty(value)?;
    tokio::fs::write(dir.join(name), bytes).await?;
    Ok(())
}
