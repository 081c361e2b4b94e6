// /////////////////////////////////////////////////////////////////////////////
// Sluice
// Copyright (c) 2025 Sluice Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Dependency Tracker (§3, §4.5): two directed edge sets keyed by absolute
//! source path. `deps` edges force a full rebuild of `src` when `target`
//! changes; `refs` edges only trigger a content-only refresh. Used by watch
//! mode to decide what a file-system event invalidates.

use crate::entities::log_entry::LogEntry;
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Edge {
    pub target: PathBuf,
    pub log: Option<LogEntry>,
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.target == other.target
    }
}
impl Eq for Edge {}
impl Hash for Edge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.target.hash(state);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalidation {
    Rebuild,
    Refresh,
}

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    deps: HashMap<PathBuf, HashSet<Edge>>,
    refs: HashMap<PathBuf, HashSet<Edge>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent: re-adding the same `(src, target)` edge is a no-op aside
    /// from replacing the attached log entry.
    pub fn add_dep(&mut self, src: impl Into<PathBuf>, target: impl Into<PathBuf>, log: Option<LogEntry>) {
        let edge = Edge { target: target.into(), log };
        let set = self.deps.entry(src.into()).or_default();
        set.replace(edge);
    }

    pub fn add_ref(&mut self, src: impl Into<PathBuf>, target: impl Into<PathBuf>, log: Option<LogEntry>) {
        let edge = Edge { target: target.into(), log };
        let set = self.refs.entry(src.into()).or_default();
        set.replace(edge);
    }

    pub fn deps_of(&self, src: &std::path::Path) -> Vec<&Edge> {
        self.deps.get(src).map(|s| s.iter().collect()).unwrap_or_default()
    }

    pub fn refs_of(&self, src: &std::path::Path) -> Vec<&Edge> {
        self.refs.get(src).map(|s| s.iter().collect()).unwrap_or_default()
    }

    /// All `(src, targets)` dep entries, for persisting the graph to cache.
    pub fn all_deps(&self) -> impl Iterator<Item = (&PathBuf, &HashSet<Edge>)> {
        self.deps.iter()
    }

    /// All `(src, targets)` ref entries, for persisting the graph to cache.
    pub fn all_refs(&self) -> impl Iterator<Item = (&PathBuf, &HashSet<Edge>)> {
        self.refs.iter()
    }

    /// Given a changed path `p`, returns every `src` that must be
    /// invalidated and how (§4.5): a `deps` hit means a full rebuild, a
    /// `refs` hit (with no `deps` hit for the same `src`) means a
    /// content-only refresh. A `src` with both wins as `Rebuild`.
    pub fn invalidated_by(&self, changed: &std::path::Path) -> Vec<(PathBuf, Invalidation)> {
        let mut out: HashMap<PathBuf, Invalidation> = HashMap::new();
        for (src, edges) in &self.deps {
            if edges.iter().any(|e| e.target == changed) {
                out.insert(src.clone(), Invalidation::Rebuild);
            }
        }
        for (src, edges) in &self.refs {
            if edges.iter().any(|e| e.target == changed) {
                out.entry(src.clone()).or_insert(Invalidation::Refresh);
            }
        }
        out.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changed_dep_target_forces_rebuild() {
        let mut graph = DependencyGraph::new();
        graph.add_dep("a.scss", "_mixins.scss", None);
        let invalidated = graph.invalidated_by(std::path::Path::new("_mixins.scss"));
        assert_eq!(invalidated, vec![(PathBuf::from("a.scss"), Invalidation::Rebuild)]);
    }

    #[test]
    fn ref_only_target_triggers_refresh() {
        let mut graph = DependencyGraph::new();
        graph.add_ref("a.md", "b.md", None);
        let invalidated = graph.invalidated_by(std::path::Path::new("b.md"));
        assert_eq!(invalidated, vec![(PathBuf::from("a.md"), Invalidation::Refresh)]);
    }

    #[test]
    fn dep_and_ref_on_same_target_prefers_rebuild() {
        let mut graph = DependencyGraph::new();
        graph.add_dep("a.md", "shared.md", None);
        graph.add_ref("a.md", "shared.md", None);
        let invalidated = graph.invalidated_by(std::path::Path::new("shared.md"));
        assert_eq!(invalidated, vec![(PathBuf::from("a.md"), Invalidation::Rebuild)]);
    }

    #[test]
    fn readding_same_edge_is_idempotent() {
        let mut graph = DependencyGraph::new();
        graph.add_dep("a.md", "b.md", None);
        graph.add_dep("a.md", "b.md", None);
        assert_eq!(graph.deps_of(std::path::Path::new("a.md")).len(), 1);
    }
}
