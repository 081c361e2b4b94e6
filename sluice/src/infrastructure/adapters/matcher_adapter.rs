// /////////////////////////////////////////////////////////////////////////////
// Sluice
// Copyright (c) 2025 Sluice Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Glob/Regex Matcher Adapter
//!
//! Compiles [`MatchPattern`]s into [`Matcher`] trait objects: globs via the
//! `glob` crate's [`glob::Pattern`], regexes via `regex`, predicates passed
//! through unchanged. A list of patterns compiles to an
//! [`sluice_domain::services::matcher_port::AnyMatcher`], matching §6's
//! "globs, regexes, predicate functions, or arrays thereof".

use glob::Pattern as GlobPattern;
use regex::Regex;
use sluice_domain::services::matcher_port::{AnyMatcher, MatchPattern, Matcher, MatcherPort};
use std::path::Path;
use std::sync::Arc;

pub struct GlobMatcher;

impl GlobMatcher {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GlobMatcher {
    fn default() -> Self {
        Self::new()
    }
}

struct CompiledGlob(GlobPattern);

impl Matcher for CompiledGlob {
    fn test(&self, path: &Path) -> bool {
        self.0.matches_path(path)
    }
}

struct CompiledRegex(Regex);

impl Matcher for CompiledRegex {
    fn test(&self, path: &Path) -> bool {
        self.0.is_match(&path.to_string_lossy())
    }
}

/// Never matches; used when a glob or regex fails to compile rather than
/// panicking mid-pipeline. The compile error is logged by the caller.
struct NeverMatcher;

impl Matcher for NeverMatcher {
    fn test(&self, _path: &Path) -> bool {
        false
    }
}

impl MatcherPort for GlobMatcher {
    fn compile(&self, patterns: &[MatchPattern]) -> Arc<dyn Matcher> {
        let compiled: Vec<Arc<dyn Matcher>> = patterns
            .iter()
            .map(|pattern| -> Arc<dyn Matcher> {
                match pattern {
                    MatchPattern::Glob(glob) => match GlobPattern::new(glob) {
                        Ok(compiled) => Arc::new(CompiledGlob(compiled)),
                        Err(err) => {
                            tracing::warn!(target: "sluice::matcher", "invalid glob {glob:?}: {err}");
                            Arc::new(NeverMatcher)
                        }
                    },
                    MatchPattern::Regex(pattern) => match Regex::new(pattern) {
                        Ok(compiled) => Arc::new(CompiledRegex(compiled)),
                        Err(err) => {
                            tracing::warn!(target: "sluice::matcher", "invalid regex {pattern:?}: {err}");
                            Arc::new(NeverMatcher)
                        }
                    },
                    MatchPattern::Predicate(predicate) => {
                        let predicate = predicate.clone();
                        Arc::new(sluice_domain::services::matcher_port::PredicateMatcher(move |path: &Path| predicate(path)))
                    }
                }
            })
            .collect();
        Arc::new(AnyMatcher(compiled))
    }
}
