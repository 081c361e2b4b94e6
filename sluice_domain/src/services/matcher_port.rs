// /////////////////////////////////////////////////////////////////////////////
// Sluice
// Copyright (c) 2025 Sluice Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Matcher capability (§6): compiled from globs, regexes, predicate
//! functions, or arrays thereof; exposes `test(path) -> bool`.

use std::path::Path;
use std::sync::Arc;

/// A pattern the matcher can be compiled from. Concrete glob/regex
/// compilation is an infrastructure concern (see `sluice::infrastructure`);
/// the domain only needs the resulting [`Matcher`] trait object.
#[derive(Clone)]
pub enum MatchPattern {
    Glob(String),
    Regex(String),
    Predicate(Arc<dyn Fn(&Path) -> bool + Send + Sync>),
}

impl std::fmt::Debug for MatchPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchPattern::Glob(g) => write!(f, "Glob({g:?})"),
            MatchPattern::Regex(r) => write!(f, "Regex({r:?})"),
            MatchPattern::Predicate(_) => write!(f, "Predicate(..)"),
        }
    }
}

pub trait Matcher: Send + Sync {
    fn test(&self, path: &Path) -> bool;
}

pub trait MatcherPort: Send + Sync {
    fn compile(&self, patterns: &[MatchPattern]) -> Arc<dyn Matcher>;
}

/// A matcher built directly from predicates, usable without pulling in the
/// `glob`/`regex` crates — handy for unit tests inside `sluice_domain`.
pub struct PredicateMatcher<F: Fn(&Path) -> bool + Send + Sync>(pub F);

impl<F: Fn(&Path) -> bool + Send + Sync> Matcher for PredicateMatcher<F> {
    fn test(&self, path: &Path) -> bool {
        (self.0)(path)
    }
}

/// Matches if any of the inner matchers matches (the composite semantics
/// `FileList::src` needs for `src(...patterns)`).
pub struct AnyMatcher(pub Vec<Arc<dyn Matcher>>);

impl Matcher for AnyMatcher {
    fn test(&self, path: &Path) -> bool {
        self.0.iter().any(|m| m.test(path))
    }
}
