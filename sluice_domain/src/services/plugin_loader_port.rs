// /////////////////////////////////////////////////////////////////////////////
// Sluice
// Copyright (c) 2025 Sluice Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Plugin loader capability (§6). Given a name, returns the processor it
//! exports. Sluice makes no attempt at sandboxed plugin execution
//! (spec.md §1 Non-goals), so "loading" here means resolving a name from an
//! in-process registry rather than `dlopen`-ing a shared object; see
//! DESIGN.md for the Open Question this resolves.

use crate::entities::processor::Processor;
use crate::error::BuildError;

pub trait PluginLoaderPort: Send + Sync {
    /// Resolves `name` to its exported processor. Relative-looking names
    /// (containing `/` or starting with `.`) are resolved against the
    /// working directory by implementations that support file-based
    /// plugins; bare names are looked up in the in-process registry.
    /// Results should be memoized by the implementation.
    fn load(&self, name: &str) -> Result<Processor, BuildError>;
}
