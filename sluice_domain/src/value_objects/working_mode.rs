// /////////////////////////////////////////////////////////////////////////////
// Sluice
// Copyright (c) 2025 Sluice Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Working mode selects the save/delete semantics for the whole engine run.

/// One of `build`, `preview`, `clean`, `watch`.
///
/// `watch` behaves like `build` for the purposes of save/delete dispatch;
/// the distinction only matters to the runner, which keeps the process
/// alive and re-triggers pipeline segments after a `build` completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkingMode {
    Build,
    Preview,
    Clean,
    Watch,
}

impl WorkingMode {
    pub fn is_clean(self) -> bool {
        matches!(self, WorkingMode::Clean)
    }

    pub fn is_preview(self) -> bool {
        matches!(self, WorkingMode::Preview)
    }

    pub fn is_watch(self) -> bool {
        matches!(self, WorkingMode::Watch)
    }

    /// `true` for any mode in which `File::load` should actually touch disk.
    pub fn reads_content(self) -> bool {
        !self.is_clean()
    }
}

impl Default for WorkingMode {
    fn default() -> Self {
        WorkingMode::Build
    }
}
