// /////////////////////////////////////////////////////////////////////////////
// Sluice
// Copyright (c) 2025 Sluice Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Process Exit Codes
//!
//! spec.md §7: a non-zero aggregate `errorCount` at process end yields a
//! failing exit. `main` maps the run outcome to one of these before calling
//! `std::process::exit`.

/// The process's exit status, as a typed alternative to a bare `i32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Every file built (or previewed, or cleaned) without error.
    Success,
    /// At least one file produced an error-severity diagnostic.
    BuildErrors,
    /// The process could not even start a run: bad CLI arguments, an
    /// unreadable config file, or a panic caught at the top level.
    Fatal,
}

impl ExitCode {
    /// Aggregate `errorCount` from a completed run becomes an exit code:
    /// zero succeeds, anything else fails the build.
    pub fn from_error_count(error_count: usize) -> Self {
        if error_count == 0 {
            ExitCode::Success
        } else {
            ExitCode::BuildErrors
        }
    }

    pub fn as_i32(self) -> i32 {
        match self {
            ExitCode::Success => 0,
            ExitCode::BuildErrors => 1,
            ExitCode::Fatal => 2,
        }
    }
}
