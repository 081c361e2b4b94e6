// /////////////////////////////////////////////////////////////////////////////
// Sluice
// Copyright (c) 2025 Sluice Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Sluice
//!
//! The runnable half of the build engine: concrete adapters for every port
//! `sluice_domain::services` declares, the application-layer `Runner` that
//! turns a glob and a processor chain into a finished build, and the
//! ambient configuration/cache/logging stack around them. `sluice_domain`
//! owns the rules; this crate owns everything that touches the outside
//! world — disk, the clock, the process table, `stdin`/`stdout`.
//!
//! ## Module Structure
//!
//! - [`application`] — the Runner/Configuration component (§2): scan, pipe,
//!   write.
//! - [`infrastructure`] — concrete port adapters plus config/cache/logging.

pub mod application;
pub mod infrastructure;

pub use application::{BuildSummary, Runner};
