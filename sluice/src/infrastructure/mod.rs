// /////////////////////////////////////////////////////////////////////////////
// Sluice
// Copyright (c) 2025 Sluice Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Concrete backings for the port traits `sluice_domain::services` declares
//! (§6): filesystem, matcher, URL, plugin loader, process runner adapters,
//! plus the ambient cache, config, and logging layers SPEC_FULL.md adds.

pub mod adapters;
pub mod cache;
pub mod config;
pub mod logging;

pub use cache::JsonOutputCache;
pub use config::SluiceConfig;
pub use logging::TracingProgress;
