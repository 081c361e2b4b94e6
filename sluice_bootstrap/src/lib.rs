// /////////////////////////////////////////////////////////////////////////////
// Sluice
// Copyright (c) 2025 Sluice Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Bootstrap
//!
//! The bootstrap layer sits outside the domain/application/infrastructure
//! layers and owns everything that happens before and after the engine
//! actually runs: parsing and validating the CLI surface (spec.md §6),
//! coordinating graceful shutdown when `watch` is interrupted, and mapping
//! the outcome to a process exit code (spec.md §7: "a non-zero aggregate
//! `errorCount` at process end yields a failing exit").
//!
//! Nothing here depends on `sluice_domain` or `sluice`; `sluice::main`
//! depends on this crate, not the other way around, the same composition
//! root relationship the teacher's `adaptive_pipeline_bootstrap` crate has
//! with `adaptive_pipeline`.

pub mod cli;
pub mod exit_code;
pub mod logger;
pub mod shutdown;

pub use cli::{Cli, Command, ModeArgs, WorkingModeArg};
pub use exit_code::ExitCode;
pub use logger::{BootstrapLogger, ConsoleLogger, NoOpLogger};
pub use shutdown::ShutdownCoordinator;
