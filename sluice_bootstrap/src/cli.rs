// /////////////////////////////////////////////////////////////////////////////
// Sluice
// Copyright (c) 2025 Sluice Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Command-line surface (spec.md §6): `build`, `watch`, `clean`, `preview`
//! modes, plus `--overwrite` and the source-map toggles. This module only
//! parses and shapes arguments; the actual pipeline construction and run
//! loop live in `sluice::application`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "sluice", version, about = "Rule-based incremental build engine")]
pub struct Cli {
    /// Path to a sluice.toml config file; defaults to ./sluice.toml if present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the configured pipelines once and write outputs.
    Build(ModeArgs),
    /// Run once, then keep watching sources and re-run affected segments.
    Watch(ModeArgs),
    /// Delete everything a previous build wrote, using the output cache.
    Clean(ModeArgs),
    /// Run the pipeline without writing anything to disk.
    Preview(ModeArgs),
}

impl Command {
    pub fn mode_args(&self) -> &ModeArgs {
        match self {
            Command::Build(a) | Command::Watch(a) | Command::Clean(a) | Command::Preview(a) => a,
        }
    }

    pub fn working_mode(&self) -> WorkingModeArg {
        match self {
            Command::Build(_) => WorkingModeArg::Build,
            Command::Watch(_) => WorkingModeArg::Watch,
            Command::Clean(_) => WorkingModeArg::Clean,
            Command::Preview(_) => WorkingModeArg::Preview,
        }
    }
}

/// Mirrors spec.md's four working modes without this leaf crate depending
/// on `sluice_domain::WorkingMode`; `sluice::main` maps this to the domain
/// type when it builds the `Engine`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkingModeArg {
    Build,
    Watch,
    Clean,
    Preview,
}

#[derive(Debug, Clone, clap::Args)]
pub struct ModeArgs {
    /// Project root to resolve source globs and the output directory from.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Allow writing an output whose path collides with its own source.
    #[arg(long)]
    pub overwrite: bool,

    /// Emit source maps for transformed files.
    #[arg(long = "source-maps")]
    pub source_maps: bool,

    /// Inline source maps as a `data:` URI instead of a sibling `.map` file.
    #[arg(long = "inline-source-maps", requires = "source_maps")]
    pub inline_source_maps: bool,

    /// Include `sourcesContent` in emitted source maps.
    #[arg(long = "source-maps-content", requires = "source_maps")]
    pub source_maps_content: bool,
}
