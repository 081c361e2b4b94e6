// /////////////////////////////////////////////////////////////////////////////
// Sluice
// Copyright (c) 2025 Sluice Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Domain value objects (§3, §4): immutable concepts with no identity of
//! their own — the encoding enum, the working-mode enum, the source-map
//! representations, and the process-wide `Engine` configuration bundle.

pub mod encoding;
pub mod engine;
pub mod source_map;
pub mod source_map_builder;
pub mod working_mode;

pub use encoding::Encoding;
pub use engine::{Engine, SourceMapDefaults};
pub use source_map::{SourceMapData, SourceMapObject};
pub use source_map_builder::{SourceMapBuilder, Segment, SourcePosition};
pub use working_mode::WorkingMode;
