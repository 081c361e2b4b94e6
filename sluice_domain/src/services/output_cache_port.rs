// /////////////////////////////////////////////////////////////////////////////
// Sluice
// Copyright (c) 2025 Sluice Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Cache capability (§4.6, §6): records `sourcePath -> [outputPath]` so a
//! `clean` run can delete exactly what a previous `build` wrote, without
//! recomputing the pipeline.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

#[async_trait]
pub trait OutputCachePort: Send + Sync {
    async fn record_output(&self, src: &Path, output: &Path);
    async fn outputs_for(&self, src: &Path) -> Vec<PathBuf>;
    async fn clear_outputs_for(&self, src: &Path);
}
