// /////////////////////////////////////////////////////////////////////////////
// Sluice
// Copyright (c) 2025 Sluice Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Process runner capability (§6): spawns a child process for processors
//! that shell out (e.g. invoking an external formatter). stdout/stderr are
//! logged by the implementation; the exit code is delivered to the caller.

use crate::error::BuildError;
use async_trait::async_trait;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct ExecOptions {
    pub cwd: Option<std::path::PathBuf>,
    pub env: HashMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct ExecResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

#[async_trait]
pub trait ProcessRunnerPort: Send + Sync {
    async fn exec(&self, command: &str, args: &[String], options: ExecOptions) -> Result<ExecResult, BuildError>;
}
