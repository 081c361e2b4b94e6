// /////////////////////////////////////////////////////////////////////////////
// Sluice
// Copyright (c) 2025 Sluice Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Concrete [`ProcessRunnerPort`] for processors that shell out to an
//! external tool (e.g. an external formatter or linter). stdout/stderr are
//! captured rather than inherited so a processor can inspect them.

use async_trait::async_trait;
use sluice_domain::error::BuildError;
use sluice_domain::services::process_runner_port::{ExecOptions, ExecResult, ProcessRunnerPort};

#[derive(Default, Clone, Copy)]
pub struct TokioProcessRunner;

impl TokioProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessRunnerPort for TokioProcessRunner {
    async fn exec(&self, command: &str, args: &[String], options: ExecOptions) -> Result<ExecResult, BuildError> {
        let mut cmd = tokio::process::Command::new(command);
        cmd.args(args);
        if let Some(cwd) = &options.cwd {
            cmd.current_dir(cwd);
        }
        for (key, value) in &options.env {
            cmd.env(key, value);
        }
        let output = cmd
            .output()
            .await
            .map_err(|err| BuildError::processor(format!("failed to spawn {command}: {err}")))?;

        Ok(ExecResult {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
