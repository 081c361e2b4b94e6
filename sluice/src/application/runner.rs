// /////////////////////////////////////////////////////////////////////////////
// Sluice
// Copyright (c) 2025 Sluice Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Orchestrates one pipeline run: glob-scan a root into a [`FileList`], pipe
//! it through a chain of processors, write (or preview, or clean) the
//! results, and persist the dependency graph accumulated along the way.

use sluice_domain::entities::file::File;
use sluice_domain::entities::file_list::FileList;
use sluice_domain::entities::file_ops;
use sluice_domain::entities::processor::{Processor, ProcessorOptions};
use sluice_domain::error::BuildError;
use sluice_domain::value_objects::engine::Engine;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Aggregate diagnostics from a completed run, the basis for
/// `sluice_bootstrap::exit_code::ExitCode::from_error_count`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub files: usize,
    pub errors: usize,
    pub warnings: usize,
}

impl BuildSummary {
    fn from_files(files: &[File]) -> Self {
        let mut summary = BuildSummary { files: files.len(), errors: 0, warnings: 0 };
        for file in files {
            summary.errors += file.error_count() as usize;
            summary.warnings += file.warning_count() as usize;
        }
        summary
    }
}

pub struct Runner {
    engine: Arc<Engine>,
    cache_dir: PathBuf,
}

impl Runner {
    pub fn new(engine: Arc<Engine>, cache_dir: PathBuf) -> Self {
        Runner { engine, cache_dir }
    }

    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    /// Resolves `patterns` against `root` (glob syntax, one entry per
    /// pattern), loading each matched file's source content immediately so
    /// the first pipeline stage never has to await `File::load` itself.
    /// Duplicate matches across overlapping patterns are matched once.
    pub async fn scan(&self, root: &Path, patterns: &[String]) -> Result<FileList, BuildError> {
        let list = FileList::new();
        let mut seen = HashSet::new();

        for pattern in patterns {
            let full_pattern = root.join(pattern);
            let entries = glob::glob(&full_pattern.to_string_lossy())
                .map_err(|err| BuildError::validation(format!("invalid glob pattern {pattern:?}: {err}")))?;

            for entry in entries {
                let path = entry.map_err(|err| BuildError::io(err.to_string()))?;
                if !path.is_file() || !seen.insert(path.clone()) {
                    continue;
                }
                let rel = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
                let mut file = File::new(Some(path), rel);
                file.load(self.engine.fs.as_ref(), self.engine.mode).await?;
                list.add(file);
            }
        }
        list.end();
        Ok(list)
    }

    /// Pipes `list` through `steps` in order, each stage's output list
    /// becoming the next stage's input (§4.3 `pipe`).
    pub async fn pipe(&self, list: &FileList, steps: Vec<Processor>) -> FileList {
        let mut current = list.clone();
        for step in steps {
            current = current.pipe(step, ProcessorOptions::default(), self.engine.clone()).await;
        }
        current
    }

    /// Writes every file in `list` under `out_dir`, then tallies diagnostics
    /// and persists the dependency graph accumulated during the run so a
    /// subsequent `watch` start is primed without a full rescan (§4.5, §4.6).
    pub async fn finish(&self, list: &FileList, out_dir: &Path) -> Result<BuildSummary, BuildError> {
        let written = list.dest(out_dir.to_path_buf(), self.engine.clone()).await;
        let files = written.collect().await;
        let summary = BuildSummary::from_files(&files);

        let graph = self.engine.deps.lock().unwrap().clone();
        crate::infrastructure::cache::save_dep_graph(&self.cache_dir, &graph).await?;
        Ok(summary)
    }

    /// Runs `scan` → `pipe` → `finish` in sequence, the common case of a
    /// `build`/`preview`/`watch` pass over one source set.
    pub async fn run(
        &self,
        root: &Path,
        patterns: &[String],
        steps: Vec<Processor>,
        out_dir: &Path,
    ) -> Result<BuildSummary, BuildError> {
        let scanned = self.scan(root, patterns).await?;
        let processed = self.pipe(&scanned, steps).await;
        self.finish(&processed, out_dir).await
    }

    /// Deletes whatever a previous `build` wrote for the files matched by
    /// `root`/`patterns`, via the working-mode dispatch already built into
    /// [`file_ops::save`] (§4.2 step 3: `engine.mode.is_clean()` routes to
    /// `clean` instead of writing). Unlike `run`, this does not re-run
    /// `steps` — clean only needs to know which source paths existed, not
    /// what their processed output would look like.
    pub async fn clean(&self, root: &Path, patterns: &[String], out_dir: &Path) -> Result<BuildSummary, BuildError> {
        let scanned = self.scan(root, patterns).await?;
        let files = scanned.collect().await;
        let mut summary = BuildSummary { files: files.len(), errors: 0, warnings: 0 };

        for mut file in files {
            if let Err(err) = file_ops::save(&mut file, Some(out_dir), &self.engine).await {
                self.engine.progress.error(&err.to_string());
                summary.errors += 1;
            }
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::{GlobMatcher, TokioFileSystem};
    use crate::infrastructure::cache::JsonOutputCache;
    use sluice_domain::entities::file::File as DomainFile;
    use sluice_domain::services::path_port::StdPath;
    use sluice_domain::services::plugin_loader_port::PluginLoaderPort;
    use sluice_domain::services::process_runner_port::{ExecOptions, ExecResult, ProcessRunnerPort};
    use sluice_domain::services::progress_port::{LogLevel, ProgressPort};
    use sluice_domain::services::url_port::StdUrl;
    use sluice_domain::value_objects::encoding::Encoding;
    use sluice_domain::value_objects::engine::{Engine, SourceMapDefaults};
    use sluice_domain::value_objects::working_mode::WorkingMode;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::tempdir;

    struct NoopProgress;
    impl ProgressPort for NoopProgress {
        fn log(&self, _data: &str, _level: LogLevel) {}
        fn error(&self, _data: &str) {}
        fn begin(&self, _label: &str, _args: &HashMap<String, String>) -> u64 {
            0
        }
        fn end(&self, _id: u64) {}
    }

    struct NoopPlugins;
    impl PluginLoaderPort for NoopPlugins {
        fn load(&self, name: &str) -> Result<Processor, BuildError> {
            Err(BuildError::PluginError(format!("no plugin named {name}")))
        }
    }

    struct NoopProcess;
    #[async_trait]
    impl ProcessRunnerPort for NoopProcess {
        async fn exec(&self, _command: &str, _args: &[String], _options: ExecOptions) -> Result<ExecResult, BuildError> {
            Ok(ExecResult { exit_code: 0, stdout: String::new(), stderr: String::new() })
        }
    }

    fn test_engine(cache: Arc<JsonOutputCache>) -> Engine {
        Engine::new(
            Arc::new(TokioFileSystem::new()),
            Arc::new(StdPath),
            Arc::new(StdUrl),
            Arc::new(GlobMatcher::new()),
            Arc::new(NoopProgress),
            Arc::new(NoopPlugins),
            Arc::new(NoopProcess),
            cache,
            WorkingMode::Build,
            Encoding::Utf8,
            SourceMapDefaults::default(),
            false,
        )
    }

    #[tokio::test]
    async fn run_writes_piped_output_and_reports_zero_errors() {
        let src_dir = tempdir().unwrap();
        let out_dir = tempdir().unwrap();
        let cache_dir = tempdir().unwrap();
        fs::write(src_dir.path().join("a.txt"), b"hi").unwrap();

        let cache = Arc::new(JsonOutputCache::load(cache_dir.path()).await);
        let engine = Arc::new(test_engine(cache));
        let runner = Runner::new(engine, cache_dir.path().to_path_buf());

        let uppercase = Processor::Sync(Arc::new(sluice_domain::entities::processor::FnProcessor(|mut f: DomainFile| {
            let text = f.content_as_text(Encoding::Utf8).to_uppercase();
            f.set_content_text(text);
            Ok(Some(f))
        })));

        let summary = runner
            .run(src_dir.path(), &["*.txt".to_string()], vec![uppercase], out_dir.path())
            .await
            .unwrap();

        assert_eq!(summary.files, 1);
        assert_eq!(summary.errors, 0);
        assert_eq!(fs::read(out_dir.path().join("a.txt")).unwrap(), b"HI");
    }

    #[tokio::test]
    async fn clean_removes_recorded_outputs_without_rerunning_steps() {
        let src_dir = tempdir().unwrap();
        let out_dir = tempdir().unwrap();
        let cache_dir = tempdir().unwrap();
        fs::write(src_dir.path().join("a.txt"), b"hi").unwrap();

        let cache = Arc::new(JsonOutputCache::load(cache_dir.path()).await);
        let engine = Arc::new(test_engine(cache));
        let runner = Runner::new(engine.clone(), cache_dir.path().to_path_buf());

        runner
            .run(src_dir.path(), &["*.txt".to_string()], Vec::new(), out_dir.path())
            .await
            .unwrap();
        assert!(out_dir.path().join("a.txt").exists());

        let clean_engine = Arc::new(Engine::new(
            engine.fs.clone(),
            engine.path.clone(),
            engine.url.clone(),
            engine.matcher.clone(),
            engine.progress.clone(),
            engine.plugins.clone(),
            engine.process.clone(),
            engine.cache.clone(),
            WorkingMode::Clean,
            Encoding::Utf8,
            SourceMapDefaults::default(),
            false,
        ));
        let clean_runner = Runner::new(clean_engine, cache_dir.path().to_path_buf());
        clean_runner.clean(src_dir.path(), &["*.txt".to_string()], out_dir.path()).await.unwrap();

        assert!(!out_dir.path().join("a.txt").exists());
    }
}
