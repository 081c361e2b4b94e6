// /////////////////////////////////////////////////////////////////////////////
// Sluice
// Copyright (c) 2025 Sluice Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! End-to-end build scenarios, each driving a `Runner` over a real temp
//! directory the way `sluice::main` would: identity copy, a transform that
//! emits a source map, source-map composition across two stages, clean
//! mode, whole-list ordering, and the overwrite guard.

use async_trait::async_trait;
use sluice::application::Runner;
use sluice::infrastructure::adapters::{GlobMatcher, TokioFileSystem};
use sluice::infrastructure::cache::JsonOutputCache;
use sluice_domain::entities::file::File;
use sluice_domain::entities::processor::{FnProcessor, Processor, SyncProcessor, WholeListProcessor};
use sluice_domain::error::BuildError;
use sluice_domain::services::path_port::StdPath;
use sluice_domain::services::plugin_loader_port::PluginLoaderPort;
use sluice_domain::services::process_runner_port::{ExecOptions, ExecResult, ProcessRunnerPort};
use sluice_domain::services::progress_port::{LogLevel, ProgressPort};
use sluice_domain::services::url_port::StdUrl;
use sluice_domain::value_objects::encoding::Encoding;
use sluice_domain::value_objects::engine::{Engine, SourceMapDefaults};
use sluice_domain::value_objects::source_map::SourceMapObject;
use sluice_domain::value_objects::source_map_builder::SourceMapBuilder;
use sluice_domain::value_objects::working_mode::WorkingMode;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
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

async fn new_runner(mode: WorkingMode, overwrite: bool, source_maps: SourceMapDefaults, cache_dir: &std::path::Path) -> Runner {
    let cache = Arc::new(JsonOutputCache::load(cache_dir).await);
    let engine = Arc::new(Engine::new(
        Arc::new(TokioFileSystem::new()),
        Arc::new(StdPath),
        Arc::new(StdUrl),
        Arc::new(GlobMatcher::new()),
        Arc::new(NoopProgress),
        Arc::new(NoopPlugins),
        Arc::new(NoopProcess),
        cache,
        mode,
        Encoding::Utf8,
        source_maps,
        overwrite,
    ));
    Runner::new(engine, cache_dir.to_path_buf())
}

#[tokio::test]
async fn identity_copy_writes_unmodified_content() {
    let src = tempdir().unwrap();
    let out = tempdir().unwrap();
    let cache = tempdir().unwrap();
    fs::write(src.path().join("a.txt"), b"hi").unwrap();

    let runner = new_runner(WorkingMode::Build, false, SourceMapDefaults::default(), cache.path()).await;
    let summary = runner.run(src.path(), &["*.txt".to_string()], Vec::new(), out.path()).await.unwrap();

    assert_eq!(summary.files, 1);
    assert_eq!(summary.errors, 0);
    assert_eq!(fs::read(out.path().join("a.txt")).unwrap(), b"hi");
    assert!(!out.path().join("a.txt.map").exists());
}

struct UppercaseWithMap;
impl SyncProcessor for UppercaseWithMap {
    fn process(&self, mut file: File) -> Result<Option<File>, BuildError> {
        let text = file.content_as_text(Encoding::Utf8);
        file.set_content_text(text.to_uppercase());

        let mut builder = SourceMapBuilder::new();
        builder.add_mapping(0, 0, Some(&file.path().to_string_lossy()), Some(0), Some(0), None);
        file.set_source_map_data(builder.into());
        Ok(Some(file))
    }
}

#[tokio::test]
async fn transform_emits_a_sibling_source_map() {
    let src = tempdir().unwrap();
    let out = tempdir().unwrap();
    let cache = tempdir().unwrap();
    fs::write(src.path().join("a.js"), b"var x = 1;").unwrap();

    let source_maps = SourceMapDefaults { emit: true, inline: false, include_content: false };
    let runner = new_runner(WorkingMode::Build, false, source_maps, cache.path()).await;
    let summary = runner
        .run(src.path(), &["*.js".to_string()], vec![Processor::sync(UppercaseWithMap)], out.path())
        .await
        .unwrap();
    assert_eq!(summary.errors, 0);

    let written = String::from_utf8(fs::read(out.path().join("a.js")).unwrap()).unwrap();
    assert!(written.starts_with("VAR X = 1;"));
    assert!(written.contains("//# sourceMappingURL=a.js.map"));

    let map_bytes = fs::read(out.path().join("a.js.map")).unwrap();
    let map: SourceMapObject = serde_json::from_slice(&map_bytes).unwrap();
    assert_eq!(map.version, 3);
    assert_eq!(map.sources, vec!["a.js".to_string()]);
}

/// First pipeline stage: uppercases the body and records the map from its
/// own generated output back to the original source.
struct UppercaseStage;
impl SyncProcessor for UppercaseStage {
    fn process(&self, mut file: File) -> Result<Option<File>, BuildError> {
        let text = file.content_as_text(Encoding::Utf8);
        file.set_content_text(text.to_uppercase());

        let mut map = SourceMapBuilder::new();
        map.add_mapping(0, 0, Some(&file.path().to_string_lossy()), Some(0), Some(0), None);
        file.set_source_map_data(map.into());
        Ok(Some(file))
    }
}

/// Second stage: prepends a banner line (shifting every line down by one)
/// and composes its own map with whatever the upstream stage attached, so
/// the file's final map resolves straight back to the original source
/// rather than to the first stage's intermediate output.
struct BannerStage;
impl SyncProcessor for BannerStage {
    fn process(&self, mut file: File) -> Result<Option<File>, BuildError> {
        let upstream_map = file.source_map_data().cloned();

        let text = file.content_as_text(Encoding::Utf8);
        file.set_content_text(format!("// banner\n{text}"));

        let mut own_map = SourceMapBuilder::new();
        own_map.add_mapping(1, 0, Some("stage1-output"), Some(0), Some(0), None);
        file.set_source_map_data(own_map.into());

        if let Some(upstream) = upstream_map {
            file.apply_source_map(&upstream)?;
        }
        Ok(Some(file))
    }
}

#[tokio::test]
async fn two_stage_transform_composes_source_maps_back_to_the_original() {
    let src = tempdir().unwrap();
    let out = tempdir().unwrap();
    let cache = tempdir().unwrap();
    fs::write(src.path().join("a.js"), b"x=1;").unwrap();

    let source_maps = SourceMapDefaults { emit: true, inline: false, include_content: false };
    let runner = new_runner(WorkingMode::Build, false, source_maps, cache.path()).await;
    let scanned = runner.scan(src.path(), &["*.js".to_string()]).await.unwrap();
    let piped = runner.pipe(&scanned, vec![Processor::sync(UppercaseStage), Processor::sync(BannerStage)]).await;
    let summary = runner.finish(&piped, out.path()).await.unwrap();
    assert_eq!(summary.errors, 0);

    let written = String::from_utf8(fs::read(out.path().join("a.js")).unwrap()).unwrap();
    assert!(written.starts_with("// banner\nX=1;"));

    let map_bytes = fs::read(out.path().join("a.js.map")).unwrap();
    let map: SourceMapObject = serde_json::from_slice(&map_bytes).unwrap();
    let builder = SourceMapBuilder::from_object(&map);
    let resolved = builder.get_source(1, 0);
    assert_eq!(resolved.source_path.as_deref(), Some("a.js"));
    assert_eq!((resolved.line, resolved.column), (0, 0));
}

#[tokio::test]
async fn clean_mode_removes_previously_written_output_and_its_map() {
    let src = tempdir().unwrap();
    let out = tempdir().unwrap();
    let cache = tempdir().unwrap();
    fs::write(src.path().join("a.js"), b"var x = 1;").unwrap();

    let source_maps = SourceMapDefaults { emit: true, inline: false, include_content: false };
    let runner = new_runner(WorkingMode::Build, false, source_maps, cache.path()).await;
    runner
        .run(src.path(), &["*.js".to_string()], vec![Processor::sync(UppercaseWithMap)], out.path())
        .await
        .unwrap();
    assert!(out.path().join("a.js").exists());
    assert!(out.path().join("a.js.map").exists());

    let clean_runner = new_runner(WorkingMode::Clean, false, source_maps, cache.path()).await;
    clean_runner.clean(src.path(), &["*.js".to_string()], out.path()).await.unwrap();

    assert!(!out.path().join("a.js").exists());
    assert!(!out.path().join("a.js.map").exists());
}

struct UppercaseNames;
#[async_trait]
impl WholeListProcessor for UppercaseNames {
    async fn process(&self, files: Vec<File>) -> Result<Vec<File>, BuildError> {
        Ok(files
            .into_iter()
            .map(|mut f| {
                let upper = f.path().to_string_lossy().to_uppercase();
                f.set_path(PathBuf::from(upper));
                f
            })
            .collect())
    }
}

#[tokio::test]
async fn whole_list_processor_preserves_upstream_arrival_order() {
    let src = tempdir().unwrap();
    let out = tempdir().unwrap();
    let cache = tempdir().unwrap();
    fs::write(src.path().join("b.txt"), b"b").unwrap();
    fs::write(src.path().join("a.txt"), b"a").unwrap();
    fs::write(src.path().join("c.txt"), b"c").unwrap();

    let runner = new_runner(WorkingMode::Build, false, SourceMapDefaults::default(), cache.path()).await;
    let scanned = runner.scan(src.path(), &["*.txt".to_string()]).await.unwrap();
    let order_before: Vec<_> = scanned.collect().await.into_iter().map(|f| f.path().to_path_buf()).collect();

    let piped = runner.pipe(&scanned, vec![Processor::whole_list(UppercaseNames)]).await;
    let files = piped.collect().await;
    let order_after: Vec<_> = files.iter().map(|f| f.path().to_path_buf()).collect();

    assert_eq!(order_after.len(), order_before.len());
    for (before, after) in order_before.iter().zip(order_after.iter()) {
        assert_eq!(after, &PathBuf::from(before.to_string_lossy().to_uppercase()));
    }
}

#[tokio::test]
async fn overwrite_guard_blocks_without_flag_and_allows_with_it() {
    let src = tempdir().unwrap();
    let cache = tempdir().unwrap();
    fs::write(src.path().join("a.txt"), b"original").unwrap();

    let identity = Processor::Sync(Arc::new(FnProcessor(|mut f: File| {
        let text = f.content_as_text(Encoding::Utf8);
        f.set_content_text(format!("{text}!"));
        Ok(Some(f))
    })));

    let guarded = new_runner(WorkingMode::Build, false, SourceMapDefaults::default(), cache.path()).await;
    let summary = guarded
        .run(src.path(), &["*.txt".to_string()], vec![identity.clone()], src.path())
        .await
        .unwrap();
    assert_eq!(summary.errors, 1);
    assert_eq!(fs::read(src.path().join("a.txt")).unwrap(), b"original");

    let permitted = new_runner(WorkingMode::Build, true, SourceMapDefaults::default(), cache.path()).await;
    let summary = permitted.run(src.path(), &["*.txt".to_string()], vec![identity], src.path()).await.unwrap();
    assert_eq!(summary.errors, 0);
    assert_eq!(fs::read(src.path().join("a.txt")).unwrap(), b"original!");
}

