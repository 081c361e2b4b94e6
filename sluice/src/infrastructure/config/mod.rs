// /////////////////////////////////////////////////////////////////////////////
// Sluice
// Copyright (c) 2025 Sluice Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Configuration Loading
//!
//! Loads `sluice.toml` (if present) and `SLUICE_*` environment overrides
//! through the `config` crate, producing a [`SluiceConfig`] that
//! `application` turns into an [`sluice_domain::value_objects::engine::Engine`]
//! (§2, ambient "Configuration" row). Every field has a default, so an empty
//! or missing `sluice.toml` still yields a usable configuration — the same
//! "validated, immutable after creation" posture the teacher's own
//! `AppConfig` builder takes, just sourced from a file instead of CLI flags.

use config::{Config, Environment, File as ConfigFile, FileFormat};
use serde::{Deserialize, Serialize};
use sluice_domain::error::BuildError;
use sluice_domain::value_objects::encoding::Encoding;
use sluice_domain::value_objects::engine::SourceMapDefaults;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SourceMapConfig {
    pub emit: bool,
    pub inline: bool,
    pub include_content: bool,
}

impl Default for SourceMapConfig {
    fn default() -> Self {
        SourceMapConfig { emit: false, inline: false, include_content: false }
    }
}

impl From<SourceMapConfig> for SourceMapDefaults {
    fn from(cfg: SourceMapConfig) -> Self {
        SourceMapDefaults { emit: cfg.emit, inline: cfg.inline, include_content: cfg.include_content }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SluiceConfig {
    /// Root directory a build's globs are resolved relative to.
    pub root: PathBuf,
    /// Output tree directory, where `File::save` writes.
    pub out_dir: PathBuf,
    /// Directory the JSON output-map/dep-graph cache is persisted under.
    pub cache_dir: PathBuf,
    /// Glob patterns (relative to `root`) a pipeline's sources are matched
    /// from, consumed by `application::Runner::scan`.
    pub patterns: Vec<String>,
    pub encoding: Encoding,
    /// Whether `File::save` may overwrite an existing output path (§4.2).
    pub overwrite: bool,
    pub source_maps: SourceMapConfig,
    /// Debounce window for the file-system watcher (§4.5).
    pub watch_debounce_ms: u64,
    /// Ordered processor names a matched source set is piped through
    /// (§1 "a source set is matched by patterns, piped through an ordered
    /// chain of processors"), resolved at startup via
    /// `PluginLoaderPort::load` against the built-ins plus anything a
    /// caller registered. Empty means the source set passes through
    /// unchanged.
    pub pipeline: Vec<String>,
}

impl Default for SluiceConfig {
    fn default() -> Self {
        SluiceConfig {
            root: PathBuf::from("."),
            out_dir: PathBuf::from("dist"),
            cache_dir: PathBuf::from(".sluice-cache"),
            patterns: vec!["**/*".to_string()],
            encoding: Encoding::Utf8,
            overwrite: false,
            source_maps: SourceMapConfig::default(),
            watch_debounce_ms: 200,
            pipeline: Vec::new(),
        }
    }
}

impl SluiceConfig {
    /// Loads configuration layered, lowest to highest precedence: built-in
    /// defaults, `sluice.toml` next to the working directory (or
    /// `config_path` if given), then `SLUICE_*` environment variables.
    pub fn load(config_path: Option<&Path>) -> Result<Self, BuildError> {
        let mut builder = Config::builder();

        match config_path {
            Some(path) => {
                builder = builder.add_source(ConfigFile::from(path).format(FileFormat::Toml).required(true));
            }
            None => {
                builder = builder.add_source(ConfigFile::new("sluice", FileFormat::Toml).required(false));
            }
        }

        let config = builder
            .add_source(Environment::with_prefix("SLUICE").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn missing_file_loads_defaults() {
        let config = SluiceConfig::load(None).unwrap();
        assert_eq!(config, SluiceConfig::default());
    }

    #[test]
    fn explicit_file_overrides_defaults() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "out_dir = \"build\"\noverwrite = true\n[source_maps]\nemit = true").unwrap();

        let config = SluiceConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.out_dir, PathBuf::from("build"));
        assert!(config.overwrite);
        assert!(config.source_maps.emit);
        assert_eq!(config.cache_dir, PathBuf::from(".sluice-cache"));
    }

    #[test]
    fn pipeline_names_round_trip_from_toml() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "pipeline = [\"prepend-banner\", \"identity\"]").unwrap();

        let config = SluiceConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.pipeline, vec!["prepend-banner".to_string(), "identity".to_string()]);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = SluiceConfig::load(Some(Path::new("/nonexistent/sluice.toml")));
        assert!(result.is_err());
    }
}
