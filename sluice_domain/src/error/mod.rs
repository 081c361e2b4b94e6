// /////////////////////////////////////////////////////////////////////////////
// Sluice
// Copyright (c) 2025 Sluice Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Build Error System
//!
//! A hierarchical error type for the build engine, categorized per the
//! error taxonomy in the design: I/O, plugin resolution, processor
//! exceptions, overwrite conflicts, source-map composition, and fatal
//! internal failures.
//!
//! Errors are cheap to clone so they can be attached to a [`crate::entities::File`]
//! as a diagnostic *and* logged, without forcing callers to choose between
//! the two.

use thiserror::Error;

/// Domain-specific errors for the build engine.
#[derive(Error, Debug, Clone)]
pub enum BuildError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("processor error: {0}")]
    ProcessorError(String),

    #[error("plugin error: {0}")]
    PluginError(String),

    #[error("overwrite conflict: {0}")]
    OverwriteConflict(String),

    #[error("source-map error: {0}")]
    SourceMapError(String),

    #[error("io error: {0}")]
    IoError(String),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("cache error: {0}")]
    CacheError(String),

    #[error("cancelled: {0}")]
    Cancelled(String),

    #[error("internal error: {0}")]
    InternalError(String),
}

impl BuildError {
    pub fn io(msg: impl Into<String>) -> Self {
        Self::IoError(msg.into())
    }

    pub fn processor(msg: impl Into<String>) -> Self {
        Self::ProcessorError(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::InternalError(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Whether a retry of the same operation could plausibly succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, BuildError::IoError(_) | BuildError::Cancelled(_))
    }

    /// Coarse category, used for log grouping and metrics.
    pub fn category(&self) -> &'static str {
        match self {
            BuildError::InvalidConfiguration(_) => "configuration",
            BuildError::ProcessorError(_) => "processor",
            BuildError::PluginError(_) => "plugin",
            BuildError::OverwriteConflict(_) => "overwrite",
            BuildError::SourceMapError(_) => "source-map",
            BuildError::IoError(_) => "io",
            BuildError::ValidationError(_) => "validation",
            BuildError::CacheError(_) => "cache",
            BuildError::Cancelled(_) => "cancellation",
            BuildError::InternalError(_) => "internal",
        }
    }
}

impl From<std::io::Error> for BuildError {
    fn from(err: std::io::Error) -> Self {
        BuildError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for BuildError {
    fn from(err: serde_json::Error) -> Self {
        BuildError::SourceMapError(err.to_string())
    }
}

impl From<config::ConfigError> for BuildError {
    fn from(err: config::ConfigError) -> Self {
        BuildError::InvalidConfiguration(err.to_string())
    }
}
