// /////////////////////////////////////////////////////////////////////////////
// Sluice
// Copyright (c) 2025 Sluice Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Source-Map Data
//!
//! A source map can travel through the pipeline in one of three forms: the
//! raw V3 object, a serialized JSON string, or a [`super::source_map_builder::SourceMapBuilder`].
//! Conversions between the three are idempotent and lossless except that a
//! string round-trip goes through JSON (so field order is not preserved).

use crate::error::BuildError;
use crate::value_objects::source_map_builder::SourceMapBuilder;
use serde::{Deserialize, Serialize};

/// The Source Map V3 object, as it is read from or written to a `.map` file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMapObject {
    pub version: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(rename = "sourceRoot", skip_serializing_if = "Option::is_none")]
    pub source_root: Option<String>,
    pub sources: Vec<String>,
    #[serde(rename = "sourcesContent", skip_serializing_if = "Option::is_none")]
    pub sources_content: Option<Vec<Option<String>>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<String>,
    pub mappings: String,
}

/// A source map in one of its three interchangeable representations.
#[derive(Debug, Clone)]
pub enum SourceMapData {
    Object(SourceMapObject),
    Json(String),
    Builder(SourceMapBuilder),
}

impl SourceMapData {
    pub fn to_object(&self) -> Result<SourceMapObject, BuildError> {
        match self {
            SourceMapData::Object(o) => Ok(o.clone()),
            SourceMapData::Json(s) => Ok(serde_json::from_str(s)?),
            SourceMapData::Builder(b) => Ok(b.to_object()),
        }
    }

    pub fn to_builder(&self) -> Result<SourceMapBuilder, BuildError> {
        match self {
            SourceMapData::Builder(b) => Ok(b.clone()),
            SourceMapData::Object(o) => Ok(SourceMapBuilder::from_object(o)),
            SourceMapData::Json(s) => {
                let obj: SourceMapObject = serde_json::from_str(s)?;
                Ok(SourceMapBuilder::from_object(&obj))
            }
        }
    }

    pub fn to_json(&self) -> Result<String, BuildError> {
        match self {
            SourceMapData::Json(s) => Ok(s.clone()),
            other => Ok(serde_json::to_string(&other.to_object()?)?),
        }
    }
}

impl From<SourceMapObject> for SourceMapData {
    fn from(o: SourceMapObject) -> Self {
        SourceMapData::Object(o)
    }
}

impl From<SourceMapBuilder> for SourceMapData {
    fn from(b: SourceMapBuilder) -> Self {
        SourceMapData::Builder(b)
    }
}
