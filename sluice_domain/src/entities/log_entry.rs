// /////////////////////////////////////////////////////////////////////////////
// Sluice
// Copyright (c) 2025 Sluice Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! A diagnostic (§3). Plain [`LogEntry`] carries a message and level;
//! [`FileLogEntry::from_file_position`] is the file-aware constructor that
//! rewrites a generated position back to its original source through the
//! file's attached source map, per §4.2's "position is rewritten to the
//! original source via the map" rule.

use crate::entities::file::{File, Location};
use crate::services::progress_port::LogLevel;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub message: String,
    pub level: LogLevel,
    pub path: Option<PathBuf>,
    pub content: Option<String>,
    pub start: Option<Location>,
    pub end: Option<Location>,
}

impl LogEntry {
    pub fn new(message: impl Into<String>, level: LogLevel) -> Self {
        LogEntry { message: message.into(), level, path: None, content: None, start: None, end: None }
    }
}

pub struct FileLogEntry;

impl FileLogEntry {
    /// Builds a diagnostic against `file` at generated `start`/`end`
    /// positions. If `file` has an attached source map, both positions are
    /// looked up through it and `path`/`content` are replaced with the
    /// resolved source's; if `start` and `end` resolve to different
    /// sources, `end` is dropped rather than reported against the wrong
    /// file (§3 Log Entry).
    pub fn from_file_position(
        file: &File,
        message: impl Into<String>,
        level: LogLevel,
        start: Location,
        end: Option<Location>,
    ) -> Result<LogEntry, crate::error::BuildError> {
        let mut entry = LogEntry {
            message: message.into(),
            level,
            path: Some(file.path().to_path_buf()),
            content: None,
            start: Some(start),
            end,
        };

        let Some(map) = file.source_map_data() else {
            return Ok(entry);
        };
        let builder = map.to_builder()?;
        let start_pos = builder.get_source(start.line, start.column);
        let end_pos = end.map(|e| builder.get_source(e.line, e.column));

        if let Some(source_path) = &start_pos.source_path {
            entry.path = Some(PathBuf::from(source_path));
            entry.content = start_pos.source_content.clone();
            entry.start = Some(Location { line: start_pos.line, column: start_pos.column });
            entry.end = match &end_pos {
                Some(e) if e.source_path == start_pos.source_path => {
                    Some(Location { line: e.line, column: e.column })
                }
                _ => None,
            };
        }

        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::source_map_builder::SourceMapBuilder;
    use crate::value_objects::source_map::SourceMapData;

    #[test]
    fn plain_entry_has_no_path() {
        let entry = LogEntry::new("boom", LogLevel::Error);
        assert!(entry.path.is_none());
    }

    #[test]
    fn rewrites_position_through_attached_map() {
        let mut builder = SourceMapBuilder::new();
        builder.add_source("orig.scss");
        builder.add_mapping(0, 0, Some("orig.scss"), Some(5), Some(2), None);
        let mut file = File::from_text("out.css", "body{color:red}");
        file.set_source_map_data(SourceMapData::from(builder));

        let entry = FileLogEntry::from_file_position(
            &file,
            "unexpected token",
            LogLevel::Error,
            Location { line: 0, column: 0 },
            None,
        )
        .unwrap();

        assert_eq!(entry.path, Some(PathBuf::from("orig.scss")));
        assert_eq!(entry.start, Some(Location { line: 5, column: 2 }));
    }
}
