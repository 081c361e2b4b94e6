// /////////////////////////////////////////////////////////////////////////////
// Sluice
// Copyright (c) 2025 Sluice Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! A [`File`] is one logical artifact moving through a pipeline (§3, §4.2):
//! a source path, a (possibly rewritten) target path, lazily-materialized
//! content, an optional source map, and accumulated diagnostics. Content
//! lives in one of four slots — `src_buffer`/`src_content` on the read
//! side, `dest_buffer`/`dest_content` on the write side — and conversion
//! between bytes and text happens on demand, driven by [`Encoding`].

use crate::error::BuildError;
use crate::services::file_system_port::FileSystemPort;
use crate::services::path_port::PathPort;
use crate::services::url_port::UrlPort;
use crate::value_objects::encoding::Encoding;
use crate::value_objects::source_map::SourceMapData;
use crate::value_objects::working_mode::WorkingMode;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

/// A zero-based line/column pair, the unit `indexToLocation`/
/// `locationToIndex` convert to and from a flat character index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

/// Per-file overrides for source-map emission; `None` means "inherit the
/// global default" (§3: "falls back to globals if unset").
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceMapOverrides {
    pub emit: Option<bool>,
    pub inline: Option<bool>,
    pub include_content: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DestSlot {
    None,
    Buffer,
    Content,
}

#[derive(Clone)]
pub struct File {
    src_path: Option<PathBuf>,
    path: PathBuf,
    src_buffer: Option<Vec<u8>>,
    src_content: Option<String>,
    dest_buffer: Option<Vec<u8>>,
    dest_content: Option<String>,
    dest_slot: DestSlot,
    encoding: Option<Encoding>,
    source_map_data: Option<SourceMapData>,
    source_map_overrides: SourceMapOverrides,
    error_count: u32,
    warning_count: u32,
    indexes: RefCell<Option<Vec<usize>>>,
}

impl std::fmt::Debug for File {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("File")
            .field("src_path", &self.src_path)
            .field("path", &self.path)
            .field("modified", &self.modified())
            .field("error_count", &self.error_count)
            .field("warning_count", &self.warning_count)
            .finish()
    }
}

impl File {
    /// Mirrors `File(srcPath?, path?, data?)` (§4.2): if `data` is text it
    /// populates `destContent`, otherwise `destBuffer`; either marks the
    /// file modified from construction.
    pub fn new(src_path: Option<PathBuf>, path: PathBuf) -> Self {
        File {
            src_path,
            path,
            src_buffer: None,
            src_content: None,
            dest_buffer: None,
            dest_content: None,
            dest_slot: DestSlot::None,
            encoding: None,
            source_map_data: None,
            source_map_overrides: SourceMapOverrides::default(),
            error_count: 0,
            warning_count: 0,
            indexes: RefCell::new(None),
        }
    }

    pub fn generated(path: impl Into<PathBuf>) -> Self {
        File::new(None, path.into())
    }

    /// Test/fixture convenience: a generated file with text content already
    /// present in the dest slot.
    pub fn from_text(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let mut file = File::generated(path);
        file.set_content_text(text.into());
        file
    }

    pub fn from_bytes(path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) -> Self {
        let mut file = File::generated(path);
        file.set_content_bytes(bytes.into());
        file
    }

    pub fn src_path(&self) -> Option<&Path> {
        self.src_path.as_deref()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = path.into();
        self.invalidate_indexes();
    }

    pub fn generated_flag(&self) -> bool {
        self.src_path.is_none()
    }

    pub fn modified(&self) -> bool {
        self.dest_slot != DestSlot::None || self.source_map_data.is_some()
    }

    pub fn ext(&self) -> Option<String> {
        self.path.extension().map(|e| e.to_string_lossy().into_owned())
    }

    pub fn src_dir(&self) -> Option<PathBuf> {
        self.src_path.as_ref().and_then(|p| p.parent()).map(Path::to_path_buf)
    }

    pub fn dest_dir(&self, path_port: &dyn PathPort) -> PathBuf {
        path_port.dir(&self.path)
    }

    pub fn dest_path(&self) -> &Path {
        &self.path
    }

    pub fn encoding(&self, default_encoding: Encoding) -> Encoding {
        self.encoding.unwrap_or(default_encoding)
    }

    pub fn set_encoding(&mut self, encoding: Encoding) {
        self.encoding = Some(encoding);
    }

    pub fn error_count(&self) -> u32 {
        self.error_count
    }

    pub fn warning_count(&self) -> u32 {
        self.warning_count
    }

    pub fn record_error(&mut self) {
        self.error_count += 1;
    }

    pub fn record_warning(&mut self) {
        self.warning_count += 1;
    }

    pub fn source_map_overrides(&self) -> SourceMapOverrides {
        self.source_map_overrides
    }

    pub fn set_source_map_overrides(&mut self, overrides: SourceMapOverrides) {
        self.source_map_overrides = overrides;
    }

    pub fn source_map_data(&self) -> Option<&SourceMapData> {
        self.source_map_data.as_ref()
    }

    pub fn set_source_map_data(&mut self, data: SourceMapData) {
        self.source_map_data = Some(data);
    }

    fn invalidate_indexes(&mut self) {
        *self.indexes.get_mut() = None;
    }

    /// Writing `content` clears `destBuffer`; either marks the file
    /// modified (§4.2 content accessors).
    pub fn set_content_text(&mut self, text: String) {
        self.dest_content = Some(text);
        self.dest_buffer = None;
        self.dest_slot = DestSlot::Content;
        self.invalidate_indexes();
    }

    /// Writing `buffer` clears `destContent`.
    pub fn set_content_bytes(&mut self, bytes: Vec<u8>) {
        self.dest_buffer = Some(bytes);
        self.dest_content = None;
        self.dest_slot = DestSlot::Buffer;
        self.invalidate_indexes();
    }

    /// `buffer`/`content` prefer the dest slot, falling back to the source
    /// slot when unmodified; text is derived from the sibling slot using
    /// `encoding` when the requested representation isn't directly present.
    pub fn content_as_text(&self, default_encoding: Encoding) -> String {
        let encoding = self.encoding(default_encoding);
        if let Some(text) = &self.dest_content {
            return text.clone();
        }
        if let Some(bytes) = &self.dest_buffer {
            return encoding.decode(bytes);
        }
        if let Some(text) = &self.src_content {
            return text.clone();
        }
        if let Some(bytes) = &self.src_buffer {
            return encoding.decode(bytes);
        }
        String::new()
    }

    pub fn content_as_bytes(&self, default_encoding: Encoding) -> Vec<u8> {
        let encoding = self.encoding(default_encoding);
        if let Some(bytes) = &self.dest_buffer {
            return bytes.clone();
        }
        if let Some(text) = &self.dest_content {
            return encoding.encode(text);
        }
        if let Some(bytes) = &self.src_buffer {
            return bytes.clone();
        }
        if let Some(text) = &self.src_content {
            return encoding.encode(text);
        }
        Vec::new()
    }

    pub fn has_src_content(&self) -> bool {
        self.src_buffer.is_some() || self.src_content.is_some()
    }

    /// Reads `srcPath` asynchronously unless content is already present or
    /// the working mode is `clean`, in which case the source buffer stays
    /// empty (§4.2 Load). Read errors are reported to the caller as a
    /// recoverable [`BuildError`] rather than aborting the pipeline; callers
    /// attach it to the file as a diagnostic.
    pub async fn load(&mut self, fs: &dyn FileSystemPort, mode: WorkingMode) -> Result<(), BuildError> {
        if self.has_src_content() || mode.is_clean() {
            return Ok(());
        }
        let Some(src_path) = self.src_path.clone() else {
            return Ok(());
        };
        let bytes = fs.read_file(&src_path).await?;
        self.src_buffer = Some(bytes);
        Ok(())
    }

    /// `srcContent`/`srcBuffer` are only materialized by [`File::load`]; a
    /// generated file (no `srcPath`) has nothing to load.
    pub fn src_exists_on_disk(&self) -> bool {
        self.src_path.is_some()
    }

    /// Converts index `n` into a zero-based line/column using a memoised
    /// array of line-start offsets over the current content.
    pub fn index_to_location(&self, n: usize, default_encoding: Encoding) -> Location {
        let index = self.line_starts(default_encoding);
        let line = match index.binary_search(&n) {
            Ok(l) => l,
            Err(l) => l.saturating_sub(1),
        };
        let column = n.saturating_sub(index[line]);
        Location { line: line as u32, column: column as u32 }
    }

    pub fn location_to_index(&self, loc: Location, default_encoding: Encoding) -> usize {
        let index = self.line_starts(default_encoding);
        let line = (loc.line as usize).min(index.len().saturating_sub(1));
        index[line] + loc.column as usize
    }

    fn line_starts(&self, default_encoding: Encoding) -> Vec<usize> {
        if let Some(cached) = self.indexes.borrow().as_ref() {
            return cached.clone();
        }
        let text = self.content_as_text(default_encoding);
        let mut starts = vec![0usize];
        for (i, c) in text.char_indices() {
            if c == '\n' {
                starts.push(i + 1);
            }
        }
        *self.indexes.borrow_mut() = Some(starts.clone());
        starts
    }

    /// Merges `inner` into the current map via builder composition
    /// (`self ∘ inner`); if composition fails the original map is kept and
    /// the caller should demote the error to a warning per §7.
    pub fn apply_source_map(&mut self, inner: &SourceMapData) -> Result<(), BuildError> {
        let outer = match &self.source_map_data {
            Some(data) => data.to_builder()?,
            None => return Ok(()),
        };
        let inner_builder = inner.to_builder()?;
        let mut composed = outer;
        composed.apply_source_map(&inner_builder);
        self.source_map_data = Some(SourceMapData::from(composed));
        Ok(())
    }

    pub fn matches(&self, matcher: &dyn crate::services::matcher_port::Matcher) -> bool {
        matcher.test(&self.path)
    }

    pub fn resolve(&self, url_port: &dyn UrlPort, url: &str) -> String {
        url_port.resolve(&self.path.to_string_lossy(), url)
    }

    pub fn relative(&self, url_port: &dyn UrlPort, to: &str) -> String {
        url_port.relative(&self.path.to_string_lossy(), to)
    }
}
