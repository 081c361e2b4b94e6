// /////////////////////////////////////////////////////////////////////////////
// Sluice
// Copyright (c) 2025 Sluice Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Path capability (§6). The default implementation is pure, synchronous,
//! and string-based, so the domain can depend on it directly without an
//! infrastructure adapter — unlike the file-system and URL ports, there is
//! no I/O here to abstract away.

use std::path::{Path, PathBuf};

pub trait PathPort: Send + Sync {
    fn resolve(&self, base: &Path, path: &Path) -> PathBuf;
    fn relative(&self, from: &Path, to: &Path) -> PathBuf;
    fn dir(&self, path: &Path) -> PathBuf;
    fn ext(&self, path: &Path) -> Option<String>;
    fn change_ext(&self, path: &Path, ext: &str) -> PathBuf;
    fn in_dir(&self, path: &Path, dir: &Path) -> bool;
    fn path_equals(&self, a: &Path, b: &Path) -> bool;
}

#[derive(Default, Clone, Copy)]
pub struct StdPath;

impl PathPort for StdPath {
    fn resolve(&self, base: &Path, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base.join(path)
        }
    }

    fn relative(&self, from: &Path, to: &Path) -> PathBuf {
        let mut from_components: Vec<_> = from.components().collect();
        let mut to_components: Vec<_> = to.components().collect();
        // File vs directory: treat `from` as a file, compare against its dir.
        from_components.pop();

        let common = from_components
            .iter()
            .zip(to_components.iter())
            .take_while(|(a, b)| a == b)
            .count();

        let mut result = PathBuf::new();
        for _ in common..from_components.len() {
            result.push("..");
        }
        for component in to_components.split_off(common) {
            result.push(component.as_os_str());
        }
        if result.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            result
        }
    }

    fn dir(&self, path: &Path) -> PathBuf {
        path.parent().map(Path::to_path_buf).unwrap_or_default()
    }

    fn ext(&self, path: &Path) -> Option<String> {
        path.extension().map(|e| e.to_string_lossy().into_owned())
    }

    fn change_ext(&self, path: &Path, ext: &str) -> PathBuf {
        path.with_extension(ext.trim_start_matches('.'))
    }

    fn in_dir(&self, path: &Path, dir: &Path) -> bool {
        path.starts_with(dir)
    }

    fn path_equals(&self, a: &Path, b: &Path) -> bool {
        // Case-insensitive only where the OS filesystem actually is; we keep
        // this simple and case-sensitive, matching most CI/Linux targets.
        a == b
    }
}
