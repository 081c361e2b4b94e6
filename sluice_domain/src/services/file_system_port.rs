// /////////////////////////////////////////////////////////////////////////////
// Sluice
// Copyright (c) 2025 Sluice Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! File-system capability (§6): async read/write/copy/delete, consumed by
//! [`crate::entities::File`]. Deliberately out of scope for the core to
//! implement directly — a concrete adapter lives in the `sluice` crate.

use crate::error::BuildError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

#[async_trait]
pub trait FileSystemPort: Send + Sync {
    async fn read_file(&self, path: &Path) -> Result<Vec<u8>, BuildError>;
    async fn write_file(&self, path: &Path, data: &[u8]) -> Result<(), BuildError>;
    async fn copy_file(&self, source: &Path, destination: &Path) -> Result<(), BuildError>;
    async fn delete_file(&self, path: &Path) -> Result<(), BuildError>;
    async fn exists(&self, path: &Path) -> bool;
    async fn metadata_modified(&self, path: &Path) -> Result<std::time::SystemTime, BuildError>;
    async fn create_dir_all(&self, path: &Path) -> Result<(), BuildError>;

    /// Removes `dir` and each ancestor under `stop_at` that is left empty
    /// after the removal, per §4.2's delete/clean behaviour.
    async fn delete_parent_dir_if_empty(&self, dir: &Path, stop_at: &Path) -> Result<(), BuildError>;
}

/// Synchronous mirror used by lazy content loaders that can't await (e.g.
/// `File::content` read outside an async context during tests).
pub trait SyncFileSystemPort: Send + Sync {
    fn read_file_sync(&self, path: &Path) -> Result<Vec<u8>, BuildError>;
}

pub struct StdSyncFileSystem;

impl SyncFileSystemPort for StdSyncFileSystem {
    fn read_file_sync(&self, path: &Path) -> Result<Vec<u8>, BuildError> {
        std::fs::read(path).map_err(BuildError::from)
    }
}

/// Dummy in-memory filesystem, used by domain unit tests that need a
/// `FileSystemPort` without pulling in `tokio::fs`.
#[derive(Default)]
pub struct MemoryFileSystem {
    files: std::sync::Mutex<std::collections::HashMap<PathBuf, Vec<u8>>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, path: impl Into<PathBuf>, data: impl Into<Vec<u8>>) {
        self.files.lock().unwrap().insert(path.into(), data.into());
    }

    pub fn get(&self, path: &Path) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(path).cloned()
    }
}

#[async_trait]
impl FileSystemPort for MemoryFileSystem {
    async fn read_file(&self, path: &Path) -> Result<Vec<u8>, BuildError> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| BuildError::io(format!("no such file: {}", path.display())))
    }

    async fn write_file(&self, path: &Path, data: &[u8]) -> Result<(), BuildError> {
        self.files.lock().unwrap().insert(path.to_path_buf(), data.to_vec());
        Ok(())
    }

    async fn copy_file(&self, source: &Path, destination: &Path) -> Result<(), BuildError> {
        let data = self.read_file(source).await?;
        self.write_file(destination, &data).await
    }

    async fn delete_file(&self, path: &Path) -> Result<(), BuildError> {
        self.files.lock().unwrap().remove(path);
        Ok(())
    }

    async fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    async fn metadata_modified(&self, _path: &Path) -> Result<std::time::SystemTime, BuildError> {
        Ok(std::time::SystemTime::now())
    }

    async fn create_dir_all(&self, _path: &Path) -> Result<(), BuildError> {
        Ok(())
    }

    async fn delete_parent_dir_if_empty(&self, _dir: &Path, _stop_at: &Path) -> Result<(), BuildError> {
        Ok(())
    }
}
