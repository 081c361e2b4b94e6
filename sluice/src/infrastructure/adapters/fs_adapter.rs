// /////////////////////////////////////////////////////////////////////////////
// Sluice
// Copyright (c) 2025 Sluice Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Tokio File System Adapter
//!
//! Concrete [`FileSystemPort`] backed by `tokio::fs`. This is the only
//! adapter that actually touches disk for reads/writes/deletes; everything
//! else in the pipeline goes through this trait so domain code and tests
//! stay filesystem-agnostic (see `MemoryFileSystem` in `sluice_domain`).

use async_trait::async_trait;
use sluice_domain::error::BuildError;
use sluice_domain::services::file_system_port::FileSystemPort;
use std::path::Path;
use std::time::SystemTime;

#[derive(Default, Clone, Copy)]
pub struct TokioFileSystem;

impl TokioFileSystem {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FileSystemPort for TokioFileSystem {
    async fn read_file(&self, path: &Path) -> Result<Vec<u8>, BuildError> {
        tokio::fs::read(path).await.map_err(BuildError::from)
    }

    async fn write_file(&self, path: &Path, data: &[u8]) -> Result<(), BuildError> {
        tokio::fs::write(path, data).await.map_err(BuildError::from)
    }

    async fn copy_file(&self, source: &Path, destination: &Path) -> Result<(), BuildError> {
        tokio::fs::copy(source, destination).await.map_err(BuildError::from)?;
        Ok(())
    }

    async fn delete_file(&self, path: &Path) -> Result<(), BuildError> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(BuildError::from(err)),
        }
    }

    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path).await.is_ok()
    }

    async fn metadata_modified(&self, path: &Path) -> Result<SystemTime, BuildError> {
        let metadata = tokio::fs::metadata(path).await.map_err(BuildError::from)?;
        metadata.modified().map_err(BuildError::from)
    }

    async fn create_dir_all(&self, path: &Path) -> Result<(), BuildError> {
        tokio::fs::create_dir_all(path).await.map_err(BuildError::from)
    }

    /// Walks upward from `dir`, removing each directory that is empty after
    /// the previous removal, stopping once it reaches `stop_at` or hits a
    /// directory that still has entries.
    async fn delete_parent_dir_if_empty(&self, dir: &Path, stop_at: &Path) -> Result<(), BuildError> {
        let mut current = dir.to_path_buf();
        loop {
            if current == stop_at || !current.starts_with(stop_at) {
                return Ok(());
            }
            let mut entries = match tokio::fs::read_dir(&current).await {
                Ok(entries) => entries,
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
                Err(err) => return Err(BuildError::from(err)),
            };
            if entries.next_entry().await.map_err(BuildError::from)?.is_some() {
                return Ok(());
            }
            tokio::fs::remove_dir(&current).await.map_err(BuildError::from)?;
            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Ok(()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn write_then_read_roundtrips() {
        let fs = TokioFileSystem::new();
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs.write_file(&path, b"hello").await.unwrap();
        assert_eq!(fs.read_file(&path).await.unwrap(), b"hello");
        assert!(fs.exists(&path).await);
    }

    #[tokio::test]
    async fn delete_file_is_idempotent() {
        let fs = TokioFileSystem::new();
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.txt");
        fs.delete_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn delete_parent_dir_if_empty_climbs_until_nonempty() {
        let fs = TokioFileSystem::new();
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a/b");
        fs.create_dir_all(&nested).await.unwrap();
        fs.write_file(&dir.path().join("a/keep.txt"), b"x").await.unwrap();

        fs.delete_parent_dir_if_empty(&nested, dir.path()).await.unwrap();

        assert!(!nested.exists());
        assert!(dir.path().join("a").exists());
    }
}
