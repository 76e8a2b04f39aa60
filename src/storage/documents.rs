// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blob storage for uploaded KYC documents.
//!
//! `store` takes a folder hint and a filename and returns an opaque
//! storage reference that is persisted with the submission and never
//! returned to end users. The local backend writes to a temp file and
//! renames, so a crash mid-write never leaves a partial document at the
//! final path.

use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum DocumentStoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid document reference: {0}")]
    InvalidReference(String),
}

/// Storage backend for KYC document blobs. Swappable between local
/// filesystem and object storage without touching the KYC service.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persist `bytes` as `filename` under `folder_hint`, returning the
    /// opaque storage reference for the stored blob.
    async fn store(
        &self,
        folder_hint: &str,
        filename: &str,
        bytes: &[u8],
    ) -> Result<String, DocumentStoreError>;

    /// Fetch the blob behind a storage reference.
    async fn fetch(&self, reference: &str) -> Result<Vec<u8>, DocumentStoreError>;
}

/// Filesystem-backed document store rooted at a directory.
pub struct LocalDocumentStore {
    root: PathBuf,
}

impl LocalDocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a reference to a path under the root, rejecting anything
    /// that would escape it.
    fn resolve(&self, reference: &str) -> Result<PathBuf, DocumentStoreError> {
        let rel = Path::new(reference);
        let escapes = rel
            .components()
            .any(|c| !matches!(c, std::path::Component::Normal(_)));
        if reference.is_empty() || escapes {
            return Err(DocumentStoreError::InvalidReference(reference.to_string()));
        }
        Ok(self.root.join(rel))
    }
}

#[async_trait::async_trait]
impl DocumentStore for LocalDocumentStore {
    async fn store(
        &self,
        folder_hint: &str,
        filename: &str,
        bytes: &[u8],
    ) -> Result<String, DocumentStoreError> {
        let reference = format!("{folder_hint}/{filename}");
        let path = self.resolve(&reference)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Write to a temp sibling, then rename into place
        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(reference)
    }

    async fn fetch(&self, reference: &str) -> Result<Vec<u8>, DocumentStoreError> {
        let path = self.resolve(reference)?;
        Ok(tokio::fs::read(&path).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn store_and_fetch_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalDocumentStore::new(dir.path());

        let reference = store.store("kyc/u-1", "front.png", b"png-bytes").await.unwrap();
        assert_eq!(reference, "kyc/u-1/front.png");

        let bytes = store.fetch(&reference).await.unwrap();
        assert_eq!(bytes, b"png-bytes");
    }

    #[tokio::test]
    async fn traversal_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalDocumentStore::new(dir.path());

        let err = store.store("..", "outside.png", b"x").await.unwrap_err();
        assert!(matches!(err, DocumentStoreError::InvalidReference(_)));

        let err = store.fetch("/etc/passwd").await.unwrap_err();
        assert!(matches!(err, DocumentStoreError::InvalidReference(_)));
    }

    #[tokio::test]
    async fn missing_document_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalDocumentStore::new(dir.path());

        let err = store.fetch("kyc/u-1/missing.png").await.unwrap_err();
        assert!(matches!(err, DocumentStoreError::Io(_)));
    }
}
