//! Transient artifact storage.
//!
//! A rendered result document lives in the store only for the duration of a
//! single delivery attempt. Each attempt gets its own key, built from the
//! enrollment number plus a timestamp and a random suffix, so two concurrent
//! deliveries for the same student never share a file.
//!
//! # Example
//!
//! ```ignore
//! use resultmail_core::artifact_store::{ArtifactStore, LocalArtifactStore};
//! use std::path::PathBuf;
//!
//! let store = LocalArtifactStore::new(PathBuf::from("./storage/artifacts"));
//!
//! let handle = store.allocate("E100")?;
//! store.write(&handle, &pdf_bytes).await?;
//! let bytes = store.read(&handle).await?;
//!
//! // Deleting twice is fine.
//! store.delete(&handle).await?;
//! store.delete(&handle).await?;
//! ```

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use chrono::Utc;
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use uuid::Uuid;

pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StorageError>> + Send + 'a>>;

/// Abstract trait for transient artifact storage backends.
pub trait ArtifactStore: Send + Sync {
    /// Reserve a unique handle for one delivery attempt.
    ///
    /// No file is created; the handle only names where the artifact will live.
    fn allocate(&self, enrollment_no: &str) -> Result<ArtifactHandle, StorageError>;

    /// Write the artifact and return the number of bytes made durable.
    ///
    /// The returned future resolves only after the content has been flushed
    /// and synced. Writing to a handle that already has content is an error.
    fn write<'a>(&'a self, handle: &'a ArtifactHandle, content: &'a [u8]) -> StoreFuture<'a, u64>;

    /// Read back the full artifact content.
    fn read<'a>(&'a self, handle: &'a ArtifactHandle) -> StoreFuture<'a, Vec<u8>>;

    /// Delete the artifact.
    ///
    /// # Returns
    /// `Ok(())` if the artifact was removed or did not exist.
    fn delete<'a>(&'a self, handle: &'a ArtifactHandle) -> StoreFuture<'a, ()>;

    /// Whether the artifact currently exists in the store.
    fn exists(&self, handle: &ArtifactHandle) -> bool;
}

/// Error type for artifact storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O error (file system or similar).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Artifact not found.
    #[error("artifact not found: {0}")]
    NotFound(String),

    /// Invalid storage key format.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

/// Identifies the rendered document of one delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactHandle {
    key: String,
    enrollment_no: String,
    path: PathBuf,
}

impl ArtifactHandle {
    /// Unique storage key, e.g. `result_E100_20260115T101500_5f0c...pdf`.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Filename presented to the recipient. Stable per student, unlike the key.
    pub fn attachment_name(&self) -> String {
        format!("result_{}.pdf", sanitize_component(&self.enrollment_no))
    }
}

/// Local filesystem-based artifact storage.
#[derive(Clone, Debug)]
pub struct LocalArtifactStore {
    /// Directory where artifacts are written
    base_dir: PathBuf,
}

impl LocalArtifactStore {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Validate storage key format to prevent path traversal.
    fn validate_key(key: &str) -> Result<(), StorageError> {
        if key.is_empty() || key.contains("..") || key.starts_with('/') {
            return Err(StorageError::InvalidKey(
                "Key must not be empty, contain '..', or start with '/'".to_string(),
            ));
        }

        if !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
        {
            return Err(StorageError::InvalidKey(
                "Key contains invalid characters".to_string(),
            ));
        }

        Ok(())
    }

    fn build_key(enrollment_no: &str) -> String {
        format!(
            "result_{}_{}_{}.pdf",
            sanitize_component(enrollment_no),
            Utc::now().format("%Y%m%dT%H%M%S"),
            Uuid::new_v4().simple()
        )
    }
}

impl ArtifactStore for LocalArtifactStore {
    fn allocate(&self, enrollment_no: &str) -> Result<ArtifactHandle, StorageError> {
        let enrollment_no = enrollment_no.trim();
        if enrollment_no.is_empty() {
            return Err(StorageError::InvalidKey(
                "Enrollment number must not be empty".to_string(),
            ));
        }

        let key = Self::build_key(enrollment_no);
        Self::validate_key(&key)?;

        Ok(ArtifactHandle {
            path: self.base_dir.join(&key),
            key,
            enrollment_no: enrollment_no.to_string(),
        })
    }

    fn write<'a>(&'a self, handle: &'a ArtifactHandle, content: &'a [u8]) -> StoreFuture<'a, u64> {
        Box::pin(async move {
            Self::validate_key(&handle.key)?;

            fs::create_dir_all(&self.base_dir).await?;

            // create_new turns a path collision into an error instead of a silent overwrite
            let mut file = fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&handle.path)
                .await?;

            file.write_all(content).await?;
            file.flush().await?;
            file.sync_all().await?;

            debug!(key = %handle.key, bytes = content.len(), "Artifact written");
            Ok(content.len() as u64)
        })
    }

    fn read<'a>(&'a self, handle: &'a ArtifactHandle) -> StoreFuture<'a, Vec<u8>> {
        Box::pin(async move {
            Self::validate_key(&handle.key)?;

            match fs::read(&handle.path).await {
                Ok(bytes) => Ok(bytes),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    Err(StorageError::NotFound(handle.key.clone()))
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    fn delete<'a>(&'a self, handle: &'a ArtifactHandle) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            Self::validate_key(&handle.key)?;

            match fs::remove_file(&handle.path).await {
                Ok(_) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    debug!(key = %handle.key, "Artifact already absent");
                    Ok(())
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    fn exists(&self, handle: &ArtifactHandle) -> bool {
        handle.path.is_file()
    }
}

/// Replace anything outside `[A-Za-z0-9_-]` so an enrollment number is safe in a filename.
fn sanitize_component(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
