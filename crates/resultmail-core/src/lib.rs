//! # Result Mailer Core
//!
//! Core types shared by the result mailer crates:
//!
//! - [`errors`]: HTTP-mappable application error that never leaks internal detail
//! - [`artifact_store`]: transient storage for rendered result documents
//! - [`serde`]: lenient deserializers for caller-supplied records
//!
//! # Example
//!
//! ```ignore
//! use resultmail_core::artifact_store::{ArtifactStore, LocalArtifactStore};
//!
//! let store = LocalArtifactStore::new("storage/artifacts".into());
//! let handle = store.allocate("E100")?;
//! store.write(&handle, &bytes).await?;
//! store.delete(&handle).await?;
//! ```

pub mod artifact_store;
pub mod errors;
pub mod serde;

pub use artifact_store::{
    ArtifactHandle, ArtifactStore, LocalArtifactStore, StorageError, StoreFuture,
};
pub use errors::AppError;
