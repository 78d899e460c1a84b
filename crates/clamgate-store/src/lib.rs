//! Object-store capability used by the triage pipeline.
//!
//! # Design
//! - `ObjectStore` is the narrow seam the pipeline depends on: get, put,
//!   delete by `{bucket, key}`. Nothing else leaks through.
//! - `GcsStore` implements the seam against the Google Cloud Storage JSON API
//!   over plain HTTP; credentials come from a `TokenSource`.
//! - Errors carry a transient/permanent hint the pipeline surfaces but never
//!   interprets beyond "fatal for this run".
#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod gcs;
pub mod model;

pub use error::{StoreError, StoreResult};
pub use gcs::{GcsStore, TokenSource};
pub use model::ObjectRef;

use async_trait::async_trait;

/// Narrow object-store seam consumed by the triage pipeline.
///
/// Implementations must be safe to share across concurrent pipeline runs.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Download the full contents of the referenced object.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for a missing object and other
    /// [`StoreError`] variants for transport failures.
    async fn get(&self, object: &ObjectRef) -> StoreResult<Vec<u8>>;

    /// Upload `bytes` to the referenced object, overwriting any existing
    /// content under the same key.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the upload does not complete.
    async fn put(&self, object: &ObjectRef, bytes: Vec<u8>) -> StoreResult<()>;

    /// Delete the referenced object.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for a missing object and other
    /// [`StoreError`] variants for transport failures.
    async fn delete(&self, object: &ObjectRef) -> StoreResult<()>;
}
