//! Detection-engine capability used by the triage pipeline.
//!
//! # Design
//! - `ScanEngine` is the narrow seam the pipeline depends on: refresh the
//!   signature set, scan one file, nothing else.
//! - `ClamAvEngine` implements the seam with the ClamAV command-line tools
//!   (`freshclam` for signatures, `clamscan` for scanning).
//! - Exit statuses outside the documented clean/infected pair are a distinct
//!   engine failure, never silently mapped to a verdict.
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

pub mod clamav;
pub mod error;
pub mod model;

pub use clamav::{ClamAvConfig, ClamAvEngine};
pub use error::{ScanError, ScanResult};
pub use model::ScanVerdict;

use std::path::Path;

use async_trait::async_trait;

/// Narrow detection-engine seam consumed by the triage pipeline.
///
/// Implementations must be safe to share across concurrent pipeline runs;
/// `update_signatures` in particular may be called by several runs at once.
#[async_trait]
pub trait ScanEngine: Send + Sync {
    /// Refresh the detection signature set.
    ///
    /// Idempotent: refreshing an already-current set must succeed.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::SignatureUpdate`] when the refresh fails; the
    /// caller must not scan with an unrefreshed set.
    async fn update_signatures(&self) -> ScanResult<()>;

    /// Scan a single file against the current signature set.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::EngineFailure`] when the engine neither cleared
    /// nor flagged the file (crash, I/O error, unexpected exit status).
    async fn scan_file(&self, path: &Path) -> ScanResult<ScanVerdict>;
}
