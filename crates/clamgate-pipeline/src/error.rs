//! Failure taxonomy for the triage pipeline.
//!
//! Decode failures are terminal (the transport must not redeliver a payload
//! that can never parse); every other class aborts the run *before* source
//! cleanup, so redelivery safely reprocesses an identical run.

use std::io;

use thiserror::Error;

use clamgate_scanner::ScanError;
use clamgate_store::StoreError;

/// Result alias for pipeline runs.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Failure while parsing the inbound trigger envelope.
///
/// Never retryable: the same bytes will fail the same way on redelivery.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The body was not a recognised push envelope.
    #[error("invalid push envelope")]
    Envelope {
        /// Parse failure detail.
        detail: String,
    },
    /// The wrapped payload was not valid base64.
    #[error("invalid base64 payload")]
    Base64 {
        /// Source decode error.
        source: base64::DecodeError,
    },
    /// The decoded payload was not the expected event JSON.
    #[error("invalid event payload")]
    Payload {
        /// Parse failure detail.
        detail: String,
    },
    /// A required event field was present but empty.
    #[error("empty event field")]
    EmptyField {
        /// Name of the empty field.
        field: &'static str,
    },
}

/// Primary error type for a triage run.
///
/// Every variant leaves the staging object untouched (cleanup has not run
/// yet, or is itself the failure), so at-least-once redelivery can retry.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The signature refresh failed; scanning with a stale set is refused.
    #[error("signature update failed")]
    SignatureUpdate {
        /// Source engine error.
        source: ScanError,
    },
    /// The staging object could not be downloaded.
    #[error("fetch from staging store failed")]
    Fetch {
        /// Bucket holding the staging object.
        bucket: String,
        /// Key of the staging object.
        key: String,
        /// Source store error.
        source: StoreError,
    },
    /// The object key does not reduce to a safe scratch file name.
    #[error("object key unsafe for scratch storage")]
    UnsafeKey {
        /// Offending object key.
        key: String,
    },
    /// The scratch copy could not be written.
    #[error("scratch write failed")]
    Scratch {
        /// Key of the object being copied.
        key: String,
        /// Source IO error.
        source: io::Error,
    },
    /// The engine neither cleared nor flagged the object.
    #[error("scan engine failure")]
    EngineFailure {
        /// Source engine error.
        source: ScanError,
    },
    /// The destination upload failed; the source stays in place for retry.
    #[error("route to destination failed")]
    Route {
        /// Destination bucket of the attempted upload.
        destination: String,
        /// Key of the attempted upload.
        key: String,
        /// Source store error.
        source: StoreError,
    },
    /// The staging original could not be deleted after routing.
    #[error("source cleanup failed")]
    Cleanup {
        /// Bucket holding the staging object.
        bucket: String,
        /// Key of the staging object.
        key: String,
        /// Source store error.
        source: StoreError,
    },
}

impl PipelineError {
    /// Machine-friendly discriminator for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::SignatureUpdate { .. } => "signature_update",
            Self::Fetch { .. } => "fetch",
            Self::UnsafeKey { .. } => "unsafe_key",
            Self::Scratch { .. } => "scratch",
            Self::EngineFailure { .. } => "engine_failure",
            Self::Route { .. } => "route",
            Self::Cleanup { .. } => "cleanup",
        }
    }

    /// Whether redelivering the same event could plausibly succeed.
    ///
    /// An unsafe key will fail identically forever; everything else depends
    /// on external state that may recover.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        !matches!(self, Self::UnsafeKey { .. })
    }
}
