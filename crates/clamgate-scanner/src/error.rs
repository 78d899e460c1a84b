//! Error types for detection-engine operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias for detection-engine operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Primary error type for detection-engine operations.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The signature refresh did not complete.
    #[error("signature update failed")]
    SignatureUpdate {
        /// Captured stderr or failure detail from the updater.
        detail: String,
    },
    /// The engine binary could not be launched.
    #[error("failed to launch scan engine")]
    Spawn {
        /// Binary that failed to launch.
        binary: PathBuf,
        /// Source IO error.
        source: io::Error,
    },
    /// The engine exited with a status outside the clean/infected pair.
    #[error("scan engine failure")]
    EngineFailure {
        /// Exit status when the process exited, `None` when killed by signal.
        status: Option<i32>,
        /// Combined engine output for diagnosis.
        output: String,
    },
}
