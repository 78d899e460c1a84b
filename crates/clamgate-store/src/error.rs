//! Error types for object-store operations.

use thiserror::Error;

/// Result alias for object-store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Primary error type for object-store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The referenced object does not exist.
    #[error("object not found")]
    NotFound {
        /// Bucket that was queried.
        bucket: String,
        /// Key that was queried.
        key: String,
    },
    /// The HTTP request could not be completed.
    #[error("store request failed")]
    Request {
        /// Operation identifier (`get`, `put`, `delete`).
        operation: &'static str,
        /// URL used for the request.
        url: String,
        /// Source HTTP client error.
        source: reqwest::Error,
    },
    /// The store answered with a non-success status.
    #[error("store response status error")]
    Status {
        /// Operation identifier (`get`, `put`, `delete`).
        operation: &'static str,
        /// URL used for the request.
        url: String,
        /// HTTP status code returned by the store.
        status: u16,
    },
    /// No usable credential was available for the request.
    #[error("store credentials unavailable")]
    Credentials {
        /// Human-readable detail about the credential failure.
        detail: String,
    },
}

impl StoreError {
    /// Whether a retry of the same operation could plausibly succeed.
    ///
    /// The pipeline surfaces this hint to operators but treats every store
    /// error as fatal for the current run either way.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::NotFound { .. } => false,
            Self::Request { .. } | Self::Credentials { .. } => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_permanent() {
        let err = StoreError::NotFound {
            bucket: "staging".into(),
            key: "a.bin".into(),
        };
        assert!(!err.is_transient());
    }

    #[test]
    fn server_errors_are_transient() {
        let err = StoreError::Status {
            operation: "put",
            url: "http://store.test/upload".into(),
            status: 503,
        };
        assert!(err.is_transient());
        let err = StoreError::Status {
            operation: "put",
            url: "http://store.test/upload".into(),
            status: 403,
        };
        assert!(!err.is_transient());
    }
}
