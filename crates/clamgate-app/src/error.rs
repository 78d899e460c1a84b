//! Application-level errors for bootstrap and hosting.

use thiserror::Error;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration loading or validation failed.
    #[error("configuration failed")]
    Config {
        /// Source configuration error.
        source: clamgate_config::ConfigError,
    },
    /// Telemetry initialisation failed.
    #[error("telemetry initialisation failed")]
    Telemetry {
        /// Source telemetry error.
        source: clamgate_telemetry::TelemetryError,
    },
    /// The API server failed to bind or serve.
    #[error("api server failed")]
    ApiServer {
        /// Source API server error.
        source: clamgate_api::ApiServerError,
    },
}
