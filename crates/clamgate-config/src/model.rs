//! Typed configuration model.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Immutable service configuration, constructed once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP entrypoint binds to.
    pub bind_addr: SocketAddr,
    /// Bucket receiving objects that scanned clean.
    pub dest_bucket: String,
    /// Bucket receiving objects the engine flagged.
    pub quarantine_bucket: String,
    /// Webhook URL for detection alerts.
    pub webhook_url: String,
    /// Root directory for run-scoped scratch copies.
    pub scratch_dir: PathBuf,
    /// Shared directory holding the detection signature set.
    pub signature_dir: PathBuf,
    /// Path to the signature updater binary.
    pub freshclam_bin: PathBuf,
    /// Path to the scanner binary.
    pub clamscan_bin: PathBuf,
    /// Static store access token; when absent the store asks the platform's
    /// metadata service per request.
    pub access_token: Option<String>,
}
