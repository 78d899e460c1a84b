//! Wiring of configuration, telemetry, capabilities, and the API server.

use std::sync::Arc;

use tracing::info;

use clamgate_api::{ApiServer, ApiState};
use clamgate_config::AppConfig;
use clamgate_pipeline::{Notifier, RoutingConfig, TriagePipeline, WebhookNotifier};
use clamgate_scanner::{ClamAvConfig, ClamAvEngine, ScanEngine};
use clamgate_store::{GcsStore, ObjectStore, TokenSource};
use clamgate_telemetry::LoggingConfig;

use crate::error::{AppError, AppResult};

/// Entry point for the application boot sequence.
///
/// # Errors
///
/// Returns an error if configuration is invalid, telemetry cannot be
/// installed, or the server fails to bind.
pub async fn run_app() -> AppResult<()> {
    let config = AppConfig::from_env().map_err(|source| AppError::Config { source })?;
    clamgate_telemetry::init_logging(&LoggingConfig::default())
        .map_err(|source| AppError::Telemetry { source })?;

    info!(
        dest_bucket = %config.dest_bucket,
        quarantine_bucket = %config.quarantine_bucket,
        scratch_dir = %config.scratch_dir.display(),
        "clamgate starting"
    );

    let pipeline = build_pipeline(&config);
    let server = ApiServer::new(ApiState::new(Arc::new(pipeline)));
    server
        .serve(config.bind_addr)
        .await
        .map_err(|source| AppError::ApiServer { source })
}

fn build_pipeline(config: &AppConfig) -> TriagePipeline {
    let client = reqwest::Client::new();
    let token = config
        .access_token
        .clone()
        .map_or(TokenSource::Metadata, TokenSource::Static);
    let store: Arc<dyn ObjectStore> = Arc::new(GcsStore::new(client.clone(), token));
    let engine: Arc<dyn ScanEngine> = Arc::new(ClamAvEngine::new(ClamAvConfig {
        freshclam_bin: config.freshclam_bin.clone(),
        clamscan_bin: config.clamscan_bin.clone(),
        signature_dir: config.signature_dir.clone(),
    }));
    let notifier: Arc<dyn Notifier> =
        Arc::new(WebhookNotifier::new(client, config.webhook_url.clone()));
    TriagePipeline::new(
        store,
        engine,
        notifier,
        RoutingConfig {
            dest_bucket: config.dest_bucket.clone(),
            quarantine_bucket: config.quarantine_bucket.clone(),
        },
        config.scratch_dir.clone(),
    )
}
