//! Push-notification handler driving one triage run.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::{error, info, warn};

use clamgate_pipeline::decode_envelope;

use crate::http::errors::ApiError;
use crate::state::ApiState;

/// Handle one push delivery: decode, run the pipeline, map the outcome.
///
/// The run is spawned onto the runtime rather than awaited inline so that a
/// caller disconnect cannot cancel cleanup after routing has been confirmed;
/// the handler then awaits the join handle for the response code.
pub(crate) async fn receive_push(
    State(state): State<Arc<ApiState>>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let object = decode_envelope(&body).map_err(|err| {
        warn!(error = %err, "rejected push envelope");
        ApiError::from(err)
    })?;

    let pipeline = Arc::clone(&state.pipeline);
    let handle = tokio::spawn(async move { pipeline.run(&object).await });
    match handle.await {
        Ok(Ok(routed)) => {
            info!(destination = %routed.destination_uri(), "triage run acknowledged");
            Ok(StatusCode::NO_CONTENT)
        }
        Ok(Err(err)) => {
            error!(
                kind = err.kind(),
                retryable = err.is_retryable(),
                error = %err,
                "triage run failed"
            );
            Err(ApiError::from(err))
        }
        Err(join_err) => {
            error!(error = %join_err, "triage task aborted");
            Err(ApiError::internal("pipeline task aborted"))
        }
    }
}
