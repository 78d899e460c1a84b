//! Router construction and server host for the API.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::http::health::health;
use crate::http::triage::receive_push;
use crate::state::ApiState;

/// Error type for server hosting.
#[derive(Debug, Error)]
pub enum ApiServerError {
    /// The listener could not be bound or the server loop failed.
    #[error("api server io failure")]
    Io {
        /// Operation identifier (`bind`, `serve`).
        operation: &'static str,
        /// Source IO error.
        source: std::io::Error,
    },
}

/// Axum router wrapper that hosts the triage API.
pub struct ApiServer {
    router: Router,
}

impl ApiServer {
    /// Construct the server with shared dependencies wired through state.
    #[must_use]
    pub fn new(state: ApiState) -> Self {
        let state = Arc::new(state);
        let router = Router::new()
            .route("/", post(receive_push))
            .route("/healthz", get(health))
            .layer(TraceLayer::new_for_http())
            .with_state(state);
        Self { router }
    }

    /// The assembled router, for in-process testing.
    #[must_use]
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Bind and serve until the process is stopped.
    ///
    /// # Errors
    ///
    /// Returns an error when the listener cannot bind or the accept loop
    /// fails.
    pub async fn serve(self, addr: SocketAddr) -> Result<(), ApiServerError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ApiServerError::Io {
                operation: "bind",
                source,
            })?;
        info!(%addr, "api server listening");
        axum::serve(listener, self.router)
            .await
            .map_err(|source| ApiServerError::Io {
                operation: "serve",
                source,
            })
    }
}
