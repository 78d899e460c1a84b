//! API application state.

use std::sync::Arc;

use clamgate_pipeline::TriagePipeline;

/// Shared dependencies injected into every handler.
pub struct ApiState {
    /// The triage pipeline serving inbound events.
    pub pipeline: Arc<TriagePipeline>,
}

impl ApiState {
    /// Wrap a pipeline for handler injection.
    #[must_use]
    pub const fn new(pipeline: Arc<TriagePipeline>) -> Self {
        Self { pipeline }
    }
}
