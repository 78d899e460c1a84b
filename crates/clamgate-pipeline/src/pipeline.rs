//! The triage state machine.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use clamgate_scanner::{ScanEngine, ScanVerdict};
use clamgate_store::{ObjectRef, ObjectStore};

use crate::error::{PipelineError, PipelineResult};
use crate::model::{RouteResult, ScratchCopy};
use crate::notify::{AlertPayload, Notifier};

/// Ordered steps of one triage run, used as the `step` field in logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StepKind {
    UpdateSignatures,
    Fetch,
    Scan,
    Route,
    Notify,
    CleanupSource,
}

impl StepKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::UpdateSignatures => "update_signatures",
            Self::Fetch => "fetch",
            Self::Scan => "scan",
            Self::Route => "route",
            Self::Notify => "notify",
            Self::CleanupSource => "cleanup_source",
        }
    }
}

/// Destination buckets for routed objects.
#[derive(Debug, Clone)]
pub struct RoutingConfig {
    /// Bucket receiving objects that scanned clean.
    pub dest_bucket: String,
    /// Bucket receiving objects the engine flagged.
    pub quarantine_bucket: String,
}

impl RoutingConfig {
    fn destination_for(&self, verdict: &ScanVerdict) -> &str {
        match verdict {
            ScanVerdict::Clean => &self.dest_bucket,
            ScanVerdict::Infected { .. } => &self.quarantine_bucket,
        }
    }
}

/// Single-shot triage pipeline over injected capabilities.
///
/// Stateless between runs; safe to share across concurrent trigger events.
/// The scratch root and the engine's signature directory are the only shared
/// filesystem resources, and both tolerate concurrent runs (run-unique
/// scratch names, serialised signature refresh).
pub struct TriagePipeline {
    store: Arc<dyn ObjectStore>,
    engine: Arc<dyn ScanEngine>,
    notifier: Arc<dyn Notifier>,
    routing: RoutingConfig,
    scratch_root: PathBuf,
}

impl TriagePipeline {
    /// Wire a pipeline from its collaborators.
    #[must_use]
    pub fn new(
        store: Arc<dyn ObjectStore>,
        engine: Arc<dyn ScanEngine>,
        notifier: Arc<dyn Notifier>,
        routing: RoutingConfig,
        scratch_root: PathBuf,
    ) -> Self {
        Self {
            store,
            engine,
            notifier,
            routing,
            scratch_root,
        }
    }

    /// Run the full triage sequence for one staging object.
    ///
    /// Exactly one verdict (or one error) is produced per run; the staging
    /// original is deleted only after the destination upload is confirmed.
    ///
    /// # Errors
    ///
    /// Returns the first failing step's [`PipelineError`]; the staging
    /// object is left in place for the transport's redelivery.
    pub async fn run(&self, object: &ObjectRef) -> PipelineResult<RouteResult> {
        let run_id = Uuid::new_v4();
        let span = info_span!("triage_run", %run_id, object = %object);
        self.run_inner(object, run_id).instrument(span).await
    }

    async fn run_inner(&self, object: &ObjectRef, run_id: Uuid) -> PipelineResult<RouteResult> {
        self.engine
            .update_signatures()
            .await
            .map_err(|source| PipelineError::SignatureUpdate { source })?;
        info!(step = StepKind::UpdateSignatures.as_str(), "signatures fresh");

        let bytes = self
            .store
            .get(object)
            .await
            .map_err(|source| PipelineError::Fetch {
                bucket: object.bucket.clone(),
                key: object.key.clone(),
                source,
            })?;
        let scratch = ScratchCopy::write(&self.scratch_root, run_id, &object.key, &bytes).await?;
        info!(
            step = StepKind::Fetch.as_str(),
            size = bytes.len(),
            scratch = %scratch.path().display(),
            "staging object fetched"
        );

        let verdict = self
            .engine
            .scan_file(scratch.path())
            .await
            .map_err(|source| PipelineError::EngineFailure { source })?;
        info!(
            step = StepKind::Scan.as_str(),
            verdict = verdict.kind(),
            "scan complete"
        );

        let routed = self.route(object, verdict, bytes).await?;
        info!(
            step = StepKind::Route.as_str(),
            destination = %routed.destination_uri(),
            "object routed"
        );

        if routed.verdict().is_infected() {
            let payload = AlertPayload::for_detection(object, &routed);
            match self.notifier.notify(&payload).await {
                Ok(()) => info!(step = StepKind::Notify.as_str(), "alert delivered"),
                Err(err) => warn!(
                    step = StepKind::Notify.as_str(),
                    error = %err,
                    "alert delivery failed; run continues"
                ),
            }
        }

        self.cleanup_source(object, &routed).await?;
        info!(step = StepKind::CleanupSource.as_str(), "staging original removed");
        drop(scratch);
        Ok(routed)
    }

    /// Upload the content to exactly one of the two destinations.
    async fn route(
        &self,
        object: &ObjectRef,
        verdict: ScanVerdict,
        bytes: Vec<u8>,
    ) -> PipelineResult<RouteResult> {
        let destination = self.routing.destination_for(&verdict).to_string();
        let target = ObjectRef::new(destination.clone(), object.key.clone());
        self.store
            .put(&target, bytes)
            .await
            .map_err(|source| PipelineError::Route {
                destination: destination.clone(),
                key: object.key.clone(),
                source,
            })?;
        Ok(RouteResult::new(destination, object.key.clone(), verdict))
    }

    /// Delete the staging original.
    ///
    /// Takes the [`RouteResult`] so the delete is unreachable without a
    /// confirmed destination write.
    async fn cleanup_source(
        &self,
        object: &ObjectRef,
        _routed: &RouteResult,
    ) -> PipelineResult<()> {
        self.store
            .delete(object)
            .await
            .map_err(|source| PipelineError::Cleanup {
                bucket: object.bucket.clone(),
                key: object.key.clone(),
                source,
            })
    }
}
