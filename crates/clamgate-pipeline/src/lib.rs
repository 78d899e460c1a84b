//! Triage state machine for newly uploaded staging objects.
//!
//! One pipeline run covers one trigger event:
//! `SignaturesFresh → Fetched → Scanned → Routed → [Notified] → CleanedUp`.
//! The single correctness invariant is that the staging original is deleted
//! if and only if the content has already been durably copied to a
//! destination; cleanup therefore only accepts a [`RouteResult`] produced by
//! the router, never a raw flag. There is no in-pipeline retry: any failure
//! aborts the run and relies on the trigger transport's at-least-once
//! redelivery.
//!
//! Layout: `decode.rs` (trigger envelope parsing), `model.rs` (run-scoped
//! values), `notify.rs` (alert sink), `pipeline.rs` (the state machine),
//! `error.rs` (failure taxonomy).
#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]

pub mod decode;
pub mod error;
pub mod model;
pub mod notify;
pub mod pipeline;

pub use decode::decode_envelope;
pub use error::{DecodeError, PipelineError, PipelineResult};
pub use model::{RouteResult, ScratchCopy};
pub use notify::{AlertPayload, Notifier, WebhookNotifier};
pub use pipeline::{RoutingConfig, TriagePipeline};
