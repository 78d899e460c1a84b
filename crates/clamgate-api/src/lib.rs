//! HTTP entrypoint for the triage service.
//!
//! # Design
//! - `POST /` receives the push notification, decodes the envelope, and runs
//!   one pipeline run; response codes drive the transport's redelivery
//!   (`204` ack, `400` drop, `500` redeliver).
//! - `GET /healthz` is a liveness probe for the deployment platform.
//! - Pipeline runs are spawned onto the runtime so a routed object is still
//!   cleaned up even when the caller disconnects mid-request.
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

pub mod http;
pub mod state;

pub use http::router::{ApiServer, ApiServerError};
pub use state::ApiState;
