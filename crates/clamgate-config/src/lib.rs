//! Environment-backed configuration for the triage service.
//!
//! # Design
//! - `AppConfig` is an immutable value constructed once at startup and
//!   injected into the pipeline; nothing reads process-wide state mid-run.
//! - Required values are validated at startup so a misconfigured deployment
//!   fails its first health check instead of its first infected upload.
//! - Layout: `model.rs` (typed config model), `loader.rs` (env lookup and
//!   validation), `error.rs` (error type).
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

pub mod error;
pub mod loader;
pub mod model;

pub use error::{ConfigError, ConfigResult};
pub use model::AppConfig;
