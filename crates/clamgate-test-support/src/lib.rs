//! Shared test helpers used across integration suites.
//! Layout: fixtures.rs (trigger envelope builders), mocks.rs (in-memory
//! store and scripted scan engine).
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

pub mod fixtures;
pub mod mocks;

pub use fixtures::push_envelope;
pub use mocks::{MemoryStore, ScriptedEngine};
