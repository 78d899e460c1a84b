//! HTTP surface: router, handlers, and error mapping.

pub mod errors;
pub mod health;
pub mod router;
pub mod triage;
