//! Builders for inbound trigger envelopes.

use base64::{Engine as _, engine::general_purpose};
use serde_json::json;

/// Build a well-formed push envelope for a storage event.
#[must_use]
pub fn push_envelope(bucket: &str, name: &str) -> Vec<u8> {
    let payload = json!({ "bucket": bucket, "name": name }).to_string();
    let data = general_purpose::STANDARD.encode(payload);
    json!({ "message": { "data": data } }).to_string().into_bytes()
}
