//! Trigger envelope parsing.
//!
//! The inbound push transport wraps the storage event in a
//! `{ "message": { "data": "<base64>" } }` envelope; the base64 payload is
//! JSON with `bucket` and `name`. Decoding is pure and has no side effects:
//! on any structural violation the pipeline must not run.

use base64::{Engine as _, engine::general_purpose};
use serde::Deserialize;

use clamgate_store::ObjectRef;

use crate::error::DecodeError;

#[derive(Debug, Deserialize)]
struct PushEnvelope {
    message: PushMessage,
}

#[derive(Debug, Deserialize)]
struct PushMessage {
    data: String,
}

#[derive(Debug, Deserialize)]
struct ObjectEvent {
    bucket: String,
    name: String,
}

/// Parse an inbound push body into the staging object it describes.
///
/// # Errors
///
/// Returns a [`DecodeError`] when the wrapper, the base64 payload, or the
/// inner event JSON is malformed, or when `bucket`/`name` is empty.
pub fn decode_envelope(body: &[u8]) -> Result<ObjectRef, DecodeError> {
    let envelope: PushEnvelope =
        serde_json::from_slice(body).map_err(|err| DecodeError::Envelope {
            detail: err.to_string(),
        })?;
    let raw = general_purpose::STANDARD
        .decode(envelope.message.data.as_bytes())
        .map_err(|source| DecodeError::Base64 { source })?;
    let event: ObjectEvent =
        serde_json::from_slice(&raw).map_err(|err| DecodeError::Payload {
            detail: err.to_string(),
        })?;
    if event.bucket.is_empty() {
        return Err(DecodeError::EmptyField { field: "bucket" });
    }
    if event.name.is_empty() {
        return Err(DecodeError::EmptyField { field: "name" });
    }
    Ok(ObjectRef::new(event.bucket, event.name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope_for(payload: &serde_json::Value) -> Vec<u8> {
        let data = general_purpose::STANDARD.encode(payload.to_string());
        json!({ "message": { "data": data } }).to_string().into_bytes()
    }

    #[test]
    fn well_formed_envelope_recovers_bucket_and_name() {
        let body = envelope_for(&json!({ "bucket": "staging", "name": "uploads/a.bin" }));
        let object = decode_envelope(&body).expect("well-formed envelope should decode");
        assert_eq!(object, ObjectRef::new("staging", "uploads/a.bin"));
    }

    #[test]
    fn missing_message_wrapper_is_rejected() {
        let err = decode_envelope(br#"{"data": "eyJ9"}"#).expect_err("no wrapper");
        assert!(matches!(err, DecodeError::Envelope { .. }));
    }

    #[test]
    fn missing_data_field_is_rejected() {
        let err = decode_envelope(br#"{"message": {}}"#).expect_err("no data");
        assert!(matches!(err, DecodeError::Envelope { .. }));
    }

    #[test]
    fn non_json_body_is_rejected() {
        let err = decode_envelope(b"not json at all").expect_err("not json");
        assert!(matches!(err, DecodeError::Envelope { .. }));
    }

    #[test]
    fn invalid_base64_is_rejected() {
        let body = json!({ "message": { "data": "%%%not-base64%%%" } })
            .to_string()
            .into_bytes();
        let err = decode_envelope(&body).expect_err("bad base64");
        assert!(matches!(err, DecodeError::Base64 { .. }));
    }

    #[test]
    fn invalid_inner_json_is_rejected() {
        let data = general_purpose::STANDARD.encode("surprise, not json");
        let body = json!({ "message": { "data": data } }).to_string().into_bytes();
        let err = decode_envelope(&body).expect_err("bad inner json");
        assert!(matches!(err, DecodeError::Payload { .. }));
    }

    #[test]
    fn missing_event_fields_are_rejected() {
        let body = envelope_for(&json!({ "bucket": "staging" }));
        let err = decode_envelope(&body).expect_err("missing name");
        assert!(matches!(err, DecodeError::Payload { .. }));
    }

    #[test]
    fn empty_event_fields_are_rejected() {
        let body = envelope_for(&json!({ "bucket": "", "name": "a.bin" }));
        let err = decode_envelope(&body).expect_err("empty bucket");
        assert!(matches!(err, DecodeError::EmptyField { field: "bucket" }));

        let body = envelope_for(&json!({ "bucket": "staging", "name": "" }));
        let err = decode_envelope(&body).expect_err("empty name");
        assert!(matches!(err, DecodeError::EmptyField { field: "name" }));
    }
}
