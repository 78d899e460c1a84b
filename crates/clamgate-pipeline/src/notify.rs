//! Alert sink for detections.
//!
//! Best-effort by contract: the pipeline logs delivery failures and moves on.
//! A quarantined file must still be cleaned from the source even when the
//! alert could not be delivered.

use async_trait::async_trait;
use serde::Serialize;

use clamgate_scanner::ScanVerdict;
use clamgate_store::ObjectRef;

use crate::model::RouteResult;

/// Human-readable alert message, serialised as `{ "text": ... }`.
///
/// Derived and write-only; its lifetime is the single outbound call.
#[derive(Debug, Clone, Serialize)]
pub struct AlertPayload {
    /// Message body for the alert channel.
    pub text: String,
}

impl AlertPayload {
    /// Build the detection alert for a quarantined object.
    #[must_use]
    pub fn for_detection(object: &ObjectRef, routed: &RouteResult) -> Self {
        let report = match routed.verdict() {
            ScanVerdict::Infected { report } => report.as_str(),
            ScanVerdict::Clean => "",
        };
        Self {
            text: format!(
                ":rotating_light: *Malware detected!*\nFile: `{}`\nMoved to quarantine bucket: `{}`\nScan Output:\n```{}```",
                object.key,
                routed.destination_uri(),
                report
            ),
        }
    }
}

/// Fire-and-forget alert sink.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one alert.
    ///
    /// # Errors
    ///
    /// Returns any transport failure; the caller logs it and never escalates.
    async fn notify(&self, payload: &AlertPayload) -> anyhow::Result<()>;
}

/// Notifier posting the payload to a configured webhook URL.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    /// Construct a notifier for the given webhook URL.
    #[must_use]
    pub const fn new(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, payload: &AlertPayload) -> anyhow::Result<()> {
        self.client
            .post(&self.url)
            .json(payload)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_alert_contains_key_location_and_report() {
        let object = ObjectRef::new("staging", "uploads/evil.exe");
        let routed = RouteResult::new(
            "quarantine".into(),
            "uploads/evil.exe".into(),
            ScanVerdict::Infected {
                report: "uploads/evil.exe: Eicar-Signature FOUND".into(),
            },
        );
        let payload = AlertPayload::for_detection(&object, &routed);
        assert!(payload.text.contains("uploads/evil.exe"));
        assert!(payload.text.contains("gs://quarantine/uploads/evil.exe"));
        assert!(payload.text.contains("Eicar-Signature FOUND"));
    }
}
