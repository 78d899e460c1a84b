//! Google Cloud Storage implementation of the [`ObjectStore`] seam.
//!
//! Talks to the GCS JSON API directly over `reqwest`: media download
//! (`alt=media`), simple media upload (`uploadType=media`), and object delete.
//! Credentials are resolved per request through a [`TokenSource`] so the store
//! works both on GCP (metadata server) and in local setups (static token).

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::ObjectStore;
use crate::error::{StoreError, StoreResult};
use crate::model::ObjectRef;

/// Public GCS JSON API endpoint.
const DEFAULT_BASE_URL: &str = "https://storage.googleapis.com";
/// GCE metadata-server endpoint issuing access tokens for the default
/// service account.
const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

/// Where the store obtains its bearer token.
#[derive(Debug, Clone)]
pub enum TokenSource {
    /// Fixed token supplied at startup (local development, emulators).
    Static(String),
    /// Fetch a short-lived token from the GCE metadata server per request.
    Metadata,
}

impl TokenSource {
    async fn bearer(&self, client: &reqwest::Client) -> StoreResult<String> {
        match self {
            Self::Static(token) => Ok(token.clone()),
            Self::Metadata => {
                let response = client
                    .get(METADATA_TOKEN_URL)
                    .header("Metadata-Flavor", "Google")
                    .send()
                    .await
                    .map_err(|err| StoreError::Credentials {
                        detail: format!("metadata server unreachable: {err}"),
                    })?;
                if !response.status().is_success() {
                    return Err(StoreError::Credentials {
                        detail: format!("metadata server status {}", response.status().as_u16()),
                    });
                }
                let token: MetadataToken =
                    response
                        .json()
                        .await
                        .map_err(|err| StoreError::Credentials {
                            detail: format!("invalid metadata token payload: {err}"),
                        })?;
                Ok(token.access_token)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct MetadataToken {
    access_token: String,
}

/// Object store backed by the GCS JSON API.
#[derive(Debug, Clone)]
pub struct GcsStore {
    client: reqwest::Client,
    base_url: String,
    token: TokenSource,
}

impl GcsStore {
    /// Construct a store using the public GCS endpoint.
    #[must_use]
    pub fn new(client: reqwest::Client, token: TokenSource) -> Self {
        Self::with_base_url(client, token, DEFAULT_BASE_URL)
    }

    /// Construct a store against a custom endpoint (emulators, tests).
    #[must_use]
    pub fn with_base_url(
        client: reqwest::Client,
        token: TokenSource,
        base_url: impl Into<String>,
    ) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client,
            base_url,
            token,
        }
    }

    fn media_url(&self, object: &ObjectRef) -> String {
        format!(
            "{}/storage/v1/b/{}/o/{}?alt=media",
            self.base_url,
            object.bucket,
            encode_key(&object.key)
        )
    }

    fn upload_url(&self, object: &ObjectRef) -> String {
        format!(
            "{}/upload/storage/v1/b/{}/o?uploadType=media&name={}",
            self.base_url,
            object.bucket,
            encode_key(&object.key)
        )
    }

    fn object_url(&self, object: &ObjectRef) -> String {
        format!(
            "{}/storage/v1/b/{}/o/{}",
            self.base_url,
            object.bucket,
            encode_key(&object.key)
        )
    }

    fn classify(
        operation: &'static str,
        url: &str,
        object: &ObjectRef,
        status: reqwest::StatusCode,
    ) -> StoreError {
        if status == reqwest::StatusCode::NOT_FOUND {
            StoreError::NotFound {
                bucket: object.bucket.clone(),
                key: object.key.clone(),
            }
        } else {
            StoreError::Status {
                operation,
                url: url.to_string(),
                status: status.as_u16(),
            }
        }
    }
}

#[async_trait]
impl ObjectStore for GcsStore {
    async fn get(&self, object: &ObjectRef) -> StoreResult<Vec<u8>> {
        let url = self.media_url(object);
        let bearer = self.token.bearer(&self.client).await?;
        debug!(object = %object, "downloading object");
        let response = self
            .client
            .get(&url)
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(|err| StoreError::Request {
                operation: "get",
                url: url.clone(),
                source: err,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(Self::classify("get", &url, object, status));
        }
        let bytes = response.bytes().await.map_err(|err| StoreError::Request {
            operation: "get",
            url,
            source: err,
        })?;
        Ok(bytes.to_vec())
    }

    async fn put(&self, object: &ObjectRef, bytes: Vec<u8>) -> StoreResult<()> {
        let url = self.upload_url(object);
        let bearer = self.token.bearer(&self.client).await?;
        debug!(object = %object, size = bytes.len(), "uploading object");
        let response = self
            .client
            .post(&url)
            .bearer_auth(bearer)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes)
            .send()
            .await
            .map_err(|err| StoreError::Request {
                operation: "put",
                url: url.clone(),
                source: err,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(Self::classify("put", &url, object, status));
        }
        Ok(())
    }

    async fn delete(&self, object: &ObjectRef) -> StoreResult<()> {
        let url = self.object_url(object);
        let bearer = self.token.bearer(&self.client).await?;
        debug!(object = %object, "deleting object");
        let response = self
            .client
            .delete(&url)
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(|err| StoreError::Request {
                operation: "delete",
                url: url.clone(),
                source: err,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(Self::classify("delete", &url, object, status));
        }
        Ok(())
    }
}

/// Percent-encode an object key for use as a single URL path segment.
///
/// Everything outside the RFC 3986 unreserved set is encoded, including `/`,
/// which the JSON API requires to be escaped inside object names.
fn encode_key(key: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut encoded = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                encoded.push(char::from(byte));
            }
            _ => {
                encoded.push('%');
                encoded.push(char::from(HEX[usize::from(byte >> 4)]));
                encoded.push(char::from(HEX[usize::from(byte & 0x0f)]));
            }
        }
    }
    encoded
}
