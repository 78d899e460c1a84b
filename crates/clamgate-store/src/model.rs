//! Identity types for objects handled by the pipeline.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Immutable identity of an object in a store.
///
/// An `ObjectRef` is the sole identity key of a pipeline run: the same
/// `{bucket, key}` pair redelivered by the trigger transport re-describes the
/// same run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectRef {
    /// Name of the bucket holding the object.
    pub bucket: String,
    /// Full object key within the bucket.
    pub key: String,
}

impl ObjectRef {
    /// Construct a reference from a bucket name and object key.
    #[must_use]
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Canonical `gs://bucket/key` form used in logs and alerts.
    #[must_use]
    pub fn uri(&self) -> String {
        format!("gs://{}/{}", self.bucket, self.key)
    }
}

impl Display for ObjectRef {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "gs://{}/{}", self.bucket, self.key)
    }
}
