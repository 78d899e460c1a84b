//! Run-scoped values: the scratch copy and the routing confirmation.

use std::path::{Path, PathBuf};

use tracing::warn;
use uuid::Uuid;

use clamgate_scanner::ScanVerdict;

use crate::error::PipelineError;

/// Local, run-owned working copy of the staging object.
///
/// Owned exclusively by one pipeline run; the backing file is removed when
/// the value drops, so no scratch copy outlives its run regardless of how
/// the run ends.
#[derive(Debug)]
pub struct ScratchCopy {
    path: PathBuf,
}

impl ScratchCopy {
    /// Write `bytes` into a run-unique file under `root`.
    ///
    /// The file name is the sanitised basename of the object key prefixed
    /// with the run id, so concurrent runs never collide and keys cannot
    /// traverse out of the scratch root.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::UnsafeKey`] when the key has no usable
    /// basename, and [`PipelineError::Scratch`] when the write fails.
    pub async fn write(
        root: &Path,
        run_id: Uuid,
        key: &str,
        bytes: &[u8],
    ) -> Result<Self, PipelineError> {
        let name = sanitize_basename(key).ok_or_else(|| PipelineError::UnsafeKey {
            key: key.to_string(),
        })?;
        let path = root.join(format!("{run_id}-{name}"));
        if path.parent() != Some(root) {
            return Err(PipelineError::UnsafeKey {
                key: key.to_string(),
            });
        }
        tokio::fs::create_dir_all(root)
            .await
            .map_err(|source| PipelineError::Scratch {
                key: key.to_string(),
                source,
            })?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| PipelineError::Scratch {
                key: key.to_string(),
                source,
            })?;
        Ok(Self { path })
    }

    /// Location of the scratch file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchCopy {
    fn drop(&mut self) {
        if let Err(err) = std::fs::remove_file(&self.path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %err, "failed to remove scratch copy");
            }
        }
    }
}

/// Reduce an object key to a safe scratch file basename.
///
/// Returns `None` for keys with no basename (empty, trailing separator,
/// `..` components at the end) or whose basename still carries a path
/// separator.
fn sanitize_basename(key: &str) -> Option<String> {
    let name = Path::new(key).file_name()?.to_str()?;
    if name.is_empty() || name == ".." || name.contains(['/', '\\']) {
        return None;
    }
    Some(name.to_string())
}

/// Proof that the object content was durably written to a destination.
///
/// Source cleanup takes this value as its sole entry ticket; there is no
/// other way to reach the delete step.
#[derive(Debug, Clone)]
pub struct RouteResult {
    destination_bucket: String,
    key: String,
    verdict: ScanVerdict,
}

impl RouteResult {
    pub(crate) const fn new(destination_bucket: String, key: String, verdict: ScanVerdict) -> Self {
        Self {
            destination_bucket,
            key,
            verdict,
        }
    }

    /// Bucket the content was uploaded to.
    #[must_use]
    pub fn destination_bucket(&self) -> &str {
        &self.destination_bucket
    }

    /// Key the content was uploaded under (same as the staging key).
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Verdict that selected the destination.
    #[must_use]
    pub const fn verdict(&self) -> &ScanVerdict {
        &self.verdict
    }

    /// Canonical `gs://bucket/key` form of the destination.
    #[must_use]
    pub fn destination_uri(&self) -> String {
        format!("gs://{}/{}", self.destination_bucket, self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_basename_only() {
        assert_eq!(
            sanitize_basename("uploads/2024/report.pdf"),
            Some("report.pdf".to_string())
        );
        assert_eq!(sanitize_basename("plain.bin"), Some("plain.bin".to_string()));
    }

    #[test]
    fn sanitize_rejects_traversal_shapes() {
        assert_eq!(sanitize_basename(""), None);
        assert_eq!(sanitize_basename("/"), None);
        assert_eq!(sanitize_basename(".."), None);
        assert_eq!(sanitize_basename("uploads/.."), None);
    }

    #[tokio::test]
    async fn scratch_copy_is_removed_on_drop() {
        let dir = tempfile::tempdir().expect("tempdir");
        let run_id = Uuid::new_v4();
        let scratch = ScratchCopy::write(dir.path(), run_id, "a/b.bin", b"payload")
            .await
            .expect("scratch write should succeed");
        let path = scratch.path().to_path_buf();
        assert!(path.exists());
        assert_eq!(path.parent(), Some(dir.path()));
        drop(scratch);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn concurrent_runs_get_distinct_scratch_names() {
        let dir = tempfile::tempdir().expect("tempdir");
        let first = ScratchCopy::write(dir.path(), Uuid::new_v4(), "same.bin", b"one")
            .await
            .expect("first scratch");
        let second = ScratchCopy::write(dir.path(), Uuid::new_v4(), "same.bin", b"two")
            .await
            .expect("second scratch");
        assert_ne!(first.path(), second.path());
    }

    #[tokio::test]
    async fn traversal_key_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = ScratchCopy::write(dir.path(), Uuid::new_v4(), "uploads/..", b"x")
            .await
            .expect_err("traversal key must fail");
        assert!(matches!(err, PipelineError::UnsafeKey { .. }));
    }
}
