//! Fake capability implementations for pipeline and API tests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use clamgate_scanner::{ScanEngine, ScanError, ScanResult, ScanVerdict};
use clamgate_store::{ObjectRef, ObjectStore, StoreError, StoreResult};

/// In-memory object store with per-operation failure injection.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<(String, String), Vec<u8>>>,
    fail_get: AtomicBool,
    fail_put: AtomicBool,
    fail_delete: AtomicBool,
}

impl MemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object directly into a bucket.
    pub fn insert(&self, bucket: &str, key: &str, bytes: Vec<u8>) {
        self.objects
            .lock()
            .expect("memory store poisoned")
            .insert((bucket.to_string(), key.to_string()), bytes);
    }

    /// Content of an object, when present.
    #[must_use]
    pub fn bytes(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .expect("memory store poisoned")
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    /// Whether an object exists.
    #[must_use]
    pub fn contains(&self, bucket: &str, key: &str) -> bool {
        self.bytes(bucket, key).is_some()
    }

    /// Make every subsequent `get` fail with a transient status.
    pub fn fail_get(&self, fail: bool) {
        self.fail_get.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `put` fail with a transient status.
    pub fn fail_put(&self, fail: bool) {
        self.fail_put.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `delete` fail with a transient status.
    pub fn fail_delete(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }

    fn injected(operation: &'static str) -> StoreError {
        StoreError::Status {
            operation,
            url: format!("memory://{operation}"),
            status: 503,
        }
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn get(&self, object: &ObjectRef) -> StoreResult<Vec<u8>> {
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(Self::injected("get"));
        }
        self.bytes(&object.bucket, &object.key)
            .ok_or_else(|| StoreError::NotFound {
                bucket: object.bucket.clone(),
                key: object.key.clone(),
            })
    }

    async fn put(&self, object: &ObjectRef, bytes: Vec<u8>) -> StoreResult<()> {
        if self.fail_put.load(Ordering::SeqCst) {
            return Err(Self::injected("put"));
        }
        self.insert(&object.bucket, &object.key, bytes);
        Ok(())
    }

    async fn delete(&self, object: &ObjectRef) -> StoreResult<()> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(Self::injected("delete"));
        }
        let removed = self
            .objects
            .lock()
            .expect("memory store poisoned")
            .remove(&(object.bucket.clone(), object.key.clone()));
        if removed.is_some() {
            Ok(())
        } else {
            Err(StoreError::NotFound {
                bucket: object.bucket.clone(),
                key: object.key.clone(),
            })
        }
    }
}

/// Scan engine that replays a scripted verdict and counts its calls.
#[derive(Debug)]
pub struct ScriptedEngine {
    verdict: ScanVerdict,
    fail_update: AtomicBool,
    fail_scan: AtomicBool,
    update_calls: AtomicUsize,
    scan_calls: AtomicUsize,
}

impl ScriptedEngine {
    /// Engine that clears every file.
    #[must_use]
    pub fn clean() -> Self {
        Self::with_verdict(ScanVerdict::Clean)
    }

    /// Engine that flags every file with the given report.
    #[must_use]
    pub fn infected(report: &str) -> Self {
        Self::with_verdict(ScanVerdict::Infected {
            report: report.to_string(),
        })
    }

    /// Engine replaying an arbitrary verdict.
    #[must_use]
    pub const fn with_verdict(verdict: ScanVerdict) -> Self {
        Self {
            verdict,
            fail_update: AtomicBool::new(false),
            fail_scan: AtomicBool::new(false),
            update_calls: AtomicUsize::new(0),
            scan_calls: AtomicUsize::new(0),
        }
    }

    /// Make every subsequent signature refresh fail.
    pub fn fail_update(&self, fail: bool) {
        self.fail_update.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent scan fail as an engine error.
    pub fn fail_scan(&self, fail: bool) {
        self.fail_scan.store(fail, Ordering::SeqCst);
    }

    /// Number of signature refreshes performed.
    #[must_use]
    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    /// Number of scans performed.
    #[must_use]
    pub fn scan_calls(&self) -> usize {
        self.scan_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScanEngine for ScriptedEngine {
    async fn update_signatures(&self) -> ScanResult<()> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(ScanError::SignatureUpdate {
                detail: "scripted refresh failure".into(),
            });
        }
        Ok(())
    }

    async fn scan_file(&self, path: &Path) -> ScanResult<ScanVerdict> {
        self.scan_calls.fetch_add(1, Ordering::SeqCst);
        assert!(
            path.exists(),
            "scan invoked without a scratch copy at {}",
            path.display()
        );
        if self.fail_scan.load(Ordering::SeqCst) {
            return Err(ScanError::EngineFailure {
                status: Some(2),
                output: "scripted engine failure".into(),
            });
        }
        Ok(self.verdict.clone())
    }
}
