//! ClamAV command-line implementation of the [`ScanEngine`] seam.
//!
//! `freshclam` refreshes the signature database into a shared directory;
//! `clamscan -d <dir> <file>` scans one file against it. ClamAV's documented
//! exit codes: `0` no virus, `1` virus found, `2` (or anything else) an engine
//! error.

use std::path::{Path, PathBuf};
use std::process::Output;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::ScanEngine;
use crate::error::{ScanError, ScanResult};
use crate::model::ScanVerdict;

/// clamscan exit status for "virus found".
const EXIT_INFECTED: i32 = 1;

/// Locations and binaries for the ClamAV tools.
#[derive(Debug, Clone)]
pub struct ClamAvConfig {
    /// Path to the `freshclam` binary.
    pub freshclam_bin: PathBuf,
    /// Path to the `clamscan` binary.
    pub clamscan_bin: PathBuf,
    /// Directory holding the signature database, shared across scans.
    pub signature_dir: PathBuf,
}

impl Default for ClamAvConfig {
    fn default() -> Self {
        Self {
            freshclam_bin: PathBuf::from("/usr/bin/freshclam"),
            clamscan_bin: PathBuf::from("/usr/bin/clamscan"),
            signature_dir: PathBuf::from("/tmp/clamgate/signatures"),
        }
    }
}

/// Detection engine backed by the ClamAV command-line tools.
pub struct ClamAvEngine {
    config: ClamAvConfig,
    // Serialises concurrent refreshes so two runs never race freshclam
    // against the same datadir.
    refresh_lock: Mutex<()>,
}

impl ClamAvEngine {
    /// Construct an engine from tool locations.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn new(config: ClamAvConfig) -> Self {
        Self {
            config,
            refresh_lock: Mutex::new(()),
        }
    }

    async fn run_freshclam(&self) -> ScanResult<Output> {
        tokio::fs::create_dir_all(&self.config.signature_dir)
            .await
            .map_err(|err| ScanError::SignatureUpdate {
                detail: format!(
                    "cannot create signature directory {}: {err}",
                    self.config.signature_dir.display()
                ),
            })?;
        Command::new(&self.config.freshclam_bin)
            .arg(format!("--datadir={}", self.config.signature_dir.display()))
            .arg("--stdout")
            .output()
            .await
            .map_err(|err| ScanError::Spawn {
                binary: self.config.freshclam_bin.clone(),
                source: err,
            })
    }
}

#[async_trait]
impl ScanEngine for ClamAvEngine {
    async fn update_signatures(&self) -> ScanResult<()> {
        let _guard = self.refresh_lock.lock().await;
        debug!(datadir = %self.config.signature_dir.display(), "refreshing signatures");
        let output = self.run_freshclam().await?;
        if output.status.success() {
            info!("signature set refreshed");
            Ok(())
        } else {
            Err(ScanError::SignatureUpdate {
                detail: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        }
    }

    async fn scan_file(&self, path: &Path) -> ScanResult<ScanVerdict> {
        debug!(path = %path.display(), "scanning file");
        let output = Command::new(&self.config.clamscan_bin)
            .arg("-d")
            .arg(&self.config.signature_dir)
            .arg(path)
            .output()
            .await
            .map_err(|err| ScanError::Spawn {
                binary: self.config.clamscan_bin.clone(),
                source: err,
            })?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        match output.status.code() {
            Some(0) => Ok(ScanVerdict::Clean),
            Some(EXIT_INFECTED) => Ok(ScanVerdict::Infected { report: stdout }),
            status => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(ScanError::EngineFailure {
                    status,
                    output: format!("{stdout}{stderr}"),
                })
            }
        }
    }
}
