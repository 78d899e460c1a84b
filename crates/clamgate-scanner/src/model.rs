//! Verdict type produced by a scan.

use serde::{Deserialize, Serialize};

/// Outcome of scanning one scratch copy.
///
/// Produced exactly once per pipeline run and consumed exactly once by the
/// router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum ScanVerdict {
    /// No detection; the object may proceed to the clean destination.
    Clean,
    /// The engine flagged the object.
    Infected {
        /// The engine's textual report, captured verbatim for the alert.
        report: String,
    },
}

impl ScanVerdict {
    /// Machine-friendly discriminator for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Clean => "clean",
            Self::Infected { .. } => "infected",
        }
    }

    /// Whether the verdict is a detection.
    #[must_use]
    pub const fn is_infected(&self) -> bool {
        matches!(self, Self::Infected { .. })
    }
}
