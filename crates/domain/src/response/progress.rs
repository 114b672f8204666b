//! Download progress events.

use serde::{Deserialize, Serialize};

/// Phase reported by a progress event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStatus {
    /// Response body is being received.
    Downloading,
}

/// Progress of a response download whose total length is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadProgress {
    /// Phase.
    pub status: ProgressStatus,
    /// Whole percent, 0 to 100.
    pub progress: u8,
    /// Bytes received so far.
    pub loaded: u64,
    /// Declared total length.
    pub total: u64,
}

impl DownloadProgress {
    /// Builds a downloading event; `total` must be non-zero.
    #[must_use]
    pub fn downloading(loaded: u64, total: u64) -> Self {
        let percent = loaded.saturating_mul(100) / total.max(1);
        Self {
            status: ProgressStatus::Downloading,
            progress: u8::try_from(percent.min(100)).unwrap_or(100),
            loaded,
            total,
        }
    }
}
