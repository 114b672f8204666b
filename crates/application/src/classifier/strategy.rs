//! Classification strategies.
//!
//! The inline and worker strategies run the same [`classify`] function; the
//! payload size only decides where it runs.

use async_trait::async_trait;
use indexmap::IndexMap;
use thiserror::Error;

use super::sniff::{ClassifiedBody, classify};

/// Errors from a classification strategy.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClassifyError {
    /// The worker panicked or went away without replying.
    #[error("response worker failed: {0}")]
    WorkerFailed(String),
}

/// Where and how a response body gets classified.
#[async_trait]
pub trait ClassifyStrategy: Send + Sync {
    /// Classifies `bytes`. Takes ownership so the work can move to another thread.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::WorkerFailed`] when off-thread work fails.
    async fn classify(
        &self,
        bytes: Vec<u8>,
        headers: IndexMap<String, String>,
    ) -> Result<ClassifiedBody, ClassifyError>;
}

/// Returns true when a payload of `len` bytes should leave the async runtime.
#[must_use]
pub const fn should_offload(len: usize, threshold: usize) -> bool {
    len > threshold
}

/// Classifies on the calling task.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineClassifier;

#[async_trait]
impl ClassifyStrategy for InlineClassifier {
    async fn classify(
        &self,
        bytes: Vec<u8>,
        headers: IndexMap<String, String>,
    ) -> Result<ClassifiedBody, ClassifyError> {
        Ok(classify(&bytes, &headers))
    }
}

/// Picks `inline` for small payloads and `offload` for large ones.
#[derive(Debug, Clone)]
pub struct ThresholdClassifier<I, O> {
    inline: I,
    offload: O,
    threshold: usize,
}

impl<I: ClassifyStrategy, O: ClassifyStrategy> ThresholdClassifier<I, O> {
    /// Creates a dispatcher with the given threshold in bytes.
    #[must_use]
    pub const fn new(inline: I, offload: O, threshold: usize) -> Self {
        Self {
            inline,
            offload,
            threshold,
        }
    }
}

#[async_trait]
impl<I: ClassifyStrategy, O: ClassifyStrategy> ClassifyStrategy for ThresholdClassifier<I, O> {
    async fn classify(
        &self,
        bytes: Vec<u8>,
        headers: IndexMap<String, String>,
    ) -> Result<ClassifiedBody, ClassifyError> {
        if should_offload(bytes.len(), self.threshold) {
            tracing::debug!(len = bytes.len(), "classifying off the runtime");
            self.offload.classify(bytes, headers).await
        } else {
            self.inline.classify(bytes, headers).await
        }
    }
}
