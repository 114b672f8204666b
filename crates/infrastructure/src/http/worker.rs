//! Off-runtime response classification.
//!
//! Each large response gets its own short-lived OS thread. The thread owns a
//! copy of the bytes and headers, replies once over a oneshot channel and
//! exits. No pool, no shared state.

use async_trait::async_trait;
use courier_application::classifier::{ClassifiedBody, ClassifyError, ClassifyStrategy, classify};
use indexmap::IndexMap;
use tokio::sync::oneshot;
use tracing::{debug, error};

const WORKER_NAME: &str = "courier-classify";

/// Classifies on a dedicated thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkerClassifier;

#[async_trait]
impl ClassifyStrategy for WorkerClassifier {
    async fn classify(
        &self,
        bytes: Vec<u8>,
        headers: IndexMap<String, String>,
    ) -> Result<ClassifiedBody, ClassifyError> {
        let len = bytes.len();
        let result = run_on_worker(move || classify(&bytes, &headers)).await;
        debug!(len, ok = result.is_ok(), "worker classification finished");
        result
    }
}

/// Runs `job` on a fresh thread and waits for its single reply.
async fn run_on_worker<T, F>(job: F) -> Result<T, ClassifyError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    std::thread::Builder::new()
        .name(WORKER_NAME.to_string())
        .spawn(move || {
            // The receiver may be gone if the request was cancelled.
            let _ = tx.send(job());
        })
        .map_err(|e| ClassifyError::WorkerFailed(e.to_string()))?;

    rx.await.map_err(|_| {
        error!("classification worker exited without replying");
        ClassifyError::WorkerFailed("worker exited without replying".to_string())
    })
}
