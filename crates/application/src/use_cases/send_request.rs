//! Send request use case.

use std::sync::Arc;
use std::time::Duration;

use courier_domain::{EnvironmentVariable, ExecutionResult, RequestSpec};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::encoder::encode;
use crate::error::ApplicationResult;
use crate::ports::{ProgressCallback, RequestExecutor};
use crate::variables::{apply_to_request, find_unresolved};

/// Input for sending one request.
#[derive(Clone, Default)]
pub struct SendRequestInput {
    /// The stored request.
    pub request: RequestSpec,
    /// Active environment entries.
    pub environment: Vec<EnvironmentVariable>,
    /// Overrides the executor timeout.
    pub timeout: Option<Duration>,
    /// Cancellation signal.
    pub cancel: Option<CancellationToken>,
    /// Download progress listener.
    pub progress: Option<ProgressCallback>,
}

impl SendRequestInput {
    /// Creates an input for `request` with no environment.
    #[must_use]
    pub fn new(request: RequestSpec) -> Self {
        Self {
            request,
            ..Self::default()
        }
    }

    /// Sets the environment.
    #[must_use]
    pub fn with_environment(mut self, environment: Vec<EnvironmentVariable>) -> Self {
        self.environment = environment;
        self
    }
}

/// Use case that substitutes variables, encodes and executes a request.
pub struct SendRequest<E: RequestExecutor> {
    executor: Arc<E>,
}

impl<E: RequestExecutor> SendRequest<E> {
    /// Creates a new `SendRequest` use case.
    #[must_use]
    pub const fn new(executor: Arc<E>) -> Self {
        Self { executor }
    }

    /// Runs the request.
    ///
    /// # Errors
    ///
    /// Returns an error when the request has no URL, the URL is invalid, or
    /// the response exceeds the buffering ceiling. Transport failures,
    /// non-2xx statuses and cancellation come back as an [`ExecutionResult`].
    pub async fn execute(&self, input: SendRequestInput) -> ApplicationResult<ExecutionResult> {
        let resolved = apply_to_request(&input.request, &input.environment);
        let unresolved = find_unresolved(&resolved.url, &input.environment);
        if !unresolved.is_empty() {
            warn!(variables = ?unresolved, "unresolved variables in URL");
        }

        let mut wire = encode(&resolved)?;
        wire.timeout = input.timeout;
        wire.cancel = input.cancel;

        info!(method = %wire.method, url = %wire.url, "sending request");
        let result = self.executor.execute(wire, input.progress).await?;
        info!(
            status = result.status,
            error = result.is_error,
            cancelled = result.is_cancelled,
            "request finished"
        );
        Ok(result)
    }
}
