//! Request executor backed by reqwest.
//!
//! Implements the `RequestExecutor` port. Every outcome other than a malformed
//! URL or an oversized response comes back as an [`ExecutionResult`]:
//! transport errors, non-2xx statuses, worker failures and cancellation.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use courier_application::classifier::{ClassifyStrategy, InlineClassifier, ThresholdClassifier};
use courier_application::ports::{
    ExecuteError, ExecutionRequest, ProgressCallback, RequestExecutor,
};
use courier_domain::{BodyMode, ClientSettings, DownloadProgress, ExecutionResult, ResponseData};
use indexmap::IndexMap;
use reqwest::{Client, Method, Response, Url};
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::http::{WorkerClassifier, build_body};

/// Request header naming the stream destination. Never sent on the wire.
pub const SAVE_PATH_HEADER: &str = "x-save-path";

/// Request executor using reqwest.
#[derive(Clone)]
pub struct ReqwestExecutor {
    client: Client,
    settings: ClientSettings,
    classifier: Arc<dyn ClassifyStrategy>,
}

impl std::fmt::Debug for ReqwestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestExecutor")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl ReqwestExecutor {
    /// Creates an executor from settings.
    ///
    /// Bodies larger than `offload_threshold_bytes` are classified on a worker
    /// thread; smaller ones inline.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(settings: ClientSettings) -> Result<Self, reqwest::Error> {
        let redirect = if settings.max_redirects == 0 {
            reqwest::redirect::Policy::none()
        } else {
            reqwest::redirect::Policy::limited(settings.max_redirects)
        };
        let client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .redirect(redirect)
            .build()?;
        let classifier = Arc::new(ThresholdClassifier::new(
            InlineClassifier,
            WorkerClassifier,
            settings.offload_threshold_bytes,
        ));
        Ok(Self {
            client,
            settings,
            classifier,
        })
    }

    /// Replaces the classification strategy.
    #[must_use]
    pub fn with_classifier(mut self, classifier: Arc<dyn ClassifyStrategy>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Returns the settings in use.
    #[must_use]
    pub const fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    async fn run(
        &self,
        mut request: ExecutionRequest,
        url: Url,
        progress: Option<ProgressCallback>,
    ) -> Result<ExecutionResult, ExecuteError> {
        let Ok(method) = Method::from_bytes(request.method.as_bytes()) else {
            return Ok(ExecutionResult::failure(format!(
                "Invalid method: {}",
                request.method
            )));
        };

        let header_path = take_header(&mut request.headers, SAVE_PATH_HEADER);
        let stream_path = if request.body_mode == BodyMode::Stream {
            header_path
                .map(PathBuf::from)
                .or_else(|| request.stream_path.take())
        } else {
            None
        };

        let body = match build_body(&request.body, request.body_mode).await {
            Ok(body) => body,
            Err(e) => return Ok(ExecutionResult::failure(e.to_string())),
        };
        let replaces_content_type = body.replaces_content_type();
        let mut has_content_type = false;

        let timeout = request.timeout.unwrap_or_else(|| self.settings.timeout());
        let mut builder = self.client.request(method, url).timeout(timeout);
        for (name, value) in &request.headers {
            if name.eq_ignore_ascii_case("content-type") {
                if replaces_content_type {
                    continue;
                }
                has_content_type = true;
            }
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = body.apply(builder, has_content_type);

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "request failed");
                return Ok(ExecutionResult::failure(describe_error(&e, timeout)));
            }
        };

        match stream_path {
            Some(path) => Ok(self.save_to_file(response, &path, progress).await),
            None => self.buffer(response, progress).await,
        }
    }

    async fn buffer(
        &self,
        mut response: Response,
        progress: Option<ProgressCallback>,
    ) -> Result<ExecutionResult, ExecuteError> {
        let limit = self.settings.max_buffer_bytes;
        let total = response.content_length();
        if let Some(declared) = total.filter(|len| *len > limit) {
            warn!(declared, limit, "response exceeds buffering ceiling");
            return Err(ExecuteError::ResponseTooLarge { declared, limit });
        }

        let mut result = response_head(&response);
        let mut reporter = Reporter::new(total, progress);
        let mut bytes = Vec::with_capacity(usize::try_from(total.unwrap_or(0)).unwrap_or(0));
        loop {
            match response.chunk().await {
                Ok(Some(chunk)) => {
                    bytes.extend_from_slice(&chunk);
                    let loaded = bytes.len() as u64;
                    if loaded > limit {
                        warn!(loaded, limit, "response exceeds buffering ceiling");
                        return Err(ExecuteError::ResponseTooLarge {
                            declared: loaded,
                            limit,
                        });
                    }
                    reporter.report(loaded);
                }
                Ok(None) => break,
                Err(e) => {
                    result.status_text = format!("Failed to read body: {e}");
                    result.is_error = true;
                    return Ok(result);
                }
            }
        }

        match self.classifier.classify(bytes, result.headers.clone()).await {
            Ok(classified) => {
                result.set_media(classified.kind);
                result.content_type = classified.content_type;
                result.data = classified.body;
            }
            Err(e) => {
                warn!(error = %e, "response classification failed");
                result.status_text = e.to_string();
                result.is_error = true;
            }
        }
        info!(status = result.status, "response received");
        Ok(result)
    }

    async fn save_to_file(
        &self,
        mut response: Response,
        path: &Path,
        progress: Option<ProgressCallback>,
    ) -> ExecutionResult {
        let mut result = response_head(&response);
        let mut reporter = Reporter::new(response.content_length(), progress);

        match write_stream(&mut response, path, &mut reporter).await {
            Ok(written) => {
                let shown = path.display().to_string();
                info!(path = %shown, bytes = written, "response saved to file");
                result.data = ResponseData::Saved {
                    message: format!("Saved {written} bytes to {shown}"),
                    path: shown,
                };
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to save response");
                result.status_text = format!("Failed to save response: {e}");
                result.is_error = true;
            }
        }
        result
    }
}

#[async_trait]
impl RequestExecutor for ReqwestExecutor {
    async fn execute(
        &self,
        request: ExecutionRequest,
        progress: Option<ProgressCallback>,
    ) -> Result<ExecutionResult, ExecuteError> {
        let url = Url::parse(&request.url)
            .map_err(|e| ExecuteError::InvalidUrl(format!("{e}: {}", request.url)))?;
        let cancel = request.cancel.clone().unwrap_or_else(CancellationToken::new);
        debug!(method = %request.method, url = %url, mode = %request.body_mode, "executing request");

        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                info!("request cancelled");
                Ok(ExecutionResult::cancelled())
            }
            result = self.run(request, url, progress) => result,
        }
    }
}

/// Removes a header, ignoring case, and returns its value.
fn take_header(headers: &mut IndexMap<String, String>, name: &str) -> Option<String> {
    let key = headers.keys().find(|k| k.eq_ignore_ascii_case(name))?.clone();
    headers.shift_remove(&key)
}

/// Status, reason and headers of a response, before the body is read.
fn response_head(response: &Response) -> ExecutionResult {
    let status = response.status();
    let mut headers: IndexMap<String, String> = IndexMap::new();
    for (name, value) in response.headers() {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        headers
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    ExecutionResult {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or_default().to_string(),
        content_type: headers.get("content-type").cloned(),
        headers,
        is_error: !status.is_success(),
        ..ExecutionResult::default()
    }
}

fn describe_error(error: &reqwest::Error, timeout: Duration) -> String {
    if error.is_timeout() {
        format!("Request timed out after {} ms", timeout.as_millis())
    } else if error.is_connect() {
        format!("Connection failed: {error}")
    } else if error.is_redirect() {
        format!("Too many redirects: {error}")
    } else {
        error.to_string()
    }
}

/// Emits progress events while the total length is known.
struct Reporter {
    total: Option<u64>,
    callback: Option<ProgressCallback>,
    last: Option<u8>,
}

impl Reporter {
    fn new(total: Option<u64>, callback: Option<ProgressCallback>) -> Self {
        Self {
            total: total.filter(|t| *t > 0),
            callback,
            last: None,
        }
    }

    fn report(&mut self, loaded: u64) {
        let (Some(total), Some(callback)) = (self.total, &self.callback) else {
            return;
        };
        let event = DownloadProgress::downloading(loaded.min(total), total);
        if self.last.is_some_and(|last| event.progress < last) {
            return;
        }
        self.last = Some(event.progress);
        callback(event);
    }
}

async fn write_stream(
    response: &mut Response,
    path: &Path,
    reporter: &mut Reporter,
) -> std::io::Result<u64> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir).await?;
    }
    let mut file = tokio::fs::File::create(path).await?;
    let mut written = 0u64;
    while let Some(chunk) = response.chunk().await.map_err(std::io::Error::other)? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
        reporter.report(written);
    }
    file.flush().await?;
    Ok(written)
}
