//! Request executor port.
//!
//! The executor is the only component that talks to the network. It receives a
//! fully encoded [`ExecutionRequest`] and reports back through an
//! [`ExecutionResult`]. Transport failures, non-2xx statuses and cancellation
//! are all expressed as results, never as errors.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use courier_domain::{BodyMode, DownloadProgress, ExecutionResult};
use indexmap::IndexMap;
use serde_json::Value;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Reference to a local file that must be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    /// Path on the local filesystem.
    pub src: String,
}

impl FileDescriptor {
    /// Creates a new descriptor.
    #[must_use]
    pub fn new(src: impl Into<String>) -> Self {
        Self { src: src.into() }
    }

    /// Reads a `{"src": ..., "type": "file"}` object.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        if obj.get("type").and_then(Value::as_str) != Some("file") {
            return None;
        }
        obj.get("src").and_then(Value::as_str).map(Self::new)
    }

    /// Writes the descriptor as a `{"src": ..., "type": "file"}` object.
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::json!({ "src": self.src, "type": "file" })
    }
}

/// Encoded body payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestPayload {
    /// No body.
    #[default]
    None,
    /// Text body sent as-is.
    Text(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// Named fields for form-data or urlencoded bodies. File fields hold a
    /// [`FileDescriptor`] object.
    Fields(IndexMap<String, Value>),
    /// Upload the content of one file.
    File(FileDescriptor),
}

impl RequestPayload {
    /// Returns true when there is nothing to send.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Request ready for transmission.
#[derive(Debug, Clone, Default)]
pub struct ExecutionRequest {
    /// Absolute URL with the query string already attached.
    pub url: String,
    /// HTTP method, uppercase.
    pub method: String,
    /// Header map in insertion order.
    pub headers: IndexMap<String, String>,
    /// Encoded body.
    pub body: RequestPayload,
    /// Body mode the payload was produced from.
    pub body_mode: BodyMode,
    /// Overrides the client timeout when set.
    pub timeout: Option<Duration>,
    /// Stream the response body to this path instead of buffering it.
    pub stream_path: Option<PathBuf>,
    /// Cancellation signal for this execution.
    pub cancel: Option<CancellationToken>,
}

impl ExecutionRequest {
    /// Returns the header value for `name`, compared case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if a header named `name` is present, ignoring case.
    #[must_use]
    pub fn has_header(&self, name: &str) -> bool {
        self.header(name).is_some()
    }
}

/// Errors an executor returns instead of a result.
#[derive(Debug, Error)]
pub enum ExecuteError {
    /// The URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The response is larger than the buffering ceiling.
    #[error(
        "Response too large ({declared} bytes, limit {limit} bytes). Use stream mode to save it to a file."
    )]
    ResponseTooLarge {
        /// Declared or observed size in bytes.
        declared: u64,
        /// Configured ceiling in bytes.
        limit: u64,
    },
}

/// Callback receiving download progress updates.
pub type ProgressCallback = Arc<dyn Fn(DownloadProgress) + Send + Sync>;

/// Port for sending HTTP requests.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    /// Sends the request and classifies the response.
    ///
    /// # Errors
    ///
    /// Returns an error only for an unparseable URL or a response that exceeds
    /// the buffering ceiling. Everything else is reported in the result.
    async fn execute(
        &self,
        request: ExecutionRequest,
        progress: Option<ProgressCallback>,
    ) -> Result<ExecutionResult, ExecuteError>;
}
