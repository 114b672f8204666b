//! HTTP request body builder.
//!
//! Turns an encoded [`RequestPayload`] into something reqwest can send.
//! Files are streamed from disk and only after [`validate_file_path`] confirms
//! a regular file; anything that fails validation degrades to a literal value
//! (form-data) or to no body (binary).

use std::path::Path;

use courier_application::ports::{FileDescriptor, RequestPayload};
use courier_domain::BodyMode;
use indexmap::IndexMap;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, RequestBuilder};
use serde_json::Value;
use tokio_util::io::ReaderStream;
use tracing::debug;

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Error type for body building operations.
#[derive(Debug, thiserror::Error)]
pub enum BodyBuildError {
    /// A validated file could not be opened.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        /// The file path.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid MIME type for a part.
    #[error("Invalid MIME type: {0}")]
    InvalidMime(String),
}

/// Result of building a body.
pub enum BuiltBody {
    /// No body.
    None,
    /// Text body; `content_type` replaces any caller header when set.
    Text {
        /// The text.
        content: String,
        /// Forced content type.
        content_type: Option<String>,
    },
    /// Raw bytes.
    Binary(Vec<u8>),
    /// A file streamed from disk.
    File {
        /// Streaming body.
        body: Body,
        /// Content type guessed from the file name, used when the caller set none.
        content_type: String,
    },
    /// Multipart form data; reqwest sets the boundary header.
    Multipart(Form),
}

impl std::fmt::Debug for BuiltBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Text { content, content_type } => f
                .debug_struct("Text")
                .field("content", content)
                .field("content_type", content_type)
                .finish(),
            Self::Binary(bytes) => write!(f, "Binary({} bytes)", bytes.len()),
            Self::File { content_type, .. } => write!(f, "File({content_type})"),
            Self::Multipart(_) => write!(f, "Multipart"),
        }
    }
}

impl BuiltBody {
    /// Check if this is a multipart form.
    #[must_use]
    pub const fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart(_))
    }

    /// Check if this body is empty/none.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Returns true when the body sets its own content type, so a caller
    /// supplied one must be dropped.
    #[must_use]
    pub const fn replaces_content_type(&self) -> bool {
        matches!(
            self,
            Self::Multipart(_)
                | Self::Text {
                    content_type: Some(_),
                    ..
                }
        )
    }

    /// Attaches the body to `builder`.
    ///
    /// `has_content_type` tells whether the caller already set a content type.
    #[must_use]
    pub fn apply(self, builder: RequestBuilder, has_content_type: bool) -> RequestBuilder {
        match self {
            Self::None => builder,
            Self::Text {
                content,
                content_type,
            } => match content_type {
                Some(ct) => builder.header(CONTENT_TYPE, ct).body(content),
                None => builder.body(content),
            },
            Self::Binary(bytes) => builder.body(bytes),
            Self::File { body, content_type } => {
                if has_content_type {
                    builder.body(body)
                } else {
                    builder.header(CONTENT_TYPE, content_type).body(body)
                }
            }
            Self::Multipart(form) => builder.multipart(form),
        }
    }
}

/// Returns true when `path` exists and is a regular file.
pub async fn validate_file_path(path: impl AsRef<Path>) -> bool {
    tokio::fs::metadata(path)
        .await
        .is_ok_and(|meta| meta.is_file())
}

fn looks_like_path(value: &str) -> bool {
    value.contains('/') || value.contains('\\')
}

fn has_file_descriptor(fields: &IndexMap<String, Value>) -> bool {
    fields
        .values()
        .any(|v| FileDescriptor::from_value(v).is_some())
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Builds the body for `payload` sent in `mode`.
///
/// # Errors
///
/// Returns an error when a validated file cannot be opened, a field map
/// cannot be serialized, or a part gets an unusable MIME type.
pub async fn build_body(payload: &RequestPayload, mode: BodyMode) -> Result<BuiltBody, BodyBuildError> {
    match payload {
        RequestPayload::None => Ok(BuiltBody::None),
        RequestPayload::Fields(fields) if mode == BodyMode::FormData || has_file_descriptor(fields) => {
            build_multipart_form(fields).await.map(BuiltBody::Multipart)
        }
        RequestPayload::Fields(fields) if mode == BodyMode::UrlEncoded => {
            let pairs: Vec<(&str, String)> = fields
                .iter()
                .map(|(k, v)| (k.as_str(), as_text(v)))
                .collect();
            let encoded = serde_urlencoded::to_string(&pairs)
                .map_err(|e| BodyBuildError::Serialization(e.to_string()))?;
            Ok(BuiltBody::Text {
                content: encoded,
                content_type: Some(FORM_URLENCODED.to_string()),
            })
        }
        RequestPayload::Fields(fields) => {
            let content = serde_json::to_string(fields)
                .map_err(|e| BodyBuildError::Serialization(e.to_string()))?;
            Ok(BuiltBody::Text {
                content,
                content_type: None,
            })
        }
        RequestPayload::File(descriptor) => {
            if !validate_file_path(&descriptor.src).await {
                debug!(path = %descriptor.src, "binary body file not found, sending no body");
                return Ok(BuiltBody::None);
            }
            let (body, _) = open_stream(&descriptor.src).await?;
            Ok(BuiltBody::File {
                body,
                content_type: guess_mime(&descriptor.src),
            })
        }
        RequestPayload::Text(text) => Ok(BuiltBody::Text {
            content: text.clone(),
            content_type: None,
        }),
        RequestPayload::Bytes(bytes) => Ok(BuiltBody::Binary(bytes.clone())),
    }
}

/// Build a multipart form from encoded fields.
async fn build_multipart_form(fields: &IndexMap<String, Value>) -> Result<Form, BodyBuildError> {
    let mut form = Form::new();

    for (name, value) in fields {
        let candidate = match value {
            Value::String(s) if looks_like_path(s) => Some(s.clone()),
            other => FileDescriptor::from_value(other).map(|d| d.src),
        };

        form = match candidate {
            Some(path) => {
                if validate_file_path(&path).await {
                    form.part(name.clone(), file_part(&path).await?)
                } else {
                    debug!(field = %name, path = %path, "not a readable file, sending as text");
                    form.text(name.clone(), path)
                }
            }
            None => form.text(name.clone(), as_text(value)),
        };
    }

    Ok(form)
}

async fn file_part(path: &str) -> Result<Part, BodyBuildError> {
    let (body, length) = open_stream(path).await?;
    let filename = Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file")
        .to_string();
    Part::stream_with_length(body, length)
        .file_name(filename)
        .mime_str(&guess_mime(path))
        .map_err(|e| BodyBuildError::InvalidMime(e.to_string()))
}

async fn open_stream(path: &str) -> Result<(Body, u64), BodyBuildError> {
    let map_err = |source| BodyBuildError::FileRead {
        path: path.to_string(),
        source,
    };
    let file = tokio::fs::File::open(path).await.map_err(map_err)?;
    let length = file.metadata().await.map_err(map_err)?.len();
    Ok((Body::wrap_stream(ReaderStream::new(file)), length))
}

fn guess_mime(path: &str) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .to_string()
}
