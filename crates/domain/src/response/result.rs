//! Execution result handed back to the caller for every request.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Decoded response payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ResponseData {
    /// No body.
    #[default]
    Empty,
    /// UTF-8 text.
    Text(String),
    /// Parsed JSON.
    Json(Value),
    /// Base64 of a binary payload (image, PDF, audio, video).
    Base64(String),
    /// The body was streamed to disk.
    Saved {
        /// Human-readable summary.
        message: String,
        /// Destination path.
        path: String,
    },
}

impl ResponseData {
    /// Returns the text payload, if any.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Base64(s) => Some(s),
            _ => None,
        }
    }
}

/// Broad media family of a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    /// `image/*`.
    Image,
    /// `application/pdf`.
    Pdf,
    /// `audio/*`.
    Audio,
    /// `video/*`.
    Video,
    /// Anything decoded as text.
    Other,
}

impl MediaKind {
    /// Returns true for the kinds that are shipped as base64.
    #[must_use]
    pub const fn is_binary(self) -> bool {
        !matches!(self, Self::Other)
    }
}

/// Outcome of one request execution. Never persisted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct ExecutionResult {
    /// HTTP status; 0 when cancelled.
    pub status: u16,
    /// Reason phrase or error description.
    pub status_text: String,
    /// Response headers, names lowercased, in arrival order.
    pub headers: IndexMap<String, String>,
    /// Decoded body.
    pub data: ResponseData,
    /// Effective content type after sniffing.
    pub content_type: Option<String>,
    /// Body is an image.
    pub is_image: bool,
    /// Body is a PDF document.
    #[serde(rename = "isPDF")]
    pub is_pdf: bool,
    /// Body is audio.
    pub is_audio: bool,
    /// Body is video.
    pub is_video: bool,
    /// Transport failure or non-2xx status.
    pub is_error: bool,
    /// Cancelled by the caller.
    pub is_cancelled: bool,
}

impl ExecutionResult {
    /// Status reported when a failure carries no HTTP status of its own.
    pub const FALLBACK_ERROR_STATUS: u16 = 500;

    /// The result of a cancelled request.
    #[must_use]
    pub fn cancelled() -> Self {
        Self {
            status: 0,
            status_text: "Cancelled".to_string(),
            is_cancelled: true,
            ..Self::default()
        }
    }

    /// An error result for a failure that never produced a response.
    #[must_use]
    pub fn failure(status_text: impl Into<String>) -> Self {
        Self {
            status: Self::FALLBACK_ERROR_STATUS,
            status_text: status_text.into(),
            is_error: true,
            ..Self::default()
        }
    }

    /// Sets the media flags from a [`MediaKind`].
    pub fn set_media(&mut self, kind: MediaKind) {
        self.is_image = kind == MediaKind::Image;
        self.is_pdf = kind == MediaKind::Pdf;
        self.is_audio = kind == MediaKind::Audio;
        self.is_video = kind == MediaKind::Video;
    }
}
