//! Content sniffing and body decoding.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use courier_domain::{MediaKind, ResponseData};
use indexmap::IndexMap;
use serde_json::Value;

const OCTET_STREAM: &str = "application/octet-stream";
const TEXT_PLAIN: &str = "text/plain";

/// Classified and decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedBody {
    /// Decoded payload.
    pub body: ResponseData,
    /// Media family the body belongs to.
    pub kind: MediaKind,
    /// Effective content type, after sniffing.
    pub content_type: Option<String>,
}

impl ClassifiedBody {
    /// Body is an image.
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.kind == MediaKind::Image
    }

    /// Body is a PDF.
    #[must_use]
    pub fn is_pdf(&self) -> bool {
        self.kind == MediaKind::Pdf
    }

    /// Body is audio.
    #[must_use]
    pub fn is_audio(&self) -> bool {
        self.kind == MediaKind::Audio
    }

    /// Body is video.
    #[must_use]
    pub fn is_video(&self) -> bool {
        self.kind == MediaKind::Video
    }
}

/// Detects a well-known binary format from its leading bytes.
///
/// Checked in order: PNG, JPEG, GIF, WEBP, BMP, PDF. First match wins.
#[must_use]
pub fn sniff(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        Some("image/png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(b"GIF8") {
        Some("image/gif")
    } else if bytes.starts_with(b"RIFF") && bytes.get(8..12) == Some(b"WEBP".as_slice()) {
        Some("image/webp")
    } else if bytes.starts_with(b"BM") {
        Some("image/bmp")
    } else if bytes.starts_with(b"%PDF") {
        Some("application/pdf")
    } else {
        None
    }
}

/// Lowercased `type/subtype` of a content-type header value.
#[must_use]
pub fn essence(content_type: &str) -> String {
    content_type.parse::<mime::Mime>().map_or_else(
        |_| {
            content_type
                .split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase()
        },
        |m| m.essence_str().to_ascii_lowercase(),
    )
}

/// Maps a content type to its media family.
#[must_use]
pub fn media_kind(content_type: &str) -> MediaKind {
    let essence = essence(content_type);
    if essence.starts_with("image/") {
        MediaKind::Image
    } else if essence == "application/pdf" {
        MediaKind::Pdf
    } else if essence.starts_with("audio/") {
        MediaKind::Audio
    } else if essence.starts_with("video/") {
        MediaKind::Video
    } else {
        MediaKind::Other
    }
}

/// Classifies and decodes a response body.
///
/// A sniffed type replaces the declared one only when the declared type is
/// missing, `application/octet-stream` or `text/plain`. Binary kinds are
/// base64-encoded; everything else is decoded as UTF-8 (lossy), with a JSON
/// parse attempt for `application/json`.
#[must_use]
pub fn classify(bytes: &[u8], headers: &IndexMap<String, String>) -> ClassifiedBody {
    let declared = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-type"))
        .map(|(_, v)| v.trim())
        .filter(|v| !v.is_empty());

    let overridable = declared.is_none_or(|d| {
        let e = essence(d);
        e == OCTET_STREAM || e == TEXT_PLAIN
    });
    let content_type = match sniff(bytes) {
        Some(sniffed) if overridable => Some(sniffed.to_string()),
        _ => declared.map(str::to_string),
    };

    let kind = content_type.as_deref().map_or(MediaKind::Other, media_kind);
    let body = if bytes.is_empty() {
        ResponseData::Empty
    } else if kind.is_binary() {
        ResponseData::Base64(STANDARD.encode(bytes))
    } else {
        decode_text(bytes, content_type.as_deref())
    };

    ClassifiedBody {
        body,
        kind,
        content_type,
    }
}

fn decode_text(bytes: &[u8], content_type: Option<&str>) -> ResponseData {
    let text = String::from_utf8_lossy(bytes).into_owned();
    if content_type.is_some_and(|ct| essence(ct) == "application/json") {
        if let Ok(value) = serde_json::from_str::<Value>(&text) {
            return ResponseData::Json(value);
        }
    }
    ResponseData::Text(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];

    fn headers(content_type: &str) -> IndexMap<String, String> {
        IndexMap::from([("content-type".to_string(), content_type.to_string())])
    }

    #[test]
    fn test_png_overrides_text_plain() {
        let out = classify(PNG, &headers("text/plain"));
        assert!(out.is_image());
        assert_eq!(out.content_type.as_deref(), Some("image/png"));
        assert!(matches!(out.body, ResponseData::Base64(_)));
    }

    #[test]
    fn test_sniff_order() {
        assert_eq!(sniff(&[0xFF, 0xD8, 0xFF, 0xE0]), Some("image/jpeg"));
        assert_eq!(sniff(b"GIF89a"), Some("image/gif"));
        assert_eq!(sniff(b"RIFF\0\0\0\0WEBPVP8 "), Some("image/webp"));
        assert_eq!(sniff(b"RIFF\0\0\0\0WAVE"), None);
        assert_eq!(sniff(b"BM\0\0"), Some("image/bmp"));
        assert_eq!(sniff(b"%PDF-1.7"), Some("application/pdf"));
        assert_eq!(sniff(b"{}"), None);
    }

    #[test]
    fn test_specific_declared_type_is_not_overridden() {
        let out = classify(PNG, &headers("image/svg+xml"));
        assert_eq!(out.content_type.as_deref(), Some("image/svg+xml"));
        assert!(out.is_image());

        let out = classify(b"%PDF-1.4", &headers("application/x-custom"));
        assert_eq!(out.content_type.as_deref(), Some("application/x-custom"));
        assert_eq!(out.kind, MediaKind::Other);
    }

    #[test]
    fn test_missing_content_type_uses_sniffed() {
        let out = classify(b"%PDF-1.4 ...", &IndexMap::new());
        assert!(out.is_pdf());
        assert_eq!(out.content_type.as_deref(), Some("application/pdf"));
    }

    #[test]
    fn test_declared_audio_and_video_are_binary() {
        assert!(classify(b"ID3...", &headers("audio/mpeg")).is_audio());
        let out = classify(b"\0\0\0 ftyp", &headers("video/mp4"));
        assert!(out.is_video());
        assert_eq!(out.body, ResponseData::Base64(STANDARD.encode(b"\0\0\0 ftyp")));
    }

    #[test]
    fn test_json_parsed_silently() {
        let out = classify(br#"{"ok": true}"#, &headers("application/json; charset=utf-8"));
        assert_eq!(out.body, ResponseData::Json(json!({"ok": true})));

        let out = classify(b"{not json", &headers("application/json"));
        assert_eq!(out.body, ResponseData::Text("{not json".to_string()));
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(classify(b"", &headers("text/html")).body, ResponseData::Empty);
    }
}
