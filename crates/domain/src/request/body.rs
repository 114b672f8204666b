//! Request body types
//!
//! The content of a body depends on its mode, so each mode is its own variant
//! instead of a loosely typed value. Conversions between modes are total:
//! they never fail, they drop what the target mode cannot carry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::pair::KeyValuePair;
use crate::error::DomainError;

/// The encoding strategy of a request body, without its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BodyMode {
    /// Key/value list sent as a JSON object.
    Inputs,
    /// JSON text or value.
    Json,
    /// Multipart form data.
    FormData,
    /// `application/x-www-form-urlencoded`.
    UrlEncoded,
    /// Raw bytes or a file from disk.
    Binary,
    /// Response is streamed to a file instead of buffered.
    Stream,
    /// No body.
    #[default]
    None,
}

impl BodyMode {
    /// Returns the canonical mode name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inputs => "inputs",
            Self::Json => "json",
            Self::FormData => "formdata",
            Self::UrlEncoded => "urlencoded",
            Self::Binary => "binary",
            Self::Stream => "stream",
            Self::None => "none",
        }
    }
}

impl fmt::Display for BodyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BodyMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inputs" => Ok(Self::Inputs),
            "json" => Ok(Self::Json),
            "formdata" => Ok(Self::FormData),
            "urlencoded" => Ok(Self::UrlEncoded),
            "binary" => Ok(Self::Binary),
            "stream" => Ok(Self::Stream),
            "none" => Ok(Self::None),
            other => Err(DomainError::UnknownBodyMode(other.to_string())),
        }
    }
}

/// JSON body content: either text typed by the user or an already parsed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonContent {
    /// Text kept verbatim (may be invalid JSON or contain `{{variables}}`).
    Text(String),
    /// A parsed JSON value.
    Value(Value),
}

impl JsonContent {
    /// Returns the content as a JSON value, parsing text when possible.
    #[must_use]
    pub fn to_value(&self) -> Option<Value> {
        match self {
            Self::Text(text) => serde_json::from_str(text).ok(),
            Self::Value(value) => Some(value.clone()),
        }
    }
}

/// Source of a binary body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BinarySource {
    /// A file on disk, read when the request is sent.
    File {
        /// Path to the file.
        path: String,
    },
    /// Inline bytes.
    Bytes {
        /// The raw payload.
        data: Vec<u8>,
    },
    /// Inline text.
    Text {
        /// The payload.
        text: String,
    },
}

/// Value of a multipart field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FormValue {
    /// Plain text value.
    Text {
        /// The value.
        value: String,
    },
    /// Reference to a file attached from disk.
    File {
        /// Path of the file.
        src: String,
    },
}

/// A field of a multipart body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDataField {
    /// Field name.
    pub key: String,
    /// Field value.
    #[serde(flatten)]
    pub value: FormValue,
    /// Whether the field is sent.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

const fn default_enabled() -> bool {
    true
}

impl FormDataField {
    /// Creates an enabled text field.
    #[must_use]
    pub fn text(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: FormValue::Text {
                value: value.into(),
            },
            enabled: true,
        }
    }

    /// Creates an enabled file field.
    #[must_use]
    pub fn file(key: impl Into<String>, src: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: FormValue::File { src: src.into() },
            enabled: true,
        }
    }
}

/// A request body, one variant per mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", content = "content", rename_all = "lowercase")]
pub enum BodySpec {
    /// Key/value list sent as a JSON object.
    Inputs(Vec<KeyValuePair>),
    /// JSON body.
    Json(JsonContent),
    /// Multipart form data.
    #[serde(rename = "formdata")]
    FormData(Vec<FormDataField>),
    /// URL-encoded form.
    #[serde(rename = "urlencoded")]
    UrlEncoded(Vec<KeyValuePair>),
    /// Binary payload.
    Binary(BinarySource),
    /// No request body; the response is written to `save_path`.
    Stream {
        /// Destination of the streamed response.
        #[serde(default)]
        save_path: Option<String>,
    },
    /// No body.
    #[default]
    None,
}

impl BodySpec {
    /// Returns the mode of this body.
    #[must_use]
    pub const fn mode(&self) -> BodyMode {
        match self {
            Self::Inputs(_) => BodyMode::Inputs,
            Self::Json(_) => BodyMode::Json,
            Self::FormData(_) => BodyMode::FormData,
            Self::UrlEncoded(_) => BodyMode::UrlEncoded,
            Self::Binary(_) => BodyMode::Binary,
            Self::Stream { .. } => BodyMode::Stream,
            Self::None => BodyMode::None,
        }
    }

    /// Creates a JSON body from text.
    #[must_use]
    pub fn json_text(text: impl Into<String>) -> Self {
        Self::Json(JsonContent::Text(text.into()))
    }

    /// Returns the body as a key/value list, if the mode carries one.
    ///
    /// File fields of a multipart body become pairs whose value is the file path.
    fn as_pairs(&self) -> Option<Vec<KeyValuePair>> {
        match self {
            Self::Inputs(pairs) | Self::UrlEncoded(pairs) => Some(pairs.clone()),
            Self::FormData(fields) => Some(
                fields
                    .iter()
                    .map(|f| {
                        let value = match &f.value {
                            FormValue::Text { value } => value.clone(),
                            FormValue::File { src } => src.clone(),
                        };
                        KeyValuePair {
                            key: f.key.clone(),
                            value,
                            enabled: f.enabled,
                        }
                    })
                    .collect(),
            ),
            Self::Json(content) => Some(
                content
                    .to_value()
                    .map(|v| json_to_pairs(&v))
                    .unwrap_or_default(),
            ),
            Self::Binary(_) | Self::Stream { .. } | Self::None => None,
        }
    }

    /// Converts this body to another mode.
    ///
    /// Lossy cases:
    /// - list to JSON drops disabled entries and entries with an empty key;
    /// - JSON to list keeps only top-level object members, and invalid JSON
    ///   text becomes an empty list;
    /// - multipart file fields turn into text entries holding the path;
    /// - binary and stream bodies carry nothing over.
    #[must_use]
    pub fn convert(&self, target: BodyMode) -> Self {
        if self.mode() == target {
            return self.clone();
        }
        let pairs = self.as_pairs().unwrap_or_default();
        match target {
            BodyMode::Inputs => Self::Inputs(pairs),
            BodyMode::UrlEncoded => Self::UrlEncoded(pairs),
            BodyMode::FormData => Self::FormData(
                pairs
                    .into_iter()
                    .map(|p| FormDataField {
                        key: p.key,
                        value: FormValue::Text { value: p.value },
                        enabled: p.enabled,
                    })
                    .collect(),
            ),
            BodyMode::Json => Self::Json(JsonContent::Value(pairs_to_json(&pairs))),
            BodyMode::Binary => Self::Binary(BinarySource::Text {
                text: String::new(),
            }),
            BodyMode::Stream => Self::Stream { save_path: None },
            BodyMode::None => Self::None,
        }
    }
}

/// Builds a JSON object from a key/value list.
///
/// Disabled entries and entries with an empty key are dropped; a later
/// duplicate key overwrites an earlier one.
#[must_use]
pub fn pairs_to_json(pairs: &[KeyValuePair]) -> Value {
    let map: Map<String, Value> = pairs
        .iter()
        .filter(|p| p.enabled && !p.key.is_empty())
        .map(|p| (p.key.clone(), Value::String(p.value.clone())))
        .collect();
    Value::Object(map)
}

/// Splits a JSON object into a key/value list.
///
/// Non-string members are rendered as JSON text. Anything that is not an
/// object yields an empty list.
#[must_use]
pub fn json_to_pairs(value: &Value) -> Vec<KeyValuePair> {
    let Value::Object(map) = value else {
        return Vec::new();
    };
    map.iter()
        .map(|(k, v)| {
            let value = match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            KeyValuePair::new(k.clone(), value)
        })
        .collect()
}
