//! Postman Collection v2.1 Type Definitions
//!
//! Every field is optional or defaulted, and nested structures are decoded
//! leniently: a malformed node falls back to its default instead of failing
//! the whole document. The only hard requirement (`info` and `item` present)
//! is checked by the translator before these types are used.

#![allow(missing_docs)]

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Decodes `T`, falling back to `T::default()` when the shape is unexpected.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Decodes a list element by element, dropping elements that do not fit `T`.
pub(crate) fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| T::deserialize(item).ok())
        .collect())
}

/// Root structure for Postman Collection v2.1
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostmanCollection {
    #[serde(default, deserialize_with = "lenient")]
    pub info: PostmanInfo,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub item: Vec<PostmanItem>,
}

/// Collection metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostmanInfo {
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub description: PostmanDescription,
}

/// A description is either plain text or `{ content, type }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostmanDescription {
    #[default]
    Empty,
    Text(String),
    Rich {
        #[serde(default)]
        content: String,
    },
}

impl PostmanDescription {
    /// Returns the description text.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Empty => "",
            Self::Text(s) | Self::Rich { content: s } => s,
        }
    }
}

/// An item can be either a folder (containing more items) or a request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostmanItem {
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
    /// If present, this item is a folder containing sub-items
    #[serde(default, deserialize_with = "lenient_folder")]
    pub item: Option<Vec<Self>>,
    /// If present, this item is a request
    #[serde(default, deserialize_with = "lenient")]
    pub request: Option<PostmanRequest>,
    /// Response examples
    #[serde(default, deserialize_with = "lenient_vec")]
    pub response: Vec<PostmanResponse>,
}

fn lenient_folder<'de, D>(deserializer: D) -> Result<Option<Vec<PostmanItem>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if !value.is_array() {
        return Ok(None);
    }
    lenient_vec(value).map(Some).map_err(serde::de::Error::custom)
}

impl PostmanItem {
    /// Returns true if this item is a folder (has sub-items)
    #[must_use]
    pub const fn is_folder(&self) -> bool {
        self.item.is_some()
    }
}

/// Postman Request definition
///
/// A request may also be given as a bare URL string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostmanRequest {
    Url(String),
    Full(PostmanRequestBody),
}

impl PostmanRequest {
    /// Normalizes the bare-string form into a full request.
    #[must_use]
    pub fn into_full(self) -> PostmanRequestBody {
        match self {
            Self::Url(url) => PostmanRequestBody {
                url: PostmanUrl::Simple(url),
                ..PostmanRequestBody::default()
            },
            Self::Full(body) => body,
        }
    }
}

/// Fields of a request node
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostmanRequestBody {
    #[serde(default, deserialize_with = "lenient")]
    pub method: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub url: PostmanUrl,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub header: Vec<PostmanHeader>,
    #[serde(default, deserialize_with = "lenient")]
    pub body: Option<PostmanBody>,
    #[serde(default, deserialize_with = "lenient")]
    pub auth: Option<PostmanAuth>,
}

/// URL can be either a simple string or a structured object
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum PostmanUrl {
    #[default]
    Empty,
    Simple(String),
    Structured(PostmanUrlStructured),
}

/// A host or path given either as one string or as segments.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Segments {
    #[default]
    Empty,
    Joined(String),
    List(Vec<Value>),
}

impl Segments {
    /// Joins the segments with `separator`; string segments only.
    #[must_use]
    pub fn join(&self, separator: &str) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Joined(s) => s.clone(),
            Self::List(parts) => parts
                .iter()
                .map(|p| match p {
                    Value::String(s) => s.clone(),
                    Value::Object(o) => o
                        .get("value")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(separator),
        }
    }

    /// Returns true when no segment is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Joined(s) => s.is_empty(),
            Self::List(parts) => parts.is_empty(),
        }
    }
}

/// Structured URL object
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PostmanUrlStructured {
    #[serde(default, deserialize_with = "lenient")]
    pub raw: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub protocol: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub host: Segments,
    #[serde(default, deserialize_with = "lenient")]
    pub path: Segments,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub query: Vec<PostmanQueryParam>,
}

/// Query parameter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostmanQueryParam {
    #[serde(default, deserialize_with = "lenient")]
    pub key: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub value: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub disabled: bool,
}

/// Request header
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostmanHeader {
    #[serde(default, deserialize_with = "lenient")]
    pub key: String,
    #[serde(default, deserialize_with = "lenient")]
    pub value: String,
    #[serde(default, deserialize_with = "lenient")]
    pub disabled: bool,
}

/// Request body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostmanBody {
    #[serde(default, deserialize_with = "lenient")]
    pub mode: String,
    #[serde(default, deserialize_with = "lenient")]
    pub raw: Option<String>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub formdata: Vec<PostmanFormDataParam>,
}

/// Form-data parameter (supports file uploads)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostmanFormDataParam {
    #[serde(default, deserialize_with = "lenient")]
    pub key: String,
    #[serde(default, deserialize_with = "lenient")]
    pub value: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub src: Value,
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub param_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub disabled: bool,
}

impl PostmanFormDataParam {
    /// Returns true for file fields.
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.param_type.as_deref() == Some("file")
    }

    /// Returns the file source. Postman allows an array of paths; the first one wins.
    #[must_use]
    pub fn src_path(&self) -> String {
        match &self.src {
            Value::String(s) => s.clone(),
            Value::Array(list) => list
                .iter()
                .find_map(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            _ => String::new(),
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostmanAuth {
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub auth_type: String,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub basic: Vec<PostmanAuthParam>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub bearer: Vec<PostmanAuthParam>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub apikey: Vec<PostmanAuthParam>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub oauth2: Vec<PostmanAuthParam>,
}

impl PostmanAuth {
    /// Get a parameter value by key, rendering non-string values as text.
    #[must_use]
    pub fn get_param(params: &[PostmanAuthParam], key: &str) -> Option<String> {
        params.iter().find(|p| p.key == key).map(|p| match &p.value {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        })
    }
}

/// Auth parameter (key-value pair)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostmanAuthParam {
    #[serde(default, deserialize_with = "lenient")]
    pub key: String,
    #[serde(default)]
    pub value: Value,
}

/// Saved response example
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostmanResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub code: u16,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub header: Vec<PostmanHeader>,
    #[serde(default, deserialize_with = "lenient")]
    pub body: String,
}
