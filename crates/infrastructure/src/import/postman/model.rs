//! Translated collection model
//!
//! The intermediate tree produced from a Postman document. Both output
//! formatters read it, and [`TranslatedCollection::into_collection`] turns it
//! into the domain [`Collection`].

use courier_domain::collection::{Collection, Folder, Item, Route};
use courier_domain::request::{
    BinarySource, BodySpec, FormDataField, HttpMethod, JsonContent, KeyValuePair, RequestSpec,
};
use courier_domain::response::ResponseSpec;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use super::warning::TranslationWarning;

/// A translated collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslatedCollection {
    /// Collection name from `info.name`.
    pub name: String,
    /// Description from `info.description`.
    pub description: String,
    /// Top-level nodes in source order.
    pub items: Vec<TranslatedItem>,
    /// What could not be carried over.
    #[serde(skip)]
    pub warnings: Vec<TranslationWarning>,
}

/// A folder or a request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TranslatedItem {
    /// A folder and its children.
    Folder {
        /// Folder name.
        name: String,
        /// Children in source order.
        items: Vec<TranslatedItem>,
    },
    /// A request leaf.
    Request {
        /// Request name.
        name: String,
        /// The flattened request.
        request: TranslatedRequest,
    },
}

impl TranslatedItem {
    /// Returns the item name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Folder { name, .. } | Self::Request { name, .. } => name,
        }
    }
}

/// A request flattened to wire-level strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslatedRequest {
    /// Method as written in the source.
    pub method: String,
    /// Fully built URL.
    pub url: String,
    /// Auth-derived headers first, then explicit ones.
    pub headers: IndexMap<String, String>,
    /// Extracted body.
    pub body: Option<TranslatedBody>,
    /// Saved example responses.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<ResponseSpec>,
}

/// Body extracted from a request node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TranslatedBody {
    /// Raw text that parsed as JSON once comments were stripped.
    Json(Value),
    /// Raw text kept verbatim.
    Text(String),
    /// Form fields; files are `{ "type": "file", "src": ... }`.
    FormData(IndexMap<String, Value>),
}

impl TranslatedBody {
    /// Returns the body as a JSON value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Json(v) => v.clone(),
            Self::Text(s) => Value::String(s.clone()),
            Self::FormData(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            ),
        }
    }
}

impl TranslatedCollection {
    /// Number of request leaves in the tree.
    #[must_use]
    pub fn request_count(&self) -> usize {
        fn count(items: &[TranslatedItem]) -> usize {
            items
                .iter()
                .map(|item| match item {
                    TranslatedItem::Folder { items, .. } => count(items),
                    TranslatedItem::Request { .. } => 1,
                })
                .sum()
        }
        count(&self.items)
    }

    /// Converts the tree into a domain collection with fresh ids.
    #[must_use]
    pub fn into_collection(self) -> Collection {
        let mut collection = Collection::new(self.name);
        if !self.description.is_empty() {
            collection.description = Some(self.description);
        }
        collection.items = self.items.into_iter().map(into_item).collect();
        collection
    }
}

fn into_item(item: TranslatedItem) -> Item {
    match item {
        TranslatedItem::Folder { name, items } => {
            let mut folder = Folder::new(name);
            folder.items = items.into_iter().map(into_item).collect();
            Item::Folder(folder)
        }
        TranslatedItem::Request { name, request } => {
            let example = request.examples.first().cloned();
            let mut route = Route::new(name, into_request_spec(request));
            route.response = example;
            Item::Route(route)
        }
    }
}

fn into_request_spec(request: TranslatedRequest) -> RequestSpec {
    let method = request.method.parse::<HttpMethod>().unwrap_or_else(|_| {
        warn!(method = %request.method, "unsupported method, using GET");
        HttpMethod::parse_lenient(&request.method)
    });

    let (base, params) = split_query(&request.url);
    let mut spec = RequestSpec::new(method, base);
    spec.params = params;
    spec.headers = request
        .headers
        .into_iter()
        .map(|(k, v)| KeyValuePair::new(k, v))
        .collect();
    spec.body = match request.body {
        None => BodySpec::None,
        Some(TranslatedBody::Json(value)) => BodySpec::Json(JsonContent::Value(value)),
        Some(TranslatedBody::Text(text)) => BodySpec::Binary(BinarySource::Text { text }),
        Some(TranslatedBody::FormData(fields)) => BodySpec::FormData(
            fields
                .into_iter()
                .map(|(key, value)| match value {
                    Value::String(s) => FormDataField::text(key, s),
                    Value::Object(ref o) if o.get("type").and_then(Value::as_str) == Some("file") => {
                        let src = o.get("src").and_then(Value::as_str).unwrap_or_default();
                        FormDataField::file(key, src)
                    }
                    other => FormDataField::text(key, other.to_string()),
                })
                .collect(),
        ),
    };
    spec
}

/// Splits `url` into its base and decoded query pairs.
fn split_query(url: &str) -> (String, Vec<KeyValuePair>) {
    let Some((base, query)) = url.split_once('?') else {
        return (url.to_string(), Vec::new());
    };
    let params = url::form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| KeyValuePair::new(k, v))
        .collect();
    (base.to_string(), params)
}
