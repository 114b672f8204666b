//! Structured formatter.

use serde_json::{Map, Value, json};

use super::{DuplicateNamePolicy, ExportError};
use crate::import::{TranslatedCollection, TranslatedItem};

/// Mirrors the tree into a nested map keyed by item name.
///
/// Folders become maps of their children; requests become
/// `{ "name": ..., "request": { method, url, headers, body } }`.
///
/// # Errors
///
/// Returns [`ExportError::DuplicateName`] when `policy` is
/// [`DuplicateNamePolicy::Reject`] and two siblings share a name.
pub fn to_structured_map(
    collection: &TranslatedCollection,
    policy: DuplicateNamePolicy,
) -> Result<Map<String, Value>, ExportError> {
    build_level(&collection.items, policy, "")
}

fn build_level(
    items: &[TranslatedItem],
    policy: DuplicateNamePolicy,
    parent: &str,
) -> Result<Map<String, Value>, ExportError> {
    let mut map = Map::new();
    for item in items {
        let name = item.name();
        if policy == DuplicateNamePolicy::Reject && map.contains_key(name) {
            return Err(ExportError::DuplicateName {
                name: name.to_string(),
                parent: parent.to_string(),
            });
        }
        let value = match item {
            TranslatedItem::Folder { items, .. } => {
                let path = if parent.is_empty() {
                    name.to_string()
                } else {
                    format!("{parent} / {name}")
                };
                Value::Object(build_level(items, policy, &path)?)
            }
            TranslatedItem::Request { request, .. } => json!({
                "name": name,
                "request": {
                    "method": request.method,
                    "url": request.url,
                    "headers": request.headers,
                    "body": request.body.as_ref().map(|b| b.to_value()),
                },
            }),
        };
        map.insert(name.to_string(), value);
    }
    Ok(map)
}
