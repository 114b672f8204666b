//! `.http` text formatter.
//!
//! Block layout: `###`, `# <name>`, `METHOD URL`, one `Key: Value` line per
//! header, a blank line, then the body. Entering a folder emits
//! `# 📁 Folder: <parent> / <child>`.

use serde_json::Value;

use super::ExportError;
use crate::import::{TranslatedBody, TranslatedCollection, TranslatedItem, TranslatedRequest};
use crate::serialization::to_json_pretty;

/// Boundary used when a form body is rendered as multipart.
pub const FORM_BOUNDARY: &str = "----WebKitFormBoundary7MA4YWxkTrZu0gW";

/// Renders the collection as `.http` text.
///
/// # Errors
///
/// Returns an error if a JSON body cannot be serialized.
pub fn to_http_file(collection: &TranslatedCollection) -> Result<String, ExportError> {
    let mut lines = Vec::new();
    write_items(&collection.items, &mut Vec::new(), &mut lines)?;
    let mut out = lines.join("\n");
    out.push('\n');
    Ok(out)
}

fn write_items<'a>(
    items: &'a [TranslatedItem],
    path: &mut Vec<&'a str>,
    lines: &mut Vec<String>,
) -> Result<(), ExportError> {
    for item in items {
        match item {
            TranslatedItem::Folder { name, items } => {
                path.push(name);
                lines.push(format!("# 📁 Folder: {}", path.join(" / ")));
                lines.push(String::new());
                write_items(items, path, lines)?;
                path.pop();
            }
            TranslatedItem::Request { name, request } => write_request(name, request, lines)?,
        }
    }
    Ok(())
}

fn write_request(
    name: &str,
    request: &TranslatedRequest,
    lines: &mut Vec<String>,
) -> Result<(), ExportError> {
    lines.push("###".to_string());
    lines.push(format!("# {name}"));
    lines.push(format!("{} {}", request.method, request.url));
    lines.extend(request.headers.iter().map(|(k, v)| format!("{k}: {v}")));
    lines.push(String::new());
    match &request.body {
        None => {}
        Some(TranslatedBody::Text(text)) => lines.push(text.clone()),
        Some(TranslatedBody::Json(Value::String(text))) => lines.push(text.clone()),
        Some(TranslatedBody::Json(Value::Object(fields))) => {
            if fields.values().next().is_some_and(is_file_value) {
                write_multipart(fields, lines);
            } else {
                lines.push(to_json_pretty(fields)?);
            }
        }
        Some(TranslatedBody::Json(value)) => lines.push(to_json_pretty(value)?),
        Some(TranslatedBody::FormData(fields)) => {
            if fields.values().next().is_some_and(is_file_value) {
                write_multipart(fields, lines);
            } else {
                lines.push(to_json_pretty(fields)?);
            }
        }
    }
    lines.push(String::new());
    Ok(())
}

fn is_file_value(value: &Value) -> bool {
    value.get("type").and_then(Value::as_str) == Some("file")
}

fn write_multipart<'a>(
    fields: impl IntoIterator<Item = (&'a String, &'a Value)>,
    lines: &mut Vec<String>,
) {
    for (key, value) in fields {
        lines.push(format!("--{FORM_BOUNDARY}"));
        if is_file_value(value) {
            let src = value.get("src").and_then(Value::as_str).unwrap_or_default();
            lines.push(format!(
                "Content-Disposition: form-data; name=\"{key}\"; filename=\"{src}\""
            ));
            lines.push(String::new());
            lines.push(format!("< {src}"));
        } else {
            lines.push(format!("Content-Disposition: form-data; name=\"{key}\""));
            lines.push(String::new());
            lines.push(match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            });
        }
    }
    lines.push(format!("--{FORM_BOUNDARY}--"));
}
