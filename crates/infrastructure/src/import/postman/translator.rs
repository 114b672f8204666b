//! Postman translator
//!
//! Converts a Postman v2.x collection document into a [`TranslatedCollection`].
//! The document is only required to carry `info` and `item`; everything below
//! that is read best-effort and falls back to defaults.

use std::sync::LazyLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use courier_domain::environment::{Environment, EnvironmentVariable};
use courier_domain::response::ResponseSpec;
use courier_domain::request::KeyValuePair;
use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use super::environment_types::PostmanEnvironment;
use super::model::{TranslatedBody, TranslatedCollection, TranslatedItem, TranslatedRequest};
use super::types::{
    PostmanAuth, PostmanBody, PostmanCollection, PostmanItem, PostmanRequestBody, PostmanResponse,
    PostmanUrl,
};
use super::warning::TranslationWarning;

/// Errors that abort a translation.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// The input is not JSON.
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),
    /// The document lacks a required top-level field.
    #[error("Invalid Postman format: {0}")]
    InvalidFormat(String),
}

static LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*//.*$").expect("valid regex"));

const AUTHORIZATION: &str = "Authorization";
const OAUTH2_PLACEHOLDER: &str = "Bearer {{token}}";
const PATH_SEPARATOR: &str = " / ";

/// Parses `text` as JSON and translates it.
///
/// # Errors
///
/// Returns [`TranslateError::InvalidJson`] when `text` is not JSON, and
/// [`TranslateError::InvalidFormat`] when `info` or `item` is missing.
pub fn translate_str(text: &str) -> Result<TranslatedCollection, TranslateError> {
    let doc: Value =
        serde_json::from_str(text).map_err(|e| TranslateError::InvalidJson(e.to_string()))?;
    translate(&doc)
}

/// Translates a parsed Postman collection.
///
/// # Errors
///
/// Returns [`TranslateError::InvalidFormat`] when `info` or `item` is missing.
pub fn translate(doc: &Value) -> Result<TranslatedCollection, TranslateError> {
    for field in ["info", "item"] {
        if doc.get(field).is_none_or(Value::is_null) {
            return Err(TranslateError::InvalidFormat(format!(
                "missing required field `{field}`"
            )));
        }
    }

    let collection = PostmanCollection::deserialize(doc).unwrap_or_default();
    let mut warnings = Vec::new();
    let items = translate_items(collection.item, "", &mut warnings);

    let translated = TranslatedCollection {
        name: collection.info.name,
        description: collection.info.description.text().to_string(),
        items,
        warnings,
    };
    info!(
        name = %translated.name,
        requests = translated.request_count(),
        warnings = translated.warnings.len(),
        "translated collection"
    );
    Ok(translated)
}

fn translate_items(
    items: Vec<PostmanItem>,
    parent: &str,
    warnings: &mut Vec<TranslationWarning>,
) -> Vec<TranslatedItem> {
    items
        .into_iter()
        .map(|node| {
            let path = if parent.is_empty() {
                node.name.clone()
            } else {
                format!("{parent}{PATH_SEPARATOR}{}", node.name)
            };
            if let Some(children) = node.item {
                return TranslatedItem::Folder {
                    items: translate_items(children, &path, warnings),
                    name: node.name,
                };
            }
            let source = if let Some(request) = node.request {
                request.into_full()
            } else {
                warnings.push(TranslationWarning::warning(
                    &path,
                    "item has neither `request` nor `item`; translated as an empty request",
                ));
                PostmanRequestBody::default()
            };
            let mut request = extract_request(source, &path, warnings);
            request.examples = node.response.into_iter().map(to_example).collect();
            TranslatedItem::Request {
                name: node.name,
                request,
            }
        })
        .collect()
}

fn extract_request(
    source: PostmanRequestBody,
    path: &str,
    warnings: &mut Vec<TranslationWarning>,
) -> TranslatedRequest {
    let mut headers = source
        .auth
        .as_ref()
        .map(|auth| {
            let (headers, auth_warnings) = process_auth(auth, path);
            warnings.extend(auth_warnings);
            headers
        })
        .unwrap_or_default();

    for header in source.header.into_iter().filter(|h| !h.disabled) {
        if header.key.is_empty() {
            warnings.push(TranslationWarning::warning(
                path,
                format!("header with an empty name dropped (value: {:?})", header.value),
            ));
            continue;
        }
        headers.insert(header.key, header.value);
    }

    let body = source.body.as_ref().and_then(|body| {
        let (body, body_warnings) = extract_body(body, path);
        warnings.extend(body_warnings);
        body
    });

    TranslatedRequest {
        method: source.method.unwrap_or_else(|| "GET".to_string()),
        url: build_url(&source.url),
        headers,
        body,
        examples: Vec::new(),
    }
}

/// Builds the request URL.
///
/// A plain string or a structured URL with a non-empty `raw` is returned
/// verbatim.
/// Otherwise the URL is rebuilt from protocol, host, path and the enabled
/// query entries; a query entry without a value renders as `key=`.
#[must_use]
pub fn build_url(url: &PostmanUrl) -> String {
    let parts = match url {
        PostmanUrl::Empty => return String::new(),
        PostmanUrl::Simple(s) => return s.clone(),
        PostmanUrl::Structured(parts) => parts,
    };
    if let Some(raw) = parts.raw.as_deref().filter(|r| !r.is_empty()) {
        return raw.to_string();
    }

    let mut out = String::new();
    if let Some(protocol) = parts.protocol.as_deref().filter(|p| !p.is_empty()) {
        out.push_str(protocol);
        out.push_str("://");
    }
    out.push_str(&parts.host.join("."));
    let path = parts.path.join("/");
    if !path.is_empty() {
        out.push('/');
        out.push_str(&path);
    }
    let query: Vec<String> = parts
        .query
        .iter()
        .filter(|q| !q.disabled)
        .map(|q| {
            format!(
                "{}={}",
                q.key.as_deref().unwrap_or_default(),
                q.value.as_deref().unwrap_or_default()
            )
        })
        .collect();
    if !query.is_empty() {
        out.push('?');
        out.push_str(&query.join("&"));
    }
    out
}

/// Derives headers from a Postman auth block.
///
/// Supported: `bearer` (only with a non-empty token), `oauth2` (falls back to
/// a `{{token}}` placeholder), `apikey` (header placement only) and `basic`.
#[must_use]
pub fn process_auth(
    auth: &PostmanAuth,
    path: &str,
) -> (IndexMap<String, String>, Vec<TranslationWarning>) {
    let mut headers = IndexMap::new();
    let mut warnings = Vec::new();

    match auth.auth_type.as_str() {
        "bearer" => {
            if let Some(token) = PostmanAuth::get_param(&auth.bearer, "token").filter(|t| !t.is_empty()) {
                headers.insert(AUTHORIZATION.to_string(), format!("Bearer {token}"));
            }
        }
        "oauth2" => {
            let value = PostmanAuth::get_param(&auth.oauth2, "accessToken")
                .map_or_else(|| OAUTH2_PLACEHOLDER.to_string(), |t| format!("Bearer {t}"));
            headers.insert(AUTHORIZATION.to_string(), value);
        }
        "apikey" => {
            let key = PostmanAuth::get_param(&auth.apikey, "key");
            let value = PostmanAuth::get_param(&auth.apikey, "value");
            let location = PostmanAuth::get_param(&auth.apikey, "in");
            match (key, value, location.as_deref()) {
                (Some(key), Some(value), Some("header")) => {
                    headers.insert(key, value);
                }
                (Some(key), Some(_), Some("query")) => {
                    warnings.push(TranslationWarning::warning(
                        path,
                        format!("API key `{key}` is sent in the query string; not translated"),
                    ));
                }
                _ => {}
            }
        }
        "basic" => {
            let username = PostmanAuth::get_param(&auth.basic, "username");
            let password = PostmanAuth::get_param(&auth.basic, "password");
            if let (Some(username), Some(password)) = (username, password) {
                let encoded = STANDARD.encode(format!("{username}:{password}"));
                headers.insert(AUTHORIZATION.to_string(), format!("Basic {encoded}"));
            }
        }
        "" | "noauth" | "inherit" => {}
        other => {
            warnings.push(TranslationWarning::warning(
                path,
                format!("auth type `{other}` is not supported"),
            ));
        }
    }

    (headers, warnings)
}

/// Extracts a request body.
///
/// `raw` is parsed as JSON after removing `//` line comments; if that fails
/// the original text is kept. `formdata` becomes an ordered field map with
/// file fields as `{ "type": "file", "src": ... }`. Other modes yield nothing.
#[must_use]
pub fn extract_body(
    body: &PostmanBody,
    path: &str,
) -> (Option<TranslatedBody>, Vec<TranslationWarning>) {
    match body.mode.as_str() {
        "raw" => {
            let raw = body.raw.clone().unwrap_or_default();
            let stripped = LINE_COMMENT.replace_all(&raw, "");
            let parsed = serde_json::from_str::<Value>(&stripped).map_or_else(
                |e| {
                    debug!(error = %e, "raw body is not JSON, keeping text");
                    TranslatedBody::Text(raw.clone())
                },
                TranslatedBody::Json,
            );
            (Some(parsed), Vec::new())
        }
        "formdata" => {
            let fields = body
                .formdata
                .iter()
                .filter(|p| !p.disabled)
                .map(|p| {
                    let value = if p.is_file() {
                        serde_json::json!({ "type": "file", "src": p.src_path() })
                    } else {
                        Value::String(p.value.clone().unwrap_or_default())
                    };
                    (p.key.clone(), value)
                })
                .collect();
            (Some(TranslatedBody::FormData(fields)), Vec::new())
        }
        "" => (None, Vec::new()),
        other => (
            None,
            vec![TranslationWarning::info(
                path,
                format!("body mode `{other}` is not translated"),
            )],
        ),
    }
}

fn to_example(response: PostmanResponse) -> ResponseSpec {
    ResponseSpec {
        name: response.name,
        status: response.code,
        headers: response
            .header
            .into_iter()
            .map(|h| KeyValuePair {
                key: h.key,
                value: h.value,
                enabled: !h.disabled,
            })
            .collect(),
        body: response.body,
    }
}

/// Translates a Postman environment export.
///
/// # Errors
///
/// Returns [`TranslateError::InvalidFormat`] when `values` is missing.
pub fn translate_environment(doc: &Value) -> Result<Environment, TranslateError> {
    if !doc.get("values").is_some_and(Value::is_array) {
        return Err(TranslateError::InvalidFormat(
            "missing required field `values`".to_string(),
        ));
    }
    let source = PostmanEnvironment::deserialize(doc).unwrap_or_default();
    Ok(Environment {
        name: source.name,
        variables: source
            .values
            .into_iter()
            .map(|v| EnvironmentVariable {
                name: v.key,
                value: v.value,
                enabled: v.enabled,
            })
            .collect(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::import::postman::warning::WarningSeverity;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn url(value: Value) -> String {
        build_url(&serde_json::from_value(value).unwrap())
    }

    fn auth(value: Value) -> IndexMap<String, String> {
        process_auth(&serde_json::from_value(value).unwrap(), "r").0
    }

    fn first_request(collection: &TranslatedCollection) -> &TranslatedRequest {
        match &collection.items[0] {
            TranslatedItem::Request { request, .. } => request,
            TranslatedItem::Folder { .. } => panic!("expected request"),
        }
    }

    #[test]
    fn test_missing_info_or_item_is_invalid_format() {
        assert!(matches!(
            translate(&json!({"item": []})),
            Err(TranslateError::InvalidFormat(_))
        ));
        assert!(matches!(
            translate(&json!({"info": {"name": "x"}})),
            Err(TranslateError::InvalidFormat(_))
        ));
        assert!(matches!(
            translate_str("{not json"),
            Err(TranslateError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_build_url_prefers_raw() {
        assert_eq!(
            url(json!({"raw": "https://x/y?z=1", "host": ["other"], "path": ["p"]})),
            "https://x/y?z=1"
        );
        assert_eq!(url(json!("https://plain")), "https://plain");
    }

    #[test]
    fn test_build_url_empty_raw_uses_parts() {
        assert_eq!(
            url(json!({"raw": "", "protocol": "https", "host": ["api", "test"], "path": ["v1"]})),
            "https://api.test/v1"
        );
    }

    #[test]
    fn test_build_url_from_parts() {
        assert_eq!(
            url(json!({
                "protocol": "https",
                "host": ["api", "example", "com"],
                "path": ["v1", "users"],
                "query": [{"key": "id", "value": "5"}]
            })),
            "https://api.example.com/v1/users?id=5"
        );
        assert_eq!(
            url(json!({
                "host": "localhost:8080",
                "path": "health",
                "query": [
                    {"key": "a"},
                    {"key": "b", "value": "2", "disabled": true}
                ]
            })),
            "localhost:8080/health?a="
        );
    }

    #[test]
    fn test_basic_auth() {
        let headers = auth(json!({
            "type": "basic",
            "basic": [{"key": "username", "value": "a"}, {"key": "password", "value": "b"}]
        }));
        assert_eq!(headers.get("Authorization").map(String::as_str), Some("Basic YTpi"));
    }

    #[test]
    fn test_oauth2_placeholder_versus_empty_bearer() {
        let oauth = auth(json!({"type": "oauth2", "oauth2": [{"key": "grant_type", "value": "x"}]}));
        assert_eq!(
            oauth.get("Authorization").map(String::as_str),
            Some("Bearer {{token}}")
        );
        let oauth = auth(json!({"type": "oauth2", "oauth2": [{"key": "accessToken", "value": "t1"}]}));
        assert_eq!(oauth.get("Authorization").map(String::as_str), Some("Bearer t1"));

        assert!(auth(json!({"type": "bearer", "bearer": []})).is_empty());
        assert!(auth(json!({"type": "bearer", "bearer": [{"key": "token", "value": ""}]})).is_empty());
    }

    #[test]
    fn test_apikey_header_only() {
        let headers = auth(json!({
            "type": "apikey",
            "apikey": [
                {"key": "key", "value": "X-Api-Key"},
                {"key": "value", "value": "s3cret"},
                {"key": "in", "value": "header"}
            ]
        }));
        assert_eq!(headers.get("X-Api-Key").map(String::as_str), Some("s3cret"));

        let source: PostmanAuth = serde_json::from_value(json!({
            "type": "apikey",
            "apikey": [
                {"key": "key", "value": "api_key"},
                {"key": "value", "value": "s3cret"},
                {"key": "in", "value": "query"}
            ]
        }))
        .unwrap();
        let (headers, warnings) = process_auth(&source, "Users / Get");
        assert!(headers.is_empty());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].path, "Users / Get");
    }

    #[test]
    fn test_manual_headers_overwrite_auth_in_place() {
        let collection = translate(&json!({
            "info": {"name": "c"},
            "item": [{
                "name": "r",
                "request": {
                    "method": "GET",
                    "url": "https://x",
                    "auth": {"type": "bearer", "bearer": [{"key": "token", "value": "t"}]},
                    "header": [
                        {"key": "Accept", "value": "text/plain", "disabled": true},
                        {"key": "X-One", "value": "1"},
                        {"key": "Authorization", "value": "Custom c"}
                    ]
                }
            }]
        }))
        .unwrap();
        let request = first_request(&collection);
        assert_eq!(
            request.headers.iter().collect::<Vec<_>>(),
            vec![
                (&"Authorization".to_string(), &"Custom c".to_string()),
                (&"X-One".to_string(), &"1".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_header_name_is_reported() {
        let collection = translate(&json!({
            "info": {"name": "c"},
            "item": [{
                "name": "r",
                "request": {
                    "method": "GET",
                    "url": "https://x",
                    "header": [
                        {"key": "", "value": "orphan"},
                        {"key": "X-One", "value": "1"}
                    ]
                }
            }]
        }))
        .unwrap();
        let request = first_request(&collection);
        assert_eq!(request.headers.len(), 1);
        assert_eq!(collection.warnings.len(), 1);
        assert_eq!(collection.warnings[0].severity, WarningSeverity::Warning);
        assert_eq!(collection.warnings[0].path, "r");
        assert!(collection.warnings[0].message.contains("\"orphan\""));
    }

    #[test]
    fn test_raw_body_comment_stripping() {
        let body: PostmanBody = serde_json::from_value(json!({
            "mode": "raw",
            "raw": "{\n  // the user id\n  \"id\": 1\n}"
        }))
        .unwrap();
        assert_eq!(extract_body(&body, "r").0, Some(TranslatedBody::Json(json!({"id": 1}))));

        let raw = "<xml>// not a comment line</xml>";
        let body: PostmanBody =
            serde_json::from_value(json!({"mode": "raw", "raw": raw})).unwrap();
        assert_eq!(
            extract_body(&body, "r").0,
            Some(TranslatedBody::Text(raw.to_string()))
        );
    }

    #[test]
    fn test_formdata_body() {
        let body: PostmanBody = serde_json::from_value(json!({
            "mode": "formdata",
            "formdata": [
                {"key": "name", "value": "ann", "type": "text"},
                {"key": "avatar", "src": "/tmp/a.png", "type": "file"},
                {"key": "skip", "value": "x", "disabled": true}
            ]
        }))
        .unwrap();
        let Some(TranslatedBody::FormData(fields)) = extract_body(&body, "r").0 else {
            panic!("expected form data");
        };
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["name"], json!("ann"));
        assert_eq!(fields["avatar"], json!({"type": "file", "src": "/tmp/a.png"}));
    }

    #[test]
    fn test_other_body_modes_warn() {
        let body: PostmanBody =
            serde_json::from_value(json!({"mode": "graphql", "graphql": {"query": "{}"}})).unwrap();
        let (out, warnings) = extract_body(&body, "r");
        assert_eq!(out, None);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_nested_folders_and_warnings() {
        let collection = translate(&json!({
            "info": {"name": "Shop", "description": "demo"},
            "item": [
                {"name": "Users", "item": [
                    {"name": "Admin", "item": [
                        {"name": "List", "request": {"method": "GET", "url": "https://x/admins"}}
                    ]},
                    {"name": "Digest", "request": {"method": "GET", "url": "https://x", "auth": {"type": "digest"}}}
                ]},
                {"name": "Orphan"}
            ]
        }))
        .unwrap();
        assert_eq!(collection.name, "Shop");
        assert_eq!(collection.description, "demo");
        assert_eq!(collection.request_count(), 3);
        let paths: Vec<&str> = collection.warnings.iter().map(|w| w.path.as_str()).collect();
        assert_eq!(paths, vec!["Users / Digest", "Orphan"]);
    }

    #[test]
    fn test_saved_examples() {
        let collection = translate(&json!({
            "info": {"name": "c"},
            "item": [{
                "name": "r",
                "request": "https://x",
                "response": [{"name": "ok", "code": 200, "header": [{"key": "A", "value": "1"}], "body": "{}"}]
            }]
        }))
        .unwrap();
        let request = first_request(&collection);
        assert_eq!(request.method, "GET");
        assert_eq!(request.examples[0].status, 200);
        assert_eq!(request.examples[0].headers, vec![KeyValuePair::new("A", "1")]);
    }

    #[test]
    fn test_translate_environment() {
        let env = translate_environment(&json!({
            "name": "Dev",
            "values": [
                {"key": "host", "value": "localhost", "enabled": true},
                {"key": "token", "value": "x", "enabled": false}
            ]
        }))
        .unwrap();
        assert_eq!(env.name, "Dev");
        assert_eq!(
            env.variables,
            vec![
                EnvironmentVariable::new("host", "localhost"),
                EnvironmentVariable::disabled("token", "x"),
            ]
        );
        assert!(translate_environment(&json!({"name": "x"})).is_err());
    }
}
