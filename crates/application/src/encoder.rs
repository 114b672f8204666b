//! Request encoding
//!
//! Turns a stored [`RequestSpec`] into the wire-level [`ExecutionRequest`] the
//! executor consumes: query string appended, disabled entries dropped, auth
//! placed, and the body flattened according to its mode.

use std::path::PathBuf;

use courier_domain::request::{
    BinarySource, BodySpec, FormValue, JsonContent, KeyValuePair, RequestSpec, active_pairs,
    pairs_to_json,
};
use courier_domain::{AuthPlacement, AuthSpec};
use indexmap::IndexMap;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::ports::{ExecutionRequest, FileDescriptor, RequestPayload};

/// Errors raised while encoding a request.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The request has no URL.
    #[error("URL is required")]
    EmptyUrl,

    /// Query string or JSON body could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_urlencoded::ser::Error> for EncodeError {
    fn from(err: serde_urlencoded::ser::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for EncodeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

const CONTENT_TYPE: &str = "content-type";
const JSON_MIME: &str = "application/json";

/// Encodes a request for the executor.
///
/// # Errors
///
/// Returns [`EncodeError::EmptyUrl`] for a blank URL and
/// [`EncodeError::Serialization`] if the query or a JSON body cannot be written.
pub fn encode(request: &RequestSpec) -> Result<ExecutionRequest, EncodeError> {
    let url = request.url.trim();
    if url.is_empty() {
        return Err(EncodeError::EmptyUrl);
    }

    let mut headers: IndexMap<String, String> = active_pairs(&request.headers)
        .map(|p| (p.key.clone(), p.value.clone()))
        .collect();

    let body_auth = active_auth(&request.auth).and_then(|auth| match auth.config.placement {
        AuthPlacement::Header => {
            headers.insert(auth.config.key.clone(), auth.config.value.clone());
            None
        }
        AuthPlacement::Body => Some((auth.config.key.as_str(), auth.config.value.as_str())),
    });

    let (body, is_json) = encode_body(&request.body, body_auth)?;
    if is_json && !headers.keys().any(|k| k.eq_ignore_ascii_case(CONTENT_TYPE)) {
        headers.insert(CONTENT_TYPE.to_string(), JSON_MIME.to_string());
    }

    let stream_path = match &request.body {
        BodySpec::Stream {
            save_path: Some(path),
        } if !path.trim().is_empty() => Some(PathBuf::from(path)),
        _ => None,
    };

    Ok(ExecutionRequest {
        url: append_query(url, &request.params)?,
        method: request.method.as_str().to_string(),
        headers,
        body,
        body_mode: request.body.mode(),
        timeout: None,
        stream_path,
        cancel: None,
    })
}

/// Appends the active params to `url` as a URL-encoded query string.
///
/// The query always lands before a `#fragment`. Absolute URLs go through
/// [`url::Url`]; anything it cannot parse is spliced textually.
///
/// # Errors
///
/// Fails if the pairs cannot be URL-encoded.
pub fn append_query(url: &str, params: &[KeyValuePair]) -> Result<String, EncodeError> {
    let pairs: Vec<(&str, &str)> = active_pairs(params)
        .map(|p| (p.key.as_str(), p.value.as_str()))
        .collect();
    if pairs.is_empty() {
        return Ok(url.to_string());
    }
    if let Ok(mut parsed) = url::Url::parse(url) {
        parsed.query_pairs_mut().extend_pairs(&pairs);
        return Ok(parsed.into());
    }
    let query = serde_urlencoded::to_string(&pairs)?;
    let (base, fragment) = match url.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment)),
        None => (url, None),
    };
    let separator = if base.contains('?') { '&' } else { '?' };
    Ok(match fragment {
        Some(fragment) => format!("{base}{separator}{query}#{fragment}"),
        None => format!("{base}{separator}{query}"),
    })
}

fn active_auth(auth: &AuthSpec) -> Option<&AuthSpec> {
    (!auth.is_disabled()).then_some(auth)
}

/// Returns the payload and whether it is JSON.
fn encode_body(
    body: &BodySpec,
    auth: Option<(&str, &str)>,
) -> Result<(RequestPayload, bool), EncodeError> {
    let payload = match body {
        BodySpec::Inputs(pairs) => {
            let mut value = pairs_to_json(pairs);
            merge_into_object(&mut value, auth);
            return Ok((RequestPayload::Text(serde_json::to_string(&value)?), true));
        }
        BodySpec::Json(content) => return encode_json(content, auth).map(|p| (p, true)),
        BodySpec::FormData(fields) => {
            let mut map: IndexMap<String, Value> = fields
                .iter()
                .filter(|f| f.enabled && !f.key.trim().is_empty())
                .map(|f| {
                    let value = match &f.value {
                        FormValue::Text { value } => Value::String(value.clone()),
                        FormValue::File { src } => FileDescriptor::new(src.clone()).to_value(),
                    };
                    (f.key.clone(), value)
                })
                .collect();
            insert_field(&mut map, auth);
            RequestPayload::Fields(map)
        }
        BodySpec::UrlEncoded(pairs) => {
            let mut map: IndexMap<String, Value> = active_pairs(pairs)
                .map(|p| (p.key.clone(), Value::String(p.value.clone())))
                .collect();
            insert_field(&mut map, auth);
            RequestPayload::Fields(map)
        }
        BodySpec::Binary(source) => {
            drop_body_auth(auth, "binary");
            match source {
                BinarySource::File { path } => RequestPayload::File(FileDescriptor::new(path.clone())),
                BinarySource::Bytes { data } => RequestPayload::Bytes(data.clone()),
                BinarySource::Text { text } => RequestPayload::Text(text.clone()),
            }
        }
        BodySpec::Stream { .. } => {
            drop_body_auth(auth, "stream");
            RequestPayload::None
        }
        BodySpec::None => {
            drop_body_auth(auth, "none");
            RequestPayload::None
        }
    };
    Ok((payload, false))
}

fn encode_json(content: &JsonContent, auth: Option<(&str, &str)>) -> Result<RequestPayload, EncodeError> {
    if auth.is_none() {
        return Ok(match content {
            JsonContent::Text(text) => RequestPayload::Text(text.clone()),
            JsonContent::Value(value) => RequestPayload::Text(serde_json::to_string(value)?),
        });
    }
    match content.to_value() {
        Some(mut value @ Value::Object(_)) => {
            merge_into_object(&mut value, auth);
            Ok(RequestPayload::Text(serde_json::to_string(&value)?))
        }
        _ => {
            drop_body_auth(auth, "non-object json");
            match content {
                JsonContent::Text(text) => Ok(RequestPayload::Text(text.clone())),
                JsonContent::Value(value) => Ok(RequestPayload::Text(serde_json::to_string(value)?)),
            }
        }
    }
}

fn merge_into_object(value: &mut Value, auth: Option<(&str, &str)>) {
    if let (Value::Object(map), Some((key, secret))) = (value, auth) {
        map.insert(key.to_string(), Value::String(secret.to_string()));
    }
}

fn insert_field(map: &mut IndexMap<String, Value>, auth: Option<(&str, &str)>) {
    if let Some((key, secret)) = auth {
        map.insert(key.to_string(), Value::String(secret.to_string()));
    }
}

fn drop_body_auth(auth: Option<(&str, &str)>, mode: &str) {
    if let Some((key, _)) = auth {
        warn!(field = key, mode, "body auth cannot be placed in this body mode, dropped");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use courier_domain::request::{BodyMode, FormDataField};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn text(payload: &RequestPayload) -> &str {
        match payload {
            RequestPayload::Text(t) => t,
            other => panic!("expected text payload, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_url_is_rejected() {
        let request = RequestSpec::get("   ");
        assert!(matches!(encode(&request), Err(EncodeError::EmptyUrl)));
    }

    #[test]
    fn test_query_appended_from_active_params() {
        let mut request = RequestSpec::get("https://api.test/items")
            .with_param("q", "a b")
            .with_param("page", "2");
        request.params.push(KeyValuePair::disabled("skip", "1"));
        request.params.push(KeyValuePair::new("", "blank"));
        let out = encode(&request).unwrap();
        assert_eq!(out.url, "https://api.test/items?q=a+b&page=2");

        let request = RequestSpec::get("https://api.test/items?x=1").with_param("y", "2");
        assert_eq!(encode(&request).unwrap().url, "https://api.test/items?x=1&y=2");
    }

    #[test]
    fn test_query_goes_before_fragment() {
        let request = RequestSpec::get("https://x/a#frag").with_param("q", "1");
        assert_eq!(encode(&request).unwrap().url, "https://x/a?q=1#frag");

        let request = RequestSpec::get("https://x/a?p=0#frag").with_param("q", "1");
        assert_eq!(encode(&request).unwrap().url, "https://x/a?p=0&q=1#frag");

        let params = [KeyValuePair::new("q", "a b")];
        assert_eq!(
            append_query("{{base}}/a#top", &params).unwrap(),
            "{{base}}/a?q=a+b#top"
        );
    }

    #[test]
    fn test_headers_skip_disabled_and_keep_order() {
        let mut request = RequestSpec::get("https://api.test")
            .with_header("B", "1")
            .with_header("A", "2");
        request.headers.push(KeyValuePair::disabled("C", "3"));
        let out = encode(&request).unwrap();
        assert_eq!(
            out.headers.keys().cloned().collect::<Vec<_>>(),
            vec!["B".to_string(), "A".to_string()]
        );
        assert_eq!(out.method, "GET");
        assert_eq!(out.body, RequestPayload::None);
    }

    #[test]
    fn test_header_auth_and_disabled_auth() {
        let request = RequestSpec::get("https://api.test")
            .with_auth(AuthSpec::header("bearer", "Authorization", "Bearer t"));
        let out = encode(&request).unwrap();
        assert_eq!(out.header("authorization"), Some("Bearer t"));

        let mut auth = AuthSpec::header("bearer", "Authorization", "Bearer t");
        auth.name = AuthSpec::NONE.to_string();
        let out = encode(&RequestSpec::get("https://api.test").with_auth(auth)).unwrap();
        assert!(!out.has_header("authorization"));
    }

    #[test]
    fn test_inputs_body_becomes_json_with_body_auth() {
        let request = RequestSpec::post("https://api.test")
            .with_body(BodySpec::Inputs(vec![
                KeyValuePair::new("name", "ann"),
                KeyValuePair::disabled("age", "3"),
            ]))
            .with_auth(AuthSpec::body("apikey", "api_key", "secret"));
        let out = encode(&request).unwrap();
        let body: Value = serde_json::from_str(text(&out.body)).unwrap();
        assert_eq!(body, json!({"name": "ann", "api_key": "secret"}));
        assert_eq!(out.header("content-type"), Some("application/json"));
        assert_eq!(out.body_mode, BodyMode::Inputs);
    }

    #[test]
    fn test_json_text_kept_verbatim_and_content_type_respected() {
        let request = RequestSpec::post("https://api.test")
            .with_header("Content-Type", "application/vnd.api+json")
            .with_body(BodySpec::json_text("{ \"a\" : 1 }"));
        let out = encode(&request).unwrap();
        assert_eq!(text(&out.body), "{ \"a\" : 1 }");
        assert_eq!(out.header("content-type"), Some("application/vnd.api+json"));
        assert_eq!(out.headers.len(), 1);
    }

    #[test]
    fn test_formdata_fields_and_file_descriptor() {
        let request = RequestSpec::post("https://api.test").with_body(BodySpec::FormData(vec![
            FormDataField::text("title", "hello"),
            FormDataField::file("upload", "/tmp/a.png"),
        ]));
        let out = encode(&request).unwrap();
        assert!(!out.has_header("content-type"));
        let RequestPayload::Fields(ref map) = out.body else {
            panic!("expected fields");
        };
        assert_eq!(map["title"], json!("hello"));
        assert_eq!(map["upload"], json!({"src": "/tmp/a.png", "type": "file"}));
    }

    #[test]
    fn test_stream_body_sets_stream_path() {
        let request = RequestSpec::get("https://api.test/file").with_body(BodySpec::Stream {
            save_path: Some("/tmp/out.bin".to_string()),
        });
        let out = encode(&request).unwrap();
        assert_eq!(out.stream_path, Some(PathBuf::from("/tmp/out.bin")));
        assert_eq!(out.body_mode, BodyMode::Stream);
        assert!(out.body.is_none());
    }

    #[test]
    fn test_binary_sources() {
        let request = RequestSpec::post("https://api.test").with_body(BodySpec::Binary(
            BinarySource::File {
                path: "/tmp/x.bin".to_string(),
            },
        ));
        assert_eq!(
            encode(&request).unwrap().body,
            RequestPayload::File(FileDescriptor::new("/tmp/x.bin"))
        );
    }
}
