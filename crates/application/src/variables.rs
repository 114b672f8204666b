//! Variable substitution
//!
//! Resolves `{{name}}` references against a flat list of environment entries.
//! References that do not resolve are kept verbatim, braces included, so a
//! half-configured environment never corrupts a request.
//!
//! # Usage
//!
//! ```
//! use courier_application::variables::substitute_str;
//! use courier_domain::EnvironmentVariable;
//!
//! let env = vec![EnvironmentVariable::new("host", "localhost")];
//! assert_eq!(substitute_str("http://{{host}}/{{path}}", &env), "http://localhost/{{path}}");
//! ```

use std::borrow::Cow;
use std::sync::LazyLock;

use courier_domain::environment::{EnvironmentVariable, lookup};
use courier_domain::request::{
    BinarySource, BodySpec, FormDataField, FormValue, JsonContent, KeyValuePair, RequestSpec,
};
use regex::{Captures, Regex};
use serde_json::Value;

static VARIABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^{}]+)\}\}").expect("valid regex"));

/// Replaces every resolvable `{{name}}` in `input`.
///
/// Borrows the input untouched when the environment is empty or nothing matches.
#[must_use]
pub fn substitute_str<'a>(input: &'a str, environment: &[EnvironmentVariable]) -> Cow<'a, str> {
    if environment.is_empty() {
        return Cow::Borrowed(input);
    }
    VARIABLE.replace_all(input, |caps: &Captures<'_>| {
        lookup(environment, caps[1].trim()).map_or_else(|| caps[0].to_string(), str::to_string)
    })
}

/// Returns a copy of `data` with every string substituted, recursing through
/// arrays and objects. Object keys are left as they are.
#[must_use]
pub fn apply_variables(data: &Value, environment: &[EnvironmentVariable]) -> Value {
    if environment.is_empty() {
        return data.clone();
    }
    match data {
        Value::String(s) => Value::String(substitute_str(s, environment).into_owned()),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|v| apply_variables(v, environment))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), apply_variables(v, environment)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Returns a copy of `request` with every string field substituted.
#[must_use]
pub fn apply_to_request(request: &RequestSpec, environment: &[EnvironmentVariable]) -> RequestSpec {
    if environment.is_empty() {
        return request.clone();
    }
    let sub = |s: &str| substitute_str(s, environment).into_owned();
    let pairs = |list: &[KeyValuePair]| -> Vec<KeyValuePair> {
        list.iter()
            .map(|p| KeyValuePair {
                key: sub(&p.key),
                value: sub(&p.value),
                enabled: p.enabled,
            })
            .collect()
    };

    let body = match &request.body {
        BodySpec::Inputs(list) => BodySpec::Inputs(pairs(list)),
        BodySpec::UrlEncoded(list) => BodySpec::UrlEncoded(pairs(list)),
        BodySpec::Json(JsonContent::Text(text)) => BodySpec::Json(JsonContent::Text(sub(text))),
        BodySpec::Json(JsonContent::Value(value)) => {
            BodySpec::Json(JsonContent::Value(apply_variables(value, environment)))
        }
        BodySpec::FormData(fields) => BodySpec::FormData(
            fields
                .iter()
                .map(|f| FormDataField {
                    key: sub(&f.key),
                    value: match &f.value {
                        FormValue::Text { value } => FormValue::Text { value: sub(value) },
                        FormValue::File { src } => FormValue::File { src: sub(src) },
                    },
                    enabled: f.enabled,
                })
                .collect(),
        ),
        BodySpec::Binary(BinarySource::File { path }) => {
            BodySpec::Binary(BinarySource::File { path: sub(path) })
        }
        BodySpec::Binary(BinarySource::Text { text }) => {
            BodySpec::Binary(BinarySource::Text { text: sub(text) })
        }
        BodySpec::Stream { save_path } => BodySpec::Stream {
            save_path: save_path.as_deref().map(sub),
        },
        other @ (BodySpec::Binary(BinarySource::Bytes { .. }) | BodySpec::None) => other.clone(),
    };

    let mut auth = request.auth.clone();
    auth.config.key = sub(&auth.config.key);
    auth.config.value = sub(&auth.config.value);

    RequestSpec {
        method: request.method,
        url: sub(&request.url),
        headers: pairs(&request.headers),
        params: pairs(&request.params),
        body,
        auth,
    }
}

/// Lists the names referenced in `input` that the environment cannot resolve,
/// in order of appearance.
#[must_use]
pub fn find_unresolved(input: &str, environment: &[EnvironmentVariable]) -> Vec<String> {
    VARIABLE
        .captures_iter(input)
        .map(|caps| caps[1].trim().to_string())
        .filter(|name| lookup(environment, name).is_none())
        .collect()
}
