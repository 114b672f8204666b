//! Subcommand handlers.

use std::error::Error;
use std::sync::Arc;

use courier_application::{SendRequest, SendRequestInput};
use courier_domain::request::{BinarySource, JsonContent};
use courier_domain::{BodySpec, ClientSettings, EnvironmentVariable, HttpMethod, RequestSpec};
use courier_infrastructure::{
    DuplicateNamePolicy, ReqwestExecutor, to_http_file, to_json_stable, to_structured_map,
    WarningStats, translate_environment, translate_str,
};
use tracing::{info, warn};

use crate::cli::{ImportArgs, ImportFormat, SendArgs};

/// Error type at the binary edge.
pub type CliResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

/// Translates a collection file and renders it in the requested format.
pub async fn import(args: &ImportArgs) -> CliResult<String> {
    let text = tokio::fs::read_to_string(&args.file).await?;
    let collection = translate_str(&text)?;
    for warning in &collection.warnings {
        warn!("{warning}");
    }
    let stats = WarningStats::from_warnings(&collection.warnings);
    if stats.total() > 0 {
        info!(
            info = stats.info_count,
            warnings = stats.warning_count,
            "collection translated with {} notes",
            stats.total()
        );
    }

    let output = match args.format {
        ImportFormat::Http => to_http_file(&collection)?,
        ImportFormat::Structured => {
            let policy = if args.reject_duplicates {
                DuplicateNamePolicy::Reject
            } else {
                DuplicateNamePolicy::Overwrite
            };
            to_json_stable(&to_structured_map(&collection, policy)?)?
        }
        ImportFormat::Model => to_json_stable(&collection.into_collection())?,
    };
    Ok(output)
}

/// Sends one request and returns the result as JSON.
pub async fn send(args: &SendArgs, mut settings: ClientSettings) -> CliResult<String> {
    if let Some(secs) = args.timeout {
        settings.timeout_ms = secs.saturating_mul(1000);
    }
    let request = build_request(args)?;
    let environment = match &args.env {
        Some(path) => load_environment(&tokio::fs::read_to_string(path).await?)?,
        None => Vec::new(),
    };

    let executor = Arc::new(ReqwestExecutor::new(settings)?);
    let input = SendRequestInput::new(request).with_environment(environment);

    let result = SendRequest::new(executor).execute(input).await?;
    Ok(to_json_stable(&result)?)
}

/// Builds the request described by the `send` arguments.
pub fn build_request(args: &SendArgs) -> CliResult<RequestSpec> {
    let method: HttpMethod = args.method.parse()?;
    let mut request = RequestSpec::new(method, args.url.clone());
    for raw in &args.headers {
        let (key, value) = parse_header(raw)?;
        request = request.with_header(key, value);
    }
    request.body = match (&args.data, &args.save) {
        (Some(data), _) => body_from_text(data),
        (None, Some(path)) => BodySpec::Stream {
            save_path: Some(path.display().to_string()),
        },
        (None, None) => BodySpec::None,
    };
    Ok(request)
}

/// Splits `Key: Value`.
pub fn parse_header(raw: &str) -> CliResult<(String, String)> {
    let (key, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("invalid header '{raw}', expected 'Key: Value'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("invalid header '{raw}', empty name").into());
    }
    Ok((key.to_string(), value.trim().to_string()))
}

fn body_from_text(data: &str) -> BodySpec {
    if serde_json::from_str::<serde_json::Value>(data).is_ok() {
        BodySpec::Json(JsonContent::Text(data.to_string()))
    } else {
        BodySpec::Binary(BinarySource::Text {
            text: data.to_string(),
        })
    }
}

fn load_environment(text: &str) -> CliResult<Vec<EnvironmentVariable>> {
    let doc: serde_json::Value = serde_json::from_str(text)?;
    let environment = translate_environment(&doc)?;
    info!(name = %environment.name, variables = environment.variables.len(), "environment loaded");
    Ok(environment.variables)
}
