//! Integration tests for the reqwest executor
//!
//! These tests run real requests against local servers: wiremock for regular
//! HTTP exchanges and a raw TCP listener where a response must lie about its
//! length or arrive chunked.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use courier_application::{
    ExecuteError, ExecutionRequest, ProgressCallback, RequestExecutor, RequestPayload,
    SendRequest, SendRequestInput,
};
use courier_domain::{BodyMode, ClientSettings, EnvironmentVariable, RequestSpec, ResponseData};
use courier_infrastructure::ReqwestExecutor;
use indexmap::IndexMap;
use serde_json::json;
use tempfile::tempdir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn executor() -> ReqwestExecutor {
    ReqwestExecutor::new(ClientSettings::default()).unwrap()
}

fn get(url: String) -> ExecutionRequest {
    ExecutionRequest {
        url,
        method: "GET".to_string(),
        ..ExecutionRequest::default()
    }
}

/// Serves `response` verbatim to the first connection, then holds it open.
async fn raw_server(response: Vec<u8>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let _ = socket.write_all(&response).await;
            let _ = socket.flush().await;
            tokio::time::sleep(Duration::from_secs(5)).await;
        }
    });
    format!("http://{addr}/")
}

#[tokio::test]
async fn test_declared_length_over_ceiling_is_rejected() {
    let url = raw_server(
        b"HTTP/1.1 200 OK\r\ncontent-type: application/octet-stream\r\ncontent-length: 104857600\r\n\r\npartial"
            .to_vec(),
    )
    .await;

    let err = executor().execute(get(url), None).await.unwrap_err();

    match err {
        ExecuteError::ResponseTooLarge { declared, limit } => {
            assert_eq!(declared, 104_857_600);
            assert_eq!(limit, 50 * 1024 * 1024);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(
        ExecuteError::ResponseTooLarge { declared: 1, limit: 0 }
            .to_string()
            .contains("stream mode")
    );
}

#[tokio::test]
async fn test_chunked_body_over_ceiling_is_rejected() {
    let mut response =
        b"HTTP/1.1 200 OK\r\ncontent-type: application/octet-stream\r\ntransfer-encoding: chunked\r\n\r\n800\r\n"
            .to_vec();
    response.extend(std::iter::repeat_n(b'a', 2048));
    response.extend_from_slice(b"\r\n0\r\n\r\n");
    let url = raw_server(response).await;

    let settings = ClientSettings {
        max_buffer_bytes: 1024,
        ..ClientSettings::default()
    };
    let err = ReqwestExecutor::new(settings)
        .unwrap()
        .execute(get(url), None)
        .await
        .unwrap_err();

    assert!(matches!(err, ExecuteError::ResponseTooLarge { limit: 1024, .. }));
}

#[tokio::test]
async fn test_invalid_url_is_an_error() {
    let err = executor()
        .execute(get("not a url".to_string()), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ExecuteError::InvalidUrl(_)));
}

#[tokio::test]
async fn test_pre_cancelled_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let token = CancellationToken::new();
    token.cancel();
    let mut request = get(server.uri());
    request.cancel = Some(token);

    let result = executor().execute(request, None).await.unwrap();

    assert_eq!(result.status, 0);
    assert!(result.is_cancelled);
    assert!(!result.is_error);
}

#[tokio::test]
async fn test_cancel_while_waiting_for_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
        .mount(&server)
        .await;

    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });
    let mut request = get(server.uri());
    request.cancel = Some(token);

    let started = Instant::now();
    let result = executor().execute(request, None).await.unwrap();

    assert!(result.is_cancelled);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_timeout_becomes_error_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let mut request = get(server.uri());
    request.timeout = Some(Duration::from_millis(200));
    let result = executor().execute(request, None).await.unwrap();

    assert_eq!(result.status, 500);
    assert!(result.is_error);
    assert!(!result.is_cancelled);
    assert!(result.status_text.contains("timed out"), "{}", result.status_text);
}

#[tokio::test]
async fn test_connection_refused_becomes_error_result() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = executor()
        .execute(get(format!("http://{addr}/")), None)
        .await
        .unwrap();

    assert_eq!(result.status, 500);
    assert!(result.is_error);
}

#[tokio::test]
async fn test_not_found_keeps_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "nope"})))
        .mount(&server)
        .await;

    let result = executor()
        .execute(get(format!("{}/missing", server.uri())), None)
        .await
        .unwrap();

    assert_eq!(result.status, 404);
    assert_eq!(result.status_text, "Not Found");
    assert!(result.is_error);
    assert_eq!(result.data, ResponseData::Json(json!({"error": "nope"})));
    assert_eq!(result.headers["content-type"], "application/json");
}

#[tokio::test]
async fn test_png_declared_as_text_is_an_image() {
    let mut png = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    png.extend_from_slice(&[0u8; 64]);
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/plain")
                .set_body_bytes(png),
        )
        .mount(&server)
        .await;

    let result = executor().execute(get(server.uri()), None).await.unwrap();

    assert!(result.is_image);
    assert!(!result.is_error);
    assert_eq!(result.content_type.as_deref(), Some("image/png"));
    assert!(matches!(result.data, ResponseData::Base64(_)));
}

#[tokio::test]
async fn test_large_body_is_classified_off_thread() {
    let body = "x".repeat(300 * 1024);
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/plain")
                .set_body_string(body.clone()),
        )
        .mount(&server)
        .await;

    let result = executor().execute(get(server.uri()), None).await.unwrap();

    assert_eq!(result.data, ResponseData::Text(body));
}

#[tokio::test]
async fn test_progress_is_monotonic_and_completes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![7u8; 256 * 1024]))
        .mount(&server)
        .await;

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let progress: ProgressCallback = Arc::new(move |event| sink.lock().unwrap().push(event));

    let result = executor()
        .execute(get(server.uri()), Some(progress))
        .await
        .unwrap();
    assert_eq!(result.status, 200);

    let events = seen.lock().unwrap();
    assert!(!events.is_empty());
    assert!(events.windows(2).all(|w| w[0].loaded <= w[1].loaded));
    let last = events.last().unwrap();
    assert_eq!(last.progress, 100);
    assert_eq!(last.loaded, last.total);
}

#[tokio::test]
async fn test_stream_mode_saves_to_file() {
    let payload: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(payload.clone()))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let target = dir.path().join("nested").join("out.bin");
    let mut request = get(server.uri());
    request.body_mode = BodyMode::Stream;
    request.stream_path = Some(target.clone());

    let result = executor().execute(request, None).await.unwrap();

    match &result.data {
        ResponseData::Saved { message, path } => {
            assert_eq!(path, &target.display().to_string());
            assert!(message.contains("10000"));
        }
        other => panic!("expected saved data, got {other:?}"),
    }
    assert_eq!(tokio::fs::read(&target).await.unwrap(), payload);
}

#[tokio::test]
async fn test_save_path_header_is_used_and_not_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("saved body"))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let target = dir.path().join("via-header.txt");
    let mut request = get(server.uri());
    request.body_mode = BodyMode::Stream;
    request.headers = IndexMap::from([(
        "X-Save-Path".to_string(),
        target.display().to_string(),
    )]);

    let result = executor().execute(request, None).await.unwrap();

    assert!(matches!(result.data, ResponseData::Saved { .. }));
    assert_eq!(
        tokio::fs::read_to_string(&target).await.unwrap(),
        "saved body"
    );
    let received = server.received_requests().await.unwrap();
    assert!(received[0].headers.get("x-save-path").is_none());
}

#[tokio::test]
async fn test_urlencoded_body_is_sent_with_forced_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("user=john+doe&age=30"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let request = ExecutionRequest {
        url: server.uri(),
        method: "POST".to_string(),
        headers: IndexMap::from([("Content-Type".to_string(), "text/plain".to_string())]),
        body: RequestPayload::Fields(IndexMap::from([
            ("user".to_string(), json!("john doe")),
            ("age".to_string(), json!("30")),
        ])),
        body_mode: BodyMode::UrlEncoded,
        ..ExecutionRequest::default()
    };

    let result = executor().execute(request, None).await.unwrap();

    assert_eq!(result.status, 201);
    assert!(!result.is_error);
}

#[tokio::test]
async fn test_form_data_parts_on_the_wire() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let real = dir.path().join("r.txt");
    tokio::fs::write(&real, "FILEBYTES").await.unwrap();

    let request = ExecutionRequest {
        url: server.uri(),
        method: "POST".to_string(),
        body: RequestPayload::Fields(IndexMap::from([
            ("note".to_string(), json!("a/b")),
            (
                "miss".to_string(),
                json!({"src": "/definitely/missing", "type": "file"}),
            ),
            ("real".to_string(), json!(real.display().to_string())),
            ("n".to_string(), json!({"x": 1})),
        ])),
        body_mode: BodyMode::FormData,
        ..ExecutionRequest::default()
    };

    let result = executor().execute(request, None).await.unwrap();
    assert_eq!(result.status, 200);

    let received = server.received_requests().await.unwrap();
    let content_type = received[0]
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(content_type.starts_with("multipart/form-data; boundary="), "{content_type}");

    let body = String::from_utf8_lossy(&received[0].body);
    assert!(body.contains("name=\"note\"\r\n\r\na/b\r\n"), "{body}");
    assert!(body.contains("name=\"miss\"\r\n\r\n/definitely/missing\r\n"), "{body}");
    assert!(body.contains("name=\"real\"; filename=\"r.txt\""), "{body}");
    assert!(body.contains("FILEBYTES"), "{body}");
    assert!(body.contains("name=\"n\"\r\n\r\n{\"x\":1}\r\n"), "{body}");
}

#[tokio::test]
async fn test_send_request_substitutes_environment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(header("x-token", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
        .expect(1)
        .mount(&server)
        .await;

    let use_case = SendRequest::new(Arc::new(executor()));
    let input = SendRequestInput::new(
        RequestSpec::get("{{base}}/users").with_header("X-Token", "{{token}}"),
    )
    .with_environment(vec![
        EnvironmentVariable::new("base", server.uri()),
        EnvironmentVariable::new("token", "abc"),
    ]);

    let result = use_case.execute(input).await.unwrap();

    assert_eq!(result.status, 200);
    assert_eq!(result.data, ResponseData::Json(json!([{"id": 1}])));
}
