use std::sync::{Arc, Mutex};
use std::time::Duration;
use serde_json::{json, Value};
use threecommas::core::kernel::signer::sign;
use threecommas::core::kernel::ErrorHandler;
use threecommas::{ApiConfig, ApiKeyType, ApiVersion, ThreeCommasClient, ThreeCommasError, UserMode};
use reqwest::Method;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio::time::timeout;

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Read one full HTTP request (headers + Content-Length body) off the stream.
async fn read_request(stream: &mut TcpStream) -> String {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut buf).await.unwrap();
        assert!(n > 0, "connection closed before request completed");
        data.extend_from_slice(&buf[..n]);
        if let Some(pos) = find_subsequence(&data, b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let headers = String::from_utf8_lossy(&data[..header_end]).to_string();
    let content_length = headers
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);

    while data.len() < header_end + content_length {
        let n = stream.read(&mut buf).await.unwrap();
        assert!(n > 0, "connection closed before body completed");
        data.extend_from_slice(&buf[..n]);
    }

    String::from_utf8_lossy(&data).to_string()
}

/// Accept one connection, capture the request, answer with a canned response.
fn serve_one(listener: TcpListener, status: &'static str, body: &'static str) -> JoinHandle<String> {
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let request = read_request(&mut stream).await;
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.flush().await.unwrap();
        request
    })
}

async fn local_client(listener: &TcpListener) -> ApiConfig {
    let port = listener.local_addr().unwrap().port();
    ApiConfig::new("test-api-key".to_string(), "test-secret".to_string())
        .base_url(format!("http://127.0.0.1:{}", port))
}

#[tokio::test]
async fn get_request_signs_query_string_and_sets_headers() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let config = local_client(&listener).await;
    let server = serve_one(listener, "200 OK", r#"{"ok":true}"#);

    let client = ThreeCommasClient::new(config).unwrap();
    let response: Value = client
        .custom_request(
            Method::GET,
            ApiVersion::V1,
            "/deals",
            Some(json!({"a": 1, "b": "x"})),
        )
        .await
        .unwrap();
    assert_eq!(response, json!({"ok": true}));

    let request = timeout(Duration::from_secs(5), server).await.unwrap().unwrap();
    let request_lower = request.to_lowercase();

    assert!(
        request.starts_with("GET /public/api/ver1/deals?a=1&b=x HTTP/1.1"),
        "unexpected request line: {}",
        request.lines().next().unwrap_or_default()
    );
    assert!(request_lower.contains("apikey: test-api-key"));

    // Signed over the relative path joined to the canonical query string.
    let expected = sign(
        ApiKeyType::SystemGenerated,
        "/public/api/ver1/deals?a=1&b=x",
        "test-secret",
    )
    .unwrap();
    assert!(request_lower.contains(&format!("signature: {}", expected)));
}

#[tokio::test]
async fn post_request_signs_exact_json_body() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let config = local_client(&listener).await;
    let server = serve_one(listener, "200 OK", r#"{"id":1}"#);

    let client = ThreeCommasClient::new(config).unwrap();
    let _: Value = client
        .custom_request(
            Method::POST,
            ApiVersion::V2,
            "/smart_trades",
            Some(json!({"note": "hi"})),
        )
        .await
        .unwrap();

    let request = timeout(Duration::from_secs(5), server).await.unwrap().unwrap();
    let request_lower = request.to_lowercase();

    assert!(request.starts_with("POST /public/api/ver2/smart_trades HTTP/1.1"));
    assert!(request_lower.contains("content-type: application/json"));
    assert!(request.ends_with(r#"{"note":"hi"}"#), "body must be the exact canonical JSON");

    let expected = sign(
        ApiKeyType::SystemGenerated,
        r#"/public/api/ver2/smart_trades?{"note":"hi"}"#,
        "test-secret",
    )
    .unwrap();
    assert!(request_lower.contains(&format!("signature: {}", expected)));
}

#[tokio::test]
async fn forced_mode_header_is_sent_when_configured() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let config = local_client(&listener).await.forced_mode(UserMode::Paper);
    let server = serve_one(listener, "200 OK", "{}");

    let client = ThreeCommasClient::new(config).unwrap();
    let _: Value = client
        .custom_request(Method::GET, ApiVersion::V1, "/ping", None)
        .await
        .unwrap();

    let request = timeout(Duration::from_secs(5), server).await.unwrap().unwrap();
    assert!(request.to_lowercase().contains("forced-mode: paper"));
}

#[tokio::test]
async fn missing_secret_sends_empty_signature() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let config = ApiConfig::read_only().base_url(format!("http://127.0.0.1:{}", port));
    let server = serve_one(listener, "200 OK", "{}");

    let client = ThreeCommasClient::new(config).unwrap();
    let _: Value = client
        .custom_request(Method::GET, ApiVersion::V1, "/ping", None)
        .await
        .unwrap();

    let request = timeout(Duration::from_secs(5), server).await.unwrap().unwrap();
    let signature_line = request
        .lines()
        .find(|line| line.to_lowercase().starts_with("signature:"))
        .expect("signature header missing");
    assert_eq!(signature_line.split(':').nth(1).unwrap().trim(), "");
}

#[tokio::test]
async fn remote_error_invokes_hook_then_fails() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let config = local_client(&listener).await;
    let server = serve_one(
        listener,
        "422 Unprocessable Entity",
        r#"{"error":"record_invalid","error_description":"Invalid parameters"}"#,
    );

    let seen: Arc<Mutex<Option<Value>>> = Arc::new(Mutex::new(None));
    let seen_in_hook = Arc::clone(&seen);
    let handler: ErrorHandler = Arc::new(move |body| {
        let seen = Arc::clone(&seen_in_hook);
        Box::pin(async move {
            *seen.lock().unwrap() = Some(body);
        })
    });

    let client = ThreeCommasClient::with_error_handler(config, handler).unwrap();
    let result: Result<Value, _> = client
        .custom_request(Method::GET, ApiVersion::V1, "/deals", None)
        .await;

    let err = result.unwrap_err();
    match &err {
        ThreeCommasError::Api { status, body } => {
            assert_eq!(*status, 422);
            assert_eq!(body["error"], "record_invalid");
        }
        other => panic!("expected Api error, got {:?}", other),
    }

    // The hook observed the same body before the call failed.
    let seen = seen.lock().unwrap();
    assert_eq!(seen.as_ref().unwrap()["error"], "record_invalid");

    let _ = timeout(Duration::from_secs(5), server).await.unwrap();
}

#[tokio::test]
async fn non_json_error_body_is_carried_as_string() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let config = local_client(&listener).await;
    let server = serve_one(listener, "502 Bad Gateway", "upstream unavailable");

    let client = ThreeCommasClient::new(config).unwrap();
    let result: Result<Value, _> = client
        .custom_request(Method::GET, ApiVersion::V1, "/ping", None)
        .await;

    match result.unwrap_err() {
        ThreeCommasError::Api { status, body } => {
            assert_eq!(status, 502);
            assert_eq!(body, Value::String("upstream unavailable".to_string()));
        }
        other => panic!("expected Api error, got {:?}", other),
    }

    let _ = timeout(Duration::from_secs(5), server).await.unwrap();
}
