use dataflow_client::{DataFlowClient, DataFlowConfig, DataFlowError, RequestBody};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde_json::json;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to create a client pointed at a mock server
async fn create_test_client() -> (MockServer, DataFlowClient) {
    let server = MockServer::start().await;
    let config = DataFlowConfig::with_base_url("test-key", format!("{}/api/v1", server.uri()))
        .expect("Failed to build config");
    let client = DataFlowClient::new(config).expect("Failed to create client");
    (server, client)
}

/// GET sends the accept and bearer headers and returns the body unchanged
#[tokio::test]
async fn test_get_returns_json_body() {
    let _ = env_logger::try_init();
    let (server, client) = create_test_client().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/datasets/5"))
        .and(header("accept", "*/*"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 5})))
        .expect(1)
        .mount(&server)
        .await;

    let url = client.endpoint("datasets/5").unwrap();
    let body = client.get(url).await.expect("GET should succeed");
    assert_eq!(body, json!({"id": 5}));
}

/// Non-success responses become remote errors with the reason phrase
#[tokio::test]
async fn test_get_404_is_remote_error() {
    let _ = env_logger::try_init();
    let (server, client) = create_test_client().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/datasets/99"))
        .respond_with(ResponseTemplate::new(404).set_body_string("\"Dataset not found\""))
        .mount(&server)
        .await;

    let url = client.endpoint("datasets/99").unwrap();
    let err = client.get(url).await.unwrap_err();

    match &err {
        DataFlowError::Remote { status, reason, message } => {
            assert_eq!(*status, 404);
            assert_eq!(reason, "Not Found");
            assert_eq!(message, "Dataset not found");
        }
        other => panic!("Expected remote error, got {:?}", other),
    }
    assert_eq!(err.to_string(), "Not Found: Dataset not found");
}

/// A success status with a non-JSON body is a decode error
#[tokio::test]
async fn test_non_json_body_is_decode_error() {
    let _ = env_logger::try_init();
    let (server, client) = create_test_client().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/instruments"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let url = client.endpoint("instruments").unwrap();
    let err = client.get(url).await.unwrap_err();
    assert!(matches!(err, DataFlowError::Json(_)), "got {:?}", err);
}

/// Connection failures surface as transport errors
#[tokio::test]
async fn test_connection_failure_is_http_error() {
    let _ = env_logger::try_init();
    let config = DataFlowConfig::with_base_url("test-key", "http://127.0.0.1:1/api/v1").unwrap();
    let client = DataFlowClient::new(config).unwrap();

    let url = client.endpoint("instruments").unwrap();
    let err = client.get(url).await.unwrap_err();
    assert!(matches!(err, DataFlowError::Http(_)), "got {:?}", err);
}

/// Caller headers override the defaults on POST
#[tokio::test]
async fn test_post_caller_headers_win() {
    let _ = env_logger::try_init();
    let (server, client) = create_test_client().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/user-settings/"))
        .and(header("accept", "application/json"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    let url = client.endpoint("user-settings/").unwrap();
    let body = client.post(url, &headers, RequestBody::Empty).await.unwrap();
    assert_eq!(body, json!({"ok": true}));
}

/// Form fields are sent URL-encoded
#[tokio::test]
async fn test_post_form_body() {
    let _ = env_logger::try_init();
    let (server, client) = create_test_client().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/forms"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("name=run+1&instrument=7"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"created": true})))
        .expect(1)
        .mount(&server)
        .await;

    let url = client.endpoint("forms").unwrap();
    let fields = vec![
        ("name".to_string(), "run 1".to_string()),
        ("instrument".to_string(), "7".to_string()),
    ];
    let body = client
        .post(url, &HeaderMap::new(), RequestBody::Form(fields))
        .await
        .unwrap();
    assert_eq!(body, json!({"created": true}));
}

/// POST failures use the same error contract as GET
#[tokio::test]
async fn test_post_500_is_remote_error() {
    let _ = env_logger::try_init();
    let (server, client) = create_test_client().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/datasets"))
        .respond_with(ResponseTemplate::new(500).set_body_string("\"boom\""))
        .mount(&server)
        .await;

    let url = client.endpoint("datasets").unwrap();
    let err = client
        .post(url, &HeaderMap::new(), RequestBody::Json(json!({"name": "x"})))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.to_string(), "Internal Server Error: boom");
}

/// An error body that cannot be read still yields a remote error
#[tokio::test]
async fn test_unreadable_error_body_is_remote_error() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let _ = env_logger::try_init();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    // Promise 100 body bytes, send 5, then hang up.
    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = socket.read(&mut buf).await;
        socket
            .write_all(b"HTTP/1.1 503 Service Unavailable\r\nContent-Length: 100\r\n\r\nshort")
            .await
            .unwrap();
        socket.shutdown().await.ok();
    });

    let config = DataFlowConfig::with_base_url("test-key", format!("http://{}/api/v1", addr)).unwrap();
    let client = DataFlowClient::new(config).unwrap();

    let url = client.endpoint("instruments").unwrap();
    let err = client.get(url).await.unwrap_err();
    match err {
        DataFlowError::Remote { status, reason, message } => {
            assert_eq!(status, 503);
            assert_eq!(reason, "Service Unavailable");
            assert_eq!(message, "");
        }
        other => panic!("Expected remote error, got {:?}", other),
    }

    server.await.unwrap();
}
