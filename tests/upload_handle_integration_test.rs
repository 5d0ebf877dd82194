//! Kept in its own test binary: the open descriptor count is process-wide,
//! so no other test may run alongside it.
#![cfg(target_os = "linux")]

use dataflow_client::{DataFlowClient, DataFlowConfig, DataFlowError};
use std::io::Write;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Number of descriptors currently open in this process
fn open_fd_count() -> usize {
    std::fs::read_dir("/proc/self/fd")
        .expect("Failed to list /proc/self/fd")
        .count()
}

/// Failed uploads must not leave the local file open
#[tokio::test]
async fn test_failed_uploads_close_file_handles() {
    let _ = env_logger::try_init();

    let server = MockServer::start().await;
    let config = DataFlowConfig::with_base_url("test-key", format!("{}/api/v1", server.uri()))
        .expect("Failed to build config");
    let client = DataFlowClient::new(config).expect("Failed to create client");

    Mock::given(method("POST"))
        .and(path("/api/v1/dataset-file-upload"))
        .respond_with(ResponseTemplate::new(500).set_body_string("\"storage offline\""))
        .mount(&server)
        .await;

    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(b"frame data").expect("Failed to write temp file");
    file.flush().expect("Failed to flush temp file");

    // Warm up so the pooled connection is already counted.
    let err = client.files().upload(file.path(), 1, None, None).await.unwrap_err();
    assert!(err.is_remote());

    let before = open_fd_count();
    for _ in 0..20 {
        let err = client.files().upload(file.path(), 1, None, None).await.unwrap_err();
        assert!(matches!(err, DataFlowError::Remote { status: 500, .. }), "got {:?}", err);
    }
    let after = open_fd_count();

    assert!(
        after <= before,
        "descriptors leaked: {} open before, {} after 20 failed uploads",
        before,
        after
    );
}
