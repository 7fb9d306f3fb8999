//! HTTP backend client integration tests
//!
//! Verifies request shapes and error mapping of `HttpBackendClient` and the
//! streaming `FileDownloader` against a `wiremock` mock server.

mod common;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use agentdesk::client::{BackendClient, ConnectionCheckRequest, HttpBackendClient};
use agentdesk::config::BackendConfig;
use agentdesk::download::{Downloader, FileDownloader};
use agentdesk::error::AgentDeskError;

use common::client_for;

#[tokio::test]
async fn test_session_id_is_path_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/sessions/weird%20id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "deleted"})))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server).delete_session("weird id").await.unwrap();
}

#[tokio::test]
async fn test_server_error_carries_detail_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sessions/x/load"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({"detail": "Session not found"})))
        .mount(&server)
        .await;

    let err = client_for(&server).load_session("x").await.unwrap_err();
    match err.downcast_ref::<AgentDeskError>() {
        Some(AgentDeskError::Server { status, message }) => {
            assert_eq!(*status, 422);
            assert_eq!(message.as_deref(), Some("Session not found"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server).list_sessions().await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AgentDeskError>(),
        Some(AgentDeskError::Decode(_))
    ));
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    let client = HttpBackendClient::new(&BackendConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        timeout_seconds: Some(2),
        ..BackendConfig::default()
    })
    .unwrap();

    let err = client.health().await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AgentDeskError>(),
        Some(AgentDeskError::Transport(_))
    ));
}

#[tokio::test]
async fn test_binary_view_error_is_typed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files/view"))
        .and(query_param("path", "img.png"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"error": "Binary file cannot be viewed as text"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).view_file("img.png").await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AgentDeskError>(),
        Some(AgentDeskError::BinaryFile(p)) if p == "img.png"
    ));
}

#[tokio::test]
async fn test_check_connection_and_health() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/llm/check-connection"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "connected": false,
            "message": "LM Studio returned status 404",
            "models": []
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "healthy", "version": "0.1.0"})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client
        .check_connection(&ConnectionCheckRequest {
            provider_name: "lm-studio".to_string(),
            server_address: "http://127.0.0.1:1234".to_string(),
        })
        .await
        .unwrap();
    assert!(!response.connected);
    assert_eq!(response.models, Some(Vec::new()));

    let health = client.health().await.unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.version.as_deref(), Some("0.1.0"));
}

#[tokio::test]
async fn test_file_downloader_streams_into_directory() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files/download"))
        .and(query_param("path", "data/blob.bin"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(vec![0u8, 159, 146, 150], "application/octet-stream"),
        )
        .mount(&server)
        .await;

    let client = HttpBackendClient::new(&BackendConfig {
        base_url: server.uri(),
        ..BackendConfig::default()
    })
    .unwrap();
    let dir = TempDir::new().unwrap();
    let downloader = FileDownloader::new(client.http().clone(), dir.path().join("downloads"));

    let url = client.download_url("data/blob.bin").unwrap();
    downloader.download(&url, "blob.bin").await.unwrap();

    let written = std::fs::read(dir.path().join("downloads").join("blob.bin")).unwrap();
    assert_eq!(written, vec![0u8, 159, 146, 150]);
}

#[tokio::test]
async fn test_file_downloader_reports_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files/download"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "File not found"})))
        .mount(&server)
        .await;

    let client = HttpBackendClient::new(&BackendConfig {
        base_url: server.uri(),
        ..BackendConfig::default()
    })
    .unwrap();
    let dir = TempDir::new().unwrap();
    let downloader = FileDownloader::new(client.http().clone(), dir.path());

    let url = client.download_url("gone.txt").unwrap();
    let err = downloader.download(&url, "gone.txt").await.unwrap_err();
    assert_eq!(
        err.downcast_ref::<AgentDeskError>()
            .and_then(AgentDeskError::server_message),
        Some("File not found")
    );
    assert!(!dir.path().join("gone.txt").exists());
}

#[tokio::test]
async fn test_current_session_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/session/save"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "session_saved",
            "message": "Session saved successfully"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/session/clear"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "session_cleared",
            "message": "All agent memories cleared"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/session/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "agents": [
                {"type": "casual_agent", "name": "Casual", "memory_messages": 3},
                {"type": "coder_agent", "name": "Coder", "memory_messages": 0}
            ],
            "is_generating": true,
            "current_agent": "Casual"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let saved = client.save_current_session().await.unwrap();
    assert_eq!(saved.status, "session_saved");

    let cleared = client.clear_current_session().await.unwrap();
    assert_eq!(cleared.message.as_deref(), Some("All agent memories cleared"));

    let info = client.current_session_info().await.unwrap();
    assert_eq!(info.agents.len(), 2);
    assert_eq!(info.agents[1].kind, "coder_agent");
    assert!(info.is_generating);
}

#[tokio::test]
async fn test_session_info_failure_is_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/session/info"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "agents not ready"})))
        .mount(&server)
        .await;

    let err = client_for(&server).current_session_info().await.unwrap_err();
    assert_eq!(
        err.downcast_ref::<AgentDeskError>()
            .and_then(AgentDeskError::server_message),
        Some("agents not ready")
    );
}
