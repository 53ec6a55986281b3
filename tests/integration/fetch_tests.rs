//! Integration tests for the single-URL crawl client
//!
//! These tests use wiremock to stand in for the remote crawl service and a
//! recording pause so retry backoff never waits in real time.

use crawl_relay::config::{CrawlerServiceConfig, UserAgentConfig};
use crawl_relay::crawler::{CrawlClient, FailureKind, FetchRequest, RecordingPause};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a client pointed at `base_url` with a recording pause
fn create_test_client(base_url: &str, timeout_secs: u64) -> (CrawlClient, Arc<RecordingPause>) {
    let service = CrawlerServiceConfig {
        base_url: base_url.to_string(),
        timeout_secs,
        max_retries: 3,
    };
    let pause = Arc::new(RecordingPause::new());
    let client = CrawlClient::new(&service, &UserAgentConfig::default())
        .expect("Failed to build client")
        .with_pause(pause.clone());
    (client, pause)
}

fn secs(values: &[u64]) -> Vec<Duration> {
    values.iter().map(|s| Duration::from_secs(*s)).collect()
}

#[tokio::test]
async fn test_success_returns_payload_and_sends_expected_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/crawl"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "url": "https://example.com/docs",
            "add_delays": false,
            "session_id": "session_42424",
            "selector": "main"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "title": "Docs",
            "content": "Hello"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, pause) = create_test_client(&mock_server.uri(), 30);
    let request = FetchRequest::new("https://example.com/docs")
        .with_selector(Some("main"))
        .with_add_delays(false)
        .with_session_id(Some("session_42424"));

    let outcome = client.fetch(&request, 3).await;

    assert!(outcome.is_success());
    let value = serde_json::to_value(&outcome).unwrap();
    assert_eq!(value["status"], "success");
    assert_eq!(value["data"]["title"], "Docs");
    assert!(pause.delays().is_empty());
}

#[tokio::test]
async fn test_server_errors_then_success() {
    let mock_server = MockServer::start().await;

    // First two attempts hit the 503 mock, the third falls through to 200
    Mock::given(method("POST"))
        .and(path("/crawl"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/crawl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .mount(&mock_server)
        .await;

    let (client, pause) = create_test_client(&mock_server.uri(), 30);
    let outcome = client
        .fetch(&FetchRequest::new("https://example.com/"), 3)
        .await;

    assert!(outcome.is_success());
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
    assert_eq!(pause.delays(), secs(&[5, 10]));
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/crawl"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, pause) = create_test_client(&mock_server.uri(), 30);
    let outcome = client
        .fetch(&FetchRequest::new("https://example.com/missing"), 3)
        .await;

    assert_eq!(outcome.failure_kind(), Some(FailureKind::HttpStatus));
    assert_eq!(outcome.http_status_code(), Some(404));
    assert_eq!(outcome.url(), Some("https://example.com/missing"));
    assert!(pause.delays().is_empty());
}

#[tokio::test]
async fn test_server_errors_exhaust_retries() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/crawl"))
        .respond_with(ResponseTemplate::new(502))
        .expect(3)
        .mount(&mock_server)
        .await;

    let (client, pause) = create_test_client(&mock_server.uri(), 30);
    let outcome = client
        .fetch(&FetchRequest::new("https://example.com/"), 3)
        .await;

    assert_eq!(outcome.failure_kind(), Some(FailureKind::HttpStatus));
    assert_eq!(outcome.http_status_code(), Some(502));
    // No backoff after the final attempt
    assert_eq!(pause.delays(), secs(&[5, 10]));
}

#[tokio::test]
async fn test_timeout_on_every_attempt() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/crawl"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "success"}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let (client, pause) = create_test_client(&mock_server.uri(), 1);
    let outcome = client
        .fetch(&FetchRequest::new("https://slow.example.com/"), 3)
        .await;

    assert_eq!(outcome.failure_kind(), Some(FailureKind::Timeout));
    assert_eq!(outcome.url(), Some("https://slow.example.com/"));

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
    assert_eq!(pause.delays(), secs(&[5, 10]));
}

#[tokio::test]
async fn test_transport_error_uses_short_backoff() {
    // Nothing listens on port 1, so every attempt is refused
    let (client, pause) = create_test_client("http://127.0.0.1:1", 5);
    let outcome = client
        .fetch(&FetchRequest::new("https://example.com/"), 3)
        .await;

    assert_eq!(outcome.failure_kind(), Some(FailureKind::Transport));
    assert_eq!(outcome.url(), Some("https://example.com/"));
    assert_eq!(pause.delays(), secs(&[2, 3]));
}

#[tokio::test]
async fn test_zero_retries_still_makes_one_attempt() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/crawl"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, pause) = create_test_client(&mock_server.uri(), 30);
    let outcome = client
        .fetch(&FetchRequest::new("https://example.com/"), 0)
        .await;

    assert_eq!(outcome.http_status_code(), Some(500));
    assert!(pause.delays().is_empty());
}

#[tokio::test]
async fn test_non_json_success_body_is_transport_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/crawl"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .expect(2)
        .mount(&mock_server)
        .await;

    let (client, pause) = create_test_client(&mock_server.uri(), 30);
    let outcome = client
        .fetch(&FetchRequest::new("https://example.com/"), 2)
        .await;

    assert_eq!(outcome.failure_kind(), Some(FailureKind::Transport));
    assert_eq!(pause.delays(), secs(&[2]));
}

#[tokio::test]
async fn test_reported_failure_in_ok_body_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/crawl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "error"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, pause) = create_test_client(&mock_server.uri(), 30);
    let outcome = client
        .fetch(&FetchRequest::new("https://example.com/"), 3)
        .await;

    assert!(!outcome.is_success());
    assert_eq!(outcome.failure_kind(), Some(FailureKind::ServiceError));
    assert_eq!(outcome.url(), Some("https://example.com/"));
    assert!(pause.delays().is_empty());

    let value = serde_json::to_value(&outcome).unwrap();
    assert_eq!(value["message"], "service reported status \"error\"");
}
