//! Integration tests for batch crawling
//!
//! These tests run the batch orchestrator against a wiremock crawl service
//! and check aggregation, ordering and pacing end-to-end.

use crawl_relay::config::{parse_config, CrawlerServiceConfig, UserAgentConfig};
use crawl_relay::crawler::{
    crawl_urls, BatchOrchestrator, BatchResponse, CrawlClient, FailureKind, Pacing,
    RecordingPause,
};
use crawl_relay::{parse_target_list, UrlRef};
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

/// Matches crawl requests whose JSON body targets a given page URL
struct TargetUrl(&'static str);

impl Match for TargetUrl {
    fn matches(&self, request: &Request) -> bool {
        serde_json::from_slice::<Value>(&request.body)
            .map(|body| body["url"] == self.0)
            .unwrap_or(false)
    }
}

/// Builds an orchestrator whose client and pacing both record pauses
fn create_orchestrator(base_url: &str) -> (BatchOrchestrator, Arc<RecordingPause>) {
    let client = CrawlClient::new(
        &CrawlerServiceConfig::new(base_url),
        &UserAgentConfig::default(),
    )
    .expect("Failed to build client")
    .with_pause(Arc::new(RecordingPause::new()));

    let pacing_pause = Arc::new(RecordingPause::new());
    let orchestrator = BatchOrchestrator::new(Arc::new(client))
        .with_pause(pacing_pause.clone())
        .with_pacing(Pacing::default());

    (orchestrator, pacing_pause)
}

#[tokio::test]
async fn test_mixed_batch_end_to_end() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/crawl"))
        .and(TargetUrl("https://ok.example.com/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "url": "https://ok.example.com/",
            "title": "OK"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/crawl"))
        .and(TargetUrl("https://missing.example.com/"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (orchestrator, pacing) = create_orchestrator(&mock_server.uri());
    let targets = parse_target_list(
        r#"[
            "https://ok.example.com/",
            {"title": "search hit without a link"},
            {"url": "https://missing.example.com/", "title": "Gone"}
        ]"#,
    )
    .unwrap();

    let response = orchestrator.run(&targets, Some("article")).await;
    let report = response.into_report().expect("Expected a completed report");

    assert_eq!(report.total_urls, 3);
    assert_eq!(report.successful, 1);
    assert_eq!(report.failed, 2);
    assert_eq!(report.results.len(), 3);

    assert!(report.results[0].is_success());
    assert_eq!(
        report.results[1].failure_kind(),
        Some(FailureKind::InvalidInput)
    );
    assert_eq!(report.results[2].http_status_code(), Some(404));
    assert_eq!(report.results[2].url(), targets[2].resolve());

    // Only two requests reached the service
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 2);

    // Pacing follows the first fetch; the invalid element and the last one add none
    let delays = pacing.delays();
    assert_eq!(delays.len(), 1);
    assert!((1.5..=2.5).contains(&delays[0].as_secs_f64()));
}

#[tokio::test]
async fn test_every_request_carries_shared_selector() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/crawl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .expect(3)
        .mount(&mock_server)
        .await;

    let (orchestrator, pacing) = create_orchestrator(&mock_server.uri());
    let targets: Vec<UrlRef> = [
        "https://a.example.com/",
        "https://b.example.com/",
        "https://c.example.com/",
    ]
    .into_iter()
    .map(UrlRef::from)
    .collect();

    let report = orchestrator
        .run(&targets, Some("#content"))
        .await
        .into_report()
        .unwrap();
    assert_eq!(report.successful, 3);
    assert_eq!(pacing.delays().len(), 2);

    let requests = mock_server.received_requests().await.unwrap();
    let bodies: Vec<Value> = requests
        .iter()
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect();

    let urls: Vec<&str> = bodies.iter().map(|b| b["url"].as_str().unwrap()).collect();
    assert_eq!(
        urls,
        vec!["https://a.example.com/", "https://b.example.com/", "https://c.example.com/"]
    );
    for body in &bodies {
        assert_eq!(body["selector"], "#content");
        assert_eq!(body["add_delays"], true);
        assert!(body["session_id"].as_str().unwrap().starts_with("session_"));
    }
}

#[tokio::test]
async fn test_empty_batch_makes_no_requests() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = parse_config(&format!(
        "[crawler-service]\nbase-url = \"{}\"\n",
        mock_server.uri()
    ))
    .unwrap();

    let response = crawl_urls(&config, &[], None).await.unwrap();

    assert!(matches!(response, BatchResponse::Error { .. }));
    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({"status": "error", "error": "No URLs provided"})
    );
}

#[tokio::test]
async fn test_report_serializes_with_completed_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/crawl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .mount(&mock_server)
        .await;

    let (orchestrator, _) = create_orchestrator(&mock_server.uri());
    let response = orchestrator
        .run(&[UrlRef::from("https://a.example.com/")], None)
        .await;

    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["status"], "completed");
    assert_eq!(value["total_urls"], 1);
    assert_eq!(value["successful"], 1);
    assert_eq!(value["failed"], 0);
    assert!(value["elapsed_seconds"].as_f64().unwrap() >= 0.0);
    assert_eq!(value["results"][0]["status"], "success");
}

#[tokio::test]
async fn test_service_reported_failure_counts_as_failed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/crawl"))
        .and(TargetUrl("https://broken.example.com/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "error": "navigation failed"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/crawl"))
        .and(TargetUrl("https://ok.example.com/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (orchestrator, _) = create_orchestrator(&mock_server.uri());
    let targets = [
        UrlRef::from("https://broken.example.com/"),
        UrlRef::from("https://ok.example.com/"),
    ];

    let report = orchestrator.run(&targets, None).await.into_report().unwrap();

    assert_eq!(report.successful, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(
        report.results[0].failure_kind(),
        Some(FailureKind::ServiceError)
    );
    assert_eq!(report.results[0].url(), Some("https://broken.example.com/"));
    assert!(report.results[1].is_success());

    let value = serde_json::to_value(&report.results[0]).unwrap();
    assert_eq!(value["status"], "error");
    assert_eq!(value["message"], "navigation failed");
    assert_eq!(value["data"]["status"], "error");
}

#[tokio::test]
async fn test_padded_entry_is_reported_as_given() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/crawl"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (orchestrator, _) = create_orchestrator(&mock_server.uri());
    let targets = [UrlRef::from(" https://a.example.com/ ")];

    let report = orchestrator.run(&targets, None).await.into_report().unwrap();

    assert_eq!(report.failed, 1);
    assert_eq!(report.results[0].url(), Some(" https://a.example.com/ "));
    assert_eq!(report.results[0].url(), targets[0].resolve());

    let requests = mock_server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["url"], " https://a.example.com/ ");
}
