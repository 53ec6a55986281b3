//! Integration tests for the mailbox API client

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use crawl_relay::config::{MailConfig, UserAgentConfig};
use crawl_relay::mail::{MailClient, MailError};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEND_PATH: &str = "/gmail/v1/users/me/messages/send";

fn create_client(api_base: &str) -> MailClient {
    let config = MailConfig {
        api_base: api_base.to_string(),
        ..MailConfig::default()
    };
    MailClient::with_token(&config, &UserAgentConfig::default(), "test-token")
        .expect("Failed to build mail client")
}

#[tokio::test]
async fn test_send_posts_encoded_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SEND_PATH))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "msg-123",
            "threadId": "thread-9"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server.uri());
    let receipt = client
        .send("user@example.com", "Crawl findings", "Two pages fetched.\nOne failed.")
        .await
        .unwrap();

    assert_eq!(receipt.status, "success");
    assert_eq!(receipt.message_id, "msg-123");

    let requests = mock_server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let raw = URL_SAFE.decode(body["raw"].as_str().unwrap()).unwrap();
    let message = String::from_utf8(raw).unwrap();

    assert!(message.contains("To: user@example.com\r\n"));
    assert!(message.contains("From: me\r\n"));
    assert!(message.contains("Subject: Crawl findings\r\n"));
    assert!(message.ends_with("Two pages fetched.\r\nOne failed.\r\n"));
}

#[tokio::test]
async fn test_api_rejection_is_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SEND_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid credentials"))
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server.uri());
    let result = client.send("user@example.com", "Hi", "body").await;

    match result {
        Err(MailError::Api { status, body }) => {
            assert_eq!(status, 401);
            assert_eq!(body, "invalid credentials");
        }
        other => panic!("expected API error, got {:?}", other.map(|r| r.message_id)),
    }
}

#[tokio::test]
async fn test_response_without_id_is_malformed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SEND_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"labelIds": ["SENT"]})))
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server.uri());
    let result = client.send("user@example.com", "Hi", "body").await;

    assert!(matches!(result, Err(MailError::MalformedResponse(_))));
}

#[tokio::test]
async fn test_invalid_recipient_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server.uri());
    let result = client.send("nobody", "Hi", "body").await;

    assert!(matches!(result, Err(MailError::InvalidRecipient(_))));
}
