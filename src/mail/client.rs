//! Mailbox API client
//!
//! Sends messages through a Gmail-compatible REST endpoint:
//! `POST <api-base>/gmail/v1/users/<user-id>/messages/send` with a bearer
//! token and a `{"raw": <base64url message>}` body. Obtaining and refreshing
//! the token is left to whoever populates the configured environment variable.

use crate::config::{is_valid_email, MailConfig, UserAgentConfig};
use crate::mail::message::EmailMessage;
use crate::mail::MailError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

/// Confirmation returned after a message is accepted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendReceipt {
    pub status: String,
    pub message_id: String,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: Option<String>,
}

/// Authenticated client for the mailbox API
pub struct MailClient {
    client: Client,
    endpoint: String,
    from: String,
    access_token: String,
}

impl MailClient {
    /// Creates a client using the token in `config.access_token_env`
    pub fn from_env(config: &MailConfig, user_agent: &UserAgentConfig) -> Result<Self, MailError> {
        let token = std::env::var(&config.access_token_env)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| MailError::MissingToken(config.access_token_env.clone()))?;

        Self::with_token(config, user_agent, token)
    }

    /// Creates a client with an explicit access token
    pub fn with_token(
        config: &MailConfig,
        user_agent: &UserAgentConfig,
        access_token: impl Into<String>,
    ) -> Result<Self, MailError> {
        let client = Client::builder()
            .user_agent(user_agent.header_value())
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/gmail/v1/users/{}/messages/send",
                config.api_base.trim_end_matches('/'),
                config.user_id
            ),
            from: config.from.clone(),
            access_token: access_token.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends a plain-text email
    ///
    /// # Returns
    ///
    /// * `Ok(SendReceipt)` - The API accepted the message
    /// * `Err(MailError)` - Bad recipient/headers, API rejection, or transport failure
    pub async fn send(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<SendReceipt, MailError> {
        if !is_valid_email(recipient) {
            return Err(MailError::InvalidRecipient(recipient.to_string()));
        }

        let message = EmailMessage::new(recipient, self.from.as_str(), subject, body)?;
        tracing::info!("[Mail] Sending '{}' to {}", message.subject(), message.to());

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.access_token)
            .json(&json!({ "raw": message.encode_raw() }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("[Mail] API rejected message: HTTP {}", status);
            return Err(MailError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: SendResponse = response
            .json()
            .await
            .map_err(|e| MailError::MalformedResponse(e.to_string()))?;
        let message_id = parsed
            .id
            .ok_or_else(|| MailError::MalformedResponse("missing message id".to_string()))?;

        tracing::info!("[Mail] Sent message {}", message_id);
        Ok(SendReceipt {
            status: "success".to_string(),
            message_id,
        })
    }
}
