//! Email tool for delivering findings

use crate::config::{MailConfig, UserAgentConfig};
use crate::mail::MailClient;
use crate::tools::{required_str, Tool};
use crate::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

/// Sends a plain-text email from the authenticated mailbox
///
/// The access token is read when the tool runs, so a token rotated into the
/// environment after startup is picked up on the next call.
pub struct SendEmailTool {
    config: MailConfig,
    user_agent: UserAgentConfig,
}

impl SendEmailTool {
    pub fn new(config: MailConfig, user_agent: UserAgentConfig) -> Self {
        Self { config, user_agent }
    }
}

#[async_trait]
impl Tool for SendEmailTool {
    fn name(&self) -> &str {
        "send_email"
    }

    fn description(&self) -> &str {
        "Send an email from the authenticated account. Use it to deliver findings, links and suggested next steps."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "recipient_id": {
                    "type": "string",
                    "description": "Recipient email address"
                },
                "subject": {
                    "type": "string",
                    "description": "Subject line"
                },
                "message": {
                    "type": "string",
                    "description": "Plain-text message body"
                }
            },
            "required": ["recipient_id", "subject", "message"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let recipient = required_str(&args, "recipient_id")?;
        let subject = required_str(&args, "subject")?;
        let message = args.get("message").and_then(Value::as_str).unwrap_or("");

        let client = MailClient::from_env(&self.config, &self.user_agent)?;
        let receipt = client.send(recipient, subject, message).await?;

        Ok(serde_json::to_value(receipt)?)
    }
}
