//! Plain-text RFC 5322 message construction

use crate::mail::MailError;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine;

/// A plain-text email ready to be handed to the mailbox API
#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    to: String,
    from: String,
    subject: String,
    body: String,
}

impl EmailMessage {
    /// Builds a message, rejecting header values that would inject headers
    pub fn new(
        to: impl Into<String>,
        from: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<Self, MailError> {
        let message = Self {
            to: to.into(),
            from: from.into(),
            subject: subject.into(),
            body: body.into(),
        };

        for (name, value) in [
            ("To", &message.to),
            ("From", &message.from),
            ("Subject", &message.subject),
        ] {
            if value.contains(['\r', '\n']) {
                return Err(MailError::InvalidHeader(name.to_string()));
            }
        }

        Ok(message)
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Renders headers and body with CRLF line endings
    pub fn to_rfc5322(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("To: {}\r\n", self.to));
        out.push_str(&format!("From: {}\r\n", self.from));
        out.push_str(&format!("Subject: {}\r\n", encode_header(&self.subject)));
        out.push_str("MIME-Version: 1.0\r\n");
        out.push_str("Content-Type: text/plain; charset=\"utf-8\"\r\n");
        out.push_str("Content-Transfer-Encoding: 8bit\r\n");
        out.push_str("\r\n");

        for line in self.body.lines() {
            out.push_str(line);
            out.push_str("\r\n");
        }

        out
    }

    /// URL-safe base64 of the rendered message, as the `raw` API field expects
    pub fn encode_raw(&self) -> String {
        URL_SAFE.encode(self.to_rfc5322().as_bytes())
    }
}

/// RFC 2047 encoded-word for non-ASCII header text
fn encode_header(value: &str) -> String {
    if value.is_ascii() {
        value.to_string()
    } else {
        format!("=?UTF-8?B?{}?=", STANDARD.encode(value.as_bytes()))
    }
}
