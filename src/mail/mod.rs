//! Email delivery for crawl findings

mod client;
mod message;

pub use client::{MailClient, SendReceipt};
pub use message::EmailMessage;

use thiserror::Error;

/// Errors that can occur while sending mail
#[derive(Debug, Error)]
pub enum MailError {
    #[error("Access token environment variable {0} is not set")]
    MissingToken(String),

    #[error("Invalid recipient address: {0}")]
    InvalidRecipient(String),

    #[error("Header {0} contains a line break")]
    InvalidHeader(String),

    #[error("Mail API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Malformed mail API response: {0}")]
    MalformedResponse(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}
