//! Per-URL fetch outcomes

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Why a fetch did not produce a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Every attempt (or the last one) exceeded the request timeout
    Timeout,
    /// The service answered with a non-2xx status
    HttpStatus,
    /// DNS, connection, TLS or body decoding failure
    Transport,
    /// The batch element carried no usable URL
    InvalidInput,
    /// The service answered 2xx but its body reported a failed crawl
    ServiceError,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::HttpStatus => "http_status",
            Self::Transport => "transport",
            Self::InvalidInput => "invalid_input",
            Self::ServiceError => "service_error",
        }
    }
}

/// Result of fetching one URL through the crawl service
///
/// Serialized with a `status` tag of `"success"` or `"error"`, which is the
/// shape agent runtimes consume. The service's JSON body is nested under
/// `data` in both cases rather than returned at the top level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum FetchOutcome {
    /// The service returned a 2xx response that did not report a failure
    #[serde(rename = "success")]
    Success {
        /// JSON body returned by the service
        data: Value,
    },

    /// The fetch failed after the retry policy gave up
    #[serde(rename = "error")]
    Failure {
        error: FailureKind,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        http_status: Option<u16>,

        /// The URL that was attempted; absent for unresolvable input
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,

        message: String,

        /// The raw batch element, kept for unresolvable input
        #[serde(default, skip_serializing_if = "Option::is_none")]
        input: Option<Value>,

        /// Body of a 2xx response whose own `status` was not `"success"`
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<Value>,
    },
}

impl FetchOutcome {
    pub fn success(data: Value) -> Self {
        Self::Success { data }
    }

    pub fn timeout(url: &str) -> Self {
        Self::Failure {
            error: FailureKind::Timeout,
            http_status: None,
            url: Some(url.to_string()),
            message: "timeout".to_string(),
            input: None,
            data: None,
        }
    }

    pub fn http_status(url: &str, status: u16) -> Self {
        Self::Failure {
            error: FailureKind::HttpStatus,
            http_status: Some(status),
            url: Some(url.to_string()),
            message: format!("HTTP {}", status),
            input: None,
            data: None,
        }
    }

    pub fn transport(url: &str, message: impl Into<String>) -> Self {
        Self::Failure {
            error: FailureKind::Transport,
            http_status: None,
            url: Some(url.to_string()),
            message: message.into(),
            input: None,
            data: None,
        }
    }

    pub fn invalid_input(input: Value) -> Self {
        Self::Failure {
            error: FailureKind::InvalidInput,
            http_status: None,
            url: None,
            message: "invalid_url".to_string(),
            input: Some(input),
            data: None,
        }
    }

    /// A 2xx body that carries a `status` other than `"success"`
    ///
    /// The message is taken from the body's `error` or `message` field when
    /// one is present.
    pub fn service_error(url: &str, data: Value) -> Self {
        let message = ["error", "message"]
            .iter()
            .find_map(|key| data.get(*key).and_then(|v| v.as_str()))
            .map(str::to_string)
            .unwrap_or_else(|| {
                format!(
                    "service reported status {}",
                    data.get("status").unwrap_or(&Value::Null)
                )
            });

        Self::Failure {
            error: FailureKind::ServiceError,
            http_status: None,
            url: Some(url.to_string()),
            message,
            input: None,
            data: Some(data),
        }
    }

    /// Classifies the JSON body of a 2xx response
    ///
    /// A body without a string `status` field, or with `"success"`, is a
    /// success. Any other reported status is a service-side failure.
    pub fn from_service_body(url: &str, data: Value) -> Self {
        match data.get("status").and_then(|v| v.as_str()) {
            Some(status) if status != "success" => Self::service_error(url, data),
            _ => Self::success(data),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The failure kind, or `None` for a success
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error, .. } => Some(*error),
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { url, .. } => url.as_deref(),
        }
    }

    pub fn http_status_code(&self) -> Option<u16> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { http_status, .. } => *http_status,
        }
    }
}
