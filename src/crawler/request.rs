//! Request body sent to the crawl service

use rand::Rng;
use serde::Serialize;

/// One page-fetch request for the remote crawl service
///
/// Serializes to the service's JSON body:
/// `{"url": ..., "add_delays": ..., "session_id": ..., "selector": ...}`
/// with `selector` omitted when unset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchRequest {
    /// Target page URL
    pub url: String,

    /// Ask the service to pace its own browser actions
    pub add_delays: bool,

    /// Correlates requests that belong to one logical browsing session
    pub session_id: String,

    /// Optional CSS selector restricting what the service extracts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
}

impl FetchRequest {
    /// Creates a request with pacing on and a freshly generated session id
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            add_delays: true,
            session_id: generate_session_id(),
            selector: None,
        }
    }

    pub fn with_selector(mut self, selector: Option<impl Into<String>>) -> Self {
        self.selector = selector.map(Into::into);
        self
    }

    pub fn with_add_delays(mut self, add_delays: bool) -> Self {
        self.add_delays = add_delays;
        self
    }

    /// Uses the caller's session id; `None` keeps the generated one
    pub fn with_session_id(mut self, session_id: Option<impl Into<String>>) -> Self {
        if let Some(id) = session_id {
            self.session_id = id.into();
        }
        self
    }
}

/// Generates a session id of the form `session_NNNNN`
pub fn generate_session_id() -> String {
    let suffix: u32 = rand::thread_rng().gen_range(10_000..=99_999);
    format!("session_{}", suffix)
}
