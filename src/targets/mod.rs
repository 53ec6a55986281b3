//! Batch targets
//!
//! A batch element is either a bare URL string or a record carrying a `url`
//! field (the shape URL-discovery agents tend to emit). [`UrlRef`] models both
//! and [`UrlRef::resolve`] is the single place a URL is pulled out of one.

mod list;

pub use list::parse_target_list;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One element of a batch request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UrlRef {
    /// A bare URL string
    Plain(String),

    /// A record such as `{"url": "...", "title": "..."}`
    Tagged(TaggedUrl),

    /// Anything else (numbers, arrays, records with a non-string `url`)
    Other(Value),
}

/// A record that may carry a `url` field alongside arbitrary metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedUrl {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UrlRef {
    /// Extracts a usable URL, or `None` when the element carries none
    ///
    /// Blank strings count as missing. A non-blank URL is returned exactly as
    /// given, surrounding whitespace included.
    pub fn resolve(&self) -> Option<&str> {
        let url = match self {
            Self::Plain(url) => url.as_str(),
            Self::Tagged(TaggedUrl { url: Some(url), .. }) => url.as_str(),
            Self::Tagged(_) | Self::Other(_) => return None,
        };

        if url.trim().is_empty() {
            None
        } else {
            Some(url)
        }
    }

    /// The element as raw JSON, for error reports
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl From<&str> for UrlRef {
    fn from(url: &str) -> Self {
        Self::Plain(url.to_string())
    }
}

impl From<String> for UrlRef {
    fn from(url: String) -> Self {
        Self::Plain(url)
    }
}
