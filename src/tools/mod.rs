//! JSON tool surface for agent runtimes
//!
//! Each capability (single-page crawl, batch crawl, email) is exposed as a
//! [`Tool`] that takes JSON arguments and returns JSON, so an agent runtime
//! can list the definitions and dispatch calls by name.

mod crawl;
mod email;
mod registry;

pub use crawl::{CrawlBatchTool, CrawlPageTool};
pub use email::SendEmailTool;
pub use registry::ToolRegistry;

use crate::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

/// A callable capability with a JSON-schema described argument object
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn parameters_schema(&self) -> Value;
    async fn execute(&self, args: Value) -> Result<Value>;
}

/// Tool metadata as advertised to an agent runtime
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Reads an optional string argument
fn optional_str<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key).and_then(Value::as_str)
}

/// Reads a required, non-empty string argument
fn required_str<'a>(args: &'a Value, key: &str) -> Result<&'a str> {
    optional_str(args, key)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| crate::RelayError::InvalidInput(format!("Missing '{}' parameter", key)))
}
