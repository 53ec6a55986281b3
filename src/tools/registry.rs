use crate::config::Config;
use crate::crawler::{BatchOrchestrator, CrawlClient, Pacing};
use crate::tools::{CrawlBatchTool, CrawlPageTool, SendEmailTool, Tool, ToolDefinition};
use crate::{RelayError, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Name-indexed set of tools
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the crawl tools, plus `send_email` when mail is configured
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Arc::new(CrawlClient::new(
            &config.crawler_service,
            &config.user_agent,
        )?);
        let orchestrator =
            BatchOrchestrator::new(client.clone()).with_pacing(Pacing::from(&config.batch));

        let mut registry = Self::new();
        registry.register(Arc::new(CrawlPageTool::new(client)));
        registry.register(Arc::new(CrawlBatchTool::new(orchestrator)));

        if let Some(mail) = &config.mail {
            registry.register(Arc::new(SendEmailTool::new(
                mail.clone(),
                config.user_agent.clone(),
            )));
        }

        Ok(registry)
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Definitions of all registered tools, sorted by name
    pub fn get_tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .values()
            .map(|tool| ToolDefinition {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                parameters: tool.parameters_schema(),
            })
            .collect()
    }

    pub async fn execute(&self, name: &str, args: Value) -> Result<Value> {
        match self.tools.get(name) {
            Some(tool) => {
                tracing::debug!("Executing tool {}", name);
                tool.execute(args).await
            }
            None => Err(RelayError::ToolNotFound(name.to_string())),
        }
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }
}
