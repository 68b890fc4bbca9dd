//! Tool registry: the single source of truth mapping tool names to executors

use crate::config::ToolsConfig;
use crate::error::{Error, Result, ToolError};
use crate::llm::{ChatClient, FunctionDefinition, ImageClient, ToolDefinition};
use crate::tools::builtin;
use crate::tools::{Tool, ToolCall, ToolResult};
use std::sync::Arc;

/// Registry of callable tools
///
/// Registration order is preserved: `specs()` presents the catalog to the
/// model in the order tools were registered.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register a tool
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.push(tool);
    }

    /// Create a registry with all built-in tools, in their fixed catalog order
    pub fn with_builtins(
        config: &ToolsConfig,
        chat_client: Arc<dyn ChatClient>,
        image_client: Arc<dyn ImageClient>,
    ) -> Self {
        let http = reqwest::Client::new();

        let mut registry = Self::new();
        registry.register(Box::new(builtin::WebSearchTool::new(
            config.clone(),
            http.clone(),
        )));
        registry.register(Box::new(builtin::WeatherTool::new(
            config.weather_api.clone(),
            http.clone(),
        )));
        registry.register(Box::new(builtin::CurrentTimeTool::new()));
        registry.register(Box::new(builtin::DrawImageTool::new(
            config.image_model.clone(),
            config.image_size.clone(),
            image_client,
        )));
        registry.register(Box::new(builtin::ImageQaTool::new(
            config.vision_model.clone(),
            chat_client,
        )));
        registry.register(Box::new(builtin::SummarizeUrlTool::new(
            config.reader_api.clone(),
            config.fetch_timeout,
            http,
        )));
        registry
    }

    /// Resolve a tool by name
    pub fn resolve(&self, name: &str) -> Result<&dyn Tool> {
        self.tools
            .iter()
            .find(|tool| tool.name() == name)
            .map(|tool| tool.as_ref())
            .ok_or_else(|| {
                ToolError::NotFound {
                    name: name.to_string(),
                }
                .into()
            })
    }

    /// List all registered tool names, in registration order
    pub fn list(&self) -> Vec<&str> {
        self.tools.iter().map(|tool| tool.name()).collect()
    }

    /// Get the full tool catalog for presentation to the model
    pub fn specs(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|tool| ToolDefinition {
                tool_type: "function".to_string(),
                function: FunctionDefinition {
                    name: tool.name().to_string(),
                    description: tool.description().to_string(),
                    parameters: tool.parameters_schema(),
                },
            })
            .collect()
    }

    /// Execute a tool call, applying the propagation policy
    ///
    /// Unknown tools, configuration errors and argument-decode failures are
    /// structural and propagate as `Err`. Any other executor failure is
    /// absorbed into an error-text result so the conversation can continue.
    pub async fn execute(&self, call: ToolCall) -> Result<ToolResult> {
        let tool = self.resolve(&call.name)?;
        let call_id = call.id.clone();
        let name = call.name.clone();

        match tool.execute(call).await {
            Ok(result) => Ok(result),
            Err(e @ Error::Config(_)) => Err(e),
            Err(e @ Error::Tool(ToolError::InvalidArguments { .. })) => Err(e),
            Err(e @ Error::Tool(ToolError::NotFound { .. })) => Err(e),
            Err(e) => {
                tracing::warn!(tool = %name, error = %e, "tool failed; degrading to error-text result");
                Ok(ToolResult::error(call_id, e.to_string()))
            }
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
