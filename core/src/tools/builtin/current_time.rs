//! Current time tool

use crate::error::Result;
use crate::tools::{Tool, ToolCall, ToolResult};
use async_trait::async_trait;
use chrono::Local;
use serde_json::json;

/// Tool that reports the current local date and time. Infallible; the
/// `question` argument is accepted for catalog symmetry but does not affect
/// the output.
pub struct CurrentTimeTool;

impl CurrentTimeTool {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CurrentTimeTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for CurrentTimeTool {
    fn name(&self) -> &str {
        "get_time"
    }

    fn description(&self) -> &str {
        "Get the current date and time."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "question": {
                    "type": "string",
                    "description": "The time-related question, e.g. what time is it now?"
                }
            },
            "required": ["question"]
        })
    }

    async fn execute(&self, call: ToolCall) -> Result<ToolResult> {
        let now = Local::now().format("%A %Y/%m/%d-%H:%M").to_string();
        Ok(ToolResult::success(call.id, now))
    }
}
