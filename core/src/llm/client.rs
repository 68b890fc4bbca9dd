//! Client traits and response structures

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::message::ChatMessage;

/// Trait for chat-completion clients
///
/// One call submits a message sequence plus an optional tool catalog; the
/// response is either plain text or a set of tool call requests.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send a chat completion request
    async fn chat_completion(
        &self,
        messages: Vec<ChatMessage>,
        tools: Option<Vec<ToolDefinition>>,
        options: Option<ChatOptions>,
    ) -> Result<ChatResponse>;

    /// Get the default model name
    fn model_name(&self) -> &str;
}

/// Trait for image-generation clients
#[async_trait]
pub trait ImageClient: Send + Sync {
    /// Generate one image and return its URL
    async fn create_image(&self, prompt: &str, model: &str, size: &str) -> Result<String>;
}

/// Response from a chat completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The generated assistant message
    pub message: ChatMessage,

    /// Usage statistics
    pub usage: Option<Usage>,

    /// Model used for generation
    pub model: String,

    /// Finish reason
    pub finish_reason: Option<FinishReason>,
}

/// Usage statistics for a request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    /// Number of tokens in the prompt
    pub prompt_tokens: u32,

    /// Number of tokens in the completion
    pub completion_tokens: u32,

    /// Total number of tokens
    pub total_tokens: u32,
}

/// Reason why generation finished
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Generation completed naturally
    Stop,

    /// Hit the maximum token limit
    Length,

    /// Model decided to call a tool
    ToolCalls,

    /// Content was filtered
    ContentFilter,

    /// Other reason
    Other(String),
}

/// Tool definition offered to the model for function calling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Type of tool (always "function")
    #[serde(rename = "type")]
    pub tool_type: String,

    /// Function definition
    pub function: FunctionDefinition,
}

/// Function definition for tool calling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDefinition {
    /// Name of the function
    pub name: String,

    /// Description of what the function does; this is the only steering
    /// mechanism for tool selection
    pub description: String,

    /// JSON schema for the function parameters
    pub parameters: serde_json::Value,
}

/// Per-call overrides for chat completion
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatOptions {
    /// Model override (e.g. the vision model for image Q&A)
    pub model: Option<String>,

    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,

    /// Temperature for generation
    pub temperature: Option<f32>,

    /// Top-p sampling parameter
    pub top_p: Option<f32>,

    /// Frequency penalty
    pub frequency_penalty: Option<f32>,

    /// Presence penalty
    pub presence_penalty: Option<f32>,

    /// Tool choice strategy
    pub tool_choice: Option<ToolChoice>,
}

/// Tool choice strategy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoice {
    /// Let the model decide
    Auto,

    /// Never use tools
    None,
}

impl ChatOptions {
    /// Apply defaults from resolved model parameters, keeping explicit
    /// per-call values
    pub fn merge_params(mut self, params: &crate::config::ModelParams) -> Self {
        self.max_tokens = self.max_tokens.or(params.max_tokens);
        self.temperature = self.temperature.or(params.temperature);
        self.top_p = self.top_p.or(params.top_p);
        self.frequency_penalty = self.frequency_penalty.or(params.frequency_penalty);
        self.presence_penalty = self.presence_penalty.or(params.presence_penalty);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelParams;

    #[test]
    fn test_merge_params_keeps_overrides() {
        let options = ChatOptions {
            temperature: Some(0.1),
            ..Default::default()
        }
        .merge_params(&ModelParams::default());

        assert_eq!(options.temperature, Some(0.1));
        assert_eq!(options.max_tokens, Some(4096));
        assert_eq!(options.top_p, Some(1.0));
    }

    #[test]
    fn test_tool_choice_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ToolChoice::Auto).unwrap(),
            "\"auto\""
        );
    }
}
