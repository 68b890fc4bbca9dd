//! OpenAI-compatible client implementation
//!
//! Speaks the chat-completions function-calling wire format and the
//! images/generations endpoint against any OpenAI-compatible base URL.

use crate::config::LlmConfig;
use crate::error::{LlmError, Result};
use crate::llm::{
    ChatClient, ChatMessage, ChatOptions, ChatResponse, ContentBlock, FinishReason, ImageClient,
    MessageContent, MessageRole, ToolDefinition, Usage,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// OpenAI-compatible chat and image client
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiClient {
    /// Create a new client from a resolved LLM config
    pub fn new(config: &LlmConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(crate::error::Error::Llm(LlmError::Authentication {
                message: "No API key configured".to_string(),
            }));
        }

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| LlmError::Network {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    /// Convert internal messages to the wire format
    fn convert_messages(&self, messages: Vec<ChatMessage>) -> Result<Vec<WireMessage>> {
        let mut converted = Vec::new();

        for message in messages {
            match message.role {
                MessageRole::System | MessageRole::User => {
                    let role = match message.role {
                        MessageRole::System => "system",
                        _ => "user",
                    };
                    converted.push(WireMessage {
                        role: role.to_string(),
                        content: Some(Self::wire_content(&message.content)),
                        tool_calls: None,
                        tool_call_id: None,
                        name: None,
                    });
                }
                MessageRole::Assistant => {
                    let mut text = String::new();
                    let mut tool_calls = Vec::new();

                    match &message.content {
                        MessageContent::Text(t) => text.push_str(t),
                        MessageContent::Blocks(blocks) => {
                            for block in blocks {
                                match block {
                                    ContentBlock::Text { text: t } => {
                                        if !text.is_empty() {
                                            text.push('\n');
                                        }
                                        text.push_str(t);
                                    }
                                    ContentBlock::ToolUse { id, name, input } => {
                                        tool_calls.push(WireToolCall {
                                            id: id.clone(),
                                            call_type: "function".to_string(),
                                            function: WireFunctionCall {
                                                name: name.clone(),
                                                arguments: input.to_string(),
                                            },
                                        });
                                    }
                                    _ => {}
                                }
                            }
                        }
                    }

                    converted.push(WireMessage {
                        role: "assistant".to_string(),
                        content: if text.is_empty() {
                            None
                        } else {
                            Some(Value::String(text))
                        },
                        tool_calls: if tool_calls.is_empty() {
                            None
                        } else {
                            Some(tool_calls)
                        },
                        tool_call_id: None,
                        name: None,
                    });
                }
                MessageRole::Tool => {
                    // Push one wire message per tool result without dropping any
                    let mut pushed_any = false;
                    if let MessageContent::Blocks(blocks) = &message.content {
                        for block in blocks {
                            if let ContentBlock::ToolResult {
                                tool_call_id,
                                name,
                                content,
                                ..
                            } = block
                            {
                                converted.push(WireMessage {
                                    role: "tool".to_string(),
                                    content: Some(Value::String(content.clone())),
                                    tool_calls: None,
                                    tool_call_id: Some(tool_call_id.clone()),
                                    name: Some(name.clone()),
                                });
                                pushed_any = true;
                            }
                        }
                    }
                    if !pushed_any {
                        return Err((LlmError::InvalidRequest {
                            message: "Tool message must contain a ToolResult".to_string(),
                        })
                        .into());
                    }
                }
            }
        }

        Ok(converted)
    }

    /// Render message content for the wire: plain string, or content parts
    /// when the message carries image references
    fn wire_content(content: &MessageContent) -> Value {
        match content {
            MessageContent::Text(text) => Value::String(text.clone()),
            MessageContent::Blocks(blocks) => {
                let parts: Vec<Value> = blocks
                    .iter()
                    .filter_map(|block| match block {
                        ContentBlock::Text { text } => {
                            Some(json!({"type": "text", "text": text}))
                        }
                        ContentBlock::ImageUrl { url } => {
                            Some(json!({"type": "image_url", "image_url": {"url": url}}))
                        }
                        _ => None,
                    })
                    .collect();
                Value::Array(parts)
            }
        }
    }

    fn convert_response(&self, response: CompletionResponse) -> Result<ChatResponse> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidRequest {
                message: "No choices in response".to_string(),
            })?;

        let content = choice.message.content.unwrap_or_default();
        let message_content = match choice.message.tool_calls {
            Some(tool_calls) if !tool_calls.is_empty() => {
                let mut blocks = Vec::new();
                if !content.is_empty() {
                    blocks.push(ContentBlock::Text { text: content });
                }
                for call in tool_calls {
                    let input: Value = serde_json::from_str(&call.function.arguments)
                        .unwrap_or_else(|_| Value::String(call.function.arguments.clone()));
                    blocks.push(ContentBlock::ToolUse {
                        id: call.id,
                        name: call.function.name,
                        input,
                    });
                }
                MessageContent::Blocks(blocks)
            }
            _ => MessageContent::Text(content),
        };

        let usage = response.usage.map(|u| Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        let finish_reason = choice.finish_reason.map(|reason| match reason.as_str() {
            "stop" => FinishReason::Stop,
            "length" => FinishReason::Length,
            "tool_calls" | "function_call" => FinishReason::ToolCalls,
            "content_filter" => FinishReason::ContentFilter,
            other => FinishReason::Other(other.to_string()),
        });

        Ok(ChatResponse {
            message: ChatMessage {
                role: MessageRole::Assistant,
                content: message_content,
            },
            usage,
            model: response.model,
            finish_reason,
        })
    }
}

#[async_trait]
impl ChatClient for OpenAiClient {
    async fn chat_completion(
        &self,
        messages: Vec<ChatMessage>,
        tools: Option<Vec<ToolDefinition>>,
        options: Option<ChatOptions>,
    ) -> Result<ChatResponse> {
        let options = options.unwrap_or_default();
        let wire_messages = self.convert_messages(messages)?;

        if let Some(ref tools) = tools {
            tracing::debug!("chat completion with {} tools offered", tools.len());
        }

        let request = CompletionRequest {
            model: options.model.clone().unwrap_or_else(|| self.model.clone()),
            messages: wire_messages,
            tools,
            tool_choice: options
                .tool_choice
                .as_ref()
                .map(|choice| serde_json::to_value(choice).unwrap_or(Value::Null)),
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            top_p: options.top_p,
            frequency_penalty: options.frequency_penalty,
            presence_penalty: options.presence_penalty,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Network {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();
            return Err((LlmError::ApiError {
                status,
                message: error_text,
            })
            .into());
        }

        let completion: CompletionResponse =
            response.json().await.map_err(|e| LlmError::Network {
                message: format!("Failed to parse response: {}", e),
            })?;

        let converted = self.convert_response(completion)?;
        if converted.message.has_tool_use() {
            tracing::debug!(
                "response contains {} tool calls",
                converted.message.get_tool_uses().len()
            );
        }

        Ok(converted)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ImageClient for OpenAiClient {
    async fn create_image(&self, prompt: &str, model: &str, size: &str) -> Result<String> {
        let request = json!({
            "prompt": prompt,
            "n": 1,
            "model": model,
            "size": size,
        });

        let response = self
            .client
            .post(format!("{}/images/generations", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Network {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();
            return Err((LlmError::ApiError {
                status,
                message: error_text,
            })
            .into());
        }

        let images: ImagesResponse = response.json().await.map_err(|e| LlmError::Network {
            message: format!("Failed to parse response: {}", e),
        })?;

        images
            .data
            .into_iter()
            .next()
            .and_then(|image| image.url)
            .ok_or_else(|| {
                (LlmError::InvalidRequest {
                    message: "No image URL in response".to_string(),
                })
                .into()
            })
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<ToolDefinition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    frequency_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    presence_penalty: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<WireToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type")]
    call_type: String,
    function: WireFunctionCall,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireFunctionCall {
    name: String,
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    model: String,
    choices: Vec<CompletionChoice>,
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: ResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    url: Option<String>,
}
