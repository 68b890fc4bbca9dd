//! Image question-answering tool

use crate::error::Result;
use crate::llm::{ChatClient, ChatMessage, ChatOptions, ContentBlock, MessageContent, MessageRole};
use crate::tools::{Tool, ToolCall, ToolResult};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

const FALLBACK_ANSWER: &str = "I ran into a problem and cannot answer that right now.";

/// Tool that answers a question about a generated image by sending a
/// two-part message (question text + image reference) to a vision-capable
/// model.
///
/// This tool never aborts the parent flow: any failure degrades to a fixed
/// fallback answer.
pub struct ImageQaTool {
    vision_model: String,
    client: Arc<dyn ChatClient>,
}

impl ImageQaTool {
    pub fn new(vision_model: String, client: Arc<dyn ChatClient>) -> Self {
        Self {
            vision_model,
            client,
        }
    }

    async fn ask(&self, question: &str, img_url: &str) -> Result<String> {
        let message = ChatMessage {
            role: MessageRole::User,
            content: MessageContent::Blocks(vec![
                ContentBlock::Text {
                    text: question.to_string(),
                },
                ContentBlock::ImageUrl {
                    url: img_url.to_string(),
                },
            ]),
        };
        let options = ChatOptions {
            model: Some(self.vision_model.clone()),
            ..Default::default()
        };
        let response = self
            .client
            .chat_completion(vec![message], None, Some(options))
            .await?;
        Ok(response.message.get_text().unwrap_or_default())
    }
}

#[async_trait]
impl Tool for ImageQaTool {
    fn name(&self) -> &str {
        "answer_to_img"
    }

    fn description(&self) -> &str {
        "Recognize the content of a previously drawn image and answer a \
         question about it."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "q": {
                    "type": "string",
                    "description": "The question about the image"
                },
                "img_url": {
                    "type": "string",
                    "description": "URL of the image"
                }
            },
            "required": ["q", "img_url"]
        })
    }

    async fn execute(&self, call: ToolCall) -> Result<ToolResult> {
        let question: String = call.get_argument_or("q", String::new());
        let img_url: String = call.get_argument_or("img_url", String::new());
        match self.ask(&question, &img_url).await {
            Ok(answer) => Ok(ToolResult::success(call.id, answer)),
            Err(e) => {
                tracing::warn!(error = %e, "vision call failed; using fallback answer");
                Ok(ToolResult::success(call.id, FALLBACK_ANSWER.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlmError;
    use crate::llm::{ChatResponse, FinishReason, ToolDefinition};
    use std::sync::Mutex;

    struct RecordingVisionClient {
        answer: Option<String>,
        seen_model: Mutex<Option<String>>,
    }

    #[async_trait]
    impl ChatClient for RecordingVisionClient {
        async fn chat_completion(
            &self,
            messages: Vec<ChatMessage>,
            _tools: Option<Vec<ToolDefinition>>,
            options: Option<ChatOptions>,
        ) -> Result<ChatResponse> {
            assert_eq!(messages.len(), 1);
            *self.seen_model.lock().unwrap() =
                options.and_then(|o| o.model);
            match &self.answer {
                Some(answer) => Ok(ChatResponse {
                    message: ChatMessage::assistant(answer.clone()),
                    usage: None,
                    model: "gpt-4-vision-preview".to_string(),
                    finish_reason: Some(FinishReason::Stop),
                }),
                None => Err(LlmError::Network {
                    message: "connection refused".to_string(),
                }
                .into()),
            }
        }

        fn model_name(&self) -> &str {
            "gpt-4-vision-preview"
        }
    }

    #[tokio::test]
    async fn test_image_qa_uses_vision_model() {
        let client = Arc::new(RecordingVisionClient {
            answer: Some("a rabbit".to_string()),
            seen_model: Mutex::new(None),
        });
        let tool = ImageQaTool::new("gpt-4-vision-preview".to_string(), client.clone());
        let result = tool
            .execute(ToolCall::new(
                "answer_to_img",
                json!({"q": "what is this?", "img_url": "https://img.example/x.png"}),
            ))
            .await
            .unwrap();
        assert_eq!(result.content, "a rabbit");
        assert_eq!(
            client.seen_model.lock().unwrap().as_deref(),
            Some("gpt-4-vision-preview")
        );
    }

    #[tokio::test]
    async fn test_image_qa_degrades_to_fallback() {
        let client = Arc::new(RecordingVisionClient {
            answer: None,
            seen_model: Mutex::new(None),
        });
        let tool = ImageQaTool::new("gpt-4-vision-preview".to_string(), client);
        let result = tool
            .execute(ToolCall::new(
                "answer_to_img",
                json!({"q": "what is this?", "img_url": "https://img.example/x.png"}),
            ))
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.content, FALLBACK_ANSWER);
    }
}
