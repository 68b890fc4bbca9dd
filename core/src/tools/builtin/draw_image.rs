//! Image generation tool

use crate::error::Result;
use crate::llm::ImageClient;
use crate::tools::{Tool, ToolCall, ToolResult};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

/// Tool that generates an image from a prompt and returns the image URL.
/// Generation failures propagate; there is no retry at this layer.
pub struct DrawImageTool {
    model: String,
    size: String,
    client: Arc<dyn ImageClient>,
}

impl DrawImageTool {
    pub fn new(model: String, size: String, client: Arc<dyn ImageClient>) -> Self {
        Self {
            model,
            size,
            client,
        }
    }
}

#[async_trait]
impl Tool for DrawImageTool {
    fn name(&self) -> &str {
        "draw_image"
    }

    fn description(&self) -> &str {
        "Generate an image. Act as a drawing assistant: if the user's request \
         is simple, use your imagination to enrich the prompt before drawing."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "draw": {
                    "type": "string",
                    "description": "The image request, e.g. a cute rabbit. Enrich simple requests into a fuller prompt."
                }
            },
            "required": ["draw"]
        })
    }

    async fn execute(&self, call: ToolCall) -> Result<ToolResult> {
        let prompt: String = call.get_argument("draw")?;
        tracing::info!(model = %self.model, size = %self.size, "generating image");
        let url = self
            .client
            .create_image(&prompt, &self.model, &self.size)
            .await?;
        Ok(ToolResult::success(call.id, url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, LlmError};

    struct FixedImageClient {
        url: Option<String>,
    }

    #[async_trait]
    impl ImageClient for FixedImageClient {
        async fn create_image(&self, _prompt: &str, _model: &str, _size: &str) -> Result<String> {
            self.url.clone().ok_or_else(|| {
                LlmError::ApiError {
                    status: 500,
                    message: "generation failed".to_string(),
                }
                .into()
            })
        }
    }

    #[tokio::test]
    async fn test_draw_returns_image_url() {
        let tool = DrawImageTool::new(
            "dall-e-2".to_string(),
            "256x256".to_string(),
            Arc::new(FixedImageClient {
                url: Some("https://img.example/x.png".to_string()),
            }),
        );
        let result = tool
            .execute(ToolCall::new("draw_image", json!({"draw": "a cute rabbit"})))
            .await
            .unwrap();
        assert_eq!(result.content, "https://img.example/x.png");
    }

    #[tokio::test]
    async fn test_draw_propagates_api_error() {
        let tool = DrawImageTool::new(
            "dall-e-2".to_string(),
            "256x256".to_string(),
            Arc::new(FixedImageClient { url: None }),
        );
        let err = tool
            .execute(ToolCall::new("draw_image", json!({"draw": "a cute rabbit"})))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Llm(LlmError::ApiError { .. })));
    }
}
