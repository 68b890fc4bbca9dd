//! URL summarization tool

use crate::error::Result;
use crate::tools::{Tool, ToolCall, ToolResult};
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

/// Tool that asks a reader/extraction service for the readable content of a
/// URL, so the model can summarize it on the next pass.
///
/// Never raises: a missing reader endpoint, a timeout or any fetch failure
/// all produce an empty string, which signals "no content" downstream.
pub struct SummarizeUrlTool {
    reader_api: Option<String>,
    fetch_timeout: Duration,
    http: reqwest::Client,
}

impl SummarizeUrlTool {
    pub fn new(reader_api: Option<String>, fetch_timeout: Duration, http: reqwest::Client) -> Self {
        Self {
            reader_api,
            fetch_timeout,
            http,
        }
    }

    async fn fetch_content(&self, url: &str) -> String {
        let Some(reader) = self.reader_api.as_deref() else {
            tracing::debug!("no reader endpoint configured; returning empty content");
            return String::new();
        };
        let target = format!("{reader}{url}");
        let request = async {
            let response = self.http.get(&target).send().await.ok()?;
            if !response.status().is_success() {
                return None;
            }
            response.text().await.ok()
        };
        match tokio::time::timeout(self.fetch_timeout, request).await {
            Ok(Some(text)) => text,
            Ok(None) | Err(_) => {
                tracing::debug!(url = %url, "reader fetch failed; returning empty content");
                String::new()
            }
        }
    }
}

#[async_trait]
impl Tool for SummarizeUrlTool {
    fn name(&self) -> &str {
        "summarize_url"
    }

    fn description(&self) -> &str {
        "Fetch the readable content of a web page so it can be summarized. \
         Use when the user shares a link and wants to know what it says."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "The web page URL to fetch and summarize"
                }
            },
            "required": ["url"]
        })
    }

    async fn execute(&self, call: ToolCall) -> Result<ToolResult> {
        let url: String = call.get_argument("url")?;
        tracing::info!(url = %url, "fetching page for summarization");
        let content = self.fetch_content(&url).await;
        Ok(ToolResult::success(call.id, content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reader_content_passes_through() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/reader/https://blog.example/post")
            .with_status(200)
            .with_body("Extracted article text.")
            .create_async()
            .await;

        let tool = SummarizeUrlTool::new(
            Some(format!("{}/reader/", server.url())),
            Duration::from_secs(5),
            reqwest::Client::new(),
        );
        let result = tool
            .execute(ToolCall::new(
                "summarize_url",
                json!({"url": "https://blog.example/post"}),
            ))
            .await
            .unwrap();
        mock.assert_async().await;
        assert_eq!(result.content, "Extracted article text.");
    }

    #[tokio::test]
    async fn test_unset_reader_yields_empty_content() {
        let tool = SummarizeUrlTool::new(None, Duration::from_secs(5), reqwest::Client::new());
        let result = tool
            .execute(ToolCall::new(
                "summarize_url",
                json!({"url": "https://blog.example/post"}),
            ))
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.content, "");
    }

    #[tokio::test]
    async fn test_reader_failure_yields_empty_content() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let tool = SummarizeUrlTool::new(
            Some(format!("{}/reader/", server.url())),
            Duration::from_secs(5),
            reqwest::Client::new(),
        );
        let result = tool
            .execute(ToolCall::new(
                "summarize_url",
                json!({"url": "https://blog.example/post"}),
            ))
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.content, "");
    }
}
