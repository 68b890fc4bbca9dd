//! Weather lookup tool

use crate::error::{Result, ToolError};
use crate::tools::{Tool, ToolCall, ToolResult};
use async_trait::async_trait;
use serde_json::json;

/// Tool that queries a weather API by city name and returns the raw
/// structured payload as a string. Upstream failures propagate; a broken
/// weather provider is meaningful to surface.
pub struct WeatherTool {
    endpoint: String,
    http: reqwest::Client,
}

impl WeatherTool {
    pub fn new(endpoint: String, http: reqwest::Client) -> Self {
        Self { endpoint, http }
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        "get_weather"
    }

    fn description(&self) -> &str {
        "Get the weather forecast for a city."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "city": {
                    "type": "string",
                    "description": "Name of the city to get weather for, e.g. Shanghai"
                }
            },
            "required": ["city"]
        })
    }

    async fn execute(&self, call: ToolCall) -> Result<ToolResult> {
        let city: String = call.get_argument("city")?;
        tracing::info!(city = %city, "looking up weather");

        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("type", "week"), ("city", &city)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ToolError::ExecutionFailed {
                name: "get_weather".to_string(),
                message: format!("weather endpoint returned {}", response.status()),
            }
            .into());
        }

        let payload: serde_json::Value = response.json().await?;
        let data = payload.get("data").ok_or_else(|| ToolError::ExecutionFailed {
            name: "get_weather".to_string(),
            message: "weather response missing `data` field".to_string(),
        })?;
        Ok(ToolResult::success(call.id, data.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[tokio::test]
    async fn test_weather_returns_data_field() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/weather")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("type".into(), "week".into()),
                mockito::Matcher::UrlEncoded("city".into(), "Shanghai".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"success":true,"data":{"city":"Shanghai","forecast":[]}}"#)
            .create_async()
            .await;

        let tool = WeatherTool::new(
            format!("{}/api/weather", server.url()),
            reqwest::Client::new(),
        );
        let result = tool
            .execute(ToolCall::new("get_weather", json!({"city": "Shanghai"})))
            .await
            .unwrap();
        mock.assert_async().await;
        assert!(result.success);
        assert!(result.content.contains("Shanghai"));
    }

    #[tokio::test]
    async fn test_weather_upstream_error_propagates() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/weather")
            .match_query(mockito::Matcher::Any)
            .with_status(502)
            .create_async()
            .await;

        let tool = WeatherTool::new(
            format!("{}/api/weather", server.url()),
            reqwest::Client::new(),
        );
        let err = tool
            .execute(ToolCall::new("get_weather", json!({"city": "Shanghai"})))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Tool(ToolError::ExecutionFailed { .. })));
    }
}
