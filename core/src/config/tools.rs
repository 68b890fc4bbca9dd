//! Per-tool endpoints, budgets and timeouts

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration shared by the built-in tool executors
///
/// Unset optional endpoints degrade per tool: the search tool fails fast
/// with a configuration error, the URL summarizer quietly yields no content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Search API endpoint; required by the web-search tool
    pub ddg_search_api: Option<String>,

    /// Default number of search results requested
    pub search_max_results: u32,

    /// Concurrent result-page fetches during one search
    pub search_concurrency: usize,

    /// Character budget for concatenated page text
    pub search_char_budget: usize,

    /// Per-fetch timeout for result pages and the reader service
    #[serde(with = "secs")]
    pub fetch_timeout: Duration,

    /// Weather API endpoint
    pub weather_api: String,

    /// URL-to-text reader service; the target URL is appended to this prefix
    pub reader_api: Option<String>,

    /// Image generation model
    pub image_model: String,

    /// Generated image size (256x256, 512x512, 1024x1024)
    pub image_size: String,

    /// Vision-capable model for image Q&A
    pub vision_model: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ddg_search_api: None,
            search_max_results: 4,
            search_concurrency: 5,
            search_char_budget: 8000,
            fetch_timeout: Duration::from_secs(60),
            weather_api: "https://api.vvhan.com/api/weather".to_string(),
            reader_api: None,
            image_model: "dall-e-2".to_string(),
            image_size: "256x256".to_string(),
            vision_model: "gpt-4-vision-preview".to_string(),
        }
    }
}

mod secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(d)?))
    }
}

impl ToolsConfig {
    /// Set the search API endpoint
    pub fn with_search_api<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.ddg_search_api = Some(endpoint.into());
        self
    }

    /// Set the reader service endpoint
    pub fn with_reader_api<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.reader_api = Some(endpoint.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_contract() {
        let config = ToolsConfig::default();
        assert_eq!(config.search_concurrency, 5);
        assert_eq!(config.search_char_budget, 8000);
        assert_eq!(config.fetch_timeout, Duration::from_secs(60));
        assert!(config.ddg_search_api.is_none());
        assert_eq!(config.image_model, "dall-e-2");
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: ToolsConfig =
            serde_json::from_str(r#"{"ddg_search_api": "https://search.example"}"#).unwrap();
        assert_eq!(config.ddg_search_api.as_deref(), Some("https://search.example"));
        assert_eq!(config.search_max_results, 4);
        assert_eq!(config.fetch_timeout, Duration::from_secs(60));
        assert_eq!(config.weather_api, "https://api.vvhan.com/api/weather");
    }

    #[test]
    fn test_builder_sets_endpoints() {
        let config = ToolsConfig::default()
            .with_search_api("https://search.example/api")
            .with_reader_api("https://r.example/");
        assert_eq!(
            config.ddg_search_api.as_deref(),
            Some("https://search.example/api")
        );
        assert_eq!(config.reader_api.as_deref(), Some("https://r.example/"));
    }
}
