//! Web search tool: search-API query followed by concurrent fetch-and-read

use crate::config::ToolsConfig;
use crate::error::{ConfigError, Result, ToolError};
use crate::tools::{Tool, ToolCall, ToolResult};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use regex::Regex;
use serde::Deserialize;
use serde_json::json;
use std::sync::OnceLock;

const NO_RESULTS_MESSAGE: &str =
    "Sorry, no search results could be retrieved for this question.";

/// One hit returned by the search endpoint
#[derive(Debug, Clone, Deserialize)]
struct SearchHit {
    #[serde(default)]
    title: String,
    href: String,
    #[serde(default)]
    body: String,
}

/// Search responses come back either as a bare array or wrapped in `results`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SearchResponse {
    Hits(Vec<SearchHit>),
    Wrapped { results: Vec<SearchHit> },
}

impl SearchResponse {
    fn into_hits(self) -> Vec<SearchHit> {
        match self {
            SearchResponse::Hits(hits) => hits,
            SearchResponse::Wrapped { results } => results,
        }
    }
}

/// Tool that answers open-ended questions by searching the web, then fetching
/// and extracting readable text from each result page.
pub struct WebSearchTool {
    config: ToolsConfig,
    http: reqwest::Client,
}

impl WebSearchTool {
    pub fn new(config: ToolsConfig, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    /// Fetch one result URL and reduce it to readable text.
    ///
    /// Any failure here (timeout, connection error, bad status, non-text
    /// payload) contributes an empty string; one bad page must not sink the
    /// whole search.
    async fn fetch_page_text(&self, url: &str) -> String {
        if url::Url::parse(url).is_err() {
            tracing::debug!(url = %url, "search hit has an unparseable href; skipping");
            return String::new();
        }
        let request = async {
            let response = self.http.get(url).send().await.ok()?;
            if !response.status().is_success() {
                return None;
            }
            response.text().await.ok()
        };
        match tokio::time::timeout(self.config.fetch_timeout, request).await {
            Ok(Some(html)) => extract_text(&html),
            Ok(None) => {
                tracing::debug!(url = %url, "page fetch failed; skipping");
                String::new()
            }
            Err(_) => {
                tracing::debug!(url = %url, "page fetch timed out; skipping");
                String::new()
            }
        }
    }

    async fn search(&self, question: &str, max_results: u32) -> Result<String> {
        let endpoint = self
            .config
            .ddg_search_api
            .as_deref()
            .ok_or_else(|| ConfigError::MissingField {
                field: "ddg_search_api".to_string(),
            })?;

        let response = self
            .http
            .get(endpoint)
            .query(&[
                ("q", question),
                ("max_results", &max_results.to_string()),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ToolError::ExecutionFailed {
                name: "get_ddg_search".to_string(),
                message: format!("search endpoint returned {}", response.status()),
            }
            .into());
        }
        let hits = response.json::<SearchResponse>().await?.into_hits();
        if hits.is_empty() {
            tracing::debug!(question = %question, "search returned no hits");
            return Ok(NO_RESULTS_MESSAGE.to_string());
        }

        // Fan out over result pages with bounded concurrency, waiting for
        // every fetch to finish (a failed fetch contributes an empty string).
        let pages: Vec<String> = stream::iter(hits.into_iter())
            .map(|hit| async move {
                let page = self.fetch_page_text(&hit.href).await;
                let mut section = String::new();
                if !hit.title.is_empty() {
                    section.push_str(&hit.title);
                    section.push('\n');
                }
                if !hit.body.is_empty() {
                    section.push_str(&hit.body);
                    section.push('\n');
                }
                section.push_str(&page);
                section
            })
            .buffer_unordered(self.config.search_concurrency)
            .collect()
            .await;

        let combined = pages
            .into_iter()
            .filter(|section| !section.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n\n");
        Ok(truncate_chars(&combined, self.config.search_char_budget))
    }
}

/// Strip markup from an HTML document, leaving whitespace-collapsed text.
fn extract_text(html: &str) -> String {
    static SCRIPT_RE: OnceLock<Regex> = OnceLock::new();
    static TAG_RE: OnceLock<Regex> = OnceLock::new();
    static SPACE_RE: OnceLock<Regex> = OnceLock::new();

    let script_re = SCRIPT_RE.get_or_init(|| {
        Regex::new(r"(?is)<(script|style|noscript)\b[^>]*>.*?</(script|style|noscript)>")
            .unwrap()
    });
    let tag_re = TAG_RE.get_or_init(|| Regex::new(r"(?s)<[^>]+>").unwrap());
    let space_re = SPACE_RE.get_or_init(|| Regex::new(r"\s+").unwrap());

    let without_scripts = script_re.replace_all(html, " ");
    let without_tags = tag_re.replace_all(&without_scripts, " ");
    space_re.replace_all(&without_tags, " ").trim().to_string()
}

/// Truncate to at most `budget` characters, respecting char boundaries.
fn truncate_chars(text: &str, budget: usize) -> String {
    match text.char_indices().nth(budget) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "get_ddg_search"
    }

    fn description(&self) -> &str {
        "Search the internet for questions you cannot answer on your own, then \
         organize and summarize the returned material. You must always provide \
         the question to search for. If no information comes back, say so \
         explicitly, e.g. 'for some reason I cannot answer this question'."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "question": {
                    "type": "string",
                    "description": "The question to search the internet for. Always provide the question itself."
                },
                "max_results": {
                    "type": "integer",
                    "description": "Maximum number of search results to retrieve"
                }
            },
            "required": ["question"]
        })
    }

    async fn execute(&self, call: ToolCall) -> Result<ToolResult> {
        let question: String = call.get_argument("question")?;
        let max_results =
            call.get_argument_or("max_results", self.config.search_max_results);
        tracing::info!(question = %question, max_results, "running web search");
        let content = self.search(&question, max_results).await?;
        Ok(ToolResult::success(call.id, content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::time::Duration;

    fn config_with(endpoint: &str) -> ToolsConfig {
        ToolsConfig::default()
            .with_search_api(endpoint)
    }

    #[test]
    fn test_extract_text_strips_markup() {
        let html = "<html><head><style>body{color:red}</style>\
                    <script>var x = 1;</script></head>\
                    <body><h1>Title</h1><p>First   paragraph.</p></body></html>";
        assert_eq!(extract_text(html), "Title First paragraph.");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let text = "héllo wörld";
        let truncated = truncate_chars(text, 4);
        assert_eq!(truncated, "héll");
    }

    #[tokio::test]
    async fn test_unconfigured_endpoint_fails_before_network() {
        let tool = WebSearchTool::new(ToolsConfig::default(), reqwest::Client::new());
        let err = tool
            .execute(ToolCall::new("get_ddg_search", json!({"question": "rust"})))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::MissingField { ref field }) if field == "ddg_search_api"
        ));
    }

    #[tokio::test]
    async fn test_missing_question_is_invalid_arguments() {
        let tool = WebSearchTool::new(config_with("http://localhost:1"), reqwest::Client::new());
        let err = tool
            .execute(ToolCall::new("get_ddg_search", json!({})))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Tool(ToolError::InvalidArguments { .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_results_return_apology() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/search")
            .match_query(mockito::Matcher::UrlEncoded("q".into(), "nothing".into()))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let tool = WebSearchTool::new(
            config_with(&format!("{}/search", server.url())),
            reqwest::Client::new(),
        );
        let result = tool
            .execute(ToolCall::new("get_ddg_search", json!({"question": "nothing"})))
            .await
            .unwrap();
        mock.assert_async().await;
        assert_eq!(result.content, NO_RESULTS_MESSAGE);
    }

    #[tokio::test]
    async fn test_partial_fetch_failures_still_produce_text() {
        let mut server = mockito::Server::new_async().await;
        let base = server.url();

        // Seven result URLs; two of them point at paths that return 500.
        let mut hits = Vec::new();
        for i in 0..7 {
            hits.push(json!({
                "title": format!("Result {i}"),
                "href": format!("{base}/page/{i}"),
                "body": ""
            }));
        }
        let _search = server
            .mock("GET", "/search")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(serde_json::to_string(&hits).unwrap())
            .create_async()
            .await;
        for i in 0..7 {
            let status = if i < 2 { 500 } else { 200 };
            let body = format!("<html><body><p>content {i}</p></body></html>");
            server
                .mock("GET", format!("/page/{i}").as_str())
                .with_status(status)
                .with_body(body)
                .create_async()
                .await;
        }

        let mut config = config_with(&format!("{base}/search"));
        config.fetch_timeout = Duration::from_secs(10);
        let tool = WebSearchTool::new(config, reqwest::Client::new());

        let result = tool
            .execute(ToolCall::new("get_ddg_search", json!({"question": "q"})))
            .await
            .unwrap();
        assert!(result.success);
        for i in 2..7 {
            assert!(result.content.contains(&format!("content {i}")));
        }
        assert!(!result.content.contains("content 0"));
        assert!(!result.content.contains("content 1"));
        assert!(result.content.chars().count() <= 8000);
    }

    #[tokio::test]
    async fn test_concatenation_is_truncated_to_budget() {
        let mut server = mockito::Server::new_async().await;
        let base = server.url();
        let hits = json!([{"title": "Big", "href": format!("{base}/big"), "body": ""}]);
        let _search = server
            .mock("GET", "/search")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(hits.to_string())
            .create_async()
            .await;
        let _page = server
            .mock("GET", "/big")
            .with_status(200)
            .with_body(format!("<p>{}</p>", "x".repeat(20_000)))
            .create_async()
            .await;

        let mut config = config_with(&format!("{base}/search"));
        config.search_char_budget = 100;
        let tool = WebSearchTool::new(config, reqwest::Client::new());

        let result = tool
            .execute(ToolCall::new("get_ddg_search", json!({"question": "q"})))
            .await
            .unwrap();
        assert_eq!(result.content.chars().count(), 100);
    }
}
