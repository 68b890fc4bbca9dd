//! Configuration loader with single-source priority and flag overrides:
//! 1. --config file (highest priority)
//! 2. Current working directory: ./chatloop.json
//! 3. User config dir: <config_dir>/chatloop/config.json
//! 4. Environment variables only (no files)

use anyhow::{anyhow, Context, Result};
use chatloop_core::{LlmConfig, ModelParams, ToolsConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Raw configuration file format (single-file schema)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawConfig {
    /// API key (can be "env:VAR_NAME" for environment variable indirection)
    pub api_key: String,
    /// Base URL of the OpenAI-compatible endpoint
    pub base_url: Option<String>,
    /// Model name
    pub model: String,
    /// Sampling parameters (optional)
    #[serde(default)]
    pub params: ModelParams,
    /// Tool endpoints and limits (optional)
    #[serde(default)]
    pub tools: ToolsConfig,
    /// System prompt prepended to every conversation (optional)
    pub system_prompt: Option<String>,
}

/// Fully resolved configuration ready to build clients from
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub llm: LlmConfig,
    pub tools: ToolsConfig,
    pub system_prompt: Option<String>,
}

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o";

/// CLI configuration loader
pub struct CliConfigLoader {
    config_override: Option<PathBuf>,
    api_key_override: Option<String>,
    base_url_override: Option<String>,
    model_override: Option<String>,
    temperature_override: Option<f32>,
    system_prompt_override: Option<String>,
}

impl CliConfigLoader {
    pub fn new() -> Self {
        Self {
            config_override: None,
            api_key_override: None,
            base_url_override: None,
            model_override: None,
            temperature_override: None,
            system_prompt_override: None,
        }
    }

    pub fn with_config_override(mut self, path: PathBuf) -> Self {
        self.config_override = Some(path);
        self
    }

    pub fn with_api_key_override(mut self, api_key: String) -> Self {
        self.api_key_override = Some(api_key);
        self
    }

    pub fn with_base_url_override(mut self, base_url: String) -> Self {
        self.base_url_override = Some(base_url);
        self
    }

    pub fn with_model_override(mut self, model: String) -> Self {
        self.model_override = Some(model);
        self
    }

    pub fn with_temperature_override(mut self, temperature: f32) -> Self {
        self.temperature_override = Some(temperature);
        self
    }

    pub fn with_system_prompt_override(mut self, prompt: String) -> Self {
        self.system_prompt_override = Some(prompt);
        self
    }

    /// Load and resolve configuration
    pub async fn load(&self) -> Result<ResolvedConfig> {
        let mut config = if let Some(override_path) = &self.config_override {
            self.load_file(override_path).await.with_context(|| {
                format!(
                    "Failed to load config from override path: {}",
                    override_path.display()
                )
            })?
        } else {
            self.search_and_load().await?
        };

        if let Some(api_key) = &self.api_key_override {
            config.api_key = api_key.clone();
        }
        if let Some(base_url) = &self.base_url_override {
            config.base_url = Some(base_url.clone());
        }
        if let Some(model) = &self.model_override {
            config.model = model.clone();
        }
        if let Some(temperature) = self.temperature_override {
            config.params.temperature = Some(temperature);
        }
        if let Some(prompt) = &self.system_prompt_override {
            config.system_prompt = Some(prompt.clone());
        }

        self.resolve(config)
    }

    /// Search for config in priority order
    async fn search_and_load(&self) -> Result<RawConfig> {
        let cwd_config = std::env::current_dir()?.join("chatloop.json");
        if cwd_config.exists() {
            return self.load_file(&cwd_config).await;
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("chatloop").join("config.json");
            if user_config.exists() {
                return self.load_file(&user_config).await;
            }
        }

        self.load_env_only()
    }

    /// Build a config from environment variables alone
    fn load_env_only(&self) -> Result<RawConfig> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            anyhow!(
                "No configuration found. Create a chatloop.json file or set OPENAI_API_KEY"
            )
        })?;
        Ok(RawConfig {
            api_key,
            base_url: std::env::var("OPENAI_BASE_URL").ok(),
            model: std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            params: ModelParams::default(),
            tools: ToolsConfig::default(),
            system_prompt: None,
        })
    }

    async fn load_file(&self, path: &Path) -> Result<RawConfig> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Resolve the raw config to a validated final form
    fn resolve(&self, raw: RawConfig) -> Result<ResolvedConfig> {
        let api_key = resolve_api_key(&raw.api_key)?;
        let base_url = raw
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let llm = LlmConfig::new(base_url, api_key, raw.model).with_params(raw.params);
        llm.validate().map_err(|e| anyhow!("Invalid config: {e}"))?;

        Ok(ResolvedConfig {
            llm,
            tools: raw.tools,
            system_prompt: raw.system_prompt,
        })
    }
}

impl Default for CliConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve "env:VAR_NAME" indirection in the API key field
fn resolve_api_key(raw: &str) -> Result<String> {
    match raw.strip_prefix("env:") {
        Some(var) => {
            std::env::var(var).with_context(|| format!("Environment variable {var} is not set"))
        }
        None => Ok(raw.to_string()),
    }
}
