//! # chatloop Core
//!
//! Core library for chatloop - a tool-calling conversational orchestration
//! loop.
//!
//! This library drives one conversational turn end to end: it offers the
//! model a catalog of callable tools (web search, weather, time, image
//! generation, image Q&A, URL summarization), executes whichever tools the
//! model selects, feeds the results back into the conversation, and returns
//! a final answer that may carry a side artifact (an image URL) alongside
//! the text.

// Core modules
pub mod config;
pub mod error;
pub mod llm;
pub mod orchestrator;
pub mod tools;

// Re-export commonly used types
pub use config::{LlmConfig, ModelParams, ToolsConfig};
pub use error::{ConfigError, Error, LlmError, Result, ToolError};
pub use llm::{ChatClient, ChatMessage, ChatOptions, ImageClient, OpenAiClient};
pub use orchestrator::{ComposedAnswer, Orchestrator};
pub use tools::{Tool, ToolCall, ToolRegistry, ToolResult};

/// Current version of the chatloop-core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize tracing with a specific debug mode
pub fn init_tracing_with_debug(debug: bool) {
    let filter = if debug { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .init();
}
