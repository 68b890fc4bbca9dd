//! Configuration for chatloop core
//!
//! Core only accepts fully resolved, validated configuration objects passed
//! in at construction time. All discovery, loading, and merging happens in
//! the CLI layer.

pub mod tools;
pub mod types;

pub use tools::ToolsConfig;
pub use types::{LlmConfig, ModelParams};
