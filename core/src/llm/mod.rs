//! LLM client abstractions and implementations

pub mod client;
pub mod message;
pub mod providers;

pub use client::{
    ChatClient, ChatOptions, ChatResponse, FinishReason, FunctionDefinition, ImageClient,
    ToolChoice, ToolDefinition, Usage,
};
pub use message::{ChatMessage, ContentBlock, MessageContent, MessageRole};
pub use providers::OpenAiClient;
