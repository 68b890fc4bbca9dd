//! Tool system and built-in tool executors

pub mod base;
pub mod builtin;
pub mod registry;

pub use base::{Tool, ToolCall, ToolResult};
pub use registry::ToolRegistry;
