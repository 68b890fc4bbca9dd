//! Conversation message structures

use serde::{Deserialize, Serialize};

/// Represents a message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender
    pub role: MessageRole,

    /// Content of the message
    pub content: MessageContent,
}

/// Role of the message sender
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System message (instructions)
    System,

    /// User message (human input)
    User,

    /// Assistant message (model response, possibly with tool calls)
    Assistant,

    /// Tool message (tool execution result)
    Tool,
}

/// Content of a message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Simple text content
    Text(String),

    /// Structured content: text, image references, tool calls, tool results
    Blocks(Vec<ContentBlock>),
}

/// A block of content within a message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Text content
    Text { text: String },

    /// Image reference by URL (vision input)
    ImageUrl { url: String },

    /// Tool call request emitted by the assistant
    ToolUse {
        /// Correlation id, unique within one assistant turn
        id: String,
        /// Name of the tool to call
        name: String,
        /// Arguments for the tool
        input: serde_json::Value,
    },

    /// Tool result, correlated to a preceding ToolUse
    ToolResult {
        /// ID of the tool call this answers
        tool_call_id: String,
        /// Name of the tool that produced the result
        name: String,
        /// Whether the tool execution failed
        is_error: Option<bool>,
        /// Result content
        content: String,
    },
}

impl ChatMessage {
    /// Create a new system message
    pub fn system<S: Into<String>>(content: S) -> Self {
        Self {
            role: MessageRole::System,
            content: MessageContent::Text(content.into()),
        }
    }

    /// Create a new user message
    pub fn user<S: Into<String>>(content: S) -> Self {
        Self {
            role: MessageRole::User,
            content: MessageContent::Text(content.into()),
        }
    }

    /// Create a new assistant message
    pub fn assistant<S: Into<String>>(content: S) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: MessageContent::Text(content.into()),
        }
    }

    /// Create a tool-result message correlated to a tool call
    pub fn tool_result<S: Into<String>>(
        tool_call_id: S,
        name: S,
        content: S,
        is_error: bool,
    ) -> Self {
        Self {
            role: MessageRole::Tool,
            content: MessageContent::Blocks(vec![ContentBlock::ToolResult {
                tool_call_id: tool_call_id.into(),
                name: name.into(),
                is_error: Some(is_error),
                content: content.into(),
            }]),
        }
    }

    /// Get the text content of the message
    pub fn get_text(&self) -> Option<String> {
        match &self.content {
            MessageContent::Text(text) => Some(text.clone()),
            MessageContent::Blocks(blocks) => {
                let text_parts: Vec<String> = blocks
                    .iter()
                    .filter_map(|block| match block {
                        ContentBlock::Text { text } => Some(text.clone()),
                        _ => None,
                    })
                    .collect();
                if text_parts.is_empty() {
                    None
                } else {
                    Some(text_parts.join("\n"))
                }
            }
        }
    }

    /// Check if the message contains tool call requests
    pub fn has_tool_use(&self) -> bool {
        match &self.content {
            MessageContent::Text(_) => false,
            MessageContent::Blocks(blocks) => blocks
                .iter()
                .any(|block| matches!(block, ContentBlock::ToolUse { .. })),
        }
    }

    /// Extract tool call blocks, in the order the model emitted them
    pub fn get_tool_uses(&self) -> Vec<&ContentBlock> {
        match &self.content {
            MessageContent::Text(_) => Vec::new(),
            MessageContent::Blocks(blocks) => blocks
                .iter()
                .filter(|block| matches!(block, ContentBlock::ToolUse { .. }))
                .collect(),
        }
    }
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        MessageContent::Text(text)
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        MessageContent::Text(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_constructors_set_roles() {
        assert_eq!(ChatMessage::system("s").role, MessageRole::System);
        assert_eq!(ChatMessage::user("u").role, MessageRole::User);
        assert_eq!(ChatMessage::assistant("a").role, MessageRole::Assistant);
        assert_eq!(
            ChatMessage::tool_result("id", "get_time", "12:00", false).role,
            MessageRole::Tool
        );
    }

    #[test]
    fn test_tool_uses_preserve_order() {
        let message = ChatMessage {
            role: MessageRole::Assistant,
            content: MessageContent::Blocks(vec![
                ContentBlock::ToolUse {
                    id: "call_1".to_string(),
                    name: "get_weather".to_string(),
                    input: json!({"city": "Shanghai"}),
                },
                ContentBlock::Text {
                    text: "checking".to_string(),
                },
                ContentBlock::ToolUse {
                    id: "call_2".to_string(),
                    name: "get_time".to_string(),
                    input: json!({"question": "now?"}),
                },
            ]),
        };

        assert!(message.has_tool_use());
        let uses = message.get_tool_uses();
        assert_eq!(uses.len(), 2);
        match uses[0] {
            ContentBlock::ToolUse { id, .. } => assert_eq!(id, "call_1"),
            _ => panic!("expected tool use"),
        }
        match uses[1] {
            ContentBlock::ToolUse { id, .. } => assert_eq!(id, "call_2"),
            _ => panic!("expected tool use"),
        }
    }

    #[test]
    fn test_plain_text_has_no_tool_use() {
        let message = ChatMessage::assistant("hello");
        assert!(!message.has_tool_use());
        assert_eq!(message.get_text().as_deref(), Some("hello"));
    }

    #[test]
    fn test_get_text_joins_text_blocks() {
        let message = ChatMessage {
            role: MessageRole::User,
            content: MessageContent::Blocks(vec![
                ContentBlock::Text {
                    text: "what is in this image?".to_string(),
                },
                ContentBlock::ImageUrl {
                    url: "https://img.example/x.png".to_string(),
                },
            ]),
        };
        assert_eq!(message.get_text().as_deref(), Some("what is in this image?"));
    }
}
