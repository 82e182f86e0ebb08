//! Message types for LLM communication
//!
//! Messages are either plain text or a list of content blocks. Blocks carry
//! the tool-use round trip: the assistant emits `ToolUse`, the executor
//! answers with `ToolResult`.

use serde::{Deserialize, Serialize};

/// Who a message is from
///
/// Tool results travel as `User` messages; providers that have a dedicated
/// tool role translate them on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// One piece of a structured message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },

    /// The model asks for a tool call
    ToolUse {
        /// Provider-assigned call id, echoed by the matching result
        id: String,
        name: String,
        input: serde_json::Value,
    },

    /// Output of a tool call, answered under the call's id
    ToolResult {
        tool_use_id: String,
        content: String,
        /// `Some(true)` when the tool failed and `content` is the error text
        #[serde(skip_serializing_if = "Option::is_none")]
        is_error: Option<bool>,
    },
}

/// Plain text, or blocks once tools are involved
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

/// One turn of a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,

    /// Absent only in hand-built messages; providers always fill it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<MessageContent>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self::text_message(Role::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::text_message(Role::Assistant, text)
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::text_message(Role::System, text)
    }

    fn text_message(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(MessageContent::Text(text.into())),
        }
    }

    /// Successful output of call `tool_use_id`
    pub fn tool_result(tool_use_id: String, result: String) -> Self {
        Self::tool_block(tool_use_id, result, None)
    }

    /// Failure of call `tool_use_id`; the model sees `error` and may recover
    pub fn tool_error(tool_use_id: String, error: String) -> Self {
        Self::tool_block(tool_use_id, error, Some(true))
    }

    fn tool_block(tool_use_id: String, content: String, is_error: Option<bool>) -> Self {
        Self {
            role: Role::User,
            content: Some(MessageContent::Blocks(vec![ContentBlock::ToolResult {
                tool_use_id,
                content,
                is_error,
            }])),
        }
    }

    /// First text in the message, ignoring tool blocks
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            Some(MessageContent::Text(s)) => Some(s),
            Some(MessageContent::Blocks(blocks)) => blocks.iter().find_map(|b| match b {
                ContentBlock::Text { text } => Some(text.as_str()),
                _ => None,
            }),
            None => None,
        }
    }

    /// `ToolUse` blocks in order of appearance
    pub fn tool_uses(&self) -> Vec<&ContentBlock> {
        match &self.content {
            Some(MessageContent::Blocks(blocks)) => blocks
                .iter()
                .filter(|b| matches!(b, ContentBlock::ToolUse { .. }))
                .collect(),
            _ => vec![],
        }
    }

    pub fn has_tool_uses(&self) -> bool {
        !self.tool_uses().is_empty()
    }
}
