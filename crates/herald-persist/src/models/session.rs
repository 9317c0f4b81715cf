use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// One conversation turn; `timestamp` is epoch milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: i64,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>, timestamp: i64) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            timestamp,
        }
    }

    pub fn assistant(content: impl Into<String>, timestamp: i64) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            timestamp,
        }
    }
}

/// Per-conversation history, overwritten on every turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
    pub last_used: i64,
}

impl Session {
    pub fn new(id: impl Into<String>, last_used: i64) -> Self {
        Self {
            id: id.into(),
            history: Vec::new(),
            last_used,
        }
    }

    /// The trailing `turns` messages, oldest first
    pub fn recent(&self, turns: usize) -> &[ChatMessage] {
        let start = self.history.len().saturating_sub(turns);
        &self.history[start..]
    }
}
