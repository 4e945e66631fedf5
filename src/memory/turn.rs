//! Conversation turns and their rendered forms.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Rendered memory view: `{memory_key: history}`.
pub type MemoryVariables = BTreeMap<String, String>;

/// Default key under which the history is rendered.
pub const DEFAULT_MEMORY_KEY: &str = "history";

/// One exchange: what the human said and what the model answered.
///
/// Turns are immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// The human's message.
    pub input: String,
    /// The model's reply.
    pub output: String,
}

impl Turn {
    /// Creates a turn.
    #[must_use]
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }

    /// Renders the turn as two prefixed lines.
    ///
    /// # Examples
    ///
    /// ```
    /// use ragkit::memory::{TranscriptFormat, Turn};
    ///
    /// let turn = Turn::new("Hi", "What's up");
    /// assert_eq!(turn.render(&TranscriptFormat::default()), "Human: Hi\nAI: What's up");
    /// ```
    #[must_use]
    pub fn render(&self, format: &TranscriptFormat) -> String {
        format!(
            "{}: {}\n{}: {}",
            format.human_prefix, self.input, format.ai_prefix, self.output
        )
    }

    /// Returns the turn as a human message followed by an AI message.
    #[must_use]
    pub fn messages(&self) -> [ChatMessage; 2] {
        [
            ChatMessage::new(Role::Human, self.input.clone()),
            ChatMessage::new(Role::Ai, self.output.clone()),
        ]
    }
}

/// Speaker of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Running summary or instructions.
    System,
    /// The human side of the conversation.
    Human,
    /// The model side of the conversation.
    Ai,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::System => f.write_str("system"),
            Self::Human => f.write_str("human"),
            Self::Ai => f.write_str("ai"),
        }
    }
}

/// A structured message, the alternative to the flat rendered history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who is speaking.
    pub role: Role,
    /// What was said.
    pub content: String,
}

impl ChatMessage {
    /// Creates a message.
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Speaker prefixes and output key used when rendering history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptFormat {
    /// Prefix for human lines.
    pub human_prefix: String,
    /// Prefix for AI lines.
    pub ai_prefix: String,
    /// Key of the rendered history in [`MemoryVariables`].
    pub memory_key: String,
}

impl Default for TranscriptFormat {
    fn default() -> Self {
        Self {
            human_prefix: "Human".to_string(),
            ai_prefix: "AI".to_string(),
            memory_key: DEFAULT_MEMORY_KEY.to_string(),
        }
    }
}

impl TranscriptFormat {
    /// Returns the prefix for a role.
    #[must_use]
    pub fn prefix(&self, role: Role) -> &str {
        match role {
            Role::System => "System",
            Role::Human => &self.human_prefix,
            Role::Ai => &self.ai_prefix,
        }
    }
}

/// Flattens messages into `"{prefix}: {content}"` lines joined by newlines.
#[must_use]
pub fn buffer_string(messages: &[ChatMessage], format: &TranscriptFormat) -> String {
    messages
        .iter()
        .map(|m| format!("{}: {}", format.prefix(m.role), m.content))
        .collect::<Vec<_>>()
        .join("\n")
}
