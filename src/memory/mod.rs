//! Conversation memory.
//!
//! A memory keeps the turns of one conversation and renders a bounded view
//! of them for the next prompt. Four retention policies are available:
//!
//! - **Buffer**: every turn, unbounded
//! - **Window**: the last `k` turns
//! - **Token**: the newest turns fitting a token budget
//! - **Summary**: like token, but evicted turns are folded into a summary

pub mod buffer;
pub mod summarizer;
pub mod summary_buffer;
pub mod token_buffer;
pub mod traits;
pub mod turn;

pub use buffer::{ConversationBuffer, WindowBuffer};
pub use summarizer::{
    FnSummarizer, PromptSummarizer, SUMMARY_PROMPT, Summarizer, TextGenerator,
    TranscriptSummarizer, build_summary_prompt,
};
pub use summary_buffer::SummaryBuffer;
pub use token_buffer::TokenBuffer;
pub use traits::ConversationMemory;
pub use turn::{
    ChatMessage, DEFAULT_MEMORY_KEY, MemoryVariables, Role, TranscriptFormat, Turn, buffer_string,
};

use crate::error::{ConfigError, Result};
use crate::tokens::TokenCounter;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Default window size.
pub const DEFAULT_WINDOW: usize = 5;

/// Default token budget.
pub const DEFAULT_MAX_TOKEN_LIMIT: usize = 2000;

/// Memory configuration, loadable from JSON.
///
/// # Examples
///
/// ```
/// use ragkit::memory::MemoryConfig;
///
/// let config: MemoryConfig = serde_json::from_str(r#"{"policy": "window", "k": 2}"#).unwrap();
/// assert_eq!(config.k, 2);
/// assert_eq!(config.format.human_prefix, "Human");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Policy name: "buffer", "window", "token", or "summary".
    pub policy: String,

    /// Window size for the window policy.
    pub k: usize,

    /// Token budget for the token and summary policies.
    pub max_token_limit: usize,

    /// Rendering options.
    #[serde(flatten)]
    pub format: TranscriptFormat,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            policy: "buffer".to_string(),
            k: DEFAULT_WINDOW,
            max_token_limit: DEFAULT_MAX_TOKEN_LIMIT,
            format: TranscriptFormat::default(),
        }
    }
}

/// Creates a memory from configuration.
///
/// The counter is used by the token and summary policies, the summarizer
/// only by the summary policy.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownPolicy`] for an unrecognized policy name,
/// or the policy's own construction error.
pub fn create_memory(
    config: &MemoryConfig,
    counter: Arc<dyn TokenCounter>,
    summarizer: Arc<dyn Summarizer>,
) -> Result<Box<dyn ConversationMemory>> {
    let format = config.format.clone();
    match config.policy.to_lowercase().as_str() {
        "buffer" => Ok(Box::new(ConversationBuffer::new().with_format(format))),
        "window" => Ok(Box::new(WindowBuffer::new(config.k)?.with_format(format))),
        "token" => Ok(Box::new(TokenBuffer::new_with_format(
            counter,
            config.max_token_limit,
            format,
        )?)),
        "summary" => Ok(Box::new(SummaryBuffer::new_with_format(
            counter,
            summarizer,
            config.max_token_limit,
            format,
        )?)),
        _ => Err(ConfigError::UnknownPolicy {
            name: config.policy.clone(),
        }
        .into()),
    }
}

/// Lists available memory policy names.
#[must_use]
pub fn available_policies() -> Vec<&'static str> {
    vec!["buffer", "window", "token", "summary"]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::tokens::HeuristicTokenCounter;
    use test_case::test_case;

    fn build(config: &MemoryConfig) -> Result<Box<dyn ConversationMemory>> {
        create_memory(
            config,
            Arc::new(HeuristicTokenCounter::new()),
            Arc::new(TranscriptSummarizer::new()),
        )
    }

    #[test_case("buffer")]
    #[test_case("window")]
    #[test_case("token")]
    #[test_case("summary")]
    fn test_create_memory(policy: &str) {
        let config = MemoryConfig {
            policy: policy.to_string(),
            ..MemoryConfig::default()
        };
        let memory = build(&config).unwrap();
        assert_eq!(memory.name(), policy);
    }

    #[test]
    fn test_create_memory_unknown_policy() {
        let config = MemoryConfig {
            policy: "entity".to_string(),
            ..MemoryConfig::default()
        };
        assert!(matches!(
            build(&config),
            Err(Error::Config(ConfigError::UnknownPolicy { .. }))
        ));
    }

    #[test]
    fn test_create_memory_rejects_zero_window() {
        let config = MemoryConfig {
            policy: "window".to_string(),
            k: 0,
            ..MemoryConfig::default()
        };
        assert!(matches!(
            build(&config),
            Err(Error::Config(ConfigError::ZeroWindow))
        ));
    }

    #[test]
    fn test_created_memory_uses_format() {
        let config: MemoryConfig = serde_json::from_str(
            r#"{"policy": "window", "k": 1, "ai_prefix": "Bot", "memory_key": "chat"}"#,
        )
        .unwrap();
        let mut memory = build(&config).unwrap();
        memory.record_turn("a", "b").unwrap();
        memory.record_turn("c", "d").unwrap();
        assert_eq!(memory.render()["chat"], "Human: c\nBot: d");
    }

    #[test]
    fn test_available_policies() {
        let config = MemoryConfig::default();
        for policy in available_policies() {
            let config = MemoryConfig {
                policy: policy.to_string(),
                ..config.clone()
            };
            assert!(build(&config).is_ok());
        }
    }
}
