//! Summarizing buffer.

use crate::error::{CollaboratorError, ConfigError, Result};
use crate::memory::summarizer::Summarizer;
use crate::memory::token_buffer::{plan_evictions, turn_cost};
use crate::memory::traits::ConversationMemory;
use crate::memory::turn::{TranscriptFormat, Turn};
use crate::tokens::TokenCounter;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Token-budgeted buffer that folds evicted turns into a running summary.
///
/// Recording is atomic: the new turn's cost and every fold are computed
/// before anything is committed, so a failing counter or summarizer leaves
/// the turns and the summary untouched.
///
/// # Examples
///
/// ```
/// use ragkit::memory::{ConversationMemory, SummaryBuffer, TranscriptSummarizer};
/// use ragkit::tokens::WordTokenizer;
/// use std::sync::Arc;
///
/// let mut memory = SummaryBuffer::new(
///     Arc::new(WordTokenizer::new()),
///     Arc::new(TranscriptSummarizer::new()),
///     10,
/// )
/// .unwrap();
/// memory.record_turn("Hello", "What's up").unwrap();
/// memory.record_turn("Not much", "Cool").unwrap();
/// assert_eq!(memory.summary(), "Human: Hello\nAI: What's up");
/// assert!(memory.history().starts_with("System: Human: Hello"));
/// ```
#[derive(Clone)]
pub struct SummaryBuffer {
    counter: Arc<dyn TokenCounter>,
    summarizer: Arc<dyn Summarizer>,
    max_token_limit: usize,
    turns: Vec<Turn>,
    costs: Vec<usize>,
    summary: String,
    format: TranscriptFormat,
}

impl SummaryBuffer {
    /// Creates a buffer with a token budget and a summarizer, rendering
    /// turns with the default `Human`/`AI` prefixes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroTokenLimit`] if the budget is zero.
    pub fn new(
        counter: Arc<dyn TokenCounter>,
        summarizer: Arc<dyn Summarizer>,
        max_token_limit: usize,
    ) -> Result<Self> {
        Self::new_with_format(
            counter,
            summarizer,
            max_token_limit,
            TranscriptFormat::default(),
        )
    }

    /// Creates a buffer that renders and measures turns with `format`,
    /// fixed for the buffer's lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroTokenLimit`] if the budget is zero.
    pub fn new_with_format(
        counter: Arc<dyn TokenCounter>,
        summarizer: Arc<dyn Summarizer>,
        max_token_limit: usize,
        format: TranscriptFormat,
    ) -> Result<Self> {
        if max_token_limit == 0 {
            return Err(ConfigError::ZeroTokenLimit.into());
        }
        Ok(Self {
            counter,
            summarizer,
            max_token_limit,
            turns: Vec::new(),
            costs: Vec::new(),
            summary: String::new(),
            format,
        })
    }

    /// Total tokens of the retained turns (the summary is not counted).
    #[must_use]
    pub fn total_tokens(&self) -> usize {
        self.costs.iter().sum()
    }

    /// Token budget.
    #[must_use]
    pub const fn max_token_limit(&self) -> usize {
        self.max_token_limit
    }
}

impl fmt::Debug for SummaryBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummaryBuffer")
            .field("counter", &self.counter.name())
            .field("summarizer", &self.summarizer.name())
            .field("max_token_limit", &self.max_token_limit)
            .field("turns", &self.turns.len())
            .field("summary", &self.summary)
            .finish_non_exhaustive()
    }
}

impl ConversationMemory for SummaryBuffer {
    fn record_turn(&mut self, input: &str, output: &str) -> Result<()> {
        let turn = Turn::new(input, output);
        let cost = turn_cost(self.counter.as_ref(), &turn, &self.format)?;

        let mut costs = self.costs.clone();
        costs.push(cost);
        let evict = plan_evictions(&costs, self.max_token_limit);

        let mut summary = self.summary.clone();
        for evicted in self.turns.iter().take(evict) {
            summary = self
                .summarizer
                .summarize(&summary, evicted)
                .map_err(CollaboratorError::Summarizer)?;
        }

        self.turns.push(turn);
        self.turns.drain(..evict);
        costs.drain(..evict);
        self.costs = costs;
        self.summary = summary;

        if evict > 0 {
            debug!(
                folded = evict,
                total_tokens = self.total_tokens(),
                limit = self.max_token_limit,
                "folded evicted turns into the summary"
            );
        }
        Ok(())
    }

    fn turns(&self) -> &[Turn] {
        &self.turns
    }

    fn format(&self) -> &TranscriptFormat {
        &self.format
    }

    fn name(&self) -> &'static str {
        "summary"
    }

    fn summary(&self) -> &str {
        &self.summary
    }

    fn clear(&mut self) {
        self.turns.clear();
        self.costs.clear();
        self.summary.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use crate::memory::summarizer::{FnSummarizer, TranscriptSummarizer};
    use crate::memory::turn::{ChatMessage, Role};
    use crate::tokens::{FnTokenCounter, WordTokenizer};

    fn unit_counter() -> Arc<dyn TokenCounter> {
        Arc::new(FnTokenCounter::new(|_: &str| Ok(1)))
    }

    fn transcript(limit: usize) -> SummaryBuffer {
        SummaryBuffer::new(unit_counter(), Arc::new(TranscriptSummarizer::new()), limit).unwrap()
    }

    #[test]
    fn test_no_summary_under_budget() {
        let mut memory = transcript(3);
        memory.record_turn("a", "b").unwrap();
        memory.record_turn("c", "d").unwrap();
        assert_eq!(memory.summary(), "");
        assert_eq!(memory.history(), "Human: a\nAI: b\nHuman: c\nAI: d");
    }

    #[test]
    fn test_evicted_turns_folded_in_order() {
        let mut memory = transcript(2);
        for i in 0..5 {
            memory.record_turn(&format!("q{i}"), &format!("a{i}")).unwrap();
        }
        assert_eq!(memory.turns().len(), 2);
        assert_eq!(
            memory.summary(),
            "Human: q0\nAI: a0\nHuman: q1\nAI: a1\nHuman: q2\nAI: a2"
        );
    }

    #[test]
    fn test_messages_lead_with_summary() {
        let mut memory = transcript(1);
        memory.record_turn("first", "one").unwrap();
        memory.record_turn("second", "two").unwrap();
        let messages = memory.messages();
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1], ChatMessage::new(Role::Human, "second"));
        assert_eq!(memory.render()["history"], "System: Human: first\nAI: one\nHuman: second\nAI: two");
    }

    #[test]
    fn test_summarizer_failure_is_atomic() {
        let summarizer = FnSummarizer::new(|prev: &str, turn: &Turn| -> std::result::Result<String, BoxError> {
            if turn.input == "fragile" {
                Err("llm timeout".into())
            } else {
                Ok(format!("{prev}[{}]", turn.input))
            }
        });
        let mut memory = SummaryBuffer::new(unit_counter(), Arc::new(summarizer), 1).unwrap();
        memory.record_turn("fragile", "x").unwrap();

        let err = memory.record_turn("next", "y").unwrap_err();
        assert!(err.is_collaborator());
        assert_eq!(memory.turns(), &[Turn::new("fragile", "x")]);
        assert_eq!(memory.summary(), "");
        assert_eq!(memory.total_tokens(), 1);
    }

    #[test]
    fn test_counter_failure_is_atomic() {
        let counter = FnTokenCounter::new(|text: &str| {
            if text.contains("boom") {
                Err("no encoding".into())
            } else {
                Ok(1)
            }
        });
        let mut memory =
            SummaryBuffer::new(Arc::new(counter), Arc::new(TranscriptSummarizer::new()), 1)
                .unwrap();
        memory.record_turn("a", "b").unwrap();
        assert!(memory.record_turn("boom", "c").is_err());
        assert_eq!(memory.turns().len(), 1);
        assert_eq!(memory.summary(), "");
    }

    #[test]
    fn test_word_budget() {
        let mut memory = SummaryBuffer::new(
            Arc::new(WordTokenizer::new()),
            Arc::new(TranscriptSummarizer::new()),
            100,
        )
        .unwrap();
        memory.record_turn("Hello", "What's up").unwrap();
        memory
            .record_turn("Not much, just hanging", "Cool")
            .unwrap();
        assert_eq!(memory.summary(), "");
        assert!(memory.total_tokens() <= 100);
    }

    #[test]
    fn test_budget_uses_configured_prefixes() {
        let format = TranscriptFormat {
            human_prefix: "Human Being".to_string(),
            ..TranscriptFormat::default()
        };
        let mut memory = SummaryBuffer::new_with_format(
            Arc::new(WordTokenizer::new()),
            Arc::new(TranscriptSummarizer::new()),
            20,
            format,
        )
        .unwrap();
        memory.record_turn("Hi", "Yo").unwrap();
        memory.record_turn("Hey", "Sup").unwrap();

        assert_eq!(memory.turns().len(), 1);
        assert_eq!(memory.total_tokens(), 11);
        assert_eq!(memory.summary(), "Human: Hi\nAI: Yo");
    }

    #[test]
    fn test_zero_limit_rejected() {
        let result = SummaryBuffer::new(unit_counter(), Arc::new(TranscriptSummarizer::new()), 0);
        assert!(result.unwrap_err().is_config());
    }

    #[test]
    fn test_clear_drops_summary() {
        let mut memory = transcript(1);
        memory.record_turn("a", "b").unwrap();
        memory.record_turn("c", "d").unwrap();
        memory.clear();
        assert_eq!(memory.summary(), "");
        assert!(memory.turns().is_empty());
        assert_eq!(memory.name(), "summary");
    }
}
