//! Token-budgeted buffer.

use crate::error::{CollaboratorError, ConfigError, Result};
use crate::memory::traits::ConversationMemory;
use crate::memory::turn::{TranscriptFormat, Turn};
use crate::tokens::TokenCounter;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Number of oldest turns to evict so the rest fit in `limit`.
///
/// The newest turn is never evicted, so a single turn larger than the
/// budget is kept whole.
pub(crate) fn plan_evictions(costs: &[usize], limit: usize) -> usize {
    let mut total: usize = costs.iter().sum();
    let mut evict = 0;
    while total > limit && costs.len() - evict > 1 {
        total -= costs[evict];
        evict += 1;
    }
    evict
}

/// Counts the tokens of a rendered turn.
pub(crate) fn turn_cost(
    counter: &dyn TokenCounter,
    turn: &Turn,
    format: &TranscriptFormat,
) -> Result<usize> {
    counter
        .count_tokens(&turn.render(format))
        .map_err(|e| CollaboratorError::TokenCounter(e).into())
}

/// Keeps the most recent turns whose total token count fits the budget.
/// Evicted turns are deleted outright.
///
/// # Examples
///
/// ```
/// use ragkit::memory::{ConversationMemory, TokenBuffer};
/// use ragkit::tokens::WordTokenizer;
/// use std::sync::Arc;
///
/// let mut memory = TokenBuffer::new(Arc::new(WordTokenizer::new()), 20).unwrap();
/// memory.record_turn("AI is what?!", "Amazing!").unwrap();
/// memory.record_turn("Backpropagation is what?", "Beautiful!").unwrap();
/// memory.record_turn("Chatbots are what?", "Charming!").unwrap();
/// assert_eq!(memory.turns().len(), 1);
/// ```
#[derive(Clone)]
pub struct TokenBuffer {
    counter: Arc<dyn TokenCounter>,
    max_token_limit: usize,
    turns: Vec<Turn>,
    costs: Vec<usize>,
    format: TranscriptFormat,
}

impl TokenBuffer {
    /// Creates a buffer with a token budget and the default `Human`/`AI`
    /// rendering.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroTokenLimit`] if the budget is zero.
    pub fn new(counter: Arc<dyn TokenCounter>, max_token_limit: usize) -> Result<Self> {
        Self::new_with_format(counter, max_token_limit, TranscriptFormat::default())
    }

    /// Creates a buffer that renders, and therefore measures, turns with
    /// `format`. The format is fixed for the buffer's lifetime so recorded
    /// costs always match the rendered history.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroTokenLimit`] if the budget is zero.
    pub fn new_with_format(
        counter: Arc<dyn TokenCounter>,
        max_token_limit: usize,
        format: TranscriptFormat,
    ) -> Result<Self> {
        if max_token_limit == 0 {
            return Err(ConfigError::ZeroTokenLimit.into());
        }
        Ok(Self {
            counter,
            max_token_limit,
            turns: Vec::new(),
            costs: Vec::new(),
            format,
        })
    }

    /// Total tokens of the retained turns.
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

impl fmt::Debug for TokenBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenBuffer")
            .field("counter", &self.counter.name())
            .field("max_token_limit", &self.max_token_limit)
            .field("turns", &self.turns.len())
            .finish_non_exhaustive()
    }
}

impl ConversationMemory for TokenBuffer {
    fn record_turn(&mut self, input: &str, output: &str) -> Result<()> {
        let turn = Turn::new(input, output);
        let cost = turn_cost(self.counter.as_ref(), &turn, &self.format)?;

        self.turns.push(turn);
        self.costs.push(cost);

        let evict = plan_evictions(&self.costs, self.max_token_limit);
        if evict > 0 {
            self.turns.drain(..evict);
            self.costs.drain(..evict);
            debug!(
                evicted = evict,
                total_tokens = self.total_tokens(),
                limit = self.max_token_limit,
                "evicted turns over the token budget"
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
        "token"
    }

    fn clear(&mut self) {
        self.turns.clear();
        self.costs.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::{FnTokenCounter, WordTokenizer};
    use test_case::test_case;

    fn words(limit: usize) -> TokenBuffer {
        TokenBuffer::new(Arc::new(WordTokenizer::new()), limit).unwrap()
    }

    #[test_case(&[], 10, 0 ; "empty")]
    #[test_case(&[3, 3, 3], 10, 0 ; "fits")]
    #[test_case(&[5, 5, 5], 10, 1 ; "one over")]
    #[test_case(&[5, 5, 20], 10, 2 ; "newest alone too big")]
    #[test_case(&[1, 1, 1, 8], 10, 1 ; "exact fit after eviction")]
    fn test_plan_evictions(costs: &[usize], limit: usize, expected: usize) {
        assert_eq!(plan_evictions(costs, limit), expected);
    }

    #[test]
    fn test_budget_respected() {
        let mut memory = words(12);
        memory.record_turn("one two", "three").unwrap();
        memory.record_turn("four", "five six").unwrap();
        memory.record_turn("seven", "eight").unwrap();
        assert!(memory.total_tokens() <= 12);
        assert_eq!(memory.turns().last(), Some(&Turn::new("seven", "eight")));
    }

    #[test]
    fn test_oversized_turn_kept_whole() {
        let mut memory = words(3);
        memory.record_turn("a", "b").unwrap();
        memory
            .record_turn("a very long question indeed", "and a long answer")
            .unwrap();
        assert_eq!(memory.turns().len(), 1);
        assert!(memory.total_tokens() > 3);
        assert!(memory.history().contains("a very long question indeed"));
    }

    #[test]
    fn test_counter_failure_leaves_memory_unchanged() {
        let counter = FnTokenCounter::new(|text: &str| {
            if text.contains("poison") {
                Err("tokenizer crashed".into())
            } else {
                Ok(1)
            }
        });
        let mut memory = TokenBuffer::new(Arc::new(counter), 5).unwrap();
        memory.record_turn("fine", "ok").unwrap();

        let err = memory.record_turn("poison", "x").unwrap_err();
        assert!(err.is_collaborator());
        assert_eq!(memory.turns(), &[Turn::new("fine", "ok")]);
        assert_eq!(memory.total_tokens(), 1);
    }

    #[test]
    fn test_costs_measured_with_custom_prefixes() {
        let format = TranscriptFormat {
            human_prefix: "Human Being".to_string(),
            ..TranscriptFormat::default()
        };
        let mut memory =
            TokenBuffer::new_with_format(Arc::new(WordTokenizer::new()), 100, format).unwrap();
        memory.record_turn("Hi", "Yo").unwrap();

        // "Human Being: Hi\nAI: Yo"
        assert_eq!(memory.total_tokens(), 11);
        assert_eq!(memory.history(), "Human Being: Hi\nAI: Yo");
    }

    #[test]
    fn test_zero_limit_rejected() {
        let result = TokenBuffer::new(Arc::new(WordTokenizer::new()), 0);
        assert!(result.unwrap_err().is_config());
    }

    #[test]
    fn test_clear_resets_tokens() {
        let mut memory = words(100);
        memory.record_turn("q", "a").unwrap();
        memory.clear();
        assert_eq!(memory.total_tokens(), 0);
        assert_eq!(memory.render()["history"], "");
    }
}
