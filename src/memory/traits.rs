//! Conversation memory trait definition.

use crate::error::Result;
use crate::memory::turn::{
    ChatMessage, MemoryVariables, Role, TranscriptFormat, Turn, buffer_string,
};

/// A bounded view over a conversation transcript.
///
/// The retention policy is fixed at construction. `record_turn` is the only
/// operation that changes the retained turns; every other method is a pure
/// read. A memory belongs to one conversation and needs `&mut self` to
/// record, so callers serialize access per session.
///
/// # Examples
///
/// ```
/// use ragkit::memory::{ConversationMemory, WindowBuffer};
///
/// let mut memory = WindowBuffer::new(1).unwrap();
/// memory.record_turn("Hi", "What's up").unwrap();
/// memory.record_turn("Not much", "Cool").unwrap();
/// assert_eq!(memory.render()["history"], "Human: Not much\nAI: Cool");
/// ```
pub trait ConversationMemory: Send {
    /// Appends a turn, then applies the retention policy.
    ///
    /// # Errors
    ///
    /// Returns a collaborator error if token counting or summarization fails;
    /// the memory is left exactly as it was before the call.
    fn record_turn(&mut self, input: &str, output: &str) -> Result<()>;

    /// Retained turns, oldest first.
    fn turns(&self) -> &[Turn];

    /// Rendering settings.
    fn format(&self) -> &TranscriptFormat;

    /// Returns the name of the retention policy.
    fn name(&self) -> &'static str;

    /// Drops all turns and any summary.
    fn clear(&mut self);

    /// Running summary of evicted turns; empty unless the policy folds.
    fn summary(&self) -> &str {
        ""
    }

    /// Structured view: the summary as a system message (if any), then each
    /// turn as a human/AI pair.
    fn messages(&self) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(self.turns().len() * 2 + 1);
        if !self.summary().is_empty() {
            messages.push(ChatMessage::new(Role::System, self.summary()));
        }
        for turn in self.turns() {
            messages.extend(turn.messages());
        }
        messages
    }

    /// Flat rendered history.
    fn history(&self) -> String {
        buffer_string(&self.messages(), self.format())
    }

    /// Renders `{memory_key: history}`.
    fn render(&self) -> MemoryVariables {
        let mut variables = MemoryVariables::new();
        variables.insert(self.format().memory_key.clone(), self.history());
        variables
    }
}
