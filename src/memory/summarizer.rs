//! Summarization collaborators for the summarizing buffer.
//!
//! Folding an evicted turn into the running summary is a strategy with one
//! capability, [`Summarizer::summarize`]. The crate ships a deterministic
//! transcript folder for offline use and tests, and a prompt-driven
//! summarizer that delegates the actual text generation to an injected
//! [`TextGenerator`].

use crate::error::BoxError;
use crate::memory::turn::{TranscriptFormat, Turn};
use std::fmt::Write;
use std::sync::Arc;

/// Folds one turn into a running summary.
pub trait Summarizer: Send + Sync {
    /// Returns the new summary after folding in `turn`.
    ///
    /// # Errors
    ///
    /// Returns the collaborator's own error; callers must treat it as fatal
    /// for the current operation.
    fn summarize(&self, previous_summary: &str, turn: &Turn) -> Result<String, BoxError>;

    /// Returns the name of the summarizer.
    fn name(&self) -> &'static str;
}

/// Adapts a closure into a [`Summarizer`].
///
/// # Examples
///
/// ```
/// use ragkit::memory::{FnSummarizer, Summarizer, Turn};
///
/// let count = FnSummarizer::new(|prev: &str, _turn: &Turn| Ok(format!("{prev}+")));
/// assert_eq!(count.summarize("+", &Turn::new("a", "b")).unwrap(), "++");
/// ```
pub struct FnSummarizer<F> {
    summarize: F,
}

impl<F> FnSummarizer<F>
where
    F: Fn(&str, &Turn) -> Result<String, BoxError> + Send + Sync,
{
    /// Wraps the given folding function.
    pub const fn new(summarize: F) -> Self {
        Self { summarize }
    }
}

impl<F> Summarizer for FnSummarizer<F>
where
    F: Fn(&str, &Turn) -> Result<String, BoxError> + Send + Sync,
{
    fn summarize(&self, previous_summary: &str, turn: &Turn) -> Result<String, BoxError> {
        (self.summarize)(previous_summary, turn)
    }

    fn name(&self) -> &'static str {
        "custom"
    }
}

/// Lossless summarizer: appends the rendered turn to the summary.
#[derive(Debug, Clone, Default)]
pub struct TranscriptSummarizer {
    format: TranscriptFormat,
}

impl TranscriptSummarizer {
    /// Creates a summarizer rendering turns with default prefixes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the prefixes used to render folded turns.
    #[must_use]
    pub fn with_format(mut self, format: TranscriptFormat) -> Self {
        self.format = format;
        self
    }
}

impl Summarizer for TranscriptSummarizer {
    fn summarize(&self, previous_summary: &str, turn: &Turn) -> Result<String, BoxError> {
        let rendered = turn.render(&self.format);
        if previous_summary.is_empty() {
            Ok(rendered)
        } else {
            Ok(format!("{previous_summary}\n{rendered}"))
        }
    }

    fn name(&self) -> &'static str {
        "transcript"
    }
}

/// Text-generation capability (an LLM completion call).
pub trait TextGenerator: Send + Sync {
    /// Completes `prompt`.
    ///
    /// # Errors
    ///
    /// Returns the collaborator's own error.
    fn generate(&self, prompt: &str) -> Result<String, BoxError>;
}

/// Instructions for progressive summarization.
pub const SUMMARY_PROMPT: &str = "Progressively summarize the lines of conversation provided, \
adding onto the previous summary and returning a new summary.

EXAMPLE
Current summary:
The human asks what the AI thinks of artificial intelligence. The AI thinks artificial intelligence is a force for good.

New lines of conversation:
Human: Why do you think artificial intelligence is a force for good?
AI: Because artificial intelligence will help humans reach their full potential.

New summary:
The human asks what the AI thinks of artificial intelligence. The AI thinks artificial intelligence is a force for good because it will help humans reach their full potential.
END OF EXAMPLE";

/// Builds the summarization prompt for one fold.
#[must_use]
pub fn build_summary_prompt(previous_summary: &str, new_lines: &str) -> String {
    let mut prompt = String::from(SUMMARY_PROMPT);
    let _ = write!(
        prompt,
        "\n\nCurrent summary:\n{previous_summary}\n\n\
         New lines of conversation:\n{new_lines}\n\n\
         New summary:"
    );
    prompt
}

/// Summarizer that asks a [`TextGenerator`] to extend the summary.
#[derive(Clone)]
pub struct PromptSummarizer {
    generator: Arc<dyn TextGenerator>,
    format: TranscriptFormat,
}

impl PromptSummarizer {
    /// Creates a summarizer around a text generator.
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            format: TranscriptFormat::default(),
        }
    }

    /// Sets the prefixes used to render new lines.
    #[must_use]
    pub fn with_format(mut self, format: TranscriptFormat) -> Self {
        self.format = format;
        self
    }
}

impl std::fmt::Debug for PromptSummarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptSummarizer")
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

impl Summarizer for PromptSummarizer {
    fn summarize(&self, previous_summary: &str, turn: &Turn) -> Result<String, BoxError> {
        let prompt = build_summary_prompt(previous_summary, &turn.render(&self.format));
        let summary = self.generator.generate(&prompt)?;
        Ok(summary.trim().to_string())
    }

    fn name(&self) -> &'static str {
        "prompt"
    }
}
