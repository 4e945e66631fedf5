//! Unbounded and windowed buffers.

use crate::error::{ConfigError, Result};
use crate::memory::traits::ConversationMemory;
use crate::memory::turn::{TranscriptFormat, Turn};
use tracing::debug;

/// Keeps every turn.
#[derive(Debug, Clone, Default)]
pub struct ConversationBuffer {
    turns: Vec<Turn>,
    format: TranscriptFormat,
}

impl ConversationBuffer {
    /// Creates an empty buffer with default rendering.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets rendering options.
    #[must_use]
    pub fn with_format(mut self, format: TranscriptFormat) -> Self {
        self.format = format;
        self
    }
}

impl ConversationMemory for ConversationBuffer {
    fn record_turn(&mut self, input: &str, output: &str) -> Result<()> {
        self.turns.push(Turn::new(input, output));
        Ok(())
    }

    fn turns(&self) -> &[Turn] {
        &self.turns
    }

    fn format(&self) -> &TranscriptFormat {
        &self.format
    }

    fn name(&self) -> &'static str {
        "buffer"
    }

    fn clear(&mut self) {
        self.turns.clear();
    }
}

/// Keeps the most recent `k` turns; older turns are dropped.
#[derive(Debug, Clone)]
pub struct WindowBuffer {
    k: usize,
    turns: Vec<Turn>,
    format: TranscriptFormat,
}

impl WindowBuffer {
    /// Creates a window of `k` turns.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroWindow`] if `k` is zero.
    pub fn new(k: usize) -> Result<Self> {
        if k == 0 {
            return Err(ConfigError::ZeroWindow.into());
        }
        Ok(Self {
            k,
            turns: Vec::with_capacity(k + 1),
            format: TranscriptFormat::default(),
        })
    }

    /// Sets rendering options.
    #[must_use]
    pub fn with_format(mut self, format: TranscriptFormat) -> Self {
        self.format = format;
        self
    }

    /// Window size.
    #[must_use]
    pub const fn k(&self) -> usize {
        self.k
    }
}

impl ConversationMemory for WindowBuffer {
    fn record_turn(&mut self, input: &str, output: &str) -> Result<()> {
        self.turns.push(Turn::new(input, output));
        if self.turns.len() > self.k {
            let evicted = self.turns.len() - self.k;
            self.turns.drain(..evicted);
            debug!(evicted, k = self.k, "dropped turns outside the window");
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
        "window"
    }

    fn clear(&mut self) {
        self.turns.clear();
    }
}
