//! Output formatting for CLI commands.
//!
//! Supports text and JSON output formats.

use crate::core::{Chunk, Metadata};
use crate::error::Error;
use crate::memory::{ChatMessage, ConversationMemory, MemoryVariables};
use serde::Serialize;
use std::fmt::Write;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output.
    Json,
}

impl OutputFormat {
    /// Parses format from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Formats the chunks produced by a split.
#[must_use]
pub fn format_chunks(chunks: &[Chunk], strategy: &str, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_chunks_text(chunks, strategy),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct SplitOutput<'a> {
                strategy: &'a str,
                count: usize,
                chunks: &'a [Chunk],
            }
            format_json(&SplitOutput {
                strategy,
                count: chunks.len(),
                chunks,
            })
        }
    }
}

fn format_chunks_text(chunks: &[Chunk], strategy: &str) -> String {
    if chunks.is_empty() {
        return "No chunks produced.\n".to_string();
    }

    let mut output = String::new();
    let _ = writeln!(
        output,
        "{} chunks ({strategy} strategy):",
        chunks.len()
    );

    for (i, chunk) in chunks.iter().enumerate() {
        output.push('\n');
        let _ = writeln!(
            output,
            "--- [{i}] {} chars ---",
            chunk.content.chars().count()
        );
        if !chunk.metadata.is_empty() {
            let _ = writeln!(output, "{}", format_metadata(&chunk.metadata));
        }
        output.push_str(&chunk.content);
        if !chunk.content.ends_with('\n') {
            output.push('\n');
        }
    }

    output
}

/// Formats write chunks result.
#[must_use]
pub fn format_write_chunks_result(paths: &[String], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            let _ = writeln!(output, "Wrote {} chunks:", paths.len());
            for path in paths {
                let _ = writeln!(output, "  {path}");
            }
            output
        }
        OutputFormat::Json => format_json(&paths),
    }
}

/// Formats the state of a memory after a replay.
#[must_use]
pub fn format_memory(
    memory: &dyn ConversationMemory,
    recorded: usize,
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Text => format_memory_text(memory, recorded),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct MemoryOutput<'a> {
                policy: &'a str,
                recorded: usize,
                retained: usize,
                summary: &'a str,
                messages: Vec<ChatMessage>,
                variables: MemoryVariables,
            }
            format_json(&MemoryOutput {
                policy: memory.name(),
                recorded,
                retained: memory.turns().len(),
                summary: memory.summary(),
                messages: memory.messages(),
                variables: memory.render(),
            })
        }
    }
}

fn format_memory_text(memory: &dyn ConversationMemory, recorded: usize) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Memory ({} policy)", memory.name());
    let _ = writeln!(output, "  Turns recorded: {recorded}");
    let _ = writeln!(output, "  Turns retained: {}", memory.turns().len());
    if !memory.summary().is_empty() {
        let _ = writeln!(
            output,
            "  Summary:        {} chars",
            memory.summary().chars().count()
        );
    }

    for (key, value) in memory.render() {
        output.push('\n');
        let _ = writeln!(output, "{key}:");
        output.push_str(&value);
        if !value.is_empty() && !value.ends_with('\n') {
            output.push('\n');
        }
    }

    output
}

/// Formats the list of strategies, policies, and token counters.
#[must_use]
pub fn format_strategies(
    strategies: &[&str],
    policies: &[&str],
    counters: &[&str],
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            let _ = writeln!(output, "Splitting strategies: {}", strategies.join(", "));
            let _ = writeln!(output, "Memory policies:      {}", policies.join(", "));
            let _ = writeln!(output, "Token counters:       {}", counters.join(", "));
            output
        }
        OutputFormat::Json => {
            let result = serde_json::json!({
                "strategies": strategies,
                "policies": policies,
                "token_counters": counters,
            });
            format_json(&result)
        }
    }
}

/// Formats an error for display.
#[must_use]
pub fn format_error(error: &Error, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => error.to_string(),
        OutputFormat::Json => {
            let result = serde_json::json!({
                "error": {
                    "kind": error_kind(error),
                    "message": error.to_string(),
                }
            });
            format_json(&result)
        }
    }
}

const fn error_kind(error: &Error) -> &'static str {
    match error {
        Error::Config(_) => "config",
        Error::Collaborator(_) => "collaborator",
        Error::InvariantViolation { .. } => "invariant_violation",
        Error::Io(_) => "io",
        Error::Command(_) => "command",
    }
}

/// Formats metadata as `key=value` pairs.
fn format_metadata(metadata: &Metadata) -> String {
    metadata
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Formats a value as JSON.
fn format_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::memory::WindowBuffer;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::parse("json"), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("JSON"), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("text"), OutputFormat::Text);
        assert_eq!(OutputFormat::parse("unknown"), OutputFormat::Text);
    }

    #[test]
    fn test_format_chunks_text() {
        let mut metadata = Metadata::new();
        metadata.insert("Header 1".to_string(), "Foo".into());
        let chunks = vec![
            Chunk::with_metadata("Hi this is Jim", metadata),
            Chunk::new("second"),
        ];

        let text = format_chunks(&chunks, "markdown", OutputFormat::Text);
        assert!(text.starts_with("2 chunks (markdown strategy):"));
        assert!(text.contains("--- [0] 14 chars ---\nHeader 1=Foo\nHi this is Jim\n"));
        assert!(text.contains("--- [1] 6 chars ---\nsecond\n"));
    }

    #[test]
    fn test_format_chunks_json() {
        let chunks = vec![Chunk::new("a")];
        let json = format_chunks(&chunks, "recursive", OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["count"], 1);
        assert_eq!(value["chunks"][0]["content"], "a");
    }

    #[test]
    fn test_format_empty_chunks() {
        assert_eq!(
            format_chunks(&[], "token", OutputFormat::Text),
            "No chunks produced.\n"
        );
    }

    #[test]
    fn test_format_memory() {
        let mut memory = WindowBuffer::new(1).unwrap();
        memory.record_turn("Hi", "What's up").unwrap();
        memory.record_turn("Not much", "Cool").unwrap();

        let text = format_memory(&memory, 2, OutputFormat::Text);
        assert!(text.contains("Turns recorded: 2"));
        assert!(text.contains("Turns retained: 1"));
        assert!(text.ends_with("history:\nHuman: Not much\nAI: Cool\n"));

        let json = format_memory(&memory, 2, OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["policy"], "window");
        assert_eq!(value["messages"][0]["role"], "human");
        assert_eq!(value["variables"]["history"], "Human: Not much\nAI: Cool");
    }

    #[test]
    fn test_format_error_json() {
        let error: Error = ConfigError::ZeroWindow.into();
        let json = format_error(&error, OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["error"]["kind"], "config");
        assert!(
            value["error"]["message"]
                .as_str()
                .unwrap()
                .contains("window size")
        );
    }
}
