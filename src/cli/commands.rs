//! CLI command implementations.
//!
//! Contains the business logic for each CLI command.

use crate::chunking::{ParallelSplitter, SplitterConfig, TextSplitter, create_splitter};
use crate::cli::output::{
    OutputFormat, format_chunks, format_memory, format_strategies, format_write_chunks_result,
};
use crate::cli::parser::{Cli, Commands, MemoryArgs, SplitArgs};
use crate::error::{CommandError, Result};
use crate::io::{load_document, load_documents_json, read_json, write_chunks};
use crate::memory::{
    MemoryConfig, TranscriptSummarizer, Turn, available_policies,
    create_memory,
};
use crate::tokens::{TokenCounter, available_token_counters, create_token_counter};
use std::sync::Arc;
use tracing::debug;

/// Executes the CLI command.
///
/// # Arguments
///
/// * `cli` - Parsed CLI arguments.
///
/// # Returns
///
/// Result with output string on success.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn execute(cli: &Cli) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);

    match &cli.command {
        Commands::Split(args) => cmd_split(args, format),
        Commands::Memory(args) => cmd_memory(args, format),
        Commands::Strategies => Ok(cmd_strategies(format)),
    }
}

// ==================== Command Implementations ====================

fn cmd_split(args: &SplitArgs, format: OutputFormat) -> Result<String> {
    check_markdown_flags(args)?;
    let config = splitter_config(args)?;
    debug!(strategy = %args.strategy, ?config, "resolved splitter configuration");

    let documents = if args.documents {
        load_documents_json(&args.file)?
    } else {
        vec![load_document(&args.file)?]
    };

    let splitter = ParallelSplitter::new(create_splitter(&args.strategy, &config)?);
    let chunks = splitter.split_documents(&documents)?;
    debug!(
        documents = documents.len(),
        chunks = chunks.len(),
        "split complete"
    );

    if let Some(out_dir) = &args.out_dir {
        let contents = chunks
            .iter()
            .enumerate()
            .map(|(i, c)| (i, c.content.as_str()));
        let paths = write_chunks(out_dir, contents, &args.prefix)?;
        return Ok(format_write_chunks_result(&paths, format));
    }

    Ok(format_chunks(&chunks, splitter.inner().name(), format))
}

/// Rejects markdown-only flags for other strategies.
fn check_markdown_flags(args: &SplitArgs) -> Result<()> {
    let markdown_flags = !args.headers.is_empty() || args.keep_headers || args.each_line;
    if markdown_flags && !args.strategy.eq_ignore_ascii_case("markdown") {
        return Err(CommandError::InvalidArgument(format!(
            "--header, --keep-headers and --each-line require --strategy markdown, got {}",
            args.strategy
        ))
        .into());
    }
    Ok(())
}

/// Builds the splitter configuration: config file first, then flags.
fn splitter_config(args: &SplitArgs) -> Result<SplitterConfig> {
    let mut config: SplitterConfig = match &args.config {
        Some(path) => read_json(path)?,
        None => SplitterConfig::default(),
    };

    if let Some(size) = args.chunk_size {
        config.chunk_size = size;
    }
    if let Some(overlap) = args.chunk_overlap {
        config.chunk_overlap = overlap;
    }
    if let Some(separator) = &args.separator {
        config.separator = unescape(separator);
    }
    if !args.separators.is_empty() {
        config.separators = args.separators.iter().map(|s| unescape(s)).collect();
    }
    if args.regex {
        config.is_separator_regex = true;
    }
    if args.keep_separator.is_some() {
        config.keep_separator = args.keep_separator;
    }
    if let Some(kind) = args.length {
        config.length_function = kind;
    }
    if let Some(tokenizer) = &args.tokenizer {
        config.tokenizer.clone_from(tokenizer);
    }
    if args.add_start_index {
        config.add_start_index = true;
    }
    if !args.headers.is_empty() {
        config.headers_to_split_on.clone_from(&args.headers);
    }
    if args.keep_headers {
        config.strip_headers = false;
    }
    if args.each_line {
        config.return_each_line = true;
    }

    Ok(config)
}

fn cmd_memory(args: &MemoryArgs, format: OutputFormat) -> Result<String> {
    let config = memory_config(args)?;
    let turns: Vec<Turn> = read_json(&args.transcript)?;

    let counter: Arc<dyn TokenCounter> = create_token_counter(&args.tokenizer)?;
    let summarizer = Arc::new(TranscriptSummarizer::new().with_format(config.format.clone()));
    let mut memory = create_memory(&config, counter, summarizer)?;

    for turn in &turns {
        memory.record_turn(&turn.input, &turn.output)?;
    }
    debug!(
        policy = memory.name(),
        recorded = turns.len(),
        retained = memory.turns().len(),
        "transcript replayed"
    );

    Ok(format_memory(memory.as_ref(), turns.len(), format))
}

/// Builds the memory configuration: config file first, then flags.
fn memory_config(args: &MemoryArgs) -> Result<MemoryConfig> {
    let mut config: MemoryConfig = match &args.config {
        Some(path) => read_json(path)?,
        None => MemoryConfig::default(),
    };

    if let Some(policy) = &args.policy {
        config.policy.clone_from(policy);
    }
    if let Some(k) = args.k {
        config.k = k;
    }
    if let Some(limit) = args.max_token_limit {
        config.max_token_limit = limit;
    }
    if let Some(prefix) = &args.human_prefix {
        config.format.human_prefix.clone_from(prefix);
    }
    if let Some(prefix) = &args.ai_prefix {
        config.format.ai_prefix.clone_from(prefix);
    }

    Ok(config)
}

fn cmd_strategies(format: OutputFormat) -> String {
    format_strategies(
        &crate::chunking::available_strategies(),
        &available_policies(),
        &available_token_counters(),
        format,
    )
}

/// Expands `\n`, `\t`, `\r` and `\\` so separators can be typed in a shell.
fn unescape(s: &str) -> String {
    let mut output = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            output.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => output.push('\n'),
            Some('t') => output.push('\t'),
            Some('r') => output.push('\r'),
            Some('\\') => output.push('\\'),
            Some(other) => {
                output.push('\\');
                output.push(other);
            }
            None => output.push('\\'),
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::KeepSeparator;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_case::test_case;

    fn setup(name: &str, content: &str) -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        (temp_dir, path)
    }

    #[test_case("a\\nb", "a\nb" ; "newline")]
    #[test_case("\\n\\n", "\n\n" ; "paragraph")]
    #[test_case("tab\\t", "tab\t" ; "tab")]
    #[test_case("back\\\\slash", "back\\slash" ; "escaped backslash")]
    #[test_case("\\d+", "\\d+" ; "regex class kept")]
    #[test_case("end\\", "end\\" ; "trailing backslash")]
    fn test_unescape(input: &str, expected: &str) {
        assert_eq!(unescape(input), expected);
    }

    #[test]
    fn test_cmd_split() {
        let (_dir, path) = setup("doc.txt", "one two three four");
        let args = SplitArgs {
            file: path,
            strategy: "recursive".to_string(),
            chunk_size: Some(11),
            chunk_overlap: Some(0),
            ..SplitArgs::default()
        };

        let output = cmd_split(&args, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["strategy"], "recursive");
        assert_eq!(value["chunks"][0]["content"], "one two");
        assert_eq!(value["chunks"][1]["content"], "three four");
        assert!(
            value["chunks"][0]["metadata"]["source"]
                .as_str()
                .unwrap()
                .ends_with("doc.txt")
        );
    }

    #[test]
    fn test_cmd_split_documents_to_files() {
        let (dir, path) = setup(
            "docs.json",
            r#"[{"content": "alpha beta", "metadata": {"page": 1}}, {"content": "gamma"}]"#,
        );
        let out_dir = dir.path().join("chunks");
        let args = SplitArgs {
            file: path,
            strategy: "character".to_string(),
            chunk_size: Some(5),
            chunk_overlap: Some(0),
            separator: Some(" ".to_string()),
            documents: true,
            out_dir: Some(out_dir.clone()),
            prefix: "part".to_string(),
            ..SplitArgs::default()
        };

        let output = cmd_split(&args, OutputFormat::Text).unwrap();
        assert!(output.starts_with("Wrote 3 chunks:"));
        let first = std::fs::read_to_string(out_dir.join("part_0000.txt")).unwrap();
        assert_eq!(first, "alpha");
        let last = std::fs::read_to_string(out_dir.join("part_0002.txt")).unwrap();
        assert_eq!(last, "gamma");
    }

    #[test]
    fn test_splitter_config_flags_override_file() {
        let (_dir, config_path) = setup(
            "splitter.json",
            r#"{"chunk_size": 100, "chunk_overlap": 10, "separator": "|"}"#,
        );
        let args = SplitArgs {
            config: Some(config_path),
            chunk_overlap: Some(5),
            keep_separator: Some(KeepSeparator::End),
            separators: vec!["\\n".to_string(), String::new()],
            ..SplitArgs::default()
        };

        let config = splitter_config(&args).unwrap();
        assert_eq!(config.chunk_size, 100);
        assert_eq!(config.chunk_overlap, 5);
        assert_eq!(config.separator, "|");
        assert_eq!(config.separators, vec!["\n".to_string(), String::new()]);
        assert_eq!(config.keep_separator, Some(KeepSeparator::End));
    }

    #[test]
    fn test_cmd_split_unknown_strategy() {
        let (_dir, path) = setup("doc.txt", "text");
        let args = SplitArgs {
            file: path,
            strategy: "semantic".to_string(),
            ..SplitArgs::default()
        };
        assert!(cmd_split(&args, OutputFormat::Text).unwrap_err().is_config());
    }

    #[test]
    fn test_cmd_split_rejects_markdown_flags() {
        let (_dir, path) = setup("doc.txt", "text");
        let args = SplitArgs {
            file: path,
            strategy: "recursive".to_string(),
            keep_headers: true,
            ..SplitArgs::default()
        };
        let err = cmd_split(&args, OutputFormat::Text).unwrap_err();
        assert!(err.to_string().contains("require --strategy markdown"));
    }

    #[test]
    fn test_cmd_memory_window() {
        let (_dir, path) = setup(
            "chat.json",
            r#"[{"input": "Hi", "output": "What's up"}, {"input": "Not much", "output": "Cool"}]"#,
        );
        let args = MemoryArgs {
            transcript: path,
            policy: Some("window".to_string()),
            k: Some(1),
            tokenizer: "heuristic".to_string(),
            ..MemoryArgs::default()
        };

        let output = cmd_memory(&args, OutputFormat::Text).unwrap();
        assert!(output.contains("Turns recorded: 2"));
        assert!(output.ends_with("history:\nHuman: Not much\nAI: Cool\n"));
    }

    #[test]
    fn test_cmd_memory_summary_prefixes() {
        let (_dir, path) = setup(
            "chat.json",
            r#"[{"input": "first", "output": "one"}, {"input": "second", "output": "two"}]"#,
        );
        let args = MemoryArgs {
            transcript: path,
            policy: Some("summary".to_string()),
            max_token_limit: Some(1),
            tokenizer: "word".to_string(),
            human_prefix: Some("User".to_string()),
            ..MemoryArgs::default()
        };

        let output = cmd_memory(&args, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["summary"], "User: first\nAI: one");
        assert_eq!(value["retained"], 1);
    }

    #[test]
    fn test_cmd_memory_zero_window() {
        let (_dir, path) = setup("chat.json", "[]");
        let args = MemoryArgs {
            transcript: path,
            policy: Some("window".to_string()),
            k: Some(0),
            tokenizer: "heuristic".to_string(),
            ..MemoryArgs::default()
        };
        assert!(cmd_memory(&args, OutputFormat::Text).unwrap_err().is_config());
    }

    #[test]
    fn test_cmd_strategies() {
        let output = cmd_strategies(OutputFormat::Text);
        assert!(output.contains("recursive"));
        assert!(output.contains("summary"));
        assert!(output.contains("heuristic"));
    }
}
