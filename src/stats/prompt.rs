//! Operator Count Prompt
//! Supplies the top-N count for the regional ranking.

use std::io::{self, BufRead, Stdin, StdinLock, Stdout, Write};
use tracing::warn;

/// Default number of regions shown in the ranking.
pub const DEFAULT_TOP_N: usize = 10;

/// Source of the ranking size. The interactive prompt is one implementation;
/// tests and `--top` use a fixed value.
pub trait CountSource {
    fn request_count(&mut self, default: usize) -> usize;
}

/// Always answers with the same count.
#[derive(Debug, Clone, Copy)]
pub struct FixedCount(pub usize);

impl CountSource for FixedCount {
    fn request_count(&mut self, default: usize) -> usize {
        if self.0 == 0 {
            default
        } else {
            self.0
        }
    }
}

/// Parse an operator response.
///
/// Blank, non-numeric, zero and overflowing responses fall back to `default`.
pub fn parse_count(input: &str, default: usize) -> usize {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return default;
    }
    match trimmed.parse::<usize>() {
        Ok(0) | Err(_) => default,
        Ok(n) => n,
    }
}

/// Writes a prompt and blocks for one line of input.
pub struct PromptCount<R, W> {
    reader: R,
    writer: W,
    message: String,
}

impl PromptCount<StdinLock<'static>, Stdout> {
    /// Prompt on the process console.
    pub fn stdin() -> Self {
        let stdin: Stdin = io::stdin();
        Self::new(stdin.lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> PromptCount<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            message: "Enter how many top regions to show (press Enter for the default)".to_string(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    fn read_response(&mut self, default: usize) -> io::Result<Option<String>> {
        write!(self.writer, "\n{} [{}]: ", self.message, default)?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

impl<R: BufRead, W: Write> CountSource for PromptCount<R, W> {
    fn request_count(&mut self, default: usize) -> usize {
        match self.read_response(default) {
            Ok(Some(line)) => parse_count(&line, default),
            Ok(None) => {
                warn!(default, "No input available for the ranking prompt, using default");
                default
            }
            Err(e) => {
                warn!(error = %e, default, "Failed to read the ranking prompt, using default");
                default
            }
        }
    }
}
