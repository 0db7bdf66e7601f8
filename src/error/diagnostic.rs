//! Diagnostic formatting for lexer and parser errors
//!
//! Renders an [`RpalError`] with the offending source line and an underline
//! under the token at the reported column.

use super::{RpalError, SourceLocation};
use crate::lexer::PUNCTUATION;
use colored::Colorize;

/// Diagnostic information for displaying errors with context
pub struct Diagnostic {
    error: RpalError,
    source: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic from an error
    pub fn new(error: RpalError) -> Self {
        Self {
            error,
            source: None,
        }
    }

    /// Create a diagnostic with source text context
    pub fn with_source(error: RpalError, source: &str) -> Self {
        Self {
            error,
            source: Some(source.to_string()),
        }
    }

    /// Format the diagnostic with color and context
    pub fn format(&self) -> String {
        let mut output = String::new();

        let kind = self.error.kind().red().bold();
        output.push_str(&format!("{}: ", kind));
        output.push_str(self.error.message());
        output.push('\n');

        let location = self.error.location();
        output.push_str(&format!("  {} {}\n", "-->".blue().bold(), location));

        if let Some(ref source) = self.source {
            output.push_str(&Self::format_source_context(source, location));
        }

        output
    }

    /// The line before the error (if any), the offending line, and an
    /// underline spanning the token that starts at the reported column.
    fn format_source_context(source: &str, location: &SourceLocation) -> String {
        let lines: Vec<&str> = source.lines().collect();
        let Some(line) = location.line.checked_sub(1).and_then(|idx| lines.get(idx)) else {
            return String::new();
        };

        let width = location.line.to_string().len();
        let mut output = String::new();

        if location.line > 1 {
            let previous = lines[location.line - 2];
            output.push_str(&format!("{} {}\n", gutter(location.line - 1, width).blue(), previous));
        }
        output.push_str(&format!("{} {}\n", gutter(location.line, width).blue().bold(), line));

        let start = location.column.saturating_sub(1);
        let padding = " ".repeat(width + 3 + start);
        let underline = "^".repeat(token_width(line, start));
        output.push_str(&format!("{}{}\n", padding, underline.red().bold()));

        output
    }
}

fn gutter(line: usize, width: usize) -> String {
    format!("  {:>width$}", line, width = width)
}

/// Width in characters of the token starting at char index `start`.
///
/// Punctuation is one character, a quoted string runs to its closing quote
/// (or the end of the line), anything else runs to the next whitespace or
/// punctuation. Never less than one, so a position past the end of the line
/// still gets a marker.
fn token_width(line: &str, start: usize) -> usize {
    let rest: Vec<char> = line.chars().skip(start).collect();
    let width = match rest.first() {
        None => 0,
        Some(c) if PUNCTUATION.contains(*c) => 1,
        Some('\'') => rest[1..]
            .iter()
            .position(|&c| c == '\'')
            .map_or(rest.len(), |end| end + 2),
        Some(_) => rest
            .iter()
            .position(|&c| c.is_whitespace() || PUNCTUATION.contains(c))
            .unwrap_or(rest.len()),
    };
    width.max(1)
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format())
    }
}
