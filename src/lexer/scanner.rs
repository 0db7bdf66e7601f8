//! Lexer/Scanner implementation
//!
//! The scanner walks the source one character at a time, collecting
//! characters in an accumulator that is flushed and classified at
//! whitespace, punctuation and string boundaries.

use tracing::debug;

use super::token::{classify, Token, TokenKind, PUNCTUATION};
use crate::error::{RpalError, RpalResult, SourceLocation};

/// Lexer for source text
pub struct Lexer {
    source: Vec<char>,
    tokens: Vec<Token>,
    current: usize,
    line: usize,
    column: usize,
    filename: Option<String>,
    /// Pending token text
    buffer: String,
    /// Location of the first character in `buffer`
    buffer_start: Option<SourceLocation>,
    /// Location of the opening quote while inside a string literal
    string_start: Option<SourceLocation>,
}

impl Lexer {
    /// Create a new lexer
    pub fn new(source: &str, filename: Option<&str>) -> Self {
        Self {
            source: source.chars().collect(),
            tokens: Vec::new(),
            current: 0,
            line: 1,
            column: 1,
            filename: filename.map(|s| s.to_string()),
            buffer: String::new(),
            buffer_start: None,
            string_start: None,
        }
    }

    /// Tokenize the source text
    pub fn tokenize(&mut self) -> RpalResult<Vec<Token>> {
        while !self.is_at_end() {
            let location = self.current_location();
            let c = self.advance();
            self.scan_char(c, location)?;
        }

        if let Some(start) = self.string_start.take() {
            return Err(RpalError::lexer_error("Unterminated string literal", start));
        }
        self.flush()?;

        debug!(tokens = self.tokens.len(), "tokenized source");
        Ok(std::mem::take(&mut self.tokens))
    }

    /// Apply the scanning rules to a single character
    fn scan_char(&mut self, c: char, location: SourceLocation) -> RpalResult<()> {
        // Inside a string everything is taken verbatim up to the closing quote
        if self.string_start.is_some() {
            self.buffer.push(c);
            if c == '\'' {
                self.string_start = None;
                self.flush()?;
            }
            return Ok(());
        }

        if c.is_whitespace() {
            return self.flush();
        }

        if PUNCTUATION.contains(c) {
            self.flush()?;
            self.tokens
                .push(Token::new(TokenKind::Punctuation, c.to_string(), location));
            return Ok(());
        }

        if c == '\'' {
            self.flush()?;
            self.string_start = Some(location.clone());
        }

        if self.buffer.is_empty() {
            self.buffer_start = Some(location);
        }
        self.buffer.push(c);
        Ok(())
    }

    /// Classify and emit the accumulator, if it holds anything
    fn flush(&mut self) -> RpalResult<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let text = std::mem::take(&mut self.buffer);
        let location = self
            .buffer_start
            .take()
            .unwrap_or_else(|| self.current_location());
        self.emit(text, location)
    }

    fn emit(&mut self, text: String, location: SourceLocation) -> RpalResult<()> {
        if text.is_empty() {
            return Err(RpalError::lexer_error("Empty token reached the classifier", location));
        }
        let kind = classify(&text);
        self.tokens.push(Token::new(kind, text, location));
        Ok(())
    }

    /// Advance to the next character
    fn advance(&mut self) -> char {
        let c = self.source[self.current];
        self.current += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        c
    }

    /// Check if we've reached the end of the source
    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    /// Get the current source location
    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column, self.filename.clone())
    }
}
