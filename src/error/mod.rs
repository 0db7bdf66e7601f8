//! Error handling and diagnostics
//!
//! This module provides the error types shared by the lexer, the token dump
//! reader and the parser, plus diagnostic formatting for the CLI.

use std::fmt;

pub mod diagnostic;

pub use diagnostic::Diagnostic;

/// Result type alias for front-end operations
pub type RpalResult<T> = Result<T, RpalError>;

/// Source location information for error reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
    /// Optional filename
    pub filename: Option<String>,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize, column: usize, filename: Option<String>) -> Self {
        Self {
            line,
            column,
            filename,
        }
    }

    /// Create a source location without a filename
    pub fn at(line: usize, column: usize) -> Self {
        Self::new(line, column, None)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref filename) = self.filename {
            write!(f, "{}:{}:{}", filename, self.line, self.column)
        } else {
            write!(f, "{}:{}", self.line, self.column)
        }
    }
}

/// Main error type for the front end
///
/// Each stage reports the first error it hits and stops.
#[derive(Debug, Clone, PartialEq)]
pub enum RpalError {
    /// Lexical analysis error
    LexerError {
        message: String,
        location: SourceLocation,
    },
    /// Parsing error
    ParseError {
        message: String,
        location: SourceLocation,
    },
    /// Malformed persisted token dump
    DumpError {
        message: String,
        location: SourceLocation,
    },
}

impl RpalError {
    /// Create a new lexer error
    pub fn lexer_error(message: impl Into<String>, location: SourceLocation) -> Self {
        Self::LexerError {
            message: message.into(),
            location,
        }
    }

    /// Create a new parse error
    pub fn parse_error(message: impl Into<String>, location: SourceLocation) -> Self {
        Self::ParseError {
            message: message.into(),
            location,
        }
    }

    /// Create a new token dump error
    pub fn dump_error(message: impl Into<String>, location: SourceLocation) -> Self {
        Self::DumpError {
            message: message.into(),
            location,
        }
    }

    /// Get the error kind as a string
    pub fn kind(&self) -> &str {
        match self {
            Self::LexerError { .. } => "Lexer Error",
            Self::ParseError { .. } => "Parse Error",
            Self::DumpError { .. } => "Token Dump Error",
        }
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        match self {
            Self::LexerError { message, .. }
            | Self::ParseError { message, .. }
            | Self::DumpError { message, .. } => message,
        }
    }

    /// Get the source location
    pub fn location(&self) -> &SourceLocation {
        match self {
            Self::LexerError { location, .. }
            | Self::ParseError { location, .. }
            | Self::DumpError { location, .. } => location,
        }
    }
}

impl fmt::Display for RpalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} at {}", self.kind(), self.message(), self.location())
    }
}

impl std::error::Error for RpalError {}
