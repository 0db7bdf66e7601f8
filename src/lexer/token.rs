//! Token definitions
//!
//! A token is its surface text plus a kind derived from that text alone.
//! Reserved words are deliberately classified as [`TokenKind::Identifier`];
//! the parser recognises control words by comparing literal text.

use crate::error::SourceLocation;
use std::fmt;

/// Words with special meaning to the parser, all classified as identifiers.
pub const RESERVED_WORDS: &[&str] = &["let", "where", "rec", "in", "Print", "eq", "->"];

/// Single-character texts classified as [`TokenKind::Operator`].
pub const OPERATOR_SYMBOLS: &str = "+-*<>&.@/:=~|$!#%^_[}{\"'?";

/// Characters that always form a token of their own.
pub const PUNCTUATION: &str = "();,";

/// A token produced by the lexer or read back from a token dump
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub location: SourceLocation,
}

impl Token {
    /// Create a new token
    pub fn new(kind: TokenKind, text: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            text: text.into(),
            location,
        }
    }

    /// Whether this token is the punctuation character `c`
    pub fn is_punctuation(&self, c: char) -> bool {
        self.kind == TokenKind::Punctuation && self.text.len() == 1 && self.text.starts_with(c)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind, self.text)
    }
}

/// Token kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identifier,
    Integer,
    Operator,
    StringLiteral,
    Punctuation,
    /// Text matching no other class; the parser skips it with a warning
    Unrecognized,
}

impl TokenKind {
    /// Tag used in the persisted token dump format
    pub fn dump_tag(&self) -> &'static str {
        match self {
            Self::Identifier => "IDENTIFIER",
            Self::Integer => "INTEGER",
            Self::Operator => "OPERATOR",
            Self::StringLiteral => "STRING",
            Self::Punctuation => "PUNCTION",
            Self::Unrecognized => "DELETE",
        }
    }

    /// Inverse of [`TokenKind::dump_tag`]
    pub fn from_dump_tag(tag: &str) -> Option<Self> {
        match tag {
            "IDENTIFIER" => Some(Self::Identifier),
            "INTEGER" => Some(Self::Integer),
            "OPERATOR" => Some(Self::Operator),
            "STRING" => Some(Self::StringLiteral),
            "PUNCTION" => Some(Self::Punctuation),
            "DELETE" => Some(Self::Unrecognized),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier => write!(f, "identifier"),
            Self::Integer => write!(f, "integer"),
            Self::Operator => write!(f, "operator"),
            Self::StringLiteral => write!(f, "string"),
            Self::Punctuation => write!(f, "punctuation"),
            Self::Unrecognized => write!(f, "unrecognized"),
        }
    }
}

/// Check whether `text` is a reserved word
pub fn is_reserved(text: &str) -> bool {
    RESERVED_WORDS.contains(&text)
}

/// Classify a flushed token by its text. First matching rule wins.
pub fn classify(text: &str) -> TokenKind {
    if is_reserved(text) {
        TokenKind::Identifier
    } else if is_integer(text) {
        TokenKind::Integer
    } else if is_string(text) {
        TokenKind::StringLiteral
    } else if is_operator(text) {
        TokenKind::Operator
    } else if is_identifier(text) {
        TokenKind::Identifier
    } else {
        TokenKind::Unrecognized
    }
}

fn is_integer(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

fn is_string(text: &str) -> bool {
    text.len() >= 2 && text.starts_with('\'') && text.ends_with('\'')
}

fn is_operator(text: &str) -> bool {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => OPERATOR_SYMBOLS.contains(c),
        _ => false,
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
