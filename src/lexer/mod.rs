//! Lexical analysis module
//!
//! This module handles tokenization of source text and the persisted token
//! dump format exchanged between the lexer and parser phases.

pub mod dump;
pub mod scanner;
pub mod token;


pub use dump::{read_tokens, write_tokens};
pub use scanner::Lexer;
pub use token::{classify, is_reserved, Token, TokenKind, PUNCTUATION, RESERVED_WORDS};
