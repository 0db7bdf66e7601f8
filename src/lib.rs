//! # RPAL front end
//!
//! Tokenizer and parser for a small functional language with `let`/`where`/
//! `rec` bindings and `name(args)` application.
//!
//! ## Architecture
//!
//! The pipeline runs one way: text → tokens → syntax tree → text rendering.
//! - `lexer`: classification of source text into tokens, plus the persisted
//!   token dump format
//! - `parser`: recursive-descent construction of the tree and its pre-order
//!   rendering
//! - `error`: error types and diagnostics
//!
//! Every stage reports the first error it finds as an [`RpalError`] and never
//! terminates the process.

pub mod error;
pub mod lexer;
pub mod parser;

// Re-export commonly used types
pub use error::{Diagnostic, RpalError, RpalResult, SourceLocation};
pub use lexer::{classify, Lexer, Token, TokenKind};
pub use parser::{render, Ast, Node, NodeKind, Parser};

/// Version of the front end
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tokenize source text
pub fn tokenize(source: &str, filename: Option<&str>) -> RpalResult<Vec<Token>> {
    Lexer::new(source, filename).tokenize()
}

/// Parse an already tokenized program
pub fn parse(tokens: Vec<Token>) -> RpalResult<Ast> {
    Parser::new(tokens).parse()
}

/// Tokenize and parse source text
pub fn parse_source(source: &str, filename: Option<&str>) -> RpalResult<Ast> {
    parse(tokenize(source, filename)?)
}

/// Tokenize, parse and render source text in one step
///
/// # Arguments
///
/// * `source` - The program text
/// * `filename` - Optional filename for error reporting
/// * `with_keywords` - Whether structural keywords appear in the rendering
pub fn syntax_tree(source: &str, filename: Option<&str>, with_keywords: bool) -> RpalResult<String> {
    let ast = parse_source(source, filename)?;
    Ok(render(&ast.root, with_keywords))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_syntax_tree() {
        assert_eq!(
            syntax_tree("let f x = x in Print(f(3))", None, true).unwrap(),
            "let\n.function_form\n<ID:f>\n<ID:x>\n<ID:x>\ngamma\n<ID:Print>\ngamma\n<ID:f>\n<INT:3>\n"
        );
    }

    #[test]
    fn test_lexer_error_stops_pipeline() {
        let err = syntax_tree("let s = 'abc", Some("input.rpal"), true).unwrap_err();
        assert_eq!(err.kind(), "Lexer Error");
        assert_eq!(err.location().to_string(), "input.rpal:1:9");
    }

    #[test]
    fn test_parse_error_carries_filename() {
        let err = parse_source("let f x = x in f(", Some("input.rpal")).unwrap_err();
        assert_eq!(err.kind(), "Parse Error");
        assert_eq!(err.location().filename.as_deref(), Some("input.rpal"));
    }
}
