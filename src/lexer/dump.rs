//! Persisted token dumps
//!
//! One token per line as `<KIND> <text>`, where KIND is the tag returned by
//! [`TokenKind::dump_tag`]. The text is everything after the first space, so
//! string literals containing spaces survive a round trip. Line breaks and
//! backslashes inside the text are written as `\n`, `\r` and `\\`.

use super::token::{Token, TokenKind};
use crate::error::{RpalError, RpalResult, SourceLocation};

/// Render tokens in the dump format
pub fn write_tokens(tokens: &[Token]) -> String {
    let mut output = String::new();
    for token in tokens {
        output.push_str(token.kind.dump_tag());
        output.push(' ');
        escape_into(&token.text, &mut output);
        output.push('\n');
    }
    output
}

/// Read tokens back from the dump format
///
/// Blank lines are ignored. Each token's location is its dump line.
pub fn read_tokens(dump: &str, filename: Option<&str>) -> RpalResult<Vec<Token>> {
    let mut tokens = Vec::new();

    for (idx, line) in dump.lines().enumerate() {
        let location = SourceLocation::new(idx + 1, 1, filename.map(|s| s.to_string()));
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        let (tag, text) = line.split_once(' ').ok_or_else(|| {
            RpalError::dump_error(format!("Expected '<KIND> <text>', found '{}'", line), location.clone())
        })?;

        let kind = TokenKind::from_dump_tag(tag).ok_or_else(|| {
            RpalError::dump_error(format!("Unknown token kind '{}'", tag), location.clone())
        })?;

        if text.is_empty() {
            return Err(RpalError::dump_error("Missing token text", location));
        }

        tokens.push(Token::new(kind, unescape(text), location));
    }

    Ok(tokens)
}

fn escape_into(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '\\' => output.push_str("\\\\"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            _ => output.push(c),
        }
    }
}

/// Inverse of `escape_into`. An unknown escape is kept as written.
fn unescape(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('\\') => result.push('\\'),
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_write_tokens() {
        let tokens = Lexer::new("let f(3) 'a b'", None).tokenize().unwrap();
        assert_eq!(
            write_tokens(&tokens),
            "IDENTIFIER let\nIDENTIFIER f\nPUNCTION (\nINTEGER 3\nPUNCTION )\nSTRING 'a b'\n"
        );
    }

    #[test]
    fn test_read_keeps_text_after_first_space() {
        let tokens = read_tokens("STRING 'a b'\n\nDELETE N-1\n", None).unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[0].text, "'a b'");
        assert_eq!(tokens[1].kind, TokenKind::Unrecognized);
        assert_eq!(tokens[1].location, SourceLocation::at(3, 1));
    }

    #[test]
    fn test_read_written_dump() {
        let tokens = Lexer::new("let x = rec 1 2 -> x", None).tokenize().unwrap();
        let read = read_tokens(&write_tokens(&tokens), None).unwrap();

        let texts: Vec<_> = read.iter().map(|t| (t.kind, t.text.as_str())).collect();
        let expected: Vec<_> = tokens.iter().map(|t| (t.kind, t.text.as_str())).collect();
        assert_eq!(texts, expected);
    }

    #[test]
    fn test_multiline_string_survives_dump() {
        let tokens = Lexer::new("let f -> Print('a\nb\r\\c')", None).tokenize().unwrap();
        let dump = write_tokens(&tokens);

        assert_eq!(dump.lines().count(), tokens.len());
        assert!(dump.contains("STRING 'a\\nb\\r\\\\c'\n"));

        let read = read_tokens(&dump, None).unwrap();
        assert_eq!(read[5].kind, TokenKind::StringLiteral);
        assert_eq!(read[5].text, "'a\nb\r\\c'");
    }

    #[test]
    fn test_unknown_escape_kept() {
        let tokens = read_tokens("STRING 'a\\tb'\nDELETE x\\", None).unwrap();
        assert_eq!(tokens[0].text, "'a\\tb'");
        assert_eq!(tokens[1].text, "x\\");
    }

    #[test]
    fn test_unknown_tag() {
        let err = read_tokens("IDENTIFIER x\nKEYWORD let\n", Some("tokens.txt")).unwrap_err();
        assert_eq!(err.kind(), "Token Dump Error");
        assert_eq!(err.location().to_string(), "tokens.txt:2:1");
    }

    #[test]
    fn test_missing_text() {
        assert!(read_tokens("IDENTIFIER\n", None).is_err());
        assert!(read_tokens("IDENTIFIER \n", None).is_err());
    }
}
