//! Parser implementation
//!
//! Single forward pass over the token list with an explicit cursor. Control
//! words are recognised by literal text; token kinds only decide which leaf
//! a value becomes.

use tracing::{debug, warn};

use super::ast::{Ast, Node, NodeKind};
use crate::error::{RpalError, RpalResult, SourceLocation};
use crate::lexer::{is_reserved, Token, TokenKind};

/// Words that steer the grammar. `Print` and `eq` are reserved but act as
/// ordinary names inside expressions.
const CONTROL_WORDS: &[&str] = &["let", "where", "rec", "in", "->"];

/// Deepest call nesting accepted, counting both arguments and chained calls
pub const MAX_CALL_DEPTH: usize = 256;

fn is_control(text: &str) -> bool {
    CONTROL_WORDS.contains(&text)
}

/// Parser for a token sequence
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    skipped: Vec<Token>,
    /// Calls currently open around the cursor
    depth: usize,
}

impl Parser {
    /// Create a new parser from tokens
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            current: 0,
            skipped: Vec::new(),
            depth: 0,
        }
    }

    /// Parse tokens into an AST rooted at a `let` node
    pub fn parse(&mut self) -> RpalResult<Ast> {
        debug!("parsing 'let' marker");
        self.consume_text("let", "Expected 'let' at start of program")?;

        debug!("parsing function form");
        let mut children = vec![self.function_form()?];
        self.match_text("=");

        let mut has_body = false;
        if !self.is_at_end() && !self.check_control() {
            debug!("parsing body");
            if let Some(body) = self.body()? {
                children.push(body);
                has_body = true;
            }
        }

        let mut marker_seen = false;
        if self.check_text("where") || self.check_text("rec") || !has_body {
            debug!("parsing where block");
            let (where_node, closed_by_arrow) = self.where_block()?;
            children.push(where_node);
            marker_seen = closed_by_arrow;
        }

        if !marker_seen && !(self.match_text("in") || self.match_text("->")) {
            return Err(self.error_here("Expected 'in' or '->' before the expression list"));
        }

        debug!("parsing expression list");
        children.extend(self.expression_list()?);

        Ok(Ast {
            root: Node::branch(NodeKind::Let, children),
            skipped: std::mem::take(&mut self.skipped),
        })
    }

    // ===== Definitions =====

    /// Bound name followed by parameter names, ending at '=' or a control word
    fn function_form(&mut self) -> RpalResult<Node> {
        let mut names = vec![Node::identifier(self.consume_name("Expected binding name after 'let'")?)];

        while let Some(token) = self.peek() {
            if token.text == "=" || is_control(&token.text) {
                break;
            }
            names.push(Node::identifier(self.consume_name("Expected parameter name")?));
        }

        Ok(Node::branch(NodeKind::FunctionForm, names))
    }

    /// Expressions up to the next control word; several are grouped in a tau
    fn body(&mut self) -> RpalResult<Option<Node>> {
        let mut exprs = Vec::new();
        while !self.is_at_end() && !self.check_control() {
            if let Some(expr) = self.list_item()? {
                exprs.push(expr);
            }
        }

        match exprs.len() {
            0 => Ok(None),
            1 => Ok(exprs.pop()),
            _ => Ok(Some(Node::branch(NodeKind::Tau, exprs))),
        }
    }

    /// Optional 'where', then an optional rec block.
    ///
    /// Returns whether the block consumed the closing '->'.
    fn where_block(&mut self) -> RpalResult<(Node, bool)> {
        self.match_text("where");

        if self.match_text("rec") {
            let rec = self.rec_block()?;
            return Ok((Node::branch(NodeKind::Where, vec![rec]), true));
        }

        Ok((Node::branch(NodeKind::Where, Vec::new()), false))
    }

    /// Items after 'rec' up to '->'. Every item becomes an identifier leaf,
    /// whatever its token kind.
    fn rec_block(&mut self) -> RpalResult<Node> {
        debug!("parsing rec block");
        let mut items = Vec::new();

        loop {
            let token = match self.peek() {
                Some(token) => token,
                None => return Err(self.error_at_end("Expected '->' to close 'rec' block")),
            };
            if token.text == "->" {
                break;
            }
            items.push(Node::identifier(token.text.clone()));
            self.current += 1;
        }

        if items.is_empty() {
            return Err(self.error_here("Expected at least one name after 'rec'"));
        }
        self.current += 1; // '->'

        Ok(Node::branch(
            NodeKind::Rec,
            vec![Node::branch(NodeKind::FunctionForm, items)],
        ))
    }

    // ===== Expressions =====

    fn expression_list(&mut self) -> RpalResult<Vec<Node>> {
        let mut exprs = Vec::new();
        while !self.is_at_end() {
            if let Some(expr) = self.list_item()? {
                exprs.push(expr);
            }
        }
        Ok(exprs)
    }

    /// An expression, or `None` when an unrecognized fragment was skipped.
    ///
    /// The fragment and the token after it are both dropped, unless that
    /// token is a control word.
    fn list_item(&mut self) -> RpalResult<Option<Node>> {
        if self.check_kind(TokenKind::Unrecognized) {
            self.skip_current();
            if self.peek().is_some() && !self.check_control() {
                self.skip_current();
            }
            return Ok(None);
        }
        self.expression().map(Some)
    }

    fn expression(&mut self) -> RpalResult<Node> {
        let expr = self.primary()?;

        let outer = self.depth;
        let result = self.call_chain(expr);
        self.depth = outer;
        result
    }

    /// `callee(args)(args)...`; each call in the chain nests one level deeper
    fn call_chain(&mut self, mut expr: Node) -> RpalResult<Node> {
        while matches!(expr.kind, NodeKind::Identifier | NodeKind::Gamma) && self.check_punctuation('(') {
            self.depth += 1;
            if self.depth > MAX_CALL_DEPTH {
                return Err(self.error_here(&format!(
                    "Call nesting too deep (limit {})",
                    MAX_CALL_DEPTH
                )));
            }
            expr = self.finish_call(expr)?;
        }

        Ok(expr)
    }

    /// Arguments of a call whose '(' is the current token
    fn finish_call(&mut self, callee: Node) -> RpalResult<Node> {
        let name = callee_name(&callee).to_string();
        self.current += 1; // '('

        let mut children = vec![callee];
        if !self.check_punctuation(')') {
            loop {
                if self.check_kind(TokenKind::Unrecognized) {
                    self.skip_current();
                } else {
                    children.push(self.expression()?);
                }
                if !self.match_punctuation(',') {
                    break;
                }
            }
        }

        if !self.match_punctuation(')') {
            let message = format!("Expected ')' to close call to '{}'", name);
            return Err(self.error_here(&message));
        }

        Ok(Node::branch(NodeKind::Gamma, children))
    }

    fn primary(&mut self) -> RpalResult<Node> {
        let token = match self.peek() {
            Some(token) => token,
            None => return Err(self.error_at_end("Expected expression")),
        };

        let node = match token.kind {
            TokenKind::Integer => Node::integer(token.text.clone()),
            TokenKind::StringLiteral => Node::string(token.text.clone()),
            TokenKind::Identifier | TokenKind::Operator => Node::identifier(token.text.clone()),
            TokenKind::Punctuation | TokenKind::Unrecognized => {
                return Err(RpalError::parse_error(
                    format!("Unexpected {}", token),
                    token.location.clone(),
                ));
            }
        };
        self.current += 1;
        Ok(node)
    }

    // ===== Helper Methods =====

    fn skip_current(&mut self) {
        if let Some(token) = self.peek().cloned() {
            warn!(token = %token.text, location = %token.location, "skipping unrecognized input");
            self.skipped.push(token);
            self.current += 1;
        }
    }

    fn match_text(&mut self, text: &str) -> bool {
        if self.check_text(text) {
            self.current += 1;
            true
        } else {
            false
        }
    }

    fn match_punctuation(&mut self, c: char) -> bool {
        if self.check_punctuation(c) {
            self.current += 1;
            true
        } else {
            false
        }
    }

    fn check_text(&self, text: &str) -> bool {
        self.peek().map_or(false, |t| t.text == text)
    }

    fn check_kind(&self, kind: TokenKind) -> bool {
        self.peek().map_or(false, |t| t.kind == kind)
    }

    fn check_punctuation(&self, c: char) -> bool {
        self.peek().map_or(false, |t| t.is_punctuation(c))
    }

    fn check_control(&self) -> bool {
        self.peek().map_or(false, |t| is_control(&t.text))
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.current)
    }

    fn consume_text(&mut self, text: &str, message: &str) -> RpalResult<()> {
        if self.match_text(text) {
            Ok(())
        } else {
            Err(self.error_here(message))
        }
    }

    /// Consume a non-reserved identifier and return its text
    fn consume_name(&mut self, message: &str) -> RpalResult<String> {
        let name = match self.peek() {
            Some(token) if token.kind == TokenKind::Identifier && !is_reserved(&token.text) => {
                token.text.clone()
            }
            _ => return Err(self.error_here(message)),
        };
        self.current += 1;
        Ok(name)
    }

    /// Error at the current token, naming it
    fn error_here(&self, message: &str) -> RpalError {
        match self.peek() {
            Some(token) => RpalError::parse_error(
                format!("{}, found {}", message, token),
                token.location.clone(),
            ),
            None => self.error_at_end(message),
        }
    }

    /// Error positioned just past the last token
    fn error_at_end(&self, message: &str) -> RpalError {
        let location = match self.tokens.last() {
            Some(last) => SourceLocation::new(
                last.location.line,
                last.location.column + last.text.chars().count(),
                last.location.filename.clone(),
            ),
            None => SourceLocation::at(1, 1),
        };
        RpalError::parse_error(format!("{}, found end of input", message), location)
    }

    /// Current cursor position in the token list
    pub fn position(&self) -> usize {
        self.current
    }
}

fn callee_name(callee: &Node) -> &str {
    match callee.kind {
        NodeKind::Gamma => callee.children.first().map_or("", callee_name),
        _ => callee.text(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{read_tokens, Lexer};
    use crate::parser::printer::render;
    use pretty_assertions::assert_eq;

    fn parse_source(source: &str) -> RpalResult<Ast> {
        let tokens = Lexer::new(source, None).tokenize()?;
        Parser::new(tokens).parse()
    }

    fn render_source(source: &str) -> String {
        render(&parse_source(source).unwrap().root, true)
    }

    fn parse_message(source: &str) -> String {
        match parse_source(source) {
            Err(RpalError::ParseError { message, .. }) => message,
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_let_in_with_nested_call() {
        let ast = parse_source("let f x = x in Print(f(3))").unwrap();

        let form = ast.function_form().unwrap();
        assert_eq!(form.child_texts(), vec!["f", "x"]);
        assert_eq!(&form.child_texts()[1..], &["x"]);

        let expected = Node::branch(
            NodeKind::Let,
            vec![
                Node::branch(NodeKind::FunctionForm, vec![Node::identifier("f"), Node::identifier("x")]),
                Node::identifier("x"),
                Node::branch(
                    NodeKind::Gamma,
                    vec![
                        Node::identifier("Print"),
                        Node::branch(NodeKind::Gamma, vec![Node::identifier("f"), Node::integer("3")]),
                    ],
                ),
            ],
        );
        assert_eq!(ast.root, expected);
        assert!(ast.skipped.is_empty());
    }

    #[test]
    fn test_rec_block_under_where() {
        let ast = parse_source("let x = rec 1 2 -> x").unwrap();

        assert_eq!(
            render(&ast.root, true),
            "let\n.function_form\n<ID:x>\nwhere\nrec\n.function_form\n<ID:1>\n<ID:2>\n<ID:x>\n"
        );

        let where_node = ast.root.child(NodeKind::Where).unwrap();
        let rec = where_node.child(NodeKind::Rec).unwrap();
        let form = rec.child(NodeKind::FunctionForm).unwrap();
        assert!(form.children.iter().all(|c| c.kind == NodeKind::Identifier));
        assert_eq!(form.child_texts(), vec!["1", "2"]);
    }

    #[test]
    fn test_where_keyword_with_rec() {
        assert_eq!(
            render_source("let f n where rec f n -> f(n)"),
            "let\n.function_form\n<ID:f>\n<ID:n>\nwhere\nrec\n.function_form\n<ID:f>\n<ID:n>\ngamma\n<ID:f>\n<ID:n>\n"
        );
    }

    #[test]
    fn test_where_marker_without_body() {
        assert_eq!(
            render_source("let f x -> f(x, 'a')"),
            "let\n.function_form\n<ID:f>\n<ID:x>\nwhere\ngamma\n<ID:f>\n<ID:x>\n<STR:'a'>\n"
        );
        assert_eq!(
            render_source("let f where -> f"),
            "let\n.function_form\n<ID:f>\nwhere\n<ID:f>\n"
        );
    }

    #[test]
    fn test_body_followed_by_where() {
        assert_eq!(
            render_source("let f x = g x where rec g -> f(1)"),
            "let\n.function_form\n<ID:f>\n<ID:x>\ntau\n<ID:g>\n<ID:x>\nwhere\nrec\n.function_form\n<ID:g>\ngamma\n<ID:f>\n<INT:1>\n"
        );
    }

    #[test]
    fn test_call_with_several_nested_arguments() {
        assert_eq!(
            render_source("let x in f(g(1, y), h(), 'z')"),
            "let\n.function_form\n<ID:x>\nwhere\ngamma\n<ID:f>\ngamma\n<ID:g>\n<INT:1>\n<ID:y>\ngamma\n<ID:h>\n<STR:'z'>\n"
        );
    }

    #[test]
    fn test_curried_call_nests_callee() {
        let ast = parse_source("let x in f(1)(2)").unwrap();
        let outer = ast.root.children.last().unwrap();

        assert_eq!(outer.kind, NodeKind::Gamma);
        assert_eq!(outer.children[0].kind, NodeKind::Gamma);
        assert_eq!(outer.children[0].child_texts(), vec!["f", "1"]);
        assert_eq!(outer.children[1], Node::integer("2"));
    }

    #[test]
    fn test_reserved_words_in_expressions() {
        assert_eq!(
            render_source("let x in Print(eq(x, 1)) + y"),
            "let\n.function_form\n<ID:x>\nwhere\ngamma\n<ID:Print>\ngamma\n<ID:eq>\n<ID:x>\n<INT:1>\n<ID:+>\n<ID:y>\n"
        );
    }

    #[test]
    fn test_unrecognized_skips_two_tokens() {
        let ast = parse_source("let f n -> f N-1 n x").unwrap();

        assert_eq!(ast.root.children.len(), 4);
        assert_eq!(ast.root.children[3], Node::identifier("x"));
        let skipped: Vec<_> = ast.skipped.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(skipped, vec!["N-1", "n"]);
    }

    #[test]
    fn test_unrecognized_does_not_swallow_marker() {
        let ast = parse_source("let f n = N-1 in f").unwrap();
        assert_eq!(ast.skipped.len(), 1);
        assert_eq!(ast.root.children.last().unwrap(), &Node::identifier("f"));
    }

    #[test]
    fn test_unrecognized_argument_skipped_alone() {
        let ast = parse_source("let f n in f(N-1, n)").unwrap();
        let call = ast.root.children.last().unwrap();
        assert_eq!(call.child_texts(), vec!["f", "n"]);
        assert_eq!(ast.skipped.len(), 1);
    }

    #[test]
    fn test_unrecognized_as_last_token() {
        let ast = parse_source("let f in x N-1").unwrap();
        assert_eq!(ast.skipped.len(), 1);
    }

    #[test]
    fn test_missing_let() {
        assert!(parse_message("f x = x in f").contains("Expected 'let'"));
        assert!(parse_message("").contains("end of input"));
    }

    #[test]
    fn test_missing_binding_name() {
        assert!(parse_message("let in x").contains("Expected binding name"));
        assert!(parse_message("let = x in x").contains("Expected binding name"));
    }

    #[test]
    fn test_bad_parameter() {
        assert!(parse_message("let f 3 = x in x").contains("Expected parameter name"));
        assert!(parse_message("let f ( = x in x").contains("Expected parameter name"));
    }

    #[test]
    fn test_missing_marker() {
        let err = parse_source("let f x = x").unwrap_err();
        assert!(err.message().contains("Expected 'in' or '->'"));
        assert_eq!(err.location(), &SourceLocation::at(1, 12));
    }

    #[test]
    fn test_rec_without_arrow() {
        assert!(parse_message("let x = rec a b").contains("Expected '->' to close 'rec' block"));
        assert!(parse_message("let x = rec -> y").contains("at least one name"));
    }

    #[test]
    fn test_unclosed_call_is_reported() {
        assert!(parse_message("let f x = x in Print(f(3)").contains("Expected ')' to close call to 'Print'"));
        assert!(parse_message("let f x = x in f(").contains("end of input"));
        assert!(parse_message("let f x = x in f(a b)").contains("Expected ')' to close call to 'f'"));
    }

    #[test]
    fn test_short_sequences_do_not_panic() {
        let truncated = [
            "let",
            "let f",
            "let f x",
            "let f x =",
            "let f x = x",
            "let f x = x in f(",
            "let f x = x in f(a,",
            "let x = rec",
            "let x = rec a",
        ];
        for source in truncated {
            let result = parse_source(source);
            assert!(
                matches!(result, Err(RpalError::ParseError { .. })),
                "{:?} gave {:?}",
                source,
                result
            );
        }
        assert!(parse_source("let f x = x in").is_ok());
        assert!(parse_source("let f x = x in f").is_ok());
    }

    #[test]
    fn test_deep_call_nesting_is_reported() {
        let nested = |depth: usize| format!("let f -> {}x{}", "f(".repeat(depth), ")".repeat(depth));

        let ast = parse_source(&nested(MAX_CALL_DEPTH)).unwrap();
        assert_eq!(ast.root.size(), 4 + 2 * MAX_CALL_DEPTH + 1);

        let err = parse_source(&nested(5000)).unwrap_err();
        assert_eq!(err.kind(), "Parse Error");
        assert!(err.message().contains("Call nesting too deep"));
        // reported at the first '(' past the limit
        assert_eq!(err.location().column, 10 + 2 * MAX_CALL_DEPTH + 1);
    }

    #[test]
    fn test_long_call_chain_is_bounded() {
        let chained = format!("let f -> f{}", "()".repeat(MAX_CALL_DEPTH + 1));
        assert!(parse_message(&chained).contains("Call nesting too deep"));

        let chained = format!("let f -> f{}", "()".repeat(MAX_CALL_DEPTH));
        assert!(parse_source(&chained).is_ok());
    }

    #[test]
    fn test_stray_punctuation() {
        assert!(parse_message("let x in )").contains("Unexpected punctuation ')'"));
        assert!(parse_message("let x in a, b").contains("Unexpected punctuation ','"));
        assert!(parse_message("let x in 3(4)").contains("Unexpected punctuation '('"));
    }

    #[test]
    fn test_error_location_points_at_token() {
        let err = parse_source("let x in\n  f(1;").unwrap_err();
        assert_eq!(err.location(), &SourceLocation::at(2, 6));
    }

    #[test]
    fn test_parse_from_token_dump() {
        let dump = "IDENTIFIER let\nIDENTIFIER f\nIDENTIFIER ->\nIDENTIFIER Print\nPUNCTION (\nINTEGER 1\nPUNCTION )\n";
        let tokens = read_tokens(dump, None).unwrap();
        let ast = Parser::new(tokens).parse().unwrap();

        assert_eq!(
            render(&ast.root, true),
            "let\n.function_form\n<ID:f>\nwhere\ngamma\n<ID:Print>\n<INT:1>\n"
        );
    }

    #[test]
    fn test_parser_consumes_all_tokens() {
        let tokens = Lexer::new("let f x = x in Print(f(3))", None).tokenize().unwrap();
        let count = tokens.len();
        let mut parser = Parser::new(tokens);
        parser.parse().unwrap();
        assert_eq!(parser.position(), count);
    }
}
