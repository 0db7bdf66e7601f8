//! Abstract Syntax Tree definitions
//!
//! The tree is a single owned structure: every [`Node`] owns its children
//! outright and no node is reachable from more than one parent.

use crate::lexer::Token;

/// Result of a successful parse
#[derive(Debug, Clone, PartialEq)]
pub struct Ast {
    /// The top-level `let` node
    pub root: Node,
    /// Unrecognized tokens (and the tokens skipped with them), in input order
    pub skipped: Vec<Token>,
}

impl Ast {
    /// The bound function form: name followed by parameters
    pub fn function_form(&self) -> Option<&Node> {
        self.root.child(NodeKind::FunctionForm)
    }
}

/// Syntactic role of a node
///
/// The parser builds `Let`, `FunctionForm`, `Where`, `Rec`, `Tau`, `Gamma`
/// and the three literal leaves. The remaining kinds belong to the fuller
/// operator grammar and can be built and rendered by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Let,
    Lambda,
    Where,
    Tau,
    Aug,
    Conditional,
    Or,
    And,
    Not,
    Gr,
    Ge,
    Ls,
    Le,
    Eq,
    Ne,
    Plus,
    Minus,
    Neg,
    Multiply,
    Divide,
    Power,
    At,
    Gamma,
    FunctionForm,
    Rec,
    AndDef,
    True,
    False,
    Nil,
    Dummy,

    // Leaves carrying text
    Identifier,
    Integer,
    String,
    Variable,
}

impl NodeKind {
    /// Structural keyword printed for non-text kinds
    pub fn keyword(&self) -> Option<&'static str> {
        let keyword = match self {
            Self::Let => "let",
            Self::Lambda => "lambda",
            Self::Where => "where",
            Self::Tau => "tau",
            Self::Aug => "aug",
            Self::Conditional => "->",
            Self::Or => "or",
            Self::And => "&",
            Self::Not => "not",
            Self::Gr => "gr",
            Self::Ge => "ge",
            Self::Ls => "ls",
            Self::Le => "le",
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Neg => "neg",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Power => "**",
            Self::At => "@",
            Self::Gamma => "gamma",
            Self::FunctionForm => ".function_form",
            Self::Rec => "rec",
            Self::AndDef => "and",
            Self::True => "true",
            Self::False => "false",
            Self::Nil => "nil",
            Self::Dummy => "dummy",
            Self::Identifier | Self::Integer | Self::String | Self::Variable => return None,
        };
        Some(keyword)
    }

    /// Tag used in `<TAG:text>` for kinds that carry text
    pub fn leaf_tag(&self) -> Option<&'static str> {
        match self {
            Self::Identifier => Some("ID"),
            Self::Integer => Some("INT"),
            Self::String => Some("STR"),
            Self::Variable => Some("VAR"),
            _ => None,
        }
    }

    /// Whether nodes of this kind carry a text payload
    pub fn has_text(&self) -> bool {
        self.leaf_tag().is_some()
    }
}

/// A node in the syntax tree
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    /// Literal text, present exactly for kinds where [`NodeKind::has_text`]
    pub value: Option<String>,
    pub children: Vec<Node>,
}

impl Node {
    /// Create a node with children
    pub fn branch(kind: NodeKind, children: Vec<Node>) -> Self {
        Self {
            kind,
            value: None,
            children,
        }
    }

    /// Create a text-carrying leaf
    pub fn leaf(kind: NodeKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: Some(value.into()),
            children: Vec::new(),
        }
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        Self::leaf(NodeKind::Identifier, name)
    }

    pub fn integer(digits: impl Into<String>) -> Self {
        Self::leaf(NodeKind::Integer, digits)
    }

    /// String leaf; the text keeps its surrounding quotes
    pub fn string(text: impl Into<String>) -> Self {
        Self::leaf(NodeKind::String, text)
    }

    /// First direct child of the given kind
    pub fn child(&self, kind: NodeKind) -> Option<&Node> {
        self.children.iter().find(|c| c.kind == kind)
    }

    /// Text payload, or "" for structural nodes
    pub fn text(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }

    /// Texts of the direct children, in order
    pub fn child_texts(&self) -> Vec<&str> {
        self.children.iter().map(|c| c.text()).collect()
    }

    /// Total number of nodes in this subtree
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(Node::size).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_leaf_kinds_have_no_keyword() {
        for kind in [NodeKind::Identifier, NodeKind::Integer, NodeKind::String, NodeKind::Variable] {
            assert_eq!(kind.keyword(), None);
            assert!(kind.has_text());
        }
        assert_eq!(NodeKind::FunctionForm.keyword(), Some(".function_form"));
        assert_eq!(NodeKind::Conditional.keyword(), Some("->"));
        assert_eq!(NodeKind::Gamma.leaf_tag(), None);
    }

    #[test]
    fn test_child_lookup() {
        let node = Node::branch(
            NodeKind::Let,
            vec![
                Node::branch(NodeKind::FunctionForm, vec![Node::identifier("f"), Node::identifier("x")]),
                Node::identifier("x"),
            ],
        );

        let form = node.child(NodeKind::FunctionForm).unwrap();
        assert_eq!(form.child_texts(), vec!["f", "x"]);
        assert!(node.child(NodeKind::Where).is_none());
        assert_eq!(node.size(), 5);
    }
}
