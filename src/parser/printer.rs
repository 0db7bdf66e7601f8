//! Pre-order text rendering of the syntax tree
//!
//! Each visited node produces one line: its structural keyword, or
//! `<TAG:text>` for leaves that carry text. Children follow in stored order.

use std::fmt;

use super::ast::Node;

/// Render `node` and its subtree, one node per line.
///
/// With `with_keywords` unset, structural keywords are omitted and only
/// text-carrying leaves are emitted.
pub fn render(node: &Node, with_keywords: bool) -> String {
    let mut output = String::new();
    write_node(node, with_keywords, &mut output);
    output
}

fn write_node(node: &Node, with_keywords: bool, output: &mut String) {
    if let Some(tag) = node.kind.leaf_tag() {
        output.push('<');
        output.push_str(tag);
        output.push(':');
        output.push_str(node.text());
        output.push_str(">\n");
    } else if with_keywords {
        if let Some(keyword) = node.kind.keyword() {
            output.push_str(keyword);
            output.push('\n');
        }
    }

    for child in &node.children {
        write_node(child, with_keywords, output);
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self, true))
    }
}
