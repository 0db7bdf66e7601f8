//! Parser module
//!
//! This module handles parsing tokens into an Abstract Syntax Tree (AST)
//! and rendering that tree back to text.

pub mod ast;
pub mod parser;
pub mod printer;


pub use ast::{Ast, Node, NodeKind};
pub use parser::{Parser, MAX_CALL_DEPTH};
pub use printer::render;
