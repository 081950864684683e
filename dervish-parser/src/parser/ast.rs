//! The tree produced by the [`TreeBuilder`](super::builder::TreeBuilder).

use super::token::op::{BinOpKind, UnaryOpKind};
use std::ops::Range;

/// A named mathematical constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constant {
    E,
    Pi,
}

impl Constant {
    /// Returns the name the constant is written as.
    pub fn name(&self) -> &'static str {
        match self {
            Self::E => "e",
            Self::Pi => "pi",
        }
    }
}

/// A leaf of the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// A decimal number, as written in the source.
    Number(String),

    /// A named constant.
    Constant(Constant),

    /// A declared variable.
    Variable(String),
}

/// A node in the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// The kind of node, including its children.
    pub kind: NodeKind,

    /// The region of the source code that the node's own token was parsed from.
    pub span: Range<usize>,
}

/// The kind of a [`Node`]. Each variant owns exactly as many children as its arity.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Literal(Literal),
    Unary(UnaryOpKind, Box<Node>),
    Binary(BinOpKind, Box<Node>, Box<Node>),
}

impl Node {
    /// Returns the span covering this node and all of its children.
    pub fn full_span(&self) -> Range<usize> {
        let mut span = self.span.clone();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            span.start = span.start.min(node.span.start);
            span.end = span.end.max(node.span.end);
            match &node.kind {
                NodeKind::Literal(_) => {},
                NodeKind::Unary(_, operand) => stack.push(operand),
                NodeKind::Binary(_, lhs, rhs) => {
                    stack.push(lhs);
                    stack.push(rhs);
                },
            }
        }
        span
    }
}
