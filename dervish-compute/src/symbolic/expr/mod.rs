//! The expression tree that evaluation and differentiation operate on.

mod fmt;
mod iter;

use crate::{
    consts,
    error::{kind, Error},
    primitive::{float, float_from_str, round},
};
use dervish_parser::parser::{
    ast::{Constant, Literal, Node, NodeKind},
    token::op::{BinOpKind, Precedence, UnaryOpKind},
};
use rug::Float;
use std::collections::BTreeSet;

pub use iter::ExprIter;

/// A mathematical expression.
///
/// Each node owns its children. Trees are never modified in place; evaluation and
/// differentiation build new trees.
#[derive(Debug, Clone)]
pub enum Expr {
    /// A number.
    Number(Float),

    /// A named constant, which behaves as its value in arithmetic but keeps its name when
    /// displayed.
    Constant(Constant),

    /// A variable, which may be substituted during evaluation.
    Variable(String),

    /// An operation with a single operand.
    Unary(UnaryOpKind, Box<Expr>),

    /// An operation with a left and a right operand.
    Binary(BinOpKind, Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Creates a number from anything a [`Float`] can be assigned from.
    pub fn num<T>(n: T) -> Self
    where
        Float: rug::Assign<T>,
    {
        Self::Number(float(n))
    }

    /// Creates a unary operation.
    pub fn unary(op: UnaryOpKind, operand: Expr) -> Self {
        Self::Unary(op, Box::new(operand))
    }

    /// Creates a binary operation.
    pub fn binary(op: BinOpKind, lhs: Expr, rhs: Expr) -> Self {
        Self::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    /// Returns the numeric value of the expression if it is a number or a constant.
    pub fn value(&self) -> Option<&Float> {
        match self {
            Self::Number(n) => Some(n),
            Self::Constant(c) => Some(consts::value(*c)),
            _ => None,
        }
    }

    /// Returns true if the expression is the number zero.
    pub fn is_zero(&self) -> bool {
        matches!(self, Self::Number(n) if n.is_zero())
    }

    /// Returns true if the expression is the number one.
    pub fn is_one(&self) -> bool {
        matches!(self, Self::Number(n) if *n == 1)
    }

    /// Returns the precedence of the expression, used to decide where parentheses are needed
    /// when displaying it. Negative numbers display with a leading minus sign, so they have the
    /// precedence of negation.
    pub fn precedence(&self) -> Precedence {
        match self {
            Self::Number(n) if n.is_sign_negative() && !n.is_zero() => Precedence::Factor,
            Self::Number(_) | Self::Constant(_) | Self::Variable(_) => Precedence::Primary,
            Self::Unary(op, _) => op.precedence(),
            Self::Binary(op, _, _) => op.precedence(),
        }
    }

    /// Returns an iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn post_order_iter(&self) -> ExprIter {
        ExprIter::new(self)
    }

    /// Returns the names of the free variables in the expression.
    pub fn variables(&self) -> BTreeSet<&str> {
        self.post_order_iter()
            .filter_map(|expr| match expr {
                Self::Variable(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Checks if two expressions are structurally equal.
///
/// Numbers and constants compare by value. The operands of commutative operations may appear
/// in either order, so `x+y == y+x`, but `x-y != y-x`.
impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Variable(a), Self::Variable(b)) => a == b,
            (Self::Unary(op_a, a), Self::Unary(op_b, b)) => op_a == op_b && a == b,
            (Self::Binary(op_a, lhs_a, rhs_a), Self::Binary(op_b, lhs_b, rhs_b)) => {
                op_a == op_b && (
                    (lhs_a == lhs_b && rhs_a == rhs_b)
                    || (op_a.is_commutative() && lhs_a == rhs_b && rhs_a == lhs_b)
                )
            },
            _ => match (self.value(), other.value()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl TryFrom<Node> for Expr {
    type Error = Error;

    fn try_from(node: Node) -> Result<Self, Self::Error> {
        Ok(match node.kind {
            NodeKind::Literal(Literal::Number(literal)) => match float_from_str(&literal) {
                Some(n) => Self::Number(round(n)),
                None => return Err(Error::new(vec![node.span], kind::InvalidNumber { literal })),
            },
            NodeKind::Literal(Literal::Constant(c)) => Self::Constant(c),
            NodeKind::Literal(Literal::Variable(name)) => Self::Variable(name),
            NodeKind::Unary(op, operand) => Self::unary(op, Self::try_from(*operand)?),
            NodeKind::Binary(op, lhs, rhs) => {
                Self::binary(op, Self::try_from(*lhs)?, Self::try_from(*rhs)?)
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::parse;
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse_with(source: &str, names: &[&str]) -> Expr {
        let variables = names.iter().map(|name| name.to_string()).collect();
        parse(source, &variables).unwrap()
    }

    #[test]
    fn commutative_equality() {
        assert_eq!(parse_with("x+y", &["x", "y"]), parse_with("y+x", &["x", "y"]));
        assert_eq!(parse_with("x*y", &["x", "y"]), parse_with("y*x", &["x", "y"]));
        assert_ne!(parse_with("x-y", &["x", "y"]), parse_with("y-x", &["x", "y"]));
        assert_ne!(parse_with("x/y", &["x", "y"]), parse_with("y/x", &["x", "y"]));
        assert_ne!(parse_with("x^y", &["x", "y"]), parse_with("y^x", &["x", "y"]));
    }

    #[test]
    fn nested_commutative_equality() {
        assert_eq!(
            parse_with("sin(x*2)+3", &["x"]),
            parse_with("3+sin(2*x)", &["x"]),
        );
        assert_ne!(parse_with("sin(x)", &["x"]), parse_with("cos(x)", &["x"]));
        assert_ne!(parse_with("log(x)", &["x"]), parse_with("log<2>(x)", &["x"]));
    }

    #[test]
    fn constants_compare_by_value() {
        assert_eq!(Expr::Constant(Constant::Pi), Expr::Number(consts::PI.clone()));
        assert_ne!(Expr::Constant(Constant::Pi), Expr::Constant(Constant::E));
        assert_ne!(Expr::Variable("x".to_string()), Expr::num(1));
    }

    #[test]
    fn free_variables() {
        let expr = parse_with("x*sin(y)+pi-x", &["x", "y", "z"]);
        assert_eq!(expr.variables(), BTreeSet::from(["x", "y"]));
        assert!(Expr::Constant(Constant::E).variables().is_empty());
    }
}
