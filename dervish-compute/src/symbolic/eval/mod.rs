//! Evaluation and simplification of expressions.
//!
//! Children are evaluated first. An operation whose operands all reduce to numbers is computed
//! and rounded (see [`round`](crate::primitive::round)); otherwise a fixed set of literal
//! identities such as `x*1 -> x` keeps the tree reduced.

mod binary;
mod unary;

use crate::error::{kind, Error};
use std::collections::HashMap;
use super::expr::Expr;

pub use binary::eval_binary;
pub use unary::eval_unary;

/// The maximum recursion depth of a single evaluation, counting both levels of the tree and
/// variable substitutions.
pub const MAX_RECURSION_DEPTH: usize = 1 << 11;

/// Values to substitute for variables during evaluation.
pub type Bindings = HashMap<String, Expr>;

/// Evaluates expressions with a fixed set of bindings.
#[derive(Debug, Clone, Copy)]
struct Evaluator<'a> {
    bindings: Option<&'a Bindings>,
}

impl Evaluator<'_> {
    fn eval(&self, expr: &Expr, depth: usize) -> Result<Expr, Error> {
        if depth > MAX_RECURSION_DEPTH {
            return Err(Error::new(vec![], kind::SubstitutionTooDeep { max: MAX_RECURSION_DEPTH }));
        }

        match expr {
            Expr::Number(_) | Expr::Constant(_) => Ok(expr.clone()),
            Expr::Variable(name) => match self.bindings.and_then(|bindings| bindings.get(name)) {
                Some(value) => self.eval(value, depth + 1),
                None => Ok(expr.clone()),
            },
            Expr::Unary(op, operand) => eval_unary(*op, self.eval(operand, depth + 1)?),
            Expr::Binary(op, lhs, rhs) => eval_binary(
                *op,
                self.eval(lhs, depth + 1)?,
                self.eval(rhs, depth + 1)?,
            ),
        }
    }
}

impl Expr {
    /// Evaluates the expression, substituting bound variables (recursively, so a variable bound
    /// to another bound variable resolves all the way). Unbound variables are left in place.
    ///
    /// Returns a new tree. Fails if a divisor simplifies to zero, if a numeric operation is
    /// outside its real domain, or if the recursion limit is reached.
    pub fn evaluate(&self, bindings: Option<&Bindings>) -> Result<Expr, Error> {
        Evaluator { bindings }.eval(self, 0)
    }
}
