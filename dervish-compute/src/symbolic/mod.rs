//! Symbolic manipulation of expressions.
//!
//! Expressions are represented as a tree of [`Expr`] nodes, converted from the spanned
//! [`Node`](dervish_parser::parser::ast::Node) trees produced by [`dervish_parser`]. Every
//! operation here returns a new tree and leaves its input untouched.
//!
//! - [`Expr::evaluate`] simplifies a tree, optionally substituting variables.
//! - [`Expr::differentiate`] returns the simplified derivative with respect to a variable.
//! - [`VariableVerifier`] checks a set of variable definitions for cycles before a new one is
//!   added.

pub mod derivative;
pub mod eval;
pub mod expr;
pub mod verify;

pub use derivative::derivative;
pub use eval::Bindings;
pub use expr::Expr;
pub use verify::VariableVerifier;
