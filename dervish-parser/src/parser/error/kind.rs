//! Errors produced while turning text into a tree.
//!
//! [`UnrecognizedToken`], [`UnclosedParenthesis`] and [`InvalidLogBase`] come from the
//! tokenizing stage. The rest come from the [`TreeBuilder`](crate::parser::builder::TreeBuilder)
//! and indicate a stream of items whose arity or nesting cannot be satisfied.

use ariadne::Fmt;
use dervish_attrs::ErrorKind;
use dervish_error::EXPR;

/// A piece of the input was not a number, operator, function, constant or declared variable.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unrecognized token `{}`", token),
    labels = ["this is not a number, operator, function, constant or known variable"],
    help = format!("variables must be declared with {} before they are used", "use".fg(EXPR)),
)]
pub struct UnrecognizedToken {
    /// The offending text.
    pub token: String,
}

/// There was an unclosed parenthesis.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unclosed parenthesis",
    labels = ["this parenthesis is not closed"],
    help = if *opening {
        "add a closing parenthesis `)` somewhere after this"
    } else {
        "add an opening parenthesis `(` somewhere before this"
    },
)]
pub struct UnclosedParenthesis {
    /// Whether the parenthesis was an opening parenthesis `(`. Otherwise, the parenthesis was a
    /// closing parenthesis `)`.
    pub opening: bool,
}

/// The base of a `log<b>` was not an integer of at least 2.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("invalid logarithm base `{}`", base),
    labels = ["this base"],
    help = format!("the base must be an {}", "integer of at least 2".fg(EXPR)),
)]
pub struct InvalidLogBase {
    /// The base as written.
    pub base: String,
}

/// A `log<` was not followed by a base and a closing `>`.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "incomplete logarithm base",
    labels = ["this logarithm"],
    help = format!("write the base like this: {}", "log<2>(x)".fg(EXPR)),
)]
pub struct IncompleteLogBase;

/// There was nothing to parse.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "empty expression",
    labels = [""],
    help = "enter a number, variable or function",
)]
pub struct EmptyExpression;

/// Two operands (or an operand and a complete operation) appeared next to each other.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "missing operator",
    labels = ["this".to_string(), format!("and this need an {} between them", "operator".fg(EXPR))],
    help = "multiplication must be written explicitly, like `2*x`",
)]
pub struct MissingOperator;

/// An operator did not receive all of its operands.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "missing operand",
    labels = [format!("this operator needs {} operand{}", arity, if *arity == 1 { "" } else { "s" })],
)]
pub struct MissingOperand {
    /// The number of operands the operator takes.
    pub arity: usize,
}

/// The expression is nested too deeply to be processed.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expression is nested too deeply",
    labels = ["starting here"],
    help = format!("expressions can be at most {} levels deep", max),
)]
pub struct NestingTooDeep {
    /// The maximum allowed height of the tree.
    pub max: usize,
}
