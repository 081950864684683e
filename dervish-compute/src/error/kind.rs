//! Errors that abort evaluation or differentiation.
//!
//! Expressions do not remember where in the source they came from, so these errors are usually
//! created without spans. [`parse`](crate::parse) attaches the span of the whole expression to
//! errors raised during the first simplification pass.

use ariadne::Fmt;
use dervish_attrs::ErrorKind;
use dervish_error::EXPR;

/// A divisor simplified to the number zero.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "division by zero",
    labels = ["this expression divides by zero"],
    help = format!("the result is {}", "undefined".fg(EXPR)),
)]
pub struct DivisionByZero;

/// A negative number was raised to a power that is not a whole number.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` raised to `{}` is not a real number", base, exponent),
    labels = ["in this expression"],
    help = format!("only {} can be raised to fractional powers", "non-negative numbers".fg(EXPR)),
)]
pub struct NonRealPower {
    pub base: String,
    pub exponent: String,
}

/// The argument of a logarithm was zero or negative.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the logarithm of `{}` is undefined", argument),
    labels = ["in this expression"],
    help = format!("logarithms are only defined for {}", "positive numbers".fg(EXPR)),
)]
pub struct LogOfNonPositive {
    pub argument: String,
}

/// Variable substitution or tree traversal went deeper than the recursion limit, usually
/// because a variable is (indirectly) defined in terms of itself.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "maximum recursion depth reached",
    labels = ["while evaluating this expression"],
    help = format!("check that no variable is defined in terms of itself; the limit is {}", max),
)]
pub struct SubstitutionTooDeep {
    pub max: usize,
}

/// A number literal could not be read.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("invalid number `{}`", literal),
    labels = ["this number"],
)]
pub struct InvalidNumber {
    pub literal: String,
}

/// A numeric result was not finite, or too large or too small in magnitude to represent.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "result is out of range",
    labels = ["this expression"],
    help = format!("results must be finite and between {} and {} in magnitude", "10^-1233".fg(EXPR), "10^1233".fg(EXPR)),
)]
pub struct Overflow;
