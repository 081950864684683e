//! Errors in the commands themselves, as opposed to errors in their expression arguments.

use ariadne::Fmt;
use dervish_attrs::ErrorKind;
use dervish_error::EXPR;

/// A command was given fewer arguments than it needs.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "missing argument",
    labels = ["this command"],
    help = format!("usage: {}", usage.fg(EXPR)),
)]
pub struct MissingArgument {
    pub usage: &'static str,
}

/// Names passed to `use` that cannot be variables.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "invalid variable names",
    labels = names.iter().map(|name| format!("`{}` cannot be a variable", name)),
    help = "variable names must be made of letters only, and cannot be commands, functions or constants",
)]
pub struct InvalidNames {
    pub names: Vec<String>,
}

/// `set` was used on a name that was never declared.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unknown variable `{}`", name),
    labels = ["this variable"],
    help = format!("declare variables with {} first", "use <variables>".fg(EXPR)),
)]
pub struct UnknownVariable {
    pub name: String,
}

/// `sub` was asked to substitute a variable that has no value.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("variable `{}` has no value", name),
    labels = ["this variable"],
    help = format!("give it a value with {}", "set <variable> <expression>".fg(EXPR)),
)]
pub struct UnboundVariable {
    pub name: String,
}

/// The definition given to `set` refers back to the variable being defined.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the definition of `{}` contains a cycle", name),
    labels = ["this variable", "refers back to it"],
)]
pub struct CyclicDefinition {
    pub name: String,
}

/// `clear $` was requested.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "cannot clear the last result",
    labels = ["this variable"],
    help = format!("use {} to clear every other variable", "clear all".fg(EXPR)),
)]
pub struct ClearLast;

/// A command chained after `set` produced no expression.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "this command does not produce a value",
    labels = ["this command"],
    help = "only `eval`, `sub` and `diff` can be chained after `set <variable>`",
)]
pub struct NoValue;
