//! Evaluation, simplification and symbolic differentiation of math expressions.
//!
//! The entry point is [`parse`], which turns text into a simplified [`Expr`]:
//!
//! ```
//! use dervish_compute::{parse, primitive::float};
//! use dervish_compute::symbolic::Expr;
//! use std::collections::HashSet;
//!
//! let variables = HashSet::from(["x".to_string()]);
//! let expr = parse("x^2", &variables).unwrap();
//!
//! let derivative = expr.differentiate("x").unwrap();
//! assert_eq!(derivative.to_string(), "x*2");
//!
//! let bindings = [("x".to_string(), Expr::Number(float(3)))].into();
//! assert_eq!(derivative.evaluate(Some(&bindings)).unwrap().to_string(), "6");
//! ```

pub mod consts;
pub mod error;
pub mod primitive;
pub mod symbolic;

use dervish_parser::parser::Parser;
use error::Error;
use log::warn;
use std::collections::HashSet;
use symbolic::Expr;

/// Parses the text into an expression and simplifies it without substituting any variables.
///
/// Only the names in `variables` are recognized as variables. Every tokenizer error is
/// reported; structural and evaluation errors are reported alone. Errors raised during
/// simplification carry the span of the whole expression.
pub fn parse(text: &str, variables: &HashSet<String>) -> Result<Expr, Vec<Error>> {
    let node = Parser::new(text, variables).parse()?;
    let span = node.full_span();

    Expr::try_from(node)
        .and_then(|expr| expr.evaluate(None))
        .map_err(|mut err| {
            warn!("simplification of `{}` aborted: {}", text, err);
            if err.spans.is_empty() {
                err.spans.push(span);
            }
            vec![err]
        })
}
