use crate::{
    error::{kind, Error},
    primitive::{float, in_range, round, DISPLAY_DIGITS},
    symbolic::expr::Expr,
};
use dervish_parser::parser::token::op::UnaryOpKind;
use rug::{ops::Pow, Float};

/// Snaps a trigonometric result to zero if it is smaller than the rounding error that the
/// argument itself may carry. The error is relative to the argument, but never taken to be
/// more than that of an argument of magnitude one.
///
/// This is what makes `sin(pi)`, `tan(pi)` and `cos(pi/2)` exactly zero.
fn snap_to_zero(result: Float, argument: &Float) -> Float {
    let scale = float(&*argument.as_abs()).min(&float(1));
    let threshold = scale * float(10).pow(1 - DISPLAY_DIGITS as i32);
    if *result.as_abs() < threshold {
        float(0)
    } else {
        result
    }
}

/// Returns an error if the argument of a logarithm is not positive.
fn check_log_domain(argument: &Float) -> Result<(), Error> {
    if *argument <= 0 {
        Err(Error::new(vec![], kind::LogOfNonPositive {
            argument: Expr::Number(argument.clone()).to_string(),
        }))
    } else {
        Ok(())
    }
}

/// Applies a unary operation to a number.
fn eval_numeric(op: UnaryOpKind, value: &Float) -> Result<Float, Error> {
    let result = match op {
        UnaryOpKind::Neg => -value.clone(),
        UnaryOpKind::Sin => snap_to_zero(value.clone().sin(), value),
        UnaryOpKind::Cos => snap_to_zero(value.clone().cos(), value),
        UnaryOpKind::Tan => snap_to_zero(value.clone().tan(), value),
        UnaryOpKind::Ln => {
            check_log_domain(value)?;
            value.clone().ln()
        },
        UnaryOpKind::Log(base) => {
            check_log_domain(value)?;
            value.clone().ln() / float(base).ln()
        },
    };
    if !in_range(&result) {
        return Err(Error::new(vec![], kind::Overflow));
    }
    Ok(round(result))
}

/// Simplifies a unary operation whose operand has already been evaluated.
pub fn eval_unary(op: UnaryOpKind, operand: Expr) -> Result<Expr, Error> {
    if let Some(value) = operand.value() {
        return eval_numeric(op, value).map(Expr::Number);
    }

    Ok(match (op, operand) {
        (UnaryOpKind::Neg, Expr::Unary(UnaryOpKind::Neg, inner)) => *inner,
        (op, operand) => Expr::unary(op, operand),
    })
}
