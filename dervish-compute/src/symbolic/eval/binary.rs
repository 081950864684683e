use crate::{
    error::{kind, Error},
    primitive::{float, in_range, round},
    symbolic::expr::Expr,
};
use dervish_parser::parser::token::op::{BinOpKind, UnaryOpKind};
use rug::{ops::Pow, Float};
use super::unary::eval_unary;

/// Computes `lhs ^ rhs` for numbers, rejecting results that are not real numbers.
///
/// `0^0` is defined to be `1`.
fn eval_pow(lhs: &Float, rhs: &Float) -> Result<Float, Error> {
    if rhs.is_zero() {
        return Ok(float(1));
    }
    if lhs.is_zero() && rhs.is_sign_negative() {
        return Err(Error::new(vec![], kind::DivisionByZero));
    }
    if lhs.is_sign_negative() && !rhs.is_integer() {
        return Err(Error::new(vec![], kind::NonRealPower {
            base: Expr::Number(lhs.clone()).to_string(),
            exponent: Expr::Number(rhs.clone()).to_string(),
        }));
    }
    Ok(float(lhs.pow(rhs)))
}

/// Applies a binary operation to two numbers.
fn eval_numeric(op: BinOpKind, lhs: &Float, rhs: &Float) -> Result<Float, Error> {
    let result = match op {
        BinOpKind::Add => float(lhs + rhs),
        BinOpKind::Sub => float(lhs - rhs),
        BinOpKind::Mul => float(lhs * rhs),
        BinOpKind::Div => {
            if rhs.is_zero() {
                return Err(Error::new(vec![], kind::DivisionByZero));
            }
            float(lhs / rhs)
        },
        BinOpKind::Exp => eval_pow(lhs, rhs)?,
    };
    if !in_range(&result) {
        return Err(Error::new(vec![], kind::Overflow));
    }
    Ok(round(result))
}

/// Simplifies a binary operation whose operands have already been evaluated.
pub fn eval_binary(op: BinOpKind, lhs: Expr, rhs: Expr) -> Result<Expr, Error> {
    // identities that return an operand unchanged come first, so `pi*1` stays `pi`
    match op {
        BinOpKind::Add if rhs.is_zero() => return Ok(lhs),
        BinOpKind::Add if lhs.is_zero() => return Ok(rhs),
        BinOpKind::Sub if rhs.is_zero() => return Ok(lhs),
        BinOpKind::Mul if lhs.is_zero() || rhs.is_zero() => return Ok(Expr::num(0)),
        BinOpKind::Mul if rhs.is_one() => return Ok(lhs),
        BinOpKind::Mul if lhs.is_one() => return Ok(rhs),
        BinOpKind::Div if rhs.is_zero() => return Err(Error::new(vec![], kind::DivisionByZero)),
        BinOpKind::Div if rhs.is_one() => return Ok(lhs),
        BinOpKind::Exp if rhs.is_zero() => return Ok(Expr::num(1)),
        BinOpKind::Exp if rhs.is_one() => return Ok(lhs),
        _ => {},
    }

    if let (Some(a), Some(b)) = (lhs.value(), rhs.value()) {
        return eval_numeric(op, a, b).map(Expr::Number);
    }

    Ok(match op {
        BinOpKind::Sub if lhs.is_zero() => eval_unary(UnaryOpKind::Neg, rhs)?,
        BinOpKind::Div if lhs.is_zero() => Expr::num(0),
        BinOpKind::Exp if lhs.is_zero() => Expr::num(0),
        BinOpKind::Exp if lhs.is_one() => Expr::num(1),
        _ => Expr::binary(op, lhs, rhs),
    })
}
