//! Canonical string form of an expression.
//!
//! Parentheses are inserted around an operand exactly when its precedence is less than or equal
//! to the precedence of the operation it belongs to. Function arguments are always
//! parenthesized. The output parses back into an equal expression.

use crate::primitive::DISPLAY_DIGITS;
use dervish_parser::parser::token::op::{Precedence, UnaryOpKind};
use rug::{float::Round, Float};
use std::{cmp::Ordering, fmt::{self, Display, Formatter}};
use super::Expr;

/// Trims trailing zeros from the fractional part of a number in decimal notation.
fn trim_trailing(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Formats a float in plain decimal notation with at most [`DISPLAY_DIGITS`] significant
/// digits.
fn fmt_decimal(f: &mut Formatter<'_>, n: &Float) -> fmt::Result {
    if !n.is_normal() {
        if n.is_nan() {
            return write!(f, "NaN");
        } else if n.is_infinite() {
            return write!(f, "{}inf", if n.is_sign_negative() { "-" } else { "" });
        } else if n.is_zero() {
            return write!(f, "0");
        }
    }

    let (sign, mut s, exponent) = n.to_sign_string_exp_round(10, Some(DISPLAY_DIGITS), Round::Nearest);
    let Some(exponent) = exponent else {
        return write!(f, "0");
    };

    // add decimal point
    match exponent.cmp(&0) {
        Ordering::Less => s.insert_str(0, &format!("0.{}", "0".repeat(exponent.unsigned_abs() as usize))),
        Ordering::Equal => s.insert_str(0, "0."),
        Ordering::Greater => {
            let exponent = exponent as usize;
            match s.len().cmp(&exponent) {
                // not enough digits before the decimal point
                Ordering::Less => s.push_str(&"0".repeat(exponent - s.len())),
                Ordering::Greater => s.insert(exponent, '.'),
                Ordering::Equal => {},
            }
        },
    }

    write!(f, "{}{}", if sign { "-" } else { "" }, trim_trailing(&s))
}

/// Formats an operand of an operation with the given precedence, adding parentheses if needed.
fn fmt_operand(f: &mut Formatter<'_>, operand: &Expr, parent: Precedence) -> fmt::Result {
    if operand.precedence() <= parent {
        write!(f, "({})", operand)
    } else {
        write!(f, "{}", operand)
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => fmt_decimal(f, n),
            Self::Constant(c) => write!(f, "{}", c.name()),
            Self::Variable(name) => write!(f, "{}", name),
            Self::Unary(UnaryOpKind::Neg, operand) => {
                write!(f, "-")?;
                fmt_operand(f, operand, Precedence::Factor)
            },
            Self::Unary(op, operand) => write!(f, "{}({})", op, operand),
            Self::Binary(op, lhs, rhs) => {
                fmt_operand(f, lhs, op.precedence())?;
                write!(f, "{}", op)?;
                fmt_operand(f, rhs, op.precedence())
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{parse, primitive::float_from_str};
    use dervish_parser::parser::{ast::Constant, token::op::BinOpKind};
    use pretty_assertions::assert_eq;
    use super::*;

    fn var(name: &str) -> Expr {
        Expr::Variable(name.to_string())
    }

    fn show(source: &str) -> String {
        let variables = ["x", "y", "z"].iter().map(|name| name.to_string()).collect();
        parse(source, &variables).unwrap().to_string()
    }

    #[test]
    fn numbers() {
        assert_eq!(Expr::num(3).to_string(), "3");
        assert_eq!(Expr::num(-2.5).to_string(), "-2.5");
        assert_eq!(Expr::num(0.0625).to_string(), "0.0625");
        assert_eq!(Expr::Number(float_from_str("0.0001").unwrap()).to_string(), "0.0001");
        assert_eq!(Expr::num(1_000_000).to_string(), "1000000");
        assert_eq!(Expr::num(-0.0).to_string(), "0");
    }

    #[test]
    fn operators() {
        assert_eq!(show("3+x"), "3+x");
        assert_eq!(show("x+y"), "x+y");
        assert_eq!(show("x - (y + z)"), "x-(y+z)");
        assert_eq!(show("(x - y) - z"), "(x-y)-z");
        assert_eq!(show("x*y+z"), "x*y+z");
        assert_eq!(show("x*(y+z)"), "x*(y+z)");
        assert_eq!(show("x^y^z"), "x^(y^z)");
        assert_eq!(show("(x^y)^z"), "(x^y)^z");
    }

    #[test]
    fn functions() {
        assert_eq!(show("sin x + 1"), "sin(x)+1");
        assert_eq!(show("sin(x+1)"), "sin(x+1)");
        assert_eq!(show("cos(x)^2"), "cos(x)^2");
        assert_eq!(show("ln(x)*log(y)"), "ln(x)*log(y)");
        assert_eq!(show("log<2>(x)"), "log<2>(x)");
    }

    #[test]
    fn negation() {
        assert_eq!(show("-x"), "-x");
        assert_eq!(show("-(x*y)"), "-(x*y)");
        assert_eq!(show("(-x)^2"), "(-x)^2");
        assert_eq!(show("-x^2"), "-x^2");
        assert_eq!(show("x^-1"), "x^(-1)");
        assert_eq!(show("-sin(x)"), "-sin(x)");
    }

    #[test]
    fn negative_numbers() {
        let expr = Expr::binary(BinOpKind::Exp, Expr::num(-1), var("x"));
        assert_eq!(expr.to_string(), "(-1)^x");
        let expr = Expr::binary(BinOpKind::Mul, Expr::num(-1), var("x"));
        assert_eq!(expr.to_string(), "(-1)*x");
        let expr = Expr::binary(BinOpKind::Sub, Expr::num(-1), var("x"));
        assert_eq!(expr.to_string(), "-1-x");
    }

    #[test]
    fn constants() {
        assert_eq!(Expr::Constant(Constant::Pi).to_string(), "pi");
        assert_eq!(show("x*e"), "x*e");
    }
}
