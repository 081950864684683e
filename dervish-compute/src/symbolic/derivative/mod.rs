//! Symbolic differentiation.
//!
//! [`derivative`] applies the structural rules of differentiation and returns a tree that
//! usually needs simplification. [`Expr::differentiate`] evaluates that tree without bindings.

mod function;

use crate::{
    error::{kind, Error},
    symbolic::eval::MAX_RECURSION_DEPTH,
};
use dervish_parser::parser::token::op::{BinOpKind, UnaryOpKind};
use log::debug;
use super::expr::Expr;

/// Differentiates expressions with respect to one variable.
#[derive(Debug, Clone, Copy)]
struct Differentiator<'a> {
    with: &'a str,
}

impl Differentiator<'_> {
    fn derive(&self, f: &Expr, depth: usize) -> Result<Expr, Error> {
        if depth > MAX_RECURSION_DEPTH {
            return Err(Error::new(vec![], kind::SubstitutionTooDeep { max: MAX_RECURSION_DEPTH }));
        }

        Ok(match f {
            Expr::Number(_) | Expr::Constant(_) => Expr::num(0),
            Expr::Variable(name) => Expr::num(u8::from(name.as_str() == self.with)),
            Expr::Binary(op @ (BinOpKind::Add | BinOpKind::Sub), f, g) => {
                Expr::binary(*op, self.derive(f, depth + 1)?, self.derive(g, depth + 1)?)
            },
            Expr::Binary(BinOpKind::Mul, f, g) => {
                let (df, dg) = (self.derive(f, depth + 1)?, self.derive(g, depth + 1)?);
                Expr::binary(
                    BinOpKind::Add,
                    Expr::binary(BinOpKind::Mul, df, (**g).clone()),
                    Expr::binary(BinOpKind::Mul, (**f).clone(), dg),
                )
            },
            Expr::Binary(BinOpKind::Div, f, g) => {
                let (df, dg) = (self.derive(f, depth + 1)?, self.derive(g, depth + 1)?);
                Expr::binary(
                    BinOpKind::Div,
                    Expr::binary(
                        BinOpKind::Sub,
                        Expr::binary(BinOpKind::Mul, df, (**g).clone()),
                        Expr::binary(BinOpKind::Mul, (**f).clone(), dg),
                    ),
                    Expr::binary(BinOpKind::Exp, (**g).clone(), Expr::num(2)),
                )
            },
            Expr::Binary(BinOpKind::Exp, f, g) => self.power(f, g, depth)?,
            Expr::Unary(op, f) => self.function(*op, f, depth)?,
        })
    }

    /// The general power rule:
    ///
    /// `d(f^g) = f^g * (g' * ln(f)) + f^(g-1) * (g * f')`
    ///
    /// The operands are evaluated first. If `g'` evaluates to zero, the first term is dropped
    /// before it is built, so that constant negative bases such as `(-2)^3` do not require
    /// `ln(-2)`.
    fn power(&self, f: &Expr, g: &Expr, depth: usize) -> Result<Expr, Error> {
        let (f, g) = (f.evaluate(None)?, g.evaluate(None)?);
        let df = self.derive(&f, depth + 1)?;
        let dg = self.derive(&g, depth + 1)?.evaluate(None)?;

        let power_term = Expr::binary(
            BinOpKind::Mul,
            Expr::binary(
                BinOpKind::Exp,
                f.clone(),
                Expr::binary(BinOpKind::Sub, g.clone(), Expr::num(1)),
            ),
            Expr::binary(BinOpKind::Mul, g.clone(), df),
        );
        if dg.is_zero() {
            return Ok(power_term);
        }

        let exponential_term = Expr::binary(
            BinOpKind::Mul,
            Expr::binary(BinOpKind::Exp, f.clone(), g),
            Expr::binary(BinOpKind::Mul, dg, Expr::unary(UnaryOpKind::Ln, f)),
        );
        Ok(Expr::binary(BinOpKind::Add, exponential_term, power_term))
    }
}

/// Returns the derivative of `f` with respect to the variable `with`, without simplifying it.
///
/// Fails only if an operand that is evaluated before a rule is applied fails to evaluate.
pub fn derivative(f: &Expr, with: &str) -> Result<Expr, Error> {
    Differentiator { with }.derive(f, 0)
}

impl Expr {
    /// Returns the simplified derivative of the expression with respect to the given variable.
    pub fn differentiate(&self, with: &str) -> Result<Expr, Error> {
        debug!("differentiating {} with respect to {}", self, with);
        derivative(self, with)?.evaluate(None)
    }
}

#[cfg(test)]
mod tests {
    use crate::{parse, primitive::float_from_str};
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;
    use super::*;

    fn parse_expr(source: &str) -> Expr {
        let variables: HashSet<String> = ["x", "y"].iter().map(|name| name.to_string()).collect();
        parse(source, &variables).unwrap()
    }

    fn diff(source: &str) -> Expr {
        parse_expr(source).differentiate("x").unwrap()
    }

    #[test]
    fn constants_and_variables() {
        assert_eq!(diff("5"), Expr::num(0));
        assert_eq!(diff("pi"), Expr::num(0));
        assert_eq!(diff("x"), Expr::num(1));
        assert_eq!(diff("y"), Expr::num(0));
    }

    #[test]
    fn polynomials() {
        assert_eq!(diff("x^2"), parse_expr("2*x"));
        assert_eq!(diff("45*x+87"), parse_expr("45"));
        assert_eq!(diff("x+x"), parse_expr("2"));
        assert_eq!(diff("x^3"), parse_expr("3*x^2"));
        assert_eq!(diff("-x"), parse_expr("-1"));
        assert_eq!(diff("5-x"), parse_expr("-1"));
    }

    #[test]
    fn products_and_quotients() {
        assert_eq!(diff("x*y"), parse_expr("y"));
        assert_eq!(diff("x/y"), parse_expr("y/y^2"));
        assert_eq!(diff("1/x"), parse_expr("-1/x^2"));
    }

    #[test]
    fn exponentials() {
        assert_eq!(diff("e^x"), parse_expr("e^x"));
        assert_eq!(diff("2^x"), parse_expr("2^x*ln(2)"));
        assert_eq!(diff("x^x"), parse_expr("x^x*ln(x)+x^(x-1)*x"));
    }

    #[test]
    fn constant_negative_base() {
        let expr = Expr::binary(
            BinOpKind::Mul,
            Expr::binary(BinOpKind::Exp, Expr::num(-2), Expr::num(3)),
            Expr::Variable("x".to_string()),
        );
        assert_eq!(expr.differentiate("x").unwrap(), Expr::num(-8));

        let expr = Expr::binary(BinOpKind::Exp, Expr::num(-2), Expr::num(3));
        assert_eq!(expr.differentiate("x").unwrap(), Expr::num(0));
    }

    #[test]
    fn functions() {
        assert_eq!(diff("sin(x)"), parse_expr("cos(x)"));
        assert_eq!(diff("cos(x)"), parse_expr("-sin(x)"));
        assert_eq!(diff("tan(x)"), parse_expr("1/cos(x)^2"));
        assert_eq!(diff("ln(x)"), parse_expr("1/x"));
        assert_eq!(diff("sin(x^2)"), parse_expr("cos(x^2)*(2*x)"));
        assert_eq!(diff("ln(y)"), Expr::num(0));
    }

    #[test]
    fn logarithms() {
        let coefficient = Expr::Number(float_from_str("0.43429448190325182765").unwrap());
        assert_eq!(
            diff("log(x)"),
            Expr::binary(BinOpKind::Mul, coefficient, parse_expr("1/x")),
        );

        let coefficient = Expr::Number(float_from_str("1.4426950408889634074").unwrap());
        assert_eq!(
            diff("log<2>(x)"),
            Expr::binary(BinOpKind::Mul, coefficient, parse_expr("1/x")),
        );
    }

    #[test]
    fn raw_derivative_is_unsimplified() {
        let raw = derivative(&parse_expr("x+x"), "x").unwrap();
        assert_eq!(raw.to_string(), "1+1");
        assert_eq!(raw.evaluate(None).unwrap(), Expr::num(2));
    }
}
