use crate::{
    error::Error,
    primitive::{float, round},
    symbolic::expr::Expr,
};
use dervish_parser::parser::token::op::{BinOpKind, UnaryOpKind};
use super::Differentiator;

impl Differentiator<'_> {
    /// Applies the chain rule to a unary operation. The operand is evaluated before the rule is
    /// applied.
    pub(super) fn function(&self, op: UnaryOpKind, f: &Expr, depth: usize) -> Result<Expr, Error> {
        let f = f.evaluate(None)?;
        let df = self.derive(&f, depth + 1)?;

        Ok(match op {
            UnaryOpKind::Neg => Expr::unary(UnaryOpKind::Neg, df),
            UnaryOpKind::Sin => Expr::binary(BinOpKind::Mul, Expr::unary(UnaryOpKind::Cos, f), df),
            UnaryOpKind::Cos => Expr::binary(
                BinOpKind::Mul,
                Expr::unary(UnaryOpKind::Neg, Expr::unary(UnaryOpKind::Sin, f)),
                df,
            ),
            UnaryOpKind::Tan => Expr::binary(
                BinOpKind::Div,
                df,
                Expr::binary(BinOpKind::Exp, Expr::unary(UnaryOpKind::Cos, f), Expr::num(2)),
            ),
            UnaryOpKind::Ln => Expr::binary(BinOpKind::Div, df, f),

            // log_b(f) = ln(f) / ln(b)
            UnaryOpKind::Log(base) => Expr::binary(
                BinOpKind::Mul,
                Expr::Number(round(float(1) / float(base).ln())),
                Expr::binary(BinOpKind::Div, df, f),
            ),
        })
    }
}
