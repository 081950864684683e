//! Operator metadata: precedence, associativity and commutativity.

use std::fmt;

/// The precedence of an operator or operand. Variants are ordered from lowest to highest, so
/// nodes with a higher precedence bind tighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    /// Addition and subtraction.
    Term,

    /// Multiplication, division and negation.
    Factor,

    /// Exponentiation.
    Exp,

    /// Trigonometric functions and logarithms.
    Func,

    /// Numbers, constants and variables, which never take children.
    Primary,
}

/// The associativity of an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

/// The unary operation that is being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOpKind {
    Neg,
    Sin,
    Cos,
    Tan,
    Ln,

    /// Logarithm with the given integer base (at least 2).
    Log(u32),
}

impl UnaryOpKind {
    /// Returns the precedence of the unary operation.
    pub fn precedence(&self) -> Precedence {
        match self {
            Self::Neg => Precedence::Factor,
            Self::Sin | Self::Cos | Self::Tan | Self::Ln | Self::Log(_) => Precedence::Func,
        }
    }

    /// Returns the associativity of the unary operation. All unary operations are prefix
    /// operations, which are right-associative.
    pub fn associativity(&self) -> Associativity {
        Associativity::Right
    }

    /// Returns the name of the function, or [`None`] for negation.
    pub fn name(&self) -> Option<&'static str> {
        match self {
            Self::Neg => None,
            Self::Sin => Some("sin"),
            Self::Cos => Some("cos"),
            Self::Tan => Some("tan"),
            Self::Ln => Some("ln"),
            Self::Log(_) => Some("log"),
        }
    }
}

impl fmt::Display for UnaryOpKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Neg => write!(f, "-"),
            Self::Log(10) => write!(f, "log"),
            Self::Log(base) => write!(f, "log<{}>", base),
            Self::Sin | Self::Cos | Self::Tan | Self::Ln => {
                write!(f, "{}", self.name().unwrap_or_default())
            },
        }
    }
}

/// The binary operation that is being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOpKind {
    Exp,
    Mul,
    Div,
    Add,
    Sub,
}

impl BinOpKind {
    /// Returns the precedence of the binary operation.
    pub fn precedence(&self) -> Precedence {
        match self {
            Self::Exp => Precedence::Exp,
            Self::Mul | Self::Div => Precedence::Factor,
            Self::Add | Self::Sub => Precedence::Term,
        }
    }

    /// Returns the associativity of the binary operation.
    pub fn associativity(&self) -> Associativity {
        match self {
            Self::Exp => Associativity::Right,
            Self::Mul | Self::Div | Self::Add | Self::Sub => Associativity::Left,
        }
    }

    /// Returns true if swapping the operands of the operation does not change its result.
    pub fn is_commutative(&self) -> bool {
        matches!(self, Self::Add | Self::Mul)
    }
}

impl fmt::Display for BinOpKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Exp => write!(f, "^"),
            Self::Mul => write!(f, "*"),
            Self::Div => write!(f, "/"),
            Self::Add => write!(f, "+"),
            Self::Sub => write!(f, "-"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_order() {
        assert!(BinOpKind::Add.precedence() < BinOpKind::Mul.precedence());
        assert!(BinOpKind::Mul.precedence() < BinOpKind::Exp.precedence());
        assert!(BinOpKind::Exp.precedence() < UnaryOpKind::Sin.precedence());
        assert!(UnaryOpKind::Log(2).precedence() < Precedence::Primary);
        assert_eq!(UnaryOpKind::Neg.precedence(), BinOpKind::Div.precedence());
    }

    #[test]
    fn commutativity() {
        assert!(BinOpKind::Add.is_commutative());
        assert!(BinOpKind::Mul.is_commutative());
        assert!(!BinOpKind::Sub.is_commutative());
        assert!(!BinOpKind::Div.is_commutative());
        assert!(!BinOpKind::Exp.is_commutative());
    }

    #[test]
    fn log_display() {
        assert_eq!(UnaryOpKind::Log(10).to_string(), "log");
        assert_eq!(UnaryOpKind::Log(2).to_string(), "log<2>");
    }
}
