//! Constants used in the library, computed once at [`PRECISION`](crate::primitive::PRECISION).

use dervish_parser::parser::ast::Constant;
use once_cell::sync::Lazy;
use rug::Float;
use super::primitive::float;

/// Euler's number.
pub static E: Lazy<Float> = Lazy::new(|| float(1).exp());

/// The ratio of a circle's circumference to its diameter.
pub static PI: Lazy<Float> = Lazy::new(|| float(-1).acos());

/// Returns the value of the given named constant.
pub fn value(constant: Constant) -> &'static Float {
    match constant {
        Constant::E => &E,
        Constant::Pi => &PI,
    }
}

#[cfg(test)]
mod tests {
    use assert_float_eq::{
        afe_abs,
        afe_relative_error_msg,
        afe_is_relative_eq,
        assert_float_relative_eq,
    };
    use super::*;

    #[test]
    fn constant_values() {
        assert_float_relative_eq!(E.to_f64(), std::f64::consts::E);
        assert_float_relative_eq!(PI.to_f64(), std::f64::consts::PI);
        assert_eq!(E.prec(), crate::primitive::PRECISION);
    }
}
