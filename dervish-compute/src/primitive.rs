//! Functions to construct [`Float`]s, and the precision settings shared by all arithmetic.
//!
//! Arithmetic happens at [`PRECISION`] bits. Every numeric result is then rounded to
//! [`DISPLAY_DIGITS`] significant decimal digits (round half up) and widened back, so that
//! values stay stable across chained operations and compare equal to the decimal literals
//! they display as.

use rug::{float::Round, ops::Pow, Assign, Float, Integer, Rational};

/// The number of bits of precision to use when computing values.
pub const PRECISION: u32 = 1 << 9;

/// The number of significant decimal digits results are rounded to.
pub const DISPLAY_DIGITS: usize = 20;

/// Extra decimal digits examined when rounding to [`DISPLAY_DIGITS`].
const GUARD_DIGITS: usize = 20;

/// The largest binary exponent, in either direction, of a number that arithmetic may produce.
/// This is roughly `10^1233`.
pub const MAX_EXPONENT: u32 = 1 << 12;

/// Creates a [`Float`] with the given value.
pub fn float<T>(n: T) -> Float
where
    Float: Assign<T>,
{
    Float::with_val(PRECISION, n)
}

/// Returns `10^exp` as an [`Integer`].
fn pow10(exp: u32) -> Integer {
    Integer::from(10).pow(exp)
}

/// Creates a [`Float`] from `mantissa * 10^scale`, rounding once to nearest.
fn from_scaled(mantissa: Integer, scale: i64) -> Float {
    match u32::try_from(scale) {
        Ok(scale) => float(mantissa * pow10(scale)),
        Err(_) => {
            let denominator = pow10(u32::try_from(-scale).unwrap_or(u32::MAX));
            float(Rational::from((mantissa, denominator)))
        },
    }
}

/// Creates a [`Float`] from a decimal literal such as `12` or `3.25`. Returns [`None`] if the
/// string is not made of digits with at most one decimal point.
pub fn float_from_str(s: &str) -> Option<Float> {
    let (int_part, frac_part) = s.split_once('.').unwrap_or((s, ""));
    if int_part.is_empty()
        || !int_part.bytes().all(|b| b.is_ascii_digit())
        || !frac_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let digits = format!("{}{}", int_part, frac_part);
    let mantissa = Integer::from_str_radix(&digits, 10).ok()?;
    Some(from_scaled(mantissa, -(frac_part.len() as i64)))
}

/// Returns true if the value is zero, or finite with a binary exponent within
/// [`MAX_EXPONENT`].
pub fn in_range(n: &Float) -> bool {
    n.is_zero() || n.get_exp().map_or(false, |exp| exp.unsigned_abs() <= MAX_EXPONENT)
}

/// Rounds the value to [`DISPLAY_DIGITS`] significant digits, rounding half up (away from zero
/// on ties), and widens the result back to [`PRECISION`].
///
/// Values that are not [`in_range`] are returned unchanged.
pub fn round(n: Float) -> Float {
    if !n.is_normal() || !in_range(&n) {
        return n;
    }

    // guard digits absorb the binary representation error of decimal ties, so that a value
    // such as 0.125 rounded to two digits is seen as exactly 0.125 and rounds up
    let (negative, digits, exponent) = n.to_sign_string_exp_round(
        10,
        Some(DISPLAY_DIGITS + GUARD_DIGITS),
        Round::Nearest,
    );
    let Some(exponent) = exponent else {
        return n;
    };

    let digits = digits.as_bytes();
    let kept = &digits[..digits.len().min(DISPLAY_DIGITS)];
    let mut mantissa = Integer::new();
    for digit in kept {
        mantissa *= 10;
        mantissa += u32::from(digit - b'0');
    }
    if digits.get(DISPLAY_DIGITS).map_or(false, |&digit| digit >= b'5') {
        mantissa += 1;
    }

    let magnitude = from_scaled(mantissa, i64::from(exponent) - kept.len() as i64);
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literals() {
        assert_eq!(float_from_str("1.5").unwrap(), float(1.5));
        assert_eq!(float_from_str("42").unwrap(), float(42));
        assert_eq!(float_from_str("0.25").unwrap(), float(0.25));
        assert!(float_from_str("1.").is_none());
        assert!(float_from_str(".5").is_none());
        assert!(float_from_str("1e5").is_none());
    }

    #[test]
    fn round_matches_literal() {
        let sum = float_from_str("4.2").unwrap() - float_from_str("1.5").unwrap();
        assert_eq!(round(sum), float_from_str("2.7").unwrap());

        let third = float(1) / float(3);
        assert_eq!(round(third), float_from_str("0.33333333333333333333").unwrap());
    }

    #[test]
    fn round_half_up() {
        // 21 significant digits, last one a 5
        let n = float_from_str("1.00000000000000000005").unwrap();
        assert_eq!(round(n), float_from_str("1.0000000000000000001").unwrap());

        let n = float_from_str("1.00000000000000000004").unwrap();
        assert_eq!(round(n), float(1));

        let n = -float_from_str("2.99999999999999999999").unwrap();
        assert_eq!(round(n), float(-3));
    }

    #[test]
    fn round_large_and_small() {
        let n = float(2).pow(100);
        assert_eq!(round(n), float_from_str("1267650600228229401500000000000").unwrap());

        let n = float_from_str("0.000123456789012345678912").unwrap();
        assert_eq!(round(n), float_from_str("0.00012345678901234567891").unwrap());
    }

    #[test]
    fn round_special() {
        assert!(round(float(0)).is_zero());
        assert!(round(float(1) / float(0)).is_infinite());

        let huge = float(10).pow(100_000_000u32);
        assert!(!in_range(&huge));
        assert_eq!(round(huge.clone()), huge);
    }

    #[test]
    fn range() {
        assert!(in_range(&float(0)));
        assert!(in_range(&float(10).pow(1000u32)));
        assert!(in_range(&(float(1) / float(10).pow(1000u32))));
        assert!(!in_range(&float(10).pow(2000u32)));
        assert!(!in_range(&(float(1) / float(0))));
        assert!(!in_range(&float(rug::float::Special::Nan)));
    }
}
