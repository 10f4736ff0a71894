//! Fixed-point decimal used for fee parameters.
//!
//! Fees are consensus-critical, so no floating point is involved anywhere:
//! a `Dec` stores its value scaled by 10^18 in a `u128`. Multiplication goes
//! through a `U256` intermediate to avoid losing precision before rescaling.

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of fractional digits.
pub const DEC_PRECISION: u32 = 18;

const SCALE: u128 = 1_000_000_000_000_000_000;

/// Errors produced while parsing a decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecError {
    #[error("empty decimal string")]
    Empty,

    #[error("invalid decimal '{0}'")]
    Invalid(String),

    #[error("decimal '{0}' has more than 18 fractional digits")]
    TooPrecise(String),

    #[error("decimal '{0}' is out of range")]
    Overflow(String),
}

/// Non-negative fixed-point number with 18 fractional digits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Dec(u128);

impl Dec {
    pub const ZERO: Dec = Dec(0);
    pub const ONE: Dec = Dec(SCALE);

    /// Build from the raw scaled representation.
    pub const fn from_raw(raw: u128) -> Self {
        Dec(raw)
    }

    /// Whole number of units.
    pub fn from_int(value: u64) -> Self {
        Dec(value as u128 * SCALE)
    }

    pub const fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Product of two decimals, truncated to 18 fractional digits.
    pub fn checked_mul(self, other: Dec) -> Option<Dec> {
        let wide = U256::from(self.0) * U256::from(other.0) / U256::from(SCALE);
        if wide > U256::from(u128::MAX) {
            return None;
        }
        Some(Dec(wide.low_u128()))
    }

    /// Product with a plain integer.
    pub fn checked_mul_int(self, n: u64) -> Option<Dec> {
        self.0.checked_mul(n as u128).map(Dec)
    }

    pub fn checked_add(self, other: Dec) -> Option<Dec> {
        self.0.checked_add(other.0).map(Dec)
    }

    /// `floor(self / divisor)` as an integer. `None` when dividing by zero.
    pub fn checked_quo_floor(self, divisor: Dec) -> Option<u128> {
        if divisor.is_zero() {
            return None;
        }
        // Both operands share the same scale, so the integer quotient of the
        // raw values is already the truncated result.
        Some(self.0 / divisor.0)
    }
}

impl FromStr for Dec {
    type Err = DecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DecError::Empty);
        }

        let (int_part, frac_part) = match s.split_once('.') {
            Some((i, f)) => (i, f),
            None => (s, ""),
        };

        let digits_only = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if int_part.is_empty() || !digits_only(int_part) || !digits_only(frac_part) {
            return Err(DecError::Invalid(s.to_string()));
        }
        if s.ends_with('.') {
            return Err(DecError::Invalid(s.to_string()));
        }
        if frac_part.len() > DEC_PRECISION as usize {
            return Err(DecError::TooPrecise(s.to_string()));
        }

        let int_value: u128 = int_part
            .parse()
            .map_err(|_| DecError::Overflow(s.to_string()))?;

        let mut frac_value: u128 = 0;
        if !frac_part.is_empty() {
            frac_value = frac_part
                .parse()
                .map_err(|_| DecError::Invalid(s.to_string()))?;
            frac_value *= 10u128.pow(DEC_PRECISION - frac_part.len() as u32);
        }

        int_value
            .checked_mul(SCALE)
            .and_then(|v| v.checked_add(frac_value))
            .map(Dec)
            .ok_or_else(|| DecError::Overflow(s.to_string()))
    }
}

impl TryFrom<String> for Dec {
    type Error = DecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Dec> for String {
    fn from(value: Dec) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:018}", self.0 / SCALE, self.0 % SCALE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let dec: Dec = "10.5".parse().unwrap();
        assert_eq!(dec.raw(), 10 * SCALE + SCALE / 2);
        assert_eq!(dec.to_string(), "10.500000000000000000");

        let whole: Dec = "3".parse().unwrap();
        assert_eq!(whole, Dec::from_int(3));

        let tiny: Dec = "0.000000000000000001".parse().unwrap();
        assert_eq!(tiny.raw(), 1);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!("".parse::<Dec>(), Err(DecError::Empty));
        assert!(matches!("-1".parse::<Dec>(), Err(DecError::Invalid(_))));
        assert!(matches!("1.".parse::<Dec>(), Err(DecError::Invalid(_))));
        assert!(matches!(".5".parse::<Dec>(), Err(DecError::Invalid(_))));
        assert!(matches!("1e5".parse::<Dec>(), Err(DecError::Invalid(_))));
        assert!(matches!(
            "0.0000000000000000001".parse::<Dec>(),
            Err(DecError::TooPrecise(_))
        ));
        assert!(matches!(
            "999999999999999999999999".parse::<Dec>(),
            Err(DecError::Overflow(_))
        ));
    }

    #[test]
    fn test_mul_truncates() {
        let a: Dec = "1.5".parse().unwrap();
        let b: Dec = "2.25".parse().unwrap();
        assert_eq!(a.checked_mul(b).unwrap(), "3.375".parse().unwrap());

        let third: Dec = "0.333333333333333333".parse().unwrap();
        assert_eq!(
            third.checked_mul(Dec::from_int(3)).unwrap(),
            "0.999999999999999999".parse().unwrap()
        );
    }

    #[test]
    fn test_mul_overflow() {
        let huge = Dec::from_raw(u128::MAX);
        assert!(huge.checked_mul(Dec::from_int(2)).is_none());
        assert!(huge.checked_mul_int(2).is_none());
        assert_eq!(huge.checked_mul(Dec::ONE), Some(huge));
    }

    #[test]
    fn test_quo_floor() {
        let fee: Dec = "10".parse().unwrap();
        let price: Dec = "3".parse().unwrap();
        assert_eq!(fee.checked_quo_floor(price), Some(3));

        let price: Dec = "0.0001".parse().unwrap();
        assert_eq!(fee.checked_quo_floor(price), Some(100_000));

        assert_eq!(fee.checked_quo_floor(Dec::ZERO), None);
    }

    #[test]
    fn test_serde_as_string() {
        let dec: Dec = "0.25".parse().unwrap();
        let json = serde_json::to_string(&dec).unwrap();
        assert_eq!(json, "\"0.250000000000000000\"");
        let back: Dec = serde_json::from_str("\"0.25\"").unwrap();
        assert_eq!(back, dec);
        assert!(serde_json::from_str::<Dec>("\"abc\"").is_err());
    }
}
