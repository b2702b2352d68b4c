//! Exact fixed-point decimal values.
//!
//! DB2 DECIMAL reaches 31 digits and DECFLOAT(34) reaches 34, beyond the
//! 28 digits `rust_decimal` can hold, so decoded values are kept as an
//! `i128` unscaled integer plus a scale. No binary floating point is
//! involved at any step.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::EncodingError;

/// An exact decimal: `unscaled * 10^-scale`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExactDecimal {
    unscaled: i128,
    scale: u8,
}

impl ExactDecimal {
    /// Largest number of digits an `i128` always holds.
    pub const MAX_PRECISION: usize = 38;

    /// Create a value from its unscaled integer and scale.
    pub const fn new(unscaled: i128, scale: u8) -> Self {
        Self { unscaled, scale }
    }

    /// The unscaled integer.
    pub fn unscaled(&self) -> i128 {
        self.unscaled
    }

    /// Digits after the decimal point.
    pub fn scale(&self) -> u8 {
        self.scale
    }

    /// True for values below zero.
    pub fn is_negative(&self) -> bool {
        self.unscaled < 0
    }

    /// Number of significant digits in the unscaled integer (at least 1).
    pub fn digit_count(&self) -> usize {
        let mut v = self.unscaled.unsigned_abs();
        let mut n = 1;
        while v >= 10 {
            v /= 10;
            n += 1;
        }
        n
    }

    /// Change the scale, padding with zeros or truncating toward zero.
    ///
    /// # Errors
    /// Returns `EncodingError::Overflow` if padding overflows `i128`.
    pub fn rescale(&self, scale: u8) -> Result<Self, EncodingError> {
        use std::cmp::Ordering;

        let unscaled = match scale.cmp(&self.scale) {
            Ordering::Equal => self.unscaled,
            Ordering::Greater => {
                let factor = pow10(scale - self.scale)?;
                self.unscaled
                    .checked_mul(factor)
                    .ok_or(EncodingError::Overflow {
                        required: self.digit_count() + usize::from(scale - self.scale),
                        available: Self::MAX_PRECISION,
                    })?
            }
            Ordering::Less => self.unscaled / pow10(self.scale - scale)?,
        };
        Ok(Self { unscaled, scale })
    }

    /// Convert to `rust_decimal::Decimal` when the value has at most 28 digits.
    pub fn to_decimal(&self) -> Option<Decimal> {
        Decimal::try_from_i128_with_scale(self.unscaled, u32::from(self.scale)).ok()
    }
}

fn pow10(exp: u8) -> Result<i128, EncodingError> {
    10i128
        .checked_pow(u32::from(exp))
        .ok_or(EncodingError::Overflow {
            required: usize::from(exp) + 1,
            available: ExactDecimal::MAX_PRECISION,
        })
}

impl From<Decimal> for ExactDecimal {
    fn from(value: Decimal) -> Self {
        // rust_decimal scales never exceed 28.
        Self {
            unscaled: value.mantissa(),
            scale: value.scale() as u8,
        }
    }
}

impl From<i64> for ExactDecimal {
    fn from(value: i64) -> Self {
        Self::new(i128::from(value), 0)
    }
}

impl FromStr for ExactDecimal {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (negative, body) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(EncodingError::ConversionFailed {
                message: format!("not a decimal: '{}'", s),
            });
        }

        let digits = int_part.len() + frac_part.len();
        let mut unscaled: i128 = 0;
        for ch in int_part.chars().chain(frac_part.chars()) {
            let d = ch.to_digit(10).ok_or_else(|| EncodingError::ConversionFailed {
                message: format!("not a decimal: '{}'", s),
            })?;
            unscaled = unscaled
                .checked_mul(10)
                .and_then(|v| v.checked_add(i128::from(d)))
                .ok_or(EncodingError::Overflow {
                    required: digits,
                    available: Self::MAX_PRECISION,
                })?;
        }
        let scale = u8::try_from(frac_part.len()).map_err(|_| EncodingError::Overflow {
            required: digits,
            available: Self::MAX_PRECISION,
        })?;

        Ok(Self {
            unscaled: if negative { -unscaled } else { unscaled },
            scale,
        })
    }
}

impl fmt::Display for ExactDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.unscaled < 0 { "-" } else { "" };
        let digits = self.unscaled.unsigned_abs().to_string();
        let scale = usize::from(self.scale);
        if scale == 0 {
            return write!(f, "{}{}", sign, digits);
        }
        let padded = format!("{:0>width$}", digits, width = scale + 1);
        let (int_part, frac_part) = padded.split_at(padded.len() - scale);
        write!(f, "{}{}.{}", sign, int_part, frac_part)
    }
}
