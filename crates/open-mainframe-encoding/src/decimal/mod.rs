//! Numeric storage formats of mainframe records.
//!
//! - **Packed Decimal (COMP-3 / DB2 DECIMAL)**: BCD with a sign nibble
//! - **Zoned Decimal (DISPLAY)**: one digit per byte, sign in the last zone
//! - **Binary (COMP/COMP-4/COMP-5, SMALLINT/INTEGER/BIGINT)**: big-endian
//!   two's complement
//! - **IEEE 754** and **IBM hexadecimal floating point**, big-endian
//!
//! Decimal results are [`ExactDecimal`] values; no step goes through binary
//! floating point.

mod binary;
mod exact;
mod floating;
mod ieee_float;
mod packed;
mod zoned;

pub use binary::{binary_width_for_digits, decode_binary, encode_binary};
pub use exact::ExactDecimal;
pub use floating::{decode_hfp_long, decode_hfp_short, encode_hfp_long, encode_hfp_short};
pub use ieee_float::{decode_ieee_long, decode_ieee_short, encode_ieee_long, encode_ieee_short};
pub use packed::{pack_decimal, packed_length, unpack_decimal, unpack_unsigned_digits};
pub use zoned::{unzone_decimal, zone_decimal};

use crate::error::EncodingError;

/// Result type for decimal operations.
pub type Result<T> = std::result::Result<T, EncodingError>;

/// Sign carried by a packed sign nibble or a zoned sign zone.
///
/// `Unsigned` (0xF) decodes to a non-negative value exactly like
/// `Positive` (0xC); it is kept apart only so encoders can reproduce it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    /// Sign nibble 0xC
    Positive,
    /// Sign nibble 0xD
    Negative,
    /// Sign nibble 0xF
    Unsigned,
}

impl Sign {
    /// The preferred sign nibble: 0xC, 0xD or 0xF.
    pub fn to_nibble(self) -> u8 {
        match self {
            Sign::Positive => 0x0C,
            Sign::Negative => 0x0D,
            Sign::Unsigned => 0x0F,
        }
    }

    /// Parse a sign nibble. Only C, D and F are accepted.
    pub fn from_nibble(nibble: u8) -> Result<Self> {
        match nibble & 0x0F {
            0x0C => Ok(Sign::Positive),
            0x0D => Ok(Sign::Negative),
            0x0F => Ok(Sign::Unsigned),
            other => Err(EncodingError::InvalidSign { nibble: other }),
        }
    }

    /// The sign to write for `value` in a field that is or is not signed.
    pub fn for_value(negative: bool, signed: bool) -> Self {
        match (signed, negative) {
            (false, _) => Sign::Unsigned,
            (true, true) => Sign::Negative,
            (true, false) => Sign::Positive,
        }
    }
}

/// Fold a run of decimal digits into an `i128`, reporting overflow.
pub(crate) fn accumulate(acc: i128, digit: u8, total_digits: usize) -> Result<i128> {
    acc.checked_mul(10)
        .and_then(|v| v.checked_add(i128::from(digit)))
        .ok_or(EncodingError::Overflow {
            required: total_digits,
            available: ExactDecimal::MAX_PRECISION,
        })
}

/// Render `value` at `scale` as exactly `total_digits` decimal digits.
pub(crate) fn digits_for(value: &ExactDecimal, total_digits: usize, scale: u8) -> Result<Vec<u8>> {
    let scaled = value.rescale(scale)?;
    let digit_string = scaled.unscaled().unsigned_abs().to_string();
    if digit_string.len() > total_digits {
        return Err(EncodingError::Overflow {
            required: digit_string.len(),
            available: total_digits,
        });
    }
    let padded = format!("{:0>width$}", digit_string, width = total_digits);
    Ok(padded.bytes().map(|b| b - b'0').collect())
}
