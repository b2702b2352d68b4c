//! Zoned Decimal (DISPLAY) encoding and decoding.
//!
//! Zoned decimal format stores one digit per byte, with the zone nibble
//! in the high position and the digit in the low position. This is the
//! default COBOL DISPLAY format for numeric data.
//!
//! # Format
//!
//! For a PIC S9(n) DISPLAY declaration:
//! - Each digit occupies one byte
//! - Zone nibble is 0xF for every byte but the last
//! - Sign is encoded in the zone nibble of the rightmost byte:
//!   - 0xC = positive (preferred)
//!   - 0xD = negative
//!   - 0xF = unsigned
//!
//! Example: +12345 in PIC S9(5)
//! - Binary: 0xF1 0xF2 0xF3 0xF4 0xC5 (5 bytes)
//! - The 'C' zone in last byte indicates positive

use super::{accumulate, digits_for, ExactDecimal, Result, Sign};
use crate::error::EncodingError;

const ZONE: u8 = 0xF0;

/// Encode a decimal value to zoned decimal bytes.
///
/// The value is rescaled to `scale` and right-justified in `total_digits`
/// bytes. Unsigned fields keep the 0xF zone on the last byte.
///
/// # Errors
/// Returns `EncodingError::Overflow` if the value cannot fit.
pub fn zone_decimal(
    value: &ExactDecimal,
    total_digits: usize,
    scale: u8,
    signed: bool,
) -> Result<Vec<u8>> {
    let sign = Sign::for_value(value.is_negative(), signed);
    let mut bytes: Vec<u8> = digits_for(value, total_digits, scale)?
        .into_iter()
        .map(|d| ZONE | d)
        .collect();

    if let Some(last) = bytes.last_mut() {
        *last = (sign.to_nibble() << 4) | (*last & 0x0F);
    }

    Ok(bytes)
}

/// Decode zoned decimal bytes to an exact decimal value.
///
/// Only the low nibble of each byte contributes a digit. The high nibble of
/// the last byte carries the sign; the other zones are not inspected.
///
/// # Errors
/// `InvalidDigit` for a digit nibble above 9, `InvalidSign` for a last zone
/// other than C, D or F.
pub fn unzone_decimal(bytes: &[u8], scale: u8) -> Result<(ExactDecimal, Sign)> {
    let last = bytes.last().ok_or_else(|| EncodingError::ConversionFailed {
        message: "empty zoned decimal".to_string(),
    })?;

    let mut unscaled: i128 = 0;
    for (position, &byte) in bytes.iter().enumerate() {
        let digit = byte & 0x0F;
        if digit > 9 {
            return Err(EncodingError::InvalidDigit {
                nibble: digit,
                position,
            });
        }
        unscaled = accumulate(unscaled, digit, bytes.len())?;
    }

    let sign = Sign::from_nibble(last >> 4)?;
    if sign == Sign::Negative {
        unscaled = -unscaled;
    }

    Ok((ExactDecimal::new(unscaled, scale), sign))
}
