//! Packed Decimal (COMP-3) encoding and decoding.
//!
//! Packed decimal stores two decimal digits per byte, with the rightmost
//! nibble containing the sign. DB2 DECIMAL columns use the same layout.
//!
//! # Format
//!
//! For a PIC S9(n) COMP-3 or DECIMAL(n, s) declaration:
//! - Each pair of digits occupies one byte
//! - The sign nibble is in the rightmost position
//! - Storage size = ceil((n + 1) / 2) bytes
//!
//! Example: +12345.67 in DECIMAL(9,2)
//! - Binary: 0x00 0x12 0x34 0x56 0x7C (5 bytes)
//!
//! Example: +123456 in PIC S9(6) COMP-3
//! - Layout: 0|d1 d2|d3 d4|d5 d6|sign (leading zero pad for even digits)
//! - Binary: 0x01 0x23 0x45 0x6C (4 bytes)

use super::{accumulate, digits_for, ExactDecimal, Result, Sign};
use crate::error::EncodingError;

/// Bytes occupied by a packed field of `total_digits` digits.
pub fn packed_length(total_digits: usize) -> usize {
    (total_digits + 2) / 2
}

/// Encode a decimal value to packed decimal bytes.
///
/// The value is rescaled to `scale` (truncating extra fraction digits) and
/// right-justified in `total_digits` digits.
///
/// # Errors
/// Returns `EncodingError::Overflow` if the value cannot fit.
pub fn pack_decimal(
    value: &ExactDecimal,
    total_digits: usize,
    scale: u8,
    signed: bool,
) -> Result<Vec<u8>> {
    let sign = Sign::for_value(value.is_negative(), signed);
    let mut nibbles = digits_for(value, total_digits, scale)?;
    nibbles.push(sign.to_nibble());

    if nibbles.len() % 2 == 1 {
        nibbles.insert(0, 0);
    }

    Ok(nibbles
        .chunks(2)
        .map(|pair| (pair[0] << 4) | pair[1])
        .collect())
}

/// Decode packed decimal bytes to an exact decimal value.
///
/// Every byte but the last contributes two digits; the last byte holds the
/// final digit and the sign nibble. The decimal point is placed `scale`
/// digits from the right.
///
/// # Errors
/// `InvalidDigit` for a digit nibble above 9, `InvalidSign` for a sign
/// nibble other than C, D or F.
pub fn unpack_decimal(bytes: &[u8], scale: u8) -> Result<(ExactDecimal, Sign)> {
    let (last, body) = bytes.split_last().ok_or_else(|| EncodingError::ConversionFailed {
        message: "empty packed decimal".to_string(),
    })?;

    let total_digits = bytes.len() * 2 - 1;
    let mut unscaled: i128 = 0;

    for (position, &byte) in body.iter().enumerate() {
        for nibble in [byte >> 4, byte & 0x0F] {
            if nibble > 9 {
                return Err(EncodingError::InvalidDigit { nibble, position });
            }
            unscaled = accumulate(unscaled, nibble, total_digits)?;
        }
    }

    let final_digit = last >> 4;
    if final_digit > 9 {
        return Err(EncodingError::InvalidDigit {
            nibble: final_digit,
            position: body.len(),
        });
    }
    unscaled = accumulate(unscaled, final_digit, total_digits)?;

    let sign = Sign::from_nibble(last & 0x0F)?;
    if sign == Sign::Negative {
        unscaled = -unscaled;
    }

    Ok((ExactDecimal::new(unscaled, scale), sign))
}

/// Decode unsigned BCD (no sign nibble) into its digit string.
///
/// DB2 stores DATE, TIME and TIMESTAMP internally as unsigned packed digits.
pub fn unpack_unsigned_digits(bytes: &[u8]) -> Result<String> {
    let mut digits = String::with_capacity(bytes.len() * 2);
    for (position, &byte) in bytes.iter().enumerate() {
        for nibble in [byte >> 4, byte & 0x0F] {
            if nibble > 9 {
                return Err(EncodingError::InvalidDigit { nibble, position });
            }
            digits.push(char::from(b'0' + nibble));
        }
    }
    Ok(digits)
}
