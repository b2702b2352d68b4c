//! Binary integer (COMP / COMP-4, SMALLINT / INTEGER / BIGINT) encoding.
//!
//! Binary integers are big-endian two's complement in a halfword,
//! fullword or doubleword:
//! - 1-4 digits: 2 bytes
//! - 5-9 digits: 4 bytes
//! - 10-18 digits: 8 bytes

use super::Result;
use crate::error::EncodingError;

/// Storage width in bytes for a binary field of `digits` digits.
///
/// Returns `None` above 18 digits, which no binary width can hold.
pub fn binary_width_for_digits(digits: usize) -> Option<usize> {
    match digits {
        0..=4 => Some(2),
        5..=9 => Some(4),
        10..=18 => Some(8),
        _ => None,
    }
}

/// Decode a 2, 4 or 8 byte big-endian two's complement integer.
///
/// # Errors
/// Returns `EncodingError::ConversionFailed` for any other width.
pub fn decode_binary(bytes: &[u8]) -> Result<i64> {
    match *bytes {
        [a, b] => Ok(i64::from(i16::from_be_bytes([a, b]))),
        [a, b, c, d] => Ok(i64::from(i32::from_be_bytes([a, b, c, d]))),
        [a, b, c, d, e, f, g, h] => Ok(i64::from_be_bytes([a, b, c, d, e, f, g, h])),
        _ => Err(EncodingError::ConversionFailed {
            message: format!("binary integer must be 2, 4 or 8 bytes, got {}", bytes.len()),
        }),
    }
}

/// Encode `value` as a big-endian two's complement integer of `width` bytes.
///
/// # Errors
/// `Overflow` if the value does not fit the width, `ConversionFailed` for a
/// width other than 2, 4 or 8.
pub fn encode_binary(value: i64, width: usize) -> Result<Vec<u8>> {
    let overflow = || EncodingError::Overflow {
        required: value.unsigned_abs().to_string().len(),
        available: width,
    };
    match width {
        2 => Ok(i16::try_from(value).map_err(|_| overflow())?.to_be_bytes().to_vec()),
        4 => Ok(i32::try_from(value).map_err(|_| overflow())?.to_be_bytes().to_vec()),
        8 => Ok(value.to_be_bytes().to_vec()),
        _ => Err(EncodingError::ConversionFailed {
            message: format!("binary integer must be 2, 4 or 8 bytes, got {}", width),
        }),
    }
}
