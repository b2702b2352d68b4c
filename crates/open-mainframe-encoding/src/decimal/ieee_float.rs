//! IEEE 754 binary floating point (COBOL FLOAT-SHORT / FLOAT-LONG, DB2 REAL /
//! DOUBLE).
//!
//! On z/OS, IEEE floats are stored in **big-endian** byte order.

use super::Result;
use crate::error::EncodingError;

fn wrong_width(expected: usize, actual: usize) -> EncodingError {
    EncodingError::ConversionFailed {
        message: format!("IEEE float requires {} bytes, got {}", expected, actual),
    }
}

/// Encode an f32 as IEEE 754 single precision (4 bytes, big-endian).
///
/// # Errors
/// Returns `EncodingError::ConversionFailed` for NaN.
pub fn encode_ieee_short(value: f32) -> Result<[u8; 4]> {
    if value.is_nan() {
        return Err(EncodingError::ConversionFailed {
            message: "NaN cannot be encoded as IEEE FLOAT-SHORT".to_string(),
        });
    }
    Ok(value.to_be_bytes())
}

/// Decode IEEE 754 single precision (4 bytes, big-endian).
///
/// # Errors
/// Returns `EncodingError::ConversionFailed` for a width other than 4 or a
/// NaN bit pattern.
pub fn decode_ieee_short(bytes: &[u8]) -> Result<f32> {
    let arr: [u8; 4] = bytes.try_into().map_err(|_| wrong_width(4, bytes.len()))?;
    let f = f32::from_be_bytes(arr);
    if f.is_nan() {
        return Err(EncodingError::ConversionFailed {
            message: "NaN encountered in IEEE FLOAT-SHORT decode".to_string(),
        });
    }
    Ok(f)
}

/// Encode an f64 as IEEE 754 double precision (8 bytes, big-endian).
///
/// # Errors
/// Returns `EncodingError::ConversionFailed` for NaN.
pub fn encode_ieee_long(value: f64) -> Result<[u8; 8]> {
    if value.is_nan() {
        return Err(EncodingError::ConversionFailed {
            message: "NaN cannot be encoded as IEEE FLOAT-LONG".to_string(),
        });
    }
    Ok(value.to_be_bytes())
}

/// Decode IEEE 754 double precision (8 bytes, big-endian).
///
/// # Errors
/// Returns `EncodingError::ConversionFailed` for a width other than 8 or a
/// NaN bit pattern.
pub fn decode_ieee_long(bytes: &[u8]) -> Result<f64> {
    let arr: [u8; 8] = bytes.try_into().map_err(|_| wrong_width(8, bytes.len()))?;
    let f = f64::from_be_bytes(arr);
    if f.is_nan() {
        return Err(EncodingError::ConversionFailed {
            message: "NaN encountered in IEEE FLOAT-LONG decode".to_string(),
        });
    }
    Ok(f)
}
