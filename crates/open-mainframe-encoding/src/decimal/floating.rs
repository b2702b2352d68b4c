//! IBM hexadecimal floating point (HFP).
//!
//! COMP-1 and COMP-2 fields written by programs that predate IEEE support
//! use HFP, and unloads produced with `float_format = "hexadecimal"` carry
//! REAL and DOUBLE columns the same way.
//!
//! ```text
//! short: [S|EEEEEEE|24-bit fraction]
//! long:  [S|EEEEEEE|56-bit fraction]
//! value = (-1)^S * 0.fraction * 16^(E - 64)
//! ```
//!
//! The exponent is base 16 with bias 64 and the fraction has no implicit
//! leading bit. There is no NaN, infinity or denormal form.

use super::Result;
use crate::error::EncodingError;

const SHORT_FRACTION_BITS: u32 = 24;
const LONG_FRACTION_BITS: u32 = 56;
const EXPONENT_BIAS: i32 = 64;

/// Encode to the 4-byte short form, rounding the fraction to nearest.
///
/// Values below the HFP range encode as zero; values above it and
/// infinities saturate to the largest magnitude. NaN encodes as zero.
pub fn encode_hfp_short(value: f64) -> [u8; 4] {
    let word = to_hfp(value, SHORT_FRACTION_BITS);
    (word as u32).to_be_bytes()
}

/// Decode a 4-byte short HFP value.
///
/// # Errors
/// Returns `EncodingError::ConversionFailed` unless exactly 4 bytes are given.
pub fn decode_hfp_short(bytes: &[u8]) -> Result<f64> {
    let bytes: [u8; 4] = bytes.try_into().map_err(|_| width_error("short", 4, bytes.len()))?;
    Ok(from_hfp(u64::from(u32::from_be_bytes(bytes)), SHORT_FRACTION_BITS))
}

/// Encode to the 8-byte long form. Every finite f64 inside the HFP range
/// is represented exactly.
pub fn encode_hfp_long(value: f64) -> [u8; 8] {
    to_hfp(value, LONG_FRACTION_BITS).to_be_bytes()
}

/// Decode an 8-byte long HFP value.
///
/// # Errors
/// Returns `EncodingError::ConversionFailed` unless exactly 8 bytes are given.
pub fn decode_hfp_long(bytes: &[u8]) -> Result<f64> {
    let bytes: [u8; 8] = bytes.try_into().map_err(|_| width_error("long", 8, bytes.len()))?;
    Ok(from_hfp(u64::from_be_bytes(bytes), LONG_FRACTION_BITS))
}

fn width_error(form: &str, expected: usize, actual: usize) -> EncodingError {
    EncodingError::ConversionFailed {
        message: format!("HFP {} requires {} bytes, got {}", form, expected, actual),
    }
}

/// Build the HFP word, right-aligned in a u64.
fn to_hfp(value: f64, fraction_bits: u32) -> u64 {
    let sign = u64::from(value.is_sign_negative()) << (fraction_bits + 7);
    let fraction_mask = (1u64 << fraction_bits) - 1;
    let largest = sign | (0x7F << fraction_bits) | fraction_mask;

    if value.is_nan() || value == 0.0 {
        return 0;
    }
    if value.is_infinite() {
        return largest;
    }

    let bits = value.abs().to_bits();
    let biased = ((bits >> 52) & 0x7FF) as i32;
    if biased == 0 {
        // IEEE denormals are far below the smallest HFP magnitude.
        return 0;
    }
    // value = (mantissa / 2^53) * 2^binary_exp with the mantissa's top bit set
    let mantissa = (bits & ((1u64 << 52) - 1)) | (1u64 << 52);
    let binary_exp = biased - 1022;

    // Round the binary exponent up to a multiple of four; the leftover
    // shift keeps the leading hex digit non-zero.
    let mut hex_exp = binary_exp.div_euclid(4) + i32::from(binary_exp.rem_euclid(4) != 0);
    let shift = 4 * hex_exp - binary_exp;

    let scale = fraction_bits as i32 - 53 - shift;
    let mut fraction = if scale >= 0 {
        mantissa << scale
    } else {
        let drop = (-scale) as u32;
        (mantissa + (1u64 << (drop - 1))) >> drop
    };
    if fraction > fraction_mask {
        fraction >>= 4;
        hex_exp += 1;
    }

    let exponent = hex_exp + EXPONENT_BIAS;
    if exponent < 0 {
        return 0;
    }
    if exponent > 0x7F {
        return largest;
    }
    sign | ((exponent as u64) << fraction_bits) | fraction
}

fn from_hfp(word: u64, fraction_bits: u32) -> f64 {
    let negative = (word >> (fraction_bits + 7)) & 1 == 1;
    let exponent = ((word >> fraction_bits) & 0x7F) as i32;
    let fraction = word & ((1u64 << fraction_bits) - 1);

    let magnitude =
        fraction as f64 * 2f64.powi(4 * (exponent - EXPONENT_BIAS) - fraction_bits as i32);
    if negative {
        -magnitude
    } else {
        magnitude
    }
}
