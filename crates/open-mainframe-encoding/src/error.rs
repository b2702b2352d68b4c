//! Encoding error types.

use miette::Diagnostic;
use thiserror::Error;

/// Errors produced while converting mainframe byte representations.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum EncodingError {
    /// Generic conversion failure.
    #[error("conversion failed: {message}")]
    #[diagnostic(code(encoding::conversion_failed))]
    ConversionFailed {
        /// Description of the failure.
        message: String,
    },

    /// A nibble that should hold a decimal digit holds 0xA-0xF.
    #[error("invalid digit nibble 0x{nibble:X} at byte {position}")]
    #[diagnostic(code(encoding::invalid_digit))]
    InvalidDigit {
        /// Offending nibble value.
        nibble: u8,
        /// Byte index within the field.
        position: usize,
    },

    /// A sign nibble outside C/D/F.
    #[error("invalid sign nibble 0x{nibble:X}")]
    #[diagnostic(code(encoding::invalid_sign), help("expected C or F (positive) or D (negative)"))]
    InvalidSign {
        /// Offending nibble value.
        nibble: u8,
    },

    /// Unknown CCSID or code page name.
    #[error("unknown code page '{name}'")]
    #[diagnostic(code(encoding::invalid_code_page))]
    InvalidCodePage {
        /// The name or CCSID that was requested.
        name: String,
    },

    /// Value needs more digits than the target precision allows.
    #[error("value requires {required} digits but only {available} available")]
    #[diagnostic(code(encoding::overflow))]
    Overflow {
        /// Digits needed.
        required: usize,
        /// Digits available.
        available: usize,
    },

    /// Character cannot be represented in the target encoding.
    #[error("character '{ch}' (U+{code:04X}) cannot be encoded in {encoding}")]
    #[diagnostic(code(encoding::unmappable_character))]
    UnmappableCharacter {
        /// Offending character.
        ch: char,
        /// Its code point.
        code: u32,
        /// Target encoding name.
        encoding: String,
    },
}
