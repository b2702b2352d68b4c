//! EBCDIC text and mainframe numeric formats for OpenMainframe.
//!
//! This crate converts the raw byte representations found in mainframe
//! datasets and DB2 unloads into Rust values.
//!
//! # Features
//!
//! - **EBCDIC Conversion**: CP037, CP500, CP1047, the national pages CP273,
//!   CP284, CP285 and CP297, and the Euro-enabled CP1140
//! - **Unicode CCSIDs**: UTF-8 (1208) and UTF-16BE (1200/13488) for graphic data
//! - **Packed Decimal**: COMP-3 BCD with up to 38 exact digits
//! - **Zoned Decimal**: DISPLAY format numeric encoding
//! - **Binary Integer**: COMP/COMP-4 big-endian integer encoding
//! - **Floating Point**: IEEE 754 and IBM hexadecimal, big-endian
//!
//! # Example
//!
//! ```rust
//! use open_mainframe_encoding::ebcdic::CP037;
//! use open_mainframe_encoding::decimal::{pack_decimal, unpack_decimal, ExactDecimal};
//!
//! // EBCDIC conversion
//! let ebcdic = CP037.encode("HELLO").unwrap();
//! assert_eq!(CP037.decode(&ebcdic), "HELLO");
//!
//! // Packed decimal
//! let value: ExactDecimal = "12345.67".parse().unwrap();
//! let packed = pack_decimal(&value, 9, 2, true).unwrap();
//! assert_eq!(packed, vec![0x00, 0x12, 0x34, 0x56, 0x7C]);
//! let (unpacked, _sign) = unpack_decimal(&packed, 2).unwrap();
//! assert_eq!(unpacked, value);
//! ```

pub mod decimal;
pub mod ebcdic;
pub mod error;
pub mod text;

pub use decimal::{
    binary_width_for_digits, decode_binary, decode_hfp_long, decode_hfp_short, decode_ieee_long,
    decode_ieee_short, encode_binary, encode_hfp_long, encode_hfp_short, encode_ieee_long,
    encode_ieee_short, pack_decimal, packed_length, unpack_decimal, unpack_unsigned_digits,
    unzone_decimal, zone_decimal, ExactDecimal, Sign,
};
pub use ebcdic::{
    CodePage, CodePageRegistry, CP037, CP1047, CP1140, CP273, CP284, CP285, CP297, CP500,
};
pub use error::EncodingError;
pub use text::TextEncoding;

/// Result type for encoding operations.
pub type Result<T> = std::result::Result<T, EncodingError>;
