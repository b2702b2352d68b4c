//! Text encoding tags.
//!
//! A dataset's character data is either single-byte EBCDIC or one of the
//! Unicode CCSIDs DB2 uses for mixed and graphic columns. [`TextEncoding`]
//! names which one is in force and decodes byte spans accordingly.

use std::fmt;

use crate::ebcdic::{CodePage, CodePageRegistry};
use crate::error::EncodingError;
use crate::Result;

/// The encoding of a text span.
#[derive(Debug, Clone, Copy)]
pub enum TextEncoding {
    /// Single-byte EBCDIC code page.
    Ebcdic(&'static CodePage),
    /// UTF-8 (CCSID 1208).
    Utf8,
    /// UTF-16 big-endian (CCSID 1200 / 13488), the double-byte graphic form.
    Utf16Be,
}

impl TextEncoding {
    /// Resolve a name or CCSID ("CP037", "IBM-1047", "UTF-8", "1208", "UTF-16", "1200").
    pub fn by_name(name: &str) -> Result<Self> {
        let upper = name.trim().to_ascii_uppercase();
        match upper.as_str() {
            "UTF-8" | "UTF8" | "1208" => Ok(TextEncoding::Utf8),
            "UTF-16" | "UTF16" | "UTF-16BE" | "UTF16BE" | "UCS-2" | "1200" | "13488" => {
                Ok(TextEncoding::Utf16Be)
            }
            _ => CodePageRegistry::by_name(&upper)
                .map(TextEncoding::Ebcdic)
                .map_err(|_| EncodingError::InvalidCodePage {
                    name: name.to_string(),
                }),
        }
    }

    /// Bytes per character unit.
    pub fn unit_width(&self) -> usize {
        match self {
            TextEncoding::Utf16Be => 2,
            _ => 1,
        }
    }

    /// Decode a byte span to a string without trimming.
    ///
    /// # Errors
    /// Returns `EncodingError::ConversionFailed` for malformed UTF-8/UTF-16.
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        match self {
            TextEncoding::Ebcdic(cp) => Ok(cp.decode(bytes)),
            TextEncoding::Utf8 => String::from_utf8(bytes.to_vec()).map_err(|e| {
                EncodingError::ConversionFailed {
                    message: format!("invalid UTF-8: {}", e),
                }
            }),
            TextEncoding::Utf16Be => {
                if bytes.len() % 2 != 0 {
                    return Err(EncodingError::ConversionFailed {
                        message: format!("odd byte count {} for UTF-16", bytes.len()),
                    });
                }
                let units = bytes.chunks_exact(2).map(|c| u16::from_be_bytes([c[0], c[1]]));
                char::decode_utf16(units)
                    .collect::<std::result::Result<String, _>>()
                    .map_err(|e| EncodingError::ConversionFailed {
                        message: format!("invalid UTF-16: {}", e),
                    })
            }
        }
    }

    /// Encode a string into this encoding.
    pub fn encode(&self, s: &str) -> Result<Vec<u8>> {
        match self {
            TextEncoding::Ebcdic(cp) => cp.encode(s),
            TextEncoding::Utf8 => Ok(s.as_bytes().to_vec()),
            TextEncoding::Utf16Be => Ok(s.encode_utf16().flat_map(u16::to_be_bytes).collect()),
        }
    }
}

impl PartialEq for TextEncoding {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TextEncoding::Ebcdic(a), TextEncoding::Ebcdic(b)) => a.ccsid == b.ccsid,
            (TextEncoding::Utf8, TextEncoding::Utf8) => true,
            (TextEncoding::Utf16Be, TextEncoding::Utf16Be) => true,
            _ => false,
        }
    }
}

impl Eq for TextEncoding {}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextEncoding::Ebcdic(cp) => f.write_str(cp.name),
            TextEncoding::Utf8 => f.write_str("UTF-8"),
            TextEncoding::Utf16Be => f.write_str("UTF-16BE"),
        }
    }
}
