//! EBCDIC encoding support for IBM mainframe code pages.
//!
//! Provides EBCDIC-to-Unicode and Unicode-to-EBCDIC conversion for the
//! single-byte code pages most often found in DB2 unloads and VSAM extracts.
//!
//! # Supported Code Pages
//!
//! - **Base pages:** CP037, CP500, CP1047
//! - **National pages:** CP273, CP284, CP285, CP297
//! - **Euro-enabled:** CP1140
//!
//! Mixed single/double-byte pages (CCSID 930, 935, 937) are not carried.
//!
//! Use [`CodePageRegistry`] or [`CodePage::from_ccsid`] for runtime lookup.

mod registry;
mod tables;

pub use registry::CodePageRegistry;
pub use tables::{CodePage, CP037, CP1047, CP1140, CP273, CP284, CP285, CP297, CP500};

use crate::error::EncodingError;

/// Result type for encoding operations.
pub type Result<T> = std::result::Result<T, EncodingError>;

impl CodePage {
    /// Decode EBCDIC bytes to a UTF-8 string.
    ///
    /// Every byte maps to exactly one character, so decoding never fails and
    /// pad characters (0x40) are preserved.
    pub fn decode(&self, bytes: &[u8]) -> String {
        bytes.iter().map(|&b| self.ebcdic_to_char(b)).collect()
    }

    /// Encode a UTF-8 string to EBCDIC bytes.
    ///
    /// # Errors
    /// Returns `EncodingError::UnmappableCharacter` if the string contains
    /// characters that cannot be represented in this code page.
    pub fn encode(&self, s: &str) -> Result<Vec<u8>> {
        let mut result = Vec::with_capacity(s.len());

        for ch in s.chars() {
            if let Some(&(eb, _)) = self.special_chars.iter().find(|&&(_, c)| c == ch) {
                result.push(eb);
                continue;
            }

            let unmappable = || EncodingError::UnmappableCharacter {
                ch,
                code: ch as u32,
                encoding: self.name.to_string(),
            };
            let latin1 = u8::try_from(ch as u32).map_err(|_| unmappable())?;
            let eb = self.ascii_to_ebcdic[latin1 as usize];
            // The Latin-1 character displaced by a special character has no slot.
            if self.special_chars.iter().any(|&(pos, _)| pos == eb) {
                return Err(unmappable());
            }
            result.push(eb);
        }

        Ok(result)
    }

    /// Convert a single EBCDIC byte to its Unicode character.
    pub fn ebcdic_to_char(&self, ebcdic: u8) -> char {
        if let Some(&(_, ch)) = self.special_chars.iter().find(|&&(eb, _)| eb == ebcdic) {
            ch
        } else {
            char::from(self.ebcdic_to_ascii[ebcdic as usize])
        }
    }

    /// Convert a single EBCDIC byte to its Latin-1 byte.
    ///
    /// Does not account for special characters such as the Euro sign.
    #[inline]
    pub fn ebcdic_to_ascii_byte(&self, ebcdic: u8) -> u8 {
        self.ebcdic_to_ascii[ebcdic as usize]
    }

    /// Convert a single Latin-1 byte to EBCDIC.
    #[inline]
    pub fn ascii_to_ebcdic_byte(&self, ascii: u8) -> u8 {
        self.ascii_to_ebcdic[ascii as usize]
    }

    /// Look up a code page by CCSID number.
    pub fn from_ccsid(ccsid: u16) -> Result<&'static CodePage> {
        CodePageRegistry::from_ccsid(ccsid)
    }

    /// Look up a code page by name (e.g., "CP037", "IBM-1047").
    pub fn by_name(name: &str) -> Result<&'static CodePage> {
        CodePageRegistry::by_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cp037_roundtrip() {
        let original = "HELLO WORLD";
        let encoded = CP037.encode(original).unwrap();
        assert_eq!(CP037.decode(&encoded), original);
    }

    #[test]
    fn test_hello_cp037() {
        assert_eq!(
            CP037.encode("HELLO").unwrap(),
            vec![0xC8, 0xC5, 0xD3, 0xD3, 0xD6]
        );
        assert_eq!(CP037.decode(&[0xC8, 0x85, 0x93, 0x93, 0x96]), "Hello");
    }

    #[test]
    fn test_digits_cp037() {
        assert_eq!(
            CP037.encode("0123456789").unwrap(),
            vec![0xF0, 0xF1, 0xF2, 0xF3, 0xF4, 0xF5, 0xF6, 0xF7, 0xF8, 0xF9]
        );
    }

    #[test]
    fn test_trailing_pad_preserved() {
        assert_eq!(CP037.decode(&[0xC1, 0x40, 0x40]), "A  ");
    }

    #[test]
    fn test_brackets_differ_between_037_and_1047() {
        assert_eq!(CP037.ebcdic_to_char(0xBA), '[');
        assert_eq!(CP1047.ebcdic_to_char(0xAD), '[');
        assert_eq!(CP037.ebcdic_to_char(0x5F), '¬');
        assert_eq!(CP1047.ebcdic_to_char(0x5F), '^');
        assert_eq!(CP500.ebcdic_to_char(0x4A), '[');
    }

    #[test]
    fn test_all_pages_roundtrip_all_bytes() {
        for cp in CodePageRegistry::all() {
            for b in 0u8..=255 {
                let decoded = cp.decode(&[b]);
                assert_eq!(
                    cp.encode(&decoded).unwrap(),
                    vec![b],
                    "{}: roundtrip failed for byte 0x{:02X}",
                    cp.name,
                    b
                );
            }
        }
    }

    #[test]
    fn test_cp1140_euro() {
        assert_eq!(CP1140.decode(&[0x9F]), "€");
        assert_eq!(CP1140.encode("€").unwrap(), vec![0x9F]);
        assert!(CP1140.encode("¤").is_err());
    }

    #[test]
    fn test_cp1140_same_as_cp037_except_9f() {
        for i in 0u8..=255 {
            if i != 0x9F {
                assert_eq!(CP1140.ebcdic_to_char(i), CP037.ebcdic_to_char(i));
            }
        }
    }

    #[test]
    fn test_cp273_german() {
        assert_eq!(CP273.ebcdic_to_char(0xC0), 'ä');
        assert_eq!(CP273.ebcdic_to_char(0x6A), 'ö');
        assert_eq!(CP273.ebcdic_to_char(0xD0), 'ü');
        assert_eq!(CP273.ebcdic_to_char(0xA1), 'ß');
        assert_eq!(CP273.ebcdic_to_char(0x4A), 'Ä');
        assert_eq!(CP273.ebcdic_to_char(0xE0), 'Ö');
        assert_eq!(CP273.ebcdic_to_char(0x5A), 'Ü');
        assert_eq!(CP273.encode("Straße").unwrap()[4], 0xA1);
    }

    #[test]
    fn test_cp284_spanish() {
        assert_eq!(CP284.ebcdic_to_char(0x7B), 'Ñ');
        assert_eq!(CP284.ebcdic_to_char(0x6A), 'ñ');
        assert_eq!(CP284.ebcdic_to_char(0x4A), '[');
        assert_eq!(CP284.ebcdic_to_char(0x5A), ']');
    }

    #[test]
    fn test_cp285_uk() {
        assert_eq!(CP285.ebcdic_to_char(0x5B), '£');
        assert_eq!(CP285.ebcdic_to_char(0x4A), '$');
        assert_eq!(CP285.encode("£10").unwrap(), vec![0x5B, 0xF1, 0xF0]);
    }

    #[test]
    fn test_cp297_french() {
        assert_eq!(CP297.ebcdic_to_char(0xC0), 'é');
        assert_eq!(CP297.ebcdic_to_char(0xD0), 'è');
        assert_eq!(CP297.ebcdic_to_char(0x7C), 'à');
        assert_eq!(CP297.ebcdic_to_char(0x6A), 'ù');
        assert_eq!(CP297.ebcdic_to_char(0xE0), 'ç');
    }

    #[test]
    fn test_national_pages_share_invariant_characters() {
        for cp in [&CP273, &CP284, &CP285, &CP297] {
            assert_eq!(cp.decode(&[0xC8, 0x85, 0x93, 0x93, 0x96]), "Hello", "{}", cp.name);
            assert_eq!(cp.encode("0 9").unwrap(), vec![0xF0, 0x40, 0xF9], "{}", cp.name);
        }
    }

    #[test]
    fn test_encode_unsupported_char() {
        let err = CP037.encode("€").unwrap_err();
        assert!(matches!(err, EncodingError::UnmappableCharacter { .. }));
    }
}
