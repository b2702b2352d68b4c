//! Lookup of code pages by CCSID or name.

use super::tables::{CodePage, CP037, CP1047, CP1140, CP273, CP284, CP285, CP297, CP500};
use crate::error::EncodingError;

static ALL: [&CodePage; 8] = [
    &CP037, &CP500, &CP1047, &CP1140, &CP273, &CP284, &CP285, &CP297,
];

/// Registry of the built-in EBCDIC code pages.
pub struct CodePageRegistry;

impl CodePageRegistry {
    /// All registered code pages.
    pub fn all() -> &'static [&'static CodePage] {
        &ALL
    }

    /// Look up a code page by CCSID.
    pub fn from_ccsid(ccsid: u16) -> Result<&'static CodePage, EncodingError> {
        ALL.iter()
            .copied()
            .find(|cp| cp.ccsid == ccsid)
            .ok_or_else(|| EncodingError::InvalidCodePage {
                name: ccsid.to_string(),
            })
    }

    /// Look up a code page by name.
    ///
    /// Accepts "CP037", "IBM-037", "IBM037", "EBCDIC-037", "CCSID37" and the
    /// bare number "037" / "37", case-insensitively.
    pub fn by_name(name: &str) -> Result<&'static CodePage, EncodingError> {
        let upper = name.trim().to_ascii_uppercase();
        let digits = ["EBCDIC-", "CCSID", "IBM-", "IBM", "CP"]
            .iter()
            .find_map(|prefix| upper.strip_prefix(prefix))
            .unwrap_or(&upper);

        match digits.parse::<u16>() {
            Ok(ccsid) => Self::from_ccsid(ccsid).map_err(|_| EncodingError::InvalidCodePage {
                name: name.to_string(),
            }),
            Err(_) => Err(EncodingError::InvalidCodePage {
                name: name.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_name_variants() {
        for name in ["CP037", "cp037", "IBM-037", "IBM037", "EBCDIC-037", "037", "37"] {
            assert_eq!(CodePageRegistry::by_name(name).unwrap().ccsid, 37, "{name}");
        }
        assert_eq!(CodePageRegistry::by_name("IBM-1047").unwrap().ccsid, 1047);
    }

    #[test]
    fn test_national_pages_registered() {
        for ccsid in [273, 284, 285, 297] {
            assert_eq!(CodePageRegistry::from_ccsid(ccsid).unwrap().ccsid, ccsid);
        }
        assert_eq!(CodePageRegistry::by_name("IBM-285").unwrap().name, "CP285");
        assert_eq!(CodePageRegistry::by_name("273").unwrap().name, "CP273");
        assert_eq!(CodePageRegistry::all().len(), 8);
    }

    #[test]
    fn test_unknown() {
        assert!(matches!(
            CodePageRegistry::by_name("CP9999"),
            Err(EncodingError::InvalidCodePage { .. })
        ));
        for ccsid in [930, 935, 937] {
            assert!(CodePageRegistry::from_ccsid(ccsid).is_err());
        }
    }
}
