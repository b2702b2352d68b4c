//! Single-byte EBCDIC translation tables.
//!
//! Every table maps an EBCDIC byte to the ISO-8859-1 byte with the same
//! character. The pages carried here are permutations of Latin-1, so the
//! reverse table is derived at compile time.

/// A single-byte EBCDIC code page.
#[derive(Debug)]
pub struct CodePage {
    /// Display name (e.g. "CP037").
    pub name: &'static str,
    /// IBM Coded Character Set Identifier.
    pub ccsid: u16,
    pub(crate) ebcdic_to_ascii: [u8; 256],
    pub(crate) ascii_to_ebcdic: [u8; 256],
    /// Positions whose character lies outside Latin-1 (e.g. the Euro sign).
    pub(crate) special_chars: &'static [(u8, char)],
}

const fn invert(table: &[u8; 256]) -> [u8; 256] {
    let mut out = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        out[table[i] as usize] = i as u8;
        i += 1;
    }
    out
}

/// CCSID 37: US, Canada, Netherlands, Portugal, Brazil.
pub static CP037: CodePage = CodePage {
    name: "CP037",
    ccsid: 37,
    ebcdic_to_ascii: CP037_TO_LATIN1,
    ascii_to_ebcdic: invert(&CP037_TO_LATIN1),
    special_chars: &[],
};

/// CCSID 500: International Latin-1.
pub static CP500: CodePage = CodePage {
    name: "CP500",
    ccsid: 500,
    ebcdic_to_ascii: CP500_TO_LATIN1,
    ascii_to_ebcdic: invert(&CP500_TO_LATIN1),
    special_chars: &[],
};

/// CCSID 1047: Latin-1 Open Systems (z/OS UNIX).
pub static CP1047: CodePage = CodePage {
    name: "CP1047",
    ccsid: 1047,
    ebcdic_to_ascii: CP1047_TO_LATIN1,
    ascii_to_ebcdic: invert(&CP1047_TO_LATIN1),
    special_chars: &[],
};

/// CCSID 1140: CP037 with the Euro sign at 0x9F.
pub static CP1140: CodePage = CodePage {
    name: "CP1140",
    ccsid: 1140,
    ebcdic_to_ascii: CP037_TO_LATIN1,
    ascii_to_ebcdic: invert(&CP037_TO_LATIN1),
    special_chars: &[(0x9F, '\u{20AC}')],
};

/// Apply national character moves to a base table.
///
/// Each move names an EBCDIC position and the Latin-1 byte it holds in the
/// national page. The moves of a page must permute the base characters.
const fn remap(base: &[u8; 256], moves: &[(u8, u8)]) -> [u8; 256] {
    let mut out = *base;
    let mut i = 0;
    while i < moves.len() {
        out[moves[i].0 as usize] = moves[i].1;
        i += 1;
    }
    out
}

/// CCSID 273: Germany, Austria.
pub static CP273: CodePage = CodePage {
    name: "CP273",
    ccsid: 273,
    ebcdic_to_ascii: CP273_TO_LATIN1,
    ascii_to_ebcdic: invert(&CP273_TO_LATIN1),
    special_chars: &[],
};

/// CCSID 284: Spain, Latin America.
pub static CP284: CodePage = CodePage {
    name: "CP284",
    ccsid: 284,
    ebcdic_to_ascii: CP284_TO_LATIN1,
    ascii_to_ebcdic: invert(&CP284_TO_LATIN1),
    special_chars: &[],
};

/// CCSID 285: United Kingdom.
pub static CP285: CodePage = CodePage {
    name: "CP285",
    ccsid: 285,
    ebcdic_to_ascii: CP285_TO_LATIN1,
    ascii_to_ebcdic: invert(&CP285_TO_LATIN1),
    special_chars: &[],
};

/// CCSID 297: France.
pub static CP297: CodePage = CodePage {
    name: "CP297",
    ccsid: 297,
    ebcdic_to_ascii: CP297_TO_LATIN1,
    ascii_to_ebcdic: invert(&CP297_TO_LATIN1),
    special_chars: &[],
};

const CP273_TO_LATIN1: [u8; 256] = remap(&CP037_TO_LATIN1, CP273_MOVES);
const CP284_TO_LATIN1: [u8; 256] = remap(&CP037_TO_LATIN1, CP284_MOVES);
const CP285_TO_LATIN1: [u8; 256] = remap(&CP037_TO_LATIN1, CP285_MOVES);
const CP297_TO_LATIN1: [u8; 256] = remap(&CP037_TO_LATIN1, CP297_MOVES);

// Differences from CCSID 37, as (EBCDIC position, Latin-1 byte).

#[rustfmt::skip]
const CP273_MOVES: &[(u8, u8)] = &[
    (0x43, b'{'), (0x4A, 0xC4), (0x4F, b'!'), (0x59, b'~'),
    (0x5A, 0xDC), (0x5F, b'^'), (0x63, b'['), (0x6A, 0xF6),
    (0x7C, 0xA7), (0xA1, 0xDF), (0xB0, 0xA2), (0xB5, b'@'),
    (0xBA, 0xAC), (0xBB, b'|'), (0xC0, 0xE4), (0xCC, 0xA6),
    (0xD0, 0xFC), (0xDC, b'}'), (0xE0, 0xD6), (0xEC, b'\\'),
    (0xFC, b']'),
];

#[rustfmt::skip]
const CP284_MOVES: &[(u8, u8)] = &[
    (0x49, 0xA6), (0x4A, b'['), (0x5A, b']'), (0x69, b'#'),
    (0x6A, 0xF1), (0x7B, 0xD1), (0xA1, 0xA8), (0xB0, 0xA2),
    (0xBA, b'^'), (0xBB, b'!'), (0xBD, b'~'),
];

#[rustfmt::skip]
const CP285_MOVES: &[(u8, u8)] = &[
    (0x4A, b'$'), (0x5B, 0xA3), (0xA1, 0xAF), (0xB0, 0xA2),
    (0xB1, b'['), (0xBA, b'^'), (0xBC, b'~'),
];

#[rustfmt::skip]
const CP297_MOVES: &[(u8, u8)] = &[
    (0x44, b'@'), (0x48, b'\\'), (0x4A, 0xB0), (0x4F, b'!'),
    (0x51, b'{'), (0x54, b'}'), (0x5A, 0xA7), (0x5F, b'^'),
    (0x6A, 0xF9), (0x79, 0xB5), (0x7B, 0xA3), (0x7C, 0xE0),
    (0x90, b'['), (0xA0, b'`'), (0xA1, 0xA8), (0xB0, 0xA2),
    (0xB1, b'#'), (0xB5, b']'), (0xBA, 0xAC), (0xBB, b'|'),
    (0xBD, b'~'), (0xC0, 0xE9), (0xD0, 0xE8), (0xDD, 0xA6),
    (0xE0, 0xE7),
];

/// CCSID 37 (US/Canada) to ISO-8859-1.
const CP037_TO_LATIN1: [u8; 256] = [
    0x00, 0x01, 0x02, 0x03, 0x9C, 0x09, 0x86, 0x7F, 0x97, 0x8D, 0x8E, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F, // 0x
    0x10, 0x11, 0x12, 0x13, 0x9D, 0x85, 0x08, 0x87, 0x18, 0x19, 0x92, 0x8F, 0x1C, 0x1D, 0x1E, 0x1F, // 1x
    0x80, 0x81, 0x82, 0x83, 0x84, 0x0A, 0x17, 0x1B, 0x88, 0x89, 0x8A, 0x8B, 0x8C, 0x05, 0x06, 0x07, // 2x
    0x90, 0x91, 0x16, 0x93, 0x94, 0x95, 0x96, 0x04, 0x98, 0x99, 0x9A, 0x9B, 0x14, 0x15, 0x9E, 0x1A, // 3x
    0x20, 0xA0, 0xE2, 0xE4, 0xE0, 0xE1, 0xE3, 0xE5, 0xE7, 0xF1, 0xA2, 0x2E, 0x3C, 0x28, 0x2B, 0x7C, // 4x
    0x26, 0xE9, 0xEA, 0xEB, 0xE8, 0xED, 0xEE, 0xEF, 0xEC, 0xDF, 0x21, 0x24, 0x2A, 0x29, 0x3B, 0xAC, // 5x
    0x2D, 0x2F, 0xC2, 0xC4, 0xC0, 0xC1, 0xC3, 0xC5, 0xC7, 0xD1, 0xA6, 0x2C, 0x25, 0x5F, 0x3E, 0x3F, // 6x
    0xF8, 0xC9, 0xCA, 0xCB, 0xC8, 0xCD, 0xCE, 0xCF, 0xCC, 0x60, 0x3A, 0x23, 0x40, 0x27, 0x3D, 0x22, // 7x
    0xD8, 0x61, 0x62, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68, 0x69, 0xAB, 0xBB, 0xF0, 0xFD, 0xFE, 0xB1, // 8x
    0xB0, 0x6A, 0x6B, 0x6C, 0x6D, 0x6E, 0x6F, 0x70, 0x71, 0x72, 0xAA, 0xBA, 0xE6, 0xB8, 0xC6, 0xA4, // 9x
    0xB5, 0x7E, 0x73, 0x74, 0x75, 0x76, 0x77, 0x78, 0x79, 0x7A, 0xA1, 0xBF, 0xD0, 0xDD, 0xDE, 0xAE, // Ax
    0x5E, 0xA3, 0xA5, 0xB7, 0xA9, 0xA7, 0xB6, 0xBC, 0xBD, 0xBE, 0x5B, 0x5D, 0xAF, 0xA8, 0xB4, 0xD7, // Bx
    0x7B, 0x41, 0x42, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48, 0x49, 0xAD, 0xF4, 0xF6, 0xF2, 0xF3, 0xF5, // Cx
    0x7D, 0x4A, 0x4B, 0x4C, 0x4D, 0x4E, 0x4F, 0x50, 0x51, 0x52, 0xB9, 0xFB, 0xFC, 0xF9, 0xFA, 0xFF, // Dx
    0x5C, 0xF7, 0x53, 0x54, 0x55, 0x56, 0x57, 0x58, 0x59, 0x5A, 0xB2, 0xD4, 0xD6, 0xD2, 0xD3, 0xD5, // Ex
    0x30, 0x31, 0x32, 0x33, 0x34, 0x35, 0x36, 0x37, 0x38, 0x39, 0xB3, 0xDB, 0xDC, 0xD9, 0xDA, 0x9F, // Fx
];

/// CCSID 500 (International) to ISO-8859-1.
const CP500_TO_LATIN1: [u8; 256] = [
    0x00, 0x01, 0x02, 0x03, 0x9C, 0x09, 0x86, 0x7F, 0x97, 0x8D, 0x8E, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F, // 0x
    0x10, 0x11, 0x12, 0x13, 0x9D, 0x85, 0x08, 0x87, 0x18, 0x19, 0x92, 0x8F, 0x1C, 0x1D, 0x1E, 0x1F, // 1x
    0x80, 0x81, 0x82, 0x83, 0x84, 0x0A, 0x17, 0x1B, 0x88, 0x89, 0x8A, 0x8B, 0x8C, 0x05, 0x06, 0x07, // 2x
    0x90, 0x91, 0x16, 0x93, 0x94, 0x95, 0x96, 0x04, 0x98, 0x99, 0x9A, 0x9B, 0x14, 0x15, 0x9E, 0x1A, // 3x
    0x20, 0xA0, 0xE2, 0xE4, 0xE0, 0xE1, 0xE3, 0xE5, 0xE7, 0xF1, 0x5B, 0x2E, 0x3C, 0x28, 0x2B, 0x21, // 4x
    0x26, 0xE9, 0xEA, 0xEB, 0xE8, 0xED, 0xEE, 0xEF, 0xEC, 0xDF, 0x5D, 0x24, 0x2A, 0x29, 0x3B, 0x5E, // 5x
    0x2D, 0x2F, 0xC2, 0xC4, 0xC0, 0xC1, 0xC3, 0xC5, 0xC7, 0xD1, 0xA6, 0x2C, 0x25, 0x5F, 0x3E, 0x3F, // 6x
    0xF8, 0xC9, 0xCA, 0xCB, 0xC8, 0xCD, 0xCE, 0xCF, 0xCC, 0x60, 0x3A, 0x23, 0x40, 0x27, 0x3D, 0x22, // 7x
    0xD8, 0x61, 0x62, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68, 0x69, 0xAB, 0xBB, 0xF0, 0xFD, 0xFE, 0xB1, // 8x
    0xB0, 0x6A, 0x6B, 0x6C, 0x6D, 0x6E, 0x6F, 0x70, 0x71, 0x72, 0xAA, 0xBA, 0xE6, 0xB8, 0xC6, 0xA4, // 9x
    0xB5, 0x7E, 0x73, 0x74, 0x75, 0x76, 0x77, 0x78, 0x79, 0x7A, 0xA1, 0xBF, 0xD0, 0xDD, 0xDE, 0xAE, // Ax
    0xA2, 0xA3, 0xA5, 0xB7, 0xA9, 0xA7, 0xB6, 0xBC, 0xBD, 0xBE, 0xAC, 0x7C, 0xAF, 0xA8, 0xB4, 0xD7, // Bx
    0x7B, 0x41, 0x42, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48, 0x49, 0xAD, 0xF4, 0xF6, 0xF2, 0xF3, 0xF5, // Cx
    0x7D, 0x4A, 0x4B, 0x4C, 0x4D, 0x4E, 0x4F, 0x50, 0x51, 0x52, 0xB9, 0xFB, 0xFC, 0xF9, 0xFA, 0xFF, // Dx
    0x5C, 0xF7, 0x53, 0x54, 0x55, 0x56, 0x57, 0x58, 0x59, 0x5A, 0xB2, 0xD4, 0xD6, 0xD2, 0xD3, 0xD5, // Ex
    0x30, 0x31, 0x32, 0x33, 0x34, 0x35, 0x36, 0x37, 0x38, 0x39, 0xB3, 0xDB, 0xDC, 0xD9, 0xDA, 0x9F, // Fx
];

/// CCSID 1047 (Open Systems Latin-1) to ISO-8859-1.
const CP1047_TO_LATIN1: [u8; 256] = [
    0x00, 0x01, 0x02, 0x03, 0x9C, 0x09, 0x86, 0x7F, 0x97, 0x8D, 0x8E, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F, // 0x
    0x10, 0x11, 0x12, 0x13, 0x9D, 0x85, 0x08, 0x87, 0x18, 0x19, 0x92, 0x8F, 0x1C, 0x1D, 0x1E, 0x1F, // 1x
    0x80, 0x81, 0x82, 0x83, 0x84, 0x0A, 0x17, 0x1B, 0x88, 0x89, 0x8A, 0x8B, 0x8C, 0x05, 0x06, 0x07, // 2x
    0x90, 0x91, 0x16, 0x93, 0x94, 0x95, 0x96, 0x04, 0x98, 0x99, 0x9A, 0x9B, 0x14, 0x15, 0x9E, 0x1A, // 3x
    0x20, 0xA0, 0xE2, 0xE4, 0xE0, 0xE1, 0xE3, 0xE5, 0xE7, 0xF1, 0xA2, 0x2E, 0x3C, 0x28, 0x2B, 0x7C, // 4x
    0x26, 0xE9, 0xEA, 0xEB, 0xE8, 0xED, 0xEE, 0xEF, 0xEC, 0xDF, 0x21, 0x24, 0x2A, 0x29, 0x3B, 0x5E, // 5x
    0x2D, 0x2F, 0xC2, 0xC4, 0xC0, 0xC1, 0xC3, 0xC5, 0xC7, 0xD1, 0xA6, 0x2C, 0x25, 0x5F, 0x3E, 0x3F, // 6x
    0xF8, 0xC9, 0xCA, 0xCB, 0xC8, 0xCD, 0xCE, 0xCF, 0xCC, 0x60, 0x3A, 0x23, 0x40, 0x27, 0x3D, 0x22, // 7x
    0xD8, 0x61, 0x62, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68, 0x69, 0xAB, 0xBB, 0xF0, 0xFD, 0xFE, 0xB1, // 8x
    0xB0, 0x6A, 0x6B, 0x6C, 0x6D, 0x6E, 0x6F, 0x70, 0x71, 0x72, 0xAA, 0xBA, 0xE6, 0xB8, 0xC6, 0xA4, // 9x
    0xB5, 0x7E, 0x73, 0x74, 0x75, 0x76, 0x77, 0x78, 0x79, 0x7A, 0xA1, 0xBF, 0xD0, 0x5B, 0xDE, 0xAE, // Ax
    0xAC, 0xA3, 0xA5, 0xB7, 0xA9, 0xA7, 0xB6, 0xBC, 0xBD, 0xBE, 0xDD, 0xA8, 0xAF, 0x5D, 0xB4, 0xD7, // Bx
    0x7B, 0x41, 0x42, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48, 0x49, 0xAD, 0xF4, 0xF6, 0xF2, 0xF3, 0xF5, // Cx
    0x7D, 0x4A, 0x4B, 0x4C, 0x4D, 0x4E, 0x4F, 0x50, 0x51, 0x52, 0xB9, 0xFB, 0xFC, 0xF9, 0xFA, 0xFF, // Dx
    0x5C, 0xF7, 0x53, 0x54, 0x55, 0x56, 0x57, 0x58, 0x59, 0x5A, 0xB2, 0xD4, 0xD6, 0xD2, 0xD3, 0xD5, // Ex
    0x30, 0x31, 0x32, 0x33, 0x34, 0x35, 0x36, 0x37, 0x38, 0x39, 0xB3, 0xDB, 0xDC, 0xD9, 0xDA, 0x9F, // Fx
];
