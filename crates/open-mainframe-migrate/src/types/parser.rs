//! Type declaration parser.
//!
//! Turns one DB2 column type (`DECIMAL(15,4)`, `VARCHAR(40) FOR BIT DATA`)
//! or COBOL picture clause (`PIC S9(7)V99 COMP-3`) into a
//! [`TypeDescriptor`]. Parsing never fails: a declaration no rule accepts
//! becomes [`TypeKind::Unsupported`].
//!
//! Rules are tried in this order, first match wins:
//!
//! | # | Rule                | Examples                                   |
//! |---|---------------------|--------------------------------------------|
//! | 1 | numeric precision   | `DECIMAL(p,s)`, `NUMERIC(p)`, `DECFLOAT(34)`, `FLOAT(n)` |
//! | 2 | sized text/binary   | `CHAR(n)`, `VARGRAPHIC(n)`, `BLOB(2M)`, `... FOR BIT DATA` |
//! | 3 | picture clause      | `PIC S9(5)V99 COMP-3`, `PIC X(10)`, `COMP-2` |
//! | 4 | bare keyword        | `INTEGER`, `DATE`, `TIME`, `ROWID`         |
//! | 5 | timestamp           | `TIMESTAMP(9) WITH TIME ZONE`              |
//! | 6 | fallback            | anything else                              |

use tracing::trace;

use super::descriptor::{TypeDescriptor, TypeKind};

/// Largest decimal precision an exact value can carry.
pub const MAX_PRECISION: u32 = 38;

/// Largest binary-integer digit count.
pub const MAX_BINARY_DIGITS: u32 = 18;

/// Largest timestamp fractional precision.
pub const MAX_TIMESTAMP_PRECISION: u32 = 12;

/// Largest declared length, the DB2 LOB limit.
pub const MAX_LENGTH: usize = 2_147_483_647;

const DEFAULT_TIMESTAMP_PRECISION: u8 = 6;
const DEFAULT_LOB_LENGTH: usize = 1024 * 1024;

/// One entry of the rule table.
struct Rule {
    name: &'static str,
    extract: fn(&str) -> Option<TypeDescriptor>,
}

const RULES: &[Rule] = &[
    Rule {
        name: "numeric-precision",
        extract: numeric_precision,
    },
    Rule {
        name: "sized-text-binary",
        extract: sized_text_binary,
    },
    Rule {
        name: "picture-clause",
        extract: picture_clause,
    },
    Rule {
        name: "keyword",
        extract: bare_keyword,
    },
    Rule {
        name: "timestamp",
        extract: timestamp,
    },
];

/// Parse a type declaration.
///
/// Case, surrounding whitespace, a trailing period and trailing
/// `NOT NULL` / `WITH DEFAULT` qualifiers are ignored. A `CCSID n`
/// qualifier is captured on the descriptor.
pub fn parse_declaration(declaration: &str) -> TypeDescriptor {
    let normalized = normalize(declaration);
    let body = strip_qualifiers(&normalized);
    let (body, ccsid) = extract_ccsid(body);

    let parsed = RULES
        .iter()
        .find_map(|rule| (rule.extract)(&body).map(|descriptor| (rule.name, descriptor)));

    let descriptor = match parsed {
        Some((rule, descriptor)) => {
            trace!(declaration = %body, rule, kind = ?descriptor.kind, "parsed type declaration");
            descriptor
        }
        None => {
            trace!(declaration = %body, "no rule matched type declaration");
            let length = first_parenthesized_number(&body)
                .filter(|&n| n <= MAX_LENGTH)
                .unwrap_or(0);
            TypeDescriptor::unsupported(length)
        }
    };

    descriptor.with_declaration(&body).with_ccsid(ccsid)
}

impl TypeDescriptor {
    /// Parse a type declaration; see [`parse_declaration`].
    pub fn parse(declaration: &str) -> Self {
        parse_declaration(declaration)
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Uppercase, collapse whitespace and drop spaces around `(`, `)` and `,`.
fn normalize(declaration: &str) -> String {
    let upper = declaration
        .trim()
        .trim_end_matches(['.', ',', ';'])
        .to_ascii_uppercase();
    let collapsed = upper.split_whitespace().collect::<Vec<_>>().join(" ");

    let chars: Vec<char> = collapsed.chars().collect();
    let mut out = String::with_capacity(collapsed.len());
    for (i, &c) in chars.iter().enumerate() {
        if c == ' ' {
            let prev = out.chars().last();
            let next = chars.get(i + 1).copied();
            if matches!(prev, Some('(' | ','))
                || matches!(next, Some('(' | ')' | ','))
            {
                continue;
            }
        }
        out.push(c);
    }
    out
}

const QUALIFIERS: &[&str] = &[
    " NOT NULL",
    " WITH DEFAULT",
    " DEFAULT",
    " PRIMARY KEY",
    " UNIQUE",
    " REFERENCES ",
    " GENERATED ",
];

/// Cut trailing column qualifiers that do not affect the type.
fn strip_qualifiers(declaration: &str) -> &str {
    let cut = QUALIFIERS
        .iter()
        .filter_map(|q| declaration.find(q))
        .min()
        .unwrap_or(declaration.len());
    declaration[..cut].trim_end()
}

/// Remove a numeric `CCSID n` qualifier, returning it separately.
fn extract_ccsid(declaration: &str) -> (String, Option<u16>) {
    let Some(pos) = declaration.find(" CCSID ") else {
        return (declaration.to_string(), None);
    };
    let after = &declaration[pos + " CCSID ".len()..];
    let (token, rest) = after.split_once(' ').unwrap_or((after, ""));
    match token.parse::<u16>() {
        Ok(ccsid) => {
            let mut body = declaration[..pos].to_string();
            if !rest.is_empty() {
                body.push(' ');
                body.push_str(rest);
            }
            (body, Some(ccsid))
        }
        Err(_) => (declaration.to_string(), None),
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// `KEYWORD(args)rest` -> `(args, rest)`; the `(` must follow the keyword.
fn call_args<'a>(declaration: &'a str, keyword: &str) -> Option<(&'a str, &'a str)> {
    let after = declaration.strip_prefix(keyword)?.strip_prefix('(')?;
    let (args, rest) = after.split_once(')')?;
    Some((args, rest.trim_start()))
}

/// `KEYWORD` or `KEYWORD rest` -> `rest`.
fn keyword_rest<'a>(declaration: &'a str, keyword: &str) -> Option<&'a str> {
    let after = declaration.strip_prefix(keyword)?;
    if after.is_empty() {
        Some(after)
    } else {
        after.strip_prefix(' ')
    }
}

fn first_parenthesized_number(declaration: &str) -> Option<usize> {
    let (_, after) = declaration.split_once('(')?;
    let digits: String = after.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

fn decimal_descriptor(precision: u32, scale: u32) -> TypeDescriptor {
    if precision == 0 || precision > MAX_PRECISION || scale > precision {
        return TypeDescriptor::unsupported(0);
    }
    // Both bounded by MAX_PRECISION above.
    TypeDescriptor::packed(precision as u8, scale as u8)
}

fn has_bit_data(rest: &str) -> bool {
    rest.contains("FOR BIT DATA")
}

// ---------------------------------------------------------------------------
// Rule 1: numeric precision
// ---------------------------------------------------------------------------

fn numeric_precision(declaration: &str) -> Option<TypeDescriptor> {
    for keyword in ["DECIMAL", "NUMERIC", "DEC", "NUM"] {
        if let Some((args, _)) = call_args(declaration, keyword) {
            let (p, s) = args.split_once(',').unwrap_or((args, "0"));
            return Some(match (p.parse::<u32>(), s.parse::<u32>()) {
                (Ok(p), Ok(s)) => decimal_descriptor(p, s),
                _ => TypeDescriptor::unsupported(0),
            });
        }
    }

    if let Some((args, _)) = call_args(declaration, "DECFLOAT") {
        return Some(match args.parse::<u32>() {
            Ok(p) => decimal_descriptor(p, 0),
            Err(_) => TypeDescriptor::unsupported(0),
        });
    }

    if let Some((args, _)) = call_args(declaration, "FLOAT") {
        return Some(match args.parse::<u32>() {
            Ok(1..=21) => TypeDescriptor::simple(TypeKind::Float32),
            Ok(22..=53) => TypeDescriptor::simple(TypeKind::Float64),
            _ => TypeDescriptor::unsupported(0),
        });
    }

    None
}

// ---------------------------------------------------------------------------
// Rule 2: sized text and binary
// ---------------------------------------------------------------------------

const SIZED_TYPES: &[(&str, TypeKind, bool)] = &[
    ("CHARACTER VARYING", TypeKind::VariableText, false),
    ("LONG VARGRAPHIC", TypeKind::VariableText, true),
    ("CHAR VARYING", TypeKind::VariableText, false),
    ("LONG VARCHAR", TypeKind::VariableText, false),
    ("VARGRAPHIC", TypeKind::VariableText, true),
    ("VARBINARY", TypeKind::VariableBinary, false),
    ("CHARACTER", TypeKind::FixedText, false),
    ("VARCHAR", TypeKind::VariableText, false),
    ("GRAPHIC", TypeKind::FixedText, true),
    ("BINARY", TypeKind::FixedBinary, false),
    ("CHAR", TypeKind::FixedText, false),
];

const LOB_TYPES: &[(&str, TypeKind, bool)] = &[
    ("DBCLOB", TypeKind::VariableText, true),
    ("CLOB", TypeKind::VariableText, false),
    ("BLOB", TypeKind::VariableBinary, false),
];

fn sized_text_binary(declaration: &str) -> Option<TypeDescriptor> {
    for &(keyword, kind, double_byte) in SIZED_TYPES {
        if let Some((args, rest)) = call_args(declaration, keyword) {
            let length = match args.parse::<usize>() {
                Ok(n) if n > 0 && n <= MAX_LENGTH => n,
                _ => return Some(TypeDescriptor::unsupported(0)),
            };
            let kind = if has_bit_data(rest) && !double_byte {
                bit_data_kind(kind)
            } else {
                kind
            };
            return Some(TypeDescriptor::sized(kind, length, double_byte));
        }
    }

    for &(keyword, kind, double_byte) in LOB_TYPES {
        if let Some((args, _)) = call_args(declaration, keyword) {
            return Some(match lob_length(args) {
                Some(length) => TypeDescriptor::sized(kind, length, double_byte),
                None => TypeDescriptor::unsupported(0),
            });
        }
    }

    None
}

fn bit_data_kind(kind: TypeKind) -> TypeKind {
    match kind {
        TypeKind::FixedText => TypeKind::FixedBinary,
        TypeKind::VariableText => TypeKind::VariableBinary,
        other => other,
    }
}

/// `n`, `nK`, `nM` or `nG`.
fn lob_length(args: &str) -> Option<usize> {
    let compact: String = args.chars().filter(|c| !c.is_whitespace()).collect();
    let (digits, multiplier) = match compact.chars().last()? {
        'K' => (&compact[..compact.len() - 1], 1024),
        'M' => (&compact[..compact.len() - 1], 1024 * 1024),
        'G' => (&compact[..compact.len() - 1], 1024 * 1024 * 1024),
        _ => (compact.as_str(), 1),
    };
    let n: usize = digits.parse().ok()?;
    // BLOB(2G) is accepted and means the largest LOB.
    n.checked_mul(multiplier)
        .filter(|&len| len > 0)
        .map(|len| len.min(MAX_LENGTH))
}

// ---------------------------------------------------------------------------
// Rule 3: picture clauses
// ---------------------------------------------------------------------------

/// Storage family selected by a USAGE clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Usage {
    Display,
    Binary,
    Packed,
    Float32,
    Float64,
}

/// Usage suffixes, longest first so `COMPUTATIONAL-3` is never read as
/// `COMPUTATIONAL` and `COMP-5` never as `COMP`.
const USAGE_SUFFIXES: &[(&str, Usage)] = &[
    ("COMPUTATIONAL-1", Usage::Float32),
    ("COMPUTATIONAL-2", Usage::Float64),
    ("COMPUTATIONAL-3", Usage::Packed),
    ("COMPUTATIONAL-4", Usage::Binary),
    ("COMPUTATIONAL-5", Usage::Binary),
    ("PACKED-DECIMAL", Usage::Packed),
    ("COMPUTATIONAL", Usage::Binary),
    ("DISPLAY", Usage::Display),
    ("BINARY", Usage::Binary),
    ("COMP-1", Usage::Float32),
    ("COMP-2", Usage::Float64),
    ("COMP-3", Usage::Packed),
    ("COMP-4", Usage::Binary),
    ("COMP-5", Usage::Binary),
    ("COMP", Usage::Binary),
];

/// Resolve the usage clause that follows a picture string.
///
/// `Some(None)` means no usage was written; `None` means the text is not a
/// usage clause this parser understands.
fn usage_clause(text: &str) -> Option<Option<Usage>> {
    if text.is_empty() {
        return Some(None);
    }
    USAGE_SUFFIXES.iter().find_map(|&(suffix, usage)| {
        let head = text.strip_suffix(suffix)?;
        matches!(head, "" | "USAGE " | "USAGE IS ").then_some(Some(usage))
    })
}

/// Symbol counts of a picture string.
///
/// The counts together never exceed [`MAX_LENGTH`], so their sums cannot
/// overflow.
#[derive(Debug, Default)]
struct Picture {
    signed: bool,
    integer_digits: usize,
    scale_digits: usize,
    alphanumeric: usize,
    graphic: usize,
    edited: usize,
}

impl Picture {
    fn parse(picture: &str) -> Option<Self> {
        let chars: Vec<char> = picture.chars().collect();
        let mut pic = Picture::default();
        let mut after_point = false;
        let mut total = 0usize;
        let mut i = 0;

        while i < chars.len() {
            let symbol = chars[i];
            i += 1;

            let mut count = 1usize;
            if chars.get(i) == Some(&'(') {
                let close = chars[i..].iter().position(|&c| c == ')')? + i;
                let digits: String = chars[i + 1..close].iter().collect();
                count = digits.parse().ok().filter(|&n| n > 0)?;
                i = close + 1;
            }
            total = total.checked_add(count).filter(|&n| n <= MAX_LENGTH)?;

            match symbol {
                'S' if pic.is_empty() && count == 1 => pic.signed = true,
                'V' if !after_point && count == 1 => after_point = true,
                '9' if after_point => pic.scale_digits += count,
                '9' => pic.integer_digits += count,
                'X' | 'A' => pic.alphanumeric += count,
                'G' | 'N' => pic.graphic += count,
                'Z' | '*' | 'B' | '0' | '/' | ',' | '.' | '+' | '-' | '$' | 'C' | 'R' | 'D' => {
                    pic.edited += count
                }
                _ => return None,
            }
        }

        Some(pic)
    }

    fn is_empty(&self) -> bool {
        self.integer_digits == 0
            && self.scale_digits == 0
            && self.alphanumeric == 0
            && self.graphic == 0
            && self.edited == 0
    }

    fn digits(&self) -> usize {
        self.integer_digits + self.scale_digits
    }

    fn describe(&self, usage: Option<Usage>) -> TypeDescriptor {
        let display = matches!(usage, None | Some(Usage::Display));

        if self.graphic > 0 {
            if self.digits() + self.alphanumeric + self.edited > 0 {
                return TypeDescriptor::unsupported(0);
            }
            return TypeDescriptor::sized(TypeKind::FixedText, self.graphic, true);
        }

        if self.alphanumeric > 0 || self.edited > 0 {
            if !display || self.signed {
                return TypeDescriptor::unsupported(0);
            }
            let length = self.digits() + self.alphanumeric + self.edited;
            return TypeDescriptor::sized(TypeKind::FixedText, length, false);
        }

        let digits = self.digits();
        if digits == 0 || digits > MAX_PRECISION as usize {
            return TypeDescriptor::unsupported(0);
        }
        // Bounded by MAX_PRECISION above.
        let (total, scale) = (digits as u8, self.scale_digits as u8);

        match usage {
            None | Some(Usage::Display) => {
                TypeDescriptor::numeric(TypeKind::ZonedInteger, total, scale, self.signed)
            }
            Some(Usage::Packed) => {
                TypeDescriptor::numeric(TypeKind::PackedDecimal, total, scale, self.signed)
            }
            Some(Usage::Binary) if digits <= MAX_BINARY_DIGITS as usize => {
                TypeDescriptor::numeric(TypeKind::BinaryInteger, total, scale, self.signed)
            }
            Some(Usage::Binary) | Some(Usage::Float32) | Some(Usage::Float64) => {
                TypeDescriptor::unsupported(0)
            }
        }
    }
}

fn picture_clause(declaration: &str) -> Option<TypeDescriptor> {
    let rest = keyword_rest(declaration, "PICTURE")
        .or_else(|| keyword_rest(declaration, "PIC"));

    let Some(rest) = rest else {
        // COMP-1 and COMP-2 items carry no picture.
        return match usage_clause(declaration) {
            Some(Some(Usage::Float32)) => Some(TypeDescriptor::simple(TypeKind::Float32)),
            Some(Some(Usage::Float64)) => Some(TypeDescriptor::simple(TypeKind::Float64)),
            _ => None,
        };
    };

    let rest = rest.strip_prefix("IS ").unwrap_or(rest);
    let (picture, usage_text) = rest.split_once(' ').unwrap_or((rest, ""));

    let descriptor = match (Picture::parse(picture), usage_clause(usage_text)) {
        (Some(pic), Some(usage)) => pic.describe(usage),
        _ => TypeDescriptor::unsupported(0),
    };
    Some(descriptor)
}

// ---------------------------------------------------------------------------
// Rule 4: bare keywords
// ---------------------------------------------------------------------------

/// A parameterless type name and the descriptor it stands for.
struct Keyword {
    name: &'static str,
    kind: TypeKind,
    digits: u8,
    length: usize,
    double_byte: bool,
}

const fn keyword(name: &'static str, kind: TypeKind, digits: u8, length: usize) -> Keyword {
    Keyword {
        name,
        kind,
        digits,
        length,
        double_byte: false,
    }
}

const fn graphic_keyword(name: &'static str, kind: TypeKind, length: usize) -> Keyword {
    Keyword {
        name,
        kind,
        digits: 0,
        length,
        double_byte: true,
    }
}

/// Longest names first, so `DOUBLE PRECISION` is tried before `DOUBLE`.
const KEYWORDS: &[Keyword] = &[
    keyword("DOUBLE PRECISION", TypeKind::Float64, 0, 0),
    keyword("CHARACTER", TypeKind::FixedText, 0, 1),
    keyword("SMALLINT", TypeKind::BinaryInteger, 4, 0),
    keyword("DECFLOAT", TypeKind::PackedDecimal, 34, 0),
    keyword("INTEGER", TypeKind::BinaryInteger, 9, 0),
    keyword("BOOLEAN", TypeKind::Boolean, 0, 0),
    keyword("NUMERIC", TypeKind::PackedDecimal, 5, 0),
    keyword("DECIMAL", TypeKind::PackedDecimal, 5, 0),
    graphic_keyword("GRAPHIC", TypeKind::FixedText, 1),
    keyword("BIGINT", TypeKind::BinaryInteger, 18, 0),
    keyword("DOUBLE", TypeKind::Float64, 0, 0),
    keyword("BINARY", TypeKind::FixedBinary, 0, 1),
    graphic_keyword("DBCLOB", TypeKind::VariableText, DEFAULT_LOB_LENGTH),
    keyword("FLOAT", TypeKind::Float64, 0, 0),
    keyword("ROWID", TypeKind::Unsupported, 0, 0),
    keyword("CLOB", TypeKind::VariableText, 0, DEFAULT_LOB_LENGTH),
    keyword("BLOB", TypeKind::VariableBinary, 0, DEFAULT_LOB_LENGTH),
    keyword("REAL", TypeKind::Float32, 0, 0),
    keyword("DATE", TypeKind::Date, 0, 0),
    keyword("TIME", TypeKind::Time, 0, 0),
    keyword("CHAR", TypeKind::FixedText, 0, 1),
    keyword("INT", TypeKind::BinaryInteger, 9, 0),
    keyword("DEC", TypeKind::PackedDecimal, 5, 0),
    keyword("NUM", TypeKind::PackedDecimal, 5, 0),
    keyword("XML", TypeKind::Unsupported, 0, 0),
];

impl Keyword {
    fn descriptor(&self, rest: &str) -> TypeDescriptor {
        match self.kind {
            TypeKind::BinaryInteger => TypeDescriptor::binary(self.digits),
            TypeKind::PackedDecimal => TypeDescriptor::packed(self.digits, 0),
            TypeKind::FixedText if has_bit_data(rest) && !self.double_byte => {
                TypeDescriptor::sized(TypeKind::FixedBinary, self.length, false)
            }
            kind if self.length > 0 || kind == TypeKind::Unsupported => {
                TypeDescriptor::sized(kind, self.length, self.double_byte)
            }
            kind => TypeDescriptor::simple(kind),
        }
    }
}

fn bare_keyword(declaration: &str) -> Option<TypeDescriptor> {
    KEYWORDS.iter().find_map(|kw| {
        keyword_rest(declaration, kw.name).map(|rest| kw.descriptor(rest))
    })
}

// ---------------------------------------------------------------------------
// Rule 5: timestamps
// ---------------------------------------------------------------------------

fn timestamp(declaration: &str) -> Option<TypeDescriptor> {
    let rest = declaration.strip_prefix("TIMESTAMP")?;

    let (precision, qualifier) = if let Some(after) = rest.strip_prefix('(') {
        let (digits, qualifier) = after.split_once(')')?;
        match digits.parse::<u32>() {
            Ok(p) if p <= MAX_TIMESTAMP_PRECISION => (p as u8, qualifier.trim_start()),
            _ => return Some(TypeDescriptor::unsupported(0)),
        }
    } else if rest.is_empty() || rest.starts_with(' ') {
        (DEFAULT_TIMESTAMP_PRECISION, rest.trim_start())
    } else {
        return None;
    };

    match qualifier {
        "" | "WITH TIME ZONE" | "WITHOUT TIME ZONE" => Some(TypeDescriptor::timestamp(precision)),
        _ => Some(TypeDescriptor::unsupported(0)),
    }
}
