//! Canonical description of one declared field type.

use std::fmt;

use open_mainframe_encoding::{binary_width_for_digits, packed_length};
use serde::Serialize;

use crate::config::TemporalForm;

/// Storage family of a declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// DISPLAY numeric, one digit per byte.
    ZonedInteger,
    /// Big-endian two's complement (SMALLINT, COMP).
    BinaryInteger,
    /// BCD with trailing sign nibble (DECIMAL, COMP-3).
    PackedDecimal,
    /// 4-byte float (REAL, COMP-1).
    Float32,
    /// 8-byte float (DOUBLE, COMP-2).
    Float64,
    /// Fixed-length character data.
    FixedText,
    /// Length-prefixed character data.
    VariableText,
    /// Fixed-length opaque bytes.
    FixedBinary,
    /// Length-prefixed opaque bytes.
    VariableBinary,
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
    /// Date and time with fractional seconds.
    Timestamp,
    /// One-byte truth value.
    Boolean,
    /// Anything the parser does not recognize; laid out as variable text.
    Unsupported,
}

impl TypeKind {
    /// Numeric kinds carry `total_digits` and `scale_digits`.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            TypeKind::ZonedInteger | TypeKind::BinaryInteger | TypeKind::PackedDecimal
        )
    }

    /// Kinds preceded by a 2-byte big-endian length prefix.
    pub fn is_variable(&self) -> bool {
        matches!(
            self,
            TypeKind::VariableText | TypeKind::VariableBinary | TypeKind::Unsupported
        )
    }
}

/// Parsed form of a type declaration.
///
/// Built once per declaration and never mutated. For `Timestamp`,
/// `scale_digits` holds the number of fractional second digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeDescriptor {
    /// Storage family.
    pub kind: TypeKind,
    /// Total decimal digits (numeric kinds).
    pub total_digits: u8,
    /// Digits after the implied decimal point.
    pub scale_digits: u8,
    /// Declared length in characters or bytes, before graphic doubling.
    pub byte_length: usize,
    /// Graphic / DBCS data: two bytes per declared unit.
    pub double_byte: bool,
    /// Whether the numeric value carries a sign.
    pub signed: bool,
    /// Per-column CCSID override (`CCSID 1208`).
    pub ccsid: Option<u16>,
    /// The normalized declaration text this descriptor came from.
    pub declaration: String,
}

impl TypeDescriptor {
    fn new(kind: TypeKind) -> Self {
        Self {
            kind,
            total_digits: 0,
            scale_digits: 0,
            byte_length: 0,
            double_byte: false,
            signed: false,
            ccsid: None,
            declaration: String::new(),
        }
    }

    /// Numeric descriptor of `kind`.
    pub fn numeric(kind: TypeKind, total_digits: u8, scale_digits: u8, signed: bool) -> Self {
        Self {
            total_digits,
            scale_digits,
            signed,
            ..Self::new(kind)
        }
    }

    /// Signed packed decimal, the DECIMAL(p,s) shape.
    pub fn packed(total_digits: u8, scale_digits: u8) -> Self {
        Self::numeric(TypeKind::PackedDecimal, total_digits, scale_digits, true)
    }

    /// Signed binary integer of `total_digits` digits.
    pub fn binary(total_digits: u8) -> Self {
        Self::numeric(TypeKind::BinaryInteger, total_digits, 0, true)
    }

    /// Text or binary descriptor of `byte_length` units.
    pub fn sized(kind: TypeKind, byte_length: usize, double_byte: bool) -> Self {
        Self {
            byte_length,
            double_byte,
            ..Self::new(kind)
        }
    }

    /// Descriptor with no parameters (DATE, REAL, BOOLEAN, ...).
    pub fn simple(kind: TypeKind) -> Self {
        Self::new(kind)
    }

    /// Timestamp with `fraction_digits` fractional second digits.
    pub fn timestamp(fraction_digits: u8) -> Self {
        Self {
            scale_digits: fraction_digits,
            ..Self::new(TypeKind::Timestamp)
        }
    }

    /// Fallback descriptor, laid out as variable text of `byte_length`.
    pub fn unsupported(byte_length: usize) -> Self {
        Self::sized(TypeKind::Unsupported, byte_length, false)
    }

    pub(crate) fn with_declaration(mut self, declaration: &str) -> Self {
        self.declaration = declaration.to_string();
        self
    }

    pub(crate) fn with_ccsid(mut self, ccsid: Option<u16>) -> Self {
        self.ccsid = ccsid;
        self
    }

    /// Fractional second digits of a timestamp.
    pub fn fraction_digits(&self) -> u8 {
        self.scale_digits
    }

    /// Bytes per character unit of text payloads.
    pub fn unit_width(&self) -> usize {
        if self.double_byte {
            2
        } else {
            1
        }
    }

    /// Bytes one value of this type occupies in a record.
    pub fn span_length(&self, temporal_form: TemporalForm) -> usize {
        let payload = self.byte_length * self.unit_width();
        match self.kind {
            TypeKind::FixedText | TypeKind::FixedBinary => payload,
            TypeKind::VariableText | TypeKind::VariableBinary | TypeKind::Unsupported => {
                2 + payload
            }
            TypeKind::ZonedInteger => usize::from(self.total_digits),
            TypeKind::PackedDecimal => packed_length(usize::from(self.total_digits)),
            TypeKind::BinaryInteger => {
                binary_width_for_digits(usize::from(self.total_digits)).unwrap_or(8)
            }
            TypeKind::Float32 => 4,
            TypeKind::Float64 => 8,
            TypeKind::Date => date_span(temporal_form),
            TypeKind::Time => time_span(temporal_form),
            TypeKind::Timestamp => timestamp_span(self.fraction_digits(), temporal_form),
            TypeKind::Boolean => 1,
        }
    }
}

/// DATE span: 4 packed bytes or 10 characters.
pub fn date_span(form: TemporalForm) -> usize {
    match form {
        TemporalForm::Internal => 4,
        TemporalForm::Text => 10,
    }
}

/// TIME span: 3 packed bytes or 8 characters.
pub fn time_span(form: TemporalForm) -> usize {
    match form {
        TemporalForm::Internal => 3,
        TemporalForm::Text => 8,
    }
}

/// TIMESTAMP span for `p` fractional digits.
///
/// Internal form is 10 bytes holding 6 fractional digits, plus one byte
/// per two further digits. Text form is `YYYY-MM-DD-HH.MM.SS` plus
/// `.` and `p` digits when `p > 0`.
pub fn timestamp_span(p: u8, form: TemporalForm) -> usize {
    let p = usize::from(p);
    match form {
        TemporalForm::Internal => 10 + p.saturating_sub(6).div_ceil(2),
        TemporalForm::Text => 19 + if p > 0 { 1 + p } else { 0 },
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.declaration.is_empty() {
            return f.write_str(&self.declaration);
        }
        match self.kind {
            k if k.is_numeric() => write!(f, "{:?}({},{})", k, self.total_digits, self.scale_digits),
            TypeKind::Timestamp => write!(f, "Timestamp({})", self.scale_digits),
            k if self.byte_length > 0 => write!(f, "{:?}({})", k, self.byte_length),
            k => write!(f, "{:?}", k),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_spans() {
        let internal = TemporalForm::Internal;
        assert_eq!(
            TypeDescriptor::numeric(TypeKind::ZonedInteger, 7, 2, true).span_length(internal),
            7
        );
        assert_eq!(TypeDescriptor::packed(9, 2).span_length(internal), 5);
        assert_eq!(TypeDescriptor::packed(10, 0).span_length(internal), 6);
        assert_eq!(TypeDescriptor::packed(31, 0).span_length(internal), 16);
        assert_eq!(TypeDescriptor::binary(4).span_length(internal), 2);
        assert_eq!(TypeDescriptor::binary(9).span_length(internal), 4);
        assert_eq!(TypeDescriptor::binary(18).span_length(internal), 8);
    }

    #[test]
    fn test_text_spans() {
        let internal = TemporalForm::Internal;
        assert_eq!(
            TypeDescriptor::sized(TypeKind::FixedText, 25, false).span_length(internal),
            25
        );
        assert_eq!(
            TypeDescriptor::sized(TypeKind::FixedText, 10, true).span_length(internal),
            20
        );
        assert_eq!(
            TypeDescriptor::sized(TypeKind::VariableText, 100, false).span_length(internal),
            102
        );
        assert_eq!(
            TypeDescriptor::sized(TypeKind::VariableText, 10, true).span_length(internal),
            22
        );
        assert_eq!(TypeDescriptor::unsupported(0).span_length(internal), 2);
    }

    #[test]
    fn test_temporal_spans() {
        assert_eq!(date_span(TemporalForm::Internal), 4);
        assert_eq!(date_span(TemporalForm::Text), 10);
        assert_eq!(time_span(TemporalForm::Internal), 3);
        assert_eq!(time_span(TemporalForm::Text), 8);
        assert_eq!(
            TypeDescriptor::simple(TypeKind::Time).span_length(TemporalForm::Internal),
            3
        );
        assert_eq!(timestamp_span(6, TemporalForm::Internal), 10);
        assert_eq!(timestamp_span(0, TemporalForm::Internal), 10);
        assert_eq!(timestamp_span(7, TemporalForm::Internal), 11);
        assert_eq!(timestamp_span(8, TemporalForm::Internal), 11);
        assert_eq!(timestamp_span(12, TemporalForm::Internal), 13);
        assert_eq!(timestamp_span(0, TemporalForm::Text), 19);
        assert_eq!(timestamp_span(6, TemporalForm::Text), 26);
        assert_eq!(timestamp_span(12, TemporalForm::Text), 32);
    }

    #[test]
    fn test_display_prefers_declaration() {
        let d = TypeDescriptor::packed(15, 4).with_declaration("DECIMAL(15,4)");
        assert_eq!(d.to_string(), "DECIMAL(15,4)");
        assert_eq!(TypeDescriptor::packed(15, 4).to_string(), "PackedDecimal(15,4)");
    }
}
