//! Field decoding.
//!
//! [`decode_value`] turns the bytes of one field into a [`Value`] given its
//! descriptor and output type. It is a pure function: no I/O and no state
//! beyond the immutable [`DecodeContext`]. [`decode_field`] slices a field
//! out of a record and tags any failure with the field name, offset and
//! raw bytes.

mod temporal;
mod value;

pub use value::{Timestamp, Value};

use open_mainframe_encoding::{
    decode_binary, decode_hfp_long, decode_hfp_short, decode_ieee_long, decode_ieee_short,
    unpack_decimal, unpack_unsigned_digits, unzone_decimal, ExactDecimal, TextEncoding,
};

use crate::config::{DecodeConfig, FloatFormat, TemporalForm};
use crate::error::{ConfigError, DecodeErrorKind, FieldDecodeError};
use crate::schema::Field;
use crate::types::{date_span, time_span, timestamp_span, OutputType, TypeDescriptor, TypeKind};

/// Resolved encodings and formats shared by every field decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeContext {
    encoding: TextEncoding,
    graphic_encoding: TextEncoding,
    float_format: FloatFormat,
}

impl Default for DecodeContext {
    fn default() -> Self {
        Self {
            encoding: TextEncoding::Ebcdic(&open_mainframe_encoding::CP037),
            graphic_encoding: TextEncoding::Utf16Be,
            float_format: FloatFormat::Ieee,
        }
    }
}

impl DecodeContext {
    /// Create a context from resolved encodings.
    pub fn new(
        encoding: TextEncoding,
        graphic_encoding: TextEncoding,
        float_format: FloatFormat,
    ) -> Self {
        Self {
            encoding,
            graphic_encoding,
            float_format,
        }
    }

    /// Resolve the encoding names of a decode configuration.
    ///
    /// # Errors
    /// `ConfigError::UnknownEncoding` for a name with no code table.
    pub fn from_config(config: &DecodeConfig) -> Result<Self, ConfigError> {
        let resolve = |name: &str| {
            TextEncoding::by_name(name).map_err(|_| ConfigError::UnknownEncoding {
                name: name.to_string(),
            })
        };
        Ok(Self {
            encoding: resolve(&config.encoding)?,
            graphic_encoding: resolve(&config.graphic_encoding)?,
            float_format: config.float_format,
        })
    }

    /// Encoding of single-byte text.
    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Encoding of graphic text.
    pub fn graphic_encoding(&self) -> TextEncoding {
        self.graphic_encoding
    }

    /// Floating point representation.
    pub fn float_format(&self) -> FloatFormat {
        self.float_format
    }

    /// Encoding for a descriptor: its own CCSID, else graphic or single-byte.
    fn text_encoding(&self, descriptor: &TypeDescriptor) -> Result<TextEncoding, DecodeErrorKind> {
        match descriptor.ccsid {
            Some(ccsid) => Ok(TextEncoding::by_name(&ccsid.to_string())?),
            None if descriptor.double_byte => Ok(self.graphic_encoding),
            None => Ok(self.encoding),
        }
    }
}

/// Decode the bytes of one value.
///
/// `bytes` is exactly the span the layout assigned to the value.
///
/// # Errors
/// Any [`DecodeErrorKind`]; the error never outlives this field.
pub fn decode_value(
    bytes: &[u8],
    descriptor: &TypeDescriptor,
    output: &OutputType,
    ctx: &DecodeContext,
) -> Result<Value, DecodeErrorKind> {
    match descriptor.kind {
        TypeKind::FixedText => Ok(Value::Text(ctx.text_encoding(descriptor)?.decode(bytes)?)),
        TypeKind::FixedBinary => Ok(Value::Binary(bytes.to_vec())),
        TypeKind::VariableText | TypeKind::Unsupported => {
            let payload = variable_payload(bytes, descriptor)?;
            Ok(Value::Text(ctx.text_encoding(descriptor)?.decode(payload)?))
        }
        TypeKind::VariableBinary => {
            Ok(Value::Binary(variable_payload(bytes, descriptor)?.to_vec()))
        }
        TypeKind::ZonedInteger => {
            let (value, _sign) = unzone_decimal(bytes, descriptor.scale_digits)?;
            exact_value(value, output)
        }
        TypeKind::PackedDecimal => {
            let (value, _sign) = unpack_decimal(bytes, descriptor.scale_digits)?;
            // An even digit count leaves a pad nibble that must stay zero.
            if value.digit_count() > usize::from(descriptor.total_digits) {
                return Err(DecodeErrorKind::OutOfRange {
                    value: value.to_string(),
                    target: "DECIMAL",
                });
            }
            exact_value(value, output)
        }
        TypeKind::BinaryInteger => {
            let raw = binary_integer(bytes, descriptor.signed)?;
            exact_value(ExactDecimal::new(raw, descriptor.scale_digits), output)
        }
        TypeKind::Float32 => Ok(Value::Real(match ctx.float_format {
            FloatFormat::Ieee => decode_ieee_short(bytes)?,
            // HFP short carries 24 fraction bits, which f32 holds exactly.
            FloatFormat::Hexadecimal => decode_hfp_short(bytes)? as f32,
        })),
        TypeKind::Float64 => Ok(Value::Double(match ctx.float_format {
            FloatFormat::Ieee => decode_ieee_long(bytes)?,
            FloatFormat::Hexadecimal => decode_hfp_long(bytes)?,
        })),
        TypeKind::Date => decode_date(bytes, descriptor, ctx),
        TypeKind::Time => decode_time(bytes, descriptor, ctx),
        TypeKind::Timestamp => decode_timestamp(bytes, descriptor, ctx),
        TypeKind::Boolean => match *bytes {
            [0x01] => Ok(Value::Boolean(true)),
            [0x00] => Ok(Value::Boolean(false)),
            [byte] => Err(DecodeErrorKind::InvalidBoolean { byte }),
            _ => Err(truncated(1, bytes.len())),
        },
    }
}

/// Decode one field out of a whole record.
///
/// `OCCURS` fields decode element by element into [`Value::List`]; the
/// first failing element is reported with its own offset and bytes.
///
/// # Errors
/// The failure tagged with the field name, offset and offending bytes.
pub fn decode_field(
    field: &Field,
    record: &[u8],
    ctx: &DecodeContext,
) -> Result<Value, FieldDecodeError> {
    let tag = |offset: usize, bytes: &[u8], kind: DecodeErrorKind| FieldDecodeError {
        field: field.name.clone(),
        offset,
        bytes: bytes.to_vec(),
        kind,
    };

    let Some(span) = record.get(field.range()) else {
        let available = record.len().saturating_sub(field.offset);
        let rest = record.get(field.offset..).unwrap_or(&[]);
        return Err(tag(field.offset, rest, truncated(field.span_length, available)));
    };

    if field.occurs <= 1 {
        return decode_value(span, &field.descriptor, &field.output, ctx)
            .map_err(|kind| tag(field.offset, span, kind));
    }

    let element_length = field.element_length();
    span.chunks(element_length.max(1))
        .enumerate()
        .map(|(i, element)| {
            decode_value(element, &field.descriptor, &field.output, ctx)
                .map_err(|kind| tag(field.offset + i * element_length, element, kind))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Value::List)
}

fn truncated(needed: usize, available: usize) -> DecodeErrorKind {
    DecodeErrorKind::Truncated { needed, available }
}

/// Payload after a 2-byte big-endian length prefix.
///
/// Graphic prefixes count double-byte characters.
fn variable_payload<'a>(
    bytes: &'a [u8],
    descriptor: &TypeDescriptor,
) -> Result<&'a [u8], DecodeErrorKind> {
    let [hi, lo, rest @ ..] = bytes else {
        return Err(truncated(2, bytes.len()));
    };
    let prefix = usize::from(u16::from_be_bytes([*hi, *lo]));
    if prefix > descriptor.byte_length {
        return Err(DecodeErrorKind::LengthPrefix {
            prefix,
            max: descriptor.byte_length,
        });
    }
    let length = prefix * descriptor.unit_width();
    rest.get(..length)
        .ok_or_else(|| truncated(2 + length, bytes.len()))
}

/// Two's complement integer, reinterpreted as unsigned for unsigned fields.
fn binary_integer(bytes: &[u8], signed: bool) -> Result<i128, DecodeErrorKind> {
    let raw = decode_binary(bytes)?;
    if signed || raw >= 0 {
        return Ok(i128::from(raw));
    }
    Ok(match bytes.len() {
        2 => i128::from(raw as u16),
        4 => i128::from(raw as u32),
        _ => i128::from(raw as u64),
    })
}

/// Fit an exact value into its integer or decimal output type.
fn exact_value(value: ExactDecimal, output: &OutputType) -> Result<Value, DecodeErrorKind> {
    let out_of_range = |target: &'static str| DecodeErrorKind::OutOfRange {
        value: value.to_string(),
        target,
    };
    let whole = || {
        if value.scale() == 0 {
            Some(value.unscaled())
        } else {
            None
        }
    };

    match output {
        OutputType::SmallInt => whole()
            .and_then(|v| i16::try_from(v).ok())
            .map(Value::SmallInt)
            .ok_or_else(|| out_of_range("SMALLINT")),
        OutputType::Integer => whole()
            .and_then(|v| i32::try_from(v).ok())
            .map(Value::Integer)
            .ok_or_else(|| out_of_range("INTEGER")),
        OutputType::BigInt => whole()
            .and_then(|v| i64::try_from(v).ok())
            .map(Value::BigInt)
            .ok_or_else(|| out_of_range("BIGINT")),
        _ => Ok(Value::Decimal(value)),
    }
}

fn decode_date(
    bytes: &[u8],
    descriptor: &TypeDescriptor,
    ctx: &DecodeContext,
) -> Result<Value, DecodeErrorKind> {
    let len = bytes.len();
    if len == date_span(TemporalForm::Internal) {
        let digits = unpack_unsigned_digits(bytes)?;
        temporal::date_from_digits(&digits)
            .map(Value::Date)
            .ok_or(DecodeErrorKind::InvalidDate { text: digits })
    } else if len == date_span(TemporalForm::Text) {
        let text = ctx.text_encoding(descriptor)?.decode(bytes)?;
        temporal::parse_date_text(&text)
            .map(Value::Date)
            .ok_or(DecodeErrorKind::InvalidDate { text })
    } else {
        Err(truncated(date_span(TemporalForm::Internal), len))
    }
}

fn decode_time(
    bytes: &[u8],
    descriptor: &TypeDescriptor,
    ctx: &DecodeContext,
) -> Result<Value, DecodeErrorKind> {
    let len = bytes.len();
    if len == time_span(TemporalForm::Internal) {
        let digits = unpack_unsigned_digits(bytes)?;
        temporal::time_from_digits(&digits)
            .map(Value::Time)
            .ok_or(DecodeErrorKind::InvalidTime { text: digits })
    } else if len == time_span(TemporalForm::Text) {
        let text = ctx.text_encoding(descriptor)?.decode(bytes)?;
        temporal::parse_time_text(&text)
            .map(Value::Time)
            .ok_or(DecodeErrorKind::InvalidTime { text })
    } else {
        Err(truncated(time_span(TemporalForm::Internal), len))
    }
}

fn decode_timestamp(
    bytes: &[u8],
    descriptor: &TypeDescriptor,
    ctx: &DecodeContext,
) -> Result<Value, DecodeErrorKind> {
    let precision = descriptor.fraction_digits();
    let len = bytes.len();
    if len == timestamp_span(precision, TemporalForm::Internal) {
        let digits = unpack_unsigned_digits(bytes)?;
        temporal::timestamp_from_digits(&digits, precision)
            .map(Value::Timestamp)
            .ok_or(DecodeErrorKind::InvalidTimestamp { text: digits })
    } else if len == timestamp_span(precision, TemporalForm::Text) {
        let text = ctx.text_encoding(descriptor)?.decode(bytes)?;
        temporal::parse_timestamp_text(&text, precision)
            .map(Value::Timestamp)
            .ok_or(DecodeErrorKind::InvalidTimestamp { text })
    } else {
        Err(truncated(timestamp_span(precision, TemporalForm::Internal), len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{output_type, TypeDescriptor};
    use chrono::NaiveDate;
    use open_mainframe_encoding::{EncodingError, CP037};

    fn decode(bytes: &[u8], declaration: &str) -> Result<Value, DecodeErrorKind> {
        let descriptor = TypeDescriptor::parse(declaration);
        let output = output_type(&descriptor);
        decode_value(bytes, &descriptor, &output, &DecodeContext::default())
    }

    fn dec(s: &str) -> Value {
        Value::Decimal(s.parse().unwrap())
    }

    fn ebcdic(s: &str) -> Vec<u8> {
        CP037.encode(s).unwrap()
    }

    #[test]
    fn test_packed() {
        assert_eq!(
            decode(&[0x00, 0x12, 0x34, 0x56, 0x7C], "DECIMAL(9,2)").unwrap(),
            dec("12345.67")
        );
        assert_eq!(
            decode(&[0x00, 0x12, 0x34, 0x56, 0x7D], "PIC S9(7)V99 COMP-3").unwrap(),
            dec("-12345.67")
        );
        assert_eq!(
            decode(&[0x00, 0x12, 0x34, 0x56, 0x7F], "DECIMAL(9,2)").unwrap(),
            dec("12345.67")
        );
        assert!(matches!(
            decode(&[0x00, 0x12, 0x34, 0x56, 0x7A], "DECIMAL(9,2)"),
            Err(DecodeErrorKind::Encoding(EncodingError::InvalidSign { nibble: 0x0A }))
        ));
        assert!(matches!(
            decode(&[0x00, 0x1B, 0x34, 0x56, 0x7C], "DECIMAL(9,2)"),
            Err(DecodeErrorKind::Encoding(EncodingError::InvalidDigit { .. }))
        ));
    }

    #[test]
    fn test_packed_pad_nibble_must_be_zero() {
        // DECIMAL(4,0) spans three bytes; the leading nibble is padding.
        assert_eq!(decode(&[0x01, 0x23, 0x4C], "DECIMAL(4,0)").unwrap(), dec("1234"));
        assert!(matches!(
            decode(&[0x12, 0x34, 0x5C], "DECIMAL(4,0)"),
            Err(DecodeErrorKind::OutOfRange { target: "DECIMAL", .. })
        ));
        assert!(matches!(
            decode(&[0x12, 0x34, 0x5D], "PIC S9(4) COMP-3"),
            Err(DecodeErrorKind::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_packed_beyond_28_digits_is_exact() {
        let mut bytes = vec![0x99; 15];
        bytes.push(0x9C);
        assert_eq!(
            decode(&bytes, "DECIMAL(31,0)").unwrap(),
            dec("9999999999999999999999999999999")
        );
    }

    #[test]
    fn test_zoned_signs() {
        // 12345 with the sign in the last zone.
        let mut bytes = vec![0xF1, 0xF2, 0xF3, 0xF4, 0xD5];
        assert_eq!(decode(&bytes, "PIC S9(5)").unwrap(), Value::Integer(-12345));
        bytes[4] = 0xC5;
        assert_eq!(decode(&bytes, "PIC S9(5)").unwrap(), Value::Integer(12345));
        bytes[4] = 0xF5;
        assert_eq!(decode(&bytes, "PIC 9(5)").unwrap(), Value::Integer(12345));
        bytes[4] = 0xA5;
        assert!(decode(&bytes, "PIC S9(5)").is_err());

        assert_eq!(
            decode(&[0xF1, 0xF2, 0xF3, 0xD4], "PIC S99V99").unwrap(),
            dec("-12.34")
        );
    }

    #[test]
    fn test_binary_integers() {
        assert_eq!(decode(&[0xFF, 0xFE], "SMALLINT").unwrap(), Value::SmallInt(-2));
        assert_eq!(
            decode(&[0x00, 0x01, 0xE2, 0x40], "INTEGER").unwrap(),
            Value::Integer(123_456)
        );
        assert_eq!(
            decode(&[0, 0, 0, 0x02, 0x54, 0x0B, 0xE3, 0xFF], "BIGINT").unwrap(),
            Value::BigInt(9_999_999_999)
        );
        assert_eq!(
            decode(&[0x30, 0x39], "PIC S99V99 COMP").unwrap(),
            dec("123.45")
        );
        // Unsigned halfword above i16::MAX stays positive but leaves SMALLINT.
        assert!(matches!(
            decode(&[0xFF, 0xFF], "PIC 9(4) COMP"),
            Err(DecodeErrorKind::OutOfRange { target: "SMALLINT", .. })
        ));
    }

    #[test]
    fn test_floats() {
        assert_eq!(
            decode(&1.5f32.to_be_bytes(), "REAL").unwrap(),
            Value::Real(1.5)
        );
        assert_eq!(
            decode(&(-2.25f64).to_be_bytes(), "DOUBLE").unwrap(),
            Value::Double(-2.25)
        );

        let hfp = DecodeContext::new(
            TextEncoding::Ebcdic(&CP037),
            TextEncoding::Utf16Be,
            FloatFormat::Hexadecimal,
        );
        let descriptor = TypeDescriptor::parse("COMP-2");
        // 1.0 in HFP long: 0x41 10 00 00 00 00 00 00
        let value = decode_value(
            &[0x41, 0x10, 0, 0, 0, 0, 0, 0],
            &descriptor,
            &OutputType::Double,
            &hfp,
        )
        .unwrap();
        assert_eq!(value, Value::Double(1.0));
    }

    #[test]
    fn test_fixed_text_keeps_padding() {
        assert_eq!(
            decode(&ebcdic("AB   "), "CHAR(5)").unwrap(),
            Value::Text("AB   ".to_string())
        );
        assert_eq!(
            decode(&[0xC1, 0x00], "CHAR(2) FOR BIT DATA").unwrap(),
            Value::Binary(vec![0xC1, 0x00])
        );
    }

    #[test]
    fn test_variable_text() {
        let mut bytes = vec![0x00, 0x03];
        bytes.extend(ebcdic("ABC"));
        bytes.extend([0x40; 7]);
        assert_eq!(
            decode(&bytes, "VARCHAR(10)").unwrap(),
            Value::Text("ABC".to_string())
        );

        bytes[1] = 11;
        assert_eq!(
            decode(&bytes, "VARCHAR(10)"),
            Err(DecodeErrorKind::LengthPrefix { prefix: 11, max: 10 })
        );
    }

    #[test]
    fn test_vargraphic_prefix_counts_characters() {
        let bytes = [0x00, 0x02, 0x65, 0xE5, 0x67, 0x2C, 0x00, 0x00];
        assert_eq!(
            decode(&bytes, "VARGRAPHIC(3)").unwrap(),
            Value::Text("日本".to_string())
        );
    }

    #[test]
    fn test_ccsid_override() {
        assert_eq!(
            decode(b"hi", "CHAR(2) CCSID 1208").unwrap(),
            Value::Text("hi".to_string())
        );
        assert!(matches!(
            decode(b"hi", "CHAR(2) CCSID 930"),
            Err(DecodeErrorKind::Encoding(EncodingError::InvalidCodePage { .. }))
        ));
    }

    #[test]
    fn test_unsupported_reads_as_variable_text() {
        let mut bytes = vec![0x00, 0x02];
        bytes.extend(ebcdic("OK"));
        bytes.extend([0x40; 2]);
        let descriptor = TypeDescriptor::unsupported(4);
        let value = decode_value(&bytes, &descriptor, &OutputType::Text, &DecodeContext::default());
        assert_eq!(value.unwrap(), Value::Text("OK".to_string()));
    }

    #[test]
    fn test_dates() {
        assert_eq!(
            decode(&[0x20, 0x24, 0x03, 0x15], "DATE").unwrap(),
            Value::Date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
        );
        assert_eq!(
            decode(&[0x20, 0x24, 0x13, 0x15], "DATE"),
            Err(DecodeErrorKind::InvalidDate {
                text: "20241315".to_string()
            })
        );
        assert_eq!(
            decode(&ebcdic("2024-03-15"), "DATE").unwrap(),
            Value::Date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
        );
        assert!(matches!(
            decode(&ebcdic("2024/03/15"), "DATE"),
            Err(DecodeErrorKind::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_times() {
        assert_eq!(decode(&[0x10, 0x30, 0x45], "TIME").unwrap().to_string(), "10.30.45");
        assert_eq!(
            decode(&[0x25, 0x00, 0x00], "TIME"),
            Err(DecodeErrorKind::InvalidTime {
                text: "250000".to_string()
            })
        );
        assert_eq!(
            decode(&ebcdic("23.59.58"), "TIME").unwrap().to_string(),
            "23.59.58"
        );
        assert!(matches!(
            decode(&ebcdic("23:59:58"), "TIME"),
            Err(DecodeErrorKind::InvalidTime { .. })
        ));
        assert!(matches!(
            decode(&[0x10, 0x30], "TIME"),
            Err(DecodeErrorKind::Truncated { needed: 3, available: 2 })
        ));
    }

    #[test]
    fn test_temporal_text_honors_ccsid() {
        // '-' is 0x60 in every EBCDIC page but UTF-8 text is plain ASCII.
        assert_eq!(
            decode(b"2024-03-15", "DATE CCSID 1208").unwrap(),
            Value::Date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
        );
        assert_eq!(
            decode(b"2024-03-15-10.30.45", "TIMESTAMP(0) CCSID 1208")
                .unwrap()
                .to_string(),
            "2024-03-15-10.30.45"
        );
        assert_eq!(
            decode(b"10.30.45", "TIME CCSID 1208").unwrap().to_string(),
            "10.30.45"
        );
        // The same bytes under the default EBCDIC page are not a date.
        assert!(matches!(
            decode(b"2024-03-15", "DATE"),
            Err(DecodeErrorKind::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_timestamps() {
        let internal = [0x20, 0x24, 0x03, 0x15, 0x10, 0x30, 0x45, 0x12, 0x34, 0x56];
        let value = decode(&internal, "TIMESTAMP").unwrap();
        assert_eq!(value.to_string(), "2024-03-15-10.30.45.123456");

        let text = ebcdic("2024-03-15-10.30.45.123456789");
        let value = decode(&text, "TIMESTAMP(9)").unwrap();
        assert_eq!(value.to_string(), "2024-03-15-10.30.45.123456789");

        let bad = ebcdic("2024-03-15-10.30.45.12345X");
        assert!(matches!(
            decode(&bad, "TIMESTAMP"),
            Err(DecodeErrorKind::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn test_boolean() {
        assert_eq!(decode(&[0x01], "BOOLEAN").unwrap(), Value::Boolean(true));
        assert_eq!(decode(&[0x00], "BOOLEAN").unwrap(), Value::Boolean(false));
        assert_eq!(
            decode(&[0x02], "BOOLEAN"),
            Err(DecodeErrorKind::InvalidBoolean { byte: 0x02 })
        );
    }
}
