//! Property-based tests for layout and decoding.

use proptest::prelude::*;

use open_mainframe_encoding::{pack_decimal, zone_decimal, ExactDecimal};
use open_mainframe_migrate::{
    decode_value, map_type, DecodeContext, OutputType, SchemaBuilder, SchemaError, TemporalForm,
    TypeDescriptor, TypeKind, Value, MAX_LENGTH,
};

/// Picture repeat counts, mostly near the edges of `u32`.
fn arb_repeat() -> impl Strategy<Value = u32> {
    prop_oneof![
        0u32..64,
        (MAX_LENGTH as u32 - 64)..=(MAX_LENGTH as u32),
        any::<u32>(),
    ]
}

/// A packed declaration and a value that fits it.
fn arb_packed() -> impl Strategy<Value = (u8, u8, i128)> {
    (1u8..=31)
        .prop_flat_map(|precision| (Just(precision), 0..=precision))
        .prop_flat_map(|(precision, scale)| {
            let max = 10i128.pow(u32::from(precision)) - 1;
            (Just(precision), Just(scale), -max..=max)
        })
}

proptest! {
    #[test]
    fn prop_packed_decode_inverts_encode((precision, scale, unscaled) in arb_packed()) {
        let value = ExactDecimal::new(unscaled, scale);
        let bytes = pack_decimal(&value, usize::from(precision), scale, true).unwrap();

        let descriptor = TypeDescriptor::parse(&format!("DECIMAL({},{})", precision, scale));
        prop_assert_eq!(bytes.len(), descriptor.span_length(TemporalForm::Internal));

        let output = map_type(&descriptor).output;
        let decoded = decode_value(&bytes, &descriptor, &output, &DecodeContext::default()).unwrap();
        prop_assert_eq!(decoded, Value::Decimal(value));
    }

    #[test]
    fn prop_zoned_decode_inverts_encode((precision, scale, unscaled) in arb_packed()) {
        let value = ExactDecimal::new(unscaled, scale);
        let bytes = zone_decimal(&value, usize::from(precision), scale, true).unwrap();

        let descriptor = TypeDescriptor::numeric(TypeKind::ZonedInteger, precision, scale, true);
        let decoded =
            decode_value(&bytes, &descriptor, &OutputType::Decimal { precision, scale }, &DecodeContext::default())
                .unwrap();
        prop_assert_eq!(decoded, Value::Decimal(value));
    }

    #[test]
    fn prop_binary_width_by_digits(digits in 1u32..=18) {
        let descriptor = TypeDescriptor::parse(&format!("PIC S9({}) COMP", digits));
        let expected = match digits {
            1..=4 => 2,
            5..=9 => 4,
            _ => 8,
        };
        prop_assert_eq!(descriptor.kind, TypeKind::BinaryInteger);
        prop_assert_eq!(descriptor.span_length(TemporalForm::Internal), expected);

        let output = map_type(&descriptor).output;
        let expected_output = match digits {
            1..=4 => OutputType::SmallInt,
            5..=9 => OutputType::Integer,
            _ => OutputType::BigInt,
        };
        prop_assert_eq!(output, expected_output);
    }

    #[test]
    fn prop_parser_never_panics(text in "\\PC{0,40}") {
        let descriptor = TypeDescriptor::parse(&text);
        let _ = map_type(&descriptor);
        let _ = descriptor.span_length(TemporalForm::Internal);
    }

    #[test]
    fn prop_picture_repeats_stay_bounded(
        symbol in prop::sample::select(vec!['X', '9', 'G']),
        first in arb_repeat(),
        second in arb_repeat(),
    ) {
        let descriptor =
            TypeDescriptor::parse(&format!("PIC {symbol}({first}){symbol}({second})"));
        let span = descriptor.span_length(TemporalForm::Internal);
        let _ = map_type(&descriptor);

        if u64::from(first) + u64::from(second) > MAX_LENGTH as u64 {
            prop_assert_eq!(descriptor.kind, TypeKind::Unsupported);
        }
        if descriptor.kind == TypeKind::FixedText && symbol == 'X' {
            prop_assert_eq!(span as u64, u64::from(first) + u64::from(second));
        }
    }

    #[test]
    fn prop_large_occurs_layouts_never_panic(
        length in prop_oneof![1usize..100, (MAX_LENGTH - 8)..=MAX_LENGTH],
        occurs in prop_oneof![1u64..100, any::<u64>()],
        trailing in 0usize..3,
        record_length in any::<usize>(),
    ) {
        let mut lines = vec![format!("05 A PIC X({length}) OCCURS {occurs} TIMES.")];
        lines.extend((0..trailing).map(|i| format!("05 B{i} PIC X(1).")));

        let result = SchemaBuilder::new()
            .definitions(lines.iter().map(String::as_str))
            .build(record_length);
        match result {
            Ok(schema) => {
                let end = schema.fields().last().map_or(0, |f| f.range().end);
                prop_assert_eq!(end, record_length);
            }
            Err(SchemaError::LengthMismatch { .. } | SchemaError::LayoutOverflow { .. }) => {}
            Err(other) => prop_assert!(false, "unexpected error {other}"),
        }
    }

    #[test]
    fn prop_fixed_text_span(length in 1usize..=254) {
        let descriptor = TypeDescriptor::parse(&format!("CHAR({})", length));
        prop_assert_eq!(descriptor.span_length(TemporalForm::Internal), length);
        let descriptor = TypeDescriptor::parse(&format!("VARGRAPHIC({})", length));
        prop_assert_eq!(descriptor.span_length(TemporalForm::Internal), 2 + 2 * length);
    }
}
