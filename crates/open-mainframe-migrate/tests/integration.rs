//! End-to-end tests: declarations to schema to decoded records.

use open_mainframe_encoding::{ExactDecimal, CP037};
use open_mainframe_migrate::{
    map_type, DecodeConfig, DecodeSummary, ErrorPolicy, LayoutEntry, MigrationConfig, OutputType,
    RecordDecoder, RecordError, SchemaBuilder, SchemaError, TemporalForm, TypeDescriptor, TypeKind,
    Value,
};

fn ebcdic(s: &str) -> Vec<u8> {
    CP037.encode(s).unwrap()
}

fn dec(s: &str) -> Value {
    Value::Decimal(s.parse::<ExactDecimal>().unwrap())
}

// ─────── Declarations ───────

#[test]
fn test_decimal_declarations() {
    let d = TypeDescriptor::parse("DECIMAL(15,4)");
    assert_eq!(d.kind, TypeKind::PackedDecimal);
    assert_eq!((d.total_digits, d.scale_digits), (15, 4));
    assert_eq!(
        map_type(&d).output,
        OutputType::Decimal {
            precision: 15,
            scale: 4
        }
    );

    let d = TypeDescriptor::parse("DECFLOAT(34)");
    assert_eq!((d.total_digits, d.scale_digits), (34, 0));
}

#[test]
fn test_unrecognized_declaration_falls_back_to_text() {
    let d = TypeDescriptor::parse("ROWID");
    assert_eq!(d.kind, TypeKind::Unsupported);
    let mapped = map_type(&d);
    assert_eq!(mapped.output, OutputType::Text);
    assert!(mapped.warning.is_some());

    let d = TypeDescriptor::parse("SOMETHING ODD(12)");
    assert_eq!(d.kind, TypeKind::Unsupported);
    assert_eq!(d.byte_length, 12);
}

// ─────── Schema ───────

#[test]
fn test_customer_layout_length() {
    let build = |length| {
        SchemaBuilder::new()
            .field("CUST_ID", "CHAR(9)")
            .field("FIRST_NAME", "CHAR(25)")
            .field("LAST_NAME", "CHAR(25)")
            .filler(1)
            .build(length)
    };

    let schema = build(59).unwrap();
    assert_eq!(schema.output_fields().count(), 3);
    assert_eq!(
        build(60).unwrap_err(),
        SchemaError::LengthMismatch {
            computed: 59,
            declared: 60
        }
    );
}

#[test]
fn test_dclgen_style_table() {
    let ddl = [
        "EMPNO       CHAR(6)        NOT NULL,",
        "SALARY      DECIMAL(9,2),",
        "HIREDATE    DATE,",
        "BONUS_PCT   REAL           NOT NULL WITH DEFAULT,",
        "UPDATED_AT  TIMESTAMP      NOT NULL,",
        "PRIMARY KEY (EMPNO)",
    ];
    let schema = SchemaBuilder::new()
        .definitions(ddl)
        .build(6 + 5 + 4 + 4 + 10)
        .unwrap();

    assert_eq!(schema.output_fields().count(), 5);
    assert!(!schema.field("EMPNO").unwrap().nullable);
    assert!(schema.field("SALARY").unwrap().nullable);
    assert_eq!(schema.field("UPDATED_AT").unwrap().offset, 19);

    let mut record = ebcdic("000010");
    record.extend([0x00, 0x52, 0x75, 0x00, 0x0C]);
    record.extend([0x20, 0x01, 0x01, 0x15]);
    record.extend(0.05f32.to_be_bytes());
    record.extend([0x20, 0x24, 0x06, 0x30, 0x23, 0x59, 0x59, 0x00, 0x00, 0x01]);

    let decoder = RecordDecoder::new(schema, &DecodeConfig::default()).unwrap();
    let rec = decoder.decode(&record).unwrap();
    assert!(rec.is_ok());

    let values = rec.values();
    assert_eq!(values[0].1, Value::Text("000010".to_string()));
    assert_eq!(values[1].1, dec("52750.00"));
    assert_eq!(values[2].1.to_string(), "2001-01-15");
    assert_eq!(values[3].1, Value::Real(0.05));
    assert_eq!(values[4].1.to_string(), "2024-06-30-23.59.59.000001");
}

#[test]
fn test_copybook_with_occurs_and_filler() {
    let copybook = [
        "       01  SALES-RECORD.",
        "           05  REGION-CODE     PIC X(3).",
        "           05  STORE-NO        PIC 9(4).",
        "           05  FILLER          PIC X(1).",
        "           05  QTR-SALES       PIC S9(5)V99 COMP-3 OCCURS 4 TIMES.",
        "           05  EMPLOYEES       PIC S9(4) COMP.",
        "           88  SMALL-STORE     VALUE 1 THRU 10.",
    ];
    let schema = SchemaBuilder::new()
        .definitions(copybook)
        .build(3 + 4 + 1 + 4 * 4 + 2)
        .unwrap();

    let names: Vec<_> = schema.output_fields().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["REGION-CODE", "STORE-NO", "QTR-SALES", "EMPLOYEES"]);

    let mut record = ebcdic("NE 0042 ");
    record.extend([0x00, 0x10, 0x00, 0x0C]);
    record.extend([0x00, 0x25, 0x05, 0x0C]);
    record.extend([0x01, 0x00, 0x00, 0x0D]);
    record.extend([0x00, 0x00, 0x00, 0x0C]);
    record.extend([0x00, 0x0C]);

    let decoder = RecordDecoder::new(schema, &DecodeConfig::default()).unwrap();
    let rec = decoder.decode(&record).unwrap();

    assert_eq!(
        rec.get("REGION-CODE").unwrap().as_ref().unwrap(),
        &Value::Text("NE ".to_string())
    );
    assert_eq!(
        rec.get("STORE-NO").unwrap().as_ref().unwrap(),
        &Value::SmallInt(42)
    );
    assert_eq!(
        rec.get("QTR-SALES").unwrap().as_ref().unwrap(),
        &Value::List(vec![
            dec("100.00"),
            dec("250.50"),
            dec("-10000.00"),
            dec("0.00"),
        ])
    );
    assert_eq!(
        rec.get("EMPLOYEES").unwrap().as_ref().unwrap(),
        &Value::SmallInt(12)
    );
}

// ─────── Field values ───────

#[test]
fn test_packed_decimal_exact() {
    let schema = SchemaBuilder::new()
        .field("AMT", "DECIMAL(9,2)")
        .build(5)
        .unwrap();
    let decoder = RecordDecoder::new(schema, &DecodeConfig::default()).unwrap();
    let rec = decoder.decode(&[0x00, 0x12, 0x34, 0x56, 0x7C]).unwrap();
    assert_eq!(rec.get("AMT").unwrap(), &Ok(dec("12345.67")));
}

#[test]
fn test_zoned_sign_zones() {
    let schema = SchemaBuilder::new()
        .field("N", "PIC S9(3)")
        .build(3)
        .unwrap();
    let decoder = RecordDecoder::new(schema, &DecodeConfig::default()).unwrap();

    let value = |last: u8| {
        decoder
            .decode(&[0xF1, 0xF2, last])
            .unwrap()
            .get("N")
            .unwrap()
            .clone()
    };
    assert_eq!(value(0xD3), Ok(Value::SmallInt(-123)));
    assert_eq!(value(0xC3), Ok(Value::SmallInt(123)));
    assert_eq!(value(0xF3), Ok(Value::SmallInt(123)));
    assert!(value(0xE3).is_err());
}

#[test]
fn test_text_temporal_form_from_config() {
    let config = MigrationConfig::from_toml_str(
        r#"
        [layout]
        temporal_form = "text"

        [decode]
        encoding = "IBM-1047"
        "#,
    )
    .unwrap();
    assert_eq!(config.layout.temporal_form, TemporalForm::Text);

    let schema = SchemaBuilder::new()
        .with_layout(config.layout)
        .field("D", "DATE")
        .field("TS", "TIMESTAMP(0)")
        .build(10 + 19)
        .unwrap();
    let decoder = RecordDecoder::new(schema, &config.decode).unwrap();

    let mut record = open_mainframe_encoding::CP1047.encode("1999-12-31").unwrap();
    record.extend(open_mainframe_encoding::CP1047.encode("1999-12-31-23.59.59").unwrap());
    let decoded = decoder.decode(&record).unwrap();
    let values = decoded.values();
    assert_eq!(values[0].1.to_string(), "1999-12-31");
    assert_eq!(values[1].1.to_string(), "1999-12-31-23.59.59");
}

#[test]
fn test_internal_time_column() {
    let schema = SchemaBuilder::new()
        .field("D", "DATE")
        .field("T", "TIME")
        .field("ID", "CHAR(2)")
        .build(4 + 3 + 2)
        .unwrap();
    assert_eq!(schema.field("ID").unwrap().offset, 7);
    assert_eq!(schema.field("T").unwrap().output, OutputType::Time);

    let decoder = RecordDecoder::new(schema, &DecodeConfig::default()).unwrap();
    let mut record = vec![0x20, 0x24, 0x03, 0x15, 0x17, 0x45, 0x09];
    record.extend(ebcdic("AB"));
    let decoded = decoder.decode(&record).unwrap();
    let values = decoded.values();
    assert_eq!(values[1].1.to_string(), "17.45.09");
    assert_eq!(values[2].1, Value::Text("AB".to_string()));
}

#[test]
fn test_national_ccsid_columns() {
    let schema = SchemaBuilder::new()
        .field("CITY", "CHAR(7) CCSID 273")
        .field("PRICE", "CHAR(3) CCSID 285")
        .build(10)
        .unwrap();
    let decoder = RecordDecoder::new(schema, &DecodeConfig::default()).unwrap();

    let mut record = open_mainframe_encoding::CP273.encode("München").unwrap();
    record.extend(open_mainframe_encoding::CP285.encode("£12").unwrap());
    let decoded = decoder.decode(&record).unwrap();
    let values = decoded.values();
    assert_eq!(values[0].1, Value::Text("München".to_string()));
    assert_eq!(values[1].1, Value::Text("£12".to_string()));

    let err = SchemaBuilder::new()
        .field("KANJI", "GRAPHIC(4) CCSID 930")
        .build(8)
        .unwrap_err();
    assert!(matches!(err, SchemaError::UnknownCcsid { ccsid: 930, .. }));
}

// ─────── Policies ───────

#[test]
fn test_policies_over_an_extract() {
    let schema = SchemaBuilder::new()
        .not_null("CODE", "CHAR(2)")
        .field("AMT", "DECIMAL(3,0)")
        .build(4)
        .unwrap();

    let mut extract = Vec::new();
    for (code, amount) in [("AA", [0x12, 0x3C]), ("BB", [0x12, 0x3E]), ("CC", [0x99, 0x9D])] {
        extract.extend(ebcdic(code));
        extract.extend(amount);
    }
    extract.extend([0x40, 0x40]);

    let tolerant = RecordDecoder::new(schema.clone(), &DecodeConfig::default()).unwrap();
    let results: Vec<_> = tolerant.chunks(&extract).collect();
    assert_eq!(results.len(), 4);
    let second = results[1].as_ref().unwrap();
    assert_eq!(second.values()[1], ("AMT", Value::Null));
    assert_eq!(
        results[2].as_ref().unwrap().values()[1].1,
        dec("-999")
    );
    assert!(matches!(results[3], Err(RecordError::LengthMismatch { index: 3, .. })));

    let summary: DecodeSummary = results.iter().collect();
    assert_eq!(summary.records_ok, 2);
    assert_eq!(summary.records_with_errors, 1);
    assert_eq!(summary.records_failed, 1);

    let strict_config = DecodeConfig {
        error_policy: ErrorPolicy::Strict,
        ..DecodeConfig::default()
    };
    let strict = RecordDecoder::new(schema, &strict_config).unwrap();
    let results: Vec<_> = strict.chunks(&extract).collect();
    assert!(matches!(
        results[1],
        Err(RecordError::FieldFailed { index: 1, .. })
    ));
    assert!(results[2].is_ok());
}

#[test]
fn test_definition_lines_do_not_affect_layout() {
    let entries = [
        LayoutEntry::from_definition("ID INTEGER NOT NULL"),
        LayoutEntry::from_definition("CONSTRAINT PK PRIMARY KEY (ID)"),
        LayoutEntry::from_definition("CHECK (ID > 0)"),
    ];
    let schema = entries
        .into_iter()
        .fold(SchemaBuilder::new(), SchemaBuilder::entry)
        .build(4)
        .unwrap();
    assert_eq!(schema.fields().len(), 1);
}
