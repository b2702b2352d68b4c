//! Mainframe data migration for OpenMainframe.
//!
//! This crate infers a portable schema from DB2 column types and COBOL
//! copybook pictures, and decodes fixed-length EBCDIC records into typed,
//! exact values.
//!
//! # Features
//!
//! - **Type Parsing**: DB2 column types and COBOL picture clauses into one
//!   [`TypeDescriptor`], with a documented fallback for anything unknown
//! - **Type Mapping**: descriptors to [`OutputType`] size classes
//! - **Record Layouts**: [`SchemaBuilder`] assigns offsets, handles
//!   FILLER and OCCURS, and checks the record length
//! - **Field Decoding**: EBCDIC and Unicode text, zoned and packed decimal,
//!   binary integers, IEEE and IBM hex floats, DB2 dates and timestamps
//! - **Record Decoding**: lazy, restartable decoding with tolerant or strict
//!   error policies, plus a [`DecodeSummary`] for partial-success reporting
//! - **Parallelism**: `par_decode` on rayon with the `parallel` feature
//!
//! # Example
//!
//! ```rust
//! use open_mainframe_migrate::{MigrationConfig, RecordDecoder, SchemaBuilder, Value};
//!
//! let config = MigrationConfig::default();
//! let schema = SchemaBuilder::new()
//!     .with_layout(config.layout)
//!     .definitions([
//!         "01 ACCOUNT-REC.",
//!         "   05 ACCT-ID     PIC X(4).",
//!         "   05 BALANCE     PIC S9(7)V99 COMP-3.",
//!     ])
//!     .build(9)
//!     .unwrap();
//!
//! let decoder = RecordDecoder::new(schema, &config.decode).unwrap();
//! let record = decoder
//!     .decode(&[0xC1, 0xC3, 0xF0, 0xF1, 0x00, 0x12, 0x34, 0x56, 0x7C])
//!     .unwrap();
//!
//! let values = record.values();
//! assert_eq!(values[0], ("ACCT-ID", Value::Text("AC01".to_string())));
//! assert_eq!(values[1].1.to_string(), "12345.67");
//! ```

pub mod config;
pub mod decode;
pub mod error;
pub mod record;
pub mod schema;
pub mod summary;
pub mod types;

pub use config::{DecodeConfig, ErrorPolicy, FloatFormat, LayoutConfig, MigrationConfig, TemporalForm};
pub use decode::{decode_field, decode_value, DecodeContext, Timestamp, Value};
pub use error::{ConfigError, DecodeErrorKind, FieldDecodeError, RecordError, SchemaError};
pub use record::{DecodedRecord, FieldResult, RecordDecoder, Records};
pub use schema::{Field, LayoutEntry, Schema, SchemaBuilder, FILLER};
pub use summary::DecodeSummary;
pub use types::{
    map_type, output_type, parse_declaration, MappedType, OutputType, TypeDescriptor, TypeKind,
    TypeWarning, MAX_LENGTH,
};

/// Result type for schema construction.
pub type Result<T> = std::result::Result<T, SchemaError>;
