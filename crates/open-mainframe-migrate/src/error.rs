//! Migration error types.
//!
//! Parse problems never surface here: an unrecognized declaration becomes
//! an `Unsupported` descriptor with a warning. Schema errors are fatal for
//! the layout, field errors are scoped to one field, and record errors to
//! one buffer.

use std::fmt;

use miette::Diagnostic;
use open_mainframe_encoding::EncodingError;
use thiserror::Error;

/// Errors raised while building a [`Schema`](crate::Schema).
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum SchemaError {
    /// Field spans do not add up to the declared record length.
    #[error("record layout spans {computed} bytes but the declared record length is {declared}")]
    #[diagnostic(
        code(migrate::schema_length_mismatch),
        help("check the field declarations against the dataset LRECL")
    )]
    LengthMismatch {
        /// Sum of computed field spans.
        computed: usize,
        /// Declared record length.
        declared: usize,
    },

    /// Two output fields share a name.
    #[error("field '{name}' is declared more than once")]
    #[diagnostic(code(migrate::duplicate_field))]
    DuplicateField {
        /// The repeated name.
        name: String,
    },

    /// A field entry has a blank name.
    #[error("field entry #{position} has no name")]
    #[diagnostic(code(migrate::empty_field_name))]
    EmptyFieldName {
        /// Zero-based position of the entry.
        position: usize,
    },

    /// Field offsets run past the addressable range.
    #[error("field '{field}' ends beyond the largest addressable offset")]
    #[diagnostic(
        code(migrate::layout_overflow),
        help("check the OCCURS count and declared length of the field")
    )]
    LayoutOverflow {
        /// The field whose span overflowed the running offset.
        field: String,
    },

    /// A column names a CCSID with no code table.
    #[error("field '{field}' uses CCSID {ccsid}, which has no code table")]
    #[diagnostic(
        code(migrate::unknown_ccsid),
        help("mixed DBCS CCSIDs such as 930, 935 and 937 are not supported")
    )]
    UnknownCcsid {
        /// Field name.
        field: String,
        /// The declared CCSID.
        ccsid: u16,
    },
}

/// Why a single field failed to decode.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum DecodeErrorKind {
    /// Bad digit or sign nibble, or malformed Unicode text.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Encoding(#[from] EncodingError),

    /// A variable-length prefix larger than the declared maximum.
    #[error("length prefix {prefix} exceeds declared maximum {max}")]
    #[diagnostic(code(migrate::length_prefix))]
    LengthPrefix {
        /// Value read from the 2-byte prefix.
        prefix: usize,
        /// Declared maximum length.
        max: usize,
    },

    /// The field slice is shorter than the layout requires.
    #[error("field needs {needed} bytes but only {available} are present")]
    #[diagnostic(code(migrate::truncated))]
    Truncated {
        /// Bytes required.
        needed: usize,
        /// Bytes present.
        available: usize,
    },

    /// A date that is not a real calendar date or not `YYYY-MM-DD`.
    #[error("invalid date '{text}'")]
    #[diagnostic(code(migrate::invalid_date))]
    InvalidDate {
        /// The digits or text that were read.
        text: String,
    },

    /// A timestamp that does not match `YYYY-MM-DD-HH.MM.SS[.f]`.
    #[error("invalid timestamp '{text}'")]
    #[diagnostic(code(migrate::invalid_timestamp))]
    InvalidTimestamp {
        /// The digits or text that were read.
        text: String,
    },

    /// A time that is not a real time of day or not `HH.MM.SS`.
    #[error("invalid time '{text}'")]
    #[diagnostic(code(migrate::invalid_time))]
    InvalidTime {
        /// The digits or text that were read.
        text: String,
    },

    /// A boolean byte other than 0x00 or 0x01.
    #[error("invalid boolean byte 0x{byte:02X}")]
    #[diagnostic(code(migrate::invalid_boolean))]
    InvalidBoolean {
        /// The offending byte.
        byte: u8,
    },

    /// A decoded value that does not fit its output type.
    #[error("value {value} does not fit {target}")]
    #[diagnostic(code(migrate::out_of_range))]
    OutOfRange {
        /// The decoded value.
        value: String,
        /// The output type name.
        target: &'static str,
    },
}

/// A field decode failure tagged with its location and raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("field '{field}' at offset {offset} [{}]: {kind}", HexBytes(.bytes))]
#[diagnostic(code(migrate::field_decode))]
pub struct FieldDecodeError {
    /// Field name.
    pub field: String,
    /// Byte offset of the field within the record.
    pub offset: usize,
    /// The offending bytes.
    pub bytes: Vec<u8>,
    /// What went wrong.
    #[source]
    pub kind: DecodeErrorKind,
}

struct HexBytes<'a>(&'a [u8]);

impl fmt::Display for HexBytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{:02X}", b)?;
        }
        Ok(())
    }
}

/// Errors that make a whole record unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum RecordError {
    /// The buffer is not exactly one record long.
    #[error("record {index}: expected {expected} bytes, got {actual}")]
    #[diagnostic(code(migrate::record_length))]
    LengthMismatch {
        /// Zero-based record index.
        index: usize,
        /// Declared record length.
        expected: usize,
        /// Buffer length.
        actual: usize,
    },

    /// A field failed under the strict error policy.
    #[error("record {index}: {source}")]
    #[diagnostic(code(migrate::record_field_failed))]
    FieldFailed {
        /// Zero-based record index.
        index: usize,
        /// The first field failure.
        source: FieldDecodeError,
    },
}

impl RecordError {
    /// Zero-based index of the failing record.
    pub fn index(&self) -> usize {
        match self {
            RecordError::LengthMismatch { index, .. } | RecordError::FieldFailed { index, .. } => {
                *index
            }
        }
    }
}

/// Errors loading or resolving configuration.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// Malformed TOML.
    #[error("invalid configuration: {0}")]
    #[diagnostic(code(migrate::config_parse))]
    Parse(#[from] toml::de::Error),

    /// The configuration file could not be read.
    #[error("cannot read configuration: {0}")]
    #[diagnostic(code(migrate::config_io))]
    Io(#[from] std::io::Error),

    /// An encoding name or CCSID with no code table.
    #[error("unknown encoding '{name}'")]
    #[diagnostic(
        code(migrate::unknown_encoding),
        help("use an EBCDIC page such as CP037 or CP273, UTF-8 (1208) or UTF-16BE (1200)")
    )]
    UnknownEncoding {
        /// The requested name.
        name: String,
    },
}
