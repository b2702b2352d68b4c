//! Mapping of parsed declarations to output types.
//!
//! The mapping is a table lookup plus the binary size classes:
//!
//! | Descriptor                        | Output                         |
//! |-----------------------------------|--------------------------------|
//! | zoned / binary, 1-4 digits        | `SmallInt`                     |
//! | zoned / binary, 5-9 digits        | `Integer`                      |
//! | zoned / binary, 10-18 digits      | `BigInt`                       |
//! | zoned / binary with scale or > 18 | `Decimal(p, s)`                |
//! | packed                            | `Decimal(p, s)`                |
//! | Float32 / Float64                 | `Real` / `Double`              |
//! | text kinds                        | `Text`                         |
//! | binary kinds                      | `Binary`                       |
//! | Date / Time / Timestamp / Boolean | same                           |
//! | Unsupported                       | `Text`, with a [`TypeWarning`] |

use std::fmt;

use serde::Serialize;
use tracing::warn;

use super::descriptor::{TypeDescriptor, TypeKind};

/// Type of a decoded output column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputType {
    /// 16-bit signed integer.
    SmallInt,
    /// 32-bit signed integer.
    Integer,
    /// 64-bit signed integer.
    BigInt,
    /// Exact decimal.
    Decimal {
        /// Total digits.
        precision: u8,
        /// Digits after the decimal point.
        scale: u8,
    },
    /// IEEE single precision.
    Real,
    /// IEEE double precision.
    Double,
    /// Character data.
    Text,
    /// Opaque bytes.
    Binary,
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
    /// Date and time.
    Timestamp {
        /// Fractional second digits.
        fraction_digits: u8,
    },
    /// Truth value.
    Boolean,
}

impl OutputType {
    /// Integer and decimal outputs.
    pub fn is_exact_numeric(&self) -> bool {
        matches!(
            self,
            OutputType::SmallInt
                | OutputType::Integer
                | OutputType::BigInt
                | OutputType::Decimal { .. }
        )
    }

    /// Any numeric output, including floats.
    pub fn is_numeric(&self) -> bool {
        self.is_exact_numeric() || matches!(self, OutputType::Real | OutputType::Double)
    }

    /// Whether values of `other` can be loaded into a column of this type.
    ///
    /// Numeric types accept each other, text accepts text, temporal types
    /// accept text (their external form), and every type accepts itself.
    /// Used when the same data is described twice, for example by a VSAM
    /// copybook and a DB2 DCLGEN.
    pub fn is_compatible_with(&self, other: &OutputType) -> bool {
        if self == other || (self.is_numeric() && other.is_numeric()) {
            return true;
        }
        match (self, other) {
            (OutputType::Timestamp { .. }, OutputType::Timestamp { .. }) => true,
            (OutputType::Date | OutputType::Time | OutputType::Timestamp { .. }, OutputType::Text) => {
                true
            }
            (OutputType::Text, OutputType::Date | OutputType::Time | OutputType::Timestamp { .. }) => {
                true
            }
            _ => false,
        }
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputType::SmallInt => f.write_str("SMALLINT"),
            OutputType::Integer => f.write_str("INTEGER"),
            OutputType::BigInt => f.write_str("BIGINT"),
            OutputType::Decimal { precision, scale } => write!(f, "DECIMAL({},{})", precision, scale),
            OutputType::Real => f.write_str("REAL"),
            OutputType::Double => f.write_str("DOUBLE"),
            OutputType::Text => f.write_str("TEXT"),
            OutputType::Binary => f.write_str("BINARY"),
            OutputType::Date => f.write_str("DATE"),
            OutputType::Time => f.write_str("TIME"),
            OutputType::Timestamp { fraction_digits } => write!(f, "TIMESTAMP({})", fraction_digits),
            OutputType::Boolean => f.write_str("BOOLEAN"),
        }
    }
}

/// A non-fatal note about a declaration that was mapped by fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeWarning {
    /// The declaration text.
    pub declaration: String,
    /// What was done with it.
    pub message: String,
}

impl fmt::Display for TypeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.declaration, self.message)
    }
}

/// Result of mapping one descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedType {
    /// The output column type.
    pub output: OutputType,
    /// Set when the mapping fell back.
    pub warning: Option<TypeWarning>,
}

/// Output type for a descriptor, without recording warnings.
pub fn output_type(descriptor: &TypeDescriptor) -> OutputType {
    let decimal = OutputType::Decimal {
        precision: descriptor.total_digits,
        scale: descriptor.scale_digits,
    };

    match descriptor.kind {
        TypeKind::ZonedInteger | TypeKind::BinaryInteger => {
            if descriptor.scale_digits > 0 {
                return decimal;
            }
            match descriptor.total_digits {
                0..=4 => OutputType::SmallInt,
                5..=9 => OutputType::Integer,
                10..=18 => OutputType::BigInt,
                _ => decimal,
            }
        }
        TypeKind::PackedDecimal => decimal,
        TypeKind::Float32 => OutputType::Real,
        TypeKind::Float64 => OutputType::Double,
        TypeKind::FixedText | TypeKind::VariableText | TypeKind::Unsupported => OutputType::Text,
        TypeKind::FixedBinary | TypeKind::VariableBinary => OutputType::Binary,
        TypeKind::Date => OutputType::Date,
        TypeKind::Time => OutputType::Time,
        TypeKind::Timestamp => OutputType::Timestamp {
            fraction_digits: descriptor.fraction_digits(),
        },
        TypeKind::Boolean => OutputType::Boolean,
    }
}

/// Map a descriptor to its output type.
///
/// `Unsupported` declarations map to `Text` and carry a warning keyed by
/// the declaration text; the warning is also logged.
pub fn map_type(descriptor: &TypeDescriptor) -> MappedType {
    let output = output_type(descriptor);
    let warning = (descriptor.kind == TypeKind::Unsupported).then(|| {
        warn!(
            declaration = %descriptor.declaration,
            "unsupported type declaration, mapping to text"
        );
        TypeWarning {
            declaration: descriptor.declaration.clone(),
            message: format!(
                "unsupported type, read as variable-length text of up to {} bytes",
                descriptor.byte_length
            ),
        }
    });
    MappedType { output, warning }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(decl: &str) -> MappedType {
        map_type(&TypeDescriptor::parse(decl))
    }

    #[test]
    fn test_binary_size_classes() {
        assert_eq!(map("PIC S9(4) COMP").output, OutputType::SmallInt);
        assert_eq!(map("PIC S9(5) COMP").output, OutputType::Integer);
        assert_eq!(map("PIC S9(9) COMP").output, OutputType::Integer);
        assert_eq!(map("PIC S9(10) COMP").output, OutputType::BigInt);
        assert_eq!(map("PIC S9(18) COMP").output, OutputType::BigInt);
        assert_eq!(map("SMALLINT").output, OutputType::SmallInt);
        assert_eq!(map("INTEGER").output, OutputType::Integer);
        assert_eq!(map("BIGINT").output, OutputType::BigInt);
    }

    #[test]
    fn test_zoned_size_classes() {
        assert_eq!(map("PIC 9(3)").output, OutputType::SmallInt);
        assert_eq!(map("PIC S9(7)").output, OutputType::Integer);
        assert_eq!(map("PIC 9(12)").output, OutputType::BigInt);
        assert_eq!(
            map("PIC 9(20)").output,
            OutputType::Decimal { precision: 20, scale: 0 }
        );
    }

    #[test]
    fn test_scaled_integers_become_decimal() {
        assert_eq!(
            map("PIC S9(7)V99").output,
            OutputType::Decimal { precision: 9, scale: 2 }
        );
        assert_eq!(
            map("PIC S9(5)V9 COMP").output,
            OutputType::Decimal { precision: 6, scale: 1 }
        );
    }

    #[test]
    fn test_decimal_passthrough() {
        let mapped = map("DECIMAL(15,4)");
        assert_eq!(mapped.output, OutputType::Decimal { precision: 15, scale: 4 });
        assert!(mapped.warning.is_none());
        assert_eq!(
            map("DECFLOAT(34)").output,
            OutputType::Decimal { precision: 34, scale: 0 }
        );
    }

    #[test]
    fn test_other_kinds() {
        assert_eq!(map("REAL").output, OutputType::Real);
        assert_eq!(map("COMP-2").output, OutputType::Double);
        assert_eq!(map("VARCHAR(10)").output, OutputType::Text);
        assert_eq!(map("GRAPHIC(4)").output, OutputType::Text);
        assert_eq!(map("CHAR(4) FOR BIT DATA").output, OutputType::Binary);
        assert_eq!(map("DATE").output, OutputType::Date);
        assert_eq!(map("TIME").output, OutputType::Time);
        assert!(OutputType::Time.is_compatible_with(&OutputType::Text));
        assert_eq!(OutputType::Time.to_string(), "TIME");
        assert_eq!(
            map("TIMESTAMP(9)").output,
            OutputType::Timestamp { fraction_digits: 9 }
        );
        assert_eq!(map("BOOLEAN").output, OutputType::Boolean);
    }

    #[test]
    fn test_unsupported_maps_to_text_with_warning() {
        let mapped = map("ROWID");
        assert_eq!(mapped.output, OutputType::Text);
        let warning = mapped.warning.unwrap();
        assert_eq!(warning.declaration, "ROWID");
    }

    #[test]
    fn test_compatibility() {
        let int = OutputType::Integer;
        let dec = OutputType::Decimal { precision: 9, scale: 2 };
        assert!(int.is_compatible_with(&dec));
        assert!(OutputType::Double.is_compatible_with(&OutputType::SmallInt));
        assert!(OutputType::Text.is_compatible_with(&OutputType::Text));
        assert!(OutputType::Date.is_compatible_with(&OutputType::Text));
        assert!(!OutputType::Text.is_compatible_with(&OutputType::Integer));
        assert!(!OutputType::Binary.is_compatible_with(&OutputType::Text));
        assert!(!OutputType::Boolean.is_compatible_with(&OutputType::SmallInt));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            OutputType::Decimal { precision: 15, scale: 4 }.to_string(),
            "DECIMAL(15,4)"
        );
        assert_eq!(OutputType::Text.to_string(), "TEXT");
    }
}
