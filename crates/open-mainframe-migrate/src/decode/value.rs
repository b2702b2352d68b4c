//! Decoded field values.

use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use open_mainframe_encoding::ExactDecimal;

use crate::types::OutputType;

/// A timestamp with up to 12 fractional second digits.
///
/// `chrono` stops at nanoseconds, so the fraction is kept as an integer of
/// `precision` digits next to the whole-second date and time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timestamp {
    seconds: NaiveDateTime,
    fraction: u64,
    precision: u8,
}

impl Timestamp {
    /// Create a timestamp; `seconds` should carry no sub-second part.
    pub fn new(seconds: NaiveDateTime, fraction: u64, precision: u8) -> Self {
        Self {
            seconds,
            fraction,
            precision,
        }
    }

    /// Date and time to the whole second.
    pub fn seconds(&self) -> NaiveDateTime {
        self.seconds
    }

    /// Fractional digits as an integer.
    pub fn fraction(&self) -> u64 {
        self.fraction
    }

    /// Number of fractional digits.
    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// Convert to `chrono`, truncating below nanoseconds.
    pub fn to_naive(&self) -> NaiveDateTime {
        let p = u32::from(self.precision);
        let nanos = if p <= 9 {
            self.fraction * 10u64.pow(9 - p)
        } else {
            self.fraction / 10u64.pow(p - 9)
        };
        // At most 999_999_999.
        self.seconds + Duration::nanoseconds(nanos as i64)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.seconds.format("%Y-%m-%d-%H.%M.%S"))?;
        if self.precision > 0 {
            write!(f, ".{:0width$}", self.fraction, width = usize::from(self.precision))?;
        }
        Ok(())
    }
}

/// A decoded field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// No value (tolerant substitution for a nullable field).
    Null,
    /// 16-bit integer.
    SmallInt(i16),
    /// 32-bit integer.
    Integer(i32),
    /// 64-bit integer.
    BigInt(i64),
    /// Exact decimal.
    Decimal(ExactDecimal),
    /// Single precision float.
    Real(f32),
    /// Double precision float.
    Double(f64),
    /// Character data, pad characters preserved.
    Text(String),
    /// Opaque bytes.
    Binary(Vec<u8>),
    /// Calendar date.
    Date(NaiveDate),
    /// Time of day.
    Time(NaiveTime),
    /// Date and time.
    Timestamp(Timestamp),
    /// Truth value.
    Boolean(bool),
    /// Elements of an `OCCURS` field.
    List(Vec<Value>),
}

impl Value {
    /// The value substituted for a failed non-nullable field.
    ///
    /// Zero for numbers, empty text and bytes, `false`, midnight for times
    /// and the Unix epoch for dates and timestamps.
    pub fn default_for(output: &OutputType) -> Value {
        match *output {
            OutputType::SmallInt => Value::SmallInt(0),
            OutputType::Integer => Value::Integer(0),
            OutputType::BigInt => Value::BigInt(0),
            OutputType::Decimal { scale, .. } => Value::Decimal(ExactDecimal::new(0, scale)),
            OutputType::Real => Value::Real(0.0),
            OutputType::Double => Value::Double(0.0),
            OutputType::Text => Value::Text(String::new()),
            OutputType::Binary => Value::Binary(Vec::new()),
            OutputType::Date => Value::Date(NaiveDate::default()),
            OutputType::Time => Value::Time(NaiveTime::default()),
            OutputType::Timestamp { fraction_digits } => {
                Value::Timestamp(Timestamp::new(NaiveDateTime::default(), 0, fraction_digits))
            }
            OutputType::Boolean => Value::Boolean(false),
        }
    }

    /// Whether this is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Integer value of any integer variant.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::SmallInt(v) => Some(i64::from(v)),
            Value::Integer(v) => Some(i64::from(v)),
            Value::BigInt(v) => Some(v),
            _ => None,
        }
    }

    /// Decimal value of any exact numeric variant.
    pub fn as_decimal(&self) -> Option<ExactDecimal> {
        match *self {
            Value::Decimal(d) => Some(d),
            _ => self.as_i64().map(ExactDecimal::from),
        }
    }

    /// Text content.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::SmallInt(v) => write!(f, "{}", v),
            Value::Integer(v) => write!(f, "{}", v),
            Value::BigInt(v) => write!(f, "{}", v),
            Value::Decimal(v) => write!(f, "{}", v),
            Value::Real(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Text(v) => f.write_str(v),
            Value::Binary(v) => {
                for b in v {
                    write!(f, "{:02X}", b)?;
                }
                Ok(())
            }
            Value::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            Value::Time(v) => write!(f, "{}", v.format("%H.%M.%S")),
            Value::Timestamp(v) => write!(f, "{}", v),
            Value::Boolean(v) => write!(f, "{}", v),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}
