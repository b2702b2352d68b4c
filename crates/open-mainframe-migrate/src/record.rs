//! Fixed-length record decoding.
//!
//! A [`RecordDecoder`] holds an immutable [`Schema`] and the resolved
//! decode settings. Every buffer is decoded independently, so the same
//! decoder can be shared across threads and re-running it over the same
//! buffers yields the same records.
//!
//! # Example
//!
//! ```rust
//! use open_mainframe_migrate::{DecodeConfig, RecordDecoder, SchemaBuilder, Value};
//!
//! let schema = SchemaBuilder::new()
//!     .field("ID", "SMALLINT")
//!     .field("AMOUNT", "DECIMAL(5,2)")
//!     .build(5)
//!     .unwrap();
//! let decoder = RecordDecoder::new(schema, &DecodeConfig::default()).unwrap();
//!
//! let extract = [0x00, 0x01, 0x12, 0x34, 0x5C, 0x00, 0x02, 0x00, 0x01, 0x0D];
//! let records: Vec<_> = decoder.chunks(&extract).collect();
//! assert_eq!(records.len(), 2);
//!
//! let second = records[1].as_ref().unwrap();
//! assert_eq!(second.get("ID").unwrap().as_ref().unwrap(), &Value::SmallInt(2));
//! assert_eq!(second.get("AMOUNT").unwrap().as_ref().unwrap().to_string(), "-0.10");
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::config::{DecodeConfig, ErrorPolicy};
use crate::decode::{decode_field, DecodeContext, Value};
use crate::error::{ConfigError, FieldDecodeError, RecordError};
use crate::schema::{Field, Schema};

/// Outcome of decoding one field of a record.
pub type FieldResult = Result<Value, FieldDecodeError>;

/// Decodes fixed-length buffers against a [`Schema`].
#[derive(Debug, Clone)]
pub struct RecordDecoder {
    schema: Arc<Schema>,
    ctx: DecodeContext,
    policy: ErrorPolicy,
}

impl RecordDecoder {
    /// Create a decoder, resolving the configured encodings.
    ///
    /// # Errors
    /// `ConfigError::UnknownEncoding` for an encoding with no code table.
    pub fn new(schema: impl Into<Arc<Schema>>, config: &DecodeConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            schema: schema.into(),
            ctx: DecodeContext::from_config(config)?,
            policy: config.error_policy,
        })
    }

    /// Create a decoder from an already resolved context.
    pub fn with_context(
        schema: impl Into<Arc<Schema>>,
        ctx: DecodeContext,
        policy: ErrorPolicy,
    ) -> Self {
        Self {
            schema: schema.into(),
            ctx,
            policy,
        }
    }

    /// The record layout.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The field failure policy.
    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    /// Decode a single buffer as record 0.
    pub fn decode(&self, buffer: &[u8]) -> Result<DecodedRecord, RecordError> {
        self.decode_at(0, buffer)
    }

    /// Decode a buffer as record `index`.
    ///
    /// # Errors
    /// `LengthMismatch` when the buffer is not exactly one record long;
    /// `FieldFailed` for the first field error under the strict policy.
    pub fn decode_at(&self, index: usize, buffer: &[u8]) -> Result<DecodedRecord, RecordError> {
        let expected = self.schema.record_length();
        if buffer.len() != expected {
            debug!(index, expected, actual = buffer.len(), "record length mismatch");
            return Err(RecordError::LengthMismatch {
                index,
                expected,
                actual: buffer.len(),
            });
        }

        let mut results = Vec::new();
        for field in self.schema.output_fields() {
            match (self.policy, decode_field(field, buffer, &self.ctx)) {
                (ErrorPolicy::Strict, Err(source)) => {
                    debug!(index, error = %source, "record rejected");
                    return Err(RecordError::FieldFailed { index, source });
                }
                (_, result) => results.push(result),
            }
        }

        Ok(DecodedRecord {
            index,
            schema: Arc::clone(&self.schema),
            results,
        })
    }

    /// Lazily decode a sequence of buffers, numbering them from 0.
    pub fn records<I>(&self, buffers: I) -> Records<'_, I::IntoIter>
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        Records {
            decoder: self,
            buffers: buffers.into_iter(),
            index: 0,
        }
    }

    /// Lazily decode a contiguous extract of back-to-back records.
    ///
    /// A trailing partial record is reported as a length mismatch.
    pub fn chunks<'a>(&'a self, data: &'a [u8]) -> Records<'a, std::slice::Chunks<'a, u8>> {
        self.records(data.chunks(self.schema.record_length().max(1)))
    }

    /// Decode buffers on the rayon thread pool, preserving input order.
    #[cfg(feature = "parallel")]
    pub fn par_decode<B>(&self, buffers: &[B]) -> Vec<Result<DecodedRecord, RecordError>>
    where
        B: AsRef<[u8]> + Sync,
    {
        use rayon::prelude::*;

        buffers
            .par_iter()
            .enumerate()
            .map(|(index, buffer)| self.decode_at(index, buffer.as_ref()))
            .collect()
    }
}

/// Lazy iterator over decoded records.
#[derive(Debug, Clone)]
pub struct Records<'a, I> {
    decoder: &'a RecordDecoder,
    buffers: I,
    index: usize,
}

impl<I> Iterator for Records<'_, I>
where
    I: Iterator,
    I::Item: AsRef<[u8]>,
{
    type Item = Result<DecodedRecord, RecordError>;

    fn next(&mut self) -> Option<Self::Item> {
        let buffer = self.buffers.next()?;
        let index = self.index;
        self.index += 1;
        Some(self.decoder.decode_at(index, buffer.as_ref()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.buffers.size_hint()
    }
}

/// One decoded record: a value or an error per output field.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRecord {
    index: usize,
    schema: Arc<Schema>,
    results: Vec<FieldResult>,
}

impl DecodedRecord {
    /// Zero-based position of the record in its input.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Output fields paired with their results, in record order.
    pub fn iter(&self) -> impl Iterator<Item = (&Field, &FieldResult)> {
        self.schema.output_fields().zip(&self.results)
    }

    /// Result of the named field (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&FieldResult> {
        self.iter()
            .find(|(field, _)| field.name.eq_ignore_ascii_case(name))
            .map(|(_, result)| result)
    }

    /// Field errors of this record.
    pub fn errors(&self) -> impl Iterator<Item = &FieldDecodeError> {
        self.results.iter().filter_map(|r| r.as_ref().err())
    }

    /// Whether every field decoded.
    pub fn is_ok(&self) -> bool {
        self.results.iter().all(Result::is_ok)
    }

    /// Field values with failures substituted.
    ///
    /// A failed nullable field becomes [`Value::Null`]; a failed
    /// non-nullable field becomes the default of its output type.
    pub fn values(&self) -> Vec<(&str, Value)> {
        self.iter()
            .map(|(field, result)| {
                let value = match result {
                    Ok(value) => value.clone(),
                    Err(_) => substitute(field),
                };
                (field.name.as_str(), value)
            })
            .collect()
    }

    /// Consume the record, returning the raw per-field results.
    pub fn into_results(self) -> Vec<FieldResult> {
        self.results
    }
}

fn substitute(field: &Field) -> Value {
    if field.nullable {
        return Value::Null;
    }
    let default = Value::default_for(&field.output);
    if field.occurs > 1 {
        Value::List(vec![default; field.occurs])
    } else {
        default
    }
}
