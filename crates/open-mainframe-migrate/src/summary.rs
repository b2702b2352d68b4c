//! Partial-success accounting over a decode run.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::RecordError;
use crate::record::DecodedRecord;

/// Counts of decoded, degraded and rejected records.
///
/// Feed every result of a decode run to [`DecodeSummary::record`];
/// summaries from separate workers combine with [`DecodeSummary::merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DecodeSummary {
    /// Records where every field decoded.
    pub records_ok: usize,
    /// Records returned with at least one field error.
    pub records_with_errors: usize,
    /// Records rejected as a whole.
    pub records_failed: usize,
    /// Rejected records whose buffer had the wrong length.
    pub length_mismatches: usize,
    /// Field errors per field name.
    pub field_errors: BTreeMap<String, usize>,
    /// Failed nullable fields read as null, per field name.
    pub nulls: BTreeMap<String, usize>,
    /// Failed non-nullable fields read as the type default, per field name.
    pub substitutions: BTreeMap<String, usize>,
}

impl DecodeSummary {
    /// Create an empty summary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one record result.
    pub fn record(&mut self, result: &Result<DecodedRecord, RecordError>) {
        match result {
            Ok(record) if record.is_ok() => self.records_ok += 1,
            Ok(record) => {
                self.records_with_errors += 1;
                for (field, result) in record.iter() {
                    if result.is_ok() {
                        continue;
                    }
                    bump(&mut self.field_errors, &field.name);
                    if field.nullable {
                        bump(&mut self.nulls, &field.name);
                    } else {
                        bump(&mut self.substitutions, &field.name);
                    }
                }
            }
            Err(RecordError::FieldFailed { source, .. }) => {
                self.records_failed += 1;
                bump(&mut self.field_errors, &source.field);
            }
            Err(RecordError::LengthMismatch { .. }) => {
                self.records_failed += 1;
                self.length_mismatches += 1;
            }
        }
    }

    /// Add another summary's counts to this one.
    pub fn merge(&mut self, other: &DecodeSummary) {
        self.records_ok += other.records_ok;
        self.records_with_errors += other.records_with_errors;
        self.records_failed += other.records_failed;
        self.length_mismatches += other.length_mismatches;
        for (target, source) in [
            (&mut self.field_errors, &other.field_errors),
            (&mut self.nulls, &other.nulls),
            (&mut self.substitutions, &other.substitutions),
        ] {
            for (name, count) in source {
                *target.entry(name.clone()).or_default() += count;
            }
        }
    }

    /// Total records seen.
    pub fn total(&self) -> usize {
        self.records_ok + self.records_with_errors + self.records_failed
    }

    /// Whether every record decoded cleanly.
    pub fn is_clean(&self) -> bool {
        self.records_with_errors == 0 && self.records_failed == 0
    }
}

impl<'a> FromIterator<&'a Result<DecodedRecord, RecordError>> for DecodeSummary {
    fn from_iter<T: IntoIterator<Item = &'a Result<DecodedRecord, RecordError>>>(iter: T) -> Self {
        let mut summary = DecodeSummary::new();
        for result in iter {
            summary.record(result);
        }
        summary
    }
}

fn bump(counts: &mut BTreeMap<String, usize>, name: &str) {
    *counts.entry(name.to_string()).or_default() += 1;
}

impl fmt::Display for DecodeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Decode summary: {}", if self.is_clean() { "CLEAN" } else { "ERRORS" })?;
        writeln!(f, "  records:             {}", self.total())?;
        writeln!(f, "  ok:                  {}", self.records_ok)?;
        writeln!(f, "  with field errors:   {}", self.records_with_errors)?;
        write!(f, "  rejected:            {}", self.records_failed)?;
        if self.length_mismatches > 0 {
            write!(f, " ({} wrong length)", self.length_mismatches)?;
        }

        for (title, counts) in [
            ("Field errors", &self.field_errors),
            ("Read as null", &self.nulls),
            ("Read as default", &self.substitutions),
        ] {
            if counts.is_empty() {
                continue;
            }
            write!(f, "\n{}:", title)?;
            for (name, count) in counts {
                write!(f, "\n  {}: {}", name, count)?;
            }
        }
        Ok(())
    }
}
