//! Record layouts.
//!
//! A [`SchemaBuilder`] takes an ordered list of layout entries (DB2 column
//! definitions or copybook elementary items), parses and maps each type,
//! assigns byte offsets cumulatively and checks the total against the
//! declared record length. The resulting [`Schema`] is immutable.
//!
//! # Example
//!
//! ```rust
//! use open_mainframe_migrate::SchemaBuilder;
//!
//! let schema = SchemaBuilder::new()
//!     .field("CUST_ID", "CHAR(9)")
//!     .field("FIRST_NAME", "CHAR(25)")
//!     .field("LAST_NAME", "CHAR(25)")
//!     .filler(1)
//!     .build(59)
//!     .unwrap();
//!
//! assert_eq!(schema.field("LAST_NAME").unwrap().offset, 34);
//! assert_eq!(schema.output_fields().count(), 3);
//! ```

use std::collections::HashSet;
use std::fmt::Write as _;

use serde::Serialize;
use tracing::{debug, warn};

use open_mainframe_encoding::TextEncoding;

use crate::config::LayoutConfig;
use crate::error::SchemaError;
use crate::types::{map_type, OutputType, TypeDescriptor, TypeWarning};

/// Name that marks a reserved span excluded from output.
pub const FILLER: &str = "FILLER";

/// Column qualifiers that end the type part of a column definition.
const COLUMN_QUALIFIERS: &[&str] = &[
    " NOT NULL",
    " WITH DEFAULT",
    " DEFAULT",
    " PRIMARY KEY",
    " UNIQUE",
    " REFERENCES",
    " GENERATED",
    " CONSTRAINT",
    " CHECK",
];

/// Usage clauses that make a copybook item elementary without a picture.
const PICTURELESS_USAGES: &[&str] = &[
    "COMP-1",
    "COMP-2",
    "COMPUTATIONAL-1",
    "COMPUTATIONAL-2",
];

/// One line of a record layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutEntry {
    /// A field occupying bytes in the record.
    Field {
        /// Field name; `FILLER` reserves bytes without producing output.
        name: String,
        /// Type declaration text.
        declaration: String,
        /// Whether the column admits nulls.
        nullable: bool,
        /// Copybook `OCCURS` count, 1 for scalar fields.
        occurs: usize,
    },
    /// A constraint, group item or other line that occupies no bytes.
    Definition(String),
}

impl LayoutEntry {
    /// Nullable scalar field.
    pub fn field(name: impl Into<String>, declaration: impl Into<String>) -> Self {
        LayoutEntry::Field {
            name: name.into(),
            declaration: declaration.into(),
            nullable: true,
            occurs: 1,
        }
    }

    /// Non-nullable scalar field.
    pub fn not_null(name: impl Into<String>, declaration: impl Into<String>) -> Self {
        LayoutEntry::Field {
            name: name.into(),
            declaration: declaration.into(),
            nullable: false,
            occurs: 1,
        }
    }

    /// Reserved span of `length` bytes.
    ///
    /// A zero-length filler reserves nothing and becomes a
    /// [`LayoutEntry::Definition`].
    pub fn filler(length: usize) -> Self {
        if length == 0 {
            return LayoutEntry::Definition(FILLER.to_string());
        }
        LayoutEntry::Field {
            name: FILLER.to_string(),
            declaration: format!("CHAR({})", length),
            nullable: false,
            occurs: 1,
        }
    }

    /// Classify one definition line.
    ///
    /// Accepts DB2 column definitions (`CUST_ID CHAR(9) NOT NULL,`) and
    /// copybook items (`05 AMOUNT PIC S9(7)V99 COMP-3 OCCURS 12 TIMES.`).
    /// Constraint lines, group items, level 66/88 entries and
    /// `REDEFINES` alternatives become [`LayoutEntry::Definition`].
    pub fn from_definition(line: &str) -> Self {
        let trimmed = line.trim().trim_end_matches([',', '.', ';']).trim_end();
        let first = trimmed.split_whitespace().next().unwrap_or("");

        if first.is_empty()
            || first.starts_with("--")
            || first.starts_with('*')
            || first.starts_with('(')
            || first.starts_with(')')
            || is_constraint(trimmed)
        {
            return LayoutEntry::Definition(trimmed.to_string());
        }

        if first.chars().all(|c| c.is_ascii_digit()) {
            return copybook_entry(trimmed, first);
        }

        column_entry(trimmed)
    }

    /// Whether this entry reserves bytes without producing output.
    pub fn is_filler(&self) -> bool {
        matches!(self, LayoutEntry::Field { name, .. } if name.eq_ignore_ascii_case(FILLER))
    }
}

/// Whether a line opens a table-level constraint.
///
/// `KEY`, `INDEX`, `UNIQUE` and `CHECK` are also legal column names, so
/// they count only when a parenthesized list follows. `PRIMARY` and
/// `FOREIGN` need `KEY` after them.
fn is_constraint(line: &str) -> bool {
    let upper = line.to_ascii_uppercase();
    let split = upper
        .find(|c: char| c.is_whitespace() || c == '(')
        .unwrap_or(upper.len());
    let (keyword, rest) = (&upper[..split], upper[split..].trim_start());
    let next_word = rest
        .split(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or("");

    match keyword {
        "CONSTRAINT" => true,
        "PRIMARY" | "FOREIGN" => next_word == "KEY",
        "UNIQUE" => rest.starts_with('(') || matches!(next_word, "KEY" | "INDEX"),
        "CHECK" | "INDEX" | "KEY" => rest.starts_with('('),
        _ => false,
    }
}

/// `NAME TYPE [qualifiers]`, with an optionally double-quoted name.
fn column_entry(line: &str) -> LayoutEntry {
    let (name, rest) = match line.strip_prefix('"') {
        Some(quoted) => match quoted.split_once('"') {
            Some((name, rest)) => (name.to_string(), rest.trim()),
            None => return LayoutEntry::Definition(line.to_string()),
        },
        None => match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name.to_string(), rest.trim()),
            None => return LayoutEntry::Definition(line.to_string()),
        },
    };

    let upper = format!(" {}", rest.to_ascii_uppercase());
    let nullable = !upper.contains(" NOT NULL");
    let cut = COLUMN_QUALIFIERS
        .iter()
        .filter_map(|q| find_word(&upper, q))
        .min()
        .unwrap_or(upper.len());
    // `upper` carries one leading space relative to `rest`.
    let declaration = rest[..cut.saturating_sub(1).min(rest.len())].trim().to_string();

    LayoutEntry::Field {
        name,
        declaration,
        nullable,
        occurs: 1,
    }
}

/// `LEVEL [NAME] clauses`.
fn copybook_entry(line: &str, level: &str) -> LayoutEntry {
    if matches!(level.trim_start_matches('0'), "66" | "88") {
        return LayoutEntry::Definition(line.to_string());
    }

    let tokens: Vec<&str> = line.split_whitespace().skip(1).collect();
    let upper: Vec<String> = tokens.iter().map(|t| t.to_ascii_uppercase()).collect();

    let clause_start = |t: &str| {
        matches!(t, "PIC" | "PICTURE" | "USAGE" | "OCCURS" | "VALUE" | "VALUES")
            || PICTURELESS_USAGES.contains(&t)
    };

    let (name, clauses_from) = match upper.first() {
        Some(first) if !clause_start(first) => (tokens[0].to_string(), 1),
        _ => (FILLER.to_string(), 0),
    };

    if upper.iter().any(|t| t == "REDEFINES") {
        warn!(field = %name, "REDEFINES alternative skipped in record layout");
        return LayoutEntry::Definition(line.to_string());
    }

    let mut occurs = 1;
    let mut declaration: Vec<&str> = Vec::new();
    let mut i = clauses_from;
    while i < tokens.len() {
        match upper[i].as_str() {
            "OCCURS" => {
                if let Some(n) = tokens.get(i + 1).and_then(|t| t.parse::<usize>().ok()) {
                    occurs = n.max(1);
                    i += 1;
                }
                if upper.get(i + 1).is_some_and(|t| t == "TIMES") {
                    i += 1;
                }
            }
            "VALUE" | "VALUES" => break,
            _ => declaration.push(tokens[i]),
        }
        i += 1;
    }

    let is_elementary = declaration.iter().any(|t| {
        let t = t.to_ascii_uppercase();
        t == "PIC" || t == "PICTURE" || PICTURELESS_USAGES.contains(&t.as_str())
    });
    if !is_elementary {
        return LayoutEntry::Definition(line.to_string());
    }

    LayoutEntry::Field {
        name,
        declaration: declaration.join(" "),
        nullable: true,
        occurs,
    }
}

/// Byte position of `needle` in `haystack` when followed by a word boundary.
fn find_word(haystack: &str, needle: &str) -> Option<usize> {
    haystack.match_indices(needle).map(|(i, _)| i).find(|&i| {
        haystack[i + needle.len()..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_ascii_alphanumeric() && c != '_')
    })
}

/// A field laid out in a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    /// Field name, unique among non-filler fields.
    pub name: String,
    /// Parsed declaration.
    pub descriptor: TypeDescriptor,
    /// Output column type.
    pub output: OutputType,
    /// Byte offset within the record.
    pub offset: usize,
    /// Bytes occupied, including every `OCCURS` element.
    pub span_length: usize,
    /// Whether the column admits nulls.
    pub nullable: bool,
    /// Reserved span excluded from output.
    pub is_filler: bool,
    /// Number of repeated elements.
    pub occurs: usize,
}

impl Field {
    /// Bytes occupied by one element.
    pub fn element_length(&self) -> usize {
        self.span_length / self.occurs.max(1)
    }

    /// Byte range of the field within a record.
    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.span_length
    }
}

/// An immutable record layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    fields: Vec<Field>,
    record_length: usize,
    warnings: Vec<TypeWarning>,
}

impl Schema {
    /// All fields in record order, fillers included.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Fields that produce output, in record order.
    pub fn output_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| !f.is_filler)
    }

    /// Look up an output field by name (case-insensitive).
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.output_fields().find(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// Declared record length in bytes.
    pub fn record_length(&self) -> usize {
        self.record_length
    }

    /// Fallback warnings raised while mapping types.
    pub fn warnings(&self) -> &[TypeWarning] {
        &self.warnings
    }

    /// Offset/length/name/type table of the layout.
    pub fn layout_report(&self) -> String {
        let width = self
            .fields
            .iter()
            .map(|f| f.name.len())
            .max()
            .unwrap_or(4)
            .max(4);

        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:>6}  {:>6}  {:<width$}  TYPE",
            "OFFSET", "LENGTH", "NAME"
        );
        for field in &self.fields {
            let mut line = format!(
                "{:>6}  {:>6}  {:<width$}  {}",
                field.offset, field.span_length, field.name, field.descriptor
            );
            if field.is_filler {
                line.push_str(" (filler)");
            } else {
                let _ = write!(line, " -> {}", field.output);
                if field.occurs > 1 {
                    let _ = write!(line, " x{}", field.occurs);
                }
                if !field.nullable {
                    line.push_str(" NOT NULL");
                }
            }
            let _ = writeln!(out, "{}", line.trim_end());
        }
        let _ = write!(out, "{:>6}  {:>6}  (record)", 0, self.record_length);
        out
    }

    /// Pretty-printed JSON description of the layout.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Builds a [`Schema`] from layout entries.
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    entries: Vec<LayoutEntry>,
    layout: LayoutConfig,
}

impl SchemaBuilder {
    /// Create an empty builder with the default layout settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given layout settings.
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Append an entry.
    pub fn entry(mut self, entry: LayoutEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Append a nullable field.
    pub fn field(self, name: impl Into<String>, declaration: impl Into<String>) -> Self {
        self.entry(LayoutEntry::field(name, declaration))
    }

    /// Append a non-nullable field.
    pub fn not_null(self, name: impl Into<String>, declaration: impl Into<String>) -> Self {
        self.entry(LayoutEntry::not_null(name, declaration))
    }

    /// Append a reserved span.
    pub fn filler(self, length: usize) -> Self {
        self.entry(LayoutEntry::filler(length))
    }

    /// Append one definition line, classified by [`LayoutEntry::from_definition`].
    pub fn definition(self, line: &str) -> Self {
        self.entry(LayoutEntry::from_definition(line))
    }

    /// Append every line of a definition block.
    pub fn definitions<'a>(self, lines: impl IntoIterator<Item = &'a str>) -> Self {
        lines.into_iter().fold(self, |builder, line| builder.definition(line))
    }

    /// Lay out the fields and check them against `record_length`.
    ///
    /// # Errors
    /// `EmptyFieldName` for a blank name, `DuplicateField` when two output
    /// fields share a name, `UnknownCcsid` for a CCSID with no code table,
    /// `LayoutOverflow` when offsets pass `usize::MAX`, `LengthMismatch` when
    /// the spans do not sum to `record_length`.
    pub fn build(self, record_length: usize) -> Result<Schema, SchemaError> {
        let mut fields = Vec::new();
        let mut warnings: Vec<TypeWarning> = Vec::new();
        let mut seen = HashSet::new();
        let mut offset: usize = 0;

        for (position, entry) in self.entries.into_iter().enumerate() {
            let LayoutEntry::Field {
                name,
                declaration,
                nullable,
                occurs,
            } = entry
            else {
                continue;
            };

            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(SchemaError::EmptyFieldName { position });
            }
            let is_filler = name.eq_ignore_ascii_case(FILLER);
            if !is_filler && !seen.insert(name.to_ascii_uppercase()) {
                return Err(SchemaError::DuplicateField { name });
            }

            let descriptor = TypeDescriptor::parse(&declaration);
            if let Some(ccsid) = descriptor.ccsid {
                if TextEncoding::by_name(&ccsid.to_string()).is_err() {
                    return Err(SchemaError::UnknownCcsid { field: name, ccsid });
                }
            }
            let mapped = map_type(&descriptor);
            if let Some(warning) = mapped.warning {
                if !warnings.iter().any(|w| w.declaration == warning.declaration) {
                    warnings.push(warning);
                }
            }

            let occurs = occurs.max(1);
            let span_length = descriptor
                .span_length(self.layout.temporal_form)
                .saturating_mul(occurs);
            let Some(next_offset) = offset.checked_add(span_length) else {
                return Err(SchemaError::LayoutOverflow { field: name });
            };
            fields.push(Field {
                name,
                descriptor,
                output: mapped.output,
                offset,
                span_length,
                nullable,
                is_filler,
                occurs,
            });
            offset = next_offset;
        }

        if offset != record_length {
            return Err(SchemaError::LengthMismatch {
                computed: offset,
                declared: record_length,
            });
        }

        debug!(
            fields = fields.len(),
            record_length,
            warnings = warnings.len(),
            "built record schema"
        );

        Ok(Schema {
            fields,
            record_length,
            warnings,
        })
    }
}
