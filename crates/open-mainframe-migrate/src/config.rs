//! Migration configuration: record layout and decode settings.
//!
//! ```toml
//! [layout]
//! temporal_form = "internal"
//!
//! [decode]
//! encoding = "CP037"
//! graphic_encoding = "UTF-16BE"
//! error_policy = "tolerant"
//! float_format = "ieee"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level migration configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationConfig {
    /// How declarations are laid out in the record.
    #[serde(default)]
    pub layout: LayoutConfig,
    /// How field bytes are interpreted.
    #[serde(default)]
    pub decode: DecodeConfig,
}

/// Record layout settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Storage form of DATE and TIMESTAMP columns.
    #[serde(default)]
    pub temporal_form: TemporalForm,
}

/// Storage form of DATE and TIMESTAMP values in the extract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemporalForm {
    /// Unsigned packed digits: DATE 4 bytes, TIMESTAMP 10-16 bytes.
    #[default]
    Internal,
    /// External character form: `YYYY-MM-DD`, `YYYY-MM-DD-HH.MM.SS.ffffff`.
    Text,
}

/// What the record decoder does with a field that fails to decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Keep the error on the field and carry on with the record.
    #[default]
    Tolerant,
    /// Fail the whole record on the first field error.
    Strict,
}

/// Binary floating point representation of REAL/DOUBLE/COMP-1/COMP-2.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FloatFormat {
    /// Big-endian IEEE 754.
    #[default]
    Ieee,
    /// IBM hexadecimal floating point.
    Hexadecimal,
}

/// Field decode settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeConfig {
    /// Encoding of single-byte character data (name or CCSID).
    #[serde(default = "default_encoding")]
    pub encoding: String,
    /// Encoding of graphic (double-byte) character data.
    #[serde(default = "default_graphic_encoding")]
    pub graphic_encoding: String,
    /// Field failure policy.
    #[serde(default)]
    pub error_policy: ErrorPolicy,
    /// Floating point representation.
    #[serde(default)]
    pub float_format: FloatFormat,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            encoding: default_encoding(),
            graphic_encoding: default_graphic_encoding(),
            error_policy: ErrorPolicy::default(),
            float_format: FloatFormat::default(),
        }
    }
}

fn default_encoding() -> String {
    "CP037".to_string()
}

fn default_graphic_encoding() -> String {
    "UTF-16BE".to_string()
}

impl MigrationConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
