// crates/idscan-core/src/value.rs
// ============================================================================
// Module: Config Values
// Description: Closed set of configuration value kinds and tagged values.
// Purpose: Type-check config values by exact kind without runtime reflection.
// Dependencies: serde, toml
// ============================================================================

//! ## Overview
//! Configuration values are a closed tagged enum with one variant per
//! supported [`ValueKind`]. A value satisfies a declared kind only when the
//! kinds are equal; there is no coercion between kinds.
//!
//! Values persist as TOML. TOML strings, integers, floats, datetimes, arrays
//! and tables map onto the six kinds. TOML booleans have no counterpart and
//! are rejected on conversion.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use toml::value::Datetime;

// ============================================================================
// SECTION: Value Kinds
// ============================================================================

/// Supported configuration value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// UTF-8 text.
    Text,
    /// Signed 64-bit integer.
    Integer,
    /// 64-bit floating point number.
    FloatingPoint,
    /// Date and/or time value.
    Timestamp,
    /// Ordered list of values of any kind.
    List,
    /// String-keyed mapping of values of any kind.
    Mapping,
}

impl ValueKind {
    /// Returns the display label for the kind.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Integer => "Integer",
            Self::FloatingPoint => "FloatingPoint",
            Self::Timestamp => "Timestamp",
            Self::List => "List",
            Self::Mapping => "Mapping",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// SECTION: Values
// ============================================================================

/// Component configuration mapping (key to value).
pub type ConfigMap = BTreeMap<String, ConfigValue>;

/// Configuration value tagged with its kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    /// Text value.
    Text(String),
    /// Integer value.
    Integer(i64),
    /// Floating point value.
    FloatingPoint(f64),
    /// Timestamp value (TOML offset, local date-time, date or time).
    Timestamp(Datetime),
    /// List value.
    List(Vec<Self>),
    /// Mapping value.
    Mapping(ConfigMap),
}

impl ConfigValue {
    /// Returns the runtime kind of the value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Text(_) => ValueKind::Text,
            Self::Integer(_) => ValueKind::Integer,
            Self::FloatingPoint(_) => ValueKind::FloatingPoint,
            Self::Timestamp(_) => ValueKind::Timestamp,
            Self::List(_) => ValueKind::List,
            Self::Mapping(_) => ValueKind::Mapping,
        }
    }

    /// Returns true when the value is exactly of the given kind.
    #[must_use]
    pub fn is_kind(&self, kind: ValueKind) -> bool {
        self.kind() == kind
    }

    /// Returns the text payload when the value is text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the integer payload when the value is an integer.
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the float payload when the value is floating point.
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::FloatingPoint(value) => Some(*value),
            _ => None,
        }
    }

    /// Converts a TOML value, rejecting kinds outside the supported set.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::Unsupported`] when the value (or any nested value)
    /// is a TOML boolean.
    pub fn from_toml(value: toml::Value) -> Result<Self, ValueError> {
        convert_toml(value, "")
    }

    /// Converts a TOML table into a config mapping.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::Unsupported`] for unsupported nested kinds.
    pub fn map_from_toml(table: toml::Table) -> Result<ConfigMap, ValueError> {
        convert_table(table, "")
    }

    /// Converts a config mapping into a TOML table.
    #[must_use]
    pub fn map_to_toml(map: &ConfigMap) -> toml::Table {
        map.iter().map(|(key, value)| (key.clone(), toml::Value::from(value))).collect()
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", toml::Value::from(self))
    }
}

impl From<&ConfigValue> for toml::Value {
    fn from(value: &ConfigValue) -> Self {
        match value {
            ConfigValue::Text(text) => Self::String(text.clone()),
            ConfigValue::Integer(number) => Self::Integer(*number),
            ConfigValue::FloatingPoint(number) => Self::Float(*number),
            ConfigValue::Timestamp(datetime) => Self::Datetime(*datetime),
            ConfigValue::List(items) => Self::Array(items.iter().map(Self::from).collect()),
            ConfigValue::Mapping(map) => Self::Table(ConfigValue::map_to_toml(map)),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for ConfigValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        Self::FloatingPoint(value)
    }
}

impl From<Datetime> for ConfigValue {
    fn from(value: Datetime) -> Self {
        Self::Timestamp(value)
    }
}

impl From<Vec<Self>> for ConfigValue {
    fn from(value: Vec<Self>) -> Self {
        Self::List(value)
    }
}

impl From<ConfigMap> for ConfigValue {
    fn from(value: ConfigMap) -> Self {
        Self::Mapping(value)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Value conversion errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// The value kind is not part of the supported set.
    #[error("unsupported value kind '{kind}' at '{path}'")]
    Unsupported {
        /// Dotted path of the offending value.
        path: String,
        /// TOML type name of the offending value.
        kind: &'static str,
    },
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Converts a TOML value located at `path`.
fn convert_toml(value: toml::Value, path: &str) -> Result<ConfigValue, ValueError> {
    match value {
        toml::Value::String(text) => Ok(ConfigValue::Text(text)),
        toml::Value::Integer(number) => Ok(ConfigValue::Integer(number)),
        toml::Value::Float(number) => Ok(ConfigValue::FloatingPoint(number)),
        toml::Value::Datetime(datetime) => Ok(ConfigValue::Timestamp(datetime)),
        toml::Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| convert_toml(item, &format!("{path}[{index}]")))
            .collect::<Result<Vec<_>, _>>()
            .map(ConfigValue::List),
        toml::Value::Table(table) => convert_table(table, path).map(ConfigValue::Mapping),
        other @ toml::Value::Boolean(_) => Err(ValueError::Unsupported {
            path: path.to_string(),
            kind: other.type_str(),
        }),
    }
}

/// Converts a TOML table whose entries live below `path`.
fn convert_table(table: toml::Table, path: &str) -> Result<ConfigMap, ValueError> {
    table
        .into_iter()
        .map(|(key, value)| {
            let child = if path.is_empty() { key.clone() } else { format!("{path}.{key}") };
            convert_toml(value, &child).map(|converted| (key, converted))
        })
        .collect()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
