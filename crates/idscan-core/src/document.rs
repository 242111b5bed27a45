// crates/idscan-core/src/document.rs
// ============================================================================
// Module: Shared Config Document
// Description: The single TOML document holding every component's config.
// Purpose: Read one component's section and replace it without touching others.
// Dependencies: crate::value, thiserror, toml, toml_edit
// ============================================================================

//! ## Overview
//! The shared config document maps component names to their config sections.
//! Only the section being read is converted into [`ConfigValue`]s. Writes go
//! through a format-preserving edit tree: only the changed keys of the edited
//! section are rewritten, and every other section keeps its exact text,
//! including comments, inline tables and numeric literals.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;
use toml_edit::DocumentMut;
use toml_edit::Item;
use toml_edit::TableLike;

use crate::interfaces::StoreError;
use crate::value::ConfigMap;
use crate::value::ConfigValue;
use crate::value::ValueError;

// ============================================================================
// SECTION: Document
// ============================================================================

/// Parsed shared config document.
#[derive(Debug, Clone, Default)]
pub struct ConfigDocument {
    /// Top-level table keyed by component name, used for reads.
    root: toml::Table,
    /// Format-preserving tree of the same text, used for writes.
    edit: DocumentMut,
}

impl ConfigDocument {
    /// Parses the document text.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Parse`] when the text is not valid TOML.
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        let root = toml::from_str(text).map_err(|err| DocumentError::Parse(err.to_string()))?;
        let edit =
            text.parse::<DocumentMut>().map_err(|err| DocumentError::Parse(err.to_string()))?;
        Ok(Self {
            root,
            edit,
        })
    }

    /// Returns the section of a component, if present.
    ///
    /// A top-level entry that is not a table counts as absent.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Unsupported`] when the section holds a value
    /// kind outside the supported set.
    pub fn section(&self, component: &str) -> Result<Option<ConfigMap>, DocumentError> {
        let Some(toml::Value::Table(table)) = self.root.get(component) else {
            return Ok(None);
        };
        ConfigValue::map_from_toml(table.clone()).map(Some).map_err(DocumentError::Unsupported)
    }

    /// Returns the raw TOML entry stored under a top-level key.
    #[must_use]
    pub fn raw_section(&self, component: &str) -> Option<&toml::Value> {
        self.root.get(component)
    }

    /// Replaces (or inserts) the section of a component.
    ///
    /// Keys whose value is unchanged keep their text. Other top-level entries
    /// are not touched.
    pub fn replace_section(&mut self, component: &str, section: &ConfigMap) {
        let previous = self.section(component).ok().flatten().unwrap_or_default();
        let existing = matches!(self.root.get(component), Some(toml::Value::Table(_)));
        let current = self.edit.as_table_mut().get_mut(component);
        let updated = match current.and_then(Item::as_table_like_mut) {
            Some(table) if existing => {
                update_table(table, &previous, section);
                true
            }
            _ => false,
        };
        if !updated {
            self.edit.as_table_mut().insert(component, Item::Table(new_table(section)));
        }
        self.root
            .insert(component.to_string(), toml::Value::Table(ConfigValue::map_to_toml(section)));
    }

    /// Renders the full document as TOML text.
    #[must_use]
    pub fn render(&self) -> String {
        self.edit.to_string()
    }
}

// ============================================================================
// SECTION: Edit Tree
// ============================================================================

/// Rewrites the changed keys of an existing section in place.
fn update_table(table: &mut dyn TableLike, previous: &ConfigMap, section: &ConfigMap) {
    let stale: Vec<String> = table
        .iter()
        .map(|(key, _)| key.to_string())
        .filter(|key| !section.contains_key(key))
        .collect();
    for key in stale {
        table.remove(&key);
    }
    for (key, value) in section {
        if previous.get(key) == Some(value) {
            continue;
        }
        let mut replacement = edit_value(value);
        match table.get_mut(key) {
            Some(Item::Value(current)) => {
                *replacement.decor_mut() = current.decor().clone();
                *current = replacement;
            }
            Some(item) => *item = Item::Value(replacement),
            None => {
                table.insert(key, Item::Value(replacement));
            }
        }
    }
}

/// Builds a fresh section table.
fn new_table(section: &ConfigMap) -> toml_edit::Table {
    let mut table = toml_edit::Table::new();
    for (key, value) in section {
        table.insert(key, Item::Value(edit_value(value)));
    }
    table
}

/// Converts a config value into an edit-tree value.
fn edit_value(value: &ConfigValue) -> toml_edit::Value {
    match value {
        ConfigValue::Text(text) => toml_edit::Value::from(text.as_str()),
        ConfigValue::Integer(number) => toml_edit::Value::from(*number),
        ConfigValue::FloatingPoint(number) => toml_edit::Value::from(*number),
        ConfigValue::Timestamp(datetime) => toml_edit::Value::from(*datetime),
        ConfigValue::List(items) => {
            toml_edit::Value::Array(items.iter().map(edit_value).collect())
        }
        ConfigValue::Mapping(map) => toml_edit::Value::InlineTable(
            map.iter().map(|(key, item)| (key.as_str(), edit_value(item))).collect(),
        ),
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while loading the shared config document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// The store failed to read the document.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The document is not valid TOML.
    #[error("config document parse error: {0}")]
    Parse(String),
    /// The component section holds an unsupported value.
    #[error("config section holds an {0}")]
    Unsupported(ValueError),
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test fixtures use explicit asserts and unwraps for clarity."
    )]

    use super::*;

    const DOCUMENT: &str = r#"
[Scanner]
BaseURL = "https://example.com"
Flags = { strict = true }

[Reader]
Limit = 3
Enabled = true
"#;

    #[test]
    fn section_converts_only_requested_component() {
        let document = ConfigDocument::parse(DOCUMENT).unwrap();
        let reader = document.section("Reader");
        assert!(matches!(reader, Err(DocumentError::Unsupported(_))));
        let missing = document.section("Absent").unwrap();
        assert_eq!(missing, None);
    }

    #[test]
    fn non_table_entry_counts_as_absent() {
        let document = ConfigDocument::parse("Scanner = 3").unwrap();
        assert_eq!(document.section("Scanner").unwrap(), None);
    }

    const EDITABLE: &str = r#"[Other]
# keep me
Limits = { low = 1, high = 9 }
Ratio = 1e3

[Model]
# shown on start
Name = "a"   # inline note
Count = 3
"#;

    #[test]
    fn replace_section_preserves_other_sections() {
        let mut document = ConfigDocument::parse(DOCUMENT).unwrap();
        let before = document.raw_section("Scanner").cloned();
        let mut section = ConfigMap::new();
        section.insert("Limit".to_string(), ConfigValue::from(4_i64));
        document.replace_section("Reader", &section);
        let reparsed = ConfigDocument::parse(&document.render()).unwrap();
        assert_eq!(reparsed.raw_section("Scanner").cloned(), before);
        assert_eq!(reparsed.section("Reader").unwrap(), Some(section));
    }

    #[test]
    fn replace_section_keeps_other_text_verbatim() {
        let mut document = ConfigDocument::parse(EDITABLE).unwrap();
        let mut section = document.section("Model").unwrap().unwrap();
        section.insert("Name".to_string(), ConfigValue::from("b"));
        document.replace_section("Model", &section);
        let rendered = document.render();
        let other = &EDITABLE[..EDITABLE.find("[Model]").unwrap()];
        assert!(rendered.starts_with(other), "other section changed:\n{rendered}");
        assert!(rendered.contains("# shown on start"));
        assert!(rendered.contains("# inline note"));
        assert!(rendered.contains("Count = 3"));
        let reparsed = ConfigDocument::parse(&rendered).unwrap();
        assert_eq!(reparsed.section("Model").unwrap(), Some(section));
    }

    #[test]
    fn replace_section_drops_removed_keys() {
        let mut document = ConfigDocument::parse(EDITABLE).unwrap();
        let mut section = ConfigMap::new();
        section.insert("Name".to_string(), ConfigValue::from("a"));
        document.replace_section("Model", &section);
        let rendered = document.render();
        assert!(!rendered.contains("Count"));
        let reparsed = ConfigDocument::parse(&rendered).unwrap();
        assert_eq!(reparsed.section("Model").unwrap(), Some(section));
    }

    #[test]
    fn replace_section_appends_missing_component() {
        let mut document = ConfigDocument::parse(EDITABLE).unwrap();
        let mut nested = ConfigMap::new();
        nested.insert("list".to_string(), ConfigValue::List(vec![ConfigValue::from(1_i64)]));
        let mut section = ConfigMap::new();
        section.insert("Nested".to_string(), ConfigValue::Mapping(nested));
        document.replace_section("Fresh", &section);
        let rendered = document.render();
        assert!(rendered.starts_with(EDITABLE));
        let reparsed = ConfigDocument::parse(&rendered).unwrap();
        assert_eq!(reparsed.section("Fresh").unwrap(), Some(section));
    }
}
