// crates/idscan-core/src/metadata.rs
// ============================================================================
// Module: Component Metadata
// Description: Component names, metadata documents, and version strings.
// Purpose: Resolve static component facts once, at registration.
// Dependencies: crate::interfaces, thiserror, toml
// ============================================================================

//! ## Overview
//! Each component ships a `ComponentInfo.toml` document with at least a
//! `version` text field. The core library ships its own copy, compiled into
//! the binary. Missing names, documents or versions are packaging defects and
//! surface as [`MetadataError`] when a component is registered, so hosts can
//! abort deliberately.
//!
//! Versions follow `major.yyyymmdd.build`:
//! - `major` increases after global changes;
//! - `yyyymmdd` is the build date;
//! - `build` increases with every build independently of the other parts.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use thiserror::Error;

use crate::interfaces::DocumentHandle;
use crate::interfaces::DocumentStore;
use crate::interfaces::ResourceLocator;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Metadata document of the core library.
const CORE_INFO: &str = include_str!("../resources/ComponentInfo.toml");
/// Metadata key holding the version string.
const VERSION_KEY: &str = "version";
/// Number of dot-separated version segments.
const VERSION_SEGMENTS: usize = 3;
/// Length of the date segment (`yyyymmdd`).
const VERSION_DATE_LENGTH: usize = 8;

// ============================================================================
// SECTION: Component Names
// ============================================================================

/// Non-empty component name keying the component's config section.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentName(String);

impl ComponentName {
    /// Creates a component name.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::MissingName`] when the name is empty or blank.
    pub fn new(name: impl Into<String>) -> Result<Self, MetadataError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(MetadataError::MissingName);
        }
        Ok(Self(name))
    }

    /// Derives a name from the leading segment of a qualified type path.
    ///
    /// Both `::` and `.` separate segments, so `Scanner::Component` and
    /// `Scanner.Component` both yield `Scanner`.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::MissingName`] when the leading segment is empty.
    pub fn from_qualified(path: &str) -> Result<Self, MetadataError> {
        let leading = path.split("::").next().and_then(|head| head.split('.').next());
        Self::new(leading.unwrap_or_default())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// SECTION: Versions
// ============================================================================

/// Returns true when `version` matches `major.yyyymmdd.build`.
///
/// The string must split into exactly three non-empty dot-separated segments
/// and the middle segment must be exactly eight characters long.
#[must_use]
pub fn is_valid_version(version: &str) -> bool {
    let segments: Vec<&str> = version.split('.').collect();
    segments.len() == VERSION_SEGMENTS
        && segments.iter().all(|segment| !segment.is_empty())
        && segments[1].chars().count() == VERSION_DATE_LENGTH
}

// ============================================================================
// SECTION: Metadata
// ============================================================================

/// Parsed metadata document.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentInfo {
    /// Non-empty version string.
    version: String,
    /// Full document, including the version.
    table: toml::Table,
}

impl ComponentInfo {
    /// Parses a metadata document.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError`] when the document cannot be parsed or has no
    /// non-empty text `version`.
    pub fn parse(owner: &str, text: &str) -> Result<Self, MetadataError> {
        let table: toml::Table = toml::from_str(text).map_err(|err| MetadataError::InvalidInfo {
            component: owner.to_string(),
            message: err.to_string(),
        })?;
        let version = table
            .get(VERSION_KEY)
            .and_then(toml::Value::as_str)
            .filter(|version| !version.is_empty())
            .ok_or_else(|| MetadataError::MissingVersion {
                component: owner.to_string(),
            })?
            .to_string();
        Ok(Self {
            version,
            table,
        })
    }

    /// Returns the version string.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the full metadata table.
    #[must_use]
    pub const fn table(&self) -> &toml::Table {
        &self.table
    }
}

/// Static facts about a registered component.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentMetadata {
    /// Component name.
    name: ComponentName,
    /// Component metadata document.
    info: ComponentInfo,
    /// Core library metadata document.
    core_info: ComponentInfo,
}

impl ComponentMetadata {
    /// Resolves metadata for a component through the collaborators.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError`] when the metadata document is not located,
    /// absent, unreadable, or lacks a version, or when the core metadata is
    /// unusable.
    pub fn resolve(
        name: ComponentName,
        locator: &dyn ResourceLocator,
        store: &dyn DocumentStore,
    ) -> Result<Self, MetadataError> {
        let handle = locator.component_info(&name).ok_or_else(|| MetadataError::MissingInfo {
            component: name.to_string(),
            document: None,
        })?;
        let text = read_info(&name, &handle, store)?;
        let info = ComponentInfo::parse(name.as_str(), &text)?;
        Ok(Self {
            name,
            info,
            core_info: core_info()?,
        })
    }

    /// Returns the component name.
    #[must_use]
    pub const fn name(&self) -> &ComponentName {
        &self.name
    }

    /// Returns the component version string.
    #[must_use]
    pub fn component_version(&self) -> &str {
        self.info.version()
    }

    /// Returns the core library version string.
    #[must_use]
    pub fn core_version(&self) -> &str {
        self.core_info.version()
    }

    /// Returns the component metadata document.
    #[must_use]
    pub const fn info(&self) -> &ComponentInfo {
        &self.info
    }

    /// Returns the core library metadata document.
    #[must_use]
    pub const fn core_info(&self) -> &ComponentInfo {
        &self.core_info
    }
}

/// Returns the core library metadata.
///
/// # Errors
///
/// Returns [`MetadataError`] when the embedded document is unusable.
pub fn core_info() -> Result<ComponentInfo, MetadataError> {
    ComponentInfo::parse("IDScanCore", CORE_INFO)
}

/// Reads a metadata document through the store.
fn read_info(
    name: &ComponentName,
    handle: &DocumentHandle,
    store: &dyn DocumentStore,
) -> Result<String, MetadataError> {
    match store.read(handle) {
        Ok(Some(text)) => Ok(text),
        Ok(None) => Err(MetadataError::MissingInfo {
            component: name.to_string(),
            document: Some(handle.to_string()),
        }),
        Err(err) => Err(MetadataError::InvalidInfo {
            component: name.to_string(),
            message: err.to_string(),
        }),
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Packaging defects detected at registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    /// The component name is empty.
    #[error("IDScanComponents: failed to get component name")]
    MissingName,
    /// The metadata document was not located or does not exist.
    #[error("{component}: failed to load ComponentInfo{}", document_suffix(.document.as_deref()))]
    MissingInfo {
        /// Component name.
        component: String,
        /// Located document, when one was located.
        document: Option<String>,
    },
    /// The metadata document could not be read or parsed.
    #[error("{component}: invalid ComponentInfo: {message}")]
    InvalidInfo {
        /// Component name.
        component: String,
        /// Underlying error description.
        message: String,
    },
    /// The metadata document has no usable version.
    #[error("{component}: failed to get component version")]
    MissingVersion {
        /// Component name.
        component: String,
    },
}

/// Formats the optional document location of a missing-info error.
fn document_suffix(document: Option<&str>) -> String {
    document.map(|document| format!(" at {document}")).unwrap_or_default()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
