// crates/idscan-core/src/interfaces.rs
// ============================================================================
// Module: Resource Interfaces
// Description: Collaborator interfaces for locating and persisting documents.
// Purpose: Keep the contract engine independent of where documents live.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! The contract engine needs two collaborators: a [`ResourceLocator`] that
//! finds a component's metadata document and the shared config document, and
//! a [`DocumentStore`] that reads and writes whole documents. Both are invoked
//! synchronously and assume a single writer.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::path::Path;
use std::path::PathBuf;

use thiserror::Error;

use crate::metadata::ComponentName;

// ============================================================================
// SECTION: Document Handles
// ============================================================================

/// Opaque, path-like handle to a document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentHandle(PathBuf);

impl DocumentHandle {
    /// Creates a new document handle.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// Returns the handle as a path.
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for DocumentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl From<&str> for DocumentHandle {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<PathBuf> for DocumentHandle {
    fn from(value: PathBuf) -> Self {
        Self(value)
    }
}

// ============================================================================
// SECTION: Resource Locator
// ============================================================================

/// Locates the documents a component depends on.
pub trait ResourceLocator: Send + Sync {
    /// Returns the metadata document handle for the component, if any.
    fn component_info(&self, component: &ComponentName) -> Option<DocumentHandle>;

    /// Returns the shared config document handle, if any.
    fn config_document(&self) -> Option<DocumentHandle>;
}

// ============================================================================
// SECTION: Document Store
// ============================================================================

/// Document store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// I/O failure while reading or writing.
    #[error("document io error: {0}")]
    Io(String),
    /// The document content is unusable.
    #[error("invalid document: {0}")]
    Invalid(String),
}

/// Reads and writes whole documents.
pub trait DocumentStore: Send + Sync {
    /// Reads a document. Returns `Ok(None)` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the document exists but cannot be read.
    fn read(&self, handle: &DocumentHandle) -> Result<Option<String>, StoreError>;

    /// Replaces a document with new contents.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails; the previous contents stay intact.
    fn write(&self, handle: &DocumentHandle, contents: &str) -> Result<(), StoreError>;
}
