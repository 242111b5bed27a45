// crates/idscan-core/src/store.rs
// ============================================================================
// Module: Document Stores and Locators
// Description: Filesystem and in-memory resource collaborators.
// Purpose: Provide concrete locators and stores for hosts and tests.
// Dependencies: crate::interfaces, crate::config
// ============================================================================

//! ## Overview
//! [`FsResourceLocator`] searches an ordered list of directories for the shared
//! config document (application location first, fixture location second) and
//! maps component names to resource directories. [`FsDocumentStore`] reads with
//! a size limit and replaces documents atomically through a temporary sibling
//! file. The in-memory variants are deterministic doubles for tests.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use crate::config::ResourceConfig;
use crate::interfaces::DocumentHandle;
use crate::interfaces::DocumentStore;
use crate::interfaces::ResourceLocator;
use crate::interfaces::StoreError;
use crate::metadata::ComponentName;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// File name of the shared component config document.
pub const CONFIG_DOCUMENT_NAME: &str = "IDScanComponents.toml";
/// File name of a component's metadata document.
pub const COMPONENT_INFO_NAME: &str = "ComponentInfo.toml";
/// Maximum document size in bytes.
pub const MAX_DOCUMENT_SIZE: usize = 1024 * 1024;
/// Attempts made to allocate a unique temporary file.
const TEMP_ATTEMPTS: usize = 16;
/// Counter making temporary file names unique within the process.
static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

// ============================================================================
// SECTION: Filesystem Locator
// ============================================================================

/// Filesystem resource locator with an ordered config search path.
#[derive(Debug, Clone)]
pub struct FsResourceLocator {
    /// Directories searched for the config document, in order.
    config_dirs: Vec<PathBuf>,
    /// Config document file name.
    config_file_name: String,
    /// Metadata document file name.
    info_file_name: String,
    /// Resource directory per component name.
    component_dirs: BTreeMap<String, PathBuf>,
}

impl Default for FsResourceLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl FsResourceLocator {
    /// Creates a locator with default file names and no directories.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config_dirs: Vec::new(),
            config_file_name: CONFIG_DOCUMENT_NAME.to_string(),
            info_file_name: COMPONENT_INFO_NAME.to_string(),
            component_dirs: BTreeMap::new(),
        }
    }

    /// Builds a locator from loaded resource configuration.
    #[must_use]
    pub fn from_config(config: &ResourceConfig) -> Self {
        let mut locator = Self::new()
            .with_config_file_name(&config.documents.config_file_name)
            .with_info_file_name(&config.documents.info_file_name);
        for dir in [&config.documents.application_dir, &config.documents.fixture_dir]
            .into_iter()
            .flatten()
        {
            locator = locator.with_config_dir(config.resolve(dir));
        }
        for (name, component) in &config.components {
            locator = locator.with_component_dir(name, config.resolve(&component.resource_dir));
        }
        locator
    }

    /// Appends a directory to the config search path.
    #[must_use]
    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dirs.push(dir.into());
        self
    }

    /// Registers the resource directory of a component.
    #[must_use]
    pub fn with_component_dir(mut self, name: &str, dir: impl Into<PathBuf>) -> Self {
        self.component_dirs.insert(name.to_string(), dir.into());
        self
    }

    /// Overrides the config document file name.
    #[must_use]
    pub fn with_config_file_name(mut self, name: &str) -> Self {
        self.config_file_name = name.to_string();
        self
    }

    /// Overrides the metadata document file name.
    #[must_use]
    pub fn with_info_file_name(mut self, name: &str) -> Self {
        self.info_file_name = name.to_string();
        self
    }
}

impl ResourceLocator for FsResourceLocator {
    fn component_info(&self, component: &ComponentName) -> Option<DocumentHandle> {
        self.component_dirs
            .get(component.as_str())
            .map(|dir| DocumentHandle::new(dir.join(&self.info_file_name)))
    }

    fn config_document(&self) -> Option<DocumentHandle> {
        self.config_dirs
            .iter()
            .map(|dir| dir.join(&self.config_file_name))
            .find(|path| path.is_file())
            .map(DocumentHandle::new)
    }
}

// ============================================================================
// SECTION: Filesystem Store
// ============================================================================

/// Filesystem document store with atomic replacement.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsDocumentStore;

impl FsDocumentStore {
    /// Creates a filesystem document store.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl DocumentStore for FsDocumentStore {
    fn read(&self, handle: &DocumentHandle) -> Result<Option<String>, StoreError> {
        let bytes = match fs::read(handle.as_path()) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StoreError::Io(err.to_string())),
        };
        if bytes.len() > MAX_DOCUMENT_SIZE {
            return Err(StoreError::Invalid(format!(
                "document {handle} exceeds size limit of {MAX_DOCUMENT_SIZE} bytes"
            )));
        }
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|_| StoreError::Invalid(format!("document {handle} must be utf-8")))
    }

    fn write(&self, handle: &DocumentHandle, contents: &str) -> Result<(), StoreError> {
        let path = handle.as_path();
        let (temp_path, mut file) = create_temp_file(path)?;
        if let Err(err) = file.write_all(contents.as_bytes()) {
            let _ = fs::remove_file(&temp_path);
            return Err(StoreError::Io(err.to_string()));
        }
        if let Err(err) = file.sync_all() {
            let _ = fs::remove_file(&temp_path);
            return Err(StoreError::Io(err.to_string()));
        }
        drop(file);
        persist_temp_file(&temp_path, path)
    }
}

/// Creates a unique temporary file alongside the destination.
fn create_temp_file(path: &Path) -> Result<(PathBuf, fs::File), StoreError> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| StoreError::Io("document path does not include a file name".to_string()))?;
    for _ in 0 .. TEMP_ATTEMPTS {
        let attempt = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let temp_name = format!(".{file_name}.tmp.{}.{}", std::process::id(), attempt);
        let temp_path = parent.join(temp_name);
        match OpenOptions::new().write(true).create_new(true).open(&temp_path) {
            Ok(file) => return Ok((temp_path, file)),
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {}
            Err(err) => return Err(StoreError::Io(err.to_string())),
        }
    }
    Err(StoreError::Io("failed to allocate temporary document path".to_string()))
}

/// Moves the temporary file over the destination.
///
/// On platforms without atomic replace, this falls back to remove-and-rename.
fn persist_temp_file(temp_path: &Path, path: &Path) -> Result<(), StoreError> {
    match fs::rename(temp_path, path) {
        Ok(()) => Ok(()),
        Err(err) => {
            if path.exists() {
                fs::remove_file(path).map_err(|err| StoreError::Io(err.to_string()))?;
                fs::rename(temp_path, path).map_err(|err| StoreError::Io(err.to_string()))?;
                return Ok(());
            }
            let _ = fs::remove_file(temp_path);
            Err(StoreError::Io(err.to_string()))
        }
    }
}

// ============================================================================
// SECTION: In-Memory Collaborators
// ============================================================================

/// In-memory document store for tests and examples.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
    /// Documents keyed by handle.
    documents: Arc<Mutex<BTreeMap<DocumentHandle, String>>>,
    /// When set, every write fails.
    fail_writes: Arc<AtomicBool>,
    /// Number of successful writes.
    writes: Arc<AtomicUsize>,
}

impl InMemoryDocumentStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store mutex is poisoned.
    pub fn insert(&self, handle: DocumentHandle, contents: &str) -> Result<(), StoreError> {
        self.documents
            .lock()
            .map_err(|_| StoreError::Io("document store mutex poisoned".to_string()))?
            .insert(handle, contents.to_string());
        Ok(())
    }

    /// Returns a copy of a document.
    #[must_use]
    pub fn get(&self, handle: &DocumentHandle) -> Option<String> {
        self.documents.lock().ok().and_then(|guard| guard.get(handle).cloned())
    }

    /// Makes subsequent writes fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Returns the number of successful writes.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn read(&self, handle: &DocumentHandle) -> Result<Option<String>, StoreError> {
        let guard = self
            .documents
            .lock()
            .map_err(|_| StoreError::Io("document store mutex poisoned".to_string()))?;
        Ok(guard.get(handle).cloned())
    }

    fn write(&self, handle: &DocumentHandle, contents: &str) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Io(format!("write to {handle} rejected")));
        }
        self.insert(handle.clone(), contents)?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Locator returning fixed handles, for tests and embedded hosts.
#[derive(Debug, Clone, Default)]
pub struct StaticResourceLocator {
    /// Shared config document handle.
    config: Option<DocumentHandle>,
    /// Metadata document handle per component name.
    infos: BTreeMap<String, DocumentHandle>,
}

impl StaticResourceLocator {
    /// Creates a locator that locates nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the shared config document handle.
    #[must_use]
    pub fn with_config_document(mut self, handle: DocumentHandle) -> Self {
        self.config = Some(handle);
        self
    }

    /// Sets the metadata document handle of a component.
    #[must_use]
    pub fn with_component_info(mut self, name: &str, handle: DocumentHandle) -> Self {
        self.infos.insert(name.to_string(), handle);
        self
    }
}

impl ResourceLocator for StaticResourceLocator {
    fn component_info(&self, component: &ComponentName) -> Option<DocumentHandle> {
        self.infos.get(component.as_str()).cloned()
    }

    fn config_document(&self) -> Option<DocumentHandle> {
        self.config.clone()
    }
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

    #[test]
    fn fs_store_reads_missing_document_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let handle = DocumentHandle::new(dir.path().join("absent.toml"));
        assert_eq!(FsDocumentStore::new().read(&handle).unwrap(), None);
    }

    #[test]
    fn fs_store_write_replaces_contents_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let handle = DocumentHandle::new(dir.path().join(CONFIG_DOCUMENT_NAME));
        let store = FsDocumentStore::new();
        store.write(&handle, "a = 1\n").unwrap();
        store.write(&handle, "a = 2\n").unwrap();
        assert_eq!(store.read(&handle).unwrap().as_deref(), Some("a = 2\n"));
        let entries = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1, "temporary files must not remain");
    }

    #[test]
    fn fs_store_rejects_oversized_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.toml");
        fs::write(&path, vec![b'#'; MAX_DOCUMENT_SIZE + 1]).unwrap();
        let err = FsDocumentStore::new().read(&DocumentHandle::new(path)).unwrap_err();
        assert!(matches!(err, StoreError::Invalid(_)));
    }

    #[test]
    fn fs_locator_prefers_application_dir() {
        let app = tempfile::tempdir().unwrap();
        let fixture = tempfile::tempdir().unwrap();
        fs::write(fixture.path().join(CONFIG_DOCUMENT_NAME), "").unwrap();
        let locator = FsResourceLocator::new()
            .with_config_dir(app.path())
            .with_config_dir(fixture.path());
        assert_eq!(
            locator.config_document(),
            Some(DocumentHandle::new(fixture.path().join(CONFIG_DOCUMENT_NAME)))
        );
        fs::write(app.path().join(CONFIG_DOCUMENT_NAME), "").unwrap();
        assert_eq!(
            locator.config_document(),
            Some(DocumentHandle::new(app.path().join(CONFIG_DOCUMENT_NAME)))
        );
    }

    #[test]
    fn fs_locator_without_document_locates_nothing() {
        let app = tempfile::tempdir().unwrap();
        let locator = FsResourceLocator::new().with_config_dir(app.path());
        assert_eq!(locator.config_document(), None);
    }

    #[test]
    fn in_memory_store_counts_and_fails_writes() {
        let store = InMemoryDocumentStore::new();
        let handle = DocumentHandle::from("doc.toml");
        store.write(&handle, "a = 1").unwrap();
        store.set_fail_writes(true);
        assert!(store.write(&handle, "a = 2").is_err());
        assert_eq!(store.write_count(), 1);
        assert_eq!(store.get(&handle).as_deref(), Some("a = 1"));
    }
}
