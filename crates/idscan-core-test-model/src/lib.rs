// crates/idscan-core-test-model/src/lib.rs
// ============================================================================
// Module: IDScan Core Test Model
// Description: Reference component declaring one key of every value kind.
// Purpose: Exercise the contract and harness against real fixture documents.
// Dependencies: idscan-component-tests, idscan-core
// ============================================================================

//! ## Overview
//! [`CoreTestModel`] is the component the core library verifies itself with.
//! Its fixture resources live in this crate's `resources/` directory:
//! `ComponentInfo.toml` with the model's version and `IDScanComponents.toml`
//! holding the model's section next to an unrelated component's section.
//!
//! Tests edit documents, so [`stage_fixtures`] copies the config document into
//! a scratch directory and returns a locator pointing at the copy.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use idscan_component_tests::ComponentTest;
use idscan_core::CONFIG_DOCUMENT_NAME;
use idscan_core::Component;
use idscan_core::ComponentContract;
use idscan_core::FsDocumentStore;
use idscan_core::FsResourceLocator;
use idscan_core::MetadataError;
use idscan_core::RequiredConfig;
use idscan_core::ValueKind;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Component name keying the model's section.
pub const MODEL_NAME: &str = "IDScanCoreTestModel";
/// Application-level directory inside a staging root.
pub const APPLICATION_DIR: &str = "app";
/// Fixture directory inside a staging root.
pub const FIXTURE_DIR: &str = "fixtures";

// ============================================================================
// SECTION: Component
// ============================================================================

/// Reference component declaring one key of every value kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoreTestModel;

impl Component for CoreTestModel {
    fn name(&self) -> &str {
        MODEL_NAME
    }

    fn required_configs(&self) -> Vec<RequiredConfig> {
        vec![
            RequiredConfig::modifiable("TestString", ValueKind::Text),
            RequiredConfig::modifiable("TestInt", ValueKind::Integer),
            RequiredConfig::fixed("TestDouble", ValueKind::FloatingPoint),
            RequiredConfig::fixed("TestDate", ValueKind::Timestamp),
            RequiredConfig::fixed("TestArray", ValueKind::List),
            RequiredConfig::fixed("TestDic", ValueKind::Mapping),
        ]
    }
}

impl ComponentTest for CoreTestModel {}

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Returns the directory holding the model's fixture resources.
#[must_use]
pub fn resources_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("resources")
}

/// Copies the fixture config document into `root` and returns a locator.
///
/// The locator searches `root/app` first and falls back to `root/fixtures`,
/// where the copy is placed. Metadata is read from [`resources_dir`].
///
/// # Errors
///
/// Returns an I/O error when the fixture cannot be copied.
pub fn stage_fixtures(root: &Path) -> io::Result<FsResourceLocator> {
    let fixtures = root.join(FIXTURE_DIR);
    fs::create_dir_all(&fixtures)?;
    fs::copy(resources_dir().join(CONFIG_DOCUMENT_NAME), fixtures.join(CONFIG_DOCUMENT_NAME))?;
    Ok(FsResourceLocator::new()
        .with_config_dir(root.join(APPLICATION_DIR))
        .with_config_dir(fixtures)
        .with_component_dir(MODEL_NAME, resources_dir()))
}

/// Registers the model against a locator using the filesystem store.
///
/// # Errors
///
/// Returns [`MetadataError`] when the model's metadata is unusable.
pub fn register(
    locator: FsResourceLocator,
) -> Result<ComponentContract<CoreTestModel>, MetadataError> {
    ComponentContract::register(CoreTestModel, Arc::new(locator), Arc::new(FsDocumentStore::new()))
}
