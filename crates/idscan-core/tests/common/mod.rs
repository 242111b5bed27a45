// crates/idscan-core/tests/common/mod.rs
// =============================================================================
// Module: Contract Test Helpers
// Description: Shared components and in-memory collaborators for contract tests.
// Purpose: Reduce duplication across integration tests for idscan-core.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::sync::Arc;

use idscan_core::Component;
use idscan_core::ComponentContract;
use idscan_core::DocumentHandle;
use idscan_core::InMemoryDocumentStore;
use idscan_core::RequiredConfig;
use idscan_core::StaticResourceLocator;
use idscan_core::ValueKind;

/// Handle of the shared config document in the in-memory store.
pub const CONFIG_HANDLE: &str = "app/IDScanComponents.toml";
/// Handle of the test component's metadata document.
pub const INFO_HANDLE: &str = "Model/ComponentInfo.toml";
/// Valid metadata document.
pub const INFO: &str = "version = \"1.20210511.7\"\nbuild_channel = \"test\"\n";

/// Shared document with the model's section and an unrelated section.
pub const DOCUMENT: &str = r#"
[M]
TestString = "a"
TestDouble = 1.0

[Other]
Flag = true
Nested = { list = [1, 2, 3], when = 2021-05-11T10:00:00Z }
"#;

/// Component declaring one modifiable text key and one fixed float key.
pub struct Model;

impl Component for Model {
    fn name(&self) -> &str {
        "M"
    }

    fn required_configs(&self) -> Vec<RequiredConfig> {
        vec![
            RequiredConfig::modifiable("TestString", ValueKind::Text),
            RequiredConfig::fixed("TestDouble", ValueKind::FloatingPoint),
        ]
    }
}

/// In-memory fixture: store plus registered model contract.
pub struct Fixture {
    /// Store shared with the contract.
    pub store: InMemoryDocumentStore,
    /// Registered model contract.
    pub contract: ComponentContract<Model>,
}

/// Builds a store seeded with the given document.
pub fn store_with(document: Option<&str>) -> Result<InMemoryDocumentStore, String> {
    let store = InMemoryDocumentStore::new();
    store.insert(DocumentHandle::from(INFO_HANDLE), INFO).map_err(|err| err.to_string())?;
    if let Some(document) = document {
        store.insert(DocumentHandle::from(CONFIG_HANDLE), document).map_err(|err| err.to_string())?;
    }
    Ok(store)
}

/// Locator pointing at the in-memory handles.
pub fn locator() -> StaticResourceLocator {
    StaticResourceLocator::new()
        .with_config_document(DocumentHandle::from(CONFIG_HANDLE))
        .with_component_info("M", DocumentHandle::from(INFO_HANDLE))
}

/// Registers the model against a store seeded with `document`.
pub fn fixture(document: Option<&str>) -> Result<Fixture, String> {
    let store = store_with(document)?;
    let contract =
        ComponentContract::register(Model, Arc::new(locator()), Arc::new(store.clone()))
            .map_err(|err| err.to_string())?;
    Ok(Fixture {
        store,
        contract,
    })
}

/// Returns the current shared document text.
pub fn document_text(store: &InMemoryDocumentStore) -> Result<String, String> {
    store.get(&DocumentHandle::from(CONFIG_HANDLE)).ok_or_else(|| "document missing".to_string())
}
