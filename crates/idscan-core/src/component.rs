// crates/idscan-core/src/component.rs
// ============================================================================
// Module: Component Contract
// Description: Component declarations, config validation, and guarded edits.
// Purpose: Validate and mutate a component's section of the shared config.
// Dependencies: crate::{audit, document, interfaces, metadata, report, value}
// ============================================================================

//! ## Overview
//! Components implement [`Component`] to declare their name and required
//! config keys. [`ComponentContract::register`] resolves the component's
//! metadata once and binds it to the resource collaborators; afterwards the
//! contract loads, validates and edits the component's section of the shared
//! config document.
//!
//! Edits follow a fixed guard sequence and stop at the first failing step:
//! the key must be modifiable, the section must exist, the key must already be
//! present, and the edited section must validate before it is written. The
//! full document is rewritten with every other section unchanged. Access is
//! assumed single-writer; concurrent edits race and the last write wins.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use crate::audit::ConfigAuditEvent;
use crate::audit::ConfigAuditSink;
use crate::audit::NoopAuditSink;
use crate::document::ConfigDocument;
use crate::document::DocumentError;
use crate::interfaces::DocumentStore;
use crate::interfaces::ResourceLocator;
use crate::metadata::ComponentMetadata;
use crate::metadata::ComponentName;
use crate::metadata::MetadataError;
use crate::report::ValidationFailure;
use crate::report::ValidationReport;
use crate::requirements::RequiredConfig;
use crate::value::ConfigMap;
use crate::value::ConfigValue;

// ============================================================================
// SECTION: Component Trait
// ============================================================================

/// A component that declares a config schema.
///
/// ```
/// use idscan_core::Component;
/// use idscan_core::RequiredConfig;
/// use idscan_core::ValueKind;
///
/// struct Scanner;
///
/// impl Component for Scanner {
///     fn name(&self) -> &str {
///         "Scanner"
///     }
///
///     fn required_configs(&self) -> Vec<RequiredConfig> {
///         vec![
///             RequiredConfig::modifiable("BaseURL", ValueKind::Text),
///             RequiredConfig::modifiable("Valid Age", ValueKind::Integer),
///             RequiredConfig::fixed("TimeStamp", ValueKind::FloatingPoint),
///             RequiredConfig::fixed("Some date", ValueKind::Timestamp),
///             RequiredConfig::fixed("USA States", ValueKind::List),
///             RequiredConfig::fixed("Some dic", ValueKind::Mapping),
///         ]
///     }
/// }
/// ```
pub trait Component {
    /// Component name; keys the component's section in the config document.
    fn name(&self) -> &str;

    /// Required config keys in declaration order. Keys must be unique.
    fn required_configs(&self) -> Vec<RequiredConfig> {
        Vec::new()
    }
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Validates a candidate config against a declaration.
///
/// Produces one failure per missing key and one per kind mismatch, in
/// declaration order. A missing candidate fails every declared key.
#[must_use]
pub fn validate_config(
    requirements: &[RequiredConfig],
    candidate: Option<&ConfigMap>,
) -> ValidationReport {
    requirements
        .iter()
        .filter_map(|required| match candidate.and_then(|config| config.get(required.key())) {
            None => Some(ValidationFailure::MissingKey {
                key: required.key().to_string(),
            }),
            Some(value) if !value.is_kind(required.kind()) => {
                Some(ValidationFailure::WrongKind {
                    key: required.key().to_string(),
                    expected: required.kind(),
                    actual: value.kind(),
                })
            }
            Some(_) => None,
        })
        .collect()
}

// ============================================================================
// SECTION: Contract
// ============================================================================

/// A registered component bound to its resource collaborators.
pub struct ComponentContract<C> {
    /// The component implementation.
    component: C,
    /// Metadata resolved at registration.
    metadata: ComponentMetadata,
    /// Declaration captured at registration.
    requirements: Vec<RequiredConfig>,
    /// Locator for the shared config document.
    locator: Arc<dyn ResourceLocator>,
    /// Store reading and writing documents.
    store: Arc<dyn DocumentStore>,
    /// Sink receiving edit audit events.
    audit: Arc<dyn ConfigAuditSink>,
}

impl<C: Component> ComponentContract<C> {
    /// Registers a component, resolving its name and metadata.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError`] when the name is empty or the component or
    /// core metadata is missing or has no version. These are packaging
    /// defects; hosts typically abort on them.
    pub fn register(
        component: C,
        locator: Arc<dyn ResourceLocator>,
        store: Arc<dyn DocumentStore>,
    ) -> Result<Self, MetadataError> {
        let name = ComponentName::new(component.name())?;
        let metadata = ComponentMetadata::resolve(name, locator.as_ref(), store.as_ref())?;
        let requirements = component.required_configs();
        Ok(Self {
            component,
            metadata,
            requirements,
            locator,
            store,
            audit: Arc::new(NoopAuditSink),
        })
    }

    /// Replaces the audit sink.
    #[must_use]
    pub fn with_audit_sink(mut self, audit: Arc<dyn ConfigAuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Returns the component implementation.
    #[must_use]
    pub const fn component(&self) -> &C {
        &self.component
    }

    /// Returns the resolved metadata.
    #[must_use]
    pub const fn metadata(&self) -> &ComponentMetadata {
        &self.metadata
    }

    /// Returns the component name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.metadata.name().as_str()
    }

    /// Returns the component version string.
    #[must_use]
    pub fn component_version(&self) -> &str {
        self.metadata.component_version()
    }

    /// Returns the core library version string.
    #[must_use]
    pub fn core_version(&self) -> &str {
        self.metadata.core_version()
    }

    /// Returns the declared required configs.
    #[must_use]
    pub fn required_configs(&self) -> &[RequiredConfig] {
        &self.requirements
    }

    /// Loads the component's persisted config section.
    ///
    /// Returns `Ok(None)` when no document is located, the document does not
    /// exist, or it has no section for this component.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError`] when the document cannot be read or parsed,
    /// or the section holds unsupported values.
    pub fn load_config(&self) -> Result<Option<ConfigMap>, DocumentError> {
        match self.load_document()? {
            Some(document) => document.section(self.name()),
            None => Ok(None),
        }
    }

    /// Validates a candidate config against the declaration. Pure.
    #[must_use]
    pub fn validate_config(&self, candidate: Option<&ConfigMap>) -> ValidationReport {
        validate_config(&self.requirements, candidate)
    }

    /// Edits one existing, modifiable config value and persists the section.
    ///
    /// Returns an empty report on success. Every rejection leaves the
    /// persisted document untouched.
    #[must_use]
    pub fn set_config_value(&self, key: &str, value: ConfigValue) -> ValidationReport {
        let value_kind = value.kind();
        let report = self.apply_edit(key, value);
        self.audit.record(&ConfigAuditEvent::edit(self.name(), key, value_kind, &report));
        report
    }

    /// Runs the guard sequence and the write path for one edit.
    fn apply_edit(&self, key: &str, value: ConfigValue) -> ValidationReport {
        let fixed = self
            .requirements
            .iter()
            .any(|required| required.key() == key && !required.is_modifiable());
        if fixed {
            return ValidationReport::single(ValidationFailure::NotModifiable {
                component: self.name().to_string(),
                key: key.to_string(),
                value: value.to_string(),
            });
        }
        let mut section = match self.load_config() {
            Ok(Some(section)) => section,
            Ok(None) => {
                return ValidationReport::single(ValidationFailure::MissingSection {
                    component: self.name().to_string(),
                    key: key.to_string(),
                    value: value.to_string(),
                });
            }
            Err(err) => return ValidationReport::single(self.load_failed(&err)),
        };
        let Some(slot) = section.get_mut(key) else {
            return ValidationReport::single(ValidationFailure::UnknownKey {
                component: self.name().to_string(),
                key: key.to_string(),
                value: value.to_string(),
            });
        };
        *slot = value;
        self.write_config(&section)
    }

    /// Validates and writes a full section back into the shared document.
    fn write_config(&self, section: &ConfigMap) -> ValidationReport {
        let report = self.validate_config(Some(section));
        if !report.is_ok() {
            return report;
        }
        let Some(handle) = self.locator.config_document() else {
            return ValidationReport::single(self.write_failed("<unlocated>", "no config document"));
        };
        let mut document = match self.store.read(&handle) {
            Ok(Some(text)) => match ConfigDocument::parse(&text) {
                Ok(document) => document,
                Err(err) => return ValidationReport::single(self.load_failed(&err)),
            },
            Ok(None) => {
                return ValidationReport::single(
                    self.write_failed(&handle.to_string(), "config document does not exist"),
                );
            }
            Err(err) => return ValidationReport::single(self.load_failed(&DocumentError::from(err))),
        };
        document.replace_section(self.name(), section);
        match self.store.write(&handle, &document.render()) {
            Ok(()) => ValidationReport::new(),
            Err(err) => {
                ValidationReport::single(self.write_failed(&handle.to_string(), &err.to_string()))
            }
        }
    }

    /// Reads and parses the shared document, if located and present.
    fn load_document(&self) -> Result<Option<ConfigDocument>, DocumentError> {
        let Some(handle) = self.locator.config_document() else {
            return Ok(None);
        };
        match self.store.read(&handle)? {
            Some(text) => ConfigDocument::parse(&text).map(Some),
            None => Ok(None),
        }
    }

    /// Builds a load failure for this component.
    fn load_failed(&self, err: &DocumentError) -> ValidationFailure {
        ValidationFailure::LoadFailed {
            component: self.name().to_string(),
            message: err.to_string(),
        }
    }

    /// Builds a write failure for this component.
    fn write_failed(&self, document: &str, message: &str) -> ValidationFailure {
        ValidationFailure::WriteFailed {
            component: self.name().to_string(),
            document: document.to_string(),
            message: message.to_string(),
        }
    }
}
