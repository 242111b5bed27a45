// crates/idscan-core/src/lib.rs
// ============================================================================
// Module: IDScan Core Library
// Description: Public API surface for the component contract.
// Purpose: Expose declarations, validation, metadata, and resource collaborators.
// Dependencies: crate::{audit, component, config, document, interfaces, metadata, report, store, value}
// ============================================================================

//! ## Overview
//! `idscan-core` is the contract every independently shipped IDScan component
//! implements. A component declares the config keys it needs with their
//! expected kinds and whether they may be edited. The contract loads the
//! component's section of the shared `IDScanComponents.toml` document,
//! validates it against the declaration, and performs guarded edits that
//! rewrite the document without touching other components' sections.
//!
//! Recoverable problems are returned as a [`ValidationReport`]. Packaging
//! defects (missing name, metadata or version) are returned as
//! [`MetadataError`] when a component is registered.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod component;
pub mod config;
pub mod document;
pub mod interfaces;
pub mod metadata;
pub mod report;
pub mod requirements;
pub mod store;
pub mod value;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuditFailure;
pub use audit::ConfigAuditEvent;
pub use audit::ConfigAuditSink;
pub use audit::EditOutcome;
pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use audit::audit_sink_from_config;
pub use component::Component;
pub use component::ComponentContract;
pub use component::validate_config;
pub use config::AuditConfig;
pub use config::AuditSinkKind;
pub use config::ConfigError;
pub use config::ResourceConfig;
pub use document::ConfigDocument;
pub use document::DocumentError;
pub use interfaces::DocumentHandle;
pub use interfaces::DocumentStore;
pub use interfaces::ResourceLocator;
pub use interfaces::StoreError;
pub use metadata::ComponentInfo;
pub use metadata::ComponentMetadata;
pub use metadata::ComponentName;
pub use metadata::MetadataError;
pub use metadata::core_info;
pub use metadata::is_valid_version;
pub use report::ValidationFailure;
pub use report::ValidationReport;
pub use report::VersionField;
pub use requirements::RequiredConfig;
pub use store::COMPONENT_INFO_NAME;
pub use store::CONFIG_DOCUMENT_NAME;
pub use store::FsDocumentStore;
pub use store::FsResourceLocator;
pub use store::InMemoryDocumentStore;
pub use store::StaticResourceLocator;
pub use toml::value::Datetime;
pub use value::ConfigMap;
pub use value::ConfigValue;
pub use value::ValueError;
pub use value::ValueKind;
