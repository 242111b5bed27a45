// crates/idscan-core/src/requirements.rs
// ============================================================================
// Module: Required Config Declarations
// Description: Per-component declaration of required config keys.
// Purpose: Describe the schema a component's config section must satisfy.
// Dependencies: crate::value
// ============================================================================

//! ## Overview
//! A component declares the keys it needs as an ordered list of
//! [`RequiredConfig`] entries. The declaration is static metadata describing
//! the schema; it is never persisted. Keys are expected to be unique within
//! one declaration, which is left to the declaring component.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::value::ValueKind;

// ============================================================================
// SECTION: Types
// ============================================================================

/// One required configuration key with its expected kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredConfig {
    /// Config key.
    key: String,
    /// Expected value kind.
    kind: ValueKind,
    /// Whether the value may be edited after provisioning.
    modifiable: bool,
}

impl RequiredConfig {
    /// Creates a new required config entry.
    #[must_use]
    pub fn new(key: impl Into<String>, kind: ValueKind, modifiable: bool) -> Self {
        Self {
            key: key.into(),
            kind,
            modifiable,
        }
    }

    /// Creates an entry whose value may be edited.
    #[must_use]
    pub fn modifiable(key: impl Into<String>, kind: ValueKind) -> Self {
        Self::new(key, kind, true)
    }

    /// Creates an entry whose value is fixed after provisioning.
    #[must_use]
    pub fn fixed(key: impl Into<String>, kind: ValueKind) -> Self {
        Self::new(key, kind, false)
    }

    /// Returns the config key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the expected value kind.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Returns true when the value may be edited.
    #[must_use]
    pub const fn is_modifiable(&self) -> bool {
        self.modifiable
    }
}
