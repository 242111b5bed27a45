// crates/idscan-core/src/report.rs
// ============================================================================
// Module: Validation Reports
// Description: Ordered failure lists returned by checks and edits.
// Purpose: Communicate recoverable failures without aborting.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Every validation, edit and harness check returns a [`ValidationReport`]:
//! an ordered list of [`ValidationFailure`] values. An empty report means
//! success. Reports are built fresh per call and never persisted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::slice;
use std::vec;

use thiserror::Error;

use crate::value::ValueKind;

// ============================================================================
// SECTION: Failures
// ============================================================================

/// Version field named in a version format failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionField {
    /// The component's own version.
    Component,
    /// The version of the core library the component was built against.
    Core,
}

impl fmt::Display for VersionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Component => f.write_str("version"),
            Self::Core => f.write_str("core version"),
        }
    }
}

/// A single recoverable failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    /// A declared key is absent from the config.
    #[error("REQUIRED CONFIG: unable to load config value for key '{key}'")]
    MissingKey {
        /// Declared key.
        key: String,
    },
    /// A declared key holds a value of another kind.
    #[error(
        "REQUIRED CONFIG: wrong config value type for key '{key}'. Required: '{expected}'. But \
         in config: '{actual}'"
    )]
    WrongKind {
        /// Declared key.
        key: String,
        /// Declared kind.
        expected: ValueKind,
        /// Kind found in the config.
        actual: ValueKind,
    },
    /// The key is declared as not modifiable.
    #[error(
        "{component}: unable to save component config value {value} for key '{key}'. Required \
         config key '{key}' is not modifiable"
    )]
    NotModifiable {
        /// Component name.
        component: String,
        /// Rejected key.
        key: String,
        /// Rendered rejected value.
        value: String,
    },
    /// No config document or no section for the component.
    #[error(
        "{component}: unable to save component config value {value} for key '{key}'. There is \
         no config document or component section '{component}' in it"
    )]
    MissingSection {
        /// Component name.
        component: String,
        /// Rejected key.
        key: String,
        /// Rendered rejected value.
        value: String,
    },
    /// The key is not present in the component's section.
    #[error(
        "{component}: unable to save component config value {value} for key '{key}'. The key \
         does not exist. Only existing keys may be modified"
    )]
    UnknownKey {
        /// Component name.
        component: String,
        /// Rejected key.
        key: String,
        /// Rendered rejected value.
        value: String,
    },
    /// The config document could not be read or interpreted.
    #[error("{component}: unable to load component config. {message}")]
    LoadFailed {
        /// Component name.
        component: String,
        /// Underlying error description.
        message: String,
    },
    /// The config document could not be written.
    #[error("{component}: unable to save component config to {document}. {message}")]
    WriteFailed {
        /// Component name.
        component: String,
        /// Document the write targeted.
        document: String,
        /// Underlying error description.
        message: String,
    },
    /// A version string violates the `major.yyyymmdd.build` format.
    #[error("VERSION: wrong {field} format '{value}'")]
    VersionFormat {
        /// Which version was checked.
        field: VersionField,
        /// Offending version string.
        value: String,
    },
    /// A probing edit that should have been rejected was applied.
    #[error("MUTATION GUARD: {component}: edit of key '{key}' was accepted ({probe})")]
    GuardBypassed {
        /// Component name.
        component: String,
        /// Probed key.
        key: String,
        /// What the probe expected to be rejected.
        probe: String,
    },
    /// Component-supplied self-test failure.
    #[error("{0}")]
    SelfTest(String),
}

impl ValidationFailure {
    /// Returns a stable snake_case code naming the failure variant.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingKey { .. } => "missing_key",
            Self::WrongKind { .. } => "wrong_kind",
            Self::NotModifiable { .. } => "not_modifiable",
            Self::MissingSection { .. } => "missing_section",
            Self::UnknownKey { .. } => "unknown_key",
            Self::LoadFailed { .. } => "load_failed",
            Self::WriteFailed { .. } => "write_failed",
            Self::VersionFormat { .. } => "version_format",
            Self::GuardBypassed { .. } => "guard_bypassed",
            Self::SelfTest(_) => "self_test",
        }
    }

    /// Returns the config key the failure concerns, if any.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::MissingKey { key }
            | Self::WrongKind { key, .. }
            | Self::NotModifiable { key, .. }
            | Self::MissingSection { key, .. }
            | Self::UnknownKey { key, .. }
            | Self::GuardBypassed { key, .. } => Some(key.as_str()),
            Self::LoadFailed { .. }
            | Self::WriteFailed { .. }
            | Self::VersionFormat { .. }
            | Self::SelfTest(_) => None,
        }
    }
}

// ============================================================================
// SECTION: Report
// ============================================================================

/// Ordered failure list; empty means success.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Failures in the order they were found.
    failures: Vec<ValidationFailure>,
}

impl ValidationReport {
    /// Creates an empty (passing) report.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            failures: Vec::new(),
        }
    }

    /// Creates a report holding a single failure.
    #[must_use]
    pub fn single(failure: ValidationFailure) -> Self {
        Self {
            failures: vec![failure],
        }
    }

    /// Returns true when no failures were recorded.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    /// Returns the number of failures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Returns true when the report is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Appends a failure.
    pub fn push(&mut self, failure: ValidationFailure) {
        self.failures.push(failure);
    }

    /// Appends every failure of another report, keeping order.
    pub fn append(&mut self, other: Self) {
        self.failures.extend(other.failures);
    }

    /// Returns the failures as a slice.
    #[must_use]
    pub fn failures(&self) -> &[ValidationFailure] {
        &self.failures
    }

    /// Returns an iterator over the failures.
    pub fn iter(&self) -> slice::Iter<'_, ValidationFailure> {
        self.failures.iter()
    }

    /// Converts the report into a result.
    ///
    /// # Errors
    ///
    /// Returns the report itself when it holds any failure.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_ok() { Ok(()) } else { Err(self) }
    }
}

impl From<Vec<ValidationFailure>> for ValidationReport {
    fn from(failures: Vec<ValidationFailure>) -> Self {
        Self {
            failures,
        }
    }
}

impl FromIterator<ValidationFailure> for ValidationReport {
    fn from_iter<I: IntoIterator<Item = ValidationFailure>>(iter: I) -> Self {
        Self {
            failures: iter.into_iter().collect(),
        }
    }
}

impl Extend<ValidationFailure> for ValidationReport {
    fn extend<I: IntoIterator<Item = ValidationFailure>>(&mut self, iter: I) {
        self.failures.extend(iter);
    }
}

impl IntoIterator for ValidationReport {
    type Item = ValidationFailure;
    type IntoIter = vec::IntoIter<ValidationFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationReport {
    type Item = &'a ValidationFailure;
    type IntoIter = slice::Iter<'a, ValidationFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.iter()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
