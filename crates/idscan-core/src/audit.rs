// crates/idscan-core/src/audit.rs
// ============================================================================
// Module: Config Edit Audit Logging
// Description: Structured audit events for component config edits.
// Purpose: Emit JSON-line audit records without hard logging dependencies.
// Dependencies: crate::config, serde, serde_json
// ============================================================================

//! ## Overview
//! Every attempt to edit a component's config produces one
//! [`ConfigAuditEvent`]. Events carry the key and the kind of the submitted
//! value, never the value itself. Sinks route events to stderr, an
//! append-only file, or nowhere.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::config::AuditConfig;
use crate::config::AuditSinkKind;
use crate::config::ConfigError;
use crate::report::ValidationFailure;
use crate::report::ValidationReport;
use crate::value::ValueKind;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Outcome of a config edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditOutcome {
    /// The edit was validated and written.
    Applied,
    /// The edit was rejected or the write failed.
    Rejected,
}

/// Value-free description of one failure in an audit event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditFailure {
    /// Failure code, see [`ValidationFailure::code`].
    pub code: &'static str,
    /// Key the failure concerns, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl From<&ValidationFailure> for AuditFailure {
    fn from(failure: &ValidationFailure) -> Self {
        Self {
            code: failure.code(),
            key: failure.key().map(str::to_string),
        }
    }
}

/// Config edit audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Component whose section was edited.
    pub component: String,
    /// Edited key.
    pub key: String,
    /// Kind of the submitted value.
    pub value_kind: ValueKind,
    /// Edit outcome.
    pub outcome: EditOutcome,
    /// Failure codes and keys when rejected.
    pub failures: Vec<AuditFailure>,
}

impl ConfigAuditEvent {
    /// Creates an edit event from the edit report.
    #[must_use]
    pub fn edit(component: &str, key: &str, value_kind: ValueKind, report: &ValidationReport) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        let outcome = if report.is_ok() { EditOutcome::Applied } else { EditOutcome::Rejected };
        Self {
            event: "config_edit",
            timestamp_ms,
            component: component.to_string(),
            key: key.to_string(),
            value_kind,
            outcome,
            failures: report.iter().map(AuditFailure::from).collect(),
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for config edit events.
pub trait ConfigAuditSink: Send + Sync {
    /// Record an edit event.
    fn record(&self, event: &ConfigAuditEvent);
}

/// Audit sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAuditSink;

impl ConfigAuditSink for NoopAuditSink {
    fn record(&self, _event: &ConfigAuditEvent) {}
}

/// Audit sink that logs JSON lines to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrAuditSink;

impl ConfigAuditSink for StderrAuditSink {
    fn record(&self, event: &ConfigAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl ConfigAuditSink for FileAuditSink {
    fn record(&self, event: &ConfigAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// Builds the audit sink selected by configuration.
///
/// `base` resolves a relative file path.
///
/// # Errors
///
/// Returns [`ConfigError`] when the file sink cannot be opened or has no path.
pub fn audit_sink_from_config(
    config: &AuditConfig,
    base: Option<&Path>,
) -> Result<Arc<dyn ConfigAuditSink>, ConfigError> {
    match config.sink {
        AuditSinkKind::None => Ok(Arc::new(NoopAuditSink)),
        AuditSinkKind::Stderr => Ok(Arc::new(StderrAuditSink)),
        AuditSinkKind::File => {
            let path = config
                .path
                .as_ref()
                .ok_or_else(|| ConfigError::Invalid("file audit sink requires path".to_string()))?;
            let resolved = match base {
                Some(base) if path.is_relative() => base.join(path),
                _ => path.clone(),
            };
            let sink =
                FileAuditSink::new(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
            Ok(Arc::new(sink))
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
