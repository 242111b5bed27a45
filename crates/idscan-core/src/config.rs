// crates/idscan-core/src/config.rs
// ============================================================================
// Module: Resource Configuration
// Description: Loading and validation of resource location settings.
// Purpose: Describe where component documents live, with strict limits.
// Dependencies: serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Hosts describe where the shared config document and each component's
//! metadata live in a TOML file (`idscan-resources.toml` by default).
//! Loading is strict: unknown fields, oversized files and malformed paths
//! fail closed. Relative paths resolve against the config file's directory.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use crate::store::COMPONENT_INFO_NAME;
use crate::store::CONFIG_DOCUMENT_NAME;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "idscan-resources.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "IDSCAN_RESOURCES_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of component entries.
pub(crate) const MAX_COMPONENTS: usize = 256;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Resource location configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceConfig {
    /// Shared document locations.
    #[serde(default)]
    pub documents: DocumentsConfig,
    /// Resource directory per component name.
    #[serde(default)]
    pub components: BTreeMap<String, ComponentResourceConfig>,
    /// Audit sink configuration.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Directory of the loaded config file (not serialized).
    #[serde(skip)]
    pub source_dir: Option<PathBuf>,
}

impl ResourceConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let mut config = Self::parse(content)?;
        config.source_dir = resolved.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Parses and validates configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.documents.validate()?;
        if self.components.len() > MAX_COMPONENTS {
            return Err(ConfigError::Invalid(format!(
                "too many components (max {MAX_COMPONENTS})"
            )));
        }
        for (name, component) in &self.components {
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid("component name must be non-empty".to_string()));
            }
            validate_path_string(
                &format!("components.{name}.resource_dir"),
                &component.resource_dir.to_string_lossy(),
            )?;
        }
        self.audit.validate()
    }

    /// Resolves a configured path against the config file's directory.
    #[must_use]
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.source_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

/// Shared document locations.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentsConfig {
    /// Application-level directory searched first for the config document.
    #[serde(default)]
    pub application_dir: Option<PathBuf>,
    /// Fixture directory searched when the application directory has no document.
    #[serde(default)]
    pub fixture_dir: Option<PathBuf>,
    /// Config document file name.
    #[serde(default = "default_config_file_name")]
    pub config_file_name: String,
    /// Component metadata document file name.
    #[serde(default = "default_info_file_name")]
    pub info_file_name: String,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            application_dir: None,
            fixture_dir: None,
            config_file_name: default_config_file_name(),
            info_file_name: default_info_file_name(),
        }
    }
}

impl DocumentsConfig {
    /// Validates document locations and file names.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(dir) = &self.application_dir {
            validate_path_string("documents.application_dir", &dir.to_string_lossy())?;
        }
        if let Some(dir) = &self.fixture_dir {
            validate_path_string("documents.fixture_dir", &dir.to_string_lossy())?;
        }
        validate_file_name("documents.config_file_name", &self.config_file_name)?;
        validate_file_name("documents.info_file_name", &self.info_file_name)
    }
}

/// Per-component resource location.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentResourceConfig {
    /// Directory holding the component's metadata document.
    pub resource_dir: PathBuf,
}

/// Audit sink selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// Drop audit events.
    #[default]
    None,
    /// JSON lines on stderr.
    Stderr,
    /// JSON lines appended to a file.
    File,
}

/// Audit configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Sink receiving edit events.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Log file path for the file sink.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl AuditConfig {
    /// Validates the sink/path combination.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.path is required for the file sink".to_string()))
            }
            (AuditSinkKind::File, Some(path)) => {
                validate_path_string("audit.path", &path.to_string_lossy())
            }
            (_, Some(_)) => {
                Err(ConfigError::Invalid("audit.path is only valid for the file sink".to_string()))
            }
            (_, None) => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from an explicit path or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let path_str = path.to_string_lossy();
    if path_str.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a configured path string.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates a bare file name (no directories, no traversal).
fn validate_file_name(field: &str, value: &str) -> Result<(), ConfigError> {
    let mut components = Path::new(value).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None)
            if name.to_string_lossy().len() <= MAX_PATH_COMPONENT_LENGTH =>
        {
            Ok(())
        }
        _ => Err(ConfigError::Invalid(format!("{field} must be a bare file name"))),
    }
}

/// Default config document file name.
fn default_config_file_name() -> String {
    CONFIG_DOCUMENT_NAME.to_string()
}

/// Default metadata document file name.
fn default_info_file_name() -> String {
    COMPONENT_INFO_NAME.to_string()
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
    fn empty_config_uses_defaults() {
        let config = ResourceConfig::parse("").unwrap();
        assert_eq!(config.documents.config_file_name, CONFIG_DOCUMENT_NAME);
        assert_eq!(config.documents.info_file_name, COMPONENT_INFO_NAME);
        assert_eq!(config.audit.sink, AuditSinkKind::None);
    }

    #[test]
    fn file_names_must_be_bare() {
        for name in ["", "../IDScanComponents.toml", "dir/IDScanComponents.toml", "/abs.toml"] {
            let text = format!("[documents]\nconfig_file_name = \"{name}\"\n");
            assert!(ResourceConfig::parse(&text).is_err(), "{name} should be rejected");
        }
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = ResourceConfig::parse("[documents]\nbogus = 1\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn file_audit_requires_path() {
        let err = ResourceConfig::parse("[audit]\nsink = \"file\"\n").unwrap_err();
        assert!(err.to_string().contains("audit.path is required"));
        let err = ResourceConfig::parse("[audit]\nsink = \"stderr\"\npath = \"a.log\"\n")
            .unwrap_err();
        assert!(err.to_string().contains("only valid for the file sink"));
    }

    #[test]
    fn blank_resource_dir_is_rejected() {
        let err =
            ResourceConfig::parse("[components.Scanner]\nresource_dir = \"  \"\n").unwrap_err();
        assert!(err.to_string().contains("components.Scanner.resource_dir must be non-empty"));
    }

    #[test]
    fn relative_paths_resolve_against_source_dir() {
        let mut config = ResourceConfig::parse("").unwrap();
        config.source_dir = Some(PathBuf::from("/srv/app"));
        assert_eq!(config.resolve(Path::new("res")), PathBuf::from("/srv/app/res"));
        assert_eq!(config.resolve(Path::new("/abs")), PathBuf::from("/abs"));
    }
}
