// crates/idscan-component-tests/src/checks.rs
// ============================================================================
// Module: Component Checks
// Description: Version, required config, and self-test checks.
// Purpose: Compose the verification pass every component runs.
// Dependencies: idscan-core
// ============================================================================

//! ## Overview
//! Each check returns a [`ValidationReport`]. [`run_checks`] runs them in a
//! fixed order and concatenates the results without short-circuiting.

// ============================================================================
// SECTION: Imports
// ============================================================================

use idscan_core::Component;
use idscan_core::ComponentContract;
use idscan_core::ComponentMetadata;
use idscan_core::ValidationFailure;
use idscan_core::ValidationReport;
use idscan_core::VersionField;
use idscan_core::is_valid_version;

// ============================================================================
// SECTION: Component Test Trait
// ============================================================================

/// A component that can be verified by the harness.
pub trait ComponentTest: Component {
    /// Component-specific checks not expressible as declared config.
    fn self_test(&self) -> ValidationReport {
        ValidationReport::new()
    }
}

// ============================================================================
// SECTION: Checks
// ============================================================================

/// Runs version, required config, and self-test checks in that order.
#[must_use]
pub fn run_checks<C: ComponentTest>(contract: &ComponentContract<C>) -> ValidationReport {
    let mut report = check_versions(contract.metadata());
    report.append(check_required_configs(contract));
    report.append(contract.component().self_test());
    report
}

/// Checks the component and core version strings independently.
#[must_use]
pub fn check_versions(metadata: &ComponentMetadata) -> ValidationReport {
    version_failures(metadata.component_version(), metadata.core_version())
}

/// Reports each version string that violates the version format.
fn version_failures(component: &str, core: &str) -> ValidationReport {
    [(VersionField::Component, component), (VersionField::Core, core)]
        .into_iter()
        .filter(|(_, version)| !is_valid_version(version))
        .map(|(field, version)| ValidationFailure::VersionFormat {
            field,
            value: version.to_string(),
        })
        .collect()
}

/// Loads the persisted section and validates it against the declaration.
///
/// A section that cannot be loaded yields a single load failure.
#[must_use]
pub fn check_required_configs<C: Component>(contract: &ComponentContract<C>) -> ValidationReport {
    match contract.load_config() {
        Ok(config) => contract.validate_config(config.as_ref()),
        Err(err) => ValidationReport::single(ValidationFailure::LoadFailed {
            component: contract.name().to_string(),
            message: err.to_string(),
        }),
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
    fn malformed_core_version_is_flagged() {
        let report = version_failures("2.20240101.3", "1.2021.5");
        assert_eq!(
            report.failures(),
            [ValidationFailure::VersionFormat {
                field: VersionField::Core,
                value: "1.2021.5".to_string(),
            }]
        );
        assert!(report.failures()[0].to_string().contains("wrong core version format"));
    }

    #[test]
    fn both_versions_are_checked_in_order() {
        let fields: Vec<VersionField> = version_failures("1..5", "")
            .iter()
            .filter_map(|failure| match failure {
                ValidationFailure::VersionFormat { field, .. } => Some(*field),
                _ => None,
            })
            .collect();
        assert_eq!(fields, [VersionField::Component, VersionField::Core]);
    }

    #[test]
    fn valid_versions_pass() {
        assert!(version_failures("2.20240101.3", "1.20210511.7").is_ok());
    }
}
