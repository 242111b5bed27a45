// crates/idscan-component-tests/src/guards.rs
// ============================================================================
// Module: Mutation Guard Probes
// Description: Probing edits that a correct contract must reject.
// Purpose: Detect declarations or sections that let invalid edits through.
// Dependencies: idscan-core, toml
// ============================================================================

//! ## Overview
//! [`check_mutation_guards`] submits edits the contract must refuse: edits of
//! fixed keys, an edit of a key absent from the section, and edits of
//! modifiable keys present in the section with a value of another kind. Each probe that is applied
//! yields a [`ValidationFailure::GuardBypassed`].
//!
//! Rejected probes never write. An applied probe has already rewritten the
//! document, so run the probes against disposable fixtures only.

// ============================================================================
// SECTION: Imports
// ============================================================================

use idscan_core::Component;
use idscan_core::ComponentContract;
use idscan_core::ConfigMap;
use idscan_core::ConfigValue;
use idscan_core::Datetime;
use idscan_core::ValidationFailure;
use idscan_core::ValidationReport;
use idscan_core::ValueKind;
use toml::value::Date;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Base name of the key probed as absent.
const ABSENT_KEY: &str = "IDScanProbeAbsentKey";

// ============================================================================
// SECTION: Probes
// ============================================================================

/// Probes the edit guards of a registered component.
#[must_use]
pub fn check_mutation_guards<C: Component>(contract: &ComponentContract<C>) -> ValidationReport {
    let mut report = ValidationReport::new();
    for required in contract.required_configs().iter().filter(|required| !required.is_modifiable())
    {
        probe(
            contract,
            &mut report,
            required.key(),
            probe_value(required.kind()),
            "fixed key",
        );
    }
    let section = contract.load_config().ok().flatten().unwrap_or_default();
    probe(contract, &mut report, &absent_key(&section), probe_value(ValueKind::Text), "absent key");
    for required in contract
        .required_configs()
        .iter()
        .filter(|required| required.is_modifiable() && section.contains_key(required.key()))
    {
        probe(
            contract,
            &mut report,
            required.key(),
            probe_value(other_kind(required.kind())),
            "value of another kind",
        );
    }
    report
}

/// Submits one probing edit and records it when applied.
fn probe<C: Component>(
    contract: &ComponentContract<C>,
    report: &mut ValidationReport,
    key: &str,
    value: ConfigValue,
    description: &str,
) {
    if contract.set_config_value(key, value).is_ok() {
        report.push(ValidationFailure::GuardBypassed {
            component: contract.name().to_string(),
            key: key.to_string(),
            probe: description.to_string(),
        });
    }
}

/// Returns a key name not present in the section.
fn absent_key(section: &ConfigMap) -> String {
    let mut key = ABSENT_KEY.to_string();
    let mut suffix = 0_usize;
    while section.contains_key(&key) {
        suffix += 1;
        key = format!("{ABSENT_KEY}{suffix}");
    }
    key
}

/// Returns a kind different from `kind`.
const fn other_kind(kind: ValueKind) -> ValueKind {
    match kind {
        ValueKind::Text => ValueKind::Integer,
        ValueKind::Integer
        | ValueKind::FloatingPoint
        | ValueKind::Timestamp
        | ValueKind::List
        | ValueKind::Mapping => ValueKind::Text,
    }
}

/// Returns a representative value of `kind`.
fn probe_value(kind: ValueKind) -> ConfigValue {
    match kind {
        ValueKind::Text => ConfigValue::from("probe"),
        ValueKind::Integer => ConfigValue::from(0_i64),
        ValueKind::FloatingPoint => ConfigValue::from(0.5),
        ValueKind::Timestamp => ConfigValue::from(Datetime {
            date: Some(Date {
                year: 2000,
                month: 1,
                day: 1,
            }),
            time: None,
            offset: None,
        }),
        ValueKind::List => ConfigValue::List(Vec::new()),
        ValueKind::Mapping => ConfigValue::Mapping(ConfigMap::new()),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
