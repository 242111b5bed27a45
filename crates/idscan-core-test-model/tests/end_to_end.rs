//! End-to-end tests for the core test model.
// crates/idscan-core-test-model/tests/end_to_end.rs
// =============================================================================
// Module: Core Test Model End-to-End Tests
// Description: Run the harness and guarded edits against staged fixtures.
// Purpose: Verify the contract and harness together on real documents.
// Dependencies: idscan-component-tests, idscan-core, idscan-core-test-model, tempfile
// =============================================================================

use std::fs;

use idscan_component_tests::assert_errors;
use idscan_component_tests::check_mutation_guards;
use idscan_component_tests::format_errors;
use idscan_component_tests::run_checks;
use idscan_core::CONFIG_DOCUMENT_NAME;
use idscan_core::ComponentContract;
use idscan_core::ConfigDocument;
use idscan_core::ConfigMap;
use idscan_core::ConfigValue;
use idscan_core::ValidationFailure;
use idscan_core::ValueKind;
use idscan_core_test_model::APPLICATION_DIR;
use idscan_core_test_model::CoreTestModel;
use idscan_core_test_model::FIXTURE_DIR;
use idscan_core_test_model::MODEL_NAME;
use idscan_core_test_model::register;
use idscan_core_test_model::resources_dir;
use idscan_core_test_model::stage_fixtures;
use tempfile::TempDir;

type TestResult = Result<(), String>;

/// Stages fixtures into a scratch directory and registers the model.
fn staged() -> Result<(TempDir, ComponentContract<CoreTestModel>), String> {
    let temp = TempDir::new().map_err(|err| err.to_string())?;
    let locator = stage_fixtures(temp.path()).map_err(|err| err.to_string())?;
    let contract = register(locator).map_err(|err| err.to_string())?;
    Ok((temp, contract))
}

/// Reads the staged config document.
fn staged_document(temp: &TempDir) -> Result<String, String> {
    fs::read_to_string(temp.path().join(FIXTURE_DIR).join(CONFIG_DOCUMENT_NAME))
        .map_err(|err| err.to_string())
}

/// Loads the model's persisted section.
fn section(contract: &ComponentContract<CoreTestModel>) -> Result<ConfigMap, String> {
    contract
        .load_config()
        .map_err(|err| err.to_string())?
        .ok_or_else(|| "model section missing".to_string())
}

#[test]
fn fixture_passes_every_check() -> TestResult {
    let (_temp, contract) = staged()?;
    assert_errors(&run_checks(&contract), contract.name())
}

#[test]
fn fixture_guards_hold() -> TestResult {
    let (temp, contract) = staged()?;
    let before = staged_document(&temp)?;
    assert_errors(&check_mutation_guards(&contract), contract.name())?;
    if staged_document(&temp)? != before {
        return Err("guard probes must not write".to_string());
    }
    Ok(())
}

#[test]
fn fixture_section_holds_every_kind() -> TestResult {
    let (_temp, contract) = staged()?;
    let section = section(&contract)?;
    for required in contract.required_configs() {
        let kind = section.get(required.key()).map(ConfigValue::kind);
        if kind != Some(required.kind()) {
            return Err(format!("{} should hold a {} value", required.key(), required.kind()));
        }
    }
    Ok(())
}

#[test]
fn mutation_scenario() -> TestResult {
    let (temp, contract) = staged()?;
    let original = staged_document(&temp)?;

    let wrong_kind = contract.set_config_value("TestString", ConfigValue::from(123_i64));
    if !matches!(wrong_kind.failures(), [ValidationFailure::WrongKind { .. }]) {
        return Err("wrong kind edit should fail once".to_string());
    }
    let fixed = contract.set_config_value("TestDouble", ConfigValue::from(2.0));
    if !matches!(fixed.failures(), [ValidationFailure::NotModifiable { .. }]) {
        return Err("fixed key edit should fail once".to_string());
    }
    let unknown = contract.set_config_value("NewKey", ConfigValue::from(2.0));
    if !matches!(unknown.failures(), [ValidationFailure::UnknownKey { .. }]) {
        return Err("unknown key edit should fail once".to_string());
    }
    if staged_document(&temp)? != original {
        return Err("rejected edits must leave the document unchanged".to_string());
    }

    let applied = contract.set_config_value("TestString", ConfigValue::from("b"));
    assert_errors(&applied, contract.name())?;
    let applied = contract.set_config_value("TestInt", ConfigValue::from(7_i64));
    assert_errors(&applied, contract.name())?;

    let section = section(&contract)?;
    if section.get("TestString") != Some(&ConfigValue::from("b")) {
        return Err("TestString should be updated".to_string());
    }
    if section.get("TestInt") != Some(&ConfigValue::from(7_i64)) {
        return Err("TestInt should be updated".to_string());
    }
    let before = ConfigDocument::parse(&original).map_err(|err| err.to_string())?;
    let after = ConfigDocument::parse(&staged_document(&temp)?).map_err(|err| err.to_string())?;
    if after.raw_section("OtherComponent") != before.raw_section("OtherComponent") {
        return Err("other component section changed".to_string());
    }
    assert_errors(&run_checks(&contract), contract.name())
}

#[test]
fn application_document_overrides_fixture() -> TestResult {
    let (temp, contract) = staged()?;
    let app = temp.path().join(APPLICATION_DIR);
    fs::create_dir_all(&app).map_err(|err| err.to_string())?;
    fs::write(app.join(CONFIG_DOCUMENT_NAME), "[Unrelated]\nName = \"x\"\n")
        .map_err(|err| err.to_string())?;
    let report = run_checks(&contract);
    let missing = report
        .iter()
        .filter(|failure| matches!(failure, ValidationFailure::MissingKey { .. }))
        .count();
    if missing != contract.required_configs().len() {
        return Err("application document without a section should fail every key".to_string());
    }
    Ok(())
}

#[test]
fn failures_format_into_one_block() -> TestResult {
    let (temp, contract) = staged()?;
    let path = temp.path().join(FIXTURE_DIR).join(CONFIG_DOCUMENT_NAME);
    let text = staged_document(&temp)?.replace("TestInt = 42", "TestInt = \"42\"");
    fs::write(&path, text).map_err(|err| err.to_string())?;
    let report = run_checks(&contract);
    let expected = ValidationFailure::WrongKind {
        key: "TestInt".to_string(),
        expected: ValueKind::Integer,
        actual: ValueKind::Text,
    };
    if report.failures() != std::slice::from_ref(&expected) {
        return Err(format!("expected a single kind failure, got {}", report.len()));
    }
    let block = format_errors(&report, MODEL_NAME).ok_or_else(|| "block expected".to_string())?;
    if !block.contains(MODEL_NAME) || !block.contains(&expected.to_string()) {
        return Err("block should name the model and the failure".to_string());
    }
    Ok(())
}

#[test]
fn bundled_resources_are_intact() -> TestResult {
    let text = fs::read_to_string(resources_dir().join(CONFIG_DOCUMENT_NAME))
        .map_err(|err| err.to_string())?;
    let document = ConfigDocument::parse(&text).map_err(|err| err.to_string())?;
    if document.raw_section(MODEL_NAME).is_none() || document.raw_section("OtherComponent").is_none()
    {
        return Err("fixture document should hold both sections".to_string());
    }
    Ok(())
}
