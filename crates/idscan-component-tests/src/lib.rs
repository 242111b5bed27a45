// crates/idscan-component-tests/src/lib.rs
// ============================================================================
// Module: IDScan Component Tests
// Description: Shared verification harness for IDScan components.
// Purpose: Run the composed component checks and format their failures.
// Dependencies: idscan-core, toml
// ============================================================================

//! ## Overview
//! Every component's test suite plugs into this harness. A component
//! implements [`ComponentTest`] on top of [`idscan_core::Component`], registers
//! itself, and hands the contract to [`run_checks`]. The composed pass checks
//! version formats, then required config completeness and kinds, then the
//! component's own self-test, concatenating every failure.
//!
//! [`assert_errors`] turns a non-empty report into the formatted block a test
//! returns as its error.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod checks;
pub mod format;
pub mod guards;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use checks::ComponentTest;
pub use checks::check_required_configs;
pub use checks::check_versions;
pub use checks::run_checks;
pub use format::BANNER_WIDTH;
pub use format::assert_errors;
pub use format::format_errors;
pub use guards::check_mutation_guards;
