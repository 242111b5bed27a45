// crates/idscan-component-tests/src/format.rs
// ============================================================================
// Module: Failure Formatting
// Description: Human-readable failure blocks for test output.
// Purpose: Render a report as one bannered block per component.
// Dependencies: idscan-core
// ============================================================================

//! ## Overview
//! A failed check renders as a block framed by `#` banners, one bulleted
//! paragraph per failure. An empty report renders as nothing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use idscan_core::ValidationReport;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Width of the top and bottom banners.
pub const BANNER_WIDTH: usize = 100;
/// Separator placed before each failure.
const BULLET: &str = "\n\n -> ";
/// Indent for continuation lines inside a failure.
const CONTINUATION: &str = "\n    ";

// ============================================================================
// SECTION: Formatting
// ============================================================================

/// Formats a report as a bannered block, or `None` when it is empty.
#[must_use]
pub fn format_errors(report: &ValidationReport, name: &str) -> Option<String> {
    if report.is_empty() {
        return None;
    }
    let mut top = format!("## {name} Errors: ");
    let padding = BANNER_WIDTH.saturating_sub(top.chars().count());
    top.push_str(&"#".repeat(padding));
    let bottom = "#".repeat(BANNER_WIDTH);
    let body = report
        .iter()
        .map(|failure| failure.to_string().replace('\n', CONTINUATION))
        .collect::<Vec<_>>()
        .join(BULLET);
    Some(format!("\n\n\n{top}{BULLET}{body}\n\n{bottom}\n\n\n"))
}

/// Fails with the formatted block when the report is non-empty.
///
/// # Errors
///
/// Returns the formatted failure block when `report` has failures.
pub fn assert_errors(report: &ValidationReport, name: &str) -> Result<(), String> {
    format_errors(report, name).map_or(Ok(()), Err)
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

    use idscan_core::ValidationFailure;

    use super::*;

    #[test]
    fn empty_report_formats_to_nothing() {
        assert_eq!(format_errors(&ValidationReport::new(), "Scanner"), None);
        assert_eq!(assert_errors(&ValidationReport::new(), "Scanner"), Ok(()));
    }

    #[test]
    fn banners_are_padded_to_fixed_width() {
        let report = ValidationReport::single(ValidationFailure::SelfTest("boom".to_string()));
        let block = format_errors(&report, "Scanner").unwrap();
        let lines: Vec<&str> = block.lines().filter(|line| line.starts_with('#')).collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("## Scanner Errors: #"));
        assert_eq!(lines[0].chars().count(), BANNER_WIDTH);
        assert_eq!(lines[1], "#".repeat(BANNER_WIDTH));
    }

    #[test]
    fn long_names_are_not_padded() {
        let name = "N".repeat(BANNER_WIDTH);
        let report = ValidationReport::single(ValidationFailure::SelfTest("boom".to_string()));
        let block = format_errors(&report, &name).unwrap();
        assert!(block.contains(&format!("## {name} Errors: \n")));
    }

    #[test]
    fn failures_are_bulleted_and_continuations_indented() {
        let report: ValidationReport = vec![
            ValidationFailure::SelfTest("first".to_string()),
            ValidationFailure::SelfTest("second\nline".to_string()),
        ]
        .into();
        let block = format_errors(&report, "Scanner").unwrap();
        assert!(block.starts_with("\n\n\n## Scanner Errors: "));
        assert!(block.contains("\n\n -> first\n\n -> second\n    line\n\n#"));
        assert!(block.ends_with(&format!("{}\n\n\n", "#".repeat(BANNER_WIDTH))));
    }

    #[test]
    fn assert_errors_returns_the_block() {
        let report = ValidationReport::single(ValidationFailure::MissingKey {
            key: "BaseURL".to_string(),
        });
        let err = assert_errors(&report, "Scanner").unwrap_err();
        assert_eq!(Some(err), format_errors(&report, "Scanner"));
    }
}
