// crates/errand-validation-core/src/tests.rs
// ============================================================================
// Module: Errand Validation Core Unit Tests
// Description: Unit tests for membership helpers and constraint reporting.
// Purpose: Pin the primitives every validator builds on.
// Dependencies: errand-validation-core
// ============================================================================

//! ## Overview
//! Exercises case-insensitive membership, blank detection, and the default
//! violation rules of [`crate::core::ConstraintReport`].

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::ConstraintReport;
use crate::core::Violation;
use crate::core::ViolationReport;
use crate::runtime::membership::contains_ignore_case;
use crate::runtime::membership::find_ignore_case;
use crate::runtime::membership::non_blank;
use crate::runtime::membership::reject;

// ============================================================================
// SECTION: Membership
// ============================================================================

#[test]
fn membership_ignores_case() {
    let allowed = ["ROLE-1", "Applicant"];
    assert!(contains_ignore_case("role-1", allowed));
    assert!(contains_ignore_case("APPLICANT", allowed));
    assert!(!contains_ignore_case("role-2", allowed));
}

#[test]
fn membership_folds_each_character() {
    assert!(contains_ignore_case("οσ", ["ΟΣ"]));
    assert!(contains_ignore_case("ος", ["ΟΣ"]));
    assert!(contains_ignore_case("ΟΣ", ["ος"]));
    assert!(!contains_ignore_case("οσα", ["ΟΣ"]));
}

#[test]
fn membership_returns_allow_list_spelling() {
    let allowed = ["Category-A", "Category-B"];
    assert_eq!(find_ignore_case("category-b", allowed), Some("Category-B"));
    assert_eq!(find_ignore_case("category-c", allowed), None);
}

#[test]
fn whitespace_only_values_are_blank() {
    assert_eq!(non_blank(None), None);
    assert_eq!(non_blank(Some("")), None);
    assert_eq!(non_blank(Some(" \t\n")), None);
    assert_eq!(non_blank(Some(" x ")), Some(" x "));
}

// ============================================================================
// SECTION: Constraint Reports
// ============================================================================

#[test]
fn default_violation_emitted_only_when_invalid_and_silent() {
    let report = ConstraintReport::new("labels", "default message");
    assert_eq!(report.finish(false), vec![Violation::new("labels", "default message")]);

    let report = ConstraintReport::new("labels", "default message");
    assert!(report.finish(true).is_empty());
}

#[test]
fn reported_violation_replaces_default() {
    let mut report = ConstraintReport::new("status", "default message");
    assert!(!reject(&mut report, "must be a valid status"));
    assert_eq!(report.finish(false), vec![Violation::new("status", "must be a valid status")]);
}

#[test]
fn disabled_default_yields_no_violation() {
    let mut report = ConstraintReport::new("jsonParameters", "default message");
    report.disable_default_violation();
    assert!(report.finish(false).is_empty());
}

#[test]
fn nested_paths_are_preserved() {
    let mut report = ConstraintReport::new("stakeholders", "default message");
    report.add_violation_at("stakeholders[1].role", "must be a valid role");
    let mut aggregate = ViolationReport::new();
    aggregate.record(report, false);
    assert!(!aggregate.is_valid());
    assert_eq!(aggregate.violations()[0].field, "stakeholders[1].role");
}
