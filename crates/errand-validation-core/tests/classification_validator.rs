// crates/errand-validation-core/tests/classification_validator.rs
// ============================================================================
// Module: Classification Validator Tests
// Description: Category and type checks against scoped metadata.
// Purpose: Pin check ordering, null policies, and single-violation reporting.
// Dependencies: errand-validation-core
// ============================================================================

//! ## Overview
//! Each failing step of classification validation must report exactly one
//! violation and skip every later step.

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

mod common;

use errand_validation_core::AmbientRequest;
use errand_validation_core::Classification;
use errand_validation_core::ClassificationValidator;
use errand_validation_core::ConstraintReport;
use errand_validation_core::EntityType;
use errand_validation_core::InMemoryMetadataGateway;
use errand_validation_core::NullPolicy;
use errand_validation_core::ScopeMetadata;
use errand_validation_core::ValidationError;
use errand_validation_core::Violation;
use errand_validation_core::messages;
use errand_validation_core::runtime::MetadataCall;

use crate::common::metadata_with;
use crate::common::scope;
use crate::common::shared_metadata;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns enforced metadata with one category and one type.
fn enforced_metadata() -> InMemoryMetadataGateway {
    metadata_with(
        ScopeMetadata::new()
            .with_categories(&["CATEGORY-1"])
            .with_types("CATEGORY-1", &["TYPE-1"])
            .validated(EntityType::Category),
    )
}

/// Returns a create-mode validator over [`enforced_metadata`].
fn enforced_validator() -> ClassificationValidator {
    ClassificationValidator::new(shared_metadata(&enforced_metadata()), NullPolicy::Reject)
}

/// Validates a classification and returns the outcome with its violations.
fn check(
    validator: &ClassificationValidator,
    classification: Option<&Classification>,
) -> (bool, Vec<Violation>) {
    let mut report = ConstraintReport::new("classification", messages::CLASSIFICATION_REQUIRED);
    let valid = validator.is_valid(classification, &scope(), &mut report).unwrap();
    (valid, report.finish(valid))
}

/// Builds a classification from optional parts.
fn classification(category: Option<&str>, kind: Option<&str>) -> Classification {
    Classification {
        category: category.map(str::to_string),
        kind: kind.map(str::to_string),
    }
}

/// Asserts a single violation with `message`.
fn assert_single(outcome: (bool, Vec<Violation>), message: &str) {
    assert!(!outcome.0);
    assert_eq!(outcome.1, vec![Violation::new("classification", message)]);
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn known_pair_is_valid() {
    let validator = enforced_validator();
    let value = Classification::new("CATEGORY-1", "TYPE-1");
    assert_eq!(check(&validator, Some(&value)), (true, Vec::new()));
}

#[test]
fn matching_ignores_case_and_uses_metadata_spelling() {
    let metadata = enforced_metadata();
    let validator = ClassificationValidator::new(shared_metadata(&metadata), NullPolicy::Reject);
    let value = Classification::new("category-1", "type-1");
    assert!(check(&validator, Some(&value)).0);
    assert!(metadata.calls().contains(&MetadataCall::Types("CATEGORY-1".to_string())));
}

#[test]
fn null_classification_follows_policy() {
    let metadata = enforced_metadata();
    let create = ClassificationValidator::new(shared_metadata(&metadata), NullPolicy::Reject);
    let update = ClassificationValidator::new(shared_metadata(&metadata), NullPolicy::Accept);
    assert_single(check(&create, None), "classification is required");
    assert_eq!(check(&update, None), (true, Vec::new()));
    assert_eq!(update.null_policy(), NullPolicy::Accept);
    assert!(metadata.calls().is_empty());
}

#[test]
fn null_classification_needs_no_context() {
    let validator =
        ClassificationValidator::new(shared_metadata(&enforced_metadata()), NullPolicy::Accept);
    let mut report = ConstraintReport::new("classification", messages::CLASSIFICATION_REQUIRED);
    assert!(validator.is_valid(None, &AmbientRequest::detached(), &mut report).unwrap());
}

#[test]
fn disabled_flag_accepts_anything() {
    let metadata = metadata_with(ScopeMetadata::new().with_categories(&["CATEGORY-1"]));
    let validator = ClassificationValidator::new(shared_metadata(&metadata), NullPolicy::Reject);
    let value = classification(None, Some("whatever"));
    assert!(check(&validator, Some(&value)).0);
    assert_eq!(metadata.calls(), vec![MetadataCall::Validated(EntityType::Category)]);
}

#[test]
fn blank_category_is_required() {
    let validator = enforced_validator();
    assert_single(
        check(&validator, Some(&classification(Some("  "), Some("TYPE-1")))),
        "category is required",
    );
    assert_single(check(&validator, Some(&classification(None, None))), "category is required");
}

#[test]
fn unknown_category_stops_before_type() {
    let metadata = enforced_metadata();
    let validator = ClassificationValidator::new(shared_metadata(&metadata), NullPolicy::Reject);
    assert_single(
        check(&validator, Some(&classification(Some("CATEGORY-2"), None))),
        "category is not valid",
    );
    assert!(!metadata.calls().iter().any(|call| matches!(call, MetadataCall::Types(_))));
}

#[test]
fn blank_type_is_required() {
    let validator = enforced_validator();
    assert_single(
        check(&validator, Some(&classification(Some("CATEGORY-1"), Some("")))),
        "type is required",
    );
}

#[test]
fn unknown_type_is_invalid() {
    let validator = enforced_validator();
    assert_single(
        check(&validator, Some(&Classification::new("CATEGORY-1", "TYPE-2"))),
        "type is not valid",
    );
}

#[test]
fn unreadable_context_is_an_error() {
    let validator = enforced_validator();
    let mut report = ConstraintReport::new("classification", messages::CLASSIFICATION_REQUIRED);
    let value = Classification::new("CATEGORY-1", "TYPE-1");
    let err =
        validator.is_valid(Some(&value), &AmbientRequest::detached(), &mut report).unwrap_err();
    assert!(matches!(err, ValidationError::Context(_)));
    assert_eq!(err.status(), 500);
}
