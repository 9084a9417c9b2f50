//! Validator property-based tests.
//!
//! ## Purpose
//! These tests generate label forests, parameter lists, and candidate
//! spellings to pin the structural invariants of the validators.
//!
//! ## What is covered
//! - Label forests are invalid exactly when some sibling list collides.
//! - Each duplicate parameter occurrence yields one violation, and every
//!   unique key reaches the schema gateway exactly once.
//! - Allow-list membership ignores case.
// crates/errand-validation-core/tests/proptest_validators.rs
// ============================================================================
// Module: Validator Property-Based Tests
// Description: Generated-input checks for label, parameter, and tag validators.
// Purpose: Ensure structural invariants hold for arbitrary inputs.
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
    reason = "Test-only assertions and helpers are permitted."
)]

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use errand_validation_core::ConstraintReport;
use errand_validation_core::EntityType;
use errand_validation_core::InMemoryJsonSchemaGateway;
use errand_validation_core::JsonParameter;
use errand_validation_core::JsonParameterValidator;
use errand_validation_core::Label;
use errand_validation_core::LabelTreeValidator;
use errand_validation_core::ScopeMetadata;
use errand_validation_core::TagValidator;
use errand_validation_core::messages;
use proptest::prelude::*;
use serde_json::json;

mod common;
use crate::common::metadata_with;
use crate::common::scope;
use crate::common::shared_metadata;
use crate::common::shared_schemas;

// ============================================================================
// SECTION: Strategies
// ============================================================================

/// Generates label forests over a small alphabet so collisions are common.
fn forest() -> impl Strategy<Value = Vec<Label>> {
    let leaf = ("[ab]", "[xy]").prop_map(|(classification, name)| Label::new(classification, name));
    let tree = leaf.prop_recursive(4, 32, 3, |inner| {
        (("[ab]", "[xy]"), prop::collection::vec(inner, 0..3)).prop_map(
            |((classification, name), labels)| Label::new(classification, name).with_labels(labels),
        )
    });
    prop::collection::vec(tree, 0..4)
}

/// Returns true when any sibling list in the forest holds a duplicate pair.
fn has_collision(siblings: &[Label]) -> bool {
    let pairs: BTreeSet<(&str, &str)> = siblings
        .iter()
        .map(|label| (label.classification.as_str(), label.name.as_str()))
        .collect();
    pairs.len() != siblings.len()
        || siblings.iter().any(|label| has_collision(&label.labels))
}

// ============================================================================
// SECTION: Properties
// ============================================================================

proptest! {
    #[test]
    fn label_forest_invalid_iff_siblings_collide(forest in forest()) {
        let mut report = ConstraintReport::new("labels", messages::LABELS_NOT_UNIQUE);
        let valid = LabelTreeValidator::new().is_valid(Some(forest.as_slice()), &mut report);
        prop_assert_eq!(valid, !has_collision(&forest));
    }

    #[test]
    fn duplicate_occurrences_each_reported(keys in prop::collection::vec("[a-d]", 0..12)) {
        let gateway = InMemoryJsonSchemaGateway::new();
        let validator = JsonParameterValidator::new(shared_schemas(&gateway));
        let parameters: Vec<JsonParameter> = keys
            .iter()
            .map(|key| JsonParameter::new(key.clone(), format!("schema-{key}"), json!({})))
            .collect();
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for key in &keys {
            *counts.entry(key.as_str()).or_default() += 1;
        }
        let duplicates: usize = counts.values().filter(|count| **count > 1).sum();
        let unique = counts.values().filter(|count| **count == 1).count();

        let mut report = ConstraintReport::new("jsonParameters", messages::JSON_PARAMETERS_INVALID);
        let valid = validator.is_valid(Some(parameters.as_slice()), &scope(), &mut report).unwrap();
        prop_assert_eq!(report.violations().len(), duplicates);
        prop_assert_eq!(valid, duplicates == 0);
        prop_assert_eq!(gateway.calls().len(), unique);
    }

    #[test]
    fn membership_ignores_case(role in "[a-z]{1,8}-[0-9]", upper in any::<bool>()) {
        let stored = role.to_uppercase();
        let metadata = metadata_with(
            ScopeMetadata::new().with_roles(&[stored.as_str()]).validated(EntityType::Role),
        );
        let validator = TagValidator::roles(shared_metadata(&metadata));
        let candidate = if upper { stored.clone() } else { role.clone() };
        let mut report = ConstraintReport::new("role", validator.message().to_string());
        prop_assert!(validator.is_valid(Some(candidate.as_str()), &scope(), &mut report).unwrap());
    }
}
