// crates/errand-validation-core/tests/json_parameter_validator.rs
// ============================================================================
// Module: JSON Parameter Validator Tests
// Description: Duplicate detection and schema gateway failure mapping.
// Purpose: Pin aggregation, per-occurrence duplicates, and fail-closed messages.
// Dependencies: errand-validation-core, serde_json
// ============================================================================

//! ## Overview
//! JSON parameter validation never short-circuits: duplicates and schema
//! failures are reported together, and gateway failures become violations.

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
use errand_validation_core::ConstraintReport;
use errand_validation_core::InMemoryJsonSchemaGateway;
use errand_validation_core::JsonParameter;
use errand_validation_core::JsonParameterValidator;
use errand_validation_core::JsonSchemaError;
use errand_validation_core::MunicipalityId;
use errand_validation_core::ValidationError;
use errand_validation_core::Violation;
use errand_validation_core::messages;
use serde_json::json;

use crate::common::MUNICIPALITY_ID;
use crate::common::scope;
use crate::common::shared_schemas;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates parameters and returns the outcome with its violations.
fn check(
    gateway: &InMemoryJsonSchemaGateway,
    parameters: Option<&[JsonParameter]>,
) -> (bool, Vec<Violation>) {
    let validator = JsonParameterValidator::new(shared_schemas(gateway));
    let mut report = ConstraintReport::new("jsonParameters", messages::JSON_PARAMETERS_INVALID);
    let valid = validator.is_valid(parameters, &scope(), &mut report).unwrap();
    (valid, report.finish(valid))
}

/// Builds a parameter with an empty object value.
fn parameter(key: &str, schema_id: &str) -> JsonParameter {
    JsonParameter::new(key, schema_id, json!({}))
}

/// Returns the schema identifiers sent to the gateway, in order.
fn sent_schemas(gateway: &InMemoryJsonSchemaGateway) -> Vec<String> {
    gateway.calls().into_iter().map(|call| call.schema_id.as_str().to_string()).collect()
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn null_and_empty_lists_are_valid_without_context() {
    let gateway = InMemoryJsonSchemaGateway::new();
    let validator = JsonParameterValidator::new(shared_schemas(&gateway));
    let detached = AmbientRequest::detached();
    let mut report = ConstraintReport::new("jsonParameters", messages::JSON_PARAMETERS_INVALID);
    assert!(validator.is_valid(None, &detached, &mut report).unwrap());
    assert!(validator.is_valid(Some(&[][..]), &detached, &mut report).unwrap());
    assert!(gateway.calls().is_empty());
}

#[test]
fn duplicates_are_reported_per_occurrence() {
    let gateway = InMemoryJsonSchemaGateway::new();
    let parameters = vec![parameter("k1", "s1"), parameter("k2", "s2"), parameter("k1", "s3")];
    let (valid, violations) = check(&gateway, Some(parameters.as_slice()));
    assert!(!valid);
    assert_eq!(violations, vec![
        Violation::new("jsonParameters[0]", "duplicate key 'k1'"),
        Violation::new("jsonParameters[2]", "duplicate key 'k1'"),
    ]);
    assert_eq!(sent_schemas(&gateway), vec!["s2".to_string()]);
}

#[test]
fn only_duplicates_need_no_context() {
    let gateway = InMemoryJsonSchemaGateway::new();
    let validator = JsonParameterValidator::new(shared_schemas(&gateway));
    let parameters = vec![parameter("k1", "s1"), parameter("k1", "s2")];
    let mut report = ConstraintReport::new("jsonParameters", messages::JSON_PARAMETERS_INVALID);
    let valid = validator
        .is_valid(Some(parameters.as_slice()), &AmbientRequest::detached(), &mut report)
        .unwrap();
    assert!(!valid);
    assert_eq!(report.violations().len(), 2);
}

#[test]
fn valid_parameters_are_sent_once_with_scope() {
    let gateway = InMemoryJsonSchemaGateway::new();
    let parameters = vec![
        JsonParameter::new("k1", "s1", json!({"a": 1})),
        JsonParameter::new("k2", "s2", json!([1, 2])),
    ];
    assert_eq!(check(&gateway, Some(parameters.as_slice())), (true, Vec::new()));
    let calls = gateway.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].municipality_id, MunicipalityId::from(MUNICIPALITY_ID));
    assert_eq!(calls[0].value, json!({"a": 1}));
    assert_eq!(calls[1].value, json!([1, 2]));
}

#[test]
fn client_detail_is_reported_verbatim() {
    let gateway = InMemoryJsonSchemaGateway::new().with_failure("s1", JsonSchemaError::Client {
        status: 400,
        detail: Some("$.a: must be a string".to_string()),
    });
    let parameters = vec![parameter("k1", "s1")];
    let (valid, violations) = check(&gateway, Some(parameters.as_slice()));
    assert!(!valid);
    assert_eq!(violations, vec![Violation::new("jsonParameters[0]", "$.a: must be a string")]);
}

#[test]
fn client_failure_without_detail_uses_generic_message() {
    let gateway = InMemoryJsonSchemaGateway::new().with_failure("s1", JsonSchemaError::Client {
        status: 400,
        detail: Some("  ".to_string()),
    });
    let parameters = vec![parameter("k1", "s1")];
    let (_, violations) = check(&gateway, Some(parameters.as_slice()));
    assert_eq!(violations, vec![Violation::new(
        "jsonParameters[0]",
        "validation failed for schema 's1'"
    )]);
}

#[test]
fn server_and_transport_failures_fail_closed() {
    let gateway = InMemoryJsonSchemaGateway::new()
        .with_failure("s1", JsonSchemaError::Server {
            status: 503,
            message: "unavailable".to_string(),
        })
        .with_failure("s2", JsonSchemaError::Transport("connection refused".to_string()));
    let parameters = vec![parameter("k1", "s1"), parameter("k2", "s2")];
    let (valid, violations) = check(&gateway, Some(parameters.as_slice()));
    assert!(!valid);
    assert_eq!(violations, vec![
        Violation::new(
            "jsonParameters[0]",
            "validation could not be performed for schema 's1', the JsonSchema service may be \
             experiencing issues"
        ),
        Violation::new(
            "jsonParameters[1]",
            "validation could not be performed for schema 's2', the JsonSchema service may be \
             experiencing issues"
        ),
    ]);
}

#[test]
fn sibling_failures_do_not_skip_gateway_calls() {
    let gateway = InMemoryJsonSchemaGateway::new().with_failure("s1", JsonSchemaError::Client {
        status: 400,
        detail: None,
    });
    let parameters = vec![
        parameter("k1", "s1"),
        parameter("dup", "s9"),
        parameter("k2", "s2"),
        parameter("dup", "s9"),
        parameter("k3", "s3"),
    ];
    let (valid, violations) = check(&gateway, Some(parameters.as_slice()));
    assert!(!valid);
    assert_eq!(violations.len(), 3);
    assert_eq!(sent_schemas(&gateway), vec!["s1", "s2", "s3"]);
}

#[test]
fn unreadable_context_is_an_error_when_schemas_are_needed() {
    let gateway = InMemoryJsonSchemaGateway::new();
    let validator = JsonParameterValidator::new(shared_schemas(&gateway));
    let parameters = vec![parameter("k1", "s1")];
    let mut report = ConstraintReport::new("jsonParameters", messages::JSON_PARAMETERS_INVALID);
    let err = validator
        .is_valid(Some(parameters.as_slice()), &AmbientRequest::detached(), &mut report)
        .unwrap_err();
    assert!(matches!(err, ValidationError::Context(_)));
    assert!(gateway.calls().is_empty());
}
