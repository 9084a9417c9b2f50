// crates/errand-validation-core/src/runtime/json_parameter.rs
// ============================================================================
// Module: JSON Parameter Validator
// Description: Duplicate-key detection and remote schema validation of parameters.
// Purpose: Aggregate every parameter problem of a request into field violations.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! The validator never stops at the first problem:
//! 1. Every occurrence of a key that appears more than once is reported.
//! 2. Every parameter with a unique key is sent to the schema gateway exactly
//!    once, in input order.
//!
//! Schema gateway failures are converted into violations and never
//! propagated. Client rejections surface their detail message (or a generic
//! schema message); any other failure is reported as "could not be
//! performed". A value that could not be confirmed valid is invalid.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::core::context::ContextSource;
use crate::core::identifiers::SchemaId;
use crate::core::model::JsonParameter;
use crate::core::violation::ConstraintReport;
use crate::core::violation::messages;
use crate::interfaces::JsonSchemaError;
use crate::runtime::SharedJsonSchemaGateway;
use crate::runtime::ValidationError;

// ============================================================================
// SECTION: Validator
// ============================================================================

/// Schema-backed JSON parameter list validator.
#[derive(Clone)]
pub struct JsonParameterValidator {
    /// Schema validation service.
    schemas: SharedJsonSchemaGateway,
}

impl JsonParameterValidator {
    /// Creates a JSON parameter validator.
    #[must_use]
    pub fn new(schemas: SharedJsonSchemaGateway) -> Self {
        Self {
            schemas,
        }
    }

    /// Validates an optional parameter list.
    ///
    /// Violations are attached to `<field>[<index>]` of the offending element.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] only when the request scope is unreadable;
    /// schema gateway failures become violations.
    pub fn is_valid(
        &self,
        parameters: Option<&[JsonParameter]>,
        scope: &dyn ContextSource,
        report: &mut ConstraintReport,
    ) -> Result<bool, ValidationError> {
        let Some(parameters) = parameters.filter(|parameters| !parameters.is_empty()) else {
            return Ok(true);
        };
        report.disable_default_violation();
        let field = report.field().to_string();

        let mut occurrences: BTreeMap<&str, usize> = BTreeMap::new();
        for parameter in parameters {
            *occurrences.entry(parameter.key.as_str()).or_default() += 1;
        }
        let is_duplicate = |parameter: &JsonParameter| {
            occurrences.get(parameter.key.as_str()).copied().unwrap_or_default() > 1
        };

        let mut valid = true;
        for (index, parameter) in parameters.iter().enumerate() {
            if is_duplicate(parameter) {
                report.add_violation_at(
                    format!("{field}[{index}]"),
                    messages::duplicate_key(&parameter.key),
                );
                valid = false;
            }
        }

        let unique: Vec<(usize, &JsonParameter)> = parameters
            .iter()
            .enumerate()
            .filter(|(_, parameter)| !is_duplicate(*parameter))
            .collect();
        if unique.is_empty() {
            return Ok(valid);
        }
        let context = scope.resolve()?;
        for (index, parameter) in unique {
            if let Err(error) = self.schemas.validate_json(
                &context.municipality_id,
                &parameter.schema_id,
                &parameter.value,
            ) {
                report.add_violation_at(
                    format!("{field}[{index}]"),
                    schema_failure_message(&error, &parameter.schema_id),
                );
                valid = false;
            }
        }
        Ok(valid)
    }
}

/// Maps a schema gateway failure to its violation message.
fn schema_failure_message(error: &JsonSchemaError, schema_id: &SchemaId) -> String {
    if let Some(detail) = error.client_detail() {
        return detail.to_string();
    }
    if error.is_client() {
        messages::schema_validation_failed(schema_id.as_str())
    } else {
        messages::schema_unavailable(schema_id.as_str())
    }
}
