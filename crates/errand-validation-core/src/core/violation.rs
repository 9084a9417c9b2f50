// crates/errand-validation-core/src/core/violation.rs
// ============================================================================
// Module: Constraint Violations
// Description: Field-level violation records and per-call violation reporting.
// Purpose: Let a single validation call emit zero, one, or many templated violations.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A validator reports into a [`ConstraintReport`] bound to one field. The
//! report carries a default message template that is emitted when the
//! validator returns `false` without reporting anything itself. Validators
//! that produce their own messages call
//! [`ConstraintReport::disable_default_violation`] first and then
//! [`ConstraintReport::add_violation`] once per detected problem.
//! [`ViolationReport`] aggregates the outcome of every validator run against
//! one object.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Message Catalog
// ============================================================================

/// Fixed, user-facing violation messages.
pub mod messages {
    /// Classification object missing in create mode.
    pub const CLASSIFICATION_REQUIRED: &str = "classification is required";
    /// Classification category missing or blank.
    pub const CATEGORY_REQUIRED: &str = "category is required";
    /// Classification category not present in metadata.
    pub const CATEGORY_INVALID: &str = "category is not valid";
    /// Classification type missing or blank.
    pub const TYPE_REQUIRED: &str = "type is required";
    /// Classification type not present in metadata for the category.
    pub const TYPE_INVALID: &str = "type is not valid";
    /// Tag not present in its allow-list.
    pub const TAG_INVALID: &str = "must be a valid tag";
    /// Role not present in metadata.
    pub const ROLE_INVALID: &str = "must be a valid role";
    /// Status not present in metadata.
    pub const STATUS_INVALID: &str = "must be a valid status";
    /// Category tag not present in metadata.
    pub const CATEGORY_TAG_INVALID: &str = "must be a valid category";
    /// Contact reason not present in metadata.
    pub const CONTACT_REASON_INVALID: &str = "must be a valid contact reason";
    /// Required tag value missing or blank.
    pub const VALUE_REQUIRED: &str = "must not be blank";
    /// Sibling labels share a classification and name.
    pub const LABELS_NOT_UNIQUE: &str =
        "labels must have unique classification and name within the same level";
    /// Default template for the JSON parameter validator.
    pub const JSON_PARAMETERS_INVALID: &str = "json parameters are not valid";

    /// Message for one occurrence of a duplicated JSON parameter key.
    #[must_use]
    pub fn duplicate_key(key: &str) -> String {
        format!("duplicate key '{key}'")
    }

    /// Message for a schema rejection without a detail message.
    #[must_use]
    pub fn schema_validation_failed(schema_id: &str) -> String {
        format!("validation failed for schema '{schema_id}'")
    }

    /// Message for a schema check that could not be performed.
    #[must_use]
    pub fn schema_unavailable(schema_id: &str) -> String {
        format!(
            "validation could not be performed for schema '{schema_id}', the JsonSchema service \
             may be experiencing issues"
        )
    }
}

// ============================================================================
// SECTION: Violations
// ============================================================================

/// Field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Violation {
    /// Property path of the offending value.
    pub field: String,
    /// User-facing message.
    pub message: String,
}

impl Violation {
    /// Creates a violation.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Violation collector for one validation call on one field.
///
/// # Invariants
/// - The default template is emitted at most once, and only when the call
///   was invalid, the default was not disabled, and nothing else was reported.
#[derive(Debug, Clone)]
pub struct ConstraintReport {
    /// Property path violations are attached to.
    field: String,
    /// Message emitted when the validator reports nothing itself.
    default_template: String,
    /// Whether the default violation is suppressed.
    default_disabled: bool,
    /// Violations reported so far.
    violations: Vec<Violation>,
}

impl ConstraintReport {
    /// Creates a report for `field` with the given default template.
    #[must_use]
    pub fn new(field: impl Into<String>, default_template: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            default_template: default_template.into(),
            default_disabled: false,
            violations: Vec::new(),
        }
    }

    /// Returns the property path of the report.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Suppresses the default violation.
    pub const fn disable_default_violation(&mut self) {
        self.default_disabled = true;
    }

    /// Reports a violation on the report's field.
    pub fn add_violation(&mut self, template: impl Into<String>) {
        let violation = Violation::new(self.field.clone(), template);
        self.violations.push(violation);
    }

    /// Reports a violation on a nested property path.
    pub fn add_violation_at(&mut self, field: impl Into<String>, template: impl Into<String>) {
        self.violations.push(Violation::new(field, template));
    }

    /// Returns the violations reported so far.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Closes the report for a call that returned `valid`.
    #[must_use]
    pub fn finish(mut self, valid: bool) -> Vec<Violation> {
        if !valid && !self.default_disabled && self.violations.is_empty() {
            let violation = Violation::new(self.field, self.default_template);
            self.violations.push(violation);
        }
        self.violations
    }
}

/// Aggregated violations for one validated object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationReport {
    /// Violations in the order validators reported them.
    violations: Vec<Violation>,
}

impl ViolationReport {
    /// Creates an empty report.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            violations: Vec::new(),
        }
    }

    /// Merges the outcome of one validation call.
    pub fn record(&mut self, report: ConstraintReport, valid: bool) {
        self.violations.extend(report.finish(valid));
    }

    /// Returns true when no violations were recorded.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns the recorded violations.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Consumes the report and returns its violations.
    #[must_use]
    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}
