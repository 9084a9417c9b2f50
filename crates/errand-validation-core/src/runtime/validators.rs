// crates/errand-validation-core/src/runtime/validators.rs
// ============================================================================
// Module: Errand Validators
// Description: Explicit validation entry point for parsed request objects.
// Purpose: Run the validator family against an object and collect violations.
// Dependencies: crate::audit, crate::core, crate::interfaces, thiserror
// ============================================================================

//! ## Overview
//! The request layer parses a payload, then calls
//! [`ErrandValidators::validate`] before dispatching to business logic.
//! Objects describe their own constraints through [`Validate`]; every
//! validator reports into the shared [`ViolationReport`], so data problems
//! accumulate across fields. Only unreadable request context and failing
//! metadata/tag lookups abort validation with a [`ValidationError`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use thiserror::Error;

use crate::audit::NoopValidationAuditSink;
use crate::audit::ValidationAuditEvent;
use crate::audit::ValidationAuditEventParams;
use crate::audit::ValidationAuditSink;
use crate::audit::ValidationOutcome;
use crate::core::context::ContextError;
use crate::core::context::ContextSource;
use crate::core::errand::ErrandDraft;
use crate::core::errand::ValidationMode;
use crate::core::violation::ConstraintReport;
use crate::core::violation::Violation;
use crate::core::violation::ViolationReport;
use crate::core::violation::messages;
use crate::interfaces::GatewayError;
use crate::runtime::SharedJsonSchemaGateway;
use crate::runtime::SharedMetadataGateway;
use crate::runtime::SharedTagGateway;
use crate::runtime::classification::ClassificationValidator;
use crate::runtime::classification::NullPolicy;
use crate::runtime::json_parameter::JsonParameterValidator;
use crate::runtime::label_tree::LabelTreeValidator;
use crate::runtime::tag::TagValidator;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// HTTP status for unreadable request context.
const STATUS_INTERNAL_SERVER_ERROR: u16 = 500;
/// HTTP status for failing upstream lookups.
const STATUS_BAD_GATEWAY: u16 = 502;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failures that abort validation instead of producing violations.
///
/// # Invariants
/// - Variants are stable for error classification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The request scope could not be read.
    #[error(transparent)]
    Context(#[from] ContextError),
    /// A metadata or tag lookup failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl ValidationError {
    /// Returns the HTTP status the calling layer should respond with.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::Context(_) => STATUS_INTERNAL_SERVER_ERROR,
            Self::Gateway(_) => STATUS_BAD_GATEWAY,
        }
    }

    /// Returns a stable label for the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Context(_) => "context_unreadable",
            Self::Gateway(_) => "gateway_unavailable",
        }
    }
}

// ============================================================================
// SECTION: Validate Trait
// ============================================================================

/// Object that knows which validators apply to its fields.
pub trait Validate {
    /// Returns the object name used in audit events.
    fn object_name(&self) -> &'static str {
        "object"
    }

    /// Runs the object's validators, recording violations into `report`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when validation cannot be performed.
    fn validate(
        &self,
        validators: &ErrandValidators,
        scope: &dyn ContextSource,
        report: &mut ViolationReport,
    ) -> Result<(), ValidationError>;
}

// ============================================================================
// SECTION: Validator Set
// ============================================================================

/// Gateways backing the validator family.
#[derive(Clone)]
pub struct ErrandGateways {
    /// Metadata lookups and enforcement flags.
    pub metadata: SharedMetadataGateway,
    /// Tag service lookups.
    pub tags: SharedTagGateway,
    /// JSON-schema validation service.
    pub json_schema: SharedJsonSchemaGateway,
}

/// Configured validator family for errand payloads.
#[derive(Clone)]
pub struct ErrandValidators {
    /// Classification validator for creates.
    classification_required: ClassificationValidator,
    /// Classification validator for updates.
    classification_optional: ClassificationValidator,
    /// Errand status validator.
    status: TagValidator,
    /// Contact reason validator.
    contact_reason: TagValidator,
    /// Stakeholder role validator.
    role: TagValidator,
    /// Category tag validator.
    category_tag: TagValidator,
    /// Status tag validator.
    status_tag: TagValidator,
    /// Type tag validator.
    type_tag: TagValidator,
    /// Client identifier tag validator.
    client_id_tag: TagValidator,
    /// Label forest validator.
    labels: LabelTreeValidator,
    /// JSON parameter validator.
    json_parameters: JsonParameterValidator,
    /// Audit sink receiving one event per validated object.
    audit: Arc<dyn ValidationAuditSink>,
}

impl ErrandValidators {
    /// Builds the validator family over the given gateways.
    #[must_use]
    pub fn new(gateways: ErrandGateways) -> Self {
        let ErrandGateways {
            metadata,
            tags,
            json_schema,
        } = gateways;
        Self {
            classification_required: ClassificationValidator::new(
                Arc::clone(&metadata),
                NullPolicy::Reject,
            ),
            classification_optional: ClassificationValidator::new(
                Arc::clone(&metadata),
                NullPolicy::Accept,
            ),
            status: TagValidator::statuses(Arc::clone(&metadata)),
            contact_reason: TagValidator::contact_reasons(Arc::clone(&metadata)),
            role: TagValidator::roles(Arc::clone(&metadata)),
            category_tag: TagValidator::category_tags(Arc::clone(&metadata)),
            status_tag: TagValidator::status_tags(Arc::clone(&tags), Arc::clone(&metadata)),
            type_tag: TagValidator::type_tags(Arc::clone(&tags), metadata),
            client_id_tag: TagValidator::client_id_tags(tags),
            labels: LabelTreeValidator::new(),
            json_parameters: JsonParameterValidator::new(json_schema),
            audit: Arc::new(NoopValidationAuditSink),
        }
    }

    /// Returns the validator set with an audit sink attached.
    #[must_use]
    pub fn with_audit_sink(mut self, audit: Arc<dyn ValidationAuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Returns the classification validator for a validation mode.
    #[must_use]
    pub const fn classification(&self, mode: ValidationMode) -> &ClassificationValidator {
        match mode {
            ValidationMode::Create => &self.classification_required,
            ValidationMode::Update => &self.classification_optional,
        }
    }

    /// Returns the errand status validator.
    #[must_use]
    pub const fn status(&self) -> &TagValidator {
        &self.status
    }

    /// Returns the contact reason validator.
    #[must_use]
    pub const fn contact_reason(&self) -> &TagValidator {
        &self.contact_reason
    }

    /// Returns the stakeholder role validator.
    #[must_use]
    pub const fn role(&self) -> &TagValidator {
        &self.role
    }

    /// Returns the category tag validator.
    #[must_use]
    pub const fn category_tag(&self) -> &TagValidator {
        &self.category_tag
    }

    /// Returns the status tag validator.
    #[must_use]
    pub const fn status_tag(&self) -> &TagValidator {
        &self.status_tag
    }

    /// Returns the type tag validator.
    #[must_use]
    pub const fn type_tag(&self) -> &TagValidator {
        &self.type_tag
    }

    /// Returns the client identifier tag validator.
    #[must_use]
    pub const fn client_id_tag(&self) -> &TagValidator {
        &self.client_id_tag
    }

    /// Returns the label forest validator.
    #[must_use]
    pub const fn labels(&self) -> &LabelTreeValidator {
        &self.labels
    }

    /// Returns the JSON parameter validator.
    #[must_use]
    pub const fn json_parameters(&self) -> &JsonParameterValidator {
        &self.json_parameters
    }

    /// Validates an object and returns its violations.
    ///
    /// An empty list means the object is valid.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when the request scope is unreadable or a
    /// metadata/tag lookup fails.
    pub fn validate<T: Validate + ?Sized>(
        &self,
        object: &T,
        scope: &dyn ContextSource,
    ) -> Result<Vec<Violation>, ValidationError> {
        let mut report = ViolationReport::new();
        let outcome = object.validate(self, scope, &mut report);
        let context = scope.resolve().ok();
        let (result, fields, error_kind) = match &outcome {
            Ok(()) => {
                let fields =
                    report.violations().iter().map(|violation| violation.field.clone()).collect();
                let result = if report.is_valid() {
                    ValidationOutcome::Valid
                } else {
                    ValidationOutcome::Invalid
                };
                (result, fields, None)
            }
            Err(error) => (ValidationOutcome::Error, Vec::new(), Some(error.kind())),
        };
        self.audit.record(&ValidationAuditEvent::new(ValidationAuditEventParams {
            namespace: context.as_ref().map(|context| context.namespace.to_string()),
            municipality_id: context.as_ref().map(|context| context.municipality_id.to_string()),
            object: object.object_name(),
            outcome: result,
            fields,
            error_kind,
        }));
        outcome?;
        Ok(report.into_violations())
    }
}

// ============================================================================
// SECTION: Errand Submission
// ============================================================================

/// Errand payload paired with the operation it is submitted for.
#[derive(Debug, Clone, Copy)]
pub struct ErrandSubmission<'a> {
    /// Operation mode.
    pub mode: ValidationMode,
    /// Submitted payload.
    pub draft: &'a ErrandDraft,
}

impl<'a> ErrandSubmission<'a> {
    /// Wraps a payload submitted for creation.
    #[must_use]
    pub const fn create(draft: &'a ErrandDraft) -> Self {
        Self {
            mode: ValidationMode::Create,
            draft,
        }
    }

    /// Wraps a payload submitted as an update.
    #[must_use]
    pub const fn update(draft: &'a ErrandDraft) -> Self {
        Self {
            mode: ValidationMode::Update,
            draft,
        }
    }
}

impl Validate for ErrandSubmission<'_> {
    fn object_name(&self) -> &'static str {
        "errand"
    }

    fn validate(
        &self,
        validators: &ErrandValidators,
        scope: &dyn ContextSource,
        report: &mut ViolationReport,
    ) -> Result<(), ValidationError> {
        let draft = self.draft;

        let mut constraint =
            ConstraintReport::new("classification", messages::CLASSIFICATION_REQUIRED);
        let valid = validators.classification(self.mode).is_valid(
            draft.classification.as_ref(),
            scope,
            &mut constraint,
        )?;
        report.record(constraint, valid);

        check_tag(validators.status(), "status", draft.status.as_deref(), scope, report)?;
        check_tag(
            validators.contact_reason(),
            "contactReason",
            draft.contact_reason.as_deref(),
            scope,
            report,
        )?;

        let mut constraint = ConstraintReport::new("labels", messages::LABELS_NOT_UNIQUE);
        let valid = validators.labels().is_valid(draft.labels.as_deref(), &mut constraint);
        report.record(constraint, valid);

        if let Some(stakeholders) = &draft.stakeholders {
            let mut constraint =
                ConstraintReport::new("stakeholders", validators.role().message().to_string());
            let valid = validators.role().validate_each(
                stakeholders.iter().map(|stakeholder| stakeholder.role.as_deref()),
                |index| format!("stakeholders[{index}].role"),
                scope,
                &mut constraint,
            )?;
            report.record(constraint, valid);
        }

        let mut constraint =
            ConstraintReport::new("jsonParameters", messages::JSON_PARAMETERS_INVALID);
        let valid = validators.json_parameters().is_valid(
            draft.json_parameters.as_deref(),
            scope,
            &mut constraint,
        )?;
        report.record(constraint, valid);

        let tag_lists = [
            (validators.status_tag(), "statusTags", draft.status_tags.as_deref()),
            (validators.type_tag(), "typeTags", draft.type_tags.as_deref()),
            (validators.client_id_tag(), "clientIdTags", draft.client_id_tags.as_deref()),
        ];
        for (validator, field, tags) in tag_lists {
            if let Some(tags) = tags {
                check_tag_list(validator, field, tags, scope, report)?;
            }
        }
        Ok(())
    }
}

impl Validate for ErrandDraft {
    fn object_name(&self) -> &'static str {
        "errand"
    }

    /// Validates the payload as submitted for creation.
    fn validate(
        &self,
        validators: &ErrandValidators,
        scope: &dyn ContextSource,
        report: &mut ViolationReport,
    ) -> Result<(), ValidationError> {
        ErrandSubmission::create(self).validate(validators, scope, report)
    }
}

/// Runs a tag validator on one field and records the outcome.
fn check_tag(
    validator: &TagValidator,
    field: &str,
    candidate: Option<&str>,
    scope: &dyn ContextSource,
    report: &mut ViolationReport,
) -> Result<(), ValidationError> {
    let mut constraint = ConstraintReport::new(field, validator.message().to_string());
    let valid = validator.is_valid(candidate, scope, &mut constraint)?;
    report.record(constraint, valid);
    Ok(())
}

/// Runs a tag validator over a tag list, reporting each element by index.
fn check_tag_list(
    validator: &TagValidator,
    field: &str,
    tags: &[String],
    scope: &dyn ContextSource,
    report: &mut ViolationReport,
) -> Result<(), ValidationError> {
    let mut constraint = ConstraintReport::new(field, validator.message().to_string());
    let valid = validator.validate_each(
        tags.iter().map(|tag| Some(tag.as_str())),
        |index| format!("{field}[{index}]"),
        scope,
        &mut constraint,
    )?;
    report.record(constraint, valid);
    Ok(())
}
