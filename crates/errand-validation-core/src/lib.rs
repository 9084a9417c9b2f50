// crates/errand-validation-core/src/lib.rs
// ============================================================================
// Module: Errand Validation Core Library
// Description: Public API surface for errand payload validation.
// Purpose: Expose core types, gateway interfaces, validators, and audit sinks.
// Dependencies: crate::{audit, core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Errand validation checks inbound errand payloads against reference data
//! scoped by the request's namespace and municipality. Validators report
//! field-level violations; only unreadable request context and failing
//! metadata or tag lookups abort a validation call.
//! Invariants:
//! - Every metadata lookup is scoped by the resolved [`RequestContext`].
//! - JSON parameter values that cannot be confirmed valid are reported invalid.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use audit::FileValidationAuditSink;
pub use audit::NoopValidationAuditSink;
pub use audit::StderrValidationAuditSink;
pub use audit::ValidationAuditEvent;
pub use audit::ValidationAuditEventParams;
pub use audit::ValidationAuditSink;
pub use audit::ValidationOutcome;
pub use interfaces::GatewayError;
pub use interfaces::JsonSchemaError;
pub use interfaces::JsonSchemaGateway;
pub use interfaces::MetadataGateway;
pub use interfaces::TagGateway;
pub use runtime::ClassificationValidator;
pub use runtime::ErrandGateways;
pub use runtime::ErrandSubmission;
pub use runtime::ErrandValidators;
pub use runtime::InMemoryJsonSchemaGateway;
pub use runtime::InMemoryMetadataGateway;
pub use runtime::InMemoryTagGateway;
pub use runtime::JsonParameterValidator;
pub use runtime::LabelTreeValidator;
pub use runtime::NullPolicy;
pub use runtime::ScopeMetadata;
pub use runtime::SharedJsonSchemaGateway;
pub use runtime::SharedMetadataGateway;
pub use runtime::SharedTagGateway;
pub use runtime::TagValidator;
pub use runtime::Validate;
pub use runtime::ValidationError;

#[cfg(test)]
mod tests;
