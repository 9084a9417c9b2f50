// crates/errand-validation-core/src/core/mod.rs
// ============================================================================
// Module: Errand Validation Core Types
// Description: Identifiers, request context, model, and violation types.
// Purpose: Group the value types shared by validators and gateways.
// Dependencies: crate::core::*
// ============================================================================

//! ## Overview
//! Core types are plain data: they carry no gateway handles and perform no
//! I/O. Context resolution is the only fallible operation defined here.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod context;
pub mod errand;
pub mod identifiers;
pub mod model;
pub mod violation;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use context::AmbientRequest;
pub use context::ContextError;
pub use context::ContextSource;
pub use context::MUNICIPALITY_ID_VARIABLE;
pub use context::NAMESPACE_VARIABLE;
pub use context::RequestAttributes;
pub use context::RequestContext;
pub use context::RequestContextReader;
pub use context::URI_TEMPLATE_VARIABLES_KEY;
pub use errand::ErrandDraft;
pub use errand::Stakeholder;
pub use errand::ValidationMode;
pub use identifiers::MunicipalityId;
pub use identifiers::Namespace;
pub use identifiers::SchemaId;
pub use model::Classification;
pub use model::ContactReasonEntry;
pub use model::EntityType;
pub use model::JsonParameter;
pub use model::Label;
pub use model::MetadataEntry;
pub use model::TagKind;
pub use model::ValidationEnforcementFlag;
pub use violation::ConstraintReport;
pub use violation::Violation;
pub use violation::ViolationReport;
pub use violation::messages;
