// crates/errand-validation-core/src/runtime/mod.rs
// ============================================================================
// Module: Errand Validation Runtime
// Description: Validator implementations and in-memory gateways.
// Purpose: Evaluate submitted errand values against scoped reference data.
// Dependencies: crate::{audit, core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime modules implement the validator family. Validators hold shared
//! gateway handles and are safe to use from concurrent requests; per-call
//! state lives in the [`crate::core::ConstraintReport`] passed to each call.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use crate::interfaces::JsonSchemaGateway;
use crate::interfaces::MetadataGateway;
use crate::interfaces::TagGateway;

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod classification;
pub mod json_parameter;
pub mod label_tree;
pub mod membership;
pub mod memory;
pub mod tag;
pub mod validators;

// ============================================================================
// SECTION: Shared Gateways
// ============================================================================

/// Metadata gateway shared across validators and threads.
pub type SharedMetadataGateway = Arc<dyn MetadataGateway + Send + Sync>;
/// Tag gateway shared across validators and threads.
pub type SharedTagGateway = Arc<dyn TagGateway + Send + Sync>;
/// JSON-schema gateway shared across validators and threads.
pub type SharedJsonSchemaGateway = Arc<dyn JsonSchemaGateway + Send + Sync>;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use classification::ClassificationValidator;
pub use classification::NullPolicy;
pub use json_parameter::JsonParameterValidator;
pub use label_tree::LabelTreeValidator;
pub use memory::InMemoryJsonSchemaGateway;
pub use memory::InMemoryMetadataGateway;
pub use memory::InMemoryTagGateway;
pub use memory::JsonSchemaCall;
pub use memory::MetadataCall;
pub use memory::ScopeMetadata;
pub use memory::TagCall;
pub use tag::AllowList;
pub use tag::Enforcement;
pub use tag::Presence;
pub use tag::TYPE_TAG_PLACEHOLDER_CATEGORY;
pub use tag::TagValidator;
pub use validators::ErrandGateways;
pub use validators::ErrandSubmission;
pub use validators::ErrandValidators;
pub use validators::Validate;
pub use validators::ValidationError;
