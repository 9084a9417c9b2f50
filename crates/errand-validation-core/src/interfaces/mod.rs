// crates/errand-validation-core/src/interfaces/mod.rs
// ============================================================================
// Module: Errand Validation Interfaces
// Description: Backend-agnostic gateways for metadata, tags, and JSON schemas.
// Purpose: Define the contract surfaces validators query at validation time.
// Dependencies: crate::core, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Validators consult three external collaborators. Every call is
//! synchronous and blocking; validators impose no timeouts of their own and
//! rely on the gateway implementation's client configuration.
//!
//! Metadata and tag lookup failures are propagated to the caller as
//! [`GatewayError`]. JSON-schema failures carry a client/server
//! classification ([`JsonSchemaError`]) that the JSON parameter validator
//! downgrades into field violations.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use thiserror::Error;

use crate::core::identifiers::MunicipalityId;
use crate::core::identifiers::Namespace;
use crate::core::identifiers::SchemaId;
use crate::core::model::ContactReasonEntry;
use crate::core::model::EntityType;
use crate::core::model::MetadataEntry;

// ============================================================================
// SECTION: Gateway Errors
// ============================================================================

/// Metadata and tag gateway failures.
///
/// # Invariants
/// - Variants are stable for error classification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The backing service could not be reached or answered with a failure.
    #[error("gateway unavailable: {0}")]
    Unavailable(String),
    /// The backing service answered with a payload that could not be decoded.
    #[error("gateway returned invalid response: {0}")]
    InvalidResponse(String),
}

/// JSON-schema validation failures.
///
/// # Invariants
/// - `Client` failures mean the submitted value (or schema reference) was
///   rejected; every other variant means the check could not be performed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JsonSchemaError {
    /// The schema service rejected the value.
    #[error("json schema client error (status {status})")]
    Client {
        /// HTTP-like status code.
        status: u16,
        /// Optional human readable detail.
        detail: Option<String>,
    },
    /// The schema service failed while processing the request.
    #[error("json schema server error (status {status}): {message}")]
    Server {
        /// HTTP-like status code.
        status: u16,
        /// Failure description.
        message: String,
    },
    /// The schema service could not be reached.
    #[error("json schema transport error: {0}")]
    Transport(String),
}

impl JsonSchemaError {
    /// Returns true when the failure is client-classified.
    #[must_use]
    pub const fn is_client(&self) -> bool {
        matches!(self, Self::Client { .. })
    }

    /// Returns the non-blank detail message of a client failure.
    #[must_use]
    pub fn client_detail(&self) -> Option<&str> {
        match self {
            Self::Client {
                detail: Some(detail),
                ..
            } if !detail.trim().is_empty() => Some(detail.as_str()),
            _ => None,
        }
    }
}

// ============================================================================
// SECTION: Metadata Gateway
// ============================================================================

/// Namespace/municipality scoped reference data.
pub trait MetadataGateway {
    /// Lists valid errand categories.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when metadata cannot be fetched.
    fn find_categories(
        &self,
        namespace: &Namespace,
        municipality_id: &MunicipalityId,
    ) -> Result<Vec<MetadataEntry>, GatewayError>;

    /// Lists valid types for a category.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when metadata cannot be fetched.
    fn find_types(
        &self,
        namespace: &Namespace,
        municipality_id: &MunicipalityId,
        category: &str,
    ) -> Result<Vec<MetadataEntry>, GatewayError>;

    /// Lists valid stakeholder roles.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when metadata cannot be fetched.
    fn find_roles(
        &self,
        namespace: &Namespace,
        municipality_id: &MunicipalityId,
    ) -> Result<Vec<MetadataEntry>, GatewayError>;

    /// Lists valid errand statuses.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when metadata cannot be fetched.
    fn find_statuses(
        &self,
        namespace: &Namespace,
        municipality_id: &MunicipalityId,
    ) -> Result<Vec<MetadataEntry>, GatewayError>;

    /// Lists valid contact reasons.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when metadata cannot be fetched.
    fn find_contact_reasons(
        &self,
        namespace: &Namespace,
        municipality_id: &MunicipalityId,
    ) -> Result<Vec<ContactReasonEntry>, GatewayError>;

    /// Returns whether allow-list validation is enforced for an entity type.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when the flag cannot be fetched.
    fn is_validated(
        &self,
        namespace: &Namespace,
        municipality_id: &MunicipalityId,
        entity_type: EntityType,
    ) -> Result<bool, GatewayError>;
}

// ============================================================================
// SECTION: Tag Gateway
// ============================================================================

/// Tag service lookups.
pub trait TagGateway {
    /// Lists status tags for a scope.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when tags cannot be fetched.
    fn find_all_status_tags(
        &self,
        namespace: &Namespace,
        municipality_id: &MunicipalityId,
    ) -> Result<Vec<String>, GatewayError>;

    /// Lists type tags for a scope and category.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when tags cannot be fetched.
    fn find_all_type_tags(
        &self,
        namespace: &Namespace,
        municipality_id: &MunicipalityId,
        category: &str,
    ) -> Result<Vec<String>, GatewayError>;

    /// Lists client identifier tags; not scoped.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when tags cannot be fetched.
    fn find_all_client_id_tags(&self) -> Result<Vec<String>, GatewayError>;
}

// ============================================================================
// SECTION: JSON Schema Gateway
// ============================================================================

/// External JSON-schema validation service.
pub trait JsonSchemaGateway {
    /// Validates `value` against the schema identified by `schema_id`.
    ///
    /// # Errors
    ///
    /// Returns [`JsonSchemaError`] when the value is rejected or the check
    /// cannot be performed.
    fn validate_json(
        &self,
        municipality_id: &MunicipalityId,
        schema_id: &SchemaId,
        value: &Value,
    ) -> Result<(), JsonSchemaError>;
}
