// crates/errand-validation-core/src/core/errand.rs
// ============================================================================
// Module: Errand Payloads
// Description: Inbound errand payload validated before business logic runs.
// Purpose: Carry the fields the validator family inspects.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! [`ErrandDraft`] is the parsed body of an errand create or update request.
//! Only the fields inspected by validators are modeled; everything else in
//! the payload is owned by the CRUD layer.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::model::Classification;
use crate::core::model::JsonParameter;
use crate::core::model::Label;

// ============================================================================
// SECTION: Payload Types
// ============================================================================

/// Operation the payload is submitted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Errand creation; classification is mandatory.
    #[default]
    Create,
    /// Partial update; an absent classification keeps the stored one.
    Update,
}

/// Errand create/update payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrandDraft {
    /// Errand classification.
    #[serde(default)]
    pub classification: Option<Classification>,
    /// Errand status.
    #[serde(default)]
    pub status: Option<String>,
    /// Reason the reporter made contact.
    #[serde(default)]
    pub contact_reason: Option<String>,
    /// Label forest attached to the errand.
    #[serde(default)]
    pub labels: Option<Vec<Label>>,
    /// Stakeholders attached to the errand.
    #[serde(default)]
    pub stakeholders: Option<Vec<Stakeholder>>,
    /// Schema-validated JSON parameters.
    #[serde(default)]
    pub json_parameters: Option<Vec<JsonParameter>>,
    /// Status tags managed by the tag service.
    #[serde(default)]
    pub status_tags: Option<Vec<String>>,
    /// Type tags managed by the tag service.
    #[serde(default)]
    pub type_tags: Option<Vec<String>>,
    /// Client identifier tags managed by the tag service.
    #[serde(default)]
    pub client_id_tags: Option<Vec<String>>,
}

/// Stakeholder reference with its role on the errand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stakeholder {
    /// Stakeholder identifier.
    #[serde(default)]
    pub external_id: Option<String>,
    /// Stakeholder role.
    #[serde(default)]
    pub role: Option<String>,
}
