// crates/errand-validation-core/src/core/model.rs
// ============================================================================
// Module: Errand Validation Model
// Description: Value types inspected by validators and returned by gateways.
// Purpose: Define classifications, label trees, JSON parameters, and tag kinds.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Validated values (classifications, labels, JSON parameters) mirror the
//! JSON payloads submitted by clients and therefore serialize with camelCase
//! field names. Metadata entries mirror what the metadata service returns.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::identifiers::MunicipalityId;
use crate::core::identifiers::Namespace;
use crate::core::identifiers::SchemaId;

// ============================================================================
// SECTION: Validated Values
// ============================================================================

/// Category and type pair describing an errand's kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    /// Category name.
    #[serde(default)]
    pub category: Option<String>,
    /// Type name, valid only in the context of the category.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl Classification {
    /// Creates a classification with both parts present.
    #[must_use]
    pub fn new(category: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            kind: Some(kind.into()),
        }
    }
}

/// Node of the recursive label taxonomy.
///
/// # Invariants
/// - Within one sibling list, `(classification, name)` is unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    /// Label identifier, absent on newly created labels.
    #[serde(default)]
    pub id: Option<String>,
    /// Classification of the label within its level.
    pub classification: String,
    /// Label name.
    pub name: String,
    /// Human readable name.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Path of the label from the root of its tree.
    #[serde(default)]
    pub resource_path: Option<String>,
    /// Resource name derived from the label path.
    #[serde(default)]
    pub resource_name: Option<String>,
    /// Ordered child labels.
    #[serde(default)]
    pub labels: Vec<Label>,
}

impl Label {
    /// Creates a leaf label.
    #[must_use]
    pub fn new(classification: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            classification: classification.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns the label with the given children attached.
    #[must_use]
    pub fn with_labels(mut self, labels: Vec<Self>) -> Self {
        self.labels = labels;
        self
    }
}

/// Keyed JSON fragment validated against an external schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonParameter {
    /// Parameter key, unique within its containing list.
    pub key: String,
    /// Identifier of the schema the value must conform to.
    pub schema_id: SchemaId,
    /// Parameter payload.
    #[serde(default)]
    pub value: Value,
}

impl JsonParameter {
    /// Creates a JSON parameter.
    #[must_use]
    pub fn new(key: impl Into<String>, schema_id: impl Into<SchemaId>, value: Value) -> Self {
        Self {
            key: key.into(),
            schema_id: schema_id.into(),
            value,
        }
    }
}

// ============================================================================
// SECTION: Tags and Enforcement
// ============================================================================

/// Metadata entity kinds that carry an enforcement flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    /// Errand categories.
    Category,
    /// Errand types.
    Type,
    /// Stakeholder roles.
    Role,
    /// Errand statuses.
    Status,
    /// Contact reasons.
    ContactReason,
}

impl EntityType {
    /// Returns the stable wire label for the entity type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Category => "CATEGORY",
            Self::Type => "TYPE",
            Self::Role => "ROLE",
            Self::Status => "STATUS",
            Self::ContactReason => "CONTACT_REASON",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tag kinds checked by the tag validator family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TagKind {
    /// Stakeholder role.
    Role,
    /// Errand status or status tag.
    Status,
    /// Category tag.
    Category,
    /// Type tag.
    Type,
    /// Client identifier tag.
    ClientId,
    /// Contact reason.
    ContactReason,
}

impl TagKind {
    /// Returns the stable label for the tag kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Role => "ROLE",
            Self::Status => "STATUS",
            Self::Category => "CATEGORY",
            Self::Type => "TYPE",
            Self::ClientId => "CLIENT_ID",
            Self::ContactReason => "CONTACT_REASON",
        }
    }
}

/// Per-scope opt-in switch for allow-list enforcement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationEnforcementFlag {
    /// Namespace the flag applies to.
    pub namespace: Namespace,
    /// Municipality the flag applies to.
    pub municipality_id: MunicipalityId,
    /// Entity type the flag governs.
    pub entity_type: EntityType,
    /// Whether allow-list validation is active.
    pub validated: bool,
}

// ============================================================================
// SECTION: Metadata Entries
// ============================================================================

/// Named metadata entry (category, type, role, or status).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataEntry {
    /// Entry name.
    pub name: String,
    /// Optional display name.
    #[serde(default, rename = "displayName", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl MetadataEntry {
    /// Creates an entry with only a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
        }
    }
}

/// Contact reason metadata entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactReasonEntry {
    /// Contact reason text.
    pub reason: String,
}

impl ContactReasonEntry {
    /// Creates a contact reason entry.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
