// crates/errand-validation-core/src/runtime/classification.rs
// ============================================================================
// Module: Classification Validator
// Description: Validates (category, type) pairs against scoped metadata.
// Purpose: Ensure errands are classified with known categories and types.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! A classification is valid when its category exists in the request scope's
//! metadata and its type exists among the types of that category. Checks run
//! in order and stop at the first failure, reporting exactly one violation.
//! Type lookups use the metadata spelling of the matched category.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::context::ContextSource;
use crate::core::model::Classification;
use crate::core::model::EntityType;
use crate::core::violation::ConstraintReport;
use crate::core::violation::messages;
use crate::runtime::SharedMetadataGateway;
use crate::runtime::ValidationError;
use crate::runtime::membership::contains_ignore_case;
use crate::runtime::membership::find_ignore_case;
use crate::runtime::membership::non_blank;
use crate::runtime::membership::reject;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Handling of an absent classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullPolicy {
    /// Absent classification is invalid (create).
    Reject,
    /// Absent classification is valid and skips all checks (update).
    Accept,
}

/// Metadata-backed classification validator.
#[derive(Clone)]
pub struct ClassificationValidator {
    /// Metadata source for categories, types, and the enforcement flag.
    metadata: SharedMetadataGateway,
    /// Handling of an absent classification.
    null_policy: NullPolicy,
}

impl ClassificationValidator {
    /// Creates a classification validator.
    #[must_use]
    pub fn new(metadata: SharedMetadataGateway, null_policy: NullPolicy) -> Self {
        Self {
            metadata,
            null_policy,
        }
    }

    /// Returns the null policy of the validator.
    #[must_use]
    pub const fn null_policy(&self) -> NullPolicy {
        self.null_policy
    }

    /// Validates an optional classification.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when the request scope is unreadable or a
    /// metadata lookup fails.
    pub fn is_valid(
        &self,
        classification: Option<&Classification>,
        scope: &dyn ContextSource,
        report: &mut ConstraintReport,
    ) -> Result<bool, ValidationError> {
        let Some(classification) = classification else {
            return Ok(match self.null_policy {
                NullPolicy::Accept => true,
                NullPolicy::Reject => reject(report, messages::CLASSIFICATION_REQUIRED),
            });
        };

        let context = scope.resolve()?;
        let namespace = &context.namespace;
        let municipality_id = &context.municipality_id;
        if !self.metadata.is_validated(namespace, municipality_id, EntityType::Category)? {
            return Ok(true);
        }

        let Some(category) = non_blank(classification.category.as_deref()) else {
            return Ok(reject(report, messages::CATEGORY_REQUIRED));
        };
        let categories = self.metadata.find_categories(namespace, municipality_id)?;
        let Some(category) =
            find_ignore_case(category, categories.iter().map(|entry| entry.name.as_str()))
        else {
            return Ok(reject(report, messages::CATEGORY_INVALID));
        };

        let Some(kind) = non_blank(classification.kind.as_deref()) else {
            return Ok(reject(report, messages::TYPE_REQUIRED));
        };
        let types = self.metadata.find_types(namespace, municipality_id, category)?;
        if !contains_ignore_case(kind, types.iter().map(|entry| entry.name.as_str())) {
            return Ok(reject(report, messages::TYPE_INVALID));
        }
        Ok(true)
    }
}
