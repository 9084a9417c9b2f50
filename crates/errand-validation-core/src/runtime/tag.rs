// crates/errand-validation-core/src/runtime/tag.rs
// ============================================================================
// Module: Tag Validator
// Description: Data-driven allow-list validation for roles, statuses, and tags.
// Purpose: Check optional names against dynamically fetched, scoped allow-lists.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! One [`TagValidator`] type covers every tag kind. A validator is configured
//! with an allow-list supplier (scoped by request context, or global), an
//! enforcement source, a presence policy, and a violation message. The
//! preset constructors wire the kinds the errand API uses.
//!
//! Algorithm for a single candidate:
//! 1. Blank: valid, unless the presence policy is [`Presence::Required`].
//! 2. Resolve the request scope (skipped for global, always-enforced rules).
//! 3. Enforcement flag off: valid, the allow-list is never fetched.
//! 4. Fetch the allow-list and match case-insensitively.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use crate::core::context::ContextSource;
use crate::core::context::RequestContext;
use crate::core::model::EntityType;
use crate::core::model::MetadataEntry;
use crate::core::model::TagKind;
use crate::core::violation::ConstraintReport;
use crate::core::violation::messages;
use crate::interfaces::GatewayError;
use crate::runtime::SharedMetadataGateway;
use crate::runtime::SharedTagGateway;
use crate::runtime::ValidationError;
use crate::runtime::membership::contains_ignore_case;
use crate::runtime::membership::non_blank;
use crate::runtime::membership::reject;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Category every type-tag lookup is scoped to.
///
/// Type tags are not looked up under the classification being validated.
pub const TYPE_TAG_PLACEHOLDER_CATEGORY: &str = "placeholder";

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Allow-list supplier scoped by request context.
pub type ScopedAllowList =
    Arc<dyn Fn(&RequestContext) -> Result<Vec<String>, GatewayError> + Send + Sync>;
/// Allow-list supplier independent of request context.
pub type GlobalAllowList = Arc<dyn Fn() -> Result<Vec<String>, GatewayError> + Send + Sync>;
/// Enforcement flag lookup scoped by request context.
pub type FlagSource = Arc<dyn Fn(&RequestContext) -> Result<bool, GatewayError> + Send + Sync>;

/// Source of the values a candidate must match.
#[derive(Clone)]
pub enum AllowList {
    /// Allow-list fetched for the request's namespace and municipality.
    Scoped(ScopedAllowList),
    /// Allow-list shared by every scope.
    Global(GlobalAllowList),
}

/// Decides whether allow-list validation runs for a request.
#[derive(Clone)]
pub enum Enforcement {
    /// Always validate.
    Always,
    /// Validate only when the scoped flag is set.
    Flag(FlagSource),
}

/// Policy for blank candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Blank candidates are valid.
    Optional,
    /// Blank candidates are reported.
    Required,
}

// ============================================================================
// SECTION: Validator
// ============================================================================

/// Allow-list membership validator for one tag kind.
#[derive(Clone)]
pub struct TagValidator {
    /// Tag kind checked by this validator.
    kind: TagKind,
    /// Allow-list supplier.
    allow_list: AllowList,
    /// Enforcement source.
    enforcement: Enforcement,
    /// Blank candidate policy.
    presence: Presence,
    /// Violation message for non-members.
    message: String,
}

impl std::fmt::Debug for TagValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let allow_list = match self.allow_list {
            AllowList::Scoped(_) => "scoped",
            AllowList::Global(_) => "global",
        };
        let enforcement = match self.enforcement {
            Enforcement::Always => "always",
            Enforcement::Flag(_) => "flag",
        };
        f.debug_struct("TagValidator")
            .field("kind", &self.kind.as_str())
            .field("allow_list", &allow_list)
            .field("enforcement", &enforcement)
            .field("presence", &self.presence)
            .field("message", &self.message)
            .finish()
    }
}

impl TagValidator {
    /// Creates an optional-value validator.
    #[must_use]
    pub fn new(
        kind: TagKind,
        allow_list: AllowList,
        enforcement: Enforcement,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            allow_list,
            enforcement,
            presence: Presence::Optional,
            message: message.into(),
        }
    }

    /// Returns the validator with a different presence policy.
    #[must_use]
    pub fn with_presence(mut self, presence: Presence) -> Self {
        self.presence = presence;
        self
    }

    /// Validates stakeholder roles against metadata roles.
    #[must_use]
    pub fn roles(metadata: SharedMetadataGateway) -> Self {
        let gateway = Arc::clone(&metadata);
        let supplier: ScopedAllowList = Arc::new(move |context: &RequestContext| {
            gateway.find_roles(&context.namespace, &context.municipality_id).map(entry_names)
        });
        Self::new(
            TagKind::Role,
            AllowList::Scoped(supplier),
            metadata_flag(metadata, EntityType::Role),
            messages::ROLE_INVALID,
        )
    }

    /// Validates errand statuses against metadata statuses.
    #[must_use]
    pub fn statuses(metadata: SharedMetadataGateway) -> Self {
        let gateway = Arc::clone(&metadata);
        let supplier: ScopedAllowList = Arc::new(move |context: &RequestContext| {
            gateway.find_statuses(&context.namespace, &context.municipality_id).map(entry_names)
        });
        Self::new(
            TagKind::Status,
            AllowList::Scoped(supplier),
            metadata_flag(metadata, EntityType::Status),
            messages::STATUS_INVALID,
        )
    }

    /// Validates category tags against metadata categories.
    #[must_use]
    pub fn category_tags(metadata: SharedMetadataGateway) -> Self {
        let gateway = Arc::clone(&metadata);
        let supplier: ScopedAllowList = Arc::new(move |context: &RequestContext| {
            gateway.find_categories(&context.namespace, &context.municipality_id).map(entry_names)
        });
        Self::new(
            TagKind::Category,
            AllowList::Scoped(supplier),
            metadata_flag(metadata, EntityType::Category),
            messages::CATEGORY_TAG_INVALID,
        )
    }

    /// Validates contact reasons against metadata contact reasons.
    #[must_use]
    pub fn contact_reasons(metadata: SharedMetadataGateway) -> Self {
        let gateway = Arc::clone(&metadata);
        let supplier: ScopedAllowList = Arc::new(move |context: &RequestContext| {
            gateway.find_contact_reasons(&context.namespace, &context.municipality_id).map(
                |entries| entries.into_iter().map(|entry| entry.reason).collect::<Vec<_>>(),
            )
        });
        Self::new(
            TagKind::ContactReason,
            AllowList::Scoped(supplier),
            metadata_flag(metadata, EntityType::ContactReason),
            messages::CONTACT_REASON_INVALID,
        )
    }

    /// Validates status tags against the tag service.
    #[must_use]
    pub fn status_tags(tags: SharedTagGateway, metadata: SharedMetadataGateway) -> Self {
        let supplier: ScopedAllowList = Arc::new(move |context: &RequestContext| {
            tags.find_all_status_tags(&context.namespace, &context.municipality_id)
        });
        Self::new(
            TagKind::Status,
            AllowList::Scoped(supplier),
            metadata_flag(metadata, EntityType::Status),
            messages::TAG_INVALID,
        )
    }

    /// Validates type tags against the tag service.
    ///
    /// Lookups use [`TYPE_TAG_PLACEHOLDER_CATEGORY`].
    #[must_use]
    pub fn type_tags(tags: SharedTagGateway, metadata: SharedMetadataGateway) -> Self {
        let supplier: ScopedAllowList = Arc::new(move |context: &RequestContext| {
            tags.find_all_type_tags(
                &context.namespace,
                &context.municipality_id,
                TYPE_TAG_PLACEHOLDER_CATEGORY,
            )
        });
        Self::new(
            TagKind::Type,
            AllowList::Scoped(supplier),
            metadata_flag(metadata, EntityType::Type),
            messages::TAG_INVALID,
        )
    }

    /// Validates client identifier tags; always enforced, context-free.
    #[must_use]
    pub fn client_id_tags(tags: SharedTagGateway) -> Self {
        let supplier: GlobalAllowList = Arc::new(move || tags.find_all_client_id_tags());
        Self::new(
            TagKind::ClientId,
            AllowList::Global(supplier),
            Enforcement::Always,
            messages::TAG_INVALID,
        )
    }

    /// Returns the violation message for non-members.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Validates a single optional candidate.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when the request scope is unreadable or the
    /// flag/allow-list lookup fails.
    pub fn is_valid(
        &self,
        candidate: Option<&str>,
        scope: &dyn ContextSource,
        report: &mut ConstraintReport,
    ) -> Result<bool, ValidationError> {
        let Some(candidate) = non_blank(candidate) else {
            return Ok(self.accepts_blank(report, None));
        };
        let Some(allowed) = self.enforced_allow_list(scope)? else {
            return Ok(true);
        };
        if contains_ignore_case(candidate, allowed.iter().map(String::as_str)) {
            Ok(true)
        } else {
            Ok(reject(report, &self.message))
        }
    }

    /// Validates a list of candidates, reporting each invalid element.
    ///
    /// The allow-list is fetched at most once per call. `element_path` names
    /// the property path of the element at a given index.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when the request scope is unreadable or the
    /// flag/allow-list lookup fails.
    pub fn validate_each<'a, I, P>(
        &self,
        candidates: I,
        element_path: P,
        scope: &dyn ContextSource,
        report: &mut ConstraintReport,
    ) -> Result<bool, ValidationError>
    where
        I: IntoIterator<Item = Option<&'a str>>,
        P: Fn(usize) -> String,
    {
        let mut valid = true;
        let mut present = Vec::new();
        for (index, candidate) in candidates.into_iter().enumerate() {
            match non_blank(candidate) {
                Some(value) => present.push((index, value)),
                None => valid &= self.accepts_blank(report, Some(element_path(index))),
            }
        }
        if present.is_empty() {
            return Ok(valid);
        }
        let Some(allowed) = self.enforced_allow_list(scope)? else {
            return Ok(valid);
        };
        for (index, candidate) in present {
            if !contains_ignore_case(candidate, allowed.iter().map(String::as_str)) {
                report.disable_default_violation();
                report.add_violation_at(element_path(index), self.message.as_str());
                valid = false;
            }
        }
        Ok(valid)
    }

    /// Applies the presence policy to a blank candidate.
    fn accepts_blank(&self, report: &mut ConstraintReport, path: Option<String>) -> bool {
        match self.presence {
            Presence::Optional => true,
            Presence::Required => {
                report.disable_default_violation();
                match path {
                    Some(path) => report.add_violation_at(path, messages::VALUE_REQUIRED),
                    None => report.add_violation(messages::VALUE_REQUIRED),
                }
                false
            }
        }
    }

    /// Returns the allow-list, or `None` when enforcement is off for the scope.
    fn enforced_allow_list(
        &self,
        scope: &dyn ContextSource,
    ) -> Result<Option<Vec<String>>, ValidationError> {
        if let (AllowList::Global(supplier), Enforcement::Always) =
            (&self.allow_list, &self.enforcement)
        {
            return Ok(Some(supplier()?));
        }
        let context = scope.resolve()?;
        if let Enforcement::Flag(flag) = &self.enforcement
            && !flag(&context)?
        {
            return Ok(None);
        }
        let allowed = match &self.allow_list {
            AllowList::Scoped(supplier) => supplier(&context)?,
            AllowList::Global(supplier) => supplier()?,
        };
        Ok(Some(allowed))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds a metadata-backed enforcement flag for an entity type.
fn metadata_flag(metadata: SharedMetadataGateway, entity_type: EntityType) -> Enforcement {
    Enforcement::Flag(Arc::new(move |context: &RequestContext| {
        metadata.is_validated(&context.namespace, &context.municipality_id, entity_type)
    }))
}

/// Extracts entry names from metadata entries.
fn entry_names(entries: Vec<MetadataEntry>) -> Vec<String> {
    entries.into_iter().map(|entry| entry.name).collect()
}
