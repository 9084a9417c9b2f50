// crates/errand-validation-core/src/runtime/memory.rs
// ============================================================================
// Module: In-Memory Gateways
// Description: Deterministic metadata, tag, and JSON-schema gateways.
// Purpose: Back validators in tests and local runs without remote services.
// Dependencies: crate::core, crate::interfaces, serde_json
// ============================================================================

//! ## Overview
//! In-memory gateways hold scoped reference data behind a mutex and record
//! every lookup they serve, so callers can assert which lookups a validation
//! performed. Unknown scopes answer with empty lists and disabled
//! enforcement flags. Failures can be injected to exercise error paths.
//! These gateways are not intended for production use.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::Mutex;

use serde_json::Value;

use crate::core::identifiers::MunicipalityId;
use crate::core::identifiers::Namespace;
use crate::core::identifiers::SchemaId;
use crate::core::model::ContactReasonEntry;
use crate::core::model::EntityType;
use crate::core::model::MetadataEntry;
use crate::core::model::ValidationEnforcementFlag;
use crate::interfaces::GatewayError;
use crate::interfaces::JsonSchemaError;
use crate::interfaces::JsonSchemaGateway;
use crate::interfaces::MetadataGateway;
use crate::interfaces::TagGateway;

// ============================================================================
// SECTION: Shared Helpers
// ============================================================================

/// Map key for a namespace and municipality pair.
type ScopeKey = (String, String);

/// Builds the map key for a scope.
fn scope_key(namespace: &Namespace, municipality_id: &MunicipalityId) -> ScopeKey {
    (namespace.as_str().to_string(), municipality_id.as_str().to_string())
}

/// Builds the poisoned-mutex error for a named gateway.
fn poisoned(gateway: &str) -> GatewayError {
    GatewayError::Unavailable(format!("{gateway} gateway mutex poisoned"))
}

/// Converts names into metadata entries.
fn entries(names: &[&str]) -> Vec<MetadataEntry> {
    names.iter().map(|name| MetadataEntry::named(*name)).collect()
}

// ============================================================================
// SECTION: Metadata
// ============================================================================

/// Reference data for one namespace and municipality.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeMetadata {
    /// Errand categories.
    categories: Vec<MetadataEntry>,
    /// Errand types keyed by category name.
    types: BTreeMap<String, Vec<MetadataEntry>>,
    /// Stakeholder roles.
    roles: Vec<MetadataEntry>,
    /// Errand statuses.
    statuses: Vec<MetadataEntry>,
    /// Contact reasons.
    contact_reasons: Vec<ContactReasonEntry>,
    /// Entity types with enforcement enabled.
    validated: BTreeSet<EntityType>,
}

impl ScopeMetadata {
    /// Creates empty scope metadata with every enforcement flag off.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the metadata with the given categories.
    #[must_use]
    pub fn with_categories(mut self, names: &[&str]) -> Self {
        self.categories = entries(names);
        self
    }

    /// Returns the metadata with the given types registered under `category`.
    #[must_use]
    pub fn with_types(mut self, category: &str, names: &[&str]) -> Self {
        self.types.insert(category.to_string(), entries(names));
        self
    }

    /// Returns the metadata with the given roles.
    #[must_use]
    pub fn with_roles(mut self, names: &[&str]) -> Self {
        self.roles = entries(names);
        self
    }

    /// Returns the metadata with the given statuses.
    #[must_use]
    pub fn with_statuses(mut self, names: &[&str]) -> Self {
        self.statuses = entries(names);
        self
    }

    /// Returns the metadata with the given contact reasons.
    #[must_use]
    pub fn with_contact_reasons(mut self, reasons: &[&str]) -> Self {
        self.contact_reasons =
            reasons.iter().map(|reason| ContactReasonEntry::new(*reason)).collect();
        self
    }

    /// Returns the metadata with enforcement enabled for `entity_type`.
    #[must_use]
    pub fn validated(mut self, entity_type: EntityType) -> Self {
        self.validated.insert(entity_type);
        self
    }
}

/// Metadata lookup served by [`InMemoryMetadataGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataCall {
    /// Category listing.
    Categories,
    /// Type listing for a category.
    Types(String),
    /// Role listing.
    Roles,
    /// Status listing.
    Statuses,
    /// Contact reason listing.
    ContactReasons,
    /// Enforcement flag lookup.
    Validated(EntityType),
}

/// Mutable state of the in-memory metadata gateway.
#[derive(Debug, Default)]
struct MetadataState {
    /// Reference data keyed by scope.
    scopes: BTreeMap<ScopeKey, ScopeMetadata>,
    /// Lookups served so far.
    calls: Vec<MetadataCall>,
    /// Error returned by every lookup when set.
    failure: Option<GatewayError>,
}

/// In-memory metadata gateway for tests and examples.
#[derive(Debug, Default, Clone)]
pub struct InMemoryMetadataGateway {
    /// Gateway state protected by a mutex.
    state: Arc<Mutex<MetadataState>>,
}

impl InMemoryMetadataGateway {
    /// Creates a gateway with no scopes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the gateway with reference data registered for a scope.
    #[must_use]
    pub fn with_scope(
        self,
        namespace: impl Into<Namespace>,
        municipality_id: impl Into<MunicipalityId>,
        metadata: ScopeMetadata,
    ) -> Self {
        let key = scope_key(&namespace.into(), &municipality_id.into());
        if let Ok(mut state) = self.state.lock() {
            state.scopes.insert(key, metadata);
        }
        self
    }

    /// Returns the gateway with a stored enforcement flag applied to its scope.
    ///
    /// Unknown scopes are registered with empty reference data.
    #[must_use]
    pub fn with_flag(self, flag: &ValidationEnforcementFlag) -> Self {
        let key = scope_key(&flag.namespace, &flag.municipality_id);
        if let Ok(mut state) = self.state.lock() {
            let scope = state.scopes.entry(key).or_default();
            if flag.validated {
                scope.validated.insert(flag.entity_type);
            } else {
                scope.validated.remove(&flag.entity_type);
            }
        }
        self
    }

    /// Makes every subsequent lookup fail with `failure`, or succeed again on `None`.
    pub fn fail_with(&self, failure: Option<GatewayError>) {
        if let Ok(mut state) = self.state.lock() {
            state.failure = failure;
        }
    }

    /// Returns the lookups served so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<MetadataCall> {
        self.state.lock().map(|state| state.calls.clone()).unwrap_or_default()
    }

    /// Records a lookup and projects the scope's metadata.
    fn lookup<T, F>(
        &self,
        namespace: &Namespace,
        municipality_id: &MunicipalityId,
        call: MetadataCall,
        project: F,
    ) -> Result<T, GatewayError>
    where
        T: Default,
        F: FnOnce(&ScopeMetadata) -> T,
    {
        let mut state = self.state.lock().map_err(|_| poisoned("metadata"))?;
        state.calls.push(call);
        if let Some(failure) = &state.failure {
            return Err(failure.clone());
        }
        let scope = state.scopes.get(&scope_key(namespace, municipality_id));
        Ok(scope.map(project).unwrap_or_default())
    }
}

impl MetadataGateway for InMemoryMetadataGateway {
    fn find_categories(
        &self,
        namespace: &Namespace,
        municipality_id: &MunicipalityId,
    ) -> Result<Vec<MetadataEntry>, GatewayError> {
        self.lookup(namespace, municipality_id, MetadataCall::Categories, |scope| {
            scope.categories.clone()
        })
    }

    fn find_types(
        &self,
        namespace: &Namespace,
        municipality_id: &MunicipalityId,
        category: &str,
    ) -> Result<Vec<MetadataEntry>, GatewayError> {
        self.lookup(namespace, municipality_id, MetadataCall::Types(category.to_string()), |scope| {
            scope.types.get(category).cloned().unwrap_or_default()
        })
    }

    fn find_roles(
        &self,
        namespace: &Namespace,
        municipality_id: &MunicipalityId,
    ) -> Result<Vec<MetadataEntry>, GatewayError> {
        self.lookup(namespace, municipality_id, MetadataCall::Roles, |scope| scope.roles.clone())
    }

    fn find_statuses(
        &self,
        namespace: &Namespace,
        municipality_id: &MunicipalityId,
    ) -> Result<Vec<MetadataEntry>, GatewayError> {
        self.lookup(namespace, municipality_id, MetadataCall::Statuses, |scope| {
            scope.statuses.clone()
        })
    }

    fn find_contact_reasons(
        &self,
        namespace: &Namespace,
        municipality_id: &MunicipalityId,
    ) -> Result<Vec<ContactReasonEntry>, GatewayError> {
        self.lookup(namespace, municipality_id, MetadataCall::ContactReasons, |scope| {
            scope.contact_reasons.clone()
        })
    }

    fn is_validated(
        &self,
        namespace: &Namespace,
        municipality_id: &MunicipalityId,
        entity_type: EntityType,
    ) -> Result<bool, GatewayError> {
        self.lookup(namespace, municipality_id, MetadataCall::Validated(entity_type), |scope| {
            scope.validated.contains(&entity_type)
        })
    }
}

// ============================================================================
// SECTION: Tags
// ============================================================================

/// Tag lookup served by [`InMemoryTagGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagCall {
    /// Status tag listing.
    StatusTags,
    /// Type tag listing for a category.
    TypeTags(String),
    /// Client identifier tag listing.
    ClientIdTags,
}

/// Mutable state of the in-memory tag gateway.
#[derive(Debug, Default)]
struct TagState {
    /// Status tags keyed by scope.
    status_tags: BTreeMap<ScopeKey, Vec<String>>,
    /// Type tags keyed by scope and category.
    type_tags: BTreeMap<(ScopeKey, String), Vec<String>>,
    /// Global client identifier tags.
    client_id_tags: Vec<String>,
    /// Lookups served so far.
    calls: Vec<TagCall>,
    /// Error returned by every lookup when set.
    failure: Option<GatewayError>,
}

/// In-memory tag gateway for tests and examples.
#[derive(Debug, Default, Clone)]
pub struct InMemoryTagGateway {
    /// Gateway state protected by a mutex.
    state: Arc<Mutex<TagState>>,
}

impl InMemoryTagGateway {
    /// Creates a gateway with no tags.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the gateway with status tags registered for a scope.
    #[must_use]
    pub fn with_status_tags(
        self,
        namespace: impl Into<Namespace>,
        municipality_id: impl Into<MunicipalityId>,
        tags: &[&str],
    ) -> Self {
        let key = scope_key(&namespace.into(), &municipality_id.into());
        if let Ok(mut state) = self.state.lock() {
            state.status_tags.insert(key, to_strings(tags));
        }
        self
    }

    /// Returns the gateway with type tags registered for a scope and category.
    #[must_use]
    pub fn with_type_tags(
        self,
        namespace: impl Into<Namespace>,
        municipality_id: impl Into<MunicipalityId>,
        category: &str,
        tags: &[&str],
    ) -> Self {
        let key = (scope_key(&namespace.into(), &municipality_id.into()), category.to_string());
        if let Ok(mut state) = self.state.lock() {
            state.type_tags.insert(key, to_strings(tags));
        }
        self
    }

    /// Returns the gateway with the given client identifier tags.
    #[must_use]
    pub fn with_client_id_tags(self, tags: &[&str]) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.client_id_tags = to_strings(tags);
        }
        self
    }

    /// Makes every subsequent lookup fail with `failure`, or succeed again on `None`.
    pub fn fail_with(&self, failure: Option<GatewayError>) {
        if let Ok(mut state) = self.state.lock() {
            state.failure = failure;
        }
    }

    /// Returns the lookups served so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<TagCall> {
        self.state.lock().map(|state| state.calls.clone()).unwrap_or_default()
    }

    /// Records a lookup and projects the stored tags.
    fn lookup<F>(&self, call: TagCall, project: F) -> Result<Vec<String>, GatewayError>
    where
        F: FnOnce(&TagState) -> Option<Vec<String>>,
    {
        let mut guard = self.state.lock().map_err(|_| poisoned("tag"))?;
        guard.calls.push(call);
        let state: &TagState = &guard;
        if let Some(failure) = &state.failure {
            return Err(failure.clone());
        }
        Ok(project(state).unwrap_or_default())
    }
}

/// Copies borrowed tag names into owned strings.
fn to_strings(tags: &[&str]) -> Vec<String> {
    tags.iter().map(|tag| (*tag).to_string()).collect()
}

impl TagGateway for InMemoryTagGateway {
    fn find_all_status_tags(
        &self,
        namespace: &Namespace,
        municipality_id: &MunicipalityId,
    ) -> Result<Vec<String>, GatewayError> {
        let key = scope_key(namespace, municipality_id);
        self.lookup(TagCall::StatusTags, |state| state.status_tags.get(&key).cloned())
    }

    fn find_all_type_tags(
        &self,
        namespace: &Namespace,
        municipality_id: &MunicipalityId,
        category: &str,
    ) -> Result<Vec<String>, GatewayError> {
        let key = (scope_key(namespace, municipality_id), category.to_string());
        self.lookup(TagCall::TypeTags(category.to_string()), |state| {
            state.type_tags.get(&key).cloned()
        })
    }

    fn find_all_client_id_tags(&self) -> Result<Vec<String>, GatewayError> {
        self.lookup(TagCall::ClientIdTags, |state| Some(state.client_id_tags.clone()))
    }
}

// ============================================================================
// SECTION: JSON Schemas
// ============================================================================

/// Schema validation request served by [`InMemoryJsonSchemaGateway`].
#[derive(Debug, Clone, PartialEq)]
pub struct JsonSchemaCall {
    /// Municipality of the request.
    pub municipality_id: MunicipalityId,
    /// Schema the value was validated against.
    pub schema_id: SchemaId,
    /// Submitted value.
    pub value: Value,
}

/// Mutable state of the in-memory JSON-schema gateway.
#[derive(Debug, Default)]
struct JsonSchemaState {
    /// Scripted failures keyed by schema identifier.
    failures: BTreeMap<String, JsonSchemaError>,
    /// Requests served so far.
    calls: Vec<JsonSchemaCall>,
}

/// Scripted JSON-schema gateway; accepts every value unless told otherwise.
#[derive(Debug, Default, Clone)]
pub struct InMemoryJsonSchemaGateway {
    /// Gateway state protected by a mutex.
    state: Arc<Mutex<JsonSchemaState>>,
}

impl InMemoryJsonSchemaGateway {
    /// Creates a gateway that accepts every value.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the gateway failing every validation against `schema_id`.
    #[must_use]
    pub fn with_failure(self, schema_id: impl Into<SchemaId>, failure: JsonSchemaError) -> Self {
        let schema_id = schema_id.into();
        if let Ok(mut state) = self.state.lock() {
            state.failures.insert(schema_id.as_str().to_string(), failure);
        }
        self
    }

    /// Returns the requests served so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<JsonSchemaCall> {
        self.state.lock().map(|state| state.calls.clone()).unwrap_or_default()
    }
}

impl JsonSchemaGateway for InMemoryJsonSchemaGateway {
    fn validate_json(
        &self,
        municipality_id: &MunicipalityId,
        schema_id: &SchemaId,
        value: &Value,
    ) -> Result<(), JsonSchemaError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| JsonSchemaError::Transport("json schema gateway mutex poisoned".into()))?;
        state.calls.push(JsonSchemaCall {
            municipality_id: municipality_id.clone(),
            schema_id: schema_id.clone(),
            value: value.clone(),
        });
        state.failures.get(schema_id.as_str()).cloned().map_or(Ok(()), Err)
    }
}
