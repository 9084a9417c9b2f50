// crates/errand-validation-core/src/core/context.rs
// ============================================================================
// Module: Request Context
// Description: Routing context resolution for context-dependent validators.
// Purpose: Read namespace and municipality scope from request path variables.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Every metadata lookup is scoped by the `namespace` and `municipalityId`
//! path variables of the inbound request. The HTTP layer stores the matched
//! URI template variables in a per-request [`RequestAttributes`] store;
//! [`RequestContextReader`] turns that store into a [`RequestContext`].
//!
//! Validators never reach for ambient state. They receive a
//! [`ContextSource`], which is either an already resolved [`RequestContext`]
//! or an [`AmbientRequest`] wrapping the (possibly missing) attribute store.
//! An unreadable context is a wiring defect and surfaces as a
//! [`ContextError`], never as a field violation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use crate::core::identifiers::MunicipalityId;
use crate::core::identifiers::Namespace;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Attribute key holding the URI template variables of the matched route.
pub const URI_TEMPLATE_VARIABLES_KEY: &str = "request.uriTemplateVariables";
/// Path variable carrying the namespace.
pub const NAMESPACE_VARIABLE: &str = "namespace";
/// Path variable carrying the municipality identifier.
pub const MUNICIPALITY_ID_VARIABLE: &str = "municipalityId";
/// HTTP status reported for unreadable request context.
const INTERNAL_SERVER_ERROR: u16 = 500;

// ============================================================================
// SECTION: Request Context
// ============================================================================

/// Resolved routing scope of one inbound request.
///
/// # Invariants
/// - Read-only for the lifetime of the request; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    /// Namespace path variable.
    pub namespace: Namespace,
    /// Municipality path variable.
    pub municipality_id: MunicipalityId,
}

impl RequestContext {
    /// Creates a request context from resolved path variables.
    #[must_use]
    pub fn new(
        namespace: impl Into<Namespace>,
        municipality_id: impl Into<MunicipalityId>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            municipality_id: municipality_id.into(),
        }
    }
}

/// Per-request attribute store populated by the HTTP layer.
///
/// Values are kept as raw JSON so malformed entries stay representable and
/// are rejected by [`RequestContextReader`] instead of at insertion time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestAttributes {
    /// Attribute values keyed by attribute name.
    attributes: BTreeMap<String, Value>,
}

impl RequestAttributes {
    /// Creates an empty attribute store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            attributes: BTreeMap::new(),
        }
    }

    /// Creates a store whose URI template variables carry the given scope.
    #[must_use]
    pub fn with_path_variables(namespace: &str, municipality_id: &str) -> Self {
        let mut variables = Map::new();
        variables.insert(NAMESPACE_VARIABLE.to_string(), Value::String(namespace.to_string()));
        variables.insert(
            MUNICIPALITY_ID_VARIABLE.to_string(),
            Value::String(municipality_id.to_string()),
        );
        let mut attributes = Self::new();
        attributes.insert(URI_TEMPLATE_VARIABLES_KEY, Value::Object(variables));
        attributes
    }

    /// Stores an attribute, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.attributes.insert(key.into(), value);
    }

    /// Returns the attribute stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }
}

// ============================================================================
// SECTION: Reader
// ============================================================================

/// Resolves [`RequestContext`] values from request attribute stores.
pub struct RequestContextReader;

impl RequestContextReader {
    /// Reads the namespace and municipality path variables of a request.
    ///
    /// `None` models a validator invoked with no active request.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError`] naming `namespace` when no request is active,
    /// the template variables are absent or not a map, or the namespace is not
    /// a string; naming `municipalityId` when only the municipality is
    /// unreadable.
    pub fn read(request: Option<&RequestAttributes>) -> Result<RequestContext, ContextError> {
        let variables = request
            .and_then(|attributes| attributes.get(URI_TEMPLATE_VARIABLES_KEY))
            .and_then(Value::as_object)
            .ok_or(ContextError::PathVariableUnreadable(NAMESPACE_VARIABLE))?;
        let namespace = path_variable(variables, NAMESPACE_VARIABLE)?;
        let municipality_id = path_variable(variables, MUNICIPALITY_ID_VARIABLE)?;
        Ok(RequestContext::new(namespace, municipality_id))
    }
}

/// Extracts a string path variable from the template variable map.
fn path_variable(
    variables: &Map<String, Value>,
    name: &'static str,
) -> Result<String, ContextError> {
    match variables.get(name) {
        Some(Value::String(value)) => Ok(value.clone()),
        _ => Err(ContextError::PathVariableUnreadable(name)),
    }
}

// ============================================================================
// SECTION: Context Sources
// ============================================================================

/// Supplies the request scope to context-dependent validators.
///
/// Sources are resolved lazily so validators that short-circuit on blank
/// input never require a readable context.
pub trait ContextSource {
    /// Resolves the request scope.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError`] when the scope cannot be read.
    fn resolve(&self) -> Result<RequestContext, ContextError>;
}

impl ContextSource for RequestContext {
    fn resolve(&self) -> Result<RequestContext, ContextError> {
        Ok(self.clone())
    }
}

/// Request attribute store as seen from a validator.
///
/// # Invariants
/// - `attributes = None` means no request is bound to the validation call.
#[derive(Debug, Clone, Copy)]
pub struct AmbientRequest<'a> {
    /// Attribute store of the active request, if any.
    attributes: Option<&'a RequestAttributes>,
}

impl<'a> AmbientRequest<'a> {
    /// Wraps the attribute store of the active request.
    #[must_use]
    pub const fn new(attributes: &'a RequestAttributes) -> Self {
        Self {
            attributes: Some(attributes),
        }
    }

    /// Returns a source with no active request.
    #[must_use]
    pub const fn detached() -> Self {
        Self {
            attributes: None,
        }
    }
}

impl ContextSource for AmbientRequest<'_> {
    fn resolve(&self) -> Result<RequestContext, ContextError> {
        RequestContextReader::read(self.attributes)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Request context failures.
///
/// # Invariants
/// - Always classified as an internal server error; never a field violation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    /// A required path variable could not be read from the request.
    #[error("Internal Server Error: Path variable '{0}' is not readable from request")]
    PathVariableUnreadable(&'static str),
}

impl ContextError {
    /// Returns the HTTP status the calling layer should respond with.
    #[must_use]
    pub const fn status(&self) -> u16 {
        INTERNAL_SERVER_ERROR
    }

    /// Returns the name of the unreadable path variable.
    #[must_use]
    pub const fn variable(&self) -> &'static str {
        match self {
            Self::PathVariableUnreadable(name) => name,
        }
    }
}
