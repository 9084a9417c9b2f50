// crates/errand-validation-gateways/src/json_schema.rs
// ============================================================================
// Module: JSON Schema Gateways
// Description: Remote and local JSON-schema validation services.
// Purpose: Classify schema validation outcomes as client or server failures.
// Dependencies: errand-validation-core, jsonschema, reqwest, serde_json
// ============================================================================

//! ## Overview
//! [`HttpJsonSchemaGateway`] posts values to
//! `{base}/{municipalityId}/schemas/{schemaId}/validation`. A 2xx answer
//! accepts the value, a 4xx answer rejects it with the RFC 7807 `detail` of
//! the problem body, and anything else means the check could not be
//! performed.
//!
//! [`LocalJsonSchemaGateway`] validates against Draft 2020-12 schemas
//! compiled in process, registered by id or loaded from a directory of
//! `<schemaId>.json` files. It reports the same classifications so callers
//! cannot tell the two apart.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use errand_validation_core::JsonSchemaError;
use errand_validation_core::JsonSchemaGateway;
use errand_validation_core::MunicipalityId;
use errand_validation_core::SchemaId;
use jsonschema::Draft;
use jsonschema::Validator;
use serde::Deserialize;
use serde_json::Value;

use crate::client::GatewayBuildError;
use crate::client::HttpEndpoint;
use crate::client::HttpGatewayConfig;
use crate::client::transport_message;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum size of a schema file loaded from disk, in bytes.
pub const MAX_SCHEMA_FILE_BYTES: u64 = 1024 * 1024;
/// Status reported for unknown schema identifiers.
const STATUS_NOT_FOUND: u16 = 404;
/// Status reported for values rejected by a local schema.
const STATUS_BAD_REQUEST: u16 = 400;

// ============================================================================
// SECTION: Remote Gateway
// ============================================================================

/// RFC 7807 problem body returned on client failures.
#[derive(Debug, Deserialize)]
struct ProblemBody {
    /// Human readable explanation of the failure.
    #[serde(default)]
    detail: Option<String>,
}

/// JSON-schema gateway backed by the schema HTTP service.
#[derive(Debug, Clone)]
pub struct HttpJsonSchemaGateway {
    /// Schema service endpoint.
    endpoint: HttpEndpoint,
}

impl HttpJsonSchemaGateway {
    /// Creates a remote JSON-schema gateway.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayBuildError`] when the configuration is invalid.
    pub fn new(config: &HttpGatewayConfig) -> Result<Self, GatewayBuildError> {
        Ok(Self {
            endpoint: HttpEndpoint::new(config)?,
        })
    }
}

impl JsonSchemaGateway for HttpJsonSchemaGateway {
    fn validate_json(
        &self,
        municipality_id: &MunicipalityId,
        schema_id: &SchemaId,
        value: &Value,
    ) -> Result<(), JsonSchemaError> {
        let body = serde_json::to_vec(value)
            .map_err(|_| JsonSchemaError::Transport("value serialization failed".to_string()))?;
        let url = self.endpoint.url(&[
            municipality_id.as_str(),
            "schemas",
            schema_id.as_str(),
            "validation",
        ]);
        let mut response = self
            .endpoint
            .post_json(url, body)
            .send()
            .map_err(|err| JsonSchemaError::Transport(transport_message(&err).to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        if status.is_client_error() {
            let detail = self
                .endpoint
                .read_body(&mut response)
                .ok()
                .and_then(|body| serde_json::from_slice::<ProblemBody>(&body).ok())
                .and_then(|problem| problem.detail);
            return Err(JsonSchemaError::Client {
                status: status.as_u16(),
                detail,
            });
        }
        Err(JsonSchemaError::Server {
            status: status.as_u16(),
            message: format!("schema service responded with status {}", status.as_u16()),
        })
    }
}

// ============================================================================
// SECTION: Local Gateway
// ============================================================================

/// JSON-schema gateway validating against in-process compiled schemas.
///
/// # Invariants
/// - Schemas are compiled once, at registration time.
/// - Schemas are shared by every municipality.
#[derive(Default)]
pub struct LocalJsonSchemaGateway {
    /// Compiled validators keyed by schema identifier.
    schemas: BTreeMap<String, Validator>,
}

impl LocalJsonSchemaGateway {
    /// Creates a gateway with no schemas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every `<schemaId>.json` file of a directory.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayBuildError::Schema`] when the directory or a schema
    /// file cannot be read, is too large, or does not compile.
    pub fn from_dir(dir: &Path) -> Result<Self, GatewayBuildError> {
        let entries = fs::read_dir(dir).map_err(|err| {
            GatewayBuildError::Schema(format!("failed to read schema directory: {err}"))
        })?;
        let mut gateway = Self::new();
        for entry in entries {
            let path = entry
                .map_err(|err| {
                    GatewayBuildError::Schema(format!("failed to read schema directory: {err}"))
                })?
                .path();
            if !path.is_file() || path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(schema_id) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let schema = read_schema_file(&path)?;
            gateway.register(schema_id, &schema)?;
        }
        Ok(gateway)
    }

    /// Compiles and registers a schema under `schema_id`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayBuildError::Schema`] when the schema does not compile.
    pub fn register(
        &mut self,
        schema_id: impl Into<SchemaId>,
        schema: &Value,
    ) -> Result<(), GatewayBuildError> {
        let schema_id = schema_id.into();
        let validator = jsonschema::options()
            .with_draft(Draft::Draft202012)
            .build(schema)
            .map_err(|err| {
                GatewayBuildError::Schema(format!("schema '{schema_id}' failed to compile: {err}"))
            })?;
        self.schemas.insert(schema_id.as_str().to_string(), validator);
        Ok(())
    }

    /// Returns the registered schema identifiers in order.
    #[must_use]
    pub fn schema_ids(&self) -> Vec<&str> {
        self.schemas.keys().map(String::as_str).collect()
    }
}

impl JsonSchemaGateway for LocalJsonSchemaGateway {
    fn validate_json(
        &self,
        _municipality_id: &MunicipalityId,
        schema_id: &SchemaId,
        value: &Value,
    ) -> Result<(), JsonSchemaError> {
        let Some(validator) = self.schemas.get(schema_id.as_str()) else {
            return Err(JsonSchemaError::Client {
                status: STATUS_NOT_FOUND,
                detail: Some(format!("schema '{schema_id}' not found")),
            });
        };
        let messages: Vec<String> =
            validator.iter_errors(value).map(|error| error.to_string()).collect();
        if messages.is_empty() {
            return Ok(());
        }
        Err(JsonSchemaError::Client {
            status: STATUS_BAD_REQUEST,
            detail: Some(messages.join("; ")),
        })
    }
}

/// Reads and parses one schema file within the size limit.
fn read_schema_file(path: &Path) -> Result<Value, GatewayBuildError> {
    let display = path.display();
    let metadata = fs::metadata(path)
        .map_err(|err| GatewayBuildError::Schema(format!("failed to read {display}: {err}")))?;
    if metadata.len() > MAX_SCHEMA_FILE_BYTES {
        return Err(GatewayBuildError::Schema(format!("{display} exceeds size limit")));
    }
    let bytes = fs::read(path)
        .map_err(|err| GatewayBuildError::Schema(format!("failed to read {display}: {err}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|err| GatewayBuildError::Schema(format!("{display} is not valid json: {err}")))
}
