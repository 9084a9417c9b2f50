// crates/errand-validation-config/src/config.rs
// ============================================================================
// Module: Errand Validation Configuration
// Description: Configuration loading and validation for errand validators.
// Purpose: Provide strict, fail-closed config parsing with gateway builders.
// Dependencies: errand-validation-core, errand-validation-gateways, serde, toml
// ============================================================================

//! ## Overview
//! This module defines the `errand-validation.toml` model. The file is
//! resolved from an explicit path, the `ERRAND_VALIDATION_CONFIG`
//! environment variable, or the default name in the working directory.
//! Invariants:
//! - Config files larger than 1 MiB or not UTF-8 are rejected.
//! - Unknown keys are rejected in every section.
//! - Remote gateways must pass [`HttpGatewayConfig::validate`] before use.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use errand_validation_core::ErrandGateways;
use errand_validation_core::ErrandValidators;
use errand_validation_core::FileValidationAuditSink;
use errand_validation_core::NoopValidationAuditSink;
use errand_validation_core::SharedJsonSchemaGateway;
use errand_validation_core::SharedMetadataGateway;
use errand_validation_core::SharedTagGateway;
use errand_validation_core::StderrValidationAuditSink;
use errand_validation_core::ValidationAuditSink;
use errand_validation_gateways::HttpGatewayConfig;
use errand_validation_gateways::HttpJsonSchemaGateway;
use errand_validation_gateways::HttpMetadataGateway;
use errand_validation_gateways::HttpTagGateway;
use errand_validation_gateways::LocalJsonSchemaGateway;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Limits and Defaults
// ============================================================================

/// Default config file name.
const DEFAULT_CONFIG_NAME: &str = "errand-validation.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "ERRAND_VALIDATION_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;

// ============================================================================
// SECTION: Configuration Model
// ============================================================================

/// Errand validation configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ErrandValidationConfig {
    /// Metadata service endpoint.
    pub metadata: HttpGatewayConfig,
    /// Tag service endpoint.
    pub tags: HttpGatewayConfig,
    /// JSON-schema validation backend.
    #[serde(default)]
    pub json_schema: JsonSchemaConfig,
    /// Audit sink configuration.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl ErrandValidationConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_gateway("metadata", &self.metadata)?;
        validate_gateway("tags", &self.tags)?;
        self.json_schema.validate()?;
        self.audit.validate()
    }

    /// Builds the metadata gateway.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the gateway cannot be built.
    pub fn build_metadata_gateway(&self) -> Result<SharedMetadataGateway, ConfigError> {
        let gateway = HttpMetadataGateway::new(&self.metadata)
            .map_err(|err| ConfigError::Invalid(format!("metadata: {err}")))?;
        Ok(Arc::new(gateway))
    }

    /// Builds the tag gateway.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the gateway cannot be built.
    pub fn build_tag_gateway(&self) -> Result<SharedTagGateway, ConfigError> {
        let gateway = HttpTagGateway::new(&self.tags)
            .map_err(|err| ConfigError::Invalid(format!("tags: {err}")))?;
        Ok(Arc::new(gateway))
    }

    /// Builds every gateway the validators need.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when any gateway cannot be built.
    pub fn build_gateways(&self) -> Result<ErrandGateways, ConfigError> {
        Ok(ErrandGateways {
            metadata: self.build_metadata_gateway()?,
            tags: self.build_tag_gateway()?,
            json_schema: self.json_schema.build_gateway()?,
        })
    }

    /// Builds the validator set with the configured audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a gateway or the audit sink cannot be built.
    pub fn build_validators(&self) -> Result<ErrandValidators, ConfigError> {
        let gateways = self.build_gateways()?;
        let audit = self.audit.build_sink()?;
        Ok(ErrandValidators::new(gateways).with_audit_sink(audit))
    }
}

// ============================================================================
// SECTION: JSON Schema Backend
// ============================================================================

/// JSON-schema backend selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JsonSchemaMode {
    /// Validate through the remote schema service.
    #[default]
    Remote,
    /// Validate against schema files compiled in process.
    Local,
}

/// JSON-schema backend configuration.
///
/// # Invariants
/// - Remote mode requires `base_url`; local mode requires `schema_dir`.
/// - Keys belonging to the other mode are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JsonSchemaConfig {
    /// Backend selection.
    pub mode: JsonSchemaMode,
    /// Schema service base URL (remote mode).
    pub base_url: Option<String>,
    /// Allow cleartext HTTP (remote mode).
    pub allow_http: bool,
    /// Request timeout in milliseconds (remote mode).
    pub timeout_ms: u64,
    /// Maximum response size in bytes (remote mode).
    pub max_response_bytes: usize,
    /// User agent for outbound requests (remote mode).
    pub user_agent: String,
    /// Optional bearer token (remote mode).
    pub bearer_token: Option<String>,
    /// Directory of `<schemaId>.json` files (local mode).
    pub schema_dir: Option<PathBuf>,
}

impl Default for JsonSchemaConfig {
    fn default() -> Self {
        let http = HttpGatewayConfig::default();
        Self {
            mode: JsonSchemaMode::Remote,
            base_url: None,
            allow_http: http.allow_http,
            timeout_ms: http.timeout_ms,
            max_response_bytes: http.max_response_bytes,
            user_agent: http.user_agent,
            bearer_token: None,
            schema_dir: None,
        }
    }
}

impl JsonSchemaConfig {
    /// Returns the remote endpoint settings, when a base URL is configured.
    #[must_use]
    pub fn remote(&self) -> Option<HttpGatewayConfig> {
        let base_url = self.base_url.clone()?;
        Some(HttpGatewayConfig {
            base_url,
            allow_http: self.allow_http,
            timeout_ms: self.timeout_ms,
            max_response_bytes: self.max_response_bytes,
            user_agent: self.user_agent.clone(),
            bearer_token: self.bearer_token.clone(),
        })
    }

    /// Validates the backend settings for the selected mode.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the settings do not fit the mode.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.mode {
            JsonSchemaMode::Remote => {
                if self.schema_dir.is_some() {
                    return Err(ConfigError::Invalid(
                        "json_schema.schema_dir is only valid in local mode".to_string(),
                    ));
                }
                let Some(remote) = self.remote() else {
                    return Err(ConfigError::Invalid(
                        "json_schema.base_url is required in remote mode".to_string(),
                    ));
                };
                validate_gateway("json_schema", &remote)
            }
            JsonSchemaMode::Local => {
                if self.base_url.is_some() {
                    return Err(ConfigError::Invalid(
                        "json_schema.base_url is only valid in remote mode".to_string(),
                    ));
                }
                let Some(dir) = &self.schema_dir else {
                    return Err(ConfigError::Invalid(
                        "json_schema.schema_dir is required in local mode".to_string(),
                    ));
                };
                validate_path_string("json_schema.schema_dir", &dir.to_string_lossy())
            }
        }
    }

    /// Builds the JSON-schema gateway for the selected mode.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the gateway cannot be built or
    /// the schema directory cannot be loaded.
    pub fn build_gateway(&self) -> Result<SharedJsonSchemaGateway, ConfigError> {
        self.validate()?;
        let gateway: SharedJsonSchemaGateway = match (self.mode, &self.schema_dir) {
            (JsonSchemaMode::Local, Some(dir)) => Arc::new(
                LocalJsonSchemaGateway::from_dir(dir)
                    .map_err(|err| ConfigError::Invalid(format!("json_schema: {err}")))?,
            ),
            _ => {
                let remote = self.remote().ok_or_else(|| {
                    ConfigError::Invalid("json_schema.base_url is required".to_string())
                })?;
                Arc::new(
                    HttpJsonSchemaGateway::new(&remote)
                        .map_err(|err| ConfigError::Invalid(format!("json_schema: {err}")))?,
                )
            }
        };
        Ok(gateway)
    }
}

// ============================================================================
// SECTION: Audit
// ============================================================================

/// Audit sink configuration.
///
/// # Invariants
/// - Disabled audit discards events; an absent `path` logs to stderr.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuditConfig {
    /// Whether audit events are recorded.
    pub enabled: bool,
    /// JSON-lines file receiving events.
    pub path: Option<PathBuf>,
}

impl AuditConfig {
    /// Validates the audit settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the path is unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.path {
            Some(path) => validate_path_string("audit.path", &path.to_string_lossy()),
            None => Ok(()),
        }
    }

    /// Builds the configured audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the audit file cannot be opened.
    pub fn build_sink(&self) -> Result<Arc<dyn ValidationAuditSink>, ConfigError> {
        if !self.enabled {
            return Ok(Arc::new(NoopValidationAuditSink));
        }
        match &self.path {
            Some(path) => {
                let sink = FileValidationAuditSink::new(path)
                    .map_err(|err| ConfigError::Io(format!("audit.path: {err}")))?;
                Ok(Arc::new(sink))
            }
            None => Ok(Arc::new(StderrValidationAuditSink)),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a configured path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates one remote gateway section, prefixing errors with its name.
fn validate_gateway(section: &str, config: &HttpGatewayConfig) -> Result<(), ConfigError> {
    config.validate().map(|_| ()).map_err(|err| ConfigError::Invalid(format!("{section}: {err}")))
}
