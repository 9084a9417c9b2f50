// crates/errand-validation-gateways/src/lib.rs
// ============================================================================
// Module: Errand Validation Gateways
// Description: HTTP and local implementations of the validator gateways.
// Purpose: Connect validators to metadata, tag, and JSON-schema services.
// Dependencies: errand-validation-core, jsonschema, reqwest, serde
// ============================================================================

//! ## Overview
//! This crate ships blocking HTTP clients for the metadata, tag, and
//! JSON-schema services, plus an in-process JSON-schema gateway. Remote
//! gateways enforce scheme restrictions, timeouts, and response size limits,
//! and never follow redirects.
//! Invariants:
//! - Caller-supplied path values are percent-encoded path segments.
//! - Responses exceeding configured limits fail closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;
pub mod json_schema;
pub mod metadata;
pub mod tags;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use client::GatewayBuildError;
pub use client::HttpGatewayConfig;
pub use client::MAX_RESPONSE_BYTES_LIMIT;
pub use client::MAX_TIMEOUT_MS;
pub use client::MIN_TIMEOUT_MS;
pub use json_schema::HttpJsonSchemaGateway;
pub use json_schema::LocalJsonSchemaGateway;
pub use metadata::HttpMetadataGateway;
pub use tags::HttpTagGateway;
