// crates/errand-validation-gateways/src/metadata.rs
// ============================================================================
// Module: HTTP Metadata Gateway
// Description: Metadata service client for categories, types, and flags.
// Purpose: Serve scoped reference data to validators over HTTP.
// Dependencies: errand-validation-core, reqwest, serde
// ============================================================================

//! ## Overview
//! Resources live under `{base}/{municipalityId}/{namespace}/metadata`.
//! A missing resource (404) is an empty list or a disabled enforcement flag;
//! every other non-success status is a [`GatewayError`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use errand_validation_core::ContactReasonEntry;
use errand_validation_core::EntityType;
use errand_validation_core::GatewayError;
use errand_validation_core::MetadataEntry;
use errand_validation_core::MetadataGateway;
use errand_validation_core::MunicipalityId;
use errand_validation_core::Namespace;
use serde::Deserialize;

use crate::client::GatewayBuildError;
use crate::client::HttpEndpoint;
use crate::client::HttpGatewayConfig;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Body of the enforcement flag resource.
#[derive(Debug, Deserialize)]
struct ValidationFlagBody {
    /// Whether allow-list validation is active.
    validated: bool,
}

/// Metadata gateway backed by the metadata HTTP service.
#[derive(Debug, Clone)]
pub struct HttpMetadataGateway {
    /// Metadata service endpoint.
    endpoint: HttpEndpoint,
}

impl HttpMetadataGateway {
    /// Creates a metadata gateway.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayBuildError`] when the configuration is invalid.
    pub fn new(config: &HttpGatewayConfig) -> Result<Self, GatewayBuildError> {
        Ok(Self {
            endpoint: HttpEndpoint::new(config)?,
        })
    }

    /// Fetches a list resource below the scope's metadata root.
    fn list<T: serde::de::DeserializeOwned>(
        &self,
        namespace: &Namespace,
        municipality_id: &MunicipalityId,
        resource: &[&str],
    ) -> Result<Vec<T>, GatewayError> {
        let mut segments = vec![municipality_id.as_str(), namespace.as_str(), "metadata"];
        segments.extend_from_slice(resource);
        Ok(self.endpoint.fetch_json(self.endpoint.url(&segments))?.unwrap_or_default())
    }
}

impl MetadataGateway for HttpMetadataGateway {
    fn find_categories(
        &self,
        namespace: &Namespace,
        municipality_id: &MunicipalityId,
    ) -> Result<Vec<MetadataEntry>, GatewayError> {
        self.list(namespace, municipality_id, &["categories"])
    }

    fn find_types(
        &self,
        namespace: &Namespace,
        municipality_id: &MunicipalityId,
        category: &str,
    ) -> Result<Vec<MetadataEntry>, GatewayError> {
        self.list(namespace, municipality_id, &["categories", category, "types"])
    }

    fn find_roles(
        &self,
        namespace: &Namespace,
        municipality_id: &MunicipalityId,
    ) -> Result<Vec<MetadataEntry>, GatewayError> {
        self.list(namespace, municipality_id, &["roles"])
    }

    fn find_statuses(
        &self,
        namespace: &Namespace,
        municipality_id: &MunicipalityId,
    ) -> Result<Vec<MetadataEntry>, GatewayError> {
        self.list(namespace, municipality_id, &["statuses"])
    }

    fn find_contact_reasons(
        &self,
        namespace: &Namespace,
        municipality_id: &MunicipalityId,
    ) -> Result<Vec<ContactReasonEntry>, GatewayError> {
        self.list(namespace, municipality_id, &["contactreasons"])
    }

    fn is_validated(
        &self,
        namespace: &Namespace,
        municipality_id: &MunicipalityId,
        entity_type: EntityType,
    ) -> Result<bool, GatewayError> {
        let url = self.endpoint.url(&[
            municipality_id.as_str(),
            namespace.as_str(),
            "metadata",
            "validation",
            entity_type.as_str(),
        ]);
        let flag: Option<ValidationFlagBody> = self.endpoint.fetch_json(url)?;
        Ok(flag.is_some_and(|flag| flag.validated))
    }
}
