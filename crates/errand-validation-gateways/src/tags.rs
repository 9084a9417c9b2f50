// crates/errand-validation-gateways/src/tags.rs
// ============================================================================
// Module: HTTP Tag Gateway
// Description: Tag service client for status, type, and client-id tags.
// Purpose: Serve tag allow-lists to validators over HTTP.
// Dependencies: errand-validation-core, reqwest
// ============================================================================

//! ## Overview
//! Status and type tags are scoped under `{base}/{municipalityId}/{namespace}/tags`;
//! client identifier tags are global under `{base}/tags/clientids`. Every
//! resource is a JSON array of tag names. A missing resource (404) is an
//! empty list.

// ============================================================================
// SECTION: Imports
// ============================================================================

use errand_validation_core::GatewayError;
use errand_validation_core::MunicipalityId;
use errand_validation_core::Namespace;
use errand_validation_core::TagGateway;
use reqwest::Url;

use crate::client::GatewayBuildError;
use crate::client::HttpEndpoint;
use crate::client::HttpGatewayConfig;

// ============================================================================
// SECTION: Gateway
// ============================================================================

/// Tag gateway backed by the tag HTTP service.
#[derive(Debug, Clone)]
pub struct HttpTagGateway {
    /// Tag service endpoint.
    endpoint: HttpEndpoint,
}

impl HttpTagGateway {
    /// Creates a tag gateway.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayBuildError`] when the configuration is invalid.
    pub fn new(config: &HttpGatewayConfig) -> Result<Self, GatewayBuildError> {
        Ok(Self {
            endpoint: HttpEndpoint::new(config)?,
        })
    }

    /// Fetches a tag list; 404 yields an empty list.
    fn tags(&self, url: Url) -> Result<Vec<String>, GatewayError> {
        Ok(self.endpoint.fetch_json(url)?.unwrap_or_default())
    }
}

impl TagGateway for HttpTagGateway {
    fn find_all_status_tags(
        &self,
        namespace: &Namespace,
        municipality_id: &MunicipalityId,
    ) -> Result<Vec<String>, GatewayError> {
        let url = self.endpoint.url(&[
            municipality_id.as_str(),
            namespace.as_str(),
            "tags",
            "statustags",
        ]);
        self.tags(url)
    }

    fn find_all_type_tags(
        &self,
        namespace: &Namespace,
        municipality_id: &MunicipalityId,
        category: &str,
    ) -> Result<Vec<String>, GatewayError> {
        let mut url =
            self.endpoint.url(&[municipality_id.as_str(), namespace.as_str(), "tags", "typetags"]);
        url.query_pairs_mut().append_pair("category", category);
        self.tags(url)
    }

    fn find_all_client_id_tags(&self) -> Result<Vec<String>, GatewayError> {
        self.tags(self.endpoint.url(&["tags", "clientids"]))
    }
}
