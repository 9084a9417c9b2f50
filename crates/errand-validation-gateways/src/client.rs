// crates/errand-validation-gateways/src/client.rs
// ============================================================================
// Module: HTTP Gateway Client
// Description: Shared blocking HTTP plumbing for remote gateways.
// Purpose: Build bounded requests against a validated base URL.
// Dependencies: reqwest, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Every remote gateway talks to one base URL through an [`HttpEndpoint`].
//! Endpoints enforce scheme restrictions, a request timeout, a response size
//! limit, and disabled redirects. Path segments are appended through the URL
//! API so caller-supplied values (namespaces, categories, schema ids) are
//! percent-encoded and cannot alter the path structure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Read;
use std::time::Duration;

use errand_validation_core::GatewayError;
use reqwest::StatusCode;
use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::blocking::RequestBuilder;
use reqwest::blocking::Response;
use reqwest::header::ACCEPT;
use reqwest::header::AUTHORIZATION;
use reqwest::header::CONTENT_TYPE;
use reqwest::header::HeaderValue;
use reqwest::redirect::Policy;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Minimum request timeout in milliseconds.
pub const MIN_TIMEOUT_MS: u64 = 100;
/// Maximum request timeout in milliseconds.
pub const MAX_TIMEOUT_MS: u64 = 60_000;
/// Upper bound for `max_response_bytes`.
pub const MAX_RESPONSE_BYTES_LIMIT: usize = 16 * 1024 * 1024;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for a remote gateway endpoint.
///
/// # Invariants
/// - `allow_http = false` blocks cleartext `http://` base URLs.
/// - `max_response_bytes` is enforced as a hard upper bound on response bodies.
/// - `timeout_ms` applies to the full request lifecycle.
/// - Base URLs with embedded credentials are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpGatewayConfig {
    /// Base URL every request path is appended to.
    pub base_url: String,
    /// Allow cleartext HTTP (disabled by default).
    pub allow_http: bool,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum response size allowed, in bytes.
    pub max_response_bytes: usize,
    /// User agent string for outbound requests.
    pub user_agent: String,
    /// Optional bearer token sent with every request.
    pub bearer_token: Option<String>,
}

impl Default for HttpGatewayConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            allow_http: false,
            timeout_ms: 5_000,
            max_response_bytes: 1024 * 1024,
            user_agent: "errand-validation/0.1".to_string(),
            bearer_token: None,
        }
    }
}

impl HttpGatewayConfig {
    /// Creates a configuration for `base_url` with default limits.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Validates limits and the base URL, returning the parsed URL.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayBuildError::InvalidConfig`] when a limit is out of
    /// range or the base URL is unusable.
    pub fn validate(&self) -> Result<Url, GatewayBuildError> {
        if !(MIN_TIMEOUT_MS..=MAX_TIMEOUT_MS).contains(&self.timeout_ms) {
            return Err(GatewayBuildError::InvalidConfig(format!(
                "timeout_ms must be between {MIN_TIMEOUT_MS} and {MAX_TIMEOUT_MS}"
            )));
        }
        if !(1..=MAX_RESPONSE_BYTES_LIMIT).contains(&self.max_response_bytes) {
            return Err(GatewayBuildError::InvalidConfig(format!(
                "max_response_bytes must be between 1 and {MAX_RESPONSE_BYTES_LIMIT}"
            )));
        }
        let url = Url::parse(&self.base_url)
            .map_err(|_| GatewayBuildError::InvalidConfig("invalid base_url".to_string()))?;
        match url.scheme() {
            "https" => {}
            "http" if self.allow_http => {}
            "http" => {
                return Err(GatewayBuildError::InvalidConfig(
                    "http base_url requires allow_http".to_string(),
                ));
            }
            _ => {
                return Err(GatewayBuildError::InvalidConfig(
                    "unsupported base_url scheme".to_string(),
                ));
            }
        }
        if !url.username().is_empty() || url.password().is_some() {
            return Err(GatewayBuildError::InvalidConfig(
                "base_url credentials are not allowed".to_string(),
            ));
        }
        if url.cannot_be_a_base() || url.host_str().is_none() {
            return Err(GatewayBuildError::InvalidConfig("base_url requires a host".to_string()));
        }
        Ok(url)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Gateway construction failures.
///
/// # Invariants
/// - Variants are stable for error classification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayBuildError {
    /// Configuration is invalid.
    #[error("invalid gateway configuration: {0}")]
    InvalidConfig(String),
    /// The HTTP client could not be built.
    #[error("http client build failed")]
    ClientBuild,
    /// A schema could not be loaded or compiled.
    #[error("schema error: {0}")]
    Schema(String),
}

/// Response body read failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub(crate) enum BodyError {
    /// The body is larger than the configured limit.
    #[error("response exceeds size limit")]
    TooLarge,
    /// The body is shorter than its declared length.
    #[error("response truncated")]
    Truncated,
    /// The body could not be read.
    #[error("failed to read response")]
    Read,
}

// ============================================================================
// SECTION: Endpoint
// ============================================================================

/// Validated base URL with a bounded HTTP client.
///
/// # Invariants
/// - `base_url` can be a base and carries no credentials.
/// - Redirects are never followed.
#[derive(Debug, Clone)]
pub(crate) struct HttpEndpoint {
    /// Base URL every request path is appended to.
    base_url: Url,
    /// HTTP client configured with the timeout and redirect policy.
    client: Client,
    /// Maximum response size allowed, in bytes.
    max_response_bytes: usize,
    /// Authorization header value, when a bearer token is configured.
    authorization: Option<HeaderValue>,
}

impl HttpEndpoint {
    /// Builds an endpoint from a gateway configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayBuildError`] when the configuration is invalid or the
    /// client cannot be built.
    pub(crate) fn new(config: &HttpGatewayConfig) -> Result<Self, GatewayBuildError> {
        let base_url = config.validate()?;
        let authorization = config
            .bearer_token
            .as_ref()
            .map(|token| {
                HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                    GatewayBuildError::InvalidConfig("invalid bearer_token".to_string())
                })
            })
            .transpose()?;
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .redirect(Policy::none())
            .build()
            .map_err(|_| GatewayBuildError::ClientBuild)?;
        Ok(Self {
            base_url,
            client,
            max_response_bytes: config.max_response_bytes,
            authorization,
        })
    }

    /// Returns the base URL extended with percent-encoded path segments.
    pub(crate) fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Starts a GET request carrying the configured headers.
    pub(crate) fn get(&self, url: Url) -> RequestBuilder {
        self.authorize(self.client.get(url).header(ACCEPT, "application/json"))
    }

    /// Starts a JSON POST request carrying the configured headers.
    pub(crate) fn post_json(&self, url: Url, body: Vec<u8>) -> RequestBuilder {
        self.authorize(
            self.client
                .post(url)
                .header(ACCEPT, "application/json")
                .header(CONTENT_TYPE, "application/json")
                .body(body),
        )
    }

    /// Adds the authorization header when configured.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.authorization {
            Some(value) => request.header(AUTHORIZATION, value.clone()),
            None => request,
        }
    }

    /// Fetches and decodes a JSON document; `None` when the resource is absent.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Unavailable`] for transport failures and
    /// non-success statuses, and [`GatewayError::InvalidResponse`] for bodies
    /// that exceed limits or do not decode.
    pub(crate) fn fetch_json<T: DeserializeOwned>(
        &self,
        url: Url,
    ) -> Result<Option<T>, GatewayError> {
        let mut response = self
            .get(url)
            .send()
            .map_err(|err| GatewayError::Unavailable(transport_message(&err).to_string()))?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(GatewayError::Unavailable(format!(
                "request failed with status {}",
                status.as_u16()
            )));
        }
        let body = self
            .read_body(&mut response)
            .map_err(|err| GatewayError::InvalidResponse(err.to_string()))?;
        serde_json::from_slice(&body)
            .map(Some)
            .map_err(|_| GatewayError::InvalidResponse("response is not valid json".to_string()))
    }

    /// Reads the response body while enforcing the size limit.
    pub(crate) fn read_body(&self, response: &mut Response) -> Result<Vec<u8>, BodyError> {
        read_response_limited(response, self.max_response_bytes)
    }
}

/// Classifies a transport failure without echoing URLs.
pub(crate) fn transport_message(err: &reqwest::Error) -> &'static str {
    if err.is_timeout() {
        "request timed out"
    } else if err.is_connect() {
        "connection failed"
    } else {
        "request failed"
    }
}

/// Reads the response body while enforcing a byte limit.
fn read_response_limited(
    response: &mut Response,
    max_bytes: usize,
) -> Result<Vec<u8>, BodyError> {
    let expected_len = response.content_length();
    let max_bytes_u64 = u64::try_from(max_bytes).map_err(|_| BodyError::TooLarge)?;
    if let Some(expected) = expected_len
        && expected > max_bytes_u64
    {
        return Err(BodyError::TooLarge);
    }
    let mut buf = Vec::new();
    let limit = max_bytes_u64.saturating_add(1);
    let mut handle = response.take(limit);
    handle.read_to_end(&mut buf).map_err(|_| BodyError::Read)?;
    if buf.len() > max_bytes {
        return Err(BodyError::TooLarge);
    }
    if let Some(expected) = expected_len {
        let expected = usize::try_from(expected).map_err(|_| BodyError::Truncated)?;
        if buf.len() < expected {
            return Err(BodyError::Truncated);
        }
    }
    Ok(buf)
}
