//! Forkast API key management client.
//!
//! This module provides a client for the credential endpoints of the Forkast
//! CLOB API:
//!
//! - **Issue**: exchange a wallet attestation for an API key triple
//! - **List**: enumerate the keys held by the authenticated wallet
//! - **Revoke**: delete a key
//!
//! Every call fans out to all configured mirrors. Issuance trusts the first
//! mirror in configuration order that succeeds; listing unions every
//! successful mirror; revocation succeeds if any mirror accepts it.
//!
//! ## Example
//!
//! ```rust,ignore
//! use forkast_sdk::client::{KeyClient, KeysConfig};
//! use forkast_sdk::AttestationRequest;
//!
//! let client = KeyClient::new(KeysConfig::default())?;
//!
//! let request = AttestationRequest::new(address, signature, timestamp, "0")?;
//! let bundle = client.issue(&request).await?;
//!
//! let keys = client.list(&bundle.auth_context()).await?;
//! client.revoke(&bundle.auth_context(), &keys[0]).await?;
//! ```

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::{Quota, RateLimiter as GovRateLimiter};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, info, instrument};
use url::Url;

use super::fanout::{fan_out, AnySuccess, FirstSuccess, UnionKeys};
use super::normalize::{extract_error_message, normalize_credentials, parse_key_list};
use super::transport::{HttpRequest, HttpResponse, HttpTransport, Transport};
use crate::auth::{create_l1_headers, decode_secret, Headers, SignedRequestContext};
use crate::core::{
    configured_endpoints, debug_errors_enabled, sanitize_message, EndpointSet, ForkastError,
    Result,
};
use crate::types::{
    get_current_unix_time_secs, normalize_nonce, shorten_address, ApiCredentials,
    AttestationRequest, AuthContext, CredentialBundle,
};

type RateLimiter = GovRateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Issuance endpoint.
pub const ISSUE_KEY_PATH: &str = "/auth/api-key";
/// Listing endpoint.
pub const LIST_KEYS_PATH: &str = "/auth/api-keys";
/// Revocation endpoint; the key goes in the `apiKey` query parameter.
pub const REVOKE_KEY_PATH: &str = "/auth/api-key";

const ISSUE_FAILED: &str = "Failed to generate API key.";
const LIST_FAILED: &str = "Failed to load keys.";
const REVOKE_FAILED: &str = "Failed to revoke key.";

/// Key management configuration
#[derive(Debug, Clone)]
pub struct KeysConfig {
    /// Mirror base URLs, in priority order
    pub endpoints: Vec<String>,
    /// Per-endpoint request timeout
    pub timeout: Duration,
    /// Rate limit (operations per second)
    pub rate_limit_per_second: u32,
    /// User agent string
    pub user_agent: String,
    /// Append raw backend messages to sanitized errors
    pub debug_errors: bool,
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            // CLOB_URL / RELAYER_URL override the public mirrors
            endpoints: configured_endpoints(),
            timeout: Duration::from_secs(5),
            rate_limit_per_second: 5,
            user_agent: "forkast-sdk/0.1.0".to_string(),
            debug_errors: debug_errors_enabled(),
        }
    }
}

impl KeysConfig {
    /// Create a new configuration builder with defaults.
    #[must_use]
    pub fn builder() -> Self {
        Self::default()
    }

    /// Replace the endpoint list
    #[must_use]
    pub fn with_endpoints<I, S>(mut self, endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.endpoints = endpoints.into_iter().map(Into::into).collect();
        self
    }

    /// Append one endpoint
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoints.push(endpoint.into());
        self
    }

    /// Set per-endpoint timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set rate limit (operations per second)
    #[must_use]
    pub fn with_rate_limit(mut self, rate_limit: u32) -> Self {
        self.rate_limit_per_second = rate_limit;
        self
    }

    /// Set user agent string
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Toggle raw backend messages in errors
    #[must_use]
    pub fn with_debug_errors(mut self, enabled: bool) -> Self {
        self.debug_errors = enabled;
        self
    }
}

/// Credential issuance, listing and revocation across Forkast mirrors.
#[derive(Clone)]
pub struct KeyClient {
    config: KeysConfig,
    transport: Arc<dyn Transport>,
    rate_limiter: Arc<RateLimiter>,
}

impl std::fmt::Debug for KeyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl KeyClient {
    /// Create a client backed by reqwest.
    ///
    /// # Errors
    ///
    /// Returns a config error if the HTTP client cannot be built.
    pub fn new(config: KeysConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client over a custom transport.
    #[must_use]
    pub fn with_transport(config: KeysConfig, transport: Arc<dyn Transport>) -> Self {
        let quota = Quota::per_second(
            NonZeroU32::new(config.rate_limit_per_second).unwrap_or(NonZeroU32::MIN),
        );
        let rate_limiter = Arc::new(GovRateLimiter::direct(quota));

        Self {
            config,
            transport,
            rate_limiter,
        }
    }

    #[must_use]
    pub fn config(&self) -> &KeysConfig {
        &self.config
    }

    /// Resolve the configured mirrors.
    ///
    /// # Errors
    ///
    /// Returns a config error if no endpoint is configured.
    pub fn endpoints(&self) -> Result<EndpointSet> {
        EndpointSet::resolve(&self.config.endpoints)
    }

    /// Wait for rate limiter
    async fn wait_for_rate_limit(&self) {
        self.rate_limiter.until_ready().await;
    }

    /// Mint credentials from a wallet attestation.
    ///
    /// The attestation goes to every mirror; the first mirror in
    /// configuration order that returns credentials is canonical and later
    /// successes are discarded.
    ///
    /// # Errors
    ///
    /// Fails before any network call on a bad nonce or an empty endpoint
    /// list. Otherwise fails only if every mirror failed, with the last
    /// observed error.
    #[instrument(skip(self, request), fields(address = %shorten_address(&request.address)))]
    pub async fn issue(&self, request: &AttestationRequest) -> Result<CredentialBundle> {
        // Header carries the normalized nonce, not the caller's raw field
        let request = AttestationRequest {
            nonce: normalize_nonce(&request.nonce)?,
            ..request.clone()
        };
        let endpoints = self.endpoints()?;
        self.wait_for_rate_limit().await;

        let headers = create_l1_headers(&request);
        debug!(endpoints = endpoints.len(), "Issuing API key");

        let credentials = fan_out(&endpoints, self.config.timeout, "issue", |endpoint| {
            self.issue_on(endpoint, &headers)
        })
        .await
        .aggregate::<FirstSuccess>(|| ForkastError::network_simple(ISSUE_FAILED))?;

        info!(api_key = %credentials.api_key, "API key issued");

        Ok(CredentialBundle::new(credentials, request.address.clone()))
    }

    async fn issue_on(&self, endpoint: &str, headers: &Headers) -> Result<ApiCredentials> {
        let url = endpoint_url(endpoint, ISSUE_KEY_PATH)?;
        let response = self
            .transport
            .send(HttpRequest::new(Method::POST, url, headers.clone()))
            .await?;

        let body = self.check_status(endpoint, response, ISSUE_FAILED)?;
        let payload: Value = serde_json::from_str(&body).map_err(|_| {
            ForkastError::response_shape("Unexpected response when minting API key.", Vec::new())
        })?;

        normalize_credentials(&payload)
    }

    /// List the API keys of the authenticated wallet.
    ///
    /// Keys from every responding mirror are merged, first-seen order, no
    /// duplicates. An empty list is a valid answer.
    ///
    /// # Errors
    ///
    /// Fails if the API secret is not valid base64, if no endpoint is
    /// configured, or if every mirror failed.
    #[instrument(skip(self, auth), fields(address = %shorten_address(&auth.address)))]
    pub async fn list(&self, auth: &AuthContext) -> Result<Vec<String>> {
        decode_secret(&auth.api_secret)?;
        let endpoints = self.endpoints()?;
        self.wait_for_rate_limit().await;

        let keys = fan_out(&endpoints, self.config.timeout, "list", |endpoint| {
            self.list_on(endpoint, auth)
        })
        .await
        .aggregate::<UnionKeys>(|| ForkastError::network_simple(LIST_FAILED))?;

        info!(count = keys.len(), "Listed API keys");

        Ok(keys)
    }

    async fn list_on(&self, endpoint: &str, auth: &AuthContext) -> Result<Vec<String>> {
        let url = endpoint_url(endpoint, LIST_KEYS_PATH)?;
        let signed = SignedRequestContext::sign(
            auth,
            "GET",
            LIST_KEYS_PATH,
            None,
            get_current_unix_time_secs(),
        )?;

        let response = self
            .transport
            .send(HttpRequest::new(Method::GET, url, signed.to_headers()))
            .await?;

        let body = self.check_status(endpoint, response, LIST_FAILED)?;
        let payload: Value = serde_json::from_str(&body).map_err(|_| {
            ForkastError::response_shape("Unexpected response when listing keys.", Vec::new())
        })?;

        parse_key_list(&payload)
    }

    /// Revoke an API key.
    ///
    /// One accepting mirror is enough; the others are assumed to converge.
    /// Mirrors that refused are logged.
    ///
    /// # Errors
    ///
    /// Fails before any network call on an empty key, a malformed secret or
    /// an empty endpoint list; otherwise only if every mirror refused.
    #[instrument(skip(self, auth), fields(address = %shorten_address(&auth.address)))]
    pub async fn revoke(&self, auth: &AuthContext, api_key: &str) -> Result<()> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(ForkastError::validation_field(
                "API key to revoke must not be empty.",
                "apiKey",
            ));
        }
        decode_secret(&auth.api_secret)?;
        let endpoints = self.endpoints()?;
        self.wait_for_rate_limit().await;

        fan_out(&endpoints, self.config.timeout, "revoke", |endpoint| {
            self.revoke_on(endpoint, auth, api_key)
        })
        .await
        .aggregate::<AnySuccess>(|| ForkastError::network_simple(REVOKE_FAILED))?;

        info!("API key revoked");

        Ok(())
    }

    async fn revoke_on(&self, endpoint: &str, auth: &AuthContext, api_key: &str) -> Result<()> {
        let mut url = endpoint_url(endpoint, REVOKE_KEY_PATH)?;
        url.query_pairs_mut().append_pair("apiKey", api_key);
        let path_with_query = path_with_query(&url);

        let signed = SignedRequestContext::sign(
            auth,
            "DELETE",
            &path_with_query,
            None,
            get_current_unix_time_secs(),
        )?;

        let response = self
            .transport
            .send(HttpRequest::new(Method::DELETE, url, signed.to_headers()))
            .await?;

        self.check_status(endpoint, response, REVOKE_FAILED)?;
        Ok(())
    }

    /// Turn a non-2xx response into a sanitized API error.
    fn check_status(
        &self,
        endpoint: &str,
        response: HttpResponse,
        default_message: &str,
    ) -> Result<String> {
        if response.is_success() {
            return Ok(response.body);
        }

        let status = response.status;
        let raw = extract_error_message(&response.body)
            .unwrap_or_else(|| default_message.to_string());
        debug!(endpoint, status, message = %raw, "Forkast rejected request");

        Err(ForkastError::api_at(
            status,
            sanitize_message(Some(status), &raw, self.config.debug_errors),
            endpoint,
        ))
    }
}

/// Join an absolute API path onto a mirror base URL.
fn endpoint_url(endpoint: &str, path: &str) -> Result<Url> {
    Ok(Url::parse(endpoint)?.join(path)?)
}

/// Path plus query exactly as it appears on the wire.
fn path_with_query(url: &Url) -> String {
    match url.query() {
        Some(query) if !query.is_empty() => format!("{}?{}", url.path(), query),
        _ => url.path().to_string(),
    }
}
