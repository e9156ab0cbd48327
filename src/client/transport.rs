//! HTTP transport seam.
//!
//! [`KeyClient`](super::KeyClient) only needs "send this request, give me the
//! status and body". The default implementation is reqwest; tests plug in
//! scripted mirrors.

use async_trait::async_trait;
use std::time::Duration;

use reqwest::{Client, Method};
use tracing::debug;
use url::Url;

use super::KeysConfig;
use crate::auth::Headers;
use crate::core::{ForkastError, Result};

/// Outbound request to one endpoint.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Headers,
}

impl HttpRequest {
    #[must_use]
    pub fn new(method: Method, url: Url, headers: Headers) -> Self {
        Self {
            method,
            url,
            headers,
        }
    }
}

/// Raw response from one endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request. Non-2xx statuses are responses, not errors.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    /// Build the HTTP client from config.
    ///
    /// # Errors
    ///
    /// Returns a config error if the client cannot be constructed.
    pub fn new(config: &KeysConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()
            .map_err(|e| ForkastError::config(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            timeout: config.timeout,
        })
    }

    fn map_error(&self, err: reqwest::Error, request: &str) -> ForkastError {
        if err.is_timeout() {
            ForkastError::timeout(self.timeout, request)
        } else {
            err.into()
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        debug!(method = %request.method, url = %request.url, "Sending request");
        let label = format!("{} {}", request.method, request.url);

        let mut req_builder = self.client.request(request.method, request.url);
        for (key, value) in &request.headers {
            req_builder = req_builder.header(*key, value);
        }

        let response = req_builder
            .send()
            .await
            .map_err(|e| self.map_error(e, &label))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_error(e, &label))?;

        Ok(HttpResponse { status, body })
    }
}
