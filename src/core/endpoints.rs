//! Backend endpoint configuration.
//!
//! Forkast runs redundant mirrors of the same API. Every credential operation
//! fans out over the resolved [`EndpointSet`].

use crate::core::{ForkastError, Result};

/// Default CLOB API base URL.
pub const CLOB_API_BASE: &str = "https://clob.forka.st";

/// Default relayer API base URL.
pub const RELAYER_API_BASE: &str = "https://relayer.forka.st";

const CLOB_URL_ENV: &str = "CLOB_URL";
const RELAYER_URL_ENV: &str = "RELAYER_URL";

/// CLOB base URL, overridable with `CLOB_URL`.
///
/// An override set to an empty string disables this endpoint.
#[must_use]
pub fn clob_api_url() -> String {
    std::env::var(CLOB_URL_ENV).unwrap_or_else(|_| CLOB_API_BASE.to_string())
}

/// Relayer base URL, overridable with `RELAYER_URL`.
#[must_use]
pub fn relayer_api_url() -> String {
    std::env::var(RELAYER_URL_ENV).unwrap_or_else(|_| RELAYER_API_BASE.to_string())
}

/// Raw configured endpoint list, in priority order.
#[must_use]
pub fn configured_endpoints() -> Vec<String> {
    vec![clob_api_url(), relayer_api_url()]
}

/// Ordered, de-duplicated, non-empty set of backend base URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointSet {
    urls: Vec<String>,
}

impl EndpointSet {
    /// Trim, drop empties and de-duplicate, keeping first-seen order.
    ///
    /// # Errors
    ///
    /// Returns a config error when nothing is left, so callers never reach
    /// the network without a target.
    pub fn resolve<I, S>(configured: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut urls: Vec<String> = Vec::new();
        for value in configured {
            let trimmed = value.as_ref().trim();
            if trimmed.is_empty() || urls.iter().any(|url| url == trimmed) {
                continue;
            }
            urls.push(trimmed.to_string());
        }

        if urls.is_empty() {
            return Err(ForkastError::config(format!(
                "{CLOB_URL_ENV} or {RELAYER_URL_ENV} must be defined."
            )));
        }

        Ok(Self { urls })
    }

    /// Primary endpoint (first in resolution order).
    #[must_use]
    pub fn primary(&self) -> &str {
        &self.urls[0]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.urls.iter().map(String::as_str)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.urls
    }
}

impl<'a> IntoIterator for &'a EndpointSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.urls.iter()
    }
}
