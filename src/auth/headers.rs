//! Forkast authentication headers.
//!
//! | Level | Headers | Authenticated by |
//! |-------|---------|------------------|
//! | L1 | address, signature, timestamp, nonce | wallet signature |
//! | L2 | address, api key, passphrase, timestamp, signature | HMAC over the request |

use std::collections::HashMap;

use super::signing::build_hmac_signature;
use crate::core::Result;
use crate::types::{AttestationRequest, AuthContext};

pub const FORKAST_ADDRESS: &str = "FORKAST_ADDRESS";
pub const FORKAST_SIGNATURE: &str = "FORKAST_SIGNATURE";
pub const FORKAST_TIMESTAMP: &str = "FORKAST_TIMESTAMP";
pub const FORKAST_NONCE: &str = "FORKAST_NONCE";
pub const FORKAST_API_KEY: &str = "FORKAST_API_KEY";
pub const FORKAST_PASSPHRASE: &str = "FORKAST_PASSPHRASE";

/// Header name to value.
pub type Headers = HashMap<&'static str, String>;

/// L1 headers for credential issuance.
#[must_use]
pub fn create_l1_headers(request: &AttestationRequest) -> Headers {
    HashMap::from([
        (FORKAST_ADDRESS, request.address.clone()),
        (FORKAST_SIGNATURE, request.signature.clone()),
        (FORKAST_TIMESTAMP, request.timestamp.clone()),
        (FORKAST_NONCE, request.nonce.clone()),
    ])
}

/// Per-request L2 signing context.
///
/// Built fresh for every management call; `signature` covers the exact
/// path-with-query string that goes on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequestContext {
    pub address: String,
    pub api_key: String,
    pub passphrase: String,
    pub timestamp: String,
    pub signature: String,
}

impl SignedRequestContext {
    /// Sign a request with the caller's credentials.
    ///
    /// # Errors
    ///
    /// Returns an auth error if the API secret is not valid base64.
    pub fn sign(
        auth: &AuthContext,
        method: &str,
        path_with_query: &str,
        body: Option<&str>,
        timestamp: u64,
    ) -> Result<Self> {
        let timestamp = timestamp.to_string();
        let signature =
            build_hmac_signature(&auth.api_secret, &timestamp, method, path_with_query, body)?;

        Ok(Self {
            address: auth.address.clone(),
            api_key: auth.api_key.clone(),
            passphrase: auth.passphrase.clone(),
            timestamp,
            signature,
        })
    }

    #[must_use]
    pub fn to_headers(&self) -> Headers {
        HashMap::from([
            (FORKAST_ADDRESS, self.address.clone()),
            (FORKAST_API_KEY, self.api_key.clone()),
            (FORKAST_PASSPHRASE, self.passphrase.clone()),
            (FORKAST_TIMESTAMP, self.timestamp.clone()),
            (FORKAST_SIGNATURE, self.signature.clone()),
        ])
    }
}

/// L2 headers for a management call.
///
/// # Errors
///
/// Returns an auth error if the API secret is not valid base64.
pub fn create_l2_headers(
    auth: &AuthContext,
    method: &str,
    path_with_query: &str,
    body: Option<&str>,
    timestamp: u64,
) -> Result<Headers> {
    Ok(SignedRequestContext::sign(auth, method, path_with_query, body, timestamp)?.to_headers())
}
