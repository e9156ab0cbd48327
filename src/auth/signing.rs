//! HMAC-SHA256 signing with base64 secrets.
//!
//! Forkast hands out secrets as base64 (standard or URL-safe, padding
//! optional). Request signatures are URL-safe base64 without padding; some
//! attestation-adjacent flows expect `0x`-prefixed hex instead, so both
//! encodings are available per call site.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE_NO_PAD};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::core::{ForkastError, Result};

/// HMAC-SHA256 type alias.
pub type HmacSha256 = Hmac<Sha256>;

const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

/// Output encoding of a digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestEncoding {
    /// Lowercase hex with a `0x` prefix
    HexPrefixed,
    /// URL-safe base64, no padding
    Base64UrlNoPad,
}

impl DigestEncoding {
    fn encode(self, digest: &[u8]) -> String {
        match self {
            Self::HexPrefixed => alloy_primitives::hex::encode_prefixed(digest),
            Self::Base64UrlNoPad => URL_SAFE_NO_PAD.encode(digest),
        }
    }
}

/// Decode a base64 secret, accepting either alphabet and optional padding.
///
/// # Errors
///
/// Returns an auth error if the secret is not valid base64. A corrupted
/// secret must never yield a digest.
pub fn decode_secret(secret_b64: &str) -> Result<Vec<u8>> {
    let compact: String = secret_b64.chars().filter(|c| !c.is_whitespace()).collect();
    let engine = if compact.contains(['-', '_']) {
        &URL_SAFE_LENIENT
    } else {
        &STANDARD_LENIENT
    };
    engine
        .decode(compact.as_bytes())
        .map_err(|e| ForkastError::auth(format!("Invalid base64 secret: {e}")))
}

/// Raw HMAC-SHA256 of `message` keyed by the decoded secret.
///
/// # Errors
///
/// Returns an auth error if the secret is not valid base64.
pub fn hmac_sha256(secret_b64: &str, message: &str) -> Result<[u8; 32]> {
    let secret_bytes = decode_secret(secret_b64)?;

    let mut mac = HmacSha256::new_from_slice(&secret_bytes)
        .map_err(|e| ForkastError::auth(format!("HMAC initialization failed: {e}")))?;
    mac.update(message.as_bytes());

    Ok(mac.finalize().into_bytes().into())
}

/// Sign `message` and encode the digest.
///
/// # Errors
///
/// Returns an auth error if the secret is not valid base64.
pub fn sign(secret_b64: &str, message: &str, encoding: DigestEncoding) -> Result<String> {
    Ok(encoding.encode(&hmac_sha256(secret_b64, message)?))
}

/// Canonical signing string: `timestamp + METHOD + path_with_query + body`.
#[must_use]
pub fn signing_string(timestamp: &str, method: &str, path_with_query: &str, body: Option<&str>) -> String {
    let mut message = format!("{timestamp}{}{path_with_query}", method.to_uppercase());
    if let Some(b) = body {
        message.push_str(b);
    }
    message
}

/// Build the request signature used in `FORKAST_SIGNATURE` headers.
///
/// # Errors
///
/// Returns an auth error if the secret is not valid base64.
pub fn build_hmac_signature(
    secret_b64: &str,
    timestamp: &str,
    method: &str,
    path_with_query: &str,
    body: Option<&str>,
) -> Result<String> {
    let message = signing_string(timestamp, method, path_with_query, body);
    sign(secret_b64, &message, DigestEncoding::Base64UrlNoPad)
}
