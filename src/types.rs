//! Common types shared by the auth and client modules.

use std::fmt;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::core::{ForkastError, Result};

/// API credentials as returned by the backend, without the owning address.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCredentials {
    pub api_key: String,
    /// Base64-encoded HMAC secret
    pub api_secret: String,
    pub passphrase: String,
}

impl fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("passphrase", &"<redacted>")
            .finish()
    }
}

/// Issued credentials bound to the wallet that minted them.
///
/// Possession of the triple authorizes management of that one key, so the
/// bundle is treated as a capability: never logged, discarded on revoke.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialBundle {
    pub api_key: String,
    pub api_secret: String,
    pub passphrase: String,
    pub address: String,
}

impl CredentialBundle {
    #[must_use]
    pub fn new(credentials: ApiCredentials, address: impl Into<String>) -> Self {
        Self {
            api_key: credentials.api_key,
            api_secret: credentials.api_secret,
            passphrase: credentials.passphrase,
            address: address.into(),
        }
    }

    /// Context for signing management calls with these credentials.
    #[must_use]
    pub fn auth_context(&self) -> AuthContext {
        AuthContext {
            address: self.address.clone(),
            api_key: self.api_key.clone(),
            api_secret: self.api_secret.clone(),
            passphrase: self.passphrase.clone(),
        }
    }

    /// Render as `.env` lines for copy/paste into a trading bot.
    #[must_use]
    pub fn to_env_block(&self) -> String {
        format!(
            "FORKAST_ADDRESS={}\nFORKAST_API_KEY={}\nFORKAST_API_SECRET={}\nFORKAST_PASSPHRASE={}\n",
            self.address, self.api_key, self.api_secret, self.passphrase
        )
    }
}

impl fmt::Debug for CredentialBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialBundle")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("passphrase", &"<redacted>")
            .field("address", &self.address)
            .finish()
    }
}

/// Caller-held credentials used to sign list/revoke requests.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub address: String,
    pub api_key: String,
    pub api_secret: String,
    pub passphrase: String,
}

impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthContext")
            .field("address", &self.address)
            .field("api_key", &self.api_key)
            .finish_non_exhaustive()
    }
}

/// Wallet-signed attestation submitted to mint credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttestationRequest {
    pub address: String,
    /// EIP-712 signature, `0x`-prefixed hex
    pub signature: String,
    /// Unix seconds, as signed
    pub timestamp: String,
    /// Digits-only nonce, as signed
    pub nonce: String,
}

impl AttestationRequest {
    /// Build a request, normalizing the nonce.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a non-numeric nonce.
    pub fn new(
        address: impl Into<String>,
        signature: impl Into<String>,
        timestamp: impl Into<String>,
        nonce: &str,
    ) -> Result<Self> {
        Ok(Self {
            address: with_hex_prefix(address.into()),
            signature: with_hex_prefix(signature.into()),
            timestamp: timestamp.into(),
            nonce: normalize_nonce(nonce)?,
        })
    }
}

fn with_hex_prefix(value: String) -> String {
    if value.starts_with("0x") {
        value
    } else {
        format!("0x{value}")
    }
}

/// Normalize a user-entered nonce.
///
/// Blank input becomes `"0"`. Anything other than ASCII digits, or a value
/// that does not fit in a uint256, is rejected.
///
/// # Errors
///
/// Returns a validation error on the `nonce` field.
pub fn normalize_nonce(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok("0".to_string());
    }
    if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ForkastError::validation_field(
            "Nonce must contain digits only.",
            "nonce",
        ));
    }
    trimmed.parse::<U256>().map_err(|_| {
        ForkastError::validation_field("Nonce is too large for uint256.", "nonce")
    })?;
    Ok(trimmed.to_string())
}

/// Shorten an address for display and logs: `0x1234…abcd`.
#[must_use]
pub fn shorten_address(address: &str) -> String {
    const KEEP: usize = 4;
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= KEEP * 2 + 2 {
        return address.to_string();
    }
    let head: String = chars[..KEEP + 2].iter().collect();
    let tail: String = chars[chars.len() - KEEP..].iter().collect();
    format!("{head}…{tail}")
}

/// Current unix time in seconds.
#[must_use]
pub fn get_current_unix_time_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle() -> CredentialBundle {
        CredentialBundle::new(
            ApiCredentials {
                api_key: "k1".into(),
                api_secret: "c2VjcmV0".into(),
                passphrase: "pass".into(),
            },
            "0xabc",
        )
    }

    #[test]
    fn test_nonce_blank_defaults_to_zero() {
        assert_eq!(normalize_nonce("").unwrap(), "0");
        assert_eq!(normalize_nonce("   ").unwrap(), "0");
        assert_eq!(normalize_nonce(" 42 ").unwrap(), "42");
    }

    #[test]
    fn test_nonce_rejects_non_digits() {
        let err = normalize_nonce("12a3").unwrap_err();
        match err {
            ForkastError::Validation { message, field } => {
                assert_eq!(message, "Nonce must contain digits only.");
                assert_eq!(field.as_deref(), Some("nonce"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(normalize_nonce("-1").is_err());
        assert!(normalize_nonce("1 2").is_err());
    }

    #[test]
    fn test_nonce_rejects_overflow() {
        let too_big = "9".repeat(100);
        assert!(normalize_nonce(&too_big).is_err());
    }

    #[test]
    fn test_attestation_request_prefixes_hex() {
        let req = AttestationRequest::new("abc", "deadbeef", "1700000000", "").unwrap();
        assert_eq!(req.address, "0xabc");
        assert_eq!(req.signature, "0xdeadbeef");
        assert_eq!(req.nonce, "0");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let rendered = format!("{:?}", bundle());
        assert!(rendered.contains("k1"));
        assert!(!rendered.contains("c2VjcmV0"));
        assert!(!rendered.contains("pass\""));

        let ctx = format!("{:?}", bundle().auth_context());
        assert!(!ctx.contains("c2VjcmV0"));
    }

    #[test]
    fn test_env_block() {
        let block = bundle().to_env_block();
        assert_eq!(
            block,
            "FORKAST_ADDRESS=0xabc\nFORKAST_API_KEY=k1\nFORKAST_API_SECRET=c2VjcmV0\nFORKAST_PASSPHRASE=pass\n"
        );
    }

    #[test]
    fn test_shorten_address() {
        assert_eq!(
            shorten_address("0x1234567890abcdef1234567890abcdef12345678"),
            "0x1234…5678"
        );
        assert_eq!(shorten_address("0x1234"), "0x1234");
        assert_eq!(shorten_address(""), "");
    }
}
