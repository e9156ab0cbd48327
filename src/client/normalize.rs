//! Response payload normalization.
//!
//! Mirrors have shipped several spellings of the credential fields over time.
//! Each canonical field has an ordered list of accepted names; adding a new
//! spelling is a one-line change here.

use serde_json::{Map, Value};

use crate::core::{ForkastError, Result};
use crate::types::ApiCredentials;

pub const API_KEY_FIELDS: &[&str] = &["apiKey", "api_key", "key", "id"];

pub const API_SECRET_FIELDS: &[&str] = &[
    "apiSecret",
    "api_secret",
    "apiSecretBase64",
    "api_secret_base64",
    "secret",
    "secretKey",
    "secret_key",
];

pub const PASSPHRASE_FIELDS: &[&str] = &[
    "passphrase",
    "api_passphrase",
    "passphraseHex",
    "passphrase_hex",
    "api_passphrase_hex",
];

const UNEXPECTED_MINT_RESPONSE: &str = "Unexpected response when minting API key.";
const UNEXPECTED_LIST_RESPONSE: &str = "Unexpected response when listing keys.";

/// Unwrap a `data` envelope if present.
fn unwrap_record(payload: &Value) -> Option<&Map<String, Value>> {
    let record = payload.as_object()?;
    match record.get("data") {
        Some(Value::Object(inner)) => Some(inner),
        _ => Some(record),
    }
}

/// First non-empty string among `keys`.
fn read_first(record: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| record.get(*key).and_then(Value::as_str))
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

/// Map an issuance payload to canonical credentials.
///
/// # Errors
///
/// Returns a response shape error naming the keys that were present when any
/// field cannot be resolved.
pub fn normalize_credentials(payload: &Value) -> Result<ApiCredentials> {
    let record = unwrap_record(payload)
        .ok_or_else(|| ForkastError::response_shape(UNEXPECTED_MINT_RESPONSE, Vec::new()))?;

    let api_key = read_first(record, API_KEY_FIELDS);
    let api_secret = read_first(record, API_SECRET_FIELDS);
    let passphrase = read_first(record, PASSPHRASE_FIELDS);

    match (api_key, api_secret, passphrase) {
        (Some(api_key), Some(api_secret), Some(passphrase)) => Ok(ApiCredentials {
            api_key,
            api_secret,
            passphrase,
        }),
        _ => {
            let keys: Vec<String> = record.keys().cloned().collect();
            let listed = if keys.is_empty() {
                "none".to_string()
            } else {
                keys.join(", ")
            };
            Err(ForkastError::response_shape(
                format!("Forkast did not return API credentials. Payload keys: {listed}"),
                keys,
            ))
        }
    }
}

/// Parse a listing payload, keeping string entries only.
///
/// # Errors
///
/// Returns a response shape error if the payload is not an array.
pub fn parse_key_list(payload: &Value) -> Result<Vec<String>> {
    let entries = payload
        .as_array()
        .ok_or_else(|| ForkastError::response_shape(UNEXPECTED_LIST_RESPONSE, Vec::new()))?;

    Ok(entries
        .iter()
        .filter_map(Value::as_str)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .collect())
}

/// Backend error text from a JSON body: `message`, then `error`.
#[must_use]
pub fn extract_error_message(body: &str) -> Option<String> {
    let payload: Value = serde_json::from_str(body).ok()?;
    let record = payload.as_object()?;
    ["message", "error"]
        .iter()
        .find_map(|key| record.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}
