//! EIP-712 `ClobAuth` attestation.
//!
//! The wallet signs this payload once to prove control of an address; the
//! backend exchanges the signature for API credentials.

use alloy_primitives::{keccak256, Address, B256, U256};
use serde::{Deserialize, Serialize};

use crate::core::{ForkastError, Result};

/// Fixed sentence bound into every attestation.
pub const ATTESTATION_MESSAGE: &str = "This message attests that I control the given wallet";

/// EIP-712 domain name.
pub const CLOB_AUTH_DOMAIN_NAME: &str = "ClobAuthDomain";

/// EIP-712 domain version.
pub const CLOB_AUTH_DOMAIN_VERSION: &str = "1";

/// Polygon mainnet.
pub const POLYGON_CHAIN_ID: u64 = 137;

/// Polygon Amoy testnet.
pub const AMOY_CHAIN_ID: u64 = 80002;

/// Chains the backend accepts attestations from.
pub const SUPPORTED_CHAIN_IDS: [u64; 2] = [POLYGON_CHAIN_ID, AMOY_CHAIN_ID];

const DOMAIN_TYPE_STR: &str = "EIP712Domain(string name,string version,uint256 chainId)";
const CLOB_AUTH_TYPE_STR: &str =
    "ClobAuth(address address,string timestamp,uint256 nonce,string message)";

/// Reject chains other than Polygon and Amoy.
///
/// # Errors
///
/// Returns a validation error on the `chainId` field.
pub fn ensure_supported_chain(chain_id: u64) -> Result<()> {
    if SUPPORTED_CHAIN_IDS.contains(&chain_id) {
        Ok(())
    } else {
        Err(ForkastError::validation_field(
            "Switch to Polygon Mainnet (137) or Amoy (80002) to continue.",
            "chainId",
        ))
    }
}

/// `ClobAuth` typed data, serialized in the JSON shape wallets expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClobAuthTypedData {
    pub domain: ClobAuthDomain,
    pub types: ClobAuthTypes,
    pub primary_type: String,
    pub message: ClobAuth,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClobAuthDomain {
    pub name: String,
    pub version: String,
    pub chain_id: u64,
}

impl ClobAuthDomain {
    #[must_use]
    pub fn new(chain_id: u64) -> Self {
        Self {
            name: CLOB_AUTH_DOMAIN_NAME.to_string(),
            version: CLOB_AUTH_DOMAIN_VERSION.to_string(),
            chain_id,
        }
    }
}

/// Attestation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClobAuth {
    pub address: String,
    pub timestamp: String,
    pub nonce: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClobAuthTypes {
    #[serde(rename = "ClobAuth")]
    pub clob_auth: Vec<TypedDataField>,
}

impl Default for ClobAuthTypes {
    fn default() -> Self {
        let field = |name: &str, r#type: &str| TypedDataField {
            name: name.to_string(),
            r#type: r#type.to_string(),
        };
        Self {
            clob_auth: vec![
                field("address", "address"),
                field("timestamp", "string"),
                field("nonce", "uint256"),
                field("message", "string"),
            ],
        }
    }
}

/// A single field in a type definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedDataField {
    pub name: String,
    pub r#type: String,
}

/// Build the attestation typed data for a wallet.
///
/// `nonce` must already be normalized (see [`crate::types::normalize_nonce`]).
///
/// # Errors
///
/// Returns a validation error for a malformed address, an unsupported chain
/// or a nonce that is not a uint256.
pub fn build_clob_auth_typed_data(
    address: &str,
    chain_id: u64,
    timestamp: &str,
    nonce: &str,
) -> Result<ClobAuthTypedData> {
    ensure_supported_chain(chain_id)?;
    let parsed: Address = address
        .parse()
        .map_err(|e| ForkastError::validation_field(format!("Invalid wallet address: {e}"), "address"))?;
    parse_nonce(nonce)?;

    Ok(ClobAuthTypedData {
        domain: ClobAuthDomain::new(chain_id),
        types: ClobAuthTypes::default(),
        primary_type: "ClobAuth".to_string(),
        message: ClobAuth {
            address: parsed.to_checksum(None),
            timestamp: timestamp.to_string(),
            nonce: nonce.to_string(),
            message: ATTESTATION_MESSAGE.to_string(),
        },
    })
}

fn parse_nonce(nonce: &str) -> Result<U256> {
    nonce
        .parse()
        .map_err(|e| ForkastError::validation_field(format!("Invalid nonce: {e}"), "nonce"))
}

/// Compute `keccak256(0x1901 || domainSeparator || structHash)`.
///
/// # Errors
///
/// Returns a validation error if the message address or nonce do not parse.
pub fn compute_clob_auth_digest(typed_data: &ClobAuthTypedData) -> Result<B256> {
    let domain_separator = compute_domain_separator(&typed_data.domain);
    let struct_hash = compute_struct_hash(&typed_data.message)?;

    let mut bytes = Vec::with_capacity(2 + 32 + 32);
    bytes.push(0x19);
    bytes.push(0x01);
    bytes.extend_from_slice(domain_separator.as_slice());
    bytes.extend_from_slice(struct_hash.as_slice());

    Ok(keccak256(&bytes))
}

fn compute_domain_separator(domain: &ClobAuthDomain) -> B256 {
    let mut encoded = Vec::with_capacity(32 * 4);
    encoded.extend_from_slice(keccak256(DOMAIN_TYPE_STR.as_bytes()).as_slice());
    encoded.extend_from_slice(keccak256(domain.name.as_bytes()).as_slice());
    encoded.extend_from_slice(keccak256(domain.version.as_bytes()).as_slice());
    encoded.extend_from_slice(&U256::from(domain.chain_id).to_be_bytes::<32>());
    keccak256(&encoded)
}

fn compute_struct_hash(message: &ClobAuth) -> Result<B256> {
    let address: Address = message
        .address
        .parse()
        .map_err(|e| ForkastError::validation_field(format!("Invalid wallet address: {e}"), "address"))?;
    let nonce = parse_nonce(&message.nonce)?;

    let mut encoded = Vec::with_capacity(32 * 5);
    encoded.extend_from_slice(keccak256(CLOB_AUTH_TYPE_STR.as_bytes()).as_slice());

    let mut addr_bytes = [0u8; 32];
    addr_bytes[12..].copy_from_slice(address.as_slice());
    encoded.extend_from_slice(&addr_bytes);

    encoded.extend_from_slice(keccak256(message.timestamp.as_bytes()).as_slice());
    encoded.extend_from_slice(&nonce.to_be_bytes::<32>());
    encoded.extend_from_slice(keccak256(message.message.as_bytes()).as_slice());

    Ok(keccak256(&encoded))
}
