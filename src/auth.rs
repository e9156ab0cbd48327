//! Authentication and signing utilities for Forkast APIs.
//!
//! This module provides:
//! - EIP-712 `ClobAuth` typed data for wallet attestation
//! - HMAC-SHA256 signing for API key authentication
//! - L1/L2 request header builders
//!
//! # Authentication Levels
//!
//! | Level | Method | Use Case |
//! |-------|--------|----------|
//! | L1 | EIP-712 wallet signature | Mint API credentials |
//! | L2 | HMAC-SHA256 with API secret | List and revoke keys |

mod eip712;
mod headers;
mod signing;

pub use eip712::{
    build_clob_auth_typed_data, compute_clob_auth_digest, ensure_supported_chain, ClobAuth,
    ClobAuthDomain, ClobAuthTypedData, ClobAuthTypes, TypedDataField, AMOY_CHAIN_ID,
    ATTESTATION_MESSAGE, CLOB_AUTH_DOMAIN_NAME, CLOB_AUTH_DOMAIN_VERSION, POLYGON_CHAIN_ID,
    SUPPORTED_CHAIN_IDS,
};
pub use headers::{
    create_l1_headers, create_l2_headers, Headers, SignedRequestContext, FORKAST_ADDRESS,
    FORKAST_API_KEY, FORKAST_NONCE, FORKAST_PASSPHRASE, FORKAST_SIGNATURE, FORKAST_TIMESTAMP,
};
pub use signing::{
    build_hmac_signature, decode_secret, hmac_sha256, sign, signing_string, DigestEncoding,
    HmacSha256,
};
