//! # Forkast SDK
//!
//! Wallet-attested API credentials for the [Forkast](https://forka.st) CLOB.
//!
//! ## Features
//!
//! - **Attestation** - EIP-712 `ClobAuth` typed data, signed by any wallet
//! - **Key Management** - Issue, list and revoke API keys
//! - **Request Signing** - HMAC-SHA256 L2 headers
//! - **Mirror Fan-out** - Every call hits all configured endpoints concurrently
//! - **Safe Errors** - Backend messages are sanitized before they reach users
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use forkast_sdk::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let private_key = std::env::var("PRIVATE_KEY").unwrap_or_default();
//!     let wallet = LocalWallet::from_private_key(&private_key, 137)?;
//!     let mut session = KeySession::new(KeyClient::new(KeysConfig::default())?);
//!
//!     let outcome = session.generate(&wallet, "0", None).await?;
//!     print!("{}", outcome.bundle.to_env_block());
//!
//!     let keys = session.refresh().await?;
//!     println!("{} active keys", keys.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`core`] - Error handling, endpoint configuration, error sanitizing
//! - [`types`] - Credentials, attestation requests, nonce handling
//! - [`auth`] - Authentication (EIP-712, HMAC, L1/L2 headers)
//! - [`wallet`] - Wallet signing seam and private-key wallet
//! - [`client`] - Credential REST client with mirror fan-out
//! - [`session`] - Key lifecycle for one connected wallet

#![cfg_attr(docsrs, feature(doc_cfg))]

// Core infrastructure
pub mod core;

// Type definitions
pub mod types;

// Authentication
#[cfg(feature = "auth")]
#[cfg_attr(docsrs, doc(cfg(feature = "auth")))]
pub mod auth;

// Wallet signing
#[cfg(feature = "auth")]
#[cfg_attr(docsrs, doc(cfg(feature = "auth")))]
pub mod wallet;

// API client
#[cfg(feature = "client")]
#[cfg_attr(docsrs, doc(cfg(feature = "client")))]
pub mod client;

// Key lifecycle
#[cfg(feature = "client")]
#[cfg_attr(docsrs, doc(cfg(feature = "client")))]
pub mod session;

// Prelude for convenient imports
pub mod prelude;

// ============================================================================
// Core Re-exports (always available)
// ============================================================================

pub use crate::core::{
    clob_api_url, relayer_api_url, sanitize_message, AuthErrorKind, EndpointSet, CLOB_API_BASE,
    RELAYER_API_BASE,
};
pub use crate::core::{Error, ForkastError, Result};

// ============================================================================
// Type Re-exports (always available)
// ============================================================================

pub use types::{
    get_current_unix_time_secs, normalize_nonce, shorten_address, ApiCredentials,
    AttestationRequest, AuthContext, CredentialBundle,
};

// ============================================================================
// Auth Re-exports
// ============================================================================

#[cfg(feature = "auth")]
pub use auth::{
    build_clob_auth_typed_data, build_hmac_signature, compute_clob_auth_digest,
    create_l1_headers, create_l2_headers, ClobAuth, ClobAuthTypedData, Headers,
    SignedRequestContext,
};

#[cfg(feature = "auth")]
pub use wallet::{LocalWallet, WalletSigner};

// ============================================================================
// Client Re-exports
// ============================================================================

#[cfg(feature = "client")]
pub use client::{HttpTransport, KeyClient, KeysConfig, Transport};

#[cfg(feature = "client")]
pub use session::{EmailSaveOutcome, EmailStore, GenerateOutcome, KeySession};
