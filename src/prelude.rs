//! Commonly used types for quick imports.
//!
//! # Example
//!
//! ```rust,ignore
//! use forkast_sdk::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = KeyClient::new(KeysConfig::default())?;
//!     let keys = client.list(&bundle.auth_context()).await?;
//!     Ok(())
//! }
//! ```

// Core
pub use crate::core::{EndpointSet, Error, ForkastError, Result};

// Common types
pub use crate::types::{ApiCredentials, AttestationRequest, AuthContext, CredentialBundle};

// Auth (if enabled)
#[cfg(feature = "auth")]
pub use crate::auth::{create_l1_headers, create_l2_headers, Headers};

#[cfg(feature = "auth")]
pub use crate::wallet::{LocalWallet, WalletSigner};

// Client (if enabled)
#[cfg(feature = "client")]
pub use crate::client::{KeyClient, KeysConfig};

#[cfg(feature = "client")]
pub use crate::session::{EmailSaveOutcome, EmailStore, KeySession};
