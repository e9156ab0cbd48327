//! Wallet signing seam.
//!
//! The SDK never talks to wallet providers. Whatever holds the key implements
//! [`WalletSigner`]; [`LocalWallet`] covers the private-key case for bots,
//! scripts and tests.

use alloy_primitives::hex;
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;

use crate::auth::{compute_clob_auth_digest, ClobAuthTypedData};
use crate::core::{ForkastError, Result};

/// Anything that can sign a `ClobAuth` attestation for one connected wallet.
#[async_trait]
pub trait WalletSigner: Send + Sync {
    /// Connected wallet address, `0x`-prefixed.
    fn address(&self) -> String;

    /// Chain the wallet is currently on.
    fn chain_id(&self) -> u64;

    /// Sign the typed data and return a `0x`-prefixed 65-byte signature.
    ///
    /// Implementations report a user refusal as
    /// [`AuthErrorKind::SignatureRejected`](crate::core::AuthErrorKind::SignatureRejected).
    async fn sign_typed_data(&self, typed_data: &ClobAuthTypedData) -> Result<String>;
}

/// Private-key wallet.
#[derive(Clone)]
pub struct LocalWallet {
    signer: PrivateKeySigner,
    chain_id: u64,
}

impl LocalWallet {
    #[must_use]
    pub fn new(signer: PrivateKeySigner, chain_id: u64) -> Self {
        Self { signer, chain_id }
    }

    /// Parse a hex private key.
    ///
    /// # Errors
    ///
    /// Returns a config error if the key does not parse.
    pub fn from_private_key(private_key: &str, chain_id: u64) -> Result<Self> {
        let signer: PrivateKeySigner = private_key
            .parse()
            .map_err(|e| ForkastError::config(format!("Invalid private key: {e}")))?;
        Ok(Self::new(signer, chain_id))
    }

    /// Sign synchronously.
    ///
    /// # Errors
    ///
    /// Returns an auth error if hashing or signing fails.
    pub fn sign_typed_data_sync(&self, typed_data: &ClobAuthTypedData) -> Result<String> {
        let digest = compute_clob_auth_digest(typed_data)?;
        let signature = self
            .signer
            .sign_hash_sync(&digest)
            .map_err(|e| ForkastError::auth(format!("Failed to sign attestation: {e}")))?;
        Ok(hex::encode_prefixed(signature.as_bytes()))
    }
}

impl std::fmt::Debug for LocalWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalWallet")
            .field("address", &self.signer.address())
            .field("chain_id", &self.chain_id)
            .finish()
    }
}

#[async_trait]
impl WalletSigner for LocalWallet {
    fn address(&self) -> String {
        self.signer.address().to_checksum(None)
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn sign_typed_data(&self, typed_data: &ClobAuthTypedData) -> Result<String> {
        self.sign_typed_data_sync(typed_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::build_clob_auth_typed_data;
    use alloy_primitives::Signature;

    // Well-known anvil account #0
    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const TEST_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    #[test]
    fn test_local_wallet_address() {
        let wallet = LocalWallet::from_private_key(TEST_KEY, 137).unwrap();
        assert_eq!(wallet.address(), TEST_ADDRESS);
        assert_eq!(wallet.chain_id(), 137);
    }

    #[test]
    fn test_invalid_private_key() {
        assert!(LocalWallet::from_private_key("nope", 137).is_err());
    }

    #[tokio::test]
    async fn test_signature_recovers_to_wallet() {
        let wallet = LocalWallet::from_private_key(TEST_KEY, 137).unwrap();
        let typed = build_clob_auth_typed_data(&wallet.address(), 137, "1700000000", "0").unwrap();

        let sig_hex = wallet.sign_typed_data(&typed).await.unwrap();
        assert!(sig_hex.starts_with("0x"));
        assert_eq!(sig_hex.len(), 2 + 65 * 2);

        let bytes = hex::decode(&sig_hex).unwrap();
        let signature = Signature::try_from(bytes.as_slice()).unwrap();
        let digest = compute_clob_auth_digest(&typed).unwrap();
        let recovered = signature.recover_address_from_prehash(&digest).unwrap();
        assert_eq!(recovered.to_checksum(None), TEST_ADDRESS);
    }

    #[test]
    fn test_signing_is_deterministic() {
        let wallet = LocalWallet::from_private_key(TEST_KEY, 80002).unwrap();
        let typed = build_clob_auth_typed_data(&wallet.address(), 80002, "1", "3").unwrap();
        assert_eq!(
            wallet.sign_typed_data_sync(&typed).unwrap(),
            wallet.sign_typed_data_sync(&typed).unwrap()
        );
    }
}
