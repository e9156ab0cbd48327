//! Key lifecycle for one connected wallet.
//!
//! [`KeySession`] owns the active [`CredentialBundle`] (if any) and the last
//! known key list, and keeps both consistent with what the backend reports:
//!
//! | Event | Bundle | Keys |
//! |-------|--------|------|
//! | `generate` ok | replaced | new key prepended |
//! | `refresh` ok | kept | replaced |
//! | `refresh` 401/403 | dropped | cleared |
//! | `refresh` other error | kept | cleared |
//! | `revoke` of active key | dropped | key removed |
//! | `disconnect` | dropped | cleared |

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use crate::auth::{build_clob_auth_typed_data, ensure_supported_chain};
use crate::client::KeyClient;
use crate::core::{AuthErrorKind, ForkastError, Result};
use crate::types::{
    get_current_unix_time_secs, normalize_nonce, shorten_address, AttestationRequest,
    AuthContext, CredentialBundle,
};
use crate::wallet::WalletSigner;

const MISSING_BUNDLE: &str = "Generate an API key before managing credentials.";

/// Result of persisting a contact email against a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailSaveOutcome {
    Saved,
    /// The key already has an email on record (uniqueness conflict).
    AlreadySaved,
}

/// Persists an optional contact email for an issued key.
#[async_trait]
pub trait EmailStore: Send + Sync {
    async fn save_email(&self, api_key: &str, email: &str) -> Result<EmailSaveOutcome>;
}

/// What `generate` produced.
#[derive(Debug, Clone)]
pub struct GenerateOutcome {
    pub bundle: CredentialBundle,
    /// Email save result, if an email was supplied.
    pub email_notice: Option<String>,
}

/// Credential state for one wallet connection.
#[derive(Debug, Clone)]
pub struct KeySession {
    client: KeyClient,
    bundle: Option<CredentialBundle>,
    keys: Vec<String>,
    helper: Option<String>,
}

impl KeySession {
    #[must_use]
    pub fn new(client: KeyClient) -> Self {
        Self {
            client,
            bundle: None,
            keys: Vec::new(),
            helper: None,
        }
    }

    #[must_use]
    pub fn client(&self) -> &KeyClient {
        &self.client
    }

    /// Active credentials, if a key was minted in this session.
    #[must_use]
    pub fn bundle(&self) -> Option<&CredentialBundle> {
        self.bundle.as_ref()
    }

    /// Last known key ids.
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Status line describing the last successful action.
    #[must_use]
    pub fn helper(&self) -> Option<&str> {
        self.helper.as_deref()
    }

    /// Attest with the wallet and mint a new key.
    ///
    /// `email` is saved through `store` after issuance; a failed save never
    /// fails the generation and is reported in
    /// [`GenerateOutcome::email_notice`].
    ///
    /// # Errors
    ///
    /// Fails on an unsupported chain, a bad nonce, a wallet signing error or
    /// an issuance failure. A wallet session expiry also disconnects.
    #[instrument(skip_all, fields(address = %shorten_address(&wallet.address())))]
    pub async fn generate(
        &mut self,
        wallet: &dyn WalletSigner,
        nonce: &str,
        email: Option<(&dyn EmailStore, &str)>,
    ) -> Result<GenerateOutcome> {
        ensure_supported_chain(wallet.chain_id())?;
        let nonce = normalize_nonce(nonce)?;

        let address = wallet.address();
        let timestamp = get_current_unix_time_secs().to_string();
        let typed_data =
            build_clob_auth_typed_data(&address, wallet.chain_id(), &timestamp, &nonce)?;

        debug!(chain_id = wallet.chain_id(), "Requesting wallet attestation");
        let signature = match wallet.sign_typed_data(&typed_data).await {
            Ok(signature) => signature,
            Err(err) => {
                if matches!(
                    err,
                    ForkastError::Auth {
                        kind: AuthErrorKind::SessionExpired,
                        ..
                    }
                ) {
                    self.disconnect();
                }
                return Err(err);
            }
        };

        let request = AttestationRequest::new(address, signature, timestamp, &nonce)?;
        let bundle = self.client.issue(&request).await?;

        if !self.keys.contains(&bundle.api_key) {
            self.keys.insert(0, bundle.api_key.clone());
        }
        self.bundle = Some(bundle.clone());
        self.helper = Some("New key minted. Use refresh to fetch all keys from Forkast.".into());

        let email_notice = match email {
            Some((store, email)) if !email.trim().is_empty() => {
                Some(save_email(store, &bundle.api_key, email.trim()).await)
            }
            _ => None,
        };

        Ok(GenerateOutcome {
            bundle,
            email_notice,
        })
    }

    /// Reload the key list with the active credentials.
    ///
    /// # Errors
    ///
    /// Fails without an active bundle, or when every endpoint fails. Keys are
    /// cleared on failure; a 401/403 also drops the bundle.
    #[instrument(skip(self))]
    pub async fn refresh(&mut self) -> Result<&[String]> {
        let auth = self.active_auth()?;
        self.helper = None;

        match self.client.list(&auth).await {
            Ok(keys) => {
                self.helper = Some(match keys.len() {
                    0 => "No keys found for this wallet.".to_string(),
                    1 => "Loaded 1 active key.".to_string(),
                    n => format!("Loaded {n} active keys."),
                });
                self.keys = keys;
                Ok(&self.keys)
            }
            Err(err) => {
                self.keys.clear();
                if err.is_auth_rejection() {
                    warn!("Credentials rejected, discarding bundle");
                    self.bundle = None;
                    self.helper = Some(
                        "Credentials look invalid. Generate a new API key to continue.".into(),
                    );
                }
                Err(err)
            }
        }
    }

    /// Revoke `api_key` with the active credentials.
    ///
    /// # Errors
    ///
    /// Fails without an active bundle, or when every endpoint refuses.
    #[instrument(skip(self))]
    pub async fn revoke(&mut self, api_key: &str) -> Result<()> {
        let auth = self.active_auth()?;
        self.helper = None;

        self.client.revoke(&auth, api_key).await?;

        self.keys.retain(|key| key != api_key);
        if auth.api_key == api_key {
            info!("Active key revoked, discarding bundle");
            self.bundle = None;
            self.helper = Some("Key revoked. Generate a new API key to keep trading.".into());
        } else {
            self.helper = Some("Key revoked. Refresh to verify remaining credentials.".into());
        }
        Ok(())
    }

    /// Forget everything tied to the wallet.
    pub fn disconnect(&mut self) {
        self.bundle = None;
        self.keys.clear();
        self.helper = None;
    }

    fn active_auth(&self) -> Result<AuthContext> {
        self.bundle
            .as_ref()
            .map(CredentialBundle::auth_context)
            .ok_or_else(|| {
                ForkastError::auth_kind(MISSING_BUNDLE, AuthErrorKind::MissingCredentials)
            })
    }
}

async fn save_email(store: &dyn EmailStore, api_key: &str, email: &str) -> String {
    match store.save_email(api_key, email).await {
        Ok(EmailSaveOutcome::Saved) => "Saved. You can revoke any time.".to_string(),
        Ok(EmailSaveOutcome::AlreadySaved) => "Email already saved for this key.".to_string(),
        Err(err) => {
            warn!(error = %err, "Email save failed");
            format!("Email save failed: {}", err.message())
        }
    }
}
