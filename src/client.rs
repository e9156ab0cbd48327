//! REST client for Forkast credential endpoints.
//!
//! ## Modules
//!
//! - [`keys`] - [`KeyClient`]: issue, list and revoke API keys
//! - [`transport`] - HTTP seam ([`Transport`], reqwest-backed [`HttpTransport`])
//! - [`normalize`] - Tolerant parsing of credential and listing payloads
//!
//! Fan-out across mirrors is internal to [`KeyClient`].

mod fanout;
pub mod keys;
pub mod normalize;
pub mod transport;

pub use keys::{KeyClient, KeysConfig, ISSUE_KEY_PATH, LIST_KEYS_PATH, REVOKE_KEY_PATH};
pub use normalize::{
    extract_error_message, normalize_credentials, parse_key_list, API_KEY_FIELDS,
    API_SECRET_FIELDS, PASSPHRASE_FIELDS,
};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, Transport};
