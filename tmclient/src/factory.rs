//! Client options and the ledger client factory.
//!
//! ```rust
//! use tmclient::{ClientOptions, LedgerErrorKind, create_client};
//!
//! let error = create_client(ClientOptions::new()).expect_err("no key configured");
//! assert_eq!(error.kind, LedgerErrorKind::Configuration);
//!
//! let client = create_client(ClientOptions::new().with_api_key("tm-key"));
//! assert!(client.is_ok());
//! ```

#[cfg(feature = "http-client")]
use std::sync::Arc;

use crate::credentials::{CredentialSource, EnvCredentialSource, SecretString, resolve_api_key};
use crate::LedgerError;
#[cfg(feature = "http-client")]
use crate::{LedgerClient, LedgerHttpClient};

pub const DEFAULT_BASE_URL: &str = "https://api.tracemem.com/v1";

pub(crate) const MISSING_API_KEY_MESSAGE: &str =
    "TraceMem API key is required: set TRACEMEM_API_KEY or pass an api key in the client options";

#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    api_key: Option<SecretString>,
    base_url: Option<String>,
    #[cfg(feature = "http-client")]
    http: Option<reqwest::Client>,
}

impl ClientOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options whose key falls back to `TRACEMEM_API_KEY`.
    pub fn from_env() -> Self {
        Self::new().with_credential_fallback(&EnvCredentialSource::default())
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::new(api_key));
        self
    }

    /// Fills the key from `source` only when no usable explicit key is set.
    pub fn with_credential_fallback(mut self, source: &dyn CredentialSource) -> Self {
        let explicit = self.api_key.as_ref().map(SecretString::expose);
        self.api_key = resolve_api_key(explicit, source);
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    #[cfg(feature = "http-client")]
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    pub fn api_key(&self) -> Option<&SecretString> {
        self.api_key.as_ref().filter(|key| !key.is_blank())
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn require_api_key(&self) -> Result<&SecretString, LedgerError> {
        self.api_key()
            .ok_or_else(|| LedgerError::configuration(MISSING_API_KEY_MESSAGE))
    }
}

/// Builds the HTTP ledger client. Performs no network activity.
#[cfg(feature = "http-client")]
pub fn create_client(options: ClientOptions) -> Result<LedgerHttpClient, LedgerError> {
    let api_key = options.require_api_key()?.clone();
    let http = options.http.clone().unwrap_or_default();
    LedgerHttpClient::new(http, api_key, options.base_url())
}

#[cfg(feature = "http-client")]
pub fn create_shared_client(options: ClientOptions) -> Result<Arc<dyn LedgerClient>, LedgerError> {
    Ok(Arc::new(create_client(options)?))
}
