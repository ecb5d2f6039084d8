//! Credential holding and pluggable credential sources.
//!
//! ```rust
//! use tmclient::resolve_api_key;
//!
//! let fallback = || Some("from-fallback".to_string());
//! let explicit = resolve_api_key(Some("explicit"), &fallback).expect("key");
//! assert_eq!(explicit.expose(), "explicit");
//!
//! let resolved = resolve_api_key(None, &fallback).expect("key");
//! assert_eq!(resolved.expose(), "from-fallback");
//! assert_eq!(format!("{resolved:?}"), "[REDACTED]");
//! ```

/// Environment variable consulted by [`EnvCredentialSource`].
pub const API_KEY_ENV: &str = "TRACEMEM_API_KEY";

#[derive(PartialEq, Eq)]
pub struct SecretString {
    value: String,
}

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn expose(&self) -> &str {
        self.value.as_str()
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

impl Clone for SecretString {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        // SAFETY: zero bytes are valid UTF-8 and the string is not read again.
        unsafe {
            self.value.as_mut_vec().fill(0);
        }
    }
}

/// Supplies an API key when none was passed explicitly.
pub trait CredentialSource: Send + Sync {
    fn api_key(&self) -> Option<String>;
}

impl<F> CredentialSource for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn api_key(&self) -> Option<String> {
        self()
    }
}

/// Reads the API key from a process environment variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvCredentialSource {
    variable: String,
}

impl EnvCredentialSource {
    pub fn new(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
        }
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }
}

impl Default for EnvCredentialSource {
    fn default() -> Self {
        Self::new(API_KEY_ENV)
    }
}

impl CredentialSource for EnvCredentialSource {
    fn api_key(&self) -> Option<String> {
        std::env::var(&self.variable).ok()
    }
}

/// Explicit key first, then the fallback source. Blank values count as absent.
pub fn resolve_api_key(
    explicit: Option<&str>,
    fallback: &dyn CredentialSource,
) -> Option<SecretString> {
    explicit
        .map(SecretString::new)
        .filter(|key| !key.is_blank())
        .or_else(|| {
            fallback
                .api_key()
                .map(SecretString::new)
                .filter(|key| !key.is_blank())
        })
}
