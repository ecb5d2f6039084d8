//! Shared ledger error kinds and error value helpers.
//!
//! ```rust
//! use tmclient::{LedgerError, LedgerErrorKind};
//!
//! let missing = LedgerError::configuration("api key required");
//! assert_eq!(missing.kind, LedgerErrorKind::Configuration);
//! assert!(missing.to_string().contains("api key required"));
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerErrorKind {
    Configuration,
    Authentication,
    InvalidRequest,
    NotFound,
    Conflict,
    Transport,
    Unavailable,
    InvalidResponse,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerError {
    pub kind: LedgerErrorKind,
    pub message: String,
}

impl LedgerError {
    pub fn new(kind: LedgerErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(LedgerErrorKind::Configuration, message)
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(LedgerErrorKind::Authentication, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(LedgerErrorKind::InvalidRequest, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(LedgerErrorKind::NotFound, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(LedgerErrorKind::Conflict, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(LedgerErrorKind::Transport, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(LedgerErrorKind::Unavailable, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(LedgerErrorKind::InvalidResponse, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(LedgerErrorKind::Other, message)
    }

    pub fn is_configuration(&self) -> bool {
        self.kind == LedgerErrorKind::Configuration
    }
}

impl Display for LedgerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for LedgerError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_message() {
        let error = LedgerError::conflict("decision already closed");
        assert_eq!(error.to_string(), "Conflict: decision already closed");
        assert!(!error.is_configuration());
        assert!(LedgerError::configuration("x").is_configuration());
    }
}
