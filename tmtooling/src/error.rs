//! Tool execution errors and classifications.

use std::error::Error;
use std::fmt::{Display, Formatter};

use tmclient::{LedgerError, LedgerErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolErrorKind {
    NotFound,
    InvalidArguments,
    Execution,
    Configuration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolError {
    pub kind: ToolErrorKind,
    pub message: String,
    pub tool_name: Option<String>,
    pub ledger_kind: Option<LedgerErrorKind>,
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            tool_name: None,
            ledger_kind: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::NotFound, message)
    }

    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::InvalidArguments, message)
    }

    pub fn execution(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Execution, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Configuration, message)
    }

    pub fn with_tool_name(mut self, tool_name: impl Into<String>) -> Self {
        self.tool_name = Some(tool_name.into());
        self
    }

    pub fn is_user_error(&self) -> bool {
        matches!(
            self.kind,
            ToolErrorKind::InvalidArguments | ToolErrorKind::NotFound
        )
    }
}

impl Display for ToolError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.tool_name {
            Some(tool_name) => write!(f, "{:?} [tool={}]: {}", self.kind, tool_name, self.message),
            None => write!(f, "{:?}: {}", self.kind, self.message),
        }
    }
}

impl Error for ToolError {}

impl From<LedgerError> for ToolError {
    fn from(value: LedgerError) -> Self {
        let kind = if value.is_configuration() {
            ToolErrorKind::Configuration
        } else {
            ToolErrorKind::Execution
        };

        Self {
            kind,
            message: value.to_string(),
            tool_name: None,
            ledger_kind: Some(value.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_error_classification() {
        assert!(ToolError::invalid_arguments("bad").is_user_error());
        assert!(ToolError::not_found("missing").is_user_error());
        assert!(!ToolError::execution("boom").is_user_error());
    }

    #[test]
    fn tool_name_is_included_in_display() {
        let error = ToolError::not_found("missing").with_tool_name("tracememTrace");
        assert_eq!(error.to_string(), "NotFound [tool=tracememTrace]: missing");
    }

    #[test]
    fn ledger_errors_convert_with_kind_preserved() {
        let error = ToolError::from(LedgerError::conflict("already closed"));
        assert_eq!(error.kind, ToolErrorKind::Execution);
        assert_eq!(error.ledger_kind, Some(LedgerErrorKind::Conflict));
        assert!(error.message.contains("already closed"));

        let error = ToolError::from(LedgerError::configuration("no key"));
        assert_eq!(error.kind, ToolErrorKind::Configuration);
    }
}
