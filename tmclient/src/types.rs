//! Ledger domain enums and per-operation request payloads.
//!
//! ```rust
//! use tmclient::{AutomationMode, CloseRequest, DecisionOutcome};
//!
//! let mode: AutomationMode = "propose".parse().expect("known mode");
//! let close = CloseRequest::abort().with_reason("handler failed");
//!
//! assert_eq!(mode, AutomationMode::Propose);
//! assert_eq!(close.outcome, DecisionOutcome::Abort);
//! assert_eq!(close.outcome.as_str(), "abort");
//! ```

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tmcommon::DecisionId;

use crate::LedgerError;

/// How autonomously the calling agent may act. Forwarded, never interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutomationMode {
    Propose,
    Execute,
    Validate,
}

impl AutomationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Propose => "propose",
            Self::Execute => "execute",
            Self::Validate => "validate",
        }
    }
}

impl Display for AutomationMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AutomationMode {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "propose" => Ok(Self::Propose),
            "execute" => Ok(Self::Execute),
            "validate" => Ok(Self::Validate),
            other => Err(LedgerError::invalid_request(format!(
                "unknown automation mode '{other}'"
            ))),
        }
    }
}

/// Terminal classification of a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionOutcome {
    Commit,
    Abort,
}

impl DecisionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Commit => "commit",
            Self::Abort => "abort",
        }
    }
}

impl Display for DecisionOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DecisionOutcome {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "commit" => Ok(Self::Commit),
            "abort" => Ok(Self::Abort),
            other => Err(LedgerError::invalid_request(format!(
                "unknown decision outcome '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionHandle {
    pub decision_id: DecisionId,
}

impl DecisionHandle {
    pub fn new(decision_id: DecisionId) -> Self {
        Self { decision_id }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub automation_mode: Option<AutomationMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl OpenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    pub fn with_automation_mode(mut self, mode: AutomationMode) -> Self {
        self.automation_mode = Some(mode);
        self
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadRequest {
    pub product: String,
    pub purpose: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluateRequest {
    pub policy: String,
    pub inputs: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalRequest {
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteRequest {
    pub product: String,
    pub purpose: String,
    pub mutation: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseRequest {
    pub outcome: DecisionOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl CloseRequest {
    pub fn new(outcome: DecisionOutcome) -> Self {
        Self {
            outcome,
            reason: None,
        }
    }

    pub fn commit() -> Self {
        Self::new(DecisionOutcome::Commit)
    }

    pub fn abort() -> Self {
        Self::new(DecisionOutcome::Abort)
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
}
