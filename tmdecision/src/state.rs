//! Per-request decision state and close outcomes.
//!
//! ```rust
//! use tmclient::DecisionOutcome;
//! use tmcommon::DecisionId;
//! use tmdecision::DecisionState;
//!
//! let id = DecisionId::new("dec_1").expect("id");
//! let state = DecisionState::NotOpened.opened(id).closed(DecisionOutcome::Commit);
//!
//! assert!(state.is_closed());
//! assert_eq!(state.outcome(), Some(DecisionOutcome::Commit));
//! ```

use tmclient::{DecisionOutcome, LedgerError};
use tmcommon::DecisionId;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DecisionState {
    #[default]
    NotOpened,
    Open(DecisionId),
    Closed {
        id: DecisionId,
        outcome: DecisionOutcome,
    },
}

impl DecisionState {
    /// `NotOpened -> Open`. Any other state is returned unchanged.
    pub fn opened(self, id: DecisionId) -> Self {
        match self {
            Self::NotOpened => Self::Open(id),
            other => other,
        }
    }

    /// `Open -> Closed`. Any other state is returned unchanged.
    pub fn closed(self, outcome: DecisionOutcome) -> Self {
        match self {
            Self::Open(id) => Self::Closed { id, outcome },
            other => other,
        }
    }

    pub fn decision_id(&self) -> Option<&DecisionId> {
        match self {
            Self::NotOpened => None,
            Self::Open(id) | Self::Closed { id, .. } => Some(id),
        }
    }

    pub fn outcome(&self) -> Option<DecisionOutcome> {
        match self {
            Self::Closed { outcome, .. } => Some(*outcome),
            _ => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed { .. })
    }
}

/// Result of the best-effort close performed after the handler returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseAttempt {
    Closed,
    Failed(LedgerError),
    /// Left open for the caller (streaming response).
    Skipped,
}

impl CloseAttempt {
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }

    pub fn error(&self) -> Option<&LedgerError> {
        match self {
            Self::Failed(error) => Some(error),
            _ => None,
        }
    }
}
