//! Hook contracts for observing decision lifecycle events.
//!
//! ```rust
//! use tmdecision::{DecisionHooks, NoopDecisionHooks};
//!
//! fn accepts_hooks(_hooks: &dyn DecisionHooks) {}
//!
//! let hooks = NoopDecisionHooks;
//! accepts_hooks(&hooks);
//! ```

use tmclient::{DecisionOutcome, LedgerError};
use tmcommon::DecisionId;

use crate::CloseAttempt;

pub trait DecisionHooks: Send + Sync {
    fn on_open(&self, _decision_id: &DecisionId) {}

    fn on_open_failure(&self, _error: &LedgerError) {}

    fn on_close(
        &self,
        _decision_id: &DecisionId,
        _outcome: DecisionOutcome,
        _attempt: &CloseAttempt,
    ) {
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDecisionHooks;

impl DecisionHooks for NoopDecisionHooks {}
