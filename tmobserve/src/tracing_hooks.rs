//! Tracing-based observability hooks for ledger tools and decision lifecycles.
//!
//! ```rust
//! use tmobserve::TracingObservabilityHooks;
//! use tmdecision::DecisionHooks;
//!
//! fn accepts_decision_hooks(_hooks: &dyn DecisionHooks) {}
//!
//! let hooks = TracingObservabilityHooks;
//! accepts_decision_hooks(&hooks);
//! ```

use std::time::Duration;

use tmclient::{DecisionOutcome, LedgerError};
use tmcommon::DecisionId;
use tmcontext::ContextProviderError;
use tmdecision::{CloseAttempt, DecisionHooks};
use tmtooling::{ToolError, ToolKind, ToolRuntimeHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObservabilityHooks;

impl ToolRuntimeHooks for TracingObservabilityHooks {
    fn on_execution_start(&self, kind: ToolKind, tool_name: &str) {
        tracing::info!(
            phase = "tool",
            event = "execution_start",
            tool_kind = %kind,
            tool_name
        );
    }

    fn on_execution_success(&self, kind: ToolKind, tool_name: &str, elapsed: Duration) {
        tracing::info!(
            phase = "tool",
            event = "execution_success",
            tool_kind = %kind,
            tool_name,
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_execution_failure(
        &self,
        kind: ToolKind,
        tool_name: &str,
        error: &ToolError,
        elapsed: Duration,
    ) {
        tracing::error!(
            phase = "tool",
            event = "execution_failure",
            tool_kind = %kind,
            tool_name,
            elapsed_ms = elapsed.as_millis() as u64,
            error_kind = ?error.kind,
            ledger_error_kind = ?error.ledger_kind,
            error = %error
        );
    }

    fn on_context_provider_failure(
        &self,
        kind: ToolKind,
        tool_name: &str,
        error: &ContextProviderError,
    ) {
        tracing::warn!(
            phase = "tool",
            event = "context_provider_failure",
            tool_kind = %kind,
            tool_name,
            error = %error
        );
    }
}

impl DecisionHooks for TracingObservabilityHooks {
    fn on_open(&self, decision_id: &DecisionId) {
        tracing::info!(phase = "decision", event = "open", decision_id = %decision_id);
    }

    fn on_open_failure(&self, error: &LedgerError) {
        tracing::error!(
            phase = "decision",
            event = "open_failure",
            error_kind = ?error.kind,
            error = %error
        );
    }

    fn on_close(&self, decision_id: &DecisionId, outcome: DecisionOutcome, attempt: &CloseAttempt) {
        match attempt {
            CloseAttempt::Closed => tracing::info!(
                phase = "decision",
                event = "close",
                decision_id = %decision_id,
                outcome = %outcome
            ),
            CloseAttempt::Failed(error) => tracing::warn!(
                phase = "decision",
                event = "close_failure",
                decision_id = %decision_id,
                outcome = %outcome,
                error_kind = ?error.kind,
                error = %error
            ),
            CloseAttempt::Skipped => tracing::debug!(
                phase = "decision",
                event = "close_skipped",
                decision_id = %decision_id
            ),
        }
    }
}
