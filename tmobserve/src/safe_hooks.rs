use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use tmclient::{DecisionOutcome, LedgerError};
use tmcommon::DecisionId;
use tmcontext::ContextProviderError;
use tmdecision::{CloseAttempt, DecisionHooks};
use tmtooling::{ToolError, ToolKind, ToolRuntimeHooks};

pub struct SafeToolHooks<H> {
    inner: H,
}

impl<H> SafeToolHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> ToolRuntimeHooks for SafeToolHooks<H>
where
    H: ToolRuntimeHooks,
{
    fn on_execution_start(&self, kind: ToolKind, tool_name: &str) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_execution_start(kind, tool_name)
        }));
    }

    fn on_execution_success(&self, kind: ToolKind, tool_name: &str, elapsed: Duration) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_execution_success(kind, tool_name, elapsed)
        }));
    }

    fn on_execution_failure(
        &self,
        kind: ToolKind,
        tool_name: &str,
        error: &ToolError,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_execution_failure(kind, tool_name, error, elapsed)
        }));
    }

    fn on_context_provider_failure(
        &self,
        kind: ToolKind,
        tool_name: &str,
        error: &ContextProviderError,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_context_provider_failure(kind, tool_name, error)
        }));
    }
}

pub struct SafeDecisionHooks<H> {
    inner: H,
}

impl<H> SafeDecisionHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> DecisionHooks for SafeDecisionHooks<H>
where
    H: DecisionHooks,
{
    fn on_open(&self, decision_id: &DecisionId) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_open(decision_id)));
    }

    fn on_open_failure(&self, error: &LedgerError) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_open_failure(error)));
    }

    fn on_close(&self, decision_id: &DecisionId, outcome: DecisionOutcome, attempt: &CloseAttempt) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_close(decision_id, outcome, attempt)
        }));
    }
}
