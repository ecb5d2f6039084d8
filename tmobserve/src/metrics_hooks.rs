//! Metrics-based observability hooks for ledger tools and decision lifecycles.
//!
//! ```rust
//! use tmobserve::MetricsObservabilityHooks;
//! use tmtooling::ToolRuntimeHooks;
//!
//! fn accepts_tool_hooks(_hooks: &dyn ToolRuntimeHooks) {}
//!
//! let hooks = MetricsObservabilityHooks;
//! accepts_tool_hooks(&hooks);
//! ```

use std::time::Duration;

use tmclient::{DecisionOutcome, LedgerError};
use tmcommon::DecisionId;
use tmcontext::ContextProviderError;
use tmdecision::{CloseAttempt, DecisionHooks};
use tmtooling::{ToolError, ToolKind, ToolRuntimeHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObservabilityHooks;

impl ToolRuntimeHooks for MetricsObservabilityHooks {
    fn on_execution_start(&self, kind: ToolKind, tool_name: &str) {
        metrics::counter!(
            "tracemem_tool_executions_total",
            "tool_kind" => kind.default_name(),
            "tool_name" => tool_name.to_string()
        )
        .increment(1);
    }

    fn on_execution_success(&self, kind: ToolKind, tool_name: &str, elapsed: Duration) {
        metrics::histogram!(
            "tracemem_tool_latency_ms",
            "tool_kind" => kind.default_name(),
            "tool_name" => tool_name.to_string(),
            "status" => "success"
        )
        .record(elapsed.as_secs_f64() * 1000.0);
    }

    fn on_execution_failure(
        &self,
        kind: ToolKind,
        tool_name: &str,
        error: &ToolError,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "tracemem_tool_failures_total",
            "tool_kind" => kind.default_name(),
            "tool_name" => tool_name.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "tracemem_tool_latency_ms",
            "tool_kind" => kind.default_name(),
            "tool_name" => tool_name.to_string(),
            "status" => "failure"
        )
        .record(elapsed.as_secs_f64() * 1000.0);
    }

    fn on_context_provider_failure(
        &self,
        kind: ToolKind,
        tool_name: &str,
        _error: &ContextProviderError,
    ) {
        metrics::counter!(
            "tracemem_context_provider_failures_total",
            "tool_kind" => kind.default_name(),
            "tool_name" => tool_name.to_string()
        )
        .increment(1);
    }
}

impl DecisionHooks for MetricsObservabilityHooks {
    fn on_open(&self, _decision_id: &DecisionId) {
        metrics::counter!("tracemem_decisions_opened_total").increment(1);
    }

    fn on_open_failure(&self, error: &LedgerError) {
        metrics::counter!(
            "tracemem_decision_open_failures_total",
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
    }

    fn on_close(&self, _decision_id: &DecisionId, outcome: DecisionOutcome, attempt: &CloseAttempt) {
        let status = match attempt {
            CloseAttempt::Closed => "closed",
            CloseAttempt::Failed(_) => "failed",
            CloseAttempt::Skipped => "skipped",
        };
        metrics::counter!(
            "tracemem_decision_closes_total",
            "outcome" => outcome.as_str(),
            "status" => status
        )
        .increment(1);
    }
}
