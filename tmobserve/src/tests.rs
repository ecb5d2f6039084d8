use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use tmclient::{DecisionOutcome, InMemoryLedgerClient, LedgerError};
use tmcommon::DecisionId;
use tmcontext::ContextProviderError;
use tmdecision::{CloseAttempt, DecisionContext, DecisionHooks, DecisionOptions, with_decision};
use tmtooling::{ToolError, ToolKind, ToolRuntimeHooks, ToolsConfig, build_tools};

use crate::{
    MetricsObservabilityHooks, SafeDecisionHooks, SafeToolHooks, TracingObservabilityHooks,
};

fn decision_id() -> DecisionId {
    DecisionId::new("dec_1").expect("id")
}

#[test]
fn tracing_hooks_smoke_test_all_callbacks() {
    let hooks = TracingObservabilityHooks;
    let tool_error = ToolError::from(LedgerError::conflict("already closed"));
    let provider_error = ContextProviderError::new("store offline");

    hooks.on_execution_start(ToolKind::Open, "tracememOpen");
    hooks.on_execution_success(ToolKind::Open, "tracememOpen", Duration::from_millis(20));
    hooks.on_execution_failure(
        ToolKind::Close,
        "tracememClose",
        &tool_error,
        Duration::from_millis(20),
    );
    hooks.on_context_provider_failure(ToolKind::Note, "tracememNote", &provider_error);

    hooks.on_open(&decision_id());
    hooks.on_open_failure(&LedgerError::unavailable("down"));
    hooks.on_close(&decision_id(), DecisionOutcome::Commit, &CloseAttempt::Closed);
    hooks.on_close(
        &decision_id(),
        DecisionOutcome::Abort,
        &CloseAttempt::Failed(LedgerError::transport("reset")),
    );
    hooks.on_close(&decision_id(), DecisionOutcome::Commit, &CloseAttempt::Skipped);
}

#[test]
fn metrics_hooks_smoke_test_all_callbacks() {
    let hooks = MetricsObservabilityHooks;
    let tool_error = ToolError::invalid_arguments("missing decisionId");
    let provider_error = ContextProviderError::new("store offline");

    hooks.on_execution_start(ToolKind::Read, "tracememRead");
    hooks.on_execution_success(ToolKind::Read, "tracememRead", Duration::from_millis(5));
    hooks.on_execution_failure(
        ToolKind::Read,
        "tracememRead",
        &tool_error,
        Duration::from_millis(5),
    );
    hooks.on_context_provider_failure(ToolKind::Read, "tracememRead", &provider_error);

    hooks.on_open(&decision_id());
    hooks.on_open_failure(&LedgerError::authentication("bad key"));
    hooks.on_close(&decision_id(), DecisionOutcome::Abort, &CloseAttempt::Closed);
}

#[derive(Default, Clone)]
struct RecordingToolHooks {
    events: Arc<Mutex<Vec<&'static str>>>,
}

impl ToolRuntimeHooks for RecordingToolHooks {
    fn on_execution_start(&self, _kind: ToolKind, _tool_name: &str) {
        self.events.lock().expect("events lock").push("start");
    }

    fn on_execution_success(&self, _kind: ToolKind, _tool_name: &str, _elapsed: Duration) {
        self.events.lock().expect("events lock").push("success");
    }

    fn on_execution_failure(
        &self,
        _kind: ToolKind,
        _tool_name: &str,
        _error: &ToolError,
        _elapsed: Duration,
    ) {
        self.events.lock().expect("events lock").push("failure");
    }
}

struct PanicToolHooks;

impl ToolRuntimeHooks for PanicToolHooks {
    fn on_execution_start(&self, _kind: ToolKind, _tool_name: &str) {
        panic!("execution_start panic");
    }

    fn on_execution_success(&self, _kind: ToolKind, _tool_name: &str, _elapsed: Duration) {
        panic!("execution_success panic");
    }

    fn on_execution_failure(
        &self,
        _kind: ToolKind,
        _tool_name: &str,
        _error: &ToolError,
        _elapsed: Duration,
    ) {
        panic!("execution_failure panic");
    }

    fn on_context_provider_failure(
        &self,
        _kind: ToolKind,
        _tool_name: &str,
        _error: &ContextProviderError,
    ) {
        panic!("context_provider_failure panic");
    }
}

struct PanicDecisionHooks;

impl DecisionHooks for PanicDecisionHooks {
    fn on_open(&self, _decision_id: &DecisionId) {
        panic!("open panic");
    }

    fn on_open_failure(&self, _error: &LedgerError) {
        panic!("open_failure panic");
    }

    fn on_close(&self, _decision_id: &DecisionId, _outcome: DecisionOutcome, _attempt: &CloseAttempt) {
        panic!("close panic");
    }
}

#[test]
fn safe_tool_hooks_delegate_to_inner() {
    let inner = RecordingToolHooks::default();
    let hooks = SafeToolHooks::new(inner.clone());

    hooks.on_execution_start(ToolKind::Trace, "tracememTrace");
    hooks.on_execution_success(ToolKind::Trace, "tracememTrace", Duration::from_millis(1));
    hooks.on_execution_failure(
        ToolKind::Trace,
        "tracememTrace",
        &ToolError::execution("boom"),
        Duration::from_millis(1),
    );

    assert_eq!(
        inner.events.lock().expect("events lock").as_slice(),
        &["start", "success", "failure"]
    );
}

#[test]
fn safe_hooks_swallow_panics() {
    let tool_hooks = SafeToolHooks::new(PanicToolHooks);
    tool_hooks.on_execution_start(ToolKind::Open, "tracememOpen");
    tool_hooks.on_execution_success(ToolKind::Open, "tracememOpen", Duration::from_millis(1));
    tool_hooks.on_execution_failure(
        ToolKind::Open,
        "tracememOpen",
        &ToolError::execution("boom"),
        Duration::from_millis(1),
    );
    tool_hooks.on_context_provider_failure(
        ToolKind::Open,
        "tracememOpen",
        &ContextProviderError::new("offline"),
    );

    let decision_hooks = SafeDecisionHooks::new(PanicDecisionHooks);
    decision_hooks.on_open(&decision_id());
    decision_hooks.on_open_failure(&LedgerError::other("x"));
    decision_hooks.on_close(&decision_id(), DecisionOutcome::Commit, &CloseAttempt::Closed);
}

#[tokio::test]
async fn panicking_hooks_do_not_break_tool_calls() {
    let ledger = Arc::new(InMemoryLedgerClient::new());
    let config = ToolsConfig::new(ledger.clone())
        .with_hooks(Arc::new(SafeToolHooks::new(PanicToolHooks)));
    let tools = build_tools(&config);

    let output = tools
        .invoke("tracememOpen", json!({ "action": "refund" }))
        .await
        .expect("open succeeds despite hook panics");
    assert_eq!(output, json!({ "decisionId": "dec_1" }));
}

#[tokio::test]
async fn panicking_hooks_do_not_break_decision_lifecycle() {
    let ledger = Arc::new(InMemoryLedgerClient::new());
    let guard = with_decision(
        |_req: (), _ctx: DecisionContext<()>, _id: DecisionId| async {
            Ok::<_, LedgerError>(())
        },
        DecisionOptions::new(ledger.clone())
            .with_hooks(Arc::new(SafeDecisionHooks::new(PanicDecisionHooks))),
    );

    guard.call((), ()).await.expect("handler succeeds");
    assert_eq!(ledger.outcome(&decision_id()), Some(DecisionOutcome::Commit));
}
