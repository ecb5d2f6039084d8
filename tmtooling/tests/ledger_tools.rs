use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::future::join_all;
use serde_json::{Value, json};
use tmclient::{
    AutomationMode, DecisionId, DecisionOutcome, InMemoryLedgerClient, LedgerCall,
    LedgerErrorKind,
};
use tmcontext::{
    ContextInput, ContextProviderError, FnContextProvider, RequestContext, StaticContextProvider,
};
use tmtooling::{
    ToolError, ToolErrorKind, ToolKind, ToolNames, ToolRuntimeHooks, ToolsConfig, build_tools,
};

fn ledger() -> Arc<InMemoryLedgerClient> {
    Arc::new(
        InMemoryLedgerClient::new()
            .with_product(json!({ "name": "crm", "purposes": ["support"] }))
            .with_product(json!({ "name": "billing", "purposes": ["finance"] })),
    )
}

fn id(value: &str) -> DecisionId {
    DecisionId::new(value).expect("valid id")
}

#[derive(Default)]
struct RecordingHooks {
    events: Mutex<Vec<String>>,
}

impl RecordingHooks {
    fn events(&self) -> Vec<String> {
        self.events.lock().expect("lock").clone()
    }
}

impl ToolRuntimeHooks for RecordingHooks {
    fn on_execution_start(&self, _kind: ToolKind, tool_name: &str) {
        self.events
            .lock()
            .expect("lock")
            .push(format!("start:{tool_name}"));
    }

    fn on_execution_success(&self, _kind: ToolKind, tool_name: &str, _elapsed: Duration) {
        self.events
            .lock()
            .expect("lock")
            .push(format!("success:{tool_name}"));
    }

    fn on_execution_failure(
        &self,
        _kind: ToolKind,
        tool_name: &str,
        error: &ToolError,
        _elapsed: Duration,
    ) {
        self.events
            .lock()
            .expect("lock")
            .push(format!("failure:{tool_name}:{:?}", error.kind));
    }

    fn on_context_provider_failure(
        &self,
        _kind: ToolKind,
        tool_name: &str,
        error: &ContextProviderError,
    ) {
        self.events
            .lock()
            .expect("lock")
            .push(format!("context:{tool_name}:{}", error.message));
    }
}

#[test]
fn registers_all_tools_under_default_names() {
    let tools = build_tools(&ToolsConfig::new(ledger()));

    assert_eq!(tools.len(), 12);
    let expected: Vec<String> = ToolKind::ALL
        .iter()
        .map(|kind| kind.default_name().to_string())
        .collect();
    assert_eq!(tools.names(), expected);

    for definition in tools.definitions() {
        let schema = definition.parameters().expect("schema parses");
        assert_eq!(schema["type"], "object");
        assert!(!definition.description.is_empty());
    }
}

#[test]
fn override_map_renames_only_the_named_tool() {
    let names: ToolNames =
        serde_json::from_str(r#"{"tracememOpen":"startTask"}"#).expect("overrides parse");
    let tools = build_tools(&ToolsConfig::new(ledger()).with_tool_names(names));

    assert_eq!(tools.len(), 12);
    assert!(tools.contains("startTask"));
    assert!(!tools.contains("tracememOpen"));
    assert!(tools.contains("tracememNote"));
    assert_eq!(tools.names()[0], "startTask");
}

#[tokio::test]
async fn open_applies_defaults_and_attaches_redacted_context() {
    let ledger = ledger();
    let provider = StaticContextProvider::new(
        RequestContext::new()
            .with_user_id("u1")
            .with_metadata("apiKey", "sk-live"),
    );
    let config = ToolsConfig::new(ledger.clone())
        .with_actor("support-bot")
        .with_automation_mode(AutomationMode::Propose)
        .with_context_provider(provider);
    let tools = build_tools(&config);

    let output = tools
        .invoke("tracememOpen", json!({ "action": "refund", "actor": "agent-7" }))
        .await
        .expect("open succeeds");
    assert_eq!(output, json!({ "decisionId": "dec_1" }));

    match &ledger.calls()[0] {
        LedgerCall::Open { action, options } => {
            assert_eq!(action, "refund");
            assert_eq!(options.actor.as_deref(), Some("agent-7"));
            assert_eq!(options.automation_mode, Some(AutomationMode::Propose));
            assert_eq!(
                options.metadata,
                Some(json!({ "userId": "u1", "metadata": { "apiKey": "[REDACTED]" } }))
            );
        }
        other => panic!("unexpected call {other:?}"),
    }
}

#[tokio::test]
async fn open_with_intent_creates_decision() {
    let ledger = ledger();
    let tools = build_tools(&ToolsConfig::new(ledger.clone()));

    tools
        .invoke(
            "tracememOpen",
            json!({ "intent": "refund a duplicate charge", "action": "refund" }),
        )
        .await
        .expect("open succeeds");

    assert!(matches!(
        &ledger.calls()[0],
        LedgerCall::CreateDecision { intent, .. } if intent == "refund a duplicate charge"
    ));
}

#[tokio::test]
async fn open_without_action_or_intent_never_reaches_the_ledger() {
    let ledger = ledger();
    let provider_calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&provider_calls);
    let provider = FnContextProvider::new(move |_input| {
        counter.fetch_add(1, Ordering::SeqCst);
        async { Ok(RequestContext::new()) }
    });
    let tools = build_tools(&ToolsConfig::new(ledger.clone()).with_context_provider(provider));

    let error = tools
        .invoke("tracememOpen", json!({ "action": "  " }))
        .await
        .expect_err("blank action is rejected");

    assert_eq!(error.kind, ToolErrorKind::InvalidArguments);
    assert_eq!(error.tool_name.as_deref(), Some("tracememOpen"));
    assert!(ledger.calls().is_empty());
    assert_eq!(provider_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn note_redacts_data_and_merges_context() {
    let ledger = ledger();
    let provider = StaticContextProvider::new(RequestContext::new().with_route("/chat"));
    let tools = build_tools(&ToolsConfig::new(ledger.clone()).with_context_provider(provider));
    tools
        .invoke("tracememOpen", json!({ "action": "lookup" }))
        .await
        .expect("open");

    let output = tools
        .invoke(
            "tracememNote",
            json!({
                "decisionId": "dec_1",
                "message": "checked account",
                "kind": "info",
                "data": { "password": "hunter2", "rows": 3 }
            }),
        )
        .await
        .expect("note succeeds");
    assert_eq!(output, json!({ "success": true }));

    match &ledger.calls()[1] {
        LedgerCall::Note { request, .. } => {
            assert_eq!(request.message, "checked account");
            assert_eq!(request.kind.as_deref(), Some("info"));
            assert_eq!(
                request.data,
                Some(json!({
                    "password": "[REDACTED]",
                    "rows": 3,
                    "_context": { "route": "/chat" }
                }))
            );
        }
        other => panic!("unexpected call {other:?}"),
    }
}

#[tokio::test]
async fn disabling_sanitize_forwards_data_unchanged() {
    let ledger = ledger();
    let tools = build_tools(&ToolsConfig::new(ledger.clone()).with_sanitize(false));
    tools
        .invoke("tracememOpen", json!({ "action": "lookup" }))
        .await
        .expect("open");

    tools
        .invoke(
            "tracememNote",
            json!({ "decisionId": "dec_1", "message": "m", "data": { "token": "abc" } }),
        )
        .await
        .expect("note");

    match &ledger.calls()[1] {
        LedgerCall::Note { request, .. } => {
            assert_eq!(request.data, Some(json!({ "token": "abc", "_context": {} })));
        }
        other => panic!("unexpected call {other:?}"),
    }
}

#[tokio::test]
async fn provider_failure_continues_with_empty_context() {
    let ledger = ledger();
    let hooks = Arc::new(RecordingHooks::default());
    let provider = FnContextProvider::new(|_input| async {
        Err(ContextProviderError::new("session store offline"))
    });
    let tools = build_tools(
        &ToolsConfig::new(ledger.clone())
            .with_context_provider(provider)
            .with_hooks(hooks.clone()),
    );

    let output = tools
        .invoke("tracememOpen", json!({ "action": "refund" }))
        .await
        .expect("open still succeeds");
    assert_eq!(output["decisionId"], "dec_1");

    match &ledger.calls()[0] {
        LedgerCall::Open { options, .. } => assert_eq!(options.metadata, Some(json!({}))),
        other => panic!("unexpected call {other:?}"),
    }
    assert_eq!(
        hooks.events(),
        vec![
            "start:tracememOpen",
            "context:tracememOpen:session store offline",
            "success:tracememOpen",
        ]
    );
}

#[tokio::test]
async fn provider_panicking_before_it_returns_a_future_does_not_abort_the_call() {
    let ledger = ledger();
    let hooks = Arc::new(RecordingHooks::default());
    let provider = FnContextProvider::new(|input: ContextInput| {
        if input.tool == "tracememNote" {
            panic!("provider setup failed");
        }
        async { Ok(RequestContext::new().with_route("/api/refunds")) }
    });
    let tools = build_tools(
        &ToolsConfig::new(ledger.clone())
            .with_context_provider(provider)
            .with_hooks(hooks.clone()),
    );

    tools
        .invoke("tracememOpen", json!({ "action": "refund" }))
        .await
        .expect("open");
    let output = tools
        .invoke(
            "tracememNote",
            json!({ "decisionId": "dec_1", "message": "checked", "data": { "step": 1 } }),
        )
        .await
        .expect("note still succeeds");
    assert_eq!(output, json!({ "success": true }));

    let note = ledger
        .calls()
        .into_iter()
        .find_map(|call| match call {
            LedgerCall::Note { request, .. } => request.data,
            _ => None,
        })
        .expect("note recorded");
    assert_eq!(note, json!({ "step": 1, "_context": {} }));
    assert!(
        hooks
            .events()
            .contains(&"context:tracememNote:context provider panicked".to_string())
    );
}

#[tokio::test]
async fn provider_sees_default_tool_name_arguments_and_runtime_hint() {
    let ledger = ledger();
    let seen: Arc<Mutex<Vec<ContextInput>>> = Arc::default();
    let recorder = Arc::clone(&seen);
    let provider = FnContextProvider::new(move |input: ContextInput| {
        recorder.lock().expect("lock").push(input);
        async { Ok(RequestContext::new()) }
    });
    let tools = build_tools(
        &ToolsConfig::new(ledger.clone())
            .with_tool_name(ToolKind::Open, "startTask")
            .with_runtime_hint("edge")
            .with_context_provider(provider),
    );

    tools
        .invoke("startTask", json!({ "action": "refund" }))
        .await
        .expect("open");

    let seen = seen.lock().expect("lock");
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].tool, "tracememOpen");
    assert_eq!(seen[0].args, json!({ "action": "refund" }));
    assert_eq!(seen[0].runtime.as_deref(), Some("edge"));
}

#[tokio::test]
async fn lookup_tools_skip_the_context_provider() {
    let ledger = ledger();
    let provider_calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&provider_calls);
    let provider = FnContextProvider::new(move |_input| {
        counter.fetch_add(1, Ordering::SeqCst);
        async { Ok(RequestContext::new()) }
    });
    let tools = build_tools(&ToolsConfig::new(ledger.clone()).with_context_provider(provider));

    tools
        .invoke("tracememOpen", json!({ "action": "a" }))
        .await
        .expect("open");
    assert_eq!(provider_calls.load(Ordering::SeqCst), 1);

    tools
        .invoke("tracememTrace", json!({ "decisionId": "dec_1" }))
        .await
        .expect("trace");
    tools
        .invoke("tracememReceipt", json!({ "decisionId": "dec_1" }))
        .await
        .expect("receipt");
    tools
        .invoke("tracememProductsList", Value::Null)
        .await
        .expect("list");
    tools
        .invoke("tracememProductGet", json!({ "name": "crm" }))
        .await
        .expect("get");
    tools
        .invoke("tracememCapabilities", json!({}))
        .await
        .expect("capabilities");

    assert_eq!(provider_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn decision_operations_return_their_documented_shapes() {
    let ledger = Arc::new(
        InMemoryLedgerClient::new().with_evaluation(json!({ "outcome": "deny", "score": 0.2 })),
    );
    let tools = build_tools(&ToolsConfig::new(ledger.clone()));
    tools
        .invoke("tracememOpen", json!({ "action": "refund" }))
        .await
        .expect("open");

    let read = tools
        .invoke(
            "tracememRead",
            json!({ "decisionId": "dec_1", "product": "crm", "purpose": "support" }),
        )
        .await
        .expect("read");
    assert_eq!(read, json!({ "product": "crm", "purpose": "support", "records": [] }));

    let evaluation = tools
        .invoke(
            "tracememEvaluate",
            json!({ "decisionId": "dec_1", "policy": "refund-limit", "inputs": { "amount": 30 } }),
        )
        .await
        .expect("evaluate");
    assert_eq!(evaluation, json!({ "outcome": "deny", "score": 0.2 }));

    let approval = tools
        .invoke(
            "tracememRequestApproval",
            json!({ "decisionId": "dec_1", "message": "refund over limit" }),
        )
        .await
        .expect("approval");
    assert_eq!(approval, json!({ "status": "requested" }));

    let write = tools
        .invoke(
            "tracememWrite",
            json!({
                "decisionId": "dec_1",
                "product": "billing",
                "purpose": "finance",
                "mutation": { "refund": 30 },
                "idempotencyKey": "refund-1"
            }),
        )
        .await
        .expect("write");
    assert_eq!(write, json!({ "success": true }));

    let close = tools
        .invoke(
            "tracememClose",
            json!({ "decisionId": "dec_1", "outcome": "commit", "reason": "done" }),
        )
        .await
        .expect("close");
    assert_eq!(close, json!({ "success": true }));
    assert_eq!(ledger.outcome(&id("dec_1")), Some(DecisionOutcome::Commit));

    let trace = tools
        .invoke("tracememTrace", json!({ "decisionId": "dec_1" }))
        .await
        .expect("trace");
    assert_eq!(
        trace["events"],
        json!(["read", "evaluate", "request_approval", "write", "close", "trace"])
    );

    match &ledger.calls()[4] {
        LedgerCall::Write { request, .. } => {
            assert_eq!(request.idempotency_key.as_deref(), Some("refund-1"));
            assert_eq!(request.mutation, json!({ "refund": 30 }));
        }
        other => panic!("unexpected call {other:?}"),
    }
}

#[tokio::test]
async fn product_tools_return_ledger_values_verbatim() {
    let tools = build_tools(&ToolsConfig::new(ledger()));

    let listed = tools
        .invoke("tracememProductsList", json!({ "purpose": "finance" }))
        .await
        .expect("list");
    assert_eq!(
        listed,
        json!({ "products": [{ "name": "billing", "purposes": ["finance"] }] })
    );

    let product = tools
        .invoke("tracememProductGet", json!({ "name": "crm" }))
        .await
        .expect("get");
    assert_eq!(product["name"], "crm");

    let capabilities = tools
        .invoke("tracememCapabilities", Value::Null)
        .await
        .expect("capabilities");
    assert_eq!(capabilities["service"], "in-memory");
}

#[tokio::test]
async fn ledger_failures_surface_as_execution_errors() {
    let hooks = Arc::new(RecordingHooks::default());
    let tools = build_tools(&ToolsConfig::new(ledger()).with_hooks(hooks.clone()));
    tools
        .invoke("tracememOpen", json!({ "action": "a" }))
        .await
        .expect("open");
    tools
        .invoke("tracememClose", json!({ "decisionId": "dec_1", "outcome": "abort" }))
        .await
        .expect("first close");

    let error = tools
        .invoke("tracememClose", json!({ "decisionId": "dec_1", "outcome": "commit" }))
        .await
        .expect_err("second close conflicts");

    assert_eq!(error.kind, ToolErrorKind::Execution);
    assert_eq!(error.ledger_kind, Some(LedgerErrorKind::Conflict));
    assert_eq!(error.tool_name.as_deref(), Some("tracememClose"));
    assert_eq!(
        hooks.events().last().map(String::as_str),
        Some("failure:tracememClose:Execution")
    );

    let missing = tools
        .invoke("tracememProductGet", json!({ "name": "nope" }))
        .await
        .expect_err("unknown product");
    assert_eq!(missing.ledger_kind, Some(LedgerErrorKind::NotFound));
}

#[tokio::test]
async fn malformed_arguments_are_rejected_before_the_ledger() {
    let ledger = ledger();
    let tools = build_tools(&ToolsConfig::new(ledger.clone()));

    let cases = [
        ("tracememNote", json!({ "message": "no id" })),
        ("tracememNote", json!({ "decisionId": "", "message": "blank id" })),
        ("tracememEvaluate", json!({ "decisionId": "d", "policy": "p", "inputs": [1] })),
        ("tracememClose", json!({ "decisionId": "d", "outcome": "rollback" })),
        ("tracememWrite", json!({ "decisionId": "d", "product": "p", "purpose": "x" })),
        ("tracememProductGet", json!({})),
    ];

    for (name, args) in cases {
        let error = tools.invoke(name, args).await.expect_err(name);
        assert_eq!(error.kind, ToolErrorKind::InvalidArguments, "{name}");
    }
    assert!(ledger.calls().is_empty());
}

#[tokio::test]
async fn invoke_json_accepts_model_argument_strings() {
    let tools = build_tools(&ToolsConfig::new(ledger()));

    let output = tools
        .invoke_json("tracememOpen", r#"{"action":"summarize"}"#)
        .await
        .expect("open");
    assert_eq!(output, r#"{"decisionId":"dec_1"}"#);

    let error = tools
        .invoke_json("tracememDelete", "{}")
        .await
        .expect_err("unknown tool");
    assert_eq!(error.kind, ToolErrorKind::NotFound);
}

#[tokio::test]
async fn concurrent_invocations_share_one_registry() {
    let ledger = ledger();
    let tools = Arc::new(build_tools(&ToolsConfig::new(ledger.clone())));

    let opens = (0..8).map(|n| {
        let tools = Arc::clone(&tools);
        async move {
            tools
                .invoke("tracememOpen", json!({ "action": format!("task-{n}") }))
                .await
        }
    });
    let results = join_all(opens).await;

    let mut ids: Vec<String> = results
        .into_iter()
        .map(|result| result.expect("open")["decisionId"].as_str().expect("id").to_string())
        .collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 8);
    assert_eq!(ledger.calls().len(), 8);
}
