//! Record agent decisions in the TraceMem ledger.
//!
//! This crate re-exports the workspace crates and adds wiring helpers that
//! share one ledger client between the agent tools and the request
//! lifecycle wrapper.
//!
//! ```rust
//! use serde_json::json;
//! use tracemem::prelude::*;
//!
//! # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
//! let bundle = build_bundle_with(in_memory_client(), |config| {
//!     config.with_tool_names(tm_tool_names! { Open => "startTask" })
//! });
//!
//! let opened = bundle
//!     .tools
//!     .invoke("startTask", json!({ "action": "refund" }))
//!     .await
//!     .expect("open");
//! assert_eq!(opened, json!({ "decisionId": "dec_1" }));
//! # });
//! ```

mod macros;
pub mod prelude;
mod runtime;

pub use tmclient;
pub use tmcommon;
pub use tmcontext;
pub use tmdecision;
pub use tmobserve;
pub use tmtooling;

pub use tmclient::{
    API_KEY_ENV, ApprovalRequest, AutomationMode, ClientOptions, CloseRequest, CredentialSource,
    DEFAULT_BASE_URL, DecisionHandle, DecisionOutcome, EnvCredentialSource, EvaluateRequest,
    InMemoryLedgerClient, LedgerCall, LedgerClient, LedgerError, LedgerErrorKind, LedgerFuture,
    NoteRequest, OpenOptions, ProductQuery, ReadRequest, SecretString, WriteRequest,
    resolve_api_key,
};
#[cfg(feature = "http-client")]
pub use tmclient::{LedgerHttpClient, create_client, create_shared_client};
pub use tmcommon::{BoxFuture, DecisionId};
pub use tmcontext::{
    ContextInput, ContextPipeline, ContextProvider, ContextProviderError, FnContextProvider,
    REDACTED, RequestContext, SENSITIVE_TERMS, StaticContextProvider, merge_contexts, redact,
};
pub use tmdecision::{
    CloseAttempt, DEFAULT_ACTION, DecisionContext, DecisionGuard, DecisionHooks, DecisionOptions,
    DecisionResponse, DecisionRun, DecisionStart, DecisionState, HANDLER_PANIC_REASON,
    NoopDecisionHooks, Streaming, StreamingClose, close_decision, with_decision,
};
pub use tmobserve::{
    MetricsObservabilityHooks, SafeDecisionHooks, SafeToolHooks, TracingObservabilityHooks,
};
pub use tmtooling::{
    FunctionTool, LedgerTool, NOTE_CONTEXT_KEY, NoopToolRuntimeHooks, Tool, ToolDefaults,
    ToolDefinition, ToolError, ToolErrorKind, ToolFuture, ToolKind, ToolNames, ToolRegistry,
    ToolRuntimeHooks, ToolsConfig, build_tools,
};
#[cfg(feature = "http-client")]
pub use tmtooling::try_build_tools;

#[cfg(feature = "http-client")]
pub use runtime::{build_bundle_from_env, build_bundle_from_options};
pub use runtime::{
    TraceMemBundle, build_bundle, build_bundle_with, decision_options, in_memory_client,
};
