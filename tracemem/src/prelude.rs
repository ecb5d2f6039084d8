//! Common imports for most TraceMem integrations.

pub use crate::{
    build_bundle, build_bundle_with, close_decision, decision_options, in_memory_client,
    merge_contexts, redact, with_decision,
};
#[cfg(feature = "http-client")]
pub use crate::{build_bundle_from_env, build_bundle_from_options, create_shared_client};
pub use crate::{tm_context, tm_tool_names};
pub use crate::{
    AutomationMode, ClientOptions, CloseAttempt, CloseRequest, ContextProvider,
    ContextProviderError, DecisionContext, DecisionHooks, DecisionId, DecisionOptions,
    DecisionOutcome, DecisionResponse, InMemoryLedgerClient, LedgerClient, LedgerError,
    LedgerErrorKind, RequestContext, SafeDecisionHooks, SafeToolHooks, Streaming, StreamingClose,
    Tool, ToolError, ToolKind, ToolNames, ToolRegistry, ToolRuntimeHooks, ToolsConfig,
    TraceMemBundle, TracingObservabilityHooks,
};
