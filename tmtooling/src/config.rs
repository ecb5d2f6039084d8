//! Tool factory configuration.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use tmclient::{AutomationMode, InMemoryLedgerClient};
//! use tmtooling::{ToolKind, ToolsConfig};
//!
//! let config = ToolsConfig::new(Arc::new(InMemoryLedgerClient::new()))
//!     .with_tool_name(ToolKind::Open, "startTask")
//!     .with_actor("support-bot")
//!     .with_automation_mode(AutomationMode::Propose)
//!     .with_runtime_hint("edge");
//!
//! assert!(config.sanitize());
//! assert_eq!(config.tool_names().resolve(ToolKind::Open), "startTask");
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tmclient::{AutomationMode, DecisionOutcome, LedgerClient};
use tmcontext::{ContextPipeline, ContextProvider};

use crate::{NoopToolRuntimeHooks, ToolKind, ToolNames, ToolRuntimeHooks};

/// Fallbacks applied when a tool call omits the matching argument.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolDefaults {
    pub actor: Option<String>,
    pub automation_mode: Option<AutomationMode>,
    /// Consumed by request wrappers built from the same configuration.
    pub close_outcome_on_error: Option<DecisionOutcome>,
}

#[derive(Clone)]
pub struct ToolsConfig {
    client: Arc<dyn LedgerClient>,
    tool_names: ToolNames,
    sanitize: bool,
    defaults: ToolDefaults,
    context_provider: Option<Arc<dyn ContextProvider>>,
    runtime_hint: Option<String>,
    expose_decision_handle_tool: bool,
    hooks: Arc<dyn ToolRuntimeHooks>,
}

impl ToolsConfig {
    pub fn new(client: Arc<dyn LedgerClient>) -> Self {
        Self {
            client,
            tool_names: ToolNames::default(),
            sanitize: true,
            defaults: ToolDefaults::default(),
            context_provider: None,
            runtime_hint: None,
            expose_decision_handle_tool: false,
            hooks: Arc::new(NoopToolRuntimeHooks),
        }
    }

    /// Builds an HTTP-backed configuration, resolving the API key from the
    /// options or the environment.
    #[cfg(feature = "http-client")]
    pub fn from_client_options(
        options: tmclient::ClientOptions,
    ) -> Result<Self, tmclient::LedgerError> {
        Ok(Self::new(tmclient::create_shared_client(options)?))
    }

    pub fn with_tool_names(mut self, tool_names: ToolNames) -> Self {
        self.tool_names = tool_names;
        self
    }

    pub fn with_tool_name(mut self, kind: ToolKind, name: impl Into<String>) -> Self {
        self.tool_names.set(kind, name);
        self
    }

    pub fn with_sanitize(mut self, sanitize: bool) -> Self {
        self.sanitize = sanitize;
        self
    }

    pub fn with_defaults(mut self, defaults: ToolDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.defaults.actor = Some(actor.into());
        self
    }

    pub fn with_automation_mode(mut self, mode: AutomationMode) -> Self {
        self.defaults.automation_mode = Some(mode);
        self
    }

    pub fn with_close_outcome_on_error(mut self, outcome: DecisionOutcome) -> Self {
        self.defaults.close_outcome_on_error = Some(outcome);
        self
    }

    pub fn with_context_provider<P>(self, provider: P) -> Self
    where
        P: ContextProvider + 'static,
    {
        self.with_shared_context_provider(Arc::new(provider))
    }

    pub fn with_shared_context_provider(mut self, provider: Arc<dyn ContextProvider>) -> Self {
        self.context_provider = Some(provider);
        self
    }

    pub fn with_runtime_hint(mut self, runtime_hint: impl Into<String>) -> Self {
        self.runtime_hint = Some(runtime_hint.into());
        self
    }

    /// Reserved; accepted but no extra tool is registered.
    pub fn with_expose_decision_handle_tool(mut self, expose: bool) -> Self {
        self.expose_decision_handle_tool = expose;
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn ToolRuntimeHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn client(&self) -> Arc<dyn LedgerClient> {
        Arc::clone(&self.client)
    }

    pub fn tool_names(&self) -> &ToolNames {
        &self.tool_names
    }

    pub fn sanitize(&self) -> bool {
        self.sanitize
    }

    pub fn defaults(&self) -> &ToolDefaults {
        &self.defaults
    }

    pub fn runtime_hint(&self) -> Option<&str> {
        self.runtime_hint.as_deref()
    }

    pub fn expose_decision_handle_tool(&self) -> bool {
        self.expose_decision_handle_tool
    }

    pub fn hooks(&self) -> Arc<dyn ToolRuntimeHooks> {
        Arc::clone(&self.hooks)
    }

    pub(crate) fn pipeline(&self) -> ContextPipeline {
        let pipeline =
            ContextPipeline::new(self.context_provider.clone()).with_sanitize(self.sanitize);
        match &self.runtime_hint {
            Some(runtime) => pipeline.with_runtime(runtime.clone()),
            None => pipeline,
        }
    }
}

impl std::fmt::Debug for ToolsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolsConfig")
            .field("tool_names", &self.tool_names)
            .field("sanitize", &self.sanitize)
            .field("defaults", &self.defaults)
            .field("has_context_provider", &self.context_provider.is_some())
            .field("runtime_hint", &self.runtime_hint)
            .field("expose_decision_handle_tool", &self.expose_decision_handle_tool)
            .finish()
    }
}
