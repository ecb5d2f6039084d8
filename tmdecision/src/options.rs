//! Lifecycle wrapper configuration.

use std::sync::Arc;

use tmclient::{AutomationMode, DecisionOutcome, LedgerClient, OpenOptions};

use crate::{DecisionHooks, NoopDecisionHooks};

/// Action name used when none is configured.
pub const DEFAULT_ACTION: &str = "default";

/// How the decision is opened for each request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionStart {
    Action(String),
    Intent(String),
}

impl Default for DecisionStart {
    fn default() -> Self {
        Self::Action(DEFAULT_ACTION.to_string())
    }
}

/// Close behaviour for responses that report themselves as streaming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamingClose {
    /// Close as soon as the handler returns, streaming or not.
    #[default]
    CloseImmediately,
    /// Leave streaming decisions open; the caller closes once the stream ends.
    /// Only consulted by the `*_streaming` entry points.
    CallerCloses,
}

#[derive(Clone)]
pub struct DecisionOptions {
    client: Arc<dyn LedgerClient>,
    start: DecisionStart,
    actor: Option<String>,
    automation_mode: Option<AutomationMode>,
    close_outcome_on_error: DecisionOutcome,
    streaming_close: StreamingClose,
    hooks: Arc<dyn DecisionHooks>,
}

impl DecisionOptions {
    pub fn new(client: Arc<dyn LedgerClient>) -> Self {
        Self {
            client,
            start: DecisionStart::default(),
            actor: None,
            automation_mode: None,
            close_outcome_on_error: DecisionOutcome::Abort,
            streaming_close: StreamingClose::default(),
            hooks: Arc::new(NoopDecisionHooks),
        }
    }

    /// Resolves an HTTP client through the client factory. A missing API key
    /// is returned as a configuration error.
    #[cfg(feature = "http-client")]
    pub fn from_client_options(
        options: tmclient::ClientOptions,
    ) -> Result<Self, tmclient::LedgerError> {
        Ok(Self::new(tmclient::create_shared_client(options)?))
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.start = DecisionStart::Action(action.into());
        self
    }

    pub fn with_intent(mut self, intent: impl Into<String>) -> Self {
        self.start = DecisionStart::Intent(intent.into());
        self
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    pub fn with_automation_mode(mut self, mode: AutomationMode) -> Self {
        self.automation_mode = Some(mode);
        self
    }

    pub fn with_close_outcome_on_error(mut self, outcome: DecisionOutcome) -> Self {
        self.close_outcome_on_error = outcome;
        self
    }

    pub fn with_streaming_close(mut self, streaming_close: StreamingClose) -> Self {
        self.streaming_close = streaming_close;
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn DecisionHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn client(&self) -> Arc<dyn LedgerClient> {
        Arc::clone(&self.client)
    }

    pub fn start(&self) -> &DecisionStart {
        &self.start
    }

    pub fn close_outcome_on_error(&self) -> DecisionOutcome {
        self.close_outcome_on_error
    }

    pub fn streaming_close(&self) -> StreamingClose {
        self.streaming_close
    }

    pub(crate) fn hooks(&self) -> &dyn DecisionHooks {
        self.hooks.as_ref()
    }

    pub(crate) fn open_options(&self) -> OpenOptions {
        OpenOptions {
            actor: self.actor.clone(),
            automation_mode: self.automation_mode,
            metadata: None,
        }
    }
}

impl std::fmt::Debug for DecisionOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecisionOptions")
            .field("start", &self.start)
            .field("actor", &self.actor)
            .field("automation_mode", &self.automation_mode)
            .field("close_outcome_on_error", &self.close_outcome_on_error)
            .field("streaming_close", &self.streaming_close)
            .finish()
    }
}
