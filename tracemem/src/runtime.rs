//! Runtime wiring helpers that share one ledger client between the tool set
//! and the request lifecycle wrapper.

use std::sync::Arc;

use crate::{
    DecisionOptions, InMemoryLedgerClient, LedgerClient, ToolRegistry, ToolsConfig, build_tools,
};
#[cfg(feature = "http-client")]
use crate::{ClientOptions, LedgerError};

#[derive(Clone)]
pub struct TraceMemBundle {
    pub client: Arc<dyn LedgerClient>,
    pub tools: ToolRegistry,
    pub decisions: DecisionOptions,
}

pub fn in_memory_client() -> Arc<InMemoryLedgerClient> {
    Arc::new(InMemoryLedgerClient::new())
}

/// Seeds lifecycle options from the defaults the tools were configured with.
pub fn decision_options(config: &ToolsConfig) -> DecisionOptions {
    let defaults = config.defaults();
    let mut options = DecisionOptions::new(config.client());
    if let Some(actor) = &defaults.actor {
        options = options.with_actor(actor.clone());
    }
    if let Some(mode) = defaults.automation_mode {
        options = options.with_automation_mode(mode);
    }
    if let Some(outcome) = defaults.close_outcome_on_error {
        options = options.with_close_outcome_on_error(outcome);
    }
    options
}

pub fn build_bundle(config: &ToolsConfig) -> TraceMemBundle {
    TraceMemBundle {
        client: config.client(),
        tools: build_tools(config),
        decisions: decision_options(config),
    }
}

pub fn build_bundle_with<F>(client: Arc<dyn LedgerClient>, configure: F) -> TraceMemBundle
where
    F: FnOnce(ToolsConfig) -> ToolsConfig,
{
    build_bundle(&configure(ToolsConfig::new(client)))
}

#[cfg(feature = "http-client")]
pub fn build_bundle_from_options<F>(
    options: ClientOptions,
    configure: F,
) -> Result<TraceMemBundle, LedgerError>
where
    F: FnOnce(ToolsConfig) -> ToolsConfig,
{
    let config = configure(ToolsConfig::from_client_options(options)?);
    Ok(build_bundle(&config))
}

/// Builds an HTTP-backed bundle whose key comes from `TRACEMEM_API_KEY`.
#[cfg(feature = "http-client")]
pub fn build_bundle_from_env() -> Result<TraceMemBundle, LedgerError> {
    build_bundle_from_options(ClientOptions::from_env(), |config| config)
}
