//! Builds the ledger tool set from a [`ToolsConfig`].
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use tmclient::InMemoryLedgerClient;
//! use tmtooling::{ToolKind, ToolsConfig, build_tools};
//!
//! let config = ToolsConfig::new(Arc::new(InMemoryLedgerClient::new()))
//!     .with_tool_name(ToolKind::Open, "startTask");
//! let tools = build_tools(&config);
//!
//! assert_eq!(tools.len(), 12);
//! assert!(tools.contains("startTask"));
//! assert!(!tools.contains("tracememOpen"));
//! ```

use std::sync::Arc;

use crate::ledger::ToolShared;
use crate::{LedgerTool, ToolKind, ToolRegistry, ToolsConfig};

/// Registers all twelve ledger tools under their configured names.
///
/// When two kinds resolve to the same name the later kind wins.
pub fn build_tools(config: &ToolsConfig) -> ToolRegistry {
    let shared = Arc::new(ToolShared {
        client: config.client(),
        pipeline: config.pipeline(),
        defaults: config.defaults().clone(),
        hooks: config.hooks(),
    });

    let mut registry = ToolRegistry::new();
    for kind in ToolKind::ALL {
        let name = config.tool_names().resolve(kind);
        let tool = LedgerTool::new(kind, name, Arc::clone(&shared));
        if registry.register(tool).is_some() {
            tracing::warn!(
                tool_name = %name,
                kind = %kind,
                "tool name override collides with another ledger tool"
            );
        }
    }

    tracing::debug!(
        tools = registry.len(),
        sanitize = config.sanitize(),
        runtime = config.runtime_hint().unwrap_or("unspecified"),
        "built ledger tools"
    );
    registry
}

/// Resolves an HTTP client from `options`, lets `configure` adjust the rest of
/// the configuration, and builds the tool set.
#[cfg(feature = "http-client")]
pub fn try_build_tools<F>(
    options: tmclient::ClientOptions,
    configure: F,
) -> Result<ToolRegistry, crate::ToolError>
where
    F: FnOnce(ToolsConfig) -> ToolsConfig,
{
    let config = configure(ToolsConfig::from_client_options(options)?);
    Ok(build_tools(&config))
}
