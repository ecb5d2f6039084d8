//! Runtime hooks for ledger tool execution lifecycle events.
//!
//! ```rust
//! use tmtooling::{NoopToolRuntimeHooks, ToolRuntimeHooks};
//!
//! fn assert_hooks_trait(_hooks: &dyn ToolRuntimeHooks) {}
//!
//! let hooks = NoopToolRuntimeHooks;
//! assert_hooks_trait(&hooks);
//! ```

use std::time::Duration;

use tmcontext::ContextProviderError;

use crate::{ToolError, ToolKind};

pub trait ToolRuntimeHooks: Send + Sync {
    fn on_execution_start(&self, _kind: ToolKind, _tool_name: &str) {}

    fn on_execution_success(&self, _kind: ToolKind, _tool_name: &str, _elapsed: Duration) {}

    fn on_execution_failure(
        &self,
        _kind: ToolKind,
        _tool_name: &str,
        _error: &ToolError,
        _elapsed: Duration,
    ) {
    }

    /// The call continued with an empty context.
    fn on_context_provider_failure(
        &self,
        _kind: ToolKind,
        _tool_name: &str,
        _error: &ContextProviderError,
    ) {
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopToolRuntimeHooks;

impl ToolRuntimeHooks for NoopToolRuntimeHooks {}
