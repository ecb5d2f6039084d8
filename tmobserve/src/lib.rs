//! Production-friendly observability hooks for ledger tools and decision lifecycles.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use tmclient::InMemoryLedgerClient;
//! use tmobserve::{MetricsObservabilityHooks, SafeToolHooks, TracingObservabilityHooks};
//! use tmtooling::ToolsConfig;
//!
//! let config = ToolsConfig::new(Arc::new(InMemoryLedgerClient::new()))
//!     .with_hooks(Arc::new(SafeToolHooks::new(TracingObservabilityHooks)));
//! let _metrics = MetricsObservabilityHooks;
//! # let _ = config;
//! ```

mod metrics_hooks;
mod safe_hooks;
mod tracing_hooks;

pub use metrics_hooks::MetricsObservabilityHooks;
pub use safe_hooks::{SafeDecisionHooks, SafeToolHooks};
pub use tracing_hooks::TracingObservabilityHooks;

pub mod prelude {
    pub use crate::{
        MetricsObservabilityHooks, SafeDecisionHooks, SafeToolHooks, TracingObservabilityHooks,
    };
}

#[cfg(test)]
mod tests;
