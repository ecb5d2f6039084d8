//! Agent-facing tools over the TraceMem decision ledger.
//!
//! [`build_tools`] turns a [`ToolsConfig`] into a [`ToolRegistry`] of twelve
//! [`LedgerTool`]s. Host applications may register their own [`Tool`]s in
//! the same registry.

mod args;
mod config;
mod error;
mod factory;
mod hooks;
mod kind;
mod ledger;
mod names;
mod registry;
mod tool;

pub mod prelude {
    pub use crate::{
        LedgerTool, NoopToolRuntimeHooks, Tool, ToolDefaults, ToolDefinition, ToolError,
        ToolErrorKind, ToolFuture, ToolKind, ToolNames, ToolRegistry, ToolRuntimeHooks,
        ToolsConfig, build_tools,
    };
}

pub use args::{decision_id, decode_args, parse_json_object, parse_json_value, required_string};
pub use config::{ToolDefaults, ToolsConfig};
pub use error::{ToolError, ToolErrorKind};
pub use factory::build_tools;
#[cfg(feature = "http-client")]
pub use factory::try_build_tools;
pub use hooks::{NoopToolRuntimeHooks, ToolRuntimeHooks};
pub use kind::ToolKind;
pub use ledger::{LedgerTool, NOTE_CONTEXT_KEY};
pub use names::ToolNames;
pub use registry::ToolRegistry;
pub use tool::{FunctionTool, Tool, ToolDefinition, ToolFuture};
