//! Request context merging, secret redaction, and the context-provider pipeline.

mod merge;
mod provider;
mod redact;
mod types;

pub mod prelude {
    pub use crate::{
        ContextInput, ContextPipeline, ContextProvider, ContextProviderError,
        FnContextProvider, RequestContext, StaticContextProvider, merge_contexts, redact,
    };
}

pub use merge::merge_contexts;
pub use provider::{
    ContextInput, ContextPipeline, ContextProvider, ContextProviderError, FnContextProvider,
    ResolvedContext, StaticContextProvider,
};
pub use redact::{REDACTED, SENSITIVE_TERMS, is_sensitive_key, redact, redact_map};
pub use types::RequestContext;
