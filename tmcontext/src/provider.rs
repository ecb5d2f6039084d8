//! Context-provider contract and the provide-then-redact pipeline.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use serde_json::json;
//! use tmcontext::{ContextPipeline, RequestContext, StaticContextProvider};
//!
//! # let runtime = tokio::runtime::Builder::new_current_thread().build().expect("runtime");
//! # runtime.block_on(async {
//! let provider = StaticContextProvider::new(
//!     RequestContext::new().with_route("/chat").with_field("authToken", "abc"),
//! );
//! let pipeline = ContextPipeline::new(Some(Arc::new(provider)));
//!
//! let resolved = pipeline.resolve("tracememOpen", &json!({})).await;
//! assert_eq!(resolved.value, json!({ "route": "/chat", "authToken": "[REDACTED]" }));
//! assert!(resolved.failure.is_none());
//! # });
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use serde_json::Value;
use tmcommon::BoxFuture;

use crate::{RequestContext, redact};

/// Arguments handed to a context provider for one tool invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextInput {
    pub tool: String,
    pub args: Value,
    pub runtime: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextProviderError {
    pub message: String,
}

impl ContextProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for ContextProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "context provider failed: {}", self.message)
    }
}

impl Error for ContextProviderError {}

pub trait ContextProvider: Send + Sync {
    fn provide<'a>(
        &'a self,
        input: ContextInput,
    ) -> BoxFuture<'a, Result<RequestContext, ContextProviderError>>;
}

type ProviderFn = dyn Fn(ContextInput) -> BoxFuture<'static, Result<RequestContext, ContextProviderError>>
    + Send
    + Sync;

/// Adapts an async closure into a [`ContextProvider`].
pub struct FnContextProvider {
    handler: Arc<ProviderFn>,
}

impl FnContextProvider {
    pub fn new<F, Fut>(handler: F) -> Self
    where
        F: Fn(ContextInput) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<RequestContext, ContextProviderError>> + Send + 'static,
    {
        let handler: Arc<ProviderFn> = Arc::new(move |input| Box::pin(handler(input)));
        Self { handler }
    }
}

impl ContextProvider for FnContextProvider {
    fn provide<'a>(
        &'a self,
        input: ContextInput,
    ) -> BoxFuture<'a, Result<RequestContext, ContextProviderError>> {
        (self.handler)(input)
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticContextProvider {
    context: RequestContext,
}

impl StaticContextProvider {
    pub fn new(context: RequestContext) -> Self {
        Self { context }
    }
}

impl ContextProvider for StaticContextProvider {
    fn provide<'a>(
        &'a self,
        _input: ContextInput,
    ) -> BoxFuture<'a, Result<RequestContext, ContextProviderError>> {
        Box::pin(async move { Ok(self.context.clone()) })
    }
}

/// Outcome of running the pipeline for one tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedContext {
    /// Context as it will be sent to the ledger (redacted when sanitizing).
    pub value: Value,
    /// Set when the provider failed and an empty context was substituted.
    pub failure: Option<ContextProviderError>,
}

/// `provide -> redact`, each stage usable on its own.
#[derive(Clone)]
pub struct ContextPipeline {
    provider: Option<Arc<dyn ContextProvider>>,
    sanitize: bool,
    runtime: Option<String>,
}

impl Default for ContextPipeline {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ContextPipeline {
    pub fn new(provider: Option<Arc<dyn ContextProvider>>) -> Self {
        Self {
            provider,
            sanitize: true,
            runtime: None,
        }
    }

    pub fn with_sanitize(mut self, sanitize: bool) -> Self {
        self.sanitize = sanitize;
        self
    }

    pub fn with_runtime(mut self, runtime: impl Into<String>) -> Self {
        self.runtime = Some(runtime.into());
        self
    }

    pub fn sanitize(&self) -> bool {
        self.sanitize
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Runs the provider. A missing provider yields an empty context; a panic
    /// inside the provider is reported as an error.
    pub async fn provide(
        &self,
        tool: &str,
        args: &Value,
    ) -> Result<RequestContext, ContextProviderError> {
        let Some(provider) = self.provider.as_ref() else {
            return Ok(RequestContext::default());
        };

        let input = ContextInput {
            tool: tool.to_string(),
            args: args.clone(),
            runtime: self.runtime.clone(),
        };

        // Calling `provide` inside the guarded future also catches panics
        // raised before the provider hands back its future.
        let guarded = AssertUnwindSafe(async move { provider.provide(input).await });
        match guarded.catch_unwind().await {
            Ok(result) => result,
            Err(_) => Err(ContextProviderError::new("context provider panicked")),
        }
    }

    pub fn redact_context(&self, context: &RequestContext) -> Value {
        let value = context.to_value();
        if self.sanitize { redact(&value) } else { value }
    }

    pub async fn resolve(&self, tool: &str, args: &Value) -> ResolvedContext {
        match self.provide(tool, args).await {
            Ok(context) => ResolvedContext {
                value: self.redact_context(&context),
                failure: None,
            },
            Err(error) => ResolvedContext {
                value: RequestContext::default().to_value(),
                failure: Some(error),
            },
        }
    }
}

impl std::fmt::Debug for ContextPipeline {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextPipeline")
            .field("has_provider", &self.provider.is_some())
            .field("sanitize", &self.sanitize)
            .field("runtime", &self.runtime)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn missing_provider_yields_empty_context() {
        let pipeline = ContextPipeline::default();
        let resolved = pipeline.resolve("tracememNote", &json!({})).await;

        assert_eq!(resolved.value, json!({}));
        assert!(resolved.failure.is_none());
    }

    #[tokio::test]
    async fn provider_receives_tool_args_and_runtime() {
        let seen = Arc::new(Mutex::new(None));
        let recorder = Arc::clone(&seen);
        let provider = FnContextProvider::new(move |input: ContextInput| {
            *recorder.lock().expect("lock") = Some(input);
            async { Ok(RequestContext::new().with_tag("seen")) }
        });
        let pipeline = ContextPipeline::new(Some(Arc::new(provider))).with_runtime("edge");

        let resolved = pipeline
            .resolve("tracememRead", &json!({ "product": "crm" }))
            .await;

        assert_eq!(resolved.value, json!({ "tags": ["seen"] }));
        let input = seen.lock().expect("lock").clone().expect("provider called");
        assert_eq!(input.tool, "tracememRead");
        assert_eq!(input.args, json!({ "product": "crm" }));
        assert_eq!(input.runtime.as_deref(), Some("edge"));
    }

    #[tokio::test]
    async fn provider_error_substitutes_empty_context() {
        let provider = FnContextProvider::new(|_input| async {
            Err(ContextProviderError::new("session store offline"))
        });
        let pipeline = ContextPipeline::new(Some(Arc::new(provider)));

        let resolved = pipeline.resolve("tracememOpen", &json!({})).await;

        assert_eq!(resolved.value, json!({}));
        assert_eq!(
            resolved.failure.map(|error| error.message),
            Some("session store offline".to_string())
        );
    }

    #[tokio::test]
    async fn provider_panic_is_reported_as_failure() {
        let provider = FnContextProvider::new(|_input| async {
            if true {
                panic!("provider bug");
            }
            Ok(RequestContext::new())
        });
        let pipeline = ContextPipeline::new(Some(Arc::new(provider)));

        let resolved = pipeline.resolve("tracememOpen", &json!({})).await;
        assert_eq!(resolved.value, json!({}));
        assert!(resolved.failure.is_some());
    }

    struct EagerPanicProvider;

    impl ContextProvider for EagerPanicProvider {
        fn provide<'a>(
            &'a self,
            _input: ContextInput,
        ) -> BoxFuture<'a, Result<RequestContext, ContextProviderError>> {
            panic!("provider failed before building its future");
        }
    }

    #[tokio::test]
    async fn synchronous_provider_panic_is_reported_as_failure() {
        let closure = FnContextProvider::new(|input: ContextInput| {
            if input.tool == "tracememOpen" {
                panic!("closure body panicked");
            }
            async { Ok(RequestContext::new()) }
        });

        for provider in [
            Arc::new(closure) as Arc<dyn ContextProvider>,
            Arc::new(EagerPanicProvider),
        ] {
            let resolved = ContextPipeline::new(Some(provider))
                .resolve("tracememOpen", &json!({}))
                .await;
            assert_eq!(resolved.value, json!({}));
            assert_eq!(
                resolved.failure.map(|error| error.message),
                Some("context provider panicked".to_string())
            );
        }
    }

    #[tokio::test]
    async fn sanitize_flag_controls_redaction_stage() {
        let context = RequestContext::new().with_metadata("apiKey", "secret-value");
        let provider = StaticContextProvider::new(context);

        let sanitized = ContextPipeline::new(Some(Arc::new(provider.clone())))
            .resolve("t", &json!({}))
            .await;
        assert_eq!(sanitized.value, json!({ "metadata": { "apiKey": "[REDACTED]" } }));

        let raw = ContextPipeline::new(Some(Arc::new(provider)))
            .with_sanitize(false)
            .resolve("t", &json!({}))
            .await;
        assert_eq!(raw.value, json!({ "metadata": { "apiKey": "secret-value" } }));
    }
}
