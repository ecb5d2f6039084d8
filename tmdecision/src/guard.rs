//! Open-invoke-close wrapper around request handlers.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use tmclient::{InMemoryLedgerClient, LedgerError};
//! use tmcommon::DecisionId;
//! use tmdecision::{DecisionContext, DecisionOptions, with_decision};
//!
//! # let runtime = tokio::runtime::Builder::new_current_thread().build().expect("runtime");
//! # runtime.block_on(async {
//! let ledger = Arc::new(InMemoryLedgerClient::new());
//! let guard = with_decision(
//!     |name: String, _ctx: DecisionContext<()>, id: DecisionId| async move {
//!         Ok::<_, LedgerError>(format!("hello {name} ({id})"))
//!     },
//!     DecisionOptions::new(ledger.clone()).with_action("greet"),
//! );
//!
//! let reply = guard.call("ada".to_string(), ()).await.expect("handler succeeds");
//! assert_eq!(reply, "hello ada (dec_1)");
//! # });
//! ```

use std::fmt::Display;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures_util::FutureExt;

use tmclient::{CloseRequest, DecisionHandle, DecisionOutcome, LedgerClient, LedgerError};
use tmcommon::DecisionId;

use crate::{
    CloseAttempt, DecisionContext, DecisionOptions, DecisionResponse, DecisionStart,
    DecisionState, StreamingClose,
};

/// Close reason recorded when the handler panics.
pub const HANDLER_PANIC_REASON: &str = "handler panicked";

/// Wraps `handler` so every call runs inside its own decision.
pub fn with_decision<H>(handler: H, options: DecisionOptions) -> DecisionGuard<H> {
    DecisionGuard { handler, options }
}

/// Everything a wrapped call produced, for callers that need more than the
/// handler's result.
#[derive(Debug)]
pub struct DecisionRun<Resp, E> {
    pub result: Result<Resp, E>,
    pub state: DecisionState,
    pub close: CloseAttempt,
}

#[derive(Clone)]
pub struct DecisionGuard<H> {
    handler: H,
    options: DecisionOptions,
}

impl<H> DecisionGuard<H> {
    pub fn options(&self) -> &DecisionOptions {
        &self.options
    }

    /// Runs the handler inside a fresh decision and returns its result.
    ///
    /// The decision is always closed once the handler returns. Use
    /// [`DecisionGuard::call_streaming`] to let streaming responses keep it
    /// open.
    pub async fn call<Req, Ctx, Resp, E, Fut>(
        &self,
        request: Req,
        context: Ctx,
    ) -> Result<Resp, E>
    where
        H: Fn(Req, DecisionContext<Ctx>, DecisionId) -> Fut,
        Fut: Future<Output = Result<Resp, E>>,
        E: From<LedgerError> + Display,
    {
        self.run(request, context).await.result
    }

    pub async fn run<Req, Ctx, Resp, E, Fut>(
        &self,
        request: Req,
        context: Ctx,
    ) -> DecisionRun<Resp, E>
    where
        H: Fn(Req, DecisionContext<Ctx>, DecisionId) -> Fut,
        Fut: Future<Output = Result<Resp, E>>,
        E: From<LedgerError> + Display,
    {
        self.run_with(request, context, |_: &Resp| false).await
    }

    /// Like [`DecisionGuard::call`], but honours
    /// [`StreamingClose::CallerCloses`] for responses that report themselves
    /// as streaming.
    pub async fn call_streaming<Req, Ctx, Resp, E, Fut>(
        &self,
        request: Req,
        context: Ctx,
    ) -> Result<Resp, E>
    where
        H: Fn(Req, DecisionContext<Ctx>, DecisionId) -> Fut,
        Fut: Future<Output = Result<Resp, E>>,
        Resp: DecisionResponse,
        E: From<LedgerError> + Display,
    {
        self.run_streaming(request, context).await.result
    }

    pub async fn run_streaming<Req, Ctx, Resp, E, Fut>(
        &self,
        request: Req,
        context: Ctx,
    ) -> DecisionRun<Resp, E>
    where
        H: Fn(Req, DecisionContext<Ctx>, DecisionId) -> Fut,
        Fut: Future<Output = Result<Resp, E>>,
        Resp: DecisionResponse,
        E: From<LedgerError> + Display,
    {
        self.run_with(request, context, |response: &Resp| response.is_streaming())
            .await
    }

    async fn run_with<Req, Ctx, Resp, E, Fut, S>(
        &self,
        request: Req,
        context: Ctx,
        is_streaming: S,
    ) -> DecisionRun<Resp, E>
    where
        H: Fn(Req, DecisionContext<Ctx>, DecisionId) -> Fut,
        Fut: Future<Output = Result<Resp, E>>,
        E: From<LedgerError> + Display,
        S: Fn(&Resp) -> bool,
    {
        let hooks = self.options.hooks();

        let handle = match self.open().await {
            Ok(handle) => handle,
            Err(error) => {
                tracing::error!(
                    start = ?self.options.start(),
                    error = %error,
                    "failed to open decision"
                );
                hooks.on_open_failure(&error);
                return DecisionRun {
                    result: Err(E::from(error)),
                    state: DecisionState::NotOpened,
                    close: CloseAttempt::Skipped,
                };
            }
        };

        let decision_id = handle.decision_id;
        let state = DecisionState::NotOpened.opened(decision_id.clone());
        hooks.on_open(&decision_id);

        let handler = &self.handler;
        let invocation_id = decision_id.clone();
        let invocation = AssertUnwindSafe(async move {
            handler(
                request,
                DecisionContext::new(invocation_id.clone(), context),
                invocation_id,
            )
            .await
        })
        .catch_unwind()
        .await;

        let result = match invocation {
            Ok(result) => result,
            Err(panic) => {
                tracing::error!(decision_id = %decision_id, "handler panicked");
                let request = CloseRequest::new(self.options.close_outcome_on_error())
                    .with_reason(HANDLER_PANIC_REASON);
                self.close(&decision_id, request).await;
                std::panic::resume_unwind(panic);
            }
        };

        let close_request = match &result {
            Ok(response)
                if self.options.streaming_close() == StreamingClose::CallerCloses
                    && is_streaming(response) =>
            {
                None
            }
            Ok(_) => Some(CloseRequest::commit()),
            Err(error) => Some(
                CloseRequest::new(self.options.close_outcome_on_error())
                    .with_reason(error.to_string()),
            ),
        };

        let (state, close) = match close_request {
            Some(request) => {
                let outcome = request.outcome;
                let close = self.close(&decision_id, request).await;
                let state = if close.is_closed() {
                    state.closed(outcome)
                } else {
                    state
                };
                (state, close)
            }
            None => {
                tracing::debug!(
                    decision_id = %decision_id,
                    "streaming response; leaving decision open for the caller"
                );
                let close = CloseAttempt::Skipped;
                hooks.on_close(&decision_id, DecisionOutcome::Commit, &close);
                (state, close)
            }
        };

        DecisionRun {
            result,
            state,
            close,
        }
    }

    async fn close(&self, decision_id: &DecisionId, request: CloseRequest) -> CloseAttempt {
        let outcome = request.outcome;
        let client = self.options.client();
        let close = close_decision(client.as_ref(), decision_id, request).await;
        self.options.hooks().on_close(decision_id, outcome, &close);
        close
    }

    async fn open(&self) -> Result<DecisionHandle, LedgerError> {
        let client = self.options.client();
        let options = self.options.open_options();
        match self.options.start() {
            DecisionStart::Intent(intent) => client.create_decision(intent, options).await,
            DecisionStart::Action(action) => client.open(action, options).await,
        }
    }
}

impl<H> std::fmt::Debug for DecisionGuard<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecisionGuard")
            .field("options", &self.options)
            .finish()
    }
}

/// Best-effort close. Failures are logged and returned, never raised.
///
/// Callers that keep streaming decisions open use this once the stream ends.
pub async fn close_decision(
    client: &dyn LedgerClient,
    decision_id: &DecisionId,
    request: CloseRequest,
) -> CloseAttempt {
    let outcome = request.outcome;
    match client.close(decision_id, request).await {
        Ok(()) => {
            tracing::debug!(decision_id = %decision_id, outcome = %outcome, "closed decision");
            CloseAttempt::Closed
        }
        Err(error) => {
            tracing::warn!(
                decision_id = %decision_id,
                outcome = %outcome,
                error = %error,
                "failed to close decision"
            );
            CloseAttempt::Failed(error)
        }
    }
}
