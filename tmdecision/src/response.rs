//! Request context and response contracts seen by wrapped handlers.

use std::ops::{Deref, DerefMut};

use serde_json::Value;
use tmcommon::DecisionId;

/// The caller's context with the open decision's id attached.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionContext<Ctx> {
    pub decision_id: DecisionId,
    pub inner: Ctx,
}

impl<Ctx> DecisionContext<Ctx> {
    pub fn new(decision_id: DecisionId, inner: Ctx) -> Self {
        Self { decision_id, inner }
    }

    pub fn decision_id(&self) -> &DecisionId {
        &self.decision_id
    }

    pub fn into_inner(self) -> Ctx {
        self.inner
    }
}

impl<Ctx> Deref for DecisionContext<Ctx> {
    type Target = Ctx;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<Ctx> DerefMut for DecisionContext<Ctx> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

/// Lets [`crate::DecisionGuard::call_streaming`] tell streaming responses apart.
/// Streaming responses may keep the decision open under
/// [`crate::StreamingClose::CallerCloses`].
pub trait DecisionResponse {
    fn is_streaming(&self) -> bool {
        false
    }
}

impl DecisionResponse for () {}

impl DecisionResponse for String {}

impl DecisionResponse for &str {}

impl DecisionResponse for Value {}

impl<T> DecisionResponse for Vec<T> {}

impl<T> DecisionResponse for Option<T>
where
    T: DecisionResponse,
{
    fn is_streaming(&self) -> bool {
        self.as_ref().is_some_and(DecisionResponse::is_streaming)
    }
}

/// Marks a response as streaming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Streaming<T>(pub T);

impl<T> Streaming<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> DecisionResponse for Streaming<T> {
    fn is_streaming(&self) -> bool {
        true
    }
}
