//! Decision lifecycle wrapper for request handlers.
//!
//! [`with_decision`] opens a decision before the handler runs, hands the
//! handler its id, and closes the decision afterwards: `commit` on success,
//! the configured outcome with the error text as reason on failure. A
//! panicking handler still gets a close attempt before the panic resumes.

mod guard;
mod hooks;
mod options;
mod response;
mod state;

pub mod prelude {
    pub use crate::{
        CloseAttempt, DecisionContext, DecisionGuard, DecisionHooks, DecisionOptions,
        DecisionResponse, DecisionStart, DecisionState, StreamingClose, with_decision,
    };
}

pub use guard::{
    DecisionGuard, DecisionRun, HANDLER_PANIC_REASON, close_decision, with_decision,
};
pub use hooks::{DecisionHooks, NoopDecisionHooks};
pub use options::{DEFAULT_ACTION, DecisionOptions, DecisionStart, StreamingClose};
pub use response::{DecisionContext, DecisionResponse, Streaming};
pub use state::{CloseAttempt, DecisionState};
