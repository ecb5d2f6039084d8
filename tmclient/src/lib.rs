//! Decision ledger client contract, credential resolution, and client factory.
//!
//! The [`LedgerClient`] trait is the only surface the tool factory and the
//! lifecycle wrapper depend on. [`create_client`] builds the HTTP client from
//! explicit [`ClientOptions`]; [`InMemoryLedgerClient`] records calls locally.

mod client;
mod credentials;
mod error;
mod factory;
#[cfg(feature = "http-client")]
mod http;
mod memory;
mod types;

pub mod prelude {
    pub use crate::{
        AutomationMode, ClientOptions, CloseRequest, DecisionHandle, DecisionOutcome,
        InMemoryLedgerClient, LedgerClient, LedgerError, LedgerErrorKind, LedgerFuture,
        OpenOptions,
    };
}

pub use client::{LedgerClient, LedgerFuture};
pub use credentials::{
    API_KEY_ENV, CredentialSource, EnvCredentialSource, SecretString, resolve_api_key,
};
pub use error::{LedgerError, LedgerErrorKind};
pub use factory::{ClientOptions, DEFAULT_BASE_URL};
#[cfg(feature = "http-client")]
pub use factory::{create_client, create_shared_client};
#[cfg(feature = "http-client")]
pub use http::LedgerHttpClient;
pub use memory::{InMemoryLedgerClient, LedgerCall};
pub use tmcommon::DecisionId;
pub use types::{
    ApprovalRequest, AutomationMode, CloseRequest, DecisionHandle, DecisionOutcome,
    EvaluateRequest, NoteRequest, OpenOptions, ProductQuery, ReadRequest, WriteRequest,
};
