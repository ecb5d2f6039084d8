//! HTTP ledger client.

mod serde_api;
mod transport;


pub use transport::LedgerHttpClient;
