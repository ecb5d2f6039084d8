//! In-memory ledger client that records every call.
//!
//! Useful as a test double for tools and request handlers, and as a local
//! stand-in when no ledger service is reachable.
//!
//! ```rust
//! use tmclient::{CloseRequest, InMemoryLedgerClient, LedgerClient, OpenOptions};
//!
//! # tokio_test_block(async {
//! let ledger = InMemoryLedgerClient::new();
//! let handle = ledger.open("refactor", OpenOptions::new()).await.expect("open");
//! ledger.close(&handle.decision_id, CloseRequest::commit()).await.expect("close");
//! assert_eq!(ledger.outcome(&handle.decision_id).map(|o| o.as_str()), Some("commit"));
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().expect("runtime").block_on(f)
//! # }
//! ```

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use serde_json::{Value, json};
use tmcommon::DecisionId;

use crate::{
    ApprovalRequest, CloseRequest, DecisionHandle, DecisionOutcome, EvaluateRequest,
    LedgerClient, LedgerError, LedgerFuture, NoteRequest, OpenOptions, ProductQuery, ReadRequest,
    WriteRequest,
};

#[derive(Debug, Clone, PartialEq)]
pub enum LedgerCall {
    Open {
        action: String,
        options: OpenOptions,
    },
    CreateDecision {
        intent: String,
        options: OpenOptions,
    },
    Note {
        decision_id: DecisionId,
        request: NoteRequest,
    },
    Read {
        decision_id: DecisionId,
        request: ReadRequest,
    },
    Evaluate {
        decision_id: DecisionId,
        request: EvaluateRequest,
    },
    RequestApproval {
        decision_id: DecisionId,
        request: ApprovalRequest,
    },
    Write {
        decision_id: DecisionId,
        request: WriteRequest,
    },
    Trace {
        decision_id: DecisionId,
    },
    Receipt {
        decision_id: DecisionId,
    },
    Close {
        decision_id: DecisionId,
        request: CloseRequest,
    },
    ListProducts {
        query: ProductQuery,
    },
    GetProduct {
        name: String,
    },
    Capabilities,
}

impl LedgerCall {
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Open { .. } => "open",
            Self::CreateDecision { .. } => "create_decision",
            Self::Note { .. } => "note",
            Self::Read { .. } => "read",
            Self::Evaluate { .. } => "evaluate",
            Self::RequestApproval { .. } => "request_approval",
            Self::Write { .. } => "write",
            Self::Trace { .. } => "trace",
            Self::Receipt { .. } => "receipt",
            Self::Close { .. } => "close",
            Self::ListProducts { .. } => "list_products",
            Self::GetProduct { .. } => "get_product",
            Self::Capabilities => "capabilities",
        }
    }

    pub fn decision_id(&self) -> Option<&DecisionId> {
        match self {
            Self::Note { decision_id, .. }
            | Self::Read { decision_id, .. }
            | Self::Evaluate { decision_id, .. }
            | Self::RequestApproval { decision_id, .. }
            | Self::Write { decision_id, .. }
            | Self::Trace { decision_id }
            | Self::Receipt { decision_id }
            | Self::Close { decision_id, .. } => Some(decision_id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecisionStatus {
    Open,
    Closed(DecisionOutcome),
}

#[derive(Debug, Default)]
struct LedgerState {
    next_id: u64,
    calls: Vec<LedgerCall>,
    decisions: HashMap<DecisionId, DecisionStatus>,
    products: Vec<Value>,
    evaluation: Option<Value>,
    open_failure: Option<LedgerError>,
    close_failure: Option<LedgerError>,
}

#[derive(Debug, Default)]
pub struct InMemoryLedgerClient {
    state: Mutex<LedgerState>,
}

impl InMemoryLedgerClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a catalog entry. Entries should carry a `name` and may list `purposes`.
    pub fn with_product(self, product: Value) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.products.push(product);
        }
        self
    }

    pub fn with_evaluation(self, evaluation: Value) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.evaluation = Some(evaluation);
        }
        self
    }

    /// Every open/create call fails with `error` until cleared.
    pub fn with_open_failure(self, error: LedgerError) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.open_failure = Some(error);
        }
        self
    }

    /// Every close call fails with `error` (after being recorded).
    pub fn with_close_failure(self, error: LedgerError) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.close_failure = Some(error);
        }
        self
    }

    pub fn calls(&self) -> Vec<LedgerCall> {
        self.state
            .lock()
            .map(|state| state.calls.clone())
            .unwrap_or_default()
    }

    pub fn close_requests(&self, decision_id: &DecisionId) -> Vec<CloseRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                LedgerCall::Close {
                    decision_id: id,
                    request,
                } if &id == decision_id => Some(request),
                _ => None,
            })
            .collect()
    }

    pub fn outcome(&self, decision_id: &DecisionId) -> Option<DecisionOutcome> {
        let state = self.state.lock().ok()?;
        match state.decisions.get(decision_id) {
            Some(DecisionStatus::Closed(outcome)) => Some(*outcome),
            _ => None,
        }
    }

    pub fn is_open(&self, decision_id: &DecisionId) -> bool {
        self.state
            .lock()
            .map(|state| state.decisions.get(decision_id) == Some(&DecisionStatus::Open))
            .unwrap_or(false)
    }

    fn state(&self) -> Result<MutexGuard<'_, LedgerState>, LedgerError> {
        self.state
            .lock()
            .map_err(|_| LedgerError::other("in-memory ledger lock poisoned"))
    }

    fn record(&self, call: LedgerCall) -> Result<MutexGuard<'_, LedgerState>, LedgerError> {
        let mut state = self.state()?;
        state.calls.push(call);
        Ok(state)
    }

    fn allocate(&self, call: LedgerCall) -> Result<DecisionHandle, LedgerError> {
        let mut state = self.record(call)?;
        if let Some(error) = state.open_failure.clone() {
            return Err(error);
        }

        state.next_id += 1;
        let decision_id = DecisionId::new(format!("dec_{}", state.next_id))
            .ok_or_else(|| LedgerError::other("generated an empty decision id"))?;
        state
            .decisions
            .insert(decision_id.clone(), DecisionStatus::Open);
        Ok(DecisionHandle::new(decision_id))
    }

    fn require_open(state: &LedgerState, decision_id: &DecisionId) -> Result<(), LedgerError> {
        match state.decisions.get(decision_id) {
            Some(DecisionStatus::Open) => Ok(()),
            Some(DecisionStatus::Closed(outcome)) => Err(LedgerError::conflict(format!(
                "decision '{decision_id}' is already closed ({outcome})"
            ))),
            None => Err(unknown_decision(decision_id)),
        }
    }

    fn require_known(state: &LedgerState, decision_id: &DecisionId) -> Result<(), LedgerError> {
        if state.decisions.contains_key(decision_id) {
            Ok(())
        } else {
            Err(unknown_decision(decision_id))
        }
    }
}

fn unknown_decision(decision_id: &DecisionId) -> LedgerError {
    LedgerError::not_found(format!("decision '{decision_id}' does not exist"))
}

fn product_name(product: &Value) -> Option<&str> {
    product.get("name").and_then(Value::as_str)
}

fn product_serves(product: &Value, purpose: &str) -> bool {
    match product.get("purposes").and_then(Value::as_array) {
        Some(purposes) => purposes.iter().any(|entry| entry.as_str() == Some(purpose)),
        None => true,
    }
}

impl LedgerClient for InMemoryLedgerClient {
    fn open<'a>(
        &'a self,
        action: &'a str,
        options: OpenOptions,
    ) -> LedgerFuture<'a, Result<DecisionHandle, LedgerError>> {
        Box::pin(async move {
            self.allocate(LedgerCall::Open {
                action: action.to_string(),
                options,
            })
        })
    }

    fn create_decision<'a>(
        &'a self,
        intent: &'a str,
        options: OpenOptions,
    ) -> LedgerFuture<'a, Result<DecisionHandle, LedgerError>> {
        Box::pin(async move {
            self.allocate(LedgerCall::CreateDecision {
                intent: intent.to_string(),
                options,
            })
        })
    }

    fn note<'a>(
        &'a self,
        decision_id: &'a DecisionId,
        request: NoteRequest,
    ) -> LedgerFuture<'a, Result<(), LedgerError>> {
        Box::pin(async move {
            let state = self.record(LedgerCall::Note {
                decision_id: decision_id.clone(),
                request,
            })?;
            Self::require_open(&state, decision_id)
        })
    }

    fn read<'a>(
        &'a self,
        decision_id: &'a DecisionId,
        request: ReadRequest,
    ) -> LedgerFuture<'a, Result<Value, LedgerError>> {
        Box::pin(async move {
            let state = self.record(LedgerCall::Read {
                decision_id: decision_id.clone(),
                request: request.clone(),
            })?;
            Self::require_open(&state, decision_id)?;
            Ok(json!({
                "product": request.product,
                "purpose": request.purpose,
                "records": [],
            }))
        })
    }

    fn evaluate<'a>(
        &'a self,
        decision_id: &'a DecisionId,
        request: EvaluateRequest,
    ) -> LedgerFuture<'a, Result<Value, LedgerError>> {
        Box::pin(async move {
            let state = self.record(LedgerCall::Evaluate {
                decision_id: decision_id.clone(),
                request: request.clone(),
            })?;
            Self::require_open(&state, decision_id)?;
            Ok(state.evaluation.clone().unwrap_or_else(|| {
                json!({
                    "policy": request.policy,
                    "outcome": "allow",
                })
            }))
        })
    }

    fn request_approval<'a>(
        &'a self,
        decision_id: &'a DecisionId,
        request: ApprovalRequest,
    ) -> LedgerFuture<'a, Result<(), LedgerError>> {
        Box::pin(async move {
            let state = self.record(LedgerCall::RequestApproval {
                decision_id: decision_id.clone(),
                request,
            })?;
            Self::require_open(&state, decision_id)
        })
    }

    fn write<'a>(
        &'a self,
        decision_id: &'a DecisionId,
        request: WriteRequest,
    ) -> LedgerFuture<'a, Result<(), LedgerError>> {
        Box::pin(async move {
            let state = self.record(LedgerCall::Write {
                decision_id: decision_id.clone(),
                request,
            })?;
            Self::require_open(&state, decision_id)
        })
    }

    fn trace<'a>(
        &'a self,
        decision_id: &'a DecisionId,
    ) -> LedgerFuture<'a, Result<Value, LedgerError>> {
        Box::pin(async move {
            let state = self.record(LedgerCall::Trace {
                decision_id: decision_id.clone(),
            })?;
            Self::require_known(&state, decision_id)?;

            let events: Vec<&str> = state
                .calls
                .iter()
                .filter(|call| call.decision_id() == Some(decision_id))
                .map(LedgerCall::operation)
                .collect();
            Ok(json!({
                "decisionId": decision_id.as_str(),
                "events": events,
            }))
        })
    }

    fn receipt<'a>(
        &'a self,
        decision_id: &'a DecisionId,
    ) -> LedgerFuture<'a, Result<Value, LedgerError>> {
        Box::pin(async move {
            let state = self.record(LedgerCall::Receipt {
                decision_id: decision_id.clone(),
            })?;
            let status = match state.decisions.get(decision_id) {
                Some(DecisionStatus::Open) => "open",
                Some(DecisionStatus::Closed(outcome)) => outcome.as_str(),
                None => return Err(unknown_decision(decision_id)),
            };
            Ok(json!({
                "decisionId": decision_id.as_str(),
                "status": status,
            }))
        })
    }

    fn close<'a>(
        &'a self,
        decision_id: &'a DecisionId,
        request: CloseRequest,
    ) -> LedgerFuture<'a, Result<(), LedgerError>> {
        Box::pin(async move {
            let outcome = request.outcome;
            let mut state = self.record(LedgerCall::Close {
                decision_id: decision_id.clone(),
                request,
            })?;
            if let Some(error) = state.close_failure.clone() {
                return Err(error);
            }

            Self::require_open(&state, decision_id)?;
            state
                .decisions
                .insert(decision_id.clone(), DecisionStatus::Closed(outcome));
            Ok(())
        })
    }

    fn list_products<'a>(
        &'a self,
        query: ProductQuery,
    ) -> LedgerFuture<'a, Result<Value, LedgerError>> {
        Box::pin(async move {
            let state = self.record(LedgerCall::ListProducts {
                query: query.clone(),
            })?;
            let products: Vec<Value> = state
                .products
                .iter()
                .filter(|product| match query.purpose.as_deref() {
                    Some(purpose) => product_serves(product, purpose),
                    None => true,
                })
                .cloned()
                .collect();
            Ok(json!({ "products": products }))
        })
    }

    fn get_product<'a>(&'a self, name: &'a str) -> LedgerFuture<'a, Result<Value, LedgerError>> {
        Box::pin(async move {
            let state = self.record(LedgerCall::GetProduct {
                name: name.to_string(),
            })?;
            state
                .products
                .iter()
                .find(|product| product_name(product) == Some(name))
                .cloned()
                .ok_or_else(|| LedgerError::not_found(format!("product '{name}' does not exist")))
        })
    }

    fn capabilities<'a>(&'a self) -> LedgerFuture<'a, Result<Value, LedgerError>> {
        Box::pin(async move {
            let _state = self.record(LedgerCall::Capabilities)?;
            Ok(json!({
                "service": "in-memory",
                "operations": [
                    "open", "create_decision", "note", "read", "evaluate",
                    "request_approval", "write", "trace", "receipt", "close",
                    "list_products", "get_product", "capabilities",
                ],
            }))
        })
    }
}
