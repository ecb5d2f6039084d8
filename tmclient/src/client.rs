//! Ledger client contract shared by the tool factory and the lifecycle wrapper.

use serde_json::Value;
use tmcommon::{BoxFuture, DecisionId};

use crate::{
    ApprovalRequest, CloseRequest, DecisionHandle, EvaluateRequest, LedgerError, NoteRequest,
    OpenOptions, ProductQuery, ReadRequest, WriteRequest,
};

pub type LedgerFuture<'a, T> = BoxFuture<'a, T>;

/// One method per ledger operation.
///
/// Implementations are shared behind `Arc` across requests and concurrent tool
/// calls, so any session or pooling state must be internally synchronized.
pub trait LedgerClient: Send + Sync {
    fn open<'a>(
        &'a self,
        action: &'a str,
        options: OpenOptions,
    ) -> LedgerFuture<'a, Result<DecisionHandle, LedgerError>>;

    fn create_decision<'a>(
        &'a self,
        intent: &'a str,
        options: OpenOptions,
    ) -> LedgerFuture<'a, Result<DecisionHandle, LedgerError>>;

    fn note<'a>(
        &'a self,
        decision_id: &'a DecisionId,
        request: NoteRequest,
    ) -> LedgerFuture<'a, Result<(), LedgerError>>;

    fn read<'a>(
        &'a self,
        decision_id: &'a DecisionId,
        request: ReadRequest,
    ) -> LedgerFuture<'a, Result<Value, LedgerError>>;

    fn evaluate<'a>(
        &'a self,
        decision_id: &'a DecisionId,
        request: EvaluateRequest,
    ) -> LedgerFuture<'a, Result<Value, LedgerError>>;

    fn request_approval<'a>(
        &'a self,
        decision_id: &'a DecisionId,
        request: ApprovalRequest,
    ) -> LedgerFuture<'a, Result<(), LedgerError>>;

    fn write<'a>(
        &'a self,
        decision_id: &'a DecisionId,
        request: WriteRequest,
    ) -> LedgerFuture<'a, Result<(), LedgerError>>;

    fn trace<'a>(&'a self, decision_id: &'a DecisionId)
    -> LedgerFuture<'a, Result<Value, LedgerError>>;

    fn receipt<'a>(
        &'a self,
        decision_id: &'a DecisionId,
    ) -> LedgerFuture<'a, Result<Value, LedgerError>>;

    fn close<'a>(
        &'a self,
        decision_id: &'a DecisionId,
        request: CloseRequest,
    ) -> LedgerFuture<'a, Result<(), LedgerError>>;

    fn list_products<'a>(
        &'a self,
        query: ProductQuery,
    ) -> LedgerFuture<'a, Result<Value, LedgerError>>;

    fn get_product<'a>(&'a self, name: &'a str) -> LedgerFuture<'a, Result<Value, LedgerError>>;

    fn capabilities<'a>(&'a self) -> LedgerFuture<'a, Result<Value, LedgerError>>;
}
