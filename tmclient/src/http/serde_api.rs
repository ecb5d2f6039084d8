//! Wire-level request bodies and response parsing for the HTTP ledger client.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tmcommon::DecisionId;

use crate::{DecisionHandle, LedgerError, OpenOptions};

#[derive(Debug, Serialize)]
pub(crate) struct OpenDecisionBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<&'a str>,
    #[serde(flatten)]
    pub options: &'a OpenOptions,
}

#[derive(Debug, Deserialize)]
struct ApiDecisionHandle {
    #[serde(rename = "decisionId", alias = "decision_id")]
    decision_id: String,
}

pub(crate) fn parse_decision_handle(body: Value) -> Result<DecisionHandle, LedgerError> {
    let handle: ApiDecisionHandle = serde_json::from_value(body).map_err(|err| {
        LedgerError::invalid_response(format!("decision handle could not be parsed: {err}"))
    })?;

    DecisionId::new(handle.decision_id)
        .map(DecisionHandle::new)
        .ok_or_else(|| LedgerError::invalid_response("ledger returned an empty decision id"))
}

pub(crate) fn parse_body(body: &str) -> Result<Value, LedgerError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(body)
        .map_err(|err| LedgerError::invalid_response(format!("response was not JSON: {err}")))
}

pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let candidates = [
        value.pointer("/error/message"),
        value.get("message"),
        value.get("error"),
    ];

    candidates
        .into_iter()
        .flatten()
        .find_map(Value::as_str)
        .map(ToString::to_string)
}
