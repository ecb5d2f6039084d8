//! JSON argument parsing helpers for ledger and host-defined tools.
//!
//! ```rust
//! use tmtooling::{parse_json_object, required_string};
//!
//! let args = parse_json_object(r#"{"decisionId":"dec_1"}"#).expect("object should parse");
//! let id = required_string(&args, "decisionId").expect("id should be present");
//! assert_eq!(id, "dec_1");
//! ```

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tmcommon::DecisionId;

use crate::ToolError;

pub fn parse_json_value(args_json: &str) -> Result<Value, ToolError> {
    if args_json.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }

    serde_json::from_str(args_json)
        .map_err(|err| ToolError::invalid_arguments(format!("invalid JSON arguments: {err}")))
}

pub fn parse_json_object(args_json: &str) -> Result<Map<String, Value>, ToolError> {
    let value = parse_json_value(args_json)?;
    value
        .as_object()
        .cloned()
        .ok_or_else(|| ToolError::invalid_arguments("expected JSON object arguments"))
}

pub fn required_string(args: &Map<String, Value>, key: &str) -> Result<String, ToolError> {
    args.get(key)
        .and_then(Value::as_str)
        .map(ToString::to_string)
        .ok_or_else(|| ToolError::invalid_arguments(format!("missing required string: '{key}'")))
}

/// Decodes tool arguments into a typed struct. `null` is read as `{}`.
pub fn decode_args<T>(args: Value) -> Result<T, ToolError>
where
    T: DeserializeOwned,
{
    let args = match args {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };

    serde_json::from_value(args)
        .map_err(|err| ToolError::invalid_arguments(format!("invalid arguments: {err}")))
}

pub fn decision_id(value: String) -> Result<DecisionId, ToolError> {
    DecisionId::new(value).ok_or_else(|| ToolError::invalid_arguments("decisionId must not be empty"))
}
