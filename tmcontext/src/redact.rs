//! Key-pattern redaction of obvious secrets.
//!
//! A coarse safety net applied before values leave this process. The ledger
//! service applies its own sanitization downstream.
//!
//! ```rust
//! use serde_json::json;
//! use tmcontext::redact;
//!
//! let input = json!({ "token": "123", "safe": "value", "mySecret": "abc" });
//! assert_eq!(
//!     redact(&input),
//!     json!({ "token": "[REDACTED]", "safe": "value", "mySecret": "[REDACTED]" })
//! );
//! ```

use serde_json::{Map, Value};

pub const REDACTED: &str = "[REDACTED]";

pub const SENSITIVE_TERMS: [&str; 7] = [
    "token",
    "secret",
    "password",
    "api_key",
    "apikey",
    "auth",
    "credential",
];

pub fn is_sensitive_key(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    SENSITIVE_TERMS.iter().any(|term| key.contains(term))
}

/// Returns a copy with the same shape. Inputs must be acyclic, which
/// `serde_json::Value` guarantees.
pub fn redact(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(redact).collect()),
        Value::Object(map) => Value::Object(redact_map(map)),
        scalar => scalar.clone(),
    }
}

pub fn redact_map(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .map(|(key, value)| {
            let value = if is_sensitive_key(key) {
                Value::String(REDACTED.to_string())
            } else {
                redact(value)
            };
            (key.clone(), value)
        })
        .collect()
}
