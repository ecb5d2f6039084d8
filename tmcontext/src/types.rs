//! Request-scoped context attached to ledger operations.
//!
//! ```rust
//! use serde_json::json;
//! use tmcontext::RequestContext;
//!
//! let context = RequestContext::new()
//!     .with_route("/api/chat")
//!     .with_user_id("u1")
//!     .with_tag("beta");
//!
//! assert_eq!(
//!     serde_json::to_value(&context).expect("serialize"),
//!     json!({ "route": "/api/chat", "userId": "u1", "tags": ["beta"] })
//! );
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reserved keys carry merge semantics; everything else lives in `fields`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub external_refs: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_external_ref(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.external_refs.insert(key.into(), value.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Sets a non-reserved field. Reserved names are routed to their typed slot.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        let value = value.into();
        match key.as_str() {
            "tags" => {
                if let Value::Array(items) = value {
                    self.tags
                        .extend(items.iter().filter_map(Value::as_str).map(ToString::to_string));
                }
            }
            "externalRefs" => {
                if let Value::Object(map) = value {
                    self.external_refs.extend(map);
                }
            }
            "metadata" => {
                if let Value::Object(map) = value {
                    self.metadata.extend(map);
                }
            }
            _ => {
                self.fields.insert(key, value);
            }
        }
        self
    }

    pub fn with_request_id(self, request_id: impl Into<String>) -> Self {
        self.with_field("requestId", request_id.into())
    }

    pub fn with_route(self, route: impl Into<String>) -> Self {
        self.with_field("route", route.into())
    }

    pub fn with_user_id(self, user_id: impl Into<String>) -> Self {
        self.with_field("userId", user_id.into())
    }

    pub fn with_session_id(self, session_id: impl Into<String>) -> Self {
        self.with_field("sessionId", session_id.into())
    }

    pub fn with_tenant_id(self, tenant_id: impl Into<String>) -> Self {
        self.with_field("tenantId", tenant_id.into())
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
            && self.external_refs.is_empty()
            && self.metadata.is_empty()
            && self.fields.is_empty()
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()))
    }
}
