//! Tool trait contract for registry-managed capabilities.
//!
//! ```rust
//! use tmtooling::{FunctionTool, Tool, ToolDefinition};
//!
//! let tool = FunctionTool::new(
//!     ToolDefinition::new("echo", "Echoes input", r#"{"type":"object"}"#),
//!     |args| async move { Ok(args) },
//! );
//!
//! assert_eq!(tool.definition().name, "echo");
//! ```

use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tmcommon::BoxFuture;

use crate::ToolError;

pub type ToolFuture<'a, T> = BoxFuture<'a, T>;

/// Name, description, and JSON Schema an agent runtime advertises to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: String,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: input_schema.into(),
        }
    }

    pub fn parameters(&self) -> Result<Value, ToolError> {
        serde_json::from_str(&self.input_schema).map_err(|err| {
            ToolError::configuration(format!(
                "tool '{}' has an invalid input schema: {err}",
                self.name
            ))
        })
    }
}

pub trait Tool: Send + Sync {
    fn definition(&self) -> ToolDefinition;

    fn invoke<'a>(&'a self, args: Value) -> ToolFuture<'a, Result<Value, ToolError>>;
}

type ToolHandler = dyn Fn(Value) -> ToolFuture<'static, Result<Value, ToolError>> + Send + Sync;

pub struct FunctionTool {
    definition: ToolDefinition,
    handler: Arc<ToolHandler>,
}

impl FunctionTool {
    pub fn new<F, Fut>(definition: ToolDefinition, handler: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ToolError>> + Send + 'static,
    {
        let handler: Arc<ToolHandler> = Arc::new(move |args| Box::pin(handler(args)));

        Self {
            definition,
            handler,
        }
    }
}

impl Tool for FunctionTool {
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    fn invoke<'a>(&'a self, args: Value) -> ToolFuture<'a, Result<Value, ToolError>> {
        (self.handler)(args)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn definition_parameters_parse_the_schema() {
        let definition = ToolDefinition::new("t", "d", r#"{"type":"object"}"#);
        assert_eq!(definition.parameters().expect("schema"), json!({ "type": "object" }));

        let broken = ToolDefinition::new("t", "d", "{");
        assert!(broken.parameters().is_err());
    }

    #[tokio::test]
    async fn function_tool_forwards_arguments() {
        let tool = FunctionTool::new(ToolDefinition::new("double", "", "{}"), |args| async move {
            let value = args["n"].as_i64().unwrap_or_default();
            Ok(json!({ "n": value * 2 }))
        });

        let output = tool.invoke(json!({ "n": 21 })).await.expect("invoke");
        assert_eq!(output, json!({ "n": 42 }));
    }
}
