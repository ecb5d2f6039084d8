//! Tool registry for lookup and invocation by exposed tool name.

use std::future::Future;
use std::sync::Arc;

use serde_json::Value;
use tmcommon::Registry;

use crate::{FunctionTool, Tool, ToolDefinition, ToolError, parse_json_value};

#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: Registry<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `tool` under its definition name, replacing any previous
    /// tool of that name. Returns the replaced tool.
    pub fn register<T>(&mut self, tool: T) -> Option<Arc<dyn Tool>>
    where
        T: Tool + 'static,
    {
        self.register_shared(Arc::new(tool))
    }

    pub fn register_shared(&mut self, tool: Arc<dyn Tool>) -> Option<Arc<dyn Tool>> {
        let name = tool.definition().name;
        self.tools.insert(name, tool)
    }

    pub fn register_fn<F, Fut>(&mut self, definition: ToolDefinition, handler: F)
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ToolError>> + Send + 'static,
    {
        self.register(FunctionTool::new(definition, handler));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.remove(name)
    }

    /// Exposed names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|tool| tool.definition()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub async fn invoke(&self, name: &str, args: Value) -> Result<Value, ToolError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::not_found(format!("tool '{name}' is not registered")))?;

        tool.invoke(args).await
    }

    /// Invokes with raw JSON arguments as produced by a model and returns the
    /// result serialized back to JSON.
    pub async fn invoke_json(&self, name: &str, args_json: &str) -> Result<String, ToolError> {
        let args = parse_json_value(args_json)?;
        let output = self.invoke(name, args).await?;
        serde_json::to_string(&output).map_err(|err| {
            ToolError::execution(format!("failed to serialize tool output: {err}"))
                .with_tool_name(name)
        })
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}
