//! Ledger-backed tools: argument decoding, context resolution, and dispatch
//! to the [`LedgerClient`].

use std::sync::Arc;
use std::time::Instant;

use serde::Deserialize;
use serde_json::{Map, Value, json};
use tmclient::{
    ApprovalRequest, AutomationMode, CloseRequest, DecisionOutcome, EvaluateRequest,
    LedgerClient, NoteRequest, OpenOptions, ProductQuery, ReadRequest, WriteRequest,
};
use tmcontext::{ContextPipeline, redact};

use crate::{
    Tool, ToolDefaults, ToolDefinition, ToolError, ToolFuture, ToolKind, ToolRuntimeHooks,
    decision_id, decode_args,
};

/// Key under which the resolved context is attached to note data.
pub const NOTE_CONTEXT_KEY: &str = "_context";

pub(crate) struct ToolShared {
    pub(crate) client: Arc<dyn LedgerClient>,
    pub(crate) pipeline: ContextPipeline,
    pub(crate) defaults: ToolDefaults,
    pub(crate) hooks: Arc<dyn ToolRuntimeHooks>,
}

/// One of the twelve ledger operations exposed under its configured name.
pub struct LedgerTool {
    kind: ToolKind,
    name: String,
    shared: Arc<ToolShared>,
}

impl LedgerTool {
    pub(crate) fn new(kind: ToolKind, name: impl Into<String>, shared: Arc<ToolShared>) -> Self {
        Self {
            kind,
            name: name.into(),
            shared,
        }
    }

    pub fn kind(&self) -> ToolKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        match self.kind {
            ToolKind::Open => self.open(args).await,
            ToolKind::Note => self.note(args).await,
            ToolKind::Read => self.read(args).await,
            ToolKind::Evaluate => self.evaluate(args).await,
            ToolKind::RequestApproval => self.request_approval(args).await,
            ToolKind::Write => self.write(args).await,
            ToolKind::Trace => {
                let args: DecisionArgs = decode_args(args)?;
                let id = decision_id(args.decision_id)?;
                Ok(self.shared.client.trace(&id).await?)
            }
            ToolKind::Receipt => {
                let args: DecisionArgs = decode_args(args)?;
                let id = decision_id(args.decision_id)?;
                Ok(self.shared.client.receipt(&id).await?)
            }
            ToolKind::Close => self.close(args).await,
            ToolKind::ProductsList => {
                let args: ProductsListArgs = decode_args(args)?;
                let query = ProductQuery {
                    purpose: args.purpose,
                };
                Ok(self.shared.client.list_products(query).await?)
            }
            ToolKind::ProductGet => {
                let args: ProductGetArgs = decode_args(args)?;
                Ok(self.shared.client.get_product(&args.name).await?)
            }
            ToolKind::Capabilities => Ok(self.shared.client.capabilities().await?),
        }
    }

    /// Runs the context provider for this call. The provider always sees the
    /// default tool name, whatever the tool is exposed as. Failures are
    /// reported to the hooks and replaced with an empty context.
    async fn resolve_context(&self, args: &Value) -> Value {
        let resolved = self
            .shared
            .pipeline
            .resolve(self.kind.default_name(), args)
            .await;
        if let Some(error) = &resolved.failure {
            tracing::warn!(
                tool_name = %self.name,
                error = %error,
                "context provider failed; continuing with empty context"
            );
            self.shared
                .hooks
                .on_context_provider_failure(self.kind, &self.name, error);
        }
        resolved.value
    }

    async fn open(&self, raw: Value) -> Result<Value, ToolError> {
        let args: OpenArgs = decode_args(raw.clone())?;
        let (by_intent, target) =
            match (non_blank(args.intent.as_deref()), non_blank(args.action.as_deref())) {
                (Some(intent), _) => (true, intent),
                (None, Some(action)) => (false, action),
                (None, None) => {
                    return Err(ToolError::invalid_arguments(
                        "either 'action' or 'intent' is required",
                    ));
                }
            };

        let context = self.resolve_context(&raw).await;
        let defaults = &self.shared.defaults;
        let options = OpenOptions {
            actor: args.actor.clone().or_else(|| defaults.actor.clone()),
            automation_mode: args.automation_mode.or(defaults.automation_mode),
            metadata: Some(context),
        };

        let handle = if by_intent {
            self.shared.client.create_decision(target, options).await?
        } else {
            self.shared.client.open(target, options).await?
        };

        Ok(json!({ "decisionId": handle.decision_id.as_str() }))
    }

    async fn note(&self, raw: Value) -> Result<Value, ToolError> {
        let args: NoteArgs = decode_args(raw.clone())?;
        let id = decision_id(args.decision_id)?;
        let context = self.resolve_context(&raw).await;

        let data = match args.data {
            Some(data) if self.shared.pipeline.sanitize() => Some(redact(&data)),
            other => other,
        };

        let mut merged = match data {
            Some(Value::Object(map)) => map,
            Some(Value::Null) | None => Map::new(),
            Some(other) => Map::from_iter([("value".to_string(), other)]),
        };
        merged.insert(NOTE_CONTEXT_KEY.to_string(), context);

        let request = NoteRequest {
            message: args.message,
            kind: args.kind,
            data: Some(Value::Object(merged)),
        };
        self.shared.client.note(&id, request).await?;
        Ok(json!({ "success": true }))
    }

    async fn read(&self, raw: Value) -> Result<Value, ToolError> {
        let args: ReadArgs = decode_args(raw.clone())?;
        let id = decision_id(args.decision_id)?;
        self.resolve_context(&raw).await;

        let request = ReadRequest {
            product: args.product,
            purpose: args.purpose,
            query: args.query,
        };
        Ok(self.shared.client.read(&id, request).await?)
    }

    async fn evaluate(&self, raw: Value) -> Result<Value, ToolError> {
        let args: EvaluateArgs = decode_args(raw.clone())?;
        if !args.inputs.is_object() {
            return Err(ToolError::invalid_arguments("'inputs' must be a JSON object"));
        }

        let id = decision_id(args.decision_id)?;
        self.resolve_context(&raw).await;

        let request = EvaluateRequest {
            policy: args.policy,
            inputs: args.inputs,
        };
        Ok(self.shared.client.evaluate(&id, request).await?)
    }

    async fn request_approval(&self, raw: Value) -> Result<Value, ToolError> {
        let args: ApprovalArgs = decode_args(raw.clone())?;
        let id = decision_id(args.decision_id)?;
        self.resolve_context(&raw).await;

        let request = ApprovalRequest {
            description: args.message,
        };
        self.shared.client.request_approval(&id, request).await?;
        Ok(json!({ "status": "requested" }))
    }

    async fn write(&self, raw: Value) -> Result<Value, ToolError> {
        let args: WriteArgs = decode_args(raw.clone())?;
        let id = decision_id(args.decision_id)?;
        self.resolve_context(&raw).await;

        let request = WriteRequest {
            product: args.product,
            purpose: args.purpose,
            mutation: args.mutation,
            idempotency_key: args.idempotency_key,
        };
        self.shared.client.write(&id, request).await?;
        Ok(json!({ "success": true }))
    }

    async fn close(&self, raw: Value) -> Result<Value, ToolError> {
        let args: CloseArgs = decode_args(raw.clone())?;
        let id = decision_id(args.decision_id)?;
        self.resolve_context(&raw).await;

        let request = CloseRequest {
            outcome: args.outcome,
            reason: args.reason,
        };
        self.shared.client.close(&id, request).await?;
        Ok(json!({ "success": true }))
    }
}

impl Tool for LedgerTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            self.name.clone(),
            self.kind.description(),
            self.kind.input_schema(),
        )
    }

    fn invoke<'a>(&'a self, args: Value) -> ToolFuture<'a, Result<Value, ToolError>> {
        Box::pin(async move {
            let hooks = &self.shared.hooks;
            hooks.on_execution_start(self.kind, &self.name);
            let started_at = Instant::now();

            match self.execute(args).await {
                Ok(output) => {
                    hooks.on_execution_success(self.kind, &self.name, started_at.elapsed());
                    Ok(output)
                }
                Err(error) => {
                    let error = error.with_tool_name(self.name.clone());
                    hooks.on_execution_failure(
                        self.kind,
                        &self.name,
                        &error,
                        started_at.elapsed(),
                    );
                    Err(error)
                }
            }
        })
    }
}

impl std::fmt::Debug for LedgerTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerTool")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .finish()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OpenArgs {
    action: Option<String>,
    intent: Option<String>,
    actor: Option<String>,
    automation_mode: Option<AutomationMode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NoteArgs {
    decision_id: String,
    message: String,
    kind: Option<String>,
    data: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReadArgs {
    decision_id: String,
    product: String,
    purpose: String,
    query: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EvaluateArgs {
    decision_id: String,
    policy: String,
    inputs: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApprovalArgs {
    decision_id: String,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WriteArgs {
    decision_id: String,
    product: String,
    purpose: String,
    mutation: Value,
    idempotency_key: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DecisionArgs {
    decision_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CloseArgs {
    decision_id: String,
    outcome: DecisionOutcome,
    reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProductsListArgs {
    purpose: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProductGetArgs {
    name: String,
}
