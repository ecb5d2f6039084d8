//! The twelve ledger tools and their fixed metadata.
//!
//! ```rust
//! use tmtooling::ToolKind;
//!
//! assert_eq!(ToolKind::Open.default_name(), "tracememOpen");
//! assert_eq!("productGet".parse::<ToolKind>().expect("kind"), ToolKind::ProductGet);
//! ```

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ToolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ToolKind {
    #[serde(rename = "tracememOpen", alias = "open")]
    Open,
    #[serde(rename = "tracememNote", alias = "note")]
    Note,
    #[serde(rename = "tracememRead", alias = "read")]
    Read,
    #[serde(rename = "tracememEvaluate", alias = "evaluate")]
    Evaluate,
    #[serde(rename = "tracememRequestApproval", alias = "requestApproval")]
    RequestApproval,
    #[serde(rename = "tracememWrite", alias = "write")]
    Write,
    #[serde(rename = "tracememTrace", alias = "trace")]
    Trace,
    #[serde(rename = "tracememReceipt", alias = "receipt")]
    Receipt,
    #[serde(rename = "tracememClose", alias = "close")]
    Close,
    #[serde(rename = "tracememProductsList", alias = "productsList")]
    ProductsList,
    #[serde(rename = "tracememProductGet", alias = "productGet")]
    ProductGet,
    #[serde(rename = "tracememCapabilities", alias = "capabilities")]
    Capabilities,
}

impl ToolKind {
    /// Registration order used by the factory.
    pub const ALL: [ToolKind; 12] = [
        Self::Open,
        Self::Note,
        Self::Read,
        Self::Evaluate,
        Self::RequestApproval,
        Self::Write,
        Self::Trace,
        Self::Receipt,
        Self::Close,
        Self::ProductsList,
        Self::ProductGet,
        Self::Capabilities,
    ];

    pub fn default_name(self) -> &'static str {
        match self {
            Self::Open => "tracememOpen",
            Self::Note => "tracememNote",
            Self::Read => "tracememRead",
            Self::Evaluate => "tracememEvaluate",
            Self::RequestApproval => "tracememRequestApproval",
            Self::Write => "tracememWrite",
            Self::Trace => "tracememTrace",
            Self::Receipt => "tracememReceipt",
            Self::Close => "tracememClose",
            Self::ProductsList => "tracememProductsList",
            Self::ProductGet => "tracememProductGet",
            Self::Capabilities => "tracememCapabilities",
        }
    }

    /// Short runtime-neutral key, e.g. `requestApproval`.
    pub fn generic_name(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Note => "note",
            Self::Read => "read",
            Self::Evaluate => "evaluate",
            Self::RequestApproval => "requestApproval",
            Self::Write => "write",
            Self::Trace => "trace",
            Self::Receipt => "receipt",
            Self::Close => "close",
            Self::ProductsList => "productsList",
            Self::ProductGet => "productGet",
            Self::Capabilities => "capabilities",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Open => {
                "Open a new TraceMem decision envelope before taking an action. Returns the decisionId used by every other decision tool."
            }
            Self::Note => "Record a note on an open decision, optionally with structured data.",
            Self::Read => "Read records from a data product within an open decision.",
            Self::Evaluate => "Evaluate a policy against inputs within an open decision.",
            Self::RequestApproval => "Request human approval for an open decision.",
            Self::Write => "Write a mutation to a data product within an open decision.",
            Self::Trace => "Fetch the recorded trace of a decision.",
            Self::Receipt => "Fetch the receipt of a decision.",
            Self::Close => "Close a decision with a commit or abort outcome.",
            Self::ProductsList => "List the data products available, optionally filtered by purpose.",
            Self::ProductGet => "Fetch a single data product by name.",
            Self::Capabilities => "Describe the capabilities of the connected TraceMem service.",
        }
    }

    /// JSON Schema for the tool's arguments.
    pub fn input_schema(self) -> &'static str {
        match self {
            Self::Open => OPEN_SCHEMA,
            Self::Note => NOTE_SCHEMA,
            Self::Read => READ_SCHEMA,
            Self::Evaluate => EVALUATE_SCHEMA,
            Self::RequestApproval => APPROVAL_SCHEMA,
            Self::Write => WRITE_SCHEMA,
            Self::Trace | Self::Receipt => DECISION_ONLY_SCHEMA,
            Self::Close => CLOSE_SCHEMA,
            Self::ProductsList => PRODUCTS_LIST_SCHEMA,
            Self::ProductGet => PRODUCT_GET_SCHEMA,
            Self::Capabilities => EMPTY_SCHEMA,
        }
    }

    /// Whether the tool runs the context provider before calling the ledger.
    pub fn uses_context(self) -> bool {
        matches!(
            self,
            Self::Open
                | Self::Note
                | Self::Read
                | Self::Evaluate
                | Self::RequestApproval
                | Self::Write
                | Self::Close
        )
    }
}

impl Display for ToolKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.default_name())
    }
}

impl FromStr for ToolKind {
    type Err = ToolError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.default_name() == value || kind.generic_name() == value)
            .ok_or_else(|| ToolError::not_found(format!("unknown ledger tool '{value}'")))
    }
}

const OPEN_SCHEMA: &str = r#"{"type":"object","properties":{"action":{"type":"string","description":"Short name of the action being decided"},"intent":{"type":"string","description":"Free-text intent; opens the decision by intent instead of action"},"actor":{"type":"string"},"automationMode":{"type":"string","enum":["propose","execute","validate"]}},"anyOf":[{"required":["action"]},{"required":["intent"]}]}"#;

const NOTE_SCHEMA: &str = r#"{"type":"object","properties":{"decisionId":{"type":"string"},"message":{"type":"string"},"kind":{"type":"string"},"data":{"type":"object"}},"required":["decisionId","message"]}"#;

const READ_SCHEMA: &str = r#"{"type":"object","properties":{"decisionId":{"type":"string"},"product":{"type":"string"},"purpose":{"type":"string"},"query":{"type":"object"}},"required":["decisionId","product","purpose"]}"#;

const EVALUATE_SCHEMA: &str = r#"{"type":"object","properties":{"decisionId":{"type":"string"},"policy":{"type":"string"},"inputs":{"type":"object"}},"required":["decisionId","policy","inputs"]}"#;

const APPROVAL_SCHEMA: &str = r#"{"type":"object","properties":{"decisionId":{"type":"string"},"message":{"type":"string"}},"required":["decisionId","message"]}"#;

const WRITE_SCHEMA: &str = r#"{"type":"object","properties":{"decisionId":{"type":"string"},"product":{"type":"string"},"purpose":{"type":"string"},"mutation":{},"idempotencyKey":{"type":"string"}},"required":["decisionId","product","purpose","mutation"]}"#;

const DECISION_ONLY_SCHEMA: &str = r#"{"type":"object","properties":{"decisionId":{"type":"string"}},"required":["decisionId"]}"#;

const CLOSE_SCHEMA: &str = r#"{"type":"object","properties":{"decisionId":{"type":"string"},"outcome":{"type":"string","enum":["commit","abort"]},"reason":{"type":"string"}},"required":["decisionId","outcome"]}"#;

const PRODUCTS_LIST_SCHEMA: &str = r#"{"type":"object","properties":{"purpose":{"type":"string"}}}"#;

const PRODUCT_GET_SCHEMA: &str = r#"{"type":"object","properties":{"name":{"type":"string"}},"required":["name"]}"#;

const EMPTY_SCHEMA: &str = r#"{"type":"object","properties":{}}"#;
