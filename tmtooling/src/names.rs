//! Per-kind tool name overrides.
//!
//! ```rust
//! use tmtooling::{ToolKind, ToolNames};
//!
//! let names: ToolNames = serde_json::from_str(r#"{"tracememOpen":"startTask"}"#)
//!     .expect("overrides should parse");
//! assert_eq!(names.resolve(ToolKind::Open), "startTask");
//! assert_eq!(names.resolve(ToolKind::Close), "tracememClose");
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ToolKind;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolNames {
    overrides: HashMap<ToolKind, String>,
}

impl ToolNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: ToolKind, name: impl Into<String>) -> Self {
        self.set(kind, name);
        self
    }

    pub fn set(&mut self, kind: ToolKind, name: impl Into<String>) {
        self.overrides.insert(kind, name.into());
    }

    pub fn get(&self, kind: ToolKind) -> Option<&str> {
        self.overrides.get(&kind).map(String::as_str)
    }

    /// The exposed name for `kind`. Blank overrides count as unset.
    pub fn resolve(&self, kind: ToolKind) -> &str {
        match self.get(kind) {
            Some(name) if !name.trim().is_empty() => name,
            _ => kind.default_name(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}

impl<S> FromIterator<(ToolKind, S)> for ToolNames
where
    S: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (ToolKind, S)>>(iter: T) -> Self {
        Self {
            overrides: iter
                .into_iter()
                .map(|(kind, name)| (kind, name.into()))
                .collect(),
        }
    }
}
