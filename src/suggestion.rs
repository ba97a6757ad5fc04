//! The public result shape: `Suggestion`.
//!
//! Per `spec.md` §6, `Suggestion` is what every query method ultimately
//! returns, whether the underlying pin came from the workspace, `YardMap`,
//! or `LiveMap`. Serializable so an (out-of-scope) editor-protocol adapter
//! can ship it over the wire without this crate knowing anything about the
//! transport.

use serde::{Deserialize, Serialize};

use crate::base::Span;
use crate::pin::Parameter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuggestionKind {
    Keyword,
    Constant,
    Class,
    Module,
    Method,
    Field,
    Variable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub label: String,
    pub kind: SuggestionKind,
    pub detail: Option<String>,
    pub docstring: Option<String>,
    /// A type string in the mini-grammar from `spec.md` §6: `""`, `FQN`,
    /// `Class<FQN>`, `Module<FQN>`, or `FQN<Element(, Element)*>`.
    pub return_type: Option<String>,
    pub parameters: Vec<Parameter>,
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Span>,
}

impl Suggestion {
    /// The dedup key `ApiMap` uses when unioning pin-derived suggestions
    /// with `LiveMap` suggestions (spec §4.3 step 8: "append LiveMap
    /// methods whose string form is not already present").
    pub fn dedup_label(&self) -> String {
        match &self.path {
            Some(path) => path.clone(),
            None => self.label.clone(),
        }
    }

    /// The wire form an editor-protocol adapter ships to a client. Kept on
    /// `Suggestion` itself rather than left to embedders, since every
    /// caller needing this wants the same shape.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
