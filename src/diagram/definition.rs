//! Serde definitions for the diagram document format.
//!
//! A diagram is the untyped editor output: nodes with string attributes,
//! edges with optional handles, plus globals, solver parameters, events, and
//! free-form code. Everything here is plain data; interpretation happens in
//! the compiler.

use crate::error::CompileError;
use ahash::AHashMap;
use serde::Deserialize;

/// A full diagram document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Diagram {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default, alias = "globalVariables")]
    pub global_variables: Vec<GlobalVariable>,
    #[serde(
        default,
        alias = "solverParameters",
        alias = "solverParams"
    )]
    pub solver_parameters: AHashMap<String, String>,
    #[serde(default)]
    pub events: Vec<EventSpec>,
    #[serde(default, alias = "freeformCode", alias = "pythonCode")]
    pub freeform_code: String,
}

impl Diagram {
    /// Deserializes a diagram from its JSON document form.
    pub fn from_json(json: &str) -> Result<Self, CompileError> {
        serde_json::from_str(json).map_err(|err| CompileError::JsonParse(err.to_string()))
    }
}

/// One node of the diagram: an opaque id, a block type tag, and the
/// user-entered attribute strings.
#[derive(Debug, Clone, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub type_tag: String,
    #[serde(default, alias = "data")]
    pub attributes: AHashMap<String, String>,
}

impl Node {
    /// The user-facing label, falling back to the id for unlabeled nodes.
    pub fn display_label(&self) -> &str {
        match self.attributes.get("label") {
            Some(label) if !label.is_empty() => label,
            _ => &self.id,
        }
    }
}

/// A directed edge between two nodes. Handles name the specific port on
/// either end; an absent handle selects the default port.
#[derive(Debug, Clone, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    #[serde(default, alias = "sourceHandle")]
    pub source_handle: Option<String>,
    #[serde(default, alias = "targetHandle")]
    pub target_handle: Option<String>,
}

/// A named global expression, evaluated in declaration order.
#[derive(Debug, Clone, Deserialize)]
pub struct GlobalVariable {
    pub name: String,
    #[serde(alias = "value")]
    pub expression: String,
}

/// A standalone event declaration. Everything beyond the name and type is
/// kept as raw attribute text and interpreted against the event registry.
#[derive(Debug, Clone, Deserialize)]
pub struct EventSpec {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub type_tag: String,
    #[serde(flatten)]
    pub attributes: AHashMap<String, String>,
}
