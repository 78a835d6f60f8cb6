//! Conversions into [`Diagram`] so the compiler builder can accept a parsed
//! document, a JSON string, or a `serde_json::Value` alike.

use crate::diagram::definition::Diagram;
use crate::error::CompileError;

/// Types that can be turned into a [`Diagram`].
pub trait IntoDiagram {
    fn into_diagram(self) -> Result<Diagram, CompileError>;
}

impl IntoDiagram for Diagram {
    fn into_diagram(self) -> Result<Diagram, CompileError> {
        Ok(self)
    }
}

impl IntoDiagram for &str {
    fn into_diagram(self) -> Result<Diagram, CompileError> {
        Diagram::from_json(self)
    }
}

impl IntoDiagram for String {
    fn into_diagram(self) -> Result<Diagram, CompileError> {
        Diagram::from_json(&self)
    }
}

impl IntoDiagram for serde_json::Value {
    fn into_diagram(self) -> Result<Diagram, CompileError> {
        serde_json::from_value(self).map_err(|err| CompileError::JsonParse(err.to_string()))
    }
}
