//! The untyped diagram document: nodes, edges, globals, solver parameters,
//! standalone events, and free-form code, exactly as the editor saved them.

mod conversion;
mod definition;
mod names;

pub use conversion::IntoDiagram;
pub use definition::{Diagram, Edge, EventSpec, GlobalVariable, Node};
pub use names::{NameAllocator, derive_event_var_name, derive_var_name};
