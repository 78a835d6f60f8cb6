//! Convenience re-exports for the common compile workflow.

pub use crate::compile::{Assembly, Compiler, CompilerBuilder};
pub use crate::diagram::{Diagram, IntoDiagram};
pub use crate::error::{CompileError, ScriptError};
pub use crate::graph::{Connection, SolverSettings, SystemGraph};
pub use crate::registry::{BlockRegistry, EventRegistry, PortStrategy};
pub use crate::script::{Environment, Value};
