//! # Kairo
//!
//! Kairo is a graph compiler for block-diagram dataflow models. It takes the
//! untyped document a visual editor saves (nodes with string attributes,
//! loosely-typed edges, globals, solver parameters, events) and turns it
//! into a fully-resolved system: strongly-typed blocks, index-resolved
//! connections, and scheduled events, ready for a numeric engine.
//!
//! Two backends share one compilation pipeline:
//!
//! - **Live assembly** ([`compile::Compiler::build_system`]) produces a
//!   [`graph::SystemGraph`] plus the run duration, for handing straight to
//!   an engine.
//! - **Source emission** ([`compile::Compiler::emit_script`]) renders the
//!   same assembly as a deterministic standalone script, byte-identical for
//!   unchanged input.
//!
//! Because both backends consume the same assembly, every resolved port and
//! block index agrees between them bit for bit.
//!
//! Attributes and globals are written in a small embedded expression
//! language (see [`script`]); free-form diagram code can define variables
//! and helper functions that attribute expressions and event code then use.
//!
//! ## Example
//!
//! ```
//! use kairo::prelude::*;
//!
//! let diagram = r#"{
//!     "nodes": [
//!         {"id": "1", "type": "constant", "data": {"label": "Feed", "value": "2.5"}},
//!         {"id": "2", "type": "scope", "data": {"label": "Monitor", "labels": ""}}
//!     ],
//!     "edges": [{"source": "1", "target": "2"}],
//!     "solverParameters": {"duration": "10"}
//! }"#;
//!
//! let (system, duration) = Compiler::builder(diagram).build()?.build_system()?;
//! assert_eq!(duration, 10.0);
//! assert_eq!(system.connections.len(), 1);
//! # Ok::<(), kairo::error::CompileError>(())
//! ```

pub mod compile;
pub mod diagram;
pub mod emit;
pub mod error;
pub mod graph;
pub mod prelude;
pub mod registry;
pub mod script;

pub use compile::Compiler;
pub use error::CompileError;
