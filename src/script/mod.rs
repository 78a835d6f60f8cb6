//! The embedded expression language.
//!
//! Diagram attributes, global variables, and event triggers are written in a
//! small expression language with numbers, strings, booleans, lists, maps,
//! arithmetic, comparisons, boolean logic, indexing, and calls. Free-form
//! diagram code additionally supports assignments and single-expression
//! function definitions (`fn gain(x) = 2 * x`).
//!
//! [`Environment`] is the entry point: it owns the namespace and exposes
//! [`Environment::evaluate`] for single expressions and [`Environment::run`]
//! for statement lists.

pub mod ast;
pub mod env;
mod interpreter;
pub mod lexer;
pub mod parser;
pub mod value;

pub use env::{Environment, is_reserved_word, is_valid_identifier};
pub use value::{BlockHandle, FuncValue, Value};
