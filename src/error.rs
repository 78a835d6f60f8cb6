use thiserror::Error;

/// Errors raised while lexing, parsing, or evaluating embedded script code.
///
/// These never escape the compiler directly: every call site rewraps them
/// into a [`CompileError`] that names the offending variable or attribute.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScriptError {
    #[error("unrecognized token near '{0}'")]
    Lex(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("name '{0}' is not defined")]
    UndefinedName(String),

    #[error("'{0}' is not callable")]
    NotCallable(String),

    #[error("{name}() expects {expected} argument(s), got {got}")]
    Arity {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("type error in '{operation}': expected {expected}, found {found}")]
    TypeMismatch {
        operation: String,
        expected: String,
        found: String,
    },

    #[error("index {index} is out of bounds for a list of length {len}")]
    IndexOutOfBounds { index: i64, len: usize },

    #[error("key '{0}' not found")]
    KeyNotFound(String),
}

/// Errors that can occur while compiling a diagram, in either backend.
///
/// Compilation is all-or-nothing: the first error aborts the compile and no
/// partial graph or script is ever produced. Both backends raise the same
/// kind for the same malformed input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("Failed to parse diagram JSON: {0}")]
    JsonParse(String),

    #[error("Node '{node_id}' has an unregistered block type: '{type_tag}'")]
    UnknownBlockType { node_id: String, type_tag: String },

    #[error("Event '{name}' has an unregistered event type: '{type_tag}'")]
    UnknownEventType { name: String, type_tag: String },

    #[error("Expected a value for parameter '{parameter}' of {type_tag} ('{label}')")]
    MissingRequiredParameter {
        parameter: String,
        type_tag: String,
        label: String,
    },

    #[error("Failed to evaluate '{expression}' for '{name}': {message}")]
    ExpressionEvaluation {
        name: String,
        expression: String,
        message: String,
    },

    #[error("Edge references unknown node '{node_id}'")]
    UnknownNode { node_id: String },

    #[error("Node '{node_id}' has no port named '{handle}'")]
    UnknownPort { node_id: String, handle: String },

    #[error("Port handle '{handle}' on node '{node_id}' is out of range for {arity} port(s)")]
    PortIndexOutOfRange {
        node_id: String,
        handle: String,
        arity: usize,
    },

    #[error("Input port {input_index} of node '{node_id}' is wired more than once")]
    DuplicateInputBinding { node_id: String, input_index: usize },

    #[error("Invalid variable name '{name}': {reason}")]
    InvalidIdentifier { name: String, reason: String },

    #[error("Invalid event '{name}': {message}")]
    InvalidEventSpec { name: String, message: String },
}

impl CompileError {
    /// Wraps a script failure with the variable or attribute it came from.
    pub(crate) fn expression(name: &str, expression: &str, err: ScriptError) -> Self {
        CompileError::ExpressionEvaluation {
            name: name.to_string(),
            expression: expression.to_string(),
            message: err.to_string(),
        }
    }
}
