use crate::error::ScriptError;
use crate::script::ast::Expr;
use std::fmt;
use std::sync::Arc;

/// Signature of a built-in script function.
pub type BuiltinFn = fn(&[Value]) -> Result<Value, ScriptError>;

/// A reference to a constructed block, bound into the environment after
/// assembly so event expressions can address blocks by variable name.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockHandle {
    /// Diagram node id the block was built from.
    pub node_id: String,
    /// Position of the block in the assembled block list.
    pub index: usize,
}

/// A user-defined script function (`fn name(a, b) = expr`).
///
/// The body is evaluated against the environment that is current at call
/// time, with the parameters shadowing it — the same late-binding behavior
/// the free-form diagram code relies on.
#[derive(Debug, Clone, PartialEq)]
pub struct UserFunction {
    pub name: String,
    pub params: Vec<String>,
    pub body: Expr,
}

/// A callable script value.
#[derive(Debug, Clone)]
pub enum FuncValue {
    Builtin { name: &'static str, f: BuiltinFn },
    User(Arc<UserFunction>),
}

/// Built-ins compare by name; function pointers have no stable identity
/// to compare by.
impl PartialEq for FuncValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FuncValue::Builtin { name: a, .. }, FuncValue::Builtin { name: b, .. }) => a == b,
            (FuncValue::User(a), FuncValue::User(b)) => a == b,
            _ => false,
        }
    }
}

impl FuncValue {
    pub fn name(&self) -> &str {
        match self {
            FuncValue::Builtin { name, .. } => name,
            FuncValue::User(f) => &f.name,
        }
    }
}

/// Runtime value produced by evaluating script expressions.
///
/// `Clone` is deep: cloning a list or map clones every element, which is what
/// makes schema defaults safe to hand out per node.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Bool(bool),
    Str(String),
    /// Ordered list. Insertion order is preserved for deterministic emission.
    List(Vec<Value>),
    /// String-keyed map. Kept as pairs so written order survives round trips.
    Map(Vec<(String, Value)>),
    Func(FuncValue),
    Block(BlockHandle),
    Null,
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Bool(_) => "bool",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Func(_) => "function",
            Value::Block(_) => "block",
            Value::Null => "null",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Truthiness check used by `and`/`or`/`not`.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(v) => !v.is_empty(),
            Value::Map(m) => !m.is_empty(),
            Value::Func(_) | Value::Block(_) => true,
            Value::Null => false,
        }
    }
}

impl fmt::Display for Value {
    /// Renders the value as script-literal text, so synthesized values (e.g.
    /// sink label lists) can be substituted directly into emitted source.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::Bool(b) => write!(f, "{}", b),
            Value::Str(s) => write!(f, "\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Map(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "\"{}\": {}", k, v)?;
                }
                write!(f, "}}")
            }
            Value::Func(func) => write!(f, "{}", func.name()),
            Value::Block(handle) => write!(f, "<block {}>", handle.node_id),
            Value::Null => write!(f, "null"),
        }
    }
}
