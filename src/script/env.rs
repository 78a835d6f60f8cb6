//! The expression environment: a flat namespace shared by every attribute,
//! global variable, and event expression of one compile.

use crate::error::ScriptError;
use crate::script::ast::Stmt;
use crate::script::interpreter::Interpreter;
use crate::script::lexer::RESERVED_WORDS;
use crate::script::parser::{parse_expression, parse_program};
use crate::script::value::{FuncValue, UserFunction, Value};
use ahash::AHashMap;
use std::sync::Arc;

/// A mutable namespace for evaluating embedded script code.
///
/// One `Environment` is built per compile: built-ins first, then diagram
/// globals in declaration order, then the free-form diagram code, and —
/// after assembly — one [`Value::Block`] binding per constructed block.
/// It is never shared between concurrent compiles.
///
/// # Trust boundary
///
/// Expressions and statements run with the privileges of the compiler
/// itself. There is no sandbox: user-defined functions can shadow built-ins
/// and assignments can overwrite earlier bindings. A deployment must
/// restrict who may submit diagrams.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    bindings: AHashMap<String, Value>,
}

impl Environment {
    /// Creates an empty namespace with no built-ins. Mostly useful in tests.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the standard namespace: math constants and helper functions.
    pub fn with_builtins() -> Self {
        let mut env = Self::new();
        env.define("pi", Value::Number(std::f64::consts::PI));
        env.define("e", Value::Number(std::f64::consts::E));
        env.define("inf", Value::Number(f64::INFINITY));
        for (name, f) in BUILTINS {
            env.define(name, Value::Func(FuncValue::Builtin { name, f: *f }));
        }
        env
    }

    /// Binds `name` to `value`, silently shadowing any earlier binding.
    pub fn define(&mut self, name: &str, value: Value) {
        self.bindings.insert(name.to_string(), value);
    }

    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Evaluates a single expression in this namespace.
    pub fn evaluate(&self, source: &str) -> Result<Value, ScriptError> {
        let expr = parse_expression(source)?;
        Interpreter::new(self).eval(&expr)
    }

    /// Runs a statement list (assignments, `fn` definitions, and bare
    /// expressions) in this namespace. Bare expressions are evaluated for
    /// their side effects only; this is an accepted part of the contract.
    pub fn run(&mut self, source: &str) -> Result<(), ScriptError> {
        let statements = parse_program(source)?;
        for statement in statements {
            match statement {
                Stmt::Assign { name, expr } => {
                    let value = Interpreter::new(self).eval(&expr)?;
                    self.define(&name, value);
                }
                Stmt::FnDef { name, params, body } => {
                    let func = UserFunction {
                        name: name.clone(),
                        params,
                        body,
                    };
                    self.define(&name, Value::Func(FuncValue::User(Arc::new(func))));
                }
                Stmt::Expr(expr) => {
                    Interpreter::new(self).eval(&expr)?;
                }
            }
        }
        Ok(())
    }

    /// Invokes a callable value with the given arguments.
    pub fn call(&self, func: &FuncValue, args: &[Value]) -> Result<Value, ScriptError> {
        Interpreter::new(self).call(func, args)
    }
}

/// Whether `name` is a syntactically valid script identifier.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Whether `name` collides with a script keyword.
pub fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}

fn number_arg(name: &'static str, args: &[Value], index: usize) -> Result<f64, ScriptError> {
    match args.get(index) {
        Some(Value::Number(n)) => Ok(*n),
        Some(other) => Err(ScriptError::TypeMismatch {
            operation: name.to_string(),
            expected: "number".to_string(),
            found: other.type_name().to_string(),
        }),
        None => Err(ScriptError::Arity {
            name: name.to_string(),
            expected: index + 1,
            got: args.len(),
        }),
    }
}

macro_rules! unary_math {
    ($name:ident, $method:ident) => {
        fn $name(args: &[Value]) -> Result<Value, ScriptError> {
            if args.len() != 1 {
                return Err(ScriptError::Arity {
                    name: stringify!($name).to_string(),
                    expected: 1,
                    got: args.len(),
                });
            }
            Ok(Value::Number(number_arg(stringify!($name), args, 0)?.$method()))
        }
    };
}

unary_math!(abs, abs);
unary_math!(sqrt, sqrt);
unary_math!(exp, exp);
unary_math!(log, ln);
unary_math!(log10, log10);
unary_math!(sin, sin);
unary_math!(cos, cos);
unary_math!(tan, tan);
unary_math!(floor, floor);
unary_math!(ceil, ceil);

fn pow(args: &[Value]) -> Result<Value, ScriptError> {
    if args.len() != 2 {
        return Err(ScriptError::Arity {
            name: "pow".to_string(),
            expected: 2,
            got: args.len(),
        });
    }
    let base = number_arg("pow", args, 0)?;
    let exponent = number_arg("pow", args, 1)?;
    Ok(Value::Number(base.powf(exponent)))
}

fn fold_numbers(
    name: &'static str,
    args: &[Value],
    f: fn(f64, f64) -> f64,
) -> Result<Value, ScriptError> {
    // Accepts either a single list or the numbers directly.
    let items: &[Value] = match args {
        [Value::List(items)] => items,
        other => other,
    };
    let mut result: Option<f64> = None;
    for item in items {
        let n = match item {
            Value::Number(n) => *n,
            other => {
                return Err(ScriptError::TypeMismatch {
                    operation: name.to_string(),
                    expected: "number".to_string(),
                    found: other.type_name().to_string(),
                });
            }
        };
        result = Some(match result {
            Some(acc) => f(acc, n),
            None => n,
        });
    }
    result.map(Value::Number).ok_or(ScriptError::Arity {
        name: name.to_string(),
        expected: 1,
        got: 0,
    })
}

fn min(args: &[Value]) -> Result<Value, ScriptError> {
    fold_numbers("min", args, f64::min)
}

fn max(args: &[Value]) -> Result<Value, ScriptError> {
    fold_numbers("max", args, f64::max)
}

fn len(args: &[Value]) -> Result<Value, ScriptError> {
    match args {
        [Value::List(items)] => Ok(Value::Number(items.len() as f64)),
        [Value::Map(entries)] => Ok(Value::Number(entries.len() as f64)),
        [Value::Str(s)] => Ok(Value::Number(s.chars().count() as f64)),
        [other] => Err(ScriptError::TypeMismatch {
            operation: "len".to_string(),
            expected: "list, map, or string".to_string(),
            found: other.type_name().to_string(),
        }),
        _ => Err(ScriptError::Arity {
            name: "len".to_string(),
            expected: 1,
            got: args.len(),
        }),
    }
}

type Builtin = (&'static str, crate::script::value::BuiltinFn);

const BUILTINS: &[Builtin] = &[
    ("abs", abs),
    ("sqrt", sqrt),
    ("exp", exp),
    ("log", log),
    ("log10", log10),
    ("sin", sin),
    ("cos", cos),
    ("tan", tan),
    ("floor", floor),
    ("ceil", ceil),
    ("pow", pow),
    ("min", min),
    ("max", max),
    ("len", len),
];
