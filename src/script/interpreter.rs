//! Tree-walking evaluation of parsed script expressions.

use crate::error::ScriptError;
use crate::script::ast::{BinOp, Expr, UnaryOp};
use crate::script::env::Environment;
use crate::script::value::{FuncValue, Value};
use ahash::AHashMap;

/// Evaluates expressions against an environment, with an optional overlay of
/// local bindings (used for user-function parameters).
pub(super) struct Interpreter<'a> {
    env: &'a Environment,
}

impl<'a> Interpreter<'a> {
    pub(super) fn new(env: &'a Environment) -> Self {
        Self { env }
    }

    pub(super) fn eval(&self, expr: &Expr) -> Result<Value, ScriptError> {
        let locals = AHashMap::new();
        self.eval_with(expr, &locals)
    }

    fn eval_with(
        &self,
        expr: &Expr,
        locals: &AHashMap<String, Value>,
    ) -> Result<Value, ScriptError> {
        match expr {
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Null => Ok(Value::Null),
            Expr::List(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(self.eval_with(item, locals)?);
                }
                Ok(Value::List(values))
            }
            Expr::Map(entries) => {
                let mut values = Vec::with_capacity(entries.len());
                for (key, value) in entries {
                    values.push((key.clone(), self.eval_with(value, locals)?));
                }
                Ok(Value::Map(values))
            }
            Expr::Ident(name) => locals
                .get(name)
                .or_else(|| self.env.lookup(name))
                .cloned()
                .ok_or_else(|| ScriptError::UndefinedName(name.clone())),
            Expr::Unary(op, operand) => {
                let value = self.eval_with(operand, locals)?;
                match op {
                    UnaryOp::Neg => match value {
                        Value::Number(n) => Ok(Value::Number(-n)),
                        other => Err(type_mismatch("-", "number", &other)),
                    },
                    UnaryOp::Not => Ok(Value::Bool(!value.is_truthy())),
                }
            }
            Expr::Binary(op, lhs, rhs) => self.eval_binary(*op, lhs, rhs, locals),
            Expr::Call { callee, args } => {
                let callee_value = self.eval_with(callee, locals)?;
                let func = match callee_value {
                    Value::Func(func) => func,
                    other => {
                        let name = match callee.as_ref() {
                            Expr::Ident(name) => name.clone(),
                            _ => other.type_name().to_string(),
                        };
                        return Err(ScriptError::NotCallable(name));
                    }
                };
                let mut arg_values = Vec::with_capacity(args.len());
                for arg in args {
                    arg_values.push(self.eval_with(arg, locals)?);
                }
                self.call(&func, &arg_values)
            }
            Expr::Index(target, index) => {
                let target_value = self.eval_with(target, locals)?;
                let index_value = self.eval_with(index, locals)?;
                match (target_value, index_value) {
                    (Value::List(items), Value::Number(n)) => {
                        let raw = n as i64;
                        let idx = if raw < 0 { raw + items.len() as i64 } else { raw };
                        if idx < 0 || idx as usize >= items.len() {
                            return Err(ScriptError::IndexOutOfBounds {
                                index: raw,
                                len: items.len(),
                            });
                        }
                        Ok(items[idx as usize].clone())
                    }
                    (Value::Map(entries), Value::Str(key)) => entries
                        .iter()
                        .find(|(k, _)| *k == key)
                        .map(|(_, v)| v.clone())
                        .ok_or(ScriptError::KeyNotFound(key)),
                    (target, index) => Err(ScriptError::TypeMismatch {
                        operation: "index".to_string(),
                        expected: "list[number] or map[string]".to_string(),
                        found: format!("{}[{}]", target.type_name(), index.type_name()),
                    }),
                }
            }
        }
    }

    pub(super) fn call(&self, func: &FuncValue, args: &[Value]) -> Result<Value, ScriptError> {
        match func {
            FuncValue::Builtin { f, .. } => f(args),
            FuncValue::User(user) => {
                if args.len() != user.params.len() {
                    return Err(ScriptError::Arity {
                        name: user.name.clone(),
                        expected: user.params.len(),
                        got: args.len(),
                    });
                }
                let mut locals = AHashMap::with_capacity(user.params.len());
                for (param, arg) in user.params.iter().zip(args) {
                    locals.insert(param.clone(), arg.clone());
                }
                self.eval_with(&user.body, &locals)
            }
        }
    }

    fn eval_binary(
        &self,
        op: BinOp,
        lhs: &Expr,
        rhs: &Expr,
        locals: &AHashMap<String, Value>,
    ) -> Result<Value, ScriptError> {
        // Short-circuiting forms first.
        match op {
            BinOp::And => {
                let left = self.eval_with(lhs, locals)?;
                if !left.is_truthy() {
                    return Ok(Value::Bool(false));
                }
                let right = self.eval_with(rhs, locals)?;
                return Ok(Value::Bool(right.is_truthy()));
            }
            BinOp::Or => {
                let left = self.eval_with(lhs, locals)?;
                if left.is_truthy() {
                    return Ok(Value::Bool(true));
                }
                let right = self.eval_with(rhs, locals)?;
                return Ok(Value::Bool(right.is_truthy()));
            }
            _ => {}
        }

        let left = self.eval_with(lhs, locals)?;
        let right = self.eval_with(rhs, locals)?;
        match op {
            BinOp::Add => match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::Str(a), Value::Str(b)) => Ok(Value::Str(format!("{}{}", a, b))),
                (Value::List(a), Value::List(b)) => {
                    let mut items = a.clone();
                    items.extend(b.iter().cloned());
                    Ok(Value::List(items))
                }
                _ => Err(type_mismatch("+", "number, string, or list", &left)),
            },
            BinOp::Sub => self.numeric(op, &left, &right, |a, b| a - b),
            BinOp::Mul => self.numeric(op, &left, &right, |a, b| a * b),
            BinOp::Div => self.numeric(op, &left, &right, |a, b| a / b),
            BinOp::Mod => self.numeric(op, &left, &right, |a, b| a % b),
            BinOp::Pow => self.numeric(op, &left, &right, |a, b| a.powf(b)),
            BinOp::Eq => Ok(Value::Bool(left == right)),
            BinOp::Ne => Ok(Value::Bool(left != right)),
            BinOp::Lt => self.comparison(op, &left, &right, |a, b| a < b),
            BinOp::Le => self.comparison(op, &left, &right, |a, b| a <= b),
            BinOp::Gt => self.comparison(op, &left, &right, |a, b| a > b),
            BinOp::Ge => self.comparison(op, &left, &right, |a, b| a >= b),
            BinOp::And | BinOp::Or => unreachable!("handled above"),
        }
    }

    fn numeric<F>(
        &self,
        op: BinOp,
        left: &Value,
        right: &Value,
        f: F,
    ) -> Result<Value, ScriptError>
    where
        F: Fn(f64, f64) -> f64,
    {
        match (left, right) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(f(*a, *b))),
            (Value::Number(_), other) | (other, _) => {
                Err(type_mismatch(op.symbol(), "number", other))
            }
        }
    }

    fn comparison<F>(
        &self,
        op: BinOp,
        left: &Value,
        right: &Value,
        f: F,
    ) -> Result<Value, ScriptError>
    where
        F: Fn(f64, f64) -> bool,
    {
        match (left, right) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Bool(f(*a, *b))),
            (Value::Str(a), Value::Str(b)) => {
                let ordering = a.cmp(b);
                let as_numbers = match ordering {
                    std::cmp::Ordering::Less => (-1.0, 0.0),
                    std::cmp::Ordering::Equal => (0.0, 0.0),
                    std::cmp::Ordering::Greater => (1.0, 0.0),
                };
                Ok(Value::Bool(f(as_numbers.0, as_numbers.1)))
            }
            (Value::Number(_), other) | (other, _) => {
                Err(type_mismatch(op.symbol(), "number", other))
            }
        }
    }
}

fn type_mismatch(operation: &str, expected: &str, found: &Value) -> ScriptError {
    ScriptError::TypeMismatch {
        operation: operation.to_string(),
        expected: expected.to_string(),
        found: found.type_name().to_string(),
    }
}
