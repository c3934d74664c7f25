// ABOUTME: Runtime value types and their stringification rules

use crate::ast::Stmt;
use crate::env::Environment;
use crate::error::RuntimeError;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A user-defined function: its parameter names, body, and the environment
/// captured at definition time.
#[derive(Debug)]
pub struct UserFunction {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<Stmt>,
    pub closure: Rc<Environment>,
}

/// A built-in function: fixed name, required arity, and implementation.
pub struct Builtin {
    pub name: &'static str,
    pub arity: usize,
    pub func: fn(&[Value]) -> Result<Value, RuntimeError>,
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builtin").field("name", &self.name).finish()
    }
}

/// A runtime value. `Array` is reference-counted so that two
/// variables bound to the same literal share storage, matching the
/// reference-counted sharing already used for closures; the core never
/// mutates an array in place, so this is not an observable difference
/// from a by-value `Vec`.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Rc<RefCell<Vec<Value>>>),
    Function(Rc<UserFunction>),
    Builtin(Rc<Builtin>),
}

impl Value {
    pub fn array(items: Vec<Value>) -> Value {
        Value::Array(Rc::new(RefCell::new(items)))
    }

    /// Truthiness: `null` and `false` are falsy, everything
    /// else — including `0`, `""`, and an empty array — is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Bool(false))
    }

    /// Coerces to a number for arithmetic.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Number(n) => *n,
            Value::Bool(true) => 1.0,
            Value::Bool(false) => 0.0,
            Value::Null => 0.0,
            Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
            Value::Array(a) => {
                if a.borrow().is_empty() {
                    0.0
                } else {
                    1.0
                }
            }
            Value::Function(_) | Value::Builtin(_) => 0.0,
        }
    }

    /// `true` iff the value parses as a finite number (used by `to_number`
    /// and by the `is_numeric` builtin).
    pub fn is_numeric_string(s: &str) -> bool {
        s.trim().parse::<f64>().map(|n| n.is_finite()).unwrap_or(false)
    }

    /// The name used in diagnostics (`TypeMismatch`, etc).
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Function(_) | Value::Builtin(_) => "function",
        }
    }

    pub fn arity(&self) -> Option<usize> {
        match self {
            Value::Function(f) => Some(f.params.len()),
            Value::Builtin(b) => Some(b.arity),
            _ => None,
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Function(_) | Value::Builtin(_))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Null -> "null".
            Value::Null => write!(f, "null"),
            // PHP's own (string) cast: true -> "1", false -> "".
            Value::Bool(true) => write!(f, "1"),
            Value::Bool(false) => write!(f, ""),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::String(s) => write!(f, "{}", s),
            // PHP's own (string) cast of an array.
            Value::Array(_) => write!(f, "Array"),
            Value::Function(func) => write!(f, "<fn {}>", func.name),
            Value::Builtin(b) => write!(f, "<fn {}>", b.name),
        }
    }
}
