// ABOUTME: Type-predicate built-ins (is_null, is_array, is_string, ...)

use super::define;
use crate::env::Environment;
use crate::error::RuntimeError;
use crate::value::Value;
use std::rc::Rc;

pub(super) fn register(env: &Rc<Environment>) {
    define(env, "is_null", 1, is_null);
    define(env, "is_array", 1, is_array);
    define(env, "is_string", 1, is_string);
    define(env, "is_int", 1, is_int);
    define(env, "is_integer", 1, is_int);
    define(env, "is_bool", 1, is_bool);
    define(env, "is_numeric", 1, is_numeric);
}

fn is_null(args: &[Value]) -> Result<Value, RuntimeError> {
    Ok(Value::Bool(matches!(args[0], Value::Null)))
}

fn is_array(args: &[Value]) -> Result<Value, RuntimeError> {
    Ok(Value::Bool(matches!(args[0], Value::Array(_))))
}

fn is_string(args: &[Value]) -> Result<Value, RuntimeError> {
    Ok(Value::Bool(matches!(args[0], Value::String(_))))
}

/// An "integer" in PHP-JS is a `Number` with no fractional part — the
/// language has no separate integer representation.
fn is_int(args: &[Value]) -> Result<Value, RuntimeError> {
    Ok(Value::Bool(matches!(args[0], Value::Number(n) if n.fract() == 0.0 && n.is_finite())))
}

fn is_bool(args: &[Value]) -> Result<Value, RuntimeError> {
    Ok(Value::Bool(matches!(args[0], Value::Bool(_))))
}

fn is_numeric(args: &[Value]) -> Result<Value, RuntimeError> {
    Ok(Value::Bool(match &args[0] {
        Value::Number(_) => true,
        Value::String(s) => Value::is_numeric_string(s),
        _ => false,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_int_requires_whole_number() {
        assert_eq!(is_int(&[Value::Number(3.0)]).unwrap().is_truthy(), true);
        assert_eq!(is_int(&[Value::Number(3.5)]).unwrap().is_truthy(), false);
    }

    #[test]
    fn is_numeric_accepts_numeric_strings() {
        assert_eq!(is_numeric(&[Value::String("42".into())]).unwrap().is_truthy(), true);
        assert_eq!(is_numeric(&[Value::String("abc".into())]).unwrap().is_truthy(), false);
    }

    #[test]
    fn is_null_and_is_array() {
        assert_eq!(is_null(&[Value::Null]).unwrap().is_truthy(), true);
        assert_eq!(is_array(&[Value::array(vec![])]).unwrap().is_truthy(), true);
    }
}
