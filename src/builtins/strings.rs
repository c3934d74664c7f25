// ABOUTME: String and array built-ins (strlen, count, trim, implode, ...)

use super::define;
use crate::env::Environment;
use crate::error::RuntimeError;
use crate::value::Value;
use std::rc::Rc;

pub(super) fn register(env: &Rc<Environment>) {
    define(env, "strlen", 1, strlen);
    define(env, "count", 1, count);
    define(env, "strtoupper", 1, strtoupper);
    define(env, "strtolower", 1, strtolower);
    define(env, "trim", 1, trim);
    define(env, "implode", 2, implode);
}

/// Length of the argument stringified, in UTF-16 code units (PHP's own
/// `strlen` counts bytes of its internal string encoding; we mirror that
/// with UTF-16 code units rather than Unicode scalar values).
fn strlen(args: &[Value]) -> Result<Value, RuntimeError> {
    Ok(Value::Number(args[0].to_string().encode_utf16().count() as f64))
}

fn count(args: &[Value]) -> Result<Value, RuntimeError> {
    match &args[0] {
        Value::Array(items) => Ok(Value::Number(items.borrow().len() as f64)),
        other => Err(RuntimeError::type_error("count", "array", other)),
    }
}

fn strtoupper(args: &[Value]) -> Result<Value, RuntimeError> {
    Ok(Value::String(args[0].to_string().to_uppercase()))
}

fn strtolower(args: &[Value]) -> Result<Value, RuntimeError> {
    Ok(Value::String(args[0].to_string().to_lowercase()))
}

/// Stringifies the argument, then strips leading/trailing ASCII whitespace
/// only (not full Unicode whitespace).
fn trim(args: &[Value]) -> Result<Value, RuntimeError> {
    let s = args[0].to_string();
    Ok(Value::String(
        s.trim_matches(|c: char| c.is_ascii_whitespace()).to_string(),
    ))
}

/// `implode(glue, array)` — joins an array's elements with `glue`, using the
/// same stringification rules as `echo`.
fn implode(args: &[Value]) -> Result<Value, RuntimeError> {
    let glue = match &args[0] {
        Value::String(s) => s.clone(),
        other => return Err(RuntimeError::type_error("implode", "string", other)),
    };
    match &args[1] {
        Value::Array(items) => {
            let joined = items
                .borrow()
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(&glue);
            Ok(Value::String(joined))
        }
        other => Err(RuntimeError::type_error("implode", "array", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strlen_counts_utf16_code_units() {
        assert_eq!(strlen(&[Value::String("hello".into())]).unwrap().to_number(), 5.0);
    }

    #[test]
    fn strlen_stringifies_a_non_string_argument() {
        assert_eq!(strlen(&[Value::Number(123.0)]).unwrap().to_number(), 3.0);
    }

    #[test]
    fn strtoupper_stringifies_a_non_string_argument() {
        assert_eq!(strtoupper(&[Value::Bool(true)]).unwrap().to_string(), "1");
    }

    #[test]
    fn count_counts_elements() {
        let arr = Value::array(vec![Value::Number(1.0), Value::Number(2.0)]);
        assert_eq!(count(&[arr]).unwrap().to_number(), 2.0);
    }

    #[test]
    fn implode_joins_with_glue() {
        let arr = Value::array(vec![Value::String("a".into()), Value::String("b".into())]);
        let result = implode(&[Value::String(",".into()), arr]).unwrap();
        assert_eq!(result.to_string(), "a,b");
    }

    #[test]
    fn trim_strips_ascii_whitespace() {
        assert_eq!(trim(&[Value::String("  hi  ".into())]).unwrap().to_string(), "hi");
    }
}
