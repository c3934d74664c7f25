// ABOUTME: Error types for parse-time diagnostics and runtime failures

use thiserror::Error;

/// A single parse-time diagnostic. The parser collects these
/// during synchronization rather than aborting; the returned program is
/// always structurally complete, even if some declarations were discarded.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Parse Error: {message} at line {line}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, line: usize) -> Self {
        ParseError {
            message: message.into(),
            line,
        }
    }
}

/// A runtime failure. `interpret` halts on the first one and
/// appends `Runtime Error: <message>` to the output buffer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("Undefined variable '{name}' at line {line}")]
    UndefinedVariable { name: String, line: usize },

    #[error("Can only call functions and classes at line {line}")]
    NotCallable { line: usize },

    #[error("Expected {expected} arguments but got {actual} at line {line}")]
    ArityMismatch {
        expected: usize,
        actual: usize,
        line: usize,
    },

    #[error("Foreach expected array, got {type_name} at line {line}")]
    ForeachNonArray { type_name: String, line: usize },

    #[error("'return' outside of a function at line {line}")]
    ReturnOutsideFunction { line: usize },

    #[error("{function}: expected {expected}, got {actual}")]
    TypeMismatch {
        function: String,
        expected: String,
        actual: String,
    },
}

impl RuntimeError {
    pub fn type_error(function: &str, expected: &str, actual: &crate::value::Value) -> Self {
        RuntimeError::TypeMismatch {
            function: function.to_string(),
            expected: expected.to_string(),
            actual: actual.type_name().to_string(),
        }
    }
}
