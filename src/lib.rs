// ABOUTME: Library module exposing internal components and the `run` entry point

pub mod ast;
pub mod builtins;
pub mod config;
pub mod env;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod token;
pub mod value;

use interpreter::Interpreter;

/// Lexes, parses, and interprets `source`, returning everything the program
/// echoed, including any trailing `Runtime Error: ...` suffix. A malformed
/// declaration is dropped during parse-error synchronization and never
/// reaches the interpreter; diagnostics from that recovery are only
/// logged here — callers who need them can call [`lexer::scan`] and
/// [`parser::parse`] directly instead of `run`.
pub fn run(source: &str) -> String {
    let span = tracing::debug_span!("run");
    let _enter = span.enter();

    let tokens = lexer::scan(source);
    let (statements, parse_errors) = parser::parse(tokens);
    if let Some(first) = parse_errors.first() {
        tracing::debug!(error = %first, total = parse_errors.len(), "parse errors");
    }

    Interpreter::new().interpret(statements)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_composes_lex_parse_interpret() {
        assert_eq!(run(r#"echo "hi";"#), "hi");
    }

    #[test]
    fn run_skips_malformed_declaration_and_keeps_going() {
        assert_eq!(run("1 = 2; echo 3;"), "3");
    }
}
