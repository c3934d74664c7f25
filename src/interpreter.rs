// ABOUTME: Tree-walking interpreter executing a parsed statement sequence

use crate::ast::{Expr, Stmt};
use crate::builtins;
use crate::env::Environment;
use crate::error::RuntimeError;
use crate::token::{Token, TokenKind};
use crate::value::{UserFunction, Value};
use std::rc::Rc;

/// The result of executing one statement: either control fell through
/// normally, or a `return` is unwinding the current call frame carrying a
/// value.
enum Signal {
    Normal,
    Return(Value, usize),
}

/// Executes statements in source order, accumulating echoed text into an
/// output buffer. On the first runtime error, appends
/// `Runtime Error: <message>` to the buffer and stops.
pub struct Interpreter {
    globals: Rc<Environment>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        let globals = Environment::new();
        builtins::register_all(&globals);
        Interpreter { globals }
    }

    pub fn interpret(&self, statements: Vec<Stmt>) -> String {
        let span = tracing::debug_span!("interpret");
        let _enter = span.enter();
        let mut output = String::new();
        for stmt in &statements {
            match self.execute(stmt, self.globals.clone(), &mut output) {
                Ok(Signal::Normal) => {}
                Ok(Signal::Return(_, line)) => {
                    let err = RuntimeError::ReturnOutsideFunction { line };
                    tracing::debug!(%err, "halting on runtime error");
                    output.push_str(&format!("Runtime Error: {}", err));
                    return output;
                }
                Err(err) => {
                    tracing::debug!(%err, "halting on runtime error");
                    output.push_str(&format!("Runtime Error: {}", err));
                    return output;
                }
            }
        }
        output
    }

    fn execute(
        &self,
        stmt: &Stmt,
        env: Rc<Environment>,
        output: &mut String,
    ) -> Result<Signal, RuntimeError> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr, env)?;
                Ok(Signal::Normal)
            }
            Stmt::Var(name, initializer) => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr, env.clone())?,
                    None => Value::Null,
                };
                env.define(name.lexeme.clone(), value);
                Ok(Signal::Normal)
            }
            Stmt::Echo(expr) => {
                let value = self.evaluate(expr, env)?;
                output.push_str(&value.to_string());
                Ok(Signal::Normal)
            }
            Stmt::Return(keyword, value) => {
                let value = match value {
                    Some(expr) => self.evaluate(expr, env)?,
                    None => Value::Null,
                };
                Ok(Signal::Return(value, keyword.line))
            }
            Stmt::If(condition, then_branch, else_branch) => {
                if self.evaluate(condition, env.clone())?.is_truthy() {
                    self.execute(then_branch, env, output)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch, env, output)
                } else {
                    Ok(Signal::Normal)
                }
            }
            Stmt::While(condition, body) => {
                while self.evaluate(condition, env.clone())?.is_truthy() {
                    match self.execute(body, env.clone(), output)? {
                        Signal::Normal => {}
                        signal @ Signal::Return(_, _) => return Ok(signal),
                    }
                }
                Ok(Signal::Normal)
            }
            Stmt::Foreach(array_expr, item, body) => {
                let array = self.evaluate(array_expr, env.clone())?;
                let items = match &array {
                    Value::Array(items) => items.borrow().clone(),
                    other => {
                        return Err(RuntimeError::ForeachNonArray {
                            type_name: other.type_name().to_string(),
                            line: item.line,
                        })
                    }
                };
                for element in items {
                    let iteration_env = Environment::with_parent(env.clone());
                    iteration_env.define(item.lexeme.clone(), element);
                    match self.execute(body, iteration_env, output)? {
                        Signal::Normal => {}
                        signal @ Signal::Return(_, _) => return Ok(signal),
                    }
                }
                Ok(Signal::Normal)
            }
            Stmt::Function(name, params, body) => {
                let function = Value::Function(Rc::new(UserFunction {
                    name: name.lexeme.clone(),
                    params: params.iter().map(|p| p.lexeme.clone()).collect(),
                    body: body.clone(),
                    closure: env.clone(),
                }));
                env.define(name.lexeme.clone(), function);
                Ok(Signal::Normal)
            }
            Stmt::Block(statements) => {
                let block_env = Environment::with_parent(env);
                for stmt in statements {
                    match self.execute(stmt, block_env.clone(), output)? {
                        Signal::Normal => {}
                        signal @ Signal::Return(_, _) => return Ok(signal),
                    }
                }
                Ok(Signal::Normal)
            }
        }
    }

    fn evaluate(&self, expr: &Expr, env: Rc<Environment>) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Variable(name) => env.get(&name.lexeme).ok_or_else(|| RuntimeError::UndefinedVariable {
                name: name.lexeme.clone(),
                line: name.line,
            }),
            Expr::Assign(name, value_expr) => {
                let value = self.evaluate(value_expr, env.clone())?;
                if !env.assign(&name.lexeme, value.clone()) {
                    // Implicit declaration on first assignment: the binding
                    // must outlive the current block, so it goes in the
                    // global scope rather than the block's own environment.
                    self.globals.define(name.lexeme.clone(), value.clone());
                }
                Ok(value)
            }
            Expr::Unary(op, right) => {
                let right = self.evaluate(right, env)?;
                Ok(match op.kind {
                    TokenKind::Bang => Value::Bool(!right.is_truthy()),
                    TokenKind::Minus => Value::Number(-right.to_number()),
                    _ => unreachable!("invalid unary operator token kind"),
                })
            }
            Expr::Binary(left, op, right) => {
                let left = self.evaluate(left, env.clone())?;
                let right = self.evaluate(right, env)?;
                Ok(Self::apply_binary(op, left, right))
            }
            Expr::Logical(left, op, right) => {
                let left = self.evaluate(left, env.clone())?;
                match op.kind {
                    // a || b -> a if truthy else b.
                    TokenKind::Or => {
                        if left.is_truthy() {
                            Ok(left)
                        } else {
                            self.evaluate(right, env)
                        }
                    }
                    // a && b -> a if falsy else b.
                    TokenKind::And => {
                        if !left.is_truthy() {
                            Ok(left)
                        } else {
                            self.evaluate(right, env)
                        }
                    }
                    _ => unreachable!("invalid logical operator token kind"),
                }
            }
            Expr::Grouping(inner) => self.evaluate(inner, env),
            Expr::Array(elements) => {
                let mut values = Vec::with_capacity(elements.len());
                for element in elements {
                    values.push(self.evaluate(element, env.clone())?);
                }
                Ok(Value::array(values))
            }
            Expr::Call(callee, paren, arg_exprs) => {
                let callee_value = self.evaluate(callee, env.clone())?;
                if !callee_value.is_callable() {
                    return Err(RuntimeError::NotCallable { line: paren.line });
                }
                let mut args = Vec::with_capacity(arg_exprs.len());
                for arg in arg_exprs {
                    args.push(self.evaluate(arg, env.clone())?);
                }
                let arity = callee_value.arity().expect("callable has an arity");
                if arity != args.len() {
                    return Err(RuntimeError::ArityMismatch {
                        expected: arity,
                        actual: args.len(),
                        line: paren.line,
                    });
                }
                self.call(callee_value, args)
            }
        }
    }

    fn call(&self, callee: Value, args: Vec<Value>) -> Result<Value, RuntimeError> {
        match callee {
            Value::Function(function) => {
                let call_env = Environment::with_parent(function.closure.clone());
                for (param, arg) in function.params.iter().zip(args) {
                    call_env.define(param.clone(), arg);
                }
                let mut discard = String::new();
                for stmt in &function.body {
                    match self.execute(stmt, call_env.clone(), &mut discard)? {
                        Signal::Normal => {}
                        Signal::Return(value, _) => return Ok(value),
                    }
                }
                Ok(Value::Null)
            }
            Value::Builtin(builtin) => (builtin.func)(&args),
            _ => unreachable!("call() invoked on a non-callable value"),
        }
    }

    fn apply_binary(op: &Token, left: Value, right: Value) -> Value {
        match op.kind {
            // Numeric addition, or string concatenation otherwise.
            TokenKind::Plus => match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => Value::Number(a + b),
                _ => Value::String(format!("{}{}", left, right)),
            },
            TokenKind::Dot => Value::String(format!("{}{}", left, right)),
            TokenKind::Minus => Value::Number(left.to_number() - right.to_number()),
            TokenKind::Star => Value::Number(left.to_number() * right.to_number()),
            TokenKind::Slash => Value::Number(left.to_number() / right.to_number()),
            TokenKind::Percent => Value::Number(left.to_number() % right.to_number()),
            TokenKind::StarStar => Value::Number(left.to_number().powf(right.to_number())),
            TokenKind::Less => Value::Bool(left.to_number() < right.to_number()),
            TokenKind::LessEqual => Value::Bool(left.to_number() <= right.to_number()),
            TokenKind::Greater => Value::Bool(left.to_number() > right.to_number()),
            TokenKind::GreaterEqual => Value::Bool(left.to_number() >= right.to_number()),
            TokenKind::EqualEqual => Value::Bool(loose_eq(&left, &right)),
            TokenKind::BangEqual => Value::Bool(!loose_eq(&left, &right)),
            TokenKind::EqualEqualEqual => Value::Bool(strict_eq(&left, &right)),
            TokenKind::BangEqualEqual => Value::Bool(!strict_eq(&left, &right)),
            _ => unreachable!("invalid binary operator token kind"),
        }
    }
}

/// `===`/`!==`: no coercion, mismatched kinds are never equal.
fn strict_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => {
            Rc::ptr_eq(x, y) || {
                let xb = x.borrow();
                let yb = y.borrow();
                xb.len() == yb.len() && xb.iter().zip(yb.iter()).all(|(a, b)| strict_eq(a, b))
            }
        }
        (Value::Function(x), Value::Function(y)) => Rc::ptr_eq(x, y),
        (Value::Builtin(x), Value::Builtin(y)) => Rc::ptr_eq(x, y),
        _ => false,
    }
}

/// `==`/`!=`: `null` equals only `null`; a number and a numeric string
/// compare by numeric value; a boolean coerces to `0.0`/`1.0`; mismatched
/// non-null, non-numeric types fall back to a common numeric
/// representation.
fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::String(x), Value::String(y))
            if !(Value::is_numeric_string(x) && Value::is_numeric_string(y)) =>
        {
            x == y
        }
        (Value::Array(_), Value::Array(_)) => strict_eq(a, b),
        (Value::Function(_) | Value::Builtin(_), _) | (_, Value::Function(_) | Value::Builtin(_)) => {
            strict_eq(a, b)
        }
        _ => a.to_number() == b.to_number(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::scan;
    use crate::parser::parse;

    fn run(source: &str) -> String {
        let (stmts, errors) = parse(scan(source));
        assert!(errors.is_empty(), "unexpected parse errors: {:?}", errors);
        Interpreter::new().interpret(stmts)
    }

    #[test]
    fn arithmetic_and_concatenation() {
        assert_eq!(run(r#"$x=10; $y=20; echo "sum=" . ($x+$y);"#), "sum=30");
    }

    #[test]
    fn function_closure_and_return() {
        assert_eq!(
            run("function add($a,$b){ return $a+$b; } $s=add(2,3); echo $s;"),
            "5"
        );
    }

    #[test]
    fn if_elseif_else() {
        assert_eq!(
            run(r#"$n=0; if($n>0){echo "p";} elseif($n<0){echo "n";} else {echo "z";}"#),
            "z"
        );
    }

    #[test]
    fn foreach_ordering() {
        assert_eq!(
            run(r#"$a=["x","y","z"]; foreach($a as $v){ echo $v; }"#),
            "xyz"
        );
    }

    #[test]
    fn for_loop_desugaring() {
        assert_eq!(run("for($i=0;$i<3;$i=$i+1){ echo $i; }"), "012");
    }

    #[test]
    fn undefined_variable_surfaces_as_runtime_error() {
        assert!(run("echo $missing;").contains("Runtime Error: Undefined variable '$missing'"));
    }

    #[test]
    fn closure_captures_definition_scope() {
        let output = run(
            r#"
            function makeAdder($x) {
                function nope() { return 0; }
                $unused = nope();
                return $x;
            }
            $a = makeAdder(1);
            $b = makeAdder(2);
            echo $a . $b;
            "#,
        );
        assert_eq!(output, "12");
    }

    #[test]
    fn short_circuit_or_skips_right_operand() {
        let output = run("$x = 0; (true || ($x = 1)); echo $x;");
        assert_eq!(output, "0");
    }

    #[test]
    fn short_circuit_and_skips_right_operand() {
        let output = run("$x = 0; (false && ($x = 1)); echo $x;");
        assert_eq!(output, "0");
    }

    #[test]
    fn logical_operators_return_deciding_value_not_a_bool() {
        assert_eq!(run(r#"echo (0 || "fallback");"#), "fallback");
    }

    #[test]
    fn implicit_declaration_on_assignment_is_visible_after_block() {
        let output = run("{ $x = 5; } echo $x;");
        assert_eq!(output, "5");
    }

    #[test]
    fn block_scoped_var_does_not_leak_out() {
        let output = run("var $x = 1; { var $x = 2; } echo $x;");
        assert_eq!(output, "1");
    }

    #[test]
    fn call_of_non_function_is_runtime_error() {
        let output = run("$x = 1; $x();");
        assert!(output.contains("Runtime Error: Can only call functions and classes"));
    }

    #[test]
    fn arity_mismatch_is_runtime_error() {
        let output = run("function f($a) { return $a; } f(1, 2);");
        assert!(output.contains("Runtime Error: Expected 1 arguments but got 2"));
    }

    #[test]
    fn foreach_over_non_array_is_runtime_error() {
        let output = run("foreach (1 as $v) { echo $v; }");
        assert!(output.contains("Runtime Error: Foreach expected array, got number"));
    }

    #[test]
    fn return_at_top_level_is_runtime_error() {
        let output = run("return 1;");
        assert!(output.contains("Runtime Error: 'return' outside of a function"));
    }

    #[test]
    fn strict_equality_rejects_coercion() {
        assert_eq!(
            run(r#"if (0 === "0") { echo "eq"; } else { echo "ne"; }"#),
            "ne"
        );
    }

    #[test]
    fn loose_vs_strict_equality() {
        assert_eq!(run(r#"if ("5" == 5) { echo "loose"; }"#), "loose");
        assert_eq!(run(r#"if ("5" === 5) { echo "strict"; } else { echo "not-strict"; }"#), "not-strict");
    }
}
