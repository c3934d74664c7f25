// ABOUTME: Registration point for built-in functions exposed to scripts

mod strings;
mod types;

use crate::env::Environment;
use crate::value::{Builtin, Value};
use std::rc::Rc;

/// Installs a function under `name` into `env`. All built-ins
/// are fixed-arity; the interpreter checks arity before calling one.
pub(crate) fn define(
    env: &Rc<Environment>,
    name: &'static str,
    arity: usize,
    func: fn(&[Value]) -> Result<Value, crate::error::RuntimeError>,
) {
    env.define(name, Value::Builtin(Rc::new(Builtin { name, arity, func })));
}

/// Populates the global environment with every built-in.
pub fn register_all(env: &Rc<Environment>) {
    strings::register(env);
    types::register(env);
}
