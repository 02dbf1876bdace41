//! `print`, `println`, `pr-str`, `prn` — textual output. Writes go through
//! a process-wide capture buffer (behind a `Mutex` + `OnceLock`, per
//! SPEC_FULL.md §5, mirroring the PRNG cell in `crate::builtins::rand`) so
//! tests can assert on output without redirecting real stdout, and the
//! REPL binary in `main.rs` drains the buffer to the real terminal after
//! every top-level form.

use std::sync::{Mutex, OnceLock};

use super::{BuiltinDef, BuiltinKind, Registry};
use crate::core::value::Value;
use crate::core::Allocator;
use crate::errors::AxResult;

static OUTPUT: OnceLock<Mutex<String>> = OnceLock::new();

fn buffer() -> &'static Mutex<String> {
    OUTPUT.get_or_init(|| Mutex::new(String::new()))
}

/// Drains and returns everything written since the last drain. Called by
/// the REPL loop and by tests.
pub fn take_output() -> String {
    std::mem::take(&mut *buffer().lock().unwrap_or_else(|e| e.into_inner()))
}

fn write_out(s: &str) {
    buffer().lock().unwrap_or_else(|e| e.into_inner()).push_str(s);
}

/// `print`/`println`'s human-readable rendering: identical to `display()`
/// except a string argument is written unquoted, the way Clojure's own
/// `print` elides the `"..."` wrapping that `pr-str`/`prn` keep.
fn print_form(v: &Value) -> String {
    match v {
        Value::Str(s) => s.to_string(),
        other => other.display(),
    }
}

fn builtin_print(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    let parts: Vec<String> = args.iter().map(print_form).collect();
    write_out(&parts.join(" "));
    Ok(Value::Nil)
}

fn builtin_println(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    let parts: Vec<String> = args.iter().map(print_form).collect();
    write_out(&parts.join(" "));
    write_out("\n");
    Ok(Value::Nil)
}

fn builtin_pr_str(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    let parts: Vec<String> = args.iter().map(|v| v.pr_str()).collect();
    Ok(Value::string(parts.join(" ")))
}

fn builtin_prn(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    let parts: Vec<String> = args.iter().map(|v| v.pr_str()).collect();
    write_out(&parts.join(" "));
    write_out("\n");
    Ok(Value::Nil)
}

pub fn register(r: &mut Registry) {
    r.register(BuiltinDef {
        name: "print",
        doc: "Writes the display form of each argument, space-separated, with no trailing newline.",
        arglists: "([& more])",
        added: "1.0",
        func: builtin_print,
        kind: BuiltinKind::RuntimeFn,
    });
    r.register(BuiltinDef {
        name: "println",
        doc: "Like print, but appends a trailing newline.",
        arglists: "([& more])",
        added: "1.0",
        func: builtin_println,
        kind: BuiltinKind::RuntimeFn,
    });
    r.register(BuiltinDef {
        name: "pr-str",
        doc: "Returns the machine-readable representation of the arguments as a string.",
        arglists: "([& more])",
        added: "1.0",
        func: builtin_pr_str,
        kind: BuiltinKind::RuntimeFn,
    });
    r.register(BuiltinDef {
        name: "prn",
        doc: "Like pr-str, but writes to output with a trailing newline instead of returning a string.",
        arglists: "([& more])",
        added: "1.0",
        func: builtin_prn,
        kind: BuiltinKind::RuntimeFn,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn println_appends_newline_and_is_captured() {
        take_output();
        let alloc = Allocator::new();
        builtin_println(&alloc, &[Value::string("hi")]).unwrap();
        assert_eq!(take_output(), "hi\n");
    }

    #[test]
    fn pr_str_keeps_string_quoting() {
        take_output();
        let alloc = Allocator::new();
        let result = builtin_pr_str(&alloc, &[Value::string("hi")]).unwrap();
        assert_eq!(result, Value::string("\"hi\""));
    }

    #[test]
    fn pr_str_returns_without_writing() {
        take_output();
        let alloc = Allocator::new();
        let result = builtin_pr_str(&alloc, &[Value::Integer(5)]).unwrap();
        assert_eq!(result, Value::string("5"));
        assert_eq!(take_output(), "");
    }
}
