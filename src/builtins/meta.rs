//! `doc`, `find-doc`, `read-string`, `eval`, `macroexpand-1`,
//! `macroexpand` — the registry-introspection and reader/evaluator
//! bridge builtins. Each of these needs more context than a plain
//! `Allocator` (a registry to search, or a full evaluator to run), so
//! they construct a scratch `Runtime`/`Registry` per call rather than
//! widening `BuiltinFn`'s signature — the call contract in spec §6 is
//! `func(allocator, argument_slice) -> value | error` and stays that way
//! for every entry, this module included.

use super::{BuiltinDef, BuiltinKind, Registry};
use crate::core::value::Value;
use crate::core::Allocator;
use crate::env::Env;
use crate::errors::{AxError, AxResult};
use crate::evaluator::Runtime;
use crate::macros;
use crate::reader;

fn builtin_doc(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    let name = match args {
        [Value::Symbol(s)] => s.as_ref().to_string(),
        [Value::Str(s)] => s.as_ref().to_string(),
        _ => return Err(AxError::arity("doc takes exactly 1 argument (a symbol or string)")),
    };
    let registry = super::build_registry();
    match registry.get(&name) {
        Some(def) => Ok(Value::string(format!("{}\n{}\n  {}", def.name, def.arglists, def.doc))),
        None => Ok(Value::Nil),
    }
}

fn builtin_find_doc(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    let needle = match args {
        [Value::Str(s)] => s.as_ref().to_string(),
        _ => return Err(AxError::arity("find-doc takes exactly 1 argument (a search string)")),
    };
    let registry = super::build_registry();
    let matches: Vec<Value> = registry
        .iter()
        .filter(|def| def.name.contains(&needle) || def.doc.contains(&needle))
        .map(|def| Value::string(format!("{}\n  {}", def.name, def.doc)))
        .collect();
    Ok(Value::List(std::rc::Rc::new(crate::core::collections::PersistentList::new(matches))))
}

fn builtin_read_string(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    match args {
        [Value::Str(s)] => {
            let forms = reader::read_all(s, 0)?;
            Ok(forms.into_iter().next().unwrap_or(Value::Nil))
        }
        [other] => Err(AxError::type_error(format!("read-string requires a string, got {}", other.type_name())).with_arg(0)),
        _ => Err(AxError::arity(format!("read-string takes exactly 1 argument, got {}", args.len()))),
    }
}

fn builtin_eval(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    match args {
        [form] => {
            let mut rt = Runtime::new();
            let mut env = Env::new();
            rt.eval(form, &mut env)
        }
        _ => Err(AxError::arity(format!("eval takes exactly 1 argument, got {}", args.len()))),
    }
}

fn builtin_macroexpand_1(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    match args {
        [form] => {
            let mut rt = Runtime::new();
            let mut env = Env::new();
            macros::expand_1(&mut rt, form, &mut env)
        }
        _ => Err(AxError::arity(format!("macroexpand-1 takes exactly 1 argument, got {}", args.len()))),
    }
}

fn builtin_macroexpand(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    match args {
        [form] => {
            let mut rt = Runtime::new();
            let mut env = Env::new();
            macros::expand_full(&mut rt, form, &mut env)
        }
        _ => Err(AxError::arity(format!("macroexpand takes exactly 1 argument, got {}", args.len()))),
    }
}

pub fn register(r: &mut Registry) {
    r.register(BuiltinDef {
        name: "doc",
        doc: "Returns the docstring for a registered builtin by name, or nil.",
        arglists: "([name])",
        added: "1.0",
        func: builtin_doc,
        kind: BuiltinKind::RuntimeFn,
    });
    r.register(BuiltinDef {
        name: "find-doc",
        doc: "Returns a list of docstrings whose name or body contains the given text.",
        arglists: "([search])",
        added: "1.0",
        func: builtin_find_doc,
        kind: BuiltinKind::RuntimeFn,
    });
    r.register(BuiltinDef {
        name: "read-string",
        doc: "Reads the first form from a string of source text.",
        arglists: "([s])",
        added: "1.0",
        func: builtin_read_string,
        kind: BuiltinKind::RuntimeFn,
    });
    r.register(BuiltinDef {
        name: "eval",
        doc: "Evaluates a form in a fresh top-level environment.",
        arglists: "([form])",
        added: "1.0",
        func: builtin_eval,
        kind: BuiltinKind::RuntimeFn,
    });
    r.register(BuiltinDef {
        name: "macroexpand-1",
        doc: "Expands a macro call one level, or returns the form unchanged.",
        arglists: "([form])",
        added: "1.0",
        func: builtin_macroexpand_1,
        kind: BuiltinKind::RuntimeFn,
    });
    r.register(BuiltinDef {
        name: "macroexpand",
        doc: "Repeatedly expands a macro call until it no longer names a macro.",
        arglists: "([form])",
        added: "1.0",
        func: builtin_macroexpand,
        kind: BuiltinKind::RuntimeFn,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doc_finds_a_known_builtin() {
        let alloc = Allocator::new();
        let result = builtin_doc(&alloc, &[Value::symbol("+")]).unwrap();
        match result {
            Value::Str(s) => assert!(s.contains("sum of all numbers")),
            other => panic!("expected string, got {:?}", other),
        }
    }

    #[test]
    fn doc_returns_nil_for_unknown_name() {
        let alloc = Allocator::new();
        assert_eq!(builtin_doc(&alloc, &[Value::symbol("no-such-builtin")]).unwrap(), Value::Nil);
    }

    #[test]
    fn read_string_then_eval_round_trips_arithmetic() {
        let alloc = Allocator::new();
        let form = builtin_read_string(&alloc, &[Value::string("(+ 1 2 3)")]).unwrap();
        assert_eq!(builtin_eval(&alloc, &[form]).unwrap(), Value::Integer(6));
    }
}
