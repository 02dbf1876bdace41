//! Collection builtins supplementing the numeric tower: the core spec
//! treats list/vector/map/set as external collaborators with only a
//! count/get/equality contract (spec §1), so this module is the thin
//! sequence/associative API the evaluator needs to actually run Lisp
//! programs that build on the numeric tower (`range`, `conj`, `assoc`,
//! ...). Grounded in `crate::core::collections`'s persistent containers.

use std::rc::Rc;

use super::{BuiltinDef, BuiltinKind, Registry};
use crate::core::collections::{PersistentList, PersistentMap, PersistentSet};
use crate::core::value::Value;
use crate::core::Allocator;
use crate::errors::{AxError, AxResult};
use crate::numeric;

fn as_i64(v: &Value, arg_index: usize) -> AxResult<i64> {
    match v {
        Value::Integer(n) => Ok(*n),
        other => Err(AxError::type_error(format!(
            "expected an integer, got {}",
            other.type_name()
        ))
        .with_arg(arg_index)),
    }
}

/// `range` — `([end]) ([start end]) ([start end step])`, half-open,
/// matching Clojure's `range` (spec-adjacent: not in spec.md itself, but
/// the numeric tower needs a sequence generator to be exercisable).
fn builtin_range(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    let (start, end, step) = match args {
        [end] => (0, as_i64(end, 0)?, 1),
        [start, end] => (as_i64(start, 0)?, as_i64(end, 1)?, 1),
        [start, end, step] => (as_i64(start, 0)?, as_i64(end, 1)?, as_i64(step, 2)?),
        _ => return Err(AxError::arity(format!("range takes 1 to 3 arguments, got {}", args.len()))),
    };
    if step == 0 {
        return Err(AxError::value("range step must not be zero"));
    }
    let mut items = Vec::new();
    let mut i = start;
    if step > 0 {
        while i < end {
            items.push(Value::Integer(i));
            i += step;
        }
    } else {
        while i > end {
            items.push(Value::Integer(i));
            i += step;
        }
    }
    Ok(Value::List(Rc::new(PersistentList::new(items))))
}

fn builtin_repeat(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    match args {
        [n, x] => {
            let count = as_i64(n, 0)?;
            if count < 0 {
                return Err(AxError::value("repeat count must not be negative").with_arg(0));
            }
            let items = std::iter::repeat(x.clone()).take(count as usize).collect();
            Ok(Value::List(Rc::new(PersistentList::new(items))))
        }
        _ => Err(AxError::arity(format!("repeat takes exactly 2 arguments, got {}", args.len()))),
    }
}

fn sequence_len(v: &Value) -> Option<usize> {
    match v {
        Value::List(l) => Some(l.len()),
        Value::Vector(v) => Some(v.len()),
        Value::Map(m) => Some(m.len()),
        Value::Set(s) => Some(s.len()),
        Value::Str(s) => Some(s.chars().count()),
        Value::Nil => Some(0),
        _ => None,
    }
}

fn builtin_count(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    match args {
        [x] => sequence_len(x)
            .map(|n| Value::Integer(n as i64))
            .ok_or_else(|| AxError::type_error(format!("count not supported on {}", x.type_name())).with_arg(0)),
        _ => Err(AxError::arity(format!("count takes exactly 1 argument, got {}", args.len()))),
    }
}

fn builtin_empty_q(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    match args {
        [x] => sequence_len(x)
            .map(|n| Value::Bool(n == 0))
            .ok_or_else(|| AxError::type_error(format!("empty? not supported on {}", x.type_name())).with_arg(0)),
        _ => Err(AxError::arity(format!("empty? takes exactly 1 argument, got {}", args.len()))),
    }
}

fn builtin_first(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    match args {
        [Value::Nil] => Ok(Value::Nil),
        [Value::List(l)] => Ok(l.first().cloned().unwrap_or(Value::Nil)),
        [Value::Vector(v)] => Ok(v.first().cloned().unwrap_or(Value::Nil)),
        [other] => Err(AxError::type_error(format!("first not supported on {}", other.type_name())).with_arg(0)),
        _ => Err(AxError::arity(format!("first takes exactly 1 argument, got {}", args.len()))),
    }
}

fn builtin_rest(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    match args {
        [Value::Nil] => Ok(Value::List(Rc::new(PersistentList::empty()))),
        [Value::List(l)] => Ok(Value::List(Rc::new(l.rest()))),
        [Value::Vector(v)] => {
            let rest = if v.is_empty() { Vec::new() } else { v[1..].to_vec() };
            Ok(Value::List(Rc::new(PersistentList::new(rest))))
        }
        [other] => Err(AxError::type_error(format!("rest not supported on {}", other.type_name())).with_arg(0)),
        _ => Err(AxError::arity(format!("rest takes exactly 1 argument, got {}", args.len()))),
    }
}

/// `cons` — always produces a `list`, regardless of the tail's container
/// type, matching Clojure's `cons` (as distinct from `conj`).
fn builtin_cons(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    match args {
        [head, Value::Nil] => Ok(Value::List(Rc::new(PersistentList::new(vec![head.clone()])))),
        [head, Value::List(l)] => Ok(Value::List(Rc::new(l.cons(head.clone())))),
        [head, Value::Vector(v)] => {
            let mut items = Vec::with_capacity(v.len() + 1);
            items.push(head.clone());
            items.extend(v.iter().cloned());
            Ok(Value::List(Rc::new(PersistentList::new(items))))
        }
        [_, other] => Err(AxError::type_error(format!("cons not supported on {}", other.type_name())).with_arg(1)),
        _ => Err(AxError::arity(format!("cons takes exactly 2 arguments, got {}", args.len()))),
    }
}

/// `conj` — appends to the "natural" end of the collection: front for
/// `list`, back for `vector`, member-add for `set`/`map` (a `map` pair
/// comes in as a 2-element vector, matching Clojure's `conj` on maps).
fn builtin_conj(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    match args {
        [Value::Nil, rest @ ..] => {
            let items = rest.to_vec();
            Ok(Value::List(Rc::new(PersistentList::new(items))))
        }
        [Value::List(l), rest @ ..] => {
            let mut acc = (**l).clone();
            for v in rest {
                acc = acc.cons(v.clone());
            }
            Ok(Value::List(Rc::new(acc)))
        }
        [Value::Vector(v), rest @ ..] => {
            let mut items = (**v).clone();
            items.extend(rest.iter().cloned());
            Ok(Value::Vector(Rc::new(items)))
        }
        [Value::Set(s), rest @ ..] => {
            let mut items = (**s).iter().cloned().collect::<Vec<_>>();
            items.extend(rest.iter().cloned());
            Ok(Value::Set(Rc::new(PersistentSet::new(items))))
        }
        [Value::Map(m), rest @ ..] => {
            let mut acc = (**m).clone();
            for pair in rest {
                match pair {
                    Value::Vector(kv) if kv.len() == 2 => {
                        acc = acc.assoc(kv[0].clone(), kv[1].clone());
                    }
                    other => {
                        return Err(AxError::type_error(format!(
                            "conj on a map requires [key value] pairs, got {}",
                            other.type_name()
                        )))
                    }
                }
            }
            Ok(Value::Map(Rc::new(acc)))
        }
        [other, ..] => Err(AxError::type_error(format!("conj not supported on {}", other.type_name())).with_arg(0)),
        [] => Err(AxError::arity("conj requires at least 1 argument")),
    }
}

fn builtin_get(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    match args {
        [Value::Map(m), key] => Ok(m.get(key).cloned().unwrap_or(Value::Nil)),
        [Value::Map(m), key, default] => Ok(m.get(key).cloned().unwrap_or_else(|| default.clone())),
        [Value::Vector(v), key] => {
            let idx = as_i64(key, 1)?;
            if idx < 0 {
                return Ok(Value::Nil);
            }
            Ok(v.get(idx as usize).cloned().unwrap_or(Value::Nil))
        }
        [Value::Vector(v), key, default] => {
            let idx = as_i64(key, 1)?;
            if idx < 0 {
                return Ok(default.clone());
            }
            Ok(v.get(idx as usize).cloned().unwrap_or_else(|| default.clone()))
        }
        [Value::Set(s), key] => Ok(if s.contains(key) { key.clone() } else { Value::Nil }),
        [Value::Set(s), key, default] => Ok(if s.contains(key) { key.clone() } else { default.clone() }),
        [Value::Nil, _] | [Value::Nil, _, _] => Ok(Value::Nil),
        _ => Err(AxError::arity(format!("get takes 2 or 3 arguments, got {}", args.len()))),
    }
}

fn builtin_assoc(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    match args {
        [Value::Map(m), rest @ ..] if !rest.is_empty() && rest.len() % 2 == 0 => {
            let mut acc = (**m).clone();
            for pair in rest.chunks_exact(2) {
                acc = acc.assoc(pair[0].clone(), pair[1].clone());
            }
            Ok(Value::Map(Rc::new(acc)))
        }
        [Value::Nil, rest @ ..] if !rest.is_empty() && rest.len() % 2 == 0 => {
            let mut acc = PersistentMap::empty();
            for pair in rest.chunks_exact(2) {
                acc = acc.assoc(pair[0].clone(), pair[1].clone());
            }
            Ok(Value::Map(Rc::new(acc)))
        }
        [Value::Vector(v), rest @ ..] if !rest.is_empty() && rest.len() % 2 == 0 => {
            let mut items = (**v).clone();
            for pair in rest.chunks_exact(2) {
                let idx = as_i64(&pair[0], 0)?;
                if idx < 0 || idx as usize > items.len() {
                    return Err(AxError::value(format!("assoc index {idx} out of bounds")).with_arg(0));
                }
                if idx as usize == items.len() {
                    items.push(pair[1].clone());
                } else {
                    items[idx as usize] = pair[1].clone();
                }
            }
            Ok(Value::Vector(Rc::new(items)))
        }
        [_, rest @ ..] if rest.len() % 2 != 0 => Err(AxError::arity("assoc requires an even number of key/value arguments")),
        _ => Err(AxError::arity(format!("assoc takes at least 3 arguments, got {}", args.len()))),
    }
}

fn builtin_dissoc(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    match args {
        [Value::Map(m), keys @ ..] => {
            let mut acc = (**m).clone();
            for key in keys {
                acc = acc.dissoc(key);
            }
            Ok(Value::Map(Rc::new(acc)))
        }
        [Value::Nil, ..] => Ok(Value::Nil),
        [other, ..] => Err(AxError::type_error(format!("dissoc not supported on {}", other.type_name())).with_arg(0)),
        [] => Err(AxError::arity("dissoc requires at least 1 argument")),
    }
}

fn builtin_keys(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    match args {
        [Value::Map(m)] => Ok(Value::List(Rc::new(PersistentList::new(m.keys().cloned().collect())))),
        [other] => Err(AxError::type_error(format!("keys not supported on {}", other.type_name())).with_arg(0)),
        _ => Err(AxError::arity(format!("keys takes exactly 1 argument, got {}", args.len()))),
    }
}

fn builtin_vals(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    match args {
        [Value::Map(m)] => Ok(Value::List(Rc::new(PersistentList::new(m.vals().cloned().collect())))),
        [other] => Err(AxError::type_error(format!("vals not supported on {}", other.type_name())).with_arg(0)),
        _ => Err(AxError::arity(format!("vals takes exactly 1 argument, got {}", args.len()))),
    }
}

fn builtin_contains_q(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    match args {
        [Value::Map(m), key] => Ok(Value::Bool(m.contains_key(key))),
        [Value::Set(s), key] => Ok(Value::Bool(s.contains(key))),
        [Value::Vector(v), key] => {
            let idx = as_i64(key, 1)?;
            Ok(Value::Bool(idx >= 0 && (idx as usize) < v.len()))
        }
        [Value::Nil, _] => Ok(Value::Bool(false)),
        _ => Err(AxError::arity(format!("contains? takes exactly 2 arguments, got {}", args.len()))),
    }
}

/// `reduce` — the one evaluator-dependent collection builtin: folds `f`
/// (a first-class `Value::Fn`) over a sequence the same way
/// `crate::numeric::fold` folds `+`/`*` over numbers, so user code can
/// combine the numeric tower's operators with arbitrary sequences.
fn builtin_reduce(alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    let (f, init, coll) = match args {
        [f, coll] => {
            let items = sequence_items(coll)?;
            match items.split_first() {
                None => return Ok(Value::Nil),
                Some((first, rest)) => (f, first.clone(), rest.to_vec()),
            }
        }
        [f, init, coll] => (f, init.clone(), sequence_items(coll)?),
        _ => return Err(AxError::arity(format!("reduce takes 2 or 3 arguments, got {}", args.len()))),
    };
    let mut acc = init;
    for item in coll {
        acc = crate::evaluator::invoke(alloc, f, &[acc, item])?;
    }
    Ok(acc)
}

fn sequence_items(v: &Value) -> AxResult<Vec<Value>> {
    match v {
        Value::Nil => Ok(Vec::new()),
        Value::List(l) => Ok(l.as_slice().to_vec()),
        Value::Vector(v) => Ok((**v).clone()),
        Value::Set(s) => Ok(s.iter().cloned().collect()),
        other => Err(AxError::type_error(format!("cannot sequence {}", other.type_name())).with_arg(0)),
    }
}

pub fn register(r: &mut Registry) {
    r.register(BuiltinDef {
        name: "range",
        doc: "Returns a half-open list of integers: ([end]) ([start end]) ([start end step]).",
        arglists: "([end] [start end] [start end step])",
        added: "1.0",
        func: builtin_range,
        kind: BuiltinKind::RuntimeFn,
    });
    r.register(BuiltinDef {
        name: "repeat",
        doc: "Returns a list of x repeated n times.",
        arglists: "([n x])",
        added: "1.0",
        func: builtin_repeat,
        kind: BuiltinKind::RuntimeFn,
    });
    r.register(BuiltinDef {
        name: "count",
        doc: "Returns the number of items in a collection, string, or nil (0).",
        arglists: "([coll])",
        added: "1.0",
        func: builtin_count,
        kind: BuiltinKind::RuntimeFn,
    });
    r.register(BuiltinDef {
        name: "empty?",
        doc: "Returns true if the collection has no items.",
        arglists: "([coll])",
        added: "1.0",
        func: builtin_empty_q,
        kind: BuiltinKind::RuntimeFn,
    });
    r.register(BuiltinDef {
        name: "first",
        doc: "Returns the first item of a list or vector, or nil.",
        arglists: "([coll])",
        added: "1.0",
        func: builtin_first,
        kind: BuiltinKind::RuntimeFn,
    });
    r.register(BuiltinDef {
        name: "rest",
        doc: "Returns a list of all but the first item.",
        arglists: "([coll])",
        added: "1.0",
        func: builtin_rest,
        kind: BuiltinKind::RuntimeFn,
    });
    r.register(BuiltinDef {
        name: "cons",
        doc: "Returns a new list with x prepended to coll.",
        arglists: "([x coll])",
        added: "1.0",
        func: builtin_cons,
        kind: BuiltinKind::RuntimeFn,
    });
    r.register(BuiltinDef {
        name: "conj",
        doc: "Adds items to a collection at its natural insertion point.",
        arglists: "([coll & items])",
        added: "1.0",
        func: builtin_conj,
        kind: BuiltinKind::RuntimeFn,
    });
    r.register(BuiltinDef {
        name: "get",
        doc: "Looks a key/index up in a map, vector, or set, with an optional default.",
        arglists: "([coll key] [coll key default])",
        added: "1.0",
        func: builtin_get,
        kind: BuiltinKind::RuntimeFn,
    });
    r.register(BuiltinDef {
        name: "assoc",
        doc: "Associates key/value pairs into a map or indices into a vector.",
        arglists: "([coll key val & kvs])",
        added: "1.0",
        func: builtin_assoc,
        kind: BuiltinKind::RuntimeFn,
    });
    r.register(BuiltinDef {
        name: "dissoc",
        doc: "Returns a map with the given keys removed.",
        arglists: "([map & keys])",
        added: "1.0",
        func: builtin_dissoc,
        kind: BuiltinKind::RuntimeFn,
    });
    r.register(BuiltinDef {
        name: "keys",
        doc: "Returns a list of the keys in a map.",
        arglists: "([map])",
        added: "1.0",
        func: builtin_keys,
        kind: BuiltinKind::RuntimeFn,
    });
    r.register(BuiltinDef {
        name: "vals",
        doc: "Returns a list of the values in a map.",
        arglists: "([map])",
        added: "1.0",
        func: builtin_vals,
        kind: BuiltinKind::RuntimeFn,
    });
    r.register(BuiltinDef {
        name: "contains?",
        doc: "Returns true if key is present in a map, set, or within a vector's index range.",
        arglists: "([coll key])",
        added: "1.0",
        func: builtin_contains_q,
        kind: BuiltinKind::RuntimeFn,
    });
    r.register(BuiltinDef {
        name: "reduce",
        doc: "Folds f over a collection, left to right, with an optional initial value.",
        arglists: "([f coll] [f init coll])",
        added: "1.0",
        func: builtin_reduce,
        kind: BuiltinKind::RuntimeFn,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn i(n: i64) -> Value {
        Value::Integer(n)
    }

    #[test]
    fn range_half_open() {
        let alloc = Allocator::new();
        let result = builtin_range(&alloc, &[i(3)]).unwrap();
        match result {
            Value::List(l) => assert_eq!(l.as_slice(), &[i(0), i(1), i(2)]),
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn conj_prepends_for_list_appends_for_vector() {
        let alloc = Allocator::new();
        let list = Value::List(Rc::new(PersistentList::new(vec![i(2), i(3)])));
        let result = builtin_conj(&alloc, &[list, i(1)]).unwrap();
        match result {
            Value::List(l) => assert_eq!(l.as_slice(), &[i(1), i(2), i(3)]),
            other => panic!("expected list, got {:?}", other),
        }

        let vec = Value::Vector(Rc::new(vec![i(1), i(2)]));
        let result = builtin_conj(&alloc, &[vec, i(3)]).unwrap();
        match result {
            Value::Vector(v) => assert_eq!(*v, vec![i(1), i(2), i(3)]),
            other => panic!("expected vector, got {:?}", other),
        }
    }

    #[test]
    fn assoc_and_get_roundtrip() {
        let alloc = Allocator::new();
        let map = Value::Map(Rc::new(PersistentMap::empty()));
        let map = builtin_assoc(&alloc, &[map, Value::keyword("a"), i(1)]).unwrap();
        assert_eq!(builtin_get(&alloc, &[map, Value::keyword("a")]).unwrap(), i(1));
    }

    #[test]
    fn reduce_sums_a_list() {
        let alloc = Allocator::new();
        let add_fn = Value::Fn(Rc::new(crate::core::callable::Callable::Native {
            name: "+",
            func: |_alloc, args| numeric::fold::fold_add(args),
        }));
        let list = Value::List(Rc::new(PersistentList::new(vec![i(1), i(2), i(3)])));
        assert_eq!(builtin_reduce(&alloc, &[add_fn, list]).unwrap(), i(6));
    }
}
