//! Builtin registry & dispatch (spec §4.2). A `Registry` is an ordered,
//! immutable-after-registration table of `BuiltinDef`s; the evaluator
//! looks operators up here before falling back to the lexical
//! environment, exactly as spec §2's data-flow paragraph describes.

pub mod arithmetic;
pub mod collections;
pub mod comparison;
pub mod io;
pub mod meta;
pub mod predicates;
pub mod rand;

use std::collections::HashMap;

use crate::core::callable::BuiltinFn;
use crate::core::value::Value;

/// Compiler-visible marker (spec §3 BuiltinDef, §4.2 "Intrinsic dispatch").
/// `VmIntrinsic` tells a hypothetical bytecode compiler that a direct
/// opcode exists for this operator at matching arities; `func` remains a
/// mandatory fallback so the operator still works as a first-class value
/// (passed to `map`, `reduce`, etc.) — this crate has no bytecode
/// compiler, so every entry here is dispatched through `func` regardless
/// of `kind`, but the marker is preserved so a future compiler can read it
/// without changing the registry's shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinKind {
    RuntimeFn,
    VmIntrinsic,
}

#[derive(Clone)]
pub struct BuiltinDef {
    pub name: &'static str,
    pub doc: &'static str,
    pub arglists: &'static str,
    pub added: &'static str,
    pub func: BuiltinFn,
    pub kind: BuiltinKind,
}

pub struct Registry {
    order: Vec<&'static str>,
    by_name: HashMap<&'static str, BuiltinDef>,
}

impl Registry {
    fn new() -> Self {
        Registry { order: Vec::new(), by_name: HashMap::new() }
    }

    /// Panics on a duplicate name — registration happens once at process
    /// start from a fixed static table, so a duplicate is a programming
    /// error, not a runtime condition (spec §4.2 "Invariants enforced at
    /// registration").
    fn register(&mut self, def: BuiltinDef) {
        assert!(
            !self.by_name.contains_key(def.name),
            "duplicate builtin name: {}",
            def.name
        );
        assert!(!def.doc.is_empty(), "builtin {} missing documentation", def.name);
        assert!(!def.arglists.is_empty(), "builtin {} missing arglists", def.name);
        assert!(!def.added.is_empty(), "builtin {} missing version-added tag", def.name);
        self.order.push(def.name);
        self.by_name.insert(def.name, def);
    }

    pub fn get(&self, name: &str) -> Option<&BuiltinDef> {
        self.by_name.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BuiltinDef> {
        self.order.iter().map(move |n| &self.by_name[n])
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Wraps a native builtin as a first-class `Value` (spec §4.2 "the
/// operator can be used as a first-class value"), e.g. for `(map + xs)`.
pub fn as_value(def: &BuiltinDef) -> Value {
    use std::rc::Rc;
    Value::Fn(Rc::new(crate::core::callable::Callable::Native {
        name: def.name,
        func: def.func,
    }))
}

/// Builds the one, immutable-after-construction registry of builtins the
/// evaluator dispatches through. Called once at `Runtime` construction
/// (spec §9 "Compile-time tables -> runtime registry").
pub fn build_registry() -> Registry {
    let mut r = Registry::new();
    arithmetic::register(&mut r);
    comparison::register(&mut r);
    predicates::register(&mut r);
    collections::register(&mut r);
    io::register(&mut r);
    meta::register(&mut r);
    rand::register(&mut r);
    r
}
