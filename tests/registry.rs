//! Registry invariants: every builtin is self-describing and dispatches
//! uniformly through the same call contract, plus property tests over
//! the promotion lattice and folding helpers (spec §4.2, §8).

use corelisp::builtins::{as_value, build_registry};
use corelisp::core::callable::Callable;
use corelisp::core::value::Value;
use corelisp::core::Allocator;
use proptest::prelude::*;

#[test]
fn every_registered_builtin_has_nonempty_metadata() {
    let registry = build_registry();
    assert!(!registry.is_empty());
    for def in registry.iter() {
        assert!(!def.name.is_empty());
        assert!(!def.doc.is_empty(), "{} is missing a docstring", def.name);
        assert!(!def.arglists.is_empty(), "{} is missing arglists", def.name);
        assert!(!def.added.is_empty(), "{} is missing a version-added tag", def.name);
    }
}

#[test]
fn registry_has_no_duplicate_names() {
    let registry = build_registry();
    let mut seen = std::collections::HashSet::new();
    for def in registry.iter() {
        assert!(seen.insert(def.name), "duplicate builtin name: {}", def.name);
    }
}

#[test]
fn as_value_wraps_every_entry_as_a_callable_native() {
    let registry = build_registry();
    for def in registry.iter() {
        match as_value(def) {
            Value::Fn(callable) => match &*callable {
                Callable::Native { name, .. } => assert_eq!(*name, def.name),
                other => panic!("{} wrapped as non-native callable: {:?}", def.name, other),
            },
            other => panic!("{} did not wrap to a Value::Fn: {:?}", def.name, other),
        }
    }
}

#[test]
fn known_arithmetic_and_collection_names_are_present() {
    let registry = build_registry();
    for name in ["+", "-", "*", "/", "mod", "rem", "quot", "=", "<", "reduce", "conj", "doc"] {
        assert!(registry.contains(name), "expected builtin '{}' to be registered", name);
    }
}

#[test]
fn unregistered_name_is_absent() {
    let registry = build_registry();
    assert!(!registry.contains("this-builtin-does-not-exist"));
}

fn call(name: &str, args: &[Value]) -> corelisp::AxResult<Value> {
    let registry = build_registry();
    let def = registry.get(name).unwrap_or_else(|| panic!("no such builtin: {}", name));
    let alloc = Allocator::new();
    (def.func)(&alloc, args)
}

proptest! {
    #[test]
    fn addition_is_commutative_over_i64_pairs(a: i64, b: i64) {
        let lhs = call("+", &[Value::Integer(a), Value::Integer(b)]).unwrap();
        let rhs = call("+", &[Value::Integer(b), Value::Integer(a)]).unwrap();
        prop_assert_eq!(lhs, rhs);
    }

    #[test]
    fn multiplication_is_commutative_over_i64_pairs(a: i64, b: i64) {
        let lhs = call("*", &[Value::Integer(a), Value::Integer(b)]).unwrap();
        let rhs = call("*", &[Value::Integer(b), Value::Integer(a)]).unwrap();
        prop_assert_eq!(lhs, rhs);
    }

    #[test]
    fn mod_result_always_shares_sign_with_nonzero_divisor(a: i64, b in any::<i64>().prop_filter("nonzero", |b| *b != 0)) {
        let result = call("mod", &[Value::Integer(a), Value::Integer(b)]).unwrap();
        if let Value::Integer(m) = result {
            if m != 0 {
                prop_assert_eq!(m.signum(), b.signum());
            }
        } else {
            prop_assert!(matches!(result, Value::Float(_)));
        }
    }

    #[test]
    fn adding_zero_is_the_identity(a: i64) {
        let result = call("+", &[Value::Integer(a), Value::Integer(0)]).unwrap();
        prop_assert_eq!(result, Value::Integer(a));
    }

    #[test]
    fn equality_is_reflexive_across_numeric_tags(a: i64) {
        let v = Value::Integer(a);
        let result = call("=", &[v.clone(), v]).unwrap();
        prop_assert_eq!(result, Value::Bool(true));
    }
}
