//! `=`, `not=`, `<`, `>`, `<=`, `>=` — variadic relational operators,
//! each folding over `crate::numeric::fold` (spec §5 "Ordering", spec §8
//! item 3 "Left-associativity").

use super::{BuiltinDef, BuiltinKind, Registry};
use crate::core::value::Value;
use crate::core::Allocator;
use crate::errors::AxResult;
use crate::numeric::fold::{fold_chain, fold_eq, fold_not_eq};
use crate::numeric::Ordering3;

fn builtin_eq(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    Ok(fold_eq(args))
}

fn builtin_not_eq(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    Ok(fold_not_eq(args))
}

fn builtin_lt(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    fold_chain(args, |o| o == Ordering3::Lt)
}

fn builtin_gt(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    fold_chain(args, |o| o == Ordering3::Gt)
}

fn builtin_le(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    fold_chain(args, |o| o != Ordering3::Gt)
}

fn builtin_ge(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    fold_chain(args, |o| o != Ordering3::Lt)
}

pub fn register(r: &mut Registry) {
    r.register(BuiltinDef {
        name: "=",
        doc: "Returns true if every argument is structurally equal. Exact\
              numeric tags (integer/big_int) coerce to each other by value;\
              float never coerces with an exact tag, even if numerically equal.",
        arglists: "([x] [x y] [x y & more])",
        added: "1.0",
        func: builtin_eq,
        kind: BuiltinKind::VmIntrinsic,
    });
    r.register(BuiltinDef {
        name: "not=",
        doc: "Same as (not (= ...)).",
        arglists: "([x] [x y] [x y & more])",
        added: "1.0",
        func: builtin_not_eq,
        kind: BuiltinKind::RuntimeFn,
    });
    r.register(BuiltinDef {
        name: "<",
        doc: "Returns true if the numbers are in strictly increasing order.",
        arglists: "([x] [x y] [x y & more])",
        added: "1.0",
        func: builtin_lt,
        kind: BuiltinKind::VmIntrinsic,
    });
    r.register(BuiltinDef {
        name: ">",
        doc: "Returns true if the numbers are in strictly decreasing order.",
        arglists: "([x] [x y] [x y & more])",
        added: "1.0",
        func: builtin_gt,
        kind: BuiltinKind::VmIntrinsic,
    });
    r.register(BuiltinDef {
        name: "<=",
        doc: "Returns true if the numbers are in non-decreasing order.",
        arglists: "([x] [x y] [x y & more])",
        added: "1.0",
        func: builtin_le,
        kind: BuiltinKind::VmIntrinsic,
    });
    r.register(BuiltinDef {
        name: ">=",
        doc: "Returns true if the numbers are in non-increasing order.",
        arglists: "([x] [x y] [x y & more])",
        added: "1.0",
        func: builtin_ge,
        kind: BuiltinKind::VmIntrinsic,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashu::integer::IBig;

    fn i(n: i64) -> Value {
        Value::Integer(n)
    }

    #[test]
    fn chain_short_circuits() {
        assert_eq!(fold_chain(&[i(1), i(2), i(1)], |o| o == Ordering3::Lt).unwrap(), Value::Bool(false));
        assert_eq!(fold_chain(&[i(1), i(2), i(3)], |o| o == Ordering3::Lt).unwrap(), Value::Bool(true));
    }

    #[test]
    fn eq_is_all_pairs_not_just_adjacent() {
        assert_eq!(fold_eq(&[i(1), i(1), i(2)]), Value::Bool(false));
        assert_eq!(fold_eq(&[i(1), i(1), i(1)]), Value::Bool(true));
    }

    #[test]
    fn eq_crosses_numeric_tags_exactly() {
        let a = Value::BigInt(IBig::from(7));
        assert_eq!(fold_eq(&[a, i(7)]), Value::Bool(true));
    }

    #[test]
    fn single_arg_chains_are_vacuously_true() {
        assert_eq!(fold_chain(&[i(5)], |o| o == Ordering3::Lt).unwrap(), Value::Bool(true));
        assert_eq!(fold_eq(&[i(5)]), Value::Bool(true));
    }
}
