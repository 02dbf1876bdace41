//! Variadic-to-binary folding (spec §4.1 "Variadic folding", §8 item 3
//! "Left-associativity"). Each variadic numeric operator reduces to a
//! strictly left-associative sequence of binary operations; this module
//! is the one place that folding rule lives, so both the ordinary builtin
//! call path and (per spec §4.2's "Intrinsic dispatch") any future
//! compiler-intrinsic path can share it.

use super::{compare, Ordering3};
use crate::core::value::Value;
use crate::errors::{AxError, AxResult};

pub fn fold_add(args: &[Value]) -> AxResult<Value> {
    match args {
        [] => Ok(Value::Integer(0)),
        [x] => {
            if !x.is_number() {
                return Err(AxError::type_error(format!("cannot cast {} to a number", x.type_name())).with_arg(0));
            }
            Ok(x.clone())
        }
        [first, rest @ ..] => {
            let mut acc = first.clone();
            for v in rest {
                acc = super::add(&acc, v)?;
            }
            Ok(acc)
        }
    }
}

pub fn fold_mul(args: &[Value]) -> AxResult<Value> {
    match args {
        [] => Ok(Value::Integer(1)),
        [first, rest @ ..] => {
            let mut acc = first.clone();
            for v in rest {
                acc = super::mul(&acc, v)?;
            }
            Ok(acc)
        }
    }
}

pub fn fold_sub(args: &[Value]) -> AxResult<Value> {
    match args {
        [] => Err(AxError::arity("- requires at least 1 argument")),
        [x] => super::sub(&Value::Integer(0), x),
        [first, rest @ ..] => {
            let mut acc = first.clone();
            for v in rest {
                acc = super::sub(&acc, v)?;
            }
            Ok(acc)
        }
    }
}

pub fn fold_div(args: &[Value]) -> AxResult<Value> {
    match args {
        [] => Err(AxError::arity("/ requires at least 1 argument")),
        [x] => super::div(&Value::Integer(1), x),
        [first, rest @ ..] => {
            let mut acc = first.clone();
            for v in rest {
                acc = super::div(&acc, v)?;
            }
            Ok(acc)
        }
    }
}

/// Shared chain verifier for `<`, `>`, `<=`, `>=`: 1 arg is vacuously true;
/// otherwise every adjacent pair must satisfy `accept`, short-circuiting
/// on the first violation (spec §5 "Ordering").
pub fn fold_chain(args: &[Value], accept: impl Fn(Ordering3) -> bool) -> AxResult<Value> {
    if args.len() <= 1 {
        return Ok(Value::Bool(true));
    }
    for pair in args.windows(2) {
        let ord = compare(&pair[0], &pair[1])?;
        if !accept(ord) {
            return Ok(Value::Bool(false));
        }
    }
    Ok(Value::Bool(true))
}

/// `=` — 1 arg is always `true`; otherwise every pair (not just adjacent
/// ones) must be structurally equal.
pub fn fold_eq(args: &[Value]) -> Value {
    if args.len() <= 1 {
        return Value::Bool(true);
    }
    for i in 0..args.len() {
        for j in (i + 1)..args.len() {
            if !args[i].structural_eq(&args[j]) {
                return Value::Bool(false);
            }
        }
    }
    Value::Bool(true)
}

/// `not=` — negation of `=`.
pub fn fold_not_eq(args: &[Value]) -> Value {
    match fold_eq(args) {
        Value::Bool(b) => Value::Bool(!b),
        _ => unreachable!(),
    }
}
