//! Binary arithmetic with promotion (spec §4.1). Every function here takes
//! exactly two already-evaluated numeric `Value`s and returns a freshly
//! constructed result; inputs are never mutated (spec §3 lifecycle).

use dashu::integer::IBig;

use super::bigdecimal::BigDecimal;
use super::ibig_to_f64;
use crate::core::value::Value;
use crate::errors::{AxError, AxResult};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Op {
    Add,
    Sub,
    Mul,
}

fn cast_to_f64(v: &Value, arg_index: usize) -> AxResult<f64> {
    match v {
        Value::Integer(n) => Ok(*n as f64),
        Value::Float(n) => Ok(*n),
        Value::BigInt(n) => Ok(ibig_to_f64(n)),
        Value::BigDecimal(d) => Ok(d.to_f64()),
        other => Err(AxError::type_error(format!(
            "cannot cast {} to a number",
            other.type_name()
        ))
        .with_arg(arg_index)),
    }
}

fn as_big_int(v: &Value) -> Option<IBig> {
    match v {
        Value::Integer(n) => Some(IBig::from(*n)),
        Value::BigInt(n) => Some(n.clone()),
        _ => None,
    }
}

fn as_big_decimal(v: &Value) -> Option<BigDecimal> {
    match v {
        Value::Integer(n) => Some(BigDecimal::from_i64(*n, 0)),
        Value::BigInt(n) => Some(BigDecimal::new(n.clone(), 0)),
        Value::BigDecimal(d) => Some((**d).clone()),
        _ => None,
    }
}

fn is_float(v: &Value) -> bool {
    matches!(v, Value::Float(_))
}

fn is_big_decimal(v: &Value) -> bool {
    matches!(v, Value::BigDecimal(_))
}

fn is_big_int(v: &Value) -> bool {
    matches!(v, Value::BigInt(_))
}

fn binary(op: Op, a: &Value, b: &Value) -> AxResult<Value> {
    // Step 1: either side is big_decimal.
    if is_big_decimal(a) || is_big_decimal(b) {
        if is_float(a) || is_float(b) {
            let fa = cast_to_f64(a, 0)?;
            let fb = cast_to_f64(b, 1)?;
            return Ok(Value::Float(apply_f64(op, fa, fb)));
        }
        let da = as_big_decimal(a).ok_or_else(|| {
            AxError::type_error(format!("cannot cast {} to a number", a.type_name())).with_arg(0)
        })?;
        let db = as_big_decimal(b).ok_or_else(|| {
            AxError::type_error(format!("cannot cast {} to a number", b.type_name())).with_arg(1)
        })?;
        let result = match op {
            Op::Add => da.add(&db),
            Op::Sub => da.sub(&db),
            Op::Mul => da.mul(&db),
        };
        return Ok(Value::BigDecimal(std::rc::Rc::new(result)));
    }

    // Step 2: either side is big_int (and neither is big_decimal).
    if is_big_int(a) || is_big_int(b) {
        if is_float(a) || is_float(b) {
            let fa = cast_to_f64(a, 0)?;
            let fb = cast_to_f64(b, 1)?;
            return Ok(Value::Float(apply_f64(op, fa, fb)));
        }
        let ia = as_big_int(a).ok_or_else(|| {
            AxError::type_error(format!("cannot cast {} to a number", a.type_name())).with_arg(0)
        })?;
        let ib = as_big_int(b).ok_or_else(|| {
            AxError::type_error(format!("cannot cast {} to a number", b.type_name())).with_arg(1)
        })?;
        let result = match op {
            Op::Add => ia + ib,
            Op::Sub => ia - ib,
            Op::Mul => ia * ib,
        };
        // Sticky promotion: never demoted back to `integer` even if it fits.
        return Ok(Value::BigInt(result));
    }

    // Step 3: both sides are `integer` — try fixed-width op, fall back to
    // float on overflow (Clojure `+`/`-`/`*` semantics: no auto-promote).
    if let (Value::Integer(x), Value::Integer(y)) = (a, b) {
        let checked = match op {
            Op::Add => x.checked_add(*y),
            Op::Sub => x.checked_sub(*y),
            Op::Mul => x.checked_mul(*y),
        };
        return Ok(match checked {
            Some(r) => Value::Integer(r),
            None => Value::Float(apply_f64(op, *x as f64, *y as f64)),
        });
    }

    // Step 4: otherwise, cast both sides to float.
    let fa = cast_to_f64(a, 0)?;
    let fb = cast_to_f64(b, 1)?;
    Ok(Value::Float(apply_f64(op, fa, fb)))
}

fn apply_f64(op: Op, a: f64, b: f64) -> f64 {
    match op {
        Op::Add => a + b,
        Op::Sub => a - b,
        Op::Mul => a * b,
    }
}

pub fn add(a: &Value, b: &Value) -> AxResult<Value> {
    binary(Op::Add, a, b)
}

pub fn sub(a: &Value, b: &Value) -> AxResult<Value> {
    binary(Op::Sub, a, b)
}

pub fn mul(a: &Value, b: &Value) -> AxResult<Value> {
    binary(Op::Mul, a, b)
}

fn is_zero(v: &Value) -> bool {
    match v {
        Value::Integer(n) => *n == 0,
        Value::BigInt(n) => *n == IBig::from(0),
        Value::BigDecimal(d) => d.is_zero(),
        Value::Float(n) => *n == 0.0,
        _ => false,
    }
}

/// `/` — division (spec §4.1 "Division").
pub fn div(a: &Value, b: &Value) -> AxResult<Value> {
    // NaN propagates without erroring (spec: "NaN inputs propagate"). This
    // covers both a literal NaN operand (`(/ x NaN)`) and a NaN *produced*
    // by the division itself (`(/ 0.0 0.0)`) — spec §6/§8 item 8 scopes the
    // divide-by-zero error to "every numeric tag combination not involving
    // NaN", and `0.0 / 0.0` is exactly such a combination.
    let either_float_nan = matches!(a, Value::Float(n) if n.is_nan()) || matches!(b, Value::Float(n) if n.is_nan());
    if either_float_nan {
        let fa = cast_to_f64(a, 0)?;
        let fb = cast_to_f64(b, 1)?;
        return Ok(Value::Float(fa / fb));
    }

    if is_big_decimal(a) || is_big_decimal(b) {
        let fa = cast_to_f64(a, 0)?;
        let fb = cast_to_f64(b, 1)?;
        let result = fa / fb;
        if is_zero(b) && !result.is_nan() {
            return Err(AxError::divide_by_zero());
        }
        return Ok(Value::Float(result));
    }

    if is_big_int(a) || is_big_int(b) {
        if is_float(a) || is_float(b) {
            let fa = cast_to_f64(a, 0)?;
            let fb = cast_to_f64(b, 1)?;
            return Ok(Value::Float(fa / fb));
        }
        if is_zero(b) {
            return Err(AxError::divide_by_zero());
        }
        let ia = as_big_int(a).unwrap();
        let ib = as_big_int(b).unwrap();
        return Ok(Value::BigInt(ia / ib)); // truncating integer division
    }

    let fa = cast_to_f64(a, 0)?;
    let fb = cast_to_f64(b, 1)?;
    let result = fa / fb;
    if is_zero(b) && !result.is_nan() {
        return Err(AxError::divide_by_zero());
    }
    Ok(Value::Float(result))
}

/// `mod` — floor-mod (truncating toward negative infinity).
pub fn modulo(a: &Value, b: &Value) -> AxResult<Value> {
    if is_zero(b) {
        return Err(AxError::divide_by_zero());
    }
    if let (Value::Integer(x), Value::Integer(y)) = (a, b) {
        // `i64::MIN % -1` overflows in a checked division, same as
        // `i64::MIN / -1` — fall back to float rather than panic, mirroring
        // `+`/`-`/`*`'s overflow-to-float behavior.
        return Ok(match x.checked_rem(*y) {
            Some(r) => {
                let result = if r != 0 && (r < 0) != (*y < 0) { r + y } else { r };
                Value::Integer(result)
            }
            None => Value::Float(floor_mod_f64(*x as f64, *y as f64)),
        });
    }
    if is_big_int(a) || is_big_int(b) {
        if is_float(a) || is_float(b) {
            let fa = cast_to_f64(a, 0)?;
            let fb = cast_to_f64(b, 1)?;
            return Ok(Value::Float(floor_mod_f64(fa, fb)));
        }
        let ia = as_big_int(a).unwrap();
        let ib = as_big_int(b).unwrap();
        let r = ia.clone() % ib.clone();
        let zero = IBig::from(0);
        let result = if r != zero && (r < zero) != (ib < zero) { r + ib } else { r };
        return Ok(Value::BigInt(result));
    }
    let fa = cast_to_f64(a, 0)?;
    let fb = cast_to_f64(b, 1)?;
    Ok(Value::Float(floor_mod_f64(fa, fb)))
}

fn floor_mod_f64(a: f64, b: f64) -> f64 {
    a - b * (a / b).floor()
}

/// `rem` — truncating-toward-zero remainder.
pub fn remainder(a: &Value, b: &Value) -> AxResult<Value> {
    if is_zero(b) {
        return Err(AxError::divide_by_zero());
    }
    if let (Value::Integer(x), Value::Integer(y)) = (a, b) {
        return Ok(match x.checked_rem(*y) {
            Some(r) => Value::Integer(r),
            None => Value::Float((*x as f64) % (*y as f64)),
        });
    }
    if is_big_int(a) || is_big_int(b) {
        if is_float(a) || is_float(b) {
            let fa = cast_to_f64(a, 0)?;
            let fb = cast_to_f64(b, 1)?;
            return Ok(Value::Float(fa % fb));
        }
        let ia = as_big_int(a).unwrap();
        let ib = as_big_int(b).unwrap();
        return Ok(Value::BigInt(ia % ib));
    }
    let fa = cast_to_f64(a, 0)?;
    let fb = cast_to_f64(b, 1)?;
    Ok(Value::Float(fa % fb))
}

/// `quot` — truncating-toward-zero division, following the same
/// promotion lattice as `/` but never widening to `float` for an exact
/// divisor pair (mirrors Clojure's `quot` returning an exact result for
/// exact inputs).
pub fn quot(a: &Value, b: &Value) -> AxResult<Value> {
    if is_zero(b) {
        return Err(AxError::divide_by_zero());
    }
    if let (Value::Integer(x), Value::Integer(y)) = (a, b) {
        return Ok(match x.checked_div(*y) {
            Some(q) => Value::Integer(q),
            None => Value::Float(((*x as f64) / (*y as f64)).trunc()),
        });
    }
    if is_big_decimal(a) || is_big_decimal(b) {
        let fa = cast_to_f64(a, 0)?;
        let fb = cast_to_f64(b, 1)?;
        return Ok(Value::Float((fa / fb).trunc()));
    }
    if is_big_int(a) || is_big_int(b) {
        if is_float(a) || is_float(b) {
            let fa = cast_to_f64(a, 0)?;
            let fb = cast_to_f64(b, 1)?;
            return Ok(Value::Float((fa / fb).trunc()));
        }
        let ia = as_big_int(a).unwrap();
        let ib = as_big_int(b).unwrap();
        return Ok(Value::BigInt(ia / ib));
    }
    let fa = cast_to_f64(a, 0)?;
    let fb = cast_to_f64(b, 1)?;
    Ok(Value::Float((fa / fb).trunc()))
}
