//! Ordered comparison (spec §4.1 "Ordered comparison"). Returns a 3-way
//! ordering; the variadic relational builtins verify the chain pairwise
//! and short-circuit on the first violation (spec §5 "Ordering").

use super::ibig_to_f64;
use crate::core::value::Value;
use crate::errors::{AxError, AxResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ordering3 {
    Lt,
    Eq,
    Gt,
}

impl Ordering3 {
    fn from_std(o: std::cmp::Ordering) -> Self {
        match o {
            std::cmp::Ordering::Less => Ordering3::Lt,
            std::cmp::Ordering::Equal => Ordering3::Eq,
            std::cmp::Ordering::Greater => Ordering3::Gt,
        }
    }

    fn from_f64(a: f64, b: f64) -> AxResult<Self> {
        a.partial_cmp(&b)
            .map(Ordering3::from_std)
            .ok_or_else(|| AxError::type_error("cannot order NaN"))
    }
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

fn as_big_int(v: &Value) -> Option<dashu::integer::IBig> {
    match v {
        Value::Integer(n) => Some(dashu::integer::IBig::from(*n)),
        Value::BigInt(n) => Some(n.clone()),
        _ => None,
    }
}

fn is_float(v: &Value) -> bool {
    matches!(v, Value::Float(_))
}

/// Binary comparator (spec §4.1). `big_decimal` comparison and any mix
/// involving `float` fall back to `f64` — the same documented precision
/// trade-off spec §9's Open Question calls out. `big_int`/`integer` pairs
/// with no `float` in sight compare exactly.
pub fn compare(a: &Value, b: &Value) -> AxResult<Ordering3> {
    match (a, b) {
        (Value::Integer(x), Value::Integer(y)) => Ok(Ordering3::from_std(x.cmp(y))),
        (Value::BigDecimal(_), _) | (_, Value::BigDecimal(_)) => {
            let fa = cast_to_f64(a, 0)?;
            let fb = cast_to_f64(b, 1)?;
            Ordering3::from_f64(fa, fb)
        }
        _ if (matches!(a, Value::BigInt(_)) || matches!(b, Value::BigInt(_)))
            && !is_float(a)
            && !is_float(b) =>
        {
            let ia = as_big_int(a).ok_or_else(|| {
                AxError::type_error(format!("cannot cast {} to a number", a.type_name())).with_arg(0)
            })?;
            let ib = as_big_int(b).ok_or_else(|| {
                AxError::type_error(format!("cannot cast {} to a number", b.type_name())).with_arg(1)
            })?;
            Ok(Ordering3::from_std(ia.cmp(&ib)))
        }
        _ => {
            let fa = cast_to_f64(a, 0)?;
            let fb = cast_to_f64(b, 1)?;
            Ordering3::from_f64(fa, fb)
        }
    }
}
