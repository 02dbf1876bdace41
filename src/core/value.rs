//! Core value types for the Corelisp runtime.
//!
//! Mirrors the tagged-sum shape of the teacher's `AxValue`, generalized
//! with the numeric tower spec.md §3 requires: `Integer`/`Float` stay
//! unboxed, `BigInt`/`BigDecimal` own heap magnitudes via `dashu::IBig`.

use std::fmt;
use std::rc::Rc;

use dashu::integer::IBig;

use super::callable::Callable;
use super::collections::{PersistentList, PersistentMap, PersistentSet};
use crate::numeric::bigdecimal::BigDecimal;

#[derive(Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Integer(i64),
    Float(f64),
    BigInt(IBig),
    BigDecimal(Rc<BigDecimal>),
    Str(Rc<str>),
    Symbol(Rc<str>),
    Keyword(Rc<str>),
    List(Rc<PersistentList>),
    Vector(Rc<Vec<Value>>),
    Map(Rc<PersistentMap>),
    Set(Rc<PersistentSet>),
    Fn(Rc<Callable>),
}

impl Value {
    pub fn big_int(v: impl Into<IBig>) -> Value {
        Value::BigInt(v.into())
    }

    pub fn big_decimal(unscaled: IBig, scale: i32) -> Value {
        Value::BigDecimal(Rc::new(BigDecimal::new(unscaled, scale)))
    }

    pub fn string(s: impl Into<Rc<str>>) -> Value {
        Value::Str(s.into())
    }

    pub fn symbol(s: impl Into<Rc<str>>) -> Value {
        Value::Symbol(s.into())
    }

    pub fn keyword(s: impl Into<Rc<str>>) -> Value {
        Value::Keyword(s.into())
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn is_number(&self) -> bool {
        matches!(
            self,
            Value::Integer(_) | Value::Float(_) | Value::BigInt(_) | Value::BigDecimal(_)
        )
    }

    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::BigInt(_) => "big_int",
            Value::BigDecimal(_) => "big_decimal",
            Value::Str(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Keyword(_) => "keyword",
            Value::List(_) => "list",
            Value::Vector(_) => "vector",
            Value::Map(_) => "map",
            Value::Set(_) => "set",
            Value::Fn(_) => "function",
        }
    }

    /// Structural equality. Exact numeric tags (integer/big_int) coerce to
    /// each other by mathematical value; `float` never coerces with an
    /// exact tag, even when numerically equal (spec §9 Open Question,
    /// pinned by §8 S7: `(= 1 1.0)` is `false`). `big_decimal` compares by
    /// scale-aligned unscaled value, never through `f64`.
    pub fn structural_eq(&self, other: &Value) -> bool {
        use Value::*;
        match (self, other) {
            (Nil, Nil) => true,
            (Bool(a), Bool(b)) => a == b,
            (Str(a), Str(b)) => a == b,
            (Symbol(a), Symbol(b)) => a == b,
            (Keyword(a), Keyword(b)) => a == b,
            (Integer(a), Integer(b)) => a == b,
            (BigInt(a), BigInt(b)) => a == b,
            (Integer(a), BigInt(b)) | (BigInt(b), Integer(a)) => IBig::from(*a) == *b,
            (Float(a), Float(b)) => a == b,
            // Exact (integer/big_int) and inexact (float) values are never
            // structurally equal, even when mathematically equal (spec §9
            // Open Question, pinned down by §8 S7: `(= 1 1.0)` is `false`).
            (Float(_), Integer(_) | BigInt(_)) | (Integer(_) | BigInt(_), Float(_)) => false,
            (BigDecimal(a), BigDecimal(b)) => **a == **b,
            (List(a), List(b)) => a.eq_structural(b),
            (Vector(a), Vector(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.structural_eq(y))
            }
            (Map(a), Map(b)) => a.eq_structural(b),
            (Set(a), Set(b)) => a.eq_structural(b),
            _ => false,
        }
    }

    pub fn display(&self) -> String {
        match self {
            Value::Nil => "nil".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Integer(n) => n.to_string(),
            Value::Float(n) => format_float(*n),
            Value::BigInt(n) => format!("{n}N"),
            Value::BigDecimal(d) => format!("{d}M"),
            Value::Str(s) => format!("\"{s}\""),
            Value::Symbol(s) => s.to_string(),
            Value::Keyword(s) => format!(":{s}"),
            Value::List(l) => {
                let parts: Vec<String> = l.iter().map(|v| v.display()).collect();
                format!("({})", parts.join(" "))
            }
            Value::Vector(v) => {
                let parts: Vec<String> = v.iter().map(|v| v.display()).collect();
                format!("[{}]", parts.join(" "))
            }
            Value::Map(m) => {
                let parts: Vec<String> = m
                    .iter()
                    .map(|(k, v)| format!("{} {}", k.display(), v.display()))
                    .collect();
                format!("{{{}}}", parts.join(", "))
            }
            Value::Set(s) => {
                let parts: Vec<String> = s.iter().map(|v| v.display()).collect();
                format!("#{{{}}}", parts.join(" "))
            }
            Value::Fn(c) => format!("#<fn {}>", c.name()),
        }
    }

    /// `pr-str`/`prn`'s machine-readable representation — identical to
    /// `display`, including the quoted rendering of strings. `print`/
    /// `println`'s unquoted rendering is a separate, narrower override
    /// kept in `crate::builtins::io`, not here, since it only ever applies
    /// to the top-level argument a `print`-family builtin was handed.
    pub fn pr_str(&self) -> String {
        self.display()
    }
}

fn format_float(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity".to_string() } else { "-Infinity".to_string() }
    } else if n == n.trunc() && n.abs() < 1e18 {
        format!("{n:.1}")
    } else {
        format!("{n}")
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.structural_eq(other)
    }
}
