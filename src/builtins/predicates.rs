//! Numeric predicates: `zero?`, `pos?`, `neg?`, `even?`, `odd?`,
//! `integer?`, `float?`, `number?`, `nan?`, `infinite?` (spec §5 "Numeric
//! predicates").

use dashu::integer::IBig;

use super::{BuiltinDef, BuiltinKind, Registry};
use crate::core::value::Value;
use crate::core::Allocator;
use crate::errors::{AxError, AxResult};
use crate::numeric::compare;
use crate::numeric::Ordering3;

fn one_arg<'a>(args: &'a [Value], who: &str) -> AxResult<&'a Value> {
    match args {
        [x] => Ok(x),
        _ => Err(AxError::arity(format!("{who} takes exactly 1 argument, got {}", args.len()))),
    }
}

fn builtin_zero(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    let x = one_arg(args, "zero?")?;
    Ok(Value::Bool(compare(x, &Value::Integer(0))? == Ordering3::Eq))
}

fn builtin_pos(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    let x = one_arg(args, "pos?")?;
    Ok(Value::Bool(compare(x, &Value::Integer(0))? == Ordering3::Gt))
}

fn builtin_neg(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    let x = one_arg(args, "neg?")?;
    Ok(Value::Bool(compare(x, &Value::Integer(0))? == Ordering3::Lt))
}

fn is_even_ibig(n: &IBig) -> bool {
    (n % IBig::from(2)) == IBig::from(0)
}

fn builtin_even(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    let x = one_arg(args, "even?")?;
    let even = match x {
        Value::Integer(n) => n % 2 == 0,
        Value::BigInt(n) => is_even_ibig(n),
        other => {
            return Err(AxError::type_error(format!(
                "even? requires an integer, got {}",
                other.type_name()
            ))
            .with_arg(0))
        }
    };
    Ok(Value::Bool(even))
}

fn builtin_odd(alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    match builtin_even(alloc, args)? {
        Value::Bool(b) => Ok(Value::Bool(!b)),
        _ => unreachable!(),
    }
}

fn builtin_integer_q(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    let x = one_arg(args, "integer?")?;
    Ok(Value::Bool(matches!(x, Value::Integer(_) | Value::BigInt(_))))
}

fn builtin_float_q(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    let x = one_arg(args, "float?")?;
    Ok(Value::Bool(matches!(x, Value::Float(_))))
}

fn builtin_number_q(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    let x = one_arg(args, "number?")?;
    Ok(Value::Bool(x.is_number()))
}

fn builtin_nan_q(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    let x = one_arg(args, "nan?")?;
    Ok(Value::Bool(matches!(x, Value::Float(n) if n.is_nan())))
}

fn builtin_infinite_q(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    let x = one_arg(args, "infinite?")?;
    Ok(Value::Bool(matches!(x, Value::Float(n) if n.is_infinite())))
}

pub fn register(r: &mut Registry) {
    r.register(BuiltinDef {
        name: "zero?",
        doc: "Returns true if x is numerically equal to zero.",
        arglists: "([x])",
        added: "1.0",
        func: builtin_zero,
        kind: BuiltinKind::RuntimeFn,
    });
    r.register(BuiltinDef {
        name: "pos?",
        doc: "Returns true if x is greater than zero.",
        arglists: "([x])",
        added: "1.0",
        func: builtin_pos,
        kind: BuiltinKind::RuntimeFn,
    });
    r.register(BuiltinDef {
        name: "neg?",
        doc: "Returns true if x is less than zero.",
        arglists: "([x])",
        added: "1.0",
        func: builtin_neg,
        kind: BuiltinKind::RuntimeFn,
    });
    r.register(BuiltinDef {
        name: "even?",
        doc: "Returns true if x is even. Requires an integer or big_int.",
        arglists: "([x])",
        added: "1.0",
        func: builtin_even,
        kind: BuiltinKind::RuntimeFn,
    });
    r.register(BuiltinDef {
        name: "odd?",
        doc: "Returns true if x is odd. Requires an integer or big_int.",
        arglists: "([x])",
        added: "1.0",
        func: builtin_odd,
        kind: BuiltinKind::RuntimeFn,
    });
    r.register(BuiltinDef {
        name: "integer?",
        doc: "Returns true if x is of tag integer or big_int.",
        arglists: "([x])",
        added: "1.0",
        func: builtin_integer_q,
        kind: BuiltinKind::RuntimeFn,
    });
    r.register(BuiltinDef {
        name: "float?",
        doc: "Returns true if x is of tag float.",
        arglists: "([x])",
        added: "1.0",
        func: builtin_float_q,
        kind: BuiltinKind::RuntimeFn,
    });
    r.register(BuiltinDef {
        name: "number?",
        doc: "Returns true if x is any of the four numeric tags.",
        arglists: "([x])",
        added: "1.0",
        func: builtin_number_q,
        kind: BuiltinKind::RuntimeFn,
    });
    r.register(BuiltinDef {
        name: "nan?",
        doc: "Returns true if x is a float NaN.",
        arglists: "([x])",
        added: "1.0",
        func: builtin_nan_q,
        kind: BuiltinKind::RuntimeFn,
    });
    r.register(BuiltinDef {
        name: "infinite?",
        doc: "Returns true if x is a float positive or negative infinity.",
        arglists: "([x])",
        added: "1.0",
        func: builtin_infinite_q,
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
    fn zero_pos_neg() {
        let alloc = Allocator::new();
        assert_eq!(builtin_zero(&alloc, &[i(0)]).unwrap(), Value::Bool(true));
        assert_eq!(builtin_pos(&alloc, &[i(1)]).unwrap(), Value::Bool(true));
        assert_eq!(builtin_neg(&alloc, &[i(-1)]).unwrap(), Value::Bool(true));
    }

    #[test]
    fn even_odd_big_int() {
        let alloc = Allocator::new();
        let big = Value::BigInt(IBig::from(10).pow(30));
        assert_eq!(builtin_even(&alloc, &[big]).unwrap(), Value::Bool(true));
    }

    #[test]
    fn nan_and_infinite() {
        let alloc = Allocator::new();
        assert_eq!(builtin_nan_q(&alloc, &[Value::Float(f64::NAN)]).unwrap(), Value::Bool(true));
        assert_eq!(
            builtin_infinite_q(&alloc, &[Value::Float(f64::INFINITY)]).unwrap(),
            Value::Bool(true)
        );
    }
}
