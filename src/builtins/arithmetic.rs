//! `+`, `-`, `*`, `/`, `mod`, `rem`, `quot`, `inc`, `dec` — the variadic
//! operators fold left over the binary numeric engine in `crate::numeric`
//! (spec §4.1 "Variadic folding").

use super::{BuiltinDef, BuiltinKind, Registry};
use crate::core::value::Value;
use crate::core::Allocator;
use crate::errors::{AxError, AxResult};
use crate::numeric;

fn arg(args: &[Value], i: usize) -> AxResult<&Value> {
    args.get(i).ok_or_else(|| AxError::arity(format!("missing argument {i}")))
}

fn builtin_add(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    numeric::fold::fold_add(args)
}

fn builtin_sub(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    numeric::fold::fold_sub(args)
}

fn builtin_mul(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    numeric::fold::fold_mul(args)
}

fn builtin_div(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    numeric::fold::fold_div(args)
}

fn builtin_mod(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    if args.len() != 2 {
        return Err(AxError::arity(format!("mod takes exactly 2 arguments, got {}", args.len())));
    }
    numeric::modulo(arg(args, 0)?, arg(args, 1)?)
}

fn builtin_rem(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    if args.len() != 2 {
        return Err(AxError::arity(format!("rem takes exactly 2 arguments, got {}", args.len())));
    }
    numeric::remainder(arg(args, 0)?, arg(args, 1)?)
}

fn builtin_quot(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    if args.len() != 2 {
        return Err(AxError::arity(format!("quot takes exactly 2 arguments, got {}", args.len())));
    }
    numeric::quot(arg(args, 0)?, arg(args, 1)?)
}

fn builtin_inc(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    if args.len() != 1 {
        return Err(AxError::arity(format!("inc takes exactly 1 argument, got {}", args.len())));
    }
    numeric::add(arg(args, 0)?, &Value::Integer(1))
}

fn builtin_dec(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    if args.len() != 1 {
        return Err(AxError::arity(format!("dec takes exactly 1 argument, got {}", args.len())));
    }
    numeric::sub(arg(args, 0)?, &Value::Integer(1))
}

fn builtin_abs(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    let v = arg(args, 0)?;
    match v {
        Value::Integer(n) => Ok(Value::Integer(n.wrapping_abs())),
        Value::Float(n) => Ok(Value::Float(n.abs())),
        Value::BigInt(n) => {
            let zero = dashu::integer::IBig::from(0);
            Ok(Value::BigInt(if *n < zero { -n.clone() } else { n.clone() }))
        }
        Value::BigDecimal(d) => {
            let zero = dashu::integer::IBig::from(0);
            if d.unscaled < zero {
                Ok(Value::BigDecimal(std::rc::Rc::new(d.neg())))
            } else {
                Ok(v.clone())
            }
        }
        other => Err(AxError::type_error(format!("cannot cast {} to a number", other.type_name())).with_arg(0)),
    }
}

fn variadic_min_max(args: &[Value], want_min: bool) -> AxResult<Value> {
    match args.split_first() {
        None => Err(AxError::arity("min/max require at least 1 argument")),
        Some((first, rest)) => {
            let mut best = first.clone();
            for v in rest {
                let ord = numeric::compare(v, &best)?;
                let replace = if want_min {
                    ord == numeric::Ordering3::Lt
                } else {
                    ord == numeric::Ordering3::Gt
                };
                if replace {
                    best = v.clone();
                }
            }
            Ok(best)
        }
    }
}

fn builtin_min(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    variadic_min_max(args, true)
}

fn builtin_max(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    variadic_min_max(args, false)
}

pub fn register(r: &mut Registry) {
    r.register(BuiltinDef {
        name: "+",
        doc: "Returns the sum of all numbers. (+) returns 0. Overflowing\
              integer addition falls back to float; big_int/big_decimal\
              inputs promote sticky.",
        arglists: "([] [x] [x y] [x y & more])",
        added: "1.0",
        func: builtin_add,
        kind: BuiltinKind::VmIntrinsic,
    });
    r.register(BuiltinDef {
        name: "-",
        doc: "Negates a single argument, or subtracts the rest from the first.",
        arglists: "([x] [x y] [x y & more])",
        added: "1.0",
        func: builtin_sub,
        kind: BuiltinKind::VmIntrinsic,
    });
    r.register(BuiltinDef {
        name: "*",
        doc: "Returns the product of all numbers. (*) returns 1.",
        arglists: "([] [x] [x y] [x y & more])",
        added: "1.0",
        func: builtin_mul,
        kind: BuiltinKind::VmIntrinsic,
    });
    r.register(BuiltinDef {
        name: "/",
        doc: "Divides the first by the rest; (/ x) returns the reciprocal.\
              Division by zero raises arithmetic_error.",
        arglists: "([x] [x y] [x y & more])",
        added: "1.0",
        func: builtin_div,
        kind: BuiltinKind::VmIntrinsic,
    });
    r.register(BuiltinDef {
        name: "mod",
        doc: "Floor modulus: result has the same sign as the divisor.",
        arglists: "([num div])",
        added: "1.0",
        func: builtin_mod,
        kind: BuiltinKind::RuntimeFn,
    });
    r.register(BuiltinDef {
        name: "rem",
        doc: "Truncating remainder: result has the same sign as the dividend.",
        arglists: "([num div])",
        added: "1.0",
        func: builtin_rem,
        kind: BuiltinKind::RuntimeFn,
    });
    r.register(BuiltinDef {
        name: "quot",
        doc: "Truncating-toward-zero integer quotient.",
        arglists: "([num div])",
        added: "1.0",
        func: builtin_quot,
        kind: BuiltinKind::RuntimeFn,
    });
    r.register(BuiltinDef {
        name: "inc",
        doc: "Returns a number one greater than x.",
        arglists: "([x])",
        added: "1.0",
        func: builtin_inc,
        kind: BuiltinKind::VmIntrinsic,
    });
    r.register(BuiltinDef {
        name: "dec",
        doc: "Returns a number one less than x.",
        arglists: "([x])",
        added: "1.0",
        func: builtin_dec,
        kind: BuiltinKind::VmIntrinsic,
    });
    r.register(BuiltinDef {
        name: "abs",
        doc: "Returns the absolute value of a number, preserving its numeric tag.",
        arglists: "([x])",
        added: "1.0",
        func: builtin_abs,
        kind: BuiltinKind::RuntimeFn,
    });
    r.register(BuiltinDef {
        name: "min",
        doc: "Returns the least of the given numbers.",
        arglists: "([x] [x y] [x y & more])",
        added: "1.0",
        func: builtin_min,
        kind: BuiltinKind::RuntimeFn,
    });
    r.register(BuiltinDef {
        name: "max",
        doc: "Returns the greatest of the given numbers.",
        arglists: "([x] [x y] [x y & more])",
        added: "1.0",
        func: builtin_max,
        kind: BuiltinKind::RuntimeFn,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::Value;
    use dashu::integer::IBig;

    fn i(n: i64) -> Value {
        Value::Integer(n)
    }

    #[test]
    fn s1_sum_of_three() {
        assert_eq!(numeric::fold::fold_add(&[i(1), i(2), i(3)]).unwrap(), i(6));
    }

    #[test]
    fn s2_overflow_falls_back_to_float() {
        let result = numeric::fold::fold_add(&[i(9223372036854775806), i(2)]).unwrap();
        match result {
            Value::Float(f) => assert_eq!(f, 9223372036854775806f64 + 2f64),
            other => panic!("expected float, got {:?}", other),
        }
    }

    #[test]
    fn s3_big_int_sticky_promotion() {
        let big = Value::BigInt(IBig::from(10).pow(50));
        let result = numeric::fold::fold_mul(&[big, i(2)]).unwrap();
        match result {
            Value::BigInt(n) => assert_eq!(n, IBig::from(10).pow(50) * IBig::from(2)),
            other => panic!("expected big_int, got {:?}", other),
        }
    }

    #[test]
    fn s4_big_decimal_scale_preserved() {
        let a = Value::big_decimal(IBig::from(15), 1);
        let b = Value::big_decimal(IBig::from(225), 2);
        let result = numeric::add(&a, &b).unwrap();
        match result {
            Value::BigDecimal(d) => {
                assert_eq!(d.scale, 2);
                assert_eq!(d.unscaled, IBig::from(375));
            }
            other => panic!("expected big_decimal, got {:?}", other),
        }
    }

    #[test]
    fn s5_divide_by_zero_errors() {
        let err = numeric::div(&i(10), &i(0)).unwrap_err();
        assert_eq!(err.kind, crate::errors::AxErrorKind::ArithmeticError);
    }

    #[test]
    fn zero_over_zero_propagates_nan_without_erroring() {
        match numeric::div(&Value::Float(0.0), &Value::Float(0.0)).unwrap() {
            Value::Float(f) => assert!(f.is_nan()),
            other => panic!("expected NaN float, got {:?}", other),
        }
    }

    #[test]
    fn nonzero_over_zero_float_still_errors() {
        let err = numeric::div(&Value::Float(1.0), &Value::Float(0.0)).unwrap_err();
        assert_eq!(err.kind, crate::errors::AxErrorKind::ArithmeticError);
    }

    #[test]
    fn s8_mod_and_rem() {
        assert_eq!(numeric::modulo(&i(-7), &i(3)).unwrap(), i(2));
        assert_eq!(numeric::remainder(&i(-7), &i(3)).unwrap(), i(-1));
    }

    #[test]
    fn identity_folds() {
        assert_eq!(numeric::fold::fold_add(&[]).unwrap(), i(0));
        assert_eq!(numeric::fold::fold_mul(&[]).unwrap(), i(1));
        assert_eq!(numeric::fold::fold_add(&[i(5)]).unwrap(), i(5));
        assert_eq!(numeric::fold::fold_sub(&[i(5)]).unwrap(), i(-5));
    }
}
