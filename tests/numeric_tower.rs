//! End-to-end scenario tests driving the reader and evaluator together,
//! covering the numeric-tower scenario table (S1-S8): promotion,
//! overflow fallback, sticky big_int/big_decimal results, division by
//! zero, chained comparisons, cross-tag equality, and floor-mod vs
//! truncating-remainder.

use corelisp::core::value::Value;
use corelisp::env::Env;
use corelisp::evaluator::Runtime;
use corelisp::reader;

fn eval_one(src: &str) -> Value {
    let forms = reader::read_all(src, 0).expect("parse should succeed");
    let mut rt = Runtime::new();
    let mut env = Env::new();
    rt.eval_all(&forms, &mut env).expect("eval should succeed")
}

fn eval_err(src: &str) -> corelisp::AxError {
    let forms = reader::read_all(src, 0).expect("parse should succeed");
    let mut rt = Runtime::new();
    let mut env = Env::new();
    rt.eval_all(&forms, &mut env).expect_err("eval should fail")
}

#[test]
fn s1_sum_of_three_integers() {
    assert_eq!(eval_one("(+ 1 2 3)"), Value::Integer(6));
}

#[test]
fn s2_i64_overflow_falls_back_to_float() {
    match eval_one("(+ 9223372036854775806 2)") {
        Value::Float(f) => assert!((f - 9223372036854775808.0).abs() < 1.0),
        other => panic!("expected float fallback, got {:?}", other),
    }
}

#[test]
fn s3_big_int_product_stays_big_int() {
    match eval_one("(* 100000000000000000000000000000000000000000000000000N 2)") {
        Value::BigInt(n) => {
            let expected: dashu::integer::IBig =
                "200000000000000000000000000000000000000000000000000".parse().unwrap();
            assert_eq!(n, expected);
        }
        other => panic!("expected big_int, got {:?}", other),
    }
}

#[test]
fn s4_big_decimal_scale_is_preserved() {
    match eval_one("(+ 1.5M 2.25M)") {
        Value::BigDecimal(d) => {
            assert_eq!(d.scale, 2);
            assert_eq!(d.unscaled, dashu::integer::IBig::from(375));
        }
        other => panic!("expected big_decimal, got {:?}", other),
    }
}

#[test]
fn s5_division_by_zero_is_an_arithmetic_error() {
    let err = eval_err("(/ 10 0)");
    assert_eq!(err.kind, corelisp::AxErrorKind::ArithmeticError);
    assert!(err.message.contains("Divide by zero"));
}

#[test]
fn zero_over_zero_is_nan_not_an_error() {
    match eval_one("(/ 0.0 0.0)") {
        Value::Float(f) => assert!(f.is_nan()),
        other => panic!("expected NaN float, got {:?}", other),
    }
}

#[test]
fn s6_chained_relational_operators() {
    assert_eq!(eval_one("(< 1 2 2)"), Value::Bool(false));
    assert_eq!(eval_one("(< 1 2 3)"), Value::Bool(true));
    assert_eq!(eval_one("(<= 1 2 2)"), Value::Bool(true));
}

#[test]
fn s7_cross_tag_equality_is_exact_not_mathematical() {
    assert_eq!(eval_one("(= 1 1.0)"), Value::Bool(false));
}

#[test]
fn s8_mod_is_floored_rem_is_truncated() {
    assert_eq!(eval_one("(mod -7 3)"), Value::Integer(2));
    assert_eq!(eval_one("(rem -7 3)"), Value::Integer(-1));
}

#[test]
fn promotion_lattice_orders_big_decimal_over_big_int_over_integer() {
    // an integer plus a big_int promotes to big_int...
    match eval_one("(+ 1 2N)") {
        Value::BigInt(_) => {}
        other => panic!("expected big_int, got {:?}", other),
    }
    // ...and a big_int plus a big_decimal promotes further to big_decimal.
    match eval_one("(+ 1N 2.5M)") {
        Value::BigDecimal(_) => {}
        other => panic!("expected big_decimal, got {:?}", other),
    }
}

#[test]
fn float_short_circuits_the_lattice_at_any_step() {
    match eval_one("(+ 100000000000000000000N 1.0)") {
        Value::Float(_) => {}
        other => panic!("a float operand should force a float result, got {:?}", other),
    }
}

#[test]
fn big_int_result_is_sticky_even_when_it_would_fit_in_i64() {
    // (- big_int big_int) that happens to fit in an i64 still stays big_int.
    match eval_one("(- 5000000000000000000000N 4999999999999999999999N)") {
        Value::BigInt(n) => assert_eq!(n, dashu::integer::IBig::from(1)),
        other => panic!("expected sticky big_int, got {:?}", other),
    }
}

#[test]
fn quot_truncates_toward_zero_unlike_floor_mod() {
    assert_eq!(eval_one("(quot -7 3)"), Value::Integer(-2));
    assert_eq!(eval_one("(quot 7 -3)"), Value::Integer(-2));
}

#[test]
fn user_defined_closures_compose_with_numeric_builtins() {
    let src = r#"
        (def add1 (fn [x] (+ x 1)))
        (def compose2 (fn [f x] (f (f x))))
        (compose2 add1 5)
    "#;
    assert_eq!(eval_one(src), Value::Integer(7));
}

#[test]
fn reduce_folds_a_user_closure_across_a_vector() {
    let src = r#"(reduce (fn [acc x] (+ acc x)) 0 [1 2 3 4 5])"#;
    assert_eq!(eval_one(src), Value::Integer(15));
}

#[test]
fn macro_expansion_happens_before_argument_evaluation() {
    let src = r#"
        (defmacro unless [cond then] `(if ~cond nil ~then))
        (unless false (+ 1 2))
    "#;
    assert_eq!(eval_one(src), Value::Integer(3));
}
