//! Macro expansion. `defmacro` (handled in `crate::evaluator`) produces a
//! `Callable::Macro`; this module is where a macro call's argument forms
//! are substituted into the macro body and evaluated to produce the form
//! that actually gets evaluated in the caller's place — the same
//! call-with-unevaluated-arguments mechanism the teacher's
//! `Expr::Lambda`/`AxCallable::UserDefined` machinery uses for ordinary
//! closures, just evaluated one extra time.

use std::rc::Rc;

use crate::core::callable::Callable;
use crate::core::value::Value;
use crate::env::Env;
use crate::errors::{AxError, AxResult};
use crate::evaluator::Runtime;

/// Expands one macro call: binds `raw_args` (unevaluated) to the macro's
/// parameters and evaluates the macro body to produce a replacement
/// form, which the caller must still evaluate.
pub fn expand_once(rt: &mut Runtime, callable: &Callable, raw_args: &[Value], env: &mut Env) -> AxResult<Value> {
    let (params, variadic, body, captured) = match callable {
        Callable::Macro { params, variadic, body, captured, .. } => (params, variadic, body, captured),
        _ => return Err(AxError::type_error("expand_once called on a non-macro callable")),
    };
    if variadic.is_none() && raw_args.len() != params.len() {
        return Err(AxError::arity(format!(
            "macro expected {} arguments, got {}",
            params.len(),
            raw_args.len()
        )));
    }
    if variadic.is_some() && raw_args.len() < params.len() {
        return Err(AxError::arity(format!(
            "macro expected at least {} arguments, got {}",
            params.len(),
            raw_args.len()
        )));
    }
    let mut macro_env = Env::from_captured(captured);
    macro_env.push_frame();
    for (p, a) in params.iter().zip(raw_args.iter()) {
        macro_env.define(p.clone(), a.clone());
    }
    if let Some(rest_name) = variadic {
        let rest: Vec<Value> = raw_args[params.len()..].to_vec();
        macro_env.define(
            rest_name.clone(),
            Value::List(Rc::new(crate::core::collections::PersistentList::new(rest))),
        );
    }
    let mut result = Value::Nil;
    for form in body {
        result = rt.eval(form, &mut macro_env)?;
    }
    let _ = env; // the caller's lexical env plays no part in macro expansion itself
    Ok(result)
}

/// `macroexpand-1` — expands a single macro call one level, returning the
/// form unchanged if its head doesn't name a macro.
pub fn expand_1(rt: &mut Runtime, form: &Value, env: &mut Env) -> AxResult<Value> {
    if let Value::List(items) = form {
        if let Some(Value::Symbol(head)) = items.first() {
            if let Some(Value::Fn(callable)) = rt.globals.get(head.as_ref()).cloned() {
                if callable.is_macro() {
                    return expand_once(rt, &callable, &items.as_slice()[1..], env);
                }
            }
        }
    }
    Ok(form.clone())
}

/// `macroexpand` — repeatedly expands until the head no longer names a
/// macro.
pub fn expand_full(rt: &mut Runtime, form: &Value, env: &mut Env) -> AxResult<Value> {
    let mut current = form.clone();
    loop {
        let expanded = expand_1(rt, &current, env)?;
        if expanded == current {
            return Ok(expanded);
        }
        current = expanded;
    }
}
