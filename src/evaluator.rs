//! Tree-walking evaluator. Special forms are handled inline in `eval`;
//! everything else dispatches through the builtin `Registry` first, then
//! falls back to the lexical/global environment (spec §2's data-flow
//! paragraph: "the evaluator looks operators up in the registry before
//! falling back to the environment"). Grounded in the teacher's
//! `axm::runtime::Runtime::eval`/`call_value` (frame push/pop around
//! calls, a `call_depth` guard against stack overflow, closures capturing
//! a flattened snapshot of the defining environment) — generalized from
//! Axiom's AST-node dispatch to s-expression list dispatch.

use std::collections::HashMap;
use std::rc::Rc;

use crate::builtins::{self, Registry};
use crate::core::callable::Callable;
use crate::core::collections::PersistentList;
use crate::core::value::Value;
use crate::core::Allocator;
use crate::env::Env;
use crate::errors::{AxError, AxResult};
use crate::macros;

const MAX_CALL_DEPTH: usize = 1000;

pub struct Runtime {
    pub globals: HashMap<Rc<str>, Value>,
    pub registry: Registry,
    allocator: Allocator,
    call_depth: std::cell::Cell<usize>,
    max_call_depth: usize,
}

impl Runtime {
    pub fn new() -> Self {
        Runtime {
            globals: HashMap::new(),
            registry: builtins::build_registry(),
            allocator: Allocator::new(),
            call_depth: std::cell::Cell::new(0),
            max_call_depth: MAX_CALL_DEPTH,
        }
    }

    /// Builds a runtime with a caller-supplied frame limit, overriding the
    /// `max_call_depth` default (surfaced to embedders via `crate::conf`).
    pub fn with_max_call_depth(max_call_depth: usize) -> Self {
        Runtime { max_call_depth, ..Runtime::new() }
    }

    /// Evaluates every top-level form in sequence, returning the last
    /// result (or `nil` for an empty program).
    pub fn eval_all(&mut self, forms: &[Value], env: &mut Env) -> AxResult<Value> {
        let mut result = Value::Nil;
        for form in forms {
            result = self.eval(form, env)?;
        }
        Ok(result)
    }

    pub fn eval(&mut self, form: &Value, env: &mut Env) -> AxResult<Value> {
        match form {
            Value::Symbol(name) => self.lookup(name, env),
            Value::List(items) if !items.is_empty() => self.eval_list(items.as_slice(), env),
            // Self-evaluating: numbers, strings, keywords, booleans, nil,
            // the empty list, vectors/maps/sets (their elements are taken
            // literally — this Lisp has no `#()`-style literal evaluation
            // of collection contents, matching Clojure's reader semantics
            // for data given to `quote`).
            other => Ok(other.clone()),
        }
    }

    fn lookup(&self, name: &str, env: &Env) -> AxResult<Value> {
        if let Some(v) = env.get(name) {
            return Ok(v);
        }
        if let Some(v) = self.globals.get(name) {
            return Ok(v.clone());
        }
        if let Some(def) = self.registry.get(name) {
            return Ok(builtins::as_value(def));
        }
        Err(AxError::value(format!("unable to resolve symbol: {name}")))
    }

    fn eval_list(&mut self, items: &[Value], env: &mut Env) -> AxResult<Value> {
        if let Value::Symbol(head) = &items[0] {
            match head.as_ref() {
                "quote" => return self.sf_quote(items),
                "quasiquote" => return self.sf_quasiquote(items, env),
                "if" => return self.sf_if(items, env),
                "do" => return self.sf_do(items, env),
                "def" => return self.sf_def(items, env),
                "let" => return self.sf_let(items, env),
                "fn" => return self.sf_fn(items, env, None),
                "defmacro" => return self.sf_defmacro(items, env),
                _ => {}
            }
            // Macro expansion happens before the call's arguments are
            // evaluated: a macro receives its argument forms unevaluated.
            if let Some(Value::Fn(callable)) = self.globals.get(head.as_ref()).cloned() {
                if callable.is_macro() {
                    let expanded = macros::expand_once(self, &callable, &items[1..], env)?;
                    return self.eval(&expanded, env);
                }
            }
        }

        let func = self.eval(&items[0], env)?;
        let mut args = Vec::with_capacity(items.len() - 1);
        for arg in &items[1..] {
            args.push(self.eval(arg, env)?);
        }
        self.apply(&func, &args, env)
    }

    fn sf_quote(&self, items: &[Value]) -> AxResult<Value> {
        match items {
            [_, form] => Ok(form.clone()),
            _ => Err(AxError::arity("quote takes exactly 1 argument")),
        }
    }

    fn sf_quasiquote(&mut self, items: &[Value], env: &mut Env) -> AxResult<Value> {
        match items {
            [_, form] => self.quasi_expand(form, env),
            _ => Err(AxError::arity("quasiquote takes exactly 1 argument")),
        }
    }

    /// `unquote`/`unquote-splice` are only meaningful inside `quasiquote`;
    /// everything else is returned as a literal template, recursing into
    /// lists so nested `~`/`~@` forms are found.
    fn quasi_expand(&mut self, form: &Value, env: &mut Env) -> AxResult<Value> {
        match form {
            Value::List(l) if !l.is_empty() => {
                if let Value::Symbol(s) = &l.as_slice()[0] {
                    if s.as_ref() == "unquote" {
                        return self.eval(&l.as_slice()[1], env);
                    }
                }
                let mut out = Vec::new();
                for item in l.iter() {
                    if let Value::List(inner) = item {
                        if inner.len() == 2 {
                            if let Value::Symbol(s) = &inner.as_slice()[0] {
                                if s.as_ref() == "unquote-splice" {
                                    let spliced = self.eval(&inner.as_slice()[1], env)?;
                                    out.extend(sequence_to_vec(&spliced)?);
                                    continue;
                                }
                            }
                        }
                    }
                    out.push(self.quasi_expand(item, env)?);
                }
                Ok(Value::List(Rc::new(PersistentList::new(out))))
            }
            other => Ok(other.clone()),
        }
    }

    fn sf_if(&mut self, items: &[Value], env: &mut Env) -> AxResult<Value> {
        match items {
            [_, cond, then] => {
                if self.eval(cond, env)?.is_truthy() {
                    self.eval(then, env)
                } else {
                    Ok(Value::Nil)
                }
            }
            [_, cond, then, else_] => {
                if self.eval(cond, env)?.is_truthy() {
                    self.eval(then, env)
                } else {
                    self.eval(else_, env)
                }
            }
            _ => Err(AxError::arity("if takes 2 or 3 arguments")),
        }
    }

    fn sf_do(&mut self, items: &[Value], env: &mut Env) -> AxResult<Value> {
        let mut result = Value::Nil;
        for form in &items[1..] {
            result = self.eval(form, env)?;
        }
        Ok(result)
    }

    fn sf_def(&mut self, items: &[Value], env: &mut Env) -> AxResult<Value> {
        match items {
            [_, Value::Symbol(name), value] => {
                let v = self.eval(value, env)?;
                self.globals.insert(name.clone(), v.clone());
                Ok(v)
            }
            [_, Value::Symbol(name)] => {
                self.globals.insert(name.clone(), Value::Nil);
                Ok(Value::Nil)
            }
            _ => Err(AxError::arity("def takes a symbol and an optional value")),
        }
    }

    fn sf_let(&mut self, items: &[Value], env: &mut Env) -> AxResult<Value> {
        let bindings = match items.get(1) {
            Some(Value::Vector(b)) => b,
            _ => return Err(AxError::value("let requires a vector of bindings")),
        };
        if bindings.len() % 2 != 0 {
            return Err(AxError::value("let bindings must be an even number of forms"));
        }
        env.push_frame();
        let result = (|| {
            for pair in bindings.chunks_exact(2) {
                let name = match &pair[0] {
                    Value::Symbol(s) => s.clone(),
                    other => return Err(AxError::value(format!("let binding target must be a symbol, got {}", other.type_name()))),
                };
                let value = self.eval(&pair[1], env)?;
                env.define(name, value);
            }
            let mut result = Value::Nil;
            for form in &items[2..] {
                result = self.eval(form, env)?;
            }
            Ok(result)
        })();
        env.pop_frame();
        result
    }

    fn sf_fn(&mut self, items: &[Value], env: &mut Env, name: Option<Rc<str>>) -> AxResult<Value> {
        let (params_form, body_start) = match items.get(1) {
            Some(Value::Vector(_)) => (items.get(1), 2),
            Some(Value::Symbol(_)) => (items.get(2), 3), // (fn name [params] body...)
            _ => return Err(AxError::value("fn requires a parameter vector")),
        };
        let fn_name = name.or_else(|| match items.get(1) {
            Some(Value::Symbol(s)) => Some(s.clone()),
            _ => None,
        });
        let params_vec = match params_form {
            Some(Value::Vector(v)) => v,
            _ => return Err(AxError::value("fn requires a parameter vector")),
        };
        let (params, variadic) = parse_params(params_vec)?;
        let body = items[body_start..].to_vec();
        Ok(Value::Fn(Rc::new(Callable::Closure {
            name: fn_name,
            params,
            variadic,
            body,
            captured: env.snapshot(),
        })))
    }

    fn sf_defmacro(&mut self, items: &[Value], env: &mut Env) -> AxResult<Value> {
        let name = match items.get(1) {
            Some(Value::Symbol(s)) => s.clone(),
            _ => return Err(AxError::value("defmacro requires a name symbol")),
        };
        let params_vec = match items.get(2) {
            Some(Value::Vector(v)) => v,
            _ => return Err(AxError::value("defmacro requires a parameter vector")),
        };
        let (params, variadic) = parse_params(params_vec)?;
        let body = items[3..].to_vec();
        let macro_val = Value::Fn(Rc::new(Callable::Macro {
            name: name.clone(),
            params,
            variadic,
            body,
            captured: env.snapshot(),
        }));
        self.globals.insert(name, macro_val.clone());
        Ok(macro_val)
    }

    /// Dispatches a call to any first-class function value: a native
    /// builtin, or a user closure (frame push/pop around the call body,
    /// mirroring the teacher's `call_value_inner`).
    pub fn apply(&mut self, func: &Value, args: &[Value], env: &mut Env) -> AxResult<Value> {
        let depth = self.call_depth.get();
        if depth >= self.max_call_depth {
            return Err(AxError::new(
                crate::errors::AxErrorKind::InternalError,
                "call stack overflow — frame limit reached",
            ));
        }
        self.call_depth.set(depth + 1);
        let result = self.apply_inner(func, args, env);
        self.call_depth.set(depth);
        result
    }

    fn apply_inner(&mut self, func: &Value, args: &[Value], env: &mut Env) -> AxResult<Value> {
        let callable = match func {
            Value::Fn(c) => c.clone(),
            other => return Err(AxError::type_error(format!("{} is not callable", other.type_name()))),
        };
        match &*callable {
            Callable::Native { func, .. } => func(&self.allocator, args),
            Callable::Closure { params, variadic, body, captured, .. } => {
                let mut call_env = Env::from_captured(captured);
                bind_params(&mut call_env, params, variadic.clone(), args)?;
                let mut result = Value::Nil;
                for form in body {
                    result = self.eval(form, &mut call_env)?;
                }
                Ok(result)
            }
            Callable::Macro { .. } => Err(AxError::type_error("cannot call a macro as a function; use macroexpand")),
        }
    }
}

fn bind_params(env: &mut Env, params: &[Rc<str>], variadic: Option<Rc<str>>, args: &[Value]) -> AxResult<()> {
    if variadic.is_none() && args.len() != params.len() {
        return Err(AxError::arity(format!("expected {} arguments, got {}", params.len(), args.len())));
    }
    if variadic.is_some() && args.len() < params.len() {
        return Err(AxError::arity(format!("expected at least {} arguments, got {}", params.len(), args.len())));
    }
    for (p, a) in params.iter().zip(args.iter()) {
        env.define(p.clone(), a.clone());
    }
    if let Some(rest_name) = variadic {
        let rest: Vec<Value> = args[params.len()..].to_vec();
        env.define(rest_name, Value::List(Rc::new(PersistentList::new(rest))));
    }
    Ok(())
}

/// Parses a parameter vector, recognizing `& rest` for variadic params.
fn parse_params(params_vec: &[Value]) -> AxResult<(Vec<Rc<str>>, Option<Rc<str>>)> {
    let mut params = Vec::new();
    let mut variadic = None;
    let mut i = 0;
    while i < params_vec.len() {
        match &params_vec[i] {
            Value::Symbol(s) if s.as_ref() == "&" => {
                let rest_name = match params_vec.get(i + 1) {
                    Some(Value::Symbol(s)) => s.clone(),
                    _ => return Err(AxError::value("'&' must be followed by a binding symbol")),
                };
                variadic = Some(rest_name);
                i += 2;
            }
            Value::Symbol(s) => {
                params.push(s.clone());
                i += 1;
            }
            other => return Err(AxError::value(format!("parameter must be a symbol, got {}", other.type_name()))),
        }
    }
    Ok((params, variadic))
}

fn sequence_to_vec(v: &Value) -> AxResult<Vec<Value>> {
    match v {
        Value::List(l) => Ok(l.as_slice().to_vec()),
        Value::Vector(v) => Ok((**v).clone()),
        other => Err(AxError::type_error(format!("cannot splice a {}", other.type_name()))),
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Runtime::new()
    }
}

/// Invokes any first-class function value outside of a `Runtime`'s own
/// `eval` loop — the entry point `crate::builtins::collections::reduce`
/// (and any other builtin that takes a callback) uses to call back into
/// user code. Builtins only ever receive an `Allocator`, not a `Runtime`,
/// so this spins up a scratch one; closures still resolve correctly
/// since their free variables were captured at creation time.
pub fn invoke(_alloc: &Allocator, func: &Value, args: &[Value]) -> AxResult<Value> {
    let mut rt = Runtime::new();
    let mut env = Env::new();
    rt.apply(func, args, &mut env)
}
