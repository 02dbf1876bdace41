//! `rand`, `rand-int` — pulled from the wider example pack (spec §1 names
//! the numeric tower as the in-scope concern; a small PRNG surface is the
//! kind of adjacent builtin spec §1's "builtin registry" framing expects
//! the registry to host). Process-wide generator behind a `Mutex` +
//! `OnceLock`, per SPEC_FULL.md §5 — a single cell shared across every
//! thread (and every `Runtime`), not a per-thread one, matching the
//! "the only process-wide mutable cells" framing the spec commits to.

use std::sync::{Mutex, OnceLock};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{BuiltinDef, BuiltinKind, Registry};
use crate::core::value::Value;
use crate::core::Allocator;
use crate::errors::{AxError, AxResult};

static RNG: OnceLock<Mutex<StdRng>> = OnceLock::new();

fn with_rng<R>(f: impl FnOnce(&mut StdRng) -> R) -> R {
    let rng = RNG.get_or_init(|| Mutex::new(StdRng::from_entropy()));
    let mut guard = rng.lock().unwrap_or_else(|e| e.into_inner());
    f(&mut guard)
}

fn builtin_rand(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    match args {
        [] => Ok(Value::Float(with_rng(|rng| rng.gen::<f64>()))),
        [Value::Integer(n)] => {
            if *n <= 0 {
                return Err(AxError::value("rand bound must be positive").with_arg(0));
            }
            Ok(Value::Float(with_rng(|rng| rng.gen_range(0.0..*n as f64))))
        }
        [Value::Float(f)] => {
            if *f <= 0.0 {
                return Err(AxError::value("rand bound must be positive").with_arg(0));
            }
            Ok(Value::Float(with_rng(|rng| rng.gen_range(0.0..*f))))
        }
        [other] => Err(AxError::type_error(format!("rand requires a positive number, got {}", other.type_name())).with_arg(0)),
        _ => Err(AxError::arity(format!("rand takes 0 or 1 arguments, got {}", args.len()))),
    }
}

fn builtin_rand_int(_alloc: &Allocator, args: &[Value]) -> AxResult<Value> {
    match args {
        [Value::Integer(n)] => {
            if *n <= 0 {
                return Err(AxError::value("rand-int bound must be positive").with_arg(0));
            }
            Ok(Value::Integer(with_rng(|rng| rng.gen_range(0..*n))))
        }
        [other] => Err(AxError::type_error(format!("rand-int requires an integer, got {}", other.type_name())).with_arg(0)),
        _ => Err(AxError::arity(format!("rand-int takes exactly 1 argument, got {}", args.len()))),
    }
}

pub fn register(r: &mut Registry) {
    r.register(BuiltinDef {
        name: "rand",
        doc: "Returns a random float in [0, 1), or in [0, n) if a bound is given.",
        arglists: "([] [n])",
        added: "1.0",
        func: builtin_rand,
        kind: BuiltinKind::RuntimeFn,
    });
    r.register(BuiltinDef {
        name: "rand-int",
        doc: "Returns a random integer in [0, n), a positive integer bound.",
        arglists: "([n])",
        added: "1.0",
        func: builtin_rand_int,
        kind: BuiltinKind::RuntimeFn,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rand_int_stays_in_bounds() {
        let alloc = Allocator::new();
        for _ in 0..50 {
            let v = builtin_rand_int(&alloc, &[Value::Integer(10)]).unwrap();
            match v {
                Value::Integer(n) => assert!((0..10).contains(&n)),
                other => panic!("expected integer, got {:?}", other),
            }
        }
    }

    #[test]
    fn rand_int_rejects_nonpositive_bound() {
        let alloc = Allocator::new();
        assert!(builtin_rand_int(&alloc, &[Value::Integer(0)]).is_err());
    }
}
