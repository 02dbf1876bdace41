//! `Callable` — user-defined closure, macro, or native builtin. Native
//! builtins take an `allocator` handle and return a `Result` rather than
//! a bare value; `Macro` gives `defmacro`-produced values a home in the
//! value representation alongside ordinary closures.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::value::Value;
use crate::core::Allocator;
use crate::errors::AxResult;

pub type BuiltinFn = fn(&Allocator, &[Value]) -> AxResult<Value>;

pub enum Callable {
    Closure {
        name: Option<Rc<str>>,
        params: Vec<Rc<str>>,
        variadic: Option<Rc<str>>,
        body: Vec<Value>,
        captured: HashMap<Rc<str>, Value>,
    },
    Macro {
        name: Rc<str>,
        params: Vec<Rc<str>>,
        variadic: Option<Rc<str>>,
        body: Vec<Value>,
        captured: HashMap<Rc<str>, Value>,
    },
    Native {
        name: &'static str,
        func: BuiltinFn,
    },
}

impl Callable {
    pub fn name(&self) -> &str {
        match self {
            Callable::Closure { name, .. } => name.as_deref().unwrap_or("anonymous"),
            Callable::Macro { name, .. } => name,
            Callable::Native { name, .. } => name,
        }
    }

    pub fn is_macro(&self) -> bool {
        matches!(self, Callable::Macro { .. })
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<fn {}>", self.name())
    }
}
