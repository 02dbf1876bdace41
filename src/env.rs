//! Flat-stack lexical environment — directly grounded in the teacher's
//! `axm::runtime::Env`: a `Vec<HashMap<...>>` frame stack with no locks
//! and no per-scope `Arc`, rather than the older `Arc<RwLock<Scope>>`
//! chain the teacher's own docstring calls out as the slow predecessor.

use std::collections::HashMap;
use std::rc::Rc;

use crate::core::value::Value;

pub struct Env {
    frames: Vec<HashMap<Rc<str>, Value>>,
}

impl Env {
    pub fn new() -> Self {
        Env { frames: vec![HashMap::new()] }
    }

    /// A fresh environment seeded from a closure's captured bindings plus
    /// one new frame for parameters — this is how `Callable::Closure`
    /// bodies are evaluated (spec: evaluator is an external collaborator,
    /// implemented here just enough to drive builtins like `eval`).
    pub fn from_captured(captured: &HashMap<Rc<str>, Value>) -> Self {
        Env { frames: vec![captured.clone(), HashMap::new()] }
    }

    pub fn push_frame(&mut self) {
        self.frames.push(HashMap::new());
    }

    pub fn pop_frame(&mut self) {
        self.frames.pop();
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        for frame in self.frames.iter().rev() {
            if let Some(v) = frame.get(name) {
                return Some(v.clone());
            }
        }
        None
    }

    pub fn set(&mut self, name: &str, value: Value) -> bool {
        for frame in self.frames.iter_mut().rev() {
            if frame.contains_key(name) {
                frame.insert(Rc::from(name), value);
                return true;
            }
        }
        false
    }

    pub fn define(&mut self, name: Rc<str>, value: Value) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name, value);
        }
    }

    /// Flattens all visible bindings into one map — used to snapshot the
    /// enclosing scope when a closure is created (teacher:
    /// `AxCallable::UserDefined { captured, .. }`).
    pub fn snapshot(&self) -> HashMap<Rc<str>, Value> {
        let mut flat = HashMap::new();
        for frame in &self.frames {
            for (k, v) in frame {
                flat.insert(k.clone(), v.clone());
            }
        }
        flat
    }
}

impl Default for Env {
    fn default() -> Self {
        Env::new()
    }
}
