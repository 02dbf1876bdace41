pub mod callable;
pub mod collections;
pub mod value;

pub use callable::Callable;
pub use collections::{PersistentList, PersistentMap, PersistentSet};
pub use value::Value;

/// Handle passed to every builtin invocation: `func(allocator,
/// argument_slice) -> value | error`. Real allocation is delegated to
/// Rust's ownership model — values drop on every exit path, including
/// early `?` returns. This type exists so a future region/arena
/// allocator can be slotted in without touching any builtin's signature.
#[derive(Debug, Default, Clone, Copy)]
pub struct Allocator;

impl Allocator {
    pub fn new() -> Self {
        Allocator
    }
}
