//! The numeric tower: promotion lattice, binary arithmetic, division,
//! modulus/remainder, ordered comparison, and variadic folding (spec §4.1).
//! This is the hardest-engineering ~55% of the system per spec §2.

pub mod bigdecimal;
pub mod compare;
pub mod fold;
pub mod promote;

pub use bigdecimal::BigDecimal;
pub use compare::{compare, Ordering3};
pub use promote::{add, div, modulo, mul, quot, remainder, sub};

use dashu::base::Approximation;
use dashu::integer::IBig;

/// Shared `IBig -> f64` cast used by every promotion path that falls back
/// to `float` (spec §4.1 step 4, §6 "Observable numeric semantics").
pub fn ibig_to_f64(n: &IBig) -> f64 {
    match n.to_f64() {
        Approximation::Exact(f) => f,
        Approximation::Inexact(f, _) => f,
    }
}
