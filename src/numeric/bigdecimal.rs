//! Arbitrary-precision decimal: `unscaled * 10^(-scale)` (spec §3).
//!
//! `unscaled` is a `dashu::integer::IBig`; `scale` may be negative (trailing
//! zeros to the left of the decimal point). No renormalization is ever
//! performed — trailing zeros in the unscaled magnitude are preserved
//! exactly as spec §4.1 requires for multiplication.

use std::cmp::Ordering;
use std::fmt;

use dashu::base::Approximation;
use dashu::integer::IBig;

#[derive(Debug, Clone)]
pub struct BigDecimal {
    pub unscaled: IBig,
    pub scale: i32,
}

impl BigDecimal {
    pub fn new(unscaled: IBig, scale: i32) -> Self {
        BigDecimal { unscaled, scale }
    }

    pub fn from_i64(n: i64, scale: i32) -> Self {
        BigDecimal::new(IBig::from(n), scale)
    }

    fn pow10(n: u32) -> IBig {
        let mut r = IBig::from(1);
        for _ in 0..n {
            r = r * IBig::from(10);
        }
        r
    }

    /// Rescale to the given (larger-or-equal) target scale, multiplying the
    /// unscaled value by the appropriate power of ten.
    fn rescaled_to(&self, target_scale: i32) -> IBig {
        debug_assert!(target_scale >= self.scale);
        let diff = (target_scale - self.scale) as u32;
        if diff == 0 {
            self.unscaled.clone()
        } else {
            self.unscaled.clone() * Self::pow10(diff)
        }
    }

    /// Scale-aligned addition (spec §4.1 "Scale alignment").
    pub fn add(&self, other: &BigDecimal) -> BigDecimal {
        let scale = self.scale.max(other.scale);
        let a = self.rescaled_to(scale);
        let b = other.rescaled_to(scale);
        BigDecimal::new(a + b, scale)
    }

    pub fn sub(&self, other: &BigDecimal) -> BigDecimal {
        let scale = self.scale.max(other.scale);
        let a = self.rescaled_to(scale);
        let b = other.rescaled_to(scale);
        BigDecimal::new(a - b, scale)
    }

    /// No renormalization: scale is the sum of input scales, trailing
    /// zeros in the unscaled product are kept.
    pub fn mul(&self, other: &BigDecimal) -> BigDecimal {
        BigDecimal::new(self.unscaled.clone() * other.unscaled.clone(), self.scale + other.scale)
    }

    pub fn neg(&self) -> BigDecimal {
        BigDecimal::new(-self.unscaled.clone(), self.scale)
    }

    pub fn is_zero(&self) -> bool {
        self.unscaled == IBig::from(0)
    }

    /// Converts to `f64` for division/comparison fallback paths (spec's
    /// documented open question — see DESIGN.md).
    pub fn to_f64(&self) -> f64 {
        let unscaled_f = match self.unscaled.to_f64() {
            Approximation::Exact(f) => f,
            Approximation::Inexact(f, _) => f,
        };
        unscaled_f * 10f64.powi(-self.scale)
    }
}

impl PartialEq for BigDecimal {
    fn eq(&self, other: &Self) -> bool {
        let scale = self.scale.max(other.scale);
        self.rescaled_to(scale) == other.rescaled_to(scale)
    }
}
impl Eq for BigDecimal {}

impl PartialOrd for BigDecimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let scale = self.scale.max(other.scale);
        Some(self.rescaled_to(scale).cmp(&other.rescaled_to(scale)))
    }
}

impl fmt::Display for BigDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale <= 0 {
            let zeros = (-self.scale) as usize;
            write!(f, "{}{}", self.unscaled, "0".repeat(zeros))
        } else {
            let digits = self.unscaled.to_string();
            let neg = digits.starts_with('-');
            let digits_abs = if neg { &digits[1..] } else { &digits[..] };
            let scale = self.scale as usize;
            let padded = if digits_abs.len() <= scale {
                format!("{}{}", "0".repeat(scale - digits_abs.len() + 1), digits_abs)
            } else {
                digits_abs.to_string()
            };
            let split_at = padded.len() - scale;
            write!(
                f,
                "{}{}.{}",
                if neg { "-" } else { "" },
                &padded[..split_at],
                &padded[split_at..]
            )
        }
    }
}
