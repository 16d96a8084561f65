//! Accumulated-work weights.
//!
//! Weights are arbitrary-precision so that sums over long chains never
//! overflow. Conversions to and from `f64` exist only for the sampling
//! math; every comparison that decides acceptance is done on integers.

use num_bigint::BigUint;
use num_traits::{FromPrimitive, ToPrimitive, Zero};

/// Weight of a leaf or subtree.
pub type Weight = BigUint;

/// Convert to the nearest `f64` (`+inf` only beyond `f64::MAX`).
pub fn weight_to_f64(w: &Weight) -> f64 {
    w.to_f64().unwrap_or(f64::INFINITY)
}

/// Truncate a float toward zero; negative, NaN and infinite inputs give zero.
pub fn weight_from_f64(v: f64) -> Weight {
    if !v.is_finite() || v <= 0.0 {
        return Weight::zero();
    }
    BigUint::from_f64(v.trunc()).unwrap_or_default()
}
