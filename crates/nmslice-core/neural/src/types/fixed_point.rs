// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Fixed-point numeric types
//!
//! `Accum` is a signed 16.15 value (one sign bit, 16 integer bits, 15 fractional
//! bits) used for synaptic input, ring-buffer slots and generated weights.
//! `Decay` is an unsigned 0.32 fraction in `[0, 1)` used for decay and init
//! multipliers.

use fixed::types::{I17F15, U0F32};

/// Signed 16.15 accumulator
pub type Accum = I17F15;

/// Unsigned pure fraction, `[0, 1)`
pub type Decay = U0F32;

/// Multiply an accumulator by a fractional factor.
///
/// The product is floored, so the magnitude of the result never exceeds the
/// magnitude of `value`.
///
/// # Example
/// ```
/// use nmslice_neural::{decay_mul, Accum, Decay};
///
/// let half = Decay::from_num(0.5);
/// assert_eq!(decay_mul(Accum::from_num(3), half), Accum::from_num(1.5));
/// ```
#[inline]
pub fn decay_mul(value: Accum, factor: Decay) -> Accum {
    let product = (value.to_bits() as i64 * factor.to_bits() as i64) >> 32;
    Accum::from_bits(product as i32)
}

/// What to do when adding into an accumulator overflows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Clamp at the representable extremes
    #[default]
    Saturate,
    /// Two's-complement wrap-around
    Wrap,
}

impl OverflowPolicy {
    /// Add `rhs` into `lhs` under this policy
    #[inline]
    pub fn add(self, lhs: Accum, rhs: Accum) -> Accum {
        match self {
            OverflowPolicy::Saturate => lhs.saturating_add(rhs),
            OverflowPolicy::Wrap => lhs.wrapping_add(rhs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decay_mul_zero_factor() {
        assert_eq!(decay_mul(Accum::from_num(12.5), Decay::ZERO), Accum::ZERO);
    }

    #[test]
    fn test_decay_mul_negative_value_does_not_grow() {
        let v = Accum::from_bits(-1);
        let out = decay_mul(v, Decay::from_num(0.9));
        assert!(out.abs() <= v.abs());
    }

    #[test]
    fn test_overflow_saturate() {
        let out = OverflowPolicy::Saturate.add(Accum::MAX, Accum::from_num(1));
        assert_eq!(out, Accum::MAX);
    }

    #[test]
    fn test_overflow_wrap() {
        let out = OverflowPolicy::Wrap.add(Accum::MAX, Accum::from_bits(1));
        assert_eq!(out, Accum::MIN);
    }
}
