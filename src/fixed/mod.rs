//! Signed fixed-point arithmetic
//!
//! All simulation math runs on `Fixed<Q>` — an `i32` scaled by 2^Q — so a
//! run is bit-reproducible on any target, with or without an FPU. Products
//! and quotients are computed in `i64` and narrowed back afterwards, so a
//! single operation never loses precision to a premature truncation.
//!
//! Rounding and overflow policy (applies uniformly):
//! - multiplication rounds toward negative infinity (arithmetic right shift)
//! - division rounds toward zero (`i64` division)
//! - results wrap on overflow when narrowed back to `i32`
//!
//! Dividing by a zero-valued operand is a documented precondition violation
//! and panics like any Rust integer division; callers keep divisors nonzero.

pub mod math;

use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// Fixed-point scalar with `Q` fractional bits.
///
/// Different parts of the simulation pick different widths: flight state
/// uses Q=10, noise accumulation uses the wider Q=24.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Fixed<const Q: u32>(i32);

impl<const Q: u32> Fixed<Q> {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self::from_int(1);

    /// π at this precision.
    pub const PI: Self = Self::from_num(std::f64::consts::PI);

    /// Construct from a whole number.
    #[inline]
    pub const fn from_int(v: i32) -> Self {
        Self(v << Q)
    }

    /// Construct from a decimal literal, scaled at compile time.
    ///
    /// The fractional tail beyond 2^-Q truncates toward zero.
    #[inline]
    pub const fn from_num(v: f64) -> Self {
        Self((v * (1i64 << Q) as f64) as i32)
    }

    /// Reinterpret a raw scaled integer.
    #[inline]
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// The underlying scaled representation.
    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Integer part, truncating toward zero.
    #[inline]
    pub const fn to_int(self) -> i32 {
        self.0 / (1 << Q)
    }

    /// Lossless widening, for display and test comparisons.
    #[inline]
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / (1i64 << Q) as f64
    }
}

impl<const Q: u32> Default for Fixed<Q> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<const Q: u32> fmt::Debug for Fixed<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fixed<{}>({})", Q, self.to_f64())
    }
}

impl<const Q: u32> Add for Fixed<Q> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0.wrapping_add(rhs.0))
    }
}

impl<const Q: u32> Sub for Fixed<Q> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0.wrapping_sub(rhs.0))
    }
}

impl<const Q: u32> Neg for Fixed<Q> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self(self.0.wrapping_neg())
    }
}

impl<const Q: u32> Mul for Fixed<Q> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self(((self.0 as i64 * rhs.0 as i64) >> Q) as i32)
    }
}

impl<const Q: u32> Div for Fixed<Q> {
    type Output = Self;
    #[inline]
    fn div(self, rhs: Self) -> Self {
        Self((((self.0 as i64) << Q) / rhs.0 as i64) as i32)
    }
}

// Mixed integer operands: scale factors, counts and divisors stay plain
// integers so they cost one widened multiply, not a shift-and-multiply.

impl<const Q: u32> Mul<i32> for Fixed<Q> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: i32) -> Self {
        Self(self.0.wrapping_mul(rhs))
    }
}

impl<const Q: u32> Mul<Fixed<Q>> for i32 {
    type Output = Fixed<Q>;
    #[inline]
    fn mul(self, rhs: Fixed<Q>) -> Fixed<Q> {
        rhs * self
    }
}

impl<const Q: u32> Div<i32> for Fixed<Q> {
    type Output = Self;
    #[inline]
    fn div(self, rhs: i32) -> Self {
        Self(self.0 / rhs)
    }
}

impl<const Q: u32> AddAssign for Fixed<Q> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<const Q: u32> SubAssign for Fixed<Q> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<const Q: u32> MulAssign for Fixed<Q> {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    type Fx = Fixed<10>;

    #[test]
    fn constructors_agree() {
        assert_eq!(Fx::from_int(3), Fx::from_num(3.0));
        assert_eq!(Fx::from_num(1.5).raw(), 1536);
        assert_eq!(Fx::from_raw(1536).to_f64(), 1.5);
        assert_eq!(Fx::ONE.raw(), 1 << 10);
    }

    #[test]
    fn pi_per_precision() {
        assert!((Fixed::<10>::PI.to_f64() - std::f64::consts::PI).abs() < 1e-3);
        assert!((Fixed::<24>::PI.to_f64() - std::f64::consts::PI).abs() < 1e-7);
    }

    #[test]
    fn to_int_truncates_toward_zero() {
        assert_eq!(Fx::from_num(1.5).to_int(), 1);
        assert_eq!(Fx::from_num(-1.5).to_int(), -1);
        assert_eq!(Fx::from_num(-0.25).to_int(), 0);
    }

    #[test]
    fn mul_rounds_toward_negative_infinity() {
        // One raw ULP squared is below resolution: positive underflows to
        // zero, negative lands on -1 raw.
        assert_eq!((Fx::from_raw(1) * Fx::from_raw(1)).raw(), 0);
        assert_eq!((Fx::from_raw(-1) * Fx::from_raw(1)).raw(), -1);
    }

    #[test]
    fn div_rounds_toward_zero() {
        // -3 raw halved is -1.5 raw; toward zero gives -1 (floor would be -2).
        assert_eq!((Fx::from_raw(-3) / Fx::from_int(2)).raw(), -1);
        assert_eq!((Fx::from_raw(3) / Fx::from_int(2)).raw(), 1);
    }

    #[test]
    fn overflow_wraps() {
        assert_eq!(
            Fx::from_raw(i32::MAX) + Fx::from_raw(1),
            Fx::from_raw(i32::MIN)
        );
    }

    #[test]
    fn mixed_integer_operands() {
        assert_eq!(2 * Fx::PI, Fx::PI + Fx::PI);
        assert_eq!(Fx::from_int(6) / 2, Fx::from_int(3));
        assert_eq!(Fx::from_num(0.5) * 4, Fx::from_int(2));
    }

    #[test]
    fn ordering_on_raw() {
        assert!(Fx::from_num(-0.5) < Fx::ZERO);
        assert!(Fx::from_num(0.001) > Fx::ZERO);
        assert!(Fx::from_num(2.0) > Fx::from_num(1.999));
    }

    proptest! {
        #[test]
        fn add_sub_roundtrip(a in any::<i32>(), b in any::<i32>()) {
            let a = Fx::from_raw(a);
            let b = Fx::from_raw(b);
            prop_assert_eq!(a + b - b, a);
        }

        #[test]
        fn mul_by_one_is_identity(a in any::<i32>()) {
            let a = Fx::from_raw(a);
            prop_assert_eq!(a * Fx::ONE, a);
        }

        #[test]
        fn quotient_sign_never_flips(
            a in -1_000_000i32..1_000_000,
            b in (-1_000_000i32..1_000_000).prop_filter("nonzero", |v| *v != 0),
        ) {
            // Toward-zero rounding may collapse to 0 but never produces a
            // quotient with the opposite sign of a/b.
            let q = (Fx::from_raw(a) / Fx::from_raw(b)).raw();
            prop_assert!(q.signum() * (a.signum() * b.signum()) >= 0);
        }

        #[test]
        fn neg_is_involutive(a in any::<i32>()) {
            let a = Fx::from_raw(a);
            prop_assert_eq!(-(-a), a);
        }
    }
}
