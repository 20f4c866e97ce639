//! Transcendental approximations over [`Fixed`]
//!
//! Polynomial sin/cos and a four-quadrant rational atan2, accurate to a few
//! milliradians at Q10 — plenty below the simulation's own quantization.
//! Everything here is total except the documented preconditions: `tan` near
//! a cosine zero and `atan2(0, 0)` divide by a zero-valued operand.

use super::Fixed;

/// Magnitude of `v`.
#[inline]
pub fn abs<const Q: u32>(v: Fixed<Q>) -> Fixed<Q> {
    if v < Fixed::ZERO { -v } else { v }
}

/// -1, 0 or +1.
#[inline]
pub fn sign<const Q: u32>(v: Fixed<Q>) -> i32 {
    (v > Fixed::ZERO) as i32 - (v < Fixed::ZERO) as i32
}

/// Largest integer not above `v` (arithmetic shift, rounds toward -∞).
#[inline]
pub fn floor<const Q: u32>(v: Fixed<Q>) -> i32 {
    v.raw() >> Q
}

/// Sine of an angle in radians.
///
/// The angle is reduced into [-π, π], mirrored into [-π/2, π/2], then
/// approximated piecewise: an odd sine polynomial near zero and a shifted
/// even cosine polynomial beyond the blend point. The split buys most of
/// its accuracy near ±90°, where the flight model spends the launch phase.
pub fn sin<const Q: u32>(radians: Fixed<Q>) -> Fixed<Q> {
    let pi = Fixed::<Q>::PI;
    let two_pi = 2 * pi;
    let mut radians = radians;

    let angle = radians + pi / 2;
    if two_pi <= angle {
        radians -= two_pi * (angle / two_pi).to_int();
    } else if angle < Fixed::ZERO {
        radians += two_pi * (1 - (angle / two_pi).to_int());
    }

    // Mirror angles beyond 90 degrees
    if pi / 2 < radians {
        radians = pi - radians;
    }

    // Blend point between the two approximations
    let limit = Fixed::<Q>::from_num(52.65 * std::f64::consts::PI / 180.0);
    let c2 = Fixed::<Q>::from_num(0.5);
    let c4 = Fixed::<Q>::from_num(0.041672);

    if limit <= radians {
        radians -= pi / 2;
        let sq = radians * radians;
        return Fixed::ONE - sq * (c2 - sq * c4);
    } else if radians <= -limit {
        radians += pi / 2;
        let sq = radians * radians;
        return sq * (c2 - sq * c4) - Fixed::ONE;
    }

    let s3 = Fixed::<Q>::from_num(0.166_671_8);
    let s5 = Fixed::<Q>::from_num(0.008_331_3);
    let sq = radians * radians;
    radians * (Fixed::ONE - sq * (s3 - sq * s5))
}

/// Cosine of an angle in radians.
#[inline]
pub fn cos<const Q: u32>(radians: Fixed<Q>) -> Fixed<Q> {
    sin(radians + Fixed::<Q>::PI / 2)
}

/// Tangent. Precondition: `cos(radians)` is not zero at this precision.
#[inline]
pub fn tan<const Q: u32>(radians: Fixed<Q>) -> Fixed<Q> {
    sin(radians) / cos(radians)
}

/// Four-quadrant arctangent with the standard sign convention: result in
/// (-π, π], zero for `y = 0, x > 0`. Precondition: `x` and `y` not both zero.
pub fn atan2<const Q: u32>(y: Fixed<Q>, x: Fixed<Q>) -> Fixed<Q> {
    let pi = Fixed::<Q>::PI;
    let a = Fixed::<Q>::from_num(0.19629);
    let b = Fixed::<Q>::from_num(0.98169);
    let abs_y = abs(y);

    let angle = if x >= Fixed::ZERO {
        let r = (x - abs_y) / (abs_y + x);
        (a * r * r - b) * r + pi / 4
    } else {
        let r = (x + abs_y) / (abs_y - x);
        (a * r * r - b) * r + 3 * pi / 4
    };

    if y < Fixed::ZERO { -angle } else { angle }
}

/// Wrap an angle into [0, 2π).
pub fn wrap_angle<const Q: u32>(angle: Fixed<Q>) -> Fixed<Q> {
    let two_pi = 2 * Fixed::<Q>::PI;
    if angle >= two_pi {
        angle - (angle / two_pi).to_int() * two_pi
    } else if angle < Fixed::ZERO {
        angle + (1 - (angle / two_pi).to_int()) * two_pi
    } else {
        angle
    }
}
