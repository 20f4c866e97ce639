//! Seeded 2-D gradient noise
//!
//! Triangular-lattice gradient noise evaluated entirely in fixed point:
//! Q10 coordinates in, Q24 scalar out, summed from three corner
//! contributions and scaled so results land in roughly [-1, 1]. The
//! generator owns its permutation table; reseeding with the same value
//! always rebuilds the same table, which is the determinism contract the
//! whole terrain system leans on.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::{NOISE_Q, SIM_Q};
use crate::fixed::Fixed;

/// Numbers 0 to 255 in a fixed pseudo-random order; the unseeded table.
const PERM_CANONICAL: [u8; 256] = [
    151, 160, 137, 91, 90, 15, 131, 13, 201, 95, 96, 53, 194, 233, 7, 225, //
    140, 36, 103, 30, 69, 142, 8, 99, 37, 240, 21, 10, 23, 190, 6, 148, //
    247, 120, 234, 75, 0, 26, 197, 62, 94, 252, 219, 203, 117, 35, 11, 32, //
    57, 177, 33, 88, 237, 149, 56, 87, 174, 20, 125, 136, 171, 168, 68, 175, //
    74, 165, 71, 134, 139, 48, 27, 166, 77, 146, 158, 231, 83, 111, 229, 122, //
    60, 211, 133, 230, 220, 105, 92, 41, 55, 46, 245, 40, 244, 102, 143, 54, //
    65, 25, 63, 161, 1, 216, 80, 73, 209, 76, 132, 187, 208, 89, 18, 169, //
    200, 196, 135, 130, 116, 188, 159, 86, 164, 100, 109, 198, 173, 186, 3, 64, //
    52, 217, 226, 250, 124, 123, 5, 202, 38, 147, 118, 126, 255, 82, 85, 212, //
    207, 206, 59, 227, 47, 16, 58, 17, 182, 189, 28, 42, 223, 183, 170, 213, //
    119, 248, 152, 2, 44, 154, 163, 70, 221, 153, 101, 155, 167, 43, 172, 9, //
    129, 22, 39, 253, 19, 98, 108, 110, 79, 113, 224, 232, 178, 185, 112, 104, //
    218, 246, 97, 228, 251, 34, 242, 193, 238, 210, 144, 12, 191, 179, 162, 241, //
    81, 51, 145, 235, 249, 14, 239, 107, 49, 192, 214, 31, 181, 199, 106, 157, //
    184, 84, 204, 176, 115, 121, 50, 45, 127, 4, 150, 254, 138, 236, 205, 93, //
    222, 114, 67, 29, 24, 72, 243, 141, 128, 195, 78, 66, 215, 61, 156, 180,
];

/// Skewing factor for 2D, (sqrt(3) - 1) / 2, at Q24.
const F2: Fixed<NOISE_Q> = Fixed::from_num(0.366025403);
/// Unskewing factor for 2D, (3 - sqrt(3)) / 6, at Q24.
const G2: Fixed<NOISE_Q> = Fixed::from_num(0.211324865);

/// Seeded gradient-noise field.
#[derive(Clone)]
pub struct SimplexNoise {
    perm: [u8; 256],
}

impl SimplexNoise {
    /// Build a field for `seed`. Seed 0 keeps the canonical table.
    pub fn new(seed: u32) -> Self {
        let mut noise = Self {
            perm: PERM_CANONICAL,
        };
        noise.reseed(seed);
        noise
    }

    /// Restore the canonical permutation, then shuffle it for a non-zero
    /// seed. Same seed, same table, same field — always.
    pub fn reseed(&mut self, seed: u32) {
        self.perm = PERM_CANONICAL;
        if seed != 0 {
            let mut rng = Pcg32::seed_from_u64(seed as u64);
            for idx in 0..self.perm.len() {
                let other = idx + rng.random_range(0..self.perm.len() - idx);
                self.perm.swap(idx, other);
            }
        }
    }

    /// Noise value at `(x, y)`, accumulated at the wider precision.
    pub fn sample(&self, x: Fixed<SIM_Q>, y: Fixed<SIM_Q>) -> Fixed<NOISE_Q> {
        // Skew the input onto the triangular grid to find the cell
        let s = ((x.raw() as i64 + y.raw() as i64) * F2.raw() as i64) >> NOISE_Q;
        let i = ((x.raw() as i64 + s) >> SIM_Q) as i32;
        let j = ((y.raw() as i64 + s) >> SIM_Q) as i32;

        // Unskew the cell origin and take the offset to the first corner
        let t = (i + j) as i64 * G2.raw() as i64;
        let x0 = Fixed::<NOISE_Q>::from_raw(
            (((x.raw() as i64) << (NOISE_Q - SIM_Q)) - ((i as i64) << NOISE_Q) + t) as i32,
        );
        let y0 = Fixed::<NOISE_Q>::from_raw(
            (((y.raw() as i64) << (NOISE_Q - SIM_Q)) - ((j as i64) << NOISE_Q) + t) as i32,
        );

        // Which of the cell's two triangles holds the point
        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - Fixed::from_int(i1) + G2;
        let y1 = y0 - Fixed::from_int(j1) + G2;
        let x2 = x0 - Fixed::ONE + 2 * G2;
        let y2 = y0 - Fixed::ONE + 2 * G2;

        let mut total = Fixed::<NOISE_Q>::ZERO;
        total += self.corner(x0, y0, self.hash(i + self.hash(j)));
        total += self.corner(x1, y1, self.hash(i + i1 + self.hash(j + j1)));
        total += self.corner(x2, y2, self.hash(i + 1 + self.hash(j + 1)));

        // Scale the summed kernel onto a unit-ish range
        70 * total
    }

    /// One corner's falloff kernel: t^4 times the gradient dot product,
    /// zero outside the corner's radius.
    fn corner(&self, x: Fixed<NOISE_Q>, y: Fixed<NOISE_Q>, hash: i32) -> Fixed<NOISE_Q> {
        let mut t = Fixed::from_num(0.5) - x * x - y * y;
        if t <= Fixed::ZERO {
            return Fixed::ZERO;
        }
        t *= t;
        let (gx, gy) = grad(hash);
        t * t * (gx * x + gy * y)
    }

    fn hash(&self, idx: i32) -> i32 {
        self.perm[(idx & 0xff) as usize] as i32
    }
}

/// Map the low bits of a hash to one of 8 axis/diagonal gradients with
/// components in {-1, 0, 1}.
fn grad(hash: i32) -> (i32, i32) {
    let h = hash & 7;
    let gx = if h & 3 != 0 {
        if h < 4 { 1 } else { -1 }
    } else {
        0
    };
    let h = (hash - 2) & 7;
    let gy = if h & 3 != 0 {
        if h < 4 { 1 } else { -1 }
    } else {
        0
    };
    (gx, gy)
}
