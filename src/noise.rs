// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Three dimensional simplex noise, after Ken Perlin's simplex noise
//! as described by Stefan Gustavson.  The permutation table is a seeded
//! shuffle, so a given seed always produces the same field.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

const F3: f64 = 1.0 / 3.0;
const G3: f64 = 1.0 / 6.0;

const GRAD3: [[f64; 3]; 12] = [
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [1.0, -1.0, 0.0],
    [-1.0, -1.0, 0.0],
    [1.0, 0.0, 1.0],
    [-1.0, 0.0, 1.0],
    [1.0, 0.0, -1.0],
    [-1.0, 0.0, -1.0],
    [0.0, 1.0, 1.0],
    [0.0, -1.0, 1.0],
    [0.0, 1.0, -1.0],
    [0.0, -1.0, -1.0],
];

/// A simplex noise field.  Values fall roughly within `[-1, 1]`.
#[derive(Clone)]
pub struct Simplex {
    seed: u64,
    perm: [u8; 512],
}

impl std::fmt::Debug for Simplex {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Simplex").field("seed", &self.seed).finish()
    }
}

// The table is a pure function of the seed.
impl PartialEq for Simplex {
    fn eq(&self, other: &Simplex) -> bool {
        self.seed == other.seed
    }
}

impl Simplex {
    /// Build the noise field for a seed.
    pub fn new(seed: u64) -> Simplex {
        let mut p: Vec<u8> = (0..=255u8).collect();
        p.shuffle(&mut StdRng::seed_from_u64(seed));
        let mut perm = [0u8; 512];
        for (i, v) in perm.iter_mut().enumerate() {
            *v = p[i & 255];
        }
        Simplex { seed, perm }
    }

    fn gradient(&self, i: usize, j: usize, k: usize) -> &[f64; 3] {
        let p = &self.perm;
        &GRAD3[p[i + p[j + p[k] as usize] as usize] as usize % 12]
    }

    /// Sample the field at a point.
    pub fn noise3(&self, x: f64, y: f64, z: f64) -> f64 {
        // Skew into simplex cell space to find which cell we are in.
        let s = (x + y + z) * F3;
        let i = (x + s).floor();
        let j = (y + s).floor();
        let k = (z + s).floor();
        let t = (i + j + k) * G3;
        let x0 = x - (i - t);
        let y0 = y - (j - t);
        let z0 = z - (k - t);

        // Which of the six tetrahedra of the cube holds the point.
        let (i1, j1, k1, i2, j2, k2) = if x0 >= y0 {
            if y0 >= z0 {
                (1, 0, 0, 1, 1, 0)
            } else if x0 >= z0 {
                (1, 0, 0, 1, 0, 1)
            } else {
                (0, 0, 1, 1, 0, 1)
            }
        } else if y0 < z0 {
            (0, 0, 1, 0, 1, 1)
        } else if x0 < z0 {
            (0, 1, 0, 0, 1, 1)
        } else {
            (0, 1, 0, 1, 1, 0)
        };

        let corners = [
            (x0, y0, z0),
            (
                x0 - i1 as f64 + G3,
                y0 - j1 as f64 + G3,
                z0 - k1 as f64 + G3,
            ),
            (
                x0 - i2 as f64 + 2.0 * G3,
                y0 - j2 as f64 + 2.0 * G3,
                z0 - k2 as f64 + 2.0 * G3,
            ),
            (x0 - 1.0 + 3.0 * G3, y0 - 1.0 + 3.0 * G3, z0 - 1.0 + 3.0 * G3),
        ];
        let offsets = [(0, 0, 0), (i1, j1, k1), (i2, j2, k2), (1, 1, 1)];

        let ii = (i as i64 & 255) as usize;
        let jj = (j as i64 & 255) as usize;
        let kk = (k as i64 & 255) as usize;

        let mut n = 0.0;
        for (&(cx, cy, cz), &(oi, oj, ok)) in corners.iter().zip(offsets.iter()) {
            let t = 0.6 - cx * cx - cy * cy - cz * cz;
            if t > 0.0 {
                let g = self.gradient(ii + oi, jj + oj, kk + ok);
                let t = t * t;
                n += t * t * (g[0] * cx + g[1] * cy + g[2] * cz);
            }
        }
        32.0 * n
    }
}

impl Default for Simplex {
    fn default() -> Simplex {
        Simplex::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_field() {
        let a = Simplex::new(7);
        let b = Simplex::new(7);
        for &(x, y, z) in &[(0.3, 1.7, 0.0), (12.5, -4.25, 0.9), (-100.1, 3.3, 7.0)] {
            assert_eq!(a.noise3(x, y, z), b.noise3(x, y, z));
        }
        assert_eq!(a, b);
    }

    #[test]
    fn noise_stays_in_range() {
        let s = Simplex::default();
        let mut seen_nonzero = false;
        for xi in 0..40 {
            for yi in 0..40 {
                let v = s.noise3(xi as f64 * 0.173, yi as f64 * 0.291, 0.5);
                assert!(v.is_finite());
                assert!(v >= -1.0 && v <= 1.0, "{} out of range", v);
                seen_nonzero |= v != 0.0;
            }
        }
        assert!(seen_nonzero);
    }

    #[test]
    fn noise_vanishes_at_the_origin() {
        for seed in 0..4 {
            assert_eq!(Simplex::new(seed).noise3(0.0, 0.0, 0.0), 0.0);
        }
    }
}
