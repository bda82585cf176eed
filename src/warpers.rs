// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Warpers distort pixel coordinates before they are mapped onto the
//! complex plane.  A warped coordinate may land outside the frame; the
//! mapping extends past the plane's bounds, so that is fine.

use crate::errors::{invalid, Result};
use crate::noise::Simplex;
use std::f64::consts::PI;

/// A coordinate warp together with its geometric constants.
#[derive(Clone, Debug, PartialEq)]
pub enum Warper {
    /// Leaves every coordinate alone.
    Identity,
    /// Pushes each point `offset` pixels in a direction taken from a
    /// noise field sampled at `(x * scale, y * scale, z)`.
    Simplex {
        /// The noise field.
        noise: Simplex,
        /// The third noise coordinate; animate this for a boiling effect.
        z: f64,
        /// Spatial frequency of the noise.
        scale: f64,
        /// How far each point moves.
        offset: f64,
    },
    /// A fisheye lens centered on `(cx, cy)`.
    Fisheye {
        /// Lens center, x.
        cx: f64,
        /// Lens center, y.
        cy: f64,
        /// Distance at which the lens neither magnifies nor shrinks.
        radius: f64,
    },
    /// A swirl whose rotation grows with the square of the distance
    /// from `(cx, cy)`.
    Swirl {
        /// Swirl center, x.
        cx: f64,
        /// Swirl center, y.
        cy: f64,
        /// Distance at which points are rotated one radian.
        radius: f64,
    },
    /// Concentric waves moving points toward and away from `(cx, cy)`.
    Ripple {
        /// Ripple center, x.
        cx: f64,
        /// Ripple center, y.
        cy: f64,
        /// Distance between wave crests.
        wavelength: f64,
        /// Amplitude of the displacement.
        offset: f64,
        /// Phase of the wave, in radians.
        phase: f64,
    },
}

impl Default for Warper {
    fn default() -> Warper {
        Warper::Identity
    }
}

fn positive(name: &'static str, v: f64) -> Result<f64> {
    if v.is_finite() && v > 0.0 {
        Ok(v)
    } else {
        Err(invalid(name, format!("{} must be a positive number", v)))
    }
}

impl Warper {
    /// The warper that does not warp.
    pub fn identity() -> Warper {
        Warper::Identity
    }

    /// Noise displacement using the default noise field.
    pub fn simplex(z: f64, scale: f64, offset: f64) -> Warper {
        Warper::simplex_seeded(0, z, scale, offset)
    }

    /// Noise displacement using the noise field for `seed`.
    pub fn simplex_seeded(seed: u64, z: f64, scale: f64, offset: f64) -> Warper {
        Warper::Simplex {
            noise: Simplex::new(seed),
            z,
            scale,
            offset,
        }
    }

    /// A fisheye lens.
    pub fn fisheye(cx: f64, cy: f64, radius: f64) -> Result<Warper> {
        Ok(Warper::Fisheye {
            cx,
            cy,
            radius: positive("radius", radius)?,
        })
    }

    /// A swirl.
    pub fn swirl(cx: f64, cy: f64, radius: f64) -> Result<Warper> {
        Ok(Warper::Swirl {
            cx,
            cy,
            radius: positive("radius", radius)?,
        })
    }

    /// A ripple.
    pub fn ripple(cx: f64, cy: f64, wavelength: f64, offset: f64, phase: f64) -> Result<Warper> {
        Ok(Warper::Ripple {
            cx,
            cy,
            wavelength: positive("wavelength", wavelength)?,
            offset,
            phase,
        })
    }

    /// Where the pixel at `(x, y)` samples from.
    pub fn warp(&self, x: f64, y: f64) -> (f64, f64) {
        match *self {
            Warper::Identity => (x, y),
            Warper::Simplex {
                ref noise,
                z,
                scale,
                offset,
            } => {
                let a = noise.noise3(x * scale, y * scale, z) * 2.0 * PI;
                (x + a.cos() * offset, y + a.sin() * offset)
            }
            Warper::Fisheye { cx, cy, radius } => {
                let (dx, dy) = (x - cx, y - cy);
                let dist = dx.hypot(dy);
                if dist == 0.0 {
                    return (cx, cy);
                }
                let d = 2.0 / (radius / dist + 1.0);
                (cx + dx * d, cy + dy * d)
            }
            Warper::Swirl { cx, cy, radius } => {
                let (dx, dy) = (x - cx, y - cy);
                let r = dx.hypot(dy) / radius;
                let (sin, cos) = (r * r).sin_cos();
                (cx + dx * cos - dy * sin, cy + dy * cos + dx * sin)
            }
            Warper::Ripple {
                cx,
                cy,
                wavelength,
                offset,
                phase,
            } => {
                let (dx, dy) = (x - cx, y - cy);
                let dist = dx.hypot(dy);
                if dist == 0.0 {
                    return (x, y);
                }
                let push = offset * (2.0 * PI * dist / wavelength + phase).sin();
                (x + dx / dist * push, y + dy / dist * push)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
    }

    #[test]
    fn identity_changes_nothing() {
        let w = Warper::identity();
        for &(x, y) in &[(0.0, 0.0), (12.5, 400.0), (-3.0, 1e6)] {
            assert_eq!(w.warp(x, y), (x, y));
        }
    }

    #[test]
    fn lenses_leave_their_center_alone() {
        let warpers = [
            Warper::fisheye(50.0, 40.0, 25.0).unwrap(),
            Warper::swirl(50.0, 40.0, 25.0).unwrap(),
            Warper::ripple(50.0, 40.0, 10.0, 3.0, 1.0).unwrap(),
        ];
        for w in warpers.iter() {
            let (x, y) = w.warp(50.0, 40.0);
            assert!(x.is_finite() && y.is_finite());
            assert_eq!((x, y), (50.0, 40.0), "{:?}", w);
        }
    }

    #[test]
    fn fisheye_is_fixed_at_its_radius() {
        let w = Warper::fisheye(50.0, 50.0, 10.0).unwrap();
        assert!(close(w.warp(60.0, 50.0), (60.0, 50.0)));
        assert!(close(w.warp(50.0, 40.0), (50.0, 40.0)));
        // Inside the radius, points are pulled in: 2 * 5² / (10 + 5).
        assert!(close(w.warp(55.0, 50.0), (50.0 + 50.0 / 15.0, 50.0)));
    }

    #[test]
    fn swirl_rotates_one_radian_at_its_radius() {
        let w = Warper::swirl(10.0, 10.0, 5.0).unwrap();
        let (s, c) = 1.0f64.sin_cos();
        assert!(close(w.warp(15.0, 10.0), (10.0 + 5.0 * c, 10.0 + 5.0 * s)));
    }

    #[test]
    fn ripple_pushes_along_the_radius() {
        let w = Warper::ripple(0.0, 0.0, 10.0, 2.0, 0.0).unwrap();
        // A quarter wavelength out: full push.
        assert!(close(w.warp(2.5, 0.0), (4.5, 0.0)));
        assert!(close(w.warp(0.0, -2.5), (0.0, -4.5)));
        // Half a wavelength out: a node.
        assert!(close(w.warp(5.0, 0.0), (5.0, 0.0)));
        // A phase of π turns the push inward.
        let w = Warper::ripple(0.0, 0.0, 10.0, 2.0, PI).unwrap();
        assert!(close(w.warp(2.5, 0.0), (0.5, 0.0)));
    }

    #[test]
    fn simplex_moves_points_by_offset() {
        let w = Warper::simplex(0.3, 0.0015, 20.0);
        for &(x, y) in &[(0.0, 0.0), (100.0, 250.0), (399.0, 17.0)] {
            let (wx, wy) = w.warp(x, y);
            assert!(((wx - x).hypot(wy - y) - 20.0).abs() < 1e-9);
            assert_eq!(w.warp(x, y), (wx, wy));
        }
        let still = Warper::simplex(0.3, 0.0015, 0.0);
        assert_eq!(still.warp(7.0, 9.0), (7.0, 9.0));
    }

    #[test]
    fn bad_geometry_is_rejected() {
        assert!(Warper::fisheye(0.0, 0.0, 0.0).is_err());
        assert!(Warper::swirl(0.0, 0.0, -1.0).is_err());
        assert!(Warper::ripple(0.0, 0.0, 0.0, 1.0, 0.0).is_err());
    }
}
