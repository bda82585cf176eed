// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The fractal algorithms.
//!
//! Each algorithm takes a point on the complex plane and an iteration
//! budget and returns a "magnitude."  For the escape-time algorithms
//! (Mandelbrot, Julia, Kali) that is the fraction of the budget used
//! before the orbit escaped, or 0 if it never did.  The Nova family
//! counts iterations until the orbit converges instead, so a point that
//! never settles reports 1.  The Duck returns a smoothed, unbounded
//! magnitude, and the debug patterns return either 0 or 1.
//!
//! Escape is tested against the squared modulus of z, so "escapes a
//! radius of 2" means `norm_sqr() > 4`, strictly.

use crate::errors::{invalid, Result};
use crate::planes::ComplexPlane;
use num::Complex;

const LINE_WIDTH: f64 = 0.05;

/// A fractal algorithm together with its constants.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Algo {
    /// z = z² + c, z starts at 0, c is the point.
    Mandelbrot,
    /// z = z² + c, z starts at the point, c is fixed.
    Julia {
        /// The Julia constant.
        c: Complex<f64>,
    },
    /// The Kali (abs-inversion) map.
    Kali {
        /// Added after each inversion.
        c: Complex<f64>,
        /// Escape radius.
        bail_out: f64,
    },
    /// The "duck" log map, averaged over every iteration.
    Duck {
        /// Added to z before each logarithm.
        c: Complex<f64>,
        /// Seed z with `im + re i` instead of `re + im i`.
        swap_axes: bool,
    },
    /// Nova on zᵖ - 1, z seeded with the point.
    NovaBase {
        /// The exponent p.
        power: f64,
        /// Convergence tolerance.
        bail_out: f64,
    },
    /// Nova on zᵖ - 1 with a fixed seed for z.
    NovaZ {
        /// Initial z.
        z: Complex<f64>,
        /// The exponent p.
        power: f64,
        /// Convergence tolerance.
        bail_out: f64,
    },
    /// Nova with a relaxation factor applied to the Newton step.
    NovaRelaxed {
        /// Initial z, or the point itself when None.
        z: Option<Complex<f64>>,
        /// Relaxation factor.
        relax: Complex<f64>,
        /// The exponent p.
        power: f64,
        /// Convergence tolerance.
        bail_out: f64,
    },
    /// Lines at every integer of a `res` x `res` grid laid over `plane`.
    Grid {
        /// The plane the grid is laid over.
        plane: ComplexPlane,
        /// Number of cells along each axis.
        res: f64,
    },
    /// A `res` x `res` checkerboard laid over `plane`.
    Checker {
        /// The plane the board is laid over.
        plane: ComplexPlane,
        /// Number of squares along each axis.
        res: f64,
    },
    /// `res` concentric rings around the center of `plane`.
    Rings {
        /// The plane the rings are centered in.
        plane: ComplexPlane,
        /// Number of rings between the center and the left edge.
        res: f64,
    },
}

impl Default for Algo {
    fn default() -> Algo {
        Algo::Mandelbrot
    }
}

fn positive(name: &'static str, v: f64) -> Result<f64> {
    if v.is_finite() && v > 0.0 {
        Ok(v)
    } else {
        Err(invalid(name, format!("{} must be a positive number", v)))
    }
}

fn check_power(p: f64) -> Result<f64> {
    if p.is_finite() && p != 0.0 {
        Ok(p)
    } else {
        Err(invalid("power", format!("{} must be finite and non-zero", p)))
    }
}

impl Algo {
    /// The classic Mandelbrot set.
    pub fn mandelbrot() -> Algo {
        Algo::Mandelbrot
    }

    /// The Julia set for `cr + ci i`.
    pub fn julia(cr: f64, ci: f64) -> Algo {
        Algo::Julia {
            c: Complex::new(cr, ci),
        }
    }

    /// The Kali fractal for `cr + ci i`, escaping past `bail_out`.
    pub fn kali(cr: f64, ci: f64, bail_out: f64) -> Result<Algo> {
        Ok(Algo::Kali {
            c: Complex::new(cr, ci),
            bail_out: positive("bail_out", bail_out)?,
        })
    }

    /// The duck fractal for `cr + ci i`, with its customary axis swap.
    pub fn duck(cr: f64, ci: f64) -> Algo {
        Algo::Duck {
            c: Complex::new(cr, ci),
            swap_axes: true,
        }
    }

    /// Nova with perfect radial symmetry.  `power` sets the number of
    /// arms; smaller tolerances give more detailed images.
    pub fn nova_base(power: f64, bail_out: f64) -> Result<Algo> {
        Ok(Algo::NovaBase {
            power: check_power(power)?,
            bail_out: positive("bail_out", bail_out)?,
        })
    }

    /// Nova with z seeded at `zr + zi i`.
    pub fn nova_z(zr: f64, zi: f64, power: f64, bail_out: f64) -> Result<Algo> {
        Ok(Algo::NovaZ {
            z: Complex::new(zr, zi),
            power: check_power(power)?,
            bail_out: positive("bail_out", bail_out)?,
        })
    }

    /// Relaxed Nova.  With `seed` of None z starts at the sampled point.
    pub fn nova_relaxed(
        seed: Option<Complex<f64>>,
        relax: Complex<f64>,
        power: f64,
        bail_out: f64,
    ) -> Result<Algo> {
        if !(relax.re.is_finite() && relax.im.is_finite()) {
            return Err(invalid("relax", "must be finite"));
        }
        Ok(Algo::NovaRelaxed {
            z: seed,
            relax,
            power: check_power(power)?,
            bail_out: positive("bail_out", bail_out)?,
        })
    }

    /// A debugging grid, useful for seeing what a warper does.
    pub fn grid(plane: ComplexPlane, res: f64) -> Result<Algo> {
        Ok(Algo::Grid {
            plane,
            res: positive("res", res)?,
        })
    }

    /// A debugging checkerboard.
    pub fn checker(plane: ComplexPlane, res: f64) -> Result<Algo> {
        Ok(Algo::Checker {
            plane,
            res: positive("res", res)?,
        })
    }

    /// Debugging concentric rings.
    pub fn rings(plane: ComplexPlane, res: f64) -> Result<Algo> {
        Ok(Algo::Rings {
            plane,
            res: positive("res", res)?,
        })
    }

    /// Compute the magnitude of the point `re + im i`.  A budget of 0
    /// always yields 0.
    pub fn magnitude(&self, re: f64, im: f64, budget: u32) -> f64 {
        if budget == 0 {
            return 0.0;
        }
        let point = Complex::new(re, im);
        match *self {
            Algo::Mandelbrot => escape_time(Complex::new(0.0, 0.0), point, budget),
            Algo::Julia { c } => escape_time(point, c, budget),
            Algo::Kali { c, bail_out } => kali(point, c, bail_out, budget),
            Algo::Duck { c, swap_axes } => {
                let z = if swap_axes {
                    Complex::new(im, re)
                } else {
                    point
                };
                duck(z, c, budget)
            }
            Algo::NovaBase { power, bail_out } => nova(
                point,
                point,
                Complex::new(1.0, 0.0),
                power,
                bail_out,
                budget,
            ),
            Algo::NovaZ { z, power, bail_out } => {
                nova(z, point, Complex::new(1.0, 0.0), power, bail_out, budget)
            }
            Algo::NovaRelaxed {
                z,
                relax,
                power,
                bail_out,
            } => nova(z.unwrap_or(point), point, relax, power, bail_out, budget),
            Algo::Grid { plane, res } => {
                let (x, y) = plane.normalize(re, im);
                on_line(x * res).max(on_line(y * res))
            }
            Algo::Checker { plane, res } => {
                let (x, y) = plane.normalize(re, im);
                let parity = (x * res).floor() + (y * res).floor();
                if parity.rem_euclid(2.0) == 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Algo::Rings { plane, res } => {
                let distance = (point - plane.center()).norm();
                on_line(distance / (plane.width() / 2.0) * res)
            }
        }
    }
}

// 1 when v is within LINE_WIDTH of an integer.
fn on_line(v: f64) -> f64 {
    if (v - v.round()).abs() < LINE_WIDTH {
        1.0
    } else {
        0.0
    }
}

fn escape_time(mut z: Complex<f64>, c: Complex<f64>, budget: u32) -> f64 {
    for n in 0..budget {
        z = z * z + c;
        if z.norm_sqr() > 4.0 {
            return f64::from(n) / f64::from(budget);
        }
    }
    0.0
}

fn kali(mut z: Complex<f64>, c: Complex<f64>, bail_out: f64, budget: u32) -> f64 {
    let limit = bail_out * bail_out;
    for n in 0..budget {
        let folded = Complex::new(z.re.abs(), z.im.abs());
        z = folded / folded.norm_sqr() + c;
        if z.norm_sqr() > limit {
            return f64::from(n) / f64::from(budget);
        }
    }
    0.0
}

fn duck(mut z: Complex<f64>, c: Complex<f64>, budget: u32) -> f64 {
    let mut m = 0.0;
    for _ in 0..budget {
        z = (Complex::new(z.re, z.im.abs()) + c).ln() / std::f64::consts::LN_10;
        m += z.norm();
    }
    // f64::max discards a NaN mean in favor of the floor.
    (m / f64::from(budget)).max(0.5)
}

fn nova(
    mut z: Complex<f64>,
    c: Complex<f64>,
    relax: Complex<f64>,
    power: f64,
    bail_out: f64,
    budget: u32,
) -> f64 {
    let one = Complex::new(1.0, 0.0);
    let mut n = 0;
    while n < budget {
        let step = (z.powf(power) - one) / (z.powf(power - 1.0) * power);
        let next = z - relax * step + c;
        if (z - next).norm() < bail_out {
            break;
        }
        z = next;
        n += 1;
    }
    f64::from(n) / f64::from(budget)
}
