// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Colorizors turn the magnitude an algorithm produced into a color.
//! Which colorizor suits which algorithm depends on the range of
//! magnitudes the algorithm produces: most stay within `[0, 1]`, but the
//! duck does not, and the duck palette needs magnitudes above `1 / x`.

use crate::errors::{invalid, BlfractError, Result};
use std::f64::consts::PI;

/// A color with normalized channels.  Channels outside `[0, 1]` are
/// permitted and are clamped when the color is quantized.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color {
    /// Red.
    pub r: f64,
    /// Green.
    pub g: f64,
    /// Blue.
    pub b: f64,
    /// Alpha.
    pub a: f64,
}

impl Color {
    /// An opaque color.
    pub fn rgb(r: f64, g: f64, b: f64) -> Color {
        Color { r, g, b, a: 1.0 }
    }

    /// A color with transparency.
    pub fn rgba(r: f64, g: f64, b: f64, a: f64) -> Color {
        Color { r, g, b, a }
    }

    /// An opaque grey of the given brightness.
    pub fn grey(v: f64) -> Color {
        Color::rgb(v, v, v)
    }

    /// Opaque black.
    pub fn black() -> Color {
        Color::grey(0.0)
    }

    /// Opaque white.
    pub fn white() -> Color {
        Color::grey(1.0)
    }

    /// Convert from hue (in degrees), saturation and value.
    pub fn hsv(h: f64, s: f64, v: f64) -> Color {
        let h = h.rem_euclid(360.0) / 60.0;
        let c = v * s;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let m = v - c;
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        Color::rgb(r + m, g + m, b + m)
    }

    /// Quantize to 8-bit red, green, blue.
    pub fn to_rgb8(&self) -> [u8; 3] {
        [quantize(self.r), quantize(self.g), quantize(self.b)]
    }

    /// Quantize to 8-bit red, green, blue, alpha.
    pub fn to_rgba8(&self) -> [u8; 4] {
        [
            quantize(self.r),
            quantize(self.g),
            quantize(self.b),
            quantize(self.a),
        ]
    }
}

fn quantize(v: f64) -> u8 {
    (num::clamp(v, 0.0, 1.0) * 255.0).round() as u8
}

// Exact at both ends: lerp(0) == min and lerp(1) == max.
fn lerp(t: f64, min: f64, max: f64) -> f64 {
    min * (1.0 - t) + max * t
}

/// A colorizor together with its palette constants.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Colorizor {
    /// Alternates between two colors by the parity of the iteration count.
    Binary {
        /// Even iterations.
        even: Color,
        /// Odd iterations.
        odd: Color,
        /// The budget the magnitude was normalized against.
        budget: u32,
    },
    /// As Binary, but points that never escaped get their own color.
    BinaryZero {
        /// Even iterations.
        even: Color,
        /// Odd iterations.
        odd: Color,
        /// Magnitude exactly 0.
        zero: Color,
        /// The budget the magnitude was normalized against.
        budget: u32,
    },
    /// Grey, from `min` at magnitude 0 to `max` at magnitude 1.
    Greyscale {
        /// Brightness at magnitude 0.
        min: f64,
        /// Brightness at magnitude 1.
        max: f64,
    },
    /// Fully saturated hues, from `min` to `max` degrees.
    Hue {
        /// Hue at magnitude 0.
        min: f64,
        /// Hue at magnitude 1.
        max: f64,
    },
    /// Hue, saturation and value each ramp over their own range.
    Hsv {
        /// Hue range in degrees.
        hue: (f64, f64),
        /// Saturation range.
        sat: (f64, f64),
        /// Value range.
        val: (f64, f64),
    },
    /// A cosine palette for the duck algorithm.  Larger `x` gives
    /// smoother gradients.
    Duck {
        /// Phase offsets for the red, green and blue channels.
        phase: (f64, f64, f64),
        /// Scale applied to the magnitude before the logarithms.
        x: f64,
    },
}

impl Default for Colorizor {
    fn default() -> Colorizor {
        Colorizor::Greyscale { min: 0.0, max: 1.0 }
    }
}

impl Colorizor {
    /// Two colors, alternating with the escape iteration.
    pub fn binary(even: Color, odd: Color, budget: u32) -> Colorizor {
        Colorizor::Binary { even, odd, budget }
    }

    /// Two alternating colors, plus one for points that never escaped.
    pub fn binary_zero(even: Color, odd: Color, zero: Color, budget: u32) -> Colorizor {
        Colorizor::BinaryZero {
            even,
            odd,
            zero,
            budget,
        }
    }

    /// A simple grey ramp.  Pass `(1, 0)` for an inverted ramp.
    pub fn greyscale(min: f64, max: f64) -> Colorizor {
        Colorizor::Greyscale { min, max }
    }

    /// A hue ramp.
    pub fn hue(min: f64, max: f64) -> Colorizor {
        Colorizor::Hue { min, max }
    }

    /// Independent hue, saturation and value ramps.
    pub fn hsv(
        min_hue: f64,
        max_hue: f64,
        min_sat: f64,
        max_sat: f64,
        min_val: f64,
        max_val: f64,
    ) -> Colorizor {
        Colorizor::Hsv {
            hue: (min_hue, max_hue),
            sat: (min_sat, max_sat),
            val: (min_val, max_val),
        }
    }

    /// The duck palette.  `x` should be 2 or more.
    pub fn duck(r: f64, g: f64, b: f64, x: f64) -> Result<Colorizor> {
        if !(x.is_finite() && x > 0.0) {
            return Err(invalid("x", format!("{} must be a positive number", x)));
        }
        Ok(Colorizor::Duck {
            phase: (r, g, b),
            x,
        })
    }

    /// The color for a magnitude.
    pub fn colorize(&self, m: f64) -> Result<Color> {
        match *self {
            Colorizor::Binary { even, odd, budget } => Ok(parity(m, budget, even, odd)),
            Colorizor::BinaryZero {
                even,
                odd,
                zero,
                budget,
            } => {
                if m == 0.0 {
                    Ok(zero)
                } else {
                    Ok(parity(m, budget, even, odd))
                }
            }
            Colorizor::Greyscale { min, max } => Ok(Color::grey(lerp(m, min, max))),
            Colorizor::Hue { min, max } => Ok(Color::hsv(lerp(m, min, max), 1.0, 1.0)),
            Colorizor::Hsv { hue, sat, val } => Ok(Color::hsv(
                lerp(m, hue.0, hue.1),
                lerp(m, sat.0, sat.1),
                lerp(m, val.0, val.1),
            )),
            Colorizor::Duck { phase, x } => {
                // Both logarithms need positive arguments: m * x > 1.
                let scaled = m * x;
                if !(scaled > 1.0) || !scaled.is_finite() {
                    return Err(BlfractError::MagnitudeDomain {
                        magnitude: m,
                        colorizor: "duck",
                    });
                }
                let co = 1.0 - (0.5 * scaled.log2()).log2();
                let channel = |offset: f64| 0.5 + 0.5 * (2.0 * PI * co + offset).cos();
                Ok(Color::rgb(
                    channel(phase.0),
                    channel(phase.1),
                    channel(phase.2),
                ))
            }
        }
    }
}

// m is n / budget, so m * budget lands a hair off n.
fn parity(m: f64, budget: u32, even: Color, odd: Color) -> Color {
    if (m * f64::from(budget)).round() as i64 % 2 == 0 {
        even
    } else {
        odd
    }
}
