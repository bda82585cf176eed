// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Ready-made frame configurations.  Each preset is a function of the
//! frame size and of `percent`, the position within an animation in
//! `[0, 1)`, so the same preset drives both single images and frame
//! sequences.

use crate::algos::Algo;
use crate::colorizors::Colorizor;
use crate::errors::{invalid, BlfractError, Result};
use crate::iterator::Pipeline;
use crate::planes::ComplexPlane;
use crate::warpers::Warper;
use num::Complex;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// One frame's worth of configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// What to draw.
    pub pipeline: Pipeline,
    /// How many iterations to give each point.
    pub budget: u32,
}

/// Moves from `min` to `max` and back as `t` goes from 0 to 1, starting
/// halfway between the two.
pub fn lerp_sin(t: f64, min: f64, max: f64) -> f64 {
    let s = (t * 2.0 * PI).sin() * 0.5 + 0.5;
    min + (max - min) * s
}

/// The named presets.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Preset {
    /// A slowly drifting duck.
    Duck,
    /// Debug rings under a breathing swirl.
    Grid,
    /// A Julia set.
    Julia,
    /// A Kali set.
    Kali,
    /// The Mandelbrot set.
    Mandel,
    /// Radially symmetric Nova.
    NovaBase,
    /// Relaxed Nova.
    NovaRelaxed,
    /// Nova with a fixed seed.
    NovaZ,
}

const PRESETS: [(&str, Preset); 8] = [
    ("duck", Preset::Duck),
    ("grid", Preset::Grid),
    ("julia", Preset::Julia),
    ("kali", Preset::Kali),
    ("mandel", Preset::Mandel),
    ("nova-base", Preset::NovaBase),
    ("nova-relaxed", Preset::NovaRelaxed),
    ("nova-z", Preset::NovaZ),
];

impl Preset {
    /// Every preset's name, for the command line.
    pub fn names() -> Vec<&'static str> {
        PRESETS.iter().map(|p| p.0).collect()
    }

    /// Configure a `width` x `height` frame at `percent`.
    pub fn frame(self, width: f64, height: f64, percent: f64) -> Result<Frame> {
        let (pipeline, budget) = match self {
            Preset::Duck => {
                let plane = ComplexPlane::from_center_and_size(0.0, 0.0, 4.0, 4.0)?;
                let mut p = Pipeline::new(plane);
                p.algo = Algo::duck(0.38 + percent * 0.04, -0.2);
                p.colorizor = Colorizor::duck(1.0, 0.4, 0.4, 4.0)?;
                (p, 40)
            }
            Preset::Grid => {
                let plane = ComplexPlane::from_center_and_size(0.0, 0.0, 10.0, 10.0)?;
                let mut p = Pipeline::new(plane);
                p.algo = Algo::rings(plane, 40.0)?;
                p.colorizor = Colorizor::greyscale(1.0, 0.0);
                p.warper = Warper::swirl(
                    width / 4.0,
                    height / 4.0,
                    lerp_sin(percent, width / 4.0, width),
                )?;
                (p, 80)
            }
            Preset::Julia => {
                let plane = ComplexPlane::from_center_and_size(0.0, 0.0, 3.2, 3.2)?;
                let mut p = Pipeline::new(plane);
                p.algo = Algo::julia(-0.65, -0.37);
                (p, 30)
            }
            Preset::Kali => {
                let plane = ComplexPlane::from_center_and_size(0.0, 0.0, 2.6, 2.6)?;
                let mut p = Pipeline::new(plane);
                p.algo = Algo::kali(-0.2, -1.0, 2.0)?;
                p.colorizor = Colorizor::greyscale(1.0, 0.0);
                (p, 80)
            }
            Preset::Mandel => {
                let plane = ComplexPlane::from_center_and_size(-0.5, 0.0, 3.0, 3.0)?;
                (Pipeline::new(plane), 40)
            }
            Preset::NovaBase => {
                let plane = ComplexPlane::from_center_and_size(0.0, 0.0, 1.4, 1.4)?;
                let mut p = Pipeline::new(plane);
                p.algo = Algo::nova_base(4.0, 0.001)?;
                p.colorizor = Colorizor::hsv(20.0, 60.0, 0.0, 1.0, 1.5, 0.0);
                (p, 60)
            }
            Preset::NovaRelaxed => {
                let plane = ComplexPlane::from_center_and_size(-0.25, 0.0, 1.4, 1.4)?;
                let mut p = Pipeline::new(plane);
                p.algo = Algo::nova_relaxed(
                    Some(Complex::new(1.0, 1.0)),
                    Complex::new(1.0, 0.0),
                    4.0,
                    0.001,
                )?;
                p.colorizor = Colorizor::hsv(300.0, 60.0, 0.0, 1.0, 1.5, 0.0);
                (p, 50)
            }
            Preset::NovaZ => {
                let plane = ComplexPlane::from_center_and_size(-0.3, 0.0, 1.4, 1.4)?;
                let mut p = Pipeline::new(plane);
                p.algo = Algo::nova_z(1.0, 0.0, 4.0, 0.001)?;
                p.colorizor = Colorizor::hsv(20.0, 60.0, 0.0, 1.0, 1.5, 0.0);
                (p, 60)
            }
        };
        Ok(Frame { pipeline, budget })
    }
}

impl FromStr for Preset {
    type Err = BlfractError;

    fn from_str(s: &str) -> Result<Preset> {
        PRESETS
            .iter()
            .find(|p| p.0 == s)
            .map(|p| p.1)
            .ok_or_else(|| invalid("preset", format!("unknown preset '{}'", s)))
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = PRESETS
            .iter()
            .find(|p| p.1 == *self)
            .map(|p| p.0)
            .unwrap_or("?");
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for name in Preset::names() {
            let preset: Preset = name.parse().unwrap();
            assert_eq!(preset.to_string(), name);
        }
        assert!("buddhabrot".parse::<Preset>().is_err());
    }

    #[test]
    fn lerp_sin_swings_between_its_bounds() {
        assert!((lerp_sin(0.0, 10.0, 20.0) - 15.0).abs() < 1e-9);
        assert!((lerp_sin(0.25, 10.0, 20.0) - 20.0).abs() < 1e-9);
        assert!((lerp_sin(0.75, 10.0, 20.0) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn every_preset_renders_a_small_frame() {
        for name in Preset::names() {
            let preset: Preset = name.parse().unwrap();
            for &percent in &[0.0, 0.5] {
                let frame = preset.frame(16.0, 16.0, percent).unwrap();
                let canvas = frame.pipeline.render(16, 16, frame.budget, 2).unwrap();
                assert_eq!(canvas.pixels().len(), 256, "{}", name);
            }
        }
    }

    #[test]
    fn duck_drifts_with_percent() {
        let a = Preset::Duck.frame(16.0, 16.0, 0.0).unwrap();
        let b = Preset::Duck.frame(16.0, 16.0, 0.5).unwrap();
        assert_ne!(a.pipeline.algo, b.pipeline.algo);
        assert_eq!(a.pipeline.plane, b.pipeline.plane);
    }
}
