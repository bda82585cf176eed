#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Fractal renderer
//!
//! Every pixel of the output is mapped to a point on the complex plane,
//! optionally after its coordinates have been pushed around by a
//! warper.  A fractal algorithm iterates a formula at that point and
//! reduces the orbit to a single "magnitude" (usually how quickly the
//! orbit escaped, or how quickly it settled), and a colorizor turns the
//! magnitude into a color.
//!
//! ```no_run
//! use blfract::{Algo, Canvas, Colorizor, ComplexPlane, FractalIterator};
//!
//! let plane = ComplexPlane::from_center_and_size(0.0, 0.0, 3.2, 3.2).unwrap();
//! let mut canvas = Canvas::new(800, 800);
//! FractalIterator::new(&mut canvas, plane)
//!     .set_algo(Algo::julia(-0.65, -0.37))
//!     .set_colorizor(Colorizor::greyscale(0.0, 1.0))
//!     .iterate_parallel(30)
//!     .unwrap();
//! canvas.save("julia.png").unwrap();
//! ```

extern crate crossbeam;
extern crate failure;
extern crate image;
extern crate itertools;
extern crate log;
extern crate num;
extern crate num_cpus;
extern crate rand;

pub mod algos;
pub mod colorizors;
pub mod driver;
pub mod errors;
pub mod iterator;
pub mod noise;
pub mod planes;
pub mod presets;
pub mod surface;
pub mod warpers;

pub use algos::Algo;
pub use colorizors::{Color, Colorizor};
pub use errors::{BlfractError, Result};
pub use iterator::{FractalIterator, Pipeline};
pub use planes::ComplexPlane;
pub use presets::{Frame, Preset};
pub use surface::{Canvas, Surface};
pub use warpers::Warper;
