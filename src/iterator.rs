// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The full-frame sweep.
//!
//! For every pixel of the surface: warp the pixel's coordinates, map
//! them onto the complex plane, run the algorithm there, colorize the
//! magnitude, and write the color back to the pixel.  Each pixel depends
//! on nothing but its own coordinates, so the frame is cut into bands
//! of rows and the bands are rendered on as many threads as asked for.
//! The output does not depend on the number of threads.
//!
//! Colors are collected into a scratch buffer and only copied to the
//! surface once every band has finished, so a render that fails or is
//! cancelled leaves the surface untouched.

use crate::algos::Algo;
use crate::colorizors::{Color, Colorizor};
use crate::errors::{BlfractError, Result};
use crate::planes::{ComplexPlane, PlaneMapper};
use crate::surface::{Canvas, Surface};
use crate::warpers::Warper;
use crossbeam::thread::ScopedJoinHandle;
use itertools::iproduct;
use log::{debug, trace, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// A contiguous run of rows, `start` inclusive, `end` exclusive.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RowBand {
    /// First row of the band.
    pub start: usize,
    /// One past the last row of the band.
    pub end: usize,
}

impl RowBand {
    /// Number of rows in the band.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True if the band has no rows.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Rows per band when `height` rows are split `count` ways.
fn rows_per_band(height: usize, count: usize) -> usize {
    let count = count.max(1);
    ((height + count - 1) / count).max(1)
}

/// Split `height` rows into at most `count` non-empty bands of (nearly)
/// equal size which together cover every row exactly once.
pub fn bands(height: usize, count: usize) -> Vec<RowBand> {
    let rows = rows_per_band(height, count);
    (0..height)
        .step_by(rows)
        .map(|start| RowBand {
            start,
            end: (start + rows).min(height),
        })
        .collect()
}

/// Everything about a render except where it is drawn: the plane, the
/// algorithm, the colorizor and the warper.
#[derive(Clone, Debug, PartialEq)]
pub struct Pipeline {
    /// The region of the complex plane being drawn.
    pub plane: ComplexPlane,
    /// The fractal algorithm.
    pub algo: Algo,
    /// Turns magnitudes into colors.
    pub colorizor: Colorizor,
    /// Distorts pixel coordinates before they are mapped.
    pub warper: Warper,
}

impl Pipeline {
    /// A Mandelbrot, in greyscale, unwarped.
    pub fn new(plane: ComplexPlane) -> Pipeline {
        Pipeline {
            plane,
            algo: Algo::default(),
            colorizor: Colorizor::default(),
            warper: Warper::default(),
        }
    }

    /// The color of pixel `(x, y)`.
    pub fn color_at(&self, mapper: &PlaneMapper, x: usize, y: usize, budget: u32) -> Result<Color> {
        let (x, y) = (x as f64, y as f64);
        let (wx, wy) = match self.warper.warp(x, y) {
            (wx, wy) if wx.is_finite() && wy.is_finite() => (wx, wy),
            _ => (x, y),
        };
        let point = mapper.coords_to_point(wx, wy);
        let m = self.algo.magnitude(point.re, point.im, budget);
        self.colorizor.colorize(m)
    }

    fn render_band(
        &self,
        mapper: &PlaneMapper,
        width: usize,
        band: &RowBand,
        out: &mut [Color],
        budget: u32,
        cancel: Option<&AtomicBool>,
    ) -> Result<()> {
        for (row, y) in (band.start..band.end).enumerate() {
            if let Some(flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    return Err(BlfractError::Cancelled);
                }
            }
            let line = &mut out[row * width..(row + 1) * width];
            for (x, pixel) in line.iter_mut().enumerate() {
                *pixel = self.color_at(mapper, x, y, budget)?;
            }
        }
        trace!("rendered {} rows from {}", band.len(), band.start);
        Ok(())
    }

    /// Render a `width` x `height` frame into a buffer, row by row, on
    /// `threads` threads.
    pub fn sweep(
        &self,
        width: usize,
        height: usize,
        budget: u32,
        threads: usize,
        cancel: Option<&AtomicBool>,
    ) -> Result<Vec<Color>> {
        if budget == 0 {
            return Err(BlfractError::InvalidBudget);
        }
        let mapper = PlaneMapper::new(width, height, self.plane)?;
        let rows = rows_per_band(height, threads);
        let bands = bands(height, threads);
        debug!(
            "sweeping {}x{} at {} iterations in {} bands of {} rows",
            width,
            height,
            budget,
            bands.len(),
            rows
        );
        let started = Instant::now();

        let mut buffer = vec![Color::black(); width * height];
        if bands.len() == 1 {
            self.render_band(&mapper, width, &bands[0], &mut buffer, budget, cancel)?;
        } else {
            let results: Vec<Result<()>> = crossbeam::scope(|spawner| {
                let handles: Vec<ScopedJoinHandle<Result<()>>> = buffer
                    .chunks_mut(rows * width)
                    .zip(bands.iter())
                    .map(|(chunk, band)| {
                        let mapper = &mapper;
                        spawner.spawn(move |_| {
                            self.render_band(mapper, width, band, chunk, budget, cancel)
                        })
                    })
                    .collect();
                handles
                    .into_iter()
                    .map(|handle| handle.join().unwrap_or(Err(BlfractError::WorkerPanicked)))
                    .collect()
            })
            .map_err(|_| BlfractError::WorkerPanicked)?;
            results.into_iter().collect::<Result<()>>()?;
        }

        debug!("swept {}x{} in {:?}", width, height, started.elapsed());
        Ok(buffer)
    }

    /// Render into a fresh Canvas.
    pub fn render(&self, width: usize, height: usize, budget: u32, threads: usize) -> Result<Canvas> {
        let pixels = self.sweep(width, height, budget, threads, None)?;
        Canvas::from_pixels(width, height, pixels)
    }
}

/// Draws a Pipeline onto a Surface.
pub struct FractalIterator<'a, S: Surface> {
    surface: &'a mut S,
    /// What gets drawn.
    pub pipeline: Pipeline,
}

impl<'a, S: Surface> FractalIterator<'a, S> {
    /// An iterator drawing a greyscale, unwarped Mandelbrot of `plane`
    /// onto `surface`.
    pub fn new(surface: &'a mut S, plane: ComplexPlane) -> FractalIterator<'a, S> {
        FractalIterator {
            surface,
            pipeline: Pipeline::new(plane),
        }
    }

    /// Replace the algorithm.
    pub fn set_algo(&mut self, algo: Algo) -> &mut Self {
        self.pipeline.algo = algo;
        self
    }

    /// Replace the colorizor.
    pub fn set_colorizor(&mut self, colorizor: Colorizor) -> &mut Self {
        self.pipeline.colorizor = colorizor;
        self
    }

    /// Replace the warper.
    pub fn set_warper(&mut self, warper: Warper) -> &mut Self {
        self.pipeline.warper = warper;
        self
    }

    /// Render the whole surface on the calling thread.
    pub fn iterate(&mut self, budget: u32) -> Result<()> {
        self.iterate_threaded(budget, 1)
    }

    /// Render the whole surface on one thread per CPU.
    pub fn iterate_parallel(&mut self, budget: u32) -> Result<()> {
        self.iterate_threaded(budget, num_cpus::get())
    }

    /// Render the whole surface on `threads` threads.
    pub fn iterate_threaded(&mut self, budget: u32, threads: usize) -> Result<()> {
        self.run(budget, threads, None)
    }

    /// Render the whole surface on `threads` threads, giving up between
    /// rows once `cancel` is set.  A cancelled render writes nothing.
    pub fn iterate_cancellable(
        &mut self,
        budget: u32,
        threads: usize,
        cancel: &AtomicBool,
    ) -> Result<()> {
        self.run(budget, threads, Some(cancel))
    }

    fn run(&mut self, budget: u32, threads: usize, cancel: Option<&AtomicBool>) -> Result<()> {
        let (width, height) = (self.surface.width(), self.surface.height());
        let buffer = match self.pipeline.sweep(width, height, budget, threads, cancel) {
            Err(BlfractError::Cancelled) => {
                warn!("render of {}x{} cancelled", width, height);
                return Err(BlfractError::Cancelled);
            }
            other => other?,
        };
        for (y, x) in iproduct!(0..height, 0..width) {
            self.surface.set_pixel(x, y, buffer[y * width + x]);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    // Records every write so that double writes can be caught.
    struct Recorder {
        width: usize,
        height: usize,
        writes: HashMap<(usize, usize), Vec<Color>>,
    }

    impl Recorder {
        fn new(width: usize, height: usize) -> Recorder {
            Recorder {
                width,
                height,
                writes: HashMap::new(),
            }
        }

        fn total(&self) -> usize {
            self.writes.values().map(|w| w.len()).sum()
        }
    }

    impl Surface for Recorder {
        fn width(&self) -> usize {
            self.width
        }
        fn height(&self) -> usize {
            self.height
        }
        fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
            self.writes.entry((x, y)).or_insert_with(Vec::new).push(color);
        }
    }

    fn plane() -> ComplexPlane {
        ComplexPlane::from_center_and_size(-0.5, 0.0, 3.0, 3.0).unwrap()
    }

    #[test]
    fn bands_cover_every_row_once() {
        for height in 1..40 {
            for count in 1..9 {
                let bs = bands(height, count);
                assert!(!bs.is_empty() && bs.len() <= count);
                assert!(bs.iter().all(|b| !b.is_empty()));
                assert_eq!(bs.iter().map(RowBand::len).sum::<usize>(), height);
                assert_eq!(bs[0].start, 0);
                assert_eq!(bs[bs.len() - 1].end, height);
                for pair in bs.windows(2) {
                    assert_eq!(pair[0].end, pair[1].start);
                }
            }
        }
        assert!(bands(0, 4).is_empty());
    }

    #[test_log::test]
    fn iterate_writes_every_pixel_exactly_once() {
        for &threads in &[1, 3, 8] {
            let mut surface = Recorder::new(13, 7);
            FractalIterator::new(&mut surface, plane())
                .iterate_threaded(20, threads)
                .unwrap();
            assert_eq!(surface.total(), 13 * 7);
            for (x, y) in iproduct!(0..13, 0..7) {
                assert_eq!(surface.writes[&(x, y)].len(), 1);
            }
        }
    }

    #[test_log::test]
    fn iterate_is_deterministic_across_thread_counts() {
        let mut reference = Canvas::new(21, 17);
        FractalIterator::new(&mut reference, plane()).iterate(30).unwrap();
        for &threads in &[1, 2, 4, 5, 17, 40] {
            let mut canvas = Canvas::new(21, 17);
            let mut it = FractalIterator::new(&mut canvas, plane());
            it.set_warper(Warper::simplex(0.5, 0.05, 2.0));
            it.iterate_threaded(30, threads).unwrap();
            let mut again = Canvas::new(21, 17);
            let mut it = FractalIterator::new(&mut again, plane());
            it.set_warper(Warper::simplex(0.5, 0.05, 2.0));
            it.iterate_threaded(30, 1).unwrap();
            assert_eq!(canvas, again);

            let mut plain = Canvas::new(21, 17);
            FractalIterator::new(&mut plain, plane())
                .iterate_threaded(30, threads)
                .unwrap();
            assert_eq!(plain, reference);
        }
    }

    #[test]
    fn mandelbrot_interior_is_black_and_exterior_is_not() {
        let cp = ComplexPlane::from_center_and_size(0.0, 0.0, 4.0, 4.0).unwrap();
        let mut canvas = Canvas::new(8, 8);
        FractalIterator::new(&mut canvas, cp).iterate(50).unwrap();
        // Pixel (4, 4) maps to the origin.
        assert_eq!(canvas.get(4, 4), Some(Color::black()));
        // Pixel (7, 7) maps to 1.5 + 1.5i, which escapes at n = 0.
        assert_eq!(canvas.get(7, 7), Some(Color::black()));
        // 1 + 1i escapes at n = 1.
        assert_eq!(canvas.get(6, 6), Some(Color::grey(1.0 / 50.0)));
    }

    #[test]
    fn pixels_map_linearly_onto_the_plane() {
        // One grid cell per pixel: every pixel lands on a grid line.
        let cp = ComplexPlane::from_rect(0.0, 0.0, 16.0, 9.0).unwrap();
        let mut canvas = Canvas::new(16, 9);
        let mut it = FractalIterator::new(&mut canvas, cp);
        it.set_algo(Algo::grid(cp, 16.0).unwrap());
        it.iterate(1).unwrap();
        assert!(canvas.pixels().iter().all(|c| *c == Color::white()));
    }

    #[test]
    fn warpers_change_where_pixels_sample() {
        let cp = ComplexPlane::from_rect(0.0, 0.0, 32.0, 32.0).unwrap();
        let grid = Algo::grid(cp, 8.0).unwrap();
        let mut flat = Canvas::new(32, 32);
        FractalIterator::new(&mut flat, cp)
            .set_algo(grid)
            .iterate(1)
            .unwrap();
        let mut swirled = Canvas::new(32, 32);
        FractalIterator::new(&mut swirled, cp)
            .set_algo(grid)
            .set_warper(Warper::swirl(16.0, 16.0, 12.0).unwrap())
            .iterate(1)
            .unwrap();
        assert_ne!(flat, swirled);
        // The swirl's center stays put.
        assert_eq!(flat.get(16, 16), swirled.get(16, 16));
    }

    #[test]
    fn fisheye_center_pixel_renders() {
        let mut canvas = Canvas::new(9, 9);
        FractalIterator::new(&mut canvas, plane())
            .set_warper(Warper::fisheye(4.0, 4.0, 9.0).unwrap())
            .iterate(10)
            .unwrap();
        let c = canvas.get(4, 4).unwrap();
        assert!(c.r.is_finite() && c.g.is_finite() && c.b.is_finite());
    }

    #[test]
    fn zero_budget_is_rejected_before_drawing() {
        let mut surface = Recorder::new(4, 4);
        let e = FractalIterator::new(&mut surface, plane()).iterate(0);
        assert_eq!(e, Err(BlfractError::InvalidBudget));
        assert_eq!(surface.total(), 0);
    }

    #[test]
    fn empty_surface_is_rejected() {
        let mut surface = Recorder::new(0, 4);
        assert!(FractalIterator::new(&mut surface, plane()).iterate(10).is_err());
    }

    #[test]
    fn malformed_planes_are_rejected_before_drawing() {
        let inverted = ComplexPlane {
            real_min: 1.0,
            real_max: -2.0,
            imag_min: 1.0,
            imag_max: -1.0,
        };
        let mut surface = Recorder::new(4, 4);
        let e = FractalIterator::new(&mut surface, inverted).iterate(10);
        match e {
            Err(BlfractError::InvalidPlane { .. }) => {}
            other => panic!("expected an invalid plane, got {:?}", other),
        }
        assert_eq!(surface.total(), 0);
        assert!(Pipeline::new(inverted).render(4, 4, 10, 2).is_err());
    }

    #[test]
    fn colorizor_domain_errors_abort_the_whole_frame() {
        // Mandelbrot magnitudes start at 0, which the duck palette can't map.
        let mut surface = Recorder::new(6, 6);
        let e = FractalIterator::new(&mut surface, plane())
            .set_colorizor(Colorizor::duck(1.0, 0.4, 0.4, 4.0).unwrap())
            .iterate_threaded(10, 3);
        match e {
            Err(BlfractError::MagnitudeDomain { .. }) => {}
            other => panic!("expected a domain error, got {:?}", other),
        }
        assert_eq!(surface.total(), 0);
    }

    #[test]
    fn cancelled_render_writes_nothing() {
        let cancel = AtomicBool::new(true);
        let mut surface = Recorder::new(6, 6);
        let e = FractalIterator::new(&mut surface, plane()).iterate_cancellable(10, 2, &cancel);
        assert_eq!(e, Err(BlfractError::Cancelled));
        assert_eq!(surface.total(), 0);

        let cancel = AtomicBool::new(false);
        FractalIterator::new(&mut surface, plane())
            .iterate_cancellable(10, 2, &cancel)
            .unwrap();
        assert_eq!(surface.total(), 36);
    }

    #[test_log::test]
    fn iterate_parallel_matches_iterate() {
        let mut serial = Canvas::new(19, 11);
        FractalIterator::new(&mut serial, plane()).iterate(25).unwrap();
        let mut parallel = Canvas::new(19, 11);
        FractalIterator::new(&mut parallel, plane())
            .iterate_parallel(25)
            .unwrap();
        assert_eq!(serial, parallel);
    }

    #[test]
    fn pipeline_render_matches_iterator() {
        let pipeline = Pipeline::new(plane());
        let canvas = pipeline.render(10, 10, 25, 3).unwrap();
        let mut other = Canvas::new(10, 10);
        FractalIterator::new(&mut other, plane()).iterate(25).unwrap();
        assert_eq!(canvas, other);
    }
}
