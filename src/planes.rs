//! Contains the ComplexPlane struct, which describes the rectangle of
//! the complex plane being sampled, and the PlaneMapper, which relates
//! that rectangle to an integral pixel plane with its origin at 0,0.
//! Pixel coordinates handed to the mapper may be fractional or lie
//! outside the pixel plane: warpers move points around before they are
//! mapped, and the mapping is simply extended linearly.
use crate::errors::{BlfractError, Result};
use num::Complex;

/// Describes the bounds of the region of the complex plane that will be
/// rendered, treating the real part of each value as the x-component
/// and the imaginary part of each value as the y-component.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ComplexPlane {
    /// Left edge on the real axis.
    pub real_min: f64,
    /// Right edge on the real axis.
    pub real_max: f64,
    /// Top edge on the imaginary axis; pixel row 0 maps here.
    pub imag_min: f64,
    /// Bottom edge on the imaginary axis.
    pub imag_max: f64,
}

fn check_size(width: f64, height: f64) -> Result<()> {
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(BlfractError::InvalidPlane { width, height })
    }
}

impl ComplexPlane {
    /// A plane of the given size centered on `center_re + center_im i`.
    pub fn from_center_and_size(
        center_re: f64,
        center_im: f64,
        width: f64,
        height: f64,
    ) -> Result<ComplexPlane> {
        check_size(width, height)?;
        ComplexPlane {
            real_min: center_re - width / 2.0,
            real_max: center_re + width / 2.0,
            imag_min: center_im - height / 2.0,
            imag_max: center_im + height / 2.0,
        }
        .checked()
    }

    /// A plane of the given size whose top left corner is at `re + im i`.
    pub fn from_rect(re: f64, im: f64, width: f64, height: f64) -> Result<ComplexPlane> {
        check_size(width, height)?;
        ComplexPlane {
            real_min: re,
            real_max: re + width,
            imag_min: im,
            imag_max: im + height,
        }
        .checked()
    }

    /// Fails unless every bound is finite and each minimum lies strictly
    /// below its maximum.  Sizes that vanish when added to a large center
    /// are caught here.
    pub fn check(&self) -> Result<()> {
        let bounds = [self.real_min, self.real_max, self.imag_min, self.imag_max];
        if bounds.iter().all(|b| b.is_finite())
            && self.real_min < self.real_max
            && self.imag_min < self.imag_max
        {
            Ok(())
        } else {
            Err(BlfractError::InvalidPlane {
                width: self.width(),
                height: self.height(),
            })
        }
    }

    fn checked(self) -> Result<ComplexPlane> {
        self.check().map(|_| self)
    }

    /// Extent along the real axis.
    pub fn width(&self) -> f64 {
        self.real_max - self.real_min
    }

    /// Extent along the imaginary axis.
    pub fn height(&self) -> f64 {
        self.imag_max - self.imag_min
    }

    /// The point halfway between both pairs of bounds.
    pub fn center(&self) -> Complex<f64> {
        Complex::new(
            (self.real_min + self.real_max) / 2.0,
            (self.imag_min + self.imag_max) / 2.0,
        )
    }

    /// Where a point sits inside the plane, as a fraction of each extent.
    /// Points outside the plane produce values outside `[0, 1]`.
    pub fn normalize(&self, re: f64, im: f64) -> (f64, f64) {
        (
            (re - self.real_min) / self.width(),
            (im - self.imag_min) / self.height(),
        )
    }
}

/// Maps coordinates on a `width` x `height` pixel plane onto a
/// ComplexPlane.
#[derive(Copy, Clone, Debug)]
pub struct PlaneMapper {
    /// The complex plane being sampled.
    pub plane: ComplexPlane,
    // Pixels per unit of the complex plane, along each axis.
    grid_factors: (f64, f64),
}

impl PlaneMapper {
    /// Constructor.  Both dimensions must be non-zero and the plane must
    /// pass `ComplexPlane::check`, whichever way it was built.
    pub fn new(width: usize, height: usize, plane: ComplexPlane) -> Result<PlaneMapper> {
        plane.check()?;
        if width == 0 || height == 0 {
            return Err(BlfractError::SurfaceMismatch {
                len: 0,
                width,
                height,
            });
        }
        let grid_factors = (
            (width as f64) / plane.width(),
            (height as f64) / plane.height(),
        );
        if !(grid_factors.0.is_finite() && grid_factors.1.is_finite()) {
            return Err(BlfractError::InvalidPlane {
                width: plane.width(),
                height: plane.height(),
            });
        }
        Ok(PlaneMapper {
            plane,
            grid_factors,
        })
    }

    /// Given a (possibly warped, possibly out of frame) location on the
    /// pixel plane, return the corresponding point on the complex plane.
    pub fn coords_to_point(&self, x: f64, y: f64) -> Complex<f64> {
        Complex::new(
            (x / self.grid_factors.0) + self.plane.real_min,
            (y / self.grid_factors.1) + self.plane.imag_min,
        )
    }
}
