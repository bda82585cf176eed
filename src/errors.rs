// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The error type shared by every stage of the render pipeline.
//!
//! Configuration problems are reported before a sweep starts; the only
//! failures that can occur mid-sweep are magnitudes a colorizor cannot
//! map, a worker thread dying, or a cancellation request.

use failure::Fail;

/// Everything that can go wrong while configuring or running a render.
#[derive(Debug, Fail, Clone, PartialEq)]
pub enum BlfractError {
    /// The plane has a non-positive or non-finite width or height.
    #[fail(display = "invalid complex plane: width {} and height {} must be positive", width, height)]
    InvalidPlane {
        /// Requested width on the real axis.
        width: f64,
        /// Requested height on the imaginary axis.
        height: f64,
    },

    /// A render was asked to run with no iterations at all.
    #[fail(display = "the iteration budget must be at least 1")]
    InvalidBudget,

    /// A constructor received a parameter outside of its domain.
    #[fail(display = "invalid parameter {}: {}", name, reason)]
    InvalidParameter {
        /// The parameter's name.
        name: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// A colorizor was handed a magnitude it has no color for.
    #[fail(display = "magnitude {} is outside the domain of the {} colorizor", magnitude, colorizor)]
    MagnitudeDomain {
        /// The offending magnitude.
        magnitude: f64,
        /// Which colorizor rejected it.
        colorizor: &'static str,
    },

    /// A pixel buffer does not have width * height entries.
    #[fail(display = "buffer holds {} pixels, expected {}x{}", len, width, height)]
    SurfaceMismatch {
        /// Actual buffer length.
        len: usize,
        /// Surface width in pixels.
        width: usize,
        /// Surface height in pixels.
        height: usize,
    },

    /// One of the render threads panicked.
    #[fail(display = "a render worker panicked")]
    WorkerPanicked,

    /// The render was cancelled before it completed.
    #[fail(display = "the render was cancelled")]
    Cancelled,

    /// An image could not be written.
    #[fail(display = "could not write {}: {}", path, reason)]
    Output {
        /// Where we were writing.
        path: String,
        /// The underlying error, as text.
        reason: String,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BlfractError>;

/// Shorthand for building an `InvalidParameter` error.
pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> BlfractError {
    BlfractError::InvalidParameter {
        name,
        reason: reason.into(),
    }
}
