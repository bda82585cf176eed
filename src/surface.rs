// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The output surface a render is written to, and the in-memory Canvas
//! that implements it.

use crate::colorizors::Color;
use crate::errors::{BlfractError, Result};
use image::RgbImage;
use std::path::Path;

/// Anything with a width and height whose pixels can be set.  The
/// renderer never reads pixels back.
pub trait Surface {
    /// Width in pixels.
    fn width(&self) -> usize;
    /// Height in pixels.
    fn height(&self) -> usize;
    /// Set the pixel at column `x`, row `y`.  Row 0 is the top.
    fn set_pixel(&mut self, x: usize, y: usize, color: Color);
}

/// A rectangle of colors held in memory, row by row.
#[derive(Clone, Debug, PartialEq)]
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl Canvas {
    /// A black canvas.
    pub fn new(width: usize, height: usize) -> Canvas {
        Canvas {
            width,
            height,
            pixels: vec![Color::black(); width * height],
        }
    }

    /// Wrap an existing buffer, which must hold width * height colors.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Color>) -> Result<Canvas> {
        if pixels.len() != width * height {
            return Err(BlfractError::SurfaceMismatch {
                len: pixels.len(),
                width,
                height,
            });
        }
        Ok(Canvas {
            width,
            height,
            pixels,
        })
    }

    /// The color at `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> Option<Color> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Every pixel, row by row.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Quantize to packed 8-bit red, green, blue bytes, row by row.
    pub fn to_rgb8_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.to_rgb8().to_vec()).collect()
    }

    /// Quantize to an 8-bit RGB image.
    pub fn to_rgb8(&self) -> Result<RgbImage> {
        let bytes = self.to_rgb8_bytes();
        let len = self.pixels.len();
        RgbImage::from_raw(self.width as u32, self.height as u32, bytes).ok_or(
            BlfractError::SurfaceMismatch {
                len,
                width: self.width,
                height: self.height,
            },
        )
    }

    /// Write the canvas out as an image; the format follows the extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.to_rgb8()?
            .save(path)
            .map_err(|e| BlfractError::Output {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
    }
}

impl Surface for Canvas {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_starts_black() {
        let c = Canvas::new(3, 2);
        assert_eq!(c.pixels().len(), 6);
        assert!(c.pixels().iter().all(|p| *p == Color::black()));
    }

    #[test]
    fn set_and_get_are_row_major() {
        let mut c = Canvas::new(3, 2);
        c.set_pixel(2, 1, Color::white());
        assert_eq!(c.pixels()[5], Color::white());
        assert_eq!(c.get(2, 1), Some(Color::white()));
        assert_eq!(c.get(3, 0), None);
        // Out of bounds writes are dropped.
        c.set_pixel(9, 9, Color::white());
        assert_eq!(c.pixels().iter().filter(|p| **p == Color::white()).count(), 1);
    }

    #[test]
    fn from_pixels_checks_its_size() {
        assert!(Canvas::from_pixels(2, 2, vec![Color::black(); 3]).is_err());
        assert!(Canvas::from_pixels(2, 2, vec![Color::black(); 4]).is_ok());
    }

    #[test]
    fn rgb8_export() {
        let mut c = Canvas::new(2, 1);
        c.set_pixel(1, 0, Color::rgb(1.0, 0.5, 0.0));
        assert_eq!(c.to_rgb8_bytes(), vec![0, 0, 0, 255, 128, 0]);
        let img = c.to_rgb8().unwrap();
        assert_eq!(img.dimensions(), (2, 1));
        assert_eq!(img.into_raw(), vec![0, 0, 0, 255, 128, 0]);
    }

    #[test]
    fn save_writes_a_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        Canvas::new(4, 4).save(&path).unwrap();
        assert!(path.exists());
    }
}
