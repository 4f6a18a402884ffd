//! Canvas-sized pixel grids shared by the source composite, mask and destination
//!
//! Both grids are backed by `ndarray` arrays indexed `[y, x]` so that rows are
//! contiguous and a flat pixel id is `y * width + x`.

use ndarray::Array2;

use crate::io::error::{BlendError, Result, invalid_parameter};
use crate::math::color::{CHANNELS, pack_rgb, unpack_rgb};

/// Check whether `(x, y)` lies strictly inside a `width` x `height` canvas
///
/// The strict interior excludes the outermost row and column on every side,
/// so every interior pixel has four in-canvas neighbors.
pub const fn is_strict_interior(dimensions: (usize, usize), x: usize, y: usize) -> bool {
    let (width, height) = dimensions;
    x >= 1 && y >= 1 && x + 1 < width && y + 1 < height
}

/// Color image with one packed `0x00RRGGBB` word per pixel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedImage {
    pixels: Array2<u32>,
}

impl PackedImage {
    /// Create an image filled with a single packed color
    pub fn new(width: usize, height: usize, fill: u32) -> Self {
        Self {
            pixels: Array2::from_elem((height, width), fill),
        }
    }

    /// Create an image from row-major packed pixels
    ///
    /// # Errors
    ///
    /// Returns an error if `data.len()` is not `width * height`
    pub fn from_vec(width: usize, height: usize, data: Vec<u32>) -> Result<Self> {
        let len = data.len();
        let pixels = Array2::from_shape_vec((height, width), data).map_err(|_shape_error| {
            invalid_parameter(
                "pixels",
                &len,
                &format!("expected {} pixels for a {width}x{height} image", width * height),
            )
        })?;
        Ok(Self { pixels })
    }

    /// Wrap an existing `[y, x]` array of packed pixels
    pub fn from_array(pixels: Array2<u32>) -> Self {
        Self { pixels }
    }

    /// Width in pixels
    pub fn width(&self) -> usize {
        self.pixels.ncols()
    }

    /// Height in pixels
    pub fn height(&self) -> usize {
        self.pixels.nrows()
    }

    /// Dimensions as (width, height)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    /// Packed color at `(x, y)`, or `None` outside the image
    pub fn get(&self, x: usize, y: usize) -> Option<u32> {
        self.pixels.get([y, x]).copied()
    }

    /// Unpacked `[r, g, b]` at `(x, y)`, or `None` outside the image
    pub fn get_rgb(&self, x: usize, y: usize) -> Option<[u8; CHANNELS]> {
        self.get(x, y).map(unpack_rgb)
    }

    /// Overwrite the packed color at `(x, y)`
    ///
    /// Returns `false` and leaves the image untouched when `(x, y)` is outside.
    pub fn set(&mut self, x: usize, y: usize, packed: u32) -> bool {
        self.pixels.get_mut([y, x]).is_some_and(|pixel| {
            *pixel = packed;
            true
        })
    }

    /// Overwrite the color at `(x, y)` from `[r, g, b]`
    pub fn set_rgb(&mut self, x: usize, y: usize, rgb: [u8; CHANNELS]) -> bool {
        self.set(x, y, pack_rgb(rgb))
    }

    /// Underlying `[y, x]` pixel array
    pub const fn pixels(&self) -> &Array2<u32> {
        &self.pixels
    }
}

/// Single-channel mask where any nonzero value marks a pixel to be solved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    values: Array2<u8>,
}

impl Mask {
    /// Create an all-inactive mask
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            values: Array2::zeros((height, width)),
        }
    }

    /// Create a mask from row-major byte values
    ///
    /// # Errors
    ///
    /// Returns an error if `data.len()` is not `width * height`
    pub fn from_vec(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        let len = data.len();
        let values = Array2::from_shape_vec((height, width), data).map_err(|_shape_error| {
            invalid_parameter(
                "mask",
                &len,
                &format!("expected {} values for a {width}x{height} mask", width * height),
            )
        })?;
        Ok(Self { values })
    }

    /// Wrap an existing `[y, x]` array of mask values
    pub fn from_array(values: Array2<u8>) -> Self {
        Self { values }
    }

    /// Width in pixels
    pub fn width(&self) -> usize {
        self.values.ncols()
    }

    /// Height in pixels
    pub fn height(&self) -> usize {
        self.values.nrows()
    }

    /// Dimensions as (width, height)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    /// Raw mask value at `(x, y)`, or `None` outside the mask
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        self.values.get([y, x]).copied()
    }

    /// Overwrite the mask value at `(x, y)`
    ///
    /// Returns `false` and leaves the mask untouched when `(x, y)` is outside.
    pub fn set(&mut self, x: usize, y: usize, value: u8) -> bool {
        self.values.get_mut([y, x]).is_some_and(|cell| {
            *cell = value;
            true
        })
    }

    /// Whether `(x, y)` is inside the mask and marked for solving
    pub fn is_active(&self, x: usize, y: usize) -> bool {
        self.get(x, y).is_some_and(|value| value != 0)
    }

    /// Active pixel positions `(x, y)` in raster order
    pub fn active_pixels(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.values
            .indexed_iter()
            .filter(|&(_, &value)| value != 0)
            .map(|((y, x), _)| (x, y))
    }

    /// Number of active pixels
    pub fn active_count(&self) -> usize {
        self.values.iter().filter(|&&value| value != 0).count()
    }

    /// Verify that no active pixel touches the outer border
    ///
    /// # Errors
    ///
    /// Returns [`BlendError::InvalidMask`] naming the first offending pixel in
    /// raster order
    pub fn validate_interior(&self) -> Result<()> {
        let dimensions = self.dimensions();
        match self
            .active_pixels()
            .find(|&(x, y)| !is_strict_interior(dimensions, x, y))
        {
            Some((x, y)) => Err(BlendError::InvalidMask {
                x,
                y,
                reason: "active pixel lies on the outer border".to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Underlying `[y, x]` value array
    pub const fn values(&self) -> &Array2<u8> {
        &self.values
    }
}
