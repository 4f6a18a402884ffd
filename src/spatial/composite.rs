//! Placement of a source region into a destination-sized canvas
//!
//! The solver works on three images of identical size. A source region and
//! its mask usually come smaller than the destination, so they are pasted
//! into blank canvases at an offset before the system is assembled.

use log::debug;

use crate::io::error::{BlendError, Result, ensure_dimensions};
use crate::spatial::canvas::{Mask, PackedImage};

/// Axis-aligned bounding box of the active pixels after placement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    /// Minimum `[x, y]` (inclusive)
    pub min: [usize; 2],
    /// Maximum `[x, y]` (inclusive)
    pub max: [usize; 2],
}

impl BoundingBox {
    /// Check if a position is within the bounds
    pub const fn contains(&self, pos: [usize; 2]) -> bool {
        pos[0] >= self.min[0] && pos[0] <= self.max[0] && pos[1] >= self.min[1] && pos[1] <= self.max[1]
    }

    fn include(bounds: Option<Self>, pos: [usize; 2]) -> Self {
        match bounds {
            Some(b) => Self {
                min: [b.min[0].min(pos[0]), b.min[1].min(pos[1])],
                max: [b.max[0].max(pos[0]), b.max[1].max(pos[1])],
            },
            None => Self { min: pos, max: pos },
        }
    }
}

/// Source region and mask placed onto the destination canvas
#[derive(Debug, Clone)]
pub struct Composite {
    /// Source pixels pasted into a blank canvas
    pub source: PackedImage,
    /// Mask pasted into a blank canvas
    pub mask: Mask,
    /// Extent of the active pixels, `None` when the mask is empty
    pub active_bounds: Option<BoundingBox>,
}

/// Paste `source` and `source_mask` into blank canvases sized like `destination`
///
/// `offset` is the `[x, y]` canvas position of the source's top-left pixel and
/// may be negative. Inactive pixels that fall outside the canvas are dropped.
///
/// # Errors
///
/// Returns an error if:
/// - `source` and `source_mask` differ in size
/// - An active mask pixel lands outside the destination
/// - An active mask pixel lands on the destination's outer border
pub fn compose(
    source: &PackedImage,
    source_mask: &Mask,
    destination: &PackedImage,
    offset: [i64; 2],
) -> Result<Composite> {
    ensure_dimensions("source mask", source.dimensions(), source_mask.dimensions())?;

    let (width, height) = destination.dimensions();
    let mut composite = PackedImage::new(width, height, 0);
    let mut mask = Mask::new(width, height);
    let mut active_bounds = None;

    for y in 0..source.height() {
        for x in 0..source.width() {
            let placed = [x as i64 + offset[0], y as i64 + offset[1]];
            let target = canvas_position(placed, (width, height));
            let value = source_mask.get(x, y).unwrap_or(0);

            match target {
                Some([tx, ty]) => {
                    if let Some(packed) = source.get(x, y) {
                        composite.set(tx, ty, packed);
                    }
                    mask.set(tx, ty, value);
                    if value != 0 {
                        active_bounds = Some(BoundingBox::include(active_bounds, [tx, ty]));
                    }
                }
                None if value != 0 => {
                    return Err(BlendError::PlacementOutOfBounds {
                        x: placed[0],
                        y: placed[1],
                        canvas: (width, height),
                    });
                }
                None => {}
            }
        }
    }

    mask.validate_interior()?;

    debug!(
        "Composed {}x{} source at ({}, {}) onto {width}x{height} canvas, active bounds {active_bounds:?}",
        source.width(),
        source.height(),
        offset[0],
        offset[1],
    );

    Ok(Composite {
        source: composite,
        mask,
        active_bounds,
    })
}

fn canvas_position(placed: [i64; 2], dimensions: (usize, usize)) -> Option<[usize; 2]> {
    let x = usize::try_from(placed[0]).ok().filter(|&x| x < dimensions.0)?;
    let y = usize::try_from(placed[1]).ok().filter(|&y| y < dimensions.1)?;
    Some([x, y])
}
