//! Dense numbering of the pixels that need solving
//!
//! Every active pixel in the strict interior of the canvas becomes one
//! unknown. Ids are handed out in raster order (increasing `y`, then `x`), so
//! the same mask always produces the same numbering.

use std::collections::HashMap;

use crate::spatial::canvas::Mask;

/// Mapping between canvas pixels and dense variable ids in `[0, N)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableIndexMap {
    width: usize,
    height: usize,
    /// `[x, y]` of each variable, indexed by variable id
    positions: Vec<[usize; 2]>,
    /// Flat pixel id (`y * width + x`) to variable id
    lookup: HashMap<usize, usize>,
}

impl VariableIndexMap {
    /// Number every active pixel of the strict interior in raster order
    ///
    /// Active pixels on the outer border are skipped. An all-zero mask yields
    /// an empty map.
    pub fn build(mask: &Mask) -> Self {
        let (width, height) = mask.dimensions();
        let mut positions = Vec::new();
        let mut lookup = HashMap::new();

        for y in 1..height.saturating_sub(1) {
            for x in 1..width.saturating_sub(1) {
                if mask.is_active(x, y) {
                    lookup.insert(y * width + x, positions.len());
                    positions.push([x, y]);
                }
            }
        }

        Self {
            width,
            height,
            positions,
            lookup,
        }
    }

    /// Number of variables
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether no pixel needs solving
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Canvas dimensions as (width, height)
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Flat pixel id of `(x, y)`
    pub const fn pixel_id(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Variable id for a flat pixel id
    pub fn variable_for_pixel_id(&self, pixel_id: usize) -> Option<usize> {
        self.lookup.get(&pixel_id).copied()
    }

    /// Variable id for the pixel at `(x, y)`
    pub fn variable_at(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.variable_for_pixel_id(self.pixel_id(x, y))
    }

    /// `[x, y]` of a variable
    pub fn position(&self, variable: usize) -> Option<[usize; 2]> {
        self.positions.get(variable).copied()
    }

    /// `[x, y]` of every variable in id order
    pub fn positions(&self) -> &[[usize; 2]] {
        &self.positions
    }
}
