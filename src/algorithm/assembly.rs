//! Implicit sparse system assembly for the discrete Poisson equation
//!
//! Each active pixel `p` contributes one equation per color channel:
//!
//! ```text
//! D[p] * x[p] - sum(x[q] for active neighbors q) = b[p]
//! ```
//!
//! where `D[p]` counts the in-interior neighbors and `b[p]` collects the
//! destination color of every inactive neighbor (boundary condition) plus the
//! source gradient `src[p] - src[q]` towards every active neighbor (guidance
//! field). The matrix is never materialised; each variable keeps its degree,
//! its neighbor links and its right-hand side.

use log::info;

use crate::algorithm::indexing::VariableIndexMap;
use crate::io::error::{BlendError, Result, ensure_dimensions};
use crate::math::color::{CHANNELS, split_channels};
use crate::spatial::canvas::{Mask, PackedImage, is_strict_interior};

/// Per-channel `[r, g, b]` values in solver precision
pub type Rgb = [f64; CHANNELS];

/// Neighbor offsets `[dx, dy]` in link-slot order: left, right, up, down
pub const NEIGHBOR_OFFSETS: [[isize; 2]; 4] = [[-1, 0], [1, 0], [0, -1], [0, 1]];

/// One unknown of the system together with its equation
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// `[x, y]` canvas position of the pixel
    pub pixel: [usize; 2],
    /// Number of neighbors inside the strict interior (0 to 4)
    pub degree: u8,
    /// Variable id of each active neighbor, `None` for fixed or skipped neighbors
    pub links: [Option<usize>; 4],
    /// Right-hand side per channel
    pub rhs: Rgb,
}

impl Variable {
    /// Linked neighbor ids, skipping empty slots
    pub fn linked(&self) -> impl Iterator<Item = usize> + '_ {
        self.links.iter().flatten().copied()
    }
}

/// Assembled Poisson system plus the current per-variable estimate
///
/// The structure (index map, degrees, links, right-hand sides) is fixed after
/// [`LinearSystem::build`]; only the estimate changes while solving.
#[derive(Debug, Clone)]
pub struct LinearSystem {
    pub(crate) index: VariableIndexMap,
    pub(crate) variables: Vec<Variable>,
    pub(crate) estimate: Vec<Rgb>,
    pub(crate) scratch: Vec<Rgb>,
}

impl LinearSystem {
    /// Build the system for a source composite, mask and destination
    ///
    /// The estimate starts at zero for every variable and channel.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The three inputs do not share the same dimensions
    /// - An active mask pixel lies on the outer border
    /// - An active pixel has no neighbor inside the strict interior
    pub fn build(source: &PackedImage, mask: &Mask, destination: &PackedImage) -> Result<Self> {
        let dimensions = destination.dimensions();
        ensure_dimensions("source composite", dimensions, source.dimensions())?;
        ensure_dimensions("mask", dimensions, mask.dimensions())?;
        mask.validate_interior()?;

        let index = VariableIndexMap::build(mask);
        let variables = assemble(source, mask, destination, &index)?;

        info!(
            "Assembled {} variables on a {}x{} canvas",
            variables.len(),
            dimensions.0,
            dimensions.1
        );

        Ok(Self::from_parts(index, variables))
    }

    /// Combine a prebuilt index map and variable list with a zero estimate
    pub fn from_parts(index: VariableIndexMap, variables: Vec<Variable>) -> Self {
        let estimate = vec![[0.0; CHANNELS]; variables.len()];
        let scratch = estimate.clone();
        Self {
            index,
            variables,
            estimate,
            scratch,
        }
    }

    /// Number of variables
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Whether the system has no unknowns
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Pixel to variable mapping
    pub const fn index(&self) -> &VariableIndexMap {
        &self.index
    }

    /// Equations in variable id order
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Current estimate in variable id order
    pub fn estimate(&self) -> &[Rgb] {
        &self.estimate
    }

    /// Overwrite the estimate of one variable
    ///
    /// Returns `false` if `variable` is out of range.
    pub fn set_estimate(&mut self, variable: usize, value: Rgb) -> bool {
        self.estimate.get_mut(variable).is_some_and(|slot| {
            *slot = value;
            true
        })
    }

    /// Reset every estimate to zero
    pub fn reset_estimate(&mut self) {
        self.estimate.fill([0.0; CHANNELS]);
    }
}

/// Compute degree, neighbor links and right-hand side for every variable
///
/// Neighbors outside the strict interior are skipped entirely: they leave the
/// link empty and add nothing to the degree or the right-hand side.
///
/// # Errors
///
/// Returns [`BlendError::InvalidMask`] if a variable ends up with degree zero
pub fn assemble(
    source: &PackedImage,
    mask: &Mask,
    destination: &PackedImage,
    index: &VariableIndexMap,
) -> Result<Vec<Variable>> {
    let dimensions = index.dimensions();
    let source_planes = split_channels(source);
    let destination_planes = split_channels(destination);

    let sample = |planes: &[ndarray::Array2<f64>; CHANNELS], x: usize, y: usize| -> Rgb {
        let mut rgb = [0.0; CHANNELS];
        for (value, plane) in rgb.iter_mut().zip(planes) {
            *value = plane.get([y, x]).copied().unwrap_or(0.0);
        }
        rgb
    };

    let mut variables = Vec::with_capacity(index.len());

    for &[x, y] in index.positions() {
        let center = sample(&source_planes, x, y);
        let mut degree = 0_u8;
        let mut links = [None; 4];
        let mut rhs = [0.0; CHANNELS];

        for (link, offset) in links.iter_mut().zip(NEIGHBOR_OFFSETS) {
            let Some((nx, ny)) = x
                .checked_add_signed(offset[0])
                .zip(y.checked_add_signed(offset[1]))
            else {
                continue;
            };
            if !is_strict_interior(dimensions, nx, ny) {
                continue;
            }

            degree += 1;

            if mask.is_active(nx, ny) {
                *link = index.variable_at(nx, ny);
                let neighbor = sample(&source_planes, nx, ny);
                for ((b, p), q) in rhs.iter_mut().zip(center).zip(neighbor) {
                    *b += p - q;
                }
            } else {
                let boundary = sample(&destination_planes, nx, ny);
                for (b, value) in rhs.iter_mut().zip(boundary) {
                    *b += value;
                }
            }
        }

        if degree == 0 {
            return Err(BlendError::InvalidMask {
                x,
                y,
                reason: "active pixel has no neighbor inside the canvas interior".to_string(),
            });
        }

        variables.push(Variable {
            pixel: [x, y],
            degree,
            links,
            rhs,
        });
    }

    Ok(variables)
}
