//! Writing solved estimates back into the destination image

use crate::algorithm::assembly::LinearSystem;
use crate::io::error::{Result, ensure_dimensions};
use crate::math::color::pack_estimate;
use crate::spatial::canvas::{Mask, PackedImage};

/// Copy `destination` and overwrite every solved pixel with its estimate
///
/// Each channel is rounded to the nearest integer and clamped to `[0, 255]`.
/// Inactive pixels, and active pixels the system has no variable for, keep
/// the destination color. The input image is not modified.
///
/// # Errors
///
/// Returns an error if `destination`, `mask` and the system's canvas differ
/// in size
pub fn reconstruct_image(
    destination: &PackedImage,
    mask: &Mask,
    system: &LinearSystem,
) -> Result<PackedImage> {
    let dimensions = destination.dimensions();
    ensure_dimensions("mask", dimensions, mask.dimensions())?;
    ensure_dimensions("system canvas", dimensions, system.index().dimensions())?;

    let mut output = destination.clone();

    for (x, y) in mask.active_pixels() {
        let Some(variable) = system.index().variable_at(x, y) else {
            continue;
        };
        if let Some(&estimate) = system.estimate().get(variable) {
            output.set(x, y, pack_estimate(estimate));
        }
    }

    Ok(output)
}
