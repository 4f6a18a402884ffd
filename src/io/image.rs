//! Image file loading and saving for the solver's packed representations

use std::path::Path;

use image::{GrayImage, Rgb, RgbImage};

use crate::io::configuration::MAX_CANVAS_DIMENSION;
use crate::io::error::{BlendError, Result, invalid_parameter};
use crate::math::color::pack_rgb;
use crate::spatial::canvas::{Mask, PackedImage};

/// Convert an 8-bit RGB buffer into packed pixels
pub fn packed_from_rgb(rgb: &RgbImage) -> PackedImage {
    let mut packed = PackedImage::new(rgb.width() as usize, rgb.height() as usize, 0);
    for (x, y, pixel) in rgb.enumerate_pixels() {
        packed.set(x as usize, y as usize, pack_rgb(pixel.0));
    }
    packed
}

/// Convert packed pixels into an 8-bit RGB buffer
pub fn rgb_from_packed(image: &PackedImage) -> RgbImage {
    RgbImage::from_fn(image.width() as u32, image.height() as u32, |x, y| {
        Rgb(image.get_rgb(x as usize, y as usize).unwrap_or([0, 0, 0]))
    })
}

/// Convert an 8-bit grayscale buffer into a mask (nonzero is active)
pub fn mask_from_luma(luma: &GrayImage) -> Mask {
    let mut mask = Mask::new(luma.width() as usize, luma.height() as usize);
    for (x, y, pixel) in luma.enumerate_pixels() {
        mask.set(x as usize, y as usize, pixel.0[0]);
    }
    mask
}

fn open_checked(path: &Path) -> Result<image::DynamicImage> {
    let img = image::open(path).map_err(|e| BlendError::ImageLoad {
        path: path.to_path_buf(),
        source: e,
    })?;

    let largest = img.width().max(img.height()) as usize;
    if largest > MAX_CANVAS_DIMENSION {
        return Err(invalid_parameter(
            "image",
            &path.display(),
            &format!("dimension {largest} exceeds the limit of {MAX_CANVAS_DIMENSION}"),
        ));
    }

    Ok(img)
}

/// Load a color image from any format the `image` crate understands
///
/// Alpha is discarded.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be opened or decoded
/// - A dimension exceeds the canvas size limit
pub fn load_color_image(path: &Path) -> Result<PackedImage> {
    let img = open_checked(path)?;
    Ok(packed_from_rgb(&img.to_rgb8()))
}

/// Load a mask image, converting it to 8-bit luma
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be opened or decoded
/// - A dimension exceeds the canvas size limit
pub fn load_mask(path: &Path) -> Result<Mask> {
    let img = open_checked(path)?;
    Ok(mask_from_luma(&img.to_luma8()))
}

/// Save a packed image, creating parent directories as needed
///
/// The format is chosen from the file extension.
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The image cannot be encoded or written
pub fn save_color_image(image: &PackedImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| BlendError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    rgb_from_packed(image)
        .save(path)
        .map_err(|e| BlendError::ImageExport {
            path: path.to_path_buf(),
            source: e,
        })
}
