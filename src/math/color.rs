//! Packed `0x00RRGGBB` color codec and per-channel plane extraction
//!
//! Pixels travel through the solver as packed 24-bit colors in a 32-bit word.
//! The top byte is ignored on input and written as zero on output.

use ndarray::Array2;
use num_traits::ToPrimitive;

use crate::io::configuration::CHANNEL_MAX;
use crate::spatial::canvas::PackedImage;

/// Number of color channels carried by the solver
pub const CHANNELS: usize = 3;

/// Split a packed color into its `[r, g, b]` bytes
pub const fn unpack_rgb(packed: u32) -> [u8; CHANNELS] {
    [
        ((packed >> 16) & 0xFF) as u8,
        ((packed >> 8) & 0xFF) as u8,
        (packed & 0xFF) as u8,
    ]
}

/// Pack `[r, g, b]` bytes into a `0x00RRGGBB` word
pub const fn pack_rgb(rgb: [u8; CHANNELS]) -> u32 {
    ((rgb[0] as u32) << 16) | ((rgb[1] as u32) << 8) | (rgb[2] as u32)
}

/// Round a solved channel value to the nearest integer and clamp to `[0, 255]`
///
/// NaN maps to 0; infinities saturate to 0 or 255.
pub fn quantize_channel(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    num_traits::clamp(value.round(), 0.0, CHANNEL_MAX)
        .to_u8()
        .unwrap_or(0)
}

/// Quantize a solved `[r, g, b]` triple and pack it
pub fn pack_estimate(estimate: [f64; CHANNELS]) -> u32 {
    pack_rgb(estimate.map(quantize_channel))
}

/// Split an image into independent red, green and blue planes
///
/// Planes are indexed `[y, x]` like the image itself.
pub fn split_channels(image: &PackedImage) -> [Array2<f64>; CHANNELS] {
    let pixels = image.pixels();
    [16_u32, 8, 0].map(|shift| pixels.mapv(|packed| f64::from((packed >> shift) & 0xFF)))
}
