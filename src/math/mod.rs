//! Mathematical utilities for color channel handling

/// Packed RGB encoding, channel planes and quantization
pub mod color;
