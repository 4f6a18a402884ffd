//! Spatial data structures and canvas placement
//!
//! This module contains spatial-related functionality including:
//! - Packed color images and solve masks sharing one canvas
//! - Placement of a source region into the destination canvas

/// Packed color images, masks and interior checks
pub mod canvas;
/// Pasting a source region and its mask into the destination canvas
pub mod composite;

pub use canvas::{Mask, PackedImage};
