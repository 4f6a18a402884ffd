//! Gradient-domain (Poisson) image blending with an implicit sparse Jacobi solver
//!
//! A source region is pasted into a destination so that its gradients are kept
//! while its border matches the destination. Every masked pixel becomes one
//! unknown of a discrete Poisson system that is solved by Jacobi iteration
//! without ever materialising the sparse matrix.

#![forbid(unsafe_code)]

/// System assembly, Jacobi iteration, residual evaluation and reconstruction
pub mod algorithm;
/// Input/output operations and error handling
pub mod io;
/// Packed color encoding and channel utilities
pub mod math;
/// Canvas images, masks and source placement
pub mod spatial;

pub use algorithm::assembly::LinearSystem;
pub use algorithm::executor::{
    BlendOutput, SolveReport, SolveStatus, SolverConfig, blend, solve,
};
pub use algorithm::reconstruction::reconstruct_image;
pub use io::error::{BlendError, Result};
pub use spatial::{Mask, PackedImage};
