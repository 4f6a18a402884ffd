//! Error types for system assembly, solving and image I/O

use std::fmt;
use std::path::PathBuf;

/// Main error type for all blending operations
#[derive(Debug)]
pub enum BlendError {
    /// Failed to load an input image from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to save the blended image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Two images that must share a canvas have different sizes
    DimensionMismatch {
        /// Name of the input that disagrees with the reference
        input: &'static str,
        /// Expected dimensions (width, height)
        expected: (usize, usize),
        /// Actual dimensions (width, height)
        actual: (usize, usize),
    },

    /// An active mask pixel cannot be solved for
    ///
    /// Occurs when an active pixel lies on the outermost row or column of the
    /// canvas, which would leave it without four well-defined neighbors.
    InvalidMask {
        /// Column of the offending pixel
        x: usize,
        /// Row of the offending pixel
        y: usize,
        /// Description of what is wrong with the pixel
        reason: String,
    },

    /// An active mask pixel falls outside the destination after placement
    PlacementOutOfBounds {
        /// Placement column of the offending pixel (may be negative)
        x: i64,
        /// Placement row of the offending pixel (may be negative)
        y: i64,
        /// Destination dimensions (width, height)
        canvas: (usize, usize),
    },

    /// The sweep budget ran out before the residual met the threshold
    NonConvergence {
        /// Sweeps performed before giving up
        sweeps: usize,
        /// Residual norm after the last sweep
        residual: f64,
        /// Threshold the residual had to reach
        threshold: f64,
    },

    /// The solve was cancelled before it converged
    Cancelled {
        /// Sweeps performed before cancellation was observed
        sweeps: usize,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Logger could not be started
    Logging {
        /// Description of the failure
        reason: String,
    },

    /// A background solve worker panicked
    WorkerPanicked,
}

impl fmt::Display for BlendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::DimensionMismatch {
                input,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Dimension mismatch for {input}: expected {}x{}, got {}x{}",
                    expected.0, expected.1, actual.0, actual.1
                )
            }
            Self::InvalidMask { x, y, reason } => {
                write!(f, "Invalid mask at ({x}, {y}): {reason}")
            }
            Self::PlacementOutOfBounds { x, y, canvas } => {
                write!(
                    f,
                    "Active mask pixel placed at ({x}, {y}) lies outside the {}x{} destination",
                    canvas.0, canvas.1
                )
            }
            Self::NonConvergence {
                sweeps,
                residual,
                threshold,
            } => {
                write!(
                    f,
                    "Solver did not converge after {sweeps} sweeps (residual {residual:.4} > threshold {threshold})"
                )
            }
            Self::Cancelled { sweeps } => {
                write!(f, "Solve cancelled after {sweeps} sweeps")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::Logging { reason } => {
                write!(f, "Failed to initialise logging: {reason}")
            }
            Self::WorkerPanicked => write!(f, "Background solve worker panicked"),
        }
    }
}

impl std::error::Error for BlendError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for blending results
pub type Result<T> = std::result::Result<T, BlendError>;

impl From<image::ImageError> for BlendError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for BlendError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> BlendError {
    BlendError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a dimension mismatch error, or `Ok` when the sizes agree
///
/// # Errors
///
/// Returns [`BlendError::DimensionMismatch`] if `actual` differs from `expected`
pub fn ensure_dimensions(
    input: &'static str,
    expected: (usize, usize),
    actual: (usize, usize),
) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(BlendError::DimensionMismatch {
            input,
            expected,
            actual,
        })
    }
}
