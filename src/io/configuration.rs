//! Solver constants and runtime configuration defaults

// Stopping rule for the driving loop
/// Residual norm at or below which the solve is considered converged
pub const DEFAULT_CONVERGENCE_THRESHOLD: f64 = 1.0;

/// Number of Jacobi sweeps performed between residual checks
pub const DEFAULT_SWEEP_BATCH: usize = 100;

// Guarantees termination on disconnected or pathological masks
/// Maximum sweeps before the solve gives up
pub const DEFAULT_MAX_SWEEPS: usize = 50_000;

// Safety limit to prevent excessive memory allocation
/// Maximum allowed canvas dimension
pub const MAX_CANVAS_DIMENSION: usize = 16_384;

/// Largest value a color channel can take after reconstruction
pub const CHANNEL_MAX: f64 = 255.0;

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;

// Logging
/// Log level used when neither `--verbose` nor `--quiet` is given
pub const DEFAULT_LOG_LEVEL: &str = "info";

// Output settings
/// Suffix added to the destination filename for the blended output
pub const OUTPUT_SUFFIX: &str = "_blended";
/// Extension used for the blended output
pub const OUTPUT_EXTENSION: &str = "png";
