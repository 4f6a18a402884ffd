//! Input/output operations, configuration and error handling

/// Command-line interface and single-blend orchestration
pub mod cli;
/// Solver constants and defaults
pub mod configuration;
/// Error types for blending operations
pub mod error;
/// Image file loading and saving
pub mod image;
/// Logger initialisation
pub mod logging;
/// Terminal progress display
pub mod progress;
