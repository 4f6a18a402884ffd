/// Implicit assembly of the Poisson system from source, mask and destination
pub mod assembly;
/// Driving loop, stopping rule, cancellation and background solving
pub mod executor;
/// Dense numbering of the pixels to solve
pub mod indexing;
/// Double-buffered Jacobi sweeps
pub mod jacobi;
/// Writing estimates back into the destination image
pub mod reconstruction;
/// Residual norm used as the convergence signal
pub mod residual;
