pub mod jacobi;
pub mod reconstruction;
