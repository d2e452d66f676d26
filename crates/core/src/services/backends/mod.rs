#[cfg(feature = "csc-backend")]
pub mod csc;

#[cfg(feature = "csc-backend")]
pub use csc::CscBackend;
