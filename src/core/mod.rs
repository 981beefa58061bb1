//! Core traits shared by the matrix drivers and instrumentation.

pub mod traits;

pub use traits::{Call, Instrument};
