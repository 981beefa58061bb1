//! Matrix module: the broadcasting `Matrix` wrapper over an ndarray buffer.

pub mod dense;
pub mod format;
pub mod input;
pub mod ops;

pub use dense::{Buffer, DType, Element, Matrix, Native};
pub use ops::Exponent;
