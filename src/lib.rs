//! matwrap: broadcasting matrix wrapper over Faer
//!
//! This crate provides an immutable `Matrix` type with element-wise arithmetic,
//! broadcasting, matrix product and power, plus timing, allocation-snapshot and
//! call-profiling instrumentation of one example expression.

pub mod config;
pub mod core;
pub mod error;
pub mod expression;
pub mod matrix;
pub mod tasks;
pub mod utils;

// Re-exports for convenience
pub use crate::config::*;
pub use crate::core::*;
pub use crate::error::*;
pub use crate::matrix::*;
