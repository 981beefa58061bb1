//! Configuration for the demo drivers.

pub mod options;

pub use options::DemoOptions;
