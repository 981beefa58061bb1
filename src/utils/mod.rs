//! Instrumentation services: wall-clock timing, allocation snapshots and call profiling.

pub mod memory;
pub mod profiler;
pub mod timing;

pub use memory::{SiteDelta, SiteScope, Snapshot, TrackingAllocator};
pub use profiler::{CallProfiler, ProfileReport};
pub use timing::{Stopwatch, TimingReport, time_iterations};
