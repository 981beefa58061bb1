//! Wall-clock timing of a fixed-iteration loop.

use crate::error::MatError;
use std::fmt;
use std::time::{Duration, Instant};

/// Monotonic stopwatch started on construction.
pub struct Stopwatch {
    start: Instant,
}

impl Stopwatch {
    pub fn start() -> Self {
        Stopwatch { start: Instant::now() }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Result of a timed loop.
#[derive(Clone, Debug)]
pub struct TimingReport {
    pub iterations: usize,
    pub elapsed: Duration,
}

impl TimingReport {
    /// Mean time per iteration (zero when no iterations ran).
    pub fn per_iteration(&self) -> Duration {
        match u32::try_from(self.iterations) {
            Ok(0) => Duration::ZERO,
            Ok(n) => self.elapsed / n,
            Err(_) => Duration::from_secs_f64(self.elapsed.as_secs_f64() / self.iterations as f64),
        }
    }
}

impl fmt::Display for TimingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Time taken for {} iterations: {:.6} seconds",
            self.iterations,
            self.elapsed.as_secs_f64()
        )
    }
}

/// Run `f` `iterations` times and report the elapsed wall-clock time.
///
/// Stops at the first error.
pub fn time_iterations<T>(
    iterations: usize,
    mut f: impl FnMut() -> Result<T, MatError>,
) -> Result<TimingReport, MatError> {
    let watch = Stopwatch::start();
    for _ in 0..iterations {
        std::hint::black_box(f()?);
    }
    let elapsed = watch.elapsed();
    log::debug!("timed {iterations} iterations in {elapsed:?}");
    Ok(TimingReport { iterations, elapsed })
}
