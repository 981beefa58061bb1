//! Driver tasks run by the `matwrap` binary.
//!
//! Each task evaluates the example expression (see [`crate::expression`]),
//! writes a human-readable section to `out` and returns what it measured.

use crate::config::DemoOptions;
use crate::error::MatError;
use crate::expression::{EXPRESSION, compute, evaluate, example_operands};
use crate::matrix::Matrix;
use crate::utils::memory::{self, SiteDelta, SiteScope, Snapshot};
use crate::utils::profiler::{CallProfiler, ProfileReport};
use crate::utils::timing::{TimingReport, time_iterations};
use std::io::Write;

/// Print `A`, `B` and the value of the example expression.
pub fn demonstrate_expression(out: &mut impl Write) -> Result<Matrix, MatError> {
    let (a, b) = example_operands()?;
    let result = evaluate(&a, &b, &mut ())?;
    writeln!(out, "Complex Expression Result:")?;
    writeln!(out, "A:\n {a}")?;
    writeln!(out, "B:\n {b}")?;
    writeln!(out, "{EXPRESSION}:\n {result}")?;
    Ok(result)
}

/// Time `options.iterations` evaluations.
pub fn measure_time(options: &DemoOptions, out: &mut impl Write) -> Result<TimingReport, MatError> {
    let (a, b) = example_operands()?;
    let report = time_iterations(options.iterations, || evaluate(&a, &b, &mut ()))?;
    writeln!(out, "\nExecution Time:")?;
    writeln!(out, "{report}")?;
    Ok(report)
}

/// Compare allocation snapshots around one evaluation and print the top sites.
pub fn measure_memory(options: &DemoOptions, out: &mut impl Write) -> Result<Vec<SiteDelta>, MatError> {
    if !memory::is_tracking() {
        log::warn!("allocation tracking inactive: TrackingAllocator is not the global allocator");
    }
    let (a, b) = example_operands()?;
    let mut scope = SiteScope::new();
    let before = Snapshot::take();
    let result = evaluate(&a, &b, &mut scope)?;
    let after = Snapshot::take();
    drop(result);

    let mut deltas = after.compare_to(&before);
    deltas.truncate(options.top_n);
    writeln!(out, "\nMemory Footprint (Top {} sites):", options.top_n)?;
    for delta in &deltas {
        writeln!(out, "{delta}")?;
    }
    log::debug!(
        "live bytes {} -> {}, peak {}",
        before.live_bytes,
        after.live_bytes,
        after.peak_bytes
    );
    Ok(deltas)
}

/// Profile `options.iterations` evaluations and print the call table.
pub fn profile_expression(options: &DemoOptions, out: &mut impl Write) -> Result<ProfileReport, MatError> {
    let (a, b) = example_operands()?;
    let mut profiler = CallProfiler::new();
    compute(&a, &b, options.iterations, &mut profiler)?;
    let report = profiler.report();
    writeln!(out, "\nCall Profile:")?;
    write!(out, "{report}")?;
    Ok(report)
}

/// Run all tasks in order.
pub fn run_all(options: &DemoOptions, out: &mut impl Write) -> Result<(), MatError> {
    log::info!("running expression demo with {options:?}");
    demonstrate_expression(out)?;
    measure_time(options, out)?;
    measure_memory(options, out)?;
    profile_expression(options, out)?;
    out.flush()?;
    Ok(())
}
