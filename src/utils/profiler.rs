//! Deterministic call profiler for instrumented evaluation.
//!
//! Every `enter`/`exit` pair is timed. `tottime` excludes time spent in nested
//! instrumented calls, `cumtime` includes it.

use crate::core::traits::{Call, Instrument};
use std::fmt;
use std::time::{Duration, Instant};

/// Per-call statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CallStats {
    pub calls: usize,
    pub total: Duration,
    pub cumulative: Duration,
}

struct Frame {
    call: Call,
    start: Instant,
    children: Duration,
}

/// Records call counts and times per [`Call`].
pub struct CallProfiler {
    stats: [CallStats; Call::COUNT],
    stack: Vec<Frame>,
}

impl CallProfiler {
    pub fn new() -> Self {
        CallProfiler {
            stats: [CallStats::default(); Call::COUNT],
            stack: Vec::with_capacity(8),
        }
    }

    pub fn stats(&self, call: Call) -> CallStats {
        self.stats[call.index()]
    }

    /// Snapshot of the recorded calls, ordered by cumulative time.
    pub fn report(&self) -> ProfileReport {
        let mut rows: Vec<ProfileRow> = Call::ALL
            .iter()
            .map(|&call| ProfileRow { call, stats: self.stats(call) })
            .filter(|row| row.stats.calls > 0)
            .collect();
        rows.sort_by(|a, b| {
            b.stats
                .cumulative
                .cmp(&a.stats.cumulative)
                .then(a.call.name().cmp(b.call.name()))
        });
        ProfileReport { rows }
    }
}

impl Default for CallProfiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Instrument for CallProfiler {
    fn enter(&mut self, call: Call) {
        self.stack.push(Frame {
            call,
            start: Instant::now(),
            children: Duration::ZERO,
        });
    }

    fn exit(&mut self, call: Call) {
        let Some(frame) = self.stack.pop() else {
            log::warn!("profiler: exit({}) without matching enter", call.name());
            return;
        };
        debug_assert_eq!(frame.call, call, "unbalanced profiler frames");
        let elapsed = frame.start.elapsed();
        let entry = &mut self.stats[frame.call.index()];
        entry.calls += 1;
        entry.total += elapsed.saturating_sub(frame.children);
        // Recursive frames are already counted by the outermost one.
        if !self.stack.iter().any(|f| f.call == frame.call) {
            entry.cumulative += elapsed;
        }
        if let Some(parent) = self.stack.last_mut() {
            parent.children += elapsed;
        }
    }
}

/// One row of the profile table.
#[derive(Clone, Debug)]
pub struct ProfileRow {
    pub call: Call,
    pub stats: CallStats,
}

/// Printable profile, ordered by cumulative time.
#[derive(Clone, Debug)]
pub struct ProfileReport {
    pub rows: Vec<ProfileRow>,
}

impl ProfileReport {
    pub fn total_calls(&self) -> usize {
        self.rows.iter().map(|r| r.stats.calls).sum()
    }

    /// Sum of self time over all rows.
    pub fn total_time(&self) -> Duration {
        self.rows.iter().map(|r| r.stats.total).sum()
    }

    pub fn row(&self, call: Call) -> Option<&ProfileRow> {
        self.rows.iter().find(|r| r.call == call)
    }
}

fn per_call(d: Duration, calls: usize) -> f64 {
    if calls == 0 { 0.0 } else { d.as_secs_f64() / calls as f64 }
}

impl fmt::Display for ProfileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "         {} function calls in {:.3} seconds",
            self.total_calls(),
            self.total_time().as_secs_f64()
        )?;
        writeln!(f)?;
        writeln!(f, "   Ordered by: cumulative time")?;
        writeln!(f)?;
        writeln!(f, "   ncalls  tottime  percall  cumtime  percall function")?;
        for row in &self.rows {
            let s = row.stats;
            writeln!(
                f,
                "{:>9} {:>8.3} {:>8.3} {:>8.3} {:>8.3} {}",
                s.calls,
                s.total.as_secs_f64(),
                per_call(s.total, s.calls),
                s.cumulative.as_secs_f64(),
                per_call(s.cumulative, s.calls),
                row.call.name()
            )?;
        }
        Ok(())
    }
}
