//! Allocation snapshots with `TrackingAllocator` installed as the global allocator.
//!
//! Kept as a single test so no other test thread opens sites while it runs.

use matwrap::expression::{evaluate, example_operands};
use matwrap::utils::memory::{self, Site, SiteScope, Snapshot, TrackingAllocator};
use matwrap::{Call, DemoOptions, tasks};

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator;

#[test]
fn snapshots_attribute_allocations_to_calls() {
    let (a, b) = example_operands().unwrap();
    assert!(memory::is_tracking());

    let mut scope = SiteScope::new();
    let before = Snapshot::take();
    let result = evaluate(&a, &b, &mut scope).unwrap();
    let after = Snapshot::take();

    // Every step builds a new 2x2 buffer of i64.
    for call in [Call::Add, Call::Sub, Call::Pow, Call::Matmul] {
        let site = after.site(Site::Call(call));
        let old = before.site(Site::Call(call));
        assert!(
            site.allocated_bytes - old.allocated_bytes >= 4 * std::mem::size_of::<i64>(),
            "{} allocated too little",
            call.name()
        );
    }
    assert_eq!(after.site(Site::Call(Call::Mul)), before.site(Site::Call(Call::Mul)));

    let deltas = after.compare_to(&before);
    assert!(!deltas.is_empty());
    for pair in deltas.windows(2) {
        assert!(pair[0].size_diff.abs() >= pair[1].size_diff.abs());
    }
    assert!(after.peak_bytes >= after.live_bytes);
    drop(result);

    let mut buf = Vec::new();
    let options = DemoOptions::default().with_top_n(3);
    let printed = tasks::measure_memory(&options, &mut buf).unwrap();
    assert!(!printed.is_empty() && printed.len() <= 3);
    let text = String::from_utf8(buf).unwrap();
    assert!(text.contains("size="));
}
