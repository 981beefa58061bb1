//! Allocation tracking with per-call-site snapshots.
//!
//! [`TrackingAllocator`] forwards to the system allocator and counts every
//! allocation and deallocation against the call site that is active on the
//! current thread. A binary opts in with
//!
//! ```rust,ignore
//! #[global_allocator]
//! static GLOBAL: matwrap::utils::memory::TrackingAllocator = matwrap::utils::memory::TrackingAllocator;
//! ```
//!
//! Sites are opened by [`SiteScope`], an [`Instrument`] that marks the active
//! [`Call`] while an expression is evaluated. [`Snapshot::take`] copies the
//! counters without allocating; [`Snapshot::compare_to`] returns the per-site
//! change between two snapshots, largest first.
//!
//! A site's size is the net of bytes allocated minus bytes freed while it was
//! active, so memory freed under a different site is not credited back to the
//! site that allocated it.

use crate::core::traits::{Call, Instrument};
use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

const SLOTS: usize = Call::COUNT + 1;
const UNSCOPED: usize = 0;

static ALLOC_COUNT: [AtomicUsize; SLOTS] = [const { AtomicUsize::new(0) }; SLOTS];
static ALLOC_BYTES: [AtomicUsize; SLOTS] = [const { AtomicUsize::new(0) }; SLOTS];
static FREE_COUNT: [AtomicUsize; SLOTS] = [const { AtomicUsize::new(0) }; SLOTS];
static FREE_BYTES: [AtomicUsize; SLOTS] = [const { AtomicUsize::new(0) }; SLOTS];
static LIVE_BYTES: AtomicUsize = AtomicUsize::new(0);
static PEAK_BYTES: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    static CURRENT_SITE: Cell<usize> = const { Cell::new(UNSCOPED) };
}

fn current_slot() -> usize {
    CURRENT_SITE.try_with(Cell::get).unwrap_or(UNSCOPED)
}

fn record_alloc(size: usize) {
    let slot = current_slot();
    ALLOC_COUNT[slot].fetch_add(1, Ordering::Relaxed);
    ALLOC_BYTES[slot].fetch_add(size, Ordering::Relaxed);
    let live = LIVE_BYTES.fetch_add(size, Ordering::Relaxed) + size;
    PEAK_BYTES.fetch_max(live, Ordering::Relaxed);
}

fn record_free(size: usize) {
    let slot = current_slot();
    FREE_COUNT[slot].fetch_add(1, Ordering::Relaxed);
    FREE_BYTES[slot].fetch_add(size, Ordering::Relaxed);
    LIVE_BYTES.fetch_sub(size, Ordering::Relaxed);
}

/// Counting wrapper around [`System`].
pub struct TrackingAllocator;

unsafe impl GlobalAlloc for TrackingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc(layout) };
        if !ptr.is_null() {
            record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc_zeroed(layout) };
        if !ptr.is_null() {
            record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) };
        record_free(layout.size());
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = unsafe { System.realloc(ptr, layout, new_size) };
        if !new_ptr.is_null() {
            record_free(layout.size());
            record_alloc(new_size);
        }
        new_ptr
    }
}

/// `true` once any allocation has been counted, i.e. [`TrackingAllocator`]
/// is installed as the global allocator.
pub fn is_tracking() -> bool {
    ALLOC_COUNT.iter().any(|c| c.load(Ordering::Relaxed) > 0)
}

/// Where an allocation was charged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Site {
    /// No instrumented call was active.
    Unscoped,
    Call(Call),
}

impl Site {
    fn from_slot(slot: usize) -> Site {
        match slot.checked_sub(1) {
            Some(i) => Site::Call(Call::ALL[i]),
            None => Site::Unscoped,
        }
    }

    fn slot(self) -> usize {
        match self {
            Site::Unscoped => UNSCOPED,
            Site::Call(call) => call.index() + 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Site::Unscoped => "<unscoped>",
            Site::Call(call) => call.name(),
        }
    }
}

/// Cumulative counters of one site.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SiteCounters {
    pub allocations: usize,
    pub allocated_bytes: usize,
    pub deallocations: usize,
    pub freed_bytes: usize,
}

impl SiteCounters {
    /// Net bytes still attributed to the site.
    pub fn size(&self) -> i64 {
        self.allocated_bytes as i64 - self.freed_bytes as i64
    }

    /// Net number of blocks still attributed to the site.
    pub fn count(&self) -> i64 {
        self.allocations as i64 - self.deallocations as i64
    }

    fn is_idle(&self) -> bool {
        *self == SiteCounters::default()
    }
}

/// Point-in-time copy of all allocation counters.
#[derive(Clone, Debug)]
pub struct Snapshot {
    sites: [SiteCounters; SLOTS],
    pub live_bytes: usize,
    pub peak_bytes: usize,
}

impl Snapshot {
    /// Copy the current counters. Does not allocate.
    pub fn take() -> Snapshot {
        let mut sites = [SiteCounters::default(); SLOTS];
        for (slot, s) in sites.iter_mut().enumerate() {
            *s = SiteCounters {
                allocations: ALLOC_COUNT[slot].load(Ordering::Relaxed),
                allocated_bytes: ALLOC_BYTES[slot].load(Ordering::Relaxed),
                deallocations: FREE_COUNT[slot].load(Ordering::Relaxed),
                freed_bytes: FREE_BYTES[slot].load(Ordering::Relaxed),
            };
        }
        Snapshot {
            sites,
            live_bytes: LIVE_BYTES.load(Ordering::Relaxed),
            peak_bytes: PEAK_BYTES.load(Ordering::Relaxed),
        }
    }

    pub fn site(&self, site: Site) -> SiteCounters {
        self.sites[site.slot()]
    }

    /// Per-site changes from `old` to `self`, sorted by absolute size change,
    /// then absolute count change. Sites idle in both snapshots are omitted.
    pub fn compare_to(&self, old: &Snapshot) -> Vec<SiteDelta> {
        let mut deltas: Vec<SiteDelta> = (0..SLOTS)
            .filter(|&slot| !(self.sites[slot].is_idle() && old.sites[slot].is_idle()))
            .map(|slot| {
                let (new, old) = (self.sites[slot], old.sites[slot]);
                SiteDelta {
                    site: Site::from_slot(slot),
                    size: new.size(),
                    size_diff: new.size() - old.size(),
                    count: new.count(),
                    count_diff: new.count() - old.count(),
                }
            })
            .collect();
        deltas.sort_by(|a, b| {
            b.size_diff
                .abs()
                .cmp(&a.size_diff.abs())
                .then(b.count_diff.abs().cmp(&a.count_diff.abs()))
                .then(a.site.name().cmp(b.site.name()))
        });
        deltas
    }
}

/// Change of one site between two snapshots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteDelta {
    pub site: Site,
    pub size: i64,
    pub size_diff: i64,
    pub count: i64,
    pub count_diff: i64,
}

impl fmt::Display for SiteDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: size={} B ({:+} B), count={} ({:+})",
            self.site.name(),
            self.size,
            self.size_diff,
            self.count,
            self.count_diff
        )?;
        if self.count != 0 {
            write!(f, ", average={} B", self.size / self.count)?;
        }
        Ok(())
    }
}

/// [`Instrument`] that charges allocations to the active [`Call`].
pub struct SiteScope {
    saved: Vec<usize>,
}

impl SiteScope {
    pub fn new() -> Self {
        // Reserved up front so entering a site never allocates.
        SiteScope { saved: Vec::with_capacity(16) }
    }
}

impl Default for SiteScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Instrument for SiteScope {
    fn enter(&mut self, call: Call) {
        let previous = CURRENT_SITE.with(|c| c.replace(Site::Call(call).slot()));
        self.saved.push(previous);
    }

    fn exit(&mut self, _call: Call) {
        let previous = self.saved.pop().unwrap_or(UNSCOPED);
        CURRENT_SITE.with(|c| c.set(previous));
    }
}

impl Drop for SiteScope {
    fn drop(&mut self) {
        if let Some(&outermost) = self.saved.first() {
            CURRENT_SITE.with(|c| c.set(outermost));
        }
    }
}
