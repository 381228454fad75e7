//! Process-wide allocation counting.
//!
//! The counter is global rather than thread-local on purpose: client and
//! server live in one process here, and the interesting number is the
//! whole cost of a request, including the server-side regeneration that
//! happens on worker threads.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicU64, Ordering};

static ALLOCS: AtomicU64 = AtomicU64::new(0);
static BYTES: AtomicU64 = AtomicU64::new(0);

/// System-allocator wrapper counting allocations and allocated bytes.
///
/// Install in the binary that runs measurements:
///
/// ```ignore
/// #[global_allocator]
/// static ALLOC: CountingAlloc = CountingAlloc;
/// ```
///
/// Without it, snapshots stay at zero and reports show zero allocations.
pub struct CountingAlloc;

// SAFETY: delegates to the System allocator unchanged; counters are
// relaxed atomics with no effect on allocation behavior.
unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        ALLOCS.fetch_add(1, Ordering::Relaxed);
        BYTES.fetch_add(layout.size() as u64, Ordering::Relaxed);
        unsafe { System.alloc(layout) }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) }
    }
}

/// Counter values at one point in time.
#[derive(Debug, Clone, Copy)]
pub struct AllocSnapshot {
    allocs: u64,
    bytes: u64,
}

/// Counters accumulated between two snapshots.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllocDelta {
    pub allocs: u64,
    pub bytes: u64,
}

pub fn snapshot() -> AllocSnapshot {
    AllocSnapshot {
        allocs: ALLOCS.load(Ordering::Relaxed),
        bytes: BYTES.load(Ordering::Relaxed),
    }
}

impl AllocSnapshot {
    pub fn since(self, start: AllocSnapshot) -> AllocDelta {
        AllocDelta {
            allocs: self.allocs.saturating_sub(start.allocs),
            bytes: self.bytes.saturating_sub(start.bytes),
        }
    }
}
