//! Allocation Tracking
//!
//! Counts live parameter records so leaks and double releases show up as a
//! non-zero count. Every record carries a [`Registration`] that increments the
//! counter when the record is built and decrements it exactly once when the
//! record is dropped.
//!
//! The tracker is injected into every factory call instead of living in a
//! global, so each test and each runtime context owns an independent count.
//! Records are dropped on the replay task, so the counters are atomic.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{error, trace};

use crate::params::error::{ParamsError, Result};

/// Live record counter
#[derive(Debug, Default)]
pub struct AllocationTracker {
    live: AtomicI64,
    peak: AtomicI64,
    total_allocated: AtomicU64,
    total_released: AtomicU64,
}

/// Point-in-time view of a tracker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackerStats {
    /// Records currently alive
    pub live: i64,
    /// Highest live count observed
    pub peak: i64,
    /// Records ever constructed
    pub total_allocated: u64,
    /// Records ever dropped
    pub total_released: u64,
}

impl AllocationTracker {
    /// Create a new tracker with zero live records
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Record one construction
    pub fn increase(&self) {
        let live = self.live.fetch_add(1, Ordering::AcqRel) + 1;
        self.peak.fetch_max(live, Ordering::AcqRel);
        self.total_allocated.fetch_add(1, Ordering::Relaxed);
        trace!("alloc count: {}", live);
    }

    /// Record one destruction
    ///
    /// A count going negative means some record was released twice. The count
    /// is left negative so tests can see it.
    pub fn decrease(&self) {
        let live = self.live.fetch_sub(1, Ordering::AcqRel) - 1;
        self.total_released.fetch_add(1, Ordering::Relaxed);
        if live < 0 {
            error!("alloc count went negative: {}", live);
        }
        debug_assert!(live >= 0, "allocation count went negative: {}", live);
        trace!("alloc count: {}", live);
    }

    /// Number of records currently alive
    pub fn count(&self) -> i64 {
        self.live.load(Ordering::Acquire)
    }

    /// True when no records are alive
    pub fn is_balanced(&self) -> bool {
        self.count() == 0
    }

    /// Fail with [`ParamsError::AllocationImbalance`] unless the count is zero
    pub fn check_balanced(&self) -> Result<()> {
        match self.count() {
            0 => Ok(()),
            n => Err(ParamsError::AllocationImbalance(n)),
        }
    }

    /// Get tracker statistics
    pub fn stats(&self) -> TrackerStats {
        TrackerStats {
            live: self.count(),
            peak: self.peak.load(Ordering::Acquire),
            total_allocated: self.total_allocated.load(Ordering::Relaxed),
            total_released: self.total_released.load(Ordering::Relaxed),
        }
    }
}

/// Registration of one record with a tracker
///
/// Increments on creation, decrements on drop. Not `Clone`: a copied record
/// must take its own registration.
#[derive(Debug)]
pub struct Registration {
    tracker: Arc<AllocationTracker>,
}

impl Registration {
    pub(crate) fn new(tracker: &Arc<AllocationTracker>) -> Self {
        tracker.increase();
        Self {
            tracker: Arc::clone(tracker),
        }
    }

    /// Tracker this registration counts against
    pub fn tracker(&self) -> &Arc<AllocationTracker> {
        &self.tracker
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.tracker.decrease();
    }
}
