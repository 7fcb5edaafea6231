//! Catalog statistics.
//!
//! Counters are lock-free atomics updated on the load and completion paths;
//! [`CatalogStats`] is a point-in-time copy for display.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counters owned by a catalog.
#[derive(Debug, Default)]
pub(crate) struct CatalogCounters {
    submissions: AtomicU64,
    completions: AtomicU64,
    failures: AtomicU64,
    placeholders_delivered: AtomicU64,
    notifications: AtomicU64,
    duplicate_loads_skipped: AtomicU64,
}

impl CatalogCounters {
    pub(crate) fn submission(&self) {
        self.submissions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn completion(&self) {
        self.completions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn placeholder_delivered(&self) {
        self.placeholders_delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn notification(&self) {
        self.notifications.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn duplicate_skipped(&self) {
        self.duplicate_loads_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> CatalogStats {
        CatalogStats {
            submissions: self.submissions.load(Ordering::Relaxed),
            completions: self.completions.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            placeholders_delivered: self.placeholders_delivered.load(Ordering::Relaxed),
            notifications: self.notifications.load(Ordering::Relaxed),
            duplicate_loads_skipped: self.duplicate_loads_skipped.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of catalog activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogStats {
    /// Requests handed to the loader.
    pub submissions: u64,
    /// Requests that delivered a final image.
    pub completions: u64,
    /// Requests the loader gave up on.
    pub failures: u64,
    /// Per-position placeholders received.
    pub placeholders_delivered: u64,
    /// Ready notifications sent to observers.
    pub notifications: u64,
    /// `load` calls ignored because the position was already in flight.
    pub duplicate_loads_skipped: u64,
}

impl CatalogStats {
    /// Requests submitted but not yet completed or failed.
    pub fn in_flight(&self) -> u64 {
        self.submissions.saturating_sub(self.completions + self.failures)
    }
}

impl fmt::Display for CatalogStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "submitted {}, completed {}, failed {}, in flight {}, placeholders {}, notified {}, duplicates skipped {}",
            self.submissions,
            self.completions,
            self.failures,
            self.in_flight(),
            self.placeholders_delivered,
            self.notifications,
            self.duplicate_loads_skipped
        )
    }
}
