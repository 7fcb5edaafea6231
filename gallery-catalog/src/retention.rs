//! Memory-budgeted retention of delivered images.
//!
//! The catalog stores only weak handles to bitmaps. Something else has to keep
//! recently delivered images alive, otherwise they would vanish the moment the
//! loader drops its reference. `ImageRetainer` is that something: a moka cache
//! of strong references, weighted by decoded size and bounded by a byte budget.
//!
//! When moka evicts an entry (budget exceeded) or [`ImageRetainer::trim`] is
//! called, the retainer drops its strong reference. If nobody else holds the
//! bitmap either, the catalog's weak slot reads as empty on the next query.
//! That is the whole reclamation mechanism: there is no explicit invalidation
//! path from the retainer back into the catalog.
//!
//! Eviction is least-recently-delivered first, so the images of the current
//! scroll window survive while older ones are released.
//!
//! # Why moka?
//!
//! - Size-weighted eviction without explicit locking
//! - Safe to call from loader worker threads
//! - Bounded memory with a single configuration value

use std::fmt;

use moka::policy::EvictionPolicy;
use moka::sync::Cache;

use crate::bitmap::{bitmap_bytes, SharedBitmap};

/// Which per-position slot a retained bitmap belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RetainedKind {
    Image,
    Placeholder,
}

type RetainedKey = (RetainedKind, usize);

/// Strong-reference store that keeps catalog bitmaps alive within a budget.
pub struct ImageRetainer {
    /// `None` when retention is disabled.
    cache: Option<Cache<RetainedKey, SharedBitmap>>,
    budget_bytes: Option<u64>,
}

impl ImageRetainer {
    /// Create a retainer with the given byte budget.
    ///
    /// A budget of `None` or `Some(0)` disables retention entirely.
    pub fn new(budget_bytes: Option<u64>) -> Self {
        let budget_bytes = budget_bytes.filter(|&bytes| bytes > 0);
        let cache = budget_bytes.map(|max_bytes| {
            Cache::builder()
                // Weight each entry by its decoded size
                .weigher(|_key: &RetainedKey, value: &SharedBitmap| -> u32 {
                    // moka uses u32 for weights, cap at u32::MAX for very large bitmaps
                    bitmap_bytes(value).min(u32::MAX as u64) as u32
                })
                .max_capacity(max_bytes)
                // Newest deliveries win; the default admission filter would
                // keep the first images loaded and reject the visible ones
                .eviction_policy(EvictionPolicy::lru())
                .build()
        });

        Self {
            cache,
            budget_bytes,
        }
    }

    /// Whether this retainer holds references at all.
    pub fn is_enabled(&self) -> bool {
        self.cache.is_some()
    }

    /// Configured byte budget, `None` when disabled.
    pub fn budget_bytes(&self) -> Option<u64> {
        self.budget_bytes
    }

    /// Keep `bitmap` alive for the given slot, replacing any previous entry.
    pub fn retain(&self, kind: RetainedKind, position: usize, bitmap: &SharedBitmap) {
        if let Some(cache) = &self.cache {
            cache.insert((kind, position), SharedBitmap::clone(bitmap));
        }
    }

    /// Whether a strong reference is currently held for the slot.
    pub fn is_retained(&self, kind: RetainedKind, position: usize) -> bool {
        self.cache
            .as_ref()
            .is_some_and(|cache| cache.contains_key(&(kind, position)))
    }

    /// Drop every strong reference held by the retainer.
    ///
    /// Returns the number of entries that were held before the trim.
    pub fn trim(&self) -> u64 {
        let Some(cache) = &self.cache else {
            return 0;
        };
        // Remove keys one by one so the values are dropped now, not at
        // some later maintenance pass
        let keys: Vec<RetainedKey> = cache.iter().map(|(key, _)| *key).collect();
        for key in &keys {
            cache.invalidate(key);
        }
        cache.run_pending_tasks();
        keys.len() as u64
    }

    /// Approximate bytes currently retained.
    pub fn retained_bytes(&self) -> u64 {
        self.cache.as_ref().map_or(0, |cache| {
            cache.run_pending_tasks();
            cache.weighted_size()
        })
    }

    /// Approximate number of bitmaps currently retained.
    pub fn retained_entries(&self) -> u64 {
        self.cache.as_ref().map_or(0, |cache| {
            cache.run_pending_tasks();
            cache.entry_count()
        })
    }
}

impl fmt::Debug for ImageRetainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageRetainer")
            .field("budget_bytes", &self.budget_bytes)
            .field("enabled", &self.is_enabled())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::solid_bitmap;
    use std::sync::Arc;

    #[test]
    fn test_zero_budget_disables_retention() {
        let retainer = ImageRetainer::new(Some(0));
        assert!(!retainer.is_enabled());
        assert_eq!(retainer.budget_bytes(), None);

        let bitmap = solid_bitmap(4, [0, 0, 0, 255]);
        retainer.retain(RetainedKind::Image, 0, &bitmap);
        assert!(!retainer.is_retained(RetainedKind::Image, 0));
        assert_eq!(Arc::strong_count(&bitmap), 1);
        assert_eq!(retainer.trim(), 0);
    }

    #[test]
    fn test_retain_keeps_bitmap_alive() {
        let retainer = ImageRetainer::new(Some(1024 * 1024));
        let bitmap = solid_bitmap(8, [255, 0, 0, 255]);
        let weak = Arc::downgrade(&bitmap);

        retainer.retain(RetainedKind::Image, 3, &bitmap);
        drop(bitmap);

        assert!(retainer.is_retained(RetainedKind::Image, 3));
        assert!(weak.upgrade().is_some());
    }

    #[test]
    fn test_slots_are_keyed_by_kind() {
        let retainer = ImageRetainer::new(Some(1024 * 1024));
        let bitmap = solid_bitmap(2, [0, 255, 0, 255]);

        retainer.retain(RetainedKind::Placeholder, 1, &bitmap);

        assert!(retainer.is_retained(RetainedKind::Placeholder, 1));
        assert!(!retainer.is_retained(RetainedKind::Image, 1));
    }

    #[test]
    fn test_retained_bytes_tracks_weight() {
        let retainer = ImageRetainer::new(Some(1024 * 1024));
        retainer.retain(RetainedKind::Image, 0, &solid_bitmap(10, [0, 0, 0, 255]));
        retainer.retain(RetainedKind::Image, 1, &solid_bitmap(10, [0, 0, 0, 255]));

        assert_eq!(retainer.retained_entries(), 2);
        assert_eq!(retainer.retained_bytes(), 2 * 10 * 10 * 4);
    }

    #[test]
    fn test_budget_bounds_retained_bytes() {
        // Room for roughly two 400-byte bitmaps
        let retainer = ImageRetainer::new(Some(1000));
        for position in 0..5 {
            retainer.retain(RetainedKind::Image, position, &solid_bitmap(10, [0, 0, 0, 255]));
        }

        assert!(
            retainer.retained_bytes() <= 1000,
            "Expected retained bytes <= 1000, got {}",
            retainer.retained_bytes()
        );
    }

    #[test]
    fn test_newest_deliveries_are_kept() {
        // Room for two 400-byte bitmaps
        let retainer = ImageRetainer::new(Some(1000));
        let mut delivered = Vec::new();
        for position in 0..6 {
            let bitmap = solid_bitmap(10, [0, 0, 0, 255]);
            delivered.push(Arc::downgrade(&bitmap));
            retainer.retain(RetainedKind::Image, position, &bitmap);
            retainer.retained_entries();
        }

        assert!(retainer.is_retained(RetainedKind::Image, 4));
        assert!(retainer.is_retained(RetainedKind::Image, 5));
        for (position, weak) in delivered.iter().enumerate().take(4) {
            assert!(
                !retainer.is_retained(RetainedKind::Image, position),
                "position {} should have been evicted",
                position
            );
            assert!(weak.upgrade().is_none());
        }
    }

    #[test]
    fn test_trim_drops_strong_references() {
        let retainer = ImageRetainer::new(Some(1024 * 1024));
        let bitmap = solid_bitmap(8, [0, 0, 255, 255]);
        let weak = Arc::downgrade(&bitmap);
        retainer.retain(RetainedKind::Image, 0, &bitmap);
        retainer.retain(RetainedKind::Placeholder, 0, &solid_bitmap(2, [0, 0, 0, 255]));
        drop(bitmap);

        assert_eq!(retainer.trim(), 2);
        assert!(weak.upgrade().is_none());
        assert_eq!(retainer.retained_entries(), 0);
    }

    #[test]
    fn test_debug_output() {
        let retainer = ImageRetainer::new(Some(2048));
        let debug = format!("{:?}", retainer);
        assert!(debug.contains("2048"));
        assert!(debug.contains("enabled: true"));
    }
}
