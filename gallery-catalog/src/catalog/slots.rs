//! Per-position state.

use std::sync::{Arc, Weak};

use crate::bitmap::{Bitmap, SharedBitmap};

/// A bitmap slot with reclaimable ownership.
///
/// Holds only a weak handle; reads must tolerate the bitmap being gone.
#[derive(Debug, Default)]
pub(crate) struct ReclaimableSlot(Option<Weak<Bitmap>>);

impl ReclaimableSlot {
    pub(crate) fn set(&mut self, bitmap: &SharedBitmap) {
        self.0 = Some(Arc::downgrade(bitmap));
    }

    pub(crate) fn get(&self) -> Option<SharedBitmap> {
        self.0.as_ref().and_then(Weak::upgrade)
    }

    /// Populated and not reclaimed.
    pub(crate) fn is_ready(&self) -> bool {
        self.0.as_ref().is_some_and(|weak| weak.strong_count() > 0)
    }
}

/// Everything the catalog tracks for one position.
#[derive(Debug, Default)]
pub(crate) struct PositionState {
    pub(crate) image: ReclaimableSlot,
    pub(crate) placeholder: ReclaimableSlot,
    /// A request is outstanding at the loader.
    pub(crate) loading: bool,
}
