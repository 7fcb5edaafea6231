//! Per-position completion listener.

use std::sync::Weak;

use tracing::warn;

use super::CatalogInner;
use crate::bitmap::SharedBitmap;
use crate::loader::{LoadError, LoadListener};

/// Listener handed to the loader for one position.
///
/// Created the first time the position is loaded and reused for every later
/// attempt, so loaders can key bookkeeping on its identity. Holds the catalog
/// weakly: an outstanding load never keeps a dropped catalog alive.
pub(crate) struct PositionListener {
    position: usize,
    catalog: Weak<CatalogInner>,
}

impl PositionListener {
    pub(crate) fn new(position: usize, catalog: Weak<CatalogInner>) -> Self {
        Self { position, catalog }
    }

    fn with_catalog(&self, event: &'static str, f: impl FnOnce(&CatalogInner)) {
        match self.catalog.upgrade() {
            Some(catalog) => f(&catalog),
            None => warn!(
                position = self.position,
                event,
                "Load completion arrived after catalog was dropped"
            ),
        }
    }
}

impl LoadListener for PositionListener {
    fn on_image_loaded(&self, image: SharedBitmap) {
        self.with_catalog("image", |catalog| catalog.deliver_image(self.position, image));
    }

    fn on_placeholder_loaded(&self, placeholder: SharedBitmap) {
        self.with_catalog("placeholder", |catalog| {
            catalog.deliver_placeholder(self.position, placeholder)
        });
    }

    fn on_load_failed(&self, error: LoadError) {
        self.with_catalog("failure", |catalog| catalog.deliver_failure(self.position, error));
    }
}
