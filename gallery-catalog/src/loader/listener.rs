//! Completion callbacks from loaders back into the catalog.

use std::sync::Arc;

use thiserror::Error;

use crate::bitmap::SharedBitmap;

/// Why a loader gave up on a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The remote source could not be fetched.
    #[error("Network error: {0}")]
    Network(String),

    /// The fetched data could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The loader dropped the request.
    #[error("Load cancelled")]
    Cancelled,

    /// Any other loader-specific failure.
    #[error("Load failed: {0}")]
    Other(String),
}

/// Receives the outcome of a submitted load.
///
/// See the [module documentation](crate::loader) for the calling contract.
pub trait LoadListener: Send + Sync {
    /// The final image is available.
    fn on_image_loaded(&self, image: SharedBitmap);

    /// A placeholder was resolved; the final image is still pending.
    fn on_placeholder_loaded(&self, placeholder: SharedBitmap);

    /// The loader gave up on the request.
    fn on_load_failed(&self, error: LoadError);
}

/// Shared listener handle passed to loaders.
pub type SharedLoadListener = Arc<dyn LoadListener>;
