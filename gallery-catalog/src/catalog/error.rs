//! Catalog error types.

use thiserror::Error;

/// Errors returned by catalog construction and per-position operations.
///
/// Load failures reported by the loader are not errors at this level: they
/// only clear the position's loading flag so a later `load` can retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The builder was given no item list.
    #[error("The list of items can't be missing")]
    MissingItems,

    /// The builder was given no loader.
    #[error("An image loader is required")]
    MissingLoader,

    /// The target size is not a positive number of pixels.
    #[error("Target size must be greater than zero")]
    InvalidTargetSize,

    /// A position outside `[0, size)` was passed to a per-position operation.
    #[error("Position {position} out of range for catalog of size {size}")]
    OutOfRange { position: usize, size: usize },
}
