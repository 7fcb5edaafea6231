//! The image loading capability the catalog delegates to.
//!
//! The catalog never fetches or decodes anything itself. It builds a
//! [`LoadRequest`] for a position and hands it, together with that position's
//! [`LoadListener`], to an [`ImageLoader`]. The loader is free to do its work
//! on any thread and reports back through the listener.
//!
//! # Contract
//!
//! For every `submit` the loader must eventually call exactly one terminal
//! method on the listener: [`LoadListener::on_image_loaded`] or
//! [`LoadListener::on_load_failed`]. It may call
//! [`LoadListener::on_placeholder_loaded`] before that, any number of times.
//! Retries and network concerns stay inside the loader.
//!
//! `pause` and `resume` are process-wide switches. Pausing must not drop
//! outstanding requests: a paused request still completes once the loader
//! resumes.

mod listener;
mod request;

pub use listener::{LoadError, LoadListener, SharedLoadListener};
pub use request::{LoadRequest, SourceRef, Transform, UnknownTransform};

/// Asynchronous image loader.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the catalog may be shared across
/// threads and listeners may be invoked from loader worker threads.
pub trait ImageLoader: Send + Sync {
    /// Submit a request. Must return without waiting for the load.
    fn submit(&self, request: LoadRequest, listener: SharedLoadListener);

    /// Suspend outstanding and future work.
    fn pause(&self);

    /// Resume work suspended by [`ImageLoader::pause`].
    fn resume(&self);
}
