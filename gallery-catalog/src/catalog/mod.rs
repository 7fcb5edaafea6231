//! The per-position image catalog.
//!
//! A [`Catalog`] owns a fixed list of [`Item`]s and tracks, for every
//! position, the decoded image, an optional per-position placeholder and
//! whether a load is in flight. Fetching is delegated to an [`ImageLoader`];
//! the catalog only decides whether a request is needed and records the
//! outcome.
//!
//! # Load Protocol
//!
//! ```text
//! load(p) ──► image ready? ──yes──► no-op
//!                 │no
//!                 ▼
//!             in flight? ──yes──► no-op
//!                 │no
//!                 ▼
//!         mark in flight ──► loader.submit(request(p), listener[p])
//!
//! listener[p].on_image_loaded(img)  ──► store img, clear flag, notify(p)
//! listener[p].on_placeholder_loaded ──► store placeholder only
//! listener[p].on_load_failed        ──► clear flag (caller may retry)
//! ```
//!
//! # Thread Safety
//!
//! `Catalog` is a cheap, cloneable handle. Loaders may complete on any
//! thread; per-position state sits behind a `parking_lot::Mutex` and no lock
//! is held while calling the loader or observers, so both may call back into
//! the catalog.
//!
//! # Reclamation
//!
//! Image and placeholder slots hold weak handles. A bitmap stays available
//! while the [`ImageRetainer`](crate::retention::ImageRetainer) or anyone else
//! holds it; afterwards the slot reads as empty and `load` will fetch it again.

mod error;
mod listener;
mod slots;
mod stats;

pub use error::CatalogError;
pub use stats::CatalogStats;

use std::fmt;
use std::ops::Range;
use std::sync::{Arc, OnceLock};

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, trace};

use crate::bitmap::SharedBitmap;
use crate::config::CatalogConfig;
use crate::item::Item;
use crate::loader::{ImageLoader, LoadError, LoadRequest, SharedLoadListener, Transform};
use crate::observer::{ObserverId, ObserverRegistry, SharedCatalogObserver};
use crate::retention::{ImageRetainer, RetainedKind};

use listener::PositionListener;
use slots::PositionState;
use stats::CatalogCounters;

/// Shared catalog state. Listeners hold this weakly.
pub(crate) struct CatalogInner {
    items: Vec<Item>,
    target_size: u32,
    transform: Transform,
    loader: Arc<dyn ImageLoader>,
    positions: Mutex<Vec<PositionState>>,
    listeners: Vec<OnceLock<Arc<PositionListener>>>,
    placeholder: RwLock<Option<SharedBitmap>>,
    retainer: ImageRetainer,
    observers: ObserverRegistry,
    counters: CatalogCounters,
}

impl CatalogInner {
    fn store_image(&self, position: usize, image: &SharedBitmap) {
        self.retainer.retain(RetainedKind::Image, position, image);
        self.positions.lock()[position].image.set(image);
    }

    fn store_placeholder(&self, position: usize, placeholder: &SharedBitmap) {
        self.retainer.retain(RetainedKind::Placeholder, position, placeholder);
        self.positions.lock()[position].placeholder.set(placeholder);
    }

    fn set_loading(&self, position: usize, loading: bool) {
        self.positions.lock()[position].loading = loading;
    }

    /// Store first, then clear the flag: a concurrent `load` sees either
    /// "in flight" or "ready", never neither.
    pub(crate) fn deliver_image(&self, position: usize, image: SharedBitmap) {
        self.store_image(position, &image);
        self.set_loading(position, false);
        self.counters.completion();
        debug!(position, "Image ready");
        self.notify_ready(position);
    }

    pub(crate) fn deliver_placeholder(&self, position: usize, placeholder: SharedBitmap) {
        self.store_placeholder(position, &placeholder);
        self.counters.placeholder_delivered();
        trace!(position, "Placeholder ready");
    }

    pub(crate) fn deliver_failure(&self, position: usize, error: LoadError) {
        self.set_loading(position, false);
        self.counters.failure();
        debug!(position, error = %error, "Load failed, position may be retried");
    }

    fn notify_ready(&self, position: usize) {
        self.counters.notification();
        let delivered = self.observers.notify(position);
        trace!(position, delivered, "Observers notified");
    }
}

/// Per-position image cache and load tracker.
///
/// # Example
///
/// ```ignore
/// use gallery_catalog::{Catalog, CatalogConfig, Item};
///
/// let catalog = Catalog::builder()
///     .items(items)
///     .config(CatalogConfig::default().with_target_size(100))
///     .loader(loader)
///     .build()?;
///
/// // Scroll handler
/// catalog.load_range(first_visible..last_visible + 1);
///
/// // Draw pass
/// for position in first_visible..=last_visible {
///     match catalog.get_bitmap(position)? {
///         Some(bitmap) => draw(&bitmap),
///         None => {
///             if let Some(placeholder) = catalog.get_placeholder(position)? {
///                 draw(&placeholder);
///             }
///         }
///     }
/// }
/// ```
#[derive(Clone)]
pub struct Catalog {
    inner: Arc<CatalogInner>,
}

impl Catalog {
    /// Start building a catalog.
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// Create a catalog from its three required parts.
    pub fn new(
        items: Vec<Item>,
        config: CatalogConfig,
        loader: Arc<dyn ImageLoader>,
    ) -> Result<Self, CatalogError> {
        Self::builder()
            .items(items)
            .config(config)
            .loader(loader)
            .build()
    }

    /// Number of positions. Fixed for the catalog's lifetime.
    pub fn size(&self) -> usize {
        self.inner.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.items.is_empty()
    }

    /// Rendering size requested for every item.
    pub fn target_size(&self) -> u32 {
        self.inner.target_size
    }

    /// Transform requested for every item.
    pub fn transform(&self) -> Transform {
        self.inner.transform
    }

    /// The item at `position`.
    pub fn item(&self, position: usize) -> Result<&Item, CatalogError> {
        self.check_position(position)?;
        Ok(&self.inner.items[position])
    }

    /// All items in position order.
    pub fn items(&self) -> &[Item] {
        &self.inner.items
    }

    /// Whether the final image at `position` is cached and not reclaimed.
    pub fn is_bitmap_ready(&self, position: usize) -> Result<bool, CatalogError> {
        self.check_position(position)?;
        Ok(self.inner.positions.lock()[position].image.is_ready())
    }

    /// Whether something can be drawn in place of the image at `position`:
    /// its own placeholder, or the global one.
    pub fn is_placeholder_ready(&self, position: usize) -> Result<bool, CatalogError> {
        self.check_position(position)?;
        if self.inner.positions.lock()[position].placeholder.is_ready() {
            return Ok(true);
        }
        Ok(self.inner.placeholder.read().is_some())
    }

    /// The cached image at `position`, if present and not reclaimed.
    pub fn get_bitmap(&self, position: usize) -> Result<Option<SharedBitmap>, CatalogError> {
        self.check_position(position)?;
        Ok(self.inner.positions.lock()[position].image.get())
    }

    /// The placeholder for `position`: its own if still alive, otherwise the
    /// global placeholder, otherwise `None`.
    pub fn get_placeholder(&self, position: usize) -> Result<Option<SharedBitmap>, CatalogError> {
        self.check_position(position)?;
        let own = self.inner.positions.lock()[position].placeholder.get();
        Ok(own.or_else(|| self.inner.placeholder.read().clone()))
    }

    /// Whether a request for `position` is outstanding at the loader.
    pub fn is_loading(&self, position: usize) -> Result<bool, CatalogError> {
        self.check_position(position)?;
        Ok(self.inner.positions.lock()[position].loading)
    }

    /// Set the placeholder used for positions without their own.
    pub fn set_placeholder(&self, placeholder: SharedBitmap) {
        *self.inner.placeholder.write() = Some(placeholder);
    }

    /// Remove the global placeholder, returning it.
    pub fn clear_placeholder(&self) -> Option<SharedBitmap> {
        self.inner.placeholder.write().take()
    }

    /// Request the image for `position` unless it is ready or already in flight.
    ///
    /// Returns `true` if a request was submitted to the loader.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::OutOfRange` for positions outside `[0, size)`.
    pub fn load(&self, position: usize) -> Result<bool, CatalogError> {
        self.check_position(position)?;

        {
            let mut positions = self.inner.positions.lock();
            let state = &mut positions[position];
            if state.image.is_ready() {
                trace!(position, "Load skipped, image already ready");
                return Ok(false);
            }
            if state.loading {
                self.inner.counters.duplicate_skipped();
                trace!(position, "Load skipped, request already in flight");
                return Ok(false);
            }
            state.loading = true;
        }

        let request = LoadRequest::for_item(
            position,
            &self.inner.items[position],
            self.inner.target_size,
            self.inner.transform,
        );
        let listener = self.listener_for(position);

        self.inner.counters.submission();
        debug!(
            position,
            target_size = self.inner.target_size,
            transform = %self.inner.transform,
            "Submitting load request"
        );
        self.inner.loader.submit(request, listener);
        Ok(true)
    }

    /// Call [`Catalog::load`] for every position in `range`.
    ///
    /// The range is clamped to the catalog size. Returns the number of
    /// requests submitted.
    pub fn load_range(&self, range: Range<usize>) -> usize {
        let end = range.end.min(self.size());
        (range.start..end)
            .filter(|&position| matches!(self.load(position), Ok(true)))
            .count()
    }

    /// Resume the loader.
    pub fn resume(&self) {
        info!("Resuming image loading");
        self.inner.loader.resume();
    }

    /// Pause the loader. In-flight flags are kept: a paused request is still
    /// outstanding and completes after `resume`.
    pub fn pause(&self) {
        info!("Pausing image loading");
        self.inner.loader.pause();
    }

    /// Tell every observer that `position` has a ready image.
    pub fn notify_ready(&self, position: usize) -> Result<(), CatalogError> {
        self.check_position(position)?;
        self.inner.notify_ready(position);
        Ok(())
    }

    /// Store `image` as the image for `position`.
    pub fn set_bitmap(&self, position: usize, image: SharedBitmap) -> Result<(), CatalogError> {
        self.check_position(position)?;
        self.inner.store_image(position, &image);
        Ok(())
    }

    /// Store `placeholder` as the placeholder for `position`.
    pub fn set_position_placeholder(
        &self,
        position: usize,
        placeholder: SharedBitmap,
    ) -> Result<(), CatalogError> {
        self.check_position(position)?;
        self.inner.store_placeholder(position, &placeholder);
        Ok(())
    }

    /// Set the in-flight flag for `position`.
    pub fn set_loading(&self, position: usize, loading: bool) -> Result<(), CatalogError> {
        self.check_position(position)?;
        self.inner.set_loading(position, loading);
        Ok(())
    }

    /// Register an observer for ready notifications.
    pub fn subscribe(&self, observer: SharedCatalogObserver) -> ObserverId {
        self.inner.observers.subscribe(observer)
    }

    /// Register a closure for ready notifications.
    pub fn subscribe_fn<F>(&self, f: F) -> ObserverId
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.inner.observers.subscribe_fn(f)
    }

    /// Remove an observer. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        self.inner.observers.unsubscribe(id)
    }

    pub fn observer_count(&self) -> usize {
        self.inner.observers.len()
    }

    /// Snapshot of load activity.
    pub fn stats(&self) -> CatalogStats {
        self.inner.counters.snapshot()
    }

    /// Release every bitmap the retainer keeps alive.
    ///
    /// Bitmaps still referenced elsewhere stay available; the rest become
    /// reclaimed and will be loaded again on the next `load`.
    pub fn trim_memory(&self) -> u64 {
        let released = self.inner.retainer.trim();
        info!(released, "Trimmed catalog memory");
        released
    }

    /// Approximate bytes kept alive by the retainer.
    pub fn retained_bytes(&self) -> u64 {
        self.inner.retainer.retained_bytes()
    }

    fn check_position(&self, position: usize) -> Result<(), CatalogError> {
        let size = self.size();
        if position < size {
            Ok(())
        } else {
            Err(CatalogError::OutOfRange { position, size })
        }
    }

    fn listener_for(&self, position: usize) -> SharedLoadListener {
        let listener = self.inner.listeners[position].get_or_init(|| {
            Arc::new(PositionListener::new(position, Arc::downgrade(&self.inner)))
        });
        Arc::clone(listener) as SharedLoadListener
    }
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("size", &self.size())
            .field("target_size", &self.inner.target_size)
            .field("transform", &self.inner.transform)
            .field("retainer", &self.inner.retainer)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Catalog`].
#[derive(Default)]
pub struct CatalogBuilder {
    items: Option<Vec<Item>>,
    config: CatalogConfig,
    loader: Option<Arc<dyn ImageLoader>>,
}

impl CatalogBuilder {
    /// Set the item list. Required; may be empty.
    pub fn items(mut self, items: Vec<Item>) -> Self {
        self.items = Some(items);
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: CatalogConfig) -> Self {
        self.config = config;
        self
    }

    /// Set only the rendering size.
    pub fn target_size(mut self, target_size: u32) -> Self {
        self.config.target_size = target_size;
        self
    }

    /// Set the loader. Required.
    pub fn loader(mut self, loader: Arc<dyn ImageLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Build the catalog. No loading is triggered.
    ///
    /// # Errors
    ///
    /// - `CatalogError::MissingItems` if no item list was set
    /// - `CatalogError::MissingLoader` if no loader was set
    /// - `CatalogError::InvalidTargetSize` if the target size is zero
    pub fn build(self) -> Result<Catalog, CatalogError> {
        let items = self.items.ok_or(CatalogError::MissingItems)?;
        let loader = self.loader.ok_or(CatalogError::MissingLoader)?;
        if self.config.target_size == 0 {
            return Err(CatalogError::InvalidTargetSize);
        }

        let size = items.len();
        let inner = CatalogInner {
            items,
            target_size: self.config.target_size,
            transform: self.config.transform,
            loader,
            positions: Mutex::new((0..size).map(|_| PositionState::default()).collect()),
            listeners: (0..size).map(|_| OnceLock::new()).collect(),
            placeholder: RwLock::new(None),
            retainer: ImageRetainer::new(self.config.memory_budget_bytes),
            observers: ObserverRegistry::new(),
            counters: CatalogCounters::default(),
        };

        debug!(size, target_size = inner.target_size, "Catalog created");

        Ok(Catalog {
            inner: Arc::new(inner),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::solid_bitmap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Loader that records submissions and lets tests complete them.
    #[derive(Default)]
    struct RecordingLoader {
        submitted: Mutex<Vec<(LoadRequest, SharedLoadListener)>>,
        pauses: AtomicUsize,
        resumes: AtomicUsize,
    }

    impl ImageLoader for RecordingLoader {
        fn submit(&self, request: LoadRequest, listener: SharedLoadListener) {
            self.submitted.lock().push((request, listener));
        }

        fn pause(&self) {
            self.pauses.fetch_add(1, Ordering::SeqCst);
        }

        fn resume(&self) {
            self.resumes.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl RecordingLoader {
        fn listener(&self, index: usize) -> SharedLoadListener {
            Arc::clone(&self.submitted.lock()[index].1)
        }
    }

    /// Loader that completes synchronously from inside `submit`.
    struct ImmediateLoader;

    impl ImageLoader for ImmediateLoader {
        fn submit(&self, request: LoadRequest, listener: SharedLoadListener) {
            listener.on_image_loaded(solid_bitmap(request.target_size(), [0, 0, 255, 255]));
        }

        fn pause(&self) {}

        fn resume(&self) {}
    }

    fn items(count: usize) -> Vec<Item> {
        (0..count)
            .map(|i| Item::from_url(format!("https://example.com/{}.png", i)))
            .collect()
    }

    fn catalog_with(loader: Arc<dyn ImageLoader>, count: usize) -> Catalog {
        Catalog::builder()
            .items(items(count))
            .target_size(100)
            .loader(loader)
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_items() {
        let err = Catalog::builder()
            .loader(Arc::new(RecordingLoader::default()))
            .build()
            .unwrap_err();
        assert_eq!(err, CatalogError::MissingItems);
    }

    #[test]
    fn test_builder_requires_loader() {
        let err = Catalog::builder().items(items(1)).build().unwrap_err();
        assert_eq!(err, CatalogError::MissingLoader);
    }

    #[test]
    fn test_builder_rejects_zero_target_size() {
        let err = Catalog::builder()
            .items(items(1))
            .target_size(0)
            .loader(Arc::new(RecordingLoader::default()))
            .build()
            .unwrap_err();
        assert_eq!(err, CatalogError::InvalidTargetSize);
    }

    #[test]
    fn test_empty_catalog_is_allowed() {
        let catalog = catalog_with(Arc::new(RecordingLoader::default()), 0);
        assert!(catalog.is_empty());
        assert_eq!(catalog.load_range(0..10), 0);
        assert!(matches!(
            catalog.load(0),
            Err(CatalogError::OutOfRange {
                position: 0,
                size: 0
            })
        ));
    }

    #[test]
    fn test_construction_triggers_no_loading() {
        let loader = Arc::new(RecordingLoader::default());
        let catalog = catalog_with(loader.clone(), 5);
        assert_eq!(loader.submitted.lock().len(), 0);
        assert_eq!(catalog.stats(), CatalogStats::default());
    }

    #[test]
    fn test_request_carries_catalog_settings() {
        let loader = Arc::new(RecordingLoader::default());
        let catalog = Catalog::builder()
            .items(items(2))
            .config(
                CatalogConfig::default()
                    .with_target_size(48)
                    .with_transform(Transform::None),
            )
            .loader(loader.clone())
            .build()
            .unwrap();

        catalog.load(1).unwrap();

        let submitted = loader.submitted.lock();
        let request = &submitted[0].0;
        assert_eq!(request.position(), 1);
        assert_eq!(request.target_size(), 48);
        assert_eq!(request.transform(), Transform::None);
        assert_eq!(request.url(), Some("https://example.com/1.png"));
    }

    #[test]
    fn test_listener_identity_is_stable_per_position() {
        let loader = Arc::new(RecordingLoader::default());
        let catalog = catalog_with(loader.clone(), 2);

        catalog.load(0).unwrap();
        loader
            .listener(0)
            .on_load_failed(LoadError::Network("offline".to_string()));
        catalog.load(0).unwrap();
        catalog.load(1).unwrap();

        let first = Arc::as_ptr(&loader.listener(0)) as *const ();
        let retry = Arc::as_ptr(&loader.listener(1)) as *const ();
        let other = Arc::as_ptr(&loader.listener(2)) as *const ();
        assert_eq!(first, retry);
        assert_ne!(first, other);
    }

    #[test]
    fn test_placeholder_does_not_complete_load() {
        let loader = Arc::new(RecordingLoader::default());
        let catalog = catalog_with(loader.clone(), 1);
        let notified = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&notified);
        catalog.subscribe_fn(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        catalog.load(0).unwrap();
        let placeholder = solid_bitmap(4, [128, 128, 128, 255]);
        loader.listener(0).on_placeholder_loaded(placeholder.clone());

        assert!(catalog.is_loading(0).unwrap());
        assert!(!catalog.is_bitmap_ready(0).unwrap());
        assert!(catalog.is_placeholder_ready(0).unwrap());
        assert!(Arc::ptr_eq(
            &catalog.get_placeholder(0).unwrap().unwrap(),
            &placeholder
        ));
        assert_eq!(notified.load(Ordering::SeqCst), 0);
        assert_eq!(catalog.stats().placeholders_delivered, 1);
    }

    #[test]
    fn test_synchronous_loader_may_reenter() {
        let catalog = catalog_with(Arc::new(ImmediateLoader), 3);
        let reentrant = catalog.clone();
        let seen_ready = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen_ready);
        catalog.subscribe_fn(move |position| {
            if reentrant.get_bitmap(position).unwrap().is_some() {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        assert!(catalog.load(1).unwrap());
        assert!(!catalog.is_loading(1).unwrap());
        assert_eq!(seen_ready.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_completion_after_catalog_dropped_is_ignored() {
        let loader = Arc::new(RecordingLoader::default());
        let catalog = catalog_with(loader.clone(), 1);
        catalog.load(0).unwrap();
        drop(catalog);

        loader
            .listener(0)
            .on_image_loaded(solid_bitmap(2, [0, 0, 0, 255]));
        loader.listener(0).on_load_failed(LoadError::Cancelled);
    }

    #[test]
    fn test_set_loading_blocks_load() {
        let loader = Arc::new(RecordingLoader::default());
        let catalog = catalog_with(loader.clone(), 1);

        catalog.set_loading(0, true).unwrap();
        assert!(!catalog.load(0).unwrap());
        catalog.set_loading(0, false).unwrap();
        assert!(catalog.load(0).unwrap());
        assert_eq!(loader.submitted.lock().len(), 1);
    }

    #[test]
    fn test_set_bitmap_satisfies_load() {
        let loader = Arc::new(RecordingLoader::default());
        let catalog = catalog_with(loader.clone(), 1);
        let bitmap = solid_bitmap(2, [1, 1, 1, 255]);

        catalog.set_bitmap(0, bitmap.clone()).unwrap();

        assert!(catalog.is_bitmap_ready(0).unwrap());
        assert!(!catalog.load(0).unwrap());
        assert!(loader.submitted.lock().is_empty());
    }

    #[test]
    fn test_manual_population_and_notify() {
        let loader = Arc::new(RecordingLoader::default());
        let catalog = catalog_with(loader.clone(), 3);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        catalog.subscribe_fn(move |position| sink.lock().push(position));

        catalog.set_loading(2, true).unwrap();
        catalog.set_bitmap(2, solid_bitmap(2, [9, 9, 9, 255])).unwrap();
        assert!(seen.lock().is_empty());

        catalog.set_loading(2, false).unwrap();
        catalog.notify_ready(2).unwrap();

        assert_eq!(*seen.lock(), vec![2]);
        assert_eq!(catalog.stats().notifications, 1);
        assert!(loader.submitted.lock().is_empty());
    }

    #[test]
    fn test_pause_and_resume_pass_through() {
        let loader = Arc::new(RecordingLoader::default());
        let catalog = catalog_with(loader.clone(), 1);

        catalog.load(0).unwrap();
        catalog.pause();
        assert!(catalog.is_loading(0).unwrap());
        catalog.resume();

        assert_eq!(loader.pauses.load(Ordering::SeqCst), 1);
        assert_eq!(loader.resumes.load(Ordering::SeqCst), 1);
        assert!(catalog.is_loading(0).unwrap());
    }

    #[test]
    fn test_clear_placeholder() {
        let catalog = catalog_with(Arc::new(RecordingLoader::default()), 1);
        let global = solid_bitmap(2, [5, 5, 5, 255]);

        catalog.set_placeholder(global.clone());
        assert!(catalog.is_placeholder_ready(0).unwrap());

        let removed = catalog.clear_placeholder().unwrap();
        assert!(Arc::ptr_eq(&removed, &global));
        assert!(!catalog.is_placeholder_ready(0).unwrap());
    }

    #[test]
    fn test_retained_image_survives_loader_dropping_it() {
        let loader = Arc::new(RecordingLoader::default());
        let catalog = catalog_with(loader.clone(), 1);

        catalog.load(0).unwrap();
        loader
            .listener(0)
            .on_image_loaded(solid_bitmap(8, [0, 255, 0, 255]));

        assert!(catalog.is_bitmap_ready(0).unwrap());
        assert_eq!(catalog.retained_bytes(), 8 * 8 * 4);
    }

    #[test]
    fn test_out_of_range_operations_fail_fast() {
        let catalog = catalog_with(Arc::new(RecordingLoader::default()), 2);
        let expected = CatalogError::OutOfRange {
            position: 2,
            size: 2,
        };
        let bitmap = solid_bitmap(1, [0, 0, 0, 255]);

        assert_eq!(catalog.is_bitmap_ready(2).unwrap_err(), expected);
        assert_eq!(catalog.is_placeholder_ready(2).unwrap_err(), expected);
        assert_eq!(catalog.get_bitmap(2).unwrap_err(), expected);
        assert_eq!(catalog.get_placeholder(2).unwrap_err(), expected);
        assert_eq!(catalog.is_loading(2).unwrap_err(), expected);
        assert_eq!(catalog.load(2).unwrap_err(), expected);
        assert_eq!(catalog.notify_ready(2).unwrap_err(), expected);
        assert_eq!(catalog.set_bitmap(2, bitmap.clone()).unwrap_err(), expected);
        assert_eq!(
            catalog.set_position_placeholder(2, bitmap).unwrap_err(),
            expected
        );
        assert_eq!(catalog.set_loading(2, true).unwrap_err(), expected);
        assert_eq!(catalog.item(2).unwrap_err(), expected);
    }

    #[test]
    fn test_load_range_clamps_and_counts() {
        let loader = Arc::new(RecordingLoader::default());
        let catalog = catalog_with(loader.clone(), 4);

        catalog.load(1).unwrap();
        assert_eq!(catalog.load_range(0..10), 3);
        assert_eq!(loader.submitted.lock().len(), 4);
        assert_eq!(catalog.stats().duplicate_loads_skipped, 1);
    }
}
