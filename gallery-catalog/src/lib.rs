//! Gallery Catalog - lazy, memory-conscious image tracking for scrollable galleries
//!
//! This library keeps per-position state for a fixed list of gallery items:
//! which decoded images are available, which placeholders can be shown in
//! their place, and which loads are already in flight. Fetching and decoding
//! is delegated to an injected [`ImageLoader`]; the catalog only tracks state,
//! deduplicates requests and tells observers when a position becomes ready.
//!
//! # Architecture
//!
//! ```text
//!  renderer ──load(p)──► Catalog ──submit(request, listener[p])──► ImageLoader
//!     ▲                    │  ▲                                        │
//!     │ get_bitmap(p)      │  └──────── on_image_loaded(image) ◄───────┘
//!     │                    ▼
//!     └──── on_position_ready(p) ◄── ObserverRegistry
//! ```
//!
//! # Example
//!
//! ```ignore
//! use gallery_catalog::{Catalog, CatalogConfig, Item};
//!
//! let catalog = Catalog::builder()
//!     .items(vec![Item::from_url("https://example.com/a.png")])
//!     .config(CatalogConfig::default().with_target_size(128))
//!     .loader(loader)
//!     .build()?;
//!
//! catalog.subscribe_fn(|position| println!("position {} is ready", position));
//! catalog.load(0)?;
//! ```

pub mod bitmap;
pub mod catalog;
pub mod config;
pub mod item;
pub mod loader;
pub mod logging;
pub mod observer;
pub mod retention;

pub use bitmap::{Bitmap, SharedBitmap};
pub use catalog::{Catalog, CatalogBuilder, CatalogError, CatalogStats};
pub use config::{CatalogConfig, ConfigError};
pub use item::{Item, ResourceId};
pub use loader::{
    ImageLoader, LoadError, LoadListener, LoadRequest, SharedLoadListener, SourceRef, Transform,
};
pub use observer::{CatalogObserver, ChannelObserver, ObserverId, SharedCatalogObserver};
pub use retention::ImageRetainer;
