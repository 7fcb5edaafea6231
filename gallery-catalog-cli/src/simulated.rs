//! Simulated image loader for driving a catalog without real images.
//!
//! Each request becomes a Tokio task that resolves the placeholder right
//! away, waits for the configured latency, waits again while the loader is
//! paused, and then delivers a synthetic bitmap (or a failure, for every
//! `fail_every`-th request).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use image::{Rgba, RgbaImage};
use tokio::runtime::Handle;
use tokio::sync::watch;

use gallery_catalog::{
    ImageLoader, LoadError, LoadRequest, SharedBitmap, SharedLoadListener, SourceRef, Transform,
};

/// Placeholder colour (mid grey).
const PLACEHOLDER_RGBA: [u8; 4] = [128, 128, 128, 255];

/// Loader that fabricates images on a Tokio runtime.
pub struct SimulatedLoader {
    runtime: Handle,
    latency: Duration,
    fail_every: Option<u64>,
    issued: AtomicU64,
    paused: watch::Sender<bool>,
}

impl SimulatedLoader {
    /// Create a loader that spawns its work on `runtime`.
    ///
    /// # Arguments
    ///
    /// * `runtime` - Runtime handle used to spawn load tasks
    /// * `latency` - Simulated fetch time per request
    /// * `fail_every` - Fail every n-th request, `None` to never fail
    pub fn new(runtime: Handle, latency: Duration, fail_every: Option<u64>) -> Self {
        let (paused, _) = watch::channel(false);
        Self {
            runtime,
            latency,
            fail_every: fail_every.filter(|&n| n > 0),
            issued: AtomicU64::new(0),
            paused,
        }
    }

    /// Number of requests submitted so far.
    pub fn issued(&self) -> u64 {
        self.issued.load(Ordering::Relaxed)
    }

    pub fn is_paused(&self) -> bool {
        *self.paused.borrow()
    }
}

impl ImageLoader for SimulatedLoader {
    fn submit(&self, request: LoadRequest, listener: SharedLoadListener) {
        let sequence = self.issued.fetch_add(1, Ordering::Relaxed) + 1;
        let fail = self.fail_every.is_some_and(|n| sequence % n == 0);
        let latency = self.latency;
        let mut paused = self.paused.subscribe();

        self.runtime.spawn(async move {
            if request.placeholder().is_some() {
                listener.on_placeholder_loaded(render_placeholder(request.target_size()));
            }

            tokio::time::sleep(latency).await;

            // Hold the completion while paused
            loop {
                let is_paused = *paused.borrow_and_update();
                if !is_paused {
                    break;
                }
                if paused.changed().await.is_err() {
                    listener.on_load_failed(LoadError::Cancelled);
                    return;
                }
            }

            if fail {
                let source = describe_source(&request);
                tracing::debug!(position = request.position(), %source, "Simulated fetch failure");
                listener.on_load_failed(LoadError::Network(format!(
                    "simulated failure fetching {}",
                    source
                )));
            } else {
                listener.on_image_loaded(render_bitmap(&request));
            }
        });
    }

    fn pause(&self) {
        self.paused.send_replace(true);
    }

    fn resume(&self) {
        self.paused.send_replace(false);
    }
}

fn describe_source(request: &LoadRequest) -> String {
    match request.sources().next() {
        Some(SourceRef::Resource(id)) => id.to_string(),
        Some(SourceRef::Url(url)) => url.to_string(),
        None => "<no source>".to_string(),
    }
}

/// Solid placeholder of the requested size.
pub fn render_placeholder(size: u32) -> SharedBitmap {
    Arc::new(RgbaImage::from_pixel(size, size, Rgba(PLACEHOLDER_RGBA)))
}

/// Synthetic bitmap for `request`, coloured by position and masked to a
/// circle when the request asks for it.
pub fn render_bitmap(request: &LoadRequest) -> SharedBitmap {
    let size = request.target_size();
    let color = position_color(request.position());
    let circle = request.transform() == Transform::Circle;
    let radius = size as f32 / 2.0;

    let image = RgbaImage::from_fn(size, size, |x, y| {
        if circle {
            let dx = x as f32 + 0.5 - radius;
            let dy = y as f32 + 0.5 - radius;
            if dx * dx + dy * dy > radius * radius {
                return Rgba([0, 0, 0, 0]);
            }
        }
        Rgba(color)
    });
    Arc::new(image)
}

fn position_color(position: usize) -> [u8; 4] {
    let seed = position as u32;
    [
        (seed.wrapping_mul(67) % 256) as u8,
        (seed.wrapping_mul(131) % 256) as u8,
        (seed.wrapping_mul(197) % 256) as u8,
        255,
    ]
}
