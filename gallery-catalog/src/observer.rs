//! Ready-position notifications.
//!
//! Observers are told which position just received its final image. Delivery
//! is synchronous and unbatched: every ready event produces one call on every
//! registered observer, from whichever thread completed the load.
//!
//! Async consumers can register a [`ChannelObserver`], which forwards each
//! position into a tokio channel and never blocks the notifying thread.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::mpsc;

/// Receives ready-position notifications from a catalog.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; notifications arrive on the thread
/// that completed the load. Observers are called without any catalog lock
/// held and may query the catalog.
pub trait CatalogObserver: Send + Sync {
    /// The image for `position` is ready to draw.
    fn on_position_ready(&self, position: usize);
}

/// Shared observer handle.
pub type SharedCatalogObserver = Arc<dyn CatalogObserver>;

/// Handle returned by a subscription, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

struct FnObserver<F>(F);

impl<F> CatalogObserver for FnObserver<F>
where
    F: Fn(usize) + Send + Sync,
{
    fn on_position_ready(&self, position: usize) {
        (self.0)(position)
    }
}

/// Registry of observers, notified in subscription order.
#[derive(Default)]
pub struct ObserverRegistry {
    next_id: AtomicU64,
    observers: RwLock<Vec<(ObserverId, SharedCatalogObserver)>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer.
    pub fn subscribe(&self, observer: SharedCatalogObserver) -> ObserverId {
        let id = ObserverId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.observers.write().push((id, observer));
        id
    }

    /// Register a closure as an observer.
    pub fn subscribe_fn<F>(&self, f: F) -> ObserverId
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.subscribe(Arc::new(FnObserver(f)))
    }

    /// Remove an observer. Returns `false` if the id was not registered.
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        let mut observers = self.observers.write();
        let before = observers.len();
        observers.retain(|(existing, _)| *existing != id);
        observers.len() != before
    }

    pub fn len(&self) -> usize {
        self.observers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.read().is_empty()
    }

    /// Deliver `position` to every observer. Returns how many were notified.
    pub fn notify(&self, position: usize) -> usize {
        // Snapshot so observers can (un)subscribe from inside the callback
        let observers: Vec<SharedCatalogObserver> = self
            .observers
            .read()
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();

        for observer in &observers {
            observer.on_position_ready(position);
        }
        observers.len()
    }
}

/// Observer that forwards ready positions into an unbounded tokio channel.
///
/// # Example
///
/// ```ignore
/// let (observer, mut ready_rx) = ChannelObserver::new();
/// catalog.subscribe(Arc::new(observer));
///
/// while let Some(position) = ready_rx.recv().await {
///     redraw(position);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<usize>,
}

impl ChannelObserver {
    /// Create the observer and the receiving end of its channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<usize>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl CatalogObserver for ChannelObserver {
    fn on_position_ready(&self, position: usize) {
        if self.tx.send(position).is_err() {
            tracing::trace!(position, "Ready notification dropped, receiver closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_notify_reaches_every_observer_in_order() {
        let registry = ObserverRegistry::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for tag in ["a", "b"] {
            let seen = Arc::clone(&seen);
            registry.subscribe_fn(move |position| seen.lock().push((tag, position)));
        }

        assert_eq!(registry.notify(5), 2);
        assert_eq!(*seen.lock(), vec![("a", 5), ("b", 5)]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let registry = ObserverRegistry::new();
        let count = Arc::new(AtomicU64::new(0));

        let counter = Arc::clone(&count);
        let id = registry.subscribe_fn(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        registry.notify(0);

        assert!(registry.unsubscribe(id));
        assert!(!registry.unsubscribe(id));
        registry.notify(1);

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_observer_may_unsubscribe_itself() {
        let registry = Arc::new(ObserverRegistry::new());
        let id_slot = Arc::new(Mutex::new(None));

        let registry_ref = Arc::clone(&registry);
        let slot = Arc::clone(&id_slot);
        let id = registry.subscribe_fn(move |_| {
            if let Some(id) = slot.lock().take() {
                registry_ref.unsubscribe(id);
            }
        });
        *id_slot.lock() = Some(id);

        assert_eq!(registry.notify(0), 1);
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_ids_are_unique() {
        let registry = ObserverRegistry::new();
        let a = registry.subscribe_fn(|_| {});
        let b = registry.subscribe_fn(|_| {});
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn test_channel_observer_forwards_positions() {
        let (observer, mut rx) = ChannelObserver::new();
        observer.on_position_ready(3);
        observer.on_position_ready(1);

        assert_eq!(rx.recv().await, Some(3));
        assert_eq!(rx.recv().await, Some(1));
    }

    #[test]
    fn test_channel_observer_tolerates_closed_receiver() {
        let (observer, rx) = ChannelObserver::new();
        drop(rx);
        observer.on_position_ready(0);
    }
}
