//! Change notification.
//!
//! A [`ChangeNotifier`] is a publish/subscribe registry keyed by
//! [`ResourceId`]. Subscribing to a collection delivers every committed write
//! in it; subscribing to an item delivers writes to that row (and
//! collection-wide writes, which contain it).
//!
//! Dispatch is synchronous and happens on the writing thread before the
//! write returns. Handlers run in registration order and must not block.
//! They must not write to the store inline either: writes a handler wants to
//! make go through [`ChangeEvent::defer`] and are executed once the current
//! dispatch has finished.

use std::cell::RefCell;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::{ProductValues, ResourceId};

/// Callback invoked for each matching change.
pub type Handler = Arc<dyn Fn(&ChangeEvent<'_>) + Send + Sync>;

/// Handle for a registration, used to unsubscribe.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// A write queued by a handler during dispatch.
#[derive(Clone, Debug, PartialEq)]
pub enum DeferredWrite {
    Insert {
        collection: ResourceId,
        values: ProductValues,
    },
    Update {
        item: ResourceId,
        values: ProductValues,
    },
    Delete {
        resource: ResourceId,
    },
}

/// What a handler sees when it is invoked.
pub struct ChangeEvent<'a> {
    resource: &'a ResourceId,
    deferred: &'a RefCell<Vec<DeferredWrite>>,
}

impl ChangeEvent<'_> {
    /// The identifier whose write committed.
    pub fn resource(&self) -> &ResourceId {
        self.resource
    }

    /// Queue a write to run after the current dispatch completes.
    pub fn defer(&self, write: DeferredWrite) {
        self.deferred.borrow_mut().push(write);
    }
}

struct Subscription {
    id: SubscriptionId,
    resource: ResourceId,
    handler: Handler,
}

#[derive(Default)]
struct Registry {
    subscriptions: Vec<Subscription>,
    next_id: u64,
}

/// Publish/subscribe registry for committed writes.
///
/// ```rust
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use stockfs_core_store::{ChangeNotifier, ResourceId, RowId};
///
/// let notifier = ChangeNotifier::new();
/// let seen = Arc::new(AtomicUsize::new(0));
/// let counter = seen.clone();
/// notifier.subscribe(
///     ResourceId::collection("products"),
///     Arc::new(move |_event: &stockfs_core_store::ChangeEvent<'_>| {
///         counter.fetch_add(1, Ordering::SeqCst);
///     }),
/// );
///
/// notifier.notify(&ResourceId::item("products", RowId(1)));
/// assert_eq!(seen.load(Ordering::SeqCst), 0); // item writes do not reach collection subscribers on their own
///
/// notifier.notify(&ResourceId::collection("products"));
/// assert_eq!(seen.load(Ordering::SeqCst), 1);
/// ```
#[derive(Default)]
pub struct ChangeNotifier {
    registry: Mutex<Registry>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for changes under `resource`.
    ///
    /// Registering the same handler (the same `Arc`) for the same resource
    /// again is a no-op and returns the existing subscription.
    pub fn subscribe(&self, resource: ResourceId, handler: Handler) -> SubscriptionId {
        let mut registry = self.registry.lock();

        if let Some(existing) = registry
            .subscriptions
            .iter()
            .find(|s| s.resource == resource && Arc::ptr_eq(&s.handler, &handler))
        {
            return existing.id;
        }

        let id = SubscriptionId(registry.next_id);
        registry.next_id += 1;
        tracing::trace!(?id, %resource, "subscribed");
        registry.subscriptions.push(Subscription {
            id,
            resource,
            handler,
        });
        id
    }

    /// Remove a registration. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut registry = self.registry.lock();
        let before = registry.subscriptions.len();
        registry.subscriptions.retain(|s| s.id != id);
        before != registry.subscriptions.len()
    }

    /// Number of live registrations.
    pub fn subscriber_count(&self) -> usize {
        self.registry.lock().subscriptions.len()
    }

    /// Announce a committed write under one identifier.
    ///
    /// Returns the writes handlers deferred while being invoked.
    pub fn notify(&self, changed: &ResourceId) -> Vec<DeferredWrite> {
        self.notify_all(std::slice::from_ref(changed))
    }

    /// Announce one committed write that touched several identifiers.
    ///
    /// A subscription matches an identifier that is equal to, or contains,
    /// the subscribed one. Each matching subscription is invoked exactly
    /// once, with the first identifier in `changed` that it matched.
    pub fn notify_all(&self, changed: &[ResourceId]) -> Vec<DeferredWrite> {
        // Snapshot matches so handlers can (un)subscribe without deadlocking.
        let matches: Vec<(usize, Handler)> = {
            let registry = self.registry.lock();
            registry
                .subscriptions
                .iter()
                .filter_map(|s| {
                    changed
                        .iter()
                        .position(|c| c.contains(&s.resource))
                        .map(|index| (index, s.handler.clone()))
                })
                .collect()
        };

        let deferred = RefCell::new(Vec::new());
        for (index, handler) in matches {
            let event = ChangeEvent {
                resource: &changed[index],
                deferred: &deferred,
            };
            tracing::trace!(resource = %changed[index], "dispatching change");
            handler(&event);
        }
        deferred.into_inner()
    }
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
