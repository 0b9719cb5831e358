//! # void_event - Event System
//!
//! Event primitives for gameplay components:
//! - Multicast delegates with synchronous, priority-ordered delivery
//! - Queued channels for feeding events across a boundary (e.g. peer requests)
//!
//! Delegates never hold their internal lock while a handler runs, so a handler
//! may subscribe, unsubscribe or broadcast on the same delegate.

use core::sync::atomic::{AtomicU64, Ordering};
use crossbeam_channel::{Receiver, Sender};
use parking_lot::RwLock;
use std::sync::Arc;

/// Delivery order of a subscriber, highest first
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Critical,
}

/// Anything that can travel through a delegate or channel
pub trait Event: Send + Sync + 'static {}

// Blanket implementation
impl<T: Send + Sync + 'static> Event for T {}

/// Event handler function type
pub type EventHandler<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Subscriber ID
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub u64);

struct Subscriber<E: Event> {
    id: SubscriberId,
    priority: Priority,
    handler: EventHandler<E>,
}

/// Multicast delegate: any number of subscribers, synchronous broadcast
pub struct Delegate<E: Event> {
    subscribers: RwLock<Vec<Subscriber<E>>>,
    next_subscriber_id: AtomicU64,
}

impl<E: Event> Delegate<E> {
    /// Create a delegate with no subscribers
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            next_subscriber_id: AtomicU64::new(1),
        }
    }

    /// Subscribe with normal priority
    pub fn subscribe<F>(&self, handler: F) -> SubscriberId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.subscribe_with_priority(handler, Priority::Normal)
    }

    /// Subscribe with priority. Higher priority handlers run first.
    pub fn subscribe_with_priority<F>(&self, handler: F, priority: Priority) -> SubscriberId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = SubscriberId(self.next_subscriber_id.fetch_add(1, Ordering::Relaxed));

        let mut subscribers = self.subscribers.write();
        subscribers.push(Subscriber {
            id,
            priority,
            handler: Arc::new(handler),
        });
        // Stable sort keeps subscription order within a priority
        subscribers.sort_by(|a, b| b.priority.cmp(&a.priority));

        id
    }

    /// Unsubscribe, returns false if the id was unknown
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let mut subscribers = self.subscribers.write();
        let before = subscribers.len();
        subscribers.retain(|s| s.id != id);
        subscribers.len() != before
    }

    /// Deliver an event to every current subscriber
    pub fn broadcast(&self, event: &E) {
        let handlers: Vec<EventHandler<E>> = self
            .subscribers
            .read()
            .iter()
            .map(|s| s.handler.clone())
            .collect();

        for handler in handlers {
            handler(event);
        }
    }

    /// Number of subscribers
    pub fn len(&self) -> usize {
        self.subscribers.read().len()
    }

    /// Check if nobody is subscribed
    pub fn is_empty(&self) -> bool {
        self.subscribers.read().is_empty()
    }

}

impl<E: Event> Default for Delegate<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Event> core::fmt::Debug for Delegate<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Delegate")
            .field("subscribers", &self.len())
            .finish()
    }
}

/// Channel for single-type events
pub struct EventChannel<E: Event> {
    sender: Sender<E>,
    receiver: Receiver<E>,
}

impl<E: Event> EventChannel<E> {
    /// Create a new unbounded channel
    pub fn new() -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        Self { sender, receiver }
    }

    /// Queue an event for later draining
    pub fn send(&self, event: E) {
        // Both ends live in `self`, so the channel cannot be disconnected
        let _ = self.sender.send(event);
    }

    /// Take every pending event in send order
    pub fn drain(&self) -> Vec<E> {
        self.receiver.try_iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    /// Number of queued events
    pub fn len(&self) -> usize {
        self.receiver.len()
    }
}

impl<E: Event> Default for EventChannel<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Prelude
pub mod prelude {
    pub use crate::{Delegate, Event, EventChannel, EventHandler, Priority, SubscriberId};
}
