//! Publish/subscribe event bus.
//!
//! An [`EventBus`] is an ordinary value owned by the application's
//! composition root and shared by `Arc` with whoever publishes or
//! subscribes. Subscriptions are identified by a generated
//! [`SubscriptionId`], which is what [`EventBus::unsubscribe`] takes.
//!
//! The navigator publishes a [`RouteChangeEvent`] after every committed
//! navigation when it was given a bus with
//! [`Navigator::with_event_bus`](crate::Navigator::with_event_bus).
//!
//! # Example
//!
//! ```
//! use scene_navigator::EventBus;
//! use std::sync::{Arc, Mutex};
//!
//! let bus = EventBus::<String>::new();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = seen.clone();
//! let id = bus.subscribe(move |event: &String| sink.lock().unwrap().push(event.clone()));
//!
//! bus.publish(&"saved".to_string());
//! assert!(bus.unsubscribe(id));
//! bus.publish(&"ignored".to_string());
//!
//! assert_eq!(*seen.lock().unwrap(), vec!["saved".to_string()]);
//! ```

use crate::trace_log;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

// ============================================================================
// Route change events
// ============================================================================

/// How the displayed route changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDirection {
    /// `to`: a new state was pushed.
    Forward,
    /// `off`: the top state was replaced.
    Replace,
    /// `off_all`: history was cleared before pushing.
    Reset,
    /// `back`: the previous state's cached root is displayed again.
    Back,
    /// `pop`: the previous route was reloaded.
    Pop,
    /// `refresh`: the current route was reloaded in place.
    Refresh,
}

/// Published after every committed navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteChangeEvent {
    /// Route displayed before the change, if any.
    pub from: Option<String>,
    /// Route displayed now.
    pub to: String,
    /// Kind of change.
    pub direction: NavigationDirection,
    /// Stack depth after the change.
    pub depth: usize,
}

// ============================================================================
// EventBus
// ============================================================================

/// Identifier of one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

type Listener<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Typed publish/subscribe channel.
pub struct EventBus<E> {
    next_id: AtomicU64,
    listeners: Mutex<BTreeMap<SubscriptionId, Listener<E>>>,
}

impl<E> EventBus<E> {
    /// Create a bus with no subscribers.
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            listeners: Mutex::new(BTreeMap::new()),
        }
    }

    fn listeners(&self) -> MutexGuard<'_, BTreeMap<SubscriptionId, Listener<E>>> {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Subscribe `listener`; it is called for every published event until
    /// unsubscribed.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners().insert(id, Arc::new(listener));
        trace_log!("Subscription {:?} added", id);
        id
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners().remove(&id).is_some()
    }

    /// Deliver `event` to every subscriber, oldest subscription first.
    ///
    /// Listeners run outside the bus lock, so they may subscribe or
    /// unsubscribe while handling the event. Returns the number of
    /// listeners called.
    pub fn publish(&self, event: &E) -> usize {
        let snapshot: Vec<Listener<E>> = self.listeners().values().cloned().collect();
        for listener in &snapshot {
            listener(event);
        }
        snapshot.len()
    }

    /// Number of active subscriptions.
    pub fn listener_count(&self) -> usize {
        self.listeners().len()
    }

    /// Check if a subscription is active.
    pub fn has_listener(&self, id: SubscriptionId) -> bool {
        self.listeners().contains_key(&id)
    }

    /// Drop every subscription.
    pub fn clear(&self) {
        self.listeners().clear();
    }
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}
