//! In-process notification bus.
//!
//! [`EventBus`] is the publish/subscribe hub shared by the filter store and
//! the reservation edit workflow. It is owned by the composition root and
//! shared via `Arc<EventBus>`. Delivery is synchronous: `publish` returns
//! after every listener has run.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::models::ReservationId;

// ---------------------------------------------------------------------------
// AppEvent
// ---------------------------------------------------------------------------

/// Notifications exchanged between views
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// A reservation was saved; carries the id returned by the backend
    ReservationChanged(ReservationId),
    /// The filter set changed; listeners re-read the filter store
    ReservationFilterChanged,
}

impl AppEvent {
    /// Channel name of the notification
    pub fn name(&self) -> &'static str {
        match self {
            AppEvent::ReservationChanged(_) => "reservation-changed",
            AppEvent::ReservationFilterChanged => "reservation-filter-changed",
        }
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

type Listener = Arc<dyn Fn(&AppEvent) + Send + Sync>;

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Synchronous fan-out event bus
///
/// # Usage
///
/// ```rust
/// use varaus_admin::services::events::{AppEvent, EventBus};
///
/// let bus = EventBus::new();
/// let id = bus.subscribe(|event| println!("{}", event.name()));
/// bus.publish(AppEvent::ReservationFilterChanged);
/// bus.unsubscribe(id);
/// ```
#[derive(Default)]
pub struct EventBus {
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
    next_id: AtomicU64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for every event published from now on
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&AppEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners().push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners();
        let before = listeners.len();
        listeners.retain(|(sid, _)| *sid != id);
        listeners.len() != before
    }

    /// Deliver an event to the listeners registered at call time, in
    /// subscription order.
    ///
    /// The listener list is not locked while listeners run, so a listener may
    /// subscribe, unsubscribe or publish; changes apply to later events.
    pub fn publish(&self, event: AppEvent) {
        let snapshot: Vec<Listener> = self
            .listeners()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        tracing::debug!(
            event = event.name(),
            listeners = snapshot.len(),
            "Publishing event"
        );

        for listener in snapshot {
            listener(&event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners().len()
    }

    fn listeners(&self) -> MutexGuard<'_, Vec<(SubscriptionId, Listener)>> {
        // Listener panics cannot leave the list half-updated
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
