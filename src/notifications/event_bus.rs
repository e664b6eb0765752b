//! Event bus for broadcasting booking transitions to subscribers
//!
//! Uses a tokio broadcast channel for pub/sub. Publishing never blocks
//! the booking path; a bus with no subscribers simply drops the event.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::events::BookingEvent;

/// Default channel capacity
const DEFAULT_CAPACITY: usize = 1024;

/// Broadcasts booking events to all subscribers.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<BookingEvent>,
    subscriber_count: Arc<AtomicUsize>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            subscriber_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: BookingEvent) {
        let event_type = event.event_type();
        let booking_id = event.booking_id();

        match self.sender.send(event) {
            Ok(count) => {
                debug!(event_type, %booking_id, subscribers = count, "Event published");
            }
            Err(_) => {
                // No subscribers connected; normal for a bare engine.
                debug!(event_type, %booking_id, "Event published (no subscribers)");
            }
        }
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> EventSubscriber {
        let receiver = self.sender.subscribe();
        self.subscriber_count.fetch_add(1, Ordering::SeqCst);

        EventSubscriber {
            receiver,
            subscriber_count: self.subscriber_count.clone(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscriber_count.load(Ordering::SeqCst)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Receives events from the bus.
pub struct EventSubscriber {
    receiver: broadcast::Receiver<BookingEvent>,
    subscriber_count: Arc<AtomicUsize>,
}

impl EventSubscriber {
    /// Receive the next event. Returns `None` once the bus is gone.
    pub async fn recv(&mut self) -> Option<BookingEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    warn!(missed = count, "Event subscriber lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

impl Drop for EventSubscriber {
    fn drop(&mut self) {
        self.subscriber_count.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Shared event bus type
pub type SharedEventBus = Arc<EventBus>;

/// Create a shared event bus
pub fn create_event_bus() -> SharedEventBus {
    Arc::new(EventBus::new())
}
