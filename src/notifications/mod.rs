//! Booking transition notifications
//!
//! The engine publishes a [`BookingEvent`] on every state transition;
//! delivery (email, UI push) is a subscriber concern.

pub mod event_bus;
pub mod events;

pub use event_bus::{create_event_bus, EventBus, EventSubscriber, SharedEventBus};
pub use events::{BookingEvent, BookingTransition};
