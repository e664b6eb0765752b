//! Notification events
//!
//! One event per booking state transition. How a subscriber delivers them
//! (email, UI push) is outside this crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::booking::{Booking, BookingStatus};

/// Snapshot of a booking at the moment of a transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingTransition {
    pub booking_id: Uuid,
    pub station_id: Uuid,
    pub user_id: Uuid,
    pub status: BookingStatus,
    pub timestamp: DateTime<Utc>,
}

impl From<&Booking> for BookingTransition {
    fn from(booking: &Booking) -> Self {
        Self {
            booking_id: booking.id,
            station_id: booking.station_id,
            user_id: booking.user_id,
            status: booking.status,
            timestamp: booking.updated_at,
        }
    }
}

/// Event types for notifications
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum BookingEvent {
    BookingCreated(BookingTransition),
    BookingConfirmed(BookingTransition),
    BookingCancelled(BookingTransition),
    BookingExpired(BookingTransition),
    BookingCompleted(BookingTransition),
}

impl BookingEvent {
    pub fn created(booking: &Booking) -> Self {
        Self::BookingCreated(booking.into())
    }

    pub fn confirmed(booking: &Booking) -> Self {
        Self::BookingConfirmed(booking.into())
    }

    pub fn cancelled(booking: &Booking) -> Self {
        Self::BookingCancelled(booking.into())
    }

    pub fn expired(booking: &Booking) -> Self {
        Self::BookingExpired(booking.into())
    }

    pub fn completed(booking: &Booking) -> Self {
        Self::BookingCompleted(booking.into())
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            Self::BookingCreated(_) => "booking_created",
            Self::BookingConfirmed(_) => "booking_confirmed",
            Self::BookingCancelled(_) => "booking_cancelled",
            Self::BookingExpired(_) => "booking_expired",
            Self::BookingCompleted(_) => "booking_completed",
        }
    }

    pub fn booking_id(&self) -> Uuid {
        match self {
            Self::BookingCreated(t)
            | Self::BookingConfirmed(t)
            | Self::BookingCancelled(t)
            | Self::BookingExpired(t)
            | Self::BookingCompleted(t) => t.booking_id,
        }
    }
}
