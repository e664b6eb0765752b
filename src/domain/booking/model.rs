//! Booking domain entity

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{DomainError, DomainResult};

/// Half-open time interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeSlot {
    /// Build a slot, rejecting empty or inverted intervals.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> DomainResult<Self> {
        if end <= start {
            return Err(DomainError::Validation(
                "End of slot must be after its start".to_string(),
            ));
        }
        Ok(Self { start, end })
    }

    /// Two half-open slots overlap iff each one starts before the other ends.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// Booking lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    /// Created, waiting for payment before the expiry deadline
    Pending,
    /// Payment received, slot is held
    Confirmed,
    /// Slot elapsed after confirmation
    Completed,
    /// Cancelled by the holder or the station owner
    Cancelled,
    /// Payment deadline passed without confirmation
    Expired,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
            Self::Expired => "Expired",
        }
    }

    /// Statuses that count toward the no-overlap rule.
    pub fn is_blocking(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Expired)
    }

    /// Edges of the lifecycle state machine. Anything not listed here
    /// is an invalid transition and is never "fixed up".
    pub fn can_transition_to(&self, to: BookingStatus) -> bool {
        matches!(
            (self, to),
            (Self::Pending, BookingStatus::Confirmed)
                | (Self::Pending, BookingStatus::Cancelled)
                | (Self::Pending, BookingStatus::Expired)
                | (Self::Confirmed, BookingStatus::Cancelled)
                | (Self::Confirmed, BookingStatus::Completed)
        )
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A claim on a charging station for a time slot, with billing and
/// lifecycle state.
#[derive(Debug, Clone)]
pub struct Booking {
    /// Unique booking ID
    pub id: Uuid,
    /// Station being booked
    pub station_id: Uuid,
    /// User holding the booking
    pub user_id: Uuid,
    /// Reserved time slot
    pub slot: TimeSlot,
    /// Current lifecycle status
    pub status: BookingStatus,
    /// Amount billed at creation; never recomputed afterwards
    pub amount_due: Decimal,
    /// Reference to the successful payment, set on confirmation
    pub payment_ref: Option<String>,
    /// Payment deadline; present exactly while the booking is Pending
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(
        station_id: Uuid,
        user_id: Uuid,
        slot: TimeSlot,
        amount_due: Decimal,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            station_id,
            user_id,
            slot,
            status: BookingStatus::Pending,
            amount_due,
            payment_ref: None,
            expires_at: Some(expires_at),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the payment deadline has passed at `now`.
    pub fn payment_window_elapsed(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(deadline) if now >= deadline)
    }

    pub fn is_blocking(&self) -> bool {
        self.status.is_blocking()
    }

    fn transition(&mut self, to: BookingStatus, now: DateTime<Utc>) -> DomainResult<()> {
        if !self.status.can_transition_to(to) {
            return Err(DomainError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        // The deadline only exists while Pending, and no edge leads back.
        self.expires_at = None;
        self.updated_at = now;
        Ok(())
    }

    /// Attach the payment and hold the slot.
    pub fn confirm(
        &mut self,
        payment_ref: impl Into<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        self.transition(BookingStatus::Confirmed, now)?;
        self.payment_ref = Some(payment_ref.into());
        Ok(())
    }

    /// Cancel this booking
    pub fn cancel(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.transition(BookingStatus::Cancelled, now)?;
        self.payment_ref = None;
        Ok(())
    }

    /// Mark as expired (payment deadline passed)
    pub fn expire(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.transition(BookingStatus::Expired, now)
    }

    /// Mark as completed (slot elapsed)
    pub fn complete(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.transition(BookingStatus::Completed, now)
    }
}

// ── Tests ──────────────────────────────────────────────────────
