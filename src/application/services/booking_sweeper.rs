//! Time-driven booking lifecycle sweeps
//!
//! Two independent periodic passes advance bookings without user action:
//! the expire pass moves overdue Pending bookings to Expired, the complete
//! pass moves finished Confirmed bookings to Completed. Each pass is
//! idempotent and isolates per-booking failures, so overlapping or retried
//! runs are safe and one bad booking never stalls the batch.

use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, info, warn};

use crate::config::BookingPolicy;
use crate::domain::booking::BookingRepository;
use crate::domain::{Clock, DomainResult};
use crate::notifications::{BookingEvent, SharedEventBus};
use crate::shared::shutdown::ShutdownSignal;

pub struct BookingSweeper {
    bookings: Arc<dyn BookingRepository>,
    clock: Arc<dyn Clock>,
    event_bus: SharedEventBus,
    policy: BookingPolicy,
}

impl BookingSweeper {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        clock: Arc<dyn Clock>,
        event_bus: SharedEventBus,
        policy: BookingPolicy,
    ) -> Self {
        Self {
            bookings,
            clock,
            event_bus,
            policy,
        }
    }

    /// Expire Pending bookings whose payment deadline has passed.
    /// Returns how many were transitioned.
    pub async fn run_expire_pass(&self) -> DomainResult<usize> {
        let now = self.clock.now();
        let overdue = self.bookings.find_expired_pending(now).await?;
        if overdue.is_empty() {
            debug!("No overdue pending bookings");
            return Ok(0);
        }

        info!(count = overdue.len(), "Expiring overdue pending bookings");

        let mut expired = 0;
        for mut booking in overdue {
            if let Err(e) = booking.expire(now) {
                // Advanced by a concurrent confirm or cancel since the query.
                warn!(booking_id = %booking.id, error = %e, "Skipping booking in expire pass");
                continue;
            }
            match self.bookings.update(booking.clone()).await {
                Ok(()) => {
                    info!(booking_id = %booking.id, "Booking expired (payment deadline passed)");
                    self.event_bus.publish(BookingEvent::expired(&booking));
                    expired += 1;
                }
                Err(e) => {
                    warn!(booking_id = %booking.id, error = %e, "Failed to expire booking");
                }
            }
        }

        Ok(expired)
    }

    /// Complete Confirmed bookings that ended before now minus the grace
    /// period. Returns how many were transitioned.
    pub async fn run_complete_pass(&self) -> DomainResult<usize> {
        let now = self.clock.now();
        // Grace period avoids racing a booking that just ended.
        let cutoff = now - Duration::minutes(self.policy.completion_grace_minutes);
        let finished = self.bookings.find_completable(cutoff).await?;
        if finished.is_empty() {
            debug!("No confirmed bookings to complete");
            return Ok(0);
        }

        info!(count = finished.len(), "Completing finished bookings");

        let mut completed = 0;
        for mut booking in finished {
            if let Err(e) = booking.complete(now) {
                warn!(booking_id = %booking.id, error = %e, "Skipping booking in complete pass");
                continue;
            }
            match self.bookings.update(booking.clone()).await {
                Ok(()) => {
                    info!(booking_id = %booking.id, "Booking completed (slot elapsed)");
                    self.event_bus.publish(BookingEvent::completed(&booking));
                    completed += 1;
                }
                Err(e) => {
                    warn!(booking_id = %booking.id, error = %e, "Failed to complete booking");
                }
            }
        }

        Ok(completed)
    }
}

/// Start the expire pass on its timer. Runs until shutdown.
pub fn start_expiry_task(sweeper: Arc<BookingSweeper>, shutdown: ShutdownSignal) {
    let interval_secs = sweeper.policy.expiry_check_interval_secs;
    tokio::spawn(async move {
        info!(check_interval = interval_secs, "Booking expiry task started");

        let mut interval = tokio::time::interval(std::time::Duration::from_secs(interval_secs));

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = sweeper.run_expire_pass().await {
                        warn!(error = %e, "Booking expiry pass error");
                    }
                }
                _ = shutdown.notified().wait() => {
                    info!("Booking expiry task shutting down");
                    break;
                }
            }
        }
    });
}

/// Start the complete pass on its timer. Runs until shutdown.
pub fn start_completion_task(sweeper: Arc<BookingSweeper>, shutdown: ShutdownSignal) {
    let interval_secs = sweeper.policy.completion_check_interval_secs;
    tokio::spawn(async move {
        info!(check_interval = interval_secs, "Booking completion task started");

        let mut interval = tokio::time::interval(std::time::Duration::from_secs(interval_secs));

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = sweeper.run_complete_pass().await {
                        warn!(error = %e, "Booking completion pass error");
                    }
                }
                _ = shutdown.notified().wait() => {
                    info!("Booking completion task shutting down");
                    break;
                }
            }
        }
    });
}

// ── Tests ──────────────────────────────────────────────────────
