//! Booking orchestration service
//!
//! Owns the whole booking lifecycle: creation with conflict detection and
//! pricing, cancellation, payment confirmation, completion and read
//! queries. Creation runs its conflict check and insert under a
//! per-station lock so concurrent overlapping requests serialize per
//! station and at most one of them wins.

use std::sync::Arc;

use chrono::Duration;
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::pricing;
use crate::config::BookingPolicy;
use crate::domain::booking::{Booking, BookingRepository, BookingStatus, TimeSlot};
use crate::domain::station::{ChargingStation, StationRepository};
use crate::domain::{Clock, DomainError, DomainResult};
use crate::notifications::{BookingEvent, SharedEventBus};

/// Pass/fail signal from the external payment collaborator.
#[derive(Debug, Clone)]
pub struct PaymentOutcome {
    /// Opaque reference to the payment on the gateway side
    pub reference: String,
    pub succeeded: bool,
}

impl PaymentOutcome {
    pub fn succeeded(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            succeeded: true,
        }
    }

    pub fn failed(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            succeeded: false,
        }
    }
}

/// Service for booking operations
pub struct BookingService {
    bookings: Arc<dyn BookingRepository>,
    stations: Arc<dyn StationRepository>,
    clock: Arc<dyn Clock>,
    event_bus: SharedEventBus,
    policy: BookingPolicy,
    /// One guard per station, held across the conflict check and the
    /// insert. Requests against different stations never contend.
    station_locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl BookingService {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        stations: Arc<dyn StationRepository>,
        clock: Arc<dyn Clock>,
        event_bus: SharedEventBus,
        policy: BookingPolicy,
    ) -> Self {
        Self {
            bookings,
            stations,
            clock,
            event_bus,
            policy,
            station_locks: DashMap::new(),
        }
    }

    /// Create a booking for `slot` on `station_id`.
    ///
    /// The new booking starts Pending with a payment deadline of
    /// `policy.payment_timeout_minutes` from now.
    pub async fn create_booking(
        &self,
        station_id: Uuid,
        user_id: Uuid,
        slot: TimeSlot,
    ) -> DomainResult<Booking> {
        let now = self.clock.now();

        self.validate_slot(&slot, now)?;
        self.check_user_limit(user_id).await?;

        let station = self.load_station(station_id).await?;
        if !station.available {
            return Err(DomainError::Validation(
                "This station is not open for booking".to_string(),
            ));
        }

        let lock = self.station_lock(station_id);
        let _guard = lock.lock().await;

        let conflicts = self.bookings.find_blocking_overlaps(station_id, slot).await?;
        if !conflicts.is_empty() {
            warn!(
                %station_id,
                start = %slot.start,
                end = %slot.end,
                "Booking conflict detected"
            );
            return Err(DomainError::Conflict(
                "This slot is already booked. Please pick another period.".to_string(),
            ));
        }

        let amount = pricing::amount_due(station.hourly_rate, &slot);
        let expires_at = now + Duration::minutes(self.policy.payment_timeout_minutes);
        let booking = Booking::new(station_id, user_id, slot, amount, expires_at, now);
        self.bookings.save(booking.clone()).await?;
        drop(_guard);

        info!(
            booking_id = %booking.id,
            %station_id,
            amount = %amount,
            expires_at = %expires_at,
            "Booking created"
        );
        self.event_bus.publish(BookingEvent::created(&booking));
        Ok(booking)
    }

    /// Cancel a booking. Allowed for the holder and for the station
    /// owner, both no later than `policy.cancellation_deadline_hours`
    /// before the slot starts.
    pub async fn cancel_booking(&self, id: Uuid, requester_id: Uuid) -> DomainResult<Booking> {
        let now = self.clock.now();
        let mut booking = self.load_booking(id).await?;

        if booking.user_id != requester_id {
            let station = self.load_station(booking.station_id).await?;
            if station.owner_id != requester_id {
                return Err(DomainError::Unauthorized(
                    "You cannot cancel this booking".to_string(),
                ));
            }
        }

        if !booking.status.is_blocking() {
            return Err(DomainError::InvalidTransition {
                from: booking.status,
                to: BookingStatus::Cancelled,
            });
        }

        let hours_until_start = (booking.slot.start - now).num_hours();
        if hours_until_start < self.policy.cancellation_deadline_hours {
            return Err(DomainError::Validation(format!(
                "Cannot cancel less than {} hours before the start. {} hours remain.",
                self.policy.cancellation_deadline_hours, hours_until_start
            )));
        }

        booking.cancel(now)?;
        self.bookings.update(booking.clone()).await?;

        info!(booking_id = %id, requester_id = %requester_id, "Booking cancelled");
        self.event_bus.publish(BookingEvent::cancelled(&booking));
        Ok(booking)
    }

    /// Confirm a booking after an external payment succeeded.
    ///
    /// A confirm attempted past the payment deadline moves the booking to
    /// Expired and reports `Expired`; the stale Pending status stored by a
    /// not-yet-run sweep is never trusted.
    pub async fn confirm_booking(
        &self,
        id: Uuid,
        payment: &PaymentOutcome,
    ) -> DomainResult<Booking> {
        let now = self.clock.now();
        let mut booking = self.load_booking(id).await?;

        if booking.status != BookingStatus::Pending {
            return Err(DomainError::InvalidTransition {
                from: booking.status,
                to: BookingStatus::Confirmed,
            });
        }

        if booking.payment_window_elapsed(now) {
            booking.expire(now)?;
            self.bookings.update(booking.clone()).await?;
            warn!(booking_id = %id, "Confirm attempted after the payment deadline");
            self.event_bus.publish(BookingEvent::expired(&booking));
            return Err(DomainError::Expired(
                "Booking expired. The payment deadline has passed.".to_string(),
            ));
        }

        if !payment.succeeded {
            return Err(DomainError::Validation(format!(
                "Cannot confirm with an unsuccessful payment: {}",
                payment.reference
            )));
        }

        booking.confirm(payment.reference.clone(), now)?;
        self.bookings.update(booking.clone()).await?;

        info!(booking_id = %id, payment_ref = %payment.reference, "Booking confirmed");
        self.event_bus.publish(BookingEvent::confirmed(&booking));
        Ok(booking)
    }

    /// Mark a confirmed booking whose slot has ended as completed.
    /// Normally driven by the sweeper; callable directly for
    /// administrative correction.
    pub async fn complete_booking(&self, id: Uuid) -> DomainResult<Booking> {
        let now = self.clock.now();
        let mut booking = self.load_booking(id).await?;

        if booking.status != BookingStatus::Confirmed {
            return Err(DomainError::InvalidTransition {
                from: booking.status,
                to: BookingStatus::Completed,
            });
        }

        if now < booking.slot.end {
            return Err(DomainError::Validation(
                "Cannot complete a booking that has not ended yet".to_string(),
            ));
        }

        booking.complete(now)?;
        self.bookings.update(booking.clone()).await?;

        info!(booking_id = %id, "Booking completed");
        self.event_bus.publish(BookingEvent::completed(&booking));
        Ok(booking)
    }

    /// Whether `slot` is free on `station_id` right now.
    ///
    /// Plain read with no reservation guarantee; only `create_booking`
    /// binds a slot.
    pub async fn check_availability(&self, station_id: Uuid, slot: TimeSlot) -> DomainResult<bool> {
        self.load_station(station_id).await?;
        let conflicts = self.bookings.find_blocking_overlaps(station_id, slot).await?;
        Ok(conflicts.is_empty())
    }

    // ── Read queries ───────────────────────────────────────────

    /// Fetch a booking; only its holder and the station owner may see it.
    pub async fn get_booking(&self, id: Uuid, requester_id: Uuid) -> DomainResult<Booking> {
        let booking = self.load_booking(id).await?;
        if booking.user_id != requester_id {
            let station = self.load_station(booking.station_id).await?;
            if station.owner_id != requester_id {
                return Err(DomainError::Unauthorized(
                    "You cannot view this booking".to_string(),
                ));
            }
        }
        Ok(booking)
    }

    pub async fn bookings_for_user(&self, user_id: Uuid) -> DomainResult<Vec<Booking>> {
        self.bookings.find_by_user(user_id).await
    }

    pub async fn upcoming_bookings_for_user(&self, user_id: Uuid) -> DomainResult<Vec<Booking>> {
        let now = self.clock.now();
        let mut bookings = self.bookings.find_by_user(user_id).await?;
        bookings.retain(|b| b.slot.start > now);
        Ok(bookings)
    }

    pub async fn past_bookings_for_user(&self, user_id: Uuid) -> DomainResult<Vec<Booking>> {
        let now = self.clock.now();
        let mut bookings = self.bookings.find_by_user(user_id).await?;
        bookings.retain(|b| b.slot.end <= now);
        Ok(bookings)
    }

    /// All bookings on a station; restricted to the station owner.
    pub async fn bookings_for_station(
        &self,
        station_id: Uuid,
        requester_id: Uuid,
    ) -> DomainResult<Vec<Booking>> {
        let station = self.load_station(station_id).await?;
        if station.owner_id != requester_id {
            return Err(DomainError::Unauthorized(
                "You cannot view the bookings of this station".to_string(),
            ));
        }
        self.bookings.find_by_station(station_id).await
    }

    // ── Validation helpers ─────────────────────────────────────

    fn validate_slot(&self, slot: &TimeSlot, now: chrono::DateTime<chrono::Utc>) -> DomainResult<()> {
        if slot.start <= now {
            return Err(DomainError::Validation(
                "Start date must be in the future".to_string(),
            ));
        }

        let hours = slot.duration().num_hours();
        if hours < self.policy.min_duration_hours {
            return Err(DomainError::Validation(format!(
                "Minimum duration: {} hour(s)",
                self.policy.min_duration_hours
            )));
        }

        let max_hours = self.policy.max_duration_days * 24;
        if hours > max_hours {
            return Err(DomainError::Validation(format!(
                "Maximum duration: {} day(s) ({} hours). Requested: {} hours",
                self.policy.max_duration_days, max_hours, hours
            )));
        }

        Ok(())
    }

    /// Abuse-prevention heuristic; the count is a plain aggregate read,
    /// not part of the no-overlap guarantee.
    async fn check_user_limit(&self, user_id: Uuid) -> DomainResult<()> {
        if self.policy.max_concurrent_bookings == 0 {
            return Ok(());
        }
        let active = self.bookings.count_active_for_user(user_id).await?;
        if active >= self.policy.max_concurrent_bookings {
            return Err(DomainError::Validation(format!(
                "You have reached the limit of {} active bookings. \
                 Cancel one or wait for a booking to finish.",
                self.policy.max_concurrent_bookings
            )));
        }
        Ok(())
    }

    fn station_lock(&self, station_id: Uuid) -> Arc<Mutex<()>> {
        self.station_locks
            .entry(station_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn load_station(&self, id: Uuid) -> DomainResult<ChargingStation> {
        self.stations
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "ChargingStation",
                field: "id",
                value: id.to_string(),
            })
    }

    async fn load_booking(&self, id: Uuid) -> DomainResult<Booking> {
        self.bookings
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "Booking",
                field: "id",
                value: id.to_string(),
            })
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use rust_decimal::Decimal;

    use crate::domain::ManualClock;
    use crate::infrastructure::storage::{InMemoryBookingRepository, InMemoryStationRepository};
    use crate::notifications::create_event_bus;

    struct Fixture {
        service: BookingService,
        clock: Arc<ManualClock>,
        stations: Arc<InMemoryStationRepository>,
        station_id: Uuid,
        owner_id: Uuid,
        user_id: Uuid,
    }

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn rate(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    async fn fixture() -> Fixture {
        fixture_with_policy(BookingPolicy::default()).await
    }

    async fn fixture_with_policy(policy: BookingPolicy) -> Fixture {
        let bookings = Arc::new(InMemoryBookingRepository::new());
        let stations = Arc::new(InMemoryStationRepository::new());
        let clock = Arc::new(ManualClock::new(base_time()));

        let owner_id = Uuid::new_v4();
        let station = ChargingStation::new(owner_id, "Main Street A", rate("5.00"));
        let station_id = station.id;
        stations.save(station).await.unwrap();

        let service = BookingService::new(
            bookings,
            stations.clone(),
            clock.clone(),
            create_event_bus(),
            policy,
        );

        Fixture {
            service,
            clock,
            stations,
            station_id,
            owner_id,
            user_id: Uuid::new_v4(),
        }
    }

    /// Tomorrow 14:00 to 16:00, well within every default policy bound.
    fn tomorrow_slot() -> TimeSlot {
        let start = base_time() + Duration::hours(26);
        TimeSlot::new(start, start + Duration::hours(2)).unwrap()
    }

    #[tokio::test]
    async fn create_persists_pending_booking_with_price_and_deadline() {
        let fx = fixture().await;

        let booking = fx
            .service
            .create_booking(fx.station_id, fx.user_id, tomorrow_slot())
            .await
            .unwrap();

        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.amount_due, rate("10.00"));
        assert_eq!(
            booking.expires_at,
            Some(base_time() + Duration::minutes(15))
        );

        let loaded = fx.service.get_booking(booking.id, fx.user_id).await.unwrap();
        assert_eq!(loaded.status, BookingStatus::Pending);
    }

    #[tokio::test]
    async fn create_rejects_start_in_the_past() {
        let fx = fixture().await;
        let slot = TimeSlot::new(base_time() - Duration::hours(2), base_time() + Duration::hours(2))
            .unwrap();

        let err = fx
            .service
            .create_booking(fx.station_id, fx.user_id, slot)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn create_rejects_duration_out_of_bounds() {
        let fx = fixture().await;

        let start = base_time() + Duration::hours(26);
        let too_short = TimeSlot::new(start, start + Duration::minutes(30)).unwrap();
        let err = fx
            .service
            .create_booking(fx.station_id, fx.user_id, too_short)
            .await
            .unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.contains("Minimum duration: 1")),
            other => panic!("expected Validation, got {other:?}"),
        }

        let too_long = TimeSlot::new(start, start + Duration::days(8)).unwrap();
        let err = fx
            .service
            .create_booking(fx.station_id, fx.user_id, too_long)
            .await
            .unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.contains("Maximum duration: 7 day(s)")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_rejects_unknown_or_unavailable_station() {
        let fx = fixture().await;

        let err = fx
            .service
            .create_booking(Uuid::new_v4(), fx.user_id, tomorrow_slot())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));

        let mut station = fx.stations.find_by_id(fx.station_id).await.unwrap().unwrap();
        station.available = false;
        fx.stations.update(station).await.unwrap();

        let err = fx
            .service
            .create_booking(fx.station_id, fx.user_id, tomorrow_slot())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn create_rejects_overlapping_slot() {
        let fx = fixture().await;
        fx.service
            .create_booking(fx.station_id, fx.user_id, tomorrow_slot())
            .await
            .unwrap();

        let slot = tomorrow_slot();
        let shifted = TimeSlot::new(slot.start + Duration::hours(1), slot.end + Duration::hours(1))
            .unwrap();
        let err = fx
            .service
            .create_booking(fx.station_id, Uuid::new_v4(), shifted)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        // Back-to-back is fine: intervals are half-open.
        let adjacent = TimeSlot::new(slot.end, slot.end + Duration::hours(2)).unwrap();
        fx.service
            .create_booking(fx.station_id, Uuid::new_v4(), adjacent)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn cancelled_and_expired_bookings_do_not_block() {
        let fx = fixture().await;
        let booking = fx
            .service
            .create_booking(fx.station_id, fx.user_id, tomorrow_slot())
            .await
            .unwrap();

        fx.service.cancel_booking(booking.id, fx.user_id).await.unwrap();

        assert!(fx
            .service
            .check_availability(fx.station_id, tomorrow_slot())
            .await
            .unwrap());
        fx.service
            .create_booking(fx.station_id, fx.user_id, tomorrow_slot())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn create_enforces_per_user_active_limit() {
        let policy = BookingPolicy {
            max_concurrent_bookings: 2,
            ..BookingPolicy::default()
        };
        let fx = fixture_with_policy(policy).await;

        for i in 0..2 {
            let start = base_time() + Duration::days(i + 1);
            let slot = TimeSlot::new(start, start + Duration::hours(2)).unwrap();
            fx.service
                .create_booking(fx.station_id, fx.user_id, slot)
                .await
                .unwrap();
        }

        let start = base_time() + Duration::days(4);
        let slot = TimeSlot::new(start, start + Duration::hours(2)).unwrap();
        let err = fx
            .service
            .create_booking(fx.station_id, fx.user_id, slot)
            .await
            .unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.contains("limit of 2")),
            other => panic!("expected Validation, got {other:?}"),
        }

        // Another user is unaffected by this user's count.
        let start = base_time() + Duration::days(5);
        let slot = TimeSlot::new(start, start + Duration::hours(2)).unwrap();
        fx.service
            .create_booking(fx.station_id, Uuid::new_v4(), slot)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn zero_limit_disables_user_cap() {
        let policy = BookingPolicy {
            max_concurrent_bookings: 0,
            ..BookingPolicy::default()
        };
        let fx = fixture_with_policy(policy).await;

        for i in 0..6 {
            let start = base_time() + Duration::days(i + 1);
            let slot = TimeSlot::new(start, start + Duration::hours(2)).unwrap();
            fx.service
                .create_booking(fx.station_id, fx.user_id, slot)
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn cancel_requires_holder_or_station_owner() {
        let fx = fixture().await;
        let booking = fx
            .service
            .create_booking(fx.station_id, fx.user_id, tomorrow_slot())
            .await
            .unwrap();

        let err = fx
            .service
            .cancel_booking(booking.id, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));

        // Station owner may cancel.
        let cancelled = fx.service.cancel_booking(booking.id, fx.owner_id).await.unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
    }

    #[tokio::test]
    async fn cancel_rejected_close_to_start() {
        let fx = fixture().await;
        let booking = fx
            .service
            .create_booking(fx.station_id, fx.user_id, tomorrow_slot())
            .await
            .unwrap();

        // 26h before start at creation; move to 3h before.
        fx.clock.advance(Duration::hours(23));
        let err = fx
            .service
            .cancel_booking(booking.id, fx.user_id)
            .await
            .unwrap_err();
        match err {
            DomainError::Validation(msg) => {
                assert!(msg.contains("24 hours"));
                assert!(msg.contains("3 hours remain"));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn cancel_rejected_for_terminal_status() {
        let fx = fixture().await;
        let booking = fx
            .service
            .create_booking(fx.station_id, fx.user_id, tomorrow_slot())
            .await
            .unwrap();
        fx.service.cancel_booking(booking.id, fx.user_id).await.unwrap();

        let err = fx
            .service
            .cancel_booking(booking.id, fx.user_id)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidTransition {
                from: BookingStatus::Cancelled,
                to: BookingStatus::Cancelled,
            }
        ));
    }

    #[tokio::test]
    async fn confirmed_booking_can_be_cancelled_before_deadline() {
        let fx = fixture().await;
        let booking = fx
            .service
            .create_booking(fx.station_id, fx.user_id, tomorrow_slot())
            .await
            .unwrap();
        fx.service
            .confirm_booking(booking.id, &PaymentOutcome::succeeded("pay-1"))
            .await
            .unwrap();

        let cancelled = fx.service.cancel_booking(booking.id, fx.user_id).await.unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
    }

    #[tokio::test]
    async fn confirm_attaches_payment_and_clears_deadline() {
        let fx = fixture().await;
        let booking = fx
            .service
            .create_booking(fx.station_id, fx.user_id, tomorrow_slot())
            .await
            .unwrap();

        let confirmed = fx
            .service
            .confirm_booking(booking.id, &PaymentOutcome::succeeded("pay-42"))
            .await
            .unwrap();
        assert_eq!(confirmed.status, BookingStatus::Confirmed);
        assert_eq!(confirmed.payment_ref.as_deref(), Some("pay-42"));
        assert!(confirmed.expires_at.is_none());
    }

    #[tokio::test]
    async fn confirm_past_deadline_expires_the_booking() {
        let fx = fixture().await;
        let booking = fx
            .service
            .create_booking(fx.station_id, fx.user_id, tomorrow_slot())
            .await
            .unwrap();

        fx.clock.advance(Duration::minutes(16));
        let err = fx
            .service
            .confirm_booking(booking.id, &PaymentOutcome::succeeded("pay-42"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Expired(_)));

        // The side effect happened; the booking never reaches Confirmed.
        let stored = fx.service.get_booking(booking.id, fx.user_id).await.unwrap();
        assert_eq!(stored.status, BookingStatus::Expired);
    }

    #[tokio::test]
    async fn confirm_rejects_failed_payment() {
        let fx = fixture().await;
        let booking = fx
            .service
            .create_booking(fx.station_id, fx.user_id, tomorrow_slot())
            .await
            .unwrap();

        let err = fx
            .service
            .confirm_booking(booking.id, &PaymentOutcome::failed("pay-7"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let stored = fx.service.get_booking(booking.id, fx.user_id).await.unwrap();
        assert_eq!(stored.status, BookingStatus::Pending);
    }

    #[tokio::test]
    async fn confirm_rejects_non_pending_booking() {
        let fx = fixture().await;
        let booking = fx
            .service
            .create_booking(fx.station_id, fx.user_id, tomorrow_slot())
            .await
            .unwrap();
        fx.service.cancel_booking(booking.id, fx.user_id).await.unwrap();

        let err = fx
            .service
            .confirm_booking(booking.id, &PaymentOutcome::succeeded("pay-42"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn complete_requires_confirmed_and_ended_slot() {
        let fx = fixture().await;
        let booking = fx
            .service
            .create_booking(fx.station_id, fx.user_id, tomorrow_slot())
            .await
            .unwrap();

        let err = fx.service.complete_booking(booking.id).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));

        fx.service
            .confirm_booking(booking.id, &PaymentOutcome::succeeded("pay-1"))
            .await
            .unwrap();

        // Still running.
        let err = fx.service.complete_booking(booking.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        fx.clock.set(booking.slot.end);
        let completed = fx.service.complete_booking(booking.id).await.unwrap();
        assert_eq!(completed.status, BookingStatus::Completed);
    }

    #[tokio::test]
    async fn check_availability_reports_without_reserving() {
        let fx = fixture().await;
        assert!(fx
            .service
            .check_availability(fx.station_id, tomorrow_slot())
            .await
            .unwrap());

        fx.service
            .create_booking(fx.station_id, fx.user_id, tomorrow_slot())
            .await
            .unwrap();
        assert!(!fx
            .service
            .check_availability(fx.station_id, tomorrow_slot())
            .await
            .unwrap());

        let err = fx
            .service
            .check_availability(Uuid::new_v4(), tomorrow_slot())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn read_queries_split_upcoming_and_past() {
        let fx = fixture().await;
        let booking = fx
            .service
            .create_booking(fx.station_id, fx.user_id, tomorrow_slot())
            .await
            .unwrap();

        let upcoming = fx.service.upcoming_bookings_for_user(fx.user_id).await.unwrap();
        assert_eq!(upcoming.len(), 1);
        assert!(fx
            .service
            .past_bookings_for_user(fx.user_id)
            .await
            .unwrap()
            .is_empty());

        fx.clock.set(booking.slot.end + Duration::hours(1));
        assert!(fx
            .service
            .upcoming_bookings_for_user(fx.user_id)
            .await
            .unwrap()
            .is_empty());
        assert_eq!(
            fx.service.past_bookings_for_user(fx.user_id).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn station_bookings_restricted_to_owner() {
        let fx = fixture().await;
        fx.service
            .create_booking(fx.station_id, fx.user_id, tomorrow_slot())
            .await
            .unwrap();

        let listed = fx
            .service
            .bookings_for_station(fx.station_id, fx.owner_id)
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);

        let err = fx
            .service
            .bookings_for_station(fx.station_id, fx.user_id)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_overlapping_creates_admit_exactly_one() {
        let fx = Arc::new(fixture().await);
        let slot = tomorrow_slot();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let fx = fx.clone();
            handles.push(tokio::spawn(async move {
                fx.service
                    .create_booking(fx.station_id, Uuid::new_v4(), slot)
                    .await
            }));
        }

        let mut winners = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => winners += 1,
                Err(DomainError::Conflict(_)) => {}
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }
        assert_eq!(winners, 1);
        assert!(!fx
            .service
            .check_availability(fx.station_id, slot)
            .await
            .unwrap());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn different_stations_do_not_contend() {
        let fx = Arc::new(fixture().await);
        let other = ChargingStation::new(fx.owner_id, "Main Street B", rate("4.00"));
        let other_id = other.id;
        fx.stations.save(other).await.unwrap();

        let slot = tomorrow_slot();
        let a = {
            let fx = fx.clone();
            tokio::spawn(async move {
                fx.service.create_booking(fx.station_id, Uuid::new_v4(), slot).await
            })
        };
        let b = {
            let fx = fx.clone();
            tokio::spawn(
                async move { fx.service.create_booking(other_id, Uuid::new_v4(), slot).await },
            )
        };

        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();
    }
}
