//! Booking repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::model::{Booking, TimeSlot};
use crate::domain::DomainResult;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Save a new booking
    async fn save(&self, booking: Booking) -> DomainResult<()>;

    /// Find booking by ID
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Booking>>;

    /// Update an existing booking
    async fn update(&self, booking: Booking) -> DomainResult<()>;

    /// Find Pending/Confirmed bookings for a station whose slot overlaps `slot`
    async fn find_blocking_overlaps(
        &self,
        station_id: Uuid,
        slot: TimeSlot,
    ) -> DomainResult<Vec<Booking>>;

    /// Find Pending bookings whose payment deadline has passed
    async fn find_expired_pending(&self, now: DateTime<Utc>) -> DomainResult<Vec<Booking>>;

    /// Find Confirmed bookings whose slot ended before `cutoff`
    async fn find_completable(&self, cutoff: DateTime<Utc>) -> DomainResult<Vec<Booking>>;

    /// Number of Pending/Confirmed bookings held by a user
    async fn count_active_for_user(&self, user_id: Uuid) -> DomainResult<usize>;

    /// All bookings held by a user, most recent slot first
    async fn find_by_user(&self, user_id: Uuid) -> DomainResult<Vec<Booking>>;

    /// All bookings on a station, most recent slot first
    async fn find_by_station(&self, station_id: Uuid) -> DomainResult<Vec<Booking>>;
}
