//! In-memory repository implementations
//!
//! DashMap-backed stores for development and testing. Query methods scan
//! and filter; good enough at this scale, and the trait boundary keeps a
//! database-backed implementation drop-in.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::booking::{Booking, BookingRepository, BookingStatus, TimeSlot};
use crate::domain::station::{ChargingStation, StationRepository};
use crate::domain::{DomainError, DomainResult};

pub struct InMemoryBookingRepository {
    bookings: DashMap<Uuid, Booking>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self {
            bookings: DashMap::new(),
        }
    }
}

impl Default for InMemoryBookingRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn save(&self, booking: Booking) -> DomainResult<()> {
        self.bookings.insert(booking.id, booking);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Booking>> {
        Ok(self.bookings.get(&id).map(|b| b.clone()))
    }

    async fn update(&self, booking: Booking) -> DomainResult<()> {
        if !self.bookings.contains_key(&booking.id) {
            return Err(DomainError::NotFound {
                entity: "Booking",
                field: "id",
                value: booking.id.to_string(),
            });
        }
        self.bookings.insert(booking.id, booking);
        Ok(())
    }

    async fn find_blocking_overlaps(
        &self,
        station_id: Uuid,
        slot: TimeSlot,
    ) -> DomainResult<Vec<Booking>> {
        Ok(self
            .bookings
            .iter()
            .filter(|b| {
                b.station_id == station_id && b.is_blocking() && b.slot.overlaps(&slot)
            })
            .map(|b| b.clone())
            .collect())
    }

    async fn find_expired_pending(&self, now: DateTime<Utc>) -> DomainResult<Vec<Booking>> {
        Ok(self
            .bookings
            .iter()
            .filter(|b| {
                b.status == BookingStatus::Pending
                    && matches!(b.expires_at, Some(deadline) if deadline < now)
            })
            .map(|b| b.clone())
            .collect())
    }

    async fn find_completable(&self, cutoff: DateTime<Utc>) -> DomainResult<Vec<Booking>> {
        Ok(self
            .bookings
            .iter()
            .filter(|b| b.status == BookingStatus::Confirmed && b.slot.end < cutoff)
            .map(|b| b.clone())
            .collect())
    }

    async fn count_active_for_user(&self, user_id: Uuid) -> DomainResult<usize> {
        Ok(self
            .bookings
            .iter()
            .filter(|b| b.user_id == user_id && b.is_blocking())
            .count())
    }

    async fn find_by_user(&self, user_id: Uuid) -> DomainResult<Vec<Booking>> {
        let mut bookings: Vec<Booking> = self
            .bookings
            .iter()
            .filter(|b| b.user_id == user_id)
            .map(|b| b.clone())
            .collect();
        bookings.sort_by_key(|b| std::cmp::Reverse(b.slot.start));
        Ok(bookings)
    }

    async fn find_by_station(&self, station_id: Uuid) -> DomainResult<Vec<Booking>> {
        let mut bookings: Vec<Booking> = self
            .bookings
            .iter()
            .filter(|b| b.station_id == station_id)
            .map(|b| b.clone())
            .collect();
        bookings.sort_by_key(|b| std::cmp::Reverse(b.slot.start));
        Ok(bookings)
    }
}

pub struct InMemoryStationRepository {
    stations: DashMap<Uuid, ChargingStation>,
}

impl InMemoryStationRepository {
    pub fn new() -> Self {
        Self {
            stations: DashMap::new(),
        }
    }
}

impl Default for InMemoryStationRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StationRepository for InMemoryStationRepository {
    async fn save(&self, station: ChargingStation) -> DomainResult<()> {
        self.stations.insert(station.id, station);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<ChargingStation>> {
        Ok(self.stations.get(&id).map(|s| s.clone()))
    }

    async fn update(&self, station: ChargingStation) -> DomainResult<()> {
        if !self.stations.contains_key(&station.id) {
            return Err(DomainError::NotFound {
                entity: "ChargingStation",
                field: "id",
                value: station.id.to_string(),
            });
        }
        self.stations.insert(station.id, station);
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────
