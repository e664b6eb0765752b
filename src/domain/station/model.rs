//! Charging station domain entity

use rust_decimal::Decimal;
use uuid::Uuid;

/// A bookable charging station.
///
/// `available` is an owner-controlled toggle, independent of any booking
/// state; an unavailable station rejects new bookings but keeps existing
/// ones.
#[derive(Debug, Clone)]
pub struct ChargingStation {
    pub id: Uuid,
    /// User owning the station; may cancel and inspect its bookings
    pub owner_id: Uuid,
    pub name: String,
    /// Price per started hour
    pub hourly_rate: Decimal,
    pub available: bool,
}

impl ChargingStation {
    pub fn new(owner_id: Uuid, name: impl Into<String>, hourly_rate: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name: name.into(),
            hourly_rate,
            available: true,
        }
    }
}
