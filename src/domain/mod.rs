//! Core business entities, types and traits

pub mod booking;
pub mod clock;
pub mod error;
pub mod station;

pub use booking::{Booking, BookingRepository, BookingStatus, TimeSlot};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{DomainError, DomainResult};
pub use station::{ChargingStation, StationRepository};
