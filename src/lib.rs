//! # EV Charging Station Booking Engine
//!
//! Reservation engine for shared charging stations: users book exclusive
//! time slots and pay for them, and the engine guarantees that no two
//! accepted bookings for the same station ever overlap in time.
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, types and traits (booking,
//!   station, clock, errors)
//! - **application**: Business logic — pricing, the booking service and
//!   the lifecycle sweeper
//! - **infrastructure**: External concerns (storage backends)
//! - **notifications**: Broadcast events on every booking transition
//! - **shared**: Shutdown coordination for background tasks
//!
//! HTTP, authentication, payment gateways and email delivery are callers
//! and collaborators of this crate, not part of it.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod notifications;
pub mod shared;

pub use application::services::{
    start_completion_task, start_expiry_task, BookingService, BookingSweeper, PaymentOutcome,
};
pub use config::{default_config_path, AppConfig, BookingPolicy};
pub use domain::{
    Booking, BookingRepository, BookingStatus, ChargingStation, Clock, DomainError, DomainResult,
    ManualClock, StationRepository, SystemClock, TimeSlot,
};
pub use infrastructure::{InMemoryBookingRepository, InMemoryStationRepository};
pub use notifications::{create_event_bus, BookingEvent, EventBus, SharedEventBus};
pub use shared::ShutdownSignal;
