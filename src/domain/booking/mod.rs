//! Booking aggregate
//!
//! Contains the Booking entity, its lifecycle state machine, the TimeSlot
//! interval type, and the repository interface.

pub mod model;
pub mod repository;

pub use model::{Booking, BookingStatus, TimeSlot};
pub use repository::BookingRepository;
