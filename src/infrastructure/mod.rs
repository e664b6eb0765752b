//! External concerns (storage backends)

pub mod storage;

pub use storage::{InMemoryBookingRepository, InMemoryStationRepository};
