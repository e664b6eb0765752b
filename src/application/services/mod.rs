//! Application services

pub mod booking;
pub mod booking_sweeper;

pub use booking::{BookingService, PaymentOutcome};
pub use booking_sweeper::{start_completion_task, start_expiry_task, BookingSweeper};
