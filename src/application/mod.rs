//! Business logic and use cases

pub mod pricing;
pub mod services;

pub use services::{BookingService, BookingSweeper, PaymentOutcome};
