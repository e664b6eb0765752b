//! Configuration module
//!
//! Loaded from a TOML file (`~/.config/ev-booking/config.toml` by default,
//! override with the `EV_BOOKING_CONFIG` environment variable). Every knob
//! has a default so a missing file or section still yields a working
//! engine.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub booking: BookingPolicy,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter, e.g. "info" or "ev_booking=debug"
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Booking policy knobs. Bounds and deadlines the engine enforces;
/// none of them are hard-coded in the services.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BookingPolicy {
    /// How long a Pending booking may wait for payment
    pub payment_timeout_minutes: i64,
    /// Shortest bookable slot
    pub min_duration_hours: i64,
    /// Longest bookable slot, in days
    pub max_duration_days: i64,
    /// Active (Pending/Confirmed) bookings a single user may hold;
    /// 0 disables the limit
    pub max_concurrent_bookings: usize,
    /// Latest cancellation point, in hours before the slot starts
    pub cancellation_deadline_hours: i64,
    /// Complete pass ignores bookings that ended within this window
    pub completion_grace_minutes: i64,
    /// Expire pass cadence
    pub expiry_check_interval_secs: u64,
    /// Complete pass cadence
    pub completion_check_interval_secs: u64,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            payment_timeout_minutes: 15,
            min_duration_hours: 1,
            max_duration_days: 7,
            max_concurrent_bookings: 5,
            cancellation_deadline_hours: 24,
            completion_grace_minutes: 30,
            expiry_check_interval_secs: 300,
            completion_check_interval_secs: 3600,
        }
    }
}

/// Default location of the config file.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ev-booking")
        .join("config.toml")
}
