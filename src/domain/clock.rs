//! Time source abstraction
//!
//! All booking logic reads the current time through [`Clock`] instead of
//! calling `Utc::now()` directly, so deadline behavior is deterministic
//! under test.

use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};

/// Supplies the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to. Used by tests to drive
/// deadline and sweep behavior.
pub struct ManualClock {
    now: RwLock<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.write().unwrap() = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.write().unwrap();
        *now = *now + by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn manual_clock_advances() {
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        assert_eq!(clock.now(), start);

        clock.advance(Duration::minutes(30));
        assert_eq!(clock.now(), start + Duration::minutes(30));

        let later = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        clock.set(later);
        assert_eq!(clock.now(), later);
    }
}
