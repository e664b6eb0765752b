//! Slot pricing
//!
//! Billing rule: any started hour is due in full, minimum one hour.
//! The amount is computed once, when the booking is created, and is never
//! recomputed from the stored slot, so later rate changes do not alter
//! past charges.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::booking::TimeSlot;

/// Number of hours billed for `slot`, rounding any started hour up.
pub fn billed_hours(slot: &TimeSlot) -> i64 {
    let minutes = slot.duration().num_minutes();
    let hours = (minutes + 59) / 60;
    hours.max(1)
}

/// Amount due for `slot` at `hourly_rate`, rounded half-up to 2 decimals.
pub fn amount_due(hourly_rate: Decimal, slot: &TimeSlot) -> Decimal {
    let amount = hourly_rate * Decimal::from(billed_hours(slot));
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, hour, min, 0).unwrap()
    }

    fn slot(s: (u32, u32), e: (u32, u32)) -> TimeSlot {
        TimeSlot::new(at(s.0, s.1), at(e.0, e.1)).unwrap()
    }

    fn rate(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn whole_hours_billed_exactly() {
        let amount = amount_due(rate("5.00"), &slot((14, 0), (16, 0)));
        assert_eq!(amount, rate("10.00"));
    }

    #[test]
    fn started_hour_billed_in_full() {
        // 2h30 -> 3 hours
        assert_eq!(amount_due(rate("5.00"), &slot((14, 0), (16, 30))), rate("15.00"));
        // 1h01 -> 2 hours
        assert_eq!(amount_due(rate("5.00"), &slot((14, 0), (15, 1))), rate("10.00"));
    }

    #[test]
    fn sub_hour_slot_billed_one_hour() {
        assert_eq!(billed_hours(&slot((14, 0), (14, 30))), 1);
        assert_eq!(amount_due(rate("3.50"), &slot((14, 0), (14, 10))), rate("3.50"));
    }

    #[test]
    fn amount_rounded_half_up_to_two_decimals() {
        // 4.625 * 1h = 4.625 -> 4.63 with half-up rounding
        assert_eq!(amount_due(rate("4.625"), &slot((14, 0), (15, 0))), rate("4.63"));
        assert_eq!(amount_due(rate("4.624"), &slot((14, 0), (15, 0))), rate("4.62"));
    }

    #[test]
    fn multi_day_slot() {
        // 3 days = 72 hours
        let slot = TimeSlot::new(at(8, 0), at(8, 0) + chrono::Duration::days(3)).unwrap();
        assert_eq!(billed_hours(&slot), 72);
        assert_eq!(amount_due(rate("2.00"), &slot), rate("144.00"));
    }
}
