//! Formatting helpers for listing records.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

const MILLIS_PER_DAY: u64 = 24 * 60 * 60 * 1000;

/// Approximate age since `plant_date`: days under a month, months under a
/// year, whole years after that.
///
/// The plant date counts from midnight and a started day counts as a whole
/// day.
pub fn tree_age(plant_date: NaiveDate, now: NaiveDateTime) -> String {
    let planted = plant_date.and_time(NaiveTime::default());
    let millis = (now - planted).num_milliseconds().unsigned_abs();
    let days = millis.div_ceil(MILLIS_PER_DAY);
    if days < 30 {
        format!("{} days", days)
    } else if days < 365 {
        format!("{} months", days / 30)
    } else {
        format!("{} years", days / 365)
    }
}

/// Harvest amount with two decimals, as shown in production tables.
pub fn format_cartons(total: f64) -> String {
    format!("{:.2}", total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, hour: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(hour, 0, 0).unwrap()
    }

    #[test]
    fn test_age_in_days() {
        assert_eq!(tree_age(date(2024, 5, 1), at(2024, 5, 1, 0)), "0 days");
        assert_eq!(tree_age(date(2024, 5, 1), at(2024, 5, 1, 9)), "1 days");
        assert_eq!(tree_age(date(2024, 5, 1), at(2024, 5, 30, 0)), "29 days");
    }

    #[test]
    fn test_partial_day_rounds_up() {
        // 29 days and a few hours counts as 30
        assert_eq!(tree_age(date(2024, 5, 1), at(2024, 5, 30, 8)), "1 months");
        // 364 days and a few hours counts as 365
        assert_eq!(tree_age(date(2023, 5, 1), at(2024, 4, 29, 8)), "1 years");
    }

    #[test]
    fn test_age_in_months() {
        assert_eq!(tree_age(date(2024, 5, 1), at(2024, 5, 31, 0)), "1 months");
        assert_eq!(tree_age(date(2024, 1, 1), at(2024, 12, 30, 0)), "12 months");
    }

    #[test]
    fn test_age_in_years() {
        assert_eq!(tree_age(date(2020, 3, 1), at(2024, 3, 1, 12)), "4 years");
    }

    #[test]
    fn test_future_date_uses_absolute_difference() {
        assert_eq!(tree_age(date(2024, 6, 10), at(2024, 6, 1, 0)), "9 days");
        assert_eq!(tree_age(date(2024, 6, 10), at(2024, 6, 1, 12)), "9 days");
    }

    #[test]
    fn test_format_cartons() {
        assert_eq!(format_cartons(10.25), "10.25");
        assert_eq!(format_cartons(3.0), "3.00");
    }
}
