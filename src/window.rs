use chrono::{Datelike, NaiveDate, Utc};

/// Start of the reporting window: the first day of the month six months
/// before the current one, so the window covers six full months plus the
/// current month-to-date.
pub fn window_start() -> NaiveDate {
    window_start_from(Utc::now().date_naive())
}

pub fn window_start_from(anchor: NaiveDate) -> NaiveDate {
    let months = anchor.year() * 12 + anchor.month0() as i32 - 6;
    NaiveDate::from_ymd_opt(months.div_euclid(12), months.rem_euclid(12) as u32 + 1, 1)
        .unwrap_or(anchor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn window_starts_six_months_back_on_the_first() {
        assert_eq!(window_start_from(date(2025, 8, 19)), date(2025, 2, 1));
        assert_eq!(window_start_from(date(2025, 8, 1)), date(2025, 2, 1));
    }

    #[test]
    fn window_crosses_year_boundaries() {
        assert_eq!(window_start_from(date(2025, 3, 31)), date(2024, 9, 1));
        assert_eq!(window_start_from(date(2025, 1, 5)), date(2024, 7, 1));
    }
}
