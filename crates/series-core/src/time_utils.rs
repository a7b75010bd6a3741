use chrono::{Months, NaiveDate};

// ── Month-end dates ───────────────────────────────────────────────────────────

/// Last calendar day of `(year, month)`.
///
/// Returns `None` when `month` is outside `1..=12` or the date is not
/// representable.
pub fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    first.checked_add_months(Months::new(1))?.pred_opt()
}

/// Format a date as an ISO 8601 calendar date (`YYYY-MM-DD`).
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_end_regular_months() {
        assert_eq!(month_end(2020, 1), NaiveDate::from_ymd_opt(2020, 1, 31));
        assert_eq!(month_end(2020, 4), NaiveDate::from_ymd_opt(2020, 4, 30));
        assert_eq!(month_end(2021, 12), NaiveDate::from_ymd_opt(2021, 12, 31));
    }

    #[test]
    fn test_month_end_february_leap_years() {
        assert_eq!(month_end(2020, 2), NaiveDate::from_ymd_opt(2020, 2, 29));
        assert_eq!(month_end(2021, 2), NaiveDate::from_ymd_opt(2021, 2, 28));
        assert_eq!(month_end(1900, 2), NaiveDate::from_ymd_opt(1900, 2, 28));
        assert_eq!(month_end(2000, 2), NaiveDate::from_ymd_opt(2000, 2, 29));
    }

    #[test]
    fn test_month_end_invalid_month() {
        assert_eq!(month_end(2020, 0), None);
        assert_eq!(month_end(2020, 13), None);
    }

    #[test]
    fn test_format_iso_date() {
        let date = NaiveDate::from_ymd_opt(2019, 3, 31).unwrap();
        assert_eq!(format_iso_date(date), "2019-03-31");
    }
}
