//! Month-length-safe date arithmetic
//!
//! Card billing days are stored as plain day numbers (1-31). Projecting them
//! onto a real month clamps to the month's last day, so a closing day of 31
//! lands on Feb 28 (or 29) in February.

use chrono::{Datelike, NaiveDate};

use crate::error::{FaturaError, FaturaResult};
use crate::models::InvoicePeriod;

/// Number of days in `month` (1-12) of `year`.
///
/// Returns `None` for a month outside 1-12 or a year chrono cannot represent.
pub fn last_day_of_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = InvoicePeriod::of_date(first).next();
    let next_first = NaiveDate::from_ymd_opt(next.year, next.month, 1)?;
    Some(next_first.pred_opt()?.day())
}

/// The date `day` of `month`, clamped to the month's last day.
///
/// Day 0 is rejected rather than clamped.
pub fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    if day == 0 {
        return None;
    }
    let day = day.min(last_day_of_month(year, month)?);
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Add `months` to `date`, keeping the day of month where possible.
///
/// Jan 31 plus one month is Feb 28 (or 29), never early March.
pub fn add_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let target = InvoicePeriod::of_date(date).shift(months);
    clamped_date(target.year, target.month, date.day())
}

/// Project a billing day onto `period`, reporting impossible dates as
/// data-integrity errors.
pub fn billing_date(period: InvoicePeriod, day: u32) -> FaturaResult<NaiveDate> {
    clamped_date(period.year, period.month, day).ok_or(FaturaError::InvalidDate {
        year: period.year,
        month: period.month,
        day,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(last_day_of_month(2025, 1), Some(31));
        assert_eq!(last_day_of_month(2025, 2), Some(28));
        assert_eq!(last_day_of_month(2024, 2), Some(29));
        assert_eq!(last_day_of_month(1900, 2), Some(28));
        assert_eq!(last_day_of_month(2000, 2), Some(29));
        assert_eq!(last_day_of_month(2025, 4), Some(30));
        assert_eq!(last_day_of_month(2025, 12), Some(31));
        assert_eq!(last_day_of_month(2025, 13), None);
    }

    #[test]
    fn test_clamped_date() {
        assert_eq!(clamped_date(2025, 2, 31), Some(date(2025, 2, 28)));
        assert_eq!(clamped_date(2024, 2, 31), Some(date(2024, 2, 29)));
        assert_eq!(clamped_date(2025, 4, 31), Some(date(2025, 4, 30)));
        assert_eq!(clamped_date(2025, 6, 10), Some(date(2025, 6, 10)));
        assert_eq!(clamped_date(2025, 6, 0), None);
    }

    #[test]
    fn test_add_months() {
        assert_eq!(add_months(date(2025, 1, 31), 1), Some(date(2025, 2, 28)));
        assert_eq!(add_months(date(2025, 11, 15), 2), Some(date(2026, 1, 15)));
        assert_eq!(add_months(date(2025, 12, 31), 14), Some(date(2027, 2, 28)));
        assert_eq!(add_months(date(2025, 3, 31), -1), Some(date(2025, 2, 28)));
        assert_eq!(add_months(date(2025, 1, 10), -1), Some(date(2024, 12, 10)));
    }

    #[test]
    fn test_billing_date_reports_invalid_day() {
        let period = InvoicePeriod::new(2025, 2).unwrap();
        assert_eq!(billing_date(period, 31).unwrap(), date(2025, 2, 28));
        assert!(matches!(
            billing_date(period, 0),
            Err(FaturaError::InvalidDate { day: 0, .. })
        ));
    }
}
