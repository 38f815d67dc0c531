pub mod attendance;
pub mod dashboard;
pub mod growth;
pub mod membership;
pub mod revenue;

use chrono::NaiveDate;
use chrono::Datelike as _;

/// Grouping key for monthly series: the first day of the date's month.
pub fn month_id(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// `YYYY-MM` label for a month id.
pub fn month_label(month: NaiveDate) -> String {
    format!("{:04}-{:02}", month.year(), month.month())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_id() {
        let date = NaiveDate::from_ymd_opt(2023, 10, 15).unwrap();
        assert_eq!(month_id(date), NaiveDate::from_ymd_opt(2023, 10, 1).unwrap());
        assert_eq!(month_label(month_id(date)), "2023-10");
    }
}
