//! Month-window helpers for the statistics and bar chart endpoints.

use serde::Deserialize;
use time::{Date, Month};

use crate::Error;

/// The year used to anchor month windows when none is configured.
///
/// The seed dataset's sales all fall in this year.
pub const DEFAULT_REFERENCE_YEAR: i32 = 2021;

/// The query parameters accepted by the statistics and bar chart endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct MonthQuery {
    /// The zero-based month index (0 = January, 11 = December).
    pub month: Option<u8>,
}

/// A half-open Unix-timestamp range covering one calendar month in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MonthWindow {
    /// The first instant of the month (inclusive).
    pub start: i64,
    /// The first instant of the next month (exclusive).
    pub end: i64,
}

impl MonthWindow {
    /// Create the window for the given zero-based `month` of `reference_year`.
    ///
    /// December's window ends in January of the following year.
    ///
    /// # Errors
    /// Returns an [Error::InvalidMonth] if `month` is not in `0..=11`.
    pub fn from_month_index(reference_year: i32, month: u8) -> Result<Self, Error> {
        if month > 11 {
            return Err(Error::InvalidMonth(month));
        }

        let start_month = Month::try_from(month + 1).map_err(|_| Error::InvalidMonth(month))?;

        let (end_year, end_month) = if start_month == Month::December {
            (reference_year + 1, Month::January)
        } else {
            (reference_year, start_month.next())
        };

        let start = Date::from_calendar_date(reference_year, start_month, 1)
            .map_err(|_| Error::InvalidMonth(month))?;
        let end = Date::from_calendar_date(end_year, end_month, 1)
            .map_err(|_| Error::InvalidMonth(month))?;

        Ok(Self {
            start: start.midnight().assume_utc().unix_timestamp(),
            end: end.midnight().assume_utc().unix_timestamp(),
        })
    }
}

#[cfg(test)]
mod month_window_tests {
    use time::macros::datetime;

    use crate::Error;

    use super::MonthWindow;

    #[test]
    fn june_window_covers_the_whole_month() {
        let window = MonthWindow::from_month_index(2021, 5).unwrap();

        assert_eq!(window.start, datetime!(2021-06-01 00:00:00 UTC).unix_timestamp());
        assert_eq!(window.end, datetime!(2021-07-01 00:00:00 UTC).unix_timestamp());
    }

    #[test]
    fn december_window_ends_in_the_next_year() {
        let window = MonthWindow::from_month_index(2021, 11).unwrap();

        assert_eq!(window.start, datetime!(2021-12-01 00:00:00 UTC).unix_timestamp());
        assert_eq!(window.end, datetime!(2022-01-01 00:00:00 UTC).unix_timestamp());
    }

    #[test]
    fn month_out_of_range_is_rejected() {
        let got = MonthWindow::from_month_index(2021, 12);

        assert_eq!(got, Err(Error::InvalidMonth(12)));
    }

    #[test]
    fn windows_are_contiguous() {
        for month in 0..11u8 {
            let current = MonthWindow::from_month_index(2021, month).unwrap();
            let next = MonthWindow::from_month_index(2021, month + 1).unwrap();

            assert_eq!(current.end, next.start, "gap after month {month}");
        }
    }
}
