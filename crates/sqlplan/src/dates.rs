// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Logical-date helpers: parsing, the lagged "today", and inclusive ranges.

use chrono::{Days, Local, NaiveDate};

use crate::error::{Error, Result};

/// Wire format of dates in requests and plan entries
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format of the dump-date placeholder value
pub const DUMPDATE_FORMAT: &str = "%Y%m%d";

/// Parse a `YYYY-MM-DD` request field
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|e| {
        Error::validation(field, format!("expected YYYY-MM-DD, got '{}': {}", value, e))
    })
}

/// The incremental logical date: the local calendar date minus `lag_days`
#[must_use]
pub fn today(lag_days: u64) -> NaiveDate {
    lagged(Local::now().date_naive(), lag_days)
}

/// `date - lag_days`, saturating at the earliest representable date
#[must_use]
pub fn lagged(date: NaiveDate, lag_days: u64) -> NaiveDate {
    date.checked_sub_days(Days::new(lag_days))
        .unwrap_or(NaiveDate::MIN)
}

/// Inclusive range of dates from `start` to `end`, stepping `step_days`.
///
/// The iterator is lazy and holds no shared state; calling `date_range`
/// again restarts it. Empty when `end < start`.
#[derive(Debug, Clone)]
pub struct DateRange {
    next: Option<NaiveDate>,
    end: NaiveDate,
    step: Days,
}

pub fn date_range(start: NaiveDate, end: NaiveDate, step_days: u64) -> Result<DateRange> {
    if step_days == 0 {
        return Err(Error::validation("interval", "step must be at least one day"));
    }
    Ok(DateRange {
        next: (start <= end).then_some(start),
        end,
        step: Days::new(step_days),
    })
}

impl Iterator for DateRange {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next?;
        self.next = current
            .checked_add_days(self.step)
            .filter(|d| *d <= self.end);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("start_date", "2022-01-31").unwrap(), ymd(2022, 1, 31));
        assert!(parse_date("start_date", " 2022-01-31 ").is_err());
    }

    #[test]
    fn test_parse_date_rejects_malformed() {
        for bad in ["2022/01/01", "20220101", "2022-02-30", "yesterday", ""] {
            let err = parse_date("end_date", bad).unwrap_err();
            assert_eq!(err.kind(), "validation");
            assert!(err.to_string().contains("end_date"), "{}", err);
        }
    }

    #[test]
    fn test_range_is_inclusive() {
        let dates: Vec<_> = date_range(ymd(2022, 1, 1), ymd(2022, 1, 3), 1)
            .unwrap()
            .collect();
        assert_eq!(dates, vec![ymd(2022, 1, 1), ymd(2022, 1, 2), ymd(2022, 1, 3)]);
    }

    #[test]
    fn test_range_count_across_month_and_leap_day() {
        let start = ymd(2024, 2, 27);
        let end = ymd(2024, 3, 2);
        let dates: Vec<_> = date_range(start, end, 1).unwrap().collect();
        assert_eq!(dates.len() as i64, (end - start).num_days() + 1);
        assert!(dates.contains(&ymd(2024, 2, 29)));
        assert_eq!(dates.last(), Some(&end));
    }

    #[test]
    fn test_range_single_day() {
        let day = ymd(2023, 8, 1);
        let dates: Vec<_> = date_range(day, day, 1).unwrap().collect();
        assert_eq!(dates, vec![day]);
    }

    #[test]
    fn test_range_empty_when_reversed() {
        assert_eq!(date_range(ymd(2022, 1, 3), ymd(2022, 1, 1), 1).unwrap().count(), 0);
    }

    #[test]
    fn test_range_with_interval() {
        let dates: Vec<_> = date_range(ymd(2022, 1, 1), ymd(2022, 1, 10), 2)
            .unwrap()
            .collect();
        assert_eq!(
            dates,
            vec![
                ymd(2022, 1, 1),
                ymd(2022, 1, 3),
                ymd(2022, 1, 5),
                ymd(2022, 1, 7),
                ymd(2022, 1, 9)
            ]
        );
    }

    #[test]
    fn test_range_zero_interval_rejected() {
        assert!(date_range(ymd(2022, 1, 1), ymd(2022, 1, 2), 0).is_err());
    }

    #[test]
    fn test_range_restarts() {
        let range = date_range(ymd(2022, 1, 1), ymd(2022, 1, 2), 1).unwrap();
        let first: Vec<_> = range.clone().collect();
        let second: Vec<_> = range.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_lagged() {
        assert_eq!(lagged(ymd(2022, 3, 1), 0), ymd(2022, 3, 1));
        assert_eq!(lagged(ymd(2022, 3, 1), 1), ymd(2022, 2, 28));
    }
}
