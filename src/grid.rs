//! Month grids: the days to display for a month, padded to whole weeks

use chrono::{Datelike, NaiveDate, Weekday};

use crate::config::DEFAULT_WEEK_START;
use crate::dates;

/// One month, as displayed in a calendar view
#[derive(Clone, Debug, PartialEq)]
pub struct CalendarMonth {
    anchor: NaiveDate,
    days: Vec<NaiveDate>,
}

impl CalendarMonth {
    /// The first day of the displayed month
    pub fn anchor(&self) -> NaiveDate { self.anchor }
    /// Every displayed day, including the days of adjacent months that complete the first and last weeks
    pub fn days(&self) -> &[NaiveDate] { &self.days }
    pub fn len(&self) -> usize { self.days.len() }
    pub fn is_empty(&self) -> bool { self.days.is_empty() }

    /// The displayed days, one week at a time
    pub fn weeks(&self) -> impl Iterator<Item = &[NaiveDate]> {
        self.days.chunks(7)
    }

    /// Whether `day` belongs to the displayed month (rather than to a padding day)
    pub fn is_in_month(&self, day: NaiveDate) -> bool {
        day.year() == self.anchor.year() && day.month() == self.anchor.month()
    }

    pub fn first_day(&self) -> Option<NaiveDate> { self.days.first().copied() }
    pub fn last_day(&self) -> Option<NaiveDate> { self.days.last().copied() }
}


/// Builds [`CalendarMonth`]s, for a given first day of the week
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CalendarGridBuilder {
    week_start: Weekday,
}

impl Default for CalendarGridBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_WEEK_START)
    }
}

impl CalendarGridBuilder {
    pub fn new(week_start: Weekday) -> Self {
        Self { week_start }
    }

    pub fn week_start(&self) -> Weekday {
        self.week_start
    }

    /// The days to display for the month `anchor_month` is in.
    ///
    /// The result always spans whole weeks (from 4 to 6 of them), starting on the configured week start.
    /// Returns `None` when these weeks would go past the range of dates `chrono` supports.
    pub fn build(&self, anchor_month: NaiveDate) -> Option<CalendarMonth> {
        let first = dates::start_of_month(anchor_month)?;
        let start = dates::start_of_week(first, self.week_start)?;
        let end = dates::end_of_week(dates::end_of_month(anchor_month)?, self.week_start)?;

        Some(CalendarMonth {
            anchor: first,
            days: dates::days_between(start, end).collect(),
        })
    }
}
