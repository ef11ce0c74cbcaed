//! The forward-looking window of local calendar days.

use chrono::{Duration, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::date_range::DateRange;
use crate::error::MeetupResult;
use crate::tag;

/// Consecutive local days, strictly increasing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarWindow {
    days: Vec<NaiveDate>,
}

/// "Today" in `tz`. Call once per run and pass the result to every window.
pub fn today_in(tz: &Tz) -> NaiveDate {
    Utc::now().with_timezone(tz).date_naive()
}

impl CalendarWindow {
    /// `length_days` consecutive days starting at `today + anchor_offset_days`.
    pub fn build(today: NaiveDate, anchor_offset_days: i64, length_days: usize) -> Self {
        let start = today + Duration::days(anchor_offset_days);
        let days = start.iter_days().take(length_days).collect();
        CalendarWindow { days }
    }

    pub fn days(&self) -> &[NaiveDate] {
        &self.days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn first(&self) -> Option<NaiveDate> {
        self.days.first().copied()
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.days.binary_search(&day).is_ok()
    }

    /// The window's days rendered as `MM/DD` tags, in order.
    pub fn tags(&self) -> Vec<String> {
        self.days.iter().map(|d| tag::format_tag(*d)).collect()
    }

    /// Instants covered by the window in `tz`, or `None` for an empty window.
    pub fn date_range(&self, tz: &Tz) -> MeetupResult<Option<DateRange>> {
        match (self.days.first(), self.days.last()) {
            (Some(first), Some(last)) => {
                let end = *last + Duration::days(1);
                DateRange::local_days(*first, end, tz).map(Some)
            }
            _ => Ok(None),
        }
    }
}
