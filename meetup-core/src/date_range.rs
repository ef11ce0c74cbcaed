//! Instant range covered by a window of local days.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{MeetupError, MeetupResult};

/// Half-open range `[from, to)` of instants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl DateRange {
    /// Range from local midnight of `first` to local midnight of `end_exclusive`.
    pub fn local_days(first: NaiveDate, end_exclusive: NaiveDate, tz: &Tz) -> MeetupResult<Self> {
        Ok(DateRange {
            from: local_midnight(first, tz)?,
            to: local_midnight(end_exclusive, tz)?,
        })
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.from <= instant && instant < self.to
    }

    pub fn from_rfc3339(&self) -> String {
        self.from.to_rfc3339()
    }

    pub fn to_rfc3339(&self) -> String {
        self.to.to_rfc3339()
    }
}

/// Midnight of `date` in `tz`, as UTC.
///
/// Uses the earliest instant when the wall clock is ambiguous.
fn local_midnight(date: NaiveDate, tz: &Tz) -> MeetupResult<DateTime<Utc>> {
    tz.from_local_datetime(&date.and_time(NaiveTime::MIN))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| {
            MeetupError::Config(format!("Midnight of {date} does not exist in {}", tz.name()))
        })
}
