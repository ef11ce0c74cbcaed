//! Day-bucketed events for one window.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{MeetupError, MeetupResult};
use crate::posting::CandidatePosting;
use crate::store::PostingSource;
use crate::tag::{self, TagMatch};
use crate::window::CalendarWindow;

/// An event whose tag resolved to a day in the window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRecord {
    pub title: String,
    pub url: String,
    pub source_timestamp: i64,
}

/// Every window day mapped to its events, ordered by source timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRegistry {
    buckets: BTreeMap<NaiveDate, Vec<EventRecord>>,
}

impl EventRegistry {
    /// A registry with an empty bucket for each window day.
    pub fn empty(window: &CalendarWindow) -> Self {
        EventRegistry {
            buckets: window.days().iter().map(|d| (*d, Vec::new())).collect(),
        }
    }

    /// Search `source` for the window's tags and bucket the results.
    pub async fn collect<S: PostingSource>(
        source: &S,
        window: &CalendarWindow,
    ) -> MeetupResult<Self> {
        let postings = source.search(&window.tags()).await?;
        info!(postings = postings.len(), "fetched candidate postings");
        Self::bucket(postings, window)
    }

    /// Bucket `postings` into the window's days.
    ///
    /// Postings without a tag, or tagged for a day outside the window, are
    /// dropped. A tag matching several window days, or a kept posting with a
    /// malformed timestamp, fails the whole bucketing.
    pub fn bucket<I>(postings: I, window: &CalendarWindow) -> MeetupResult<Self>
    where
        I: IntoIterator<Item = CandidatePosting>,
    {
        let mut registry = Self::empty(window);

        for posting in postings {
            let day = match tag::resolve(posting.flair(), window) {
                TagMatch::Found(day) => day,
                TagMatch::NotFound => {
                    debug!(title = %posting.title, flair = posting.flair(), "dropping untagged posting");
                    continue;
                }
                TagMatch::Ambiguous(days) => {
                    let (month, day) = tag::extract_month_day(posting.flair()).unwrap_or_default();
                    return Err(MeetupError::AmbiguousDateMatch {
                        month,
                        day,
                        count: days.len(),
                    });
                }
            };

            let record = EventRecord {
                source_timestamp: posting.timestamp()?,
                title: posting.title,
                url: posting.url,
            };

            if let Some(bucket) = registry.buckets.get_mut(&day) {
                bucket.push(record);
            }
        }

        // Stable: equal timestamps keep fetch order.
        for bucket in registry.buckets.values_mut() {
            bucket.sort_by_key(|r| r.source_timestamp);
        }

        Ok(registry)
    }

    /// Days in ascending order with their events.
    pub fn days(&self) -> impl Iterator<Item = (NaiveDate, &[EventRecord])> {
        self.buckets.iter().map(|(d, events)| (*d, events.as_slice()))
    }

    /// Every record, in day order then bucket order.
    pub fn records(&self) -> impl Iterator<Item = (NaiveDate, &EventRecord)> {
        self.buckets
            .iter()
            .flat_map(|(d, events)| events.iter().map(move |e| (*d, e)))
    }

    pub fn events_on(&self, day: NaiveDate) -> Option<&[EventRecord]> {
        self.buckets.get(&day).map(Vec::as_slice)
    }

    /// Total number of records across all days.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn window() -> CalendarWindow {
        CalendarWindow::build(date(3, 8), 0, 7)
    }

    #[test]
    fn example_posting_lands_on_its_day() {
        let postings = vec![CandidatePosting::new(
            "Happy Hour @ Bar",
            "http://x/1",
            Some("03/10"),
            "1710000000.5",
        )];

        let registry = EventRegistry::bucket(postings, &window()).unwrap();

        assert_eq!(
            registry.events_on(date(3, 10)).unwrap(),
            &[EventRecord {
                title: "Happy Hour @ Bar".into(),
                url: "http://x/1".into(),
                source_timestamp: 1710000000,
            }]
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn keys_equal_window_days() {
        let postings = vec![
            CandidatePosting::new("a", "u1", Some("03/09"), "3.0"),
            CandidatePosting::new("b", "u2", Some("03/25"), "1.0"),
            CandidatePosting::new("c", "u3", None, "2.0"),
        ];

        let registry = EventRegistry::bucket(postings, &window()).unwrap();
        let keys: Vec<_> = registry.days().map(|(d, _)| d).collect();

        assert_eq!(keys, window().days());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.events_on(date(3, 25)), None);
    }

    #[test]
    fn buckets_sorted_by_timestamp_with_stable_ties() {
        let postings = vec![
            CandidatePosting::new("late", "u1", Some("03/10"), "300.0"),
            CandidatePosting::new("tie-first", "u2", Some("03/10"), "100.9"),
            CandidatePosting::new("tie-second", "u3", Some("03/10"), "100.1"),
            CandidatePosting::new("early", "u4", Some("03/10"), "50.0"),
        ];

        let registry = EventRegistry::bucket(postings, &window()).unwrap();
        let titles: Vec<_> = registry
            .events_on(date(3, 10))
            .unwrap()
            .iter()
            .map(|r| r.title.as_str())
            .collect();

        assert_eq!(titles, ["early", "tie-first", "tie-second", "late"]);
    }

    #[test]
    fn malformed_timestamp_on_kept_posting_fails() {
        let postings = vec![CandidatePosting::new("a", "u1", Some("03/10"), "1710000000")];
        assert!(matches!(
            EventRegistry::bucket(postings, &window()),
            Err(MeetupError::MalformedTimestamp(_))
        ));
    }

    #[test]
    fn malformed_timestamp_on_dropped_posting_is_ignored() {
        let postings = vec![CandidatePosting::new("a", "u1", Some("04/01"), "garbage")];
        let registry = EventRegistry::bucket(postings, &window()).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn ambiguous_tag_fails() {
        let long = CalendarWindow::build(date(3, 8), 0, 400);
        let postings = vec![CandidatePosting::new("a", "u1", Some("03/10"), "1.0")];

        assert!(matches!(
            EventRegistry::bucket(postings, &long),
            Err(MeetupError::AmbiguousDateMatch { month: 3, day: 10, count: 2 })
        ));
    }
}
