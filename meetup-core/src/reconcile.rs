//! Full-replace synchronization of the registry into the calendar service.
//!
//! Every remote event in range is deleted, then one all-day event is inserted
//! per registry record. There is no rollback: a failure part way through
//! leaves the calendar partially reconciled and is returned to the caller.

use std::fmt;

use tracing::{debug, info};

use crate::date_range::DateRange;
use crate::error::MeetupResult;
use crate::registry::EventRegistry;
use crate::store::{CalendarStore, NewEvent, RemoteEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Delete,
    Insert,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Delete => write!(f, "-"),
            ChangeKind::Insert => write!(f, "+"),
        }
    }
}

/// Counts of remote calls made by [`CalendarPlan::apply`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileStats {
    pub deleted: usize,
    pub inserted: usize,
}

/// Deletions and insertions needed to make the calendar match a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarPlan {
    pub to_delete: Vec<RemoteEvent>,
    pub to_insert: Vec<NewEvent>,
}

impl CalendarPlan {
    /// Fetch the events currently in `range` and plan their replacement.
    pub async fn build<C: CalendarStore>(
        registry: &EventRegistry,
        store: &C,
        range: &DateRange,
    ) -> MeetupResult<Self> {
        let to_delete = store.list_events(range).await?;
        Ok(Self::from_parts(registry, to_delete))
    }

    pub fn from_parts(registry: &EventRegistry, existing: Vec<RemoteEvent>) -> Self {
        let to_insert = registry
            .records()
            .map(|(day, record)| NewEvent {
                summary: record.title.clone(),
                description: record.url.clone(),
                date: day,
            })
            .collect();

        CalendarPlan {
            to_delete: existing,
            to_insert,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.to_delete.is_empty() && self.to_insert.is_empty()
    }

    /// Every deletion, then every insertion. Stops at the first failure.
    pub async fn apply<C: CalendarStore>(&self, store: &C) -> MeetupResult<ReconcileStats> {
        let mut stats = ReconcileStats::default();

        for event in &self.to_delete {
            debug!(id = %event.id, summary = %event.summary, "deleting calendar event");
            store.delete_event(&event.id).await?;
            stats.deleted += 1;
        }

        for event in &self.to_insert {
            debug!(date = %event.date, summary = %event.summary, "inserting calendar event");
            store.insert_event(event).await?;
            stats.inserted += 1;
        }

        Ok(stats)
    }
}

impl fmt::Display for CalendarPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for event in &self.to_delete {
            writeln!(f, "{} {} ({})", ChangeKind::Delete, event.summary, event.id)?;
        }
        for event in &self.to_insert {
            writeln!(
                f,
                "{} {} {} <{}>",
                ChangeKind::Insert,
                event.date,
                event.summary,
                event.description
            )?;
        }
        Ok(())
    }
}

/// Replace everything in `range` with the registry's events.
pub async fn reconcile<C: CalendarStore>(
    registry: &EventRegistry,
    store: &C,
    range: &DateRange,
) -> MeetupResult<ReconcileStats> {
    let plan = CalendarPlan::build(registry, store, range).await?;
    let stats = plan.apply(store).await?;
    info!(deleted = stats.deleted, inserted = stats.inserted, "calendar reconciled");
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use chrono::NaiveDate;
    use chrono_tz::Tz;

    use super::*;
    use crate::error::MeetupError;
    use crate::posting::CandidatePosting;
    use crate::window::CalendarWindow;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        List,
        Delete(String),
        Insert(NewEvent),
    }

    #[derive(Default)]
    struct FakeCalendar {
        existing: Vec<RemoteEvent>,
        fail_on_insert: Option<usize>,
        calls: RefCell<Vec<Call>>,
    }

    impl FakeCalendar {
        fn inserts(&self) -> usize {
            self.calls.borrow().iter().filter(|c| matches!(c, Call::Insert(_))).count()
        }
    }

    impl CalendarStore for FakeCalendar {
        async fn list_events(&self, _range: &DateRange) -> MeetupResult<Vec<RemoteEvent>> {
            self.calls.borrow_mut().push(Call::List);
            Ok(self.existing.clone())
        }

        async fn delete_event(&self, event_id: &str) -> MeetupResult<()> {
            self.calls.borrow_mut().push(Call::Delete(event_id.to_string()));
            Ok(())
        }

        async fn insert_event(&self, event: &NewEvent) -> MeetupResult<()> {
            if self.fail_on_insert == Some(self.inserts()) {
                return Err(MeetupError::Calendar("connection reset".into()));
            }
            self.calls.borrow_mut().push(Call::Insert(event.clone()));
            Ok(())
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn setup() -> (EventRegistry, DateRange) {
        let window = CalendarWindow::build(date(8), 0, 7);
        let registry = EventRegistry::bucket(
            vec![
                CandidatePosting::new("Trivia", "http://x/2", Some("03/11"), "20.0"),
                CandidatePosting::new("Happy Hour @ Bar", "http://x/1", Some("03/10"), "10.0"),
            ],
            &window,
        )
        .unwrap();
        let range = CalendarWindow::build(date(8), 0, 8)
            .date_range(&Tz::UTC)
            .unwrap()
            .unwrap();
        (registry, range)
    }

    fn remote(id: &str) -> RemoteEvent {
        RemoteEvent {
            id: id.to_string(),
            summary: format!("old {id}"),
        }
    }

    #[tokio::test]
    async fn one_delete_then_two_inserts() {
        let (registry, range) = setup();
        let store = FakeCalendar {
            existing: vec![remote("old-1")],
            ..Default::default()
        };

        let stats = reconcile(&registry, &store, &range).await.unwrap();

        assert_eq!(stats, ReconcileStats { deleted: 1, inserted: 2 });
        assert_eq!(
            *store.calls.borrow(),
            vec![
                Call::List,
                Call::Delete("old-1".into()),
                Call::Insert(NewEvent {
                    summary: "Happy Hour @ Bar".into(),
                    description: "http://x/1".into(),
                    date: date(10),
                }),
                Call::Insert(NewEvent {
                    summary: "Trivia".into(),
                    description: "http://x/2".into(),
                    date: date(11),
                }),
            ]
        );
    }

    #[tokio::test]
    async fn first_failure_stops_the_run() {
        let (registry, range) = setup();
        let store = FakeCalendar {
            existing: vec![remote("a"), remote("b")],
            fail_on_insert: Some(1),
            ..Default::default()
        };

        let result = reconcile(&registry, &store, &range).await;

        assert!(matches!(result, Err(MeetupError::Calendar(_))));
        // Deletions already issued are not undone.
        let calls = store.calls.borrow();
        assert_eq!(calls.iter().filter(|c| matches!(c, Call::Delete(_))).count(), 2);
        assert_eq!(store.inserts(), 1);
    }

    #[tokio::test]
    async fn empty_registry_only_deletes() {
        let window = CalendarWindow::build(date(8), 0, 7);
        let registry = EventRegistry::empty(&window);
        let (_, range) = setup();
        let store = FakeCalendar {
            existing: vec![remote("a")],
            ..Default::default()
        };

        let plan = CalendarPlan::build(&registry, &store, &range).await.unwrap();
        assert!(plan.to_insert.is_empty());
        assert_eq!(plan.to_string(), "- old a (a)\n");

        let stats = plan.apply(&store).await.unwrap();
        assert_eq!(stats, ReconcileStats { deleted: 1, inserted: 0 });
    }

    #[test]
    fn plan_display_marks_changes() {
        let (registry, _) = setup();
        let plan = CalendarPlan::from_parts(&registry, vec![remote("x")]);
        assert_eq!(
            plan.to_string(),
            "- old x (x)\n\
             + 2024-03-10 Happy Hour @ Bar <http://x/1>\n\
             + 2024-03-11 Trivia <http://x/2>\n"
        );
    }
}
