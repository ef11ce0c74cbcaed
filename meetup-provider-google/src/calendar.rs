//! [`CalendarStore`] backed by one Google calendar.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use google_calendar::types::{EventDateTime, OrderBy, SendUpdates};
use meetup_core::{
    AuthProvider, CalendarStore, DateRange, MeetupError, MeetupResult, NewEvent, RemoteEvent,
};
use tracing::debug;

use crate::session::Session;

pub struct GoogleCalendar {
    session: Session,
    calendar_id: String,
}

impl GoogleCalendar {
    pub fn new(session: Session, calendar_id: impl Into<String>) -> Self {
        GoogleCalendar {
            session,
            calendar_id: calendar_id.into(),
        }
    }

    async fn client(&self) -> MeetupResult<google_calendar::Client> {
        // Fails fast if the token lapsed mid-run.
        self.session.bearer_token().await?;
        Ok(self.session.client())
    }

    async fn fetch(&self, range: &DateRange) -> Result<Vec<RemoteEvent>> {
        let client = self.client().await?;

        let response = client
            .events()
            .list_all(
                &self.calendar_id,
                "",
                0,
                OrderBy::default(),
                &[],
                "", // search query
                &[],
                false, // show deleted
                false,
                true, // expand recurring events
                &range.to_rfc3339(),
                &range.from_rfc3339(),
                "",
                "",
            )
            .await
            .context("Failed to fetch events")?;

        Ok(response
            .body
            .into_iter()
            .filter(|e| e.status != "cancelled" && !e.id.is_empty())
            .map(|e| RemoteEvent {
                id: e.id,
                summary: e.summary,
            })
            .collect())
    }

    async fn delete(&self, event_id: &str) -> Result<()> {
        let client = self.client().await?;

        let result = client
            .events()
            .delete(&self.calendar_id, event_id, false, SendUpdates::None)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                let error_str = e.to_string();
                if error_str.contains("410") || error_str.contains("Gone") {
                    debug!(event_id, "event already gone");
                    Ok(())
                } else {
                    Err(e).with_context(|| format!("Failed to delete event: {event_id}"))
                }
            }
        }
    }

    async fn insert(&self, event: &NewEvent) -> Result<()> {
        let client = self.client().await?;
        let google_event = to_google_event(event);

        client
            .events()
            .insert(
                &self.calendar_id,
                0,
                0,
                false,
                SendUpdates::None,
                false,
                &google_event,
            )
            .await
            .with_context(|| format!("Failed to create event: {}", event.summary))?;

        Ok(())
    }
}

/// All-day event: start and end carry the same date.
fn to_google_event(event: &NewEvent) -> google_calendar::types::Event {
    google_calendar::types::Event {
        summary: event.summary.clone(),
        description: event.description.clone(),
        start: Some(all_day(event.date)),
        end: Some(all_day(event.date)),
        ..Default::default()
    }
}

fn all_day(date: NaiveDate) -> EventDateTime {
    EventDateTime {
        date: Some(date),
        date_time: None,
        time_zone: String::new(),
    }
}

fn calendar_error(e: anyhow::Error) -> MeetupError {
    match e.downcast::<MeetupError>() {
        Ok(inner) => inner,
        Err(e) => MeetupError::Calendar(format!("{e:#}")),
    }
}

impl CalendarStore for GoogleCalendar {
    async fn list_events(&self, range: &DateRange) -> MeetupResult<Vec<RemoteEvent>> {
        self.fetch(range).await.map_err(calendar_error)
    }

    async fn delete_event(&self, event_id: &str) -> MeetupResult<()> {
        self.delete(event_id).await.map_err(calendar_error)
    }

    async fn insert_event(&self, event: &NewEvent) -> MeetupResult<()> {
        self.insert(event).await.map_err(calendar_error)
    }
}
