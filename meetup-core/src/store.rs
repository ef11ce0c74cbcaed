//! Collaborator seams for the remote services.
//!
//! Each call is a single blocking-from-the-caller remote operation. Callers
//! await them one at a time; nothing here is retried or batched.

#![allow(async_fn_in_trait)]

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date_range::DateRange;
use crate::error::MeetupResult;
use crate::posting::CandidatePosting;

/// An event already stored in the calendar service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEvent {
    pub id: String,
    #[serde(default)]
    pub summary: String,
}

/// An all-day event to insert into the calendar service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    pub summary: String,
    pub description: String,
    pub date: NaiveDate,
}

/// Search-ranked feed of candidate postings.
pub trait PostingSource {
    /// Postings whose tag may match one of `tags`. Order is not guaranteed and
    /// the result may hold non-matching or duplicate postings.
    async fn search(&self, tags: &[String]) -> MeetupResult<Vec<CandidatePosting>>;
}

/// Remote calendar service.
pub trait CalendarStore {
    async fn list_events(&self, range: &DateRange) -> MeetupResult<Vec<RemoteEvent>>;

    async fn delete_event(&self, event_id: &str) -> MeetupResult<()>;

    async fn insert_event(&self, event: &NewEvent) -> MeetupResult<()>;
}

/// Remote wiki holding the sidebar page.
pub trait WikiStore {
    async fn get_page(&self, page: &str) -> MeetupResult<String>;

    async fn edit_page(&self, page: &str, text: &str, reason: &str) -> MeetupResult<()>;
}

/// Supplies a bearer credential for one of the stores.
pub trait AuthProvider {
    async fn bearer_token(&self) -> MeetupResult<String>;
}
