//! Error types for the meetup calendar.

use thiserror::Error;

/// Errors that can occur while building or publishing the calendar.
#[derive(Error, Debug)]
pub enum MeetupError {
    #[error("Malformed timestamp '{0}': expected <integer>.<fraction>")]
    MalformedTimestamp(String),

    #[error("Anchor '{0}' not found in wiki page")]
    AnchorNotFound(String),

    #[error("Tag {month:02}/{day:02} matches {count} days in the window")]
    AmbiguousDateMatch { month: u32, day: u32, count: usize },

    #[error("Search error: {0}")]
    Search(String),

    #[error("Calendar error: {0}")]
    Calendar(String),

    #[error("Wiki error: {0}")]
    Wiki(String),

    #[error("Auth error: {0}")]
    Auth(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for meetup operations.
pub type MeetupResult<T> = Result<T, MeetupError>;
