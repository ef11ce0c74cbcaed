//! Candidate postings from the search feed.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{MeetupError, MeetupResult};

/// A posting as returned by the search feed, before its tag is resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidatePosting {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub link_flair_text: Option<String>,
    /// Creation time in decimal text form, e.g. `1489000000.0`.
    #[serde(deserialize_with = "deserialize_created_utc")]
    pub created_utc: String,
}

impl CandidatePosting {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        flair: Option<&str>,
        created_utc: impl Into<String>,
    ) -> Self {
        CandidatePosting {
            title: title.into(),
            url: url.into(),
            link_flair_text: flair.map(str::to_string),
            created_utc: created_utc.into(),
        }
    }

    pub fn flair(&self) -> &str {
        self.link_flair_text.as_deref().unwrap_or("")
    }

    pub fn timestamp(&self) -> MeetupResult<i64> {
        parse_created_utc(&self.created_utc)
    }
}

/// Integer part of a `<integer>.<fraction>` timestamp.
pub fn parse_created_utc(raw: &str) -> MeetupResult<i64> {
    let (whole, _) = raw
        .split_once('.')
        .ok_or_else(|| MeetupError::MalformedTimestamp(raw.to_string()))?;

    whole
        .trim()
        .parse()
        .map_err(|_| MeetupError::MalformedTimestamp(raw.to_string()))
}

/// The feed sends a JSON number; older payloads sent a string. Keep the text.
fn deserialize_created_utc<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}
