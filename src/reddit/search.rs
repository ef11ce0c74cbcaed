use anyhow::{Context, Result};
use meetup_core::{CandidatePosting, MeetupError, MeetupResult, PostingSource};
use serde::Deserialize;
use tracing::debug;

use super::ensure_success;
use crate::config::RedditConfig;

/// Flair search over the subreddit's public listing.
pub struct RedditSearch {
    http: reqwest::Client,
    url: String,
    limit: u32,
}

#[derive(Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Deserialize)]
struct ListingData {
    children: Vec<Thing>,
}

#[derive(Deserialize)]
struct Thing {
    data: CandidatePosting,
}

/// `flair:03/10 OR flair:03/11 ...`
pub fn flair_query(tags: &[String]) -> String {
    tags.iter()
        .map(|t| format!("flair:{t}"))
        .collect::<Vec<_>>()
        .join(" OR ")
}

impl RedditSearch {
    pub fn new(http: reqwest::Client, config: &RedditConfig) -> Self {
        RedditSearch {
            http,
            url: format!(
                "{}/r/{}/search.json",
                config.www_base.trim_end_matches('/'),
                config.subreddit
            ),
            limit: config.search_limit,
        }
    }

    async fn fetch(&self, tags: &[String]) -> Result<Vec<CandidatePosting>> {
        let query = flair_query(tags);
        debug!(url = %self.url, %query, "searching postings");

        let limit = self.limit.to_string();
        let response = self
            .http
            .get(&self.url)
            .query(&[
                ("q", query.as_str()),
                ("sort", "relevance"),
                ("restrict_sr", "on"),
                ("t", "month"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .context("Failed to send search request")?;

        let listing: Listing = ensure_success(response, "Search")
            .await?
            .json()
            .await
            .context("Failed to parse search listing")?;

        Ok(listing.data.children.into_iter().map(|t| t.data).collect())
    }
}

impl PostingSource for RedditSearch {
    async fn search(&self, tags: &[String]) -> MeetupResult<Vec<CandidatePosting>> {
        if tags.is_empty() {
            return Ok(Vec::new());
        }
        self.fetch(tags)
            .await
            .map_err(|e| MeetupError::Search(format!("{e:#}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_joins_tags_with_or() {
        let tags = vec!["03/10".to_string(), "03/11".to_string()];
        assert_eq!(flair_query(&tags), "flair:03/10 OR flair:03/11");
    }
}
