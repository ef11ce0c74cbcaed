//! Reddit collaborators: token grant, flair search and the wiki page.

mod auth;
mod search;
mod wiki;

pub use auth::RedditAuth;
pub use search::RedditSearch;
pub use wiki::RedditWiki;

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Response;

use crate::config::RedditConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client shared by the Reddit collaborators. Reddit rejects requests
/// without a descriptive User-Agent.
pub fn http_client(config: &RedditConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")
}

/// Turn a non-2xx response into an error carrying status and body.
async fn ensure_success(response: Response, what: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    anyhow::bail!("{what} failed with {status}: {body}")
}
