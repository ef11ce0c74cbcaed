use anyhow::{Context, Result};
use meetup_core::{AuthProvider, MeetupError, MeetupResult, WikiStore};
use serde::Deserialize;
use tracing::debug;

use super::ensure_success;
use crate::config::RedditConfig;

/// Subreddit wiki pages over the OAuth API.
pub struct RedditWiki<A> {
    http: reqwest::Client,
    base: String,
    auth: A,
}

#[derive(Deserialize)]
struct WikiPage {
    data: WikiPageData,
}

#[derive(Deserialize)]
struct WikiPageData {
    content_md: String,
}

impl<A: AuthProvider> RedditWiki<A> {
    pub fn new(http: reqwest::Client, config: &RedditConfig, auth: A) -> Self {
        RedditWiki {
            http,
            base: format!("{}/r/{}", config.oauth_base.trim_end_matches('/'), config.subreddit),
            auth,
        }
    }

    async fn fetch(&self, page: &str) -> Result<String> {
        let token = self.auth.bearer_token().await?;
        let url = format!("{}/wiki/{page}", self.base);
        debug!(%url, "reading wiki page");

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .context("Failed to send wiki request")?;

        let page: WikiPage = ensure_success(response, "Wiki read")
            .await?
            .json()
            .await
            .context("Failed to parse wiki page")?;

        Ok(page.data.content_md)
    }

    async fn publish(&self, page: &str, text: &str, reason: &str) -> Result<()> {
        let token = self.auth.bearer_token().await?;
        let url = format!("{}/api/wiki/edit", self.base);
        debug!(%url, page, bytes = text.len(), "editing wiki page");

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .form(&[("page", page), ("content", text), ("reason", reason)])
            .send()
            .await
            .context("Failed to send wiki edit")?;

        ensure_success(response, "Wiki edit").await?;
        Ok(())
    }
}

fn wiki_error(e: anyhow::Error) -> MeetupError {
    match e.downcast::<MeetupError>() {
        Ok(inner) => inner,
        Err(e) => MeetupError::Wiki(format!("{e:#}")),
    }
}

impl<A: AuthProvider> WikiStore for RedditWiki<A> {
    async fn get_page(&self, page: &str) -> MeetupResult<String> {
        self.fetch(page).await.map_err(wiki_error)
    }

    async fn edit_page(&self, page: &str, text: &str, reason: &str) -> MeetupResult<()> {
        self.publish(page, text, reason).await.map_err(wiki_error)
    }
}
