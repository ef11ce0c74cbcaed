use anyhow::{Context, Result};
use meetup_core::{AuthProvider, MeetupError, MeetupResult};
use serde::Deserialize;
use tokio::sync::OnceCell;
use tracing::debug;

use super::ensure_success;
use crate::config::RedditConfig;

/// Script-app password grant. The token is fetched once per run.
pub struct RedditAuth {
    http: reqwest::Client,
    token_url: String,
    username: String,
    password: String,
    client_id: String,
    secret: String,
    token: OnceCell<String>,
}

#[derive(Deserialize)]
struct PasswordGrant {
    access_token: Option<String>,
    error: Option<String>,
}

impl RedditAuth {
    pub fn new(http: reqwest::Client, config: &RedditConfig) -> Self {
        RedditAuth {
            http,
            token_url: format!("{}/api/v1/access_token", config.www_base.trim_end_matches('/')),
            username: config.username.clone(),
            password: config.password.clone(),
            client_id: config.client_id.clone(),
            secret: config.secret.clone(),
            token: OnceCell::new(),
        }
    }

    async fn request_token(&self) -> Result<String> {
        debug!(url = %self.token_url, "requesting Reddit access token");

        let response = self
            .http
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.secret))
            .form(&[
                ("grant_type", "password"),
                ("username", self.username.as_str()),
                ("password", self.password.as_str()),
            ])
            .send()
            .await
            .context("Failed to send token request")?;

        let grant: PasswordGrant = ensure_success(response, "Token request")
            .await?
            .json()
            .await
            .context("Failed to parse token response")?;

        // Reddit reports bad credentials with a 200 and an `error` field.
        match (grant.access_token, grant.error) {
            (Some(token), _) if !token.is_empty() => Ok(token),
            (_, Some(error)) => anyhow::bail!("Token request rejected: {error}"),
            _ => anyhow::bail!("Token response carried no access_token"),
        }
    }
}

impl AuthProvider for RedditAuth {
    async fn bearer_token(&self) -> MeetupResult<String> {
        self.token
            .get_or_try_init(|| self.request_token())
            .await
            .cloned()
            .map_err(|e| MeetupError::Auth(format!("{e:#}")))
    }
}
