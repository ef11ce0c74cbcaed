//! A stored Google OAuth session (access + refresh token).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use google_calendar::{AccessToken, Client};
use meetup_core::{AuthProvider, MeetupError, MeetupResult};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::app_config::{AppConfig, base_dir};

pub struct Session {
    path: PathBuf,
    app: AppConfig,
    data: SessionData,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SessionData {
    access_token: String,
    refresh_token: String,
    expires_at: DateTime<Utc>,
}

impl SessionData {
    pub fn from_access_token(tokens: &AccessToken, previous_refresh_token: Option<&str>) -> Self {
        // Google typically doesn't return a new refresh_token on refresh
        let refresh_token = match previous_refresh_token {
            Some(previous) if tokens.refresh_token.is_empty() => previous.to_string(),
            _ => tokens.refresh_token.clone(),
        };

        SessionData {
            access_token: tokens.access_token.clone(),
            refresh_token,
            expires_at: Utc::now() + Duration::seconds(tokens.expires_in),
        }
    }

    fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

impl Session {
    pub fn default_path() -> Result<PathBuf> {
        Ok(base_dir()?.join("session.toml"))
    }

    pub fn new(path: PathBuf, app: AppConfig, data: SessionData) -> Self {
        Session { path, app, data }
    }

    /// Load the session at `path`, refreshing and re-saving it if expired.
    pub async fn load_valid(path: &Path, app: AppConfig) -> Result<Self> {
        let mut session = Self::load(path, app)?;

        if session.data.is_expired() {
            session.refresh().await?;
        }

        Ok(session)
    }

    fn load(path: &Path, app: AppConfig) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "Google OAuth session not found at {}\nRun `meetup-sidebar auth` first.",
                path.display()
            );
        }

        let contents = std::fs::read_to_string(path).with_context(|| {
            format!("Failed to read Google OAuth session from {}", path.display())
        })?;

        let data: SessionData = toml::from_str(&contents).with_context(|| {
            format!("Failed to parse Google OAuth session from {}", path.display())
        })?;

        Ok(Session {
            path: path.to_path_buf(),
            app,
            data,
        })
    }

    pub fn save(&self) -> Result<()> {
        let contents = toml::to_string_pretty(&self.data).context("Failed to serialize session")?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write session to {}", self.path.display()))?;

        // Owner-only: the file holds OAuth tokens.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to set permissions on {}", self.path.display()))?;
        }

        Ok(())
    }

    pub fn client(&self) -> Client {
        Client::new(
            self.app.client_id.clone(),
            self.app.client_secret.clone(),
            String::new(),
            self.data.access_token.clone(),
            self.data.refresh_token.clone(),
        )
    }

    async fn refresh(&mut self) -> Result<()> {
        info!("Google access token expired, refreshing");

        let tokens = self
            .client()
            .refresh_access_token()
            .await
            .context("Failed to refresh token")?;

        self.data = SessionData::from_access_token(&tokens, Some(&self.data.refresh_token));
        self.save()
    }
}

impl AuthProvider for Session {
    async fn bearer_token(&self) -> MeetupResult<String> {
        if self.data.is_expired() {
            return Err(MeetupError::Auth(format!(
                "Google session at {} expired during the run",
                self.path.display()
            )));
        }
        Ok(self.data.access_token.clone())
    }
}
