use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono_tz::Tz;
use meetup_core::MeetupError;
use meetup_core::sidebar::{DEFAULT_ANCHOR, DEFAULT_HEADER};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    /// Reference time zone for "today" (IANA name)
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Days collected from the feed and shown in the sidebar
    #[serde(default = "default_window_days")]
    pub window_days: usize,

    /// Days of the calendar cleared and rebuilt on each run
    #[serde(default = "default_cleanup_days")]
    pub cleanup_days: usize,

    pub reddit: RedditConfig,

    pub google: GoogleConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedditConfig {
    #[serde(default = "default_subreddit")]
    pub subreddit: String,
    pub username: String,
    pub password: String,
    pub client_id: String,
    pub secret: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_wiki_page")]
    pub wiki_page: String,
    #[serde(default = "default_anchor")]
    pub anchor: String,
    #[serde(default = "default_header")]
    pub header: String,
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,
    /// Public site (search, token endpoint)
    #[serde(default = "default_www_base")]
    pub www_base: String,
    /// Authenticated API (wiki)
    #[serde(default = "default_oauth_base")]
    pub oauth_base: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleConfig {
    pub calendar_id: String,
    /// Defaults to ~/.config/meetup-sidebar/google/app_config.toml
    pub app_config: Option<PathBuf>,
    /// Defaults to ~/.config/meetup-sidebar/google/session.toml
    pub session: Option<PathBuf>,
}

fn default_timezone() -> String {
    "America/New_York".to_string()
}

fn default_window_days() -> usize {
    7
}

fn default_cleanup_days() -> usize {
    8
}

fn default_subreddit() -> String {
    "nycmeetups".to_string()
}

fn default_user_agent() -> String {
    concat!("meetup-sidebar/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_wiki_page() -> String {
    "config/sidebar".to_string()
}

fn default_anchor() -> String {
    DEFAULT_ANCHOR.to_string()
}

fn default_header() -> String {
    DEFAULT_HEADER.to_string()
}

fn default_search_limit() -> u32 {
    100
}

fn default_www_base() -> String {
    "https://www.reddit.com".to_string()
}

fn default_oauth_base() -> String {
    "https://oauth.reddit.com".to_string()
}

/// Get the config file path (~/.config/meetup-sidebar/config.toml)
pub fn config_path() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .context("Could not determine config directory")?
        .join("meetup-sidebar")
        .join("config.toml"))
}

impl Config {
    /// Load from `path`, or the default location when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => config_path()?,
        };

        if !path.exists() {
            anyhow::bail!(
                "Config file not found at {}\n\n\
                Create it with at least:\n\n\
                [reddit]\n\
                username = \"...\"\n\
                password = \"...\"\n\
                client_id = \"...\"\n\
                secret = \"...\"\n\n\
                [google]\n\
                calendar_id = \"...@group.calendar.google.com\"",
                path.display()
            );
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;

        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), MeetupError> {
        if self.window_days == 0 || self.cleanup_days == 0 {
            return Err(MeetupError::Config(
                "window_days and cleanup_days must be at least 1".into(),
            ));
        }
        self.tz()?;
        Ok(())
    }

    pub fn tz(&self) -> Result<Tz, MeetupError> {
        self.timezone
            .parse()
            .map_err(|_| MeetupError::Config(format!("Unknown time zone '{}'", self.timezone)))
    }
}
