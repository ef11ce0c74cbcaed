use std::path::PathBuf;

use anyhow::{Context, Result};
use meetup_core::sidebar;
use meetup_core::{CalendarPlan, CalendarStore, EventRegistry, PostingSource, WikiStore};
use meetup_provider_google::app_config::AppConfig;
use meetup_provider_google::{GoogleCalendar, Session};
use tracing::info;

use super::RunWindows;
use crate::config::Config;
use crate::reddit::{self, RedditAuth, RedditSearch, RedditWiki};

const EDIT_REASON: &str = "Update upcoming meetups";

/// Which consumers of the registry to run.
#[derive(Debug, Clone, Copy)]
pub struct Targets {
    pub calendar: bool,
    pub sidebar: bool,
}

impl Targets {
    pub const ALL: Targets = Targets {
        calendar: true,
        sidebar: true,
    };
}

pub async fn run(cfg: &Config, targets: Targets, dry_run: bool) -> Result<()> {
    let windows = RunWindows::new(cfg)?;
    info!(today = %windows.today, tz = %windows.tz, "building calendar");

    let http = reddit::http_client(&cfg.reddit)?;
    let search = RedditSearch::new(http.clone(), &cfg.reddit);
    let registry = collect(&search, &windows).await?;

    if targets.calendar {
        let calendar = connect_calendar(cfg).await?;
        sync_calendar(&registry, &calendar, &windows, dry_run).await?;
    }

    if targets.sidebar {
        let auth = RedditAuth::new(http.clone(), &cfg.reddit);
        let wiki = RedditWiki::new(http, &cfg.reddit, auth);
        sync_sidebar(cfg, &registry, &wiki, dry_run).await?;
    }

    Ok(())
}

pub async fn collect<S: PostingSource>(source: &S, windows: &RunWindows) -> Result<EventRegistry> {
    let registry = EventRegistry::collect(source, &windows.events)
        .await
        .context("Failed to build event registry")?;
    info!(events = registry.len(), days = windows.events.len(), "registry built");
    Ok(registry)
}

async fn connect_calendar(cfg: &Config) -> Result<GoogleCalendar> {
    let app = match &cfg.google.app_config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    let session_path = session_path(cfg)?;
    let session = Session::load_valid(&session_path, app).await?;
    Ok(GoogleCalendar::new(session, cfg.google.calendar_id.clone()))
}

pub fn session_path(cfg: &Config) -> Result<PathBuf> {
    match &cfg.google.session {
        Some(path) => Ok(path.clone()),
        None => Session::default_path(),
    }
}

/// Replace the cleanup window's remote events with the registry's.
pub async fn sync_calendar<C: CalendarStore>(
    registry: &EventRegistry,
    store: &C,
    windows: &RunWindows,
    dry_run: bool,
) -> Result<()> {
    let Some(range) = windows.cleanup.date_range(&windows.tz)? else {
        return Ok(());
    };

    let plan = CalendarPlan::build(registry, store, &range)
        .await
        .context("Failed to read calendar")?;

    if dry_run {
        println!("\n📅 Calendar ({} to delete, {} to insert)", plan.to_delete.len(), plan.to_insert.len());
        print!("{plan}");
        return Ok(());
    }

    let stats = plan
        .apply(store)
        .await
        .context("Calendar reconciliation stopped part way; remote calendar may be incomplete")?;

    info!(deleted = stats.deleted, inserted = stats.inserted, "calendar reconciled");
    println!("📅 Calendar: {} deleted, {} inserted", stats.deleted, stats.inserted);
    Ok(())
}

/// Render the table and republish the wiki page if it changed.
/// Returns whether an edit was (or, in dry-run, would be) made.
pub async fn sync_sidebar<W: WikiStore>(
    cfg: &Config,
    registry: &EventRegistry,
    wiki: &W,
    dry_run: bool,
) -> Result<bool> {
    let page = &cfg.reddit.wiki_page;
    let fragment = sidebar::render(registry);

    let current = wiki.get_page(page).await.context("Failed to read sidebar")?;
    let patch = sidebar::patch(&current, &fragment, &cfg.reddit.anchor, &cfg.reddit.header)?;

    if !patch.changed {
        info!(page, "sidebar unchanged");
        println!("📝 Sidebar: up to date");
        return Ok(false);
    }

    if dry_run {
        println!("\n📝 Sidebar would become:\n{}", patch.text);
        return Ok(true);
    }

    wiki.edit_page(page, &patch.text, EDIT_REASON)
        .await
        .context("Failed to publish sidebar")?;

    info!(page, "sidebar published");
    println!("📝 Sidebar: updated");
    Ok(true)
}
