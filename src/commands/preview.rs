use anyhow::Result;
use meetup_core::sidebar;

use super::RunWindows;
use super::run::collect;
use crate::config::Config;
use crate::reddit::{self, RedditSearch};

/// Print the table the next run would publish. Only the search is called.
pub async fn preview(cfg: &Config) -> Result<()> {
    let windows = RunWindows::new(cfg)?;
    let http = reddit::http_client(&cfg.reddit)?;
    let search = RedditSearch::new(http, &cfg.reddit);

    let registry = collect(&search, &windows).await?;

    print!("{}", sidebar::render(&registry));
    Ok(())
}
