use anyhow::Result;
use meetup_provider_google::app_config::AppConfig;

use super::run::session_path;
use crate::config::Config;

pub async fn auth(cfg: &Config) -> Result<()> {
    let app = match &cfg.google.app_config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    let path = session_path(cfg)?;

    println!("Authenticating with Google Calendar...");
    meetup_provider_google::authenticate(app, &path).await?;

    println!("\nSession saved to {}", path.display());
    println!("Run `meetup-sidebar run --dry-run` to check the setup.");
    Ok(())
}
