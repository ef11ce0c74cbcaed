use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use meetup_sidebar::commands::{self, run::Targets};
use meetup_sidebar::config::Config;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "meetup-sidebar")]
#[command(about = "Publish the week's flair-tagged meetups to Google Calendar and the subreddit sidebar")]
struct Cli {
    /// Config file (defaults to ~/.config/meetup-sidebar/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log remote calls
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the calendar and the sidebar
    Run {
        /// Show what would change without writing
        #[arg(long)]
        dry_run: bool,
    },
    /// Rebuild only the Google calendar
    Calendar {
        #[arg(long)]
        dry_run: bool,
    },
    /// Rebuild only the sidebar table
    Sidebar {
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the table for the coming week
    Preview,
    /// Authorize access to Google Calendar
    Auth,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cfg = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Run { dry_run } => commands::run::run(&cfg, Targets::ALL, dry_run).await,
        Commands::Calendar { dry_run } => {
            let targets = Targets {
                calendar: true,
                sidebar: false,
            };
            commands::run::run(&cfg, targets, dry_run).await
        }
        Commands::Sidebar { dry_run } => {
            let targets = Targets {
                calendar: false,
                sidebar: true,
            };
            commands::run::run(&cfg, targets, dry_run).await
        }
        Commands::Preview => commands::preview::preview(&cfg).await,
        Commands::Auth => commands::auth::auth(&cfg).await,
    }
}
