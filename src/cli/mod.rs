pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "matchcast")]
#[command(about = "Televised football schedule scraper and API", long_about = None)]
pub struct Cli {
    /// Path to a config file (default: ~/.config/matchcast/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scrape on start, refresh daily and serve the match API
    Serve {
        /// Start with an empty store if the startup scrape fails
        #[arg(long)]
        allow_empty_start: bool,
    },
    /// Scrape once and print the matches as JSON
    Fetch {
        /// Scrape this URL instead of the configured one
        #[arg(long)]
        url: Option<String>,

        /// Only print matches for this day (case-insensitive)
        #[arg(short, long)]
        day: Option<String>,
    },
    /// Extract matches from a saved HTML page
    Parse {
        /// Path to the HTML file
        path: PathBuf,

        /// Only print matches for this day (case-insensitive)
        #[arg(short, long)]
        day: Option<String>,
    },
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Write a commented default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration
    Show,
}
