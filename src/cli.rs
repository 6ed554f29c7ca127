//! Command-line interface definitions for the harvester.
//!
//! This module defines the CLI arguments and options using the `clap`
//! crate. All arguments can be provided via command-line flags or
//! environment variables.

use crate::scrapers::hackernews::DEFAULT_SOURCE_URL;
use clap::Parser;
use url::Url;

/// Command-line arguments for the harvester daemon.
///
/// # Examples
///
/// ```sh
/// # Run as a daemon with the default 10-minute cadence
/// news_harvester
///
/// # Point at a different side database and run a single tick
/// news_harvester -d sqlite:/var/lib/harvest.db?mode=rwc --once
///
/// # Harvest a mirror every minute
/// news_harvester -s https://mirror.example/newest -i 60
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Connection url for the side database
    #[arg(short, long, env = "DATABASE_URL", default_value = "sqlite:harvest.db?mode=rwc")]
    pub database_url: String,

    /// Listing page to harvest
    #[arg(short, long, env = "SOURCE_URL", default_value = DEFAULT_SOURCE_URL)]
    pub source_url: Url,

    /// Seconds between pipeline runs
    #[arg(short, long, env = "HARVEST_INTERVAL_SECS", default_value_t = 600)]
    pub interval_secs: u64,

    /// Run one pipeline tick and exit instead of scheduling forever
    #[arg(long)]
    pub once: bool,
}
