//! # News Harvester
//!
//! A periodic scraper that harvests article listings from a news
//! aggregator's newest page into a side database.
//!
//! ## Architecture
//!
//! Each scheduled run is one closed pipeline:
//! 1. **Fetching**: one GET against the listing page, with the HTTP
//!    client scoped to the run
//! 2. **Parsing**: per-row title/url extraction, fanned out and joined
//! 3. **Filtering**: incomplete rows dropped
//! 4. **Persisting**: dedupe-by-url against the side database, one
//!    transaction per batch
//!
//! Runs repeat on a fixed wall-clock cadence (10 minutes by default) for
//! the lifetime of the process. A failed run is abandoned whole; the
//! next tick starts over from scratch.
//!
//! ## Usage
//!
//! ```sh
//! news_harvester --database-url sqlite:harvest.db?mode=rwc
//! ```

use std::time::Duration;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod error;
mod models;
mod scheduler;
mod scrapers;
mod store;
mod utils;

use cli::Cli;
use store::Store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    info!("news_harvester starting up");

    let args = Cli::parse();
    debug!(
        ?args.database_url,
        ?args.source_url,
        args.interval_secs,
        "Parsed CLI arguments"
    );

    let store = Store::connect(&args.database_url).await?;
    info!(database = %args.database_url, "Side database ready");

    if args.once {
        let stats = scheduler::run_once(&store, args.source_url.as_str()).await?;
        info!(
            rows = stats.rows,
            complete = stats.complete,
            inserted = stats.inserted,
            "Single run finished"
        );
        return Ok(());
    }

    scheduler::run(
        &store,
        args.source_url.as_str(),
        Duration::from_secs(args.interval_secs),
    )
    .await;

    info!("news_harvester stopped");
    Ok(())
}
