//! Fixed-cadence scheduling and single-run orchestration.
//!
//! Each tick drives one closed pipeline run:
//! `Idle → Fetching → Parsing → Filtering → Persisting → Idle`, with a
//! fetch failure short-circuiting straight back to idle. Runs are
//! awaited inline in the tick loop, so two runs can never overlap; a
//! tick that fires while a run is still going is simply delayed.

use std::time::Duration;

use itertools::Itertools;
use reqwest::Client;
use tokio::time::{self, MissedTickBehavior};
use tracing::{error, info, instrument, warn};

use crate::error::HarvestError;
use crate::models::{self, Listing};
use crate::scrapers::hackernews;
use crate::store::Store;

/// Counters for one pipeline run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    /// Listing rows located on the page.
    pub rows: usize,
    /// Unique complete listings left after filtering and in-batch dedupe.
    pub complete: usize,
    /// Rows actually inserted into the store.
    pub inserted: usize,
}

/// Execute one full pipeline run against a live source.
///
/// The HTTP client is acquired just for the fetch and released when the
/// fetch scope ends, success or failure; nothing network-related
/// survives between runs. Transport or status failure abandons the run
/// before anything touches storage.
#[instrument(level = "info", skip(store))]
pub async fn run_once(store: &Store, source_url: &str) -> Result<RunStats, HarvestError> {
    let html = {
        let client = Client::new();
        hackernews::fetch_listing_page(&client, source_url).await?
    };

    harvest_page(store, &html).await
}

/// Parse, filter, and persist one fetched listing page.
///
/// The extracted batch is deduplicated by url before the storage check,
/// so a source page repeating a story cannot insert duplicates. An empty
/// batch logs a warning and skips persistence; the schedule is never
/// terminated by an empty tick.
pub async fn harvest_page(store: &Store, html: &str) -> Result<RunStats, HarvestError> {
    let outcomes = hackernews::extract_listings(html).await;
    let rows = outcomes.len();

    let batch: Vec<Listing> = models::filter_complete(outcomes)
        .into_iter()
        .unique_by(|listing| listing.url.clone())
        .collect();

    if batch.is_empty() {
        warn!(rows, "No listings harvested this run; skipping persistence");
        return Ok(RunStats {
            rows,
            complete: 0,
            inserted: 0,
        });
    }

    let complete = batch.len();
    let inserted = store.persist_batch(&batch).await?;
    info!(
        rows,
        complete,
        inserted,
        stored_total = store.count().await?,
        "Run complete"
    );

    Ok(RunStats {
        rows,
        complete,
        inserted,
    })
}

/// Drive one run per tick until the process is told to stop.
///
/// A failed run is logged at error severity and abandoned; the next tick
/// tries again from scratch. No retries, no backoff.
pub async fn run(store: &Store, source_url: &str, period: Duration) {
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!(period_secs = period.as_secs(), source = source_url, "Scheduler started");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = run_once(store, source_url).await {
                    error!(error = %e, "Run failed; batch abandoned until next tick");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal; stopping scheduler");
                break;
            }
        }
    }
}
