//! Hacker News newest-page scraper.
//!
//! This module scrapes the [newest listings](https://news.ycombinator.com/newest)
//! page of Hacker News. Each story is one `tr.athing` table row whose
//! link lives in a nested `span.titleline > a` anchor: the anchor's
//! visible text is the title, its `href` attribute is the url.
//!
//! Hrefs are taken verbatim (external stories carry absolute urls, self
//! posts carry site-relative ones like `item?id=...`), so the side
//! database records exactly what the page said.

use crate::error::HarvestError;
use crate::models::Listing;
use crate::utils::truncate_for_log;
use futures::future;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument, warn};

/// Listing page scraped when no source url is configured.
pub const DEFAULT_SOURCE_URL: &str = "https://news.ycombinator.com/newest";

static ROW_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("tr.athing").unwrap());
static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("span.titleline > a").unwrap());

/// Fetch the raw listing page.
///
/// Performs one GET against `source_url` and returns the response body.
/// Non-2xx statuses are promoted to errors, so any transport or status
/// failure surfaces as [`HarvestError::Fetch`] and fails the run fast;
/// the caller abandons the whole batch.
#[instrument(level = "info", skip(client))]
pub async fn fetch_listing_page(client: &Client, source_url: &str) -> Result<String, HarvestError> {
    let response = client.get(source_url).send().await?.error_for_status()?;
    let body = response.text().await?;
    info!(bytes = body.len(), "Fetched listing page");
    Ok(body)
}

/// Extract one listing per row from the raw markup.
///
/// Locates every `tr.athing` row, fans the per-row extractions out as
/// futures, and joins them before returning. Row extraction does no I/O;
/// the fan-out mirrors the batch shape rather than buying latency.
///
/// The returned vector has one entry per row, in page order. A row whose
/// link element is missing yields `None`; a row whose link lacks text or
/// an `href` yields a [`Listing`] with the corresponding field absent.
/// Malformed rows are logged and skipped without failing the batch.
#[instrument(level = "info", skip_all)]
pub async fn extract_listings(html: &str) -> Vec<Option<Listing>> {
    let document = Html::parse_document(html);
    let rows: Vec<ElementRef> = document.select(&ROW_SELECTOR).collect();

    let outcomes = future::join_all(
        rows.into_iter()
            .map(|row| async move { extract_row(row) }),
    )
    .await;

    info!(rows = outcomes.len(), "Extracted listing rows");
    debug!(?outcomes, "Listing rows");
    outcomes
}

/// Extract a single listing row.
fn extract_row(row: ElementRef<'_>) -> Option<Listing> {
    let Some(link) = row.select(&LINK_SELECTOR).next() else {
        warn!(
            row = %truncate_for_log(&row.html(), 160),
            "No link element in listing row; skipping row"
        );
        return None;
    };

    Some(Listing {
        title: extract_title(link),
        url: extract_url(link),
    })
}

/// Pull the cleaned title text from a link element.
fn extract_title(link: ElementRef<'_>) -> Option<String> {
    let text = link.text().collect::<String>().trim().to_string();
    if text.is_empty() {
        warn!(
            link = %truncate_for_log(&link.html(), 160),
            "Title could not be extracted from listing link"
        );
        return None;
    }
    Some(text)
}

/// Pull the `href` attribute from a link element, verbatim.
fn extract_url(link: ElementRef<'_>) -> Option<String> {
    match link.value().attr("href") {
        Some(href) => Some(href.to_string()),
        None => {
            warn!(
                link = %truncate_for_log(&link.html(), 160),
                "Url could not be extracted from listing link"
            );
            None
        }
    }
}
