//! Typed errors for the harvest pipeline.
//!
//! Only run-fatal conditions surface here. A row that fails to yield a
//! title or url is recovered locally inside the extractor and never
//! becomes an error.

use thiserror::Error;

/// Errors that abort a single harvest run.
///
/// Either variant abandons the whole batch for that tick; nothing is
/// persisted and the scheduler waits for the next tick. There is no
/// retry policy.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// Transport-level failure or non-2xx status while fetching the
    /// listing page.
    #[error("fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The side database rejected a lookup, insert, or commit.
    #[error("storage error: {0}")]
    Store(#[from] sqlx::Error),
}
