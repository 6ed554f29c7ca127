//! Data models for harvested listings.
//!
//! This module defines the two shapes a listing passes through:
//! - [`Listing`]: a title/url pair as extracted from one source row, with
//!   either field possibly missing when the row was malformed
//! - [`StoredListing`]: a listing as persisted in the side database
//!
//! It also hosts the filter stage ([`filter_complete`]), which decides
//! which extraction outcomes are allowed to reach storage.

use serde::{Deserialize, Serialize};

/// A listing extracted from one row of the source page.
///
/// Both fields are optional at extraction time: a missing field means the
/// row carried a link element but the title text or `href` attribute
/// could not be pulled from it. Rows with no link element at all never
/// produce a `Listing`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Visible text of the row's link element, if any.
    pub title: Option<String>,
    /// `href` attribute of the row's link element, verbatim.
    pub url: Option<String>,
}

impl Listing {
    /// Whether this listing may be persisted.
    ///
    /// The url is the dedupe key and must be present. The title is not
    /// required: a titleless link is still a harvestable listing, and
    /// the title column is nullable in storage.
    pub fn is_complete(&self) -> bool {
        self.url.is_some()
    }
}

/// A listing as persisted in the `listings` table.
///
/// Created only by the persister; never updated or deleted by the
/// pipeline. The `url` column is the natural dedupe key but is not
/// declared unique; uniqueness is enforced by lookup-before-insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoredListing {
    /// Auto-increment primary key.
    pub id: i64,
    pub title: Option<String>,
    pub url: Option<String>,
}

/// Filter stage: keep only extraction outcomes that produced a
/// persistable listing.
///
/// Drops rows that yielded no listing at all and listings without a url.
/// Pure function; the warnings for each dropped row were already logged
/// at the point of extraction.
pub fn filter_complete(outcomes: Vec<Option<Listing>>) -> Vec<Listing> {
    outcomes
        .into_iter()
        .flatten()
        .filter(|listing| listing.is_complete())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(title: Option<&str>, url: Option<&str>) -> Listing {
        Listing {
            title: title.map(String::from),
            url: url.map(String::from),
        }
    }

    #[test]
    fn test_listing_with_both_fields_is_complete() {
        assert!(listing(Some("Title A"), Some("/a")).is_complete());
    }

    #[test]
    fn test_listing_without_title_is_still_complete() {
        // The url is the dedupe key; the title column is nullable.
        assert!(listing(None, Some("/a")).is_complete());
    }

    #[test]
    fn test_listing_without_url_is_incomplete() {
        assert!(!listing(Some("Title A"), None).is_complete());
        assert!(!listing(None, None).is_complete());
    }

    #[test]
    fn test_filter_drops_absent_outcomes() {
        let outcomes = vec![
            Some(listing(Some("Title A"), Some("/a"))),
            None,
            Some(listing(Some("Title B"), Some("/b"))),
        ];

        let kept = filter_complete(outcomes);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].url.as_deref(), Some("/a"));
        assert_eq!(kept[1].url.as_deref(), Some("/b"));
    }

    #[test]
    fn test_filter_drops_listings_without_url() {
        let outcomes = vec![
            Some(listing(Some("no href"), None)),
            Some(listing(None, Some("/kept"))),
        ];

        let kept = filter_complete(outcomes);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].title, None);
        assert_eq!(kept[0].url.as_deref(), Some("/kept"));
    }

    #[test]
    fn test_filter_on_empty_input_yields_empty_batch() {
        assert!(filter_complete(Vec::new()).is_empty());
    }
}
