//! Cursor pagination
//!
//! Drives a list endpoint page by page: start without a cursor, append each
//! page's items, follow the returned cursor, and stop when the cursor is
//! absent or empty or when `max_pages` calls have been made. Hitting the cap
//! is not an error; the items gathered so far are returned and the summary
//! is marked `truncated`.
//!
//! ```rust
//! # tokio_test::block_on(async {
//! use sellerlink_common::pagination::{collect_all, Page};
//!
//! let items = collect_all(
//!     |cursor: Option<String>| async move {
//!         Ok::<_, String>(match cursor.as_deref() {
//!             None => Page::new(vec![1, 2], Some("p2".to_string())),
//!             Some(_) => Page::last(vec![3]),
//!         })
//!     },
//!     10,
//! )
//! .await
//! .unwrap();
//!
//! assert_eq!(items, vec![1, 2, 3]);
//! # });
//! ```

use std::future::Future;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::resilience::constants::DEFAULT_MAX_PAGES;

/// One page returned by a list endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// Continuation token; absent or empty means no more pages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    /// Page with an optional continuation
    pub fn new(items: Vec<T>, next_cursor: Option<String>) -> Self {
        Self { items, next_cursor }
    }

    /// A page with no continuation
    pub fn last(items: Vec<T>) -> Self {
        Self { items, next_cursor: None }
    }

    /// The cursor to follow, treating an empty token as the end
    pub fn continuation(&self) -> Option<&str> {
        self.next_cursor.as_deref().filter(|cursor| !cursor.is_empty())
    }
}

/// Items gathered by a pagination run, with bookkeeping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSummary<T> {
    /// Items from every fetched page, in order
    pub items: Vec<T>,
    /// Number of `fetch_page` calls made
    pub pages_fetched: usize,
    /// The page cap was reached while a cursor was still pending
    pub truncated: bool,
}

/// Pagination driver with a fixed page cap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationAggregator {
    max_pages: usize,
}

impl Default for PaginationAggregator {
    fn default() -> Self {
        Self { max_pages: DEFAULT_MAX_PAGES }
    }
}

impl PaginationAggregator {
    /// Aggregator stopping after `max_pages` calls
    pub fn new(max_pages: usize) -> Self {
        Self { max_pages }
    }

    /// Page cap
    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    /// Fetch pages until exhaustion or the cap.
    ///
    /// Errors from `fetch_page` propagate unchanged and discard the items
    /// gathered so far.
    #[instrument(level = "debug", skip_all, fields(max_pages = self.max_pages))]
    pub async fn collect_with_summary<T, E, F, Fut>(
        &self,
        mut fetch_page: F,
    ) -> Result<PageSummary<T>, E>
    where
        F: FnMut(Option<String>) -> Fut,
        Fut: Future<Output = Result<Page<T>, E>>,
    {
        let mut items = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages_fetched = 0;

        while pages_fetched < self.max_pages {
            let page = fetch_page(cursor.take()).await?;
            pages_fetched += 1;

            cursor = page.continuation().map(str::to_string);
            debug!(
                page = pages_fetched,
                items = page.items.len(),
                more = cursor.is_some(),
                "fetched page"
            );
            items.extend(page.items);

            if cursor.is_none() {
                break;
            }
        }

        let truncated = cursor.is_some();
        if truncated {
            warn!(
                pages_fetched,
                items = items.len(),
                "page cap reached, returning partial results"
            );
        }

        Ok(PageSummary { items, pages_fetched, truncated })
    }

    /// Gather every item, dropping the bookkeeping.
    pub async fn collect<T, E, F, Fut>(&self, fetch_page: F) -> Result<Vec<T>, E>
    where
        F: FnMut(Option<String>) -> Fut,
        Fut: Future<Output = Result<Page<T>, E>>,
    {
        Ok(self.collect_with_summary(fetch_page).await?.items)
    }
}

/// Collect every item across pages, making at most `max_pages` calls.
pub async fn collect_all<T, E, F, Fut>(fetch_page: F, max_pages: usize) -> Result<Vec<T>, E>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, E>>,
{
    PaginationAggregator::new(max_pages).collect(fetch_page).await
}

/// Like [`collect_all`], also reporting pages fetched and truncation.
pub async fn collect_all_with_summary<T, E, F, Fut>(
    fetch_page: F,
    max_pages: usize,
) -> Result<PageSummary<T>, E>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, E>>,
{
    PaginationAggregator::new(max_pages).collect_with_summary(fetch_page).await
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Validates an empty cursor string ends pagination.
    #[test]
    fn test_empty_cursor_is_end() {
        assert_eq!(Page::new(vec![1], Some(String::new())).continuation(), None);
        assert_eq!(Page::new(vec![1], Some("x".into())).continuation(), Some("x"));
        assert_eq!(Page::<u8>::last(vec![]).continuation(), None);
    }

    /// Validates the page wire format.
    #[test]
    fn test_page_deserializes_camel_case() {
        let page: Page<u32> =
            serde_json::from_str(r#"{"items":[1,2],"nextCursor":"abc"}"#).unwrap();
        assert_eq!(page, Page::new(vec![1, 2], Some("abc".into())));

        let page: Page<u32> = serde_json::from_str(r#"{"items":[]}"#).unwrap();
        assert_eq!(page.next_cursor, None);
    }

    /// Validates the default cap.
    #[test]
    fn test_default_cap() {
        assert_eq!(PaginationAggregator::default().max_pages(), 10);
    }

    /// Validates a zero cap makes no calls.
    #[tokio::test]
    async fn test_zero_cap_makes_no_calls() {
        let mut calls = 0;
        let summary = collect_all_with_summary(
            |_| {
                calls += 1;
                async { Ok::<_, String>(Page::new(vec![1], Some("next".into()))) }
            },
            0,
        )
        .await
        .unwrap();

        assert_eq!(calls, 0);
        assert!(summary.items.is_empty());
        assert_eq!(summary.pages_fetched, 0);
        assert!(!summary.truncated);
    }
}
