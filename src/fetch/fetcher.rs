//! Page fetcher implementation

use crate::error::Result;
use crate::filter::Filter;
use crate::query::QueryBuilder;
use crate::store::{CursorToken, DocumentStore, Record};
use crate::types::SearchMode;
use std::sync::Arc;
use tracing::debug;

/// One bounded, ordered batch of records plus pagination signals
///
/// `end_cursor` is the position token terminating this page's window. In
/// client-side search mode it can differ from the last visible record:
/// the window may end on a record the search filtered out, and the cursor
/// must still advance past it.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Records visible on this page, in query order
    pub records: Vec<Record>,
    /// Whether more data exists past this page's window
    pub has_more: bool,
    /// Cursor for fetching the following page
    pub end_cursor: Option<CursorToken>,
}

impl Page {
    /// Number of visible records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the page shows no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Executes single page queries against an injected store
pub struct PageFetcher {
    store: Arc<dyn DocumentStore>,
    builder: QueryBuilder,
    page_size: usize,
}

impl PageFetcher {
    /// Create a fetcher over a store
    pub fn new(store: Arc<dyn DocumentStore>, builder: QueryBuilder, page_size: usize) -> Self {
        Self {
            store,
            builder,
            page_size: page_size.max(1),
        }
    }

    /// Records per page
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// The collection this fetcher reads
    pub fn collection(&self) -> &str {
        self.builder.collection()
    }

    /// Where free-text search is evaluated
    pub fn search_mode(&self) -> SearchMode {
        self.builder.search_mode()
    }

    /// Fetch one page starting strictly after `after`
    ///
    /// Requests `page_size + 1` records; the extra record is only a probe
    /// for `has_more` and never part of the page. In client-side search
    /// mode the window of `page_size` raw records is filtered after
    /// retrieval, so the page may legitimately run short while `has_more`
    /// still reports data past the window. Never retries; the caller owns
    /// retry policy.
    pub async fn fetch(&self, filter: &Filter, after: Option<&CursorToken>) -> Result<Page> {
        let query = self.builder.build(filter, after, self.page_size + 1);
        let raw = self.store.execute(&query).await?;

        let has_more = raw.len() > self.page_size;
        let window_len = raw.len().min(self.page_size);
        let window = &raw[..window_len];
        let end_cursor = window.last().map(|r| r.token.clone());

        let records = match self.builder.search_mode() {
            SearchMode::Native => window.to_vec(),
            SearchMode::Client => window
                .iter()
                .filter(|r| filter.matches_search(&r.fields))
                .cloned()
                .collect(),
        };

        debug!(
            collection = self.builder.collection(),
            fetched = raw.len(),
            visible = records.len(),
            has_more,
            "fetched page"
        );

        Ok(Page {
            records,
            has_more,
            end_cursor,
        })
    }
}

impl std::fmt::Debug for PageFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageFetcher")
            .field("collection", &self.builder.collection())
            .field("page_size", &self.page_size)
            .field("search_mode", &self.builder.search_mode())
            .finish_non_exhaustive()
    }
}
