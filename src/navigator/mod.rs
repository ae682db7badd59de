//! Pagination navigator
//!
//! The core state machine coordinating page traversal over a
//! forward-only cursor interface. A navigator owns one filter context:
//! its cursor history, current position, and in-flight generation. Each
//! filter context gets its own navigator; there is no shared state
//! between instances.
//!
//! # Concurrency
//!
//! Exactly one operation runs at a time: all mutable state sits behind an
//! async mutex, so overlapping calls serialize instead of interleaving
//! mutations. A filter change bumps an atomic generation counter without
//! waiting for the lock; an operation that was already in flight sees the
//! bump when its fetch resolves and surfaces `Error::Superseded` instead
//! of committing stale results.

mod types;

pub use types::{NavigatorConfig, NavigatorStatus, PageView, Phase};

use crate::error::{Error, Result};
use crate::fetch::{Page, PageFetcher};
use crate::filter::Filter;
use crate::history::CursorHistory;
use crate::query::QueryBuilder;
use crate::store::{total_pages, CountEstimator, CursorToken, DocumentStore};
use crate::types::PrevPolicy;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Mutable navigator state, guarded by the operation mutex
#[derive(Debug)]
struct NavigatorInner {
    filter: Filter,
    history: CursorHistory,
    current_page: usize,
    has_more: bool,
    /// Terminal cursor of the current page; the entry point for `next`
    last_cursor: Option<CursorToken>,
    /// Approximate total pages under the current filter
    total_hint: Option<u64>,
    /// Visited pages, kept only under `PrevPolicy::CachePages`
    page_cache: HashMap<usize, Page>,
}

impl NavigatorInner {
    fn fresh(filter: Filter) -> Self {
        Self {
            filter,
            history: CursorHistory::new(),
            current_page: 1,
            has_more: false,
            last_cursor: None,
            total_hint: None,
            page_cache: HashMap::new(),
        }
    }
}

/// Stateful coordinator for cursor page traversal
pub struct Navigator {
    fetcher: PageFetcher,
    estimator: Option<Arc<dyn CountEstimator>>,
    config: NavigatorConfig,
    generation: AtomicU64,
    phase: AtomicU8,
    inner: Mutex<NavigatorInner>,
}

impl Navigator {
    /// Create a navigator over an injected store
    pub fn new(
        store: Arc<dyn DocumentStore>,
        collection: impl Into<String>,
        config: NavigatorConfig,
    ) -> Self {
        let builder = QueryBuilder::new(collection)
            .with_sort_direction(config.sort_direction)
            .with_search_mode(config.search_mode);
        let fetcher = PageFetcher::new(store, builder, config.page_size);

        Self {
            fetcher,
            estimator: None,
            config,
            generation: AtomicU64::new(0),
            phase: AtomicU8::new(Phase::Idle.as_u8()),
            inner: Mutex::new(NavigatorInner::fresh(Filter::default())),
        }
    }

    /// Attach a count estimator for total-page hints
    #[must_use]
    pub fn with_estimator(mut self, estimator: Arc<dyn CountEstimator>) -> Self {
        self.estimator = Some(estimator);
        self
    }

    /// The collection this navigator traverses
    pub fn collection(&self) -> &str {
        self.fetcher.collection()
    }

    /// Records per page
    pub fn page_size(&self) -> usize {
        self.fetcher.page_size()
    }

    /// Current lifecycle phase, readable while an operation is in flight
    pub fn phase(&self) -> Phase {
        Phase::from_u8(self.phase.load(Ordering::SeqCst))
    }

    /// Observable state snapshot
    pub async fn status(&self) -> NavigatorStatus {
        let inner = self.inner.lock().await;
        NavigatorStatus {
            phase: self.phase(),
            current_page: inner.current_page,
            has_more: inner.has_more,
            has_prev: inner.current_page > 1,
        }
    }

    /// The filter currently applied
    pub async fn filter(&self) -> Filter {
        self.inner.lock().await.filter.clone()
    }

    // ============================================================================
    // Operations
    // ============================================================================

    /// Fetch page 1 under the current filter
    pub async fn load(&self) -> Result<PageView> {
        let mut inner = self.inner.lock().await;
        let gen = self.generation.load(Ordering::SeqCst);

        let filter = inner.filter.clone();
        inner.total_hint = self.estimate_hint(&filter, gen).await;
        let result = self.goto_page_locked(&mut inner, gen, 1).await;
        self.finish(result).map(|page| self.view(&inner, page))
    }

    /// Replace the filter, reset position, and fetch page 1
    ///
    /// The generation bump happens before the operation lock is taken, so
    /// a fetch already in flight is invalidated the moment it resolves.
    pub async fn set_filter(&self, filter: Filter) -> Result<PageView> {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let mut inner = self.inner.lock().await;
        let gen = self.generation.load(Ordering::SeqCst);

        *inner = NavigatorInner::fresh(filter.clone());
        inner.total_hint = self.estimate_hint(&filter, gen).await;
        let result = self.goto_page_locked(&mut inner, gen, 1).await;
        self.finish(result).map(|page| self.view(&inner, page))
    }

    /// Advance one page
    ///
    /// No-op returning `Ok(None)` when no next page exists; no fetch is
    /// issued in that case.
    pub async fn next(&self) -> Result<Option<PageView>> {
        let mut inner = self.inner.lock().await;
        if !inner.has_more {
            return Ok(None);
        }
        let gen = self.generation.load(Ordering::SeqCst);
        self.set_phase(Phase::Loading);

        let filter = inner.filter.clone();
        let cursor = inner.last_cursor.clone();
        let result = self.fetch_checked(gen, &filter, cursor.as_ref()).await;
        let page = self.finish(result)?;

        inner.history.push(cursor);
        inner.current_page += 1;
        self.commit_page(&mut inner, &page);
        Ok(Some(self.view(&inner, page)))
    }

    /// Step back one page
    ///
    /// No-op returning `Ok(None)` on page 1. Under the default policy the
    /// prior page is re-fetched for freshness; under
    /// `PrevPolicy::CachePages` the cached copy is served without a fetch.
    pub async fn prev(&self) -> Result<Option<PageView>> {
        let mut inner = self.inner.lock().await;
        if inner.current_page <= 1 {
            return Ok(None);
        }
        let gen = self.generation.load(Ordering::SeqCst);
        let target = inner.current_page - 1;

        if self.config.prev_policy == PrevPolicy::CachePages {
            if let Some(page) = inner.page_cache.get(&target).cloned() {
                inner.history.truncate(target);
                inner.current_page = target;
                self.commit_page(&mut inner, &page);
                return Ok(Some(self.view(&inner, page)));
            }
        }

        self.set_phase(Phase::Loading);
        let filter = inner.filter.clone();
        let cursor = inner.history.at(target).cloned();
        let result = self.fetch_checked(gen, &filter, cursor.as_ref()).await;
        let page = self.finish(result)?;

        inner.history.truncate(target);
        inner.current_page = target;
        self.commit_page(&mut inner, &page);
        Ok(Some(self.view(&inner, page)))
    }

    /// Jump to an arbitrary page number
    ///
    /// Backward jumps reuse the cursor history; forward jumps walk every
    /// intermediate page, because a cursor for page `n` can only be
    /// derived by fetching page `n - 1`. Targets past the true end
    /// resolve to the last reachable page.
    pub async fn goto_page(&self, target: usize) -> Result<PageView> {
        let mut inner = self.inner.lock().await;
        let gen = self.generation.load(Ordering::SeqCst);
        let result = self.goto_page_locked(&mut inner, gen, target.max(1)).await;
        self.finish(result).map(|page| self.view(&inner, page))
    }

    /// Jump to the last page
    ///
    /// Walks forward until a fetch reports no more data. The hint (from
    /// the caller, or the attached estimator when absent) is recorded for
    /// display but never trusted as a stopping condition: stale
    /// aggregates must not strand the navigator short of, or past, the
    /// real end.
    pub async fn goto_last_page(&self, hint: Option<u64>) -> Result<PageView> {
        let mut inner = self.inner.lock().await;
        let gen = self.generation.load(Ordering::SeqCst);
        self.set_phase(Phase::Loading);

        let hint = match hint {
            Some(pages) => Some(pages),
            None => {
                let filter = inner.filter.clone();
                self.estimate_hint(&filter, gen).await
            }
        };
        if let Some(pages) = hint {
            debug!(hint = pages, "walking to last page");
            inner.total_hint = Some(pages);
        }

        let result = self.walk_to_end(&mut inner, gen).await;
        self.finish(result).map(|page| self.view(&inner, page))
    }

    /// Re-run the fetch for the current position
    ///
    /// Usable from `Error` to retry without losing the page number or the
    /// cursor stack, and from `Idle` as a plain refresh.
    pub async fn retry(&self) -> Result<PageView> {
        let mut inner = self.inner.lock().await;
        let gen = self.generation.load(Ordering::SeqCst);
        self.set_phase(Phase::Loading);

        let filter = inner.filter.clone();
        let cursor = inner.history.at(inner.current_page).cloned();
        let result = self.fetch_checked(gen, &filter, cursor.as_ref()).await;
        let page = self.finish(result)?;

        self.commit_page(&mut inner, &page);
        Ok(self.view(&inner, page))
    }

    // ============================================================================
    // Internals
    // ============================================================================

    /// Jump implementation; the lock is already held
    async fn goto_page_locked(
        &self,
        inner: &mut NavigatorInner,
        gen: u64,
        target: usize,
    ) -> Result<Page> {
        self.set_phase(Phase::Loading);
        let filter = inner.filter.clone();

        if target <= inner.current_page {
            // Reset to page 1 or reuse a recorded cursor. The invariant
            // that history covers every page up to current_page makes the
            // lookup infallible here.
            let cursor = if target == 1 {
                None
            } else {
                inner.history.at(target).cloned()
            };
            let page = self.fetch_checked(gen, &filter, cursor.as_ref()).await?;

            inner.history.truncate(target);
            inner.current_page = target;
            self.commit_page(inner, &page);
            return Ok(page);
        }

        // Forward: strictly sequential cursor derivation, one fetch per
        // intermediate page, stopping early at the true end.
        let mut last = None;
        for step in inner.current_page + 1..=target {
            if !inner.has_more {
                break;
            }
            let cursor = inner.last_cursor.clone();
            let page = self.fetch_checked(gen, &filter, cursor.as_ref()).await?;

            if page.is_empty() && !page.has_more {
                // The tail vanished between fetches; the previous page is
                // the last reachable one.
                inner.has_more = false;
                break;
            }

            inner.history.push(cursor);
            inner.current_page = step;
            self.commit_page(inner, &page);
            last = Some(page);
        }

        match last {
            Some(page) => Ok(page),
            // Already at the end: produce a fresh view of the current
            // page instead of overshooting.
            None => self.refetch_current(inner, gen, &filter).await,
        }
    }

    /// Walk forward until a fetch reports the end of the collection
    async fn walk_to_end(&self, inner: &mut NavigatorInner, gen: u64) -> Result<Page> {
        let filter = inner.filter.clone();
        let mut last = None;

        while inner.has_more {
            let cursor = inner.last_cursor.clone();
            let page = self.fetch_checked(gen, &filter, cursor.as_ref()).await?;

            if page.is_empty() && !page.has_more {
                inner.has_more = false;
                break;
            }

            inner.history.push(cursor);
            inner.current_page += 1;
            self.commit_page(inner, &page);
            last = Some(page);
        }

        match last {
            Some(page) => Ok(page),
            None => self.refetch_current(inner, gen, &filter).await,
        }
    }

    /// Fresh fetch of the page the navigator is already on
    async fn refetch_current(
        &self,
        inner: &mut NavigatorInner,
        gen: u64,
        filter: &Filter,
    ) -> Result<Page> {
        let cursor = inner.history.at(inner.current_page).cloned();
        let page = self.fetch_checked(gen, filter, cursor.as_ref()).await?;
        self.commit_page(inner, &page);
        Ok(page)
    }

    /// One fetch under the retry policy, then a staleness check
    async fn fetch_checked(
        &self,
        gen: u64,
        filter: &Filter,
        after: Option<&CursorToken>,
    ) -> Result<Page> {
        let page = self
            .config
            .retry
            .run(|| self.fetcher.fetch(filter, after))
            .await?;
        if self.generation.load(Ordering::SeqCst) != gen {
            return Err(Error::Superseded);
        }
        Ok(page)
    }

    /// Record a successfully fetched page into the navigator state
    fn commit_page(&self, inner: &mut NavigatorInner, page: &Page) {
        inner.has_more = page.has_more;
        inner.last_cursor = page.end_cursor.clone();
        if self.config.prev_policy == PrevPolicy::CachePages {
            inner.page_cache.insert(inner.current_page, page.clone());
        }
    }

    /// Ask the estimator for a total-page hint, tolerating anything
    async fn estimate_hint(&self, filter: &Filter, gen: u64) -> Option<u64> {
        let estimator = self.estimator.as_ref()?;
        match estimator.estimate(self.fetcher.collection(), filter).await {
            Ok(Some(count)) if self.generation.load(Ordering::SeqCst) == gen => {
                Some(total_pages(count, self.fetcher.page_size()))
            }
            Ok(_) => None,
            Err(e) => {
                warn!("count estimate failed: {e}");
                None
            }
        }
    }

    /// Build the caller-facing snapshot of the current page
    fn view(&self, inner: &NavigatorInner, page: Page) -> PageView {
        PageView {
            page_number: inner.current_page,
            records: page.records,
            has_more: page.has_more,
            has_prev: inner.current_page > 1,
            total_pages_hint: inner.total_hint,
        }
    }

    /// Resolve the phase transition for a finished operation
    fn finish<T>(&self, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) | Err(Error::Superseded) => self.set_phase(Phase::Idle),
            Err(_) => self.set_phase(Phase::Error),
        }
        result
    }

    fn set_phase(&self, phase: Phase) {
        self.phase.store(phase.as_u8(), Ordering::SeqCst);
    }
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("collection", &self.fetcher.collection())
            .field("page_size", &self.fetcher.page_size())
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
