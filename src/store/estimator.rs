//! Approximate count estimation
//!
//! The count estimator is an external collaborator that supplies an
//! approximate per-filter record count. Its output bounds nothing
//! authoritative: it is consumed only to render "page X of ~Y" and to hint
//! the last-page walk. Stale, absent, or plain wrong counts are tolerated
//! everywhere.

use crate::error::Result;
use crate::filter::Filter;
use async_trait::async_trait;

/// Supplier of approximate record counts per filter combination
#[async_trait]
pub trait CountEstimator: Send + Sync {
    /// Estimate how many records match the filter
    ///
    /// `None` means the estimator has no figure for this combination;
    /// callers must degrade gracefully.
    async fn estimate(&self, collection: &str, filter: &Filter) -> Result<Option<u64>>;
}

/// Derive a total-page hint from an estimated count
///
/// An estimate of zero still yields one page: the collection may have
/// gained records since the aggregate was computed, and page 1 always
/// exists.
pub fn total_pages(estimated_count: u64, page_size: usize) -> u64 {
    if page_size == 0 {
        return 1;
    }
    estimated_count.div_ceil(page_size as u64).max(1)
}
