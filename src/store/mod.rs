//! Document store abstraction
//!
//! The backing store is a black box with a forward-only cursor query
//! interface: predicates, an explicit sort, an optional after-cursor, and
//! a limit. No offset queries and no cheap random access exist.
//!
//! Two implementations ship: an in-memory store for tests and examples,
//! and a REST client for a remote store. Both are injected where they are
//! consumed; nothing in this crate reaches for an ambient store handle.

mod estimator;
mod memory;
mod rest;
mod types;

pub use estimator::{total_pages, CountEstimator};
pub use memory::MemoryStore;
pub use rest::RestStore;
pub use types::{CursorToken, Record};

use crate::error::Result;
use crate::query::Query;
use async_trait::async_trait;

/// Black-box query interface of the backing document store
///
/// Returns up to `query.limit` records in the query's sort order, each
/// carrying an opaque position token usable as a future after-cursor.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Execute one bounded query
    async fn execute(&self, query: &Query) -> Result<Vec<Record>>;
}
