//! Page fetching
//!
//! Executes one query per call, over-fetching by a single probe record to
//! learn whether more data exists without a count query.

mod fetcher;

pub use fetcher::{Page, PageFetcher};
