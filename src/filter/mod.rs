//! Filter model for integrity issue queries
//!
//! A filter is a closed set of typed predicate slots. Every supported
//! predicate kind has its own slot; there is no stringly-keyed fallback,
//! so query building can match exhaustively.

mod types;

pub use types::{Filter, FilterClause, IssueStatus, Selection, Severity};
