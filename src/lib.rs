// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # cursornav
//!
//! Cursor pagination navigator for forward-only document stores.
//!
//! ## Features
//!
//! - **Forward-only traversal**: next/prev/jump over a store that only
//!   supports "continue after this cursor" queries
//! - **Cursor history**: per-session stack mapping page numbers to the
//!   cursors that reach them
//! - **Typed filters**: a closed predicate set; any change invalidates
//!   every derived cursor
//! - **Tolerant last-page jumps**: approximate counts are hints, never
//!   stopping conditions
//! - **Injected stores**: in-memory fake for tests, REST client for a
//!   remote store
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cursornav::navigator::{Navigator, NavigatorConfig};
//! use cursornav::filter::Filter;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> cursornav::Result<()> {
//!     let store = Arc::new(build_store()?);
//!     let nav = Navigator::new(store, "issues", NavigatorConfig::default());
//!
//!     let first = nav.load().await?;
//!     let second = nav.next().await?;
//!     let last = nav.goto_last_page(None).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          Navigator                              │
//! │  next()  prev()  goto_page(n)  goto_last_page(hint)  retry()    │
//! └─────────────────────────────────────────────────────────────────┘
//!                │                 │                  │
//! ┌──────────────┴───┬─────────────┴─────┬────────────┴────────────┐
//! │  Cursor History  │    Page Fetcher   │     Count Estimator     │
//! ├──────────────────┼───────────────────┼─────────────────────────┤
//! │ page -> cursor   │ over-fetch + trim │ approximate totals      │
//! │ append/truncate  │ Query Builder     │ (hint only)             │
//! └──────────────────┴───────────────────┴─────────────────────────┘
//!                              │
//!                    ┌─────────┴─────────┐
//!                    │   DocumentStore   │
//!                    │  memory  |  REST  │
//!                    └───────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)] // TODO: Add docs before 1.0 release

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the crate
pub mod error;

/// Common types and type aliases
pub mod types;

/// Typed filter model
pub mod filter;

/// Query construction
pub mod query;

/// Document store abstraction and implementations
pub mod store;

/// HTTP transport for the REST store
pub mod http;

/// Retry policy with classification-aware backoff
pub mod retry;

/// Page fetching
pub mod fetch;

/// Cursor history stack
pub mod history;

/// Pagination navigator state machine
pub mod navigator;

/// Configuration loading
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use filter::Filter;
pub use navigator::{Navigator, NavigatorConfig, PageView};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
