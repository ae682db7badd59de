//! Navigator types

use crate::retry::RetryPolicy;
use crate::store::Record;
use crate::types::{PrevPolicy, SearchMode, SortDirection};

// ============================================================================
// Phase
// ============================================================================

/// Lifecycle phase of a navigator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Ready for the next operation
    #[default]
    Idle,
    /// A fetch is in flight
    Loading,
    /// The last operation failed; position is preserved for retry
    Error,
}

impl Phase {
    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Loading,
            2 => Self::Error,
            _ => Self::Idle,
        }
    }

    pub(crate) fn as_u8(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Loading => 1,
            Self::Error => 2,
        }
    }
}

// ============================================================================
// Config
// ============================================================================

/// Configuration for a navigator instance
#[derive(Debug, Clone)]
pub struct NavigatorConfig {
    /// Records per page
    pub page_size: usize,
    /// Sort direction over creation time
    pub sort_direction: SortDirection,
    /// Where free-text search is evaluated
    pub search_mode: SearchMode,
    /// How `prev()` obtains already-visited pages
    pub prev_policy: PrevPolicy,
    /// Retry policy wrapped around every fetch
    pub retry: RetryPolicy,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            page_size: 25,
            sort_direction: SortDirection::Desc,
            search_mode: SearchMode::default(),
            prev_policy: PrevPolicy::default(),
            retry: RetryPolicy::default(),
        }
    }
}

impl NavigatorConfig {
    /// Create a config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size
    #[must_use]
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    /// Set the sort direction
    #[must_use]
    pub fn with_sort_direction(mut self, direction: SortDirection) -> Self {
        self.sort_direction = direction;
        self
    }

    /// Set the search mode
    #[must_use]
    pub fn with_search_mode(mut self, mode: SearchMode) -> Self {
        self.search_mode = mode;
        self
    }

    /// Set the prev policy
    #[must_use]
    pub fn with_prev_policy(mut self, policy: PrevPolicy) -> Self {
        self.prev_policy = policy;
        self
    }

    /// Set the retry policy
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

// ============================================================================
// Page View
// ============================================================================

/// Snapshot of one visited page, handed to the rendering layer
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    /// 1-indexed page number
    pub page_number: usize,
    /// Records visible on this page
    pub records: Vec<Record>,
    /// Whether a next page exists
    pub has_more: bool,
    /// Whether a previous page exists
    pub has_prev: bool,
    /// Approximate total page count, when an estimator supplied one
    ///
    /// A hint for "page X of ~Y" rendering; never authoritative.
    pub total_pages_hint: Option<u64>,
}

// ============================================================================
// Status
// ============================================================================

/// Observable navigator state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigatorStatus {
    /// Lifecycle phase
    pub phase: Phase,
    /// 1-indexed current page
    pub current_page: usize,
    /// Whether a next page exists
    pub has_more: bool,
    /// Whether a previous page exists
    pub has_prev: bool,
}
