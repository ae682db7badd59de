//! Filter types
//!
//! `Filter` is compared by value: any change to any slot invalidates every
//! cursor derived under the previous filter.

use serde::{Deserialize, Serialize};

// ============================================================================
// Selection
// ============================================================================

/// A filter slot that is either unconstrained or pinned to one value
///
/// `All` is the sentinel that omits the predicate entirely when the query
/// is built; it is never translated into a literal value on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection<T> {
    /// No constraint on this slot
    All,
    /// Constrain the slot to exactly this value
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Self::All
    }
}

impl<T> Selection<T> {
    /// Returns the constrained value, if any
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::All => None,
            Self::Only(v) => Some(v),
        }
    }

    /// Check whether this slot is unconstrained
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl<T> From<T> for Selection<T> {
    fn from(value: T) -> Self {
        Self::Only(value)
    }
}

// ============================================================================
// Severity
// ============================================================================

/// Severity of an integrity issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Wire representation of this severity
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

// ============================================================================
// Issue Status
// ============================================================================

/// Workflow status of an integrity issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    Open,
    Acknowledged,
    Resolved,
}

impl IssueStatus {
    /// Wire representation of this status
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Acknowledged => "acknowledged",
            Self::Resolved => "resolved",
        }
    }
}

// ============================================================================
// Filter
// ============================================================================

/// Immutable predicate set for one navigator session
///
/// Slots left at their defaults (`All` / `None`) contribute no predicate.
/// Free-text search may be evaluated store-side or client-side depending on
/// the configured search mode; it lives here either way so that filter
/// equality covers it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Filter {
    /// Issue type (e.g. "missing_field", "orphaned_link")
    #[serde(default)]
    pub issue_type: Selection<String>,

    /// Issue severity
    #[serde(default)]
    pub severity: Selection<Severity>,

    /// Affected entity name
    #[serde(default)]
    pub entity: Selection<String>,

    /// Workflow status
    #[serde(default)]
    pub status: Selection<IssueStatus>,

    /// Originating rule-run identifier
    #[serde(default)]
    pub run_id: Option<String>,

    /// Free-text substring search
    #[serde(default)]
    pub search: Option<String>,
}

impl Filter {
    /// Create an unconstrained filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the issue type slot
    #[must_use]
    pub fn with_issue_type(mut self, issue_type: impl Into<String>) -> Self {
        self.issue_type = Selection::Only(issue_type.into());
        self
    }

    /// Set the severity slot
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Selection::Only(severity);
        self
    }

    /// Set the entity slot
    #[must_use]
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Selection::Only(entity.into());
        self
    }

    /// Set the status slot
    #[must_use]
    pub fn with_status(mut self, status: IssueStatus) -> Self {
        self.status = Selection::Only(status);
        self
    }

    /// Set the run id slot
    #[must_use]
    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = Some(run_id.into());
        self
    }

    /// Set the free-text search slot
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Enumerate the active clauses of this filter
    ///
    /// Unconstrained slots and empty strings are skipped. The returned list
    /// is what the query builder matches over.
    pub fn clauses(&self) -> Vec<FilterClause> {
        let mut clauses = Vec::new();
        if let Selection::Only(t) = &self.issue_type {
            clauses.push(FilterClause::IssueType(t.clone()));
        }
        if let Selection::Only(s) = &self.severity {
            clauses.push(FilterClause::Severity(*s));
        }
        if let Selection::Only(e) = &self.entity {
            clauses.push(FilterClause::Entity(e.clone()));
        }
        if let Selection::Only(s) = &self.status {
            clauses.push(FilterClause::Status(*s));
        }
        if let Some(run_id) = self.run_id.as_deref().filter(|s| !s.is_empty()) {
            clauses.push(FilterClause::RunId(run_id.to_string()));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            clauses.push(FilterClause::Search(search.to_string()));
        }
        clauses
    }

    /// Check whether a record's fields match the free-text search slot
    ///
    /// Case-insensitive substring match over string field values. Used by
    /// the page fetcher in client-side search mode.
    pub fn matches_search(&self, fields: &serde_json::Map<String, serde_json::Value>) -> bool {
        let Some(needle) = self.search.as_deref().filter(|s| !s.is_empty()) else {
            return true;
        };
        let needle = needle.to_lowercase();
        fields.values().any(|v| match v {
            serde_json::Value::String(s) => s.to_lowercase().contains(&needle),
            _ => false,
        })
    }
}

// ============================================================================
// Filter Clause
// ============================================================================

/// One active predicate of a filter
///
/// Closed sum type covering exactly the supported predicate kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterClause {
    /// Issue type equals
    IssueType(String),
    /// Severity equals
    Severity(Severity),
    /// Entity equals
    Entity(String),
    /// Status equals
    Status(IssueStatus),
    /// Rule-run id equals
    RunId(String),
    /// Free-text substring search
    Search(String),
}
