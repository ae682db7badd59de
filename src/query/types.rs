//! Query types
//!
//! The wire-level query shape accepted by a document store: a predicate
//! list, an explicit sort, an optional after-cursor, and a limit.

use crate::store::CursorToken;
use crate::types::SortDirection;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Field
// ============================================================================

/// Queryable fields of an integrity record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    IssueType,
    Severity,
    Entity,
    Status,
    RunId,
    /// The store's indexed full-text field
    Text,
}

impl Field {
    /// Wire name of this field
    pub fn as_str(self) -> &'static str {
        match self {
            Self::IssueType => "issue_type",
            Self::Severity => "severity",
            Self::Entity => "entity",
            Self::Status => "status",
            Self::RunId => "run_id",
            Self::Text => "text",
        }
    }
}

// ============================================================================
// Operator
// ============================================================================

/// Predicate operators supported by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    /// Exact equality
    Eq,
    /// Case-insensitive substring containment
    Contains,
}

// ============================================================================
// Predicate
// ============================================================================

/// One (field, operator, value) constraint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    pub field: Field,
    pub op: Operator,
    pub value: Value,
}

impl Predicate {
    /// Create an equality predicate
    pub fn eq(field: Field, value: impl Into<Value>) -> Self {
        Self {
            field,
            op: Operator::Eq,
            value: value.into(),
        }
    }

    /// Create a containment predicate
    pub fn contains(field: Field, value: impl Into<Value>) -> Self {
        Self {
            field,
            op: Operator::Contains,
            value: value.into(),
        }
    }
}

// ============================================================================
// Sort
// ============================================================================

/// Sortable keys
///
/// The comparison key must be monotonic for cursor validity; creation
/// time is the only key this system sorts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    CreatedAt,
}

impl SortKey {
    /// Wire name of this sort key
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
        }
    }
}

/// Explicit sort specification, always present on a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Sort {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Sort {
    /// Newest-first on creation time (the dashboard default)
    pub fn recency() -> Self {
        Self {
            key: SortKey::CreatedAt,
            direction: SortDirection::Desc,
        }
    }
}

// ============================================================================
// Query
// ============================================================================

/// A bounded, sorted query against one collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Target collection name
    pub collection: String,

    /// Native predicates evaluated by the store
    pub predicates: Vec<Predicate>,

    /// Explicit sort; cursors are only meaningful under this order
    pub sort: Sort,

    /// Continue scanning strictly after this position
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<CursorToken>,

    /// Maximum number of records to return
    pub limit: usize,
}
