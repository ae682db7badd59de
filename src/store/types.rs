//! Store record and cursor types

use crate::types::JsonObject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Cursor Token
// ============================================================================

/// Opaque store-issued position token
///
/// Marks "continue scanning strictly after this record" under one
/// filter+sort combination. Tokens must never be reused across differing
/// filters; the navigator enforces that discipline by discarding its
/// cursor history on every filter change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CursorToken(String);

impl CursorToken {
    /// Wrap a raw token value
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw token value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CursorToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Record
// ============================================================================

/// One record as returned by a store query
///
/// Immutable at fetch time; the navigator only holds transient copies for
/// the current page. `created_at` is the monotonically comparable sort
/// key; `token` is the record's position under the query that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Stable identifier
    pub id: String,

    /// Creation timestamp (the sort key)
    pub created_at: DateTime<Utc>,

    /// Position token for after-cursor continuation
    pub token: CursorToken,

    /// Opaque record payload
    #[serde(default)]
    pub fields: JsonObject,
}

impl Record {
    /// Create a record with an empty payload
    pub fn new(
        id: impl Into<String>,
        created_at: DateTime<Utc>,
        token: CursorToken,
    ) -> Self {
        Self {
            id: id.into(),
            created_at,
            token,
            fields: JsonObject::new(),
        }
    }

    /// Attach a payload
    #[must_use]
    pub fn with_fields(mut self, fields: JsonObject) -> Self {
        self.fields = fields;
        self
    }
}
