//! In-memory document store
//!
//! Deterministic fake used by tests, examples, and local development. It
//! implements the same forward-only contract as the remote store: position
//! tokens encode (sort key, id) pairs, so continuation works without any
//! notion of offsets.
//!
//! The store carries light fault-injection hooks (queued failures, an
//! executed-query counter, count-hint overrides) so callers can exercise
//! retry and sequential-derivation behavior deterministically.

use super::types::{CursorToken, Record};
use super::{CountEstimator, DocumentStore};
use crate::error::{Error, Result};
use crate::filter::Filter;
use crate::query::{Field, Operator, Predicate, Query};
use crate::types::{JsonObject, SortDirection};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, RwLock};

/// In-memory store keyed by collection name
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Record>>>,
    executed: AtomicUsize,
    fail_queue: Mutex<VecDeque<Error>>,
    count_hints: Mutex<HashMap<String, u64>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one record into a collection
    ///
    /// The position token is derived from the sort key and id at insert
    /// time, matching how a keyset-paginated store issues tokens.
    pub fn put(
        &self,
        collection: &str,
        id: impl Into<String>,
        created_at: DateTime<Utc>,
        fields: JsonObject,
    ) {
        let id = id.into();
        let token = CursorToken::new(encode_position(created_at, &id));
        let record = Record {
            id,
            created_at,
            token,
            fields,
        };
        let mut collections = self.collections.write().expect("store lock poisoned");
        collections
            .entry(collection.to_string())
            .or_default()
            .push(record);
    }

    /// Remove a record by id, returning whether it existed
    ///
    /// Lets tests exercise a live-updating collection between visits.
    pub fn remove(&self, collection: &str, id: &str) -> bool {
        let mut collections = self.collections.write().expect("store lock poisoned");
        if let Some(records) = collections.get_mut(collection) {
            let before = records.len();
            records.retain(|r| r.id != id);
            return records.len() != before;
        }
        false
    }

    /// Number of queries executed so far
    pub fn executed(&self) -> usize {
        self.executed.load(Ordering::SeqCst)
    }

    /// Reset the executed-query counter
    pub fn reset_executed(&self) {
        self.executed.store(0, Ordering::SeqCst);
    }

    /// Queue a failure for the next `execute` call
    ///
    /// Failures are consumed in order before any query runs.
    pub fn fail_next(&self, error: Error) {
        self.fail_queue
            .lock()
            .expect("store lock poisoned")
            .push_back(error);
    }

    /// Override the estimated count for a collection
    ///
    /// Simulates a stale aggregate: the hint is returned regardless of the
    /// actual contents.
    pub fn set_count_hint(&self, collection: &str, count: u64) {
        self.count_hints
            .lock()
            .expect("store lock poisoned")
            .insert(collection.to_string(), count);
    }

    fn matching_records(&self, query: &Query) -> Vec<Record> {
        let collections = self.collections.read().expect("store lock poisoned");
        let Some(records) = collections.get(&query.collection) else {
            return Vec::new();
        };

        let mut matched: Vec<Record> = records
            .iter()
            .filter(|r| query.predicates.iter().all(|p| matches(r, p)))
            .cloned()
            .collect();

        matched.sort_by(|a, b| {
            let ord = (a.created_at, &a.id).cmp(&(b.created_at, &b.id));
            match query.sort.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });

        matched
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn execute(&self, query: &Query) -> Result<Vec<Record>> {
        if let Some(error) = self
            .fail_queue
            .lock()
            .expect("store lock poisoned")
            .pop_front()
        {
            return Err(error);
        }

        self.executed.fetch_add(1, Ordering::SeqCst);

        let mut matched = self.matching_records(query);

        if let Some(after) = &query.after {
            let position = parse_position(after)?;
            matched.retain(|r| {
                let key = (r.created_at, r.id.as_str());
                match query.sort.direction {
                    SortDirection::Asc => key > (position.0, position.1.as_str()),
                    SortDirection::Desc => key < (position.0, position.1.as_str()),
                }
            });
        }

        matched.truncate(query.limit);
        Ok(matched)
    }
}

#[async_trait]
impl CountEstimator for MemoryStore {
    async fn estimate(&self, collection: &str, filter: &Filter) -> Result<Option<u64>> {
        if let Some(hint) = self
            .count_hints
            .lock()
            .expect("store lock poisoned")
            .get(collection)
        {
            return Ok(Some(*hint));
        }

        // Live count over the native predicates, like a maintained aggregate
        let query = crate::query::QueryBuilder::new(collection).build(filter, None, usize::MAX);
        Ok(Some(self.matching_records(&query).len() as u64))
    }
}

/// Evaluate one predicate against a record
fn matches(record: &Record, predicate: &Predicate) -> bool {
    match (predicate.field, predicate.op) {
        (Field::Text, Operator::Contains) => {
            let Value::String(needle) = &predicate.value else {
                return false;
            };
            let needle = needle.to_lowercase();
            record.fields.values().any(|v| match v {
                Value::String(s) => s.to_lowercase().contains(&needle),
                _ => false,
            })
        }
        (field, Operator::Eq) => record.fields.get(field.as_str()) == Some(&predicate.value),
        (_, Operator::Contains) => match record.fields.get(predicate.field.as_str()) {
            Some(Value::String(s)) => match &predicate.value {
                Value::String(needle) => s.to_lowercase().contains(&needle.to_lowercase()),
                _ => false,
            },
            _ => false,
        },
    }
}

/// Encode a (sort key, id) pair as an opaque position token
fn encode_position(created_at: DateTime<Utc>, id: &str) -> String {
    format!("{:020}:{id}", created_at.timestamp_millis())
}

/// Decode a position token back into its (sort key, id) pair
fn parse_position(token: &CursorToken) -> Result<(DateTime<Utc>, String)> {
    let (millis, id) = token
        .as_str()
        .split_once(':')
        .ok_or_else(|| Error::malformed_query(format!("invalid cursor: {token}")))?;
    let millis: i64 = millis
        .parse()
        .map_err(|_| Error::malformed_query(format!("invalid cursor: {token}")))?;
    let created_at = DateTime::<Utc>::from_timestamp_millis(millis)
        .ok_or_else(|| Error::malformed_query(format!("invalid cursor: {token}")))?;
    Ok((created_at, id.to_string()))
}
