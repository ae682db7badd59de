//! Query builder
//!
//! Pure translation from a filter set to store predicates. The builder
//! holds the per-collection constants (name, sort, search mode); `build`
//! has no side effects and no hidden inputs.

use super::types::{Field, Predicate, Query, Sort};
use crate::filter::{Filter, FilterClause};
use crate::store::CursorToken;
use crate::types::{SearchMode, SortDirection};

/// Builds queries for one collection under one sort order
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    collection: String,
    sort: Sort,
    search_mode: SearchMode,
}

impl QueryBuilder {
    /// Create a builder for a collection, sorted newest-first
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            sort: Sort::recency(),
            search_mode: SearchMode::default(),
        }
    }

    /// Override the sort direction
    #[must_use]
    pub fn with_sort_direction(mut self, direction: SortDirection) -> Self {
        self.sort.direction = direction;
        self
    }

    /// Set where free-text search is evaluated
    #[must_use]
    pub fn with_search_mode(mut self, mode: SearchMode) -> Self {
        self.search_mode = mode;
        self
    }

    /// The collection this builder targets
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// The configured search mode
    pub fn search_mode(&self) -> SearchMode {
        self.search_mode
    }

    /// Translate a filter and an optional cursor into a query
    ///
    /// Unconstrained slots contribute nothing. The after-cursor constraint
    /// is appended only when a cursor is supplied; the sort is always
    /// explicit. In client-side search mode the free-text clause is left
    /// out of the query and applied by the fetcher after retrieval.
    pub fn build(&self, filter: &Filter, after: Option<&CursorToken>, limit: usize) -> Query {
        let mut predicates = Vec::new();

        for clause in filter.clauses() {
            match clause {
                FilterClause::IssueType(t) => {
                    predicates.push(Predicate::eq(Field::IssueType, t));
                }
                FilterClause::Severity(s) => {
                    predicates.push(Predicate::eq(Field::Severity, s.as_str()));
                }
                FilterClause::Entity(e) => {
                    predicates.push(Predicate::eq(Field::Entity, e));
                }
                FilterClause::Status(s) => {
                    predicates.push(Predicate::eq(Field::Status, s.as_str()));
                }
                FilterClause::RunId(r) => {
                    predicates.push(Predicate::eq(Field::RunId, r));
                }
                FilterClause::Search(s) => {
                    if self.search_mode == SearchMode::Native {
                        predicates.push(Predicate::contains(Field::Text, s));
                    }
                }
            }
        }

        Query {
            collection: self.collection.clone(),
            predicates,
            sort: self.sort,
            after: after.cloned(),
            limit,
        }
    }
}
