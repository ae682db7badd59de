//! Tests for query construction

use super::*;
use crate::filter::{Filter, IssueStatus, Severity};
use crate::store::CursorToken;
use crate::types::{SearchMode, SortDirection};
use pretty_assertions::assert_eq;
use serde_json::json;

fn builder() -> QueryBuilder {
    QueryBuilder::new("issues")
}

// ============================================================================
// Predicate Translation Tests
// ============================================================================

#[test]
fn test_empty_filter_builds_no_predicates() {
    let query = builder().build(&Filter::new(), None, 25);

    assert_eq!(query.collection, "issues");
    assert!(query.predicates.is_empty());
    assert!(query.after.is_none());
    assert_eq!(query.limit, 25);
}

#[test]
fn test_sort_is_always_explicit() {
    let query = builder().build(&Filter::new(), None, 25);
    assert_eq!(query.sort.key, SortKey::CreatedAt);
    assert_eq!(query.sort.direction, SortDirection::Desc);

    let query = builder()
        .with_sort_direction(SortDirection::Asc)
        .build(&Filter::new(), None, 25);
    assert_eq!(query.sort.direction, SortDirection::Asc);
}

#[test]
fn test_pinned_slots_become_eq_predicates() {
    let filter = Filter::new()
        .with_issue_type("orphaned_link")
        .with_severity(Severity::High)
        .with_entity("invoices")
        .with_status(IssueStatus::Open)
        .with_run_id("run-7");

    let query = builder().build(&filter, None, 25);

    assert_eq!(query.predicates.len(), 5);
    assert!(query
        .predicates
        .contains(&Predicate::eq(Field::IssueType, "orphaned_link")));
    assert!(query
        .predicates
        .contains(&Predicate::eq(Field::Severity, "high")));
    assert!(query
        .predicates
        .contains(&Predicate::eq(Field::Entity, "invoices")));
    assert!(query
        .predicates
        .contains(&Predicate::eq(Field::Status, "open")));
    assert!(query
        .predicates
        .contains(&Predicate::eq(Field::RunId, "run-7")));
}

#[test]
fn test_all_sentinel_is_omitted_not_translated() {
    // An unconstrained status slot must produce no predicate at all
    let query = builder().build(&Filter::new(), None, 25);
    assert!(!query.predicates.iter().any(|p| p.field == Field::Status));
}

// ============================================================================
// Search Mode Tests
// ============================================================================

#[test]
fn test_native_search_becomes_contains_predicate() {
    let filter = Filter::new().with_search("duplicate");
    let query = builder()
        .with_search_mode(SearchMode::Native)
        .build(&filter, None, 25);

    assert_eq!(
        query.predicates,
        vec![Predicate::contains(Field::Text, "duplicate")]
    );
}

#[test]
fn test_client_search_is_excluded_from_query() {
    let filter = Filter::new().with_search("duplicate");
    let query = builder()
        .with_search_mode(SearchMode::Client)
        .build(&filter, None, 25);

    assert!(query.predicates.is_empty());
}

// ============================================================================
// Cursor Tests
// ============================================================================

#[test]
fn test_after_cursor_appended_only_when_present() {
    let token = CursorToken::new("rec_0042");

    let without = builder().build(&Filter::new(), None, 25);
    assert!(without.after.is_none());

    let with = builder().build(&Filter::new(), Some(&token), 25);
    assert_eq!(with.after, Some(token));
}

// ============================================================================
// Purity Tests
// ============================================================================

#[test]
fn test_build_is_deterministic() {
    let filter = Filter::new()
        .with_severity(Severity::Low)
        .with_search("stale");
    let b = builder();

    let q1 = b.build(&filter, None, 10);
    let q2 = b.build(&filter, None, 10);
    assert_eq!(q1, q2);
}

// ============================================================================
// Serde Tests
// ============================================================================

#[test]
fn test_query_wire_shape() {
    let filter = Filter::new().with_status(IssueStatus::Open);
    let token = CursorToken::new("rec_9");
    let query = builder().build(&filter, Some(&token), 26);

    let value = serde_json::to_value(&query).unwrap();
    assert_eq!(
        value,
        json!({
            "collection": "issues",
            "predicates": [
                {"field": "status", "op": "eq", "value": "open"}
            ],
            "sort": {"key": "created_at", "direction": "desc"},
            "after": "rec_9",
            "limit": 26
        })
    );
}
