//! Tests for the pagination navigator
//!
//! The in-memory store's executed-query counter makes fetch-count
//! assertions exact: sequential derivation and the no-op cases are
//! verified by counting, not inferred from contents.

use super::*;
use crate::error::Error;
use crate::filter::{Filter, Severity};
use crate::query::Query;
use crate::retry::RetryPolicy;
use crate::store::{MemoryStore, Record};
use crate::types::{BackoffType, PrevPolicy, SearchMode};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::Duration;
use test_case::test_case;
use tokio::sync::Notify;

fn seeded(n: usize) -> Arc<MemoryStore> {
    let store = MemoryStore::new();
    for i in 0..n {
        let fields = json!({
            "issue_type": "missing_field",
            "severity": if i % 2 == 0 { "high" } else { "low" },
            "status": "open",
            "description": format!("integrity issue {i}"),
        });
        store.put(
            "issues",
            format!("rec_{i:04}"),
            Utc.timestamp_opt(1_700_000_000 + i as i64, 0).unwrap(),
            fields.as_object().unwrap().clone(),
        );
    }
    Arc::new(store)
}

fn fast_config(page_size: usize) -> NavigatorConfig {
    NavigatorConfig::new()
        .with_page_size(page_size)
        .with_retry(RetryPolicy::default().with_backoff(
            BackoffType::Constant,
            Duration::from_millis(1),
            Duration::from_millis(10),
        ))
}

fn navigator(store: Arc<MemoryStore>, page_size: usize) -> Navigator {
    Navigator::new(store, "issues", fast_config(page_size))
}

async fn history_len(nav: &Navigator) -> usize {
    nav.inner.lock().await.history.len()
}

// ============================================================================
// Traversal Scenario: 61 records, page size 25
// ============================================================================

#[tokio::test]
async fn test_sixty_one_records_traversal() {
    let store = seeded(61);
    let nav = navigator(store.clone(), 25);

    let p1 = nav.load().await.unwrap();
    assert_eq!(p1.page_number, 1);
    assert_eq!(p1.records.len(), 25);
    assert!(p1.has_more);
    assert!(!p1.has_prev);

    let p2 = nav.next().await.unwrap().unwrap();
    assert_eq!(p2.page_number, 2);
    assert_eq!(p2.records.len(), 25);
    assert!(p2.has_more);
    assert!(p2.has_prev);

    let p3 = nav.next().await.unwrap().unwrap();
    assert_eq!(p3.page_number, 3);
    assert_eq!(p3.records.len(), 11);
    assert!(!p3.has_more);

    // Fourth next is a no-op, not an error, and issues no fetch
    store.reset_executed();
    assert!(nav.next().await.unwrap().is_none());
    assert_eq!(store.executed(), 0);

    // Back to page 1: the original 25 records
    let back = nav.goto_page(1).await.unwrap();
    assert_eq!(back.page_number, 1);
    assert_eq!(back.records, p1.records);

    // Last page regardless of hint quality
    let last = nav.goto_last_page(Some(9999)).await.unwrap();
    assert_eq!(last.page_number, 3);
    assert_eq!(last.records.len(), 11);
    assert!(last.has_prev);
    assert!(!last.has_more);
}

#[tokio::test]
async fn test_prev_on_page_one_is_noop() {
    let store = seeded(61);
    let nav = navigator(store.clone(), 25);
    nav.load().await.unwrap();

    store.reset_executed();
    assert!(nav.prev().await.unwrap().is_none());
    assert_eq!(store.executed(), 0);

    let status = nav.status().await;
    assert_eq!(status.current_page, 1);
    assert_eq!(status.phase, Phase::Idle);
    assert!(!status.has_prev);
}

// ============================================================================
// Sequential Derivation
// ============================================================================

#[tokio::test]
async fn test_forward_jump_fetches_every_intermediate_page() {
    let store = seeded(200);
    let nav = navigator(store.clone(), 25);
    nav.load().await.unwrap();

    store.reset_executed();
    let view = nav.goto_page(5).await.unwrap();
    assert_eq!(view.page_number, 5);
    // Exactly target - current fetches, one per derived cursor
    assert_eq!(store.executed(), 4);
}

#[tokio::test]
async fn test_forward_jump_stops_at_true_end() {
    let store = seeded(61);
    let nav = navigator(store.clone(), 25);
    nav.load().await.unwrap();

    let view = nav.goto_page(99).await.unwrap();
    assert_eq!(view.page_number, 3);
    assert_eq!(view.records.len(), 11);
    assert!(!view.has_more);
}

#[tokio::test]
async fn test_backward_jump_uses_recorded_cursor() {
    let store = seeded(200);
    let nav = navigator(store.clone(), 25);
    nav.load().await.unwrap();
    nav.goto_page(6).await.unwrap();

    store.reset_executed();
    let view = nav.goto_page(3).await.unwrap();
    assert_eq!(view.page_number, 3);
    // One fetch: the cursor for page 3 was already in history
    assert_eq!(store.executed(), 1);
    assert_eq!(history_len(&nav).await, 3);
}

// ============================================================================
// Stack Consistency
// ============================================================================

#[tokio::test]
async fn test_history_length_tracks_current_page() {
    let store = seeded(200);
    let nav = navigator(store, 25);

    nav.load().await.unwrap();
    assert_eq!(history_len(&nav).await, 1);

    nav.next().await.unwrap();
    assert_eq!(history_len(&nav).await, 2);

    nav.goto_page(7).await.unwrap();
    assert_eq!(history_len(&nav).await, 7);

    nav.prev().await.unwrap();
    assert_eq!(history_len(&nav).await, 6);

    nav.goto_page(2).await.unwrap();
    assert_eq!(history_len(&nav).await, 2);

    // Slot 0 is always the null cursor
    assert!(nav.inner.lock().await.history.at(1).is_none());
}

#[tokio::test]
async fn test_goto_page_one_equals_fresh_reset() {
    let store = seeded(100);
    let nav = navigator(store.clone(), 25);
    nav.load().await.unwrap();
    nav.goto_page(3).await.unwrap();

    let view = nav.goto_page(1).await.unwrap();

    let fresh = navigator(store, 25);
    let fresh_view = fresh.load().await.unwrap();

    assert_eq!(view.page_number, fresh_view.page_number);
    assert_eq!(view.records, fresh_view.records);
    assert_eq!(view.has_more, fresh_view.has_more);
    assert_eq!(history_len(&nav).await, 1);
    assert_eq!(nav.status().await, fresh.status().await);
}

// ============================================================================
// Last Page / Hint Tolerance
// ============================================================================

#[test_case(Some(0); "hint of zero")]
#[test_case(Some(2); "hint too small")]
#[test_case(Some(1_000_000); "hint far too large")]
#[test_case(None; "no hint")]
#[tokio::test]
async fn test_goto_last_page_ignores_hint_quality(hint: Option<u64>) {
    let store = seeded(61);
    let nav = navigator(store, 25);
    nav.load().await.unwrap();

    let view = nav.goto_last_page(hint).await.unwrap();
    assert_eq!(view.page_number, 3);
    assert_eq!(view.records.len(), 11);
    assert!(!view.has_more);
}

#[tokio::test]
async fn test_goto_last_page_with_stale_estimator() {
    let store = seeded(61);
    // The aggregate claims far more data than exists
    store.set_count_hint("issues", 25_000);
    let nav = navigator(store.clone(), 25).with_estimator(store);

    nav.load().await.unwrap();
    let view = nav.goto_last_page(None).await.unwrap();

    // The hint is displayed but the stop condition is the short fetch
    assert_eq!(view.page_number, 3);
    assert_eq!(view.total_pages_hint, Some(1000));
}

#[tokio::test]
async fn test_goto_last_page_when_already_there_refreshes() {
    let store = seeded(20);
    let nav = navigator(store.clone(), 25);
    nav.load().await.unwrap();

    store.reset_executed();
    let view = nav.goto_last_page(None).await.unwrap();
    assert_eq!(view.page_number, 1);
    assert_eq!(view.records.len(), 20);
    assert_eq!(store.executed(), 1);
}

#[tokio::test]
async fn test_estimator_feeds_page_hint() {
    let store = seeded(61);
    let nav = navigator(store.clone(), 25).with_estimator(store);

    let view = nav.load().await.unwrap();
    assert_eq!(view.total_pages_hint, Some(3));
}

// ============================================================================
// Filter Changes
// ============================================================================

#[tokio::test]
async fn test_filter_change_resets_position_and_history() {
    let store = seeded(100);
    let nav = navigator(store, 25);
    nav.load().await.unwrap();
    nav.goto_page(3).await.unwrap();

    let view = nav
        .set_filter(Filter::new().with_severity(Severity::High))
        .await
        .unwrap();

    assert_eq!(view.page_number, 1);
    assert!(!view.has_prev);
    assert_eq!(history_len(&nav).await, 1);
    // 50 of 100 records are high severity
    assert_eq!(view.records.len(), 25);
    assert!(view
        .records
        .iter()
        .all(|r| r.fields["severity"] == "high"));
}

#[tokio::test]
async fn test_filter_object_is_replaced_by_value() {
    let store = seeded(10);
    let nav = navigator(store, 25);
    nav.load().await.unwrap();

    let filter = Filter::new().with_search("issue 3");
    nav.set_filter(filter.clone()).await.unwrap();
    assert_eq!(nav.filter().await, filter);
}

// ============================================================================
// Prev Policies
// ============================================================================

#[tokio::test]
async fn test_prev_refetches_for_freshness_by_default() {
    let store = seeded(30);
    let nav = navigator(store.clone(), 10);
    nav.load().await.unwrap();
    nav.next().await.unwrap();

    // A record on page 1 disappears while we are on page 2
    assert!(store.remove("issues", "rec_0029"));

    store.reset_executed();
    let view = nav.prev().await.unwrap().unwrap();
    assert_eq!(store.executed(), 1);
    assert_eq!(view.page_number, 1);
    // Fresh read reflects the deletion
    assert!(view.records.iter().all(|r| r.id != "rec_0029"));
}

#[tokio::test]
async fn test_prev_cache_policy_serves_stale_copy_without_fetch() {
    let store = seeded(30);
    let config = fast_config(10).with_prev_policy(PrevPolicy::CachePages);
    let nav = Navigator::new(store.clone(), "issues", config);
    nav.load().await.unwrap();
    nav.next().await.unwrap();

    assert!(store.remove("issues", "rec_0029"));

    store.reset_executed();
    let view = nav.prev().await.unwrap().unwrap();
    assert_eq!(store.executed(), 0);
    // The cached copy still shows the deleted record
    assert!(view.records.iter().any(|r| r.id == "rec_0029"));
}

// ============================================================================
// Error Handling
// ============================================================================

#[tokio::test]
async fn test_failure_preserves_position_for_retry() {
    let store = seeded(100);
    let nav = navigator(store.clone(), 25);
    nav.load().await.unwrap();
    nav.next().await.unwrap();

    // Exhaust all four attempts (one initial + three retries)
    for _ in 0..4 {
        store.fail_next(Error::unavailable("down"));
    }
    let err = nav.next().await.unwrap_err();
    assert!(matches!(err, Error::Unavailable { .. }));

    let status = nav.status().await;
    assert_eq!(status.phase, Phase::Error);
    assert_eq!(status.current_page, 2);
    assert_eq!(history_len(&nav).await, 2);

    // Retry resumes from the preserved position
    let view = nav.retry().await.unwrap();
    assert_eq!(view.page_number, 2);
    assert_eq!(nav.status().await.phase, Phase::Idle);
}

#[tokio::test]
async fn test_unauthorized_is_not_retried() {
    let store = seeded(10);
    let nav = navigator(store.clone(), 5);

    store.fail_next(Error::unauthorized("expired key"));
    let err = nav.load().await.unwrap_err();
    assert!(matches!(err, Error::Unauthorized { .. }));
    // The queued failure was the only attempt
    assert_eq!(store.executed(), 0);
}

#[tokio::test]
async fn test_transient_failure_is_retried_through() {
    let store = seeded(10);
    let nav = navigator(store.clone(), 5);

    store.fail_next(Error::unavailable("blip"));
    store.fail_next(Error::quota_exceeded(0));
    let view = nav.load().await.unwrap();
    assert_eq!(view.records.len(), 5);
    assert_eq!(nav.status().await.phase, Phase::Idle);
}

// ============================================================================
// Generation / In-Flight Invalidation
// ============================================================================

/// Store wrapper that can hold one query open until released
struct GatedStore {
    inner: Arc<MemoryStore>,
    armed: AtomicBool,
    gate: Notify,
}

#[async_trait]
impl crate::store::DocumentStore for GatedStore {
    async fn execute(&self, query: &Query) -> crate::error::Result<Vec<Record>> {
        if self.armed.swap(false, AtomicOrdering::SeqCst) {
            self.gate.notified().await;
        }
        self.inner.execute(query).await
    }
}

#[tokio::test]
async fn test_filter_change_invalidates_in_flight_fetch() {
    let memory = seeded(100);
    let gated = Arc::new(GatedStore {
        inner: memory,
        armed: AtomicBool::new(false),
        gate: Notify::new(),
    });
    let nav = Arc::new(Navigator::new(
        gated.clone(),
        "issues",
        fast_config(25),
    ));
    nav.load().await.unwrap();

    // Hold the next fetch open
    gated.armed.store(true, AtomicOrdering::SeqCst);
    let in_flight = {
        let nav = nav.clone();
        tokio::spawn(async move { nav.next().await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Filter change while the fetch is in flight: the generation bump
    // lands immediately even though the reset waits for the lock
    let filter_change = {
        let nav = nav.clone();
        tokio::spawn(async move { nav.set_filter(Filter::new().with_search("issue")).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    gated.gate.notify_one();

    let stale = in_flight.await.unwrap();
    assert!(matches!(stale, Err(Error::Superseded)));

    let fresh = filter_change.await.unwrap().unwrap();
    assert_eq!(fresh.page_number, 1);
    assert_eq!(nav.status().await.current_page, 1);
}

#[tokio::test]
async fn test_overlapping_operations_serialize() {
    let store = seeded(100);
    let nav = Arc::new(navigator(store, 25));
    nav.load().await.unwrap();

    let a = {
        let nav = nav.clone();
        tokio::spawn(async move { nav.next().await })
    };
    let b = {
        let nav = nav.clone();
        tokio::spawn(async move { nav.next().await })
    };

    let pages: Vec<usize> = [a.await.unwrap(), b.await.unwrap()]
        .into_iter()
        .map(|r| r.unwrap().unwrap().page_number)
        .collect();

    // Both advanced, one page each, with no interleaved mutation
    let mut sorted = pages.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, vec![2, 3]);
    assert_eq!(nav.status().await.current_page, 3);
    assert_eq!(history_len(&nav).await, 3);
}

// ============================================================================
// Client-Side Search Mode
// ============================================================================

#[tokio::test]
async fn test_client_search_pages_run_short_but_traverse_fully() {
    let store = seeded(40);
    let config = fast_config(10).with_search_mode(SearchMode::Client);
    let nav = Navigator::new(store, "issues", config);

    // "issue 1" matches issue 1 and issues 10..19 as substrings: 11 hits
    nav.set_filter(Filter::new().with_search("issue 1"))
        .await
        .unwrap();

    let mut seen = Vec::new();
    let mut view = nav.goto_page(1).await.unwrap();
    seen.extend(view.records.iter().map(|r| r.id.clone()));
    while view.has_more {
        match nav.next().await.unwrap() {
            Some(next) => {
                seen.extend(next.records.iter().map(|r| r.id.clone()));
                view = next;
            }
            None => break,
        }
    }

    assert_eq!(seen.len(), 11);
    // Traversal covered all four raw windows
    assert_eq!(nav.status().await.current_page, 4);
}
