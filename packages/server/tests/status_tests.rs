//! Integration tests for job status resolution.
//!
//! - exact lookup by job id, most-recent lookup by competitor id
//! - invalid requests are rejected before the store is touched
//! - transitions written between calls are reflected on the next call

use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use sourcing_core::common::{CompetitorId, CrawlJobId};
use sourcing_core::domains::crawling::models::{CrawlJob, CrawlJobStatus};
use sourcing_core::domains::crawling::{JobStatusResolver, StatusError};
use sourcing_core::kernel::test_dependencies::MockCrawlJobStore;

// =============================================================================
// Test Helpers
// =============================================================================

fn queued_job(competitor_id: CompetitorId) -> CrawlJob {
    CrawlJob::builder()
        .competitor_id(competitor_id)
        .upstream_job_id("run-abc123".to_string())
        .build()
}

fn resolver_with(store: MockCrawlJobStore) -> (JobStatusResolver, Arc<MockCrawlJobStore>) {
    let store = Arc::new(store);
    (JobStatusResolver::new(store.clone()), store)
}

// =============================================================================
// Lookup by job id
// =============================================================================

#[tokio::test]
async fn resolve_by_job_id_returns_the_record() {
    let competitor_id = CompetitorId::new();
    let job = queued_job(competitor_id);
    let job_id = job.id;
    let (resolver, _) = resolver_with(MockCrawlJobStore::new().with_job(job));

    let view = resolver.resolve(Some(job_id), None).await.unwrap();

    assert_eq!(view.id, job_id);
    assert_eq!(view.competitor_id, competitor_id);
    assert_eq!(view.upstream_job_id.as_deref(), Some("run-abc123"));
    assert_eq!(view.status, CrawlJobStatus::Queued);
    assert!(view.completed_at.is_none());
}

#[tokio::test]
async fn resolve_by_unknown_job_id_is_not_found() {
    let (resolver, _) = resolver_with(MockCrawlJobStore::new());

    let err = resolver.resolve(Some(CrawlJobId::new()), None).await.unwrap_err();

    assert!(matches!(err, StatusError::NotFound));
    assert_eq!(err.to_string(), "Job not found");
}

#[tokio::test]
async fn resolve_reflects_a_transition_between_calls() {
    let competitor_id = CompetitorId::new();
    let mut job = queued_job(competitor_id);
    job.status = CrawlJobStatus::Running;
    let job_id = job.id;
    let (resolver, store) = resolver_with(MockCrawlJobStore::new().with_job(job.clone()));

    let view = resolver.resolve(Some(job_id), None).await.unwrap();
    assert_eq!(view.status, CrawlJobStatus::Running);

    // The scraping pipeline finishes the run between two polls.
    job.status = CrawlJobStatus::Succeeded;
    job.products_found = 42;
    job.products_inserted = 17;
    job.completed_at = Some(Utc::now());
    store.update_job(job);

    let view = resolver.resolve(Some(job_id), None).await.unwrap();
    assert_eq!(view.status, CrawlJobStatus::Succeeded);
    assert!(view.completed_at.is_some());
    assert!(view.products_inserted <= view.products_found);
    assert_eq!(view.products_found, 42);
    assert_eq!(view.products_inserted, 17);
}

// =============================================================================
// Lookup by competitor id
// =============================================================================

#[tokio::test]
async fn resolve_by_competitor_returns_the_most_recent_job() {
    let competitor_id = CompetitorId::new();
    let now = Utc::now();

    let old = CrawlJob::builder()
        .competitor_id(competitor_id)
        .status(CrawlJobStatus::Succeeded)
        .created_at(now - ChronoDuration::hours(2))
        .completed_at(now - ChronoDuration::hours(1))
        .build();
    let newest = CrawlJob::builder()
        .competitor_id(competitor_id)
        .created_at(now)
        .build();
    let newest_id = newest.id;

    let (resolver, _) =
        resolver_with(MockCrawlJobStore::new().with_job(old).with_job(newest));

    let view = resolver.resolve(None, Some(competitor_id)).await.unwrap();

    assert_eq!(view.id, newest_id);
    assert_eq!(view.status, CrawlJobStatus::Queued);
}

#[tokio::test]
async fn competitor_with_no_jobs_is_not_found() {
    let (resolver, _) = resolver_with(MockCrawlJobStore::new());

    let err = resolver
        .resolve(None, Some(CompetitorId::new()))
        .await
        .unwrap_err();

    assert!(matches!(err, StatusError::NotFound));
}

#[tokio::test]
async fn job_id_takes_precedence_when_both_ids_are_given() {
    let competitor_a = CompetitorId::new();
    let competitor_b = CompetitorId::new();
    let job_for_a = queued_job(competitor_a);
    let job_for_b = queued_job(competitor_b);
    let a_job_id = job_for_a.id;

    let (resolver, _) =
        resolver_with(MockCrawlJobStore::new().with_job(job_for_a).with_job(job_for_b));

    let view = resolver
        .resolve(Some(a_job_id), Some(competitor_b))
        .await
        .unwrap();

    assert_eq!(view.id, a_job_id);
    assert_eq!(view.competitor_id, competitor_a);
}

// =============================================================================
// Request validation
// =============================================================================

#[tokio::test]
async fn resolve_with_neither_id_is_rejected_before_any_lookup() {
    let (resolver, store) = resolver_with(MockCrawlJobStore::new());

    let err = resolver.resolve(None, None).await.unwrap_err();

    assert!(matches!(err, StatusError::InvalidRequest));
    assert_eq!(store.lookup_count(), 0);
}

// =============================================================================
// Defensive read-side validation
// =============================================================================

#[tokio::test]
async fn terminal_record_without_completed_at_is_surfaced_as_corrupt() {
    let mut job = queued_job(CompetitorId::new());
    job.status = CrawlJobStatus::Succeeded; // completed_at deliberately unset
    let job_id = job.id;

    let (resolver, _) = resolver_with(MockCrawlJobStore::new().with_job(job));

    let err = resolver.resolve(Some(job_id), None).await.unwrap_err();
    assert!(matches!(err, StatusError::Store(_)));
}

// =============================================================================
// Wire shape
// =============================================================================

#[tokio::test]
async fn status_view_serializes_with_stable_camel_case_fields() {
    let job = queued_job(CompetitorId::new());
    let job_id = job.id;
    let (resolver, _) = resolver_with(MockCrawlJobStore::new().with_job(job));

    let view = resolver.resolve(Some(job_id), None).await.unwrap();
    let json = serde_json::to_value(&view).unwrap();

    for key in [
        "id",
        "competitorId",
        "upstreamJobId",
        "status",
        "productsFound",
        "productsInserted",
        "errorMessage",
        "createdAt",
        "completedAt",
    ] {
        assert!(json.get(key).is_some(), "missing wire field {}", key);
    }
    assert_eq!(json["status"], "queued");
}
