//! Crawl job model - one scrape attempt against one competitor.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use typed_builder::TypedBuilder;

use crate::common::{CompetitorId, CrawlJobId};

// ============================================================================
// Status / state machine
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "crawl_job_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CrawlJobStatus {
    #[default]
    Queued,
    Running,
    Succeeded,
    Failed,
}

impl CrawlJobStatus {
    /// Terminal states are never left.
    pub fn is_terminal(&self) -> bool {
        matches!(self, CrawlJobStatus::Succeeded | CrawlJobStatus::Failed)
    }

    /// Whether the upstream pipeline may move a job from `self` to `next`.
    ///
    /// The core never writes transitions itself; this table backs the
    /// read-side validation and documents the lifecycle:
    /// queued -> running -> {succeeded | failed}, queued -> failed.
    pub fn can_transition_to(&self, next: CrawlJobStatus) -> bool {
        use CrawlJobStatus::*;
        matches!(
            (self, next),
            (Queued, Running) | (Queued, Failed) | (Running, Succeeded) | (Running, Failed)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CrawlJobStatus::Queued => "queued",
            CrawlJobStatus::Running => "running",
            CrawlJobStatus::Succeeded => "succeeded",
            CrawlJobStatus::Failed => "failed",
        }
    }
}

// ============================================================================
// Model
// ============================================================================

#[derive(FromRow, Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct CrawlJob {
    #[builder(default = CrawlJobId::new())]
    pub id: CrawlJobId,

    pub competitor_id: CompetitorId,

    /// Handle assigned by the scraping provider; null until the run is
    /// accepted upstream.
    #[builder(default, setter(strip_option))]
    pub upstream_job_id: Option<String>,

    #[builder(default)]
    pub status: CrawlJobStatus,

    #[builder(default = 0)]
    pub products_found: i32,
    #[builder(default = 0)]
    pub products_inserted: i32,

    #[builder(default, setter(strip_option))]
    pub error_message: Option<String>,

    #[builder(default = Utc::now())]
    pub created_at: DateTime<Utc>,
    #[builder(default, setter(strip_option))]
    pub completed_at: Option<DateTime<Utc>>,
}

impl CrawlJob {
    /// Read-side invariant check, run whenever the core materializes a
    /// record. Writes originate in the external pipeline, so a violation
    /// here means corrupt storage rather than a local bug.
    pub fn validate(&self) -> Result<()> {
        if self.status.is_terminal() != self.completed_at.is_some() {
            anyhow::bail!(
                "crawl job {} is {} but completed_at is {}",
                self.id,
                self.status.as_str(),
                if self.completed_at.is_some() {
                    "set"
                } else {
                    "unset"
                }
            );
        }
        if self.status == CrawlJobStatus::Failed
            && self.error_message.as_deref().unwrap_or("").is_empty()
        {
            anyhow::bail!("crawl job {} failed without an error message", self.id);
        }
        if self.products_found < 0 || self.products_inserted < 0 {
            anyhow::bail!("crawl job {} has negative product counters", self.id);
        }
        if self.products_inserted > self.products_found {
            anyhow::bail!(
                "crawl job {} inserted {} products but only found {}",
                self.id,
                self.products_inserted,
                self.products_found
            );
        }
        Ok(())
    }

    pub async fn insert(&self, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO crawl_jobs (
                id, competitor_id, upstream_job_id, status,
                products_found, products_inserted, error_message,
                created_at, completed_at
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING id, competitor_id, upstream_job_id, status,
                       products_found, products_inserted, error_message,
                       created_at, completed_at",
        )
        .bind(self.id)
        .bind(self.competitor_id)
        .bind(&self.upstream_job_id)
        .bind(self.status)
        .bind(self.products_found)
        .bind(self.products_inserted)
        .bind(&self.error_message)
        .bind(self.created_at)
        .bind(self.completed_at)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Record the provider's run handle on a freshly queued job.
    pub async fn assign_upstream_job(
        id: CrawlJobId,
        upstream_job_id: &str,
        pool: &PgPool,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE crawl_jobs SET upstream_job_id = $2
             WHERE id = $1 AND status = 'queued'",
        )
        .bind(id)
        .bind(upstream_job_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Terminal failure write, guarded on prior status so two writers cannot
    /// double-transition the same job.
    pub async fn mark_failed(id: CrawlJobId, error_message: &str, pool: &PgPool) -> Result<()> {
        sqlx::query(
            "UPDATE crawl_jobs
             SET status = 'failed', error_message = $2, completed_at = now()
             WHERE id = $1 AND status IN ('queued', 'running')",
        )
        .bind(id)
        .bind(error_message)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn find_by_id(id: CrawlJobId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT id, competitor_id, upstream_job_id, status,
                    products_found, products_inserted, error_message,
                    created_at, completed_at
             FROM crawl_jobs
             WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Most recent job for a competitor - a single indexed lookup, not a
    /// full-history load.
    pub async fn find_latest_for_competitor(
        competitor_id: CompetitorId,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT id, competitor_id, upstream_job_id, status,
                    products_found, products_inserted, error_message,
                    created_at, completed_at
             FROM crawl_jobs
             WHERE competitor_id = $1
             ORDER BY created_at DESC
             LIMIT 1",
        )
        .bind(competitor_id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_job() -> CrawlJob {
        CrawlJob::builder().competitor_id(CompetitorId::new()).build()
    }

    #[test]
    fn new_job_starts_queued_with_zero_counters() {
        let job = sample_job();
        assert_eq!(job.status, CrawlJobStatus::Queued);
        assert_eq!(job.products_found, 0);
        assert_eq!(job.products_inserted, 0);
        assert!(job.upstream_job_id.is_none());
        assert!(job.completed_at.is_none());
    }

    #[test]
    fn queued_and_running_are_not_terminal() {
        assert!(!CrawlJobStatus::Queued.is_terminal());
        assert!(!CrawlJobStatus::Running.is_terminal());
        assert!(CrawlJobStatus::Succeeded.is_terminal());
        assert!(CrawlJobStatus::Failed.is_terminal());
    }

    #[test]
    fn transition_table_matches_lifecycle() {
        use CrawlJobStatus::*;
        assert!(Queued.can_transition_to(Running));
        assert!(Queued.can_transition_to(Failed));
        assert!(Running.can_transition_to(Succeeded));
        assert!(Running.can_transition_to(Failed));

        assert!(!Queued.can_transition_to(Succeeded));
        assert!(!Running.can_transition_to(Queued));
        assert!(!Succeeded.can_transition_to(Running));
        assert!(!Succeeded.can_transition_to(Failed));
        assert!(!Failed.can_transition_to(Queued));
    }

    #[test]
    fn validate_accepts_fresh_queued_job() {
        assert!(sample_job().validate().is_ok());
    }

    #[test]
    fn validate_rejects_terminal_without_completed_at() {
        let mut job = sample_job();
        job.status = CrawlJobStatus::Succeeded;
        assert!(job.validate().is_err());
    }

    #[test]
    fn validate_rejects_completed_at_while_non_terminal() {
        let mut job = sample_job();
        job.completed_at = Some(Utc::now());
        assert!(job.validate().is_err());
    }

    #[test]
    fn validate_rejects_failure_without_message() {
        let mut job = sample_job();
        job.status = CrawlJobStatus::Failed;
        job.completed_at = Some(Utc::now());
        assert!(job.validate().is_err());

        job.error_message = Some("upstream rejected the run".to_string());
        assert!(job.validate().is_ok());
    }

    #[test]
    fn validate_rejects_inserted_exceeding_found() {
        let mut job = sample_job();
        job.status = CrawlJobStatus::Succeeded;
        job.completed_at = Some(Utc::now());
        job.products_found = 3;
        job.products_inserted = 5;
        assert!(job.validate().is_err());

        job.products_inserted = 3;
        assert!(job.validate().is_ok());
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&CrawlJobStatus::Succeeded).unwrap();
        assert_eq!(json, r#""succeeded""#);
    }
}
