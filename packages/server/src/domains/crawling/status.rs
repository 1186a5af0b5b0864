//! Job status resolution - the polling side of the crawl contract.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use super::models::{CrawlJob, CrawlJobStatus};
use crate::common::{CompetitorId, CrawlJobId};
use crate::kernel::BaseCrawlJobStore;

#[derive(Debug, Error)]
pub enum StatusError {
    /// Neither jobId nor competitorId was supplied. Rejected before any
    /// store lookup.
    #[error("either jobId or competitorId must be provided")]
    InvalidRequest,

    #[error("Job not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// The stable wire shape for a crawl job.
///
/// This is the seam that decouples the polling contract from storage
/// naming: whatever the table columns are called, callers see these fields.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusView {
    pub id: CrawlJobId,
    pub competitor_id: CompetitorId,
    pub upstream_job_id: Option<String>,
    pub status: CrawlJobStatus,
    pub products_found: i32,
    pub products_inserted: i32,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<CrawlJob> for JobStatusView {
    fn from(job: CrawlJob) -> Self {
        Self {
            id: job.id,
            competitor_id: job.competitor_id,
            upstream_job_id: job.upstream_job_id,
            status: job.status,
            products_found: job.products_found,
            products_inserted: job.products_inserted,
            error_message: job.error_message,
            created_at: job.created_at,
            completed_at: job.completed_at,
        }
    }
}

pub struct JobStatusResolver {
    store: Arc<dyn BaseCrawlJobStore>,
}

impl JobStatusResolver {
    pub fn new(store: Arc<dyn BaseCrawlJobStore>) -> Self {
        Self { store }
    }

    /// Resolve the single most relevant job record.
    ///
    /// Exactly one of the ids is required; when both are given, jobId takes
    /// precedence. By competitor id, "most relevant" means most recently
    /// created. Read-only and idempotent: the answer only changes when the
    /// scraping pipeline transitions the job between calls.
    pub async fn resolve(
        &self,
        job_id: Option<CrawlJobId>,
        competitor_id: Option<CompetitorId>,
    ) -> Result<JobStatusView, StatusError> {
        let job = match (job_id, competitor_id) {
            (None, None) => return Err(StatusError::InvalidRequest),
            (Some(id), _) => self.store.find_by_id(id).await?,
            (None, Some(competitor_id)) => {
                self.store.find_latest_for_competitor(competitor_id).await?
            }
        };

        let job = job.ok_or(StatusError::NotFound)?;

        // Defensive read-side validation: transitions are written by the
        // external pipeline, so surface corrupt rows instead of passing
        // them along as healthy status.
        if let Err(e) = job.validate() {
            tracing::error!(
                job_id = %job.id,
                error = %e,
                "Crawl job record violates lifecycle invariant"
            );
            return Err(StatusError::Store(e));
        }

        Ok(JobStatusView::from(job))
    }
}
