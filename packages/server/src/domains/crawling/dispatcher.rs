//! Batch dispatch - fan one crawl request out to every active competitor.
//!
//! The dispatcher is sequential by design: one scrape submission at a time,
//! with a pacing delay between submissions so the upstream provider never
//! sees a burst. One competitor's failure is recorded in its result entry
//! and never aborts the batch.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::common::{CompetitorId, CrawlJobId};
use crate::domains::competitors::models::Competitor;
use crate::kernel::{BaseCompetitorDirectory, BaseScrapeInvoker};

pub const DEFAULT_LIMIT: u32 = 50;
pub const MAX_LIMIT: u32 = 100;
pub const DEFAULT_PACING: Duration = Duration::from_millis(500);
pub const DEFAULT_INVOKE_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that abort the whole batch. Per-competitor failures are not
/// errors at this level; they land in the result entries.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("failed to read competitor directory: {0}")]
    Directory(anyhow::Error),
}

// ============================================================================
// Pacing
// ============================================================================

/// Fixed-interval pacing between scrape submissions.
///
/// A named policy rather than an inline sleep, so tests can construct a
/// dispatcher with a zero interval and timing tests can assert the interval
/// is actually awaited.
#[derive(Debug, Clone)]
pub struct Pacer {
    interval: Duration,
}

impl Pacer {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub async fn pace(&self) {
        if !self.interval.is_zero() {
            tokio::time::sleep(self.interval).await;
        }
    }
}

impl Default for Pacer {
    fn default() -> Self {
        Self::new(DEFAULT_PACING)
    }
}

// ============================================================================
// Results
// ============================================================================

/// Outcome for a single competitor within a batch.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorOutcome {
    pub competitor: String,
    pub competitor_id: CompetitorId,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<CrawlJobId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate result of one dispatch call. Transient - never persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub success: bool,
    pub message: String,
    pub success_count: usize,
    pub fail_count: usize,
    pub results: Vec<CompetitorOutcome>,
}

// ============================================================================
// Dispatcher
// ============================================================================

pub struct BatchDispatcher {
    directory: Arc<dyn BaseCompetitorDirectory>,
    invoker: Arc<dyn BaseScrapeInvoker>,
    pacer: Pacer,
    invoke_timeout: Duration,
}

impl BatchDispatcher {
    pub fn new(
        directory: Arc<dyn BaseCompetitorDirectory>,
        invoker: Arc<dyn BaseScrapeInvoker>,
    ) -> Self {
        Self {
            directory,
            invoker,
            pacer: Pacer::default(),
            invoke_timeout: DEFAULT_INVOKE_TIMEOUT,
        }
    }

    pub fn with_pacing(mut self, interval: Duration) -> Self {
        self.pacer = Pacer::new(interval);
        self
    }

    pub fn with_invoke_timeout(mut self, timeout: Duration) -> Self {
        self.invoke_timeout = timeout;
        self
    }

    /// Fan a batch crawl out to all active competitors.
    ///
    /// Returns Err only when the competitor directory cannot be read; every
    /// other failure is recorded per competitor and the summary comes back
    /// with `success: true`. The cancellation token is checked between
    /// competitors, never mid-invocation.
    pub async fn dispatch(
        &self,
        limit: Option<u32>,
        cancel: &CancellationToken,
    ) -> Result<BatchSummary, DispatchError> {
        let limit = clamp_limit(limit);

        let competitors = self
            .directory
            .list_active()
            .await
            .map_err(DispatchError::Directory)?;

        if competitors.is_empty() {
            tracing::warn!("Batch dispatch requested but no active competitors exist");
            return Ok(BatchSummary {
                success: true,
                message: "no active competitors to crawl".to_string(),
                success_count: 0,
                fail_count: 0,
                results: Vec::new(),
            });
        }

        let total = competitors.len();
        tracing::info!(total, limit, "Dispatching batch crawl");

        let mut results = Vec::with_capacity(total);
        let mut cancelled = false;

        for competitor in &competitors {
            if cancel.is_cancelled() {
                tracing::info!(
                    processed = results.len(),
                    total,
                    "Batch dispatch cancelled between competitors"
                );
                cancelled = true;
                break;
            }

            results.push(self.start_one(competitor, limit).await);
            self.pacer.pace().await;
        }

        let success_count = results.iter().filter(|r| r.success).count();
        let fail_count = results.len() - success_count;

        let message = if cancelled {
            format!("cancelled after {} of {} competitors", results.len(), total)
        } else {
            format!("started {} of {} competitor crawls", success_count, total)
        };

        tracing::info!(success_count, fail_count, total, "Batch dispatch complete");

        Ok(BatchSummary {
            success: true,
            message,
            success_count,
            fail_count,
            results,
        })
    }

    async fn start_one(&self, competitor: &Competitor, limit: u32) -> CompetitorOutcome {
        let invocation = self.invoker.start(competitor, limit);
        match tokio::time::timeout(self.invoke_timeout, invocation).await {
            Ok(Ok(job_id)) => {
                tracing::debug!(
                    competitor = %competitor.name,
                    job_id = %job_id,
                    "Scrape job started"
                );
                CompetitorOutcome {
                    competitor: competitor.name.clone(),
                    competitor_id: competitor.id,
                    success: true,
                    job_id: Some(job_id),
                    error: None,
                }
            }
            Ok(Err(e)) => {
                tracing::warn!(
                    competitor = %competitor.name,
                    error = %e,
                    "Scrape invocation failed; continuing with remaining competitors"
                );
                CompetitorOutcome {
                    competitor: competitor.name.clone(),
                    competitor_id: competitor.id,
                    success: false,
                    job_id: None,
                    error: Some(e.to_string()),
                }
            }
            Err(_) => {
                let error = format!(
                    "scrape invocation timed out after {}s",
                    self.invoke_timeout.as_secs()
                );
                tracing::warn!(
                    competitor = %competitor.name,
                    timeout_secs = self.invoke_timeout.as_secs(),
                    "Scrape invocation timed out; continuing with remaining competitors"
                );
                CompetitorOutcome {
                    competitor: competitor.name.clone(),
                    competitor_id: competitor.id,
                    success: false,
                    job_id: None,
                    error: Some(error),
                }
            }
        }
    }
}

fn clamp_limit(limit: Option<u32>) -> u32 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_to_50() {
        assert_eq!(clamp_limit(None), 50);
    }

    #[test]
    fn limit_clamps_to_bounds() {
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(1)), 1);
        assert_eq!(clamp_limit(Some(100)), 100);
        assert_eq!(clamp_limit(Some(250)), 100);
    }

    #[tokio::test]
    async fn zero_interval_pacer_returns_immediately() {
        // Must not schedule a timer at all; a plain await suffices.
        Pacer::new(Duration::ZERO).pace().await;
    }
}
