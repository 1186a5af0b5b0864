use anyhow::{Context, Result};
use apify_client::{ApifyClient, ProductCrawlerInput};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use super::BaseScrapeInvoker;
use crate::common::CrawlJobId;
use crate::domains::competitors::models::Competitor;
use crate::domains::crawling::models::CrawlJob;

/// Apify-backed implementation of BaseScrapeInvoker.
///
/// Creates the crawl job record, then submits a product-crawler run for the
/// competitor's storefront. Status transitions after submission are written
/// by the scraping pipeline, not here.
pub struct ApifyScrapeInvoker {
    pool: PgPool,
    client: Arc<ApifyClient>,
    actor_id: String,
}

impl ApifyScrapeInvoker {
    pub fn new(pool: PgPool, client: Arc<ApifyClient>, actor_id: String) -> Self {
        Self {
            pool,
            client,
            actor_id,
        }
    }
}

#[async_trait]
impl BaseScrapeInvoker for ApifyScrapeInvoker {
    async fn start(&self, competitor: &Competitor, limit: u32) -> Result<CrawlJobId> {
        let job = CrawlJob::builder()
            .competitor_id(competitor.id)
            .build()
            .insert(&self.pool)
            .await
            .context("Failed to create crawl job record")?;

        let input = ProductCrawlerInput::for_storefront(&competitor.url, limit);
        match self.client.start_actor_run(&self.actor_id, &input).await {
            Ok(run) => {
                CrawlJob::assign_upstream_job(job.id, &run.id, &self.pool).await?;
                tracing::info!(
                    job_id = %job.id,
                    competitor = %competitor.name,
                    upstream_job_id = %run.id,
                    "Scrape started"
                );
                Ok(job.id)
            }
            Err(e) => {
                let message = format!("failed to start upstream run: {}", e);
                // Best effort: the job row stays behind as a failed attempt
                // so the audit trail shows the submission was tried.
                if let Err(mark_err) = CrawlJob::mark_failed(job.id, &message, &self.pool).await {
                    tracing::warn!(
                        job_id = %job.id,
                        error = %mark_err,
                        "Failed to record scrape start failure"
                    );
                }
                Err(anyhow::anyhow!(message))
            }
        }
    }
}
