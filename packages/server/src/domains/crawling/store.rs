use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;

use super::models::CrawlJob;
use crate::common::{CompetitorId, CrawlJobId};
use crate::kernel::BaseCrawlJobStore;

/// Postgres-backed implementation of BaseCrawlJobStore
pub struct PgCrawlJobStore {
    pool: PgPool,
}

impl PgCrawlJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseCrawlJobStore for PgCrawlJobStore {
    async fn find_by_id(&self, id: CrawlJobId) -> Result<Option<CrawlJob>> {
        CrawlJob::find_by_id(id, &self.pool).await
    }

    async fn find_latest_for_competitor(
        &self,
        competitor_id: CompetitorId,
    ) -> Result<Option<CrawlJob>> {
        CrawlJob::find_latest_for_competitor(competitor_id, &self.pool).await
    }
}
