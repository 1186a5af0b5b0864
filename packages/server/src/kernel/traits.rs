// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// The orchestration core (dispatcher, status resolver) consumes these and
// can be tested with fakes that simulate delay, partial failure, and
// malformed records without any network dependency.
//
// Naming convention: Base* for trait names (e.g., BaseScrapeInvoker)

use anyhow::Result;
use async_trait::async_trait;

use crate::common::{CompetitorId, CrawlJobId};
use crate::domains::competitors::models::Competitor;
use crate::domains::crawling::models::CrawlJob;

// =============================================================================
// Competitor Directory Trait (Infrastructure - read-only)
// =============================================================================

#[async_trait]
pub trait BaseCompetitorDirectory: Send + Sync {
    /// List competitors with active=true, ordered by name ascending.
    ///
    /// The ordering is part of the contract: dispatch iterates the returned
    /// list as-is, so results and logs stay reproducible across runs.
    async fn list_active(&self) -> Result<Vec<Competitor>>;
}

// =============================================================================
// Scrape Invoker Trait (Infrastructure - upstream provider)
// =============================================================================

#[async_trait]
pub trait BaseScrapeInvoker: Send + Sync {
    /// Start one scrape for one competitor, capped at `limit` products.
    ///
    /// A successful call has created a crawl job record (status queued) and
    /// submitted the upstream run; the returned id is our job id, not the
    /// provider's. Any error means no scrape was started for this competitor.
    async fn start(&self, competitor: &Competitor, limit: u32) -> Result<CrawlJobId>;
}

// =============================================================================
// Crawl Job Store Trait (Infrastructure - read-only for the core)
// =============================================================================

#[async_trait]
pub trait BaseCrawlJobStore: Send + Sync {
    /// Exact lookup by job id.
    async fn find_by_id(&self, id: CrawlJobId) -> Result<Option<CrawlJob>>;

    /// The most recently created job for a competitor, if any.
    async fn find_latest_for_competitor(
        &self,
        competitor_id: CompetitorId,
    ) -> Result<Option<CrawlJob>>;
}
