//! Server dependencies for the orchestration core (using traits for testability)
//!
//! This module provides the central dependency container used by the crawl
//! dispatcher and status resolver. All external services use trait
//! abstractions to enable testing.

use sqlx::PgPool;
use std::sync::Arc;

use crate::kernel::{BaseCompetitorDirectory, BaseCrawlJobStore, BaseScrapeInvoker};

/// Server dependencies accessible to the orchestration core
#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    pub directory: Arc<dyn BaseCompetitorDirectory>,
    pub invoker: Arc<dyn BaseScrapeInvoker>,
    pub job_store: Arc<dyn BaseCrawlJobStore>,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    pub fn new(
        db_pool: PgPool,
        directory: Arc<dyn BaseCompetitorDirectory>,
        invoker: Arc<dyn BaseScrapeInvoker>,
        job_store: Arc<dyn BaseCrawlJobStore>,
    ) -> Self {
        Self {
            db_pool,
            directory,
            invoker,
            job_store,
        }
    }
}
