// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.
// Mocks record their calls and can be scripted with per-competitor failures,
// hangs (for timeout tests) and directory errors.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use super::{BaseCompetitorDirectory, BaseCrawlJobStore, BaseScrapeInvoker};
use crate::common::{CompetitorId, CrawlJobId};
use crate::domains::competitors::models::Competitor;
use crate::domains::crawling::models::CrawlJob;

/// Build a competitor row for tests without touching a database.
pub fn competitor_fixture(name: &str) -> Competitor {
    Competitor {
        id: CompetitorId::new(),
        name: name.to_string(),
        url: format!("https://{}.example.com", name.to_lowercase()),
        active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

// =============================================================================
// Mock Competitor Directory
// =============================================================================

pub struct MockCompetitorDirectory {
    competitors: Arc<Mutex<Vec<Competitor>>>,
    error: Arc<Mutex<Option<String>>>,
}

impl MockCompetitorDirectory {
    pub fn new() -> Self {
        Self {
            competitors: Arc::new(Mutex::new(Vec::new())),
            error: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_competitors(self, competitors: Vec<Competitor>) -> Self {
        *self.competitors.lock().unwrap() = competitors;
        self
    }

    /// Make list_active fail with the given message.
    pub fn with_error(self, message: &str) -> Self {
        *self.error.lock().unwrap() = Some(message.to_string());
        self
    }
}

impl Default for MockCompetitorDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseCompetitorDirectory for MockCompetitorDirectory {
    async fn list_active(&self) -> Result<Vec<Competitor>> {
        if let Some(message) = self.error.lock().unwrap().clone() {
            return Err(anyhow::anyhow!(message));
        }
        // Honor the trait contract: active competitors, ordered by name.
        let mut competitors: Vec<Competitor> = self
            .competitors
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.active)
            .cloned()
            .collect();
        competitors.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(competitors)
    }
}

// =============================================================================
// Mock Scrape Invoker
// =============================================================================

/// Arguments captured from a start call
#[derive(Debug, Clone)]
pub struct StartCallArgs {
    pub competitor_id: CompetitorId,
    pub competitor_name: String,
    pub limit: u32,
}

pub struct MockScrapeInvoker {
    failures: Arc<Mutex<HashMap<String, String>>>,
    hangs: Arc<Mutex<HashSet<String>>>,
    calls: Arc<Mutex<Vec<StartCallArgs>>>,
    started: Arc<Mutex<Vec<(String, CrawlJobId)>>>,
}

impl MockScrapeInvoker {
    pub fn new() -> Self {
        Self {
            failures: Arc::new(Mutex::new(HashMap::new())),
            hangs: Arc::new(Mutex::new(HashSet::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            started: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Script a failure for the named competitor.
    pub fn with_failure(self, competitor_name: &str, error: &str) -> Self {
        self.failures
            .lock()
            .unwrap()
            .insert(competitor_name.to_string(), error.to_string());
        self
    }

    /// Make the named competitor's invocation never complete.
    pub fn with_hang(self, competitor_name: &str) -> Self {
        self.hangs
            .lock()
            .unwrap()
            .insert(competitor_name.to_string());
        self
    }

    /// Get all start calls with their arguments
    pub fn calls(&self) -> Vec<StartCallArgs> {
        self.calls.lock().unwrap().clone()
    }

    /// Get (competitor name, job id) pairs for successful starts, in order
    pub fn started(&self) -> Vec<(String, CrawlJobId)> {
        self.started.lock().unwrap().clone()
    }
}

impl Default for MockScrapeInvoker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseScrapeInvoker for MockScrapeInvoker {
    async fn start(&self, competitor: &Competitor, limit: u32) -> Result<CrawlJobId> {
        self.calls.lock().unwrap().push(StartCallArgs {
            competitor_id: competitor.id,
            competitor_name: competitor.name.clone(),
            limit,
        });

        if self.hangs.lock().unwrap().contains(&competitor.name) {
            std::future::pending::<()>().await;
            unreachable!("pending future resolved");
        }

        if let Some(error) = self.failures.lock().unwrap().get(&competitor.name).cloned() {
            return Err(anyhow::anyhow!(error));
        }

        let job_id = CrawlJobId::new();
        self.started
            .lock()
            .unwrap()
            .push((competitor.name.clone(), job_id));
        Ok(job_id)
    }
}

// =============================================================================
// Mock Crawl Job Store
// =============================================================================

pub struct MockCrawlJobStore {
    jobs: Arc<Mutex<Vec<CrawlJob>>>,
    lookups: Arc<Mutex<usize>>,
}

impl MockCrawlJobStore {
    pub fn new() -> Self {
        Self {
            jobs: Arc::new(Mutex::new(Vec::new())),
            lookups: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_job(self, job: CrawlJob) -> Self {
        self.jobs.lock().unwrap().push(job);
        self
    }

    /// Replace a stored job in place (simulates the external pipeline
    /// writing a status transition between two resolve calls).
    pub fn update_job(&self, job: CrawlJob) {
        let mut jobs = self.jobs.lock().unwrap();
        if let Some(existing) = jobs.iter_mut().find(|j| j.id == job.id) {
            *existing = job;
        } else {
            jobs.push(job);
        }
    }

    /// How many store lookups have been made
    pub fn lookup_count(&self) -> usize {
        *self.lookups.lock().unwrap()
    }
}

impl Default for MockCrawlJobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseCrawlJobStore for MockCrawlJobStore {
    async fn find_by_id(&self, id: CrawlJobId) -> Result<Option<CrawlJob>> {
        *self.lookups.lock().unwrap() += 1;
        Ok(self.jobs.lock().unwrap().iter().find(|j| j.id == id).cloned())
    }

    async fn find_latest_for_competitor(
        &self,
        competitor_id: CompetitorId,
    ) -> Result<Option<CrawlJob>> {
        *self.lookups.lock().unwrap() += 1;
        let jobs = self.jobs.lock().unwrap();
        Ok(jobs
            .iter()
            .filter(|j| j.competitor_id == competitor_id)
            .max_by_key(|j| j.created_at)
            .cloned())
    }
}
