//! Crawling domain - the batch crawl orchestration core.
//!
//! `BatchDispatcher` fans one dispatch request out into one rate-limited
//! scrape job per active competitor; `JobStatusResolver` answers polling
//! queries by job id or competitor id.

pub mod dispatcher;
pub mod models;
pub mod status;
pub mod store;

pub use dispatcher::{BatchDispatcher, BatchSummary, CompetitorOutcome, DispatchError, Pacer};
pub use status::{JobStatusResolver, JobStatusView, StatusError};
pub use store::PgCrawlJobStore;
