//! Competitor domain - monitored storefronts.
//!
//! Competitors are created and deactivated by the admin workflow; the crawl
//! core only reads them through BaseCompetitorDirectory.

pub mod directory;
pub mod models;

pub use directory::PgCompetitorDirectory;
