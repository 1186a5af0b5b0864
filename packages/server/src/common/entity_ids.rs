//! Typed ID definitions for all domain entities.
//!
//! This module defines type aliases for each domain entity, providing
//! compile-time type safety for ID usage throughout the application.

// Re-export the core Id type
pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for Competitor entities (monitored storefronts).
pub struct Competitor;

/// Marker type for CrawlJob entities (scrape attempts).
pub struct CrawlJob;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

/// Typed ID for Competitor entities.
pub type CompetitorId = Id<Competitor>;

/// Typed ID for CrawlJob entities.
pub type CrawlJobId = Id<CrawlJob>;
