use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;

use super::models::Competitor;
use crate::kernel::BaseCompetitorDirectory;

/// Postgres-backed implementation of BaseCompetitorDirectory
pub struct PgCompetitorDirectory {
    pool: PgPool,
}

impl PgCompetitorDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseCompetitorDirectory for PgCompetitorDirectory {
    async fn list_active(&self) -> Result<Vec<Competitor>> {
        Competitor::find_active(&self.pool)
            .await
            .context("Failed to read competitor directory")
    }
}
