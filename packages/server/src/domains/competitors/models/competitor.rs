use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::CompetitorId;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Competitor {
    pub id: CompetitorId,
    pub name: String,
    pub url: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Competitor {
    /// Active competitors in dispatch order (alphabetical by name).
    pub async fn find_active(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT id, name, url, active, created_at, updated_at
             FROM competitors
             WHERE active = true
             ORDER BY name ASC",
        )
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_id(id: CompetitorId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT id, name, url, active, created_at, updated_at
             FROM competitors
             WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }
}
